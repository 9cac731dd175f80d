use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "opnvpn-provision")]
#[command(about = "Manage OPNsense OpenVPN provisioning profiles and run the automation scripts")]
pub struct Cli {
    /// Directory holding config.gui.json and the legacy script files.
    #[arg(long, global = true, default_value = ".")]
    pub dir: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage OPNsense profiles (firewall connection and automation settings).
    #[command(subcommand)]
    Profiles(ProfilesCommand),
    /// Manage user profiles (named VPN user lists).
    #[command(subcommand)]
    UserProfiles(UserProfilesCommand),
    /// Manage the users of one user profile.
    #[command(subcommand)]
    Users(UsersCommand),
    /// Write config.profiles.json, config.settings.json and config.users.json.
    Export(ExportArgs),
    /// Export, then run one of the automation scripts.
    Run(RunArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Profile id or name; defaults to the selected profile.
    pub profile: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the new profile; blank means "Default".
    #[arg(default_value = "")]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    pub profile: String,
    pub new_name: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub profile: String,
}

#[derive(Args, Debug)]
pub struct DuplicateArgs {
    pub profile: String,
    /// Base name for the copy; defaults to the source name.
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    #[arg(required_unless_present = "clear")]
    pub profile: Option<String>,
    /// Clear the selection instead.
    #[arg(long, conflicts_with = "profile")]
    pub clear: bool,
}

#[derive(Subcommand, Debug)]
pub enum ProfilesCommand {
    /// List OPNsense profiles.
    List(ListArgs),
    /// Show the settings of one OPNsense profile.
    Show(ShowArgs),
    /// Create an OPNsense profile with default settings.
    Create(CreateArgs),
    /// Rename an OPNsense profile.
    Rename(RenameArgs),
    /// Delete an OPNsense profile (the last one cannot be deleted).
    Delete(DeleteArgs),
    /// Copy an OPNsense profile and select the copy.
    Duplicate(DuplicateArgs),
    /// Select the OPNsense profile used by default.
    Select(SelectArgs),
    /// Replace connection settings; omitted flags keep their current value.
    SetConnection(SetConnectionArgs),
    /// Change automation settings by field name.
    SetAutomation(SetAutomationArgs),
    /// List the automation field names accepted by set-automation.
    Fields,
}

#[derive(Args, Debug)]
pub struct SetConnectionArgs {
    pub profile: String,
    #[arg(long)]
    pub api_base_url: Option<String>,
    #[arg(long)]
    pub api_key: Option<String>,
    #[arg(long)]
    pub api_secret: Option<String>,
    #[arg(long)]
    pub ssh_host: Option<String>,
    #[arg(long)]
    pub ssh_user: Option<String>,
    #[arg(long)]
    pub ssh_pass: Option<String>,
    /// Reset every omitted field to its default instead of keeping it.
    #[arg(long)]
    pub reset_missing: bool,
}

#[derive(Args, Debug)]
pub struct SetAutomationArgs {
    pub profile: String,
    /// FIELD=VALUE, e.g. Lifetimes.CALifetimeDays=1825 (repeatable).
    #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
    pub assignments: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum UserProfilesCommand {
    /// List user profiles.
    List(ListArgs),
    /// Show the users of one user profile.
    Show(ShowArgs),
    /// Create an empty user profile.
    Create(CreateUserProfileArgs),
    /// Rename a user profile.
    Rename(RenameArgs),
    /// Delete a user profile (the last one cannot be deleted).
    Delete(DeleteArgs),
    /// Copy a user profile with its users and select the copy.
    Duplicate(DuplicateArgs),
    /// Select the user profile used by default.
    Select(SelectArgs),
}

#[derive(Args, Debug)]
pub struct CreateUserProfileArgs {
    #[arg(default_value = "")]
    pub name: String,
    /// Seed the profile with the new-user template.
    #[arg(long)]
    pub with_template_user: bool,
}

#[derive(Args, Debug)]
pub struct ProfileRef {
    /// User profile id or name; defaults to the selected user profile.
    #[arg(long)]
    pub profile: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List users.
    List {
        #[command(flatten)]
        target: ProfileRef,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Add a user; omitted fields come from the new-user template.
    Add(AddUserArgs),
    /// Edit a user; omitted fields keep their current value.
    Update(UpdateUserArgs),
    /// Delete a user.
    Delete {
        #[command(flatten)]
        target: ProfileRef,
        username: String,
    },
    /// Copy a user under a unique username.
    Duplicate {
        #[command(flatten)]
        target: ProfileRef,
        username: String,
        /// Base username for the copy.
        #[arg(long = "as")]
        new_username: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct AddUserArgs {
    #[command(flatten)]
    pub target: ProfileRef,
    /// Username; a unique variant of the template username when omitted.
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateUserArgs {
    #[command(flatten)]
    pub target: ProfileRef,
    pub username: String,
    /// New username.
    #[arg(long)]
    pub rename: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// OPNsense profile whose automation settings are exported.
    #[arg(long)]
    pub opnsense: Option<String>,
    /// User profile whose users are exported.
    #[arg(long)]
    pub users: Option<String>,
    /// Export only this user.
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum RunTask {
    /// Run-Full-Setup.ps1: configure the firewall end to end.
    FullSetup,
    /// Build-Ovpn-Files.ps1: build client configs for every user.
    BuildOvpn,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[arg(value_enum)]
    pub task: RunTask,
    #[arg(long)]
    pub opnsense: Option<String>,
    #[arg(long)]
    pub users: Option<String>,
    /// TOML file overriding the interpreter and script locations.
    #[arg(long)]
    pub runner_config: Option<PathBuf>,
}
