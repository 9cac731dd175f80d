use colored::Colorize;
use vpn_profile_core::fields::{get_automation_field, AUTOMATION_FIELDS};
use vpn_profile_core::{LegacyExport, OpnsenseProfile, StorePaths, UserProfile};

use crate::runner_config::Task;

const MASK: &str = "********";

/// One line per OPNsense profile, the selected one starred.
pub fn render_opnsense_profiles(profiles: &[OpnsenseProfile], selected: Option<&str>) -> String {
    profiles
        .iter()
        .map(|profile| {
            let detail = format!(
                "{}  {}",
                profile.id.dimmed(),
                profile.settings.connection.api_base_url
            );
            profile_line(&profile.name, detail, Some(profile.id.as_str()) == selected)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per user profile with its user count, the selected one starred.
pub fn render_user_profiles(profiles: &[UserProfile], selected: Option<&str>) -> String {
    profiles
        .iter()
        .map(|profile| {
            let detail = format!("{}  {} user(s)", profile.id.dimmed(), profile.users.len());
            profile_line(&profile.name, detail, Some(profile.id.as_str()) == selected)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn profile_line(name: &str, detail: String, selected: bool) -> String {
    if selected {
        format!("{} {}  {detail}", "*".green().bold(), name.bold())
    } else {
        format!("  {name}  {detail}")
    }
}

/// Connection and automation settings of one profile; secrets are masked.
pub fn render_opnsense_profile(profile: &OpnsenseProfile) -> String {
    let connection = &profile.settings.connection;
    let mut out = vec![
        format!("{} ({})", profile.name.bold(), profile.id),
        "Connection".cyan().to_string(),
        field_line("ApiBaseUrl", &connection.api_base_url),
        field_line("ApiKey", masked(&connection.api_key)),
        field_line("ApiSecret", masked(&connection.api_secret)),
        field_line("SshHost", &connection.ssh_host),
        field_line("SshUser", &connection.ssh_user),
        field_line("SshPass", masked(&connection.ssh_pass)),
        "Automation".cyan().to_string(),
    ];
    for path in AUTOMATION_FIELDS {
        if let Ok(value) = get_automation_field(&profile.settings.automation, path) {
            out.push(field_line(path, &value));
        }
    }
    for key in profile.settings.automation.extra.keys() {
        out.push(field_line(key, "(preserved)"));
    }
    out.join("\n")
}

/// Users of one profile; passwords are never shown.
pub fn render_users(profile: &UserProfile) -> String {
    if profile.users.is_empty() {
        return format!("{} has no users", profile.name.bold());
    }
    let mut out = vec![format!("{} ({})", profile.name.bold(), profile.id)];
    for user in &profile.users {
        out.push(format!(
            "  {}  {}  <{}>",
            user.username.bold(),
            user.full_name,
            user.email
        ));
    }
    out.join("\n")
}

/// Files written by an export and what went into them.
pub fn render_export(export: &LegacyExport, paths: &StorePaths) -> String {
    [
        format!(
            "{} {} profile(s) -> {}",
            "exported".green(),
            export.profiles.profiles.len(),
            paths.legacy_profiles.display()
        ),
        format!(
            "{} settings -> {}",
            "exported".green(),
            paths.legacy_settings.display()
        ),
        format!(
            "{} {} user(s) -> {}",
            "exported".green(),
            export.users.users.len(),
            paths.legacy_users.display()
        ),
    ]
    .join("\n")
}

/// Closing line of a script run.
pub fn render_run_finished(task: Task, code: Option<i32>) -> String {
    match code {
        Some(0) => format!(">>> {} completed successfully.", task.label())
            .green()
            .to_string(),
        Some(code) => format!(">>> {} failed (exit code {code}).", task.label())
            .red()
            .to_string(),
        None => format!(">>> {} failed (terminated by signal).", task.label())
            .red()
            .to_string(),
    }
}

fn field_line(name: &str, value: &str) -> String {
    format!("  {name:<34} {value}")
}

fn masked(value: &str) -> &str {
    if value.is_empty() {
        value
    } else {
        MASK
    }
}

#[cfg(test)]
mod tests {
    use vpn_profile_core::{OpnsenseProfile, ProfileSettings, User, UserProfile};

    use super::{render_opnsense_profile, render_run_finished, render_users};
    use crate::runner_config::Task;

    #[test]
    fn secrets_are_masked() {
        colored::control::set_override(false);
        let mut settings = ProfileSettings::default();
        settings.connection.api_key = "key-1234".to_string();
        settings.connection.api_secret = "topsecret".to_string();
        settings.connection.ssh_pass = "rootpw".to_string();
        let text = render_opnsense_profile(&OpnsenseProfile::new("Lab", settings));

        assert!(text.contains("********"));
        assert!(!text.contains("key-1234"));
        assert!(!text.contains("topsecret"));
        assert!(!text.contains("rootpw"));
        assert!(text.contains("Lifetimes.CALifetimeDays"));
    }

    #[test]
    fn users_are_listed_without_passwords() {
        colored::control::set_override(false);
        let profile = UserProfile::new(
            "Team",
            vec![User::new("alice", "hunter2", "Alice", "alice@example.com")],
        );
        let text = render_users(&profile);
        assert!(text.contains("alice"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn run_outcome_names_the_task() {
        colored::control::set_override(false);
        assert_eq!(
            render_run_finished(Task::FullSetup, Some(0)),
            ">>> Full setup completed successfully."
        );
        assert_eq!(
            render_run_finished(Task::BuildOvpn, Some(2)),
            ">>> Build OVPN files failed (exit code 2)."
        );
    }
}
