use anyhow::{bail, Context, Result};
use opnvpn_provision::persist::{persist_and_export, ExportMode, ExportTargets};
use opnvpn_provision::refs;
use opnvpn_provision::report::render_users;
use vpn_profile_core::{make_unique_username, ConfigManager, User, UserUpdate};

use crate::cli::{AddUserArgs, OutputFormat, ProfileRef, UpdateUserArgs, UsersCommand};

pub fn run_users(cmd: UsersCommand, manager: &mut ConfigManager) -> Result<()> {
    match cmd {
        UsersCommand::List { target, format } => {
            let id = target_profile(manager, &target)?;
            let profile = manager.get_user_profile(&id)?;
            match format {
                OutputFormat::Text => println!("{}", render_users(profile)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profile.users)?),
            }
            return Ok(());
        }
        UsersCommand::Add(args) => add(args, manager)?,
        UsersCommand::Update(args) => update(args, manager)?,
        UsersCommand::Delete { target, username } => {
            let id = target_profile(manager, &target)?;
            manager.delete_user(&id, &username)?;
            println!("deleted user '{}'", username.trim());
        }
        UsersCommand::Duplicate {
            target,
            username,
            new_username,
        } => {
            let id = target_profile(manager, &target)?;
            let copy = manager.duplicate_user(&id, &username, new_username.as_deref())?;
            println!("added user '{}'", copy.username);
        }
    }

    persist_and_export(manager, ExportTargets::default(), ExportMode::BestEffort)
        .context("failed to save store")?;
    Ok(())
}

fn target_profile(manager: &ConfigManager, target: &ProfileRef) -> Result<String> {
    if let Some(reference) = target.profile.as_deref() {
        return Ok(refs::user_profile_id(manager, reference)?);
    }
    match manager.resolve_user_profile(None)? {
        Some(profile) => Ok(profile.id.clone()),
        None => bail!("no user profiles exist"),
    }
}

fn add(args: AddUserArgs, manager: &mut ConfigManager) -> Result<()> {
    let id = target_profile(manager, &args.target)?;
    let template = User::template();
    let username = match args.username {
        Some(username) => username,
        None => {
            let profile = manager.get_user_profile(&id)?;
            make_unique_username(
                &template.username,
                profile.users.iter().map(|u| u.username.as_str()),
            )
        }
    };

    let user = User {
        username,
        password: args.password.unwrap_or(template.password),
        full_name: args.full_name.unwrap_or(template.full_name),
        email: args.email.unwrap_or(template.email),
    };
    let added = manager.add_user(&id, user)?;
    println!("added user '{}'", added.username);
    Ok(())
}

fn update(args: UpdateUserArgs, manager: &mut ConfigManager) -> Result<()> {
    let id = target_profile(manager, &args.target)?;
    let profile = manager.get_user_profile(&id)?;
    let Some(current) = profile.find_user(args.username.trim()) else {
        bail!(
            "user '{}' was not found in profile '{}'",
            args.username.trim(),
            profile.name
        );
    };

    let user = User {
        username: args.rename.unwrap_or_else(|| current.username.clone()),
        password: args.password.unwrap_or_else(|| current.password.clone()),
        full_name: args.full_name.unwrap_or_else(|| current.full_name.clone()),
        email: args.email.unwrap_or_else(|| current.email.clone()),
    };
    let username = user.username.trim().to_string();
    manager.update_user(&id, UserUpdate::renaming(args.username, user))?;
    println!("updated user '{username}'");
    Ok(())
}
