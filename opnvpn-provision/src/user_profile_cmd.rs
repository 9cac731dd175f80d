use anyhow::{bail, Context, Result};
use opnvpn_provision::persist::{persist_and_export, ExportMode, ExportTargets};
use opnvpn_provision::refs;
use opnvpn_provision::report::{render_user_profiles, render_users};
use vpn_profile_core::{ConfigManager, User};

use crate::cli::{OutputFormat, UserProfilesCommand};

pub fn run_user_profiles(cmd: UserProfilesCommand, manager: &mut ConfigManager) -> Result<()> {
    match cmd {
        UserProfilesCommand::List(args) => {
            let profiles = manager.list_user_profiles();
            match args.format {
                OutputFormat::Text => println!(
                    "{}",
                    render_user_profiles(profiles, manager.selected_user_profile_id())
                ),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(profiles)?),
            }
            return Ok(());
        }
        UserProfilesCommand::Show(args) => {
            let id = refs::optional(args.profile.as_deref(), |r| refs::user_profile_id(manager, r))?;
            let Some(profile) = manager.resolve_user_profile(id.as_deref())? else {
                bail!("no user profiles exist");
            };
            match args.format {
                OutputFormat::Text => println!("{}", render_users(profile)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(profile)?),
            }
            return Ok(());
        }
        UserProfilesCommand::Create(args) => {
            let seed = if args.with_template_user {
                vec![User::template()]
            } else {
                Vec::new()
            };
            let profile = manager.create_user_profile(&args.name, seed)?;
            println!("created user profile '{}' ({})", profile.name, profile.id);
        }
        UserProfilesCommand::Rename(args) => {
            let id = refs::user_profile_id(manager, &args.profile)?;
            manager.rename_user_profile(&id, &args.new_name)?;
            println!("renamed user profile to '{}'", args.new_name.trim());
        }
        UserProfilesCommand::Delete(args) => {
            let id = refs::user_profile_id(manager, &args.profile)?;
            manager.delete_user_profile(&id)?;
            println!("deleted user profile {id}");
        }
        UserProfilesCommand::Duplicate(args) => {
            let id = refs::user_profile_id(manager, &args.profile)?;
            let copy = manager.duplicate_user_profile(&id, args.name.as_deref())?;
            println!("created user profile '{}' ({})", copy.name, copy.id);
        }
        UserProfilesCommand::Select(args) => {
            if args.clear {
                manager.set_selected_user_profile_id(None)?;
                println!("cleared user profile selection");
            } else {
                let Some(reference) = args.profile.as_deref() else {
                    bail!("a profile or --clear is required");
                };
                let id = refs::user_profile_id(manager, reference)?;
                manager.set_selected_user_profile_id(Some(&id))?;
                println!("selected user profile {id}");
            }
        }
    }

    persist_and_export(manager, ExportTargets::default(), ExportMode::BestEffort)
        .context("failed to save store")?;
    Ok(())
}
