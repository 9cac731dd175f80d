use anyhow::{bail, Context, Result};
use opnvpn_provision::persist::{persist_and_export, ExportMode, ExportTargets};
use opnvpn_provision::refs;
use opnvpn_provision::report::{render_opnsense_profile, render_opnsense_profiles};
use vpn_profile_core::fields::{set_automation_field, AUTOMATION_FIELDS};
use vpn_profile_core::{ConfigManager, ConnectionUpdate};

use crate::cli::{OutputFormat, ProfilesCommand, SelectArgs, SetAutomationArgs, SetConnectionArgs};

pub fn run_profiles(cmd: ProfilesCommand, manager: &mut ConfigManager) -> Result<()> {
    match cmd {
        ProfilesCommand::List(args) => {
            let profiles = manager.list_opnsense_profiles();
            match args.format {
                OutputFormat::Text => println!(
                    "{}",
                    render_opnsense_profiles(profiles, manager.selected_opnsense_profile_id())
                ),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(profiles)?),
            }
            return Ok(());
        }
        ProfilesCommand::Show(args) => {
            let id = refs::optional(args.profile.as_deref(), |r| refs::opnsense_profile_id(manager, r))?;
            let profile = manager.resolve_opnsense_profile(id.as_deref())?;
            match args.format {
                OutputFormat::Text => println!("{}", render_opnsense_profile(profile)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(profile)?),
            }
            return Ok(());
        }
        ProfilesCommand::Fields => {
            for field in AUTOMATION_FIELDS {
                println!("{field}");
            }
            return Ok(());
        }
        ProfilesCommand::Create(args) => {
            let profile = manager.create_opnsense_profile(&args.name, None)?;
            println!("created OPNsense profile '{}' ({})", profile.name, profile.id);
        }
        ProfilesCommand::Rename(args) => {
            let id = refs::opnsense_profile_id(manager, &args.profile)?;
            manager.rename_opnsense_profile(&id, &args.new_name)?;
            println!("renamed OPNsense profile to '{}'", args.new_name.trim());
        }
        ProfilesCommand::Delete(args) => {
            let id = refs::opnsense_profile_id(manager, &args.profile)?;
            manager.delete_opnsense_profile(&id)?;
            println!("deleted OPNsense profile {id}");
        }
        ProfilesCommand::Duplicate(args) => {
            let id = refs::opnsense_profile_id(manager, &args.profile)?;
            let copy = manager.duplicate_opnsense_profile(&id, args.name.as_deref())?;
            println!("created OPNsense profile '{}' ({})", copy.name, copy.id);
        }
        ProfilesCommand::Select(args) => select(args, manager)?,
        ProfilesCommand::SetConnection(args) => set_connection(args, manager)?,
        ProfilesCommand::SetAutomation(args) => set_automation(args, manager)?,
    }

    persist_and_export(manager, ExportTargets::default(), ExportMode::BestEffort)
        .context("failed to save store")?;
    Ok(())
}

fn select(args: SelectArgs, manager: &mut ConfigManager) -> Result<()> {
    if args.clear {
        manager.set_selected_opnsense_profile_id(None)?;
        println!("cleared OPNsense profile selection");
        return Ok(());
    }
    let Some(reference) = args.profile.as_deref() else {
        bail!("a profile or --clear is required");
    };
    let id = refs::opnsense_profile_id(manager, reference)?;
    manager.set_selected_opnsense_profile_id(Some(&id))?;
    println!("selected OPNsense profile {id}");
    Ok(())
}

fn set_connection(args: SetConnectionArgs, manager: &mut ConfigManager) -> Result<()> {
    let id = refs::opnsense_profile_id(manager, &args.profile)?;
    let mut update = if args.reset_missing {
        ConnectionUpdate::default()
    } else {
        ConnectionUpdate::from(&manager.get_opnsense_profile(&id)?.settings.connection)
    };

    let overrides = [
        (&mut update.api_base_url, args.api_base_url),
        (&mut update.api_key, args.api_key),
        (&mut update.api_secret, args.api_secret),
        (&mut update.ssh_host, args.ssh_host),
        (&mut update.ssh_user, args.ssh_user),
        (&mut update.ssh_pass, args.ssh_pass),
    ];
    for (slot, value) in overrides {
        if value.is_some() {
            *slot = value;
        }
    }

    manager.update_opnsense_connection(&id, update)?;
    println!("updated connection settings of {id}");
    Ok(())
}

fn set_automation(args: SetAutomationArgs, manager: &mut ConfigManager) -> Result<()> {
    let id = refs::opnsense_profile_id(manager, &args.profile)?;
    let mut automation = manager.get_opnsense_profile(&id)?.settings.automation.clone();

    for assignment in &args.assignments {
        let Some((field, value)) = assignment.split_once('=') else {
            bail!("expected FIELD=VALUE, got '{assignment}'");
        };
        set_automation_field(&mut automation, field.trim(), value)?;
    }

    manager.update_opnsense_settings(&id, automation)?;
    println!(
        "updated {} automation field(s) of {id}",
        args.assignments.len()
    );
    Ok(())
}
