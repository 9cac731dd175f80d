use std::process;

use anyhow::{bail, Context, Result};
use opnvpn_provision::persist::{persist_and_export, ExportMode, ExportTargets};
use opnvpn_provision::refs;
use opnvpn_provision::report::render_run_finished;
use opnvpn_provision::runner::{spawn, Invocation, RunEvent};
use opnvpn_provision::runner_config::{runner_config_or_default, Task};
use tracing::info;
use vpn_profile_core::ConfigManager;

use crate::cli::{RunArgs, RunTask};

pub fn run_task(args: RunArgs, manager: &ConfigManager) -> Result<()> {
    let task = match args.task {
        RunTask::FullSetup => Task::FullSetup,
        RunTask::BuildOvpn => Task::BuildOvpn,
    };

    let opnsense_id =
        refs::optional(args.opnsense.as_deref(), |r| refs::opnsense_profile_id(manager, r))?;
    let users_id = refs::optional(args.users.as_deref(), |r| refs::user_profile_id(manager, r))?;
    let opnsense = manager.resolve_opnsense_profile(opnsense_id.as_deref())?;
    let user_profile = manager.resolve_user_profile(users_id.as_deref())?;

    if task.requires_users() && user_profile.map_or(true, |p| p.users.is_empty()) {
        bail!("{} needs at least one user in the user profile", task.label());
    }

    let targets = ExportTargets {
        opnsense_profile_id: Some(&opnsense.id),
        user_profile_id: user_profile.map(|p| p.id.as_str()),
        username: None,
    };
    persist_and_export(manager, targets, ExportMode::Strict)
        .context("refusing to run: saving and exporting the current profiles failed")?;

    let config = runner_config_or_default(args.runner_config.as_deref());
    let store_dir = manager
        .paths()
        .primary
        .parent()
        .map(|dir| dir.to_path_buf())
        .unwrap_or_default();
    let number = manager.opnsense_profile_number(&opnsense.id)?;
    let invocation = Invocation::for_task(&config, task, &store_dir, number, &opnsense.name)?;

    info!(task = task.label(), profile = %opnsense.name, number, "running automation script");
    println!(">>> {} for '{}'", task.label(), opnsense.name);
    let mut exit_code = None;
    for event in spawn(&invocation)? {
        match event {
            RunEvent::Line(line) => println!("{line}"),
            RunEvent::Finished { code } => exit_code = code,
        }
    }

    println!("{}", render_run_finished(task, exit_code));
    match exit_code {
        Some(0) => Ok(()),
        Some(code) => process::exit(code),
        None => process::exit(1),
    }
}
