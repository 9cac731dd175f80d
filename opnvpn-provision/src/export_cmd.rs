use anyhow::{Context, Result};
use opnvpn_provision::refs;
use opnvpn_provision::report::render_export;
use vpn_profile_core::ConfigManager;

use crate::cli::ExportArgs;

pub fn run_export(args: ExportArgs, manager: &ConfigManager) -> Result<()> {
    let opnsense = refs::optional(args.opnsense.as_deref(), |r| refs::opnsense_profile_id(manager, r))?;
    let users = refs::optional(args.users.as_deref(), |r| refs::user_profile_id(manager, r))?;

    manager.save().context("failed to save store")?;
    let export = manager
        .export_legacy_files(opnsense.as_deref(), users.as_deref(), args.user.as_deref())
        .context("export failed")?;
    println!("{}", render_export(&export, manager.paths()));
    Ok(())
}
