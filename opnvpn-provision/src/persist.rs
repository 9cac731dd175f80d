use tracing::warn;
use vpn_profile_core::{ConfigManager, LegacyExport, StoreError};

/// How export failures are treated by [`persist_and_export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// Log and ignore export failures; used after routine edits.
    BestEffort,
    /// Propagate export failures; used right before the scripts run.
    Strict,
}

/// Target selection for the legacy export.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportTargets<'a> {
    pub opnsense_profile_id: Option<&'a str>,
    pub user_profile_id: Option<&'a str>,
    pub username: Option<&'a str>,
}

/// Save the primary store, then refresh the legacy files.
///
/// A failed save is always returned. In [`ExportMode::BestEffort`] a failed
/// export is logged and `Ok(None)` is returned instead.
pub fn persist_and_export(
    manager: &ConfigManager,
    targets: ExportTargets<'_>,
    mode: ExportMode,
) -> Result<Option<LegacyExport>, StoreError> {
    manager.save()?;
    match manager.export_legacy_files(
        targets.opnsense_profile_id,
        targets.user_profile_id,
        targets.username,
    ) {
        Ok(export) => Ok(Some(export)),
        Err(err) if mode == ExportMode::BestEffort => {
            warn!(error = %err, "legacy export skipped");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
