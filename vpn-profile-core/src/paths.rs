use std::path::{Path, PathBuf};

/// Primary store written by the editor.
pub const PRIMARY_FILE: &str = "config.gui.json";
/// Connection records of every OPNsense profile, read by the scripts.
pub const LEGACY_PROFILES_FILE: &str = "config.profiles.json";
/// Automation settings of the target OPNsense profile, read by the scripts.
pub const LEGACY_SETTINGS_FILE: &str = "config.settings.json";
/// Users of the target user profile, read by the scripts.
pub const LEGACY_USERS_FILE: &str = "config.users.json";

/// Locations of the primary store and the three legacy files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub primary: PathBuf,
    pub legacy_profiles: PathBuf,
    pub legacy_settings: PathBuf,
    pub legacy_users: PathBuf,
}

impl StorePaths {
    /// All four files side by side in `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            primary: dir.join(PRIMARY_FILE),
            legacy_profiles: dir.join(LEGACY_PROFILES_FILE),
            legacy_settings: dir.join(LEGACY_SETTINGS_FILE),
            legacy_users: dir.join(LEGACY_USERS_FILE),
        }
    }
}
