//! Legacy file triple handed to the automation scripts.
//!
//! `config.profiles.json` lists every OPNsense profile; the settings and users
//! files carry exactly one resolved profile each.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EntityKind, StoreError};
use crate::model::{AutomationSettings, ConnectionSettings, LegacyUserRecord, OpnsenseProfile, UserProfile};
use crate::storage::write_json;

use super::{index_of, ConfigManager};

/// One connection record of `config.profiles.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyProfileRecord {
    #[serde(rename = "ProfileName")]
    pub profile_name: String,
    #[serde(flatten)]
    pub connection: ConnectionSettings,
}

/// Body of `config.profiles.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyProfilesFile {
    pub profiles: Vec<LegacyProfileRecord>,
}

/// Body of `config.users.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyUsersFile {
    pub users: Vec<LegacyUserRecord>,
}

/// The three payloads of one export, as written.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyExport {
    pub profiles: LegacyProfilesFile,
    pub settings: AutomationSettings,
    pub users: LegacyUsersFile,
}

impl ConfigManager {
    /// OPNsense profile an operation targets: `id` when given, else the
    /// selection, else the first profile.
    pub fn resolve_opnsense_profile(&self, id: Option<&str>) -> Result<&OpnsenseProfile, StoreError> {
        if let Some(id) = id {
            return self.get_opnsense_profile(id);
        }
        self.selected_opnsense_profile()
            .or_else(|| self.opnsense_profiles.first())
            .ok_or(StoreError::NoOpnsenseProfiles)
    }

    /// User profile an operation targets, resolved like
    /// [`resolve_opnsense_profile`](Self::resolve_opnsense_profile).
    /// `Ok(None)` means there are no user profiles at all.
    pub fn resolve_user_profile(&self, id: Option<&str>) -> Result<Option<&UserProfile>, StoreError> {
        if let Some(id) = id {
            return self.get_user_profile(id).map(Some);
        }
        Ok(self
            .selected_user_profile()
            .or_else(|| self.user_profiles.first()))
    }

    /// 1-based position of an OPNsense profile, as the scripts number them.
    pub fn opnsense_profile_number(&self, id: &str) -> Result<usize, StoreError> {
        index_of(&self.opnsense_profiles, EntityKind::OpnsenseProfile, id).map(|index| index + 1)
    }

    /// Resolve every export target without writing anything.
    pub fn build_legacy_export(
        &self,
        opnsense_profile_id: Option<&str>,
        user_profile_id: Option<&str>,
        username: Option<&str>,
    ) -> Result<LegacyExport, StoreError> {
        let profiles = LegacyProfilesFile {
            profiles: self
                .opnsense_profiles
                .iter()
                .map(|profile| LegacyProfileRecord {
                    profile_name: profile.name.clone(),
                    connection: profile.settings.connection.clone(),
                })
                .collect(),
        };

        let settings = self
            .resolve_opnsense_profile(opnsense_profile_id)?
            .settings
            .automation
            .clone();

        let users = match self.resolve_user_profile(user_profile_id)? {
            None => Vec::new(),
            Some(profile) => match username {
                Some(username) => {
                    let user = profile.find_user(username.trim()).ok_or_else(|| {
                        StoreError::UserNotFound {
                            username: username.trim().to_string(),
                            profile: profile.name.clone(),
                        }
                    })?;
                    vec![user.to_legacy()]
                }
                None => profile.users.iter().map(|user| user.to_legacy()).collect(),
            },
        };

        Ok(LegacyExport {
            profiles,
            settings,
            users: LegacyUsersFile { users },
        })
    }

    /// Write `config.profiles.json`, `config.settings.json` and
    /// `config.users.json`. Nothing is written when a target fails to resolve.
    pub fn export_legacy_files(
        &self,
        opnsense_profile_id: Option<&str>,
        user_profile_id: Option<&str>,
        username: Option<&str>,
    ) -> Result<LegacyExport, StoreError> {
        let export = self.build_legacy_export(opnsense_profile_id, user_profile_id, username)?;

        write_json(&self.paths.legacy_profiles, &export.profiles)?;
        write_json(&self.paths.legacy_settings, &export.settings)?;
        write_json(&self.paths.legacy_users, &export.users)?;
        info!(
            profiles = export.profiles.profiles.len(),
            users = export.users.users.len(),
            "exported legacy files"
        );
        Ok(export)
    }
}
