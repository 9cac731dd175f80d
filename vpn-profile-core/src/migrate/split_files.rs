//! Oldest generation: only the three script files exist.
//!
//! Automation settings and users were global back then, so every legacy
//! connection record receives its own copy of both.

use serde_json::Value;
use tracing::info;

use crate::defaults::DEFAULT_PROFILE_NAME;
use crate::lenient::{from_value_or_default, non_empty_text, vec_from_value};
use crate::model::{
    AutomationSettings, ConnectionSettings, OpnsenseProfile, ProfileSettings, User, UserProfile,
};
use crate::paths::StorePaths;
use crate::storage::read_json;

use super::{StoreDocument, TakenNames};

pub(super) fn load(paths: &StorePaths) -> StoreDocument {
    let records: Vec<Value> = read_json(&paths.legacy_profiles)
        .and_then(|root| root.get("profiles").and_then(Value::as_array).cloned())
        .unwrap_or_default();

    let automation: AutomationSettings = match read_json(&paths.legacy_settings) {
        Some(value @ Value::Object(_)) => from_value_or_default(Some(&value)),
        _ => AutomationSettings::default(),
    };

    let users: Vec<User> = read_json(&paths.legacy_users)
        .map(|root| vec_from_value(root.get("users")))
        .unwrap_or_default();

    let mut connections: Vec<(String, ConnectionSettings)> = records
        .iter()
        .map(|record| {
            let name = non_empty_text(record.get("ProfileName"))
                .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string());
            (name, from_value_or_default(Some(record)))
        })
        .collect();
    if connections.is_empty() {
        connections.push((DEFAULT_PROFILE_NAME.to_string(), ConnectionSettings::default()));
    }

    info!(
        profiles = connections.len(),
        users = users.len(),
        "importing legacy split files"
    );

    let mut document = StoreDocument::default();
    let mut taken_opnsense = TakenNames::default();
    let mut taken_users = TakenNames::default();
    for (name, connection) in connections {
        document.opnsense_profiles.push(OpnsenseProfile::new(
            taken_opnsense.claim(&name),
            ProfileSettings {
                connection,
                automation: automation.clone(),
            },
        ));
        document
            .user_profiles
            .push(UserProfile::new(taken_users.claim(&name), users.clone()));
    }

    document.selected_opnsense_profile_id =
        document.opnsense_profiles.first().map(|p| p.id.clone());
    document.selected_user_profile_id = document.user_profiles.first().map(|p| p.id.clone());
    document
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::load;
    use crate::model::AutomationSettings;
    use crate::paths::StorePaths;

    #[test]
    fn nothing_on_disk_yields_one_default_pair() {
        let dir = tempfile::tempdir().expect("tempdir");
        let doc = load(&StorePaths::in_dir(dir.path()));
        assert_eq!(doc.opnsense_profiles.len(), 1);
        assert_eq!(doc.opnsense_profiles[0].name, "Default");
        assert_eq!(doc.opnsense_profiles[0].settings.automation, AutomationSettings::default());
        assert!(doc.user_profiles[0].users.is_empty());
    }

    #[test]
    fn malformed_settings_file_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = StorePaths::in_dir(dir.path());
        fs::write(&paths.legacy_settings, "{{{").expect("write");
        fs::write(
            &paths.legacy_profiles,
            r#"{"profiles": [{"ProfileName": "Lab", "SshHost": "lab.local"}]}"#,
        )
        .expect("write");

        let doc = load(&paths);
        assert_eq!(doc.opnsense_profiles[0].name, "Lab");
        assert_eq!(doc.opnsense_profiles[0].settings.connection.ssh_host, "lab.local");
        assert_eq!(doc.opnsense_profiles[0].settings.automation, AutomationSettings::default());
    }
}
