//! Flat generation: one profile with global `settings` and `users` at the top.

use serde_json::{Map, Value};

use crate::defaults::DEFAULT_PROFILE_NAME;
use crate::lenient::{from_value_or_default, non_empty_text, vec_from_value};
use crate::model::{new_id, OpnsenseProfile, ProfileSettings, User, UserProfile};

use super::StoreDocument;

pub(super) fn recognizes(root: &Map<String, Value>) -> bool {
    root.contains_key("settings") && root.contains_key("users")
}

/// The flat `settings` object held automation parameters only; connection
/// details start from the defaults.
pub(super) fn migrate(root: &Map<String, Value>) -> StoreDocument {
    let name =
        non_empty_text(root.get("name")).unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string());
    let opnsense = OpnsenseProfile {
        id: non_empty_text(root.get("id")).unwrap_or_else(new_id),
        name: name.clone(),
        settings: ProfileSettings {
            connection: Default::default(),
            automation: from_value_or_default(root.get("settings")),
        },
    };
    let users: Vec<User> = vec_from_value(root.get("users"));
    let user_profile = UserProfile::new(name, users);

    StoreDocument {
        selected_opnsense_profile_id: Some(opnsense.id.clone()),
        selected_user_profile_id: Some(user_profile.id.clone()),
        opnsense_profiles: vec![opnsense],
        user_profiles: vec![user_profile],
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::migrate;
    use crate::model::ConnectionSettings;

    #[test]
    fn produces_one_profile_of_each_kind() {
        let root = json!({
            "id": "x",
            "name": "N",
            "settings": {"VpnTunnelNetwork": "10.8.0.0/24"},
            "users": [{"username": "alice", "password": "pw"}]
        });
        let doc = migrate(root.as_object().expect("object"));

        assert_eq!(doc.opnsense_profiles.len(), 1);
        assert_eq!(doc.user_profiles.len(), 1);
        let opnsense = &doc.opnsense_profiles[0];
        assert_eq!(opnsense.id, "x");
        assert_eq!(opnsense.name, "N");
        assert_eq!(opnsense.settings.automation.vpn_tunnel_network, "10.8.0.0/24");
        assert_eq!(opnsense.settings.automation.vpn_topology, "subnet");
        assert_eq!(opnsense.settings.connection, ConnectionSettings::default());
        assert_eq!(doc.user_profiles[0].name, "N");
        assert_eq!(doc.user_profiles[0].users[0].username, "alice");
        assert_eq!(doc.selected_opnsense_profile_id.as_deref(), Some("x"));
    }

    #[test]
    fn missing_identity_is_generated() {
        let root = json!({"settings": {}, "users": []});
        let doc = migrate(root.as_object().expect("object"));
        assert_eq!(doc.opnsense_profiles[0].name, "Default");
        assert_eq!(doc.opnsense_profiles[0].id.len(), 32);
    }
}
