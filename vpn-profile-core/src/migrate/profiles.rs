//! Single-axis generation: a `profiles` array of self-contained bundles,
//! each carrying its own settings and users.

use serde_json::{Map, Value};
use tracing::debug;

use crate::defaults::DEFAULT_PROFILE_NAME;
use crate::lenient::{from_value_or_default, non_empty_text, vec_from_value};
use crate::model::{new_id, OpnsenseProfile, ProfileSettings, User, UserProfile};

use super::{StoreDocument, TakenNames};

pub(super) fn recognizes(root: &Map<String, Value>) -> bool {
    root.contains_key("profiles")
}

/// Split every bundle into a same-named OPNsense profile (keeping the bundle
/// id) and a same-named user profile (fresh id).
pub(super) fn migrate(root: &Map<String, Value>) -> StoreDocument {
    let bundles: Vec<&Map<String, Value>> = root
        .get("profiles")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default();

    let mut document = StoreDocument::default();
    let mut taken_opnsense = TakenNames::default();
    let mut taken_users = TakenNames::default();
    let mut kept_ids = Vec::new();

    for bundle in bundles {
        let name = non_empty_text(bundle.get("name"))
            .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string());
        let settings = bundle.get("settings").and_then(Value::as_object);
        let legacy_id = non_empty_text(bundle.get("id"));

        let opnsense = OpnsenseProfile {
            id: legacy_id.clone().unwrap_or_else(new_id),
            name: taken_opnsense.claim(&name),
            settings: ProfileSettings {
                connection: from_value_or_default(settings.and_then(|s| s.get("connection"))),
                automation: from_value_or_default(settings.and_then(|s| s.get("automation"))),
            },
        };
        let users: Vec<User> = vec_from_value(bundle.get("users"));
        let user_profile = UserProfile::new(taken_users.claim(&name), users);

        debug!(profile = %opnsense.name, users = user_profile.users.len(), "split bundled profile");
        if let Some(legacy_id) = legacy_id {
            kept_ids.push(legacy_id);
        }
        document.opnsense_profiles.push(opnsense);
        document.user_profiles.push(user_profile);
    }

    let wanted = non_empty_text(root.get("selected_profile_id"))
        .or_else(|| non_empty_text(root.get("active_profile_id")));
    document.selected_opnsense_profile_id = wanted
        .filter(|id| kept_ids.contains(id))
        .or_else(|| document.opnsense_profiles.first().map(|p| p.id.clone()));
    document.selected_user_profile_id = document.user_profiles.first().map(|p| p.id.clone());
    document
}
