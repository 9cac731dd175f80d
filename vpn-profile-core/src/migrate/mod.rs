//! Recognize older on-disk generations and convert them to the current shape.
//!
//! The primary store is matched against an ordered rule list; the first rule
//! whose recognizer accepts the top-level object decodes it. When no primary
//! store exists the three legacy script files are fanned out instead.
//!
//! | Shape | Recognized by | Result |
//! |-------|---------------|--------|
//! | current | `opnsense_profiles` and `user_profiles` | decoded as is |
//! | single-axis profiles | `profiles` | each bundle split in two |
//! | flat single profile | `settings` and `users` | one profile of each kind |
//! | legacy split files | no primary store | one pair per legacy profile |

mod profiles;
mod single;
mod split_files;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;
use crate::model::{OpnsenseProfile, UserProfile};
use crate::paths::StorePaths;
use crate::storage::read_json;

/// The current primary store layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreDocument {
    #[serde(deserialize_with = "lenient::lossy_vec")]
    pub opnsense_profiles: Vec<OpnsenseProfile>,
    #[serde(deserialize_with = "lenient::lossy_vec")]
    pub user_profiles: Vec<UserProfile>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub selected_opnsense_profile_id: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub selected_user_profile_id: Option<String>,
}

/// Which on-disk shape a load started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreShape {
    Current,
    SingleAxisProfiles,
    FlatSingleProfile,
    LegacySplitFiles,
    /// Primary store present but empty, malformed or of no known shape.
    Unrecognized,
}

impl StoreShape {
    /// Whether the loaded document must be written back in the current shape.
    pub fn is_migration(&self) -> bool {
        matches!(
            self,
            StoreShape::SingleAxisProfiles
                | StoreShape::FlatSingleProfile
                | StoreShape::LegacySplitFiles
        )
    }
}

struct Rule {
    shape: StoreShape,
    recognizes: fn(&Map<String, Value>) -> bool,
    convert: fn(&Map<String, Value>) -> StoreDocument,
}

/// Primary-store rules in precedence order.
const RULES: &[Rule] = &[
    Rule {
        shape: StoreShape::Current,
        recognizes: is_current,
        convert: decode_current,
    },
    Rule {
        shape: StoreShape::SingleAxisProfiles,
        recognizes: profiles::recognizes,
        convert: profiles::migrate,
    },
    Rule {
        shape: StoreShape::FlatSingleProfile,
        recognizes: single::recognizes,
        convert: single::migrate,
    },
];

/// Result of reading whatever is on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub document: StoreDocument,
    pub shape: StoreShape,
}

/// Read the primary store, or the legacy split files when it does not exist.
pub fn load_document(paths: &StorePaths) -> Loaded {
    if !paths.primary.exists() {
        return Loaded {
            document: split_files::load(paths),
            shape: StoreShape::LegacySplitFiles,
        };
    }

    let root = read_json(&paths.primary).unwrap_or_else(|| Value::Object(Map::new()));
    convert_primary(&root)
}

/// Apply the first matching rule to a parsed primary store.
pub fn convert_primary(root: &Value) -> Loaded {
    let unrecognized = Loaded {
        document: StoreDocument::default(),
        shape: StoreShape::Unrecognized,
    };
    let Some(map) = root.as_object() else {
        return unrecognized;
    };

    RULES
        .iter()
        .find(|rule| (rule.recognizes)(map))
        .map(|rule| Loaded {
            document: (rule.convert)(map),
            shape: rule.shape,
        })
        .unwrap_or(unrecognized)
}

fn is_current(root: &Map<String, Value>) -> bool {
    root.contains_key("opnsense_profiles") && root.contains_key("user_profiles")
}

fn decode_current(root: &Map<String, Value>) -> StoreDocument {
    lenient::from_value_or_default(Some(&Value::Object(root.clone())))
}

/// Names already assigned on one axis while splitting older records.
#[derive(Default)]
struct TakenNames(Vec<String>);

impl TakenNames {
    fn claim(&mut self, base: &str) -> String {
        let name = crate::naming::make_unique_name(base, self.0.iter().map(String::as_str));
        self.0.push(name.clone());
        name
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{convert_primary, StoreShape};

    #[test]
    fn current_shape_wins_over_older_keys() {
        let loaded = convert_primary(&json!({
            "opnsense_profiles": [{"id": "a", "name": "A"}],
            "user_profiles": [],
            "profiles": [{"name": "ignored"}]
        }));
        assert_eq!(loaded.shape, StoreShape::Current);
        assert_eq!(loaded.document.opnsense_profiles[0].id, "a");
    }

    #[test]
    fn profiles_key_selects_single_axis_rule() {
        let loaded = convert_primary(&json!({"profiles": [], "settings": {}, "users": []}));
        assert_eq!(loaded.shape, StoreShape::SingleAxisProfiles);
    }

    #[test]
    fn flat_profile_needs_both_settings_and_users() {
        assert_eq!(
            convert_primary(&json!({"settings": {}, "users": []})).shape,
            StoreShape::FlatSingleProfile
        );
        assert_eq!(
            convert_primary(&json!({"settings": {}})).shape,
            StoreShape::Unrecognized
        );
    }

    #[test]
    fn non_object_root_is_unrecognized() {
        let loaded = convert_primary(&json!([1, 2, 3]));
        assert_eq!(loaded.shape, StoreShape::Unrecognized);
        assert!(!loaded.shape.is_migration());
        assert!(loaded.document.opnsense_profiles.is_empty());
    }
}
