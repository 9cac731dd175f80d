use serde::{Deserialize, Serialize};

use crate::defaults::DEFAULT_PROFILE_NAME;
use crate::lenient;

use super::{new_id, User};

/// A named, ordered list of VPN accounts, reusable across firewalls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UserProfileRecord")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub users: Vec<User>,
}

impl UserProfile {
    /// New profile with a fresh id.
    pub fn new(name: impl Into<String>, users: Vec<User>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            users,
        }
    }

    /// Independent copy, optionally under a new identity and name.
    pub fn clone_with(&self, id: Option<String>, name: Option<String>) -> Self {
        Self {
            id: id.unwrap_or_else(|| self.id.clone()),
            name: name.unwrap_or_else(|| self.name.clone()),
            users: self.users.clone(),
        }
    }

    /// Case-insensitive lookup.
    pub fn find_user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.matches(username))
    }

    pub(crate) fn position_of(&self, username: &str) -> Option<usize> {
        self.users.iter().position(|user| user.matches(username))
    }
}

#[derive(Deserialize)]
struct UserProfileRecord {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::lossy_vec")]
    users: Vec<User>,
}

impl From<UserProfileRecord> for UserProfile {
    fn from(record: UserProfileRecord) -> Self {
        Self {
            id: record.id.filter(|id| !id.is_empty()).unwrap_or_else(new_id),
            name: record
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string()),
            users: record.users,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{User, UserProfile};

    #[test]
    fn decodes_with_defaults() {
        let profile: UserProfile =
            serde_json::from_value(json!({"name": "", "users": null})).expect("decode");
        assert_eq!(profile.name, "Default");
        assert!(profile.users.is_empty());
        assert!(!profile.id.is_empty());
    }

    #[test]
    fn find_user_ignores_case() {
        let profile = UserProfile::new("Staff", vec![User::new("Alice", "", "", "")]);
        assert!(profile.find_user("alice").is_some());
        assert_eq!(profile.position_of("ALICE"), Some(0));
        assert!(profile.find_user("bob").is_none());
    }

    #[test]
    fn clone_with_copies_users_independently() {
        let source = UserProfile::new("Staff", vec![User::new("alice", "pw", "", "")]);
        let mut copy = source.clone_with(Some("x".to_string()), None);
        copy.users[0].password = "changed".to_string();
        assert_eq!(source.users[0].password, "pw");
        assert_eq!(copy.name, "Staff");
    }
}
