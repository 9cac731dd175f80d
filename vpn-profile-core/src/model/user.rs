use serde::{Deserialize, Serialize};

use crate::defaults::user_template;
use crate::lenient;

/// One VPN account.
///
/// Decodes from both the store shape (`username`, `password`, `full_name`,
/// `email`) and the legacy export shape (`Name`, `Password`, `Full`, `Email`),
/// preferring the store key when a record carries both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UserRecord")]
pub struct User {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            full_name: full_name.into(),
            email: email.into(),
        }
    }

    /// Starting values for a brand-new account.
    pub fn template() -> Self {
        Self::new(
            user_template::USERNAME,
            user_template::PASSWORD,
            user_template::FULL_NAME,
            user_template::EMAIL,
        )
    }

    /// Record in the field naming the automation scripts read.
    pub fn to_legacy(&self) -> LegacyUserRecord {
        LegacyUserRecord {
            name: self.username.clone(),
            password: self.password.clone(),
            full: self.full_name.clone(),
            email: self.email.clone(),
        }
    }

    pub(crate) fn matches(&self, username: &str) -> bool {
        self.username.to_lowercase() == username.to_lowercase()
    }
}

/// A user as written to `config.users.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyUserRecord {
    pub name: String,
    pub password: String,
    pub full: String,
    pub email: String,
}

/// An edit to an existing user.
///
/// `original_username` names the account being replaced when the edit is a
/// rename; without it the account is looked up by `user.username`. It only
/// travels with the request and is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub original_username: Option<String>,
    pub user: User,
}

impl UserUpdate {
    pub fn new(user: User) -> Self {
        Self {
            original_username: None,
            user,
        }
    }

    pub fn renaming(original_username: impl Into<String>, user: User) -> Self {
        Self {
            original_username: Some(original_username.into()),
            user,
        }
    }
}

#[derive(Deserialize)]
struct UserRecord {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    username: Option<String>,
    #[serde(default, rename = "Name", deserialize_with = "lenient::opt_string")]
    legacy_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    password: Option<String>,
    #[serde(default, rename = "Password", deserialize_with = "lenient::opt_string")]
    legacy_password: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    full_name: Option<String>,
    #[serde(default, rename = "Full", deserialize_with = "lenient::opt_string")]
    legacy_full: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    email: Option<String>,
    #[serde(default, rename = "Email", deserialize_with = "lenient::opt_string")]
    legacy_email: Option<String>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            username: record.username.or(record.legacy_name).unwrap_or_default(),
            password: record.password.or(record.legacy_password).unwrap_or_default(),
            full_name: record.full_name.or(record.legacy_full).unwrap_or_default(),
            email: record.email.or(record.legacy_email).unwrap_or_default(),
        }
    }
}
