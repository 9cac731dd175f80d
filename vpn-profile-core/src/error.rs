use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// Collection an entity lives in, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    OpnsenseProfile,
    UserProfile,
}

impl EntityKind {
    fn article(&self) -> &'static str {
        match self {
            EntityKind::OpnsenseProfile => "an",
            EntityKind::UserProfile => "a",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::OpnsenseProfile => write!(f, "OPNsense profile"),
            EntityKind::UserProfile => write!(f, "user profile"),
        }
    }
}

/// Errors returned by [`crate::ConfigManager`] operations.
///
/// Every variant except [`StoreError::Write`] and [`StoreError::Serialize`] is
/// raised before any state is touched.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field was empty or malformed.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },
    /// No profile with this id exists in the collection.
    #[error("{kind} '{id}' was not found")]
    NotFound { kind: EntityKind, id: String },
    /// No user with this name exists in the user profile.
    #[error("user '{username}' was not found in profile '{profile}'")]
    UserNotFound { username: String, profile: String },
    /// Another profile of the same kind already uses this name.
    #[error("{} {kind} named '{name}' already exists", .kind.article())]
    NameConflict { kind: EntityKind, name: String },
    /// Another user of the same profile already uses this username.
    #[error("user '{username}' already exists in profile '{profile}'")]
    UsernameConflict { username: String, profile: String },
    /// At least one profile of each kind must remain.
    #[error("cannot delete the last {kind}")]
    LastProfile { kind: EntityKind },
    /// Export needs at least one OPNsense profile.
    #[error("no OPNsense profiles are available to export")]
    NoOpnsenseProfiles,
    /// Writing a store or export file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    /// Encoding a store or export payload failed.
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: String,
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// True for failures writing files, as opposed to model failures.
    pub fn is_io(&self) -> bool {
        matches!(self, StoreError::Write { .. } | StoreError::Serialize { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityKind, StoreError};

    #[test]
    fn messages_name_the_collection_and_identifier() {
        let err = StoreError::not_found(EntityKind::UserProfile, "abc");
        assert_eq!(err.to_string(), "user profile 'abc' was not found");

        let err = StoreError::NameConflict {
            kind: EntityKind::OpnsenseProfile,
            name: "Office".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "an OPNsense profile named 'Office' already exists"
        );
    }

    #[test]
    fn only_write_side_failures_are_io() {
        assert!(!StoreError::NoOpnsenseProfiles.is_io());
        let err = StoreError::Write {
            path: "x".to_string(),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.is_io());
    }
}
