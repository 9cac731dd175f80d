//! Entities held by the store: OPNsense profiles, user profiles and users.
//!
//! Every entity decodes from partial or older JSON and comes out complete:
//! missing keys are filled from [`crate::defaults`], recursively.

mod opnsense;
mod user;
mod user_profile;

pub use opnsense::{
    AutomationSettings, ConnectionSettings, ConnectionUpdate, FirewallSettings, Lifetimes,
    NamePatterns, OpnsenseProfile, ProfileSettings,
};
pub use user::{LegacyUserRecord, User, UserUpdate};
pub use user_profile::UserProfile;

use uuid::Uuid;

/// Fresh opaque identifier (32 lowercase hex digits).
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::new_id;

    #[test]
    fn ids_are_unique_hex() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
