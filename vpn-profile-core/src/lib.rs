//! Profile store for OPNsense OpenVPN provisioning.
//!
//! Holds two independent collections: OPNsense profiles (API/SSH connection
//! details plus automation settings) and user profiles (ordered VPN account
//! lists). The [`ConfigManager`] owns both, persists them to a primary JSON
//! store, migrates older on-disk generations on load and exports the flat
//! legacy file triple consumed by the automation scripts.

pub mod defaults;
pub mod error;
pub mod events;
pub mod fields;
mod lenient;
pub mod manager;
pub mod migrate;
pub mod model;
pub mod naming;
pub mod paths;
pub mod storage;

pub use error::{EntityKind, StoreError};
pub use events::{EventKind, Listeners};
pub use manager::{ConfigManager, LegacyExport, LegacyProfileRecord, LegacyProfilesFile, LegacyUsersFile};
pub use migrate::StoreDocument;
pub use model::{
    AutomationSettings, ConnectionSettings, ConnectionUpdate, FirewallSettings, LegacyUserRecord,
    Lifetimes, NamePatterns, OpnsenseProfile, ProfileSettings, User, UserProfile, UserUpdate,
};
pub use naming::{make_unique_name, make_unique_name_with, make_unique_username};
pub use paths::StorePaths;
