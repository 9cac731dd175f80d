//! The authoritative store for both profile collections.
//!
//! Every mutation goes through [`ConfigManager`]: each operation validates
//! fully before touching state, so an `Err` always leaves the manager as it
//! was. Successful mutations raise change notifications through the owned
//! [`Listeners`] registry.

mod export;
mod opnsense;
mod users;

use tracing::{debug, info, warn};

pub use export::{LegacyExport, LegacyProfileRecord, LegacyProfilesFile, LegacyUsersFile};

use crate::defaults::DEFAULT_PROFILE_NAME;
use crate::error::{EntityKind, StoreError};
use crate::events::{EventKind, Listeners};
use crate::migrate::{self, StoreDocument};
use crate::model::{OpnsenseProfile, ProfileSettings, UserProfile};
use crate::paths::StorePaths;
use crate::storage::write_json;

/// Owner of the OPNsense and user profile collections and their selections.
#[derive(Debug)]
pub struct ConfigManager {
    paths: StorePaths,
    opnsense_profiles: Vec<OpnsenseProfile>,
    user_profiles: Vec<UserProfile>,
    selected_opnsense_profile_id: Option<String>,
    selected_user_profile_id: Option<String>,
    listeners: Listeners,
}

impl ConfigManager {
    /// Empty manager bound to `paths`; nothing is read from disk.
    pub fn new(paths: StorePaths) -> Self {
        Self {
            paths,
            opnsense_profiles: Vec::new(),
            user_profiles: Vec::new(),
            selected_opnsense_profile_id: None,
            selected_user_profile_id: None,
            listeners: Listeners::new(),
        }
    }

    /// Load the store at `paths`, migrating older generations in place.
    ///
    /// Never fails: unreadable input degrades to defaults, and each
    /// collection is seeded with a `Default` profile when empty.
    pub fn load(paths: StorePaths) -> Self {
        let loaded = migrate::load_document(&paths);
        let mut manager = Self::new(paths);
        manager.install(loaded.document);

        if loaded.shape.is_migration() {
            info!(
                shape = ?loaded.shape,
                path = %manager.paths.primary.display(),
                "migrated store to current format"
            );
            if let Err(err) = manager.save() {
                warn!(error = %err, "failed to persist migrated store");
            }
        }
        manager
    }

    fn install(&mut self, document: StoreDocument) {
        self.opnsense_profiles = document.opnsense_profiles;
        self.user_profiles = document.user_profiles;

        if self.opnsense_profiles.is_empty() {
            self.opnsense_profiles.push(OpnsenseProfile::new(
                DEFAULT_PROFILE_NAME,
                ProfileSettings::default(),
            ));
        }
        if self.user_profiles.is_empty() {
            self.user_profiles
                .push(UserProfile::new(DEFAULT_PROFILE_NAME, Vec::new()));
        }

        self.selected_opnsense_profile_id =
            live_or_first(&self.opnsense_profiles, document.selected_opnsense_profile_id);
        self.selected_user_profile_id =
            live_or_first(&self.user_profiles, document.selected_user_profile_id);
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Snapshot of the current state in the primary store layout.
    pub fn to_document(&self) -> StoreDocument {
        StoreDocument {
            opnsense_profiles: self.opnsense_profiles.clone(),
            user_profiles: self.user_profiles.clone(),
            selected_opnsense_profile_id: self.selected_opnsense_profile_id.clone(),
            selected_user_profile_id: self.selected_user_profile_id.clone(),
        }
    }

    /// Write both collections and both selections to the primary store.
    pub fn save(&self) -> Result<(), StoreError> {
        write_json(&self.paths.primary, &self.to_document())?;
        info!(
            path = %self.paths.primary.display(),
            opnsense_profiles = self.opnsense_profiles.len(),
            user_profiles = self.user_profiles.len(),
            "saved store"
        );
        Ok(())
    }

    /// Register `callback` for notifications of `kind`.
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.listeners.subscribe(kind, callback);
    }

    fn notify(&mut self, kind: EventKind) {
        debug!(event = %kind, "notifying subscribers");
        self.listeners.notify(kind);
    }

    pub fn list_opnsense_profiles(&self) -> &[OpnsenseProfile] {
        &self.opnsense_profiles
    }

    pub fn list_user_profiles(&self) -> &[UserProfile] {
        &self.user_profiles
    }

    pub fn get_opnsense_profile(&self, id: &str) -> Result<&OpnsenseProfile, StoreError> {
        let index = index_of(&self.opnsense_profiles, EntityKind::OpnsenseProfile, id)?;
        Ok(&self.opnsense_profiles[index])
    }

    pub fn get_user_profile(&self, id: &str) -> Result<&UserProfile, StoreError> {
        let index = index_of(&self.user_profiles, EntityKind::UserProfile, id)?;
        Ok(&self.user_profiles[index])
    }

    pub fn selected_opnsense_profile_id(&self) -> Option<&str> {
        self.selected_opnsense_profile_id.as_deref()
    }

    pub fn selected_user_profile_id(&self) -> Option<&str> {
        self.selected_user_profile_id.as_deref()
    }

    /// The selected OPNsense profile, `None` when unset or stale.
    pub fn selected_opnsense_profile(&self) -> Option<&OpnsenseProfile> {
        let id = self.selected_opnsense_profile_id.as_deref()?;
        self.opnsense_profiles.iter().find(|p| p.id == id)
    }

    /// The selected user profile, `None` when unset or stale.
    pub fn selected_user_profile(&self) -> Option<&UserProfile> {
        let id = self.selected_user_profile_id.as_deref()?;
        self.user_profiles.iter().find(|p| p.id == id)
    }

    /// Point the OPNsense selection at `id`, or clear it with `None`.
    pub fn set_selected_opnsense_profile_id(&mut self, id: Option<&str>) -> Result<(), StoreError> {
        if let Some(id) = id {
            index_of(&self.opnsense_profiles, EntityKind::OpnsenseProfile, id)?;
        }
        if self.selected_opnsense_profile_id.as_deref() == id {
            return Ok(());
        }
        self.selected_opnsense_profile_id = id.map(str::to_string);
        self.notify(EventKind::SelectionChanged);
        Ok(())
    }

    /// Point the user-profile selection at `id`, or clear it with `None`.
    pub fn set_selected_user_profile_id(&mut self, id: Option<&str>) -> Result<(), StoreError> {
        if let Some(id) = id {
            index_of(&self.user_profiles, EntityKind::UserProfile, id)?;
        }
        if self.selected_user_profile_id.as_deref() == id {
            return Ok(());
        }
        self.selected_user_profile_id = id.map(str::to_string);
        self.notify(EventKind::SelectionChanged);
        Ok(())
    }
}

/// Identity shared by both profile kinds, for the checks they have in common.
trait Named {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

impl Named for OpnsenseProfile {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for UserProfile {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

fn index_of<T: Named>(items: &[T], kind: EntityKind, id: &str) -> Result<usize, StoreError> {
    items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| StoreError::not_found(kind, id))
}

fn live_or_first<T: Named>(items: &[T], wanted: Option<String>) -> Option<String> {
    wanted
        .filter(|id| items.iter().any(|item| item.id() == id))
        .or_else(|| items.first().map(|item| item.id().to_string()))
}

/// Reject `name` when another profile (other than `exclude_id`) uses it,
/// ignoring case.
fn ensure_unique_name<T: Named>(
    items: &[T],
    kind: EntityKind,
    name: &str,
    exclude_id: Option<&str>,
) -> Result<(), StoreError> {
    let wanted = name.to_lowercase();
    let clash = items
        .iter()
        .filter(|item| Some(item.id()) != exclude_id)
        .any(|item| item.name().to_lowercase() == wanted);
    if clash {
        return Err(StoreError::NameConflict {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Trimmed name for a new profile; blank input means `Default`.
fn name_or_default(name: &str) -> String {
    match name.trim() {
        "" => DEFAULT_PROFILE_NAME.to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Trimmed name for a rename; blank input is rejected.
fn required_name(name: &str) -> Result<String, StoreError> {
    match name.trim() {
        "" => Err(StoreError::validation("name", "profile name must not be empty")),
        trimmed => Ok(trimmed.to_string()),
    }
}

fn taken_names<T: Named>(items: &[T]) -> impl Iterator<Item = &str> {
    items.iter().map(Named::name)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::ConfigManager;
    use crate::events::EventKind;
    use crate::paths::StorePaths;

    pub(super) fn scratch() -> (tempfile::TempDir, ConfigManager) {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = ConfigManager::load(StorePaths::in_dir(dir.path()));
        (dir, manager)
    }

    pub(super) fn record_events(manager: &mut ConfigManager) -> Rc<RefCell<Vec<EventKind>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in EventKind::ALL {
            let log = Rc::clone(&log);
            manager.subscribe(kind, move || log.borrow_mut().push(kind));
        }
        log
    }

    #[test]
    fn empty_directory_seeds_default_profiles_and_selects_them() {
        let (_dir, manager) = scratch();
        assert_eq!(manager.list_opnsense_profiles().len(), 1);
        assert_eq!(manager.list_user_profiles().len(), 1);
        assert_eq!(manager.list_opnsense_profiles()[0].name, "Default");
        assert_eq!(
            manager.selected_opnsense_profile().map(|p| p.id.as_str()),
            Some(manager.list_opnsense_profiles()[0].id.as_str())
        );
        assert!(manager.selected_user_profile().is_some());
        assert!(manager.paths().primary.exists());
    }

    #[test]
    fn selecting_the_current_value_is_silent() {
        let (_dir, mut manager) = scratch();
        let events = record_events(&mut manager);
        let id = manager.list_user_profiles()[0].id.clone();

        manager.set_selected_user_profile_id(Some(&id)).expect("select");
        assert!(events.borrow().is_empty());

        manager.set_selected_user_profile_id(None).expect("clear");
        assert_eq!(*events.borrow(), vec![EventKind::SelectionChanged]);
        assert!(manager.selected_user_profile().is_none());
    }

    #[test]
    fn selecting_unknown_id_fails_without_change() {
        let (_dir, mut manager) = scratch();
        let before = manager.selected_opnsense_profile_id().map(str::to_string);
        assert!(manager.set_selected_opnsense_profile_id(Some("missing")).is_err());
        assert_eq!(manager.selected_opnsense_profile_id().map(str::to_string), before);
    }
}
