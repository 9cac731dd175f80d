use tracing::debug;

use crate::error::{EntityKind, StoreError};
use crate::events::EventKind;
use crate::model::{new_id, AutomationSettings, ConnectionUpdate, OpnsenseProfile, ProfileSettings};
use crate::naming::make_unique_name;

use super::{ensure_unique_name, index_of, name_or_default, required_name, taken_names, ConfigManager};

const KIND: EntityKind = EntityKind::OpnsenseProfile;

impl ConfigManager {
    /// Append a new OPNsense profile and return a copy of it.
    ///
    /// A blank name becomes `Default`; `None` settings start from the
    /// defaults. The profile becomes selected when nothing was.
    pub fn create_opnsense_profile(
        &mut self,
        name: &str,
        settings: Option<ProfileSettings>,
    ) -> Result<OpnsenseProfile, StoreError> {
        let name = name_or_default(name);
        ensure_unique_name(&self.opnsense_profiles, KIND, &name, None)?;

        let profile = OpnsenseProfile::new(name, settings.unwrap_or_default());
        debug!(id = %profile.id, name = %profile.name, "created OPNsense profile");
        self.opnsense_profiles.push(profile.clone());

        if self.selected_opnsense_profile_id.is_none() {
            self.selected_opnsense_profile_id = Some(profile.id.clone());
            self.notify(EventKind::SelectionChanged);
        }
        self.notify(EventKind::OpnsenseProfilesChanged);
        Ok(profile)
    }

    pub fn rename_opnsense_profile(&mut self, id: &str, new_name: &str) -> Result<(), StoreError> {
        let index = index_of(&self.opnsense_profiles, KIND, id)?;
        let name = required_name(new_name)?;
        ensure_unique_name(&self.opnsense_profiles, KIND, &name, Some(id))?;

        self.opnsense_profiles[index].name = name;
        self.notify(EventKind::OpnsenseProfilesChanged);
        Ok(())
    }

    /// Remove a profile. The last remaining one cannot be deleted.
    pub fn delete_opnsense_profile(&mut self, id: &str) -> Result<(), StoreError> {
        if self.opnsense_profiles.len() <= 1 {
            return Err(StoreError::LastProfile { kind: KIND });
        }
        let index = index_of(&self.opnsense_profiles, KIND, id)?;

        let removed = self.opnsense_profiles.remove(index);
        debug!(id = %removed.id, name = %removed.name, "deleted OPNsense profile");
        let was_selected = self.selected_opnsense_profile_id.as_deref() == Some(id);
        if was_selected {
            self.selected_opnsense_profile_id = self.opnsense_profiles.first().map(|p| p.id.clone());
        }

        self.notify(EventKind::OpnsenseProfilesChanged);
        if was_selected {
            self.notify(EventKind::SelectionChanged);
        }
        Ok(())
    }

    /// Deep copy `source_id` under a fresh id and a unique name, then select it.
    pub fn duplicate_opnsense_profile(
        &mut self,
        source_id: &str,
        new_name: Option<&str>,
    ) -> Result<OpnsenseProfile, StoreError> {
        let source = self.get_opnsense_profile(source_id)?;
        let base = new_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&source.name);
        let name = make_unique_name(base, taken_names(&self.opnsense_profiles));
        let clone = source.clone_with(Some(new_id()), Some(name));

        debug!(source = %source_id, id = %clone.id, name = %clone.name, "duplicated OPNsense profile");
        self.opnsense_profiles.push(clone.clone());
        self.selected_opnsense_profile_id = Some(clone.id.clone());
        self.notify(EventKind::OpnsenseProfilesChanged);
        self.notify(EventKind::SelectionChanged);
        Ok(clone)
    }

    /// Replace the connection block; absent keys take their defaults.
    pub fn update_opnsense_connection(
        &mut self,
        id: &str,
        connection: ConnectionUpdate,
    ) -> Result<(), StoreError> {
        let index = index_of(&self.opnsense_profiles, KIND, id)?;
        self.opnsense_profiles[index].settings.connection = connection.into_settings();
        debug!(id, "updated OPNsense connection");
        Ok(())
    }

    /// Replace the automation block wholesale.
    pub fn update_opnsense_settings(
        &mut self,
        id: &str,
        automation: AutomationSettings,
    ) -> Result<(), StoreError> {
        let index = index_of(&self.opnsense_profiles, KIND, id)?;
        self.opnsense_profiles[index].settings.automation = automation;
        debug!(id, "updated OPNsense automation settings");
        Ok(())
    }
}
