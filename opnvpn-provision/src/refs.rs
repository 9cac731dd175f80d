//! Profile references given on the command line: an id, or a name matched
//! case-insensitively.

use vpn_profile_core::{ConfigManager, EntityKind, StoreError};

pub fn opnsense_profile_id(manager: &ConfigManager, reference: &str) -> Result<String, StoreError> {
    let profiles = manager.list_opnsense_profiles();
    lookup(
        profiles.iter().map(|p| (p.id.as_str(), p.name.as_str())),
        EntityKind::OpnsenseProfile,
        reference,
    )
}

pub fn user_profile_id(manager: &ConfigManager, reference: &str) -> Result<String, StoreError> {
    let profiles = manager.list_user_profiles();
    lookup(
        profiles.iter().map(|p| (p.id.as_str(), p.name.as_str())),
        EntityKind::UserProfile,
        reference,
    )
}

/// Resolve an optional reference; `None` stays `None` so the selection applies.
pub fn optional<F>(reference: Option<&str>, resolve: F) -> Result<Option<String>, StoreError>
where
    F: FnOnce(&str) -> Result<String, StoreError>,
{
    reference.map(resolve).transpose()
}

fn lookup<'a, I>(entries: I, kind: EntityKind, reference: &str) -> Result<String, StoreError>
where
    I: Iterator<Item = (&'a str, &'a str)> + Clone,
{
    let wanted = reference.trim();
    entries
        .clone()
        .find(|(id, _)| *id == wanted)
        .or_else(|| {
            let lowered = wanted.to_lowercase();
            entries
                .clone()
                .find(|(_, name)| name.to_lowercase() == lowered)
        })
        .map(|(id, _)| id.to_string())
        .ok_or_else(|| StoreError::NotFound {
            kind,
            id: wanted.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use vpn_profile_core::{ConfigManager, StoreError, StorePaths};

    use super::{opnsense_profile_id, optional, user_profile_id};

    #[test]
    fn resolves_by_id_then_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut manager = ConfigManager::load(StorePaths::in_dir(dir.path()));
        let lab = manager.create_opnsense_profile("Lab", None).expect("create");

        assert_eq!(opnsense_profile_id(&manager, &lab.id).expect("id"), lab.id);
        assert_eq!(opnsense_profile_id(&manager, " lab ").expect("name"), lab.id);
        assert!(matches!(
            user_profile_id(&manager, "Lab"),
            Err(StoreError::NotFound { .. })
        ));
        assert_eq!(
            optional(None, |r| opnsense_profile_id(&manager, r)).expect("none"),
            None
        );
    }
}
