use tracing::debug;

use crate::error::{EntityKind, StoreError};
use crate::events::EventKind;
use crate::model::{new_id, User, UserProfile, UserUpdate};
use crate::naming::{make_unique_name, make_unique_username};

use super::{ensure_unique_name, index_of, name_or_default, required_name, taken_names, ConfigManager};

const KIND: EntityKind = EntityKind::UserProfile;

impl ConfigManager {
    /// Append a new user profile seeded with `users` and return a copy of it.
    ///
    /// Seed usernames are trimmed and must be non-empty and unique
    /// (case-insensitively), as with [`add_user`](Self::add_user).
    pub fn create_user_profile(
        &mut self,
        name: &str,
        users: Vec<User>,
    ) -> Result<UserProfile, StoreError> {
        let name = name_or_default(name);
        ensure_unique_name(&self.user_profiles, KIND, &name, None)?;

        let mut profile = UserProfile::new(name, Vec::with_capacity(users.len()));
        for mut user in users {
            user.username = required_username(&user.username)?;
            if profile.find_user(&user.username).is_some() {
                return Err(username_conflict(&user.username, &profile));
            }
            profile.users.push(user);
        }
        debug!(id = %profile.id, name = %profile.name, "created user profile");
        self.user_profiles.push(profile.clone());

        if self.selected_user_profile_id.is_none() {
            self.selected_user_profile_id = Some(profile.id.clone());
            self.notify(EventKind::SelectionChanged);
        }
        self.notify(EventKind::UserProfilesChanged);
        Ok(profile)
    }

    pub fn rename_user_profile(&mut self, id: &str, new_name: &str) -> Result<(), StoreError> {
        let index = index_of(&self.user_profiles, KIND, id)?;
        let name = required_name(new_name)?;
        ensure_unique_name(&self.user_profiles, KIND, &name, Some(id))?;

        self.user_profiles[index].name = name;
        self.notify(EventKind::UserProfilesChanged);
        Ok(())
    }

    /// Remove a user profile. The last remaining one cannot be deleted.
    pub fn delete_user_profile(&mut self, id: &str) -> Result<(), StoreError> {
        if self.user_profiles.len() <= 1 {
            return Err(StoreError::LastProfile { kind: KIND });
        }
        let index = index_of(&self.user_profiles, KIND, id)?;

        let removed = self.user_profiles.remove(index);
        debug!(id = %removed.id, name = %removed.name, "deleted user profile");
        let was_selected = self.selected_user_profile_id.as_deref() == Some(id);
        if was_selected {
            self.selected_user_profile_id = self.user_profiles.first().map(|p| p.id.clone());
        }

        self.notify(EventKind::UserProfilesChanged);
        if was_selected {
            self.notify(EventKind::SelectionChanged);
        }
        Ok(())
    }

    /// Copy `source_id` with its own user list under a unique name, then select it.
    pub fn duplicate_user_profile(
        &mut self,
        source_id: &str,
        new_name: Option<&str>,
    ) -> Result<UserProfile, StoreError> {
        let source = self.get_user_profile(source_id)?;
        let base = new_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&source.name);
        let name = make_unique_name(base, taken_names(&self.user_profiles));
        let clone = source.clone_with(Some(new_id()), Some(name));

        debug!(source = %source_id, id = %clone.id, name = %clone.name, "duplicated user profile");
        self.user_profiles.push(clone.clone());
        self.selected_user_profile_id = Some(clone.id.clone());
        self.notify(EventKind::UserProfilesChanged);
        self.notify(EventKind::SelectionChanged);
        self.notify(EventKind::UserListChanged);
        Ok(clone)
    }

    /// Append `user` with its username trimmed.
    pub fn add_user(&mut self, profile_id: &str, user: User) -> Result<User, StoreError> {
        let index = index_of(&self.user_profiles, KIND, profile_id)?;
        let username = required_username(&user.username)?;
        let profile = &self.user_profiles[index];
        if profile.find_user(&username).is_some() {
            return Err(username_conflict(&username, profile));
        }

        let user = User { username, ..user };
        debug!(profile = %profile_id, username = %user.username, "added user");
        self.user_profiles[index].users.push(user.clone());
        self.notify(EventKind::UserListChanged);
        Ok(user)
    }

    /// Replace a user in place, renaming it when `original_username` is set.
    pub fn update_user(&mut self, profile_id: &str, update: UserUpdate) -> Result<(), StoreError> {
        let index = index_of(&self.user_profiles, KIND, profile_id)?;
        let UserUpdate {
            original_username,
            user,
        } = update;

        let original = original_username
            .as_deref()
            .unwrap_or(&user.username)
            .trim()
            .to_string();
        if original.is_empty() {
            return Err(StoreError::validation("username", "username must not be empty"));
        }
        let username = required_username(&user.username)?;

        let profile = &self.user_profiles[index];
        let position = profile
            .position_of(&original)
            .ok_or_else(|| user_not_found(&original, profile))?;
        if username.to_lowercase() != original.to_lowercase() {
            let clash = profile
                .users
                .iter()
                .enumerate()
                .any(|(i, other)| i != position && other.matches(&username));
            if clash {
                return Err(username_conflict(&username, profile));
            }
        }

        debug!(profile = %profile_id, from = %original, to = %username, "updated user");
        self.user_profiles[index].users[position] = User { username, ..user };
        self.notify(EventKind::UserListChanged);
        Ok(())
    }

    pub fn delete_user(&mut self, profile_id: &str, username: &str) -> Result<(), StoreError> {
        let index = index_of(&self.user_profiles, KIND, profile_id)?;
        let profile = &self.user_profiles[index];
        let position = profile
            .position_of(username.trim())
            .ok_or_else(|| user_not_found(username, profile))?;

        let removed = self.user_profiles[index].users.remove(position);
        debug!(profile = %profile_id, username = %removed.username, "deleted user");
        self.notify(EventKind::UserListChanged);
        Ok(())
    }

    /// Append a copy of `username` under a unique username and return it.
    pub fn duplicate_user(
        &mut self,
        profile_id: &str,
        username: &str,
        new_username: Option<&str>,
    ) -> Result<User, StoreError> {
        let index = index_of(&self.user_profiles, KIND, profile_id)?;
        let profile = &self.user_profiles[index];
        let source = profile
            .find_user(username.trim())
            .ok_or_else(|| user_not_found(username, profile))?;

        let base = new_username
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&source.username);
        let unique = make_unique_username(base, profile.users.iter().map(|u| u.username.as_str()));
        let clone = User {
            username: unique,
            ..source.clone()
        };

        debug!(profile = %profile_id, source = %source.username, username = %clone.username, "duplicated user");
        self.user_profiles[index].users.push(clone.clone());
        self.notify(EventKind::UserListChanged);
        Ok(clone)
    }
}

fn required_username(username: &str) -> Result<String, StoreError> {
    match username.trim() {
        "" => Err(StoreError::validation("username", "username must not be empty")),
        trimmed => Ok(trimmed.to_string()),
    }
}

fn user_not_found(username: &str, profile: &UserProfile) -> StoreError {
    StoreError::UserNotFound {
        username: username.trim().to_string(),
        profile: profile.name.clone(),
    }
}

fn username_conflict(username: &str, profile: &UserProfile) -> StoreError {
    StoreError::UsernameConflict {
        username: username.to_string(),
        profile: profile.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::super::tests::{record_events, scratch};
    use crate::error::StoreError;
    use crate::events::EventKind;
    use crate::model::{User, UserUpdate};

    fn user(name: &str) -> User {
        User::new(name, "pw", format!("{name} full"), format!("{name}@example.com"))
    }

    fn usernames(manager: &crate::ConfigManager, id: &str) -> Vec<String> {
        manager
            .get_user_profile(id)
            .expect("profile")
            .users
            .iter()
            .map(|u| u.username.clone())
            .collect()
    }

    #[test]
    fn add_trims_and_rejects_case_insensitive_duplicates() {
        let (_dir, mut manager) = scratch();
        let id = manager.list_user_profiles()[0].id.clone();
        let events = record_events(&mut manager);

        let added = manager.add_user(&id, user("  alice ")).expect("add");
        assert_eq!(added.username, "alice");
        assert!(matches!(
            manager.add_user(&id, user("ALICE")),
            Err(StoreError::UsernameConflict { .. })
        ));
        assert!(matches!(
            manager.add_user(&id, user("   ")),
            Err(StoreError::Validation { .. })
        ));
        assert_eq!(usernames(&manager, &id), vec!["alice"]);
        assert_eq!(*events.borrow(), vec![EventKind::UserListChanged]);
    }

    #[test]
    fn create_checks_seed_users_like_add() {
        let (_dir, mut manager) = scratch();
        let events = record_events(&mut manager);

        assert!(matches!(
            manager.create_user_profile("Team", vec![user("alice"), user(" ")]),
            Err(StoreError::Validation { .. })
        ));
        assert!(matches!(
            manager.create_user_profile("Team", vec![user("alice"), user("ALICE ")]),
            Err(StoreError::UsernameConflict { .. })
        ));
        assert_eq!(manager.list_user_profiles().len(), 1);
        assert!(events.borrow().is_empty());

        let created = manager
            .create_user_profile("Team", vec![user(" alice "), user("bob")])
            .expect("create");
        assert_eq!(usernames(&manager, &created.id), vec!["alice", "bob"]);
    }

    #[test]
    fn rename_collision_leaves_user_in_place() {
        let (_dir, mut manager) = scratch();
        let id = manager.list_user_profiles()[0].id.clone();
        for name in ["alice", "bob", "carol"] {
            manager.add_user(&id, user(name)).expect("add");
        }

        let err = manager
            .update_user(&id, UserUpdate::renaming("bob", user("Carol")))
            .expect_err("clash");
        assert!(matches!(err, StoreError::UsernameConflict { .. }));
        assert_eq!(usernames(&manager, &id), vec!["alice", "bob", "carol"]);
        assert_eq!(
            manager.get_user_profile(&id).expect("profile").users[1].password,
            "pw"
        );
    }

    #[test]
    fn update_replaces_in_position() {
        let (_dir, mut manager) = scratch();
        let id = manager.list_user_profiles()[0].id.clone();
        for name in ["alice", "bob", "carol"] {
            manager.add_user(&id, user(name)).expect("add");
        }

        manager
            .update_user(&id, UserUpdate::renaming("BOB", user("robert")))
            .expect("rename");
        assert_eq!(usernames(&manager, &id), vec!["alice", "robert", "carol"]);

        let mut changed = user("Alice");
        changed.email = "new@example.com".to_string();
        manager.update_user(&id, UserUpdate::new(changed)).expect("case change");
        let profile = manager.get_user_profile(&id).expect("profile");
        assert_eq!(profile.users[0].username, "Alice");
        assert_eq!(profile.users[0].email, "new@example.com");

        assert!(matches!(
            manager.update_user(&id, UserUpdate::new(user("nobody"))),
            Err(StoreError::UserNotFound { .. })
        ));
    }

    #[test]
    fn delete_matches_case_insensitively() {
        let (_dir, mut manager) = scratch();
        let id = manager.list_user_profiles()[0].id.clone();
        manager.add_user(&id, user("alice")).expect("add");

        assert!(manager.delete_user(&id, "nobody").is_err());
        manager.delete_user(&id, "ALICE").expect("delete");
        assert!(usernames(&manager, &id).is_empty());
    }

    #[test]
    fn duplicate_user_picks_unique_username() {
        let (_dir, mut manager) = scratch();
        let id = manager.list_user_profiles()[0].id.clone();
        manager.add_user(&id, user("bob")).expect("add");

        let first = manager.duplicate_user(&id, "bob", None).expect("dup");
        let second = manager.duplicate_user(&id, "bob", None).expect("dup");
        let named = manager.duplicate_user(&id, "bob", Some("  ")).expect("dup");
        assert_eq!(first.username, "bob-copy");
        assert_eq!(second.username, "bob-copy-2");
        assert_eq!(named.username, "bob-copy-3");
        assert_eq!(first.password, "pw");
    }

    #[test]
    fn duplicated_profile_has_independent_users() {
        let (_dir, mut manager) = scratch();
        let id = manager.list_user_profiles()[0].id.clone();
        manager.add_user(&id, user("alice")).expect("add");
        let events = record_events(&mut manager);

        let copy = manager.duplicate_user_profile(&id, Some("Team B")).expect("dup");
        assert_eq!(copy.name, "Team B");
        assert_eq!(manager.selected_user_profile_id(), Some(copy.id.as_str()));
        assert_eq!(
            *events.borrow(),
            vec![
                EventKind::UserProfilesChanged,
                EventKind::SelectionChanged,
                EventKind::UserListChanged
            ]
        );

        let mut changed = user("alice");
        changed.password = "rotated".to_string();
        manager.update_user(&copy.id, UserUpdate::new(changed)).expect("update");
        assert_eq!(
            manager.get_user_profile(&id).expect("source").users[0].password,
            "pw"
        );
    }

    #[test]
    fn user_profile_delete_guard_and_rename() {
        let (_dir, mut manager) = scratch();
        let id = manager.list_user_profiles()[0].id.clone();
        assert!(matches!(
            manager.delete_user_profile(&id),
            Err(StoreError::LastProfile { .. })
        ));

        let other = manager.create_user_profile("Contractors", vec![user("x")]).expect("create");
        assert!(matches!(
            manager.rename_user_profile(&other.id, "default"),
            Err(StoreError::NameConflict { .. })
        ));
        manager.delete_user_profile(&id).expect("delete");
        assert_eq!(manager.selected_user_profile_id(), Some(other.id.as_str()));
    }
}
