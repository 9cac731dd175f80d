//! Change notifications for front ends.
//!
//! Subscribers get no payload: a notification only says which category
//! changed, and the subscriber re-reads that collection from the manager.

use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

/// Categories of state change raised by [`crate::ConfigManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    OpnsenseProfilesChanged,
    UserProfilesChanged,
    UserListChanged,
    SelectionChanged,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::OpnsenseProfilesChanged,
        EventKind::UserProfilesChanged,
        EventKind::UserListChanged,
        EventKind::SelectionChanged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::OpnsenseProfilesChanged => "opnsense_profiles_changed",
            EventKind::UserProfilesChanged => "user_profiles_changed",
            EventKind::UserListChanged => "user_list_changed",
            EventKind::SelectionChanged => "selection_changed",
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unsupported event '{s}'"))
    }
}

type Callback = Box<dyn FnMut()>;

/// Subscriber registry owned by the manager.
#[derive(Default)]
pub struct Listeners {
    callbacks: HashMap<EventKind, Vec<Callback>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for every future notification of `kind`.
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.callbacks
            .entry(kind)
            .or_default()
            .push(Box::new(callback));
    }

    /// Invoke the subscribers of `kind` in registration order.
    pub fn notify(&mut self, kind: EventKind) {
        if let Some(callbacks) = self.callbacks.get_mut(&kind) {
            for callback in callbacks.iter_mut() {
                callback();
            }
        }
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.callbacks.get(&kind).map_or(0, Vec::len)
    }
}

impl Debug for Listeners {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in EventKind::ALL {
            map.entry(&kind.as_str(), &self.count(kind));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{EventKind, Listeners};

    #[test]
    fn notifies_only_matching_subscribers_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();

        let first = Rc::clone(&log);
        listeners.subscribe(EventKind::UserListChanged, move || {
            first.borrow_mut().push("first")
        });
        let second = Rc::clone(&log);
        listeners.subscribe(EventKind::UserListChanged, move || {
            second.borrow_mut().push("second")
        });
        let other = Rc::clone(&log);
        listeners.subscribe(EventKind::SelectionChanged, move || {
            other.borrow_mut().push("selection")
        });

        listeners.notify(EventKind::UserListChanged);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn event_names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>(), Ok(kind));
        }
        assert!("profiles_changed".parse::<EventKind>().is_err());
    }
}
