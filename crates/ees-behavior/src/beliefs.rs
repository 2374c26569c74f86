//! Agent belief store.
//!
//! Beliefs are string key/value pairs shared between an agent's plans.  The
//! store is injected wherever it is needed; nothing here is global.

use std::collections::BTreeMap;

/// Well-known belief keys.
pub mod keys {
    /// `at:<place>` or `to:<place>`.
    pub const STATUS:       &str = "status";
    pub const IS_DRIVING:   &str = "isDriving";
    pub const IS_STUCK:     &str = "isStuck";
    /// Type of the most recent emergency message received.
    pub const LAST_MESSAGE: &str = "lastMessage";
}

/// Read/write access to one agent's beliefs.
///
/// Single-key reads and writes are atomic.  [`set_many`][Self::set_many]
/// applies a group of writes as one update; implementations shared with
/// concurrent readers must make the whole group visible at once.
pub trait Beliefs {
    fn get(&self, key: &str) -> Option<&str>;

    fn set(&mut self, key: &str, value: String);

    fn set_many(&mut self, updates: &[(&str, String)]) {
        for (key, value) in updates {
            self.set(key, value.clone());
        }
    }

    /// `true` if `key` holds `"true"` (any case).
    fn is_true(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        self.set(key, value.to_string());
    }
}

/// A plain map-backed belief store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryBeliefs {
    values: BTreeMap<String, String>,
}

impl InMemoryBeliefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Beliefs for InMemoryBeliefs {
    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_owned(), value);
    }
}
