//! `MessageStore`: time-ordered emergency messages.
//!
//! Keys are absolute simulation minutes.  The store is filled once by the
//! loader and then only range-queried: delivering a message does not remove
//! it, so a poll that skips past a message's time still picks it up at the
//! next poll.
//!
//! # Collisions
//!
//! Two messages that resolve to the same minute are handled according to
//! [`CollisionPolicy`].  `Overwrite` keeps only the last one inserted, which
//! matches the behavior existing scenarios were recorded against.  `Bucket`
//! keeps every message at that minute in insertion order.

use std::collections::BTreeMap;
use std::ops::Bound;

use serde::{Deserialize, Serialize};

use ees_core::SimTime;

use crate::EmergencyMessage;

/// What to do when a second message lands on an occupied minute.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// The later message silently replaces the earlier one.
    #[default]
    Overwrite,
    /// Both messages are kept, earlier-inserted first.
    Bucket,
}

/// Absolute minute → messages broadcast at that minute.
#[derive(Clone, Debug, Default)]
pub struct MessageStore {
    inner:  BTreeMap<SimTime, Vec<EmergencyMessage>>,
    policy: CollisionPolicy,
    /// Cached message count for O(1) `len()`.
    total:  usize,
}

impl MessageStore {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self { inner: BTreeMap::new(), policy, total: 0 }
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Store `message` at absolute minute `minutes`.
    ///
    /// Returns `true` if the minute was already occupied.
    pub fn insert(&mut self, minutes: SimTime, message: EmergencyMessage) -> bool {
        let bucket = self.inner.entry(minutes).or_default();
        let collided = !bucket.is_empty();
        match self.policy {
            CollisionPolicy::Overwrite => {
                self.total -= bucket.len();
                bucket.clear();
            }
            CollisionPolicy::Bucket => {}
        }
        bucket.push(message);
        self.total += 1;
        collided
    }

    /// Messages with `after < t <= up_to`, ascending by time.
    ///
    /// `after = None` means no lower bound.
    pub fn range(&self, after: Option<SimTime>, up_to: SimTime) -> Vec<(SimTime, &EmergencyMessage)> {
        let lower = match after {
            Some(a) if a > up_to => return Vec::new(),
            Some(a) => Bound::Excluded(a),
            None    => Bound::Unbounded,
        };
        self.inner
            .range((lower, Bound::Included(up_to)))
            .flat_map(|(t, msgs)| msgs.iter().map(move |m| (*t, m)))
            .collect()
    }

    /// The earliest occupied minute strictly after `t`.
    pub fn next_after(&self, t: SimTime) -> Option<SimTime> {
        self.inner
            .range((Bound::Excluded(t), Bound::Unbounded))
            .next()
            .map(|(k, _)| *k)
    }

    /// The earliest occupied minute, or `None` if empty.
    pub fn first_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    /// Messages stored at exactly `minutes`.
    pub fn at(&self, minutes: SimTime) -> &[EmergencyMessage] {
        self.inner.get(&minutes).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of stored messages.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct occupied minutes.
    pub fn time_count(&self) -> usize {
        self.inner.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SimTime, &EmergencyMessage)> {
        self.inner
            .iter()
            .flat_map(|(t, msgs)| msgs.iter().map(move |m| (*t, m)))
    }
}
