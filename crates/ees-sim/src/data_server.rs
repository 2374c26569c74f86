//! In-process timed-update service.

use std::collections::BTreeMap;

use ees_core::SimTime;
use ees_messaging::TimedUpdates;

pub type Topic = &'static str;

/// Holds wake-up requests (`BTreeMap<SimTime, Vec<Topic>>`) and hands them
/// back once the clock reaches them.
///
/// A topic registered twice for the same time is kept once.
#[derive(Clone, Debug, Default)]
pub struct DataServer {
    pending: BTreeMap<SimTime, Vec<Topic>>,
}

impl DataServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every request due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: SimTime) -> Vec<(SimTime, Topic)> {
        let mut due = Vec::new();
        while let Some(entry) = self.pending.first_entry() {
            if *entry.key() > now {
                break;
            }
            let (at, topics) = entry.remove_entry();
            due.extend(topics.into_iter().map(|topic| (at, topic)));
        }
        due
    }

    /// Earliest pending request time.
    pub fn next_update(&self) -> Option<SimTime> {
        self.pending.keys().next().copied()
    }

    /// Number of pending (time, topic) requests.
    pub fn len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl TimedUpdates for DataServer {
    fn register_timed_update(&mut self, topic: Topic, at: SimTime) {
        let topics = self.pending.entry(at).or_default();
        if !topics.contains(&topic) {
            topics.push(topic);
        }
    }
}
