//! Evacuation activity types and the status belief built from them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of place an agent is heading to or currently at.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum EvacActivity {
    Home,
    Work,
    Dependents,
    InvacPlace,
    EvacPlace,
    /// Somewhere other than the intended destination.
    UnknownPlace,
}

impl EvacActivity {
    pub fn as_str(self) -> &'static str {
        match self {
            EvacActivity::Home         => "Home",
            EvacActivity::Work         => "Work",
            EvacActivity::Dependents   => "Dependents",
            EvacActivity::InvacPlace   => "InvacPlace",
            EvacActivity::EvacPlace    => "EvacPlace",
            EvacActivity::UnknownPlace => "UnknownPlace",
        }
    }
}

impl fmt::Display for EvacActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the [`keys::STATUS`][crate::keys::STATUS] belief.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum AgentStatus {
    At(EvacActivity),
    To(EvacActivity),
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentStatus::At(place) => write!(f, "at:{place}"),
            AgentStatus::To(place) => write!(f, "to:{place}"),
        }
    }
}
