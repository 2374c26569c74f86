//! The slice of the mobility engine a driving plan talks to.

use std::fmt;

use ees_core::{AgentId, Location};

use crate::{BehaviorResult, EvacActivity};

// ── RoutingMode ───────────────────────────────────────────────────────────────

/// How the mobility engine should route a drive.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum RoutingMode {
    /// Fastest route on an empty network.
    CarFreespeed,
    /// Route using the current network-wide congestion picture.
    CarGlobalInformation,
}

impl RoutingMode {
    /// Escalation policy: the first attempt drives free-speed, every retry
    /// switches to global information.
    pub fn for_attempt(attempt: u32) -> Self {
        if attempt == 0 {
            RoutingMode::CarFreespeed
        } else {
            RoutingMode::CarGlobalInformation
        }
    }

    /// Replanning duration for a drive in this mode, in whole minutes.
    ///
    /// Free-speed drives use the goal's requested duration; global-information
    /// retries always replan after one minute.
    pub fn replan_duration_mins(self, requested_mins: f64) -> u32 {
        match self {
            RoutingMode::CarFreespeed         => requested_mins.round().max(0.0) as u32,
            RoutingMode::CarGlobalInformation => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoutingMode::CarFreespeed         => "carFreespeed",
            RoutingMode::CarGlobalInformation => "carGlobalInformation",
        }
    }
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Drive actions ─────────────────────────────────────────────────────────────

/// Everything the mobility engine needs to start a drive.
#[derive(Clone, Debug, PartialEq)]
pub struct DriveRequest {
    pub destination_type:     EvacActivity,
    pub destination:          Location,
    pub routing:              RoutingMode,
    pub replan_duration_mins: u32,
}

/// Opaque token for an accepted drive.  The engine reports completion
/// against it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct DriveHandle(pub u64);

impl fmt::Display for DriveHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drive#{}", self.0)
    }
}

/// Lifecycle state of an agent's most recent action in the mobility engine.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ActionState {
    Initiated,
    Running,
    Passed,
    Failed,
    Dropped,
    Suspended,
}

impl ActionState {
    /// `true` once the action can no longer change state.
    pub fn is_finished(self) -> bool {
        matches!(self, ActionState::Passed | ActionState::Failed | ActionState::Dropped)
    }
}

// ── DrivingEngine ─────────────────────────────────────────────────────────────

/// Mobility-engine operations used by [`GotoPlan`][crate::GotoPlan].
pub trait DrivingEngine {
    /// Network driving distance from the agent's position to `destination`,
    /// in metres.  `<= 0` means the agent is already there.
    ///
    /// # Errors
    ///
    /// [`BehaviorError::AgentNotFound`][crate::BehaviorError::AgentNotFound]
    /// if the engine does not know `agent`.
    fn driving_distance_to(&self, agent: AgentId, destination: &Location) -> BehaviorResult<f64>;

    /// Start a drive.  `None` means the engine did not accept it.
    fn request_drive(&mut self, agent: AgentId, request: &DriveRequest) -> Option<DriveHandle>;

    /// State of the agent's most recent action, if it has had one.
    fn last_action_state(&self, agent: AgentId) -> Option<ActionState>;
}
