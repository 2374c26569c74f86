//! Mobility engines the tick loop can drive.

use std::collections::BTreeMap;

use ees_behavior::{
    ActionState, BehaviorError, BehaviorResult, DriveHandle, DriveRequest, DrivingEngine,
};
use ees_core::{AgentId, Location, SimTime, TimestepUnit};
use tracing::debug;

use crate::{SimError, SimResult};

/// A drive that reached a final state during [`MobilityEngine::advance`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DriveUpdate {
    pub agent:  AgentId,
    pub handle: DriveHandle,
    pub state:  ActionState,
}

/// Everything [`EvacSim`][crate::EvacSim] needs from a mobility engine on
/// top of the plan-facing [`DrivingEngine`].
pub trait MobilityEngine: DrivingEngine {
    /// Put `agent` at `location`, registering it if it is new.
    fn place(&mut self, agent: AgentId, location: &Location);

    /// Current `[lon, lat]` of `agent`.
    fn position(&self, agent: AgentId) -> Option<[f64; 2]>;

    /// Move the engine's clock to `now` and report every drive that
    /// finished since the last call.
    fn advance(&mut self, now: SimTime) -> Vec<DriveUpdate>;
}

// ── TeleportMobility ──────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct ActiveDrive {
    handle:      DriveHandle,
    destination: Location,
    finishes_at: SimTime,
}

#[derive(Clone, Debug)]
struct TeleportAgent {
    position:    Location,
    drive:       Option<ActiveDrive>,
    last_state:  Option<ActionState>,
    unreachable: bool,
}

/// Straight-line mobility: a drive takes `distance / speed` and then puts
/// the agent exactly at its destination.
///
/// There is no network and no congestion, so routing mode and replanning
/// duration are ignored.  Agents marked unreachable fail every drive.
#[derive(Clone, Debug)]
pub struct TeleportMobility {
    speed_mps:   f64,
    unit:        TimestepUnit,
    agents:      BTreeMap<AgentId, TeleportAgent>,
    now:         SimTime,
    next_handle: u64,
}

impl TeleportMobility {
    /// `unit` is the simulation's native clock unit.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] unless `speed_mps` is finite and positive.
    pub fn new(speed_mps: f64, unit: TimestepUnit) -> SimResult<Self> {
        if !speed_mps.is_finite() || speed_mps <= 0.0 {
            return Err(SimError::Config(format!(
                "drive speed must be a positive number of metres per second, got {speed_mps}"
            )));
        }
        Ok(Self {
            speed_mps,
            unit,
            agents: BTreeMap::new(),
            now: SimTime::ZERO,
            next_handle: 1,
        })
    }

    /// Make every future drive of `agent` fail.
    pub fn set_unreachable(&mut self, agent: AgentId, unreachable: bool) {
        if let Some(state) = self.agents.get_mut(&agent) {
            state.unreachable = unreachable;
        }
    }

    pub fn location(&self, agent: AgentId) -> Option<&Location> {
        self.agents.get(&agent).map(|a| &a.position)
    }

    pub fn is_driving(&self, agent: AgentId) -> bool {
        self.agents.get(&agent).is_some_and(|a| a.drive.is_some())
    }
}

impl DrivingEngine for TeleportMobility {
    fn driving_distance_to(&self, agent: AgentId, destination: &Location) -> BehaviorResult<f64> {
        self.agents
            .get(&agent)
            .map(|a| a.position.distance_m(destination))
            .ok_or(BehaviorError::AgentNotFound(agent))
    }

    fn request_drive(&mut self, agent: AgentId, request: &DriveRequest) -> Option<DriveHandle> {
        let state = self.agents.get_mut(&agent)?;
        let secs = state.position.distance_m(&request.destination) / self.speed_mps;
        let finishes_at = SimTime(
            self.now.0 + TimestepUnit::convert(secs, TimestepUnit::Seconds, self.unit),
        );

        let handle = DriveHandle(self.next_handle);
        self.next_handle += 1;
        state.drive = Some(ActiveDrive {
            handle,
            destination: request.destination.clone(),
            finishes_at,
        });
        state.last_state = Some(ActionState::Initiated);
        debug!(%agent, %handle, routing = %request.routing, finishes_at = finishes_at.0, "drive started");
        Some(handle)
    }

    fn last_action_state(&self, agent: AgentId) -> Option<ActionState> {
        self.agents.get(&agent).and_then(|a| a.last_state)
    }
}

impl MobilityEngine for TeleportMobility {
    fn place(&mut self, agent: AgentId, location: &Location) {
        let state = self.agents.entry(agent).or_insert_with(|| TeleportAgent {
            position:    location.clone(),
            drive:       None,
            last_state:  None,
            unreachable: false,
        });
        state.position = location.clone();
    }

    fn position(&self, agent: AgentId) -> Option<[f64; 2]> {
        self.agents.get(&agent).map(|a| [a.position.x, a.position.y])
    }

    fn advance(&mut self, now: SimTime) -> Vec<DriveUpdate> {
        self.now = now;
        let mut finished = Vec::new();
        for (&agent, state) in self.agents.iter_mut() {
            let Some(drive) = state.drive.as_ref() else { continue };
            let outcome = if state.unreachable {
                ActionState::Failed
            } else if drive.finishes_at <= now {
                state.position = drive.destination.clone();
                ActionState::Passed
            } else {
                state.last_state = Some(ActionState::Running);
                continue;
            };
            finished.push(DriveUpdate { agent, handle: drive.handle, state: outcome });
            state.last_state = Some(outcome);
            state.drive = None;
        }
        finished
    }
}
