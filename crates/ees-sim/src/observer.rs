//! Simulation observer trait for progress reporting and data collection.

use ees_behavior::GotoOutcome;
use ees_core::{AgentId, SimTime};
use ees_messaging::{Delivery, MessageType};

use crate::Response;

/// Callbacks invoked by [`EvacSim::run`][crate::EvacSim::run] at key points
/// in the tick loop.  Times are in the simulation's native unit.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _now: SimTime) {}

    /// A message was released; `recipients` are the agents inside its zones.
    fn on_broadcast(&mut self, _now: SimTime, _delivery: &Delivery, _recipients: &[AgentId]) {}

    /// One recipient handled a message.
    fn on_notified(&mut self, _now: SimTime, _agent: AgentId, _kind: MessageType, _response: Response) {}

    /// An agent's driving plan terminated after `attempts` drives.
    fn on_goal_finished(&mut self, _now: SimTime, _agent: AgentId, _outcome: GotoOutcome, _attempts: u32) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _now: SimTime) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
