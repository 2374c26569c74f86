//! Fluent builder for constructing an [`EvacSim`].

use ees_core::HhMm;
use ees_messaging::BroadcastScheduler;

use crate::{DataServer, EvacAgent, EvacSim, MobilityEngine, SimConfig, SimError, SimResult};

/// Fluent builder for [`EvacSim<M>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: native unit, start, end, step
/// - [`BroadcastScheduler`]: unstarted (loads its configured sources) or
///   built over a loaded store
/// - `M: MobilityEngine`: e.g. [`TeleportMobility`][crate::TeleportMobility]
///
/// # Optional inputs
///
/// | Method           | Default                                        |
/// |------------------|------------------------------------------------|
/// | `.agents(v)`     | No agents                                      |
/// | `.start_at(t)`   | The scheduler's configured global start time   |
///
/// # Example
///
/// ```rust,ignore
/// let scheduler = BroadcastScheduler::with_store(zones, store, TimestepUnit::Seconds);
/// let mut sim = EvacSimBuilder::new(config, scheduler, TeleportMobility::new(12.0, unit)?)
///     .agents(agents)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct EvacSimBuilder<M: MobilityEngine> {
    config:    SimConfig,
    scheduler: BroadcastScheduler,
    mobility:  M,
    agents:    Vec<EvacAgent>,
    start_at:  Option<HhMm>,
}

impl<M: MobilityEngine> EvacSimBuilder<M> {
    pub fn new(config: SimConfig, scheduler: BroadcastScheduler, mobility: M) -> Self {
        Self { config, scheduler, mobility, agents: Vec::new(), start_at: None }
    }

    /// Supply the agents.  `agents[i].id` must be `AgentId(i)`.
    pub fn agents(mut self, agents: Vec<EvacAgent>) -> Self {
        self.agents = agents;
        self
    }

    /// Arm the scheduler at `at` instead of its configured start time.
    /// Requires a scheduler built over a loaded store.
    pub fn start_at(mut self, at: HhMm) -> Self {
        self.start_at = Some(at);
        self
    }

    /// Validate inputs, place agents, start the scheduler, and return a
    /// ready-to-run [`EvacSim`].
    pub fn build(mut self) -> SimResult<EvacSim<M>> {
        self.config.validate()?;
        if self.scheduler.unit() != self.config.unit {
            return Err(SimError::Config(format!(
                "scheduler unit {} does not match simulation unit {}",
                self.scheduler.unit(),
                self.config.unit
            )));
        }

        for (index, agent) in self.agents.iter().enumerate() {
            if agent.id.index() != index {
                return Err(SimError::AgentIdMismatch { index, found: agent.id });
            }
            agent.evacuation_goal()?;
            self.mobility.place(agent.id, &agent.home);
        }

        let mut server = DataServer::new();
        match self.start_at {
            Some(at) => self.scheduler.start_at(at, &mut server)?,
            None     => self.scheduler.start(&mut server)?,
        }

        Ok(EvacSim::new(self.config, server, self.scheduler, self.mobility, self.agents))
    }
}
