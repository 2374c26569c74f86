//! The `EvacSim` struct and its tick loop.

use ees_behavior::{GotoState, PlanStep};
use ees_core::{AgentId, SimTime};
use ees_messaging::{BroadcastScheduler, Delivery, EMERGENCY_MESSAGE};
use tracing::{debug, warn};

use crate::{AgentIndex, DataServer, EvacAgent, MobilityEngine, SimConfig, SimObserver, SimResult};

/// The evacuation simulation runner.
///
/// Each tick runs three phases:
///
/// 1. **Timed updates**: drain the data server; an `emergency_message`
///    wake-up polls the broadcast scheduler and hands each released message
///    to the agents inside its zones.
/// 2. **Mobility**: advance the engine; plans whose drive finished are
///    resumed, as are plans whose drive was refused on the previous tick.
/// 3. **Plans**: step every runnable plan once, in ascending `AgentId`.
///
/// Create via [`EvacSimBuilder`][crate::EvacSimBuilder].
pub struct EvacSim<M: MobilityEngine> {
    pub config:    SimConfig,
    pub server:    DataServer,
    pub scheduler: BroadcastScheduler,
    pub mobility:  M,
    /// Indexed by `AgentId`.
    agents:        Vec<EvacAgent>,
    /// Ticks run so far.
    ticks:         u64,
    /// Agents whose last drive request was refused.
    refused:       Vec<AgentId>,
}

impl<M: MobilityEngine> EvacSim<M> {
    pub(crate) fn new(
        config:    SimConfig,
        server:    DataServer,
        scheduler: BroadcastScheduler,
        mobility:  M,
        agents:    Vec<EvacAgent>,
    ) -> Self {
        Self { config, server, scheduler, mobility, agents, ticks: 0, refused: Vec::new() }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick until the clock reaches `config.end`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        loop {
            let now = self.now();
            if now >= self.config.end {
                break;
            }
            self.process_tick(now, observer)?;
            self.ticks += 1;
        }
        observer.on_sim_end(self.now());
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end`).
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.now();
            self.process_tick(now, observer)?;
            self.ticks += 1;
        }
        Ok(())
    }

    /// Time of the next tick to run.
    pub fn now(&self) -> SimTime {
        self.config.tick_time(self.ticks)
    }

    pub fn agents(&self) -> &[EvacAgent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&EvacAgent> {
        self.agents.get(id.index())
    }

    /// Mutable access, e.g. to set an agent's `isStuck` belief.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut EvacAgent> {
        self.agents.get_mut(id.index())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: SimObserver>(&mut self, now: SimTime, observer: &mut O) -> SimResult<()> {
        observer.on_tick_start(now);

        // ── Phase 1: timed updates ────────────────────────────────────────
        let mut topics: Vec<&'static str> = Vec::new();
        for (_, topic) in self.server.drain_due(now) {
            if !topics.contains(&topic) {
                topics.push(topic);
            }
        }
        for topic in topics {
            if topic == EMERGENCY_MESSAGE {
                let deliveries = self.scheduler.deliver(now, &mut self.server);
                self.broadcast(now, &deliveries, observer)?;
            } else {
                warn!(topic, "no handler for timed update");
            }
        }

        // ── Phase 2: mobility ─────────────────────────────────────────────
        for id in std::mem::take(&mut self.refused) {
            if let Some(plan) = self.agents.get_mut(id.index()).and_then(EvacAgent::plan_mut) {
                plan.resume();
            }
        }
        for update in self.mobility.advance(now) {
            let Some(plan) = self.agents.get_mut(update.agent.index()).and_then(EvacAgent::plan_mut)
            else {
                continue;
            };
            if plan.pending_drive() == Some(update.handle) {
                debug!(agent = %update.agent, handle = %update.handle, state = ?update.state, "drive finished");
                plan.resume();
            }
        }

        // ── Phase 3: plans ────────────────────────────────────────────────
        let mobility = &mut self.mobility;
        for agent in self.agents.iter_mut() {
            let id = agent.id;
            let Some(plan) = agent.plan.as_mut() else { continue };
            if plan.state() != GotoState::Evaluate {
                continue;
            }
            match plan.step(id, &mut *mobility, &mut agent.beliefs) {
                PlanStep::Suspended(None) => self.refused.push(id),
                PlanStep::Suspended(Some(_)) | PlanStep::Waiting => {}
                PlanStep::Finished(outcome) => {
                    observer.on_goal_finished(now, id, outcome, plan.attempts());
                    agent.plan = None;
                }
            }
        }
        Ok(())
    }

    /// Hand each delivery to the agents currently inside its zones.
    fn broadcast<O: SimObserver>(
        &mut self,
        now:        SimTime,
        deliveries: &[Delivery],
        observer:   &mut O,
    ) -> SimResult<()> {
        if deliveries.is_empty() {
            return Ok(());
        }
        let index = AgentIndex::build(self.agents.iter().map(|a| {
            let point = self.mobility.position(a.id).unwrap_or([a.home.x, a.home.y]);
            (a.id, point)
        }));

        for delivery in deliveries {
            let recipients = index.recipients(&delivery.message);
            debug!(
                minutes = delivery.time.0,
                kind = %delivery.message.kind,
                recipients = recipients.len(),
                "broadcast released"
            );
            observer.on_broadcast(now, delivery, &recipients);
            for &id in &recipients {
                let Some(agent) = self.agents.get_mut(id.index()) else { continue };
                let response = agent.receive(&delivery.message)?;
                observer.on_notified(now, id, delivery.message.kind, response);
            }
        }
        Ok(())
    }
}
