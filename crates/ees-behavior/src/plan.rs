//! `GotoPlan`: drive to a destination, retrying with smarter routing.
//!
//! Each evaluation either terminates the plan or requests one more drive.
//! The first drive routes free-speed with the goal's replanning duration;
//! retries route with global information and replan every minute.  At most
//! [`MAX_ATTEMPTS`] drives are requested.  An agent reported stuck stops at
//! once, whatever the attempt count.

use std::fmt;

use ees_core::{AgentId, Location};
use tracing::{debug, warn};

use crate::{
    keys, ActionState, AgentStatus, BehaviorError, BehaviorResult, Beliefs, DriveHandle,
    DriveRequest, DrivingEngine, EvacActivity, RoutingMode,
};

/// Drive attempts after which the plan gives up.
pub const MAX_ATTEMPTS: u32 = 3;

// ── Goal ──────────────────────────────────────────────────────────────────────

/// Drive to `destination`, a place of kind `destination_type`.
#[derive(Clone, Debug, PartialEq)]
pub struct GotoGoal {
    pub destination:          Location,
    pub destination_type:     EvacActivity,
    /// Replanning duration for the first (free-speed) drive, in minutes.
    pub replan_duration_mins: f64,
}

impl GotoGoal {
    pub fn new(
        destination:          Location,
        destination_type:     EvacActivity,
        replan_duration_mins: f64,
    ) -> BehaviorResult<Self> {
        if !replan_duration_mins.is_finite() || replan_duration_mins < 0.0 {
            return Err(BehaviorError::InvalidGoal(format!(
                "replanning duration must be a non-negative number of minutes, got {replan_duration_mins}"
            )));
        }
        Ok(Self { destination, destination_type, replan_duration_mins })
    }
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Why a plan stopped short of its destination.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum StopReason {
    /// The agent reported itself stuck.
    Stuck,
    /// [`MAX_ATTEMPTS`] drives were made.
    AttemptsExhausted,
    /// The last drive completed but left the agent elsewhere.
    DriveCompleted,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum GotoOutcome {
    /// Distance to the destination reached zero.
    Arrived(EvacActivity),
    /// Stopped elsewhere; status is `at:UnknownPlace`.
    Stopped(StopReason),
    /// The mobility engine does not know the agent.  Beliefs are untouched.
    AgentNotFound,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::Stuck             => "stuck",
            StopReason::AttemptsExhausted => "attempts_exhausted",
            StopReason::DriveCompleted    => "drive_completed",
        }
    }
}

impl fmt::Display for GotoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GotoOutcome::Arrived(place) => write!(f, "arrived:{place}"),
            GotoOutcome::Stopped(why)   => write!(f, "stopped:{}", why.as_str()),
            GotoOutcome::AgentNotFound  => f.write_str("agent_not_found"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GotoState {
    /// Ready for the next evaluation.
    Evaluate,
    /// Waiting for a drive to finish.  `None` when the engine refused the
    /// drive; the plan is then resumable at once.
    AwaitSubgoal { handle: Option<DriveHandle> },
    Terminated(GotoOutcome),
}

/// What one [`GotoPlan::step`] did.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PlanStep {
    /// A drive was requested; resume the plan once it finishes.
    Suspended(Option<DriveHandle>),
    /// The plan is still waiting for its drive.
    Waiting,
    Finished(GotoOutcome),
}

// ── GotoPlan ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct GotoPlan {
    goal:     GotoGoal,
    attempts: u32,
    state:    GotoState,
}

impl GotoPlan {
    pub fn new(goal: GotoGoal) -> Self {
        Self { goal, attempts: 0, state: GotoState::Evaluate }
    }

    /// A plan may only be adopted by an agent that is not stuck.
    pub fn is_applicable<B: Beliefs + ?Sized>(beliefs: &B) -> bool {
        !beliefs.is_true(keys::IS_STUCK)
    }

    pub fn goal(&self) -> &GotoGoal {
        &self.goal
    }

    /// Drives requested so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn state(&self) -> GotoState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, GotoState::Terminated(_))
    }

    /// The drive this plan is waiting on, if any.
    pub fn pending_drive(&self) -> Option<DriveHandle> {
        match self.state {
            GotoState::AwaitSubgoal { handle } => handle,
            _ => None,
        }
    }

    /// Wake the plan after its drive finished.  Returns `false` if the plan
    /// was not waiting.
    pub fn resume(&mut self) -> bool {
        if matches!(self.state, GotoState::AwaitSubgoal { .. }) {
            self.state = GotoState::Evaluate;
            true
        } else {
            false
        }
    }

    /// Run one evaluation.
    pub fn step<E, B>(&mut self, agent: AgentId, engine: &mut E, beliefs: &mut B) -> PlanStep
    where
        E: DrivingEngine + ?Sized,
        B: Beliefs + ?Sized,
    {
        match self.state {
            GotoState::Evaluate => self.evaluate(agent, engine, beliefs),
            GotoState::AwaitSubgoal { .. } => PlanStep::Waiting,
            GotoState::Terminated(outcome) => PlanStep::Finished(outcome),
        }
    }

    fn evaluate<E, B>(&mut self, agent: AgentId, engine: &mut E, beliefs: &mut B) -> PlanStep
    where
        E: DrivingEngine + ?Sized,
        B: Beliefs + ?Sized,
    {
        let distance = match engine.driving_distance_to(agent, &self.goal.destination) {
            Ok(d) => d,
            Err(err) => {
                warn!(%agent, %err, destination = %self.goal.destination.name, "dropping goto plan");
                return self.finish(GotoOutcome::AgentNotFound);
            }
        };

        let stuck = beliefs.is_true(keys::IS_STUCK);
        let last_drive_ok = !matches!(
            engine.last_action_state(agent),
            Some(ActionState::Dropped | ActionState::Failed)
        );
        let drive_completed = last_drive_ok && beliefs.is_true(keys::IS_DRIVING);

        let outcome = if distance <= 0.0 {
            Some(GotoOutcome::Arrived(self.goal.destination_type))
        } else if stuck {
            Some(GotoOutcome::Stopped(StopReason::Stuck))
        } else if self.attempts >= MAX_ATTEMPTS {
            Some(GotoOutcome::Stopped(StopReason::AttemptsExhausted))
        } else if drive_completed {
            Some(GotoOutcome::Stopped(StopReason::DriveCompleted))
        } else {
            None
        };

        if let Some(outcome) = outcome {
            let place = match outcome {
                GotoOutcome::Arrived(place) => place,
                _ => EvacActivity::UnknownPlace,
            };
            beliefs.set_many(&[
                (keys::STATUS, AgentStatus::At(place).to_string()),
                (keys::IS_DRIVING, false.to_string()),
            ]);
            debug!(%agent, distance, attempts = self.attempts, %outcome, "goto plan finished");
            return self.finish(outcome);
        }

        let routing = RoutingMode::for_attempt(self.attempts);
        let request = DriveRequest {
            destination_type:     self.goal.destination_type,
            destination:          self.goal.destination.clone(),
            routing,
            replan_duration_mins: routing.replan_duration_mins(self.goal.replan_duration_mins),
        };
        let handle = engine.request_drive(agent, &request);
        self.attempts += 1;

        beliefs.set_many(&[
            (keys::STATUS, AgentStatus::To(self.goal.destination_type).to_string()),
            (keys::IS_DRIVING, handle.is_some().to_string()),
        ]);
        debug!(
            %agent,
            attempt = self.attempts,
            %routing,
            replan_mins = request.replan_duration_mins,
            accepted = handle.is_some(),
            "drive requested"
        );

        self.state = GotoState::AwaitSubgoal { handle };
        PlanStep::Suspended(handle)
    }

    fn finish(&mut self, outcome: GotoOutcome) -> PlanStep {
        self.state = GotoState::Terminated(outcome);
        PlanStep::Finished(outcome)
    }
}
