//! Unit tests for ees-behavior.

use ees_core::{AgentId, Location};

use crate::{
    keys, ActionState, AgentStatus, BehaviorError, BehaviorResult, Beliefs, DriveHandle,
    DriveRequest, DrivingEngine, EvacActivity, GotoGoal, GotoOutcome, GotoPlan, GotoState,
    InMemoryBeliefs, PlanStep, RoutingMode, StopReason, MAX_ATTEMPTS,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const AGENT: AgentId = AgentId(7);

/// Engine fake: fixed distance, optional acceptance, scripted action state.
struct ScriptedEngine {
    /// `None` means the agent is unknown.
    distance:    Option<f64>,
    accept:      bool,
    last_state:  Option<ActionState>,
    requests:    Vec<DriveRequest>,
    next_handle: u64,
}

impl ScriptedEngine {
    fn new(distance: f64) -> Self {
        Self { distance: Some(distance), accept: true, last_state: None, requests: Vec::new(), next_handle: 1 }
    }
}

impl DrivingEngine for ScriptedEngine {
    fn driving_distance_to(&self, agent: AgentId, _destination: &Location) -> BehaviorResult<f64> {
        self.distance.ok_or(BehaviorError::AgentNotFound(agent))
    }

    fn request_drive(&mut self, _agent: AgentId, request: &DriveRequest) -> Option<DriveHandle> {
        self.requests.push(request.clone());
        if !self.accept {
            return None;
        }
        let handle = DriveHandle(self.next_handle);
        self.next_handle += 1;
        Some(handle)
    }

    fn last_action_state(&self, _agent: AgentId) -> Option<ActionState> {
        self.last_state
    }
}

/// Belief store that records every write call.
#[derive(Default)]
struct RecordingBeliefs {
    inner:       InMemoryBeliefs,
    single_sets: Vec<String>,
    batches:     Vec<Vec<(String, String)>>,
}

impl Beliefs for RecordingBeliefs {
    fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        self.single_sets.push(key.to_owned());
        self.inner.set(key, value);
    }

    fn set_many(&mut self, updates: &[(&str, String)]) {
        self.batches.push(updates.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect());
        for (key, value) in updates {
            self.inner.set(key, value.clone());
        }
    }
}

fn shelter() -> Location {
    Location::new("shelter", 144.95, -37.80)
}

fn goal(replan: f64) -> GotoGoal {
    GotoGoal::new(shelter(), EvacActivity::EvacPlace, replan).unwrap()
}

/// Step → resume until the plan finishes, marking every drive as `after_drive`.
fn run_to_end(
    plan:        &mut GotoPlan,
    engine:      &mut ScriptedEngine,
    beliefs:     &mut InMemoryBeliefs,
    after_drive: ActionState,
) -> GotoOutcome {
    for _ in 0..10 {
        match plan.step(AGENT, engine, beliefs) {
            PlanStep::Finished(outcome) => return outcome,
            PlanStep::Suspended(_) => {
                engine.last_state = Some(after_drive);
                assert!(plan.resume());
            }
            PlanStep::Waiting => panic!("plan waiting after resume"),
        }
    }
    panic!("plan did not terminate");
}

// ── Beliefs ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod beliefs_tests {
    use super::*;

    #[test]
    fn get_set_roundtrip() {
        let mut b = InMemoryBeliefs::new();
        assert!(b.is_empty());
        b.set(keys::STATUS, "at:Home".into());
        assert_eq!(b.get(keys::STATUS), Some("at:Home"));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn is_true_is_case_insensitive() {
        let mut b = InMemoryBeliefs::new();
        assert!(!b.is_true(keys::IS_STUCK));
        b.set(keys::IS_STUCK, "TRUE".into());
        assert!(b.is_true(keys::IS_STUCK));
        b.set(keys::IS_STUCK, "yes".into());
        assert!(!b.is_true(keys::IS_STUCK));
    }

    #[test]
    fn set_flag_writes_bool_text() {
        let mut b = InMemoryBeliefs::new();
        b.set_flag(keys::IS_DRIVING, true);
        assert_eq!(b.get(keys::IS_DRIVING), Some("true"));
    }

    #[test]
    fn set_many_applies_all() {
        let mut b = InMemoryBeliefs::new();
        b.set_many(&[(keys::STATUS, "to:Work".into()), (keys::IS_DRIVING, "true".into())]);
        let all: Vec<_> = b.iter().collect();
        assert_eq!(all, vec![("isDriving", "true"), ("status", "to:Work")]);
    }
}

// ── Activity / status ─────────────────────────────────────────────────────────

#[cfg(test)]
mod activity_tests {
    use super::*;

    #[test]
    fn status_rendering() {
        assert_eq!(AgentStatus::At(EvacActivity::Home).to_string(), "at:Home");
        assert_eq!(AgentStatus::To(EvacActivity::EvacPlace).to_string(), "to:EvacPlace");
        assert_eq!(AgentStatus::At(EvacActivity::UnknownPlace).to_string(), "at:UnknownPlace");
    }

    #[test]
    fn outcome_rendering() {
        assert_eq!(GotoOutcome::Arrived(EvacActivity::InvacPlace).to_string(), "arrived:InvacPlace");
        assert_eq!(
            GotoOutcome::Stopped(StopReason::AttemptsExhausted).to_string(),
            "stopped:attempts_exhausted"
        );
        assert_eq!(GotoOutcome::AgentNotFound.to_string(), "agent_not_found");
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing_tests {
    use super::*;

    #[test]
    fn first_attempt_is_free_speed() {
        assert_eq!(RoutingMode::for_attempt(0), RoutingMode::CarFreespeed);
        assert_eq!(RoutingMode::for_attempt(1), RoutingMode::CarGlobalInformation);
        assert_eq!(RoutingMode::for_attempt(2), RoutingMode::CarGlobalInformation);
    }

    #[test]
    fn replan_durations() {
        assert_eq!(RoutingMode::CarFreespeed.replan_duration_mins(5.4), 5);
        assert_eq!(RoutingMode::CarFreespeed.replan_duration_mins(5.5), 6);
        assert_eq!(RoutingMode::CarGlobalInformation.replan_duration_mins(30.0), 1);
    }

    #[test]
    fn finished_action_states() {
        assert!(ActionState::Passed.is_finished());
        assert!(ActionState::Dropped.is_finished());
        assert!(!ActionState::Running.is_finished());
        assert!(!ActionState::Suspended.is_finished());
    }
}

// ── GotoPlan ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod goto_tests {
    use super::*;

    #[test]
    fn goal_rejects_negative_duration() {
        let err = GotoGoal::new(shelter(), EvacActivity::EvacPlace, -1.0).unwrap_err();
        assert!(matches!(err, BehaviorError::InvalidGoal(_)));
        assert!(GotoGoal::new(shelter(), EvacActivity::EvacPlace, f64::NAN).is_err());
    }

    #[test]
    fn already_there_finishes_without_driving() {
        let mut engine = ScriptedEngine::new(0.0);
        let mut beliefs = InMemoryBeliefs::new();
        let mut plan = GotoPlan::new(goal(5.0));

        let step = plan.step(AGENT, &mut engine, &mut beliefs);
        assert_eq!(step, PlanStep::Finished(GotoOutcome::Arrived(EvacActivity::EvacPlace)));
        assert!(engine.requests.is_empty());
        assert_eq!(beliefs.get(keys::STATUS), Some("at:EvacPlace"));
        assert_eq!(beliefs.get(keys::IS_DRIVING), Some("false"));
    }

    #[test]
    fn first_drive_free_speed_then_escalates() {
        let mut engine = ScriptedEngine::new(1200.0);
        let mut beliefs = InMemoryBeliefs::new();
        let mut plan = GotoPlan::new(goal(5.4));

        let step = plan.step(AGENT, &mut engine, &mut beliefs);
        assert_eq!(step, PlanStep::Suspended(Some(DriveHandle(1))));
        assert_eq!(plan.attempts(), 1);
        assert_eq!(beliefs.get(keys::STATUS), Some("to:EvacPlace"));
        assert_eq!(beliefs.get(keys::IS_DRIVING), Some("true"));

        engine.last_state = Some(ActionState::Failed);
        assert!(plan.resume());
        plan.step(AGENT, &mut engine, &mut beliefs);

        assert_eq!(engine.requests.len(), 2);
        assert_eq!(engine.requests[0].routing, RoutingMode::CarFreespeed);
        assert_eq!(engine.requests[0].replan_duration_mins, 5);
        assert_eq!(engine.requests[1].routing, RoutingMode::CarGlobalInformation);
        assert_eq!(engine.requests[1].replan_duration_mins, 1);
        assert_eq!(engine.requests[1].destination_type, EvacActivity::EvacPlace);
    }

    #[test]
    fn attempt_cap_stops_at_unknown_place() {
        let mut engine = ScriptedEngine::new(1200.0);
        let mut beliefs = InMemoryBeliefs::new();
        let mut plan = GotoPlan::new(goal(5.0));

        let outcome = run_to_end(&mut plan, &mut engine, &mut beliefs, ActionState::Failed);
        assert_eq!(outcome, GotoOutcome::Stopped(StopReason::AttemptsExhausted));
        assert_eq!(engine.requests.len() as u32, MAX_ATTEMPTS);
        assert_eq!(plan.attempts(), MAX_ATTEMPTS);
        assert_eq!(beliefs.get(keys::STATUS), Some("at:UnknownPlace"));
        assert_eq!(beliefs.get(keys::IS_DRIVING), Some("false"));
    }

    #[test]
    fn dropped_drives_also_retry() {
        let mut engine = ScriptedEngine::new(50.0);
        let mut beliefs = InMemoryBeliefs::new();
        let mut plan = GotoPlan::new(goal(5.0));

        let outcome = run_to_end(&mut plan, &mut engine, &mut beliefs, ActionState::Dropped);
        assert_eq!(outcome, GotoOutcome::Stopped(StopReason::AttemptsExhausted));
        assert_eq!(engine.requests.len(), 3);
    }

    #[test]
    fn completed_drive_short_of_destination_stops() {
        let mut engine = ScriptedEngine::new(300.0);
        let mut beliefs = InMemoryBeliefs::new();
        let mut plan = GotoPlan::new(goal(5.0));

        let outcome = run_to_end(&mut plan, &mut engine, &mut beliefs, ActionState::Passed);
        assert_eq!(outcome, GotoOutcome::Stopped(StopReason::DriveCompleted));
        assert_eq!(engine.requests.len(), 1);
        assert_eq!(beliefs.get(keys::STATUS), Some("at:UnknownPlace"));
    }

    #[test]
    fn arrival_after_drive() {
        let mut engine = ScriptedEngine::new(300.0);
        let mut beliefs = InMemoryBeliefs::new();
        let mut plan = GotoPlan::new(goal(5.0));

        plan.step(AGENT, &mut engine, &mut beliefs);
        engine.distance = Some(0.0);
        engine.last_state = Some(ActionState::Passed);
        plan.resume();

        let step = plan.step(AGENT, &mut engine, &mut beliefs);
        assert_eq!(step, PlanStep::Finished(GotoOutcome::Arrived(EvacActivity::EvacPlace)));
        assert_eq!(beliefs.get(keys::STATUS), Some("at:EvacPlace"));
        assert_eq!(beliefs.get(keys::IS_DRIVING), Some("false"));
    }

    #[test]
    fn stuck_bypasses_attempt_cap() {
        let mut engine = ScriptedEngine::new(900.0);
        let mut beliefs = InMemoryBeliefs::new();
        let mut plan = GotoPlan::new(goal(5.0));

        plan.step(AGENT, &mut engine, &mut beliefs);
        beliefs.set_flag(keys::IS_STUCK, true);
        engine.last_state = Some(ActionState::Failed);
        plan.resume();

        let step = plan.step(AGENT, &mut engine, &mut beliefs);
        assert_eq!(step, PlanStep::Finished(GotoOutcome::Stopped(StopReason::Stuck)));
        assert_eq!(plan.attempts(), 1);
        assert_eq!(engine.requests.len(), 1);
        assert_eq!(beliefs.get(keys::STATUS), Some("at:UnknownPlace"));
    }

    #[test]
    fn stuck_agent_cannot_adopt_plan() {
        let mut beliefs = InMemoryBeliefs::new();
        assert!(GotoPlan::is_applicable(&beliefs));
        beliefs.set_flag(keys::IS_STUCK, true);
        assert!(!GotoPlan::is_applicable(&beliefs));
    }

    #[test]
    fn unknown_agent_terminates_without_beliefs() {
        let mut engine = ScriptedEngine::new(0.0);
        engine.distance = None;
        let mut beliefs = InMemoryBeliefs::new();
        let mut plan = GotoPlan::new(goal(5.0));

        let step = plan.step(AGENT, &mut engine, &mut beliefs);
        assert_eq!(step, PlanStep::Finished(GotoOutcome::AgentNotFound));
        assert!(beliefs.is_empty());
        assert!(engine.requests.is_empty());
    }

    #[test]
    fn refused_drive_is_resumable() {
        let mut engine = ScriptedEngine::new(400.0);
        engine.accept = false;
        let mut beliefs = InMemoryBeliefs::new();
        let mut plan = GotoPlan::new(goal(5.0));

        let step = plan.step(AGENT, &mut engine, &mut beliefs);
        assert_eq!(step, PlanStep::Suspended(None));
        assert_eq!(plan.state(), GotoState::AwaitSubgoal { handle: None });
        assert_eq!(plan.pending_drive(), None);
        assert_eq!(beliefs.get(keys::IS_DRIVING), Some("false"));

        assert!(plan.resume());
        plan.step(AGENT, &mut engine, &mut beliefs);
        assert_eq!(engine.requests[1].routing, RoutingMode::CarGlobalInformation);
    }

    #[test]
    fn waiting_until_resumed() {
        let mut engine = ScriptedEngine::new(400.0);
        let mut beliefs = InMemoryBeliefs::new();
        let mut plan = GotoPlan::new(goal(5.0));

        assert!(!plan.resume());
        plan.step(AGENT, &mut engine, &mut beliefs);
        assert_eq!(plan.pending_drive(), Some(DriveHandle(1)));
        assert_eq!(plan.step(AGENT, &mut engine, &mut beliefs), PlanStep::Waiting);
        assert_eq!(engine.requests.len(), 1);
    }

    #[test]
    fn terminated_plan_stays_finished() {
        let mut engine = ScriptedEngine::new(0.0);
        let mut beliefs = InMemoryBeliefs::new();
        let mut plan = GotoPlan::new(goal(5.0));

        plan.step(AGENT, &mut engine, &mut beliefs);
        assert!(plan.is_finished());
        engine.distance = None;
        let again = plan.step(AGENT, &mut engine, &mut beliefs);
        assert_eq!(again, PlanStep::Finished(GotoOutcome::Arrived(EvacActivity::EvacPlace)));
        assert!(!plan.resume());
    }

    #[test]
    fn status_and_driving_written_together() {
        let mut engine = ScriptedEngine::new(400.0);
        let mut beliefs = RecordingBeliefs::default();
        let mut plan = GotoPlan::new(goal(5.0));

        plan.step(AGENT, &mut engine, &mut beliefs);
        engine.last_state = Some(ActionState::Passed);
        plan.resume();
        plan.step(AGENT, &mut engine, &mut beliefs);

        assert!(beliefs.single_sets.is_empty());
        assert_eq!(beliefs.batches.len(), 2);
        for batch in &beliefs.batches {
            let written: Vec<&str> = batch.iter().map(|(k, _)| k.as_str()).collect();
            assert_eq!(written, vec!["status", "isDriving"]);
        }
        assert_eq!(beliefs.batches[0][0].1, "to:EvacPlace");
        assert_eq!(beliefs.batches[1][0].1, "at:UnknownPlace");
    }
}
