//! Evacuating agents.

use std::fmt;

use ees_behavior::{
    keys, AgentStatus, BehaviorResult, Beliefs, EvacActivity, GotoGoal, GotoPlan, InMemoryBeliefs,
};
use ees_core::{AgentId, Location};
use ees_messaging::{EmergencyMessage, MessageType};
use tracing::debug;

/// How an agent reacted to one emergency message.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Response {
    /// Less severe than the agent's trigger.
    BelowTrigger,
    /// Already driving somewhere under an active plan.
    Busy,
    /// Stuck agents cannot adopt a driving plan.
    Stuck,
    /// A goal to reach the evacuation destination was posted.
    Evacuating,
}

impl Response {
    pub fn as_str(self) -> &'static str {
        match self {
            Response::BelowTrigger => "below_trigger",
            Response::Busy         => "busy",
            Response::Stuck        => "stuck",
            Response::Evacuating   => "evacuating",
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resident who evacuates by car once warned severely enough.
#[derive(Clone, Debug)]
pub struct EvacAgent {
    pub id:                   AgentId,
    /// Where the agent starts.
    pub home:                 Location,
    pub destination:          Location,
    pub destination_type:     EvacActivity,
    /// Replanning duration for the first drive, in minutes.
    pub replan_duration_mins: f64,
    /// Least severe message type that makes the agent leave.
    pub trigger:              MessageType,
    pub beliefs:              InMemoryBeliefs,
    pub(crate) plan:          Option<GotoPlan>,
}

impl EvacAgent {
    /// An agent at home that leaves for `destination` on `EVACUATE_NOW`.
    pub fn new(id: AgentId, home: Location, destination: Location) -> Self {
        let mut beliefs = InMemoryBeliefs::new();
        beliefs.set_many(&[
            (keys::STATUS, AgentStatus::At(EvacActivity::Home).to_string()),
            (keys::IS_DRIVING, false.to_string()),
        ]);
        Self {
            id,
            home,
            destination,
            destination_type: EvacActivity::EvacPlace,
            replan_duration_mins: 5.0,
            trigger: MessageType::EvacuateNow,
            beliefs,
            plan: None,
        }
    }

    pub fn with_trigger(mut self, trigger: MessageType) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_destination_type(mut self, destination_type: EvacActivity) -> Self {
        self.destination_type = destination_type;
        self
    }

    pub fn with_replan_duration(mut self, mins: f64) -> Self {
        self.replan_duration_mins = mins;
        self
    }

    pub fn plan(&self) -> Option<&GotoPlan> {
        self.plan.as_ref()
    }

    pub(crate) fn plan_mut(&mut self) -> Option<&mut GotoPlan> {
        self.plan.as_mut()
    }

    pub fn status(&self) -> Option<&str> {
        self.beliefs.get(keys::STATUS)
    }

    /// Goal this agent pursues when it evacuates.
    pub fn evacuation_goal(&self) -> BehaviorResult<GotoGoal> {
        GotoGoal::new(self.destination.clone(), self.destination_type, self.replan_duration_mins)
    }

    /// React to a message that reached this agent's zone.
    pub fn receive(&mut self, message: &EmergencyMessage) -> BehaviorResult<Response> {
        self.beliefs.set(keys::LAST_MESSAGE, message.kind.to_string());

        let response = if message.kind < self.trigger {
            Response::BelowTrigger
        } else if self.plan.as_ref().is_some_and(|p| !p.is_finished()) {
            Response::Busy
        } else if !GotoPlan::is_applicable(&self.beliefs) {
            Response::Stuck
        } else {
            self.plan = Some(GotoPlan::new(self.evacuation_goal()?));
            Response::Evacuating
        };
        debug!(agent = %self.id, kind = %message.kind, %response, "message received");
        Ok(response)
    }
}
