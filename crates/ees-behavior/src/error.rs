use ees_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BehaviorError {
    #[error("agent {0} not found in the mobility engine")]
    AgentNotFound(AgentId),

    #[error("invalid goal: {0}")]
    InvalidGoal(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
