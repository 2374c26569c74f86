use ees_behavior::BehaviorError;
use ees_core::AgentId;
use ees_messaging::MessagingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("agent at index {index} has id {found}; ids must be dense and in order")]
    AgentIdMismatch {
        index: usize,
        found: AgentId,
    },

    #[error("messaging error: {0}")]
    Messaging(#[from] MessagingError),

    #[error("behavior error: {0}")]
    Behavior(#[from] BehaviorError),
}

pub type SimResult<T> = Result<T, SimError>;
