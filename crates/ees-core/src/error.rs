//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid time of day {input:?}: {reason}")]
    TimeOfDay { input: String, reason: &'static str },

    #[error("unknown timestep unit {0:?}")]
    UnknownUnit(String),
}

/// Shorthand result type for `ees-core`.
pub type CoreResult<T> = Result<T, CoreError>;
