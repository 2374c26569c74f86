//! `ees-behavior`: what an evacuating agent believes and how it drives.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`beliefs`]  | `Beliefs` trait, `InMemoryBeliefs`, belief keys                 |
//! | [`activity`] | `EvacActivity`, `AgentStatus`                                   |
//! | [`mobility`] | `DrivingEngine` trait, `DriveRequest`, `RoutingMode`, `ActionState` |
//! | [`plan`]     | `GotoGoal`, `GotoPlan`: the driving retry/escalation loop      |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                            |
//!
//! # Execution model
//!
//! A `GotoPlan` is stepped by the agent runtime, one evaluation per step:
//!
//! ```text
//! Evaluate ──drive requested──► AwaitSubgoal ──resume()──► Evaluate
//!    │
//!    └── arrived / attempts exhausted / drive done / stuck / agent gone ──► Terminated
//! ```
//!
//! The plan never blocks.  `step` returns [`PlanStep::Suspended`] with the
//! drive's handle; the runtime calls [`GotoPlan::resume`] once the mobility
//! engine reports that drive finished.

pub mod activity;
pub mod beliefs;
pub mod error;
pub mod mobility;
pub mod plan;

#[cfg(test)]
mod tests;

pub use activity::{AgentStatus, EvacActivity};
pub use beliefs::{keys, Beliefs, InMemoryBeliefs};
pub use error::{BehaviorError, BehaviorResult};
pub use mobility::{ActionState, DriveHandle, DriveRequest, DrivingEngine, RoutingMode};
pub use plan::{GotoGoal, GotoOutcome, GotoPlan, GotoState, PlanStep, StopReason, MAX_ATTEMPTS};
