//! `ees-core`: foundational types for the emergency evacuation simulator.
//!
//! Every other `ees-*` crate depends on this one.  It has no `ees-*`
//! dependencies and only `thiserror` and `serde` from outside.
//!
//! # What lives here
//!
//! | Module    | Contents                                              |
//! |-----------|-------------------------------------------------------|
//! | [`ids`]   | `AgentId`                                             |
//! | [`time`]  | `SimTime`, `TimestepUnit`, `HhMm`                     |
//! | [`geo`]   | `Location`, `Polygon`, `Envelope`                     |
//! | [`error`] | `CoreError`, `CoreResult`                             |

pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Envelope, Location, Polygon};
pub use ids::AgentId;
pub use time::{HhMm, SimTime, TimestepUnit};
