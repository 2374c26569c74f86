//! Flat records written by every journal backend.

/// One released broadcast.
#[derive(Clone, Debug, PartialEq)]
pub struct BroadcastRow {
    /// Simulation time of release, native unit.
    pub time:       f64,
    /// Scheduled broadcast time, absolute minutes.
    pub minutes:    f64,
    pub kind:       String,
    /// Targeted zone ids joined with `;`.
    pub zones:      String,
    pub recipients: u64,
    pub content:    String,
}

/// Something that happened to one agent.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentEventRow {
    pub time:     f64,
    pub agent_id: u32,
    /// `notified` or `goal_finished`.
    pub event:    &'static str,
    pub detail:   String,
}
