use crate::{AgentEventRow, BroadcastRow, OutputResult};

/// A journal backend.
pub trait OutputWriter {
    fn write_broadcast(&mut self, row: &BroadcastRow) -> OutputResult<()>;

    fn write_agent_event(&mut self, row: &AgentEventRow) -> OutputResult<()>;

    /// Flush everything.  Must be safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
