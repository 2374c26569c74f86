//! `JournalObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use std::path::Path;

use ees_behavior::GotoOutcome;
use ees_core::{AgentId, SimTime};
use ees_messaging::{Delivery, MessageType};
use ees_sim::{Response, SimObserver};

use crate::row::{AgentEventRow, BroadcastRow};
use crate::writer::OutputWriter;
use crate::{CsvWriter, OutputError, OutputResult};

/// A [`SimObserver`] that journals broadcasts and agent reactions to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct JournalObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

/// The CSV-backed journal.
pub type CsvJournal = JournalObserver<CsvWriter>;

impl JournalObserver<CsvWriter> {
    /// Journal into `broadcasts.csv` and `agent_events.csv` under `dir`.
    pub fn create(dir: &Path) -> OutputResult<Self> {
        Ok(Self::new(CsvWriter::new(dir)?))
    }
}

impl<W: OutputWriter> JournalObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn agent_event(&mut self, now: SimTime, agent: AgentId, event: &'static str, detail: String) {
        let row = AgentEventRow { time: now.0, agent_id: agent.0, event, detail };
        let result = self.writer.write_agent_event(&row);
        self.store_err(result);
    }
}

impl<W: OutputWriter> SimObserver for JournalObserver<W> {
    fn on_broadcast(&mut self, now: SimTime, delivery: &Delivery, recipients: &[AgentId]) {
        let message = &delivery.message;
        let row = BroadcastRow {
            time:       now.0,
            minutes:    delivery.time.0,
            kind:       message.kind.to_string(),
            zones:      message.zone_ids().collect::<Vec<_>>().join(";"),
            recipients: recipients.len() as u64,
            content:    message.content.clone(),
        };
        let result = self.writer.write_broadcast(&row);
        self.store_err(result);
    }

    fn on_notified(&mut self, now: SimTime, agent: AgentId, kind: MessageType, response: Response) {
        self.agent_event(now, agent, "notified", format!("{kind}:{response}"));
    }

    fn on_goal_finished(&mut self, now: SimTime, agent: AgentId, outcome: GotoOutcome, attempts: u32) {
        self.agent_event(now, agent, "goal_finished", format!("{outcome};attempts={attempts}"));
    }

    fn on_sim_end(&mut self, _now: SimTime) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
