//! CSV journal backend.
//!
//! Creates two files in the configured output directory:
//! - `broadcasts.csv`
//! - `agent_events.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentEventRow, BroadcastRow, OutputResult};

pub const BROADCASTS_FILE:   &str = "broadcasts.csv";
pub const AGENT_EVENTS_FILE: &str = "agent_events.csv";

/// Writes the journal to two CSV files.
pub struct CsvWriter {
    broadcasts: Writer<File>,
    events:     Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut broadcasts = Writer::from_path(dir.join(BROADCASTS_FILE))?;
        broadcasts.write_record(["time", "minutes", "type", "zones", "recipients", "content"])?;

        let mut events = Writer::from_path(dir.join(AGENT_EVENTS_FILE))?;
        events.write_record(["time", "agent_id", "event", "detail"])?;

        Ok(Self { broadcasts, events, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_broadcast(&mut self, row: &BroadcastRow) -> OutputResult<()> {
        self.broadcasts.write_record(&[
            row.time.to_string(),
            row.minutes.to_string(),
            row.kind.clone(),
            row.zones.clone(),
            row.recipients.to_string(),
            row.content.clone(),
        ])?;
        Ok(())
    }

    fn write_agent_event(&mut self, row: &AgentEventRow) -> OutputResult<()> {
        self.events.write_record(&[
            row.time.to_string(),
            row.agent_id.to_string(),
            row.event.to_string(),
            row.detail.clone(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.broadcasts.flush()?;
        self.events.flush()?;
        Ok(())
    }
}
