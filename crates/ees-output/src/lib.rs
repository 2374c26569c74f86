//! `ees-output`: simulation journal writers.
//!
//! | Backend | Files created                            |
//! |---------|------------------------------------------|
//! | CSV     | `broadcasts.csv`, `agent_events.csv`     |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`JournalObserver`], which implements `ees_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ees_output::CsvJournal;
//!
//! let mut journal = CsvJournal::create(Path::new("./output"))?;
//! sim.run(&mut journal)?;
//! if let Some(e) = journal.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::{CsvWriter, AGENT_EVENTS_FILE, BROADCASTS_FILE};
pub use error::{OutputError, OutputResult};
pub use observer::{CsvJournal, JournalObserver};
pub use row::{AgentEventRow, BroadcastRow};
pub use writer::OutputWriter;
