//! `ees-sim`: tick loop orchestrator for the emergency evacuation simulator.
//!
//! # Tick loop
//!
//! ```text
//! for now in (start..end).step_by(step):
//!   ① Timed updates   DataServer::drain_due(now); `emergency_message`
//!                     → BroadcastScheduler::deliver → AgentIndex zone query
//!                     → EvacAgent::receive for each recipient.
//!   ② Mobility        MobilityEngine::advance(now); finished drives resume
//!                     their plan, refused drives resume one tick later.
//!   ③ Plans           GotoPlan::step for every runnable plan, ascending AgentId.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ees_messaging::{BroadcastScheduler, MessagingConfig};
//! use ees_sim::{EvacSimBuilder, NoopObserver, SimConfig, TeleportMobility};
//!
//! let config = SimConfig::default();
//! let scheduler = BroadcastScheduler::new(messaging_config, config.unit);
//! let mut sim = EvacSimBuilder::new(config, scheduler, TeleportMobility::new(12.0, config.unit)?)
//!     .agents(agents)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod agent;
pub mod builder;
pub mod config;
pub mod data_server;
pub mod error;
pub mod mobility;
pub mod observer;
pub mod sim;
pub mod targeting;


pub use agent::{EvacAgent, Response};
pub use builder::EvacSimBuilder;
pub use config::SimConfig;
pub use data_server::{DataServer, Topic};
pub use error::{SimError, SimResult};
pub use mobility::{DriveUpdate, MobilityEngine, TeleportMobility};
pub use observer::{NoopObserver, SimObserver};
pub use sim::EvacSim;
pub use targeting::AgentIndex;
