//! `ees-messaging`: emergency broadcasts, the zones they target, and the
//! scheduler that releases them against the simulation clock.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`zones`]     | `ZoneRegistry`: write-once zone id → polygon map          |
//! | [`message`]   | `EmergencyMessage`, `MessageType`                          |
//! | [`store`]     | `MessageStore` (`BTreeMap<SimTime, Vec<_>>`), `CollisionPolicy` |
//! | [`loader`]    | `load_messages_reader`, `load_messages_for_zones`          |
//! | [`scheduler`] | `BroadcastScheduler`, `TimedUpdates`, `Delivery`           |
//! | [`config`]    | `MessagingConfig` and the option-map keys                  |
//! | [`error`]     | `MessagingError`, `MessagingResult<T>`                     |
//!
//! # Lifecycle
//!
//! ```text
//! Unstarted ──start()──► Loaded ──arm──► Armed ──deliver()──► Armed … ──► Dormant
//!     │                                  ▲                                  │
//!     │                                  └──────────── start_at() ──────────┘
//!     └── start() without both sources ──► Idle
//! ```
//!
//! The store is built once at start-up and then only range-queried; delivered
//! messages stay in place so a late poll still finds them.

pub mod config;
pub mod error;
pub mod loader;
pub mod message;
pub mod scheduler;
pub mod store;
pub mod zones;


pub use config::{
    MessagingConfig, OPT_GLOBAL_START, OPT_MESSAGE_FILE, OPT_ZONES_FILE, OPT_ZONE_ID_PROPERTY,
};
pub use error::{MessagingError, MessagingResult};
pub use loader::{load_messages, load_messages_for_zones, load_messages_reader};
pub use message::{EmergencyMessage, MessageType};
pub use scheduler::{BroadcastScheduler, Delivery, SchedulerState, TimedUpdates, EMERGENCY_MESSAGE};
pub use store::{CollisionPolicy, MessageStore};
pub use zones::ZoneRegistry;
