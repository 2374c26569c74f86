//! `BroadcastScheduler`: releases stored messages as the clock passes them.
//!
//! The scheduler never drives itself.  An external timed-callback service
//! (the [`TimedUpdates`] implementor) invokes [`deliver`][BroadcastScheduler::deliver]
//! at a time the scheduler asked for, and each delivery asks to be called
//! again at the next pending message's time.
//!
//! # Delivery window
//!
//! Every call returns the messages in the half-open window
//! `(last_polled, now]`, in minutes.  With non-decreasing poll times each
//! message is returned by exactly one call.  A poll at exactly the wake-up
//! time the scheduler registered always includes that wake-up's messages.  A message whose time was never
//! polled exactly is still returned by the first later poll.

use ees_core::{HhMm, SimTime, TimestepUnit};
use tracing::{debug, warn};

use crate::{
    load_messages_for_zones, EmergencyMessage, MessageStore, MessagingConfig, MessagingError,
    MessagingResult, ZoneRegistry,
};

/// Topic the scheduler registers its wake-ups under.
pub const EMERGENCY_MESSAGE: &str = "emergency_message";

// ── Timed-callback service ────────────────────────────────────────────────────

/// A publish/subscribe service that calls a data source back at a given time.
pub trait TimedUpdates {
    /// Ask to be invoked for `topic` at `at`, in the simulation's native unit.
    fn register_timed_update(&mut self, topic: &'static str, at: SimTime);
}

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Constructed, nothing loaded yet.
    Unstarted,
    /// Zones and messages loaded, no wake-up registered.
    Loaded,
    /// A wake-up is registered at `next` (native unit).
    Armed { next: SimTime },
    /// Loaded, but no message remains after the last poll.  Can be re-armed
    /// with [`BroadcastScheduler::start_at`].
    Dormant,
    /// Started without both sources configured.  Never delivers.
    Idle,
}

/// One message released by [`BroadcastScheduler::deliver`].
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    /// Absolute broadcast time in minutes.
    pub time:    SimTime,
    pub message: EmergencyMessage,
}

// ── BroadcastScheduler ────────────────────────────────────────────────────────

pub struct BroadcastScheduler {
    config:      MessagingConfig,
    /// Native unit of the surrounding simulation clock.
    unit:        TimestepUnit,
    zones:       ZoneRegistry,
    store:       MessageStore,
    /// Last poll time in minutes; `None` before the first poll.
    last_polled: Option<SimTime>,
    state:       SchedulerState,
}

impl BroadcastScheduler {
    /// A scheduler that will load its sources from `config` on [`start`][Self::start].
    pub fn new(config: MessagingConfig, unit: TimestepUnit) -> Self {
        let store = MessageStore::new(config.collision_policy);
        Self {
            config,
            unit,
            zones: ZoneRegistry::empty(),
            store,
            last_polled: None,
            state: SchedulerState::Unstarted,
        }
    }

    /// A scheduler over an already-loaded registry and store.
    pub fn with_store(zones: ZoneRegistry, store: MessageStore, unit: TimestepUnit) -> Self {
        let config = MessagingConfig {
            collision_policy: store.policy(),
            ..MessagingConfig::default()
        };
        Self {
            config,
            unit,
            zones,
            store,
            last_polled: None,
            state: SchedulerState::Loaded,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Load the configured sources and arm the first wake-up at the global
    /// start time.
    ///
    /// Without both a message and a zone source the scheduler becomes
    /// [`SchedulerState::Idle`] for good.  A load failure is returned and
    /// leaves the scheduler `Unstarted`.
    pub fn start<S: TimedUpdates + ?Sized>(&mut self, server: &mut S) -> MessagingResult<()> {
        match self.state {
            SchedulerState::Unstarted => {
                let Some((messages, zones)) = self.config.sources() else {
                    warn!("message or zone source not configured; broadcast scheduler will stay idle");
                    self.state = SchedulerState::Idle;
                    return Ok(());
                };
                let (registry, store) = load_messages_for_zones(
                    messages,
                    zones,
                    self.config.zone_id_property.as_deref(),
                    self.config.collision_policy,
                )?;
                self.zones = registry;
                self.store = store;
                self.state = SchedulerState::Loaded;
            }
            SchedulerState::Loaded => {}
            other => {
                return Err(MessagingError::Config(format!("scheduler already started ({other:?})")));
            }
        }
        let at = SimTime(self.config.start_time().to_unit(self.unit));
        self.arm(at, server);
        Ok(())
    }

    /// Arm a loaded or dormant scheduler at an explicit time of day.
    ///
    /// Does nothing when the store is empty.  The delivery window is kept, so
    /// a restarted scheduler never repeats a message it already released.
    pub fn start_at<S: TimedUpdates + ?Sized>(&mut self, at: HhMm, server: &mut S) -> MessagingResult<()> {
        if !matches!(self.state, SchedulerState::Loaded | SchedulerState::Dormant) {
            return Err(MessagingError::Config(format!(
                "scheduler must be loaded or dormant to be armed ({:?})",
                self.state
            )));
        }
        if self.store.is_empty() {
            return Ok(());
        }
        self.arm(SimTime(at.to_unit(self.unit)), server);
        Ok(())
    }

    fn arm<S: TimedUpdates + ?Sized>(&mut self, at: SimTime, server: &mut S) {
        server.register_timed_update(EMERGENCY_MESSAGE, at);
        self.state = SchedulerState::Armed { next: at };
    }

    // ── Delivery ──────────────────────────────────────────────────────────

    /// Release every message in `(last_polled, now]` and re-arm at the next
    /// pending message's time.
    ///
    /// `now` is in the native unit.  Polls must be non-decreasing; an earlier
    /// poll returns nothing and leaves the window where it was.
    pub fn deliver<S: TimedUpdates + ?Sized>(&mut self, now: SimTime, server: &mut S) -> Vec<Delivery> {
        if matches!(self.state, SchedulerState::Unstarted | SchedulerState::Idle) {
            return Vec::new();
        }

        let upper = self.window_end(now);
        if let Some(last) = self.last_polled {
            if upper < last {
                warn!(now = upper.0, last_polled = last.0, "broadcast poll went backwards; ignoring");
                return Vec::new();
            }
        }

        let due: Vec<Delivery> = self
            .store
            .range(self.last_polled, upper)
            .into_iter()
            .map(|(time, message)| Delivery { time, message: message.clone() })
            .collect();
        self.last_polled = Some(upper);

        match self.store.next_after(upper) {
            Some(next) => {
                let at = next.convert(TimestepUnit::Minutes, self.unit);
                self.arm(at, server);
            }
            None => {
                debug!(minutes = upper.0, "no messages pending; broadcast scheduler dormant");
                self.state = SchedulerState::Dormant;
            }
        }
        due
    }

    /// Upper bound of the delivery window for a poll at `now`, in minutes.
    ///
    /// A key is due once its native-unit wake-up time is at or before `now`,
    /// even when `now` converted back to minutes lands just below the key.
    fn window_end(&self, now: SimTime) -> SimTime {
        let mut end = now.convert(self.unit, TimestepUnit::Minutes);
        while let Some(next) = self.store.next_after(end) {
            if next.convert(TimestepUnit::Minutes, self.unit) > now {
                break;
            }
            end = next;
        }
        end
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn unit(&self) -> TimestepUnit {
        self.unit
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Last poll time in minutes.
    pub fn last_polled(&self) -> Option<SimTime> {
        self.last_polled
    }

    pub fn config(&self) -> &MessagingConfig {
        &self.config
    }
}
