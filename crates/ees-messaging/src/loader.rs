//! JSON message loader.
//!
//! # Input format
//!
//! ```json
//! {"messages": [
//!   {"type": "EVACUATE_NOW",
//!    "content": "Leave now towards Castlemaine.",
//!    "broadcastHHMM": "0930",
//!    "broadcastZones": {"20611105001": null, "20611105002": null}}
//! ]}
//! ```
//!
//! Zones are loaded first so every message's targets can be resolved to
//! polygons.  Any I/O, JSON, geometry, or time error aborts the whole load;
//! a message that names an unknown zone is kept with that zone unresolved.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use ees_core::SimTime;

use crate::{CollisionPolicy, EmergencyMessage, MessageStore, MessagingError, MessagingResult, ZoneRegistry};

#[derive(Deserialize)]
struct MessageFile {
    messages: Vec<EmergencyMessage>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load zones from `zones_path`, then messages from `message_path`.
///
/// Failures are wrapped in [`MessagingError::Load`] naming the file that
/// could not be loaded.
pub fn load_messages_for_zones(
    message_path: &Path,
    zones_path:   &Path,
    id_property:  Option<&str>,
    policy:       CollisionPolicy,
) -> MessagingResult<(ZoneRegistry, MessageStore)> {
    let zones = ZoneRegistry::load(zones_path, id_property).map_err(|e| e.at(zones_path))?;
    let store = load_messages(message_path, &zones, policy).map_err(|e| e.at(message_path))?;
    Ok((zones, store))
}

/// Load messages from a JSON file, resolving zones against `zones`.
pub fn load_messages(path: &Path, zones: &ZoneRegistry, policy: CollisionPolicy) -> MessagingResult<MessageStore> {
    info!(path = %path.display(), "loading JSON messages");
    let file = std::fs::File::open(path)?;
    load_messages_reader(std::io::BufReader::new(file), zones, policy)
}

/// Like [`load_messages`] but accepts any `Read` source.
pub fn load_messages_reader<R: Read>(
    reader: R,
    zones:  &ZoneRegistry,
    policy: CollisionPolicy,
) -> MessagingResult<MessageStore> {
    let file: MessageFile = serde_json::from_reader(reader)?;
    let mut store = MessageStore::new(policy);

    for (index, mut message) in file.messages.into_iter().enumerate() {
        let minutes = message
            .broadcast_time()
            .map_err(|source| MessagingError::BroadcastTime { index, source })?
            .absolute_minutes();

        for zone in message.resolve_zones(zones) {
            debug!(message = index, zone = %zone, "message targets an unknown zone; polygon left unresolved");
        }

        if store.insert(SimTime(minutes), message) {
            debug!(message = index, minutes, policy = ?policy, "another message is already scheduled at this minute");
        }
    }

    info!(messages = store.len(), distinct_times = store.time_count(), "messages loaded");
    Ok(store)
}
