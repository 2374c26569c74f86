//! Emergency message record.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use ees_core::{CoreResult, HhMm, Polygon};

use crate::ZoneRegistry;

// ── MessageType ───────────────────────────────────────────────────────────────

/// Warning level of a broadcast, in ascending order of severity.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Advice,
    WatchAndAct,
    EmergencyWarning,
    EvacuateNow,
}

impl MessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Advice           => "ADVICE",
            MessageType::WatchAndAct      => "WATCH_AND_ACT",
            MessageType::EmergencyWarning => "EMERGENCY_WARNING",
            MessageType::EvacuateNow      => "EVACUATE_NOW",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── EmergencyMessage ──────────────────────────────────────────────────────────

/// One broadcast as authored in the message file.
///
/// `broadcast_zones` maps each targeted zone id to its polygon.  The file
/// normally leaves the polygon `null`; the loader fills it in from the
/// [`ZoneRegistry`].  Ids the registry does not know keep their original
/// value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyMessage {
    #[serde(rename = "type")]
    pub kind:            MessageType,

    #[serde(default)]
    pub content:         String,

    /// Raw `HHmm` time of day.
    #[serde(rename = "broadcastHHMM")]
    pub broadcast_hhmm:  String,

    #[serde(default)]
    pub broadcast_zones: BTreeMap<String, Option<Polygon>>,
}

impl EmergencyMessage {
    pub fn new(kind: MessageType, content: impl Into<String>, broadcast_hhmm: impl Into<String>) -> Self {
        Self {
            kind,
            content:         content.into(),
            broadcast_hhmm:  broadcast_hhmm.into(),
            broadcast_zones: BTreeMap::new(),
        }
    }

    /// Builder-style helper: target `zone_id` with an unresolved polygon.
    pub fn targeting(mut self, zone_id: impl Into<String>) -> Self {
        self.broadcast_zones.insert(zone_id.into(), None);
        self
    }

    /// The parsed broadcast time of day.
    pub fn broadcast_time(&self) -> CoreResult<HhMm> {
        HhMm::parse_compact(&self.broadcast_hhmm)
    }

    /// Replace each targeted zone's polygon with the registry's, where known.
    ///
    /// Returns the ids that could not be resolved.
    pub fn resolve_zones(&mut self, registry: &ZoneRegistry) -> Vec<String> {
        let mut unresolved = Vec::new();
        for (zone_id, polygon) in self.broadcast_zones.iter_mut() {
            match registry.get(zone_id) {
                Some(p) => *polygon = Some(p.clone()),
                None    => unresolved.push(zone_id.clone()),
            }
        }
        unresolved
    }

    pub fn zone_ids(&self) -> impl Iterator<Item = &str> {
        self.broadcast_zones.keys().map(String::as_str)
    }

    /// Targeted zones that carry a polygon.
    pub fn resolved_zones(&self) -> impl Iterator<Item = (&str, &Polygon)> {
        self.broadcast_zones
            .iter()
            .filter_map(|(id, p)| p.as_ref().map(|p| (id.as_str(), p)))
    }
}
