//! Zones, messages, and residents of evac_town.

use serde_json::{json, Value};

use ees_core::{AgentId, Location};
use ees_messaging::MessageType;
use ees_sim::EvacAgent;

pub const ZONE_ID_PROPERTY: &str = "ZONE_CODE";

const RESIDENTS_PER_ZONE: u32 = 6;

/// Two rectangular zones either side of the creek at latitude -37.50.
pub fn zones_geojson() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            zone("NORTH", -37.50, -37.45),
            zone("SOUTH", -37.55, -37.50),
        ]
    })
}

fn zone(code: &str, lat_min: f64, lat_max: f64) -> Value {
    json!({
        "type": "Feature",
        "properties": { ZONE_ID_PROPERTY: code },
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [144.00, lat_min], [144.10, lat_min], [144.10, lat_max], [144.00, lat_max], [144.00, lat_min]
            ]]
        }
    })
}

pub fn messages_json() -> Value {
    json!({
        "messages": [
            message("ADVICE",            "0930", "Fire reported west of town. Stay informed.", &["NORTH", "SOUTH"]),
            message("WATCH_AND_ACT",     "1000", "Conditions are changing. Prepare to leave.", &["NORTH"]),
            message("EVACUATE_NOW",      "1030", "Leave now for the oval.",                     &["NORTH"]),
            message("EMERGENCY_WARNING", "1100", "You are in danger. Act now.",                 &["SOUTH"]),
            message("EVACUATE_NOW",      "1200", "Leave now for the oval.",                     &["SOUTH", "CREEK"]),
        ]
    })
}

fn message(kind: &str, hhmm: &str, content: &str, zones: &[&str]) -> Value {
    let zones: serde_json::Map<String, Value> =
        zones.iter().map(|z| ((*z).to_string(), Value::Null)).collect();
    json!({
        "type": kind,
        "content": content,
        "broadcastHHMM": hhmm,
        "broadcastZones": zones,
    })
}

/// Six residents per zone.  Every third one leaves on an emergency warning,
/// the rest wait for an evacuation order.
pub fn residents() -> Vec<EvacAgent> {
    let oval = Location::new("oval", 144.20, -37.40);
    let rows = [("north", -37.47), ("south", -37.53)];

    let mut agents = Vec::new();
    for (name, lat) in rows {
        for i in 0..RESIDENTS_PER_ZONE {
            let id = AgentId(agents.len() as u32);
            let home = Location::new(format!("{name}-{i}"), 144.01 + 0.015 * f64::from(i), lat);
            let trigger = if i % 3 == 0 { MessageType::EmergencyWarning } else { MessageType::EvacuateNow };
            agents.push(EvacAgent::new(id, home, oval.clone()).with_trigger(trigger));
        }
    }
    agents
}
