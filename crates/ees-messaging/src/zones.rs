//! GeoJSON zone registry.
//!
//! # Input format
//!
//! ```json
//! {"type": "FeatureCollection", "features": [
//!   {"properties": {"SA1_MAIN11": "20611105001"},
//!    "geometry": {"type": "Polygon", "coordinates": [[[144.1, -37.0], [144.2, -37.0], ...]]}}
//! ]}
//! ```
//!
//! Only the first (outer) ring of each polygon is kept.
//!
//! **Zone identifier**: taken from the caller-supplied property name when
//! one is configured, otherwise from `SA1_MAIN11`, then `SA1_MAIN16`.
//! Features with no identifier are dropped; any geometry other than
//! `Polygon` aborts the load.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use ees_core::Polygon;

use crate::{MessagingError, MessagingResult};

/// Identifier properties tried, in order, when no override is configured.
pub const FALLBACK_ID_PROPERTIES: [&str; 2] = ["SA1_MAIN11", "SA1_MAIN16"];

// ── GeoJSON records ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry:   Option<Geometry>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind:        String,
    #[serde(default)]
    coordinates: Value,
}

// ── ZoneRegistry ──────────────────────────────────────────────────────────────

/// Zone id → polygon, built once and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct ZoneRegistry {
    zones: BTreeMap<String, Polygon>,
}

impl ZoneRegistry {
    /// An empty registry.  Every zone reference stays unresolved.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a registry from already-parsed zones.
    pub fn from_zones(zones: impl IntoIterator<Item = (String, Polygon)>) -> Self {
        Self { zones: zones.into_iter().collect() }
    }

    /// Load zones from a GeoJSON file.
    pub fn load(path: &Path, id_property: Option<&str>) -> MessagingResult<Self> {
        info!(path = %path.display(), "loading zones from GeoJSON");
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), id_property)
    }

    /// Like [`load`][Self::load] but accepts any `Read` source.
    pub fn from_reader<R: Read>(reader: R, id_property: Option<&str>) -> MessagingResult<Self> {
        let collection: FeatureCollection = serde_json::from_reader(reader)?;
        let mut zones = BTreeMap::new();

        for (index, feature) in collection.features.into_iter().enumerate() {
            let props = feature.properties.unwrap_or_default();
            let Some(zone_id) = resolve_zone_id(&props, id_property) else {
                warn!(
                    feature = index,
                    property = id_property.unwrap_or("SA1_MAIN11/SA1_MAIN16"),
                    "feature has no zone identifier; discarding"
                );
                continue;
            };

            let geometry = feature.geometry.ok_or_else(|| MessagingError::Coordinates {
                zone:   zone_id.clone(),
                reason: "feature has no geometry".to_owned(),
            })?;
            let polygon = parse_polygon(&zone_id, geometry)?;

            if zones.insert(zone_id.clone(), polygon).is_some() {
                warn!(zone = %zone_id, "duplicate zone identifier; keeping the later feature");
            }
        }

        info!(zones = zones.len(), "zones loaded");
        Ok(Self { zones })
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn get(&self, zone_id: &str) -> Option<&Polygon> {
        self.zones.get(zone_id)
    }

    pub fn contains(&self, zone_id: &str) -> bool {
        self.zones.contains_key(zone_id)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zone ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Polygon)> {
        self.zones.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn resolve_zone_id(props: &Map<String, Value>, id_property: Option<&str>) -> Option<String> {
    match id_property {
        Some(name) => props.get(name).and_then(property_as_id),
        None => FALLBACK_ID_PROPERTIES
            .iter()
            .find_map(|name| props.get(*name).and_then(property_as_id)),
    }
}

/// Zone codes are usually strings but some exports write them as integers.
fn property_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

fn parse_polygon(zone_id: &str, geometry: Geometry) -> MessagingResult<Polygon> {
    if !geometry.kind.eq_ignore_ascii_case("polygon") {
        return Err(MessagingError::UnsupportedGeometry {
            zone:  zone_id.to_owned(),
            found: geometry.kind,
        });
    }

    let coords_err = |reason: String| MessagingError::Coordinates { zone: zone_id.to_owned(), reason };

    let rings: Vec<Vec<Vec<f64>>> =
        serde_json::from_value(geometry.coordinates).map_err(|e| coords_err(e.to_string()))?;
    let ring = rings
        .into_iter()
        .next()
        .ok_or_else(|| coords_err("polygon has no rings".to_owned()))?;

    let vertices = ring
        .into_iter()
        .map(|pos| match pos.as_slice() {
            // Positions may carry an altitude; only lon/lat are kept.
            [lon, lat, ..] => Ok([*lon, *lat]),
            _ => Err(coords_err(format!("position {pos:?} has fewer than two values"))),
        })
        .collect::<MessagingResult<Vec<_>>>()?;

    if vertices.len() < 3 {
        return Err(MessagingError::DegeneratePolygon {
            zone:     zone_id.to_owned(),
            vertices: vertices.len(),
        });
    }
    Ok(Polygon::new(vertices))
}
