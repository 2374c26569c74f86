//! Geographic types: named locations and zone polygons.
//!
//! Coordinates are WGS-84 `(longitude, latitude)` pairs in `f64`, matching
//! GeoJSON axis order.  `Location` uses `x`/`y` for the same two axes.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Location ──────────────────────────────────────────────────────────────────

/// A named point the mobility engine can drive to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    /// Longitude.
    pub x:    f64,
    /// Latitude.
    pub y:    f64,
}

impl Location {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self { name: name.into(), x, y }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(&self, other: &Location) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.y - self.y).to_radians();
        let d_lon = (other.x - self.x).to_radians();
        let lat1  = self.y.to_radians();
        let lat2  = other.y.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        2.0 * R * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.6}, {:.6})", self.name, self.x, self.y)
    }
}

// ── Envelope ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in `(lon, lat)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Envelope {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Envelope {
    #[inline]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min[0] && lon <= self.max[0] && lat >= self.min[1] && lat <= self.max[1]
    }
}

// ── Polygon ───────────────────────────────────────────────────────────────────

/// A single-ring zone polygon.
///
/// The ring is an ordered vertex list and need not repeat its first vertex
/// at the end.  Serialises as the GeoJSON ring `[[lon, lat], ...]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(pub Vec<[f64; 2]>);

impl Polygon {
    pub fn new(vertices: Vec<[f64; 2]>) -> Self {
        Self(vertices)
    }

    pub fn vertices(&self) -> &[[f64; 2]] {
        &self.0
    }

    pub fn vertex_count(&self) -> usize {
        self.0.len()
    }

    /// Bounding box of all vertices, or `None` for an empty ring.
    pub fn envelope(&self) -> Option<Envelope> {
        let first = *self.0.first()?;
        let mut env = Envelope { min: first, max: first };
        for &[lon, lat] in &self.0[1..] {
            env.min[0] = env.min[0].min(lon);
            env.min[1] = env.min[1].min(lat);
            env.max[0] = env.max[0].max(lon);
            env.max[1] = env.max[1].max(lat);
        }
        Some(env)
    }

    /// Even-odd ray-casting point-in-polygon test.
    ///
    /// Points exactly on an edge may fall either way.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let v = &self.0;
        if v.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = v.len() - 1;
        for i in 0..v.len() {
            let [xi, yi] = v[i];
            let [xj, yj] = v[j];
            if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}
