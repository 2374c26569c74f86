//! Zone-targeted delivery: which agents does a broadcast reach?
//!
//! Agent positions go into an R-tree keyed by `[lon, lat]`.  A zone query
//! first takes every agent within the circle around the zone's bounding box,
//! then keeps those inside the polygon itself.

use ees_core::{AgentId, Polygon};
use ees_messaging::EmergencyMessage;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

#[derive(Clone, Debug)]
struct AgentEntry {
    point: [f64; 2], // [lon, lat]
    id:    AgentId,
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    /// Squared planar distance in degrees; only used as a coarse prefilter.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index of agent positions at one instant.
pub struct AgentIndex {
    tree: RTree<AgentEntry>,
}

impl AgentIndex {
    pub fn build(positions: impl IntoIterator<Item = (AgentId, [f64; 2])>) -> Self {
        let entries: Vec<AgentEntry> = positions
            .into_iter()
            .map(|(id, point)| AgentEntry { point, id })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Agents inside `polygon` (even-odd rule), ascending by id.
    pub fn agents_in(&self, polygon: &Polygon) -> Vec<AgentId> {
        let Some(env) = polygon.envelope() else {
            return Vec::new();
        };
        let center = [(env.min[0] + env.max[0]) * 0.5, (env.min[1] + env.max[1]) * 0.5];
        let half_w = (env.max[0] - env.min[0]) * 0.5;
        let half_h = (env.max[1] - env.min[1]) * 0.5;
        let radius_2 = half_w * half_w + half_h * half_h;

        let mut ids: Vec<AgentId> = self
            .tree
            .locate_within_distance(center, radius_2)
            .filter(|e| env.contains(e.point[0], e.point[1]))
            .filter(|e| polygon.contains(e.point[0], e.point[1]))
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Every agent inside any of the message's resolved zones, once each,
    /// ascending by id.  Unresolved zones reach nobody.
    pub fn recipients(&self, message: &EmergencyMessage) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = message
            .resolved_zones()
            .flat_map(|(_, polygon)| self.agents_in(polygon))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
