use chrono::NaiveDateTime;
use indexmap::IndexMap;

use model::route::RouteId;
use model::stop::StopId;
use model::trip::TripId;

#[derive(Debug, Clone)]
pub struct StopNode {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A winning edge's payload, discriminated by kind. `travel_seconds` is
/// also the edge's routing weight.
#[derive(Debug, Clone)]
pub enum EdgeKind {
    Trip {
        trip_id: TripId,
        route_id: RouteId,
        service_id: String,
        departure_time: String,
        arrival_time: String,
    },
    Walk { distance_m: f64 },
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub from: StopId,
    pub to: StopId,
    pub travel_seconds: i64,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn route_id(&self) -> Option<&RouteId> {
        match &self.kind {
            EdgeKind::Trip { route_id, .. } => Some(route_id),
            EdgeKind::Walk { .. } => None,
        }
    }

    pub fn is_walk(&self) -> bool {
        matches!(self.kind, EdgeKind::Walk { .. })
    }
}

/// One immutable multigraph build. At most one trip edge per (u, v,
/// route_id) triple survives the builder's dedup step; a (u, v) pair may
/// still carry several edges when multiple route_ids serve it, plus at
/// most one walk edge.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    pub nodes: IndexMap<StopId, StopNode>,
    pub edges: IndexMap<(StopId, StopId), Vec<Edge>>,
    pub built_at: Option<NaiveDateTime>,
}

impl GraphSnapshot {
    pub fn contains_stop(&self, stop_id: &StopId) -> bool {
        self.nodes.contains_key(stop_id)
    }

    pub fn edges_between(&self, from: &StopId, to: &StopId) -> &[Edge] {
        self.edges
            .get(&(from.clone(), to.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn stop_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}
