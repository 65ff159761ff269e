pub mod builder;
pub mod cache;
pub mod snapshot;

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use petgraph::graphmap::DiGraphMap;

use model::route::RouteId;
use model::stop::StopId;

pub use builder::build_graph;
pub use cache::GraphCache;
pub use snapshot::{Edge, EdgeKind, GraphSnapshot, StopNode};

/// A simple (non-multi) directed graph projected from a `GraphSnapshot` by
/// retaining only the minimum-weight edge per (u, v) pair. `petgraph`'s
/// `DiGraphMap` needs a `Copy` node type, so stop ids are interned to
/// small integers via `stops`; `winner_of` recovers the original edge
/// (and therefore its trip/walk kind and route_id) for a projected arc.
pub struct ProjectedGraph {
    pub stops: IndexSet<StopId>,
    pub graph: DiGraphMap<u32, i64>,
    winners: HashMap<(u32, u32), Edge>,
}

impl ProjectedGraph {
    pub fn index_of(&self, stop_id: &StopId) -> Option<u32> {
        self.stops.get_index_of(stop_id).map(|i| i as u32)
    }

    pub fn stop_id_at(&self, index: u32) -> &StopId {
        self.stops
            .get_index(index as usize)
            .expect("projected graph index out of bounds")
    }

    pub fn winner_of(&self, from: u32, to: u32) -> Option<&Edge> {
        self.winners.get(&(from, to))
    }
}

/// Step 1 of the routing engine (§4.H): collapse the multigraph to a
/// simple digraph, keeping the winning edge's full metadata alongside so
/// schedule binding can recover whether it was a trip or walk edge.
pub fn project_simple_graph(snapshot: &GraphSnapshot) -> ProjectedGraph {
    let mut stops: IndexSet<StopId> = IndexSet::new();
    for stop_id in snapshot.nodes.keys() {
        stops.insert(stop_id.clone());
    }

    let mut graph = DiGraphMap::new();
    for index in 0..stops.len() as u32 {
        graph.add_node(index);
    }

    let mut by_from: HashMap<&StopId, Vec<&Edge>> = HashMap::new();
    for candidates in snapshot.edges.values() {
        for edge in candidates {
            by_from.entry(&edge.from).or_default().push(edge);
        }
    }

    let mut winners: HashMap<(u32, u32), Edge> = HashMap::new();
    for ((from, to), candidates) in &snapshot.edges {
        let Some(best) = pick_winner(candidates, &by_from) else {
            continue;
        };
        let from_index = stops.get_index_of(from).expect("edge endpoint not a known stop");
        let to_index = stops.get_index_of(to).expect("edge endpoint not a known stop");
        let (from_index, to_index) = (from_index as u32, to_index as u32);
        graph.add_edge(from_index, to_index, best.travel_seconds);
        winners.insert((from_index, to_index), best.clone());
    }

    ProjectedGraph {
        stops,
        graph,
        winners,
    }
}

/// Picks the minimum-weight edge for a (u, v) pair. When several route_ids
/// tie on weight, §4.H breaks the tie by picking whichever route extends
/// farthest as a contiguous run from `v`, so the schedule binder is more
/// likely to bind a single trip across several hops instead of transferring
/// at every stop.
fn pick_winner<'a>(candidates: &'a [Edge], by_from: &HashMap<&StopId, Vec<&Edge>>) -> Option<&'a Edge> {
    let min_weight = candidates.iter().map(|edge| edge.travel_seconds).min()?;
    let tied: Vec<&Edge> = candidates.iter().filter(|edge| edge.travel_seconds == min_weight).collect();
    if tied.len() == 1 {
        return Some(tied[0]);
    }
    tied.into_iter().max_by_key(|edge| edge.route_id().map(|route_id| run_extent(by_from, &edge.to, route_id)).unwrap_or(0))
}

/// Counts how many further consecutive hops `route_id` serves starting from
/// `start`, by repeatedly following the one outgoing edge (if any) tagged
/// with the same route. Stops on a cycle back to an already-visited stop
/// rather than looping forever.
fn run_extent(by_from: &HashMap<&StopId, Vec<&Edge>>, start: &StopId, route_id: &RouteId) -> usize {
    let mut current = start;
    let mut visited: HashSet<StopId> = HashSet::new();
    let mut length = 0usize;

    while visited.insert(current.clone()) {
        let Some(edges) = by_from.get(current) else {
            break;
        };
        let Some(next_edge) = edges.iter().find(|edge| edge.route_id() == Some(route_id)) else {
            break;
        };
        length += 1;
        current = &next_edge.to;
    }

    length
}
