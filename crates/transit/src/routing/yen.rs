use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use petgraph::graphmap::DiGraphMap;

/// Cost of a node path in `graph`, assuming every consecutive pair is
/// connected by an edge (as produced by `dijkstra_excluding`/Yen's own
/// path construction).
fn path_cost(graph: &DiGraphMap<u32, i64>, path: &[u32]) -> i64 {
    path.windows(2)
        .map(|pair| *graph.edge_weight(pair[0], pair[1]).expect("path edge must exist"))
        .sum()
}

/// Dijkstra shortest path from `source` to `target`, skipping any node in
/// `excluded_nodes` (other than `source` itself) and any edge in
/// `excluded_edges`. Returns the node path including both endpoints.
fn dijkstra_excluding(
    graph: &DiGraphMap<u32, i64>,
    source: u32,
    target: u32,
    excluded_nodes: &HashSet<u32>,
    excluded_edges: &HashSet<(u32, u32)>,
) -> Option<Vec<u32>> {
    use std::collections::HashMap;

    let mut dist: HashMap<u32, i64> = HashMap::new();
    let mut prev: HashMap<u32, u32> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(source, 0);
    heap.push(Reverse((0i64, source)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == target {
            break;
        }
        if cost > *dist.get(&node).unwrap_or(&i64::MAX) {
            continue;
        }
        for (_, neighbor, weight) in graph.edges(node) {
            if excluded_nodes.contains(&neighbor) && neighbor != target {
                continue;
            }
            if excluded_edges.contains(&(node, neighbor)) {
                continue;
            }
            let next_cost = cost + *weight;
            if next_cost < *dist.get(&neighbor).unwrap_or(&i64::MAX) {
                dist.insert(neighbor, next_cost);
                prev.insert(neighbor, node);
                heap.push(Reverse((next_cost, neighbor)));
            }
        }
    }

    if !dist.contains_key(&target) {
        return None;
    }

    let mut path = vec![target];
    let mut current = target;
    while current != source {
        current = *prev.get(&current)?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}

/// Yen's k-shortest-simple-paths algorithm over a projected simple digraph.
/// Examines at most `max_candidates` spur searches to bound cost on dense
/// graphs, matching §4.H's "K·15 candidates" ceiling (the caller decides
/// the multiplier).
pub fn k_shortest_simple_paths(
    graph: &DiGraphMap<u32, i64>,
    source: u32,
    target: u32,
    k: usize,
    max_candidates: usize,
) -> Vec<Vec<u32>> {
    let Some(first) = dijkstra_excluding(graph, source, target, &HashSet::new(), &HashSet::new()) else {
        return Vec::new();
    };

    let mut found: Vec<Vec<u32>> = vec![first];
    let mut candidates: BinaryHeap<Reverse<(i64, Vec<u32>)>> = BinaryHeap::new();
    let mut considered = 0usize;

    while found.len() < k {
        let previous = found.last().unwrap().clone();

        for i in 0..previous.len().saturating_sub(1) {
            if considered >= max_candidates {
                break;
            }
            considered += 1;

            let spur_node = previous[i];
            let root_path = &previous[..=i];

            let mut excluded_edges = HashSet::new();
            for path in &found {
                if path.len() > i && path[..=i] == *root_path {
                    excluded_edges.insert((path[i], path[i + 1]));
                }
            }

            let excluded_nodes: HashSet<u32> = root_path[..i].iter().copied().collect();

            if let Some(spur_path) =
                dijkstra_excluding(graph, spur_node, target, &excluded_nodes, &excluded_edges)
            {
                let mut total_path = root_path[..i].to_vec();
                total_path.extend(spur_path);
                if !found.contains(&total_path)
                    && !candidates.iter().any(|Reverse((_, path))| path == &total_path)
                {
                    let cost = path_cost(graph, &total_path);
                    candidates.push(Reverse((cost, total_path)));
                }
            }
        }

        if considered >= max_candidates {
            break;
        }

        match candidates.pop() {
            Some(Reverse((_, path))) => found.push(path),
            None => break,
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_graph() -> DiGraphMap<u32, i64> {
        let mut graph = DiGraphMap::new();
        graph.add_edge(0, 1, 1);
        graph.add_edge(1, 2, 1);
        graph.add_edge(0, 2, 5);
        graph
    }

    #[test]
    fn finds_shortest_path_first() {
        let graph = line_graph();
        let paths = k_shortest_simple_paths(&graph, 0, 2, 2, 100);
        assert_eq!(paths[0], vec![0, 1, 2]);
    }

    #[test]
    fn finds_second_shortest_when_available() {
        let graph = line_graph();
        let paths = k_shortest_simple_paths(&graph, 0, 2, 2, 100);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[1], vec![0, 2]);
    }

    #[test]
    fn returns_empty_when_unreachable() {
        let mut graph = DiGraphMap::new();
        graph.add_node(0);
        graph.add_node(1);
        let paths = k_shortest_simple_paths(&graph, 0, 1, 3, 100);
        assert!(paths.is_empty());
    }
}
