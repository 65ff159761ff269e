use std::collections::HashMap;

use database::TimetableStore;
use indexmap::IndexMap;
use model::stop::{Stop, StopId};

use crate::config::RoutingConfig;
use crate::error::CoreError;
use crate::time::{haversine_m, parse_hms};

use super::snapshot::{Edge, EdgeKind, GraphSnapshot, StopNode};

/// Metres per degree of latitude, used for the coarse pre-filter band
/// before a precise haversine check.
const METRES_PER_DEGREE_LAT: f64 = 111_320.0;

/// Builds a fresh graph snapshot from the timetable store. Idempotent and
/// deterministic given identical input; an empty store yields an empty
/// graph rather than an error.
pub async fn build_graph(
    store: &dyn TimetableStore,
    config: &RoutingConfig,
) -> Result<GraphSnapshot, CoreError> {
    let stops = store.list_stops().await?;
    let stop_times = store.list_stop_times_with_trips().await?;

    let mut nodes = IndexMap::new();
    for stop in &stops {
        nodes.insert(
            stop.id.clone(),
            StopNode {
                name: stop.name.clone(),
                latitude: stop.latitude,
                longitude: stop.longitude,
            },
        );
    }

    let mut edges: IndexMap<(StopId, StopId), Vec<Edge>> = IndexMap::new();
    add_trip_edges(&stop_times, &mut edges);
    add_walk_edges(&stops, config, &mut edges);

    Ok(GraphSnapshot {
        nodes,
        edges,
        built_at: None,
    })
}

fn add_trip_edges(
    stop_times: &[(model::trip::Trip, model::trip::StopTime)],
    edges: &mut IndexMap<(StopId, StopId), Vec<Edge>>,
) {
    // Key: (from_stop, to_stop, route_id) -> winning (travel_seconds, edge).
    let mut best: IndexMap<(StopId, StopId, model::route::RouteId), (i64, Edge)> = IndexMap::new();

    for window in stop_times.windows(2) {
        let [(trip_a, a), (trip_b, b)] = window else {
            continue;
        };
        if a.trip_id != b.trip_id {
            continue;
        }
        let departure = parse_hms(&a.departure_time);
        let arrival = parse_hms(&b.arrival_time);
        let travel_seconds = (arrival - departure).max(0);

        let key = (a.stop_id.clone(), b.stop_id.clone(), trip_a.route_id.clone());
        let candidate = Edge {
            from: a.stop_id.clone(),
            to: b.stop_id.clone(),
            travel_seconds,
            kind: EdgeKind::Trip {
                trip_id: a.trip_id.clone(),
                route_id: trip_a.route_id.clone(),
                service_id: trip_b.service_id.clone(),
                departure_time: a.departure_time.clone(),
                arrival_time: b.arrival_time.clone(),
            },
        };

        match best.get(&key) {
            Some((existing_travel, _)) if *existing_travel <= travel_seconds => {}
            _ => {
                best.insert(key, (travel_seconds, candidate));
            }
        }
    }

    for ((from, to, _route_id), (_, edge)) in best {
        edges.entry((from, to)).or_default().push(edge);
    }
}

fn add_walk_edges(
    stops: &[Stop],
    config: &RoutingConfig,
    edges: &mut IndexMap<(StopId, StopId), Vec<Edge>>,
) {
    let max_walk_metres = config.max_walk_metres;
    let walk_speed_mps = config.walk_speed_mps();

    let mut by_latitude: Vec<&Stop> = stops.iter().collect();
    by_latitude.sort_by(|a, b| a.latitude.partial_cmp(&b.latitude).unwrap());

    let delta_lat = max_walk_metres / METRES_PER_DEGREE_LAT;

    for stop_a in &by_latitude {
        let lower = stop_a.latitude - delta_lat;
        let upper = stop_a.latitude + delta_lat;
        let start = by_latitude.partition_point(|s| s.latitude < lower);
        let end = by_latitude.partition_point(|s| s.latitude <= upper);

        let cos_lat = stop_a.latitude.to_radians().cos();
        let delta_lon = if cos_lat.abs() > f64::EPSILON {
            max_walk_metres / (METRES_PER_DEGREE_LAT * cos_lat)
        } else {
            180.0
        };

        for stop_b in &by_latitude[start..end] {
            if stop_a.id == stop_b.id {
                continue;
            }
            if (stop_a.longitude - stop_b.longitude).abs() > delta_lon.abs() {
                continue;
            }
            let distance_m = haversine_m(
                stop_a.latitude,
                stop_a.longitude,
                stop_b.latitude,
                stop_b.longitude,
            );
            if distance_m > max_walk_metres {
                continue;
            }
            let walk_seconds = (distance_m / walk_speed_mps).floor() as i64;
            edges
                .entry((stop_a.id.clone(), stop_b.id.clone()))
                .or_default()
                .push(Edge {
                    from: stop_a.id.clone(),
                    to: stop_b.id.clone(),
                    travel_seconds: walk_seconds,
                    kind: EdgeKind::Walk { distance_m },
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::trip::{StopTime, Trip};
    use utility::id::Id;

    fn stop(id: &str, lat: f64, lon: f64) -> Stop {
        Stop {
            id: Id::new(id.to_owned()),
            name: id.to_owned(),
            latitude: lat,
            longitude: lon,
        }
    }

    #[test]
    fn walk_edges_respect_radius_and_are_bidirectional() {
        let stops = vec![stop("a", 52.5, 13.4), stop("b", 52.5001, 13.4)];
        let config = RoutingConfig {
            max_walk_metres: 500.0,
            ..RoutingConfig::default()
        };
        let mut edges = IndexMap::new();
        add_walk_edges(&stops, &config, &mut edges);

        let forward = edges.get(&(Id::new("a".to_owned()), Id::new("b".to_owned())));
        let backward = edges.get(&(Id::new("b".to_owned()), Id::new("a".to_owned())));
        assert!(forward.is_some());
        assert!(backward.is_some());
        for edge in forward.unwrap() {
            assert!(edge.is_walk());
        }
    }

    #[test]
    fn far_apart_stops_get_no_walk_edge() {
        let stops = vec![stop("a", 52.5, 13.4), stop("b", 53.5, 9.9)];
        let config = RoutingConfig::default();
        let mut edges = IndexMap::new();
        add_walk_edges(&stops, &config, &mut edges);
        assert!(edges.is_empty());
    }

    #[test]
    fn trip_edges_dedup_to_minimum_travel_per_route() {
        let trip_fast = Trip {
            id: Id::new("fast".to_owned()),
            route_id: Id::new("R1".to_owned()),
            service_id: "20260209".to_owned(),
            headsign: None,
            direction: None,
        };
        let trip_slow = Trip {
            id: Id::new("slow".to_owned()),
            route_id: Id::new("R1".to_owned()),
            service_id: "20260209".to_owned(),
            headsign: None,
            direction: None,
        };
        let stop_times = vec![
            (
                trip_fast.clone(),
                StopTime {
                    trip_id: trip_fast.id.clone(),
                    stop_id: Id::new("a".to_owned()),
                    stop_sequence: 1,
                    arrival_time: "08:00:00".to_owned(),
                    departure_time: "08:00:00".to_owned(),
                },
            ),
            (
                trip_fast.clone(),
                StopTime {
                    trip_id: trip_fast.id.clone(),
                    stop_id: Id::new("b".to_owned()),
                    stop_sequence: 2,
                    arrival_time: "08:05:00".to_owned(),
                    departure_time: "08:05:00".to_owned(),
                },
            ),
            (
                trip_slow.clone(),
                StopTime {
                    trip_id: trip_slow.id.clone(),
                    stop_id: Id::new("a".to_owned()),
                    stop_sequence: 1,
                    arrival_time: "09:00:00".to_owned(),
                    departure_time: "09:00:00".to_owned(),
                },
            ),
            (
                trip_slow.clone(),
                StopTime {
                    trip_id: trip_slow.id.clone(),
                    stop_id: Id::new("b".to_owned()),
                    stop_sequence: 2,
                    arrival_time: "09:20:00".to_owned(),
                    departure_time: "09:20:00".to_owned(),
                },
            ),
        ];
        let mut edges = IndexMap::new();
        add_trip_edges(&stop_times, &mut edges);
        let key = (Id::new("a".to_owned()), Id::new("b".to_owned()));
        let winners = edges.get(&key).unwrap();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].travel_seconds, 300);
    }
}
