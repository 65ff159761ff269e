mod schedule;
mod yen;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use database::TimetableStore;
use model::leg::{Leg, Route};
use model::stop::{Stop, StopId};
use model::trip::TripId;

use crate::config::RoutingConfig;
use crate::error::CoreError;
use crate::graph::{project_simple_graph, GraphSnapshot};
use crate::time::seconds_of_day;

use schedule::ScheduleBinder;
use yen::k_shortest_simple_paths;

/// §4.H Step 2's candidate ceiling: examine at most `k * CANDIDATE_MULTIPLIER`
/// spur searches regardless of how deep Yen's algorithm would otherwise go.
const CANDIDATE_MULTIPLIER: usize = 15;

/// Finds up to `k` distinct routes from `origin` to `destination` departing
/// no earlier than `departure_dt`, against the already-built `snapshot`.
/// Implements §4.H's six steps: project to a simple graph, enumerate
/// k-shortest simple node paths, bind each to concrete trips, filter on
/// transfer limits, dedup by trip signature, then fill any shortfall by
/// re-binding the same candidate paths at a later departure time.
pub async fn find_routes<D: TimetableStore + ?Sized>(
    store: &D,
    snapshot: &GraphSnapshot,
    config: &RoutingConfig,
    origin: &StopId,
    destination: &StopId,
    departure_dt: DateTime<Utc>,
    k: usize,
) -> Result<Vec<Route>, CoreError> {
    if !snapshot.contains_stop(origin) {
        return Err(CoreError::UnknownStop(origin.raw()));
    }
    if !snapshot.contains_stop(destination) {
        return Err(CoreError::UnknownStop(destination.raw()));
    }

    let projected = project_simple_graph(snapshot);
    let origin_index = projected
        .index_of(origin)
        .ok_or_else(|| CoreError::UnknownStop(origin.raw()))?;
    let destination_index = projected
        .index_of(destination)
        .ok_or_else(|| CoreError::UnknownStop(destination.raw()))?;

    let max_candidates = (k * CANDIDATE_MULTIPLIER).max(1);
    let node_paths = k_shortest_simple_paths(
        &projected.graph,
        origin_index,
        destination_index,
        max_candidates,
        max_candidates,
    );
    if node_paths.is_empty() {
        return Err(CoreError::NoRoutes);
    }

    let stops = store.list_stops().await?;
    let stops_by_id: HashMap<StopId, Stop> = stops.into_iter().map(|stop| (stop.id.clone(), stop)).collect();

    let service_date = departure_dt.date_naive();
    let min_transfer_seconds = config.min_transfer_minutes * 60;
    let mut binder = ScheduleBinder::new(store, &stops_by_id, min_transfer_seconds, service_date);

    let target = k.min(config.max_routes).max(1);
    let mut accepted: Vec<Route> = Vec::new();
    let mut seen_signatures: Vec<Vec<TripId>> = Vec::new();

    // Step 6: each candidate node path carries its own `not_before_sec`
    // cursor, advanced to (its own last bound trip's departure + 1 second)
    // regardless of whether that candidate was ultimately accepted, so a
    // low-frequency route can't keep handing back the same trip_id forever.
    // A path is dropped once it can no longer bind at all, or once its
    // cursor runs past the end of the service day.
    let first_pass_not_before = seconds_of_day(departure_dt);
    let mut cursors: Vec<i64> = vec![first_pass_not_before; node_paths.len()];
    let mut exhausted: Vec<bool> = vec![false; node_paths.len()];

    while accepted.len() < target {
        let mut progressed = false;

        for (index, node_path) in node_paths.iter().enumerate() {
            if accepted.len() >= target {
                break;
            }
            if exhausted[index] {
                continue;
            }
            let not_before_sec = cursors[index];
            if not_before_sec > END_OF_SERVICE_DAY_SEC {
                exhausted[index] = true;
                continue;
            }

            let Some(legs) = binder.schedule_path(&projected, node_path, not_before_sec).await? else {
                exhausted[index] = true;
                continue;
            };

            match first_trip_departure_sec(&legs) {
                Some(departure_sec) => cursors[index] = departure_sec + 1,
                None => exhausted[index] = true,
            }
            progressed = true;

            let Some(route) = finalize_route(legs, config) else {
                continue;
            };
            let signature = route.trip_id_signature();
            if seen_signatures.contains(&signature) {
                continue;
            }
            seen_signatures.push(signature);
            accepted.push(route);
        }

        if !progressed {
            break;
        }
    }

    if accepted.is_empty() {
        return Err(CoreError::NoRoutes);
    }

    Ok(accepted)
}

/// Last second of the service day a trip may still depart on. Paths whose
/// cursor has advanced past this have no viable schedule left to retry.
const END_OF_SERVICE_DAY_SEC: i64 = 23 * 3600 + 59 * 60 + 59;

fn first_trip_departure_sec(legs: &[Leg]) -> Option<i64> {
    legs.iter().find_map(|leg| match leg {
        Leg::Trip(trip_leg) => Some(crate::time::parse_hms(&trip_leg.departure_time)),
        Leg::Walk(_) => None,
    })
}

/// Step 4: discards itineraries with no trip legs at all, more route_id
/// changes than `max_transfers`, or any transfer shorter than
/// `min_transfer_minutes` (a safety net — `ScheduleBinder` already bakes
/// the buffer into its trip queries, so this should never trigger in
/// practice, but a filter this cheap and this load-bearing is worth
/// keeping explicit).
fn finalize_route(legs: Vec<Leg>, config: &RoutingConfig) -> Option<Route> {
    let mut transfers = 0i32;
    let mut last_route_id = None;
    let mut has_trip_leg = false;
    let mut previous_arrival_sec: Option<i64> = None;

    for leg in &legs {
        match leg {
            Leg::Trip(trip_leg) => {
                has_trip_leg = true;
                if let Some(previous) = &last_route_id {
                    if previous != &trip_leg.route_id {
                        transfers += 1;
                    }
                }
                last_route_id = Some(trip_leg.route_id.clone());

                if let Some(arrived) = previous_arrival_sec {
                    let departed = crate::time::parse_hms(&trip_leg.departure_time);
                    let gap_minutes = (departed - arrived) as f64 / 60.0;
                    if gap_minutes < config.min_transfer_minutes as f64 {
                        return None;
                    }
                }
                previous_arrival_sec = Some(crate::time::parse_hms(&trip_leg.arrival_time));
            }
            Leg::Walk(_) => {
                // Walking resets the transfer clock but not the arrival
                // time check; the next trip's buffer is still validated
                // against whenever the prior leg actually let off.
            }
        }
    }

    if !has_trip_leg {
        return None;
    }
    if transfers > config.max_transfers {
        return None;
    }

    Some(Route { legs })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_routes_with_no_trip_legs() {
        let legs = vec![Leg::Walk(model::leg::WalkLeg {
            from_stop_id: utility::id::Id::new("A".to_owned()),
            to_stop_id: utility::id::Id::new("B".to_owned()),
            from_stop_name: "A".to_owned(),
            to_stop_name: "B".to_owned(),
            distance_m: 100.0,
            walk_seconds: 80,
        })];
        assert!(finalize_route(legs, &RoutingConfig::default()).is_none());
    }

    #[test]
    fn rejects_routes_exceeding_max_transfers() {
        let mut config = RoutingConfig::default();
        config.max_transfers = 1;
        config.min_transfer_minutes = 0;

        let make_leg = |route_id: &str, departure: &str, arrival: &str| {
            Leg::Trip(model::leg::TripLeg {
                from_stop_id: utility::id::Id::new("A".to_owned()),
                to_stop_id: utility::id::Id::new("B".to_owned()),
                from_stop_name: "A".to_owned(),
                to_stop_name: "B".to_owned(),
                trip_id: utility::id::Id::new(format!("T-{route_id}-{departure}")),
                route_id: utility::id::Id::new(route_id.to_owned()),
                service_id: "20260101".to_owned(),
                departure_time: departure.to_owned(),
                arrival_time: arrival.to_owned(),
                travel_seconds: 600,
                risk: None,
            })
        };

        let legs = vec![
            make_leg("R1", "08:00:00", "08:10:00"),
            make_leg("R2", "08:20:00", "08:30:00"),
            make_leg("R3", "08:40:00", "08:50:00"),
        ];

        assert!(finalize_route(legs, &config).is_none());
    }
}
