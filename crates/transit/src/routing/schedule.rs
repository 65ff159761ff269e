use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use database::{EarliestTripQuery, StoreError, TimetableStore};
use model::leg::{Leg, TripLeg, WalkLeg};
use model::route::RouteId;
use model::stop::{Stop, StopId};
use model::trip::StopTime;

use crate::error::CoreError;
use crate::graph::{EdgeKind, ProjectedGraph};
use crate::time::parse_hms;

/// Binds a single abstract node path to concrete trips on `service_date`,
/// starting no earlier than `departure_sec` (seconds past midnight).
/// Owns its memo caches for the duration of one call, as §4.H requires: a
/// path that fails to bind (no trip serves a run at all) yields `Ok(None)`
/// rather than an error, so the caller can simply discard that candidate.
pub struct ScheduleBinder<'a, D: TimetableStore + ?Sized> {
    store: &'a D,
    stops_by_id: &'a HashMap<StopId, Stop>,
    min_transfer_seconds: i64,
    service_date: NaiveDate,
    earliest_trip_cache: HashMap<(String, String, String, i64), Option<String>>,
    stop_times_cache: HashMap<String, Arc<Vec<StopTime>>>,
}

impl<'a, D: TimetableStore + ?Sized> ScheduleBinder<'a, D> {
    pub fn new(
        store: &'a D,
        stops_by_id: &'a HashMap<StopId, Stop>,
        min_transfer_seconds: i64,
        service_date: NaiveDate,
    ) -> Self {
        Self {
            store,
            stops_by_id,
            min_transfer_seconds,
            service_date,
            earliest_trip_cache: HashMap::new(),
            stop_times_cache: HashMap::new(),
        }
    }

    fn stop_name(&self, stop_id: &StopId) -> String {
        self.stops_by_id
            .get(stop_id)
            .map(|stop| stop.name.clone())
            .unwrap_or_else(|| stop_id.raw())
    }

    async fn earliest_trip(
        &mut self,
        route_id: &str,
        first_stop_id: &str,
        last_stop_id: &str,
        not_before_sec: i64,
    ) -> Result<Option<String>, StoreError> {
        let key = (
            route_id.to_owned(),
            first_stop_id.to_owned(),
            last_stop_id.to_owned(),
            not_before_sec,
        );
        if let Some(hit) = self.earliest_trip_cache.get(&key) {
            return Ok(hit.clone());
        }
        let service_id = self.service_date.format("%Y%m%d").to_string();
        let trip_id = self
            .store
            .earliest_trip(EarliestTripQuery {
                route_id,
                service_id: &service_id,
                first_stop_id,
                last_stop_id,
                not_before_sec,
            })
            .await?;
        self.earliest_trip_cache.insert(key, trip_id.clone());
        Ok(trip_id)
    }

    async fn stop_times(&mut self, trip_id: &str) -> Result<Arc<Vec<StopTime>>, StoreError> {
        if let Some(hit) = self.stop_times_cache.get(trip_id) {
            return Ok(Arc::clone(hit));
        }
        let rows = Arc::new(self.store.stop_times_for_trip(trip_id).await?);
        self.stop_times_cache.insert(trip_id.to_owned(), Arc::clone(&rows));
        Ok(rows)
    }

    /// Binds `node_path` (a sequence of stop indices from a `ProjectedGraph`)
    /// starting at `not_before_sec`. Maximal contiguous runs that share a
    /// `route_id` are bound to a single trip spanning the whole run, rather
    /// than one trip per edge, so a path riding a single vehicle through
    /// several stops does not get counted as multiple route changes.
    pub async fn schedule_path(
        &mut self,
        projected: &ProjectedGraph,
        node_path: &[u32],
        not_before_sec: i64,
    ) -> Result<Option<Vec<Leg>>, CoreError> {
        if node_path.len() < 2 {
            return Ok(None);
        }

        let mut legs = Vec::new();
        let mut cursor_sec = not_before_sec;
        let mut i = 0usize;

        while i < node_path.len() - 1 {
            let Some(edge) = projected.winner_of(node_path[i], node_path[i + 1]) else {
                return Ok(None);
            };

            match &edge.kind {
                EdgeKind::Walk { distance_m } => {
                    legs.push(Leg::Walk(self.walk_leg(projected, node_path[i], node_path[i + 1], *distance_m, edge.travel_seconds)));
                    cursor_sec += edge.travel_seconds;
                    i += 1;
                }
                EdgeKind::Trip { route_id, .. } => {
                    let run_route_id = route_id.clone();
                    let run_start = i;
                    let mut run_end = i + 1;
                    while run_end < node_path.len() - 1 {
                        let Some(next_edge) = projected.winner_of(node_path[run_end], node_path[run_end + 1]) else {
                            break;
                        };
                        match &next_edge.kind {
                            EdgeKind::Trip { route_id: next_route, .. } if *next_route == run_route_id => {
                                run_end += 1;
                            }
                            _ => break,
                        }
                    }

                    // The boarding buffer applies to every transfer into a
                    // trip, whether the previous leg was another trip or a
                    // walk; the very first leg of the itinerary needs none.
                    let query_not_before = if legs.is_empty() {
                        cursor_sec
                    } else {
                        cursor_sec + self.min_transfer_seconds
                    };

                    let Some((run_legs, arrival_sec)) = self
                        .bind_trip_run(projected, node_path, run_start, run_end, &run_route_id, query_not_before)
                        .await?
                    else {
                        return Ok(None);
                    };

                    legs.extend(run_legs.into_iter().map(Leg::Trip));
                    cursor_sec = arrival_sec;
                    i = run_end;
                }
            }
        }

        Ok(Some(legs))
    }

    fn walk_leg(&self, projected: &ProjectedGraph, from: u32, to: u32, distance_m: f64, walk_seconds: i64) -> WalkLeg {
        let from_stop_id = projected.stop_id_at(from).clone();
        let to_stop_id = projected.stop_id_at(to).clone();
        WalkLeg {
            from_stop_name: self.stop_name(&from_stop_id),
            to_stop_name: self.stop_name(&to_stop_id),
            from_stop_id,
            to_stop_id,
            distance_m,
            walk_seconds,
        }
    }

    /// Binds one trip to the whole run, then emits one `TripLeg` per
    /// consecutive stop pair in `node_path[run_start..=run_end]` rather than
    /// a single leg spanning the run, so each boarding/alighting pair keeps
    /// its own real times. Fails the candidate if the trip does not actually
    /// serve every intermediate stop in the run, not just its endpoints.
    async fn bind_trip_run(
        &mut self,
        projected: &ProjectedGraph,
        node_path: &[u32],
        run_start: usize,
        run_end: usize,
        route_id: &RouteId,
        not_before_sec: i64,
    ) -> Result<Option<(Vec<TripLeg>, i64)>, CoreError> {
        let first_stop_id = projected.stop_id_at(node_path[run_start]).clone();
        let last_stop_id = projected.stop_id_at(node_path[run_end]).clone();

        let route_id_raw = route_id.raw();
        let trip_id = self
            .earliest_trip(&route_id_raw, &first_stop_id.raw(), &last_stop_id.raw(), not_before_sec)
            .await?;
        let Some(trip_id) = trip_id else {
            return Ok(None);
        };

        let stop_times = self.stop_times(&trip_id).await?;

        let mut run_rows = Vec::with_capacity(run_end - run_start + 1);
        for &node in &node_path[run_start..=run_end] {
            let stop_id = projected.stop_id_at(node).clone();
            let Some(row) = stop_times.iter().find(|row| row.stop_id == stop_id) else {
                return Ok(None);
            };
            run_rows.push((stop_id, row.arrival_time.clone(), row.departure_time.clone()));
        }

        let service_id = self.service_date.format("%Y%m%d").to_string();
        let mut legs = Vec::with_capacity(run_rows.len() - 1);
        let mut arrival_sec = not_before_sec;

        for pair in run_rows.windows(2) {
            let (from_stop_id, _, departure_time) = &pair[0];
            let (to_stop_id, arrival_time, _) = &pair[1];

            arrival_sec = parse_hms(arrival_time);
            let travel_seconds = (arrival_sec - parse_hms(departure_time)).max(0);

            legs.push(TripLeg {
                from_stop_name: self.stop_name(from_stop_id),
                to_stop_name: self.stop_name(to_stop_id),
                from_stop_id: from_stop_id.clone(),
                to_stop_id: to_stop_id.clone(),
                trip_id: utility::id::Id::new(trip_id.clone()),
                route_id: route_id.clone(),
                service_id: service_id.clone(),
                departure_time: departure_time.clone(),
                arrival_time: arrival_time.clone(),
                travel_seconds,
                risk: None,
            });
        }

        Ok(Some((legs, arrival_sec)))
    }
}
