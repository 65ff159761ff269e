//! Deterministic fixtures for exercising `transit` end to end without a
//! database: an in-memory `TimetableStore` plus helpers for building small
//! stop/trip networks. Used by `tests/scenarios.rs` and by other crates'
//! integration tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use database::{DepartureCount, EarliestTripQuery, StoreError, TimetableStore};
use model::calendar::{ServiceCalendar, ServiceCalendarDate};
use model::reliability::{ReliabilityRecord, TimeBucket};
use model::route::Route;
use model::stop::Stop;
use model::trip::{StopTime, Trip};

use crate::time::parse_hms;

/// A fixed-content, fully in-memory `TimetableStore`. Reads never fail;
/// writes are serialized behind a `std::sync::Mutex` since fixtures are
/// small and tests never contend on it meaningfully.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<InMemoryState>,
}

#[derive(Default)]
struct InMemoryState {
    stops: Vec<Stop>,
    routes: Vec<Route>,
    trips: Vec<Trip>,
    stop_times: Vec<StopTime>,
    reliability: HashMap<(String, String, TimeBucket), ReliabilityRecord>,
}

impl InMemoryStore {
    pub fn new(stops: Vec<Stop>, routes: Vec<Route>, trips: Vec<Trip>, stop_times: Vec<StopTime>) -> Self {
        Self {
            inner: Mutex::new(InMemoryState {
                stops,
                routes,
                trips,
                stop_times,
                reliability: HashMap::new(),
            }),
        }
    }
}

#[async_trait]
impl TimetableStore for InMemoryStore {
    async fn list_stops(&self) -> Result<Vec<Stop>, StoreError> {
        Ok(self.inner.lock().unwrap().stops.clone())
    }

    async fn list_routes(&self) -> Result<Vec<Route>, StoreError> {
        Ok(self.inner.lock().unwrap().routes.clone())
    }

    async fn list_stop_times_with_trips(&self) -> Result<Vec<(Trip, StopTime)>, StoreError> {
        let state = self.inner.lock().unwrap();
        let trips_by_id: HashMap<_, _> = state.trips.iter().map(|trip| (trip.id.clone(), trip.clone())).collect();
        let mut rows: Vec<(Trip, StopTime)> = state
            .stop_times
            .iter()
            .filter_map(|st| trips_by_id.get(&st.trip_id).map(|trip| (trip.clone(), st.clone())))
            .collect();
        rows.sort_by(|(trip_a, a), (trip_b, b)| (trip_a.id.raw(), a.stop_sequence).cmp(&(trip_b.id.raw(), b.stop_sequence)));
        Ok(rows)
    }

    async fn earliest_trip(&self, query: EarliestTripQuery<'_>) -> Result<Option<String>, StoreError> {
        let state = self.inner.lock().unwrap();
        let candidate_trip_ids: Vec<String> = state
            .trips
            .iter()
            .filter(|trip| trip.route_id.raw() == query.route_id && trip.service_id == query.service_id)
            .map(|trip| trip.id.raw())
            .collect();

        let mut best: Option<(i64, String)> = None;
        for trip_id in candidate_trip_ids {
            let mut rows: Vec<&StopTime> = state.stop_times.iter().filter(|st| st.trip_id.raw() == trip_id).collect();
            rows.sort_by_key(|row| row.stop_sequence);

            let Some(first) = rows.iter().find(|row| row.stop_id.raw() == query.first_stop_id) else {
                continue;
            };
            let departure_sec = parse_hms(&first.departure_time);
            if departure_sec < query.not_before_sec {
                continue;
            }
            let serves_last = rows
                .iter()
                .any(|row| row.stop_id.raw() == query.last_stop_id && row.stop_sequence > first.stop_sequence);
            if !serves_last {
                continue;
            }
            if best.as_ref().map(|(sec, _)| departure_sec < *sec).unwrap_or(true) {
                best = Some((departure_sec, trip_id));
            }
        }
        Ok(best.map(|(_, trip_id)| trip_id))
    }

    async fn stop_times_for_trip(&self, trip_id: &str) -> Result<Vec<StopTime>, StoreError> {
        let state = self.inner.lock().unwrap();
        let mut rows: Vec<StopTime> = state
            .stop_times
            .iter()
            .filter(|st| st.trip_id.raw() == trip_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.stop_sequence);
        Ok(rows)
    }

    async fn upsert_reliability_record(&self, record: &ReliabilityRecord) -> Result<(), StoreError> {
        let mut state = self.inner.lock().unwrap();
        state
            .reliability
            .insert((record.route_id.raw(), record.stop_id.raw(), record.bucket), record.clone());
        Ok(())
    }

    async fn reliability_record(
        &self,
        route_id: &str,
        stop_id: &str,
        bucket: TimeBucket,
    ) -> Result<Option<ReliabilityRecord>, StoreError> {
        let state = self.inner.lock().unwrap();
        Ok(state.reliability.get(&(route_id.to_owned(), stop_id.to_owned(), bucket)).cloned())
    }

    async fn service_date_bounds(&self) -> Result<Option<(NaiveDate, NaiveDate)>, StoreError> {
        let state = self.inner.lock().unwrap();
        let dates: Vec<NaiveDate> = state
            .trips
            .iter()
            .filter_map(|trip| NaiveDate::parse_from_str(&trip.service_id, "%Y%m%d").ok())
            .collect();
        Ok(dates.iter().min().zip(dates.iter().max()).map(|(min, max)| (*min, *max)))
    }

    async fn scheduled_departure_counts(
        &self,
        _window_start: NaiveDate,
        _window_end: NaiveDate,
    ) -> Result<Vec<DepartureCount>, StoreError> {
        Ok(Vec::new())
    }

    async fn trip_count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.lock().unwrap().trips.len() as i64)
    }

    async fn reliability_record_count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.lock().unwrap().reliability.len() as i64)
    }

    async fn replace_static_feed(
        &self,
        stops: &[Stop],
        routes: &[Route],
        trips: &[Trip],
        stop_times: &[StopTime],
        _calendars: &[ServiceCalendar],
        _calendar_dates: &[ServiceCalendarDate],
    ) -> Result<(), StoreError> {
        let mut state = self.inner.lock().unwrap();
        state.stops = stops.to_vec();
        state.routes = routes.to_vec();
        state.trips = trips.to_vec();
        state.stop_times = stop_times.to_vec();
        Ok(())
    }
}

pub fn stop(id: &str, name: &str, lat: f64, lon: f64) -> Stop {
    Stop {
        id: utility::id::Id::new(id.to_owned()),
        name: name.to_owned(),
        latitude: lat,
        longitude: lon,
    }
}

pub fn trip(id: &str, route_id: &str, service_id: &str) -> Trip {
    Trip {
        id: utility::id::Id::new(id.to_owned()),
        route_id: utility::id::Id::new(route_id.to_owned()),
        service_id: service_id.to_owned(),
        headsign: None,
        direction: None,
    }
}

pub fn stop_time(trip_id: &str, stop_id: &str, sequence: i32, arrival: &str, departure: &str) -> StopTime {
    StopTime {
        trip_id: utility::id::Id::new(trip_id.to_owned()),
        stop_id: utility::id::Id::new(stop_id.to_owned()),
        stop_sequence: sequence,
        arrival_time: arrival.to_owned(),
        departure_time: departure.to_owned(),
    }
}
