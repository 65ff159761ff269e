use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::{Duration, NaiveDate};

use model::calendar::{ServiceCalendar, ServiceCalendarDate, ServiceExceptionType};
use model::route::Route;
use model::stop::Stop;
use model::trip::{StopTime, Trip};
use utility::id::Id;

/// How far ahead of `horizon_start` a static ingest materializes concrete
/// trip occurrences. A full feed's calendar can cover years; the core only
/// ever needs "does a trip run on date X" for dates actually queryable in
/// the near future, so unrolling the whole calendar would be wasted work.
pub const STATIC_INGEST_HORIZON_DAYS: i64 = 14;

/// Everything `database::TimetableStore::replace_static_feed` needs, ready
/// to upsert. `trips`/`stop_times` are already materialized per concrete
/// service date: one row per (original GTFS trip, occurrence date), with
/// `service_id` set to that date's YYYYMMDD form per §3's "service_id is a
/// calendar key" convention.
#[derive(Debug, Default)]
pub struct StaticFeed {
    pub stops: Vec<Stop>,
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
    pub calendars: Vec<ServiceCalendar>,
    pub calendar_dates: Vec<ServiceCalendarDate>,
}

/// Reads a GTFS static feed already extracted into `dir` (see
/// `download_gtfs`) and materializes it against the `[horizon_start,
/// horizon_start + horizon_days)` window.
///
/// Trips referencing an unknown route, and stop_times referencing an
/// unknown trip or a stop without coordinates, are dropped — mirroring the
/// original ingestion's "skip rows with dangling foreign keys" behavior.
pub fn load_directory(
    dir: &Path,
    horizon_start: NaiveDate,
    horizon_days: i64,
) -> Result<StaticFeed, Box<dyn std::error::Error + Send + Sync>> {
    let raw_stops: Vec<crate::data_model::stops::Stop> = read_csv(&dir.join("stops.txt"))?;
    let stops: Vec<Stop> = raw_stops.iter().filter_map(|s| s.to_core()).collect();
    let valid_stop_ids: HashSet<String> = stops.iter().map(|s| s.id.raw()).collect();

    let raw_routes: Vec<crate::data_model::routes::Route> = read_csv(&dir.join("routes.txt"))?;
    let valid_route_ids: HashSet<String> = raw_routes.iter().map(|r| r.id.raw()).collect();
    let routes: Vec<Route> = raw_routes.iter().map(|r| r.to_core()).collect();

    let calendars: Vec<ServiceCalendar> =
        read_csv_optional::<crate::data_model::calendar::CalendarRow>(&dir.join("calendar.txt"))?
            .iter()
            .map(|row| row.to_core())
            .collect();
    let calendar_dates: Vec<ServiceCalendarDate> = read_csv_optional::<
        crate::data_model::calendar_dates::CalendarDate,
    >(&dir.join("calendar_dates.txt"))?
    .iter()
    .map(|row| row.to_core())
    .collect();

    let horizon_end = horizon_start + Duration::days(horizon_days - 1);
    let occurrences = expand_service_dates(&calendars, &calendar_dates, horizon_start, horizon_end);

    let raw_trips: Vec<crate::data_model::trips::Trip> = read_csv(&dir.join("trips.txt"))?;
    let valid_trips: HashMap<String, &crate::data_model::trips::Trip> = raw_trips
        .iter()
        .filter(|trip| valid_route_ids.contains(&trip.route_id.raw()))
        .map(|trip| (trip.id.raw(), trip))
        .collect();

    let raw_stop_times: Vec<crate::data_model::stop_times::StopTime> =
        read_csv(&dir.join("stop_times.txt"))?;
    let mut stop_times_by_trip: HashMap<String, Vec<StopTime>> = HashMap::new();
    for row in &raw_stop_times {
        let trip_id = row.trip_id.raw();
        if !valid_trips.contains_key(&trip_id) {
            continue;
        }
        let Some(core_row) = row.to_core() else {
            continue;
        };
        if !valid_stop_ids.contains(&core_row.stop_id.raw()) {
            continue;
        }
        stop_times_by_trip.entry(trip_id).or_default().push(core_row);
    }

    let mut trips = Vec::new();
    let mut stop_times = Vec::new();
    for (trip_id, trip) in &valid_trips {
        let Some(dates) = occurrences.get(&trip.service_id) else {
            continue;
        };
        let Some(rows) = stop_times_by_trip.get(trip_id) else {
            continue;
        };
        for date in dates {
            let service_date = date.format("%Y%m%d").to_string();
            let occurrence_id = format!("{trip_id}::{service_date}");

            let mut occurrence_trip = trip.to_core(&service_date);
            occurrence_trip.id = Id::new(occurrence_id.clone());
            trips.push(occurrence_trip);

            for row in rows {
                let mut occurrence_row = row.clone();
                occurrence_row.trip_id = Id::new(occurrence_id.clone());
                stop_times.push(occurrence_row);
            }
        }
    }

    Ok(StaticFeed {
        stops,
        routes,
        trips,
        stop_times,
        calendars,
        calendar_dates,
    })
}

/// Concrete dates within `[horizon_start, horizon_end]` each `service_id`
/// runs on, combining the weekly `calendar.txt` mask with per-date
/// `calendar_dates.txt` add/remove exceptions.
fn expand_service_dates(
    calendars: &[ServiceCalendar],
    calendar_dates: &[ServiceCalendarDate],
    horizon_start: NaiveDate,
    horizon_end: NaiveDate,
) -> HashMap<String, HashSet<NaiveDate>> {
    let mut occurrences: HashMap<String, HashSet<NaiveDate>> = HashMap::new();

    let mut date = horizon_start;
    while date <= horizon_end {
        for calendar in calendars {
            if calendar.runs_on(date) {
                occurrences.entry(calendar.service_id.clone()).or_default().insert(date);
            }
        }
        date += Duration::days(1);
    }

    for exception in calendar_dates {
        if exception.date < horizon_start || exception.date > horizon_end {
            continue;
        }
        let dates = occurrences.entry(exception.service_id.clone()).or_default();
        match exception.exception_type {
            ServiceExceptionType::Added => {
                dates.insert(exception.date);
            }
            ServiceExceptionType::Removed => {
                dates.remove(&exception.date);
            }
        }
    }

    occurrences
}

fn read_csv<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

fn read_csv_optional<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    read_csv(path)
}
