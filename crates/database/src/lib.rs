use std::env;

use async_trait::async_trait;
use chrono::NaiveDate;
use model::calendar::{ServiceCalendar, ServiceCalendarDate};
use model::reliability::{ReliabilityRecord, TimeBucket};
use model::route::Route;
use model::stop::Stop;
use model::trip::{StopTime, Trip};

pub mod queries;

#[derive(Debug)]
pub enum StoreError {
    NotFound,
    Other(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(why: sqlx::Error) -> Self {
        convert_error(why)
    }
}

fn convert_error(why: sqlx::Error) -> StoreError {
    match why {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        _ => StoreError::Other(why),
    }
}

/// A point query for the next matching departure: the earliest trip on
/// `route_id` running on `service_id` that serves `first_stop_id` no
/// earlier than `not_before_sec` and also serves `last_stop_id` later in
/// its sequence.
pub struct EarliestTripQuery<'a> {
    pub route_id: &'a str,
    pub service_id: &'a str,
    pub first_stop_id: &'a str,
    pub last_stop_id: &'a str,
    pub not_before_sec: i64,
}

/// Scheduled-departure volume for one `(route_id, stop_id, hour-of-day)`
/// bucket within a date window, the raw material `transit::reliability`
/// turns into per-bucket rates.
pub struct DepartureCount {
    pub route_id: String,
    pub stop_id: String,
    pub bucket: TimeBucket,
    pub scheduled_departures: i64,
}

/// Abstract read/write access to stops, trips, stop_times, calendars and
/// reliability records. The core never touches `sqlx` directly; it is
/// handed a `&dyn TimetableStore` so `transit::graph`/`transit::reliability`
/// stay storage-agnostic and testable against an in-memory fake.
#[async_trait]
pub trait TimetableStore: Send + Sync {
    async fn list_stops(&self) -> Result<Vec<Stop>, StoreError>;

    async fn list_routes(&self) -> Result<Vec<Route>, StoreError>;

    /// All stop_times, ordered by `(trip_id, stop_sequence)`, each joined
    /// with its trip's `route_id` and `service_id`.
    async fn list_stop_times_with_trips(
        &self,
    ) -> Result<Vec<(Trip, StopTime)>, StoreError>;

    async fn earliest_trip(
        &self,
        query: EarliestTripQuery<'_>,
    ) -> Result<Option<String>, StoreError>;

    async fn stop_times_for_trip(&self, trip_id: &str) -> Result<Vec<StopTime>, StoreError>;

    async fn upsert_reliability_record(
        &self,
        record: &ReliabilityRecord,
    ) -> Result<(), StoreError>;

    async fn reliability_record(
        &self,
        route_id: &str,
        stop_id: &str,
        bucket: TimeBucket,
    ) -> Result<Option<ReliabilityRecord>, StoreError>;

    /// Min/max service date over all ingested trips, used to bound the
    /// reliability seeding window.
    async fn service_date_bounds(&self) -> Result<Option<(NaiveDate, NaiveDate)>, StoreError>;

    async fn scheduled_departure_counts(
        &self,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<Vec<DepartureCount>, StoreError>;

    async fn trip_count(&self) -> Result<i64, StoreError>;

    async fn reliability_record_count(&self) -> Result<i64, StoreError>;

    async fn replace_static_feed(
        &self,
        stops: &[Stop],
        routes: &[Route],
        trips: &[Trip],
        stop_times: &[StopTime],
        calendars: &[ServiceCalendar],
        calendar_dates: &[ServiceCalendarDate],
    ) -> Result<(), StoreError>;
}

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(crate) fn postgres_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

#[derive(Clone)]
pub struct PgTimetableStore {
    pool: sqlx::PgPool,
}

impl PgTimetableStore {
    pub async fn connect(
        connection_info: &DatabaseConnectionInfo,
    ) -> Result<Self, sqlx::Error> {
        let pool = sqlx::postgres::PgPool::connect(&connection_info.postgres_url()).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl TimetableStore for PgTimetableStore {
    async fn list_stops(&self) -> Result<Vec<Stop>, StoreError> {
        queries::stop::list(&self.pool).await.map_err(convert_error)
    }

    async fn list_routes(&self) -> Result<Vec<Route>, StoreError> {
        queries::route::list(&self.pool).await.map_err(convert_error)
    }

    async fn list_stop_times_with_trips(
        &self,
    ) -> Result<Vec<(Trip, StopTime)>, StoreError> {
        queries::stop_time::list_with_trips(&self.pool)
            .await
            .map_err(convert_error)
    }

    async fn earliest_trip(
        &self,
        query: EarliestTripQuery<'_>,
    ) -> Result<Option<String>, StoreError> {
        queries::trip::earliest(&self.pool, query)
            .await
            .map_err(convert_error)
    }

    async fn stop_times_for_trip(&self, trip_id: &str) -> Result<Vec<StopTime>, StoreError> {
        queries::stop_time::for_trip(&self.pool, trip_id)
            .await
            .map_err(convert_error)
    }

    async fn upsert_reliability_record(
        &self,
        record: &ReliabilityRecord,
    ) -> Result<(), StoreError> {
        queries::reliability::upsert(&self.pool, record)
            .await
            .map_err(convert_error)
    }

    async fn reliability_record(
        &self,
        route_id: &str,
        stop_id: &str,
        bucket: TimeBucket,
    ) -> Result<Option<ReliabilityRecord>, StoreError> {
        queries::reliability::get(&self.pool, route_id, stop_id, bucket)
            .await
            .map_err(convert_error)
    }

    async fn service_date_bounds(&self) -> Result<Option<(NaiveDate, NaiveDate)>, StoreError> {
        queries::trip::service_date_bounds(&self.pool)
            .await
            .map_err(convert_error)
    }

    async fn scheduled_departure_counts(
        &self,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<Vec<DepartureCount>, StoreError> {
        queries::trip::scheduled_departure_counts(&self.pool, window_start, window_end)
            .await
            .map_err(convert_error)
    }

    async fn trip_count(&self) -> Result<i64, StoreError> {
        queries::trip::count(&self.pool).await.map_err(convert_error)
    }

    async fn reliability_record_count(&self) -> Result<i64, StoreError> {
        queries::reliability::count(&self.pool).await.map_err(convert_error)
    }

    async fn replace_static_feed(
        &self,
        stops: &[Stop],
        routes: &[Route],
        trips: &[Trip],
        stop_times: &[StopTime],
        calendars: &[ServiceCalendar],
        calendar_dates: &[ServiceCalendarDate],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(convert_error)?;
        queries::ingest::replace_static_feed(
            &mut tx,
            stops,
            routes,
            trips,
            stop_times,
            calendars,
            calendar_dates,
        )
        .await
        .map_err(convert_error)?;
        tx.commit().await.map_err(convert_error)?;
        log::info!(
            "replaced static feed: {} stops, {} routes, {} trips, {} stop_times",
            stops.len(),
            routes.len(),
            trips.len(),
            stop_times.len()
        );
        Ok(())
    }
}
