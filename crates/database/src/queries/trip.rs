use chrono::NaiveDate;
use model::trip::{TravelDirection, Trip};
use sqlx::FromRow;
use utility::id::Id;

use crate::{DepartureCount, EarliestTripQuery};
use model::reliability::TimeBucket;

#[derive(FromRow)]
struct TripRow {
    id: String,
    route_id: String,
    service_id: String,
    headsign: Option<String>,
    direction: Option<String>,
}

fn direction_to_str(direction: TravelDirection) -> &'static str {
    match direction {
        TravelDirection::Outbound => "outbound",
        TravelDirection::Inbound => "inbound",
    }
}

fn direction_from_str(value: &str) -> Option<TravelDirection> {
    match value {
        "outbound" => Some(TravelDirection::Outbound),
        "inbound" => Some(TravelDirection::Inbound),
        _ => None,
    }
}

impl From<TripRow> for Trip {
    fn from(row: TripRow) -> Self {
        Trip {
            id: Id::new(row.id),
            route_id: Id::new(row.route_id),
            service_id: row.service_id,
            headsign: row.headsign,
            direction: row.direction.as_deref().and_then(direction_from_str),
        }
    }
}

pub async fn earliest(
    pool: &sqlx::PgPool,
    query: EarliestTripQuery<'_>,
) -> Result<Option<String>, sqlx::Error> {
    let trip_id: Option<(String,)> = sqlx::query_as(
        "SELECT st1.trip_id FROM stop_times st1
         JOIN trips t ON t.id = st1.trip_id
         JOIN stop_times st2 ON st2.trip_id = st1.trip_id
            AND st2.stop_sequence > st1.stop_sequence
            AND st2.stop_id = $5
         WHERE t.route_id = $1 AND t.service_id = $2
           AND st1.stop_id = $3 AND st1.departure_sec >= $4
         ORDER BY st1.departure_sec ASC
         LIMIT 1",
    )
    .bind(query.route_id)
    .bind(query.service_id)
    .bind(query.first_stop_id)
    .bind(query.not_before_sec)
    .bind(query.last_stop_id)
    .fetch_optional(pool)
    .await?;
    Ok(trip_id.map(|(id,)| id))
}

pub async fn service_date_bounds(
    pool: &sqlx::PgPool,
) -> Result<Option<(NaiveDate, NaiveDate)>, sqlx::Error> {
    let bounds: (Option<NaiveDate>, Option<NaiveDate>) = sqlx::query_as(
        "SELECT MIN(TO_DATE(service_id, 'YYYYMMDD')), MAX(TO_DATE(service_id, 'YYYYMMDD'))
         FROM trips",
    )
    .fetch_one(pool)
    .await?;
    Ok(match bounds {
        (Some(min), Some(max)) => Some((min, max)),
        _ => None,
    })
}

pub async fn count(pool: &sqlx::PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trips")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Mirrors `transit::time::classify_bucket`'s hour ranges exactly: `[6,9)`
/// is the morning peak, `[15,19)` the evening peak, everything else on a
/// weekday is offpeak. Kept in sync by hand since this crate cannot depend
/// on `transit` (the dependency runs the other way).
fn bucket_from_row(weekday: bool, hour: i32) -> TimeBucket {
    match (weekday, hour) {
        (false, _) => TimeBucket::Weekend,
        (true, h) if (6..9).contains(&h) => TimeBucket::WeekdayAmPeak,
        (true, h) if (15..19).contains(&h) => TimeBucket::WeekdayPmPeak,
        (true, _) => TimeBucket::WeekdayOffpeak,
    }
}

pub async fn scheduled_departure_counts(
    pool: &sqlx::PgPool,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Result<Vec<DepartureCount>, sqlx::Error> {
    let rows: Vec<(String, String, bool, i64, i64)> = sqlx::query_as(
        "SELECT t.route_id, st.stop_id,
                EXTRACT(ISODOW FROM TO_DATE(t.service_id, 'YYYYMMDD')) < 6 AS weekday,
                (st.departure_sec / 3600) AS hour_of_day,
                COUNT(*) AS scheduled_departures
         FROM stop_times st
         JOIN trips t ON t.id = st.trip_id
         WHERE TO_DATE(t.service_id, 'YYYYMMDD') BETWEEN $1 AND $2
         GROUP BY t.route_id, st.stop_id, weekday, hour_of_day",
    )
    .bind(window_start)
    .bind(window_end)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(route_id, stop_id, weekday, hour, scheduled_departures)| DepartureCount {
            route_id,
            stop_id,
            bucket: bucket_from_row(weekday, hour as i32),
            scheduled_departures,
        })
        .collect())
}

pub async fn upsert_all(
    conn: &mut sqlx::PgConnection,
    trips: &[Trip],
) -> Result<(), sqlx::Error> {
    for trip in trips {
        sqlx::query(
            "INSERT INTO trips (id, route_id, service_id, headsign, direction)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET route_id = EXCLUDED.route_id,
                service_id = EXCLUDED.service_id, headsign = EXCLUDED.headsign,
                direction = EXCLUDED.direction",
        )
        .bind(trip.id.raw())
        .bind(trip.route_id.raw())
        .bind(&trip.service_id)
        .bind(&trip.headsign)
        .bind(trip.direction.map(direction_to_str))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
