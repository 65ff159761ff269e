use model::trip::{StopTime, Trip};
use sqlx::FromRow;
use utility::id::Id;

#[derive(FromRow)]
struct StopTimeRow {
    trip_id: String,
    stop_id: String,
    stop_sequence: i32,
    arrival_time: String,
    departure_time: String,
}

impl From<StopTimeRow> for StopTime {
    fn from(row: StopTimeRow) -> Self {
        StopTime {
            trip_id: Id::new(row.trip_id),
            stop_id: Id::new(row.stop_id),
            stop_sequence: row.stop_sequence,
            arrival_time: row.arrival_time,
            departure_time: row.departure_time,
        }
    }
}

#[derive(FromRow)]
struct StopTimeWithTripRow {
    trip_id: String,
    route_id: String,
    service_id: String,
    headsign: Option<String>,
    direction: Option<String>,
    stop_id: String,
    stop_sequence: i32,
    arrival_time: String,
    departure_time: String,
}

fn direction_from_str(value: &str) -> Option<model::trip::TravelDirection> {
    match value {
        "outbound" => Some(model::trip::TravelDirection::Outbound),
        "inbound" => Some(model::trip::TravelDirection::Inbound),
        _ => None,
    }
}

impl From<StopTimeWithTripRow> for (Trip, StopTime) {
    fn from(row: StopTimeWithTripRow) -> Self {
        let trip = Trip {
            id: Id::new(row.trip_id.clone()),
            route_id: Id::new(row.route_id),
            service_id: row.service_id,
            headsign: row.headsign,
            direction: row.direction.as_deref().and_then(direction_from_str),
        };
        let stop_time = StopTime {
            trip_id: Id::new(row.trip_id),
            stop_id: Id::new(row.stop_id),
            stop_sequence: row.stop_sequence,
            arrival_time: row.arrival_time,
            departure_time: row.departure_time,
        };
        (trip, stop_time)
    }
}

/// Every stop_time joined with its trip's `route_id`/`service_id`, ordered
/// by `(trip_id, stop_sequence)` as the graph builder requires when it
/// walks each trip's stop sequence to emit trip-edges.
pub async fn list_with_trips(pool: &sqlx::PgPool) -> Result<Vec<(Trip, StopTime)>, sqlx::Error> {
    let rows: Vec<StopTimeWithTripRow> = sqlx::query_as(
        "SELECT st.trip_id, t.route_id, t.service_id, t.headsign, t.direction,
                st.stop_id, st.stop_sequence, st.arrival_time, st.departure_time
         FROM stop_times st
         JOIN trips t ON t.id = st.trip_id
         ORDER BY st.trip_id, st.stop_sequence",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn for_trip(pool: &sqlx::PgPool, trip_id: &str) -> Result<Vec<StopTime>, sqlx::Error> {
    let rows: Vec<StopTimeRow> = sqlx::query_as(
        "SELECT trip_id, stop_id, stop_sequence, arrival_time, departure_time
         FROM stop_times WHERE trip_id = $1 ORDER BY stop_sequence",
    )
    .bind(trip_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(StopTime::from).collect())
}

/// Parses a raw GTFS `HH:MM:SS` string (hours may exceed 23) to seconds
/// past local midnight, mirroring `transit::time::parse_hms` closely
/// enough for this crate's own sort/filter columns without depending on
/// the core crate.
fn parse_hms(raw: &str) -> i64 {
    let mut parts = raw.splitn(3, ':');
    let hours: i64 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let minutes: i64 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let seconds: i64 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    hours * 3600 + minutes * 60 + seconds
}

pub async fn upsert_all(
    conn: &mut sqlx::PgConnection,
    stop_times: &[StopTime],
) -> Result<(), sqlx::Error> {
    for stop_time in stop_times {
        sqlx::query(
            "INSERT INTO stop_times
                (trip_id, stop_id, stop_sequence, arrival_time, departure_time, arrival_sec, departure_sec)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (trip_id, stop_sequence) DO UPDATE SET
                stop_id = EXCLUDED.stop_id, arrival_time = EXCLUDED.arrival_time,
                departure_time = EXCLUDED.departure_time, arrival_sec = EXCLUDED.arrival_sec,
                departure_sec = EXCLUDED.departure_sec",
        )
        .bind(stop_time.trip_id.raw())
        .bind(stop_time.stop_id.raw())
        .bind(stop_time.stop_sequence)
        .bind(&stop_time.arrival_time)
        .bind(&stop_time.departure_time)
        .bind(parse_hms(&stop_time.arrival_time))
        .bind(parse_hms(&stop_time.departure_time))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
