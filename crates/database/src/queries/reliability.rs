use chrono::NaiveDate;
use model::reliability::{ReliabilityRecord, TimeBucket};
use sqlx::FromRow;
use utility::id::Id;

#[derive(FromRow)]
struct ReliabilityRow {
    route_id: String,
    stop_id: String,
    bucket: String,
    scheduled_departures: i64,
    observed_departures: i64,
    total_delay_seconds: i64,
    cancellation_count: i64,
    window_start_date: NaiveDate,
    window_end_date: NaiveDate,
}

fn bucket_to_str(bucket: TimeBucket) -> &'static str {
    bucket.as_str()
}

fn bucket_from_str(value: &str) -> Option<TimeBucket> {
    match value {
        "weekday_am_peak" => Some(TimeBucket::WeekdayAmPeak),
        "weekday_pm_peak" => Some(TimeBucket::WeekdayPmPeak),
        "weekday_offpeak" => Some(TimeBucket::WeekdayOffpeak),
        "weekend" => Some(TimeBucket::Weekend),
        _ => None,
    }
}

impl From<ReliabilityRow> for ReliabilityRecord {
    fn from(row: ReliabilityRow) -> Self {
        ReliabilityRecord {
            route_id: Id::new(row.route_id),
            stop_id: Id::new(row.stop_id),
            bucket: bucket_from_str(&row.bucket).unwrap_or(TimeBucket::WeekdayOffpeak),
            scheduled_departures: row.scheduled_departures,
            observed_departures: row.observed_departures,
            total_delay_seconds: row.total_delay_seconds,
            cancellation_count: row.cancellation_count,
            window_start_date: row.window_start_date,
            window_end_date: row.window_end_date,
        }
    }
}

pub async fn get(
    pool: &sqlx::PgPool,
    route_id: &str,
    stop_id: &str,
    bucket: TimeBucket,
) -> Result<Option<ReliabilityRecord>, sqlx::Error> {
    let row: Option<ReliabilityRow> = sqlx::query_as(
        "SELECT route_id, stop_id, bucket, scheduled_departures, observed_departures,
                total_delay_seconds, cancellation_count, window_start_date, window_end_date
         FROM reliability_records WHERE route_id = $1 AND stop_id = $2 AND bucket = $3",
    )
    .bind(route_id)
    .bind(stop_id)
    .bind(bucket_to_str(bucket))
    .fetch_optional(pool)
    .await?;
    Ok(row.map(ReliabilityRecord::from))
}

pub async fn count(pool: &sqlx::PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reliability_records")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn upsert(
    pool: &sqlx::PgPool,
    record: &ReliabilityRecord,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO reliability_records
            (route_id, stop_id, bucket, scheduled_departures, observed_departures,
             total_delay_seconds, cancellation_count, window_start_date, window_end_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         ON CONFLICT (route_id, stop_id, bucket) DO UPDATE SET
            scheduled_departures = EXCLUDED.scheduled_departures,
            observed_departures = EXCLUDED.observed_departures,
            total_delay_seconds = EXCLUDED.total_delay_seconds,
            cancellation_count = EXCLUDED.cancellation_count,
            window_start_date = EXCLUDED.window_start_date,
            window_end_date = EXCLUDED.window_end_date",
    )
    .bind(record.route_id.raw())
    .bind(record.stop_id.raw())
    .bind(bucket_to_str(record.bucket))
    .bind(record.scheduled_departures)
    .bind(record.observed_departures)
    .bind(record.total_delay_seconds)
    .bind(record.cancellation_count)
    .bind(record.window_start_date)
    .bind(record.window_end_date)
    .execute(pool)
    .await?;
    Ok(())
}
