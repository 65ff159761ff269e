use model::calendar::{ServiceCalendar, ServiceCalendarDate, ServiceExceptionType};
use model::route::Route;
use model::stop::Stop;
use model::trip::{StopTime, Trip};
use sqlx::{Postgres, Transaction};

use super::{route, stop, stop_time, trip};

fn exception_type_to_str(exception_type: ServiceExceptionType) -> &'static str {
    match exception_type {
        ServiceExceptionType::Added => "added",
        ServiceExceptionType::Removed => "removed",
    }
}

async fn upsert_calendars(
    conn: &mut sqlx::PgConnection,
    calendars: &[ServiceCalendar],
) -> Result<(), sqlx::Error> {
    for calendar in calendars {
        sqlx::query(
            "INSERT INTO service_calendars
                (service_id, monday, tuesday, wednesday, thursday, friday, saturday, sunday,
                 start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             ON CONFLICT (service_id) DO UPDATE SET
                monday = EXCLUDED.monday, tuesday = EXCLUDED.tuesday,
                wednesday = EXCLUDED.wednesday, thursday = EXCLUDED.thursday,
                friday = EXCLUDED.friday, saturday = EXCLUDED.saturday,
                sunday = EXCLUDED.sunday, start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date",
        )
        .bind(&calendar.service_id)
        .bind(calendar.monday)
        .bind(calendar.tuesday)
        .bind(calendar.wednesday)
        .bind(calendar.thursday)
        .bind(calendar.friday)
        .bind(calendar.saturday)
        .bind(calendar.sunday)
        .bind(calendar.start_date)
        .bind(calendar.end_date)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn upsert_calendar_dates(
    conn: &mut sqlx::PgConnection,
    calendar_dates: &[ServiceCalendarDate],
) -> Result<(), sqlx::Error> {
    for calendar_date in calendar_dates {
        sqlx::query(
            "INSERT INTO service_calendar_dates (service_id, date, exception_type)
             VALUES ($1, $2, $3)
             ON CONFLICT (service_id, date) DO UPDATE SET
                exception_type = EXCLUDED.exception_type",
        )
        .bind(&calendar_date.service_id)
        .bind(calendar_date.date)
        .bind(exception_type_to_str(calendar_date.exception_type))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Loads one GTFS static pull into the store. Stops and routes are
/// upserted first so the foreign keys on `trips`/`stop_times` never dangle
/// mid-transaction; the whole batch commits or rolls back together.
pub async fn replace_static_feed(
    tx: &mut Transaction<'_, Postgres>,
    stops: &[Stop],
    routes: &[Route],
    trips: &[Trip],
    stop_times: &[StopTime],
    calendars: &[ServiceCalendar],
    calendar_dates: &[ServiceCalendarDate],
) -> Result<(), sqlx::Error> {
    stop::upsert_all(&mut *tx, stops).await?;
    route::upsert_all(&mut *tx, routes).await?;
    upsert_calendars(&mut *tx, calendars).await?;
    upsert_calendar_dates(&mut *tx, calendar_dates).await?;
    trip::upsert_all(&mut *tx, trips).await?;
    stop_time::upsert_all(&mut *tx, stop_times).await?;
    Ok(())
}
