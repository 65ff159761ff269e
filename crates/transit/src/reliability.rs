use chrono::{DateTime, NaiveDate, Utc};

use database::TimetableStore;
use model::reliability::{ReliabilityRecord, TimeBucket};
use model::route::RouteId;
use model::stop::StopId;

use crate::config::NEUTRAL_RELIABILITY_PRIOR;
use crate::error::CoreError;
use crate::time::classify_bucket;

/// Whether `seed_from_static` overwrites existing counters or only fills
/// in triples that have never observed real data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    Overwrite,
    FillGapsOnly,
}

/// §4.F read path: most recent record for the triple, or the neutral
/// prior 0.8 if absent or never scheduled.
pub async fn get_historical_reliability<D: TimetableStore + ?Sized>(
    store: &D,
    route_id: &RouteId,
    stop_id: &StopId,
    bucket: TimeBucket,
) -> Result<f64, CoreError> {
    let record = store
        .reliability_record(&route_id.raw(), &stop_id.raw(), bucket)
        .await?;
    Ok(score_record(record.as_ref()))
}

fn score_record(record: Option<&ReliabilityRecord>) -> f64 {
    let Some(record) = record else {
        return NEUTRAL_RELIABILITY_PRIOR;
    };
    if record.scheduled_departures == 0 {
        return NEUTRAL_RELIABILITY_PRIOR;
    }

    let scheduled = record.scheduled_departures as f64;
    let observed_rate = record.observed_departures as f64 / scheduled;
    let cancel_rate = record.cancellation_count as f64 / scheduled;
    let avg_delay_min = if record.observed_departures > 0 {
        (record.total_delay_seconds as f64 / record.observed_departures as f64) / 60.0
    } else {
        0.0
    };
    let delay_penalty = (avg_delay_min / 30.0).min(1.0) * 0.2;

    (observed_rate * (1.0 - cancel_rate) - delay_penalty).clamp(0.0, 1.0)
}

/// §4.F observe path: records one real-world departure outcome, updating
/// the bucket classified from the *scheduled* time (not the query time —
/// see the discrepancy preserved deliberately per the spec's open
/// question, documented in DESIGN.md).
pub async fn record<D: TimetableStore + ?Sized>(
    store: &D,
    route_id: &RouteId,
    stop_id: &StopId,
    scheduled_at: DateTime<Utc>,
    delay_seconds: i64,
    was_cancelled: bool,
) -> Result<(), CoreError> {
    let bucket = classify_bucket(scheduled_at);
    let existing = store
        .reliability_record(&route_id.raw(), &stop_id.raw(), bucket)
        .await?;

    let mut updated = existing.unwrap_or_else(|| ReliabilityRecord {
        route_id: route_id.clone(),
        stop_id: stop_id.clone(),
        bucket,
        scheduled_departures: 0,
        observed_departures: 0,
        total_delay_seconds: 0,
        cancellation_count: 0,
        window_start_date: scheduled_at.date_naive(),
        window_end_date: scheduled_at.date_naive(),
    });

    updated.scheduled_departures += 1;
    if was_cancelled {
        updated.cancellation_count += 1;
    } else {
        updated.observed_departures += 1;
        updated.total_delay_seconds += delay_seconds;
    }
    updated.window_end_date = updated.window_end_date.max(scheduled_at.date_naive());

    store.upsert_reliability_record(&updated).await?;
    Ok(())
}

/// §4.F seed path: aggregates scheduled departures in a date window and
/// writes synthetic-prior-derived counters per bucket.
pub async fn seed_from_static<D: TimetableStore + ?Sized>(
    store: &D,
    window_days: i64,
    mode: SeedMode,
    today: NaiveDate,
) -> Result<usize, CoreError> {
    let Some((min_date, max_date)) = store.service_date_bounds().await? else {
        return Err(CoreError::NoScheduleData);
    };

    let start = if today >= min_date && today <= max_date {
        today
    } else {
        min_date
    };
    let end = (start + chrono::Duration::days(window_days - 1)).min(max_date);

    let counts = store.scheduled_departure_counts(start, end).await?;
    let mut written = 0usize;

    for count in counts {
        let route_id: RouteId = utility::id::Id::new(count.route_id);
        let stop_id: StopId = utility::id::Id::new(count.stop_id);

        if mode == SeedMode::FillGapsOnly {
            if let Some(existing) = store
                .reliability_record(&route_id.raw(), &stop_id.raw(), count.bucket)
                .await?
            {
                if existing.observed_departures > 0 {
                    continue;
                }
            }
        }

        let prior = count.bucket.synthetic_prior();
        let scheduled = count.scheduled_departures;
        let observed = (scheduled as f64 * prior.reliability_rate).round() as i64;
        let cancellations = (scheduled as f64 * prior.cancellation_rate).round() as i64;
        let total_delay = observed * prior.avg_delay_s;

        let record = ReliabilityRecord {
            route_id,
            stop_id,
            bucket: count.bucket,
            scheduled_departures: scheduled,
            observed_departures: observed,
            total_delay_seconds: total_delay,
            cancellation_count: cancellations,
            window_start_date: start,
            window_end_date: end,
        };
        store.upsert_reliability_record(&record).await?;
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(scheduled: i64, observed: i64, cancellations: i64, total_delay: i64) -> ReliabilityRecord {
        ReliabilityRecord {
            route_id: utility::id::Id::new("R1".to_owned()),
            stop_id: utility::id::Id::new("S1".to_owned()),
            bucket: TimeBucket::WeekdayOffpeak,
            scheduled_departures: scheduled,
            observed_departures: observed,
            total_delay_seconds: total_delay,
            cancellation_count: cancellations,
            window_start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            window_end_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        }
    }

    #[test]
    fn absent_record_returns_neutral_prior() {
        assert_eq!(score_record(None), NEUTRAL_RELIABILITY_PRIOR);
    }

    #[test]
    fn zero_scheduled_returns_neutral_prior() {
        assert_eq!(score_record(Some(&record(0, 0, 0, 0))), NEUTRAL_RELIABILITY_PRIOR);
    }

    #[test]
    fn perfect_on_time_service_scores_near_one() {
        let score = score_record(Some(&record(10, 10, 0, 0)));
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cancellations_and_delay_reduce_score() {
        let score = score_record(Some(&record(10, 8, 2, 8 * 15 * 60)));
        // observed_rate=0.8, cancel_rate=0.2, avg_delay_min=15 -> penalty=0.1
        let expected = (0.8 * 0.8) - 0.1;
        assert!((score - expected).abs() < 1e-9);
    }
}
