use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::route::RouteId;
use crate::stop::StopId;

/// One of four labels partitioning the week for reliability aggregation.
/// Weekday/weekend split first, then weekday splits into peak/offpeak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    WeekdayAmPeak,
    WeekdayPmPeak,
    WeekdayOffpeak,
    Weekend,
}

impl TimeBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WeekdayAmPeak => "weekday_am_peak",
            Self::WeekdayPmPeak => "weekday_pm_peak",
            Self::WeekdayOffpeak => "weekday_offpeak",
            Self::Weekend => "weekend",
        }
    }
}

/// Rolling counters for one `(route_id, stop_id, time_bucket)` key.
///
/// Invariant: `observed_departures + cancellation_count <=
/// scheduled_departures`; all counters non-negative.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReliabilityRecord {
    pub route_id: RouteId,
    pub stop_id: StopId,
    pub bucket: TimeBucket,
    pub scheduled_departures: i64,
    pub observed_departures: i64,
    pub total_delay_seconds: i64,
    pub cancellation_count: i64,
    pub window_start_date: NaiveDate,
    pub window_end_date: NaiveDate,
}

/// Fixed, non-tunable synthetic priors used by `seed_from_static`.
pub struct BucketPrior {
    pub reliability_rate: f64,
    pub cancellation_rate: f64,
    pub avg_delay_s: i64,
}

impl TimeBucket {
    pub fn synthetic_prior(self) -> BucketPrior {
        match self {
            Self::WeekdayAmPeak => BucketPrior {
                reliability_rate: 0.85,
                cancellation_rate: 0.03,
                avg_delay_s: 180,
            },
            Self::WeekdayPmPeak => BucketPrior {
                reliability_rate: 0.80,
                cancellation_rate: 0.05,
                avg_delay_s: 300,
            },
            Self::WeekdayOffpeak => BucketPrior {
                reliability_rate: 0.90,
                cancellation_rate: 0.02,
                avg_delay_s: 120,
            },
            Self::Weekend => BucketPrior {
                reliability_rate: 0.75,
                cancellation_rate: 0.08,
                avg_delay_s: 240,
            },
        }
    }
}
