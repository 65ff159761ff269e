use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};

use model::reliability::TimeBucket;

/// Parses a raw GTFS `HH:MM:SS` string to seconds past local midnight.
/// Hours may exceed 23 for post-midnight service continuations. Any
/// malformed input returns 0 rather than failing, matching GTFS ingestion
/// practice of never rejecting a whole feed over one bad field.
pub fn parse_hms(raw: &str) -> i64 {
    let mut parts = raw.splitn(3, ':');
    let (Some(h), Some(m), Some(s)) = (parts.next(), parts.next(), parts.next()) else {
        return 0;
    };
    let (Ok(h), Ok(m), Ok(s)) = (h.parse::<i64>(), m.parse::<i64>(), s.parse::<i64>()) else {
        return 0;
    };
    h * 3600 + m * 60 + s
}

/// Great-circle distance between two WGS84 coordinates, in metres.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    utility::geo::haversine_distance_m(lat1, lon1, lat2, lon2)
}

/// Seconds past local midnight for a timestamp, for comparison against
/// `parse_hms`-decoded schedule times.
pub fn seconds_of_day<Tz: TimeZone>(dt: DateTime<Tz>) -> i64 {
    dt.num_seconds_from_midnight() as i64
}

/// Classifies a point in time into one of the four reliability buckets.
/// Weekday peaks are `[6,9)` and `[15,19)`; everything else on a weekday is
/// offpeak. The boundary hours 9 and 19 fall into offpeak, not peak.
pub fn classify_bucket<Tz: TimeZone>(dt: DateTime<Tz>) -> TimeBucket {
    match dt.weekday() {
        Weekday::Sat | Weekday::Sun => TimeBucket::Weekend,
        _ => {
            let hour = dt.hour();
            if (6..9).contains(&hour) {
                TimeBucket::WeekdayAmPeak
            } else if (15..19).contains(&hour) {
                TimeBucket::WeekdayPmPeak
            } else {
                TimeBucket::WeekdayOffpeak
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_simple_time() {
        assert_eq!(parse_hms("08:15:30"), 8 * 3600 + 15 * 60 + 30);
    }

    #[test]
    fn parses_hours_past_midnight() {
        assert_eq!(parse_hms("25:00:00"), 25 * 3600);
    }

    #[test]
    fn malformed_input_yields_zero() {
        assert_eq!(parse_hms(""), 0);
        assert_eq!(parse_hms("nonsense"), 0);
        assert_eq!(parse_hms("08:15"), 0);
    }

    #[test]
    fn round_trips_a_small_table() {
        for h in 0..30i64 {
            for m in [0, 15, 59] {
                for s in [0, 30, 59] {
                    let raw = format!("{h:02}:{m:02}:{s:02}");
                    assert_eq!(parse_hms(&raw), h * 3600 + m * 60 + s);
                }
            }
        }
    }

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<chrono::Utc> {
        chrono::Utc
            .from_utc_datetime(&NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_hms_opt(h, mi, 0).unwrap())
    }

    #[test]
    fn s1_bucket_boundaries() {
        assert_eq!(classify_bucket(dt(2026, 2, 9, 6, 0)), TimeBucket::WeekdayAmPeak);
        assert_eq!(classify_bucket(dt(2026, 2, 9, 9, 0)), TimeBucket::WeekdayOffpeak);
        assert_eq!(classify_bucket(dt(2026, 2, 9, 15, 0)), TimeBucket::WeekdayPmPeak);
        assert_eq!(classify_bucket(dt(2026, 2, 9, 19, 0)), TimeBucket::WeekdayOffpeak);
        assert_eq!(classify_bucket(dt(2026, 2, 7, 10, 0)), TimeBucket::Weekend);
    }
}
