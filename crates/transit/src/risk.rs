use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Timelike, Utc};

use model::live::{LiveTripUpdate, ServiceAlert, VehiclePosition};
use model::route::RouteId;
use model::stop::StopId;
use model::trip::TripId;

use crate::config::{
    ALERT_RISK_BUMP, CANCELLATION_RISK_BUMP, LATE_EVENING_RISK_BUMP, MISSING_VEHICLE_RISK_BUMP,
    WEEKEND_RISK_BUMP,
};
use crate::time::parse_hms;

/// Already-resolved live-state snapshots, handed to the scorer by value so
/// the function body touches neither the cache nor the database — the
/// purity invariant §8.4 requires.
pub struct LiveSnapshots<'a> {
    pub trip_updates: &'a Arc<HashMap<TripId, LiveTripUpdate>>,
    pub alerts: &'a Arc<Vec<ServiceAlert>>,
    pub vehicle_positions: &'a Arc<HashMap<TripId, VehiclePosition>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskResult {
    pub risk_score: f64,
    pub risk_label: model::leg::RiskLabel,
    pub modifiers: Vec<String>,
    pub is_cancelled: bool,
}

/// §4.G deterministic live risk combiner. Pure: no I/O, no randomness,
/// same inputs always yield the same outputs.
pub fn compute_live_risk(
    live: &LiveSnapshots<'_>,
    route_id: &RouteId,
    stop_id: &StopId,
    trip_id: &TripId,
    departure_time_str: &str,
    query_dt: DateTime<Utc>,
    historical_reliability: f64,
) -> RiskResult {
    if let Some(update) = live.trip_updates.get(trip_id) {
        if update.is_cancelled {
            return RiskResult {
                risk_score: 1.0,
                risk_label: model::leg::RiskLabel::High,
                modifiers: vec!["trip cancelled".to_owned()],
                is_cancelled: true,
            };
        }
    }

    let base = 1.0 - historical_reliability;
    let mut adjustment = 0.0;
    let mut modifiers = Vec::new();

    for alert in live.alerts.iter() {
        let affects = alert.affected_route_ids.contains(route_id) || alert.affected_stop_ids.contains(stop_id);
        if affects {
            adjustment += ALERT_RISK_BUMP;
            modifiers.push(format!("Service alert: {}", alert.header));
        }
    }

    let same_route_cancellations = live
        .trip_updates
        .values()
        .filter(|update| update.route_id == *route_id && update.is_cancelled)
        .count();
    if same_route_cancellations > 0 {
        adjustment += CANCELLATION_RISK_BUMP;
        modifiers.push(format!(
            "{same_route_cancellations} other cancellation(s) on this route"
        ));
    }

    let departure_sec = parse_hms(departure_time_str);
    let query_sec = query_dt.num_seconds_from_midnight() as i64;
    let minutes_until = (departure_sec - query_sec) as f64 / 60.0;
    if minutes_until > 0.0 && minutes_until <= 15.0 && !live.vehicle_positions.contains_key(trip_id) {
        adjustment += MISSING_VEHICLE_RISK_BUMP;
        modifiers.push("no vehicle position".to_owned());
    }

    if departure_sec >= 22 * 3600 {
        adjustment += LATE_EVENING_RISK_BUMP;
        modifiers.push("late-evening".to_owned());
    }

    if matches!(query_dt.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun) {
        adjustment += WEEKEND_RISK_BUMP;
        modifiers.push("weekend".to_owned());
    }

    let risk_score = (base + adjustment).min(1.0);
    RiskResult {
        risk_score,
        risk_label: model::leg::RiskLabel::from_score(risk_score),
        modifiers,
        is_cancelled: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn empty_snapshots() -> (
        Arc<HashMap<TripId, LiveTripUpdate>>,
        Arc<Vec<ServiceAlert>>,
        Arc<HashMap<TripId, VehiclePosition>>,
    ) {
        (Arc::new(HashMap::new()), Arc::new(Vec::new()), Arc::new(HashMap::new()))
    }

    #[test]
    fn s2_cancellation_short_circuits() {
        let trip_id: TripId = utility::id::Id::new("T1".to_owned());
        let route_id: RouteId = utility::id::Id::new("R1".to_owned());
        let stop_id: StopId = utility::id::Id::new("S1".to_owned());

        let mut trip_updates = HashMap::new();
        trip_updates.insert(
            trip_id.clone(),
            LiveTripUpdate {
                trip_id: trip_id.clone(),
                route_id: route_id.clone(),
                delay_seconds: 0,
                is_cancelled: true,
                stop_delays: HashMap::new(),
                fetched_at: Utc::now(),
            },
        );
        let trip_updates = Arc::new(trip_updates);
        let (_, alerts, vehicle_positions) = empty_snapshots();
        let live = LiveSnapshots {
            trip_updates: &trip_updates,
            alerts: &alerts,
            vehicle_positions: &vehicle_positions,
        };

        let query_dt = chrono::Utc.with_ymd_and_hms(2026, 2, 9, 13, 0, 0).unwrap();
        let result = compute_live_risk(&live, &route_id, &stop_id, &trip_id, "14:00:00", query_dt, 0.9);

        assert_eq!(result.risk_score, 1.0);
        assert_eq!(result.risk_label, model::leg::RiskLabel::High);
        assert!(result.is_cancelled);
    }

    #[test]
    fn s3_stacked_modifiers() {
        let trip_id: TripId = utility::id::Id::new("T1".to_owned());
        let route_id: RouteId = utility::id::Id::new("R1".to_owned());
        let stop_id: StopId = utility::id::Id::new("S1".to_owned());

        let (trip_updates, alerts, vehicle_positions) = empty_snapshots();
        let live = LiveSnapshots {
            trip_updates: &trip_updates,
            alerts: &alerts,
            vehicle_positions: &vehicle_positions,
        };

        // Saturday 2026-02-07 22:00, departure 22:30:00 -> late evening + weekend.
        let query_dt = chrono::Utc.with_ymd_and_hms(2026, 2, 7, 22, 0, 0).unwrap();
        let result = compute_live_risk(&live, &route_id, &stop_id, &trip_id, "22:30:00", query_dt, 0.8);

        assert!((result.risk_score - 0.28).abs() < 1e-9);
        assert_eq!(result.risk_label, model::leg::RiskLabel::Low);
        assert!(result.modifiers.iter().any(|m| m == "late-evening"));
        assert!(result.modifiers.iter().any(|m| m == "weekend"));
    }
}
