use std::collections::HashMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::route::RouteId;
use crate::stop::StopId;
use crate::trip::TripId;

/// Snapshot of one GTFS-Realtime TripUpdate. Lifetime: replaced wholesale
/// on each live-feed poll, never patched in place.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LiveTripUpdate {
    pub trip_id: TripId,
    pub route_id: RouteId,
    pub delay_seconds: i64,
    pub is_cancelled: bool,
    /// Per-stop delay overrides in seconds, keyed by stop_id.
    pub stop_delays: HashMap<StopId, i64>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAlert {
    pub id: String,
    pub header: String,
    pub description: String,
    pub affected_route_ids: Vec<RouteId>,
    pub affected_stop_ids: Vec<StopId>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePosition {
    pub trip_id: TripId,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}
