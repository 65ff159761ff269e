use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::route::RouteId;
use crate::stop::StopId;

pub type TripId = Id<Trip>;

/// A sequence of two or more stops occurring during a specific time period.
///
/// `service_id` is treated by the core as a calendar key; ingestion
/// materializes it as that service's concrete YYYYMMDD date for "does this
/// trip run on date X" lookups (see Timetable Store Contract).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: TripId,
    pub route_id: RouteId,
    pub service_id: String,
    pub headsign: Option<String>,
    pub direction: Option<TravelDirection>,
}

impl HasId for Trip {
    type IdType = String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TravelDirection {
    Outbound,
    Inbound,
}

/// One row of `(trip_id, stop_id, stop_sequence)` with arrival/departure
/// times kept as `HH:MM:SS` strings (hours may exceed 23) and parsed to
/// seconds-past-midnight on demand via `transit::time::parse_hms`.
///
/// Invariant: within a single `trip_id`, `stop_sequence` is strictly
/// increasing and `departure_time` is monotonically non-decreasing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StopTime {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub stop_sequence: i32,
    pub arrival_time: String,
    pub departure_time: String,
}
