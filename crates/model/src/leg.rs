use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::route::RouteId;
use crate::stop::StopId;
use crate::trip::TripId;

/// Per-leg risk, present on trip legs only; walk legs forbid this field
/// entirely rather than carrying a `null`-typed stand-in.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RiskInfo {
    pub risk_score: f64,
    pub risk_label: RiskLabel,
    pub modifiers: Vec<String>,
    pub is_cancelled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

impl RiskLabel {
    pub fn from_score(score: f64) -> Self {
        if score < 0.33 {
            Self::Low
        } else if score < 0.66 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

/// One edge of an assembled journey. A tagged union rather than a bag of
/// optional fields: the "kind" discriminant drives the shape of the rest.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Leg {
    Trip(TripLeg),
    Walk(WalkLeg),
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripLeg {
    pub from_stop_id: StopId,
    pub to_stop_id: StopId,
    pub from_stop_name: String,
    pub to_stop_name: String,
    pub trip_id: TripId,
    pub route_id: RouteId,
    pub service_id: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub travel_seconds: i64,
    pub risk: Option<RiskInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalkLeg {
    pub from_stop_id: StopId,
    pub to_stop_id: StopId,
    pub from_stop_name: String,
    pub to_stop_name: String,
    pub distance_m: f64,
    pub walk_seconds: i64,
}

/// A candidate journey plus derived aggregates, before reliability scoring
/// has been applied to its legs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Route {
    pub legs: Vec<Leg>,
}

impl Route {
    pub fn trip_id_signature(&self) -> Vec<TripId> {
        let mut signature = Vec::new();
        for leg in &self.legs {
            if let Leg::Trip(trip_leg) = leg {
                if signature.last() != Some(&trip_leg.trip_id) {
                    signature.push(trip_leg.trip_id.clone());
                }
            }
        }
        signature
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRoute {
    pub legs: Vec<Leg>,
    pub total_travel_seconds: i64,
    pub transfers: i32,
    pub total_walk_metres: f64,
    pub risk_score: f64,
    pub risk_label: RiskLabel,
}

/// Top-level wire body for the routing endpoint. `explanation` is only
/// populated when the caller asked for it; omitted entirely otherwise
/// rather than serialized as `null`.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoutesResponse {
    pub routes: Vec<ScoredRoute>,
    pub explanation: Option<String>,
}
