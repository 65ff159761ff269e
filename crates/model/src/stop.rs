use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

pub type StopId = Id<Stop>;

/// A location where passengers board or disembark a vehicle.
///
/// Immutable within a graph snapshot: the core never mutates a stop, only
/// the ETL that loads it does.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl HasId for Stop {
    type IdType = String;
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StopResult {
    pub stop_id: StopId,
    pub stop_name: String,
    pub lat: f64,
    pub lon: f64,
    pub routes_served: Vec<crate::route::RouteId>,
}
