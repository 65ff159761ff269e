use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

pub type RouteId = Id<Route>;

/// A group of trips shown to riders as a single service line.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: RouteId,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub route_type: RouteType,
}

impl HasId for Route {
    type IdType = String;
}

/// GTFS `route_type`, trimmed to the modes this system actually routes
/// over (bus + walk per the non-goal boundary); other values still decode
/// so the ETL round-trips a full feed without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    TramOrLightRail,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableTram,
    AerialLift,
    Funicular,
    Trolleybus,
    Monorail,
    Other,
}
