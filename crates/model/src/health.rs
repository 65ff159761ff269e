use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::Serialize;

/// Operational snapshot returned by the health endpoint: feed volume, graph
/// freshness, and whether the live-feed poller is active.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub stop_count: usize,
    pub trip_count: i64,
    pub reliability_record_count: i64,
    pub graph_stop_count: usize,
    pub graph_edge_count: usize,
    pub graph_built_at: Option<NaiveDateTime>,
    pub next_refresh_at: Option<NaiveDateTime>,
    pub live_poll_enabled: bool,
    pub poll_seconds: u64,
}
