use axum::{
    extract::{Query, State},
    routing::{get, on},
    Json, Router,
};
use chrono::{DateTime, Utc};
use model::leg::{RoutesResponse, ScoredRoute};
use serde::Deserialize;
use transit::config::RoutingConfig;
use utility::id::Id;

use crate::{
    common::{route_not_found, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(get_routes))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoutesQuery {
    origin: String,
    destination: String,
    departure_datetime: DateTime<Utc>,
    #[serde(default)]
    explain: bool,
}

async fn get_routes(State(WebState { core }): State<WebState>, Query(params): Query<RoutesQuery>) -> RouteResult<Json<RoutesResponse>> {
    let origin = Id::new(params.origin);
    let destination = Id::new(params.destination);
    let routes = core
        .find_scored_routes(&origin, &destination, params.departure_datetime, core.config.max_routes)
        .await?;

    let explanation = params.explain.then(|| explain(&routes, &core.config));
    Ok(Json(RoutesResponse { routes, explanation }))
}

/// A short, human-readable summary of what the search considered. Not part
/// of the scoring itself, just a debugging aid surfaced behind `explain`.
fn explain(routes: &[ScoredRoute], config: &RoutingConfig) -> String {
    format!(
        "found {} route(s), max_routes={}, max_transfers={}, min_transfer_minutes={}",
        routes.len(),
        config.max_routes,
        config.max_transfers,
        config.min_transfer_minutes
    )
}
