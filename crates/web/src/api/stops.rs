use axum::{
    extract::{Query, State},
    routing::{get, on},
    Json, Router,
};
use model::stop::StopResult;
use serde::Deserialize;

use crate::{
    common::{route_not_found, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(search_stops))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchStopsQuery {
    q: String,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    20
}

async fn search_stops(State(WebState { core }): State<WebState>, Query(params): Query<SearchStopsQuery>) -> RouteResult<Json<Vec<StopResult>>> {
    let results = core.search_stops(&params.q, params.limit).await?;
    Ok(Json(results))
}
