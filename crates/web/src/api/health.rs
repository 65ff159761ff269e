use axum::{extract::State, Json};
use model::health::HealthResponse;

use crate::{common::RouteResult, WebState};

pub async fn health(State(WebState { core }): State<WebState>) -> RouteResult<Json<HealthResponse>> {
    Ok(Json(core.health().await?))
}
