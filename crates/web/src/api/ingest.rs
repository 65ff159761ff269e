use axum::{
    extract::State,
    http::StatusCode,
    routing::{on, post},
    Json, Router,
};
use axum_extra::TypedHeader;
use chrono::Utc;
use database::TimetableStore;
use serde::{Deserialize, Serialize};
use transit::{graph::build_graph, reliability};

use crate::{
    common::{route_not_found, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    ingest_auth::{is_authorized, IngestToken},
    WebState,
};

pub fn routes(state: WebState) -> Router {
    Router::new()
        .route("/static", post(trigger_static_ingest))
        .route("/reliability-seed", post(trigger_reliability_seed))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

fn require_ingest_token(token: &Option<TypedHeader<IngestToken>>) -> RouteResult<()> {
    let token = token.as_ref().map(|TypedHeader(inner)| inner.clone());
    if is_authorized(&token) {
        Ok(())
    } else {
        Err(RouteErrorResponse::new(StatusCode::UNAUTHORIZED).with_message("missing or invalid X-Ingest-Token"))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StaticIngestReport {
    stops: usize,
    routes: usize,
    trips: usize,
    stop_times: usize,
}

/// Downloads the static feed, materializes it against the ingest horizon,
/// replaces the store's contents, rebuilds the routing graph, reseeds
/// reliability priors from the fresh schedule, and invalidates cached
/// routing answers — the full refresh described for this trigger.
async fn trigger_static_ingest(
    token: Option<TypedHeader<IngestToken>>,
    State(WebState { core }): State<WebState>,
) -> RouteResult<Json<StaticIngestReport>> {
    require_ingest_token(&token)?;

    let today = Utc::now().date_naive();
    let feed_url = std::env::var("GTFS_STATIC_URL").unwrap_or_else(|_| gtfs::sources::GERMANY_ALL.to_owned());
    let work_dir = std::env::temp_dir().join(format!("gtfs-static-ingest-{}", std::process::id()));
    std::fs::create_dir_all(&work_dir).map_err(|why| RouteErrorResponse::from(transit::error::CoreError::StorageError(why.to_string())))?;

    let download_result = gtfs::download_gtfs(&feed_url, &work_dir).await;
    let feed = match download_result {
        Ok(()) => gtfs::ingest::load_directory(&work_dir, today, gtfs::ingest::STATIC_INGEST_HORIZON_DAYS),
        Err(why) => Err(why),
    };
    let _ = std::fs::remove_dir_all(&work_dir);
    let feed = feed.map_err(|why| RouteErrorResponse::from(transit::error::CoreError::from(why)))?;

    core.store
        .replace_static_feed(&feed.stops, &feed.routes, &feed.trips, &feed.stop_times, &feed.calendars, &feed.calendar_dates)
        .await
        .map_err(|why| RouteErrorResponse::from(transit::error::CoreError::from(why)))?;

    let snapshot = build_graph(core.store.as_ref(), &core.config).await?;
    core.graph_cache.swap(snapshot);

    reliability::seed_from_static(core.store.as_ref(), 30, reliability::SeedMode::Overwrite, today).await?;

    core.result_cache.invalidate_all().await;

    Ok(Json(StaticIngestReport {
        stops: feed.stops.len(),
        routes: feed.routes.len(),
        trips: feed.trips.len(),
        stop_times: feed.stop_times.len(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReliabilitySeedRequest {
    #[serde(default = "default_window_days")]
    window_days: i64,
    #[serde(default)]
    overwrite: bool,
}

fn default_window_days() -> i64 {
    30
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReliabilitySeedReport {
    records_written: usize,
}

async fn trigger_reliability_seed(
    token: Option<TypedHeader<IngestToken>>,
    State(WebState { core }): State<WebState>,
    Json(body): Json<ReliabilitySeedRequest>,
) -> RouteResult<Json<ReliabilitySeedReport>> {
    require_ingest_token(&token)?;

    let window_days = body.window_days.clamp(1, 90);
    let mode = if body.overwrite {
        reliability::SeedMode::Overwrite
    } else {
        reliability::SeedMode::FillGapsOnly
    };
    let today = Utc::now().date_naive();

    let records_written = reliability::seed_from_static(core.store.as_ref(), window_days, mode, today).await?;
    core.result_cache.invalidate_all().await;

    Ok(Json(ReliabilitySeedReport { records_written }))
}
