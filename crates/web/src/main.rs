use std::sync::Arc;

use database::{DatabaseConnectionInfo, PgTimetableStore};
use transit::config::RoutingConfig;
use transit::error::CoreError;
use transit::live::LiveSnapshot;
use transit::scheduler::{spawn_live_poll, spawn_static_refresh};
use transit::Core;
use web::{start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    let database_connection_info = DatabaseConnectionInfo::from_env().expect("expected database connection info in env.");
    let store = Arc::new(PgTimetableStore::connect(&database_connection_info).await.expect("could not connect to database."));

    let config = RoutingConfig::from_env();
    let core = Core::new(store.clone(), config.clone());

    spawn_static_refresh(store, core.graph_cache.clone(), config.clone());

    let realtime_url = std::env::var("GTFS_REALTIME_URL").unwrap_or_else(|_| gtfs::sources::GERMANY_REALTIME.to_owned());
    spawn_live_poll(core.live_store.clone(), config, move || {
        let realtime_url = realtime_url.clone();
        async move { fetch_live_snapshot(&realtime_url).await }
    });

    let web_future = start_web_server(WebState { core });
    let _ = web_future.await;
}

async fn fetch_live_snapshot(url: &str) -> Result<LiveSnapshot, CoreError> {
    let decoded = gtfs::realtime::poll_feed(url).await?;
    Ok(LiveSnapshot {
        trip_updates: decoded.trip_updates.into_iter().map(|update| (update.trip_id.clone(), update)).collect(),
        alerts: decoded.alerts,
        vehicle_positions: decoded.vehicle_positions.into_iter().map(|position| (position.trip_id.clone(), position)).collect(),
    })
}
