pub use crate::common::RouteResult;

use axum::{routing::get_service, Router};
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};

pub mod api;
pub mod common;
pub mod ingest_auth;

/// Application state handed to every request handler. `core` carries
/// everything routing, search, and ingest need; there is nothing web-layer
/// specific left to store alongside it since HATEOAS link-building was
/// dropped.
#[derive(Clone)]
pub struct WebState {
    pub core: transit::Core<database::PgTimetableStore>,
}

pub async fn start_web_server(state: WebState) -> std::io::Result<()> {
    let health_router = Router::new().route("/health", axum::routing::get(api::health::health)).with_state(state.clone());

    let routes = Router::new()
        .merge(health_router)
        .nest_service("/api", api::routes(state))
        .fallback_service(static_content_router());

    let listener = TcpListener::bind("0.0.0.0:8080").await?;
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

fn static_content_router() -> Router {
    Router::new().nest_service(
        "/",
        get_service(ServeDir::new("./resources/www/").not_found_service(ServeFile::new("./resources/www/error404.html"))),
    )
}
