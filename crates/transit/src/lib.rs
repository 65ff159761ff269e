pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod live;
pub mod reliability;
pub mod risk;
pub mod routing;
pub mod scheduler;
pub mod testutil;
pub mod time;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use database::TimetableStore;
use model::health::HealthResponse;
use model::leg::{Leg, RiskInfo, ScoredRoute};
use model::route::RouteId;
use model::stop::{StopId, StopResult};

use cache::{CacheKey, ResultCache};
use config::RoutingConfig;
use error::CoreError;
use graph::GraphCache;
use live::LiveStateStore;
use risk::LiveSnapshots;

/// Application-scoped context: one instance per process, shared across all
/// request handlers via `Clone` (every field is itself an `Arc` or cheaply
/// cloneable handle, matching the teacher's app-state pattern of handing
/// out a small `Clone` struct rather than a `&'static` or a lock).
#[derive(Clone)]
pub struct Core<D: TimetableStore + 'static> {
    pub store: Arc<D>,
    pub graph_cache: GraphCache,
    pub live_store: LiveStateStore,
    pub result_cache: Arc<ResultCache>,
    pub config: RoutingConfig,
}

impl<D: TimetableStore + 'static> Core<D> {
    pub fn new(store: Arc<D>, config: RoutingConfig) -> Self {
        Self {
            store,
            graph_cache: GraphCache::default(),
            live_store: LiveStateStore::default(),
            result_cache: Arc::new(ResultCache::default()),
            config,
        }
    }

    /// Full request path: cache lookup, routing, then live-risk scoring of
    /// every trip leg in every candidate route. §4.I ties these stages
    /// together; each stage here is itself unit-tested in isolation.
    pub async fn find_scored_routes(
        &self,
        origin: &StopId,
        destination: &StopId,
        departure_dt: DateTime<Utc>,
        k: usize,
    ) -> Result<Vec<ScoredRoute>, CoreError> {
        let cache_key = CacheKey::new(origin, destination, departure_dt);
        let routes = match self.result_cache.get(&cache_key).await {
            Some(cached) => cached,
            None => {
                let snapshot = self.graph_cache.load();
                let routes = routing::find_routes(
                    self.store.as_ref(),
                    &snapshot,
                    &self.config,
                    origin,
                    destination,
                    departure_dt,
                    k,
                )
                .await?;
                self.result_cache.put(cache_key, routes.clone()).await;
                routes
            }
        };

        let trip_updates = self.live_store.trip_updates();
        let alerts = self.live_store.alerts();
        let vehicle_positions = self.live_store.vehicle_positions();
        let live = LiveSnapshots {
            trip_updates: &trip_updates,
            alerts: &alerts,
            vehicle_positions: &vehicle_positions,
        };

        let mut scored_routes = Vec::with_capacity(routes.len());
        for route in routes {
            scored_routes.push(self.score_route(route, &live, departure_dt).await?);
        }
        Ok(scored_routes)
    }

    /// Case-insensitive substring match on stop name, each hit annotated
    /// with the sorted unique set of routes serving it. `limit` bounds the
    /// result count, not the scan — every stop is still considered.
    pub async fn search_stops(&self, query: &str, limit: usize) -> Result<Vec<StopResult>, CoreError> {
        let stops = self.store.list_stops().await?;
        let rows = self.store.list_stop_times_with_trips().await?;

        let mut routes_by_stop: HashMap<StopId, BTreeSet<RouteId>> = HashMap::new();
        for (trip, stop_time) in &rows {
            routes_by_stop.entry(stop_time.stop_id.clone()).or_default().insert(trip.route_id.clone());
        }

        let needle = query.to_lowercase();
        let mut results: Vec<StopResult> = stops
            .into_iter()
            .filter(|stop| stop.name.to_lowercase().contains(&needle))
            .map(|stop| {
                let routes_served = routes_by_stop.get(&stop.id).cloned().unwrap_or_default().into_iter().collect();
                StopResult {
                    stop_id: stop.id,
                    stop_name: stop.name,
                    lat: stop.latitude,
                    lon: stop.longitude,
                    routes_served,
                }
            })
            .collect();
        results.truncate(limit);
        Ok(results)
    }

    /// Operational snapshot: feed volume straight from the store, graph
    /// freshness from the cached snapshot, live-poll configuration from
    /// `config`. Never touches the live feed itself — a stalled poller
    /// still leaves `health` responsive.
    pub async fn health(&self) -> Result<HealthResponse, CoreError> {
        let stop_count = self.store.list_stops().await?.len();
        let trip_count = self.store.trip_count().await?;
        let reliability_record_count = self.store.reliability_record_count().await?;

        let snapshot = self.graph_cache.load();
        let next_refresh_at = snapshot
            .built_at
            .map(|built_at| built_at + chrono::Duration::hours(self.config.gtfs_refresh_hours as i64));

        Ok(HealthResponse {
            stop_count,
            trip_count,
            reliability_record_count,
            graph_stop_count: snapshot.stop_count(),
            graph_edge_count: snapshot.edge_count(),
            graph_built_at: snapshot.built_at,
            next_refresh_at,
            live_poll_enabled: self.config.poll_seconds > 0,
            poll_seconds: self.config.poll_seconds,
        })
    }

    async fn score_route(
        &self,
        route: model::leg::Route,
        live: &LiveSnapshots<'_>,
        departure_dt: DateTime<Utc>,
    ) -> Result<ScoredRoute, CoreError> {
        let mut legs = Vec::with_capacity(route.legs.len());
        let mut total_travel_seconds = 0i64;
        let mut total_walk_metres = 0.0;
        let mut transfers = 0i32;
        let mut last_route_id = None;
        let mut worst_risk = 0.0f64;
        let bucket = time::classify_bucket(departure_dt);

        for leg in route.legs {
            match leg {
                Leg::Walk(walk_leg) => {
                    total_travel_seconds += walk_leg.walk_seconds;
                    total_walk_metres += walk_leg.distance_m;
                    legs.push(Leg::Walk(walk_leg));
                }
                Leg::Trip(mut trip_leg) => {
                    total_travel_seconds += trip_leg.travel_seconds;
                    if let Some(previous) = &last_route_id {
                        if previous != &trip_leg.route_id {
                            transfers += 1;
                        }
                    }
                    last_route_id = Some(trip_leg.route_id.clone());

                    let historical = reliability::get_historical_reliability(
                        self.store.as_ref(),
                        &trip_leg.route_id,
                        &trip_leg.from_stop_id,
                        bucket,
                    )
                    .await?;

                    let risk = risk::compute_live_risk(
                        live,
                        &trip_leg.route_id,
                        &trip_leg.from_stop_id,
                        &trip_leg.trip_id,
                        &trip_leg.departure_time,
                        departure_dt,
                        historical,
                    );
                    worst_risk = worst_risk.max(risk.risk_score);
                    trip_leg.risk = Some(RiskInfo {
                        risk_score: risk.risk_score,
                        risk_label: risk.risk_label,
                        modifiers: risk.modifiers,
                        is_cancelled: risk.is_cancelled,
                    });
                    legs.push(Leg::Trip(trip_leg));
                }
            }
        }

        Ok(ScoredRoute {
            legs,
            total_travel_seconds,
            transfers,
            total_walk_metres,
            risk_score: worst_risk,
            risk_label: model::leg::RiskLabel::from_score(worst_risk),
        })
    }
}

