use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use model::leg::Route;
use model::stop::StopId;

const RESULT_TTL: Duration = Duration::from_secs(3600);

/// Key for a cached `find_routes` answer: origin, destination, and the
/// departure time truncated to the minute, per §4.J.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub origin: StopId,
    pub destination: StopId,
    pub date: String,
    pub minute: String,
}

impl CacheKey {
    pub fn new(origin: &StopId, destination: &StopId, departure_dt: DateTime<Utc>) -> Self {
        Self {
            origin: origin.clone(),
            destination: destination.clone(),
            date: departure_dt.format("%Y-%m-%d").to_string(),
            minute: departure_dt.format("%H:%M").to_string(),
        }
    }
}

/// In-memory cache of recent routing answers, keyed by `(O, D, date,
/// minute)` with a one-hour TTL. A live-feed poll that changes risk
/// scoring does not invalidate this cache; only the graph rebuild does
/// (via `invalidate_all`), since the cached value is the unscored
/// `Route` list, not risk-annotated output.
#[derive(Default)]
pub struct ResultCache {
    entries: Mutex<HashMap<CacheKey, (Instant, Vec<Route>)>>,
}

impl ResultCache {
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<Route>> {
        let entries = self.entries.lock().await;
        let (stored_at, routes) = entries.get(key)?;
        if stored_at.elapsed() > RESULT_TTL {
            return None;
        }
        Some(routes.clone())
    }

    pub async fn put(&self, key: CacheKey, routes: Vec<Route>) {
        let mut entries = self.entries.lock().await;
        entries.insert(key, (Instant::now(), routes));
    }

    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.lock().await;
        entries.clear();
    }
}
