use std::collections::HashSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use futures::FutureExt;
use tokio::sync::Mutex;

use database::TimetableStore;
use model::trip::TripId;

use crate::config::RoutingConfig;
use crate::error::CoreError;
use crate::graph::{build_graph, GraphCache};
use crate::live::{LiveSnapshot, LiveStateStore};

/// What a job's single tick should do next. Mirrors the teacher's
/// `Collector::Continuation`, trimmed to the two outcomes this core's jobs
/// actually produce — there is no `Restart`/`Exit` here because neither
/// job holds state that needs rebuilding from scratch.
enum Continuation {
    ContinueAfter(Duration),
}

/// Runs `tick` on a fixed interval forever, catching panics so one bad
/// iteration does not take down the whole background task — the same
/// discipline the teacher's `collector::run` applies via
/// `AssertUnwindSafe(...).catch_unwind()`.
async fn run_forever<F, Fut>(label: &'static str, mut tick: F)
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<Continuation, CoreError>> + Send,
{
    loop {
        let outcome = AssertUnwindSafe(tick()).catch_unwind().await;
        let wait = match outcome {
            Ok(Ok(Continuation::ContinueAfter(duration))) => duration,
            Ok(Err(why)) => {
                log::warn!("{label} tick failed: {why}");
                Duration::from_secs(30)
            }
            Err(_) => {
                log::error!("{label} tick panicked");
                Duration::from_secs(30)
            }
        };
        tokio::time::sleep(wait).await;
    }
}

/// Rebuilds the routing graph from the timetable store on a fixed
/// interval and swaps it into `cache`. Spawned once at startup; runs for
/// the lifetime of the process.
pub fn spawn_static_refresh<D>(store: Arc<D>, cache: GraphCache, config: RoutingConfig)
where
    D: TimetableStore + 'static,
{
    let interval = Duration::from_secs(config.gtfs_refresh_hours.max(1) * 3600);
    tokio::spawn(run_forever("static_refresh", move || {
        let store = Arc::clone(&store);
        let cache = cache.clone();
        let config = config.clone();
        async move {
            log::info!("rebuilding routing graph from timetable store");
            let snapshot = build_graph(store.as_ref(), &config).await?;
            log::info!(
                "graph rebuilt: {} stops, {} edges",
                snapshot.stop_count(),
                snapshot.edge_count()
            );
            cache.swap(snapshot);
            Ok(Continuation::ContinueAfter(interval))
        }
    }));
}

/// A decoder function supplied by the caller so `transit` itself never
/// links against a specific HTTP client or feed URL — only `gtfs`'s
/// decode step and a feed URL are needed here.
pub fn spawn_live_poll<F, Fut>(live_store: LiveStateStore, config: RoutingConfig, fetch: F)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<LiveSnapshot, CoreError>> + Send,
{
    if config.poll_seconds == 0 {
        log::info!("live feed polling disabled (POLL_SECONDS=0)");
        return;
    }
    let interval = Duration::from_secs(config.poll_seconds);
    let fetch = Arc::new(fetch);
    tokio::spawn(run_forever("live_poll", move || {
        let live_store = live_store.clone();
        let fetch = Arc::clone(&fetch);
        async move {
            let Some(_permit) = live_store.try_begin_poll() else {
                log::debug!("skipping live poll tick: previous poll still in flight");
                return Ok(Continuation::ContinueAfter(interval));
            };
            let snapshot = fetch().await?;
            live_store.swap(snapshot);
            Ok(Continuation::ContinueAfter(interval))
        }
    }));
}

/// Tracks which trips have already had a departure observation recorded
/// today, so a job that re-polls the same trip_update repeatedly does not
/// double-count it into the reliability counters. Resets at local
/// midnight rather than persisting to storage, matching §4.F's framing of
/// departure observation as an in-memory dedup concern.
#[derive(Clone)]
pub struct DepartureObservationTracker {
    inner: Arc<Mutex<TrackerState>>,
}

struct TrackerState {
    recorded_today: HashSet<TripId>,
    day: NaiveDate,
}

impl Default for DepartureObservationTracker {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(TrackerState {
                recorded_today: HashSet::new(),
                day: Local::now().date_naive(),
            })),
        }
    }
}

impl DepartureObservationTracker {
    /// Returns `true` the first time `trip_id` is seen on the current
    /// local day, and `false` on every subsequent call until the day
    /// rolls over.
    pub async fn should_record(&self, trip_id: &TripId) -> bool {
        let mut state = self.inner.lock().await;
        let today = Local::now().date_naive();
        if today != state.day {
            state.recorded_today.clear();
            state.day = today;
        }
        state.recorded_today.insert(trip_id.clone())
    }
}
