use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::Mutex;

use model::live::{LiveTripUpdate, ServiceAlert, VehiclePosition};
use model::trip::TripId;

/// A single poll's worth of decoded live data, handed wholesale to
/// `LiveStateStore::swap`.
#[derive(Debug, Default)]
pub struct LiveSnapshot {
    pub trip_updates: HashMap<TripId, LiveTripUpdate>,
    pub alerts: Vec<ServiceAlert>,
    pub vehicle_positions: HashMap<TripId, VehiclePosition>,
}

/// Three independent wholesale-swapped maps: trip updates, alerts, and
/// vehicle positions. Each `ArcSwap` gives readers a stable, never
/// half-swapped view; a `poll_permit` mutex coalesces concurrent polls so
/// at most one fetch-and-swap is in flight at a time, matching the
/// teacher's `Collector` "one iteration in flight" discipline.
#[derive(Clone)]
pub struct LiveStateStore {
    trip_updates: Arc<ArcSwap<HashMap<TripId, LiveTripUpdate>>>,
    alerts: Arc<ArcSwap<Vec<ServiceAlert>>>,
    vehicle_positions: Arc<ArcSwap<HashMap<TripId, VehiclePosition>>>,
    poll_permit: Arc<Mutex<()>>,
}

impl Default for LiveStateStore {
    fn default() -> Self {
        Self {
            trip_updates: Arc::new(ArcSwap::from_pointee(HashMap::new())),
            alerts: Arc::new(ArcSwap::from_pointee(Vec::new())),
            vehicle_positions: Arc::new(ArcSwap::from_pointee(HashMap::new())),
            poll_permit: Arc::new(Mutex::new(())),
        }
    }
}

impl LiveStateStore {
    pub fn trip_updates(&self) -> Arc<HashMap<TripId, LiveTripUpdate>> {
        self.trip_updates.load_full()
    }

    pub fn alerts(&self) -> Arc<Vec<ServiceAlert>> {
        self.alerts.load_full()
    }

    pub fn vehicle_positions(&self) -> Arc<HashMap<TripId, VehiclePosition>> {
        self.vehicle_positions.load_full()
    }

    pub fn swap(&self, snapshot: LiveSnapshot) {
        self.trip_updates.store(Arc::new(snapshot.trip_updates));
        self.alerts.store(Arc::new(snapshot.alerts));
        self.vehicle_positions
            .store(Arc::new(snapshot.vehicle_positions));
    }

    /// Attempts to acquire the poll permit without waiting. `None` means a
    /// poll is already in flight and this tick should be skipped entirely.
    pub fn try_begin_poll(&self) -> Option<tokio::sync::OwnedMutexGuard<()>> {
        Arc::clone(&self.poll_permit).try_lock_owned().ok()
    }
}
