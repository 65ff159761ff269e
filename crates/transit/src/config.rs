use std::env;

/// Risk-bump constants from §6. Fixed, not environment-tunable.
pub const NEUTRAL_RELIABILITY_PRIOR: f64 = 0.8;
pub const ALERT_RISK_BUMP: f64 = 0.10;
pub const CANCELLATION_RISK_BUMP: f64 = 0.15;
pub const MISSING_VEHICLE_RISK_BUMP: f64 = 0.08;
pub const LATE_EVENING_RISK_BUMP: f64 = 0.05;
pub const WEEKEND_RISK_BUMP: f64 = 0.03;

/// Runtime-tunable routing and scheduling parameters, loaded once at
/// startup. Modeled directly on `database::DatabaseConnectionInfo::from_env`:
/// each field reads its own environment variable and falls back to a
/// documented default via `.unwrap_or(default)`.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    pub max_routes: usize,
    pub max_transfers: i32,
    pub min_transfer_minutes: i64,
    pub max_walk_metres: f64,
    pub walk_speed_kph: f64,
    pub gtfs_refresh_hours: u64,
    pub poll_seconds: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_routes: 5,
            max_transfers: 2,
            min_transfer_minutes: 10,
            max_walk_metres: 500.0,
            walk_speed_kph: 4.5,
            gtfs_refresh_hours: 24,
            poll_seconds: 30,
        }
    }
}

impl RoutingConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_routes: env::var("MAX_ROUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_routes),
            max_transfers: env::var("MAX_TRANSFERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_transfers),
            min_transfer_minutes: env::var("MIN_TRANSFER_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.min_transfer_minutes),
            max_walk_metres: env::var("MAX_WALK_METRES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_walk_metres),
            walk_speed_kph: env::var("WALK_SPEED_KPH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.walk_speed_kph),
            gtfs_refresh_hours: env::var("GTFS_REFRESH_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.gtfs_refresh_hours),
            poll_seconds: env::var("POLL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.poll_seconds),
        }
    }

    /// Walking speed expressed in metres per second, for walk-edge timing.
    pub fn walk_speed_mps(&self) -> f64 {
        self.walk_speed_kph * 1000.0 / 3600.0
    }
}
