//! Cross-module integration scenarios. Pure-function scenarios (bucket
//! classification, the live-risk combiner in isolation) live as unit tests
//! next to the functions they exercise, in `src/time.rs` and `src/risk.rs`
//! respectively; this file covers behavior that only emerges once routing,
//! scheduling, and the timetable store are wired together.

use chrono::{TimeZone, Utc};

use transit::config::RoutingConfig;
use transit::graph::build_graph;
use transit::routing::find_routes;
use transit::testutil::{stop, stop_time, trip, InMemoryStore};
use transit::Core;

fn departure_dt(hour: u32, minute: u32) -> chrono::DateTime<Utc> {
    // Monday, so weekday-dependent risk modifiers never fire unexpectedly.
    Utc.with_ymd_and_hms(2026, 2, 2, hour, minute, 0).unwrap()
}

#[tokio::test]
async fn s4_transfer_buffer_skips_too_tight_connection() {
    let stops = vec![
        stop("A", "Stop A", 50.0, 10.0),
        stop("B", "Stop B", 50.01, 10.0),
        stop("C", "Stop C", 50.02, 10.0),
    ];
    let trips = vec![
        trip("T1", "R1", "20260202"),
        trip("T2", "R2", "20260202"),
        trip("T3", "R2", "20260202"),
    ];
    let stop_times = vec![
        stop_time("T1", "A", 1, "08:00:00", "08:00:00"),
        stop_time("T1", "B", 2, "08:10:00", "08:10:00"),
        // Too tight: only 2 minutes after T1 arrives, below the 10-minute
        // default buffer.
        stop_time("T2", "B", 1, "08:12:00", "08:12:00"),
        stop_time("T2", "C", 2, "08:20:00", "08:20:00"),
        // Satisfies the buffer: departs exactly 10 minutes after T1 arrives.
        stop_time("T3", "B", 1, "08:20:00", "08:20:00"),
        stop_time("T3", "C", 2, "08:35:00", "08:35:00"),
    ];

    let store = InMemoryStore::new(stops, Vec::new(), trips, stop_times);
    let config = RoutingConfig::default();
    let snapshot = build_graph(&store, &config).await.unwrap();

    let origin = utility::id::Id::new("A".to_owned());
    let destination = utility::id::Id::new("C".to_owned());
    let routes = find_routes(&store, &snapshot, &config, &origin, &destination, departure_dt(8, 0), 1)
        .await
        .unwrap();

    assert_eq!(routes.len(), 1);
    let trip_legs: Vec<_> = routes[0]
        .legs
        .iter()
        .filter_map(|leg| match leg {
            model::leg::Leg::Trip(trip_leg) => Some(trip_leg),
            model::leg::Leg::Walk(_) => None,
        })
        .collect();
    assert_eq!(trip_legs.len(), 2);
    assert_eq!(trip_legs[1].trip_id.raw(), "T3");
    assert_eq!(trip_legs[1].departure_time, "08:20:00");
}

#[tokio::test]
async fn s5_k_shortest_returns_distinct_routes_when_available() {
    let stops = vec![
        stop("A", "Stop A", 50.0, 10.0),
        stop("B", "Stop B", 50.05, 10.0),
        stop("C", "Stop C", 50.1, 10.0),
    ];
    let trips = vec![trip("T1", "R1", "20260202"), trip("T2", "R2", "20260202"), trip("T3", "R3", "20260202")];
    let stop_times = vec![
        stop_time("T1", "A", 1, "08:00:00", "08:00:00"),
        stop_time("T1", "B", 2, "08:10:00", "08:10:00"),
        stop_time("T2", "B", 1, "08:20:00", "08:20:00"),
        stop_time("T2", "C", 2, "08:30:00", "08:30:00"),
        stop_time("T3", "A", 1, "08:05:00", "08:05:00"),
        stop_time("T3", "C", 2, "08:40:00", "08:40:00"),
    ];

    let store = InMemoryStore::new(stops, Vec::new(), trips, stop_times);
    let config = RoutingConfig::default();
    let snapshot = build_graph(&store, &config).await.unwrap();

    let origin = utility::id::Id::new("A".to_owned());
    let destination = utility::id::Id::new("C".to_owned());
    let routes = find_routes(&store, &snapshot, &config, &origin, &destination, departure_dt(7, 50), 2)
        .await
        .unwrap();

    assert_eq!(routes.len(), 2);
    let signatures: Vec<_> = routes.iter().map(|route| route.trip_id_signature()).collect();
    assert_ne!(signatures[0], signatures[1]);
}

#[tokio::test]
async fn s6_missing_vehicle_risk_flows_through_scored_routes() {
    let stops = vec![stop("A", "Stop A", 50.0, 10.0), stop("B", "Stop B", 50.01, 10.0)];
    let trips = vec![trip("T1", "R1", "20260202")];
    let stop_times = vec![
        stop_time("T1", "A", 1, "08:00:00", "08:00:00"),
        stop_time("T1", "B", 2, "08:10:00", "08:10:00"),
    ];

    let store = std::sync::Arc::new(InMemoryStore::new(stops, Vec::new(), trips, stop_times));
    let config = RoutingConfig::default();
    let snapshot = build_graph(store.as_ref(), &config).await.unwrap();

    let core = Core::new(store, config);
    core.graph_cache.swap(snapshot);

    let origin = utility::id::Id::new("A".to_owned());
    let destination = utility::id::Id::new("B".to_owned());
    // 10 minutes before the trip departs, with no vehicle position on
    // record: the missing-vehicle bump applies, no other modifiers do.
    let scored = core
        .find_scored_routes(&origin, &destination, departure_dt(7, 50), 1)
        .await
        .unwrap();

    assert_eq!(scored.len(), 1);
    assert!((scored[0].risk_score - 0.28).abs() < 1e-9);
    let model::leg::Leg::Trip(trip_leg) = &scored[0].legs[0] else {
        panic!("expected a trip leg");
    };
    let risk = trip_leg.risk.as_ref().expect("trip leg must carry a risk assessment");
    assert!(risk.modifiers.iter().any(|m| m == "no vehicle position"));
    assert_eq!(risk.risk_label, model::leg::RiskLabel::Low);
}
