use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use model::live::{LiveTripUpdate, ServiceAlert, VehiclePosition};
use prost::Message;
use utility::id::Id;

use crate::data_model::realtime::{self, trip_descriptor::ScheduleRelationship};

/// Everything decoded out of one GTFS-Realtime poll, ready to be wholesale-
/// swapped into the live-state store.
#[derive(Debug, Default)]
pub struct DecodedFeed {
    pub trip_updates: Vec<LiveTripUpdate>,
    pub alerts: Vec<ServiceAlert>,
    pub vehicle_positions: Vec<VehiclePosition>,
}

/// Fetches and decodes a GTFS-Realtime feed. 15-second timeout so a hung
/// upstream never stalls the scheduler's poll cadence.
pub async fn poll_feed(url: &str) -> Result<DecodedFeed, Box<dyn std::error::Error + Send + Sync>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()?;
    let bytes = client.get(url).send().await?.bytes().await?;
    let message = realtime::FeedMessage::decode(&*bytes)?;
    Ok(decode_feed(message))
}

fn decode_feed(message: realtime::FeedMessage) -> DecodedFeed {
    let fetched_at = Utc::now();
    let mut feed = DecodedFeed::default();

    for entity in message.entity {
        if let Some(trip_update) = &entity.trip_update {
            if let Some(update) = decode_trip_update(trip_update, fetched_at) {
                feed.trip_updates.push(update);
            }
        }
        if let Some(vehicle) = &entity.vehicle {
            if let Some(position) = decode_vehicle_position(vehicle) {
                feed.vehicle_positions.push(position);
            }
        }
        if let Some(alert) = &entity.alert {
            feed.alerts
                .push(decode_alert(&entity.id, alert, fetched_at));
        }
    }

    feed
}

fn decode_trip_update(
    trip_update: &realtime::TripUpdate,
    fetched_at: chrono::DateTime<Utc>,
) -> Option<LiveTripUpdate> {
    let trip = &trip_update.trip;
    let trip_id = trip.trip_id.as_ref()?;
    let route_id = trip.route_id.clone().unwrap_or_default();

    let is_cancelled = matches!(
        trip.schedule_relationship(),
        ScheduleRelationship::Canceled | ScheduleRelationship::Deleted
    );

    let delay_seconds = trip_update.delay.map(i64::from).unwrap_or(0);

    let mut stop_delays = HashMap::new();
    for stop_time_update in &trip_update.stop_time_update {
        let Some(stop_id) = &stop_time_update.stop_id else {
            continue;
        };
        let delay = stop_time_update
            .arrival
            .as_ref()
            .and_then(|event| event.delay)
            .or_else(|| {
                stop_time_update
                    .departure
                    .as_ref()
                    .and_then(|event| event.delay)
            });
        if let Some(delay) = delay {
            stop_delays.insert(Id::new(stop_id.clone()), i64::from(delay));
        }
    }

    Some(LiveTripUpdate {
        trip_id: Id::new(trip_id.clone()),
        route_id: Id::new(route_id),
        delay_seconds,
        is_cancelled,
        stop_delays,
        fetched_at,
    })
}

fn decode_vehicle_position(vehicle: &realtime::VehiclePosition) -> Option<VehiclePosition> {
    let trip_id = vehicle.trip.as_ref()?.trip_id.as_ref()?;
    let position = vehicle.position.as_ref()?;
    let timestamp = vehicle
        .timestamp
        .and_then(|ts| chrono::DateTime::from_timestamp(ts as i64, 0))
        .unwrap_or_else(Utc::now);

    Some(VehiclePosition {
        trip_id: Id::new(trip_id.clone()),
        latitude: position.latitude as f64,
        longitude: position.longitude as f64,
        timestamp,
    })
}

fn decode_alert(
    id: &str,
    alert: &realtime::Alert,
    fetched_at: chrono::DateTime<Utc>,
) -> ServiceAlert {
    let header = alert
        .header_text
        .as_ref()
        .and_then(|t| t.translation.first())
        .map(|t| t.text.clone())
        .unwrap_or_default();
    let description = alert
        .description_text
        .as_ref()
        .and_then(|t| t.translation.first())
        .map(|t| t.text.clone())
        .unwrap_or_default();

    let mut affected_route_ids = Vec::new();
    let mut affected_stop_ids = Vec::new();
    for selector in &alert.informed_entity {
        if let Some(route_id) = &selector.route_id {
            affected_route_ids.push(Id::new(route_id.clone()));
        }
        if let Some(stop_id) = &selector.stop_id {
            affected_stop_ids.push(Id::new(stop_id.clone()));
        }
    }

    ServiceAlert {
        id: id.to_owned(),
        header,
        description,
        affected_route_ids,
        affected_stop_ids,
        fetched_at,
    }
}
