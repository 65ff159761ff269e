/// Mean earth radius in metres, per the WGS84-adjacent convention used
/// throughout the transit stack.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Great-circle distance between two WGS84 coordinates, in metres.
pub fn haversine_distance_m(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Bounding box (min, max) lat/lon around a point, for a coarse pre-filter
/// before a precise haversine check.
pub fn calculate_bounding_box(
    lat: f64,
    lon: f64,
    radius_m: f64,
) -> ((f64, f64), (f64, f64)) {
    let lat_rad = to_radians(lat);
    let lon_rad = to_radians(lon);

    let min_lat = lat_rad - radius_m / EARTH_RADIUS_M;
    let max_lat = lat_rad + radius_m / EARTH_RADIUS_M;

    let min_lon = lon_rad - radius_m / (EARTH_RADIUS_M * lat_rad.cos());
    let max_lon = lon_rad + radius_m / (EARTH_RADIUS_M * lat_rad.cos());

    (
        (to_degrees(min_lat), to_degrees(min_lon)),
        (to_degrees(max_lat), to_degrees(max_lon)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        assert_eq!(haversine_distance_m(52.5, 13.4, 52.5, 13.4), 0.0);
    }

    #[test]
    fn known_distance_berlin_hamburg_is_roughly_255km() {
        let d = haversine_distance_m(52.520008, 13.404954, 53.551086, 9.993682);
        assert!((d - 255_000.0).abs() < 5_000.0, "distance was {d}");
    }

    #[test]
    fn bounding_box_contains_origin() {
        let ((min_lat, min_lon), (max_lat, max_lon)) =
            calculate_bounding_box(52.5, 13.4, 500.0);
        assert!(min_lat < 52.5 && 52.5 < max_lat);
        assert!(min_lon < 13.4 && 13.4 < max_lon);
    }
}
