//! Coordinate parsing, great-circle distance and output rounding.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
/// Rough metres per degree, used only for ranking heuristics.
const METERS_PER_DEGREE: f64 = 111_000.0;
const COORDINATE_SCALE: f64 = 1_000_000.0;

/// A WGS84 point in decimal degrees. Both components are always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Returns `None` unless both components are finite.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        (lat.is_finite() && lng.is_finite()).then_some(Self { lat, lng })
    }

    /// `"lat,lng"` form used in provider query strings.
    pub fn to_query_value(self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// Parses a user-supplied origin from either a `"lat,lng"` string or a
/// `{ "lat": <number>, "lng": <number> }` object.
///
/// Never fails: any other shape, a missing component or a non-finite value
/// yields `None`, and the caller decides whether that is fatal.
pub fn parse_origin(input: &Value) -> Option<LatLng> {
    match input {
        Value::String(s) => {
            let mut parts = s.split(',').map(str::trim);
            let lat = parts.next()?.parse::<f64>().ok()?;
            let lng = parts.next()?.parse::<f64>().ok()?;
            LatLng::new(lat, lng)
        }
        Value::Object(map) => {
            let lat = map.get("lat")?.as_f64()?;
            let lng = map.get("lng")?.as_f64()?;
            LatLng::new(lat, lng)
        }
        _ => None,
    }
}

/// Great-circle distance in metres on a sphere of radius 6,371 km.
pub fn haversine_distance_meters(a: LatLng, b: LatLng) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// Flat-earth approximation: Euclidean distance in degrees scaled to metres.
/// Only for the ranking bonus, never for filtering.
pub fn approx_distance_meters(a: LatLng, b: LatLng) -> f64 {
    let dlat = b.lat - a.lat;
    let dlng = b.lng - a.lng;
    (dlat * dlat + dlng * dlng).sqrt() * METERS_PER_DEGREE
}

/// Rounds a coordinate to 6 decimal places (~0.1 m).
pub fn round_coordinate(x: f64) -> f64 {
    (x * COORDINATE_SCALE).round() / COORDINATE_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    #[test]
    fn test_parse_origin_from_string() {
        let origin = parse_origin(&json!("12.9716,77.5946")).unwrap();
        assert_eq!(origin, point(12.9716, 77.5946));
    }

    #[test]
    fn test_parse_origin_tolerates_whitespace() {
        let origin = parse_origin(&json!("  -33.8688 , 151.2093 ")).unwrap();
        assert_eq!(origin, point(-33.8688, 151.2093));
    }

    #[test]
    fn test_parse_origin_from_object() {
        let origin = parse_origin(&json!({"lat": 48.8566, "lng": 2.3522})).unwrap();
        assert_eq!(origin, point(48.8566, 2.3522));
    }

    #[test]
    fn test_parse_origin_string_round_trips() {
        for (lat, lng) in [(0.0, 0.0), (51.5074, -0.1278), (-90.0, 180.0), (1e-7, -1e-7)] {
            let text = format!("{lat},{lng}");
            assert_eq!(parse_origin(&json!(text)), Some(point(lat, lng)), "input {text}");
        }
    }

    #[test]
    fn test_parse_origin_rejects_other_shapes() {
        let inputs = [
            json!(null),
            json!(""),
            json!("12.9"),
            json!("abc,def"),
            json!("12.9,"),
            json!("NaN,1"),
            json!("inf,1"),
            json!(42),
            json!(true),
            json!([12.9, 77.5]),
            json!({"lat": "12.9", "lng": "77.5"}),
            json!({"lat": 12.9}),
            json!({"latitude": 12.9, "longitude": 77.5}),
        ];
        for input in inputs {
            assert_eq!(parse_origin(&input), None, "input {input}");
        }
    }

    #[test]
    fn test_haversine_zero_for_same_point() {
        let a = point(12.9716, 77.5946);
        assert_eq!(haversine_distance_meters(a, a), 0.0);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let a = point(44.9778, -93.2650);
        let b = point(44.9537, -93.0900);
        let ab = haversine_distance_meters(a, b);
        let ba = haversine_distance_meters(b, a);
        assert!((ab - ba).abs() < 1e-6, "{ab} vs {ba}");
    }

    #[test]
    fn test_haversine_known_distance() {
        // Minneapolis to St Paul downtowns, roughly 14 km apart.
        let d = haversine_distance_meters(point(44.9778, -93.2650), point(44.9537, -93.0900));
        assert!(d > 13_000.0 && d < 15_000.0, "got {d}m");
    }

    #[test]
    fn test_approx_distance_one_degree() {
        let d = approx_distance_meters(point(0.0, 0.0), point(1.0, 0.0));
        assert!((d - 111_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_round_coordinate_six_places() {
        assert_eq!(round_coordinate(12.971_598_7), 12.971_599);
        assert_eq!(round_coordinate(-77.594_600_4), -77.5946);
    }

    #[test]
    fn test_round_coordinate_idempotent() {
        for x in [12.971_598_7, -0.000_000_5, 179.999_999_9, 45.123_456_789] {
            let once = round_coordinate(x);
            assert_eq!(round_coordinate(once), once, "input {x}");
        }
    }

    #[test]
    fn test_query_value_format() {
        assert_eq!(point(12.5, -3.25).to_query_value(), "12.5,-3.25");
    }
}
