use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::geo::{parse_origin, LatLng};
use crate::locations::assembler::LocationResult;
use crate::locations::resolver::{find_task_location, suggest_locations, MISSING_ORIGIN_MESSAGE};
use crate::routes::{required_text, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    pub user_input: Option<String>,
    pub user_location: Option<Value>,
    /// Any JSON value; only a number is used as a radius.
    pub radius_meters: Option<Value>,
}

/// `None` when absent or null; 400 when present but unparseable.
fn origin_from(user_location: Option<&Value>) -> Result<Option<LatLng>, AppError> {
    match user_location {
        None | Some(Value::Null) => Ok(None),
        Some(value) => parse_origin(value)
            .map(Some)
            .ok_or_else(|| AppError::InvalidInput(MISSING_ORIGIN_MESSAGE.to_string())),
    }
}

/// Lenient form for the single-best-match route: an unparseable location is no origin.
fn optional_origin(user_location: Option<&Value>) -> Option<LatLng> {
    let value = user_location.filter(|v| !v.is_null())?;
    let origin = parse_origin(value);
    if origin.is_none() {
        debug!(%value, "ignoring unparseable userLocation");
    }
    origin
}

/// POST /api/suggest-locations
pub async fn handle_suggest_locations(
    State(state): State<AppState>,
    payload: Result<Json<LocationRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<LocationResult>>>, AppError> {
    let places = state.places()?;
    let Json(req) = payload?;

    let query = required_text(req.user_input.as_deref(), "userInput")?;
    let origin = origin_from(req.user_location.as_ref())?;

    let results = suggest_locations(places, &query, origin, &state.config.search).await?;
    Ok(Json(ApiResponse::ok(results)))
}

/// POST /api/find-task-location
pub async fn handle_find_task_location(
    State(state): State<AppState>,
    payload: Result<Json<LocationRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LocationResult>>, AppError> {
    let places = state.places()?;
    let Json(req) = payload?;

    let query = required_text(req.user_input.as_deref(), "userInput")?;
    let origin = optional_origin(req.user_location.as_ref());
    let radius_override = req.radius_meters.as_ref().and_then(Value::as_f64);

    let result = find_task_location(
        places,
        &query,
        origin,
        radius_override,
        &state.config.search,
    )
    .await?;
    Ok(Json(ApiResponse::ok(result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uses_camel_case_fields() {
        let req: LocationRequest = serde_json::from_value(json!({
            "userInput": "coffee",
            "userLocation": "1,2",
            "radiusMeters": 5000
        }))
        .unwrap();
        assert_eq!(req.user_input.as_deref(), Some("coffee"));
        assert_eq!(req.radius_meters, Some(json!(5000)));
    }

    #[test]
    fn test_non_numeric_radius_is_accepted_by_request() {
        let req: LocationRequest = serde_json::from_value(json!({
            "userInput": "dentist",
            "radiusMeters": "5000"
        }))
        .unwrap();
        assert_eq!(req.radius_meters.as_ref().and_then(Value::as_f64), None);
    }

    #[test]
    fn test_optional_origin_ignores_garbage() {
        assert_eq!(optional_origin(Some(&json!("somewhere"))), None);
        assert_eq!(optional_origin(Some(&Value::Null)), None);
        assert_eq!(
            optional_origin(Some(&json!("12.9716,77.5946"))),
            Some(LatLng { lat: 12.9716, lng: 77.5946 })
        );
    }

    #[test]
    fn test_absent_or_null_location_is_no_origin() {
        assert_eq!(origin_from(None).unwrap(), None);
        assert_eq!(origin_from(Some(&Value::Null)).unwrap(), None);
    }

    #[test]
    fn test_unparseable_location_is_rejected() {
        let err = origin_from(Some(&json!({"lat": "north"}))).unwrap_err();
        assert_eq!(err.to_string(), MISSING_ORIGIN_MESSAGE);
    }

    #[test]
    fn test_object_location_is_parsed() {
        let origin = origin_from(Some(&json!({"lat": 48.85, "lng": 2.35}))).unwrap();
        assert_eq!(origin, Some(LatLng { lat: 48.85, lng: 2.35 }));
    }
}
