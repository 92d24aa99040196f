//! Location Candidate Resolver: the pipeline behind both location endpoints.
//!
//! `suggest_locations`: a list of nearby places, nearest first.
//!   With an origin: iterative radius search, then one nearby-search fallback.
//!   Without one: rejected, or ranked by quality when origins are optional.
//!
//! `find_task_location`: the single best place for a task, ranked by quality
//! and proximity, with a find-place fallback when the text search is empty.

use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::geo::LatLng;
use crate::locations::assembler::{query_match_description, LocationResult, TOP_MATCH_DESCRIPTION};
use crate::locations::radius_search::{iterative_radius_search, measure_and_rank, SearchOutcome};
use crate::locations::ranking::{rank_by_quality, DistanceSource, RankedCandidate};
use crate::locations::SearchSettings;
use crate::places::PlaceProvider;

pub const MISSING_ORIGIN_MESSAGE: &str = "Missing or invalid userLocation (lat,lng required)";
pub const NO_MATCH_MESSAGE: &str = "No matching locations found";

pub async fn suggest_locations(
    provider: &dyn PlaceProvider,
    query: &str,
    origin: Option<LatLng>,
    settings: &SearchSettings,
) -> Result<Vec<LocationResult>, AppError> {
    let Some(origin) = origin else {
        if settings.require_origin {
            return Err(AppError::InvalidInput(MISSING_ORIGIN_MESSAGE.to_string()));
        }
        return suggest_without_origin(provider, query, settings).await;
    };

    let ranked = match iterative_radius_search(provider, query, origin, settings).await {
        SearchOutcome::Found {
            radius_meters,
            results,
        } => {
            let road_measured = results
                .iter()
                .filter(|r| r.distance_source == DistanceSource::Road)
                .count();
            debug!(
                query,
                radius_meters,
                found = results.len(),
                road_measured,
                "locations found"
            );
            results
        }
        SearchOutcome::Exhausted { attempts } => {
            info!(query, attempts, "radius search exhausted, trying nearby search");
            nearby_fallback(provider, query, origin, settings).await
        }
        SearchOutcome::Unavailable {
            attempts,
            last_error,
        } => {
            warn!("Place search unavailable after {attempts} attempts: {last_error}");
            Vec::new()
        }
    };

    let fallback_description = query_match_description(query);
    Ok(ranked
        .iter()
        .map(|r| LocationResult::from_place(&r.place, r.eta_text.as_deref(), &fallback_description))
        .collect())
}

/// Keyword search ranked by the provider, kept only within the ceiling radius.
async fn nearby_fallback(
    provider: &dyn PlaceProvider,
    query: &str,
    origin: LatLng,
    settings: &SearchSettings,
) -> Vec<RankedCandidate> {
    let candidates = match provider
        .search_nearby(origin, query, settings.candidate_limit)
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!("Nearby search fallback failed: {e}");
            return Vec::new();
        }
    };

    measure_and_rank(
        provider,
        candidates,
        origin,
        f64::from(settings.schedule.ceiling_meters),
        settings.max_results,
    )
    .await
}

/// Single unbiased search ranked by quality. Provider failures propagate.
async fn suggest_without_origin(
    provider: &dyn PlaceProvider,
    query: &str,
    settings: &SearchSettings,
) -> Result<Vec<LocationResult>, AppError> {
    let candidates = provider.search_by_query(query, None, None).await?;
    let fallback_description = query_match_description(query);

    Ok(rank_by_quality(candidates, None)
        .iter()
        .take(settings.max_results)
        .map(|s| LocationResult::from_place(&s.place, None, &fallback_description))
        .collect())
}

pub async fn find_task_location(
    provider: &dyn PlaceProvider,
    query: &str,
    origin: Option<LatLng>,
    radius_override: Option<f64>,
    settings: &SearchSettings,
) -> Result<LocationResult, AppError> {
    let radius = bias_radius(radius_override, settings);
    let candidates = provider.search_by_query(query, origin, Some(radius)).await?;

    let best = match rank_by_quality(candidates, origin).into_iter().next() {
        Some(scored) => {
            debug!(query, score = scored.score, "best text-search match");
            scored.place
        }
        None => {
            debug!(query, "text search empty, falling back to find place");
            provider
                .find_place(query)
                .await?
                .ok_or_else(|| AppError::NotFound(NO_MATCH_MESSAGE.to_string()))?
        }
    };

    let eta = match origin {
        Some(origin) => match provider.distance_and_eta(origin, &[best.location()]).await {
            Ok(estimates) => estimates
                .into_iter()
                .next()
                .flatten()
                .and_then(|estimate| estimate.eta_text),
            Err(e) => {
                warn!("ETA lookup failed for {}: {e}", best.name);
                None
            }
        },
        None => None,
    };

    Ok(LocationResult::from_place(&best, eta.as_deref(), TOP_MATCH_DESCRIPTION))
}

/// A positive, finite caller radius capped at the configured maximum, else the default.
fn bias_radius(radius_override: Option<f64>, settings: &SearchSettings) -> u32 {
    match radius_override {
        Some(r) if r.is_finite() && r > 0.0 => {
            let capped = r.min(f64::from(settings.find_max_radius_meters)).round() as u32;
            capped.max(1)
        }
        _ => settings.find_default_radius_meters,
    }
}
