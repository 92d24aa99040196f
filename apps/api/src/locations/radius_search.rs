//! Iterative Radius Search: widens the search radius until something qualifies.
//!
//! Attempts run sequentially, one text search plus one Distance Matrix batch
//! each. The first attempt with at least one candidate inside its own radius
//! wins; larger radii are never tried after that (first fit, not best fit).
//! A transport failure only costs that attempt.

use tracing::{debug, warn};

use crate::geo::LatLng;
use crate::locations::ranking::{rank_within_radius, RankedCandidate};
use crate::locations::SearchSettings;
use crate::places::{PlaceCandidate, PlaceProvider, ProviderUnavailable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiusSchedule {
    pub initial_meters: u32,
    pub step_meters: u32,
    pub ceiling_meters: u32,
}

impl RadiusSchedule {
    /// `initial, initial + step, ...` up to and including the ceiling.
    /// An initial radius above the ceiling is clamped; a zero step yields one radius.
    pub fn radii(&self) -> impl Iterator<Item = u32> {
        let RadiusSchedule {
            initial_meters,
            step_meters,
            ceiling_meters,
        } = *self;

        std::iter::successors(Some(initial_meters.min(ceiling_meters)), move |&radius| {
            if step_meters == 0 {
                return None;
            }
            radius
                .checked_add(step_meters)
                .filter(|&next| next <= ceiling_meters)
        })
    }
}

#[derive(Debug)]
pub enum SearchOutcome {
    Found {
        radius_meters: u32,
        results: Vec<RankedCandidate>,
    },
    /// Every radius was searched and nothing qualified.
    Exhausted { attempts: usize },
    /// Every attempt failed in transport; nothing was actually searched.
    Unavailable {
        attempts: usize,
        last_error: ProviderUnavailable,
    },
}

pub async fn iterative_radius_search(
    provider: &dyn PlaceProvider,
    query: &str,
    origin: LatLng,
    settings: &SearchSettings,
) -> SearchOutcome {
    let mut attempts = 0;
    let mut failures = 0;
    let mut last_error = None;

    for radius_meters in settings.schedule.radii() {
        attempts += 1;
        match search_attempt(provider, query, origin, radius_meters, settings).await {
            Ok(results) if !results.is_empty() => {
                debug!(radius_meters, found = results.len(), "radius search succeeded");
                return SearchOutcome::Found {
                    radius_meters,
                    results,
                };
            }
            Ok(_) => debug!(radius_meters, "no candidates within radius"),
            Err(e) => {
                warn!("Place search failed at {radius_meters} m, widening: {e}");
                failures += 1;
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(last_error) if failures == attempts => SearchOutcome::Unavailable {
            attempts,
            last_error,
        },
        _ => SearchOutcome::Exhausted { attempts },
    }
}

async fn search_attempt(
    provider: &dyn PlaceProvider,
    query: &str,
    origin: LatLng,
    radius_meters: u32,
    settings: &SearchSettings,
) -> Result<Vec<RankedCandidate>, ProviderUnavailable> {
    let mut candidates = provider
        .search_by_query(query, Some(origin), Some(radius_meters))
        .await?;
    candidates.truncate(settings.candidate_limit);

    Ok(measure_and_rank(
        provider,
        candidates,
        origin,
        f64::from(radius_meters),
        settings.max_results,
    )
    .await)
}

/// One Distance Matrix batch, then hard-radius ranking. If the batch fails
/// as a whole, every candidate falls back to its straight-line distance.
pub async fn measure_and_rank(
    provider: &dyn PlaceProvider,
    candidates: Vec<PlaceCandidate>,
    origin: LatLng,
    radius_limit_meters: f64,
    max_results: usize,
) -> Vec<RankedCandidate> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let destinations: Vec<LatLng> = candidates.iter().map(PlaceCandidate::location).collect();
    let measurements = match provider.distance_and_eta(origin, &destinations).await {
        Ok(measurements) => measurements,
        Err(e) => {
            warn!("Distance lookup failed, using straight-line distances: {e}");
            Vec::new()
        }
    };

    rank_within_radius(candidates, origin, &measurements, radius_limit_meters, max_results)
}
