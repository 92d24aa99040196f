//! Candidate Ranker: orders place candidates against a user origin.
//!
//! Two policies:
//! - quality-proximity (`rank_by_quality`): popularity-weighted rating plus a
//!   bounded locality bonus. No hard cutoff, works without an origin.
//! - hard radius (`rank_within_radius`): drops anything farther than a limit,
//!   then nearest first.
//!
//! Both sorts are stable, so ties keep provider order.

use crate::geo::{approx_distance_meters, haversine_distance_meters, LatLng};
use crate::places::{DistanceEstimate, PlaceCandidate};

const OPEN_NOW_BONUS: f64 = 0.25;
const MAX_PROXIMITY_BOOST: f64 = 1.5;
/// Each this-many km of distance removes one point of proximity boost.
const PROXIMITY_DECAY_KM: f64 = 15.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub place: PlaceCandidate,
    pub score: f64,
}

/// Where a ranked candidate's distance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceSource {
    Road,
    StraightLine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub place: PlaceCandidate,
    pub distance_meters: f64,
    pub distance_source: DistanceSource,
    pub eta_text: Option<String>,
}

/// `rating × (1 + log10(1 + ratingCount)) + 0.25·openNow + proximityBoost`
///
/// The log dampens review volume so a single 5-star review cannot outrank an
/// established place. The proximity boost is `max(0, 1.5 − km/15)`, reaching
/// zero at 22.5 km, and only applies when an origin is known.
pub fn quality_score(place: &PlaceCandidate, origin: Option<LatLng>) -> f64 {
    let rating = place.rating.filter(|r| r.is_finite()).unwrap_or(0.0);
    let count = place.rating_count.unwrap_or(0) as f64;

    let mut score = rating * (1.0 + (1.0 + count).log10());

    if place.open_now == Some(true) {
        score += OPEN_NOW_BONUS;
    }

    if let Some(origin) = origin {
        score += proximity_boost(approx_distance_meters(origin, place.location()) / 1000.0);
    }

    score
}

fn proximity_boost(distance_km: f64) -> f64 {
    (MAX_PROXIMITY_BOOST - distance_km / PROXIMITY_DECAY_KM).max(0.0)
}

/// Scores every candidate and sorts best-first.
pub fn rank_by_quality(
    candidates: Vec<PlaceCandidate>,
    origin: Option<LatLng>,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|place| {
            let score = quality_score(&place, origin);
            ScoredCandidate { place, score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Keeps candidates within `radius_limit_meters` of `origin`, nearest first,
/// at most `max_results`.
///
/// `measurements` is index-aligned with `candidates`. A missing or unusable
/// road measurement falls back to the haversine distance; a candidate is only
/// dropped if neither yields a finite distance.
pub fn rank_within_radius(
    candidates: Vec<PlaceCandidate>,
    origin: LatLng,
    measurements: &[Option<DistanceEstimate>],
    radius_limit_meters: f64,
    max_results: usize,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .enumerate()
        .filter_map(|(i, place)| {
            let measured = measurements
                .get(i)
                .and_then(Option::as_ref)
                .filter(|m| m.distance_meters.is_finite() && m.distance_meters >= 0.0);

            let (distance_meters, distance_source, eta_text) = match measured {
                Some(m) => (m.distance_meters, DistanceSource::Road, m.eta_text.clone()),
                None => (
                    haversine_distance_meters(origin, place.location()),
                    DistanceSource::StraightLine,
                    None,
                ),
            };

            (distance_meters.is_finite() && distance_meters <= radius_limit_meters).then(|| {
                RankedCandidate {
                    place,
                    distance_meters,
                    distance_source,
                    eta_text,
                }
            })
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    ranked.truncate(max_results);
    ranked
}
