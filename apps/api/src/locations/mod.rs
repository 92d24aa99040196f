// Location Candidate Resolver.
// One pipeline for both location endpoints:
//   Place Provider → (Iterative Radius Search) → Ranker → Assembler.
// All mapping calls go through places::PlaceProvider.

pub mod assembler;
pub mod handlers;
pub mod radius_search;
pub mod ranking;
pub mod resolver;

use radius_search::RadiusSchedule;

/// Tuning for the location pipeline. Loaded once from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub schedule: RadiusSchedule,
    /// Results returned by the list endpoint.
    pub max_results: usize,
    /// Provider results considered per attempt (one Distance Matrix batch).
    pub candidate_limit: usize,
    /// Bias radius for the single-best-match search.
    pub find_default_radius_meters: u32,
    /// Upper bound on a caller-supplied bias radius.
    pub find_max_radius_meters: u32,
    /// When false, the list endpoint ranks without an origin instead of rejecting.
    pub require_origin: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            schedule: RadiusSchedule {
                initial_meters: 20_000,
                step_meters: 10_000,
                ceiling_meters: 100_000,
            },
            max_results: 10,
            candidate_limit: 20,
            find_default_radius_meters: 15_000,
            find_max_radius_meters: 50_000,
            require_origin: true,
        }
    }
}
