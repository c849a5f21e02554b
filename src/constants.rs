//! Stable application-wide constants.
//!
//! Values here are structural invariants and default fallbacks for env-var-based
//! configuration. They should rarely change. For tuning knobs that benefit from
//! runtime experimentation, see [`PlannerConfig`](crate::config::PlannerConfig).

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Geo ---

/// Mean Earth radius used by the haversine distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// --- Default anchor (Anyang city centre) ---

pub const DEFAULT_CENTER_LAT: f64 = 37.3942;
pub const DEFAULT_CENTER_LNG: f64 = 126.9569;
/// Search radius around the city centre when no station was chosen.
pub const DEFAULT_SEARCH_RADIUS_METERS: f64 = 10_000.0;
/// Search radius around an explicitly selected station.
pub const DEFAULT_STATION_RADIUS_METERS: f64 = 1_000.0;
/// Address token a city-centre result must contain to count as local.
pub const DEFAULT_LOCALITY_TOKEN: &str = "안양";
/// Language passed to the place-search provider.
pub const DEFAULT_SEARCH_LANGUAGE: &str = "ko";

// --- Relaxation tiers ---
// Tier i searches at `base_radius * TIER_RADIUS_MULTIPLIERS[i]` and keeps results
// with rating >= TIER_MIN_RATINGS[i] and reviews >= TIER_MIN_REVIEWS[i].

pub const TIER_RADIUS_MULTIPLIERS: [f64; 3] = [1.0, 1.3, 1.6];
pub const TIER_MIN_RATINGS: [f64; 3] = [4.0, 3.8, 3.5];
pub const TIER_MIN_REVIEWS: [u32; 3] = [20, 10, 0];

/// Floor of the aggregate target size: `max(MIN_AGGREGATE_TARGET, desired * AGGREGATE_TARGET_MULTIPLIER)`.
pub const MIN_AGGREGATE_TARGET: usize = 12;
pub const AGGREGATE_TARGET_MULTIPLIER: usize = 3;

// --- Pool collection ---

/// Food pools smaller than this trigger relaxed-keyword searches.
pub const THIN_FOOD_POOL_THRESHOLD: usize = 3;
/// Dated events further than this from the anchor are ignored.
pub const DEFAULT_EVENT_RADIUS_KM: f64 = 2.0;
/// Rating assigned to dated events, which carry no provider rating.
pub const EVENT_DEFAULT_RATING: f64 = 5.0;

// --- Composition ---

/// Requests of at least this many places get two restaurant slots instead of one.
pub const TWO_RESTAURANT_THRESHOLD: usize = 4;
/// Default number of places when the request does not say.
pub const DEFAULT_NUM_PLACES: usize = 4;
/// Hard upper bound on requested places.
pub const MAX_NUM_PLACES: usize = 10;

// --- Scoring bonuses ---

pub const SCORE_RESTAURANT_BONUS: f64 = 0.3;
pub const SCORE_CULTURE_MATCH_BONUS: f64 = 0.6;
pub const SCORE_FESTIVAL_MATCH_BONUS: f64 = 0.8;
pub const SCORE_GENERIC_CULTURE_BONUS: f64 = 0.4;
pub const SCORE_DIVERSITY_BONUS: f64 = 0.15;

// --- Collaborator defaults ---

pub const DEFAULT_PLACES_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_RANKING_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_RANKING_MODEL: &str = "gpt-3.5-turbo";
pub const RANKING_TEMPERATURE: f32 = 0.3;
pub const RANKING_MAX_TOKENS: u32 = 100;
