use crate::constants::*;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Absent or blank means the aggregator serves placeholder candidates
    pub google_places_api_key: Option<String>,
    pub google_places_base_url: Option<String>,
    /// Absent or blank disables the ranking assist
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub planner: PlannerConfig,
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// City-centre anchor used when no station is selected or the station is unknown
    pub default_center_lat: f64,
    pub default_center_lng: f64,

    /// Base search radius (meters) around the city centre
    pub default_radius_m: f64,

    /// Search radius (meters) around an explicitly selected station
    pub station_radius_m: f64,

    /// Address token required for city-centre results (e.g. "안양")
    pub locality_token: String,

    /// Radius multiplier for the second relaxation tier
    pub relaxed_radius_multiplier: f64,

    /// Radius multiplier for the third relaxation tier
    pub very_relaxed_radius_multiplier: f64,

    pub base_min_rating: f64,
    pub relaxed_min_rating: f64,
    pub very_relaxed_min_rating: f64,

    pub base_min_reviews: u32,
    pub relaxed_min_reviews: u32,
    pub very_relaxed_min_reviews: u32,

    /// Aggregation stops once `max(min_aggregate_target, desired * aggregate_target_multiplier)` is reached
    pub min_aggregate_target: usize,
    pub aggregate_target_multiplier: usize,

    /// Dated events further than this (km) from the anchor are dropped
    pub event_radius_km: f64,

    /// Language code passed to the place-search provider
    pub search_language: String,

    pub places_timeout_secs: u64,
    pub ranking_timeout_secs: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_center_lat: DEFAULT_CENTER_LAT,
            default_center_lng: DEFAULT_CENTER_LNG,
            default_radius_m: DEFAULT_SEARCH_RADIUS_METERS,
            station_radius_m: DEFAULT_STATION_RADIUS_METERS,
            locality_token: DEFAULT_LOCALITY_TOKEN.to_string(),
            relaxed_radius_multiplier: TIER_RADIUS_MULTIPLIERS[1],
            very_relaxed_radius_multiplier: TIER_RADIUS_MULTIPLIERS[2],
            base_min_rating: TIER_MIN_RATINGS[0],
            relaxed_min_rating: TIER_MIN_RATINGS[1],
            very_relaxed_min_rating: TIER_MIN_RATINGS[2],
            base_min_reviews: TIER_MIN_REVIEWS[0],
            relaxed_min_reviews: TIER_MIN_REVIEWS[1],
            very_relaxed_min_reviews: TIER_MIN_REVIEWS[2],
            min_aggregate_target: MIN_AGGREGATE_TARGET,
            aggregate_target_multiplier: AGGREGATE_TARGET_MULTIPLIER,
            event_radius_km: DEFAULT_EVENT_RADIUS_KM,
            search_language: DEFAULT_SEARCH_LANGUAGE.to_string(),
            places_timeout_secs: DEFAULT_PLACES_TIMEOUT_SECONDS,
            ranking_timeout_secs: DEFAULT_RANKING_TIMEOUT_SECONDS,
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            default_center_lat: env::var("PLANNER_DEFAULT_CENTER_LAT")
                .unwrap_or_else(|_| defaults.default_center_lat.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_DEFAULT_CENTER_LAT")?,

            default_center_lng: env::var("PLANNER_DEFAULT_CENTER_LNG")
                .unwrap_or_else(|_| defaults.default_center_lng.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_DEFAULT_CENTER_LNG")?,

            default_radius_m: env::var("PLANNER_DEFAULT_RADIUS_M")
                .unwrap_or_else(|_| defaults.default_radius_m.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_DEFAULT_RADIUS_M")?,

            station_radius_m: env::var("PLANNER_STATION_RADIUS_M")
                .unwrap_or_else(|_| defaults.station_radius_m.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_STATION_RADIUS_M")?,

            locality_token: env::var("PLANNER_LOCALITY_TOKEN")
                .unwrap_or(defaults.locality_token),

            relaxed_radius_multiplier: env::var("PLANNER_RELAXED_RADIUS_MULTIPLIER")
                .unwrap_or_else(|_| defaults.relaxed_radius_multiplier.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_RELAXED_RADIUS_MULTIPLIER")?,

            very_relaxed_radius_multiplier: env::var("PLANNER_VERY_RELAXED_RADIUS_MULTIPLIER")
                .unwrap_or_else(|_| defaults.very_relaxed_radius_multiplier.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_VERY_RELAXED_RADIUS_MULTIPLIER")?,

            base_min_rating: env::var("PLANNER_BASE_MIN_RATING")
                .unwrap_or_else(|_| defaults.base_min_rating.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_BASE_MIN_RATING")?,

            relaxed_min_rating: env::var("PLANNER_RELAXED_MIN_RATING")
                .unwrap_or_else(|_| defaults.relaxed_min_rating.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_RELAXED_MIN_RATING")?,

            very_relaxed_min_rating: env::var("PLANNER_VERY_RELAXED_MIN_RATING")
                .unwrap_or_else(|_| defaults.very_relaxed_min_rating.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_VERY_RELAXED_MIN_RATING")?,

            base_min_reviews: env::var("PLANNER_BASE_MIN_REVIEWS")
                .unwrap_or_else(|_| defaults.base_min_reviews.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_BASE_MIN_REVIEWS")?,

            relaxed_min_reviews: env::var("PLANNER_RELAXED_MIN_REVIEWS")
                .unwrap_or_else(|_| defaults.relaxed_min_reviews.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_RELAXED_MIN_REVIEWS")?,

            very_relaxed_min_reviews: env::var("PLANNER_VERY_RELAXED_MIN_REVIEWS")
                .unwrap_or_else(|_| defaults.very_relaxed_min_reviews.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_VERY_RELAXED_MIN_REVIEWS")?,

            min_aggregate_target: env::var("PLANNER_MIN_AGGREGATE_TARGET")
                .unwrap_or_else(|_| defaults.min_aggregate_target.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_MIN_AGGREGATE_TARGET")?,

            aggregate_target_multiplier: env::var("PLANNER_AGGREGATE_TARGET_MULTIPLIER")
                .unwrap_or_else(|_| defaults.aggregate_target_multiplier.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_AGGREGATE_TARGET_MULTIPLIER")?,

            event_radius_km: env::var("PLANNER_EVENT_RADIUS_KM")
                .unwrap_or_else(|_| defaults.event_radius_km.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_EVENT_RADIUS_KM")?,

            search_language: env::var("PLANNER_SEARCH_LANGUAGE")
                .unwrap_or(defaults.search_language),

            places_timeout_secs: env::var("PLANNER_PLACES_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.places_timeout_secs.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_PLACES_TIMEOUT_SECS")?,

            ranking_timeout_secs: env::var("PLANNER_RANKING_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.ranking_timeout_secs.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_RANKING_TIMEOUT_SECS")?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.default_radius_m <= 0.0 || self.station_radius_m <= 0.0 {
            return Err("Search radii must be positive".to_string());
        }
        if !(1.0..=self.very_relaxed_radius_multiplier).contains(&self.relaxed_radius_multiplier)
        {
            return Err(
                "Radius multipliers must satisfy 1.0 <= relaxed <= very_relaxed".to_string(),
            );
        }
        if self.aggregate_target_multiplier == 0 {
            return Err("PLANNER_AGGREGATE_TARGET_MULTIPLIER must be at least 1".to_string());
        }
        if self.event_radius_km < 0.0 {
            return Err("PLANNER_EVENT_RADIUS_KM cannot be negative".to_string());
        }
        Ok(())
    }
}

/// Treat unset and blank values the same way
fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            google_places_api_key: optional_env("GOOGLE_PLACES_API_KEY"),
            google_places_base_url: optional_env("GOOGLE_PLACES_BASE_URL"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_model: optional_env("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_RANKING_MODEL.to_string()),
            openai_base_url: optional_env("OPENAI_BASE_URL"),
            planner: PlannerConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_planner_defaults_match_relaxation_tiers() {
        let config = PlannerConfig::default();
        assert_eq!(config.default_radius_m, 10_000.0);
        assert_eq!(config.relaxed_radius_multiplier, 1.3);
        assert_eq!(config.very_relaxed_radius_multiplier, 1.6);
        assert_eq!(config.base_min_reviews, 20);
        assert_eq!(config.very_relaxed_min_reviews, 0);
        assert_eq!(config.locality_token, "안양");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_planner_env_override() {
        env::set_var("PLANNER_STATION_RADIUS_M", "1500");
        env::set_var("PLANNER_LOCALITY_TOKEN", "수원");
        let config = PlannerConfig::from_env().unwrap();
        env::remove_var("PLANNER_STATION_RADIUS_M");
        env::remove_var("PLANNER_LOCALITY_TOKEN");

        assert_eq!(config.station_radius_m, 1500.0);
        assert_eq!(config.locality_token, "수원");
    }

    #[test]
    #[serial]
    fn test_planner_rejects_garbage() {
        env::set_var("PLANNER_BASE_MIN_RATING", "four");
        let result = PlannerConfig::from_env();
        env::remove_var("PLANNER_BASE_MIN_RATING");

        assert_eq!(result.unwrap_err(), "Invalid PLANNER_BASE_MIN_RATING");
    }

    #[test]
    #[serial]
    fn test_planner_rejects_inverted_multipliers() {
        env::set_var("PLANNER_RELAXED_RADIUS_MULTIPLIER", "2.0");
        let result = PlannerConfig::from_env();
        env::remove_var("PLANNER_RELAXED_RADIUS_MULTIPLIER");

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_blank_api_key_counts_as_absent() {
        env::set_var("GOOGLE_PLACES_API_KEY", "   ");
        env::set_var("OPENAI_MODEL", "gpt-4o-mini");
        let config = Config::from_env().unwrap();
        env::remove_var("GOOGLE_PLACES_API_KEY");
        env::remove_var("OPENAI_MODEL");

        assert!(config.google_places_api_key.is_none());
        assert_eq!(config.openai_model, "gpt-4o-mini");
    }
}
