use crate::constants::{DEFAULT_NUM_PLACES, MAX_NUM_PLACES};
use crate::models::{
    Anchor, Candidate, CulturePreference, FoodPreference, Itinerary, PreferenceSpec, RouteStop,
    TransportMode,
};
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Body of `POST /itineraries`. Accepts the camelCase names older clients send.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItineraryRequest {
    /// `YYYY-MM-DD`; missing or malformed means today
    pub date: Option<String>,
    /// e.g. "2인" or "4인 이상"
    #[serde(alias = "peopleCount")]
    pub people_count: Option<String>,
    /// Single-choice food, used when `foods` is empty
    pub food: Option<String>,
    pub culture: Option<String>,
    #[serde(default)]
    pub foods: Vec<String>,
    #[serde(default)]
    pub cultures: Vec<String>,
    pub transport: Option<String>,
    #[serde(alias = "numPlaces")]
    pub num_places: Option<u32>,
    #[serde(alias = "selectedStation")]
    pub selected_station: Option<String>,
    /// Fixes the route's random start, for reproducible responses
    pub seed: Option<u64>,
}

impl ItineraryRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(n) = self.num_places {
            if n as usize > MAX_NUM_PLACES {
                return Err(format!(
                    "num_places must be at most {} (got {})",
                    MAX_NUM_PLACES, n
                ));
            }
        }
        Ok(())
    }

    /// Normalise into engine preferences. Unknown food and culture names become `Other`.
    pub fn to_preferences(&self) -> Result<PreferenceSpec, String> {
        let desired_count = match self.num_places {
            Some(n) if n > 0 => n as usize,
            _ => DEFAULT_NUM_PLACES,
        };

        let foods: Vec<FoodPreference> = choices(&self.foods, self.food.as_deref())
            .map(FoodPreference::parse_lenient)
            .collect();
        let cultures: Vec<CulturePreference> = choices(&self.cultures, self.culture.as_deref())
            .map(CulturePreference::parse_lenient)
            .collect();
        let transport = self
            .transport
            .as_deref()
            .map(TransportMode::parse_lenient)
            .unwrap_or_default();

        let mut prefs = PreferenceSpec::new(
            desired_count,
            foods,
            cultures,
            transport,
            self.resolve_date(),
        )?;

        if let Some(party) = self.people_count.as_deref().and_then(parse_party_size) {
            prefs = prefs.with_party_size(party);
        }
        if let Some(station) = &self.selected_station {
            prefs = prefs.with_station(station.clone());
        }
        Ok(prefs)
    }

    fn resolve_date(&self) -> Date {
        let today = || OffsetDateTime::now_utc().date();
        let Some(raw) = self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) else {
            return today();
        };

        match Date::parse(raw, format_description!("[year]-[month]-[day]")) {
            Ok(date) => date,
            Err(e) => {
                tracing::warn!(date = %raw, "Invalid date '{}' ({}), using today", raw, e);
                today()
            }
        }
    }
}

/// The list field wins over the single-choice field when both are sent
fn choices<'a>(many: &'a [String], single: Option<&'a str>) -> impl Iterator<Item = &'a str> {
    let use_single = many.is_empty();
    many.iter()
        .map(String::as_str)
        .chain(single.filter(|_| use_single))
        .filter(|s| !s.trim().is_empty())
}

/// Leading digits of "2인", "4인 이상", "3"
fn parse_party_size(raw: &str) -> Option<u32> {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok().filter(|n| *n > 0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryResponse {
    pub recommended_places: Vec<Candidate>,
    pub optimized_route: Vec<RouteStop>,
    pub anchor: Anchor,
    /// Straight-line length of the route, in km
    pub total_distance_km: f64,
    pub requested: usize,
    /// True when the pools could not fill every requested slot
    pub partial: bool,
}

impl From<Itinerary> for ItineraryResponse {
    fn from(itinerary: Itinerary) -> Self {
        let partial = itinerary.recommended.is_short();
        let total_distance_km = itinerary.route.total_distance_km();
        ItineraryResponse {
            requested: itinerary.recommended.requested,
            recommended_places: itinerary.recommended.candidates,
            optimized_route: itinerary.route.stops,
            anchor: itinerary.anchor,
            total_distance_km,
            partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_defaults_and_lenient_parsing() {
        let request: ItineraryRequest = serde_json::from_str(
            r#"{"food": "한식", "culture": "영화", "transport": "대중 교통", "peopleCount": "4인 이상"}"#,
        )
        .unwrap();
        let prefs = request.to_preferences().unwrap();

        assert_eq!(prefs.desired_count, 4);
        assert_eq!(prefs.foods, vec![FoodPreference::Korean]);
        assert_eq!(prefs.cultures, vec![CulturePreference::Movie]);
        assert_eq!(prefs.transport, TransportMode::Public);
        assert_eq!(prefs.party_size, Some(4));
    }

    #[test]
    fn test_list_fields_win_over_single() {
        let request = ItineraryRequest {
            food: Some("카페".to_string()),
            foods: vec!["일식".to_string(), "분식".to_string()],
            ..Default::default()
        };
        let prefs = request.to_preferences().unwrap();
        assert_eq!(
            prefs.foods,
            vec![FoodPreference::Japanese, FoodPreference::Other]
        );
        assert!(prefs.cultures.is_empty());
    }

    #[test]
    fn test_date_parsing() {
        let request = ItineraryRequest {
            date: Some("2025-09-27".to_string()),
            ..Default::default()
        };
        assert_eq!(request.to_preferences().unwrap().date, date!(2025 - 09 - 27));

        let bad = ItineraryRequest {
            date: Some("27/09/2025".to_string()),
            ..Default::default()
        };
        let today = OffsetDateTime::now_utc().date();
        // allow for a midnight rollover between the two clock reads
        assert!(bad.to_preferences().unwrap().date >= today);
    }

    #[test]
    fn test_num_places_bounds() {
        let zero = ItineraryRequest {
            num_places: Some(0),
            ..Default::default()
        };
        assert_eq!(zero.to_preferences().unwrap().desired_count, DEFAULT_NUM_PLACES);

        let too_many = ItineraryRequest {
            num_places: Some(50),
            ..Default::default()
        };
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_response_reports_route_length() {
        use crate::models::{Category, Coordinates, Route, SelectionResult};

        let a = Candidate::new("a", "a", Category::Cafe, Coordinates::new(37.0, 127.0).unwrap());
        let b = Candidate::new("b", "b", Category::Movie, Coordinates::new(37.01, 127.0).unwrap());
        let itinerary = Itinerary {
            route: Route::new(vec![
                RouteStop::from_candidate(1, &a),
                RouteStop::from_candidate(2, &b),
            ]),
            recommended: SelectionResult::new(vec![a, b], 3),
            anchor: Anchor::city_center(Coordinates::new(37.0, 127.0).unwrap(), 10_000.0),
        };

        let response = ItineraryResponse::from(itinerary);

        assert!((response.total_distance_km - 1.11).abs() < 0.01);
        assert!(response.partial);
        assert_eq!(response.requested, 3);
        assert_eq!(response.optimized_route.len(), 2);
    }

    #[test]
    fn test_party_size_parsing() {
        assert_eq!(parse_party_size("2인"), Some(2));
        assert_eq!(parse_party_size(" 3 "), Some(3));
        assert_eq!(parse_party_size("혼자"), None);
        assert_eq!(parse_party_size("0"), None);
    }
}
