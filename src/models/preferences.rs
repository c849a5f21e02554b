use serde::{Deserialize, Serialize};
use std::fmt;
use time::Date;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum FoodPreference {
    Cafe,
    Korean,
    Chinese,
    Western,
    Japanese,
    #[default]
    Other,
}

impl FoodPreference {
    /// Alternate categories tried, in this order, when restaurant slots stay empty
    pub const RESTAURANT_FALLBACKS: [FoodPreference; 5] = [
        FoodPreference::Korean,
        FoodPreference::Japanese,
        FoodPreference::Chinese,
        FoodPreference::Western,
        FoodPreference::Other,
    ];

    /// Lenient parse from a display name or an enum name. Unknown input maps to `Other`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim() {
            "카페" | "감성카페" => FoodPreference::Cafe,
            "한식" => FoodPreference::Korean,
            "중식" => FoodPreference::Chinese,
            "양식" => FoodPreference::Western,
            "일식" => FoodPreference::Japanese,
            "기타" => FoodPreference::Other,
            other => match other.to_uppercase().as_str() {
                "CAFE" => FoodPreference::Cafe,
                "KOREAN" => FoodPreference::Korean,
                "CHINESE" => FoodPreference::Chinese,
                "WESTERN" => FoodPreference::Western,
                "JAPANESE" => FoodPreference::Japanese,
                _ => FoodPreference::Other,
            },
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FoodPreference::Cafe => "카페",
            FoodPreference::Korean => "한식",
            FoodPreference::Chinese => "중식",
            FoodPreference::Western => "양식",
            FoodPreference::Japanese => "일식",
            FoodPreference::Other => "기타",
        }
    }

    /// Provider place type searched for this preference
    pub fn place_type(&self) -> &'static str {
        match self {
            FoodPreference::Cafe => "cafe",
            _ => "restaurant",
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            FoodPreference::Cafe => "카페",
            FoodPreference::Korean => "한식",
            FoodPreference::Chinese => "중식",
            FoodPreference::Western => "양식",
            FoodPreference::Japanese => "일식",
            FoodPreference::Other => "맛집",
        }
    }

    /// Broader keywords used when the food pool comes back thin
    pub fn relaxed_keywords(&self) -> Vec<&'static str> {
        match self {
            FoodPreference::Korean => vec!["한식", "밥집", "백반"],
            FoodPreference::Japanese => vec!["일식", "스시", "라멘"],
            FoodPreference::Chinese => vec!["중식", "중국집", "짜장면"],
            FoodPreference::Western => vec!["양식", "파스타", "스테이크"],
            _ => vec![self.keyword()],
        }
    }

    pub fn is_restaurant_class(&self) -> bool {
        self.place_type() == "restaurant"
    }
}

impl fmt::Display for FoodPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CulturePreference {
    Movie,
    Performance,
    Experience,
    Festival,
    #[default]
    Other,
}

impl CulturePreference {
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim() {
            "영화" => CulturePreference::Movie,
            "공연/전시" | "공연" | "전시" => CulturePreference::Performance,
            "체험" => CulturePreference::Experience,
            "지역축제" | "축제" => CulturePreference::Festival,
            "기타" => CulturePreference::Other,
            other => match other.to_uppercase().as_str() {
                "MOVIE" => CulturePreference::Movie,
                "PERFORMANCE" => CulturePreference::Performance,
                "EXPERIENCE" => CulturePreference::Experience,
                "FESTIVAL" => CulturePreference::Festival,
                _ => CulturePreference::Other,
            },
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CulturePreference::Movie => "영화",
            CulturePreference::Performance => "공연/전시",
            CulturePreference::Experience => "체험",
            CulturePreference::Festival => "지역축제",
            CulturePreference::Other => "기타",
        }
    }

    pub fn place_types(&self) -> &'static [&'static str] {
        match self {
            CulturePreference::Movie => &["movie_theater"],
            CulturePreference::Performance => &["art_gallery", "museum"],
            CulturePreference::Experience
            | CulturePreference::Festival
            | CulturePreference::Other => &["tourist_attraction"],
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            CulturePreference::Movie => "영화관",
            CulturePreference::Performance => "전시관",
            CulturePreference::Experience => "체험",
            CulturePreference::Festival => "축제",
            CulturePreference::Other => "문화시설",
        }
    }
}

impl fmt::Display for CulturePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransportMode {
    #[default]
    Public,
    Car,
    Walk,
    Other,
}

impl TransportMode {
    /// Whitespace is ignored ("대중 교통" == "대중교통"); unknown input maps to `Other`.
    pub fn parse_lenient(s: &str) -> Self {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.as_str() {
            "대중교통" => TransportMode::Public,
            "자동차" => TransportMode::Car,
            "도보" => TransportMode::Walk,
            other => match other.to_uppercase().as_str() {
                "PUBLIC" => TransportMode::Public,
                "CAR" => TransportMode::Car,
                "WALK" => TransportMode::Walk,
                _ => TransportMode::Other,
            },
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TransportMode::Public => "대중교통",
            TransportMode::Car => "자동차",
            TransportMode::Walk => "도보",
            TransportMode::Other => "기타",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Normalised user preferences for one itinerary request.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceSpec {
    pub desired_count: usize,
    pub foods: Vec<FoodPreference>,
    pub cultures: Vec<CulturePreference>,
    pub transport: TransportMode,
    pub date: Date,
    pub party_size: Option<u32>,
    pub station: Option<String>,
}

impl PreferenceSpec {
    pub fn new(
        desired_count: usize,
        foods: Vec<FoodPreference>,
        cultures: Vec<CulturePreference>,
        transport: TransportMode,
        date: Date,
    ) -> Result<Self, String> {
        if desired_count == 0 {
            return Err("Desired place count must be at least 1".to_string());
        }
        Ok(PreferenceSpec {
            desired_count,
            foods,
            cultures,
            transport,
            date,
            party_size: None,
            station: None,
        })
    }

    pub fn with_party_size(mut self, party_size: u32) -> Self {
        self.party_size = Some(party_size);
        self
    }

    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub fn primary_food(&self) -> FoodPreference {
        self.foods.first().copied().unwrap_or_default()
    }

    pub fn primary_culture(&self) -> CulturePreference {
        self.cultures.first().copied().unwrap_or_default()
    }

    /// True when any requested food is served by restaurants (as opposed to cafes).
    /// An empty food list is never restaurant-class.
    pub fn is_restaurant_class(&self) -> bool {
        self.foods.iter().any(FoodPreference::is_restaurant_class)
    }

    /// Station name, if one was given and is not blank
    pub fn station_name(&self) -> Option<&str> {
        self.station
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
