use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Restaurant,
    Cafe,
    Movie,
    Culture,
    Attraction,
    Festival,
    Parking,
    Other,
}

impl Category {
    pub fn is_restaurant(&self) -> bool {
        matches!(self, Category::Restaurant)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Restaurant => "RESTAURANT",
            Category::Cafe => "CAFE",
            Category::Movie => "MOVIE",
            Category::Culture => "CULTURE",
            Category::Attraction => "ATTRACTION",
            Category::Festival => "FESTIVAL",
            Category::Parking => "PARKING",
            Category::Other => "OTHER",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "RESTAURANT" => Ok(Category::Restaurant),
            "CAFE" => Ok(Category::Cafe),
            "MOVIE" => Ok(Category::Movie),
            "CULTURE" => Ok(Category::Culture),
            "ATTRACTION" => Ok(Category::Attraction),
            "FESTIVAL" => Ok(Category::Festival),
            "PARKING" => Ok(Category::Parking),
            "OTHER" => Ok(Category::Other),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

/// A place as returned by a search provider, before filtering and classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPlace {
    pub id: String,
    pub name: String,
    /// Provider type tags, e.g. `["restaurant", "food", "point_of_interest"]`
    pub types: Vec<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub location: Option<Coordinates>,
    pub image_url: Option<String>,
}

impl RawPlace {
    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    pub fn review_count_or_zero(&self) -> u32 {
        self.review_count.unwrap_or(0)
    }

    pub fn address_contains(&self, token: &str) -> bool {
        self.address
            .as_deref()
            .map(|addr| addr.contains(token))
            .unwrap_or(false)
    }
}

/// A classified place that can be selected and sequenced.
///
/// Identity is `id` alone: two candidates with the same id are the same place,
/// whatever tier or dimension produced them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub address: String,
    pub coordinates: Coordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Candidate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        coordinates: Coordinates,
    ) -> Self {
        Candidate {
            id: id.into(),
            name: name.into(),
            category,
            address: String::new(),
            coordinates,
            rating: None,
            review_count: None,
            image_url: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating.clamp(0.0, 5.0));
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Builds a candidate from a provider result.
    ///
    /// Returns `None` when the place has no location, since it could never be
    /// placed on a route.
    pub fn from_raw(raw: RawPlace, category: Category) -> Option<Self> {
        let coordinates = raw.location?;
        Some(Candidate {
            id: raw.id,
            name: raw.name,
            category,
            address: raw.address.unwrap_or_default(),
            coordinates,
            rating: raw.rating.map(|r| r.clamp(0.0, 5.0)),
            review_count: raw.review_count,
            image_url: raw.image_url,
        })
    }

    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    pub fn is_restaurant(&self) -> bool {
        self.category.is_restaurant()
    }
}
