use crate::error::{AppError, Result};
use crate::models::{Coordinates, RawPlace};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const GOOGLE_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// One nearby-search request against a place provider.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub center: Coordinates,
    pub radius_m: f64,
    pub place_type: String,
    pub keyword: String,
    pub language: String,
}

impl NearbyQuery {
    pub fn new(
        center: Coordinates,
        radius_m: f64,
        place_type: impl Into<String>,
        keyword: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        NearbyQuery {
            center,
            radius_m,
            place_type: place_type.into(),
            keyword: keyword.into(),
            language: language.into(),
        }
    }
}

/// A source of places around a point.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search_nearby(&self, query: &NearbyQuery) -> Result<Vec<RawPlace>>;

    /// False when the provider cannot be queried at all (e.g. no API key)
    fn has_credentials(&self) -> bool;
}

/// Client for the Google Places legacy Nearby Search JSON endpoint.
#[derive(Clone)]
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GooglePlacesClient {
    pub fn new(api_key: String, timeout_secs: u64) -> Self {
        Self::with_config(api_key, GOOGLE_PLACES_BASE_URL.to_string(), timeout_secs)
    }

    pub fn with_config(api_key: String, base_url: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        GooglePlacesClient {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PlaceSearch for GooglePlacesClient {
    async fn search_nearby(&self, query: &NearbyQuery) -> Result<Vec<RawPlace>> {
        if !self.has_credentials() {
            return Err(AppError::ProviderUnavailable(
                "Google Places API key not configured".to_string(),
            ));
        }

        let url = format!("{}/nearbysearch/json", self.base_url);
        let params = [
            (
                "location",
                format!("{},{}", query.center.lat, query.center.lng),
            ),
            ("radius", format!("{:.0}", query.radius_m)),
            ("type", query.place_type.clone()),
            ("keyword", query.keyword.clone()),
            ("language", query.language.clone()),
            ("key", self.api_key.clone()),
        ];

        tracing::debug!(
            place_type = %query.place_type,
            keyword = %query.keyword,
            radius_m = query.radius_m,
            "Places nearby search: type={}, keyword={}, radius={:.0}m",
            query.place_type, query.keyword, query.radius_m
        );

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::PlaceSearch(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                "Places API HTTP error {}: {}",
                status, error_text
            );
            return Err(AppError::PlaceSearch(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: NearbySearchApiResponse = response
            .json()
            .await
            .map_err(|e| AppError::PlaceSearch(format!("Failed to parse response: {}", e)))?;

        match body.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Ok(Vec::new()),
            other => {
                let detail = body.error_message.unwrap_or_default();
                return Err(AppError::PlaceSearch(format!(
                    "Places API status {}: {}",
                    other, detail
                )));
            }
        }

        let places: Vec<RawPlace> = body
            .results
            .into_iter()
            .filter_map(PlaceResult::into_raw_place)
            .collect();

        tracing::debug!(
            results = places.len(),
            "Places response: {} results",
            places.len()
        );

        Ok(places)
    }

    fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// Places API response types

#[derive(Debug, Deserialize)]
struct NearbySearchApiResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    types: Vec<String>,
    vicinity: Option<String>,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    geometry: Option<PlaceGeometry>,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl PlaceResult {
    /// Results without a place id cannot be deduplicated and are skipped
    fn into_raw_place(self) -> Option<RawPlace> {
        let id = self.place_id?;
        let location = self
            .geometry
            .and_then(|g| Coordinates::new(g.location.lat, g.location.lng).ok());

        Some(RawPlace {
            id,
            name: self.name,
            types: self.types,
            address: self.vicinity,
            rating: self.rating,
            review_count: self.user_ratings_total,
            location,
            image_url: None,
        })
    }
}
