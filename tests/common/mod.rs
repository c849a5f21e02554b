use async_trait::async_trait;
use daytrip::config::PlannerConfig;
use daytrip::models::{Coordinates, RawPlace};
use daytrip::services::aggregator::CandidateAggregator;
use daytrip::services::events::StaticEventCatalog;
use daytrip::services::google_places::{NearbyQuery, PlaceSearch};
use daytrip::services::itinerary::ItineraryPlanner;
use daytrip::services::ranking::RankingAssist;
use daytrip::services::stations::{StaticStationDirectory, StationDirectory};
use daytrip::AppState;
use std::sync::{Arc, Mutex};

/// In-memory place search: answers with every catalogue place whose types
/// include the queried type and which lies inside the queried radius.
#[allow(dead_code)]
pub struct CatalogueSearch {
    places: Vec<RawPlace>,
    credentials: bool,
    queries: Mutex<Vec<NearbyQuery>>,
}

#[allow(dead_code)]
impl CatalogueSearch {
    pub fn new(places: Vec<RawPlace>) -> Self {
        CatalogueSearch {
            places,
            credentials: true,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn without_credentials() -> Self {
        CatalogueSearch {
            places: Vec::new(),
            credentials: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<NearbyQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaceSearch for CatalogueSearch {
    async fn search_nearby(&self, query: &NearbyQuery) -> daytrip::Result<Vec<RawPlace>> {
        self.queries.lock().unwrap().push(query.clone());
        let radius_km = query.radius_m / 1000.0;
        Ok(self
            .places
            .iter()
            .filter(|p| p.types.iter().any(|t| *t == query.place_type))
            .filter(|p| {
                p.location
                    .map_or(false, |loc| loc.is_within_km(&query.center, radius_km))
            })
            .cloned()
            .collect())
    }

    fn has_credentials(&self) -> bool {
        self.credentials
    }
}

/// A well-reviewed place in Anyang, offset from the city centre by `(dlat, dlng)`
#[allow(dead_code)]
pub fn anyang_place(id: &str, place_type: &str, rating: f64, dlat: f64, dlng: f64) -> RawPlace {
    RawPlace {
        id: id.to_string(),
        name: format!("{} {}", place_type, id),
        types: vec![place_type.to_string(), "establishment".to_string()],
        address: Some("경기도 안양시 동안구".to_string()),
        rating: Some(rating),
        review_count: Some(120),
        location: Some(Coordinates {
            lat: 37.3942 + dlat,
            lng: 126.9569 + dlng,
        }),
        image_url: None,
    }
}

/// Restaurants, cafes, cinemas, galleries and sights spread around the centre
#[allow(dead_code)]
pub fn anyang_catalogue() -> Vec<RawPlace> {
    let mut places = Vec::new();
    for i in 0..6 {
        let d = i as f64 * 0.004;
        places.push(anyang_place(&format!("rest-{}", i), "restaurant", 4.6 - i as f64 * 0.1, d, -d));
    }
    for i in 0..4 {
        let d = i as f64 * 0.005;
        places.push(anyang_place(&format!("cafe-{}", i), "cafe", 4.4, -d, d));
    }
    for i in 0..3 {
        let d = i as f64 * 0.006;
        places.push(anyang_place(&format!("movie-{}", i), "movie_theater", 4.3, d, d));
    }
    places.push(anyang_place("gallery-0", "art_gallery", 4.7, -0.01, -0.01));
    places.push(anyang_place("sight-0", "tourist_attraction", 4.5, 0.012, 0.0));
    places
}

#[allow(dead_code)]
pub fn test_planner(
    search: Arc<dyn PlaceSearch>,
    assist: Option<Arc<dyn RankingAssist>>,
) -> ItineraryPlanner {
    let aggregator = CandidateAggregator::new(
        search,
        Arc::new(StaticEventCatalog::anyang()),
        Arc::new(StaticStationDirectory::anyang()),
        PlannerConfig::default(),
    );
    ItineraryPlanner::new(aggregator, assist)
}

#[allow(dead_code)]
pub fn test_state(search: Arc<dyn PlaceSearch>) -> Arc<AppState> {
    let stations: Arc<dyn StationDirectory> = Arc::new(StaticStationDirectory::anyang());
    Arc::new(AppState {
        planner: test_planner(search, None),
        stations,
    })
}
