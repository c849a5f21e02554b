use crate::models::{Candidate, Coordinates};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteStop {
    /// 1-based visiting position
    pub order_index: usize,
    pub candidate_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl RouteStop {
    pub fn from_candidate(order_index: usize, candidate: &Candidate) -> Self {
        RouteStop {
            order_index,
            candidate_id: candidate.id.clone(),
            name: candidate.name.clone(),
            latitude: candidate.coordinates.lat,
            longitude: candidate.coordinates.lng,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.latitude,
            lng: self.longitude,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub stops: Vec<RouteStop>,
}

impl Route {
    pub fn new(stops: Vec<RouteStop>) -> Self {
        Route { stops }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Keep only the first `max_stops` stops
    pub fn truncate(&mut self, max_stops: usize) {
        self.stops.truncate(max_stops);
    }

    /// Sum of the straight-line legs between consecutive stops, in km
    pub fn total_distance_km(&self) -> f64 {
        self.stops
            .windows(2)
            .map(|pair| pair[0].coordinates().distance_to(&pair[1].coordinates()))
            .sum()
    }
}
