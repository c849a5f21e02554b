use crate::models::{Candidate, Coordinates, Route};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum AnchorKind {
    Station(String),
    CityCenter,
}

/// The point every search for a request is centred on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Anchor {
    pub coordinates: Coordinates,
    pub radius_m: f64,
    pub kind: AnchorKind,
}

impl Anchor {
    pub fn station(name: impl Into<String>, coordinates: Coordinates, radius_m: f64) -> Self {
        Anchor {
            coordinates,
            radius_m,
            kind: AnchorKind::Station(name.into()),
        }
    }

    pub fn city_center(coordinates: Coordinates, radius_m: f64) -> Self {
        Anchor {
            coordinates,
            radius_m,
            kind: AnchorKind::CityCenter,
        }
    }

    pub fn is_station(&self) -> bool {
        matches!(self.kind, AnchorKind::Station(_))
    }
}

/// Output of the selection engine.
///
/// Holds exactly `requested` candidates unless the pools ran dry, in which case
/// `is_short()` reports it. Running short is not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionResult {
    pub candidates: Vec<Candidate>,
    pub requested: usize,
}

impl SelectionResult {
    pub fn new(candidates: Vec<Candidate>, requested: usize) -> Self {
        SelectionResult {
            candidates,
            requested,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.candidates.len())
    }

    pub fn is_short(&self) -> bool {
        self.shortfall() > 0
    }

    pub fn restaurant_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.is_restaurant()).count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Itinerary {
    pub recommended: SelectionResult,
    pub route: Route,
    pub anchor: Anchor,
}
