pub mod api;
pub mod candidate;
pub mod coordinates;
pub mod itinerary;
pub mod preferences;
pub mod route;

pub use api::{ItineraryRequest, ItineraryResponse};
pub use candidate::{Candidate, Category, RawPlace};
pub use coordinates::Coordinates;
pub use itinerary::{Anchor, AnchorKind, Itinerary, SelectionResult};
pub use preferences::{CulturePreference, FoodPreference, PreferenceSpec, TransportMode};
pub use route::{Route, RouteStop};
