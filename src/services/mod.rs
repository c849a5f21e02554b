pub mod aggregator;
pub mod classifier;
pub mod events;
pub mod google_places;
pub mod itinerary;
pub mod ranking;
pub mod stations;
