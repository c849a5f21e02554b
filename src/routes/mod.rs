pub mod debug;
pub mod itinerary;
pub mod stations;

use axum::{routing::{get, post}, Router};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/itineraries", post(itinerary::create_itinerary))
        .route("/stations", get(stations::list_stations))
        .route("/stations/{name}", get(stations::get_station))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
