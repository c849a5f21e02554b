use crate::error::{AppError, Result};
use crate::models::{ItineraryRequest, ItineraryResponse};
use crate::AppState;
use axum::{extract::State, Json};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// POST /itineraries
/// Recommend places for a day trip and order them into a route
pub async fn create_itinerary(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ItineraryRequest>,
) -> Result<Json<ItineraryResponse>> {
    request.validate().map_err(AppError::InvalidRequest)?;
    let prefs = request.to_preferences().map_err(AppError::InvalidRequest)?;

    tracing::info!(
        desired = prefs.desired_count,
        date = %prefs.date,
        transport = %prefs.transport.display_name(),
        station = ?prefs.station_name(),
        "Itinerary request: {} places on {}",
        prefs.desired_count, prefs.date
    );

    let mut rng = match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let itinerary = state.planner.plan(&prefs, &mut rng).await;

    tracing::info!(
        places = itinerary.recommended.len(),
        stops = itinerary.route.len(),
        "Itinerary ready with {} stops",
        itinerary.route.len()
    );

    Ok(Json(ItineraryResponse::from(itinerary)))
}
