use crate::error::{AppError, Result};
use crate::services::stations::Station;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

/// GET /stations
pub async fn list_stations(State(state): State<Arc<AppState>>) -> Json<Vec<Station>> {
    Json(state.stations.stations())
}

/// GET /stations/{name}
/// Accepts the name with or without the trailing '역'
pub async fn get_station(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Station>> {
    state
        .stations
        .find_station(&name)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Unknown station: {}", name)))
}
