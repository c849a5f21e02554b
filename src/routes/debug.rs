use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Report which collaborators are configured
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let places = state.planner.aggregator().has_place_credentials();
    let assist = state.planner.has_assist();

    let status = json!({
        "status": if places { "ok" } else { "degraded" },
        "checks": {
            "place_search": if places { "ok" } else { "placeholders" },
            "ranking_assist": if assist { "ok" } else { "disabled" },
            "stations": state.stations.stations().len(),
        }
    });

    Json(status)
}
