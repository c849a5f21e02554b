use axum::Router;
use daytrip::config::Config;
use daytrip::services::aggregator::CandidateAggregator;
use daytrip::services::events::{EventProvider, StaticEventCatalog};
use daytrip::services::google_places::{GooglePlacesClient, PlaceSearch};
use daytrip::services::itinerary::ItineraryPlanner;
use daytrip::services::ranking::{OpenAiRankingClient, RankingAssist};
use daytrip::services::stations::{StaticStationDirectory, StationDirectory};
use daytrip::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daytrip=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting DayTrip API server");
    tracing::info!("Configuration loaded successfully");

    // Place search: an empty key puts the engine in placeholder mode
    let places_key = config.google_places_api_key.clone().unwrap_or_default();
    if places_key.is_empty() {
        tracing::warn!("GOOGLE_PLACES_API_KEY not set. Serving placeholder candidates.");
    }
    let timeout = config.planner.places_timeout_secs;
    let search: Arc<dyn PlaceSearch> = match config.google_places_base_url {
        Some(ref base_url) => Arc::new(GooglePlacesClient::with_config(
            places_key,
            base_url.clone(),
            timeout,
        )),
        None => Arc::new(GooglePlacesClient::new(places_key, timeout)),
    };

    let assist: Option<Arc<dyn RankingAssist>> = match config.openai_api_key {
        Some(ref key) => {
            tracing::info!(model = %config.openai_model, "Ranking assist enabled");
            let timeout = config.planner.ranking_timeout_secs;
            let client = match config.openai_base_url {
                Some(ref base_url) => OpenAiRankingClient::with_config(
                    key.clone(),
                    config.openai_model.clone(),
                    base_url.clone(),
                    timeout,
                ),
                None => OpenAiRankingClient::new(key.clone(), config.openai_model.clone(), timeout),
            };
            let client: Arc<dyn RankingAssist> = Arc::new(client);
            Some(client)
        }
        None => {
            tracing::info!("OPENAI_API_KEY not set. Ranking assist disabled.");
            None
        }
    };

    // Initialize services
    let events: Arc<dyn EventProvider> = Arc::new(StaticEventCatalog::anyang());
    let stations: Arc<dyn StationDirectory> = Arc::new(StaticStationDirectory::anyang());
    let aggregator = CandidateAggregator::new(
        search,
        events,
        stations.clone(),
        config.planner.clone(),
    );
    let planner = ItineraryPlanner::new(aggregator, assist);

    // Create application state
    let state = Arc::new(AppState { planner, stations });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", daytrip::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
