//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        db::DbAdapter,
        extract::{MetadataSummaryTier, PdfExtractTier, SampleDataTier},
        summary_llm::OpenAiSummaryAdapter,
    },
    config::Config,
    error::ApiError,
    web::{api_router, state::AppState, ApiDoc},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use doclens_core::extraction::{ExtractionChain, ExtractionTier};
use doclens_core::ports::Summarizer;
use doclens_core::prefs::PreferenceStore;
use doclens_core::token::TokenService;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    db_adapter
        .run_migrations()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    // The summarizer is optional: without an API key the primary tier falls
    // back to extractive summaries instead of calling out.
    let summarizer: Option<Arc<dyn Summarizer>> = match &config.openai_api_key {
        Some(key) => {
            let openai_config = OpenAIConfig::new().with_api_key(key);
            let client = Client::with_config(openai_config);
            Some(Arc::new(OpenAiSummaryAdapter::new(
                client,
                config.summary_model.clone(),
            )))
        }
        None => {
            warn!("OPENAI_API_KEY not set; document summaries will be extractive");
            None
        }
    };

    let tiers: Vec<Arc<dyn ExtractionTier>> = vec![
        Arc::new(PdfExtractTier::new(summarizer)),
        Arc::new(MetadataSummaryTier),
        Arc::new(SampleDataTier),
    ];
    let extraction = Arc::new(ExtractionChain::new(tiers));

    let tokens = Arc::new(TokenService::new(
        &config.jwt_secret,
        Duration::days(config.token_ttl_days),
    ));

    let prefs = Arc::new(PreferenceStore::open(config.prefs_path.clone()).await.map_err(
        |e| ApiError::Internal(format!("could not open preference store: {e}")),
    )?);

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        users: db_adapter,
        tokens,
        extraction,
        prefs,
    });

    // --- 5. Create the Web Router ---
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    let api = api_router(app_state).layer(cors);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
