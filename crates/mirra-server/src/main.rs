use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod models;
mod routes;
mod services;

use adapters::PgPersonaRepository;
use application::PersonaService;
use services::analysis::AnalysisPipeline;
use services::embedding::OpenAiEmbedding;
use services::gemini::GeminiProvider;
use services::persona_index::PersonaVectorIndex;

/// Frontend dev servers, allowed unless ALLOWED_ORIGINS overrides them
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:5174";

/// Type aliases for application services with concrete repository implementations
pub type AppPersonaService = PersonaService<PgPersonaRepository>;
pub type AppAnalysisPipeline = AnalysisPipeline<PgPersonaRepository>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub persona_service: Arc<AppPersonaService>,
    pub embedding: Option<Arc<OpenAiEmbedding>>,
    pub index: Option<Arc<PersonaVectorIndex>>,
    pub pipeline: Option<Arc<AppAnalysisPipeline>>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Mirra API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("Mirra API initializing...");

    // Initialize API key from secrets
    if let Some(api_key) = secrets.get("MIRRA_API_KEY") {
        auth::init_api_key(api_key);
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!("No MIRRA_API_KEY set - authentication disabled");
    }

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Initialize the persona vector index (Qdrant) if configured
    let index = match (secrets.get("QDRANT_URL"), secrets.get("QDRANT_API_KEY")) {
        (Some(url), api_key) => match PersonaVectorIndex::new(&url, api_key).await {
            Ok(index) => Some(Arc::new(index)),
            Err(e) => {
                tracing::warn!("Failed to connect to persona index: {}", e);
                None
            }
        },
        _ => {
            tracing::warn!("No QDRANT_URL set - persona index disabled");
            None
        }
    };

    // Initialize the embedding service if configured
    let embedding = secrets.get("OPENAI_API_KEY").map(|key| {
        tracing::info!("Embedding service initialized");
        Arc::new(OpenAiEmbedding::new(key))
    });

    if embedding.is_none() {
        tracing::warn!("No OPENAI_API_KEY set - embedding disabled");
    }

    // Initialize the LLM provider if configured
    let llm = secrets.get("GEMINI_API_KEY").map(|key| {
        tracing::info!("LLM provider initialized (Gemini)");
        Arc::new(GeminiProvider::new(key))
    });

    if llm.is_none() {
        tracing::warn!("No GEMINI_API_KEY set - LLM disabled");
    }

    // Initialize application services
    let repo = Arc::new(PgPersonaRepository::new(pool.clone()));
    let persona_service = Arc::new(PersonaService::new(repo.clone()));

    // The analysis pipeline needs all three backing services
    let pipeline = match (index.clone(), embedding.clone(), llm) {
        (Some(index), Some(embedding), Some(llm)) => {
            tracing::info!("Analysis pipeline ready");
            Some(Arc::new(AnalysisPipeline::new(
                repo, index, embedding, llm, None,
            )))
        }
        _ => {
            tracing::warn!("Analysis pipeline disabled (missing services)");
            None
        }
    };

    // Create application state
    let state = AppState {
        persona_service,
        embedding,
        index,
        pipeline,
    };

    // CORS for the frontend origins (credentials rule out wildcards)
    let origins: Vec<HeaderValue> = secrets
        .get("ALLOWED_ORIGINS")
        .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::persona::router())
        .merge(routes::analyze::router())
        .layer(middleware::from_fn(auth::auth_middleware));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    // Build router with shared state
    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(cors)
        .with_state(state);

    tracing::info!("Swagger UI: /swagger-ui");
    tracing::info!("Mirra API ready");

    Ok(router.into())
}
