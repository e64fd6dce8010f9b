use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use rukna_match::config::Settings;
use rukna_match::core::Matcher;
use rukna_match::models::MatchingLimits;
use rukna_match::routes::{self, matches::{AppState, RouteLimits}};
use rukna_match::services::{Embedder, EmbeddingCache, GeminiClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    // Initialize logging; RUST_LOG wins over the configured level
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting Rukna matching service...");

    let embedding = &settings.embedding;
    let provider_configured = !embedding.api_key.is_empty();
    if !provider_configured {
        warn!("No embedding API key configured, every embedding will degrade to a random vector");
    }

    let timeout = Duration::from_millis(embedding.timeout_ms);
    let client = GeminiClient::new(
        embedding.endpoint.clone(),
        embedding.api_key.clone(),
        embedding.model.clone(),
        embedding.dimensions,
        timeout,
    )
    .map_err(|e| {
        error!("Failed to create embedding client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!("Embedding client initialized (model: {}, dimensions: {})", embedding.model, embedding.dimensions);

    let cache_capacity = settings.cache.capacity.unwrap_or(10_000);
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(86_400);
    let cache = EmbeddingCache::new(cache_capacity, cache_ttl);

    info!("Embedding cache initialized ({} entries, TTL: {}s)", cache_capacity, cache_ttl);

    let embedder = Embedder::new(Arc::new(client), cache, timeout);

    let limits = MatchingLimits {
        max_results: settings.matching.max_results(),
        concurrency: settings.matching.concurrency(),
    };
    let matcher = Matcher::new(embedder, limits);

    info!("Matcher initialized with limits: {:?}", limits);

    let app_state = AppState {
        matcher,
        limits: RouteLimits {
            max_limit: settings.matching.max_limit(),
            max_candidates: settings.matching.max_candidates(),
        },
        provider_configured,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
