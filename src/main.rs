use axum::{Router, http::header, routing::get};
use divide_ai::{
    api::{handlers::api_routes, openapi::ApiDoc},
    config::CONFIG,
    core::services::LedgerService,
    infrastructure::{
        cache::in_memory::InMemoryCache, logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage,
    },
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn load_storage() -> Result<InMemoryStorage, Box<dyn std::error::Error>> {
    match &CONFIG.seed_path {
        Some(path) => {
            let json = tokio::fs::read_to_string(path).await?;
            let storage = InMemoryStorage::from_json(&json)?;
            info!("Seeded storage from {}", path);
            Ok(storage)
        }
        None => Ok(InMemoryStorage::new()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter(CONFIG.log_level.as_str()).init();

    let storage = load_storage().await?;
    let logging = InMemoryLogging::new();
    let cache = InMemoryCache::new();
    let service = Arc::new(LedgerService::new(storage, logging, cache));

    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .nest("/api", api_routes(service))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new()) // Gzip compression
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
