//! parking-gateway server entry point.
//!
//! Starts the Axum HTTP server over the configured storage backend.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use parking_gateway::api;
use parking_gateway::app_state::AppState;
use parking_gateway::config::{ParkingConfig, StorageBackend};
use parking_gateway::persistence::{
    MemoryStore, PostgresStore, VehicleRepository, VisitRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Load configuration
    let config = ParkingConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        backend = %config.storage_backend,
        flat_fee = config.flat_fee,
        "starting parking-gateway"
    );

    // Build storage layer
    let (vehicles, visits) = open_storage(&config).await?;

    // Build application state
    let app_state = AppState::new(vehicles, visits, &config);

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.request_timeout_secs,
                ))),
        )
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn open_storage(
    config: &ParkingConfig,
) -> anyhow::Result<(Arc<dyn VehicleRepository>, Arc<dyn VisitRepository>)> {
    match config.storage_backend {
        StorageBackend::Memory => {
            let store = Arc::new(MemoryStore::new());
            let vehicles = Arc::clone(&store) as Arc<dyn VehicleRepository>;
            let visits: Arc<dyn VisitRepository> = store;
            Ok((vehicles, visits))
        }
        StorageBackend::Postgres => {
            let store = Arc::new(PostgresStore::connect(config).await?);
            if config.run_migrations {
                store.migrate().await?;
                tracing::info!("database migrations applied");
            }
            let vehicles = Arc::clone(&store) as Arc<dyn VehicleRepository>;
            let visits: Arc<dyn VisitRepository> = store;
            Ok((vehicles, visits))
        }
    }
}
