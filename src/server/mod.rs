use crate::catalog::CatalogService;
use crate::config::{CatalogMode, Config};
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod error;
pub mod routes;

pub use error::AppError;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<CatalogService>,
    pub config: Arc<Config>,
}

impl AppContext {
    pub fn new(catalog: CatalogService, config: Config) -> Self {
        Self {
            catalog: Arc::new(catalog),
            config: Arc::new(config),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::RANGE]);

    // Extracted package icons, addressed by `IconStorage::url_for`.
    let icon_route = ctx.config.icons.cache_route.trim_end_matches('/').to_string();
    let icons = ServeDir::new(&ctx.config.catalog.icon_cache_dir);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", routes::library_routes())
        .nest_service(&icon_route, icons)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server, spawning background indexing first when enabled.
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    tokio::fs::create_dir_all(&config.catalog.icon_cache_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create icon cache directory: {:?}",
                config.catalog.icon_cache_dir
            )
        })?;

    let catalog = CatalogService::from_config(&config)?;
    for library in catalog.libraries() {
        tracing::info!(
            id = library.id,
            name = %library.name,
            path = %library.path.display(),
            "Library configured"
        );
    }

    let scans = catalog.start_background();
    match catalog.mode() {
        CatalogMode::Background => {
            tracing::info!("Background indexing started for {} libraries", scans.len());
        }
        CatalogMode::OnDemand => tracing::info!("Directory listings are read on demand"),
    }

    let app = create_router(AppContext::new(catalog, config));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for scan in scans {
        scan.abort();
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
