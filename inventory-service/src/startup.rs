//! Application startup and lifecycle management.

use crate::config::{InventoryConfig, StoreBackend};
use crate::handlers::{catalog, documents, drafts, health};
use crate::services::store::{CatalogStore, DocumentStore};
use crate::services::{init_metrics, DraftRegistry, InMemoryStore, PgStore};
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: InventoryConfig,
    pub catalog: Arc<dyn CatalogStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub drafts: Arc<DraftRegistry>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: InventoryConfig) -> Result<Self, AppError> {
        init_metrics();

        let (catalog, documents): (Arc<dyn CatalogStore>, Arc<dyn DocumentStore>) =
            match config.store.backend {
                StoreBackend::Memory => {
                    tracing::info!("Using the in-memory store backend");
                    let store = Arc::new(InMemoryStore::seeded());
                    (store.clone(), store)
                }
                StoreBackend::Postgres => {
                    let url = config.store.database_url.as_deref().ok_or_else(|| {
                        AppError::ConfigError(anyhow::anyhow!("DATABASE_URL is not set"))
                    })?;
                    let store = PgStore::new(
                        url,
                        config.store.max_connections,
                        config.store.min_connections,
                    )
                    .await
                    .map_err(|e| {
                        tracing::error!(error = %e, "Failed to connect to PostgreSQL");
                        e
                    })?;
                    store.run_migrations().await.map_err(|e| {
                        tracing::error!(error = %e, "Failed to run migrations");
                        e
                    })?;
                    let store = Arc::new(store);
                    (store.clone(), store)
                }
            };

        let state = AppState {
            config: config.clone(),
            catalog,
            documents,
            drafts: Arc::new(DraftRegistry::new()),
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Inventory service listener bound");

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = Router::new()
            .route("/health", get(health::health_check))
            .route("/ready", get(health::readiness_check))
            .route("/metrics", get(health::metrics_endpoint))
            .route("/api/products", get(catalog::list_products))
            .route("/api/products/resolve", get(catalog::resolve_product))
            .route("/api/suppliers", get(catalog::list_suppliers))
            .route("/api/suppliers/resolve", get(catalog::resolve_supplier))
            .route("/api/customers", get(catalog::list_customers))
            .route("/api/customers/resolve", get(catalog::resolve_customer))
            .route(
                "/api/documents",
                get(documents::list_documents).post(documents::create_document),
            )
            .route(
                "/api/documents/:id",
                get(documents::get_document)
                    .put(documents::update_document)
                    .delete(documents::delete_document),
            )
            .route("/api/drafts", post(drafts::open_draft))
            .route(
                "/api/drafts/:draft_id",
                get(drafts::get_draft).delete(drafts::discard_draft),
            )
            .route(
                "/api/drafts/:draft_id/header",
                patch(drafts::update_draft_header),
            )
            .route("/api/drafts/:draft_id/lines", post(drafts::add_draft_line))
            .route(
                // PATCH addresses the line by position, DELETE by product id.
                "/api/drafts/:draft_id/lines/:line_ref",
                patch(drafts::update_draft_line).delete(drafts::remove_draft_line),
            )
            .route("/api/drafts/:draft_id/submit", post(drafts::submit_draft))
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(metrics_middleware))
            .layer(middleware::from_fn(request_id_middleware))
            .layer(CorsLayer::permissive())
            .with_state(self.state);

        tracing::info!(
            service = "inventory-service",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        axum::serve(self.listener, router).await
    }
}
