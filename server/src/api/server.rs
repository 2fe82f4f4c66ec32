//! API server initialization

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::openapi::openapi_json;
use super::routes::view::ViewApiState;
use super::routes::{health, view};
use crate::app::CoreApp;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;

        let shutdown = app.shutdown.clone();
        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(host.parse()?, port);

        let state = ViewApiState {
            datastore: app.datastore.clone(),
            view: app.config.view,
        };

        // The view is embedded cross-origin by the host platform's pages
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([axum::http::Method::GET]);

        let router = Router::new()
            .route("/api/v1/health", get(health::health))
            .route("/api/v1/openapi.json", get(openapi_json))
            .route("/api/v1/resource/{resource_id}/view", get(view::get_view))
            .route(
                "/api/v1/resource/{resource_id}/view/facets",
                get(view::get_view_facets),
            )
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CompressionLayer::new())
                    .layer(cors),
            );

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "API server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.wait_triggered().await })
            .await?;

        Ok(app)
    }
}
