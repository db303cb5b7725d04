use crate::booking::{self, BookingStore};
use crate::coffee::{self, CoffeeApp, CoffeeStore};
use crate::config::{AppKind, Config};
use crate::storage::Database;
use crate::trivia::{self, TriviaStore};
use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    response::{IntoResponse, Json},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "fyyur-suite",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Any origin, the verbs the APIs use, and the headers the clients send.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Open the app's store on `db` and build its router.
pub async fn create_server(app: AppKind, config: &Config, db: Database) -> Result<Router> {
    let router = match app {
        AppKind::Booking => {
            let store = BookingStore::open(db).await?;
            booking::router(store)
        }
        AppKind::Trivia => {
            let store = TriviaStore::open(db).await?;
            trivia::router(store)
        }
        AppKind::Coffee => {
            let store = CoffeeStore::open(db).await?;
            let app = CoffeeApp::from_config(store, config)?;
            coffee::router(app)
        }
    };
    Ok(router)
}

/// Bind the listener and serve until Ctrl+C.
pub async fn start_server(app: AppKind, router: Router, port: u16) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(app = app.as_str(), "Listening on {}", addr);
    println!("🚀 {} server running on http://localhost:{port}", app.as_str());
    println!("💚 Health check: http://localhost:{port}/health");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
}
