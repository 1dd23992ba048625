//! HTTP layer for the calculator.
//!
//! ```text
//! browser ──POST /──────────> encode ──> Scorer ──> HTML page
//! client  ──POST /api/predict> encode ──> Scorer ──> JSON report
//! ```

pub mod handlers;

use crate::error::{LifespanError, Result};
use crate::score::Scorer;
use crate::types::config::Settings;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Read-only state shared across requests.
#[derive(Debug, Clone, Copy)]
pub struct AppState {
    pub scorer: Scorer,
}

impl AppState {
    pub fn new(scorer: Scorer) -> Self {
        Self { scorer }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Scorer::default()
                .with_z(settings.z)
                .with_variance_model(settings.variance_model),
        )
    }
}

/// # Routes
///
/// - `GET /` - calculator form
/// - `POST /` - form submission, re-renders the page with the result
/// - `POST /api/predict` - JSON answers in, JSON prediction out
/// - `GET /health` - liveness check
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::form_page).post(handlers::submit_form))
        .route("/api/predict", post(handlers::predict_json))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(settings: &Settings) -> Result<()> {
    settings.validate()?;
    let state = Arc::new(AppState::from_settings(settings));
    state.scorer.model().validate()?;
    let app = create_router(state);

    let addr = settings.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| LifespanError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(
        %addr,
        z = settings.z,
        variance_model = ?settings.variance_model,
        "lifespan calculator listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
