//! # HTTP Server for Template Rendering
//!
//! Exposes the rendering pipeline over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! placard serve --templates-dir ./templates --port 3000
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | POST | `/generate` | `image/png`, or a plain-text error |
//! | GET | `/health` | `{"status": "ok"}` |

mod handlers;
mod state;

pub use handlers::generate::error_response;
pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::PlacardError;

/// Request bodies carry inline logos, so allow more than axum's 2MB default.
const BODY_LIMIT: usize = 25 * 1024 * 1024;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/generate",
            post(handlers::generate::generate).layer(DefaultBodyLimit::max(BODY_LIMIT)),
        )
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use placard::render::RenderOptions;
/// use placard::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), placard::error::PlacardError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:3000".to_string(),
///     render: RenderOptions::default(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), PlacardError> {
    let app_state = Arc::new(AppState::new(config.clone())?);
    let app = router(app_state);

    tracing::info!(
        listen = %config.listen_addr,
        templates = %config.render.templates_dir.display(),
        legacy = ?config.render.legacy.mode,
        "placard HTTP server starting"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            PlacardError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind to {}: {}", config.listen_addr, e),
            ))
        })?;

    axum::serve(listener, app).await?;

    Ok(())
}
