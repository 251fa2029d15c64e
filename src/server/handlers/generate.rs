//! Template rendering handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::error::PlacardError;
use crate::request::RenderRequest;

use super::super::state::AppState;

/// Handle POST /generate - render a template to PNG.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let Json(request) = payload.map_err(|e| {
        tracing::warn!(error = %e, "rejected render request body");
        (StatusCode::BAD_REQUEST, e.body_text())
    })?;

    let image = state.renderer.render(&request).await.map_err(|e| {
        tracing::error!(template = %request.template, error = %e, "render failed");
        error_response(&e)
    })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], image.png))
}

/// Map a pipeline error to a status code and a short message.
///
/// Server-side failures get a generic message; the detail is only logged.
pub fn error_response(error: &PlacardError) -> (StatusCode, String) {
    match error {
        PlacardError::TemplateNotFound(_) => {
            (StatusCode::NOT_FOUND, "Template not found.".to_string())
        }
        PlacardError::ConfigNotFound(_) => (
            StatusCode::NOT_FOUND,
            "Template configuration not found.".to_string(),
        ),
        PlacardError::InvalidPath(_) => {
            (StatusCode::BAD_REQUEST, "Invalid template path.".to_string())
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate image.".to_string(),
        ),
    }
}
