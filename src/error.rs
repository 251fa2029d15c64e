//! # Error Types
//!
//! This module defines error types used throughout the placard library.

use thiserror::Error;

/// Main error type for placard operations
#[derive(Debug, Error)]
pub enum PlacardError {
    /// The requested template markup does not exist
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// The template exists but its configuration does not
    #[error("Template configuration not found: {0}")]
    ConfigNotFound(String),

    /// Template identifier escapes the template root or is malformed
    #[error("Invalid template path: {0}")]
    InvalidPath(String),

    /// Template configuration could not be parsed or violates its invariants
    #[error("Invalid template configuration: {0}")]
    InvalidConfig(String),

    /// Remote logo retrieval failed (transport, timeout, HTTP status)
    #[error("Logo fetch error: {0}")]
    LogoFetch(String),

    /// Logo payload is not a decodable image
    #[error("Logo decode error: {0}")]
    LogoDecode(String),

    /// Markup could not be parsed or rendered
    #[error("Rasterization error: {0}")]
    Rasterization(String),

    /// PNG encoding failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// Background task failed to complete
    #[error("Task error: {0}")]
    Task(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for placard operations.
pub type Result<T> = std::result::Result<T, PlacardError>;
