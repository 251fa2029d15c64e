//! Server state and configuration.

use crate::error::Result;
use crate::render::{RenderOptions, Renderer};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:3000")
    pub listen_addr: String,
    /// Rendering settings shared by every request
    pub render: RenderOptions,
}

/// Application state shared across handlers.
///
/// Immutable after startup; requests share nothing mutable.
pub struct AppState {
    pub config: ServerConfig,
    pub renderer: Renderer,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let renderer = Renderer::from_options(&config.render)?;
        Ok(Self { config, renderer })
    }

    /// State with a pre-built renderer (custom fetcher, fonts).
    pub fn with_renderer(config: ServerConfig, renderer: Renderer) -> Self {
        Self { config, renderer }
    }
}
