//! # Placard - SVG Template Rendering
//!
//! Placard renders PNG images from SVG templates. A template is an SVG file
//! with `{{NAME}}` placeholders plus an optional JSON configuration holding
//! default values and logo slots. A request names the template and supplies
//! variables; logos may be URLs or inline `data:image/...;base64,` strings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use placard::{RenderRequest, Renderer, render::RenderOptions};
//!
//! # async fn example() -> Result<(), placard::PlacardError> {
//! let renderer = Renderer::from_options(&RenderOptions::default())?;
//!
//! let request = RenderRequest::new("match.svg")
//!     .with("titulo", "FINAL")
//!     .with("logo1", "https://example.com/home.png");
//!
//! let image = renderer.render(&request).await?;
//! std::fs::write("match.png", &image.png)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`template`] | Template store and configuration |
//! | [`substitute`] | Placeholder merge and replacement |
//! | [`logo`] | Logo source resolution and resizing |
//! | [`compose`] | Rasterization and overlay compositing |
//! | [`legacy`] | Policy for templates without configuration |
//! | [`render`] | Request orchestration |
//! | [`server`] | HTTP interface |
//! | [`error`] | Error types |

pub mod compose;
pub mod error;
pub mod legacy;
pub mod logo;
pub mod render;
pub mod request;
pub mod server;
pub mod substitute;
pub mod template;

// Re-exports for convenience
pub use compose::RenderedImage;
pub use error::PlacardError;
pub use render::Renderer;
pub use request::RenderRequest;
