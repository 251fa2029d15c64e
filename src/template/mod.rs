//! # Template Module
//!
//! Loading of SVG templates and their declarative configuration.
//!
//! ## Modules
//!
//! - [`config`]: Template configuration (default variables, logo slots)
//! - [`store`]: Filesystem-backed template lookup with path hardening

pub mod config;
pub mod store;

pub use config::{LogoSlot, TemplateConfig};
pub use store::TemplateStore;
