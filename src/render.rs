//! # Rendering Orchestrator
//!
//! Sequences one render request end to end:
//!
//! 1. Load the template markup (404 if absent).
//! 2. Load its configuration. Without one, either fail (404) or fall back
//!    to the [`legacy`](crate::legacy) policy, depending on [`RenderOptions`].
//! 3. Substitute variables into the markup.
//! 4. Resolve logo slots concurrently.
//! 5. Rasterize, composite and encode on the blocking pool.
//!
//! Any failure aborts the request; no partial image is ever produced.

use std::path::PathBuf;
use std::time::Duration;

use crate::compose::{self, Compositor, RenderedImage};
use crate::error::{PlacardError, Result};
use crate::legacy::{LegacyMode, LegacyPolicy, legacy_logo_slots};
use crate::logo::{DEFAULT_FETCH_TIMEOUT, LogoResolver};
use crate::request::RenderRequest;
use crate::substitute::{self, ReplaceMode};
use crate::template::TemplateStore;

/// Immutable settings for a [`Renderer`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Directory holding templates, their configs and an optional `fonts/`.
    pub templates_dir: PathBuf,
    /// Timeout applied to each remote logo fetch.
    pub fetch_timeout: Duration,
    /// Policy for templates without a configuration file.
    pub legacy: LegacyPolicy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("./templates"),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            legacy: LegacyPolicy::new(LegacyMode::Disabled, ReplaceMode::All),
        }
    }
}

/// Renders templates into PNG images.
#[derive(Debug, Clone)]
pub struct Renderer {
    store: TemplateStore,
    resolver: LogoResolver,
    compositor: Compositor,
    legacy: LegacyPolicy,
}

impl Renderer {
    pub fn new(
        store: TemplateStore,
        resolver: LogoResolver,
        compositor: Compositor,
        legacy: LegacyPolicy,
    ) -> Self {
        Self {
            store,
            resolver,
            compositor,
            legacy,
        }
    }

    /// Build a renderer with an HTTP logo fetcher and fonts from the template root.
    pub fn from_options(options: &RenderOptions) -> Result<Self> {
        let store = TemplateStore::new(&options.templates_dir);
        let resolver = LogoResolver::http(options.fetch_timeout)?;
        let compositor = Compositor::for_template_root(&options.templates_dir);
        Ok(Self::new(store, resolver, compositor, options.legacy))
    }

    /// Render a request into a PNG.
    pub async fn render(&self, request: &RenderRequest) -> Result<RenderedImage> {
        let id = request.template.as_str();
        let variables = &request.variables;

        let markup = self.store.load_markup(id).await?;
        let config = self.store.load_config(id).await?;

        let (markup, mut overlays, texts) = match config {
            Some(config) => {
                tracing::debug!(
                    template = id,
                    slots = config.logos.len(),
                    defaults = config.default_variables.len(),
                    "rendering with template configuration"
                );
                let markup = substitute::substitute_with_config(&markup, &config, variables);
                let overlays =
                    compose::logo_overlays(&config.logos, variables, &self.resolver).await?;
                (markup, overlays, Vec::new())
            }
            None if self.legacy.enabled() => {
                tracing::debug!(template = id, mode = ?self.legacy.mode, "rendering legacy template");
                let resolved = self.legacy.resolve(variables);
                let markup = substitute::substitute(&markup, &resolved, self.legacy.replace);
                let overlays =
                    compose::logo_overlays(&legacy_logo_slots(), variables, &self.resolver)
                        .await?;
                (markup, overlays, self.legacy.text_overlays(variables))
            }
            None => return Err(PlacardError::ConfigNotFound(id.to_string())),
        };

        let compositor = self.compositor.clone();
        let image = tokio::task::spawn_blocking(move || {
            for text in &texts {
                overlays.push(compositor.text_overlay(text)?);
            }
            compositor.render(&markup, &overlays)
        })
        .await
        .map_err(|e| PlacardError::Task(e.to_string()))??;

        tracing::info!(
            template = id,
            width = image.width,
            height = image.height,
            bytes = image.png.len(),
            "rendered template"
        );
        Ok(image)
    }
}
