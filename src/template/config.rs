//! # Template Configuration
//!
//! Each template may ship a sibling JSON document describing the default
//! values of its placeholders and where caller-supplied logos are drawn.
//!
//! ```json
//! {
//!   "defaultVariables": { "TITULO": "GAME" },
//!   "logos": [
//!     { "name": "logo1", "width": 100, "height": 100, "top": 10, "left": 10 }
//!   ]
//! }
//! ```
//!
//! Slot order is stacking order: later slots are drawn over earlier ones.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

use crate::error::{PlacardError, Result};

/// Declarative configuration for one template.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    /// Placeholder name -> default substitution text.
    #[serde(default)]
    pub default_variables: BTreeMap<String, String>,
    /// Logo slots in stacking order.
    #[serde(default)]
    pub logos: Vec<LogoSlot>,
}

/// A named region into which a caller-supplied logo is composited.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogoSlot {
    /// Variable name that carries the logo source.
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Vertical offset in pixels; negative values start above the canvas.
    #[serde(default)]
    pub top: i64,
    /// Horizontal offset in pixels; negative values start left of the canvas.
    #[serde(default)]
    pub left: i64,
}

impl TemplateConfig {
    /// Parse and validate a configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TemplateConfig = serde_json::from_str(json)
            .map_err(|e| PlacardError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check slot invariants: unique names and non-zero dimensions.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for slot in &self.logos {
            if slot.name.is_empty() {
                return Err(PlacardError::InvalidConfig(
                    "logo slot name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(slot.name.as_str()) {
                return Err(PlacardError::InvalidConfig(format!(
                    "duplicate logo slot '{}'",
                    slot.name
                )));
            }
            if slot.width == 0 || slot.height == 0 {
                return Err(PlacardError::InvalidConfig(format!(
                    "logo slot '{}' must have a positive size, got {}x{}",
                    slot.name, slot.width, slot.height
                )));
            }
        }
        Ok(())
    }

    /// Look up a slot by its variable name (case-sensitive).
    pub fn slot(&self, name: &str) -> Option<&LogoSlot> {
        self.logos.iter().find(|slot| slot.name == name)
    }

    /// Whether `name` is reserved for a logo slot.
    pub fn is_logo(&self, name: &str) -> bool {
        self.slot(name).is_some()
    }
}
