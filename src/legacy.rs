//! # Legacy Templates
//!
//! Templates that predate per-template configuration files carry a fixed set
//! of placeholders and two logo positions baked into their layout. They are
//! rendered through an explicit alternate policy rather than being folded
//! into the config-driven path.
//!
//! | Placeholder | Default |
//! |-------------|---------|
//! | `{{TITULO}}` | `TITULO` |
//! | `{{DATA}}` | `DATA` |
//! | `{{HORA}}` | `HORA` |
//! | `{{LOCAL}}` | `LOCAL` |
//! | `{{COR1}}`..`{{COR4}}` | palette colors |
//!
//! A default applies whenever the supplied value is absent or blank.
//!
//! Two layout styles exist:
//!
//! - [`LegacyMode::Placeholders`]: every field, date and time included, is a
//!   markup placeholder.
//! - [`LegacyMode::TextOverlay`]: date and time are not in the markup; when
//!   supplied they are drawn as separate text overlays at fixed coordinates.

use clap::ValueEnum;

use crate::request::Variables;
use crate::substitute::{ReplaceMode, ResolvedVariables};
use crate::template::LogoSlot;

/// What to do when a template has no configuration file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LegacyMode {
    /// Missing configuration is an error.
    #[default]
    Disabled,
    /// Fixed placeholders, all substituted into the markup.
    Placeholders,
    /// Fixed placeholders, with date and time drawn as text overlays.
    TextOverlay,
}

/// A fixed placeholder and its fallback value.
#[derive(Debug, Clone, Copy)]
pub struct LegacyField {
    pub name: &'static str,
    pub default: &'static str,
}

pub const LEGACY_FIELDS: &[LegacyField] = &[
    LegacyField { name: "TITULO", default: "TITULO" },
    LegacyField { name: "DATA", default: "DATA" },
    LegacyField { name: "HORA", default: "HORA" },
    LegacyField { name: "LOCAL", default: "LOCAL" },
    LegacyField { name: "COR1", default: "#0B1F3A" },
    LegacyField { name: "COR2", default: "#FFFFFF" },
    LegacyField { name: "COR3", default: "#E4002B" },
    LegacyField { name: "COR4", default: "#FFC72C" },
];

/// Fields drawn as overlays in [`LegacyMode::TextOverlay`].
const OVERLAY_FIELDS: &[&str] = &["DATA", "HORA"];

/// Fixed two-logo layout shared by all legacy templates (1080px wide canvas).
pub fn legacy_logo_slots() -> Vec<LogoSlot> {
    vec![
        LogoSlot {
            name: "logo1".to_string(),
            width: 200,
            height: 200,
            top: 440,
            left: 140,
        },
        LogoSlot {
            name: "logo2".to_string(),
            width: 200,
            height: 200,
            top: 440,
            left: 740,
        },
    ]
}

/// Font settings for a synthesized text overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub fill: &'static str,
    pub font_family: &'static str,
    /// Canvas size of the rendered fragment.
    pub width: u32,
    pub height: u32,
}

pub const OVERLAY_STYLE: TextStyle = TextStyle {
    font_size: 48.0,
    fill: "#FFFFFF",
    font_family: "sans-serif",
    width: 480,
    height: 64,
};

/// A text string to rasterize and composite at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub text: String,
    pub top: i64,
    pub left: i64,
    pub style: TextStyle,
}

/// Rendering policy for templates without a configuration file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyPolicy {
    pub mode: LegacyMode,
    pub replace: ReplaceMode,
}

impl LegacyPolicy {
    pub fn new(mode: LegacyMode, replace: ReplaceMode) -> Self {
        Self { mode, replace }
    }

    pub fn enabled(&self) -> bool {
        self.mode != LegacyMode::Disabled
    }

    /// Resolve the fixed placeholder set against supplied variables.
    ///
    /// Supplied names that are not fixed fields are ignored.
    pub fn resolve(&self, supplied: &Variables) -> ResolvedVariables {
        LEGACY_FIELDS
            .iter()
            .filter(|field| !self.is_overlay_field(field.name))
            .map(|field| {
                let value = supplied_field(supplied, field.name)
                    .unwrap_or_else(|| field.default.to_string());
                (field.name.to_string(), value)
            })
            .collect()
    }

    /// Text overlays for date and time, in that order; empty unless the
    /// policy draws them as overlays and the caller supplied them.
    pub fn text_overlays(&self, supplied: &Variables) -> Vec<TextOverlay> {
        if self.mode != LegacyMode::TextOverlay {
            return Vec::new();
        }

        let positions = [("DATA", 880, 140), ("HORA", 880, 620)];
        positions
            .into_iter()
            .filter_map(|(name, top, left)| {
                supplied_field(supplied, name).map(|text| TextOverlay {
                    text,
                    top,
                    left,
                    style: OVERLAY_STYLE,
                })
            })
            .collect()
    }

    fn is_overlay_field(&self, name: &str) -> bool {
        self.mode == LegacyMode::TextOverlay && OVERLAY_FIELDS.contains(&name)
    }
}

/// Non-blank supplied value for a fixed field, matched case-insensitively.
fn supplied_field(supplied: &Variables, name: &str) -> Option<String> {
    supplied
        .texts()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn placeholders() -> LegacyPolicy {
        LegacyPolicy::new(LegacyMode::Placeholders, ReplaceMode::All)
    }

    #[test]
    fn test_defaults_when_nothing_supplied() {
        let resolved = placeholders().resolve(&Variables::default());
        assert_eq!(resolved.len(), LEGACY_FIELDS.len());
        assert_eq!(resolved.get("DATA").unwrap(), "DATA");
        assert_eq!(resolved.get("HORA").unwrap(), "HORA");
    }

    #[test]
    fn test_blank_value_falls_back() {
        let vars: Variables = [("data", ""), ("hora", "  "), ("titulo", "Final")]
            .into_iter()
            .collect();
        let resolved = placeholders().resolve(&vars);
        assert_eq!(resolved.get("DATA").unwrap(), "DATA");
        assert_eq!(resolved.get("HORA").unwrap(), "HORA");
        assert_eq!(resolved.get("TITULO").unwrap(), "Final");
    }

    #[test]
    fn test_unknown_variables_ignored() {
        let vars: Variables = [("placar", "3x1")].into_iter().collect();
        assert!(!placeholders().resolve(&vars).contains_key("PLACAR"));
    }

    #[test]
    fn test_text_overlay_mode_moves_date_and_time() {
        let policy = LegacyPolicy::new(LegacyMode::TextOverlay, ReplaceMode::All);
        let vars: Variables = [("data", "12/10"), ("hora", "21:30")].into_iter().collect();

        let resolved = policy.resolve(&vars);
        assert!(!resolved.contains_key("DATA"));
        assert!(!resolved.contains_key("HORA"));

        let overlays = policy.text_overlays(&vars);
        assert_eq!(overlays.len(), 2);
        assert_eq!(overlays[0].text, "12/10");
        assert_eq!(overlays[1].text, "21:30");
    }

    #[test]
    fn test_text_overlays_skip_missing_fields() {
        let policy = LegacyPolicy::new(LegacyMode::TextOverlay, ReplaceMode::All);
        let vars: Variables = [("hora", "21:30")].into_iter().collect();
        let overlays = policy.text_overlays(&vars);
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].text, "21:30");
    }

    #[test]
    fn test_placeholder_mode_has_no_text_overlays() {
        let vars: Variables = [("data", "12/10")].into_iter().collect();
        assert!(placeholders().text_overlays(&vars).is_empty());
    }

    #[test]
    fn test_fixed_logo_slots_are_valid() {
        let config = crate::template::TemplateConfig {
            logos: legacy_logo_slots(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
