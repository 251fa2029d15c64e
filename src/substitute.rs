//! # Variable Substitution
//!
//! Merges template defaults with caller-supplied variables and replaces
//! `{{NAME}}` tokens in the markup.
//!
//! ## Merge rules (config-driven templates)
//!
//! 1. A supplied variable whose name equals a logo slot name is a logo, not
//!    text. It is never substituted.
//! 2. Text variable names are uppercased: `titulo` fills `{{TITULO}}`.
//! 3. Supplied values override defaults on key collision.
//! 4. Tokens with no resolved value are left as-is.
//!
//! Legacy (no-config) templates use [`crate::legacy`] to build the resolved
//! set instead, then share [`substitute`] for the replacement itself.

use clap::ValueEnum;
use std::collections::BTreeMap;

use crate::request::Variables;
use crate::template::TemplateConfig;

/// Uppercase placeholder name -> substitution text.
pub type ResolvedVariables = BTreeMap<String, String>;

/// How many occurrences of each token are replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReplaceMode {
    /// Every occurrence.
    #[default]
    All,
    /// Only the first occurrence of each token.
    First,
}

/// Build the placeholder map for a config-driven template.
pub fn resolve_variables(config: &TemplateConfig, supplied: &Variables) -> ResolvedVariables {
    let mut resolved: ResolvedVariables = config
        .default_variables
        .iter()
        .filter(|(name, _)| !config.is_logo(name))
        .map(|(name, value)| (name.to_uppercase(), value.clone()))
        .collect();

    for (name, value) in supplied.texts() {
        if config.is_logo(name) {
            continue;
        }
        resolved.insert(name.to_uppercase(), value);
    }

    resolved
}

/// Token for a placeholder name: `TITULO` -> `{{TITULO}}`.
pub fn placeholder(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}

/// Replace every resolved placeholder in `markup`.
///
/// Values are escaped for XML text/attribute context, so the rendered glyphs
/// match the supplied string exactly.
pub fn substitute(markup: &str, resolved: &ResolvedVariables, mode: ReplaceMode) -> String {
    let mut output = markup.to_string();
    for (name, value) in resolved {
        let token = placeholder(name);
        if !output.contains(&token) {
            continue;
        }
        let value = escape_xml(value);
        output = match mode {
            ReplaceMode::All => output.replace(&token, &value),
            ReplaceMode::First => output.replacen(&token, &value, 1),
        };
    }
    output
}

/// Config-driven substitution in one step.
pub fn substitute_with_config(
    markup: &str,
    config: &TemplateConfig,
    supplied: &Variables,
) -> String {
    let resolved = resolve_variables(config, supplied);
    substitute(markup, &resolved, ReplaceMode::All)
}

/// Escape characters that are significant in XML text and attributes.
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
