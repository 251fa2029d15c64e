//! Render request payload.
//!
//! The body is an open JSON object: `template` names the template and every
//! other key is a variable, so any template can declare any set of
//! placeholders without a schema change.
//!
//! ```json
//! { "template": "match.svg", "titulo": "FINAL", "logo1": "https://..." }
//! ```

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A single render request.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderRequest {
    /// Template identifier, relative to the template root.
    pub template: String,
    /// All remaining keys of the payload.
    #[serde(flatten)]
    pub variables: Variables,
}

impl RenderRequest {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            variables: Variables::default(),
        }
    }

    /// Builder-style helper to add a string variable.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name, value);
        self
    }
}

/// Caller-supplied variables, keyed by their name as sent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Variables(BTreeMap<String, Value>);

impl Variables {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), Value::String(value.into()));
    }

    /// Text form of a variable.
    ///
    /// Strings are returned as-is, numbers and booleans in their JSON form.
    /// `null`, arrays and objects count as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.0.get(name).and_then(text_value)
    }

    /// Logo source for a slot: only non-empty strings qualify.
    pub fn logo_source(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Iterate over variables that have a text form.
    pub fn texts(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.0
            .iter()
            .filter_map(|(name, value)| text_value(value).map(|text| (name.as_str(), text)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
