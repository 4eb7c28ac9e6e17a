//! Message catalog
//!
//! Messages are addressed by symbolic keys such as
//! `FORM_VALIDATION_EMAIL_EMPTY`. A key is looked up in the injected language
//! dictionary first, then in the catalog's constants. Unknown keys resolve to
//! `None`; [`MessageCatalog::substitute`] then falls back to the key text
//! itself so a message is always produced.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Primitive value substituted into a message template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageArg {
    Int(i64),
    Number(f64),
    Text(String),
    Bool(bool),
}

impl MessageArg {
    /// A number that is not there, displayed as `NaN`.
    pub fn nan() -> Self {
        MessageArg::Number(f64::NAN)
    }
}

impl fmt::Display for MessageArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageArg::Int(value) => write!(f, "{}", value),
            MessageArg::Number(value) if value.is_nan() => f.write_str("NaN"),
            MessageArg::Number(value) => write!(f, "{}", value),
            MessageArg::Text(value) => f.write_str(value),
            MessageArg::Bool(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for MessageArg {
    fn from(value: i64) -> Self {
        MessageArg::Int(value)
    }
}

impl From<usize> for MessageArg {
    fn from(value: usize) -> Self {
        MessageArg::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for MessageArg {
    fn from(value: f64) -> Self {
        MessageArg::Number(value)
    }
}

impl From<&str> for MessageArg {
    fn from(value: &str) -> Self {
        MessageArg::Text(value.to_string())
    }
}

impl From<String> for MessageArg {
    fn from(value: String) -> Self {
        MessageArg::Text(value)
    }
}

impl From<bool> for MessageArg {
    fn from(value: bool) -> Self {
        MessageArg::Bool(value)
    }
}

/// A named substitution variable: `{name}` in a template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageVar {
    pub name: String,
    pub value: MessageArg,
}

impl MessageVar {
    pub fn new(name: impl Into<String>, value: impl Into<MessageArg>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Built-in English texts, the constant tier of the catalog.
const ENGLISH: &[(&str, &str)] = &[
    ("FORM_VALIDATION_ERRORS_FOUND", "Please correct the errors below."),
    ("FORM_VALIDATION_FIELD_EMPTY", "This field is required."),
    (
        "FORM_VALIDATION_INVALID_EMAIL_ADDRESS",
        "Please enter a valid email address.",
    ),
    (
        "FORM_VALIDATION_INVALID_PATTERN",
        "Please match the requested format.",
    ),
    (
        "FORM_VALIDATION_INVALID_PATTERN_MIN_LENGTH",
        "Please enter at least {minLength} characters.",
    ),
    (
        "FORM_VALIDATION_INVALID_PATTERN_MAX_LENGTH",
        "Please enter no more than {maxLength} characters.",
    ),
    (
        "FORM_VALIDATION_INVALID_PATTERN_LENGTH",
        "Please enter between {minLength} and {maxLength} characters.",
    ),
    ("FORM_VALIDATION_INVALID_NUMBER", "Please enter a valid number."),
    (
        "FORM_VALIDATION_INVALID_NUMBER_MAX",
        "Please enter a number no greater than {maxValue}.",
    ),
    (
        "FORM_VALIDATION_INVALID_NUMBER_MIN",
        "Please enter a number no less than {minValue}.",
    ),
    ("FORM_SUBMIT_SUCCESS", "Thank you, the form has been sent."),
    (
        "FORM_SUBMIT_ERROR",
        "The form could not be sent. Please try again.",
    ),
];

/// Key to localized text lookup with literal fallback.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    dictionary: Option<HashMap<String, String>>,
    constants: HashMap<String, String>,
}

impl MessageCatalog {
    /// An empty catalog: every key is unresolved.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog whose constants are the built-in English texts.
    pub fn english() -> Self {
        let constants = ENGLISH
            .iter()
            .map(|(key, text)| (key.to_string(), text.to_string()))
            .collect();
        Self {
            dictionary: None,
            constants,
        }
    }

    /// Injects the language dictionary consulted before the constants.
    pub fn with_dictionary(mut self, dictionary: HashMap<String, String>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn with_constant(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.constants.insert(key.into(), text.into());
        self
    }

    /// Parses a language file: a flat TOML table of `KEY = "text"` entries.
    pub fn parse_dictionary(content: &str) -> Result<HashMap<String, String>> {
        toml::from_str(content).context("Failed to parse language file")
    }

    /// Whether `key` resolves, without logging a miss.
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Looks `key` up in the dictionary, then in the constants.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        let found = self.lookup(key);
        if found.is_none() {
            debug!("message key not found: {}", key);
        }
        found
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.dictionary
            .as_ref()
            .and_then(|dictionary| dictionary.get(key))
            .or_else(|| self.constants.get(key))
            .map(String::as_str)
    }

    /// Resolves `key` and fills in `{name}` placeholders.
    ///
    /// Each variable replaces only the first occurrence of its placeholder.
    /// When `key` does not resolve, the key text is returned unchanged.
    pub fn substitute(&self, key: &str, vars: &[MessageVar]) -> String {
        let Some(template) = self.resolve(key) else {
            return key.to_string();
        };

        vars.iter().fold(template.to_string(), |text, var| {
            text.replacen(&format!("{{{}}}", var.name), &var.value.to_string(), 1)
        })
    }
}
