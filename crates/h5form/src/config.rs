// File: src/config.rs
// Purpose: Form options (defaults, caller overrides, h5form.toml) and callback hooks

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{H5FormError, TransportError};
use crate::form::Form;
use crate::transport::TransportResponse;

/// An `on`/`off` switch, spelled the way the option surface spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    On,
    #[default]
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        self == Toggle::On
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        if value {
            Toggle::On
        } else {
            Toggle::Off
        }
    }
}

/// Where form-level error and success messages are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagePosition {
    #[default]
    Above,
    Below,
    Off,
}

/// Options for one form, produced by merging caller overrides onto defaults.
///
/// Field names serialize in camelCase (`jsPath`, `showMultipleErrors`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOptions {
    /// Base path of script libraries
    pub js_path: String,
    /// Base path of stylesheets
    pub css_path: String,
    /// Base path of images (busy indicator)
    pub img_path: String,
    /// Base path of language files
    pub lang_path: String,
    /// Filename of the form submission plugin
    pub form_plugin: String,
    /// Filename of the message dictionary
    pub language: String,
    /// Filename of the form stylesheet
    pub css_style: String,
    /// Render every failure at once instead of only the first
    pub show_multiple_errors: bool,
    pub debug: Toggle,
    pub required_asterisk: Toggle,
    pub message_pos: MessagePosition,
    /// Read HTML5 attributes (`required`, `pattern`, `type`) as constraints
    pub html5_validation: Toggle,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            js_path: "/js/library/".to_string(),
            css_path: "/css/".to_string(),
            img_path: "/img/".to_string(),
            lang_path: "/js/language/".to_string(),
            form_plugin: "jquery-form-3.02.js".to_string(),
            language: "en.toml".to_string(),
            css_style: "pwnForms.css".to_string(),
            show_multiple_errors: false,
            debug: Toggle::Off,
            required_asterisk: Toggle::Off,
            message_pos: MessagePosition::Above,
            html5_validation: Toggle::On,
        }
    }
}

/// Caller-supplied overrides. Every field is optional; unknown keys are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionOverrides {
    pub js_path: Option<String>,
    pub css_path: Option<String>,
    pub img_path: Option<String>,
    pub lang_path: Option<String>,
    pub form_plugin: Option<String>,
    pub language: Option<String>,
    pub css_style: Option<String>,
    pub show_multiple_errors: Option<bool>,
    pub debug: Option<Toggle>,
    pub required_asterisk: Option<Toggle>,
    pub message_pos: Option<MessagePosition>,
    pub html5_validation: Option<Toggle>,
}

impl FormOptions {
    /// Returns a new options record with `overrides` applied. `self` is
    /// left untouched.
    pub fn merge(&self, overrides: &OptionOverrides) -> FormOptions {
        let pick = |value: &Option<String>, fallback: &String| {
            value.clone().unwrap_or_else(|| fallback.clone())
        };

        FormOptions {
            js_path: pick(&overrides.js_path, &self.js_path),
            css_path: pick(&overrides.css_path, &self.css_path),
            img_path: pick(&overrides.img_path, &self.img_path),
            lang_path: pick(&overrides.lang_path, &self.lang_path),
            form_plugin: pick(&overrides.form_plugin, &self.form_plugin),
            language: pick(&overrides.language, &self.language),
            css_style: pick(&overrides.css_style, &self.css_style),
            show_multiple_errors: overrides
                .show_multiple_errors
                .unwrap_or(self.show_multiple_errors),
            debug: overrides.debug.unwrap_or(self.debug),
            required_asterisk: overrides.required_asterisk.unwrap_or(self.required_asterisk),
            message_pos: overrides.message_pos.unwrap_or(self.message_pos),
            html5_validation: overrides.html5_validation.unwrap_or(self.html5_validation),
        }
    }

    /// Merges a loosely-typed options value onto the defaults.
    ///
    /// Anything that is not a JSON object (a string, a number, `null`) is
    /// treated as "no options". An object with a badly-typed known key is
    /// a configuration error.
    pub fn from_value(value: &serde_json::Value) -> Result<FormOptions, H5FormError> {
        if !value.is_object() {
            return Ok(FormOptions::default());
        }
        let overrides = OptionOverrides::deserialize(value)?;
        Ok(FormOptions::default().merge(&overrides))
    }

    /// Parses overrides from TOML text and merges them onto the defaults.
    pub fn from_toml_str(content: &str) -> Result<FormOptions> {
        if content.trim().is_empty() {
            return Ok(FormOptions::default());
        }
        let overrides: OptionOverrides =
            toml::from_str(content).context("Failed to parse form options")?;
        Ok(FormOptions::default().merge(&overrides))
    }

    /// Load options from a TOML file. A missing or empty file yields the
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<FormOptions> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(FormOptions::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load options file: {:?}", path))
    }

    /// Assets that must be fetched before a form can be bound, in load
    /// order: submission plugin, message dictionary, stylesheet.
    pub fn dependency_assets(&self) -> Vec<String> {
        vec![
            format!("{}{}", self.js_path, self.form_plugin),
            self.language_file(),
            format!("{}{}", self.css_path, self.css_style),
        ]
    }

    /// Full path of the message dictionary.
    pub fn language_file(&self) -> String {
        format!("{}{}", self.lang_path, self.language)
    }

    /// Path of the busy indicator image.
    pub fn busy_indicator(&self) -> String {
        format!("{}ajax-loader.gif", self.img_path)
    }
}

pub type SuccessHook = Arc<dyn Fn(&TransportResponse) + Send + Sync>;
pub type ErrorHook = Arc<dyn Fn(&TransportError) + Send + Sync>;
/// Runs after validation passes; returning `false` cancels the submission.
pub type BeforeSubmitHook = Arc<dyn Fn(&Form) -> bool + Send + Sync>;

/// User callbacks attached to a bound form.
#[derive(Clone, Default)]
pub struct FormHooks {
    pub success: Option<SuccessHook>,
    pub error: Option<ErrorHook>,
    pub before_submit: Option<BeforeSubmitHook>,
}

impl FormHooks {
    pub fn on_success(mut self, hook: impl Fn(&TransportResponse) + Send + Sync + 'static) -> Self {
        self.success = Some(Arc::new(hook));
        self
    }

    pub fn on_error(mut self, hook: impl Fn(&TransportError) + Send + Sync + 'static) -> Self {
        self.error = Some(Arc::new(hook));
        self
    }

    pub fn before_submit(mut self, hook: impl Fn(&Form) -> bool + Send + Sync + 'static) -> Self {
        self.before_submit = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for FormHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormHooks")
            .field("success", &self.success.is_some())
            .field("error", &self.error.is_some())
            .field("before_submit", &self.before_submit.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_default_options() {
        let options = FormOptions::default();
        assert_eq!(options.js_path, "/js/library/");
        assert_eq!(options.form_plugin, "jquery-form-3.02.js");
        assert!(!options.show_multiple_errors);
        assert_eq!(options.debug, Toggle::Off);
        assert_eq!(options.message_pos, MessagePosition::Above);
        assert!(options.html5_validation.is_on());
    }

    #[test]
    fn test_non_object_yields_defaults() {
        assert_eq!(FormOptions::from_value(&json!("123")).unwrap(), FormOptions::default());
        assert_eq!(FormOptions::from_value(&json!(null)).unwrap(), FormOptions::default());
        assert_eq!(FormOptions::from_value(&json!(42)).unwrap(), FormOptions::default());
    }

    #[test]
    fn test_override_debug() {
        let options = FormOptions::from_value(&json!({ "debug": "on" })).unwrap();
        assert_eq!(options.debug, Toggle::On);
        // Untouched keys keep their defaults
        assert_eq!(options.css_style, "pwnForms.css");
    }

    #[test]
    fn test_camel_case_keys_and_unknown_keys() {
        let options = FormOptions::from_value(&json!({
            "showMultipleErrors": true,
            "messagePos": "below",
            "html5Validation": "off",
            "somethingElse": 1
        }))
        .unwrap();
        assert!(options.show_multiple_errors);
        assert_eq!(options.message_pos, MessagePosition::Below);
        assert_eq!(options.html5_validation, Toggle::Off);
    }

    #[test]
    fn test_badly_typed_option_is_an_error() {
        let result = FormOptions::from_value(&json!({ "debug": "loud" }));
        assert!(matches!(result, Err(H5FormError::InvalidOptions(_))));
    }

    #[test]
    fn test_merge_does_not_touch_base() {
        let base = FormOptions::default();
        let overrides = OptionOverrides {
            language: Some("de.toml".to_string()),
            ..Default::default()
        };
        let merged = base.merge(&overrides);
        assert_eq!(merged.language, "de.toml");
        assert_eq!(base.language, "en.toml");
    }

    #[test]
    fn test_toml_options() {
        let options = FormOptions::from_toml_str(
            r#"
            langPath = "/lang/"
            language = "fr.toml"
            requiredAsterisk = "on"
        "#,
        )
        .unwrap();
        assert_eq!(options.lang_path, "/lang/");
        assert!(options.required_asterisk.is_on());
        assert_eq!(FormOptions::from_toml_str("").unwrap(), FormOptions::default());
        assert!(FormOptions::from_toml_str("debug = 3").is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let options = FormOptions::load("does/not/exist/h5form.toml").unwrap();
        assert_eq!(options, FormOptions::default());
    }

    #[test]
    fn test_dependency_assets() {
        let options = FormOptions::default();
        assert_eq!(
            options.dependency_assets(),
            vec![
                "/js/library/jquery-form-3.02.js".to_string(),
                "/js/language/en.toml".to_string(),
                "/css/pwnForms.css".to_string(),
            ]
        );
        assert_eq!(options.busy_indicator(), "/img/ajax-loader.gif");
        assert_eq!(options.language_file(), "/js/language/en.toml");
    }

    #[test]
    fn test_hooks_debug() {
        let hooks = FormHooks::default().before_submit(|_| true);
        let text = format!("{:?}", hooks);
        assert!(text.contains("before_submit: true"));
        assert!(text.contains("success: false"));
    }
}
