// File: src/form.rs
// Purpose: Host form model, constraint kinds and field descriptors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Element kind of a form control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Input,
    Textarea,
    Select,
    Button,
    Other,
}

impl NodeKind {
    pub fn parse(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "input" => NodeKind::Input,
            "textarea" => NodeKind::Textarea,
            "select" => NodeKind::Select,
            "button" => NodeKind::Button,
            _ => NodeKind::Other,
        }
    }

    /// Only inputs, textareas and selects take part in validation.
    pub fn is_validatable(self) -> bool {
        matches!(self, NodeKind::Input | NodeKind::Textarea | NodeKind::Select)
    }
}

/// Whether an element with tag name `tag` takes part in validation.
pub fn is_valid_node(tag: &str) -> bool {
    NodeKind::parse(tag).is_validatable()
}

/// Snapshot of one control of the host document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormControl {
    pub node: NodeKind,
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Raw attributes, including `type`, `required`, `pattern`, `min`, `max`
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

fn default_visible() -> bool {
    true
}

impl FormControl {
    pub fn new(node: NodeKind, name: impl Into<String>) -> Self {
        Self {
            node,
            name: name.into(),
            id: None,
            value: String::new(),
            checked: false,
            visible: true,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// An `<input>` with the given `type` attribute.
    pub fn input(name: impl Into<String>, input_type: &str) -> Self {
        Self::new(NodeKind::Input, name).with_attr("type", input_type)
    }

    pub fn textarea(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Textarea, name)
    }

    pub fn select(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Select, name)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Lowercased `type` attribute of an input, `"text"` when absent.
    pub fn input_type(&self) -> String {
        self.attr("type")
            .map(|t| t.to_ascii_lowercase())
            .unwrap_or_else(|| "text".to_string())
    }

    pub fn is_checkbox(&self) -> bool {
        self.node == NodeKind::Input && self.input_type() == "checkbox"
    }

    /// Rendered and not an `<input type="hidden">`.
    pub fn is_visible(&self) -> bool {
        self.visible && !(self.node == NodeKind::Input && self.input_type() == "hidden")
    }

    /// Identity used to group consecutive failures: the id, else the name.
    pub fn identifier(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}

/// A form: its id and its controls in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    #[serde(default)]
    pub controls: Vec<FormControl>,
}

impl Form {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            controls: Vec::new(),
        }
    }

    pub fn with_control(mut self, control: FormControl) -> Self {
        self.controls.push(control);
        self
    }

    pub fn control(&self, name: &str) -> Option<&FormControl> {
        self.controls.iter().find(|c| c.name == name)
    }

    /// Name/value pairs a submission would send: named, validatable
    /// controls, skipping unchecked checkboxes and radios.
    pub fn successful_values(&self) -> Vec<(String, String)> {
        self.controls
            .iter()
            .filter(|c| c.node.is_validatable() && !c.name.is_empty())
            .filter(|c| {
                let kind = c.input_type();
                c.checked || !(c.node == NodeKind::Input && (kind == "checkbox" || kind == "radio"))
            })
            .map(|c| (c.name.clone(), c.value.clone()))
            .collect()
    }
}

/// Category of check a descriptor runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintKind {
    Empty,
    InvalidEmailAddress,
    InvalidPattern,
    InvalidNumber,
}

impl ConstraintKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintKind::Empty => "EMPTY",
            ConstraintKind::InvalidEmailAddress => "INVALID_EMAIL_ADDRESS",
            ConstraintKind::InvalidPattern => "INVALID_PATTERN",
            ConstraintKind::InvalidNumber => "INVALID_NUMBER",
        }
    }

    /// Kind-level fallback key for a message suffix of this kind.
    ///
    /// `EMPTY` uses `FORM_VALIDATION_FIELD_<suffix>`; every other kind uses
    /// `FORM_VALIDATION_<suffix>`.
    pub fn generic_key(self, suffix: &str) -> String {
        match self {
            ConstraintKind::Empty => format!("FORM_VALIDATION_FIELD_{}", suffix),
            _ => format!("FORM_VALIDATION_{}", suffix),
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (control, constraint kind) pair queued for evaluation. The control
/// is borrowed from the host's form.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor<'a> {
    pub control: &'a FormControl,
    pub kind: ConstraintKind,
}

impl<'a> FieldDescriptor<'a> {
    pub fn new(control: &'a FormControl, kind: ConstraintKind) -> Self {
        Self { control, kind }
    }

    /// Field-specific key for a message suffix:
    /// `FORM_VALIDATION_<FIELD_NAME_UPPER>_<suffix>`.
    pub fn field_key(&self, suffix: &str) -> String {
        format!(
            "FORM_VALIDATION_{}_{}",
            self.control.name.to_uppercase(),
            suffix
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_node() {
        assert!(is_valid_node("input"));
        assert!(is_valid_node("textarea"));
        assert!(is_valid_node("select"));
        assert!(is_valid_node("SELECT"));
        assert!(!is_valid_node("button"));
        assert!(!is_valid_node("fieldset"));
        assert!(!is_valid_node(""));
    }

    #[test]
    fn test_visibility() {
        assert!(FormControl::input("a", "text").is_visible());
        assert!(!FormControl::input("a", "text").hidden().is_visible());
        assert!(!FormControl::input("token", "hidden").is_visible());
        assert!(FormControl::textarea("notes").is_visible());
    }

    #[test]
    fn test_input_type_defaults_to_text() {
        let control = FormControl::new(NodeKind::Input, "q");
        assert_eq!(control.input_type(), "text");
        assert_eq!(FormControl::input("e", "EMAIL").input_type(), "email");
        assert!(FormControl::input("agree", "checkbox").is_checkbox());
    }

    #[test]
    fn test_identifier_prefers_id() {
        assert_eq!(FormControl::input("email", "email").identifier(), "email");
        assert_eq!(
            FormControl::input("email", "email").with_id("signup-email").identifier(),
            "signup-email"
        );
    }

    #[test]
    fn test_keys() {
        let control = FormControl::input("email", "email");
        let descriptor = FieldDescriptor::new(&control, ConstraintKind::Empty);
        assert_eq!(descriptor.field_key("EMPTY"), "FORM_VALIDATION_EMAIL_EMPTY");
        assert_eq!(
            ConstraintKind::Empty.generic_key("EMPTY"),
            "FORM_VALIDATION_FIELD_EMPTY"
        );
        assert_eq!(
            ConstraintKind::InvalidNumber.generic_key("INVALID_NUMBER_MAX"),
            "FORM_VALIDATION_INVALID_NUMBER_MAX"
        );
    }

    #[test]
    fn test_successful_values() {
        let form = Form::new("f")
            .with_control(FormControl::input("name", "text").with_value("Ada"))
            .with_control(FormControl::input("agree", "checkbox").with_value("yes"))
            .with_control(FormControl::input("news", "checkbox").with_value("1").with_checked(true))
            .with_control(FormControl::new(NodeKind::Button, "go").with_value("Send"));

        assert_eq!(
            form.successful_values(),
            vec![
                ("name".to_string(), "Ada".to_string()),
                ("news".to_string(), "1".to_string()),
            ]
        );
    }
}
