// File: src/rules.rs
// Purpose: Evaluate one field descriptor into an optional validation failure

use h5form_validation::{
    extract_length_bounds, is_valid_email, matches_pattern, parse_int, BoundViolation,
    LengthBounds, NumberBounds,
};
use serde::Serialize;
use tracing::debug;

use crate::form::{ConstraintKind, FieldDescriptor};
use crate::messages::{MessageArg, MessageCatalog, MessageVar};

/// A failed check on one field, with its message already resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub field_name: String,
    /// Control identity (id, else name), used to group consecutive failures
    pub field_id: String,
    pub kind: ConstraintKind,
    /// The key the message was resolved from, or the literal fallback key
    pub key: String,
    pub message: String,
    pub vars: Vec<MessageVar>,
}

impl ValidationFailure {
    pub fn var(&self, name: &str) -> Option<&MessageArg> {
        self.vars.iter().find(|v| v.name == name).map(|v| &v.value)
    }
}

/// Message variant of a failed `pattern` check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternVariant {
    MinLength,
    MaxLength,
    Length,
    Mismatch,
}

impl PatternVariant {
    fn suffix(self) -> &'static str {
        match self {
            PatternVariant::MinLength => "INVALID_PATTERN_MIN_LENGTH",
            PatternVariant::MaxLength => "INVALID_PATTERN_MAX_LENGTH",
            PatternVariant::Length => "INVALID_PATTERN_LENGTH",
            PatternVariant::Mismatch => "INVALID_PATTERN",
        }
    }

    fn choose(length: usize, bounds: Option<LengthBounds>) -> Self {
        let Some(bounds) = bounds else {
            return PatternVariant::Mismatch;
        };
        if bounds.min.is_some_and(|min| length < min) {
            return PatternVariant::MinLength;
        }
        if bounds.max.is_some_and(|max| length > max) {
            return PatternVariant::MaxLength;
        }
        // Unreachable for a single length, so INVALID_PATTERN_LENGTH is
        // never produced.
        if let (Some(min), Some(max)) = (bounds.min, bounds.max) {
            if length < min && length > max {
                return PatternVariant::Length;
            }
        }
        PatternVariant::Mismatch
    }
}

/// Decides whether one descriptor holds, and builds the failure if not.
pub struct RuleEvaluator<'c> {
    catalog: &'c MessageCatalog,
}

impl<'c> RuleEvaluator<'c> {
    pub fn new(catalog: &'c MessageCatalog) -> Self {
        Self { catalog }
    }

    /// Evaluates `descriptor`. Hidden controls always pass.
    pub fn evaluate(&self, descriptor: &FieldDescriptor<'_>) -> Option<ValidationFailure> {
        if !descriptor.control.is_visible() {
            return None;
        }

        match descriptor.kind {
            ConstraintKind::Empty => self.check_empty(descriptor),
            ConstraintKind::InvalidEmailAddress => self.check_email(descriptor),
            ConstraintKind::InvalidPattern => self.check_pattern(descriptor),
            ConstraintKind::InvalidNumber => self.check_number(descriptor),
        }
    }

    fn check_empty(&self, descriptor: &FieldDescriptor<'_>) -> Option<ValidationFailure> {
        let control = descriptor.control;
        let missing = if control.is_checkbox() {
            !control.checked
        } else {
            control.value.trim().is_empty()
        };

        missing.then(|| self.failure(descriptor, "EMPTY", Vec::new()))
    }

    fn check_email(&self, descriptor: &FieldDescriptor<'_>) -> Option<ValidationFailure> {
        let value = &descriptor.control.value;
        if value.is_empty() || is_valid_email(value) {
            return None;
        }
        Some(self.failure(descriptor, "INVALID_EMAIL_ADDRESS", Vec::new()))
    }

    fn check_pattern(&self, descriptor: &FieldDescriptor<'_>) -> Option<ValidationFailure> {
        let value = &descriptor.control.value;
        if value.is_empty() {
            return None;
        }
        let pattern = descriptor.control.attr("pattern")?;

        match matches_pattern(value, pattern) {
            Some(true) => None,
            None => {
                debug!(
                    "ignoring malformed pattern {:?} on field {}",
                    pattern, descriptor.control.name
                );
                None
            }
            Some(false) => {
                let bounds = extract_length_bounds(pattern).filter(|b| !b.is_empty());
                // Length in Unicode scalar values, not UTF-16 units.
                let variant = PatternVariant::choose(value.chars().count(), bounds);

                let vars = match (variant, bounds) {
                    (PatternVariant::Mismatch, _) | (_, None) => Vec::new(),
                    (_, Some(bounds)) => vec![
                        MessageVar::new("minLength", length_arg(bounds.min)),
                        MessageVar::new("maxLength", length_arg(bounds.max)),
                    ],
                };
                Some(self.failure(descriptor, variant.suffix(), vars))
            }
        }
    }

    fn check_number(&self, descriptor: &FieldDescriptor<'_>) -> Option<ValidationFailure> {
        let control = descriptor.control;
        if control.value.is_empty() {
            return None;
        }

        let Some(number) = parse_int(&control.value) else {
            return Some(self.failure(descriptor, "INVALID_NUMBER", Vec::new()));
        };

        let bounds = NumberBounds::from_attrs(control.attr("min"), control.attr("max"));
        let suffix = match bounds.check(number)? {
            BoundViolation::AboveMax => "INVALID_NUMBER_MAX",
            BoundViolation::BelowMin => "INVALID_NUMBER_MIN",
        };
        let vars = vec![
            MessageVar::new("minValue", bound_arg(bounds.min)),
            MessageVar::new("maxValue", bound_arg(bounds.max)),
        ];
        Some(self.failure(descriptor, suffix, vars))
    }

    /// Resolves the message: field key, then kind-level key, then the
    /// kind-level key text itself.
    fn failure(
        &self,
        descriptor: &FieldDescriptor<'_>,
        suffix: &str,
        vars: Vec<MessageVar>,
    ) -> ValidationFailure {
        let field_key = descriptor.field_key(suffix);
        let key = if self.catalog.contains(&field_key) {
            field_key
        } else {
            descriptor.kind.generic_key(suffix)
        };
        let message = self.catalog.substitute(&key, &vars);

        ValidationFailure {
            field_name: descriptor.control.name.clone(),
            field_id: descriptor.control.identifier().to_string(),
            kind: descriptor.kind,
            key,
            message,
            vars,
        }
    }
}

fn length_arg(bound: Option<usize>) -> MessageArg {
    bound.map(MessageArg::from).unwrap_or_else(MessageArg::nan)
}

fn bound_arg(bound: Option<i64>) -> MessageArg {
    bound.map(MessageArg::from).unwrap_or_else(MessageArg::nan)
}
