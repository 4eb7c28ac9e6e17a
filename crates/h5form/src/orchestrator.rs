// File: src/orchestrator.rs
// Purpose: Pre-submit validation of a whole form: discovery, evaluation, rendering

use std::fmt;
use std::sync::Arc;

use crate::config::{FormOptions, MessagePosition};
use crate::form::{ConstraintKind, FieldDescriptor, Form, FormControl};
use crate::messages::MessageCatalog;
use crate::render::{FormMessage, Renderer};
use crate::rules::{RuleEvaluator, ValidationFailure};

/// Key of the form-level message shown when any field fails.
pub const ERRORS_FOUND_KEY: &str = "FORM_VALIDATION_ERRORS_FOUND";

/// Why a submission was held back.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// Every failure, in discovery order
    pub failures: Vec<ValidationFailure>,
    /// How many of them were rendered
    pub rendered: usize,
}

impl ValidationReport {
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn first(&self) -> Option<&ValidationFailure> {
        self.failures.first()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field(s) failed validation", self.failures.len())
    }
}

/// Constraint kinds declared on a control, in evaluation order.
///
/// The `required` and `email` classes always count. HTML5 attributes
/// (`required`, `pattern`, `type=email`, `type=number`) count only when
/// `html5` is set. A kind is listed at most once.
pub fn detect_kinds(control: &FormControl, html5: bool) -> Vec<ConstraintKind> {
    let input_type = control.input_type();
    let mut kinds = Vec::new();

    if control.has_class("required") || (html5 && control.has_attr("required")) {
        kinds.push(ConstraintKind::Empty);
    }
    if control.has_class("email") || (html5 && input_type == "email") {
        kinds.push(ConstraintKind::InvalidEmailAddress);
    }
    if html5 && control.has_attr("pattern") {
        kinds.push(ConstraintKind::InvalidPattern);
    }
    if html5 && input_type == "number" {
        kinds.push(ConstraintKind::InvalidNumber);
    }
    kinds
}

/// Names of the validatable controls that carry a required marker.
pub fn required_fields(form: &Form, html5: bool) -> Vec<String> {
    form.controls
        .iter()
        .filter(|c| c.node.is_validatable())
        .filter(|c| detect_kinds(c, html5).contains(&ConstraintKind::Empty))
        .map(|c| c.name.clone())
        .collect()
}

/// Runs every rule of a form before it is submitted.
pub struct ValidationOrchestrator {
    options: FormOptions,
    catalog: Arc<MessageCatalog>,
    renderer: Arc<dyn Renderer>,
}

impl ValidationOrchestrator {
    pub fn new(
        options: FormOptions,
        catalog: Arc<MessageCatalog>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            options,
            catalog,
            renderer,
        }
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Descriptors for every validatable control, in document order. A
    /// control yields one descriptor per declared kind.
    pub fn discover<'a>(&self, form: &'a Form) -> Vec<FieldDescriptor<'a>> {
        let html5 = self.options.html5_validation.is_on();

        form.controls
            .iter()
            .filter(|control| control.node.is_validatable())
            .flat_map(|control| {
                detect_kinds(control, html5)
                    .into_iter()
                    .map(move |kind| FieldDescriptor::new(control, kind))
            })
            .collect()
    }

    /// Evaluates every descriptor without rendering anything.
    pub fn validate(&self, form: &Form) -> Vec<ValidationFailure> {
        let evaluator = RuleEvaluator::new(&self.catalog);
        self.discover(form)
            .iter()
            .filter_map(|descriptor| evaluator.evaluate(descriptor))
            .collect()
    }

    /// Validates `form` ahead of submission.
    ///
    /// `Ok(())` lets the submission proceed with the busy state on. On
    /// failure the busy state is cleared, the errors-found message and the
    /// field errors are rendered, and the report is returned. With
    /// `showMultipleErrors` off only the first failure is rendered, but the
    /// report still lists all of them.
    pub fn run_before_submit(&self, form: &Form) -> Result<(), ValidationReport> {
        self.renderer.clear_messages(&form.id);
        self.renderer.set_busy(&form.id, true);

        let failures = self.validate(form);
        if failures.is_empty() {
            return Ok(());
        }

        self.renderer.set_busy(&form.id, false);

        if self.options.message_pos != MessagePosition::Off {
            let text = self.catalog.substitute(ERRORS_FOUND_KEY, &[]);
            self.renderer
                .show_message(&form.id, &FormMessage::error(text, self.options.message_pos));
        }

        let rendered = if self.options.show_multiple_errors {
            failures.len()
        } else {
            1
        };

        let mut previous: Option<&str> = None;
        for failure in failures.iter().take(rendered) {
            let append = previous == Some(failure.field_id.as_str());
            self.renderer
                .show_field_error(&form.id, &failure.field_name, &failure.message, append);
            previous = Some(failure.field_id.as_str());
        }

        Err(ValidationReport { failures, rendered })
    }
}
