//! Rendering seam
//!
//! h5form never touches markup itself. Message boxes, per-field error
//! containers, the busy indicator and required-field markers are requested
//! from a host [`Renderer`].

use std::sync::{Mutex, PoisonError};

use crate::config::MessagePosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// A form-level message box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMessage {
    pub kind: MessageKind,
    pub text: String,
    pub position: MessagePosition,
}

impl FormMessage {
    pub fn error(text: impl Into<String>, position: MessagePosition) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
            position,
        }
    }

    pub fn success(text: impl Into<String>, position: MessagePosition) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
            position,
        }
    }
}

/// Host-side markup operations.
pub trait Renderer: Send + Sync {
    /// Marks the form as enhanced (the `h5form` class).
    fn decorate_form(&self, form_id: &str);

    /// Adds the required marker next to a field's label.
    fn mark_required(&self, form_id: &str, field: &str);

    /// Removes the form message and every field error container.
    fn clear_messages(&self, form_id: &str);

    /// Shows or hides the busy indicator and disables or re-enables the
    /// submit control.
    fn set_busy(&self, form_id: &str, busy: bool);

    fn show_message(&self, form_id: &str, message: &FormMessage);

    /// Shows a field error. With `append`, the message joins the container
    /// already shown for the same field.
    fn show_field_error(&self, form_id: &str, field: &str, message: &str, append: bool);
}

/// Renderer for headless use: every call is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn decorate_form(&self, _form_id: &str) {}
    fn mark_required(&self, _form_id: &str, _field: &str) {}
    fn clear_messages(&self, _form_id: &str) {}
    fn set_busy(&self, _form_id: &str, _busy: bool) {}
    fn show_message(&self, _form_id: &str, _message: &FormMessage) {}
    fn show_field_error(&self, _form_id: &str, _field: &str, _message: &str, _append: bool) {}
}

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    Decorate { form: String },
    MarkRequired { form: String, field: String },
    Clear { form: String },
    Busy { form: String, busy: bool },
    Message { form: String, message: FormMessage },
    FieldError { form: String, field: String, message: String, append: bool },
}

/// Renderer that records calls in order, for hosts that build markup
/// afterwards (server-side rendering, snapshots).
#[derive(Debug, Default)]
pub struct RenderLog {
    calls: Mutex<Vec<RenderCall>>,
}

impl RenderLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Field error containers created, not counting appended messages.
    pub fn error_boxes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, RenderCall::FieldError { append: false, .. }))
            .count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn push(&self, call: RenderCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl Renderer for RenderLog {
    fn decorate_form(&self, form_id: &str) {
        self.push(RenderCall::Decorate {
            form: form_id.to_string(),
        });
    }

    fn mark_required(&self, form_id: &str, field: &str) {
        self.push(RenderCall::MarkRequired {
            form: form_id.to_string(),
            field: field.to_string(),
        });
    }

    fn clear_messages(&self, form_id: &str) {
        self.push(RenderCall::Clear {
            form: form_id.to_string(),
        });
    }

    fn set_busy(&self, form_id: &str, busy: bool) {
        self.push(RenderCall::Busy {
            form: form_id.to_string(),
            busy,
        });
    }

    fn show_message(&self, form_id: &str, message: &FormMessage) {
        self.push(RenderCall::Message {
            form: form_id.to_string(),
            message: message.clone(),
        });
    }

    fn show_field_error(&self, form_id: &str, field: &str, message: &str, append: bool) {
        self.push(RenderCall::FieldError {
            form: form_id.to_string(),
            field: field.to_string(),
            message: message.to_string(),
            append,
        });
    }
}
