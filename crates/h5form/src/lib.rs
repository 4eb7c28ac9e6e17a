//! # h5form
//!
//! Form enhancement engine driven by HTML5 declarative constraints.
//!
//! A host describes a form as a list of [`FormControl`]s. h5form detects the
//! constraints declared on each control (`required`, `pattern`,
//! `type=email`, `type=number`, or the `required`/`email` classes), validates
//! them before submission, resolves localizable messages through a
//! [`MessageCatalog`], and hands rendering and network submission to
//! host-provided [`Renderer`] and [`Transport`] implementations.
//!
//! Forms are bound through a shared [`H5Form`] context. Binding waits until
//! the supporting assets (form plugin, language file, stylesheet) have been
//! fetched once by the [`ReadinessMachine`], no matter how many forms ask.
//!
//! ## Example
//!
//! ```rust,ignore
//! let h5 = Arc::new(
//!     H5Form::new(loader, renderer)
//!         .with_catalog(MessageCatalog::english())
//!         .with_transport(transport),
//! );
//!
//! let pending = h5.initialize(&form, &json!({ "showMultipleErrors": true }), FormHooks::default())?;
//! let bound = pending.ready().await?;
//!
//! match bound.submit(&form).await {
//!     SubmitOutcome::Submitted(response) => { /* ... */ }
//!     SubmitOutcome::Blocked(report) => { /* errors already rendered */ }
//!     _ => {}
//! }
//! ```

pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod form;
pub mod loader;
pub mod messages;
pub mod orchestrator;
pub mod readiness;
pub mod render;
pub mod rules;
pub mod transport;

pub use config::{FormHooks, FormOptions, MessagePosition, OptionOverrides, Toggle};
pub use console::{Console, LogEntry, LogLevel, LogSink, TracingSink};
pub use engine::{BoundForm, H5Form, PendingForm, SubmitOutcome};
pub use error::{H5FormError, TransportError};
pub use form::{is_valid_node, ConstraintKind, FieldDescriptor, Form, FormControl, NodeKind};
pub use loader::AssetLoader;
pub use messages::{MessageArg, MessageCatalog, MessageVar};
pub use orchestrator::{ValidationOrchestrator, ValidationReport};
pub use readiness::{
    Initializer, LoadStatus, ReadinessMachine, ReadinessState, RequestAction, RequestOutcome,
    TransitionMode, RETRY_DELAY,
};
pub use render::{FormMessage, MessageKind, NullRenderer, RenderCall, RenderLog, Renderer};
pub use rules::{RuleEvaluator, ValidationFailure};
pub use transport::{Transport, TransportResponse};

/// Plugin name, used as the console prefix and in configuration errors.
pub const PLUGIN_NAME: &str = "H5Form";

/// Plugin version.
pub const VERSION: &str = "0.3.0";
