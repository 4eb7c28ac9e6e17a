// File: src/engine.rs
// Purpose: Shared h5form context, form binding and the submission flow

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::config::{FormHooks, FormOptions, MessagePosition};
use crate::console::{Console, LogLevel};
use crate::error::{H5FormError, TransportError};
use crate::form::Form;
use crate::loader::AssetLoader;
use crate::messages::MessageCatalog;
use crate::orchestrator::{required_fields, ValidationOrchestrator, ValidationReport};
use crate::readiness::{
    Initializer, ReadinessMachine, ReadinessState, RequestOutcome, TransitionMode,
};
use crate::render::{FormMessage, MessageKind, Renderer};
use crate::transport::{Transport, TransportResponse};

/// Key of the message shown after a successful submission.
pub const SUBMIT_SUCCESS_KEY: &str = "FORM_SUBMIT_SUCCESS";
/// Key of the message shown when the transport reports a failure.
pub const SUBMIT_ERROR_KEY: &str = "FORM_SUBMIT_ERROR";

type BindResult = Result<Arc<BoundForm>, H5FormError>;

/// Context shared by every form on a page: dependency readiness, the debug
/// flag and console, the message catalog and the host collaborators.
pub struct H5Form {
    readiness: Arc<ReadinessMachine>,
    console: Arc<Console>,
    catalog: Arc<MessageCatalog>,
    renderer: Arc<dyn Renderer>,
    transport: RwLock<Option<Arc<dyn Transport>>>,
}

impl H5Form {
    pub fn new(loader: Arc<dyn AssetLoader>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            readiness: Arc::new(ReadinessMachine::new(loader)),
            console: Arc::new(Console::default()),
            catalog: Arc::new(MessageCatalog::english()),
            renderer,
            transport: RwLock::new(None),
        }
    }

    pub fn with_catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    pub fn with_console(mut self, console: Console) -> Self {
        self.console = Arc::new(console);
        self
    }

    pub fn with_transport(self, transport: Arc<dyn Transport>) -> Self {
        self.set_transport(transport);
        self
    }

    pub fn with_transition_mode(mut self, mode: TransitionMode) -> Self {
        let loader = self.readiness.loader();
        self.readiness = Arc::new(ReadinessMachine::with_mode(loader, mode));
        self
    }

    /// Installs the submission transport, once the form plugin is loaded.
    pub fn set_transport(&self, transport: Arc<dyn Transport>) {
        *self
            .transport
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(transport);
    }

    pub fn transport(&self) -> Option<Arc<dyn Transport>> {
        self.transport
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    pub fn readiness(&self) -> ReadinessState {
        self.readiness.state()
    }

    /// Starts binding `form` with `overrides` merged onto the default options.
    ///
    /// Returns at once. When the dependencies are already loaded the form is
    /// bound before returning; a missing transport is then reported here.
    /// Otherwise binding completes later and is awaited through
    /// [`PendingForm::ready`]. Must be called within a tokio runtime.
    pub fn initialize(
        self: &Arc<Self>,
        form: &Form,
        overrides: &serde_json::Value,
        hooks: FormHooks,
    ) -> Result<PendingForm, H5FormError> {
        let options = FormOptions::from_value(overrides)?;
        self.console.set_debug(options.debug.is_on());
        self.console.debug(format!("initializing form '{}'", form.id));

        let required = if options.required_asterisk.is_on() {
            required_fields(form, options.html5_validation.is_on())
        } else {
            Vec::new()
        };
        let assets = options.dependency_assets();

        let (tx, mut rx) = oneshot::channel::<BindResult>();
        let slot = Mutex::new(Some(tx));
        let this = Arc::clone(self);
        let form_id = form.id.clone();

        let initializer: Initializer = Arc::new(move || {
            let result = this.bind(&form_id, &options, &hooks, &required);
            if let Err(err) = &result {
                this.console.log(err.to_string(), LogLevel::Error);
            }
            let sender = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
            if let Some(sender) = sender {
                let _ = sender.send(result);
            }
        });

        let outcome = self.readiness.request(assets, initializer);
        debug!(form = %form.id, ?outcome, "form initialization requested");

        let state = if outcome.initialized {
            match rx.try_recv() {
                Ok(result) => PendingState::Ready(result?),
                Err(_) => {
                    return Err(H5FormError::InitializationDropped {
                        form: form.id.clone(),
                    })
                }
            }
        } else {
            PendingState::Waiting(rx)
        };

        Ok(PendingForm {
            form_id: form.id.clone(),
            outcome,
            state,
        })
    }

    fn bind(
        &self,
        form_id: &str,
        options: &FormOptions,
        hooks: &FormHooks,
        required: &[String],
    ) -> BindResult {
        let transport = self.transport().ok_or_else(|| H5FormError::TransportMissing {
            form: form_id.to_string(),
            plugin: options.form_plugin.clone(),
        })?;

        let catalog = self.form_catalog(options);

        self.renderer.decorate_form(form_id);
        for field in required {
            self.renderer.mark_required(form_id, field);
        }
        self.console.debug(format!("form '{}' initialized", form_id));

        Ok(Arc::new(BoundForm {
            form_id: form_id.to_string(),
            orchestrator: ValidationOrchestrator::new(
                options.clone(),
                Arc::clone(&catalog),
                Arc::clone(&self.renderer),
            ),
            hooks: hooks.clone(),
            transport,
            renderer: Arc::clone(&self.renderer),
            catalog,
            console: Arc::clone(&self.console),
        }))
    }

    /// The context catalog, with the form's language file as its dictionary
    /// when the loader has it.
    fn form_catalog(&self, options: &FormOptions) -> Arc<MessageCatalog> {
        let path = options.language_file();
        let Some(text) = self.readiness.loader().dictionary(&path) else {
            return Arc::clone(&self.catalog);
        };

        match MessageCatalog::parse_dictionary(&text) {
            Ok(dictionary) => {
                debug!(%path, entries = dictionary.len(), "language file applied");
                Arc::new(self.catalog.as_ref().clone().with_dictionary(dictionary))
            }
            Err(err) => {
                self.console.log(
                    format!("ignoring language file {}: {:#}", path, err),
                    LogLevel::Warn,
                );
                Arc::clone(&self.catalog)
            }
        }
    }
}

enum PendingState {
    Ready(Arc<BoundForm>),
    Waiting(oneshot::Receiver<BindResult>),
}

/// A form whose binding may still be waiting for its dependencies.
pub struct PendingForm {
    form_id: String,
    outcome: RequestOutcome,
    state: PendingState,
}

impl PendingForm {
    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    /// What the first initialization request did.
    pub fn outcome(&self) -> RequestOutcome {
        self.outcome
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, PendingState::Ready(_))
    }

    /// Waits until the form is bound.
    ///
    /// Fails with the binding error, or with
    /// [`H5FormError::InitializationDropped`] when no request will ever bind
    /// this form.
    pub async fn ready(self) -> BindResult {
        match self.state {
            PendingState::Ready(bound) => Ok(bound),
            PendingState::Waiting(rx) => rx.await.unwrap_or(Err(H5FormError::InitializationDropped {
                form: self.form_id,
            })),
        }
    }
}

impl fmt::Debug for PendingForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingForm")
            .field("form_id", &self.form_id)
            .field("outcome", &self.outcome)
            .field("ready", &self.is_ready())
            .finish()
    }
}

/// How a submission attempt ended.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Validation failed; errors were rendered and nothing was sent
    Blocked(ValidationReport),
    /// The `beforeSubmit` hook vetoed the submission
    Cancelled,
    Submitted(TransportResponse),
    Failed(TransportError),
}

/// A form wired to validation and its transport.
pub struct BoundForm {
    form_id: String,
    orchestrator: ValidationOrchestrator,
    hooks: FormHooks,
    transport: Arc<dyn Transport>,
    renderer: Arc<dyn Renderer>,
    catalog: Arc<MessageCatalog>,
    console: Arc<Console>,
}

impl BoundForm {
    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn options(&self) -> &FormOptions {
        self.orchestrator.options()
    }

    pub fn orchestrator(&self) -> &ValidationOrchestrator {
        &self.orchestrator
    }

    /// Validates `form` and, if it passes, sends it.
    ///
    /// The transport is only reached after validation has finished. Exactly
    /// one of the success and error hooks runs for a sent form.
    pub async fn submit(&self, form: &Form) -> SubmitOutcome {
        if let Err(report) = self.orchestrator.run_before_submit(form) {
            self.console
                .debug(format!("form '{}' held back: {}", form.id, report));
            return SubmitOutcome::Blocked(report);
        }

        if let Some(before_submit) = &self.hooks.before_submit {
            if !before_submit(form) {
                self.renderer.set_busy(&form.id, false);
                return SubmitOutcome::Cancelled;
            }
        }

        let result = self.transport.submit(form).await;
        self.renderer.set_busy(&form.id, false);

        match result {
            Ok(response) => {
                self.show_message(&form.id, MessageKind::Success, SUBMIT_SUCCESS_KEY);
                if let Some(success) = &self.hooks.success {
                    success(&response);
                }
                SubmitOutcome::Submitted(response)
            }
            Err(err) => {
                warn!(form = %form.id, "{}", err);
                self.show_message(&form.id, MessageKind::Error, SUBMIT_ERROR_KEY);
                if let Some(error) = &self.hooks.error {
                    error(&err);
                }
                SubmitOutcome::Failed(err)
            }
        }
    }

    fn show_message(&self, form_id: &str, kind: MessageKind, key: &str) {
        let position = self.options().message_pos;
        if position == MessagePosition::Off {
            return;
        }
        let message = FormMessage {
            kind,
            text: self.catalog.substitute(key, &[]),
            position,
        };
        self.renderer.show_message(form_id, &message);
    }
}

impl fmt::Debug for BoundForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundForm")
            .field("form_id", &self.form_id)
            .field("options", self.options())
            .field("hooks", &self.hooks)
            .finish()
    }
}
