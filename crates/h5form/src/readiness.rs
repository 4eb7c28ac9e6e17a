//! Dependency readiness
//!
//! Every form bound through the same [`H5Form`](crate::H5Form) shares one
//! [`ReadinessMachine`]. It makes sure the form plugin, language file and
//! stylesheet are fetched once, and runs each form's initializer when they
//! are in place.
//!
//! ## States
//!
//! `status` is `Idle` or `Loading`; `loaded` records whether the assets
//! arrived. Each initialization request:
//!
//! - `Loading`: retries the whole request after [`RETRY_DELAY`].
//! - `Idle`, script loader missing: goes `Loading`, fetches the loader then
//!   the assets, sets `loaded` and runs the initializer.
//! - `Idle`, loader present, not `loaded`: fetches the assets.
//! - In every case, if `loaded` and `Idle` right after the decision, the
//!   initializer runs immediately.
//!
//! How the two fetch completions update the state depends on the
//! [`TransitionMode`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::loader::AssetLoader;

/// Delay before a deferred initialization request runs again.
pub const RETRY_DELAY: Duration = Duration::from_millis(200);

/// Per-form initializer, run once the assets are in place.
pub type Initializer = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadinessState {
    pub status: LoadStatus,
    pub loaded: bool,
}

impl ReadinessState {
    /// Forms can be bound right now.
    pub fn is_ready(&self) -> bool {
        self.loaded && self.status == LoadStatus::Idle
    }
}

/// How fetch completions update the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionMode {
    /// Both fetch paths mark `Loading` while they run, and on completion set
    /// `loaded`, return to `Idle` and run the initializer. Assets are
    /// fetched at most once and every requesting form is bound.
    #[default]
    Symmetric,
    /// The legacy transitions: the loader-and-assets path sets `loaded` and
    /// runs the initializer but stays `Loading`; the assets-only path stays
    /// `Idle` while fetching and on completion only resets to `Idle`.
    Verbatim,
}

/// What a request decided to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    /// Fetch the script loader, then the assets
    FetchLoaderAndAssets,
    /// Fetch the assets with the loader already present
    FetchAssets,
    /// A fetch is in progress: retry after [`RETRY_DELAY`]
    Defer,
    /// Nothing to fetch
    Proceed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    pub action: RequestAction,
    /// The initializer ran during this request
    pub initialized: bool,
}

/// Shared readiness state and the fetches that drive it.
///
/// Fetch continuations and retries are spawned on the current tokio
/// runtime, so [`request`](Self::request) must be called from within one.
pub struct ReadinessMachine {
    state: Mutex<ReadinessState>,
    loader: Arc<dyn AssetLoader>,
    mode: TransitionMode,
}

impl ReadinessMachine {
    pub fn new(loader: Arc<dyn AssetLoader>) -> Self {
        Self::with_mode(loader, TransitionMode::default())
    }

    pub fn with_mode(loader: Arc<dyn AssetLoader>, mode: TransitionMode) -> Self {
        Self {
            state: Mutex::new(ReadinessState::default()),
            loader,
            mode,
        }
    }

    pub fn mode(&self) -> TransitionMode {
        self.mode
    }

    pub fn loader(&self) -> Arc<dyn AssetLoader> {
        Arc::clone(&self.loader)
    }

    pub fn state(&self) -> ReadinessState {
        *self.lock()
    }

    /// Handles one initialization request for `initializer`, which needs
    /// `assets`.
    pub fn request(self: &Arc<Self>, assets: Vec<String>, initializer: Initializer) -> RequestOutcome {
        let (action, ready) = self.decide();
        debug!(?action, ready, "readiness request");

        match action {
            RequestAction::FetchLoaderAndAssets => {
                self.spawn_loader_fetch(assets, Arc::clone(&initializer))
            }
            RequestAction::FetchAssets => self.spawn_asset_fetch(assets, Arc::clone(&initializer)),
            RequestAction::Defer => self.spawn_retry(assets, Arc::clone(&initializer)),
            RequestAction::Proceed => {}
        }

        if ready {
            initializer();
        }

        RequestOutcome {
            action,
            initialized: ready,
        }
    }

    /// Picks the action and applies its synchronous transition. The ready
    /// check is taken under the same lock.
    fn decide(&self) -> (RequestAction, bool) {
        let mut state = self.lock();

        let action = match state.status {
            LoadStatus::Loading => RequestAction::Defer,
            LoadStatus::Idle if !self.loader.loader_available() => {
                state.status = LoadStatus::Loading;
                RequestAction::FetchLoaderAndAssets
            }
            LoadStatus::Idle if !state.loaded => {
                if self.mode == TransitionMode::Symmetric {
                    state.status = LoadStatus::Loading;
                }
                RequestAction::FetchAssets
            }
            LoadStatus::Idle => RequestAction::Proceed,
        };

        (action, state.is_ready())
    }

    fn spawn_loader_fetch(self: &Arc<Self>, assets: Vec<String>, initializer: Initializer) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(err) = this.loader.fetch_loader().await {
                // Back to Idle so pending retries attempt the fetch again
                error!("failed to fetch the script loader: {:#}", err);
                this.lock().status = LoadStatus::Idle;
                return;
            }

            this.fetch_assets(&assets).await;

            {
                let mut state = this.lock();
                state.loaded = true;
                if this.mode == TransitionMode::Symmetric {
                    state.status = LoadStatus::Idle;
                }
            }
            debug!(state = ?this.state(), "dependencies loaded");
            initializer();
        });
    }

    fn spawn_asset_fetch(self: &Arc<Self>, assets: Vec<String>, initializer: Initializer) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.fetch_assets(&assets).await;

            let symmetric = this.mode == TransitionMode::Symmetric;
            {
                let mut state = this.lock();
                state.status = LoadStatus::Idle;
                if symmetric {
                    state.loaded = true;
                }
            }
            debug!(state = ?this.state(), "assets fetched");
            if symmetric {
                initializer();
            }
        });
    }

    fn spawn_retry(self: &Arc<Self>, assets: Vec<String>, initializer: Initializer) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(RETRY_DELAY).await;
            this.request(assets, initializer);
        });
    }

    // Completion fires even when a fetch fails.
    async fn fetch_assets(&self, assets: &[String]) {
        if let Err(err) = self.loader.fetch_assets(assets).await {
            warn!("failed to fetch form dependencies {:?}: {:#}", assets, err);
        }
    }

    fn lock(&self) -> MutexGuard<'_, ReadinessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
