//! Provider bootstrap gateway
//!
//! The provider runtime is loaded lazily and at most once. Every caller of
//! [`ProviderGateway::ensure_loaded`] or [`ProviderGateway::await_ready`] while
//! a load is in flight joins that same load and sees the same outcome.

use crate::error::{GatewayError, Result};
use crate::provider::{MediaProvider, ProviderEvent};
use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// How long a bootstrap may take before it is reported as failed
pub const BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Platform hook that brings the provider runtime up and constructs players
#[async_trait]
pub trait ProviderLoader: Send + Sync {
    /// Start the runtime and resolve once its ready hook fires
    async fn bootstrap(&self) -> std::result::Result<(), GatewayError>;

    /// Whether the provider constructor entry point is present
    fn is_available(&self) -> bool;

    /// Construct a provider bound to `container_id`, reporting through `events`
    fn create(
        &self,
        container_id: &str,
        events: mpsc::UnboundedSender<ProviderEvent>,
    ) -> Result<Box<dyn MediaProvider>>;
}

/// Snapshot of the bootstrap state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayState {
    /// Bootstrap completed
    pub loaded: bool,
    /// Bootstrap in flight
    pub loading: bool,
    /// Message of the last failure
    pub error: Option<String>,
}

type SharedLoad = Shared<BoxFuture<'static, std::result::Result<(), GatewayError>>>;

#[derive(Default)]
struct Inner {
    state: GatewayState,
    pending: Option<SharedLoad>,
}

/// Single-flight readiness contract over a [`ProviderLoader`]
pub struct ProviderGateway {
    loader: Arc<dyn ProviderLoader>,
    timeout: Duration,
    inner: Arc<Mutex<Inner>>,
}

impl std::fmt::Debug for ProviderGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderGateway")
            .field("timeout", &self.timeout)
            .field("state", &self.state())
            .finish()
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ProviderGateway {
    /// Create a gateway with the default bootstrap timeout
    pub fn new(loader: Arc<dyn ProviderLoader>) -> Self {
        Self {
            loader,
            timeout: BOOTSTRAP_TIMEOUT,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Override the bootstrap timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Loader used to construct providers
    pub fn loader(&self) -> &Arc<dyn ProviderLoader> {
        &self.loader
    }

    /// Copy of the current bootstrap state
    pub fn state(&self) -> GatewayState {
        lock(&self.inner).state.clone()
    }

    /// Loaded and the constructor is present
    pub fn is_ready(&self) -> bool {
        lock(&self.inner).state.loaded && self.loader.is_available()
    }

    /// Bootstrap the provider runtime, or join the bootstrap already running
    ///
    /// Resolves immediately once loaded. A failed load is not cached: the next
    /// call starts a fresh attempt.
    pub async fn ensure_loaded(&self) -> std::result::Result<(), GatewayError> {
        let load = {
            let mut inner = lock(&self.inner);
            if inner.state.loaded {
                return Ok(());
            }

            if let Some(pending) = &inner.pending {
                debug!("Joining in-flight provider bootstrap");
                pending.clone()
            } else if self.loader.is_available() {
                inner.state.loaded = true;
                debug!("Provider runtime already present");
                return Ok(());
            } else {
                inner.state.loading = true;
                inner.state.error = None;
                let load = self.start_load();
                inner.pending = Some(load.clone());
                load
            }
        };

        load.await
    }

    fn start_load(&self) -> SharedLoad {
        let loader = Arc::clone(&self.loader);
        let inner = Arc::clone(&self.inner);
        let timeout = self.timeout;

        async move {
            info!("Bootstrapping media provider");
            let result = match tokio::time::timeout(timeout, loader.bootstrap()).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout(timeout)),
            };

            let mut guard = lock(&inner);
            guard.state.loading = false;
            guard.pending = None;
            match &result {
                Ok(()) => {
                    guard.state.loaded = true;
                    info!("Media provider bootstrap complete");
                }
                Err(e) => {
                    guard.state.error = Some(e.to_string());
                    warn!("Media provider bootstrap failed: {}", e);
                }
            }
            result
        }
        .boxed()
        .shared()
    }

    /// Resolve once the provider can be constructed
    ///
    /// Starts or joins the bootstrap as needed. A completed bootstrap without a
    /// constructor yields [`GatewayError::Unavailable`].
    pub async fn await_ready(&self) -> std::result::Result<(), GatewayError> {
        if self.is_ready() {
            return Ok(());
        }

        self.ensure_loaded().await?;

        if self.loader.is_available() {
            Ok(())
        } else {
            Err(GatewayError::Unavailable)
        }
    }
}
