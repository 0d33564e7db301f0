//! PointerProvider: the `start` / `update` / `stop` lifecycle.
//!
//! The provider owns the pieces that must outlive a single message:
//!
//! - the shared [`EventQueue`];
//! - the [`UpdateDispatcher`] with the tracked pointer;
//! - a [`MessageHook`], the OS subscription that swaps the window procedure.
//!
//! On `start`, the provider asks the hook to install a [`PointerInterceptor`]
//! built around the window's original procedure.  On `stop`, the hook
//! restores the original procedure and any undelivered records are dropped.
//!
//! # Single registration
//!
//! A window can carry only one interceptor.  Starting a running provider
//! fails with [`ProviderError::AlreadyStarted`], and hooks refuse a second
//! `install` with [`HookError::AlreadyInstalled`] instead of silently
//! replacing the first.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info};
use wm_pointer_core::{EventKind, EventQueue, TrackedPointer};

use super::dispatch_updates::{DispatchSummary, UpdateDispatcher};
use super::intercept_messages::{
    InterceptorOptions, MessageHandler, PointerInterceptor, WindowSystem,
};
use super::registry::ProviderRegistry;

/// Name under which the provider registers with a [`ProviderRegistry`].
pub const PROVIDER_NAME: &str = "wm_pointer";

/// Error type for message-hook operations.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("a message interceptor is already installed")]
    AlreadyInstalled,
    #[error("no message interceptor is installed")]
    NotInstalled,
    #[error("no active window to attach to")]
    NoActiveWindow,
    #[error("platform error: {0}")]
    Platform(String),
}

/// Error type for provider lifecycle and registry operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider is already started")]
    AlreadyStarted,
    #[error(transparent)]
    Hook(#[from] HookError),
    #[error("no provider registered under {0:?}")]
    UnknownProvider(String),
    #[error("a provider is already registered under {0:?}")]
    DuplicateProvider(String),
}

/// Builds the replacement handler around the window's original procedure.
pub type InterceptorBuilder =
    Box<dyn FnOnce(Box<dyn MessageHandler>) -> Arc<dyn MessageHandler> + Send>;

/// OS subscription that replaces one window's message procedure.
///
/// Implemented by the Win32 hook and by the in-process mock host.
pub trait MessageHook: Send {
    /// Queries the interceptor will run against the hooked window.
    fn window_system(&self) -> Result<Arc<dyn WindowSystem>, HookError>;

    /// Replaces the window procedure with the handler returned by `build`,
    /// which receives the original procedure as its next handler.
    ///
    /// # Errors
    ///
    /// [`HookError::AlreadyInstalled`] if a handler is already in place.
    fn install(&mut self, build: InterceptorBuilder) -> Result<(), HookError>;

    /// Restores the original window procedure.
    ///
    /// # Errors
    ///
    /// [`HookError::NotInstalled`] if nothing was installed.
    fn uninstall(&mut self) -> Result<(), HookError>;
}

/// Host-facing lifecycle of a motion-event provider.
pub trait MotionEventProvider: Send {
    /// Device name attached to every pointer this provider produces.
    fn device(&self) -> &str;

    /// Subscribes to the OS message source.
    fn start(&mut self) -> Result<(), ProviderError>;

    /// Drains pending events into `dispatch`.  Called once per host frame.
    fn update(&mut self, dispatch: &mut dyn FnMut(EventKind, &TrackedPointer)) -> DispatchSummary;

    /// Unsubscribes and discards undelivered events.  A no-op when stopped.
    fn stop(&mut self) -> Result<(), ProviderError>;
}

/// WM_POINTER motion-event provider.
pub struct PointerProvider {
    options: InterceptorOptions,
    queue: Arc<EventQueue>,
    dispatcher: UpdateDispatcher,
    hook: Box<dyn MessageHook>,
    running: bool,
}

impl PointerProvider {
    /// Creates a stopped provider.
    pub fn new(
        device: impl Into<String>,
        options: InterceptorOptions,
        hook: Box<dyn MessageHook>,
    ) -> Self {
        Self {
            options,
            queue: Arc::new(EventQueue::new()),
            dispatcher: UpdateDispatcher::new(device),
            hook,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of decoded records waiting for the next `update`.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The pointer between its `begin` and `end`, if any.
    pub fn active_pointer(&self) -> Option<&TrackedPointer> {
        self.dispatcher.active_pointer()
    }
}

impl MotionEventProvider for PointerProvider {
    fn device(&self) -> &str {
        self.dispatcher.device()
    }

    fn start(&mut self) -> Result<(), ProviderError> {
        if self.running {
            return Err(ProviderError::AlreadyStarted);
        }

        let window = self.hook.window_system()?;
        let queue = Arc::clone(&self.queue);
        let options = self.options;
        self.hook.install(Box::new(move |next: Box<dyn MessageHandler>| {
            let interceptor = PointerInterceptor::new(window, queue, options, next);
            Arc::new(interceptor) as Arc<dyn MessageHandler>
        }))?;

        self.running = true;
        info!(device = %self.dispatcher.device(), "pointer provider started");
        Ok(())
    }

    fn update(&mut self, dispatch: &mut dyn FnMut(EventKind, &TrackedPointer)) -> DispatchSummary {
        self.dispatcher.update(&self.queue, |kind, pointer| dispatch(kind, pointer))
    }

    fn stop(&mut self) -> Result<(), ProviderError> {
        if !self.running {
            debug!(device = %self.dispatcher.device(), "stop on a stopped provider; nothing to do");
            return Ok(());
        }

        let result = self.hook.uninstall();
        self.running = false;
        let discarded = self.queue.clear();
        self.dispatcher.reset();
        info!(
            device = %self.dispatcher.device(),
            discarded,
            "pointer provider stopped"
        );
        result.map_err(ProviderError::from)
    }
}

impl Drop for PointerProvider {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!("failed to stop pointer provider on drop: {e}");
        }
    }
}

/// Registers the WM_POINTER provider under [`PROVIDER_NAME`].
///
/// `make_hook` is called once per created provider, so each instance gets
/// its own subscription.
pub fn register_pointer_provider<H>(
    registry: &mut ProviderRegistry,
    options: InterceptorOptions,
    make_hook: H,
) -> Result<(), ProviderError>
where
    H: Fn() -> Result<Box<dyn MessageHook>, HookError> + Send + Sync + 'static,
{
    registry.register(
        PROVIDER_NAME,
        Box::new(
            move |device: &str| -> Result<Box<dyn MotionEventProvider>, ProviderError> {
                let hook = make_hook()?;
                Ok(Box::new(PointerProvider::new(device, options, hook)))
            },
        ),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
