//! WM_POINTER provider demo entry point.
//!
//! Opens a host window, attaches the pointer provider to it, and logs every
//! dispatched pen event until Ctrl-C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()              -- provider + logging settings
//!  └─ HostWindow::spawn()        -- window + message loop thread
//!                                   (or the thread's active window)
//!  └─ ProviderRegistry
//!       └─ "wm_pointer"          -- PointerProvider over Win32MessageHook
//!  └─ poll loop (tokio interval) -- provider.update() once per tick
//! ```

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wm_pointer::infrastructure::storage::config::{self, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config comes first so its log level can seed the filter.  A broken
    // file is reported once logging is up.
    let (config, config_error) = match config::load_config() {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level)),
        )
        .init();

    if let Some(e) = config_error {
        warn!("failed to load config, using defaults: {e}");
    }

    info!("WM_POINTER provider starting");
    run(config).await?;
    info!("WM_POINTER provider stopped");
    Ok(())
}

#[cfg(target_os = "windows")]
async fn run(config: AppConfig) -> anyhow::Result<()> {
    use std::time::Duration;

    use wm_pointer::application::provider::{
        register_pointer_provider, MessageHook, PROVIDER_NAME,
    };
    use wm_pointer::application::registry::ProviderRegistry;
    use wm_pointer::infrastructure::message_hook::windows::{HostWindow, Win32MessageHook};
    use wm_pointer::infrastructure::storage::config::AttachTarget;

    let enable_mouse = config.provider.enable_mouse_in_pointer;
    let options = config.provider.interceptor_options();
    let mut registry = ProviderRegistry::new();

    // The host window must outlive the provider hooked into it.
    let window = match config.provider.attach {
        AttachTarget::HostWindow => {
            let window = HostWindow::spawn("WM_POINTER provider", 800, 600)?;
            let hwnd = window.raw_handle();
            register_pointer_provider(&mut registry, options, move || {
                let hook = Win32MessageHook::for_raw_handle(hwnd, enable_mouse);
                Ok(Box::new(hook) as Box<dyn MessageHook>)
            })?;
            Some(window)
        }
        AttachTarget::ActiveWindow => {
            register_pointer_provider(&mut registry, options, move || {
                let hook = Win32MessageHook::active_window(enable_mouse)?;
                Ok(Box::new(hook) as Box<dyn MessageHook>)
            })?;
            None
        }
    };

    let mut provider = registry.create(PROVIDER_NAME, &config.provider.device)?;
    provider.start()?;
    info!(attach = ?config.provider.attach, "provider ready.  Press Ctrl-C to exit.");

    let mut ticker =
        tokio::time::interval(Duration::from_millis(config.provider.poll_interval_ms.max(1)));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                provider.update(&mut |kind, pointer| info!(%kind, %pointer, "pointer event"));
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!("failed to listen for Ctrl-C: {e}");
                }
                info!("shutdown signal received");
                break;
            }
        }
    }

    provider.stop()?;
    if let Some(window) = window {
        window.close();
    }
    Ok(())
}

#[cfg(not(target_os = "windows"))]
async fn run(_config: AppConfig) -> anyhow::Result<()> {
    anyhow::bail!("the WM_POINTER provider requires Windows")
}
