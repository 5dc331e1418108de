//! # Steamband Pad
//!
//! Gamepad bridge for text-mode roguelikes.
//!
//! Reads a Linux evdev gamepad, writes the resulting key presses to stdout
//! and draws the command and remap overlays on stderr.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tokio::time::{interval, Duration};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use steamband_pad::clock::SystemClock;
use steamband_pad::config::{Config, LoggingConfig};
use steamband_pad::controller::connection::logging_enabled_from_env;
use steamband_pad::controller::gamepad::EvdevGamepad;
use steamband_pad::driver::{InputContext, PollDriver};
use steamband_pad::profile::FileProfileStore;
use steamband_pad::terminal::{AnsiScreen, StdoutKeys};

/// Loads the configuration named on the command line, or the defaults.
fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path)),
        None => Ok(Config::default()),
    }
}

/// Installs the stderr subscriber and, if configured, an append-only log
/// file. The returned guard must live until shutdown so the file gets
/// flushed.
fn init_logging(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match logging.file_path() {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| anyhow!("Log file path {} has no file name", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref())?;
    let _log_guard = init_logging(&config.logging)?;

    info!("Steamband Pad v{} starting...", env!("CARGO_PKG_VERSION"));

    let controller_log = config.logging.controller_log && logging_enabled_from_env();
    let source = EvdevGamepad::new(
        config.device.device_path(),
        config.device.reconnect_interval_ms,
    );
    let store = FileProfileStore::new(config.paths.user_dir());
    let context = InputContext::from_config(&config.input, controller_log);

    let mut driver = PollDriver::new(source, SystemClock::new(), store, context);
    driver.load_profile();

    let mut keys = StdoutKeys::default();
    let mut screen = AnsiScreen::default();
    let mut ticker = interval(Duration::from_millis(config.input.poll_interval_ms));

    info!(
        "Polling gamepad every {} ms, press Ctrl+C to exit",
        config.input.poll_interval_ms
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                driver.check(&mut keys, &mut screen);
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    driver.hide_remap_menu(&mut screen);
    driver.hide_command_menu(&mut screen);

    Ok(())
}
