// Tracing initialization with a reloadable log level. Output goes to stderr;
// stdout carries the port handshake.
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

static LOG_RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, tracing_subscriber::Registry>> =
    OnceLock::new();

pub fn init_tracing() {
    init_tracing_with_level("info");
}

pub fn init_tracing_with_level(level: &str) {
    // RUST_LOG wins over the provided level.
    let base_filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level));

    let (reload_layer, handle) = reload::Layer::new(base_filter);
    let _ = LOG_RELOAD_HANDLE.set(handle);

    let _ = tracing_subscriber::registry()
        .with(reload_layer)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Apply a new logging level at runtime. Ignored when RUST_LOG is set.
pub fn apply_logging_level(level: &str) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    if let Some(handle) = LOG_RELOAD_HANDLE.get() {
        let _ = handle.modify(|f| {
            *f = EnvFilter::new(level);
        });
    }
}

/// Level implied by the engine's `-v=N` flag, if it raises the configured one.
pub fn verbosity_level(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        9.. => Some("trace"),
        5..=8 => Some("debug"),
        _ => None,
    }
}

/// Resolve the effective level from config and verbosity. Verbosity never
/// lowers the configured level.
pub fn effective_level(configured: &str, verbosity: u8) -> String {
    match verbosity_level(verbosity) {
        Some(level) if rank(level) > rank(configured) => level.to_string(),
        _ => configured.to_string(),
    }
}

fn rank(level: &str) -> u8 {
    match level.to_ascii_lowercase().as_str() {
        "off" => 0,
        "error" => 1,
        "warn" => 2,
        "info" => 3,
        "debug" => 4,
        "trace" => 5,
        // Directive strings such as `websignin=debug` are left alone.
        _ => u8::MAX,
    }
}
