use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};

pub mod config;
pub mod copier;
pub mod error;
pub mod footage;
pub mod launcher;
pub mod layout;
pub mod loader;
pub mod project;
pub mod session;
pub mod version;

pub use error::{CopyFailure, Result, ShotError};

/// Receives every tagged status line, e.g. `[OK] Footage copied successfully.`
pub type StatusLogHook = Arc<Mutex<dyn Fn(&str) + Send + Sync + 'static>>;

static LOG_HOOK: Lazy<Mutex<Option<StatusLogHook>>> = Lazy::new(|| Mutex::new(None));

pub fn set_log_hook(hook: Option<StatusLogHook>) {
    if let Ok(mut guard) = LOG_HOOK.lock() {
        *guard = hook;
    }
}

pub(crate) fn logv(tag: &str, message: &str) {
    match tag {
        "WARN" => tracing::warn!("{}", message),
        _ => tracing::info!("[{}] {}", tag, message),
    }

    if let Ok(guard) = LOG_HOOK.lock() {
        if let Some(hook) = guard.as_ref() {
            if let Ok(callback) = hook.lock() {
                let line = format!("[{}] {}", tag, message);
                callback(&line);
            }
        }
    }
}

pub(crate) fn logi(message: impl AsRef<str>) {
    logv("INFO", message.as_ref());
}

pub(crate) fn logok(message: impl AsRef<str>) {
    logv("OK", message.as_ref());
}

pub(crate) fn logw(message: impl AsRef<str>) {
    logv("WARN", message.as_ref());
}
