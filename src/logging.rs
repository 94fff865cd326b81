//! Logger setup for native and WASM builds.

use crate::config::LogLevel;

/// Install the global logger. Calling this twice is harmless; the second
/// call is ignored.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: LogLevel) {
    let result = env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .try_init();

    if result.is_ok() {
        log::debug!("Logger initialized at {:?}", level);
    }
}

/// Install the console logger and the panic hook.
#[cfg(target_arch = "wasm32")]
pub fn init(level: LogLevel) {
    console_error_panic_hook::set_once();

    if console_log::init_with_level(level.to_level()).is_ok() {
        log::debug!("Console logger initialized at {:?}", level);
    }
}
