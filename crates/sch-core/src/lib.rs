//! Shared runtime plumbing for the school directory backend.
//!
//! ## Configuration
//!
//! - [`Config`] — Command-line and environment configuration
//!
//! ## Runtime Utilities
//!
//! - [`log()`] — Terminal + file logging
//! - [`hook()`] — Panic guard that routes panics through the logger
mod config;

pub use config::*;

/// Maximum accepted size of an uploaded image in bytes.
pub const IMAGE_LIMIT: usize = 5 * 1024 * 1024;
/// Maximum accepted size of a single text form field in bytes.
pub const FIELD_LIMIT: usize = 1024 * 1024;
/// Maximum accepted size of a JSON request body in bytes.
pub const JSON_LIMIT: usize = 100 * 1024;
/// Prefix of every stored upload filename.
pub const IMAGE_PREFIX: &str = "school-";
/// Public path under which stored uploads are served.
pub const UPLOADS_PATH: &str = "/uploads";

/// Sends INFO to the terminal and DEBUG to `logs/<name>-<unix secs>.log`.
/// Fails if the log file cannot be created or a logger is already set.
pub fn log(name: &str) -> std::io::Result<()> {
    std::fs::create_dir_all("logs")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(logfile(name, secs))?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).map_err(std::io::Error::other)
}

fn logfile(name: &str, secs: u64) -> String {
    format!("logs/{}-{}.log", name, secs)
}

/// Route panics through the logger instead of bare stderr.
/// The panicking worker is replaced by actix; other requests keep flowing.
pub fn hook() {
    std::panic::set_hook(Box::new(|info| {
        let message = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        match info.location() {
            Some(at) => log::error!("panic at {}:{}: {}", at.file(), at.line(), message),
            None => log::error!("panic: {}", message),
        }
    }));
}
