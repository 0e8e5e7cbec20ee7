//! Logging system configuration and initialization
//!
//! Console and file logging for the scrape and load binaries. File output
//! goes to a daily-rotated file under the application data directory so
//! batch runs leave an inspectable trail.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use lazy_static::lazy_static;
use tracing::info;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::infrastructure::config::ConfigManager;
// Re-export LoggingConfig from config module
pub use crate::infrastructure::config::LoggingConfig;

// Global guard to keep the log file writer alive
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<tracing_appender::non_blocking::WorkerGuard>> =
        Mutex::new(Vec::new());
}

const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Get the log directory under the application data dir, falling back to
/// ./logs when no platform data directory is available
pub fn get_log_directory() -> PathBuf {
    ConfigManager::get_app_data_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|_| PathBuf::from("logs"))
}

/// Initialize logging with custom configuration.
///
/// `RUST_LOG` overrides the configured level entirely. Without it, noisy
/// dependency targets (sqlx statements, HTTP internals) are held back so
/// run logs stay readable at info level.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(&config.level)
            .add_directive("sqlx::query=warn".parse().unwrap())
            .add_directive("reqwest=info".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("h2=warn".parse().unwrap())
    });

    let registry = Registry::default().with(env_filter);

    match (config.file_output, config.console_output) {
        (true, true) => {
            let log_dir = get_log_directory();
            std::fs::create_dir_all(&log_dir)
                .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;

            let file_appender = rolling::daily(&log_dir, "shop-harvest.log");
            let (file_writer, file_guard) = non_blocking(file_appender);
            LOG_GUARDS.lock().unwrap().push(file_guard);

            let file_layer = fmt::Layer::new()
                .with_writer(file_writer)
                .with_timer(ChronoUtc::new(LOG_TIME_FORMAT.to_string()))
                .with_target(false)
                .with_ansi(false);
            let console_layer = fmt::Layer::new()
                .with_writer(std::io::stdout)
                .with_timer(ChronoUtc::new(LOG_TIME_FORMAT.to_string()))
                .with_target(false);

            registry.with(file_layer).with(console_layer).init();
            info!("Logging system initialized");
            info!("Log directory: {:?}", log_dir);
        }
        (true, false) => {
            let log_dir = get_log_directory();
            std::fs::create_dir_all(&log_dir)
                .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;

            let file_appender = rolling::daily(&log_dir, "shop-harvest.log");
            let (file_writer, file_guard) = non_blocking(file_appender);
            LOG_GUARDS.lock().unwrap().push(file_guard);

            let file_layer = fmt::Layer::new()
                .with_writer(file_writer)
                .with_timer(ChronoUtc::new(LOG_TIME_FORMAT.to_string()))
                .with_target(false)
                .with_ansi(false);

            registry.with(file_layer).init();
            info!("Logging system initialized");
            info!("Log directory: {:?}", log_dir);
        }
        (false, true) => {
            let console_layer = fmt::Layer::new()
                .with_writer(std::io::stdout)
                .with_timer(ChronoUtc::new(LOG_TIME_FORMAT.to_string()))
                .with_target(false);

            registry.with(console_layer).init();
            info!("Logging system initialized");
        }
        (false, false) => {
            return Err(anyhow!("No logging output configured"));
        }
    }

    info!("Log level: {}", config.level);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_config_default_enables_both_outputs() {
        let config = LoggingConfig::default();
        assert!(!config.level.is_empty());
        assert!(config.console_output);
        assert!(config.file_output);
    }

    #[test]
    fn log_directory_is_deterministic() {
        let log_dir = get_log_directory();
        assert!(log_dir.to_string_lossy().ends_with("logs"));
    }
}
