use std::path::PathBuf;

use color_eyre::Report;
use directories::ProjectDirs;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    Layer, filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for file output
    pub file_level: Level,
    /// Log level for console output
    pub console_level: Level,
    /// Directory where log files should be written, `None` disables file logs
    pub log_dir: Option<PathBuf>,
    /// Whether file logs use JSON formatting for structured output
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_level: Level::DEBUG,
            console_level: Level::WARN,
            log_dir: Some(Self::default_log_dir()),
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// OS-appropriate default log directory (cache dir, since logs are
    /// disposable).
    pub fn default_log_dir() -> PathBuf {
        ProjectDirs::from("", "", "pekseg").map_or_else(
            || PathBuf::from("pekseg-logs"),
            |dirs| dirs.cache_dir().to_path_buf(),
        )
    }

    /// Reads overrides from `PEKSEG_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("PEKSEG_LOG_LEVEL") {
            if let Ok(parsed) = level.parse::<Level>() {
                config.file_level = parsed;
                config.console_level = parsed;
            }
        }

        if let Ok(dir) = std::env::var("PEKSEG_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir));
        }

        if std::env::var("PEKSEG_NO_FILE_LOGS").is_ok() {
            config.log_dir = None;
        }

        if std::env::var("PEKSEG_JSON_LOGS").is_ok() {
            config.json_format = true;
        }

        config
    }
}

/// Initializes file and console logging layers.
///
/// The returned guard must stay alive for the duration of the program or
/// buffered file logs are lost.
///
/// # Errors
///
/// Fails if the log directory cannot be created.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, Report> {
    let mut layers = vec![];
    let mut guard = None;

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "pekseg-player.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let file_filter = EnvFilter::builder()
            .with_default_directive(config.file_level.into())
            .from_env_lossy();

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(file_filter)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(non_blocking)
                .with_filter(file_filter)
                .boxed()
        };

        layers.push(file_layer);
    }

    let console_filter = EnvFilter::builder()
        .with_default_directive(config.console_level.into())
        .from_env_lossy();

    let console_layer = fmt::layer()
        .with_target(false) // hide module paths for cleaner console output
        .with_filter(console_filter)
        .boxed();
    layers.push(console_layer);

    tracing_subscriber::registry().with(layers).init();

    Ok(guard)
}
