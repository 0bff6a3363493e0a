//! Logging setup for the binaries
//!
//! Human-readable logs go to stderr so stdout only carries agent output.
//! With a log directory, a daily-rolling JSON log is written there as well.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix of the rolling JSON log
pub const LOG_FILE_PREFIX: &str = "reltio-agent.log";

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Raise the default level from `warn` to `info`
    pub debug: bool,
    /// Directory for the JSON log file
    pub log_dir: Option<PathBuf>,
}

/// Level used when `RUST_LOG` is not set
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "info"
    } else {
        "warn"
    }
}

fn build_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(debug)))
}

/// Install the global subscriber
///
/// The returned guard flushes the file log on drop and must be kept alive
/// for the life of the process.
pub fn init_logging(options: &LogOptions) -> Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    match &options.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {:?}", dir))?;

            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().json().with_writer(writer);

            tracing_subscriber::registry()
                .with(build_filter(options.debug))
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .context("Failed to initialize logging")?;

            tracing::info!("Logging to {:?}", dir);
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(build_filter(options.debug))
                .with(stderr_layer)
                .try_init()
                .context("Failed to initialize logging")?;
            Ok(None)
        }
    }
}
