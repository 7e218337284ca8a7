//! Run logging.
//!
//! One call wires `tracing` to a plain-text log file in the configured
//! log directory. The returned guard flushes the writer on drop, so
//! callers keep it alive for the duration of the run.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::result::{NavegarError, NavegarResult};

/// File name of the run log
pub const LOG_FILE: &str = "navegar.log";

/// Initialize file logging under `log_dir`.
///
/// The filter honors `RUST_LOG` and falls back to `info`. Initializing
/// twice in one process is an error.
pub fn init_logging(log_dir: &Path) -> NavegarResult<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| NavegarError::Config {
            message: format!("could not initialize logging: {e}"),
        })?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        // a second init in the same process fails, so both outcomes are
        // accepted; the directory must exist either way
        let result = init_logging(dir.path());
        assert!(dir.path().exists());
        if let Ok(guard) = result {
            tracing::info!("log line");
            drop(guard);
            assert!(dir.path().join(LOG_FILE).exists());
        }
    }
}
