//! Logging setup: a file-backed `tracing` subscriber.
//!
//! The terminal owns stdout, so logs only go to a file.
//!
//! ## Environment Variables
//!
//! 1. **`DIRPANE_LOG`** (highest priority) - filter directives for this program
//! 2. **`RUST_LOG`** - standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for `dirpane`
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/dirpane/logs/dirpane-<pid>.log`. Override with
//! `--log-file <path>` or `log.file` in the config. A path without an
//! extension is treated as a directory.

use std::env;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::APP_NAME;
use crate::error::{AppError, Result};

const DEFAULT_FILTER: &str = "warn,dirpane=info";

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

/// Initialize logging to a file.
pub fn init(log_file: Option<PathBuf>) -> Result<LogGuard> {
    let (log_dir, filename) = resolve_log_path(log_file);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(create_filter(
            env::var("DIRPANE_LOG").ok(),
            env::var("RUST_LOG").ok(),
        ));

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Terminal(format!("logging already initialized: {e}")))?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("{}-{}.log", APP_NAME, std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir, name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("logs");
    (dir, filename)
}

/// `DIRPANE_LOG` > `RUST_LOG` > [`DEFAULT_FILTER`].
fn create_filter(app_log: Option<String>, rust_log: Option<String>) -> EnvFilter {
    app_log
        .or(rust_log)
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
