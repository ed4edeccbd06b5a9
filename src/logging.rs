use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILE_NAME: &str = "roster.log";

/// Filter directives used when `RUST_LOG` is not set.
///
/// The server's request spans come from `tower_http`, so it follows the same level.
pub fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("roster={level},tower_http={level}")
}

/// `RUST_LOG` wins over the verbosity flag.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Split a log file path into the rolling appender's directory and file name prefix.
fn rolling_target(log_path: &Path) -> (&Path, &OsStr) {
    let dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = log_path
        .file_name()
        .unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE_NAME));
    (dir, file_name)
}

/// Initialize the logging system
///
/// Human-readable logs go to stderr, since stdout carries command output.
/// With `log_file`, JSON records are also written to a daily rotated file
/// whose name starts with the given file name.
pub fn init(verbose: bool, log_file: Option<PathBuf>) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file_layer = log_file.map(|log_path| {
        let (dir, file_name) = rolling_target(&log_path);
        let _ = std::fs::create_dir_all(dir);
        fmt::layer()
            .with_writer(tracing_appender::rolling::daily(dir, file_name))
            .with_ansi(false)
            .json()
    });

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(stderr_layer)
        .with(file_layer)
        .init();
}
