//! Logging setup for Epistle with file output and optional console output.
//!
//! Logs always go to a file at `warn` level (or higher if a filter is set).
//! Console logging goes to stderr, so it never mixes with a line being played on stdout. It
//! is enabled when `EPISTLE_LOG` or `RUST_LOG` is set, or in debug builds of commands that
//! don't own the terminal.
//!
//! ## Environment Variables
//!
//! 1. **`EPISTLE_LOG`** (highest priority) - Epistle-specific logging control
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for epistle crates
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/epistle/logs/epistle-<pid>.log`
//! - macOS: `~/Library/Application Support/epistle/logs/epistle-12345.log`
//! - Linux: `~/.local/share/epistle/logs/epistle-12345.log`
//!
//! Override with `--log-file <path>` or `EPISTLE_LOG_FILE`.

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const CRATES: [&str; 5] = [
    "epistle",
    "epistle_core",
    "epistle_config",
    "epistle_bin",
    "epistle_log",
];

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
    /// Whether the command leaves the terminal free for log output in debug builds.
    pub console: bool,
}

/// Initialize logging.
///
/// Respects the environment variable priority described in the module docs:
/// `EPISTLE_LOG` > `RUST_LOG` > default settings.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program.
/// Dropping it flushes and stops the background file writer.
pub fn init(config: LogConfig) -> Result<LogGuard, BoxError> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_file_filter()?);

    let console_enabled = filter_from_env() || (config.console && cfg!(debug_assertions));
    let console_layer = if console_enabled {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(create_filter()?),
        )
    } else {
        None
    };

    Registry::default()
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Initialize logging for tests.
///
/// Console only, no file output. Safe to call from every test, whichever runs first wins.
#[allow(clippy::let_unit_value)]
pub fn test() {
    let _ = test_init();
}

fn test_init() -> Result<(), BoxError> {
    fmt()
        .with_env_filter(create_filter()?)
        .with_test_writer()
        .try_init()?;
    Ok(())
}

fn filter_from_env() -> bool {
    env::var("EPISTLE_LOG").is_ok() || env::var("RUST_LOG").is_ok()
}

/// Splits an override into directory and file name. A path without an extension is a
/// directory that receives the default per-process file name.
fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("epistle-{}.log", std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_none() {
            return (path, filename);
        }
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(filename);
        return (dir, name);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("epistle")
        .join("logs");
    (dir, filename)
}

/// File filter: uses the user-specified level if set, otherwise `warn`.
fn create_file_filter() -> Result<EnvFilter, BoxError> {
    if filter_from_env() {
        return create_filter();
    }
    Ok(EnvFilter::new("warn"))
}

/// Builds the [`EnvFilter`] for `EPISTLE_LOG` > `RUST_LOG` > defaults.
fn create_filter() -> Result<EnvFilter, BoxError> {
    if let Ok(epistle_log) = env::var("EPISTLE_LOG") {
        return Ok(EnvFilter::try_new(expand_epistle_log(&epistle_log))?);
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return Ok(EnvFilter::try_new(rust_log)?);
    }

    Ok(EnvFilter::new(expand_epistle_log("info")))
}

/// Expands a bare level into per-crate directives.
///
/// - `EPISTLE_LOG=debug` becomes `warn,epistle=debug,epistle_core=debug,...`
/// - `EPISTLE_LOG=epistle_core=trace,epistle_bin=debug` is used as-is
fn expand_epistle_log(epistle_log: &str) -> String {
    if epistle_log.contains('=') || epistle_log.contains(':') || epistle_log.contains(',') {
        return epistle_log.to_string();
    }

    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|name| format!("{name}={epistle_log}")));
    directives.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_expands_to_every_crate() {
        assert_eq!(
            expand_epistle_log("debug"),
            "warn,epistle=debug,epistle_core=debug,epistle_config=debug,epistle_bin=debug,epistle_log=debug"
        );
    }

    #[test]
    fn directives_pass_through() {
        assert_eq!(
            expand_epistle_log("epistle_core=trace"),
            "epistle_core=trace"
        );
        assert_eq!(expand_epistle_log("warn,epistle=info"), "warn,epistle=info");
    }

    #[test]
    fn override_with_extension_is_a_file() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("/tmp/x/run.log")));
        assert_eq!(dir, PathBuf::from("/tmp/x"));
        assert_eq!(name, "run.log");
    }

    #[test]
    fn bare_file_name_lands_in_current_dir() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("run.log")));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "run.log");
    }

    #[test]
    fn override_without_extension_is_a_directory() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("/tmp/logs")));
        assert_eq!(dir, PathBuf::from("/tmp/logs"));
        assert_eq!(name, format!("epistle-{}.log", std::process::id()));
    }

    #[test]
    fn default_path_is_per_process() {
        let (dir, name) = resolve_log_path(None);
        assert!(dir.ends_with("epistle/logs"));
        assert!(name.starts_with("epistle-"));
    }

    #[test]
    fn init_creates_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("epistle.log");
        let guard = init(LogConfig {
            log_file_path: Some(path.clone()),
            console: false,
        })
        .unwrap();
        tracing::warn!("hello from the log test");

        assert_eq!(guard.log_file, path);
        drop(guard);
        assert!(path.exists());
    }
}
