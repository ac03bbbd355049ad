//! Rolling file logs for the task core.
//!
//! # Responsibility
//! - Start the file logger from a host's [`CoreConfig`], once per process.
//! - Record panics as `panic_captured` events before the default hook runs.
//!
//! # Invariants
//! - Starting again with the same level and directory is a no-op.
//! - Starting again with another level or directory is refused.
//! - Task titles and descriptions never appear in log lines; panic payloads
//!   are flattened and capped because they may quote them.

use crate::config::CoreConfig;
use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "todo_core";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_PAYLOAD_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    status: LoggingStatus,
    _handle: LoggerHandle,
}

/// Level and directory the running logger was started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingStatus {
    pub level: &'static str,
    pub log_dir: PathBuf,
}

/// Why logging could not be started.
#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    RelativeLogDir(PathBuf),
    CreateLogDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    Backend(FlexiLoggerError),
    AlreadyStarted {
        active: LoggingStatus,
        requested: LoggingStatus,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(dir) => {
                write!(f, "log directory must be absolute, got `{}`", dir.display())
            }
            Self::CreateLogDir { dir, source } => {
                write!(f, "cannot create log directory `{}`: {source}", dir.display())
            }
            Self::Backend(err) => write!(f, "file logger failed to start: {err}"),
            Self::AlreadyStarted { active, requested } => write!(
                f,
                "logging already runs at {} in `{}`; refusing to switch to {} in `{}`",
                active.level,
                active.log_dir.display(),
                requested.level,
                requested.log_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateLogDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FlexiLoggerError> for LoggingError {
    fn from(value: FlexiLoggerError) -> Self {
        Self::Backend(value)
    }
}

/// Starts file logging at `config.log_level` under `config.log_dir`.
///
/// Never panics. A host that cannot log should keep running and report the
/// returned error itself.
pub fn init_logging(config: &CoreConfig) -> Result<(), LoggingError> {
    let requested = requested_status(config)?;

    let active = ACTIVE.get_or_try_init(|| start_logger(config, requested.clone()))?;
    if active.status != requested {
        return Err(LoggingError::AlreadyStarted {
            active: active.status.clone(),
            requested,
        });
    }
    Ok(())
}

/// Returns what the running logger was started with, if anything.
pub fn logging_status() -> Option<LoggingStatus> {
    ACTIVE.get().map(|active| active.status.clone())
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

pub(crate) fn normalize_level(level: &str) -> Option<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

fn requested_status(config: &CoreConfig) -> Result<LoggingStatus, LoggingError> {
    let level = normalize_level(&config.log_level)
        .ok_or_else(|| LoggingError::UnsupportedLevel(config.log_level.clone()))?;
    if !config.log_dir.is_absolute() {
        return Err(LoggingError::RelativeLogDir(config.log_dir.clone()));
    }
    Ok(LoggingStatus {
        level,
        log_dir: config.log_dir.clone(),
    })
}

fn start_logger(config: &CoreConfig, status: LoggingStatus) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&status.log_dir).map_err(|source| LoggingError::CreateLogDir {
        dir: status.log_dir.clone(),
        source,
    })?;

    let handle = Logger::try_with_str(status.level)?
        .log_to_file(file_spec(&status.log_dir))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;

    install_panic_hook();

    info!(
        "event=core_init module=core status=ok version={} os={} level={} log_dir={} db_path={} revalidate={}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        status.level,
        status.log_dir.display(),
        config.db_path.display(),
        config.revalidate_cache
    );

    Ok(ActiveLogger {
        status,
        _handle: handle,
    })
}

fn file_spec(log_dir: &Path) -> FileSpec {
    FileSpec::default()
        .directory(log_dir)
        .basename(LOG_FILE_BASENAME)
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            flatten_payload(&payload, PANIC_PAYLOAD_CHARS)
        );
        previous(info);
    }));
}

fn flatten_payload(value: &str, max_chars: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut capped: String = flat.chars().take(max_chars).collect();
    capped.push_str("...");
    capped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_at(log_dir: &Path, level: &str) -> CoreConfig {
        CoreConfig {
            log_level: level.to_string(),
            log_dir: log_dir.to_path_buf(),
            ..CoreConfig::default()
        }
    }

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("TRACE"), Some("trace"));
        assert_eq!(normalize_level(" warning "), Some("warn"));
        assert_eq!(normalize_level("verbose"), None);
    }

    #[test]
    fn relative_log_dir_is_rejected_before_starting() {
        let config = config_at(Path::new("logs/dev"), "info");
        let err = init_logging(&config).unwrap_err();
        assert!(matches!(err, LoggingError::RelativeLogDir(_)));
    }

    #[test]
    fn unsupported_level_is_rejected_before_starting() {
        let dir = tempfile::tempdir().unwrap();
        let err = init_logging(&config_at(dir.path(), "loud")).unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn flatten_payload_strips_newlines_and_caps_length() {
        let flat = flatten_payload("buy milk\nand eggs\rtoday", 8);
        assert_eq!(flat, "buy milk...");
        assert_eq!(flatten_payload("short", 8), "short");
    }

    #[test]
    fn init_logging_is_idempotent_for_same_config_and_rejects_conflicts() {
        let log_dir = tempfile::tempdir().unwrap();
        let other_dir = tempfile::tempdir().unwrap();

        init_logging(&config_at(log_dir.path(), "info")).expect("first init should succeed");
        init_logging(&config_at(log_dir.path(), "INFO")).expect("same config should be a no-op");

        let level_error = init_logging(&config_at(log_dir.path(), "debug")).unwrap_err();
        assert!(matches!(level_error, LoggingError::AlreadyStarted { .. }));

        let dir_error = init_logging(&config_at(other_dir.path(), "info")).unwrap_err();
        assert!(dir_error.to_string().contains("refusing to switch"));

        let status = logging_status().expect("logging should be active");
        assert_eq!(status.level, "info");
        assert_eq!(status.log_dir, log_dir.path());
    }
}
