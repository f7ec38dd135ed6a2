// Logging Bootstrap
// Console output always, plus one log file per process unless disabled or unwritable

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_PREFIX: &str = "draftscope_";
const LOG_SUFFIX: &str = ".log";
const DEFAULT_KEEP: usize = 30;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where and whether to write log files, read from `DRAFTSCOPE_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub file_logging: bool,
    pub cleanup: bool,
    pub dir: PathBuf,
    /// Log files kept by the startup cleanup.
    pub keep: usize,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let dir = lookup("DRAFTSCOPE_LOG_DIR")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_logs_dir);

        Self {
            file_logging: !is_set(lookup("DRAFTSCOPE_DISABLE_FILE_LOG")),
            cleanup: !is_set(lookup("DRAFTSCOPE_DISABLE_LOG_CLEANUP")),
            dir,
            keep: DEFAULT_KEEP,
        }
    }
}

fn is_set(value: Option<String>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        v == "1" || v.eq_ignore_ascii_case("true")
    })
}

fn default_logs_dir() -> PathBuf {
    if cfg!(debug_assertions) {
        return PathBuf::from("logs");
    }
    dirs::data_local_dir()
        .map(|dir| dir.join("draftscope").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Open this process's log file behind a non-blocking writer.
fn open_log_file(dir: &Path) -> std::io::Result<(NonBlocking, PathBuf)> {
    fs::create_dir_all(dir)?;
    let name = format!(
        "{}{}{}",
        LOG_PREFIX,
        chrono::Local::now().format("%Y%m%d_%H%M%S"),
        LOG_SUFFIX
    );
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, &name));
    let _ = LOG_GUARD.set(guard);
    Ok((writer, dir.join(name)))
}

/// Install the global subscriber. Returns the log file path when file logging is on.
///
/// `RUST_LOG` filters both layers and defaults to `info`. An unwritable log directory
/// degrades to console-only output.
pub fn init_logging(settings: &LogSettings) -> Option<PathBuf> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_file = if settings.file_logging {
        match open_log_file(&settings.dir) {
            Ok(opened) => Some(opened),
            Err(e) => {
                eprintln!("Log directory {} not writable: {}", settings.dir.display(), e);
                None
            }
        }
    } else {
        None
    };

    let (file_layer, log_path) = match log_file {
        Some((writer, path)) => (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(path),
        ),
        None => (None, None),
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions));

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
    {
        eprintln!("Logging already initialized: {}", e);
    }

    if log_path.is_some() && settings.cleanup {
        let dir = settings.dir.clone();
        let keep = settings.keep;
        std::thread::spawn(move || cleanup_old_logs(&dir, keep));
    }

    log_path
}

fn is_log_file(name: &str) -> bool {
    name.starts_with(LOG_PREFIX) && name.ends_with(LOG_SUFFIX)
}

/// Delete the oldest DraftScope log files beyond `keep`. Returns how many were removed.
pub fn cleanup_old_logs(dir: &Path, keep: usize) -> usize {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return 0;
    };

    let mut logs: Vec<(SystemTime, String, PathBuf)> = read_dir
        .filter_map(|e| e.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_log_file(&name) {
                return None;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            Some((modified, name, entry.path()))
        })
        .collect();

    if logs.len() <= keep {
        return 0;
    }

    // Names carry the start timestamp, which breaks mtime ties
    logs.sort();
    let excess = logs.len() - keep;
    logs.into_iter()
        .take(excess)
        .filter(|(_, _, path)| fs::remove_file(path).is_ok())
        .count()
}
