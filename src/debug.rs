//! Debug logging infrastructure for cellpaint.
//!
//! Every `log::info!()`, `log::debug!()` etc. from any crate in the workspace
//! is routed through a bridge into `<temp>/cellpaint_debug.log`. When
//! `RUST_LOG` is set the lines are mirrored to stderr as well.
//!
//! Level precedence, highest first:
//! - `--log-level` on the command line
//! - the `DEBUG_LEVEL` environment variable (0-4)
//! - `log_level` in the config file, applied once the config is loaded

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use cellpaint_config::LogLevel;
use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

/// `DEBUG_LEVEL` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    /// Parse a `DEBUG_LEVEL` value; anything unrecognised is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().parse::<u8>() {
            Ok(0) => Some(DebugLevel::Off),
            Ok(1) => Some(DebugLevel::Error),
            Ok(2) => Some(DebugLevel::Info),
            Ok(3) => Some(DebugLevel::Debug),
            Ok(4) => Some(DebugLevel::Trace),
            _ => None,
        }
    }

    fn from_env() -> Option<Self> {
        std::env::var("DEBUG_LEVEL")
            .ok()
            .and_then(|value| Self::parse(&value))
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            DebugLevel::Off => LevelFilter::Off,
            DebugLevel::Error => LevelFilter::Error,
            DebugLevel::Info => LevelFilter::Info,
            DebugLevel::Debug => LevelFilter::Debug,
            DebugLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Pick the effective level from the three sources.
pub fn resolve_level(
    cli: Option<LevelFilter>,
    env: Option<DebugLevel>,
    config: LogLevel,
) -> LevelFilter {
    cli.or(env.map(DebugLevel::to_level_filter))
        .unwrap_or_else(|| config.to_level_filter())
}

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("cellpaint_debug.log")
}

/// Log file, opened on the first record that passes the level filter.
struct DebugLogger {
    file: Option<File>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn new(mirror_stderr: bool) -> Self {
        let path = log_path();
        let file = match OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&path)
        {
            Ok(f) => Some(f),
            Err(e) => {
                if mirror_stderr {
                    eprintln!("cellpaint: cannot open {}: {}", path.display(), e);
                }
                None
            }
        };
        let mut logger = DebugLogger {
            file,
            mirror_stderr,
        };
        logger.write_raw(&format!(
            "\n{}\ncellpaint debug session started at {} (level={})\n{}\n",
            "=".repeat(80),
            get_timestamp(),
            log::max_level(),
            "=".repeat(80)
        ));
        logger
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn write_record(&mut self, record: &Record) {
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        self.write_raw(&line);
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

/// Set when the CLI or environment fixed the level; config cannot lower it.
static LEVEL_LOCKED: AtomicBool = AtomicBool::new(false);

fn get_logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| Mutex::new(DebugLogger::new(std::env::var_os("RUST_LOG").is_some())))
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// `log` facade adapter writing into the debug log file.
struct LogBridge;

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            get_logger().lock().write_record(record);
        }
    }

    fn flush(&self) {
        if let Some(logger) = LOGGER.get() {
            let mut logger = logger.lock();
            if let Some(ref mut file) = logger.file {
                let _ = file.flush();
            }
        }
    }
}

static BRIDGE: LogBridge = LogBridge;

/// Install the log bridge. Call once, before anything logs.
///
/// Until [`apply_config_level`] runs, the level comes from `cli_level` or
/// `DEBUG_LEVEL`, and is `Off` when neither is set.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let env_level = DebugLevel::from_env();
    let fixed = cli_level.or(env_level.map(DebugLevel::to_level_filter));
    LEVEL_LOCKED.store(fixed.is_some(), Ordering::Relaxed);

    if log::set_logger(&BRIDGE).is_err() {
        return;
    }
    log::set_max_level(fixed.unwrap_or(LevelFilter::Off));
}

/// Apply the config file's `log_level` unless the CLI or env already chose one.
pub fn apply_config_level(level: LogLevel) {
    if !LEVEL_LOCKED.load(Ordering::Relaxed) {
        log::set_max_level(level.to_level_filter());
    }
}
