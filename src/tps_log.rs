// File logging for the TUI
// The terminal is owned by the UI, so records go to a log file instead of stderr

use chrono::Local;
use env_logger::{Builder, Target};
use log::{LevelFilter, warn};
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use crate::tps_config::{APP_NAME, data_dir};

/// Log file location inside the per-user data directory
pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(format!("{}.log", APP_NAME)))
}

/// Install the file logger. Honours RUST_LOG when set; otherwise everything
/// is accepted until `apply_level` narrows it from the config.
/// Returns the log file path, or None when no log file could be opened.
pub fn init() -> Option<PathBuf> {
    let path = log_path()?;
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = File::create(&path).ok()?;

    let mut builder = Builder::new();
    match env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.filter_level(LevelFilter::Trace),
    };
    builder
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .ok()?;
    Some(path)
}

/// Narrow the global level to the configured one unless RUST_LOG overrides it
pub fn apply_level(level: &str) {
    if env::var_os("RUST_LOG").is_some() {
        return;
    }
    let filter = parse_level(level).unwrap_or_else(|| {
        warn!("unknown log level {:?}, using info; per-module filters go in RUST_LOG", level);
        LevelFilter::Info
    });
    log::set_max_level(filter);
}

/// A single level name such as "debug" or "off"
fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("chatty"), None);
    }

    #[test]
    fn test_module_filters_are_not_levels() {
        assert_eq!(parse_level("tapswpr=debug"), None);
        assert_eq!(parse_level("info,tapswpr::tps_board=trace"), None);
    }
}
