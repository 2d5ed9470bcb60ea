// src/log.rs
//! Append-only debug log at `config::consts::LOG_FILE`.
//!
//! Lines look like `[00:00:01.250][INFO] Decoded 42 tables ...`, the stamp
//! being time since the first log call. Write failures are ignored.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use crate::config::consts::LOG_FILE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Error => "ERROR",
        }
    }
}

static WRITE: Mutex<()> = Mutex::new(());
static EPOCH: OnceLock<Instant> = OnceLock::new();

fn stamp(ms: u128) -> String {
    let ms = ms as u64;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        ms / 3_600_000,
        ms / 60_000 % 60,
        ms / 1_000 % 60,
        ms % 1_000
    )
}

fn format_line(level: Level, elapsed_ms: u128, msg: &str) -> String {
    format!("[{}][{}] {msg}\n", stamp(elapsed_ms), level.as_str())
}

pub fn write(level: Level, msg: &str) {
    let elapsed = EPOCH.get_or_init(Instant::now).elapsed().as_millis();
    let line = format_line(level, elapsed, msg);

    let Ok(_guard) = WRITE.lock() else { return };
    let path = Path::new(LOG_FILE);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        let _ = fs::create_dir_all(dir);
    }
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = file.write_all(line.as_bytes());
    }
}

/// Info: run summaries, discovered URLs.
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        $crate::log::write($crate::log::Level::Info, &format!($($arg)*))
    };
}

/// Debug: layout anomalies inside tables.
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        $crate::log::write($crate::log::Level::Debug, &format!($($arg)*))
    };
}

/// Error: failed requests, fallbacks, failed runs.
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        $crate::log::write($crate::log::Level::Error, &format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_is_zero_padded() {
        assert_eq!(stamp(0), "00:00:00.000");
        assert_eq!(stamp(3_723_004), "01:02:03.004");
    }

    #[test]
    fn line_carries_level() {
        assert_eq!(
            format_line(Level::Debug, 1_250, "table 7: no body"),
            "[00:00:01.250][DEBUG] table 7: no body\n"
        );
    }
}
