// src/error.rs
//! Scrape-level failures.
//!
//! Data-quality problems inside a table (odd spans, dangling links, ambiguous
//! subgroups) never surface here; the decoder degrades and logs instead. Only
//! transport problems and structural absence of the whole input are errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("navigation block (nav > div) with class/teacher/room lists not found")]
    NavigationMissing,

    #[error("navigation block lists no classes, teachers or rooms")]
    NoEntities,

    #[error("document contains no timetable tables")]
    NoTables,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;
