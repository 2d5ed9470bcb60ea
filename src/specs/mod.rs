// src/specs/mod.rs
//! # Page readers
//!
//! Each module here knows *where the ground truth lives in one page's HTML*
//! and turns it into crate types. Nothing here fetches, caches or writes.
//!
//! ## Pages
//! - `landing` – the CMS page that embeds the timetable in an iframe; yields
//!   the real timetable URL.
//! - `plan` – the timetable document itself: the navigation lists
//!   (classes, teachers, rooms), every `table.plan`, and the footer date.
//!
//! ## Conventions
//! - Parse once with `scraper::Html`, select with CSS, read text through
//!   `core::html` so whitespace and NBSP handling is uniform.
//! - Tables leave this layer as `engine::RawTable`; the engine never sees DOM
//!   nodes, so it can be tested with hand-built tables.
//! - Missing optional structure (caption, thead, tbody, footer) is not an
//!   error. Only a missing navigation block is (see `plan::read_navigation`).
//!
//! ## Testing notes
//! Readers are tested offline against inline HTML fragments and the fixture
//! under `tests/fixtures/`.
pub mod landing;
pub mod plan;
