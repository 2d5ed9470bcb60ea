// src/engine/mod.rs
//! # Timetable engine
//!
//! Pure, synchronous decoding of already-parsed timetable tables. Nothing in
//! here touches the network or the filesystem, and nothing returns an error
//! for data-quality problems: odd layouts are skipped and logged.
//!
//! ## Flow
//! ```text
//! RawTable ─ grid::expand ─▶ Grid ─ decode::decode_table ─▶ Vec<Lesson>
//!                                       │ (registry::EntityRegistry)
//! TimetableSet ─ subgroups::reconcile ─▶ TimetableSet (marks backfilled)
//! ```
//!
//! ## Pieces
//! - `registry` – canonical ids + display names per domain.
//! - `grid` – rowspan/colspan expansion into a dense occupancy grid.
//! - `decode` – one table → lesson records, per day block.
//! - `marks` – text rules for subgroup marks (append, strip, order).
//! - `subgroups` – cross-view backfill of marks onto class-table lessons.
pub mod decode;
pub mod grid;
pub mod marks;
pub mod registry;
pub mod subgroups;
pub mod types;

pub use registry::EntityRegistry;
pub use types::*;
