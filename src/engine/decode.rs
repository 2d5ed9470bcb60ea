// src/engine/decode.rs
//! One timetable table → lesson records.
//!
//! Columns 0 and 1 of every body row carry the lesson number and the time
//! range. After them the header lists the days; each day owns a block of
//! 2 or 3 columns:
//!
//! | block | layout | tables |
//! |---|---|---|
//! | 3 wide | subject (+ group) · teacher · room | class |
//! | 2 wide | subject (+ group) · room | teacher |
//! | 2 wide | subject (+ group) · teacher | room |
//!
//! The table's own entity fills whichever role the layout leaves out.

use crate::core::html::hash_id;
use crate::core::sanitize::{normalize_time, normalize_ws};

use super::grid::{self, GridCell, GridRow};
use super::marks::{append_mark, trailing_mark};
use super::registry::EntityRegistry;
use super::types::{CellData, Domain, EntityRef, HeaderCell, Lesson, RawTable};

/// A day heading and the grid columns it covers.
#[derive(Clone, Debug, PartialEq)]
pub struct DayColumn {
    pub day: String,
    pub start: usize,
    pub span: usize,
}

impl DayColumn {
    fn is_supported(&self) -> bool {
        matches!(self.span, 2 | 3)
    }
}

/// Day columns from the header row. The first two header cells label the
/// lesson-number and time columns; blank headings still consume columns.
pub fn day_columns(header: &[HeaderCell]) -> Vec<DayColumn> {
    if header.len() < 3 {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut col = 2;
    for cell in &header[2..] {
        let day = normalize_ws(&cell.text);
        let span = cell.col_span.max(1);
        if !day.is_empty() {
            out.push(DayColumn { day, start: col, span });
        }
        col += span;
    }
    out
}

struct Slot {
    lesson_num: String,
    time: String,
}

/// What the subject cell holds besides the subject itself.
#[derive(Default)]
struct SubjectParts {
    subject: Option<String>,
    group: Option<EntityRef>,
    mark: Option<String>,
}

/// Decode `table`, which describes `self_ref` of kind `domain`.
/// Inline references discovered along the way are registered in `registry`.
pub fn decode_table(
    table: &RawTable,
    domain: Domain,
    self_ref: &EntityRef,
    registry: &mut EntityRegistry,
) -> Vec<Lesson> {
    let Some(header) = table.header.as_deref() else {
        logd!("table {}: no header row; skipped", table.id);
        return Vec::new();
    };
    let Some(body) = table.body.as_deref() else {
        logd!("table {}: no body; skipped", table.id);
        return Vec::new();
    };

    let days = day_columns(header);
    for d in days.iter().filter(|d| !d.is_supported()) {
        logd!("table {}: day {:?} spans {} columns; ignored", table.id, d.day, d.span);
    }

    let grid = grid::expand(body);
    let mut out = Vec::new();

    for row in grid.rows() {
        let lesson_num = row_text(row, 0);
        let time = normalize_time(&row_text(row, 1));
        if lesson_num.is_empty() || time.is_empty() {
            continue;
        }
        let slot = Slot { lesson_num, time };

        for day in days.iter().filter(|d| d.is_supported()) {
            if let Some(lesson) = decode_block(row, day, &slot, domain, self_ref, registry) {
                out.push(lesson);
            }
        }
    }

    out
}

fn row_text(row: &GridRow<'_, CellData>, col: usize) -> String {
    row.get(&col).map(|c| normalize_ws(&c.content.text)).unwrap_or_default()
}

fn decode_block(
    row: &GridRow<'_, CellData>,
    day: &DayColumn,
    slot: &Slot,
    domain: Domain,
    self_ref: &EntityRef,
    registry: &mut EntityRegistry,
) -> Option<Lesson> {
    let block: Vec<Option<GridCell<'_, CellData>>> =
        (0..day.span).map(|i| row.get(&(day.start + i)).copied()).collect();

    // The whole block continues a rowspan from an earlier row: already emitted.
    let mut present = block.iter().flatten().peekable();
    if present.peek().is_some() && present.all(|c| c.inherited) {
        return None;
    }

    let parts = parse_subject(block[0].map(|c| c.content), registry);
    let has_core = parts.subject.is_some() || parts.group.is_some();

    let (teacher, room, group) = if day.span == 3 {
        let teacher = reference(block[1], Domain::Teacher, registry);
        let room = reference(block[2], Domain::Room, registry);
        if !has_core && teacher.is_none() && room.is_none() {
            return None;
        }
        let group = parts
            .group
            .clone()
            .or_else(|| (domain == Domain::Class).then(|| self_ref.clone()));
        (teacher, room, group)
    } else {
        match domain {
            Domain::Teacher => {
                let room = reference(block[1], Domain::Room, registry);
                if !has_core && room.is_none() {
                    return None;
                }
                (Some(self_ref.clone()), room, parts.group.clone())
            }
            Domain::Room => {
                let teacher = reference(block[1], Domain::Teacher, registry);
                if !has_core && teacher.is_none() {
                    return None;
                }
                (teacher, Some(self_ref.clone()), parts.group.clone())
            }
            Domain::Class => {
                if !has_core {
                    return None;
                }
                (None, None, parts.group.clone().or_else(|| Some(self_ref.clone())))
            }
        }
    };

    let subject_base = parts.subject.unwrap_or_default();
    let subject = match &parts.mark {
        Some(mark) if !subject_base.is_empty() => append_mark(&subject_base, mark),
        _ => subject_base.clone(),
    };

    if subject.is_empty() && teacher.is_none() && room.is_none() && group.is_none() {
        return None;
    }

    Some(Lesson {
        day: day.day.clone(),
        lesson_num: slot.lesson_num.clone(),
        time: slot.time.clone(),
        subject,
        teacher,
        room,
        group,
        source: domain,
        subject_base,
        mark: parts.mark,
    })
}

/// Subject text, nested class group and the group's subgroup mark.
fn parse_subject(cell: Option<&CellData>, registry: &mut EntityRegistry) -> SubjectParts {
    let Some(cell) = cell else {
        return SubjectParts::default();
    };

    let subject = Some(normalize_ws(&cell.text)).filter(|s| !s.is_empty());
    let (group, mark) = match &cell.group {
        Some(block) => {
            let group = block.link.as_ref().and_then(|link| {
                let raw = hash_id(&link.href)?;
                registry.resolve(Domain::Class, raw, &link.label)
            });
            (group, trailing_mark(&block.text))
        }
        None => (None, None),
    };

    SubjectParts { subject, group, mark }
}

/// Entity linked from a teacher or room cell. Links without a usable hash
/// id are dropped.
fn reference(
    cell: Option<GridCell<'_, CellData>>,
    domain: Domain,
    registry: &mut EntityRegistry,
) -> Option<EntityRef> {
    let link = cell?.content.link.as_ref()?;
    let raw = hash_id(&link.href)?;
    registry.resolve(domain, raw, &link.label)
}
