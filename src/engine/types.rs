// src/engine/types.rs
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/* ---------------- Entities ---------------- */

/// Which kind of entity a table (or a reference) describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Domain {
    Teacher,
    Room,
    Class,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Teacher, Domain::Room, Domain::Class];

    /// One-letter prefix of canonical ids.
    pub fn prefix(self) -> char {
        match self {
            Domain::Teacher => 'n',
            Domain::Room => 's',
            Domain::Class => 'o',
        }
    }

    /// Domain a canonical id belongs to, read from its prefix.
    pub fn of_id(id: &str) -> Option<Domain> {
        let first = id.chars().next()?;
        Domain::ALL.into_iter().find(|d| d.prefix() == first)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Domain::Teacher => 0,
            Domain::Room => 1,
            Domain::Class => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/* ---------------- Lessons ---------------- */

/// One occupied slot as seen from one source table.
///
/// `source`, `subject_base` and `mark` are bookkeeping for the subgroup
/// reconciler and never leave the crate's internal form.
#[derive(Clone, Debug, PartialEq)]
pub struct Lesson {
    pub day: String,
    pub lesson_num: String,
    pub time: String,
    pub subject: String,
    pub teacher: Option<EntityRef>,
    pub room: Option<EntityRef>,
    pub group: Option<EntityRef>,
    pub source: Domain,
    /// Subject text before any subgroup mark was appended.
    pub subject_base: String,
    pub mark: Option<String>,
}

/// Canonical id → lessons, in the order ids were first inserted.
#[derive(Clone, Debug, Default)]
pub struct TimetableSet {
    entries: Vec<(String, Vec<Lesson>)>,
    index: HashMap<String, usize>,
}

impl TimetableSet {
    pub fn new() -> Self { Self::default() }

    /// Store `lessons` under `id`, replacing any earlier list for that id.
    pub fn insert(&mut self, id: &str, lessons: Vec<Lesson>) {
        match self.index.get(id) {
            Some(&i) => self.entries[i].1 = lessons,
            None => {
                self.index.insert(id.to_string(), self.entries.len());
                self.entries.push((id.to_string(), lessons));
            }
        }
    }

    /// Make sure `id` has an entry, empty if nothing was decoded for it.
    pub fn ensure(&mut self, id: &str) {
        if !self.index.contains_key(id) {
            self.insert(id, Vec::new());
        }
    }

    pub fn get(&self, id: &str) -> Option<&[Lesson]> {
        self.index.get(id).map(|&i| self.entries[i].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Lesson])> {
        self.entries.iter().map(|(id, l)| (id.as_str(), l.as_slice()))
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn lesson_count(&self) -> usize {
        self.entries.iter().map(|(_, l)| l.len()).sum()
    }

    pub(crate) fn lists(&self) -> &[(String, Vec<Lesson>)] { &self.entries }

    pub(crate) fn lesson_mut(&mut self, list: usize, pos: usize) -> &mut Lesson {
        &mut self.entries[list].1[pos]
    }
}

/* ---------------- Raw table (parsed page, engine input) ---------------- */

/// A hyperlink found in a cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Link {
    pub href: String,
    pub label: String,
}

/// The nested class-group block of a subject cell (`div.g` on the page).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupBlock {
    pub link: Option<Link>,
    /// Full normalized text of the block, e.g. `3A (1/2)`.
    pub text: String,
}

/// What the decoder needs from one `<td>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellData {
    /// Visible text without the group block.
    pub text: String,
    /// First link anywhere in the cell.
    pub link: Option<Link>,
    pub group: Option<GroupBlock>,
}

impl CellData {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn linked(href: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            text: label.clone(),
            link: Some(Link { href: href.into(), label }),
            group: None,
        }
    }
}

/// A body cell with its span attributes (both ≥ 1).
#[derive(Clone, Debug, PartialEq)]
pub struct SpanCell<C> {
    pub content: C,
    pub row_span: usize,
    pub col_span: usize,
}

impl<C> SpanCell<C> {
    pub fn new(content: C) -> Self {
        Self { content, row_span: 1, col_span: 1 }
    }

    pub fn spans(content: C, row_span: usize, col_span: usize) -> Self {
        Self { content, row_span: row_span.max(1), col_span: col_span.max(1) }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeaderCell {
    pub text: String,
    pub col_span: usize,
}

/// One timetable table as read from the page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    pub id: String,
    pub caption: String,
    /// Cells of the header row; `None` when the table has no header row.
    pub header: Option<Vec<HeaderCell>>,
    /// Body rows; `None` when the table has no body.
    pub body: Option<Vec<Vec<SpanCell<CellData>>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_prefixes_round_trip() {
        for d in Domain::ALL {
            let id = format!("{}42", d.prefix());
            assert_eq!(Domain::of_id(&id), Some(d));
        }
        assert_eq!(Domain::of_id("x1"), None);
        assert_eq!(Domain::of_id(""), None);
    }

    #[test]
    fn timetable_set_keeps_first_insert_order() {
        let mut set = TimetableSet::new();
        set.insert("o1", Vec::new());
        set.insert("n1", Vec::new());
        set.ensure("o1");
        set.ensure("s1");
        let ids: Vec<&str> = set.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["o1", "n1", "s1"]);
        assert_eq!(set.lesson_count(), 0);
    }
}
