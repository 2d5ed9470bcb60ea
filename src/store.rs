// src/store.rs
//! Output document: the public JSON shape of a scrape, plus load/save.
//!
//! Internal `Lesson` fields (origin domain, base subject, mark) are dropped
//! here; only the public projection is serialized.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::engine::{Domain, EntityRef, EntityRegistry, Lesson, TimetableSet};
use crate::error::Result;
use crate::file::write_atomic;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub scraped_on: String,
    /// `DD.MM.YYYY` from the page footer, empty when absent.
    #[serde(default)]
    pub generation_date_from_page: String,
}

/// A lesson as published. Field order is the serialized key order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicLesson {
    pub day: String,
    pub lesson_num: String,
    pub time: String,
    pub subject: String,
    pub teacher: Option<EntityRef>,
    pub group: Option<EntityRef>,
    pub room: Option<EntityRef>,
}

impl From<&Lesson> for PublicLesson {
    fn from(l: &Lesson) -> Self {
        Self {
            day: l.day.clone(),
            lesson_num: l.lesson_num.clone(),
            time: l.time.clone(),
            subject: l.subject.clone(),
            teacher: l.teacher.clone(),
            group: l.group.clone(),
            room: l.room.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimetableData {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub teachers: BTreeMap<String, String>,
    #[serde(default)]
    pub rooms: BTreeMap<String, String>,
    #[serde(default)]
    pub classes: BTreeMap<String, String>,
    #[serde(default)]
    pub timetables: BTreeMap<String, Vec<PublicLesson>>,
}

impl TimetableData {
    /// Project registry and timetables into the output document.
    pub fn assemble(registry: &EntityRegistry, set: &TimetableSet, metadata: Metadata) -> Self {
        let timetables = set
            .iter()
            .map(|(id, lessons)| (id.to_string(), lessons.iter().map(PublicLesson::from).collect()))
            .collect();

        Self {
            metadata,
            teachers: registry.names(Domain::Teacher),
            rooms: registry.names(Domain::Room),
            classes: registry.names(Domain::Class),
            timetables,
        }
    }

    pub fn lesson_count(&self) -> usize {
        self.timetables.values().map(Vec::len).sum()
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Atomically write the document to `path`.
    pub fn save(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = self.to_json(pretty)?;
        write_atomic(path, json.as_bytes())?;
        logf!("Saved {} timetables to {}", self.timetables.len(), path.display());
        Ok(())
    }

    /// Load a previously saved snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (EntityRegistry, TimetableSet) {
        let mut reg = EntityRegistry::new();
        let class = reg.resolve(Domain::Class, "3", "3A").unwrap();
        let teacher = reg.resolve(Domain::Teacher, "7", "Kowalski").unwrap();
        reg.resolve(Domain::Room, "21", "21").unwrap();

        let lesson = Lesson {
            day: s!("Poniedziałek"),
            lesson_num: s!("1"),
            time: s!("8:00 - 8:45"),
            subject: s!("j.ang-1/2"),
            teacher: Some(teacher),
            room: None,
            group: Some(class.clone()),
            source: Domain::Class,
            subject_base: s!("j.ang"),
            mark: Some(s!("1/2")),
        };
        let mut set = TimetableSet::new();
        set.insert("o3", vec![lesson]);
        set.ensure("n7");
        set.ensure("s21");
        (reg, set)
    }

    #[test]
    fn assemble_projects_public_fields_only() {
        let (reg, set) = sample();
        let data = TimetableData::assemble(&reg, &set, Metadata::default());

        assert_eq!(data.classes.get("o3").map(String::as_str), Some("3A"));
        assert_eq!(data.teachers.len(), 1);
        assert_eq!(data.timetables.len(), 3);
        assert_eq!(data.lesson_count(), 1);
        assert!(data.timetables["n7"].is_empty());

        let json: serde_json::Value = serde_json::from_str(&data.to_json(false).unwrap()).unwrap();
        let lesson = &json["timetables"]["o3"][0];
        let keys: Vec<&str> = lesson.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 7);
        assert!(lesson.get("mark").is_none());
        assert!(lesson.get("subject_base").is_none());
        assert_eq!(lesson["room"], serde_json::Value::Null);
        assert_eq!(lesson["teacher"]["id"], "n7");
    }

    #[test]
    fn non_ascii_is_written_verbatim() {
        let (reg, set) = sample();
        let data = TimetableData::assemble(&reg, &set, Metadata::default());
        assert!(data.to_json(true).unwrap().contains("Poniedziałek"));
    }

    #[test]
    fn save_then_load() {
        let (reg, set) = sample();
        let meta = Metadata {
            source: s!("https://plan.example/"),
            scraped_on: s!("2024-09-01T08:00:00+02:00"),
            generation_date_from_page: s!("30.08.2024"),
        };
        let data = TimetableData::assemble(&reg, &set, meta);
        let path = std::env::temp_dir()
            .join(format!("plan_scrape_store_{}", std::process::id()))
            .join("timetable_data.json");

        data.save(&path, true).unwrap();
        assert_eq!(TimetableData::load(&path).unwrap(), data);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
