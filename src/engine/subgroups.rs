// src/engine/subgroups.rs
//! Backfill subgroup marks onto class-table lessons.
//!
//! A split class shows up as several marked rows in teacher and room tables
//! but often as unmarked (or merged) rows in its own class table. Lessons
//! describing the same slot share a `LessonKey`; marks observed in teacher
//! tables (falling back to room tables) for that key are handed to the
//! unmarked class lessons.
//!
//! Best effort: when the candidates cannot be matched one-to-one the lessons
//! stay unmarked and are only counted as ambiguous.

use std::collections::HashMap;

use crate::core::sanitize::normalize_ws;

use super::marks::{append_mark, match_form, relabel_group, sort_marks};
use super::types::{Domain, EntityRef, Lesson, TimetableSet};

/// Identity of a slot across views. Deliberately mark-free: the subject
/// part is `match_form(subject_base)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LessonKey {
    pub group_id: String,
    pub day: String,
    pub lesson_num: String,
    pub time: String,
    pub subject: String,
    pub teacher_id: String,
    pub room_id: String,
}

impl LessonKey {
    pub fn of(lesson: &Lesson) -> Self {
        let id = |r: &Option<EntityRef>| r.as_ref().map(|e| e.id.clone()).unwrap_or_default();
        let subject = if lesson.subject_base.is_empty() { &lesson.subject } else { &lesson.subject_base };
        Self {
            group_id: id(&lesson.group),
            day: lesson.day.clone(),
            lesson_num: lesson.lesson_num.clone(),
            time: lesson.time.clone(),
            subject: match_form(subject),
            teacher_id: id(&lesson.teacher),
            room_id: id(&lesson.room),
        }
    }
}

/// Marks seen per key in teacher tables and in room tables. Built once,
/// read-only afterwards.
#[derive(Debug, Default)]
pub struct SubgroupPools {
    pub teacher: HashMap<LessonKey, Vec<String>>,
    pub room: HashMap<LessonKey, Vec<String>>,
}

impl SubgroupPools {
    pub fn build(set: &TimetableSet) -> Self {
        let mut pools = Self::default();
        for (_, lessons) in set.iter() {
            for lesson in lessons {
                let Some(mark) = offered_mark(lesson) else { continue };
                let pool = match lesson.source {
                    Domain::Teacher => &mut pools.teacher,
                    Domain::Room => &mut pools.room,
                    Domain::Class => continue,
                };
                pool.entry(LessonKey::of(lesson)).or_default().push(mark);
            }
        }
        pools
    }

    /// Teacher-table marks for `key`, else room-table marks, else nothing.
    pub fn candidates(&self, key: &LessonKey) -> &[String] {
        self.teacher
            .get(key)
            .filter(|m| !m.is_empty())
            .or_else(|| self.room.get(key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Class lessons that received a mark.
    pub assigned: usize,
    /// Class lessons left unmarked because candidates did not line up.
    pub ambiguous: usize,
}

pub fn reconcile(set: &mut TimetableSet) -> ReconcileReport {
    let pools = SubgroupPools::build(set);

    // unmarked class lessons grouped by key, keys in discovery order
    let mut order: Vec<LessonKey> = Vec::new();
    let mut by_key: HashMap<LessonKey, Vec<(usize, usize)>> = HashMap::new();
    for (li, (_, lessons)) in set.lists().iter().enumerate() {
        for (pi, lesson) in lessons.iter().enumerate() {
            if !needs_mark(lesson) {
                continue;
            }
            let key = LessonKey::of(lesson);
            let slots = by_key.entry(key.clone()).or_default();
            if slots.is_empty() {
                order.push(key);
            }
            slots.push((li, pi));
        }
    }

    let mut report = ReconcileReport::default();
    for key in &order {
        let slots = &by_key[key];
        let mut marks: Vec<String> = pools
            .candidates(key)
            .iter()
            .map(|m| normalize_ws(m))
            .filter(|m| !m.is_empty())
            .collect();
        if marks.is_empty() {
            continue;
        }

        let mut distinct = marks.clone();
        distinct.sort();
        distinct.dedup();

        if distinct.len() == 1 {
            for &(li, pi) in slots {
                apply_mark(set.lesson_mut(li, pi), &distinct[0]);
            }
            report.assigned += slots.len();
        } else if marks.len() == slots.len() {
            // pairs sorted marks with class lessons in discovery order
            sort_marks(&mut marks);
            for (&(li, pi), mark) in slots.iter().zip(&marks) {
                apply_mark(set.lesson_mut(li, pi), mark);
            }
            report.assigned += slots.len();
        } else {
            logd!(
                "ambiguous subgroups for {} {} #{} {:?}: {} lessons, marks {:?}",
                key.group_id, key.day, key.lesson_num, key.subject, slots.len(), marks
            );
            report.ambiguous += slots.len();
        }
    }

    report
}

/// Give `lesson` subgroup `mark`, updating subject and group label.
pub fn apply_mark(lesson: &mut Lesson, mark: &str) {
    let mark = normalize_ws(mark);
    if mark.is_empty() {
        return;
    }
    if !lesson.subject.is_empty() {
        lesson.subject = append_mark(&lesson.subject, &mark);
    }
    if let Some(group) = lesson.group.as_mut() {
        if !group.name.is_empty() {
            group.name = relabel_group(&group.name, &mark);
        }
    }
    lesson.mark = Some(mark);
}

/// Unmarked class-table lesson of a class group: a reconciliation target.
fn needs_mark(lesson: &Lesson) -> bool {
    lesson.source == Domain::Class && lesson_mark(lesson).is_none() && has_class_group(lesson)
}

/// Mark a teacher or room lesson of a class group contributes to the pools.
fn offered_mark(lesson: &Lesson) -> Option<String> {
    if lesson.source == Domain::Class || !has_class_group(lesson) {
        return None;
    }
    lesson_mark(lesson)
}

fn lesson_mark(lesson: &Lesson) -> Option<String> {
    lesson.mark.as_deref().map(normalize_ws).filter(|m| !m.is_empty())
}

fn has_class_group(lesson: &Lesson) -> bool {
    lesson.group.as_ref().is_some_and(|g| Domain::of_id(&g.id) == Some(Domain::Class))
}
