// src/engine/registry.rs
//! Canonical ids for teachers, rooms and classes.
//!
//! Populated by the navigation pass, grown further while tables are decoded
//! (inline references), read-only by the time subgroups are reconciled. One
//! registry lives for exactly one scrape and is passed explicitly.

use std::collections::{BTreeMap, HashMap};

use crate::core::sanitize::normalize_ws;
use super::types::{Domain, EntityRef};

#[derive(Clone, Debug, Default)]
struct DomainTable {
    /// normalized raw id → canonical id
    by_raw: HashMap<String, String>,
    /// canonical id → display name
    names: HashMap<String, String>,
    /// canonical ids in discovery order
    order: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct EntityRegistry {
    tables: [DomainTable; 3],
}

impl EntityRegistry {
    pub fn new() -> Self { Self::default() }

    /// Canonical reference for `raw_id` in `domain`, allocating on first sight.
    ///
    /// Returns `None` when the raw id is blank after normalization. The stored
    /// name is the first non-empty label; a placeholder name (the raw id
    /// itself) is upgraded once a real label shows up.
    pub fn resolve(&mut self, domain: Domain, raw_id: &str, label: &str) -> Option<EntityRef> {
        let raw = normalize_ws(raw_id);
        if raw.is_empty() {
            return None;
        }
        let label = normalize_ws(label);
        let table = &mut self.tables[domain.index()];

        let canon = match table.by_raw.get(&raw) {
            Some(c) => c.clone(),
            None => {
                let c = s!("{}{}", domain.prefix(), raw);
                table.by_raw.insert(raw.clone(), c.clone());
                table.order.push(c.clone());
                c
            }
        };

        let name = table.names.entry(canon.clone()).or_insert_with(|| raw.clone());
        if *name == raw && !label.is_empty() {
            *name = label;
        }

        Some(EntityRef { id: canon, name: name.clone() })
    }

    /// Canonical id for an already-known raw id.
    pub fn lookup(&self, domain: Domain, raw_id: &str) -> Option<&str> {
        self.tables[domain.index()]
            .by_raw
            .get(&normalize_ws(raw_id))
            .map(String::as_str)
    }

    /// First domain (class, teacher, room) that knows `raw_id`.
    pub fn domain_of_raw(&self, raw_id: &str) -> Option<Domain> {
        [Domain::Class, Domain::Teacher, Domain::Room]
            .into_iter()
            .find(|&d| self.lookup(d, raw_id).is_some())
    }

    pub fn name(&self, domain: Domain, canon: &str) -> Option<&str> {
        self.tables[domain.index()].names.get(canon).map(String::as_str)
    }

    /// Canonical ids of `domain` in discovery order.
    pub fn ids(&self, domain: Domain) -> impl Iterator<Item = &str> {
        self.tables[domain.index()].order.iter().map(String::as_str)
    }

    /// id → name map for output.
    pub fn names(&self, domain: Domain) -> BTreeMap<String, String> {
        self.tables[domain.index()]
            .names
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self, domain: Domain) -> usize {
        self.tables[domain.index()].order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(|t| t.order.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_prefixed_and_names_fall_back_to_raw() {
        let mut reg = EntityRegistry::new();
        let t = reg.resolve(Domain::Teacher, "7", "Jan Kowalski").unwrap();
        assert_eq!(t, EntityRef::new("n7", "Jan Kowalski"));

        let r = reg.resolve(Domain::Room, "12", "").unwrap();
        assert_eq!(r, EntityRef::new("s12", "12"));

        let c = reg.resolve(Domain::Class, " 3 ", "3TI").unwrap();
        assert_eq!(c.id, "o3");
    }

    #[test]
    fn blank_raw_id_yields_nothing() {
        let mut reg = EntityRegistry::new();
        assert!(reg.resolve(Domain::Class, "   ", "1A").is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn resolve_is_idempotent_and_first_label_wins() {
        let mut reg = EntityRegistry::new();
        let a = reg.resolve(Domain::Teacher, "5", "AB").unwrap();
        let b = reg.resolve(Domain::Teacher, "5", "Anna Bąk").unwrap();
        let c = reg.resolve(Domain::Teacher, "5  ", "").unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(b.id, c.id);
        assert_eq!(c.name, "AB");
        assert_eq!(reg.len(Domain::Teacher), 1);
    }

    #[test]
    fn placeholder_name_is_upgraded() {
        let mut reg = EntityRegistry::new();
        assert_eq!(reg.resolve(Domain::Room, "104", "").unwrap().name, "104");
        assert_eq!(reg.resolve(Domain::Room, "104", "104 pracownia").unwrap().name, "104 pracownia");
        assert_eq!(reg.resolve(Domain::Room, "104", "other").unwrap().name, "104 pracownia");
    }

    #[test]
    fn whitespace_variants_share_an_id() {
        let mut reg = EntityRegistry::new();
        let a = reg.resolve(Domain::Class, "2 TE", "2TE").unwrap();
        let b = reg.resolve(Domain::Class, "2\u{a0}\tTE", "").unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(reg.lookup(Domain::Class, " 2  TE"), Some("o2 TE"));
    }

    #[test]
    fn domains_are_independent() {
        let mut reg = EntityRegistry::new();
        reg.resolve(Domain::Teacher, "1", "T");
        reg.resolve(Domain::Class, "1", "C");
        assert_eq!(reg.domain_of_raw("1"), Some(Domain::Class));
        assert_eq!(reg.name(Domain::Teacher, "n1"), Some("T"));
        assert_eq!(reg.lookup(Domain::Class, "1"), Some("o1"));
        assert_eq!(reg.name(Domain::Class, "o1"), Some("C"));
        let order: Vec<&str> = reg.ids(Domain::Teacher).collect();
        assert_eq!(order, ["n1"]);
    }
}
