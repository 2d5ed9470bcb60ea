// src/specs/plan.rs
//! Reader for the timetable document.
//!
//! Layout relied upon:
//! - `nav > div` holds section headings (`div.h`) each followed by entity
//!   links (`a.l`, `href="#<raw id>"`);
//! - each timetable is a `table.plan` whose `id` is the raw id of the entity
//!   it describes; day headings live in `thead tr`, slots in `tbody tr`;
//! - a subject cell may nest the class group in `div.g`, e.g.
//!   `<div class="g"><a href="#3">3A</a> (1/2)</div>`;
//! - the footer mentions the generation date as `DD.MM.YYYY`.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::config::consts::{GROUP_BLOCK_SELECTOR, NAV_SELECTOR, TABLE_SELECTOR};
use crate::core::html::{attr, hash_id, selector, text_excluding, text_of};
use crate::core::sanitize::parse_span;
use crate::engine::{
    CellData, Domain, EntityRegistry, GroupBlock, HeaderCell, Link, RawTable, SpanCell,
};
use crate::error::{Result, ScrapeError};

static DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{2}\.\d{2}\.\d{4})").unwrap());

/// Navigation heading keyword → domain, checked in order.
const HEADING_DOMAINS: [(&str, Domain); 3] = [
    ("oddzia", Domain::Class),
    ("nauczyc", Domain::Teacher),
    ("sale", Domain::Room),
];

fn heading_domain(text: &str) -> Option<Domain> {
    let lower = text.to_lowercase();
    HEADING_DOMAINS
        .iter()
        .find(|(kw, _)| lower.contains(kw))
        .map(|&(_, d)| d)
}

fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Build the registry from the navigation lists.
pub fn read_navigation(doc: &Html) -> Result<EntityRegistry> {
    let nav = doc
        .select(&selector(NAV_SELECTOR))
        .next()
        .ok_or(ScrapeError::NavigationMissing)?;

    let mut registry = EntityRegistry::new();
    let mut current: Option<Domain> = None;

    for el in nav.children().filter_map(ElementRef::wrap) {
        match el.value().name() {
            "div" if has_class(el, "h") => current = heading_domain(&text_of(el)),
            "a" if has_class(el, "l") => {
                let Some(domain) = current else { continue };
                let Some(raw) = el.value().attr("href").and_then(hash_id) else { continue };
                registry.resolve(domain, raw, &text_of(el));
            }
            _ => {}
        }
    }

    logf!(
        "Entities: {} teachers, {} rooms, {} classes",
        registry.len(Domain::Teacher),
        registry.len(Domain::Room),
        registry.len(Domain::Class)
    );
    Ok(registry)
}

/// Every `table.plan` in document order, including ones without an id.
pub fn read_tables(doc: &Html) -> Vec<RawTable> {
    doc.select(&selector(TABLE_SELECTOR)).map(read_table).collect()
}

pub fn read_table(table: ElementRef<'_>) -> RawTable {
    let caption = table
        .select(&selector("caption"))
        .next()
        .map(text_of)
        .unwrap_or_default();

    let header = table.select(&selector("thead tr")).next().map(|tr| {
        row_cells(tr)
            .map(|c| HeaderCell { text: text_of(c), col_span: parse_span(c.value().attr("colspan")) })
            .collect()
    });

    let body = table.select(&selector("tbody")).next().map(|tbody| {
        tbody
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "tr")
            .map(|tr| {
                row_cells(tr)
                    .map(|td| SpanCell {
                        content: read_cell(td),
                        row_span: parse_span(td.value().attr("rowspan")),
                        col_span: parse_span(td.value().attr("colspan")),
                    })
                    .collect()
            })
            .collect()
    });

    RawTable {
        id: attr(table, "id").unwrap_or_default(),
        caption,
        header,
        body,
    }
}

/// Direct `td`/`th` children of a row.
fn row_cells<'a>(tr: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
}

pub fn read_cell(td: ElementRef<'_>) -> CellData {
    let group_sel = selector(GROUP_BLOCK_SELECTOR);

    let group = td.select(&group_sel).next().map(|g| GroupBlock {
        link: first_link(g),
        text: text_of(g),
    });

    CellData {
        text: text_excluding(td, &group_sel),
        link: first_link(td),
        group,
    }
}

fn first_link(el: ElementRef<'_>) -> Option<Link> {
    el.select(&selector("a[href]")).next().map(|a| Link {
        href: a.value().attr("href").unwrap_or_default().to_string(),
        label: text_of(a),
    })
}

/// `DD.MM.YYYY` from the footer, empty when absent.
pub fn read_generation_date(doc: &Html) -> String {
    doc.select(&selector("footer"))
        .next()
        .map(text_of)
        .and_then(|txt| DATE.captures(&txt).map(|c| c[1].to_string()))
        .unwrap_or_default()
}
