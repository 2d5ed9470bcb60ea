// src/core/html.rs
// DOM helpers over `scraper`. Text extraction mirrors what a reader sees:
// every text node trimmed, empty ones dropped, joined with single spaces.

use scraper::{ElementRef, Node, Selector};

use super::sanitize::normalize_ws;

/// Compile a selector known at build time. Only used with crate constants
/// and literals, which are valid CSS.
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

/// Normalized visible text of an element.
pub fn text_of(el: ElementRef<'_>) -> String {
    let parts: Vec<&str> = el.text().map(str::trim).filter(|t| !t.is_empty()).collect();
    normalize_ws(&parts.join(" "))
}

/// Normalized visible text, skipping any descendant subtree matching `skip`.
pub fn text_excluding(el: ElementRef<'_>, skip: &Selector) -> String {
    let mut parts = Vec::new();
    collect_text(el, skip, &mut parts);
    normalize_ws(&parts.join(" "))
}

fn collect_text<'a>(el: ElementRef<'a>, skip: &Selector, out: &mut Vec<&'a str>) {
    for child in el.children() {
        match child.value() {
            Node::Text(t) => {
                let t = t.trim();
                if !t.is_empty() { out.push(t); }
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    if !skip.matches(&child_el) {
                        collect_text(child_el, skip, out);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Raw identifier from an in-page hash link (`#abc` → `abc`).
/// Anything else is not an entity reference.
pub fn hash_id(href: &str) -> Option<&str> {
    let rid = href.trim().strip_prefix('#')?.trim();
    if rid.is_empty() { None } else { Some(rid) }
}

/// Normalized attribute value, `None` when missing or blank.
pub fn attr(el: ElementRef<'_>, name: &str) -> Option<String> {
    el.value().attr(name).map(normalize_ws).filter(|v| !v.is_empty())
}
