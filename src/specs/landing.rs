// src/specs/landing.rs
//! The landing page embeds the timetable as an iframe: the one with id
//! `planIframe`, else the first iframe on the page. If that iframe has no
//! `src` the caller falls back to its configured URL.

use reqwest::Url;
use scraper::Html;

use crate::config::consts::PLAN_IFRAME_ID;
use crate::core::html::{attr, selector};

/// Absolute timetable URL from the landing page, resolved against `base`
/// (the landing page's final URL).
pub fn find_plan_url(doc: &Html, base: &str) -> Option<String> {
    let by_id = selector(&format!("iframe#{PLAN_IFRAME_ID}"));
    let any = selector("iframe");

    let frame = doc.select(&by_id).next().or_else(|| doc.select(&any).next())?;
    let src = attr(frame, "src")?;

    let base = Url::parse(base).ok()?;
    base.join(&src).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_plan_iframe_and_resolves_relative_src() {
        let doc = Html::parse_document(
            r#"<body><iframe src="/ads"></iframe><iframe id="planIframe" src="plan/index.html"></iframe></body>"#,
        );
        assert_eq!(
            find_plan_url(&doc, "https://school.example/plan-lekcji/").as_deref(),
            Some("https://school.example/plan-lekcji/plan/index.html")
        );
    }

    #[test]
    fn falls_back_to_first_iframe() {
        let doc = Html::parse_document(
            r#"<body><iframe src="https://plan.example/"></iframe><iframe src="/other"></iframe></body>"#,
        );
        assert_eq!(
            find_plan_url(&doc, "https://school.example/").as_deref(),
            Some("https://plan.example/")
        );
    }

    #[test]
    fn chosen_iframe_without_src_yields_nothing() {
        let doc = Html::parse_document(
            r#"<body><iframe src="/ads"></iframe><iframe id="planIframe"></iframe></body>"#,
        );
        assert_eq!(find_plan_url(&doc, "https://school.example/"), None);

        let doc = Html::parse_document(
            r#"<body><iframe></iframe><iframe src="https://plan.example/"></iframe></body>"#,
        );
        assert_eq!(find_plan_url(&doc, "https://school.example/"), None);
    }

    #[test]
    fn no_iframe_means_none() {
        let doc = Html::parse_document("<body><p>Plan</p></body>");
        assert_eq!(find_plan_url(&doc, "https://school.example/"), None);
    }
}
