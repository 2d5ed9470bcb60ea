// src/runner.rs
use std::{fs, path::PathBuf};

use scraper::Html;

use crate::{
    config::options::{AppOptions, FetchOptions},
    core::{charset::decode_html, net::Fetcher},
    engine::{
        decode::decode_table, subgroups::reconcile, Domain, EntityRegistry, TimetableSet,
    },
    error::{Result, ScrapeError},
    progress::{NullProgress, Progress},
    specs::{landing, plan},
    store::{Metadata, TimetableData},
};

/// Counters describing one decoded document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// `table.plan` elements found, including skipped ones.
    pub tables: usize,
    /// Tables without an id attribute.
    pub skipped_tables: usize,
    /// Tables whose id no navigation list knew; decoded as classes.
    pub unknown_tables: usize,
    pub timetables: usize,
    pub lessons: usize,
    pub assigned: usize,
    pub ambiguous: usize,
}

/// Registry and reconciled timetables of one document.
pub struct Decoded {
    pub registry: EntityRegistry,
    pub timetables: TimetableSet,
    pub generation_date: String,
    pub stats: DecodeStats,
}

/// Navigation pass, table pass, reconciliation.
pub fn decode_document(html: &str, progress: &mut dyn Progress) -> Result<Decoded> {
    let doc = Html::parse_document(html);

    let mut registry = plan::read_navigation(&doc)?;
    if registry.is_empty() {
        return Err(ScrapeError::NoEntities);
    }

    let tables = plan::read_tables(&doc);
    if tables.is_empty() {
        return Err(ScrapeError::NoTables);
    }
    progress.begin(tables.len());

    let mut stats = DecodeStats { tables: tables.len(), ..DecodeStats::default() };
    let mut timetables = TimetableSet::new();

    for table in &tables {
        if table.id.is_empty() {
            logd!("table.plan without id skipped (caption {:?})", table.caption);
            stats.skipped_tables += 1;
            continue;
        }

        let domain = match registry.domain_of_raw(&table.id) {
            Some(d) => d,
            None => {
                logd!("table {} not listed in navigation; treating as class", table.id);
                stats.unknown_tables += 1;
                Domain::Class
            }
        };
        let label = if table.caption.is_empty() { &table.id } else { &table.caption };
        let Some(self_ref) = registry.resolve(domain, &table.id, label) else { continue };

        let lessons = decode_table(table, domain, &self_ref, &mut registry);
        progress.item_done(&self_ref.id);
        timetables.insert(&self_ref.id, lessons);
    }

    for domain in Domain::ALL {
        for id in registry.ids(domain) {
            timetables.ensure(id);
        }
    }

    let report = reconcile(&mut timetables);
    stats.timetables = timetables.len();
    stats.lessons = timetables.lesson_count();
    stats.assigned = report.assigned;
    stats.ambiguous = report.ambiguous;

    logf!(
        "Decoded {} tables ({} skipped, {} unknown): {} lessons, {} subgroups assigned, {} ambiguous",
        stats.tables, stats.skipped_tables, stats.unknown_tables,
        stats.lessons, stats.assigned, stats.ambiguous
    );

    Ok(Decoded {
        registry,
        timetables,
        generation_date: plan::read_generation_date(&doc),
        stats,
    })
}

/// A decoded document in its output shape.
pub struct Scrape {
    pub data: TimetableData,
    pub stats: DecodeStats,
}

/// Decode `html` and assemble the output document; `source` ends up in the
/// metadata.
pub fn scrape_document(html: &str, source: &str, progress: &mut dyn Progress) -> Result<Scrape> {
    let decoded = decode_document(html, progress)?;
    let metadata = Metadata {
        source: source.to_string(),
        scraped_on: chrono::Local::now().to_rfc3339(),
        generation_date_from_page: decoded.generation_date,
    };
    Ok(Scrape {
        data: TimetableData::assemble(&decoded.registry, &decoded.timetables, metadata),
        stats: decoded.stats,
    })
}

/// Timetable URL behind the landing page's iframe, or the fallback URL.
pub fn discover_plan_url(fetcher: &Fetcher, opts: &FetchOptions) -> String {
    match fetcher.get(&opts.landing_url) {
        Ok(page) => {
            let doc = Html::parse_document(&page.body);
            match landing::find_plan_url(&doc, &page.url) {
                Some(url) => {
                    logf!("Timetable iframe found: {url}");
                    url
                }
                None => {
                    loge!("No timetable iframe on {}; using {}", page.url, opts.fallback_url);
                    opts.fallback_url.clone()
                }
            }
        }
        Err(e) => {
            loge!("Landing page unavailable ({e}); using {}", opts.fallback_url);
            opts.fallback_url.clone()
        }
    }
}

/// Source label and HTML, from `--input` or the network.
fn load_document(opts: &AppOptions, progress: &mut dyn Progress) -> Result<(String, String)> {
    if let Some(path) = &opts.input {
        progress.log(&format!("Reading {}", path.display()));
        let bytes = fs::read(path)?;
        return Ok((path.display().to_string(), decode_html(&bytes, None, None)));
    }

    let fetcher = Fetcher::new(&opts.fetch)?;
    let url = discover_plan_url(&fetcher, &opts.fetch);
    progress.log(&format!("Fetching {url}"));
    let page = fetcher.get(&url)?;
    Ok((page.url, page.body))
}

/// Summary of what was produced.
#[derive(Debug)]
pub struct RunSummary {
    pub source: String,
    pub out_path: PathBuf,
    pub stats: DecodeStats,
}

/// Top-level runner: obtain the document, decode it, write the JSON.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(opts: &AppOptions, progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    let mut null = NullProgress;
    let progress: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut null,
    };

    let result = run_with(opts, progress);
    if let Err(e) = &result {
        loge!("Run failed: {e}");
    }
    progress.finish();
    result
}

fn run_with(opts: &AppOptions, progress: &mut dyn Progress) -> Result<RunSummary> {
    let (source, html) = load_document(opts, progress)?;
    let scrape = scrape_document(&html, &source, progress)?;

    let out_path = opts.export.out_path.clone();
    scrape.data.save(&out_path, opts.export.pretty)?;

    let st = &scrape.stats;
    progress.log(&format!(
        "{} timetables, {} lessons ({} subgroups assigned, {} ambiguous) -> {}",
        st.timetables, st.lessons, st.assigned, st.ambiguous, out_path.display()
    ));

    Ok(RunSummary { source, out_path, stats: scrape.stats })
}
