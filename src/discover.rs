use url::Url;

use crate::cache::CacheStore;
use crate::catalog::Catalog;
use crate::fetch::Fetcher;
use crate::parse;
use crate::stage::{Outcome, StageReport};

/// Page-count discovery: one fetch per query URL (base and trick) that has
/// no recorded count yet. Counted URLs are never re-fetched.
pub fn run(
    store: &CacheStore,
    catalog: &Catalog,
    origin: &Url,
    fetcher: &dyn Fetcher,
) -> anyhow::Result<StageReport> {
    let cache = store.load_or_seed(catalog, origin)?;
    let worklist = cache.uncounted_query_urls();
    let total = cache.page_nums_by_query_url.len();
    tracing::info!(
        pending = worklist.len(),
        total,
        "page-count discovery started"
    );

    let mut report = StageReport {
        already_done: total - worklist.len(),
        ..StageReport::default()
    };
    for query_url in worklist {
        let outcome = discover_one(store, fetcher, &query_url)?;
        report.tally("discover", &query_url, outcome);
    }

    tracing::info!(
        recorded = report.recorded,
        skipped = report.skipped,
        already_done = report.already_done,
        "page-count discovery finished"
    );
    Ok(report)
}

fn discover_one(
    store: &CacheStore,
    fetcher: &dyn Fetcher,
    query_url: &str,
) -> anyhow::Result<Outcome> {
    let html = match fetcher.fetch(query_url) {
        Ok(html) => html,
        Err(err) => return Ok(Outcome::Skipped(format!("fetch failed: {err:#}"))),
    };

    let pages = match parse::result_count(&html) {
        Ok(count) => parse::page_count(count),
        Err(err) => return Ok(Outcome::Skipped(format!("{err:#}"))),
    };

    // Load-mutate-save around every fetch; a crash loses at most this one
    // in-flight result.
    let mut cache = store.load()?;
    if !cache.record_page_count(query_url, pages) {
        return Ok(Outcome::AlreadyDone);
    }
    store.save(&cache)?;
    tracing::debug!(url = query_url, pages, "recorded page count");
    Ok(Outcome::Recorded)
}
