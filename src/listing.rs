use url::Url;

use crate::cache::{CacheStore, CrawlCache};
use crate::catalog::Catalog;
use crate::fetch::Fetcher;
use crate::parse;
use crate::query::{self, PAGE_CAP};
use crate::stage::{Outcome, StageReport};

/// URL listing: visits every page-qualified search URL implied by the
/// recorded page counts and unions the resume links into each title's
/// discovered set. Re-running is harmless; the union dedupes.
pub fn run(
    store: &CacheStore,
    catalog: &Catalog,
    origin: &Url,
    fetcher: &dyn Fetcher,
) -> anyhow::Result<StageReport> {
    let cache = store.load_or_seed(catalog, origin)?;

    let mut report = StageReport::default();
    let mut worklist: Vec<(String, String)> = Vec::new();
    for keyword in cache.resume_urls_by_kw.keys() {
        match title_page_urls(&cache, keyword) {
            Some(urls) => worklist.extend(urls.into_iter().map(|url| (keyword.clone(), url))),
            None => {
                report.tally(
                    "list",
                    keyword,
                    Outcome::Skipped("base query has no page count; run discover first".to_owned()),
                );
            }
        }
    }
    tracing::info!(pages = worklist.len(), "url listing started");

    for (keyword, page_url) in worklist {
        let outcome = list_one(store, fetcher, origin, &keyword, &page_url)?;
        report.tally("list", &page_url, outcome);
    }

    tracing::info!(
        recorded = report.recorded,
        skipped = report.skipped,
        "url listing finished"
    );
    Ok(report)
}

/// Page-qualified URLs for one title, in visit order: base pages first, then
/// trick-band pages when the base query hit the site's page cap (a capped
/// query is truncated, so the split bands are needed for coverage).
fn title_page_urls(cache: &CrawlCache, keyword: &str) -> Option<Vec<String>> {
    let base = cache.query_url_by_kw.get(keyword)?;
    let base_pages = cache.page_count(base)?;

    let mut query_urls = vec![(base.clone(), base_pages)];
    if base_pages >= PAGE_CAP {
        for trick in cache.trick_urls_by_kw.get(keyword).into_iter().flatten() {
            match cache.page_count(trick) {
                Some(pages) => query_urls.push((trick.clone(), pages)),
                None => {
                    tracing::warn!(url = %trick, "trick url has no page count; run discover again")
                }
            }
        }
    }

    let mut pages = Vec::new();
    for (query_url, page_count) in query_urls {
        for page in 1..=page_count.min(PAGE_CAP) {
            pages.push(query::page_url(&query_url, page));
        }
    }
    Some(pages)
}

fn list_one(
    store: &CacheStore,
    fetcher: &dyn Fetcher,
    origin: &Url,
    keyword: &str,
    page_url: &str,
) -> anyhow::Result<Outcome> {
    let html = match fetcher.fetch(page_url) {
        Ok(html) => html,
        Err(err) => return Ok(Outcome::Skipped(format!("fetch failed: {err:#}"))),
    };

    let links = parse::listing_links(&html, origin)?;

    let mut cache = store.load()?;
    let added = cache.merge_resume_urls(keyword, links);
    store.save(&cache)?;
    tracing::debug!(url = page_url, added, "merged listing links");
    Ok(Outcome::Recorded)
}
