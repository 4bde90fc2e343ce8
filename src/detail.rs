use std::path::Path;

use anyhow::Context as _;
use url::Url;

use crate::cache::CacheStore;
use crate::catalog::Catalog;
use crate::fetch::Fetcher;
use crate::formats::ResumeRecord;
use crate::parse;
use crate::stage::{Outcome, StageReport};

/// Directory under the data dir holding one standalone HTML document per
/// fetched resume.
const HTML_DIR: &str = "resumes";

/// Detail fetch: visits every discovered resume URL that has no record yet,
/// extracts the structured fields, and saves the page's rendered HTML to a
/// content-addressed side file. One bad page never aborts the stage.
pub fn run(
    store: &CacheStore,
    catalog: &Catalog,
    origin: &Url,
    fetcher: &dyn Fetcher,
) -> anyhow::Result<StageReport> {
    let cache = store.load_or_seed(catalog, origin)?;

    let html_dir = store.data_dir().join(HTML_DIR);
    std::fs::create_dir_all(&html_dir)
        .with_context(|| format!("create resume html dir: {}", html_dir.display()))?;

    let discovered = cache.discovered_urls();
    let worklist: Vec<String> = discovered
        .iter()
        .filter(|url| !cache.url_data.contains_key(*url))
        .cloned()
        .collect();
    let mut report = StageReport {
        already_done: discovered.len() - worklist.len(),
        ..StageReport::default()
    };
    tracing::info!(
        pending = worklist.len(),
        discovered = discovered.len(),
        "detail fetch started"
    );

    for url in worklist {
        let outcome = fetch_one(store, fetcher, &url)?;
        report.tally("fetch", &url, outcome);
    }

    tracing::info!(
        recorded = report.recorded,
        skipped = report.skipped,
        already_done = report.already_done,
        "detail fetch finished"
    );
    Ok(report)
}

fn fetch_one(store: &CacheStore, fetcher: &dyn Fetcher, url: &str) -> anyhow::Result<Outcome> {
    let html = match fetcher.fetch(url) {
        Ok(html) => html,
        Err(err) => return Ok(Outcome::Skipped(format!("fetch failed: {err:#}"))),
    };

    let detail = match parse::resume_detail(&html) {
        Ok(detail) => detail,
        Err(err) => return Ok(Outcome::Skipped(format!("unexpected page layout: {err:#}"))),
    };

    let document = detail.standalone_document();
    let html_filename = format!("{HTML_DIR}/{}.html", content_hash(&document));
    // Identical documents share a name; rewriting the same bytes is fine.
    write_resume_html(store.data_dir(), &html_filename, &document)?;

    let record = ResumeRecord {
        url: url.to_owned(),
        companies_worked: detail.companies_worked,
        schools_attended: detail.schools_attended,
        job_titles_held: detail.job_titles_held,
        degrees: detail.degrees,
        resume_content_html: detail.resume_content_html,
        resume_score: detail.resume_score,
        html_filename,
        similar: detail.similar,
        fetched_at: chrono::Utc::now().to_rfc3339(),
    };

    let mut cache = store.load()?;
    if !cache.insert_detail(url, record) {
        return Ok(Outcome::AlreadyDone);
    }
    store.save(&cache)?;
    tracing::debug!(url, "recorded resume detail");
    Ok(Outcome::Recorded)
}

fn content_hash(document: &str) -> String {
    use sha2::Digest as _;
    let mut hasher = sha2::Sha256::new();
    hasher.update(document.as_bytes());
    hex::encode(hasher.finalize())
}

fn write_resume_html(data_dir: &Path, html_filename: &str, document: &str) -> anyhow::Result<()> {
    let path = data_dir.join(html_filename);
    std::fs::write(&path, document)
        .with_context(|| format!("write resume html: {}", path.display()))
}
