use std::path::Path;

use anyhow::Context as _;

use crate::cache::{CacheStore, CrawlCache};
use crate::catalog::{Catalog, JobTitle};
use crate::cli::ExportArgs;
use crate::formats::{ExportRow, ResumeRecord};

/// Export projection: one flattened row per (title, url) pair that has a
/// detail record. Pure read path over the cache; URLs without a record are
/// silently omitted.
pub fn run(args: ExportArgs) -> anyhow::Result<()> {
    let out_path = Path::new(&args.out);
    if out_path.exists() && !args.force {
        anyhow::bail!("export output already exists: {}", out_path.display());
    }

    let catalog = Catalog::load(Path::new(&args.catalog)).context("load job title catalog")?;
    let store = CacheStore::open(Path::new(&args.data)).context("open data directory")?;
    // Exporting before any crawl ran is a usage error, so no catalog seeding
    // here; load the snapshot as-is.
    let cache = store.load().context("load crawl cache")?;

    let mut writer = csv::Writer::from_path(out_path)
        .with_context(|| format!("create export csv: {}", out_path.display()))?;
    let rows = write_rows(&mut writer, &cache, &catalog)?;
    writer.flush().context("flush export csv")?;

    tracing::info!(rows, out = %out_path.display(), "export complete");
    Ok(())
}

fn write_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    cache: &CrawlCache,
    catalog: &Catalog,
) -> anyhow::Result<usize> {
    let mut rows = 0_usize;
    for (keyword, urls) in &cache.resume_urls_by_kw {
        // The cache was seeded from the catalog, so a missing keyword means
        // the two inputs are out of sync.
        let title = catalog
            .by_keyword(keyword)
            .ok_or_else(|| anyhow::anyhow!("keyword {keyword:?} is not in the catalog"))?;

        for url in urls {
            let Some(record) = cache.url_data.get(url) else {
                continue;
            };
            writer
                .serialize(export_row(title, record))
                .context("write export row")?;
            rows += 1;
        }
    }
    Ok(rows)
}

fn export_row(title: &JobTitle, record: &ResumeRecord) -> ExportRow {
    let link = |i: usize| {
        record
            .similar
            .get(i)
            .map(|s| s.link.clone())
            .unwrap_or_default()
    };
    let days = |i: usize| record.similar.get(i).map(|s| s.days_since_posted).unwrap_or(0);

    ExportRow {
        url: record.url.clone(),
        companies_worked: record.companies_worked.clone(),
        schools_attended: record.schools_attended.clone(),
        job_titles_held: record.job_titles_held.clone(),
        degrees: record.degrees.clone(),
        resume_content_html: record.resume_content_html.clone(),
        resume_score: record.resume_score,
        job_title_id: title.id.clone(),
        job_title_category: title.category.clone(),
        job_title_keyword: title.keyword.clone(),
        similar_resume_1_link: link(0),
        similar_resume_1_days_since_posted: days(0),
        similar_resume_2_link: link(1),
        similar_resume_2_days_since_posted: days(1),
        similar_resume_3_link: link(2),
        similar_resume_3_days_since_posted: days(2),
        html_filename: record.html_filename.clone(),
    }
}
