use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::catalog::Catalog;
use crate::formats::ResumeRecord;
use crate::query;

pub const SCHEMA_VERSION: u32 = 1;

const SNAPSHOT_FILE: &str = "cache.json";

/// The single source of truth for crawl progress. Every stage reads a fresh
/// copy, mutates its slice, and writes the whole structure back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlCache {
    pub schema_version: u32,
    /// Canonical search URL per catalog keyword.
    pub query_url_by_kw: BTreeMap<String, String>,
    /// The five band-filtered query variants per keyword.
    pub trick_urls_by_kw: BTreeMap<String, Vec<String>>,
    /// Result-page count per query URL; `None` until discovery records it.
    pub page_nums_by_query_url: BTreeMap<String, Option<u32>>,
    /// Discovered resume detail URLs per keyword. Grows by union, never
    /// shrinks.
    pub resume_urls_by_kw: BTreeMap<String, BTreeSet<String>>,
    /// Parsed detail record per resume URL.
    pub url_data: BTreeMap<String, ResumeRecord>,
}

impl CrawlCache {
    /// Fresh cache seeded from the catalog: one base and five trick URLs per
    /// title, no counts, no discovered URLs, no detail records.
    pub fn seeded(catalog: &Catalog, origin: &Url) -> Self {
        let mut cache = Self {
            schema_version: SCHEMA_VERSION,
            query_url_by_kw: BTreeMap::new(),
            trick_urls_by_kw: BTreeMap::new(),
            page_nums_by_query_url: BTreeMap::new(),
            resume_urls_by_kw: BTreeMap::new(),
            url_data: BTreeMap::new(),
        };

        for title in catalog.titles() {
            let base = query::base_url(origin, &title.keyword);
            let tricks = query::trick_urls(origin, &title.keyword);

            cache.page_nums_by_query_url.insert(base.clone(), None);
            for trick in &tricks {
                cache.page_nums_by_query_url.insert(trick.clone(), None);
            }
            cache.query_url_by_kw.insert(title.keyword.clone(), base);
            cache.trick_urls_by_kw.insert(title.keyword.clone(), tricks);
            cache
                .resume_urls_by_kw
                .insert(title.keyword.clone(), BTreeSet::new());
        }

        cache
    }

    /// Records a page count. Counts are written once; returns false when the
    /// URL already has one (or is not a known query URL).
    pub fn record_page_count(&mut self, query_url: &str, pages: u32) -> bool {
        match self.page_nums_by_query_url.get_mut(query_url) {
            Some(slot) if slot.is_none() => {
                *slot = Some(pages);
                true
            }
            _ => false,
        }
    }

    pub fn page_count(&self, query_url: &str) -> Option<u32> {
        self.page_nums_by_query_url
            .get(query_url)
            .copied()
            .flatten()
    }

    /// Query URLs discovery still has to visit.
    pub fn uncounted_query_urls(&self) -> Vec<String> {
        self.page_nums_by_query_url
            .iter()
            .filter(|(_, count)| count.is_none())
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// Set-union of newly listed URLs into a title's discovered set; returns
    /// how many were new.
    pub fn merge_resume_urls(
        &mut self,
        keyword: &str,
        urls: impl IntoIterator<Item = String>,
    ) -> usize {
        let set = self.resume_urls_by_kw.entry(keyword.to_owned()).or_default();
        let before = set.len();
        set.extend(urls);
        set.len() - before
    }

    /// First write wins; returns false when the URL already has a record.
    pub fn insert_detail(&mut self, url: &str, record: ResumeRecord) -> bool {
        if self.url_data.contains_key(url) {
            return false;
        }
        self.url_data.insert(url.to_owned(), record);
        true
    }

    /// All discovered URLs across titles, deduplicated.
    pub fn discovered_urls(&self) -> BTreeSet<String> {
        self.resume_urls_by_kw
            .values()
            .flatten()
            .cloned()
            .collect()
    }
}

/// Whole-file load/save of the persisted snapshot.
#[derive(Debug)]
pub struct CacheStore {
    data_dir: PathBuf,
    snapshot_path: PathBuf,
}

impl CacheStore {
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("create data directory: {}", data_dir.display()))?;
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            snapshot_path: data_dir.join(SNAPSHOT_FILE),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Loads the snapshot, seeding (and persisting) a fresh cache from the
    /// catalog when none exists yet. A snapshot that exists but cannot be
    /// read is a hard error; silently restarting an existing crawl would
    /// lose data.
    pub fn load_or_seed(&self, catalog: &Catalog, origin: &Url) -> anyhow::Result<CrawlCache> {
        if self.snapshot_path.exists() {
            return self.load();
        }
        let cache = CrawlCache::seeded(catalog, origin);
        self.save(&cache).context("persist seeded crawl cache")?;
        Ok(cache)
    }

    pub fn load(&self) -> anyhow::Result<CrawlCache> {
        let contents = std::fs::read_to_string(&self.snapshot_path)
            .with_context(|| format!("read crawl cache: {}", self.snapshot_path.display()))?;
        let cache: CrawlCache = serde_json::from_str(&contents)
            .with_context(|| format!("parse crawl cache: {}", self.snapshot_path.display()))?;
        if cache.schema_version != SCHEMA_VERSION {
            anyhow::bail!(
                "crawl cache schema version {} is not supported (expected {}): {}",
                cache.schema_version,
                SCHEMA_VERSION,
                self.snapshot_path.display()
            );
        }
        Ok(cache)
    }

    /// Replace-on-write: the file on disk is always either the previous
    /// complete snapshot or the new one, never a truncated mix.
    pub fn save(&self, cache: &CrawlCache) -> anyhow::Result<()> {
        let json = serde_json::to_string(cache).context("serialize crawl cache")?;
        let tmp_path = self.snapshot_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)
            .with_context(|| format!("write crawl cache temp file: {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.snapshot_path)
            .with_context(|| format!("replace crawl cache: {}", self.snapshot_path.display()))?;
        Ok(())
    }
}
