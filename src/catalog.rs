use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

/// One row of the job title reference table.
#[derive(Debug, Clone, Deserialize)]
pub struct JobTitle {
    pub id: String,
    pub category: String,
    pub keyword: String,
}

/// The fixed list of job titles the crawl targets. Loaded once, never
/// mutated.
#[derive(Debug)]
pub struct Catalog {
    titles: Vec<JobTitle>,
}

impl Catalog {
    /// Reads a CSV with columns `id,category,keyword` and a header row.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("open job title catalog: {}", path.display()))?;

        let mut titles = Vec::new();
        for row in reader.deserialize() {
            let title: JobTitle =
                row.with_context(|| format!("parse job title row: {}", path.display()))?;
            titles.push(title);
        }

        Self::from_titles(titles)
    }

    pub fn from_titles(titles: Vec<JobTitle>) -> anyhow::Result<Self> {
        if titles.is_empty() {
            anyhow::bail!("job title catalog is empty");
        }
        Ok(Self { titles })
    }

    pub fn titles(&self) -> &[JobTitle] {
        &self.titles
    }

    /// Keyword lookup is case-insensitive; cache keys preserve the catalog
    /// spelling.
    pub fn by_keyword(&self, keyword: &str) -> Option<&JobTitle> {
        self.titles
            .iter()
            .find(|title| title.keyword.eq_ignore_ascii_case(keyword))
    }
}
