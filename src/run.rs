use std::path::Path;

use anyhow::Context as _;
use url::Url;

use crate::cache::CacheStore;
use crate::catalog::Catalog;
use crate::cli::CrawlArgs;
use crate::fetch::HttpFetcher;

struct StageEnv {
    store: CacheStore,
    catalog: Catalog,
    origin: Url,
    fetcher: HttpFetcher,
}

fn stage_env(args: &CrawlArgs) -> anyhow::Result<StageEnv> {
    let catalog = Catalog::load(Path::new(&args.catalog)).context("load job title catalog")?;
    let store = CacheStore::open(Path::new(&args.data)).context("open data directory")?;

    let origin = Url::parse(&args.base_url).context("parse --base-url")?;
    if origin.scheme() != "http" && origin.scheme() != "https" {
        anyhow::bail!("--base-url must be http/https: {origin}");
    }

    let fetcher = HttpFetcher::new(&args.user_agent, args.delay_ms).context("build fetcher")?;

    Ok(StageEnv {
        store,
        catalog,
        origin,
        fetcher,
    })
}

pub fn discover(args: CrawlArgs) -> anyhow::Result<()> {
    let env = stage_env(&args)?;
    crate::discover::run(&env.store, &env.catalog, &env.origin, &env.fetcher)?;
    Ok(())
}

pub fn list(args: CrawlArgs) -> anyhow::Result<()> {
    let env = stage_env(&args)?;
    crate::listing::run(&env.store, &env.catalog, &env.origin, &env.fetcher)?;
    Ok(())
}

pub fn fetch(args: CrawlArgs) -> anyhow::Result<()> {
    let env = stage_env(&args)?;
    crate::detail::run(&env.store, &env.catalog, &env.origin, &env.fetcher)?;
    Ok(())
}

/// The three crawl stages in order. Each stage reads the cache back from
/// disk, so a stage only ever sees work its predecessor persisted.
pub fn crawl(args: CrawlArgs) -> anyhow::Result<()> {
    let env = stage_env(&args)?;
    crate::discover::run(&env.store, &env.catalog, &env.origin, &env.fetcher)
        .context("page-count discovery")?;
    crate::listing::run(&env.store, &env.catalog, &env.origin, &env.fetcher)
        .context("url listing")?;
    crate::detail::run(&env.store, &env.catalog, &env.origin, &env.fetcher)
        .context("detail fetch")?;
    Ok(())
}
