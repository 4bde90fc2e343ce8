use clap::{Args, Parser, Subcommand};

use crate::fetch::DEFAULT_USER_AGENT;
use crate::query::DEFAULT_ORIGIN;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run page-count discovery, URL listing, and detail fetch in order.
    Crawl(CrawlArgs),
    /// Record how many result pages each search query has.
    Discover(CrawlArgs),
    /// Harvest resume URLs from the paginated search results.
    List(CrawlArgs),
    /// Fetch and parse every discovered resume page.
    Fetch(CrawlArgs),
    /// Flatten the crawl cache into a CSV file.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct CrawlArgs {
    /// Job title catalog CSV (id,category,keyword).
    #[arg(long)]
    pub catalog: String,

    /// Data directory holding the crawl cache and saved resume HTML.
    #[arg(long)]
    pub data: String,

    /// Site origin to crawl (must be http/https).
    #[arg(long, default_value = DEFAULT_ORIGIN)]
    pub base_url: String,

    /// Delay before each request (politeness).
    #[arg(long, default_value_t = 200)]
    pub delay_ms: u64,

    /// User-Agent header sent with every request.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Job title catalog CSV (id,category,keyword).
    #[arg(long)]
    pub catalog: String,

    /// Data directory holding the crawl cache.
    #[arg(long)]
    pub data: String,

    /// Output CSV path.
    #[arg(long)]
    pub out: String,

    /// Overwrite the output file if it already exists.
    #[arg(long)]
    pub force: bool,
}
