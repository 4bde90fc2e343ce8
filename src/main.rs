use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    resume_harvest::logging::init().context("init logging")?;

    let cli = resume_harvest::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        resume_harvest::cli::Command::Crawl(args) => {
            resume_harvest::run::crawl(args).context("crawl")?;
        }
        resume_harvest::cli::Command::Discover(args) => {
            resume_harvest::run::discover(args).context("discover")?;
        }
        resume_harvest::cli::Command::List(args) => {
            resume_harvest::run::list(args).context("list")?;
        }
        resume_harvest::cli::Command::Fetch(args) => {
            resume_harvest::run::fetch(args).context("fetch")?;
        }
        resume_harvest::cli::Command::Export(args) => {
            resume_harvest::export::run(args).context("export")?;
        }
    }

    Ok(())
}
