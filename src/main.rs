use crate::config::{load_app_config, AppConfig};
use crate::domain::SearchQuery;
use crate::pipeline::{run_detail_process, DetailStage, ListingStage, ListingTable, Pipeline, Stage};
use crate::router::{handle, AppState};
use crate::scraper::HttpFetcher;
use crate::session::SessionStore;
use crate::table::Dataset;
use crate::theme::Theme;
use anyhow::Context;
use astra::Server;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod charts;
mod config;
mod domain;
mod errors;
mod map;
mod pipeline;
mod responses;
mod router;
mod scraper;
mod session;
mod spreadsheets;
mod table;
mod templates;
mod theme;

#[cfg(test)]
mod tests;

#[derive(Parser)]
#[command(name = "hotel_scout", about = "Scrape booking.com hotels and explore them in a dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the dashboard (the default).
    Serve {
        /// Nights covered by the prices in the preloaded table.
        #[arg(long, default_value_t = 1)]
        nights: u32,
    },
    /// Listing stage, then the detail stage as a separate process.
    Scrape {
        /// booking.com search results URL.
        #[arg(long)]
        url: String,
    },
    /// Detail stage only, reading a listing table.
    Enrich {
        /// Listing table; defaults to the one in the data directory.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Build the search link from the inputs and run both stages in-process.
    Run {
        #[arg(long)]
        destination: String,
        #[arg(long)]
        checkin: NaiveDate,
        #[arg(long)]
        checkout: NaiveDate,
        #[arg(long, default_value_t = 2)]
        adults: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_app_config().context("reading configuration")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command.unwrap_or(Command::Serve { nights: 1 }) {
        Command::Serve { nights } => serve(config, nights),
        Command::Scrape { url } => scrape(&config, &url),
        Command::Enrich { input } => enrich(&config, input),
        Command::Run {
            destination,
            checkin,
            checkout,
            adults,
        } => {
            let query = SearchQuery::new(&destination, checkin, checkout, adults)?;
            run(&config, &query)
        }
    }
}

fn fetcher(config: &AppConfig) -> anyhow::Result<HttpFetcher> {
    HttpFetcher::new(
        &config.user_agent,
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("building http client")
}

fn scrape(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let listing = ListingStage::new(fetcher(config)?, config.listing_table_path())
        .run(url.to_string())
        .context("listing stage")?;
    info!(
        rows = listing.records.len(),
        pages = listing.pages_fetched,
        failed_pages = listing.pages_failed,
        "listing stage finished"
    );

    // The listing table stays on disk whatever the detail process does.
    if let Err(e) = run_detail_process(&listing.path) {
        error!(error = %e, kept = %listing.path.display(), "detail stage failed");
        return Err(e).context("detail stage");
    }
    Ok(())
}

fn enrich(config: &AppConfig, input: Option<PathBuf>) -> anyhow::Result<()> {
    let input = input.unwrap_or_else(|| config.listing_table_path());
    let listing = ListingTable::load(&input)
        .with_context(|| format!("loading listing table {}", input.display()))?;

    let enriched = DetailStage::new(fetcher(config)?, config.enriched_table_path())
        .run(listing)
        .context("detail stage")?;
    info!(
        rows = enriched.records.len(),
        fetched = enriched.stats.fetched,
        enriched = enriched.stats.enriched,
        skipped = enriched.stats.skipped,
        duplicates_dropped = enriched.stats.duplicates_dropped,
        path = %enriched.path.display(),
        "detail stage finished"
    );
    Ok(())
}

fn run(config: &AppConfig, query: &SearchQuery) -> anyhow::Result<()> {
    let url = query.search_url(&config.search_base_url)?;
    let report = Pipeline::in_dir(fetcher(config)?, &config.data_dir).run(&url)?;

    match &report.enrichment {
        Ok(enriched) => info!(rows = enriched.records.len(), path = %enriched.path.display(), "pipeline finished"),
        Err(e) => warn!(error = %e, path = %report.listing.path.display(), "pipeline finished without details"),
    }
    Ok(())
}

fn serve(config: AppConfig, nights: u32) -> anyhow::Result<()> {
    let path = config.enriched_table_path();
    let (dataset, notice) = match Dataset::load(&path, nights) {
        Ok(data) => {
            info!(rows = data.records.len(), nights = data.nights, path = %path.display(), "table loaded");
            (data, None)
        }
        Err(e) => {
            warn!(error = %e, path = %path.display(), "no table to preload");
            (Dataset::empty(), Some("no data available yet".to_string()))
        }
    };

    let addr = config.bind_addr;
    let workers = config.max_workers;
    let state = AppState {
        theme: Theme::load_or_default(&config.theme_path),
        sessions: SessionStore::new(dataset, notice),
        config,
    };

    info!(%addr, workers, "starting server");
    Server::bind(&addr)
        .max_workers(workers)
        .serve(move |req, _info| handle(req, &state))
        .context("server stopped")?;

    info!("server shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn serve_takes_the_preloaded_night_count() {
        let cli = Cli::try_parse_from(["hotel_scout", "serve", "--nights", "3"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Serve { nights: 3 })));

        let cli = Cli::try_parse_from(["hotel_scout", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Serve { nights: 1 })));

        let cli = Cli::try_parse_from(["hotel_scout"]).unwrap();
        assert!(cli.command.is_none());
    }
}
