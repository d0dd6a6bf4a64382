//! Command-line interface for company-scout
//!
//! Researches a set of stock tickers with an LLM agent, gathers the results
//! concurrently, writes the successes to a CSV file, and prints the dataset
//! as a table.

mod logging;
mod output;
mod sp500;

use anyhow::Context;
use clap::Parser;
use scout_agent::{CompanyAgent, CompanyAgentConfig};
use scout_batch::{BatchConfig, BatchOrchestrator};
use scout_core::Ticker;
use scout_llm::providers::{OpenAIConfig, OpenAIProvider};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Default ticker list, used when neither tickers nor --sp500 are given
const DEFAULT_TICKERS: [&str; 5] = ["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"];

#[derive(Parser, Debug)]
#[command(name = "company-scout")]
#[command(about = "Research company attributes per ticker with an LLM agent", long_about = None)]
struct Args {
    /// Tickers to research (defaults to a small built-in list)
    tickers: Vec<String>,

    /// Research the S&P 500 constituents instead of the given tickers
    #[arg(long)]
    sp500: bool,

    /// Output CSV path
    #[arg(short, long, default_value = "companies.csv")]
    output: PathBuf,

    /// Maximum fetches in flight at once (0 = unbounded)
    #[arg(short, long, default_value_t = 0)]
    concurrency: usize,

    /// Model identifier (overrides SCOUT_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// API base URL (overrides SCOUT_API_BASE)
    #[arg(long)]
    api_base: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let args = Args::parse();

    let tickers = resolve_tickers(&args).await?;
    info!(count = tickers.len(), "Tickers resolved");

    let mut provider_config = OpenAIConfig::from_env();
    if let Some(api_base) = &args.api_base {
        provider_config = provider_config.with_api_base(api_base);
    }
    let provider =
        Arc::new(OpenAIProvider::with_config(provider_config).context("building LLM provider")?);

    let model = args
        .model
        .clone()
        .or_else(|| std::env::var("SCOUT_MODEL").ok())
        .unwrap_or_else(|| CompanyAgentConfig::default().model);

    let agent = CompanyAgent::new(
        provider,
        CompanyAgentConfig {
            model,
            ..CompanyAgentConfig::default()
        },
    )
    .context("building research agent")?;

    let orchestrator =
        BatchOrchestrator::new(BatchConfig::new().with_concurrency(args.concurrency));
    let report = orchestrator.gather(&tickers, &agent).await;

    for failure in &report.failures {
        warn!(ticker = %failure.ticker(), error = %failure, "Ticker omitted from output");
    }
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Research run finished"
    );

    output::write_csv(&args.output, &report.companies)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(path = %args.output.display(), rows = report.succeeded(), "CSV written");

    println!("{}", output::render_table(&report.companies));

    Ok(())
}

/// Work out the ticker list from the arguments
async fn resolve_tickers(args: &Args) -> anyhow::Result<Vec<Ticker>> {
    if args.sp500 {
        let tickers = sp500::fetch_constituents()
            .await
            .context("fetching S&P 500 constituents")?;
        return Ok(tickers);
    }

    if args.tickers.is_empty() {
        return Ok(DEFAULT_TICKERS.iter().map(|t| Ticker::new(*t)).collect());
    }

    Ok(args.tickers.iter().map(Ticker::new).collect())
}
