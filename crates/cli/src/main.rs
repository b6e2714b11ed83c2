//! leadscout entry point.
//!
//! Prompts for a city and business type, collects up to 60 matching places,
//! ranks them as sales leads and exports them to a spreadsheet tab.
//! Logs go to stderr; prompts and the final lead list go to stdout.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use leadscout_client::{ExportOutcome, Exporter, Fetcher, PlacesClient, PlacesConfig};
use leadscout_core::{AppConfig, DetailCache, FsStore, KvStore, LeadCache, PageCache};
use tracing_subscriber::EnvFilter;

mod pipeline;
mod prompt;

use pipeline::{Pipeline, RunReport};
use prompt::StdinInput;

/// Find and rank local business leads.
#[derive(Debug, Parser)]
#[command(name = "leadscout", version, about)]
struct Cli {
    /// City to search in; prompted for when omitted.
    #[arg(long)]
    city: Option<String>,

    /// Business type to search for; prompted for when omitted.
    #[arg(long)]
    category: Option<String>,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json { builder.json().init() } else { builder.init() }
}

fn build_pipeline(config: &AppConfig) -> anyhow::Result<Pipeline> {
    let places = PlacesClient::new(PlacesConfig::from_app_config(config)?).context("failed to build places client")?;

    let store: Arc<dyn KvStore> = Arc::new(FsStore::new(&config.cache_dir));
    let fetcher = Fetcher::new(Arc::new(places), PageCache::new(store.clone()), DetailCache::new(store.clone()))
        .with_max_places(config.max_places)
        .with_detail_concurrency(config.detail_concurrency);

    Ok(Pipeline::new(fetcher, LeadCache::new(store), Exporter::from_config(config)))
}

fn print_report(report: &RunReport) {
    println!("{} leads for {} in {}", report.leads.len(), report.category, report.city);
    for (i, lead) in report.leads.iter().enumerate() {
        let r = &lead.record;
        println!(
            "{:>3}. {:>5.2}  {}  {}  {}",
            i + 1,
            lead.score,
            r.name.as_deref().unwrap_or("(unnamed)"),
            r.phone.as_deref().unwrap_or("-"),
            r.website.as_deref().unwrap_or("-"),
        );
    }
    match &report.export {
        ExportOutcome::Written { rows } => println!("exported {rows} rows"),
        ExportOutcome::Skipped(reason) => println!("export skipped: {reason}"),
        ExportOutcome::Failed(msg) => println!("export failed: {msg}"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("leadscout: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_json);

    if let Err(e) = config.require_places_api_key() {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }

    let pipeline = match build_pipeline(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(cache_dir = %config.cache_dir.display(), max_places = config.max_places, "starting lead search");

    let mut input = StdinInput::new();
    match pipeline.run(&mut input, cli.city, cli.category).await {
        Ok(report) => {
            tracing::info!(leads = report.leads.len(), details = report.details_found, "lead search finished");
            print_report(&report);
        }
        Err(e) => tracing::error!("lead search failed: {e:#}"),
    }

    ExitCode::SUCCESS
}
