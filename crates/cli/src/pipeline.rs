//! One lead-finding run: fetch, normalize, score, rank, cache, export.
//!
//! Stages run strictly in sequence and each completes before the next starts.
//! Search failures abort the run; detail and export failures only degrade it.

use anyhow::Context;
use leadscout_client::{ExportOutcome, Exporter, Fetcher};
use leadscout_core::{LeadCache, LeadSnapshot, ScoredRecord, normalize, rank, scored};

use crate::prompt::{InputProvider, ask_query};

/// Result of a completed run.
#[derive(Debug)]
pub struct RunReport {
    pub city: String,
    pub category: String,
    /// Leads, best first.
    pub leads: Vec<ScoredRecord>,
    pub details_found: usize,
    pub export: ExportOutcome,
}

pub struct Pipeline {
    fetcher: Fetcher,
    leads: LeadCache,
    exporter: Exporter,
}

impl Pipeline {
    pub fn new(fetcher: Fetcher, leads: LeadCache, exporter: Exporter) -> Self {
        Self { fetcher, leads, exporter }
    }

    /// Ask for the query, then run it.
    pub async fn run(
        &self, input: &mut dyn InputProvider, city: Option<String>, category: Option<String>,
    ) -> anyhow::Result<RunReport> {
        let query = ask_query(input, city, category).await?;
        self.run_query(&query.city, &query.category).await
    }

    pub async fn run_query(&self, city: &str, category: &str) -> anyhow::Result<RunReport> {
        tracing::info!(city, category, "searching for leads");

        let places = self
            .fetcher
            .fetch_all(city, category)
            .await
            .with_context(|| format!("search for {category} in {city} failed"))?;

        let details = self.fetcher.fetch_details(&places).await;
        let details_found = details.iter().filter(|d| d.is_some()).count();

        let mut leads: Vec<ScoredRecord> = places
            .iter()
            .zip(&details)
            .map(|(place, detail)| scored(normalize(place, detail.as_ref())))
            .collect();
        rank(&mut leads);

        let snapshot = LeadSnapshot::new(city, category, leads);
        self.leads.put(&snapshot).await.context("failed to write lead cache")?;
        tracing::info!(leads = snapshot.leads.len(), "lead cache written");

        let export = self.exporter.export(&snapshot.leads, city, category).await;

        Ok(RunReport {
            city: city.to_string(),
            category: category.to_string(),
            leads: snapshot.leads,
            details_found,
            export,
        })
    }
}
