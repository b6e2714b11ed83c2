//! Best-effort export of ranked leads to a spreadsheet tab.
//!
//! Rows are rendered as plain text. Missing values are written as `N/A`, which
//! is the only place that marker exists.

use std::sync::Arc;

use leadscout_core::{AppConfig, ScoredRecord};

use crate::sheets::{SheetSink, SheetsClient};

/// Column header written as the first row of every tab.
pub const HEADER: [&str; 7] = ["Name", "Address", "Phone", "Website", "Rating", "User Ratings Total", "Score"];

/// Cell text for an absent value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Tab title for a query.
pub fn tab_title(city: &str, category: &str) -> String {
    format!("{} - {}", city.trim(), category.trim())
}

/// Drop a leading `+1 ` country code.
pub fn format_phone(phone: &str) -> &str {
    phone.strip_prefix("+1 ").unwrap_or(phone)
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

fn format_score(score: f64) -> String {
    let rounded = (score * 100.0).round() / 100.0;
    format!("{rounded}")
}

/// Render the header plus one text row per lead.
pub fn build_rows(leads: &[ScoredRecord]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(leads.len() + 1);
    rows.push(HEADER.iter().map(|h| h.to_string()).collect());

    for lead in leads {
        let r = &lead.record;
        rows.push(vec![
            text(r.name.as_deref()),
            text(r.address.as_deref()),
            text(r.phone.as_deref().map(format_phone)),
            text(r.website.as_deref()),
            r.rating.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string()),
            r.user_ratings_total.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string()),
            format_score(lead.score),
        ]);
    }
    rows
}

/// What happened to an export attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// Tab replaced with this many lead rows (header excluded).
    Written { rows: usize },
    /// Export not configured.
    Skipped(String),
    /// Export attempted and failed; already logged.
    Failed(String),
}

enum Target {
    Sink(Arc<dyn SheetSink>),
    Disabled(String),
}

/// Writes leads to a spreadsheet tab, never failing the run.
pub struct Exporter {
    target: Target,
}

impl Exporter {
    pub fn new(sink: Arc<dyn SheetSink>) -> Self {
        Self { target: Target::Sink(sink) }
    }

    /// An exporter that always reports [`ExportOutcome::Skipped`].
    pub fn disabled(reason: impl Into<String>) -> Self {
        Self { target: Target::Disabled(reason.into()) }
    }

    /// Use a [`SheetsClient`] when the config names a spreadsheet and
    /// credentials; otherwise export is disabled with the reason kept.
    pub fn from_config(config: &AppConfig) -> Self {
        match SheetsClient::from_app_config(config) {
            Ok(client) => Self::new(Arc::new(client)),
            Err(e) => Self::disabled(e.to_string()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.target, Target::Sink(_))
    }

    pub async fn export(&self, leads: &[ScoredRecord], city: &str, category: &str) -> ExportOutcome {
        let sink = match &self.target {
            Target::Sink(sink) => sink,
            Target::Disabled(reason) => {
                tracing::warn!(reason = %reason, "spreadsheet export skipped");
                return ExportOutcome::Skipped(reason.clone());
            }
        };

        let title = tab_title(city, category);
        let rows = build_rows(leads);

        match sink.replace_tab(&title, &rows).await {
            Ok(()) => {
                tracing::info!(tab = %title, rows = leads.len(), "leads exported");
                ExportOutcome::Written { rows: leads.len() }
            }
            Err(e) => {
                tracing::error!(tab = %title, error = ?e, "spreadsheet export failed: {e}");
                ExportOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::SheetsError;
    use async_trait::async_trait;
    use leadscout_core::NormalizedRecord;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        writes: Mutex<Vec<(String, Vec<Vec<String>>)>>,
        fail: bool,
    }

    #[async_trait]
    impl SheetSink for RecordingSink {
        async fn replace_tab(&self, title: &str, rows: &[Vec<String>]) -> Result<(), SheetsError> {
            if self.fail {
                return Err(SheetsError::Auth("token revoked".into()));
            }
            self.writes.lock().unwrap().push((title.to_string(), rows.to_vec()));
            Ok(())
        }
    }

    fn lead() -> ScoredRecord {
        ScoredRecord {
            record: NormalizedRecord {
                place_id: "p1".into(),
                name: Some("Blue Door".into()),
                address: Some("1 Main St".into()),
                phone: Some("+1 555-1212".into()),
                website: None,
                rating: Some(4.5),
                user_ratings_total: Some(120),
            },
            score: 7.5,
        }
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("+1 555-1212"), "555-1212");
        assert_eq!(format_phone("555-1212"), "555-1212");
        assert_eq!(format_phone("+44 20 7946 0958"), "+44 20 7946 0958");
    }

    #[test]
    fn test_tab_title() {
        assert_eq!(tab_title(" Austin ", "bakery"), "Austin - bakery");
    }

    #[test]
    fn test_build_rows() {
        let rows = build_rows(&[lead(), ScoredRecord { record: NormalizedRecord::default(), score: 0.0 }]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], HEADER.map(String::from).to_vec());
        assert_eq!(rows[1], vec!["Blue Door", "1 Main St", "555-1212", "N/A", "4.5", "120", "7.5"]);
        assert_eq!(rows[2], vec!["N/A", "N/A", "N/A", "N/A", "N/A", "N/A", "0"]);
    }

    #[test]
    fn test_score_is_rounded() {
        assert_eq!(format_score(4.1 + 2.0 + 1.0), "7.1");
        assert_eq!(format_score(3.456), "3.46");
    }

    #[tokio::test]
    async fn test_export_writes_tab() {
        let sink = Arc::new(RecordingSink::default());
        let exporter = Exporter::new(sink.clone());

        let outcome = exporter.export(&[lead()], "Austin", "bakery").await;
        assert_eq!(outcome, ExportOutcome::Written { rows: 1 });

        let writes = sink.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, "Austin - bakery");
        assert_eq!(writes[0].1.len(), 2);
    }

    #[tokio::test]
    async fn test_export_failure_is_swallowed() {
        let exporter = Exporter::new(Arc::new(RecordingSink { fail: true, ..Default::default() }));
        let outcome = exporter.export(&[lead()], "Austin", "bakery").await;
        assert!(matches!(outcome, ExportOutcome::Failed(ref msg) if msg.contains("token revoked")));
    }

    #[tokio::test]
    async fn test_disabled_exporter_skips() {
        let exporter = Exporter::from_config(&AppConfig::default());
        assert!(!exporter.is_enabled());
        let outcome = exporter.export(&[lead()], "Austin", "bakery").await;
        assert!(matches!(outcome, ExportOutcome::Skipped(ref reason) if reason.contains("spreadsheet id")));
    }
}
