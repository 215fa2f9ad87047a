//! Report aggregation over raw financial records
//!
//! Groups invoices and expenses into report-specific rows for the renderer
//! layer. Rows are request-scoped: computed on demand from the supplied
//! snapshot, never persisted, and re-derivable from the same inputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::traits::RecordSource;
use crate::types::*;

pub mod aging;
pub mod gst;
pub mod revenue;

pub use aging::*;
pub use gst::*;
pub use revenue::*;

/// Filter window applied to raw records before aggregation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportWindow {
    /// Earliest date, inclusive
    pub start: Option<NaiveDate>,
    /// Latest date, inclusive
    pub end: Option<NaiveDate>,
    /// Restrict to a single client
    pub client: Option<String>,
    /// Restrict to an expense category
    pub category: Option<String>,
}

impl ReportWindow {
    /// Window matching every record
    pub fn all() -> Self {
        Self::default()
    }

    /// Window covering an inclusive date range
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    /// Restrict the window to a single client
    pub fn for_client(mut self, client: String) -> Self {
        self.client = Some(client);
        self
    }

    /// Restrict the window to an expense category
    pub fn for_category(mut self, category: String) -> Self {
        self.category = Some(category);
        self
    }

    /// Whether a record date falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }

    /// Whether a record's client matches the window filter
    pub fn matches_client(&self, client_name: Option<&str>) -> bool {
        match &self.client {
            Some(wanted) => client_name == Some(wanted.as_str()),
            None => true,
        }
    }

    /// Whether a record's category matches the window filter
    pub fn matches_category(&self, category: Option<&str>) -> bool {
        match &self.category {
            Some(wanted) => category == Some(wanted.as_str()),
            None => true,
        }
    }
}

/// Aggregates records from a source into report rows
pub struct ReportAggregator<S: RecordSource> {
    source: S,
}

impl<S: RecordSource> ReportAggregator<S> {
    /// Create an aggregator over the given record source
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Receivables aging rows for unpaid invoices as of `today`
    pub async fn aging(
        &self,
        window: &ReportWindow,
        today: NaiveDate,
    ) -> DocumentResult<Vec<AgingRow>> {
        let invoices = self.source.invoices(window).await?;
        let rows = aging_rows(&invoices, today);
        if rows.is_empty() {
            warn!(?window, "aging report produced no rows");
        }
        Ok(rows)
    }

    /// Revenue, expense, and profit totals grouped by client
    pub async fn revenue_by_client(
        &self,
        window: &ReportWindow,
    ) -> DocumentResult<Vec<RevenueRow>> {
        let invoices = self.source.invoices(window).await?;
        let expenses = self.source.expenses(window).await?;
        Ok(revenue_rows(&invoices, &expenses))
    }

    /// GST register rows with CGST/SGST/IGST totals
    pub async fn gst_register(&self, window: &ReportWindow) -> DocumentResult<GstRegister> {
        let invoices = self.source.invoices(window).await?;
        Ok(build_gst_register(&invoices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_date_bounds_are_inclusive() {
        let window = ReportWindow::between(date(2024, 1, 1), date(2024, 1, 31));
        assert!(window.contains(date(2024, 1, 1)));
        assert!(window.contains(date(2024, 1, 31)));
        assert!(!window.contains(date(2023, 12, 31)));
        assert!(!window.contains(date(2024, 2, 1)));
    }

    #[test]
    fn test_window_client_filter() {
        let window = ReportWindow::all().for_client("Globex".to_string());
        assert!(window.matches_client(Some("Globex")));
        assert!(!window.matches_client(Some("Initech")));
        assert!(!window.matches_client(None));
        assert!(ReportWindow::all().matches_client(None));
    }
}
