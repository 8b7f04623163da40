use serde::Serialize;

use super::TestItem;
use crate::failure::{self, DisplayMessage};
use crate::report::ReportsById;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Passed,
    Failed,
    Skipped,
    /// The report has no row for this item.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutcome {
    pub id: String,
    pub status: OutcomeStatus,
    /// Number of report rows (parameter instantiations, repeats) seen.
    pub runs: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<DisplayMessage>,
}

/// Map every test case under `root` onto its report rows.
pub fn evaluate(root: &TestItem, reports_by_id: &ReportsById) -> Vec<ItemOutcome> {
    root.test_cases()
        .into_iter()
        .map(|item| {
            let Some(reports) = reports_by_id.get(&item.id) else {
                tracing::debug!("No report rows for {}", item.id);
                return ItemOutcome {
                    id: item.id.clone(),
                    status: OutcomeStatus::Missing,
                    runs: 0,
                    messages: Vec::new(),
                };
            };

            let messages: Vec<DisplayMessage> = reports
                .iter()
                .flat_map(|report| &report.failures)
                .map(|f| failure::build(item, f))
                .collect();

            let status = if reports.iter().any(|r| !r.has_passed) {
                OutcomeStatus::Failed
            } else if reports.iter().all(|r| r.is_skipped()) {
                OutcomeStatus::Skipped
            } else {
                OutcomeStatus::Passed
            };

            ItemOutcome {
                id: item.id.clone(),
                status,
                runs: reports.len(),
                messages,
            }
        })
        .collect()
}
