use std::fmt;

use super::state::EngineState;

/// Conditions that do not block aggregation but indicate inconsistent data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataQualityIssue {
    /// Expenses reference a stage the catalog does not know; their cost counts
    /// towards actuals but has no estimate.
    UnknownStage { stage: String, records: usize },
    UnknownSupplier { supplier: String, records: usize },
}

impl fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityIssue::UnknownStage { stage, records } => {
                write!(f, "{records} record(s) reference unknown stage `{stage}`")
            }
            DataQualityIssue::UnknownSupplier { supplier, records } => {
                write!(f, "{records} record(s) use unlisted supplier `{supplier}`")
            }
        }
    }
}

/// Lists unknown stages and suppliers in order of first appearance. An empty
/// supplier list disables the supplier check.
pub fn data_quality_issues(state: &EngineState, suppliers: &[String]) -> Vec<DataQualityIssue> {
    let mut stages: Vec<(String, usize)> = Vec::new();
    let mut unlisted: Vec<(String, usize)> = Vec::new();

    for record in state.ledger.all_records() {
        if !state.catalog.contains(&record.stage) {
            bump(&mut stages, &record.stage);
        }
        if !suppliers.is_empty() && !suppliers.iter().any(|known| known == &record.supplier) {
            bump(&mut unlisted, &record.supplier);
        }
    }

    stages
        .into_iter()
        .map(|(stage, records)| DataQualityIssue::UnknownStage { stage, records })
        .chain(
            unlisted
                .into_iter()
                .map(|(supplier, records)| DataQualityIssue::UnknownSupplier { supplier, records }),
        )
        .collect()
}

fn bump(counts: &mut Vec<(String, usize)>, key: &str) {
    match counts.iter_mut().find(|(name, _)| name == key) {
        Some((_, count)) => *count += 1,
        None => counts.push((key.to_string(), 1)),
    }
}
