//! Balances and overrun signals derived from a catalog and a ledger.

use std::fmt;

use serde::Serialize;

use crate::domain::{Amount, ExpenseLedger, StageCatalog};

/// Project-wide totals.
///
/// `estimated_total` only counts stages that appear in the ledger, while the
/// per-stage report always covers the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectTotals {
    pub actual_total: Amount,
    pub estimated_total: Amount,
    pub balance: Amount,
}

impl ProjectTotals {
    pub fn as_tuple(&self) -> (Amount, Amount, Amount) {
        (self.actual_total, self.estimated_total, self.balance)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageVariance {
    pub stage: String,
    pub estimated: Amount,
    pub actual: Amount,
    pub balance: Amount,
}

impl StageVariance {
    pub fn is_overrun(&self) -> bool {
        self.actual > self.estimated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesKind {
    Estimated,
    Actual,
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::Estimated => f.write_str("Estimated"),
            SeriesKind::Actual => f.write_str("Actual"),
        }
    }
}

/// One point of the estimated-versus-actual chart. Only actual points can be
/// flagged as overruns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BurndownPoint {
    pub stage: String,
    pub kind: SeriesKind,
    pub amount: Amount,
    pub overrun: bool,
}

/// Read-only view over a catalog and a ledger.
#[derive(Debug, Clone, Copy)]
pub struct VarianceCalculator<'a> {
    catalog: &'a StageCatalog,
    ledger: &'a ExpenseLedger,
}

impl<'a> VarianceCalculator<'a> {
    pub fn new(catalog: &'a StageCatalog, ledger: &'a ExpenseLedger) -> Self {
        Self { catalog, ledger }
    }

    pub fn balance(&self, stage_name: &str) -> Amount {
        self.catalog.get_estimate(stage_name) - self.ledger.total_for(stage_name)
    }

    pub fn is_overrun(&self, stage_name: &str) -> bool {
        self.ledger.total_for(stage_name) > self.catalog.get_estimate(stage_name)
    }

    pub fn project_totals(&self) -> ProjectTotals {
        let actual_total = self.ledger.grand_total();
        // Catalog and ledger both refuse values whose totals leave the
        // `Decimal` range, so these sums and differences cannot overflow.
        let estimated_total = self
            .ledger
            .stages_with_activity()
            .into_iter()
            .map(|stage| self.catalog.get_estimate(stage))
            .sum();
        ProjectTotals {
            actual_total,
            estimated_total,
            balance: estimated_total - actual_total,
        }
    }

    pub fn per_stage_report(&self) -> Vec<StageVariance> {
        self.catalog
            .stages()
            .iter()
            .map(|stage| {
                let actual = self.ledger.total_for(&stage.name);
                StageVariance {
                    stage: stage.name.clone(),
                    estimated: stage.estimated_cost,
                    actual,
                    balance: stage.estimated_cost - actual,
                }
            })
            .collect()
    }

    /// Two points per catalog stage, estimated first.
    pub fn burndown_series(&self) -> Vec<BurndownPoint> {
        self.per_stage_report()
            .into_iter()
            .flat_map(|row| {
                let overrun = row.is_overrun();
                [
                    BurndownPoint {
                        stage: row.stage.clone(),
                        kind: SeriesKind::Estimated,
                        amount: row.estimated,
                        overrun: false,
                    },
                    BurndownPoint {
                        stage: row.stage,
                        kind: SeriesKind::Actual,
                        amount: row.actual,
                        overrun,
                    },
                ]
            })
            .collect()
    }
}
