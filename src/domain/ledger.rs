use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::errors::{BudgetError, Result};

use super::{amount::Amount, expense::ExpenseRecord, stage::normalize_stage_name};

/// Append-only list of expense records with a per-stage running total.
///
/// The totals map is a cache over `records`: it is incremented on every
/// append, so `total_for` always equals a full recomputation. Appends that
/// would push any total past `Decimal::MAX` are refused, which keeps every
/// sum over the ledger representable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseLedger {
    records: Vec<ExpenseRecord>,
    totals: HashMap<String, Amount>,
    grand_total: Amount,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from stored records, keeping their order.
    pub fn from_records(records: Vec<ExpenseRecord>) -> Result<Self> {
        let mut ledger = Self::default();
        for record in records {
            ledger.add(record)?;
        }
        Ok(ledger)
    }

    pub fn add(&mut self, record: ExpenseRecord) -> Result<()> {
        let record = record.normalized();
        record.validate()?;
        let stage_total = self
            .total_for(&record.stage)
            .checked_add(record.actual_cost)
            .ok_or_else(|| overflow(&record))?;
        let grand_total = self
            .grand_total
            .checked_add(record.actual_cost)
            .ok_or_else(|| overflow(&record))?;

        self.totals.insert(record.stage.clone(), stage_total);
        self.grand_total = grand_total;
        tracing::debug!(
            stage = %record.stage,
            cost = %record.actual_cost,
            "expense appended"
        );
        self.records.push(record);
        Ok(())
    }

    pub fn total_for(&self, stage_name: &str) -> Amount {
        self.totals
            .get(normalize_stage_name(stage_name))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn all_records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of every record regardless of stage.
    pub fn grand_total(&self) -> Amount {
        self.grand_total
    }

    /// Distinct stage names in order of first appearance.
    pub fn stages_with_activity(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.stage.as_str()) {
                seen.push(record.stage.as_str());
            }
        }
        seen
    }
}

fn overflow(record: &ExpenseRecord) -> BudgetError {
    BudgetError::validation(format!(
        "cost {} would push the total for `{}` out of range",
        record.actual_cost, record.stage
    ))
}
