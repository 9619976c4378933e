use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{BudgetError, Result};

use super::{
    amount::{ensure_non_negative, Amount},
    stage::normalize_stage_name,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether an expense paid for goods or for labour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Product,
    Service,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 2] = [ExpenseCategory::Product, ExpenseCategory::Service];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Product => "Product",
            ExpenseCategory::Service => "Service",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = BudgetError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "product" => Ok(ExpenseCategory::Product),
            "service" => Ok(ExpenseCategory::Service),
            other => Err(BudgetError::validation(format!(
                "unknown category `{other}` (expected Product or Service)"
            ))),
        }
    }
}

/// One logged cost event. Immutable once appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub description: String,
    pub stage: String,
    pub category: ExpenseCategory,
    pub supplier: String,
    pub actual_cost: Amount,
}

impl ExpenseRecord {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        stage: impl Into<String>,
        category: ExpenseCategory,
        supplier: impl Into<String>,
        actual_cost: Amount,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            stage: stage.into(),
            category,
            supplier: supplier.into(),
            actual_cost,
        }
        .normalized()
    }

    /// Trims the free-text fields to the form they take once stored, so a
    /// saved record reads back equal to itself.
    pub fn normalized(self) -> Self {
        Self {
            stage: normalize_stage_name(&self.stage).to_string(),
            description: self.description.trim().to_string(),
            supplier: self.supplier.trim().to_string(),
            ..self
        }
    }

    /// Checks the constraints every stored record must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.stage.trim().is_empty() {
            return Err(BudgetError::validation("stage is required"));
        }
        ensure_non_negative("actual cost", self.actual_cost)
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        BudgetError::validation(format!("`{trimmed}` is not a valid date (use YYYY-MM-DD)"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(stage: &str, cost: Amount) -> ExpenseRecord {
        ExpenseRecord::new(
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            "Concrete",
            stage,
            ExpenseCategory::Product,
            "YUMA",
            cost,
        )
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!(
            "service".parse::<ExpenseCategory>().unwrap(),
            ExpenseCategory::Service
        );
        assert!("labour".parse::<ExpenseCategory>().is_err());
    }

    #[test]
    fn validate_requires_stage_and_non_negative_cost() {
        assert!(record("Foundation", dec!(10)).validate().is_ok());
        assert!(record("  ", dec!(10)).validate().is_err());
        assert!(record("Foundation", dec!(-0.01)).validate().is_err());
    }

    #[test]
    fn free_text_fields_are_trimmed() {
        let mut padded = record(" Foundation ", dec!(10));
        assert_eq!(padded.stage, "Foundation");
        padded.supplier = "  YUMA\t".to_string();
        padded.description = " Concrete ".to_string();
        let cleaned = padded.normalized();
        assert_eq!(cleaned.supplier, "YUMA");
        assert_eq!(cleaned.description, "Concrete");
    }

    #[test]
    fn parse_date_rejects_malformed_input() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("02/03/2024").is_err());
    }
}
