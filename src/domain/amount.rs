//! Exact decimal amounts used for every estimate, cost, and balance.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::{BudgetError, Result};

pub type Amount = Decimal;

/// Parses a plain decimal string such as `1234.56`.
///
/// Locale-formatted strings (`R$ 1.234,56`) are rejected; formatting is an
/// output-only concern.
pub fn parse_amount(raw: &str) -> Result<Amount> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BudgetError::validation("amount is required"));
    }
    Decimal::from_str(trimmed)
        .map_err(|_| BudgetError::validation(format!("`{trimmed}` is not a valid amount")))
}

pub fn ensure_non_negative(field: &str, amount: Amount) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(BudgetError::validation(format!(
            "{field} must not be negative (got {amount})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_plain_decimal() {
        assert_eq!(parse_amount(" 1234.56 ").unwrap(), dec!(1234.56));
    }

    #[test]
    fn rejects_formatted_currency() {
        assert!(parse_amount("R$ 1.234,56").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn negative_zero_is_accepted() {
        assert!(ensure_non_negative("cost", dec!(-0.00)).is_ok());
        assert!(ensure_non_negative("cost", dec!(-0.01)).is_err());
    }
}
