//! Display-only currency formatting. Nothing produced here is ever parsed back
//! into an amount.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("BRL")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegativeStyle {
    Sign,
    Parentheses,
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub negative_style: NegativeStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "pt-BR".into(),
            decimal_separator: ',',
            grouping_separator: '.',
            negative_style: NegativeStyle::Sign,
        }
    }
}

pub fn symbol_for(code: &str) -> &str {
    match code {
        "BRL" => "R$",
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        other => other,
    }
}

pub fn minor_units_for(code: &str) -> u32 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: Decimal, precision: u32) -> String {
    let rounded = value
        .abs()
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
        .to_string();
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), frac_part.to_string()),
        None => (rounded, String::new()),
    };
    let mut body = group_digits(&int_part, locale.grouping_separator);
    if precision > 0 {
        body.push(locale.decimal_separator);
        body.push_str(&frac_part);
        for _ in frac_part.len()..precision as usize {
            body.push('0');
        }
    }
    body
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Renders `amount` as e.g. `R$ 1.234,56`, `R$ -200,00` or `R$ (200,00)`.
pub fn format_amount(amount: Decimal, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(locale, amount, precision);
    // Sign of what is shown: an amount that rounds to zero prints unsigned.
    let shown = amount.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let negative = shown.is_sign_negative() && !shown.is_zero();
    let body = match (negative, locale.negative_style) {
        (false, _) => body,
        (true, NegativeStyle::Sign) => format!("-{body}"),
        (true, NegativeStyle::Parentheses) => format!("({body})"),
    };
    format!("{} {}", symbol_for(code.as_str()), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_brazilian_real() {
        let code = CurrencyCode::default();
        let locale = LocaleConfig::default();
        assert_eq!(format_amount(dec!(1234.56), &code, &locale), "R$ 1.234,56");
        assert_eq!(format_amount(dec!(110000), &code, &locale), "R$ 110.000,00");
        assert_eq!(format_amount(dec!(-200), &code, &locale), "R$ -200,00");
        assert_eq!(format_amount(dec!(0.005), &code, &locale), "R$ 0,01");
    }

    #[test]
    fn amounts_rounding_to_zero_have_no_sign() {
        let code = CurrencyCode::default();
        let locale = LocaleConfig::default();
        assert_eq!(format_amount(dec!(-0.004), &code, &locale), "R$ 0,00");
        assert_eq!(format_amount(dec!(-0.005), &code, &locale), "R$ -0,01");
        let parens = LocaleConfig {
            negative_style: NegativeStyle::Parentheses,
            ..LocaleConfig::default()
        };
        assert_eq!(format_amount(dec!(-0.001), &code, &parens), "R$ 0,00");
    }

    #[test]
    fn formats_with_parentheses_and_other_separators() {
        let locale = LocaleConfig {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            negative_style: NegativeStyle::Parentheses,
        };
        let code = CurrencyCode::new("usd");
        assert_eq!(format_amount(dec!(-1234567.8), &code, &locale), "$ (1,234,567.80)");
        assert_eq!(
            format_amount(dec!(1500), &CurrencyCode::new("JPY"), &locale),
            "¥ 1,500"
        );
    }
}
