//! Display formatting and parsing of amounts in German notation.
//!
//! Currency uses a `€` prefix, `.` as thousands separator and `,` as decimal
//! separator (`€10.000,00`). [`format_percentage`] uses a period decimal
//! separator (`0.12%`); [`format_percentage_de`] uses a comma.

use crate::error::{Error, Result};
use crate::types::SalaryAmount;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::LazyLock;

/// German notation with a decimal comma, thousands dots optional: `8.050,50`, `8050,5`.
static GERMAN_DECIMAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d{1,3}(?:\.\d{3})+|\d+),\d+$").unwrap());

/// Integer with thousands dots: `10.000`, `1.250.000`.
static GERMAN_GROUPED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(?:\.\d{3})+$").unwrap());

/// Plain number with an optional decimal point: `8050`, `8050.5`.
static PLAIN_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").unwrap());

/// Currency markers accepted around an amount.
static CURRENCY_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^€\s*|\s*(?:€|eur)$").unwrap());

/// Format an amount as `€1.234,56`, rounded to cents.
pub fn format_currency(amount: Decimal) -> String {
    format_euro(amount, 2)
}

/// Format an amount as `€8.050`, rounded to whole euros. Used for axis labels.
pub fn format_currency_whole(amount: Decimal) -> String {
    format_euro(amount, 0)
}

/// Format an amount with the decimals it actually has, at least two: `€12,075`.
pub fn format_currency_exact(amount: Decimal) -> String {
    let scale = amount.normalize().scale().max(2);
    format_euro(amount, scale)
}

/// Format a fractional rate as a percentage: `0.0012` -> `0.12%`.
pub fn format_percentage(rate: Decimal) -> String {
    let mut percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    percent.rescale(2);
    format!("{}%", percent)
}

/// Format a fractional rate as a German percentage: `0.0012` -> `0,12%`.
pub fn format_percentage_de(rate: Decimal) -> String {
    format!("{}%", format_decimal_de(rate * Decimal::ONE_HUNDRED, 2))
}

/// Format a signed difference with an explicit sign: `+€0,08`, `-€5,92`.
pub fn format_difference(amount: Decimal) -> String {
    if amount > Decimal::ZERO {
        format!("+{}", format_currency(amount))
    } else {
        format_currency(amount)
    }
}

fn format_euro(amount: Decimal, decimals: u32) -> String {
    let formatted = format_decimal_de(amount.abs(), decimals);
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-€{}", formatted)
    } else {
        format!("€{}", formatted)
    }
}

/// Format a number in German notation with a fixed number of decimals.
pub fn format_decimal_de(value: Decimal, decimals: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);

    let text = rounded.abs().to_string();
    let (integer, fraction) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut result = String::with_capacity(text.len() + text.len() / 3);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        result.push('-');
    }
    result.push_str(&group_thousands(integer, '.'));
    if let Some(fraction) = fraction {
        result.push(',');
        result.push_str(fraction);
    }
    result
}

/// Insert `separator` between every group of three digits from the right.
fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }
    grouped
}

/// Parse a salary written in German or plain notation.
///
/// Accepts `10.000`, `€8.050,50`, `8050 EUR`, and `8050.5`. A dot followed by
/// exactly three digits is read as a thousands separator.
pub fn parse_amount(text: &str) -> Result<SalaryAmount> {
    let trimmed = text.trim();
    let stripped = CURRENCY_MARKER_REGEX.replace_all(trimmed, "");
    let candidate = stripped.trim();

    if candidate.is_empty() {
        return Err(Error::InvalidArgument("empty amount".to_string()));
    }
    if candidate.starts_with('-') {
        return Err(Error::InvalidArgument(format!(
            "amount must not be negative: {}",
            text
        )));
    }

    let canonical = if GERMAN_DECIMAL_REGEX.is_match(candidate) {
        candidate.replace('.', "").replace(',', ".")
    } else if GERMAN_GROUPED_REGEX.is_match(candidate) {
        candidate.replace('.', "")
    } else if PLAIN_NUMBER_REGEX.is_match(candidate) {
        candidate.to_string()
    } else {
        return Err(Error::InvalidArgument(format!("not an amount: {}", text)));
    };

    let value = Decimal::from_str(&canonical)
        .map_err(|e| Error::InvalidArgument(format!("not an amount: {} ({})", text, e)))?;
    SalaryAmount::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(12.08)), "€12,08");
        assert_eq!(format_currency(dec!(6)), "€6,00");
        assert_eq!(format_currency(dec!(10000)), "€10.000,00");
        assert_eq!(format_currency(dec!(1234567.891)), "€1.234.567,89");
        assert_eq!(format_currency(dec!(0)), "€0,00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-5.92)), "-€5,92");
        assert_eq!(format_currency(dec!(-11.92)), "-€11,92");
    }

    #[test]
    fn test_format_currency_rounds_half_up() {
        assert_eq!(format_currency(dec!(12.075)), "€12,08");
    }

    #[test]
    fn test_format_currency_whole() {
        assert_eq!(format_currency_whole(dec!(8050)), "€8.050");
        assert_eq!(format_currency_whole(dec!(500)), "€500");
        assert_eq!(format_currency_whole(dec!(30000)), "€30.000");
    }

    #[test]
    fn test_format_currency_exact() {
        assert_eq!(format_currency_exact(dec!(12.075)), "€12,075");
        assert_eq!(format_currency_exact(dec!(12.000)), "€12,00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(dec!(0.0012)), "0.12%");
        assert_eq!(format_percentage(dec!(0.0015)), "0.15%");
        assert_eq!(format_percentage(dec!(0.001208)), "0.12%");
        assert_eq!(format_percentage(dec!(0.000604)), "0.06%");
        assert_eq!(format_percentage(dec!(0)), "0.00%");
    }

    #[test]
    fn test_format_percentage_de() {
        assert_eq!(format_percentage_de(dec!(0.0012)), "0,12%");
        assert_eq!(format_percentage_de(dec!(0.0015)), "0,15%");
    }

    #[test]
    fn test_format_difference() {
        assert_eq!(format_difference(dec!(0.08)), "+€0,08");
        assert_eq!(format_difference(dec!(-5.92)), "-€5,92");
        assert_eq!(format_difference(dec!(0)), "€0,00");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1", '.'), "1");
        assert_eq!(group_thousands("123", '.'), "123");
        assert_eq!(group_thousands("1234", '.'), "1.234");
        assert_eq!(group_thousands("1234567", '.'), "1.234.567");
    }

    #[test]
    fn test_parse_amount_german() {
        assert_eq!(parse_amount("10.000").unwrap().value(), dec!(10000));
        assert_eq!(parse_amount("€8.050,50").unwrap().value(), dec!(8050.50));
        assert_eq!(parse_amount("8050,5").unwrap().value(), dec!(8050.5));
        assert_eq!(parse_amount("1.250.000").unwrap().value(), dec!(1250000));
    }

    #[test]
    fn test_parse_amount_plain() {
        assert_eq!(parse_amount("8050").unwrap().value(), dec!(8050));
        assert_eq!(parse_amount("8050.5").unwrap().value(), dec!(8050.5));
        assert_eq!(parse_amount(" 5000 EUR ").unwrap().value(), dec!(5000));
        assert_eq!(parse_amount("5000€").unwrap().value(), dec!(5000));
    }

    #[test]
    fn test_parse_amount_rejects_malformed() {
        assert!(matches!(parse_amount(""), Err(Error::InvalidArgument(_))));
        assert!(parse_amount("€").is_err());
        assert!(parse_amount("-100").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("1.2.3").is_err());
        assert!(parse_amount("10.00.000").is_err());
        assert!(parse_amount("NaN").is_err());
    }
}
