use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tolerance under which a debit/credit difference is considered balanced.
pub const BALANCE_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest amount a line may carry: 15 digits, 2 of them decimals.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2);

/// A debit or credit cell: the text the user typed plus its parsed value.
///
/// Parsing happens once, when the text is set. Blank or unparseable text
/// has no value and counts as zero in every total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Decimal>,
}

impl Amount {
    pub fn parse(text: impl Into<String>) -> Self {
        let raw = text.into();
        let value = parse_decimal(&raw);
        Self { raw, value }
    }

    /// Builds a cell from a decimal, rendered with two fraction digits.
    pub fn from_decimal(value: Decimal) -> Self {
        Self {
            raw: format_amount(value),
            value: Some(value.round_dp(2)),
        }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value
    }

    /// Parsed value, with blank or invalid text treated as zero.
    pub fn value_or_zero(&self) -> Decimal {
        self.value.unwrap_or(Decimal::ZERO)
    }

    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// True when the parsed value is larger than [`MAX_AMOUNT`] either way.
    pub fn exceeds_limit(&self) -> bool {
        self.value.is_some_and(|value| value.abs() > MAX_AMOUNT)
    }

    pub fn is_non_zero(&self) -> bool {
        !self.value_or_zero().is_zero()
    }
}

/// Parses user-typed decimal text. Accepts `,` as decimal separator and
/// ignores spaces used for digit grouping.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '\u{a0}')
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Fixed two-decimal rendering used for computed amounts.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// True when two totals differ by strictly less than [`BALANCE_EPSILON`].
pub fn within_epsilon(left: Decimal, right: Decimal) -> bool {
    left.checked_sub(right).is_some_and(|diff| diff.abs() < BALANCE_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_comma_decimals() {
        assert_eq!(parse_decimal("100.50"), Some(Decimal::new(10050, 2)));
        assert_eq!(parse_decimal(" 1 250,75 "), Some(Decimal::new(125075, 2)));
    }

    #[test]
    fn blank_and_garbage_count_as_zero() {
        assert_eq!(Amount::parse("").value_or_zero(), Decimal::ZERO);
        assert_eq!(Amount::parse("abc").value_or_zero(), Decimal::ZERO);
        assert!(!Amount::parse("abc").is_blank());
    }

    #[test]
    fn computed_amounts_use_two_decimals() {
        let amount = Amount::from_decimal(Decimal::new(50, 0));
        assert_eq!(amount.raw(), "50.00");
        assert_eq!(format_amount(Decimal::new(12345, 3)), "12.35");
    }

    #[test]
    fn limit_is_fifteen_digits() {
        assert_eq!(MAX_AMOUNT, Decimal::new(999_999_999_999_999, 2));
        assert!(!Amount::parse("9999999999999.99").exceeds_limit());
        assert!(Amount::parse("10000000000000").exceeds_limit());
        assert!(Amount::parse("-79228162514264337593543950335").exceeds_limit());
        assert!(!Amount::parse("abc").exceeds_limit());
    }

    #[test]
    fn epsilon_never_overflows() {
        assert!(!within_epsilon(Decimal::MAX, Decimal::MIN));
    }

    #[test]
    fn epsilon_is_strict() {
        assert!(within_epsilon(Decimal::new(10000, 2), Decimal::new(100009, 3)));
        assert!(!within_epsilon(Decimal::new(10001, 2), Decimal::new(10000, 2)));
        assert!(within_epsilon(Decimal::new(100005, 3), Decimal::new(100, 0)));
    }
}
