//! Utility functions and helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Separators and precision used to print amounts
#[derive(Debug, Clone, PartialEq)]
pub struct AmountStyle {
    pub decimal_places: u32,
    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl Default for AmountStyle {
    fn default() -> Self {
        Self {
            decimal_places: 2,
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        }
    }
}

/// Insert `separator` between groups of three digits, counting from the right
pub fn group_thousands(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Format an amount with fixed decimal places and grouped thousands
pub fn format_amount(value: Decimal, style: &AmountStyle) -> String {
    let rounded =
        value.round_dp_with_strategy(style.decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", style.decimal_places as usize, rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut result = String::new();
    if negative {
        result.push('-');
    }
    result.push_str(&group_thousands(int_part, &style.thousands_separator));
    if let Some(frac) = frac_part {
        result.push_str(&style.decimal_separator);
        result.push_str(frac);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_amount_default_style() {
        let style = AmountStyle::default();
        assert_eq!(format_amount(dec("1234567.891"), &style), "1,234,567.89");
        assert_eq!(format_amount(dec("0.005"), &style), "0.01");
        assert_eq!(format_amount(dec("-1500"), &style), "-1,500.00");
        assert_eq!(format_amount(Decimal::ZERO, &style), "0.00");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1234567", ","), "1,234,567");
        assert_eq!(group_thousands("999", ","), "999");
        assert_eq!(group_thousands("1000", "'"), "1'000");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        let style = AmountStyle::default();
        assert_eq!(format_amount(dec("-0.001"), &style), "0.00");
    }

    #[test]
    fn test_format_amount_custom_separators() {
        let style = AmountStyle {
            decimal_places: 3,
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
        };
        assert_eq!(format_amount(dec("9876543.2"), &style), "9.876.543,200");

        let whole = AmountStyle {
            decimal_places: 0,
            ..AmountStyle::default()
        };
        assert_eq!(format_amount(dec("12345.6"), &whole), "12,346");
    }
}
