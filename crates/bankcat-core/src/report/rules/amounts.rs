//! Amount token conversion.
//!
//! Tokens come straight from transcribed text or table cells, e.g.
//! `1.28万`, `8,030.47`, `¥5,230.89` or `**2,150.50**`. Parsing goes through
//! [`Decimal`] so that the ten-thousand unit scales exactly; amounts too
//! large for it fall back to `f64`.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::{AMOUNT_TOKEN, TEN_THOUSAND};

const CURRENCY_GLYPHS: [char; 3] = ['¥', '￥', '$'];

/// Multiplier for the 万 unit.
pub fn ten_thousand() -> Decimal {
    Decimal::from(10_000)
}

/// Check whether a whole token is an amount in report notation.
pub fn is_amount_token(token: &str) -> bool {
    AMOUNT_TOKEN.is_match(token)
}

/// Fold a full-width digit to ASCII.
fn fold_digit(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
        _ => c,
    }
}

/// Strip a token down to its bare number and count its 万 suffixes.
///
/// Returns `None` unless what is left is ASCII digits with at most one
/// decimal point and an optional leading minus sign.
fn split_number(token: &str) -> Option<(String, u32)> {
    let mut units = 0;
    let mut number = String::with_capacity(token.len());

    for c in token.chars().map(fold_digit) {
        match c {
            TEN_THOUSAND => units += 1,
            '*' | ',' => {}
            c if c.is_whitespace() || CURRENCY_GLYPHS.contains(&c) => {}
            c => number.push(c),
        }
    }

    let digits = number.strip_prefix('-').unwrap_or(&number);
    let well_formed = digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1;

    well_formed.then_some((number, units))
}

fn scale_decimal(value: Decimal, units: u32) -> Option<Decimal> {
    (0..units).try_fold(value, |acc, _| acc.checked_mul(ten_thousand()))
}

/// Parse an amount token into an exact decimal.
///
/// Bold markers, whitespace, currency glyphs and thousands separators are
/// dropped; a `万` suffix multiplies the number by 10,000. Returns `None`
/// when what is left is not a number or does not fit a [`Decimal`].
pub fn parse_amount(token: &str) -> Option<Decimal> {
    let (number, units) = split_number(token)?;
    scale_decimal(Decimal::from_str(&number).ok()?, units)
}

/// Convert an exact decimal into a finite float.
pub fn decimal_to_f64(value: Decimal) -> Option<f64> {
    value
        .normalize()
        .to_string()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Convert an amount token into a float, or `None` when unparsable.
pub fn convert_amount(token: &str) -> Option<f64> {
    convert_scaled(token, false)
}

/// Convert an amount token from a column denominated in 万.
///
/// With `ten_thousand_unit` set the result is scaled once more on top of
/// any `万` suffix in the token itself. Amounts beyond [`Decimal`] range
/// fall back to float arithmetic; the result is always finite.
pub fn convert_scaled(token: &str, ten_thousand_unit: bool) -> Option<f64> {
    let (number, suffixes) = split_number(token)?;
    let units = suffixes + u32::from(ten_thousand_unit);

    let exact = Decimal::from_str(&number)
        .ok()
        .and_then(|value| scale_decimal(value, units))
        .and_then(decimal_to_f64);

    exact.or_else(|| {
        let value = number.parse::<f64>().ok()? * 10_000f64.powi(units as i32);
        value.is_finite().then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_convert_ten_thousand() {
        assert_eq!(convert_amount("1.28万"), Some(12800.0));
        assert_eq!(convert_amount("3万"), Some(30000.0));
        assert_eq!(convert_amount("**1.5 万**"), Some(15000.0));
        assert_eq!(convert_amount("0.07万"), Some(700.0));
    }

    #[test]
    fn test_convert_thousands_separator() {
        assert_eq!(convert_amount("8,030.47"), Some(8030.47));
        assert_eq!(convert_amount("1,234,567.89"), Some(1234567.89));
        assert_eq!(convert_amount("1,280.50万"), Some(12805000.0));
    }

    #[test]
    fn test_convert_currency() {
        assert_eq!(convert_amount("¥5,230.89"), Some(5230.89));
        assert_eq!(convert_amount("$ 12.00"), Some(12.0));
        assert_eq!(convert_amount("￥980.23"), Some(980.23));
        assert_eq!(convert_amount("**2,150.50**"), Some(2150.5));
    }

    #[test]
    fn test_convert_unparsable() {
        assert_eq!(convert_amount(""), None);
        assert_eq!(convert_amount("更多(12类)"), None);
        assert_eq!(convert_amount("--"), None);
        assert_eq!(convert_amount("万"), None);
        assert_eq!(convert_amount("1.2.3"), None);
        assert_eq!(convert_amount("inf"), None);
    }

    #[test]
    fn test_parse_amount_is_exact() {
        assert_eq!(parse_amount("1.28万"), Some(Decimal::from(12800)));
        assert_eq!(
            parse_amount("8,030.47"),
            Some(Decimal::from_str("8030.47").unwrap())
        );
    }

    #[test]
    fn test_convert_beyond_decimal_range() {
        assert_eq!(parse_amount("123456789012345678901234567890.00"), None);
        assert_eq!(
            convert_amount("123456789012345678901234567890.00"),
            Some(123456789012345678901234567890.0)
        );
        assert_eq!(
            convert_amount("99999999999999999999999999999万"),
            Some(99999999999999999999999999999.0 * 10_000.0)
        );
        assert_eq!(convert_amount(&format!("{}.0", "9".repeat(400))), None);
    }

    #[test]
    fn test_convert_full_width_digits() {
        assert_eq!(convert_amount("１２.５０"), Some(12.5));
        assert_eq!(convert_amount("３万"), Some(30000.0));
    }

    #[test]
    fn test_convert_scaled() {
        assert_eq!(convert_scaled("3.5", true), Some(35000.0));
        assert_eq!(convert_scaled("3.5", false), Some(3.5));
        assert_eq!(convert_scaled("1万", true), Some(100_000_000.0));
        assert_eq!(convert_scaled("-5.00", false), Some(-5.0));
        assert_eq!(convert_scaled("+20%", true), None);
    }

    #[test]
    fn test_is_amount_token() {
        assert!(is_amount_token("1.28万"));
        assert!(is_amount_token("**¥2,150.50**"));
        assert!(is_amount_token("１２.５０"));
        assert!(!is_amount_token("١٢.٥٠"));
        assert!(!is_amount_token("交通"));
    }
}
