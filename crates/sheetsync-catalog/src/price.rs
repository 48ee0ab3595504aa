//! Lenient numeric parsing for hand-edited price and stock cells.
//!
//! Cells are typed by people, so both parsers read the leading number and
//! ignore trailing text (`"1.200,00 à vista"`, `"5 un"`).

use std::str::FromStr;

use rust_decimal::Decimal;

const CURRENCY_PREFIX: &str = "R$";

/// Stock reported when the cell is blank, unparsable, zero, or negative.
pub const DEFAULT_STOCK: u32 = 1;

/// Parses a Brazilian-formatted currency amount such as `"R$ 1.234,56"`.
///
/// The currency prefix is removed, `.` is read as a thousands separator and
/// `,` as the decimal separator. Returns `None` when no number can be read.
/// The sign is preserved; rejecting non-positive amounts is the caller's job.
#[must_use]
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .replace(CURRENCY_PREFIX, "")
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let number = leading_number(&cleaned, true)?;
    let number = match number.strip_prefix('.') {
        Some(rest) => format!("0.{rest}"),
        None => number.to_string(),
    };
    Decimal::from_str(&number).ok().map(|d| d.normalize())
}

/// Parses a stock quantity, substituting [`DEFAULT_STOCK`] whenever the cell
/// does not hold a positive integer.
///
/// Zero is treated as "unknown" rather than "sold out".
#[must_use]
pub fn parse_stock(raw: Option<&str>) -> u32 {
    raw.map(str::trim)
        .and_then(|s| leading_number(s, false))
        .and_then(|n| n.parse::<i64>().ok())
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_STOCK)
}

/// Returns the longest prefix of `s` that looks like a number: an optional
/// sign followed by digits (and at most one `.` when `allow_fraction`).
///
/// Returns `None` when the prefix holds no digit at all.
fn leading_number(s: &str, allow_fraction: bool) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if allow_fraction && !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    let candidate = s[..end].trim_end_matches('.');
    seen_digit.then_some(candidate)
}
