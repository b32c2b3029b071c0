//! Price and year parsing for adapter-supplied scalars.
//!
//! Dealer sites render money as `"$48,714"`, `"48714"`, `"$48,714.00"` or,
//! for discounts, `"-$1,200"` / `"($1,200)"`. Everything here resolves to
//! whole dollars or `None`; nothing returns an error. Zero is never
//! returned, since a zero price means "not published".

use std::sync::LazyLock;

use carinv_core::RawScalar;
use regex::Regex;

/// A one- or two-digit fraction not followed by another digit, so
/// `"$1,234.50 USD"` and `"$1,234.50*"` lose their cents too.
static CENTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\d{1,2}(?:\D|$)").expect("valid regex"));

/// Parses an unsigned price such as `"$48,714"` into whole dollars.
///
/// Currency symbols, thousands separators, and any sign are ignored. A
/// one- or two-digit fraction (`".00"`, `".5"`) and everything after it is
/// dropped before the digits are read.
#[must_use]
pub fn parse_price(text: &str) -> Option<u32> {
    let magnitude = whole_dollar_digits(text)?;
    u32::try_from(magnitude).ok().filter(|&v| v != 0)
}

/// Parses a signed amount. The value is negative when the text carries a
/// minus sign anywhere or is wrapped in accounting parentheses.
#[must_use]
pub fn parse_signed_price(text: &str) -> Option<i64> {
    let magnitude = i64::try_from(whole_dollar_digits(text)?).ok()?;
    if magnitude == 0 {
        return None;
    }
    let trimmed = text.trim();
    let negative =
        trimmed.contains('-') || (trimmed.starts_with('(') && trimmed.ends_with(')'));
    Some(if negative { -magnitude } else { magnitude })
}

/// Resolves a raw scalar to an unsigned price. Negative numbers are absent.
#[must_use]
pub fn price_from_scalar(value: &RawScalar) -> Option<u32> {
    match value {
        RawScalar::Integer(n) => u32::try_from(*n).ok().filter(|&v| v != 0),
        RawScalar::Float(f) => float_to_whole(*f).and_then(|n| u32::try_from(n).ok()),
        RawScalar::Text(s) => parse_price(s),
    }
}

/// Resolves a raw scalar to a signed amount (used for `adjustments`).
#[must_use]
pub fn signed_from_scalar(value: &RawScalar) -> Option<i64> {
    match value {
        RawScalar::Integer(n) => Some(*n).filter(|&v| v != 0),
        RawScalar::Float(f) => float_to_whole(*f),
        RawScalar::Text(s) => parse_signed_price(s),
    }
}

/// Resolves a model year. Text like `"2025"` or `"MY2025"` is accepted.
#[must_use]
pub fn year_from_scalar(value: &RawScalar) -> Option<u16> {
    match value {
        RawScalar::Integer(n) => u16::try_from(*n).ok().filter(|&v| v != 0),
        RawScalar::Float(f) => float_to_whole(*f).and_then(|n| u16::try_from(n).ok()),
        RawScalar::Text(s) => {
            let digits: String = s.chars().filter(char::is_ascii_digit).collect();
            digits.parse::<u16>().ok().filter(|&v| v != 0)
        }
    }
}

/// Collects the whole-dollar digits of `text`, or `None` when there are none.
fn whole_dollar_digits(text: &str) -> Option<u64> {
    let text = text.trim();
    let integral = CENTS_RE.find(text).map_or(text, |m| &text[..m.start()]);

    let digits: String = integral.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok()
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_whole(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let whole = f.trunc();
    // i64 range check before the cast; out-of-range values are treated as junk.
    if whole.abs() >= 9.0e15 {
        return None;
    }
    Some(whole as i64).filter(|&v| v != 0)
}
