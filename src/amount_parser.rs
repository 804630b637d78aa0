//! # Amount Parser
//!
//! Converts free-form quantity text into a number and back into the house notation.
//!
//! ## Features
//!
//! - Decimals ("1.5"), Unicode vulgar fractions ("½", "1½")
//! - ASCII fractions ("3/4") and mixed numbers ("1 1/2")
//! - Leading-number fallback ("2 cups" -> 2)
//! - Rendering that prefers vulgar fractions for common cooking amounts
//!
//! Ranges ("2-3", "2 to 3") and vague amounts ("to taste") are deliberately left to
//! the caller: they parse as [`ParsedAmount::Unparseable`].
//!
//! ## Usage
//!
//! ```rust
//! use recipe_text::amount_parser::{format_amount, parse_amount};
//!
//! assert_eq!(parse_amount("1 1/2"), Some(1.5));
//! assert_eq!(format_amount(1.5), "1½");
//! ```

use crate::measurement_patterns::{
    ascii_fraction_symbol, vulgar_fraction_value, ASCII_FRACTION_REGEX, DISPLAY_FRACTIONS,
};
use log::trace;
use regex::Regex;
use std::sync::LazyLock;

/// Tolerance used when snapping to a whole number or a table fraction
const SNAP_TOLERANCE: f64 = 0.02;
/// Wider tolerance for thirds, which rarely come out exact after scaling
const THIRDS_TOLERANCE: f64 = 0.05;
/// Anything smaller renders as [`TINY_AMOUNT`]
const TINY_THRESHOLD: f64 = 0.01;
/// Floor marker for amounts too small to measure
pub const TINY_AMOUNT: &str = "< ⅛";

/// Amount phrases that are never numeric
const VAGUE_AMOUNTS: &[&str] = &["as needed", "to taste"];

static MIXED_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(\d+)\s*[/⁄]\s*(\d+)$").unwrap());
static BARE_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*[/⁄]\s*(\d+)$").unwrap());
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").unwrap());

/// Outcome of parsing a single amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedAmount {
    /// A finite numeric value
    Parsed(f64),
    /// Empty, vague, range-like or non-numeric input
    Unparseable,
}

impl ParsedAmount {
    /// Convert into the public `Option` contract
    pub fn value(self) -> Option<f64> {
        match self {
            ParsedAmount::Parsed(value) => Some(value),
            ParsedAmount::Unparseable => None,
        }
    }

    fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            ParsedAmount::Parsed(value)
        } else {
            ParsedAmount::Unparseable
        }
    }
}

/// Parse an amount, returning `None` when it should not be scaled.
///
/// # Examples
///
/// ```rust
/// use recipe_text::amount_parser::parse_amount;
///
/// assert_eq!(parse_amount("¾"), Some(0.75));
/// assert_eq!(parse_amount("2-3"), None);
/// assert_eq!(parse_amount("to taste"), None);
/// ```
pub fn parse_amount(text: &str) -> Option<f64> {
    parse_amount_value(text).value()
}

/// Parse an amount into a [`ParsedAmount`]
pub fn parse_amount_value(text: &str) -> ParsedAmount {
    let text = text.trim();
    if text.is_empty() {
        return ParsedAmount::Unparseable;
    }

    let lower = text.to_lowercase();
    if VAGUE_AMOUNTS.contains(&lower.as_str()) {
        return ParsedAmount::Unparseable;
    }
    if text.contains('-') || lower.contains(" to ") {
        trace!("Amount '{}' looks like a range, leaving it to the caller", text);
        return ParsedAmount::Unparseable;
    }

    if let Some((index, symbol)) = text.char_indices().find(|(_, c)| vulgar_fraction_value(*c).is_some()) {
        return parse_vulgar(text, index, symbol);
    }

    if let Some(caps) = MIXED_FRACTION.captures(text) {
        return match (caps[1].parse::<u32>(), ratio(&caps[2], &caps[3])) {
            (Ok(whole), ParsedAmount::Parsed(fraction)) => {
                ParsedAmount::Parsed(f64::from(whole) + fraction)
            }
            _ => ParsedAmount::Unparseable,
        };
    }

    if let Some(caps) = BARE_FRACTION.captures(text) {
        return ratio(&caps[1], &caps[2]);
    }

    LEADING_NUMBER
        .find(text)
        .and_then(|m| m.as_str().trim_start_matches('+').parse::<f64>().ok())
        .map_or(ParsedAmount::Unparseable, ParsedAmount::from_f64)
}

/// "1½": the whole-number prefix (if any) plus the symbol's value
fn parse_vulgar(text: &str, index: usize, symbol: char) -> ParsedAmount {
    let Some(fraction) = vulgar_fraction_value(symbol) else {
        return ParsedAmount::Unparseable;
    };
    let prefix = text[..index].trim();
    let suffix = text[index + symbol.len_utf8()..].trim();
    if !suffix.is_empty() && !suffix.chars().next().is_some_and(char::is_alphabetic) {
        return ParsedAmount::Unparseable;
    }
    if prefix.is_empty() {
        return ParsedAmount::Parsed(fraction);
    }
    match prefix.parse::<f64>() {
        Ok(whole) => ParsedAmount::from_f64(whole + fraction),
        Err(_) => ParsedAmount::Unparseable,
    }
}

fn ratio(numerator: &str, denominator: &str) -> ParsedAmount {
    match (numerator.parse::<u32>(), denominator.parse::<u32>()) {
        (Ok(_), Ok(0)) => ParsedAmount::Unparseable,
        (Ok(n), Ok(d)) => ParsedAmount::Parsed(f64::from(n) / f64::from(d)),
        _ => ParsedAmount::Unparseable,
    }
}

/// Format a value in the house notation.
///
/// Whole numbers print plainly, common cooking fractions print as vulgar
/// fractions attached to the whole part ("1½"), everything else falls back to a
/// decimal with at most two places.
///
/// # Examples
///
/// ```rust
/// use recipe_text::amount_parser::format_amount;
///
/// assert_eq!(format_amount(0.0), "0");
/// assert_eq!(format_amount(2.0), "2");
/// assert_eq!(format_amount(0.75), "¾");
/// assert_eq!(format_amount(2.33), "2⅓");
/// assert_eq!(format_amount(1.1), "1.1");
/// assert_eq!(format_amount(0.004), "< ⅛");
/// ```
pub fn format_amount(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value < TINY_THRESHOLD {
        return TINY_AMOUNT.to_string();
    }

    let whole = value.floor();
    let fraction = value - whole;

    if fraction < SNAP_TOLERANCE {
        return format_whole(whole);
    }
    if fraction > 1.0 - SNAP_TOLERANCE {
        return format_whole(whole + 1.0);
    }

    let symbol = DISPLAY_FRACTIONS
        .iter()
        .find(|(decimal, _)| (fraction - decimal).abs() < SNAP_TOLERANCE)
        .map(|(_, symbol)| *symbol)
        .or_else(|| {
            if (fraction - 1.0 / 3.0).abs() < THIRDS_TOLERANCE {
                Some('⅓')
            } else if (fraction - 2.0 / 3.0).abs() < THIRDS_TOLERANCE {
                Some('⅔')
            } else {
                None
            }
        });

    match symbol {
        Some(symbol) if whole > 0.0 => format!("{}{}", format_whole(whole), symbol),
        Some(symbol) => symbol.to_string(),
        None => format_decimal(value),
    }
}

fn format_whole(whole: f64) -> String {
    format!("{whole:.0}")
}

/// Two decimal places with trailing zeros stripped
fn format_decimal(value: f64) -> String {
    let fixed = format!("{value:.2}");
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}

/// Replace ASCII fractions that have a Unicode symbol ("1/2" -> "½").
///
/// Only the fraction itself is rewritten: "1 1/2 cups" becomes "1 ½ cups", and
/// fractions without a symbol ("3/7") are left untouched.
///
/// # Examples
///
/// ```rust
/// use recipe_text::amount_parser::normalize_fractions;
///
/// assert_eq!(normalize_fractions("Add 1/2 cup milk"), "Add ½ cup milk");
/// assert_eq!(normalize_fractions("Use 3/7 of it"), "Use 3/7 of it");
/// ```
pub fn normalize_fractions(text: &str) -> String {
    ASCII_FRACTION_REGEX
        .replace_all(text, |caps: &regex::Captures| {
            match ascii_fraction_symbol(&caps[1], &caps[2]) {
                Some(symbol) => symbol.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
