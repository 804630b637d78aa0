//! # Ingredient Parser
//!
//! This module splits amount text into its scalable parts.
//!
//! ## Features
//!
//! - Split a range amount ("2-3", "2 to 3", "2–3") into endpoints, remembering the separator
//! - Recover an `<amount> <unit> <name>` triple from an ingredient name that embeds
//!   its own quantity ("1½ cups whole milk")
//!
//! ## Usage
//!
//! ```rust
//! use recipe_text::ingredient_parser::extract_embedded_quantity;
//!
//! let parsed = extract_embedded_quantity("2-3 tbsp olive oil").unwrap();
//! assert_eq!(parsed.amount, "2-3");
//! assert_eq!(parsed.units, "tbsp");
//! assert_eq!(parsed.name, "olive oil");
//! ```

use crate::measurement_patterns::FRACTION_CHARS;
use log::trace;
use regex::Regex;
use std::sync::LazyLock;

/// Regex patterns for embedded quantities
static QUANTITY_PATTERNS: LazyLock<QuantityPatterns> = LazyLock::new(QuantityPatterns::new);

/// Compiled regex patterns for parsing
struct QuantityPatterns {
    /// Fraction-aware: "1 1/2 cups flour", "1 ½ cups flour", "½ cup sugar", "2–3 tbsp oil"
    fraction_aware: Regex,
    /// Plain digits fallback: "500g butter", "3 x-large eggs"
    plain: Regex,
}

impl QuantityPatterns {
    fn new() -> Self {
        let amount = format!(
            r"(?:\d+\s+[{f}]|\d+\s+\d+[/⁄]\d+|\d+[/⁄]\d+|\d*[{f}]|\d+(?:\.\d+)?)",
            f = FRACTION_CHARS
        );
        Self {
            fraction_aware: Regex::new(&format!(
                r"^(?P<amount>{amount}(?:\s*[-–]\s*{amount})?)\s+(?P<unit>\p{{L}}[\p{{L}}.]*)\s+(?P<name>.+)$"
            ))
            .unwrap(),
            plain: Regex::new(r"^(?P<amount>\d+)\s*(?P<unit>[^\s\d]+)\s+(?P<name>.+)$").unwrap(),
        }
    }
}

/// A quantity recovered from inside an ingredient name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedQuantity {
    /// Amount text, possibly a range ("2-3")
    pub amount: String,
    /// The word after the amount
    pub units: String,
    /// Everything after the unit word
    pub name: String,
}

/// How the two ends of a range amount were joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSeparator {
    /// "2-3"
    Hyphen,
    /// "2–3"
    EnDash,
    /// "2 to 3"
    To,
}

impl RangeSeparator {
    /// The separator as written when the range is rebuilt
    pub fn as_str(self) -> &'static str {
        match self {
            RangeSeparator::Hyphen => "-",
            RangeSeparator::EnDash => "–",
            RangeSeparator::To => " to ",
        }
    }
}

/// The shape of an amount string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountShape<'a> {
    /// A single amount
    Single(&'a str),
    /// Two endpoints and the separator between them
    Range {
        low: &'a str,
        high: &'a str,
        separator: RangeSeparator,
    },
}

/// Classify an amount as a single value or a range.
///
/// " to " is checked before the dashes so "1-2 to 3" splits on " to ".
///
/// # Examples
///
/// ```rust
/// use recipe_text::ingredient_parser::{split_range, AmountShape, RangeSeparator};
///
/// assert_eq!(
///     split_range("2 to 4"),
///     AmountShape::Range { low: "2", high: "4", separator: RangeSeparator::To }
/// );
/// assert_eq!(split_range("1½"), AmountShape::Single("1½"));
/// ```
pub fn split_range(amount: &str) -> AmountShape<'_> {
    let amount = amount.trim();
    let separators = [
        (" to ", RangeSeparator::To),
        ("-", RangeSeparator::Hyphen),
        ("–", RangeSeparator::EnDash),
    ];

    for (pattern, separator) in separators {
        if let Some((low, high)) = amount.split_once(pattern) {
            return AmountShape::Range {
                low: low.trim(),
                high: high.trim(),
                separator,
            };
        }
    }

    AmountShape::Single(amount)
}

/// Recover `<amount> <unit> <name>` from an ingredient name.
///
/// Two passes are tried: a fraction-aware one and a plain-digits fallback.
/// Returns `None` when neither matches.
pub fn extract_embedded_quantity(text: &str) -> Option<EmbeddedQuantity> {
    let text = text.trim();
    let captures = QUANTITY_PATTERNS
        .fraction_aware
        .captures(text)
        .or_else(|| QUANTITY_PATTERNS.plain.captures(text))?;

    let parsed = EmbeddedQuantity {
        amount: captures["amount"].trim().to_string(),
        units: captures["unit"].to_string(),
        name: captures["name"].trim().to_string(),
    };
    trace!("Extracted embedded quantity from '{}': {:?}", text, parsed);
    Some(parsed)
}
