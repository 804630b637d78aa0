//! # Measurement Patterns Module
//!
//! This module contains the read-only tables and compiled regex patterns used for
//! amount parsing, quantity/time detection and ingredient matching.
//!
//! The vocabularies are plain data. The regexes are assembled from them once at first
//! use, so a new unit only needs a new table row.

use lazy_static::lazy_static;
use regex::Regex;

/// A measurement unit and the spellings recognised in running text.
///
/// Plural spellings come before singular ones so that an ordered alternation
/// prefers the longer form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSpec {
    /// Canonical short label (e.g. "tbsp")
    pub canonical: &'static str,
    /// Every accepted spelling, plurals first
    pub forms: &'static [&'static str],
}

/// Unicode vulgar fractions and their exact values
pub const VULGAR_FRACTIONS: &[(char, f64)] = &[
    ('½', 0.5),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('¼', 0.25),
    ('¾', 0.75),
    ('⅕', 0.2),
    ('⅖', 0.4),
    ('⅗', 0.6),
    ('⅘', 0.8),
    ('⅙', 1.0 / 6.0),
    ('⅚', 5.0 / 6.0),
    ('⅛', 0.125),
    ('⅜', 0.375),
    ('⅝', 0.625),
    ('⅞', 0.875),
];

/// Fractions used when rendering an amount, checked in this order
pub const DISPLAY_FRACTIONS: &[(f64, char)] = &[
    (0.25, '¼'),
    (1.0 / 3.0, '⅓'),
    (0.5, '½'),
    (2.0 / 3.0, '⅔'),
    (0.75, '¾'),
    (0.125, '⅛'),
    (0.375, '⅜'),
    (0.625, '⅝'),
    (0.875, '⅞'),
    (0.2, '⅕'),
    (0.4, '⅖'),
    (0.6, '⅗'),
    (0.8, '⅘'),
];

/// ASCII fractions that have a single-character Unicode form
pub const ASCII_FRACTIONS: &[(&str, char)] = &[
    ("1/2", '½'),
    ("1/3", '⅓'),
    ("2/3", '⅔'),
    ("1/4", '¼'),
    ("3/4", '¾'),
    ("1/5", '⅕'),
    ("2/5", '⅖'),
    ("3/5", '⅗'),
    ("4/5", '⅘'),
    ("1/6", '⅙'),
    ("5/6", '⅚'),
    ("1/8", '⅛'),
    ("3/8", '⅜'),
    ("5/8", '⅝'),
    ("7/8", '⅞'),
];

/// Characters of [`VULGAR_FRACTIONS`], for use inside regex character classes
pub const FRACTION_CHARS: &str = "½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞";

/// Cooking units recognised after a number in instruction text
pub const COOKING_UNITS: &[UnitSpec] = &[
    UnitSpec { canonical: "cup", forms: &["cups", "cup"] },
    UnitSpec { canonical: "tbsp", forms: &["tablespoons", "tablespoon", "tbsps", "tbsp", "tbs"] },
    UnitSpec { canonical: "tsp", forms: &["teaspoons", "teaspoon", "tsps", "tsp"] },
    UnitSpec { canonical: "fl oz", forms: &["fluid ounces", "fluid ounce", "fl oz"] },
    UnitSpec { canonical: "oz", forms: &["ounces", "ounce", "oz"] },
    UnitSpec { canonical: "lb", forms: &["pounds", "pound", "lbs", "lb"] },
    UnitSpec { canonical: "kg", forms: &["kilograms", "kilogram", "kgs", "kg"] },
    UnitSpec { canonical: "mg", forms: &["milligrams", "milligram", "mg"] },
    UnitSpec { canonical: "g", forms: &["grams", "gram", "g"] },
    UnitSpec {
        canonical: "ml",
        forms: &["milliliters", "milliliter", "millilitres", "millilitre", "ml"],
    },
    UnitSpec { canonical: "l", forms: &["liters", "liter", "litres", "litre", "l"] },
    UnitSpec { canonical: "pint", forms: &["pints", "pint", "pt"] },
    UnitSpec { canonical: "quart", forms: &["quarts", "quart", "qt"] },
    UnitSpec { canonical: "gallon", forms: &["gallons", "gallon", "gal"] },
    UnitSpec { canonical: "pinch", forms: &["pinches", "pinch"] },
    UnitSpec { canonical: "dash", forms: &["dashes", "dash"] },
    UnitSpec { canonical: "drop", forms: &["drops", "drop"] },
    UnitSpec { canonical: "clove", forms: &["cloves", "clove"] },
    UnitSpec { canonical: "bunch", forms: &["bunches", "bunch"] },
    UnitSpec { canonical: "sprig", forms: &["sprigs", "sprig"] },
    UnitSpec { canonical: "stalk", forms: &["stalks", "stalk"] },
    UnitSpec { canonical: "head", forms: &["heads", "head"] },
    UnitSpec { canonical: "slice", forms: &["slices", "slice"] },
    UnitSpec { canonical: "piece", forms: &["pieces", "piece"] },
    UnitSpec { canonical: "stick", forms: &["sticks", "stick"] },
    UnitSpec { canonical: "can", forms: &["cans", "can"] },
    UnitSpec { canonical: "package", forms: &["packages", "package", "pkg"] },
    UnitSpec { canonical: "handful", forms: &["handfuls", "handful"] },
    UnitSpec { canonical: "inch", forms: &["inches", "inch"] },
    UnitSpec { canonical: "cm", forms: &["cm"] },
];

/// Time units recognised after a number in instruction text
pub const TIME_UNITS: &[UnitSpec] = &[
    UnitSpec { canonical: "min", forms: &["minutes", "minute", "mins", "min"] },
    UnitSpec { canonical: "sec", forms: &["seconds", "second", "secs", "sec"] },
    UnitSpec { canonical: "hr", forms: &["hours", "hour", "hrs", "hr", "h"] },
];

/// Generic cooking terms and the specific ingredients they can stand in for.
///
/// A term found in instruction text is credited to every ingredient whose name
/// contains one of the specific entries.
pub const SYNONYM_TABLE: &[(&str, &[&str])] = &[
    (
        "meat",
        &[
            "beef", "pork", "lamb", "veal", "chicken", "turkey", "duck", "mince", "steak", "brisket",
            "sausage", "bacon", "ham", "ribs", "chuck", "belly", "shoulder",
        ],
    ),
    (
        "pork",
        &["pork belly", "pork shoulder", "pork loin", "tenderloin", "bacon", "pancetta", "ham"],
    ),
    ("beef", &["steak", "brisket", "chuck", "sirloin", "ground beef", "short rib"]),
    ("chicken", &["chicken breast", "chicken thigh", "drumstick", "chicken wing"]),
    ("poultry", &["chicken", "turkey", "duck"]),
    (
        "fish",
        &[
            "salmon", "cod", "tuna", "halibut", "tilapia", "trout", "haddock", "mackerel",
            "sea bass", "snapper", "sardine", "anchovy",
        ],
    ),
    (
        "seafood",
        &["shrimp", "prawn", "scallop", "crab", "lobster", "mussel", "clam", "squid", "octopus"],
    ),
    (
        "cheese",
        &[
            "parmesan", "parmigiano", "cheddar", "mozzarella", "feta", "ricotta", "gruyere",
            "gouda", "brie", "pecorino", "halloumi", "mascarpone",
        ],
    ),
    ("onion", &["shallot", "scallion", "leek", "spring onion", "green onion"]),
    (
        "herbs",
        &[
            "basil", "parsley", "cilantro", "coriander", "thyme", "rosemary", "oregano", "dill",
            "mint", "sage", "chives", "tarragon",
        ],
    ),
    ("greens", &["spinach", "kale", "lettuce", "arugula", "rocket", "chard", "cabbage"]),
    (
        "pasta",
        &[
            "spaghetti", "penne", "linguine", "fettuccine", "rigatoni", "macaroni", "tagliatelle",
            "noodle",
        ],
    ),
    (
        "nuts",
        &["almond", "walnut", "pecan", "cashew", "peanut", "pistachio", "hazelnut", "pine nut"],
    ),
    ("broth", &["stock", "bouillon"]),
    ("stock", &["broth", "bouillon"]),
    ("vinegar", &["balsamic", "rice wine vinegar", "cider vinegar"]),
    ("wine", &["white wine", "red wine", "mirin", "sherry"]),
    ("peppers", &["bell pepper", "capsicum", "jalapeno", "chili", "chilli"]),
];

/// Words too common to be matched on their own from a multi-word ingredient name
pub const GENERIC_WORDS: &[&str] = &["oil", "water", "salt", "sugar", "flour", "milk", "egg"];

/// Build an ordered alternation (without surrounding group) from unit tables.
///
/// Forms are regex-escaped and emitted in table order.
pub fn unit_alternation<'a, I>(units: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    units
        .into_iter()
        .map(|form| regex::escape(form).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|")
}

/// Build the number/range grammar followed by one of the given unit forms.
///
/// Captures `about` (optional "about " prefix) and `body` (the span that gets
/// highlighted). A number is a decimal with an optional attached vulgar fraction,
/// a bare vulgar fraction, or either followed by a separate vulgar fraction
/// ("1 ½"). Ranges use `-`, `–` or ` to `.
pub fn build_amount_pattern(unit_alternation: &str) -> String {
    let number = format!(r"(?:\d+(?:\.\d+)?[{f}]?|[{f}])(?:\s+[{f}])?", f = FRACTION_CHARS);
    format!(
        r"(?i)(?P<about>about\s+)?(?P<body>{number}(?:(?:\s*[-–]\s*|\s+to\s+){number})?\s*(?:{units})\b)",
        number = number,
        units = unit_alternation,
    )
}

/// Alternation covering every form of [`COOKING_UNITS`]
pub fn cooking_unit_alternation() -> String {
    unit_alternation(COOKING_UNITS.iter().flat_map(|unit| unit.forms.iter().copied()))
}

/// Alternation covering every form of [`TIME_UNITS`]
pub fn time_unit_alternation() -> String {
    unit_alternation(TIME_UNITS.iter().flat_map(|unit| unit.forms.iter().copied()))
}

// Lazy static regexes to avoid recompilation
lazy_static! {
    pub static ref QUANTITY_REGEX: Regex = Regex::new(&build_amount_pattern(&cooking_unit_alternation()))
        .expect("Default quantity pattern should be valid");
    pub static ref TIME_REGEX: Regex = Regex::new(&build_amount_pattern(&time_unit_alternation()))
        .expect("Default time pattern should be valid");
    pub static ref ASCII_FRACTION_REGEX: Regex =
        Regex::new(r"\b(\d+)[/⁄](\d+)\b").expect("ASCII fraction pattern should be valid");
}

/// Canonical label for a unit spelling ("Tablespoons" -> "tbsp")
///
/// # Examples
///
/// ```rust
/// use recipe_text::measurement_patterns::canonical_unit;
///
/// assert_eq!(canonical_unit("Tablespoons"), Some("tbsp"));
/// assert_eq!(canonical_unit("mins"), Some("min"));
/// assert_eq!(canonical_unit("handfulls"), None);
/// ```
pub fn canonical_unit(form: &str) -> Option<&'static str> {
    let form = form.trim().to_lowercase();
    COOKING_UNITS
        .iter()
        .chain(TIME_UNITS)
        .find(|unit| unit.forms.contains(&form.as_str()))
        .map(|unit| unit.canonical)
}

/// Look up the value of a vulgar fraction character
pub fn vulgar_fraction_value(symbol: char) -> Option<f64> {
    VULGAR_FRACTIONS
        .iter()
        .find(|(candidate, _)| *candidate == symbol)
        .map(|(_, value)| *value)
}

/// Look up the Unicode symbol for an ASCII fraction such as "3/4"
pub fn ascii_fraction_symbol(numerator: &str, denominator: &str) -> Option<char> {
    ASCII_FRACTIONS
        .iter()
        .find(|(ascii, _)| {
            ascii
                .split_once('/')
                .is_some_and(|(n, d)| n == numerator && d == denominator)
        })
        .map(|(_, symbol)| *symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_tables_agree() {
        for (symbol, value) in VULGAR_FRACTIONS {
            assert!(FRACTION_CHARS.contains(*symbol), "missing {symbol} in FRACTION_CHARS");
            assert!(*value > 0.0 && *value < 1.0);
        }
        for (ascii, symbol) in ASCII_FRACTIONS {
            let (n, d) = ascii.split_once('/').unwrap();
            let expected = n.parse::<f64>().unwrap() / d.parse::<f64>().unwrap();
            assert!((vulgar_fraction_value(*symbol).unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_plural_forms_listed_first() {
        for unit in COOKING_UNITS.iter().chain(TIME_UNITS) {
            for (i, form) in unit.forms.iter().enumerate() {
                for later in &unit.forms[i + 1..] {
                    assert!(
                        !later.starts_with(form) || later.len() <= form.len(),
                        "'{later}' should be listed before '{form}'"
                    );
                }
            }
        }
    }

    #[test]
    fn test_quantity_regex_matches_units() {
        for text in ["2 cups", "1½ tbsp", "1 ½ cups", "500g", "2-3 cloves", "2 to 3 lbs", "¼ tsp"] {
            assert!(QUANTITY_REGEX.is_match(text), "expected a quantity in '{text}'");
        }
        assert!(!QUANTITY_REGEX.is_match("2 cupboards"));
        assert!(!QUANTITY_REGEX.is_match("cups of flour"));
    }

    #[test]
    fn test_time_regex_about_prefix() {
        let caps = TIME_REGEX.captures("simmer about 5 to 7 minutes").unwrap();
        assert_eq!(&caps["about"], "about ");
        assert_eq!(&caps["body"], "5 to 7 minutes");
    }

    #[test]
    fn test_canonical_label_is_one_of_the_forms() {
        for unit in COOKING_UNITS.iter().chain(TIME_UNITS) {
            assert!(unit.forms.contains(&unit.canonical), "'{}' is not a listed form", unit.canonical);
            assert_eq!(canonical_unit(unit.canonical), Some(unit.canonical));
        }
        assert_eq!(canonical_unit(" Cloves "), Some("clove"));
        assert_eq!(canonical_unit("fluid ounces"), Some("fl oz"));
    }

    #[test]
    fn test_ascii_fraction_symbol_lookup() {
        assert_eq!(ascii_fraction_symbol("3", "4"), Some('¾'));
        assert_eq!(ascii_fraction_symbol("3", "7"), None);
    }
}
