//! # Ingredient Parser
//!
//! This module parses free ingredient text into a structured quantity, unit and name.
//!
//! ## Features
//!
//! - Leading quantities as integers, decimals, fractions (1/2) and mixed numbers (1 1/2)
//! - Unicode vulgar fractions (½, ¾, ...)
//! - Unit synonyms in English and French, longest match first ("fluid ounce" before "ounce")
//! - Quantity-less text ("salt to taste") reported as `None`, not as an error
//!
//! ## Usage
//!
//! ```rust
//! use recipe_scaler::ingredient_parser::parse_ingredient_text;
//!
//! let parsed = parse_ingredient_text("1 1/2 cups all-purpose flour").unwrap();
//! assert_eq!(parsed.quantity, 1.5);
//! assert_eq!(parsed.unit.as_deref(), Some("cup"));
//! assert_eq!(parsed.name, "all-purpose flour");
//!
//! assert!(parse_ingredient_text("salt to taste").is_none());
//! ```

use crate::ingredient_model::ParsedQuantity;
use crate::measurement_patterns::LEADING_QUANTITY_REGEX;
use crate::text_processing::normalize_unicode_fractions;
use log::trace;
use regex::Captures;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Longest unit phrase, in words, tried against the synonym table
const MAX_UNIT_WORDS: usize = 3;

/// Unit spellings and abbreviations mapped to their canonical base unit
static UNIT_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Volume units
    for synonym in ["cup", "cups", "c", "tasse", "tasses"] {
        map.insert(synonym, "cup");
    }
    for synonym in [
        "tablespoon", "tablespoons", "tbsp", "tbsps", "tbs", "tbl",
        "cuillère à soupe", "cuillères à soupe", "cas",
    ] {
        map.insert(synonym, "tablespoon");
    }
    for synonym in [
        "teaspoon", "teaspoons", "tsp", "tsps",
        "cuillère à café", "cuillères à café", "cac",
    ] {
        map.insert(synonym, "teaspoon");
    }
    for synonym in ["fluid ounce", "fluid ounces", "fl oz", "floz"] {
        map.insert(synonym, "fluid ounce");
    }
    for synonym in ["pint", "pints", "pt"] {
        map.insert(synonym, "pint");
    }
    for synonym in ["quart", "quarts", "qt"] {
        map.insert(synonym, "quart");
    }
    for synonym in ["gallon", "gallons", "gal"] {
        map.insert(synonym, "gallon");
    }
    for synonym in ["ml", "mls", "milliliter", "milliliters", "millilitre", "millilitres"] {
        map.insert(synonym, "ml");
    }
    for synonym in ["l", "liter", "liters", "litre", "litres"] {
        map.insert(synonym, "l");
    }

    // Weight units
    for synonym in ["ounce", "ounces", "oz"] {
        map.insert(synonym, "ounce");
    }
    for synonym in ["pound", "pounds", "lb", "lbs"] {
        map.insert(synonym, "pound");
    }
    for synonym in ["g", "gr", "gram", "grams", "gramme", "grammes"] {
        map.insert(synonym, "g");
    }
    for synonym in ["kg", "kgs", "kilogram", "kilograms", "kilogramme", "kilogrammes"] {
        map.insert(synonym, "kg");
    }
    for synonym in ["mg", "milligram", "milligrams"] {
        map.insert(synonym, "mg");
    }

    // Count and specialized units
    for (base, synonyms) in [
        ("pinch", &["pinch", "pinches", "pincée", "pincées"][..]),
        ("dash", &["dash", "dashes"][..]),
        ("drop", &["drop", "drops"][..]),
        ("clove", &["clove", "cloves", "gousse", "gousses"][..]),
        ("can", &["can", "cans", "boîte", "boîtes"][..]),
        ("package", &["package", "packages", "pkg", "packet", "packets", "sachet", "sachets"][..]),
        ("bottle", &["bottle", "bottles", "bouteille", "bouteilles"][..]),
        ("jar", &["jar", "jars"][..]),
        ("bag", &["bag", "bags"][..]),
        ("stick", &["stick", "sticks"][..]),
        ("slice", &["slice", "slices", "tranche", "tranches"][..]),
        ("piece", &["piece", "pieces", "pièce", "pièces"][..]),
        ("bunch", &["bunch", "bunches", "bouquet", "bouquets"][..]),
        ("sprig", &["sprig", "sprigs", "brin", "brins"][..]),
        ("head", &["head", "heads"][..]),
        ("handful", &["handful", "handfuls", "poignée", "poignées"][..]),
        ("dozen", &["dozen", "doz"][..]),
    ] {
        for synonym in synonyms {
            map.insert(*synonym, base);
        }
    }

    map
});

/// Errors that can occur while parsing ingredient text
///
/// [`parse_ingredient_text`] maps these to `None` and callers keep the line
/// as opaque display text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    NoQuantity,
    InvalidNumber(String),
    DivisionByZero,
    AmbiguousRange,
    NoIngredientName,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::NoQuantity => write!(f, "No leading quantity found"),
            ParseError::InvalidNumber(token) => write!(f, "Invalid number format: {token}"),
            ParseError::DivisionByZero => write!(f, "Division by zero in fraction"),
            ParseError::AmbiguousRange => write!(f, "Quantity is a range"),
            ParseError::NoIngredientName => write!(f, "No ingredient name found"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Look up a unit token (or phrase) in the synonym table
///
/// Matching is case-insensitive and ignores trailing periods and commas,
/// so `"Tbsp."` and `"tablespoons"` both resolve to `"tablespoon"`.
pub fn canonical_unit(token: &str) -> Option<&'static str> {
    let cleaned = token
        .split_whitespace()
        .map(clean_unit_token)
        .collect::<Vec<String>>()
        .join(" ");
    UNIT_SYNONYMS.get(cleaned.as_str()).copied()
}

fn clean_unit_token(token: &str) -> String {
    token.trim_end_matches(['.', ',']).to_lowercase()
}

/// Parse ingredient text into quantity, unit and name
///
/// Returns `None` when the text has no leading quantity, when a fraction has a
/// zero denominator, or when nothing remains for the ingredient name.
pub fn parse_ingredient_text(text: &str) -> Option<ParsedQuantity> {
    match try_parse_ingredient_text(text) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            trace!("Ingredient text '{}' has no parsed quantity: {}", text, err);
            None
        }
    }
}

/// Parse ingredient text, reporting why a line has no usable quantity
pub fn try_parse_ingredient_text(text: &str) -> Result<ParsedQuantity, ParseError> {
    let normalized = normalize_unicode_fractions(&separate_attached_fractions(text.trim()));
    let normalized = normalized.trim();

    let captures = LEADING_QUANTITY_REGEX
        .captures(normalized)
        .ok_or(ParseError::NoQuantity)?;
    let quantity = quantity_from_captures(&captures)?;
    let token_end = captures.get(0).map_or(0, |m| m.end());

    let remainder = normalized[token_end..].trim();
    if remainder.is_empty() {
        return Err(ParseError::NoIngredientName);
    }
    if is_range_continuation(remainder) {
        return Err(ParseError::AmbiguousRange);
    }

    let tokens: Vec<&str> = remainder.split_whitespace().collect();
    let (unit, consumed) = match_unit(&tokens);
    let name = tokens[consumed..].join(" ");
    if name.is_empty() {
        return Err(ParseError::NoIngredientName);
    }

    Ok(ParsedQuantity {
        quantity,
        unit: unit.map(str::to_string),
        name,
    })
}

/// "1½" reads as one and a half, not as "11/2"
fn separate_attached_fractions(text: &str) -> String {
    let mut separated = String::with_capacity(text.len() + 2);
    let mut previous_is_digit = false;
    for c in text.chars() {
        if previous_is_digit && matches!(c, '¼' | '½' | '¾' | '⅓' | '⅔' | '⅛' | '⅜' | '⅝' | '⅞') {
            separated.push(' ');
        }
        separated.push(c);
        previous_is_digit = c.is_ascii_digit();
    }
    separated
}

fn quantity_from_captures(captures: &Captures<'_>) -> Result<f64, ParseError> {
    if let (Some(whole), Some(numerator), Some(denominator)) = (
        captures.name("whole"),
        captures.name("mixed_num"),
        captures.name("mixed_den"),
    ) {
        let whole = parse_number(whole.as_str())?;
        return Ok(whole + parse_fraction(numerator.as_str(), denominator.as_str())?);
    }

    if let (Some(numerator), Some(denominator)) = (captures.name("num"), captures.name("den")) {
        return parse_fraction(numerator.as_str(), denominator.as_str());
    }

    let token = captures
        .name("decimal")
        .or_else(|| captures.name("integer"))
        .ok_or(ParseError::NoQuantity)?;
    parse_number(token.as_str())
}

fn parse_number(token: &str) -> Result<f64, ParseError> {
    token
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber(token.to_string()))
}

fn parse_fraction(numerator: &str, denominator: &str) -> Result<f64, ParseError> {
    let numerator = parse_number(numerator)?;
    let denominator = parse_number(denominator)?;
    if denominator == 0.0 {
        return Err(ParseError::DivisionByZero);
    }
    Ok(numerator / denominator)
}

/// "2-3 cloves" or "2 to 3 cloves": the leading integer is only half the quantity
fn is_range_continuation(remainder: &str) -> bool {
    let rest = if let Some(rest) = remainder.strip_prefix(['-', '–', '—']) {
        rest
    } else if let Some(rest) = remainder.strip_prefix("to ") {
        rest
    } else {
        return false;
    };
    rest.trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
}

/// Match the longest unit phrase at the start of `tokens`
///
/// Returns the canonical unit and how many tokens it consumed.
fn match_unit(tokens: &[&str]) -> (Option<&'static str>, usize) {
    for width in (1..=MAX_UNIT_WORDS.min(tokens.len())).rev() {
        if let Some(unit) = canonical_unit(&tokens[..width].join(" ")) {
            return (Some(unit), width);
        }
    }
    (None, 0)
}

/// Canonical base units known to the synonym table
pub fn canonical_units() -> Vec<&'static str> {
    let mut units: Vec<&'static str> = UNIT_SYNONYMS.values().copied().collect();
    units.sort_unstable();
    units.dedup();
    units
}
