//! # Text Processing Module
//!
//! Small text utilities shared by the parser, aggregator and combiner:
//!
//! - Unicode vulgar fraction normalization (`½` -> `1/2`)
//! - Stripping a leading quantity and unit off display text
//! - Whitespace collapsing for reconstructed display lines

use crate::ingredient_parser::{canonical_unit, parse_ingredient_text};
use crate::measurement_patterns::QUANTITY_PREFIX_REGEX;
use log::trace;

/// Glyph to ASCII mapping for the nine standard vulgar fractions
const UNICODE_FRACTIONS: [(char, &str); 9] = [
    ('¼', "1/4"),
    ('½', "1/2"),
    ('¾', "3/4"),
    ('⅓', "1/3"),
    ('⅔', "2/3"),
    ('⅛', "1/8"),
    ('⅜', "3/8"),
    ('⅝', "5/8"),
    ('⅞', "7/8"),
];

/// Replace unicode vulgar fraction glyphs with their ASCII `n/d` form
///
/// All other characters pass through unchanged.
///
/// # Examples
///
/// ```rust
/// use recipe_scaler::text_processing::normalize_unicode_fractions;
///
/// assert_eq!(normalize_unicode_fractions("½ cup sugar"), "1/2 cup sugar");
/// assert_eq!(normalize_unicode_fractions(""), "");
/// ```
pub fn normalize_unicode_fractions(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for c in text.chars() {
        match UNICODE_FRACTIONS.iter().find(|(glyph, _)| *glyph == c) {
            Some((_, ascii)) => normalized.push_str(ascii),
            None => normalized.push(c),
        }
    }
    normalized
}

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Join non-empty display parts with single spaces
pub fn join_display_parts(parts: &[&str]) -> String {
    collapse_whitespace(
        &parts
            .iter()
            .filter(|part| !part.trim().is_empty())
            .copied()
            .collect::<Vec<&str>>()
            .join(" "),
    )
}

/// Remove a leading quantity (and a recognized unit after it) from ingredient text
///
/// Used to derive a name for combination when no structured name exists.
/// Text without a leading quantity is returned trimmed but otherwise intact.
///
/// # Examples
///
/// ```rust
/// use recipe_scaler::text_processing::strip_quantity_from_text;
///
/// assert_eq!(strip_quantity_from_text("2 cups flour"), "flour");
/// assert_eq!(strip_quantity_from_text("3 eggs"), "eggs");
/// assert_eq!(strip_quantity_from_text("salt to taste"), "salt to taste");
/// ```
pub fn strip_quantity_from_text(text: &str) -> String {
    if let Some(parsed) = parse_ingredient_text(text) {
        return parsed.name;
    }

    let normalized = normalize_unicode_fractions(text.trim());
    let Some(prefix) = QUANTITY_PREFIX_REGEX.find(&normalized) else {
        return collapse_whitespace(&normalized);
    };

    let remainder = normalized[prefix.end()..].trim();
    let mut tokens = remainder.split_whitespace().peekable();
    if let Some(first) = tokens.peek() {
        if canonical_unit(first).is_some() {
            tokens.next();
        }
    }
    let stripped = tokens.collect::<Vec<&str>>().join(" ");
    trace!("Stripped quantity from '{}' -> '{}'", text, stripped);
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_nine_glyphs_are_normalized() {
        assert_eq!(
            normalize_unicode_fractions("¼ ½ ¾ ⅓ ⅔ ⅛ ⅜ ⅝ ⅞"),
            "1/4 1/2 3/4 1/3 2/3 1/8 3/8 5/8 7/8"
        );
    }

    #[test]
    fn test_other_characters_pass_through() {
        assert_eq!(normalize_unicode_fractions("crème fraîche ⅕"), "crème fraîche ⅕");
        assert_eq!(normalize_unicode_fractions("1½ cups"), "11/2 cups");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  4   cups \t flour "), "4 cups flour");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_join_display_parts_skips_empty() {
        assert_eq!(join_display_parts(&["4", "", "eggs"]), "4 eggs");
        assert_eq!(join_display_parts(&["1", "cup", " sugar "]), "1 cup sugar");
    }

    #[test]
    fn test_strip_quantity_with_range_prefix() {
        assert_eq!(strip_quantity_from_text("2-3 cloves garlic"), "garlic");
        assert_eq!(strip_quantity_from_text("1 (15 oz) can beans"), "(15 oz) can beans");
    }

    #[test]
    fn test_strip_quantity_unicode() {
        assert_eq!(strip_quantity_from_text("½ tsp salt"), "salt");
    }
}
