//! # Text Processing Tests
//!
//! Parsing free ingredient text and rendering amounts back for display.

use recipe_scaler::ingredient_parser::{parse_ingredient_text, try_parse_ingredient_text, ParseError};
use recipe_scaler::quantity_format::{format_amount_with_unit, format_quantity_for_display};
use recipe_scaler::text_processing::{normalize_unicode_fractions, strip_quantity_from_text};
use recipe_scaler::unit_format::format_unit;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_forms() {
        let cases = [
            ("2 cups flour", 2.0, Some("cup"), "flour"),
            ("1/2 teaspoon salt", 0.5, Some("teaspoon"), "salt"),
            ("1 1/2 cups milk", 1.5, Some("cup"), "milk"),
            ("0.25 lb butter", 0.25, Some("pound"), "butter"),
            ("¾ cup sugar", 0.75, Some("cup"), "sugar"),
            ("1 ½ cups water", 1.5, Some("cup"), "water"),
            ("3 eggs", 3.0, None, "eggs"),
        ];

        for (text, quantity, unit, name) in cases {
            let parsed = parse_ingredient_text(text).unwrap_or_else(|| panic!("{text} should parse"));
            assert_eq!(parsed.quantity, quantity, "{text}");
            assert_eq!(parsed.unit.as_deref(), unit, "{text}");
            assert_eq!(parsed.name, name, "{text}");
        }
    }

    #[test]
    fn test_two_word_unit_wins() {
        let parsed = parse_ingredient_text("8 fluid ounces cream").expect("Should parse");
        assert_eq!(parsed.unit.as_deref(), Some("fluid ounce"));
        assert_eq!(parsed.name, "cream");
    }

    #[test]
    fn test_lines_without_usable_quantity() {
        assert_eq!(parse_ingredient_text("salt to taste"), None);
        assert_eq!(parse_ingredient_text("3"), None);
        assert_eq!(parse_ingredient_text("2 cups"), None);
        assert_eq!(parse_ingredient_text("1/0 cup flour"), None);
        assert_eq!(parse_ingredient_text(""), None);

        assert_eq!(try_parse_ingredient_text("1/0 cup flour"), Err(ParseError::DivisionByZero));
        assert_eq!(try_parse_ingredient_text("2 cups"), Err(ParseError::NoIngredientName));
        assert_eq!(try_parse_ingredient_text("pepper"), Err(ParseError::NoQuantity));
    }

    #[test]
    fn test_normalize_then_strip() {
        assert_eq!(normalize_unicode_fractions("½ cup"), "1/2 cup");
        assert_eq!(normalize_unicode_fractions(""), "");
        assert_eq!(strip_quantity_from_text("2 tbsp olive oil"), "olive oil");
    }

    #[test]
    fn test_display_round_trip_through_parser() {
        for amount in [0.25, 0.5, 1.0, 1.5, 2.0 / 3.0, 2.75, 10.0] {
            let line = format!("{} cup flour", format_quantity_for_display(amount));
            let parsed = parse_ingredient_text(&line).unwrap_or_else(|| panic!("{line} should parse"));
            assert!((parsed.quantity - amount).abs() <= 0.01, "{line}");
        }
    }

    #[test]
    fn test_units_pluralize_with_amount() {
        assert_eq!(format_unit("cup", 1.0), "cup");
        assert_eq!(format_unit("cup", 1.5), "cups");
        assert_eq!(format_amount_with_unit(2.0, Some("clove")), "2 cloves");
        assert_eq!(format_amount_with_unit(0.5, Some("teaspoon")), "1/2 teaspoon");
    }
}
