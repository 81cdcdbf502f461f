//! # Unit Formatting
//!
//! Singular/plural display forms for canonical units.

use crate::config::PLURAL_TOLERANCE;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Display forms of a canonical unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitForms {
    pub base: &'static str,
    pub plural: &'static str,
}

const UNIT_FORMS: [(&str, &str, &str); 31] = [
    ("cup", "cup", "cups"),
    ("tablespoon", "tablespoon", "tablespoons"),
    ("teaspoon", "teaspoon", "teaspoons"),
    ("fluid ounce", "fluid ounce", "fluid ounces"),
    ("pint", "pint", "pints"),
    ("quart", "quart", "quarts"),
    ("gallon", "gallon", "gallons"),
    ("ml", "ml", "ml"),
    ("l", "L", "L"),
    ("ounce", "ounce", "ounces"),
    ("pound", "pound", "pounds"),
    ("g", "g", "g"),
    ("kg", "kg", "kg"),
    ("mg", "mg", "mg"),
    ("pinch", "pinch", "pinches"),
    ("dash", "dash", "dashes"),
    ("drop", "drop", "drops"),
    ("clove", "clove", "cloves"),
    ("can", "can", "cans"),
    ("package", "package", "packages"),
    ("bottle", "bottle", "bottles"),
    ("jar", "jar", "jars"),
    ("bag", "bag", "bags"),
    ("stick", "stick", "sticks"),
    ("slice", "slice", "slices"),
    ("piece", "piece", "pieces"),
    ("bunch", "bunch", "bunches"),
    ("sprig", "sprig", "sprigs"),
    ("head", "head", "heads"),
    ("handful", "handful", "handfuls"),
    ("dozen", "dozen", "dozen"),
];

lazy_static! {
    static ref UNIT_DISPLAY: HashMap<&'static str, UnitForms> = UNIT_FORMS
        .iter()
        .map(|&(key, base, plural)| (key, UnitForms { base, plural }))
        .collect();
}

/// Display forms for a canonical unit, if it is known
pub fn unit_forms(unit: &str) -> Option<UnitForms> {
    UNIT_DISPLAY.get(unit.trim().to_lowercase().as_str()).copied()
}

/// Render `unit` in its singular or plural form for `quantity`
///
/// Quantities above one (with a small tolerance for scaled floating values)
/// take the plural. Units missing from the display table come back unchanged.
///
/// # Examples
///
/// ```rust
/// use recipe_scaler::unit_format::format_unit;
///
/// assert_eq!(format_unit("cup", 2.0), "cups");
/// assert_eq!(format_unit("cup", 1.0), "cup");
/// assert_eq!(format_unit("cup", 0.5), "cup");
/// assert_eq!(format_unit("smidgen", 3.0), "smidgen");
/// ```
pub fn format_unit(unit: &str, quantity: f64) -> String {
    match unit_forms(unit) {
        Some(forms) if quantity > PLURAL_TOLERANCE => forms.plural.to_string(),
        Some(forms) => forms.base.to_string(),
        None => unit.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient_parser::canonical_units;

    #[test]
    fn test_plural_threshold_tolerates_float_noise() {
        assert_eq!(format_unit("tablespoon", 1.00001), "tablespoon");
        assert_eq!(format_unit("tablespoon", 1.01), "tablespoons");
        assert_eq!(format_unit("pinch", 3.0), "pinches");
    }

    #[test]
    fn test_invariant_units() {
        assert_eq!(format_unit("g", 500.0), "g");
        assert_eq!(format_unit("l", 2.0), "L");
        assert_eq!(format_unit("dozen", 2.0), "dozen");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(format_unit("Cup", 2.0), "cups");
    }

    #[test]
    fn test_unknown_unit_passes_through() {
        assert_eq!(format_unit("cups", 2.0), "cups");
        assert_eq!(format_unit("", 2.0), "");
    }

    #[test]
    fn test_formatting_is_stable() {
        for quantity in [0.25, 1.0, 1.5, 12.0] {
            let once = format_unit("clove", quantity);
            assert_eq!(once, format_unit("clove", quantity));
        }
    }

    #[test]
    fn test_every_parsed_unit_has_display_forms() {
        for unit in canonical_units() {
            assert!(unit_forms(unit).is_some(), "missing display forms for {unit}");
        }
    }
}
