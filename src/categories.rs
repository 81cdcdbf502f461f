//! # Grocery Categories
//!
//! The fixed nine-bucket aisle taxonomy used to group shopping lists, and the
//! synonym table that maps free-form aisle labels onto it.

use crate::localization::t;
use crate::measurement_patterns::NON_LETTER_REGEX;
use crate::text_processing::collapse_whitespace;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Grocery aisle category, declared in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Produce,
    Meat,
    Dairy,
    Frozen,
    Bakery,
    Pantry,
    Spices,
    Beverages,
    Other,
}

impl Category {
    /// Every category in display order
    pub const ALL: [Category; 9] = [
        Category::Produce,
        Category::Meat,
        Category::Dairy,
        Category::Frozen,
        Category::Bakery,
        Category::Pantry,
        Category::Spices,
        Category::Beverages,
        Category::Other,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Produce => "produce",
            Category::Meat => "meat",
            Category::Dairy => "dairy",
            Category::Frozen => "frozen",
            Category::Bakery => "bakery",
            Category::Pantry => "pantry",
            Category::Spices => "spices",
            Category::Beverages => "beverages",
            Category::Other => "other",
        }
    }

    /// Localized heading ("Bakery/Baking", "Épicerie", ...)
    pub fn label(&self, language: &str) -> String {
        t(language, &format!("category-{}", self.key()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Cleaned aisle spellings seen in recipe files
const CATEGORY_SYNONYMS: &[(&str, Category)] = &[
    ("produce", Category::Produce),
    ("vegetables", Category::Produce),
    ("vegetable", Category::Produce),
    ("veggies", Category::Produce),
    ("veggie", Category::Produce),
    ("fruit", Category::Produce),
    ("fruits", Category::Produce),
    ("fruits and vegetables", Category::Produce),
    ("meat", Category::Meat),
    ("meats", Category::Meat),
    ("protein", Category::Meat),
    ("poultry", Category::Meat),
    ("seafood", Category::Meat),
    ("fish", Category::Meat),
    ("meat and poultry", Category::Meat),
    ("meat and seafood", Category::Meat),
    ("dairy", Category::Dairy),
    ("eggs", Category::Dairy),
    ("dairy and eggs", Category::Dairy),
    ("cheese", Category::Dairy),
    ("refrigerated", Category::Dairy),
    ("frozen", Category::Frozen),
    ("freezer", Category::Frozen),
    ("frozen foods", Category::Frozen),
    ("bakery", Category::Bakery),
    ("baking", Category::Bakery),
    ("bakery baking", Category::Bakery),
    ("bread", Category::Bakery),
    ("bakery and bread", Category::Bakery),
    ("pantry", Category::Pantry),
    ("dry goods", Category::Pantry),
    ("pantry dry goods", Category::Pantry),
    ("pantry and dry goods", Category::Pantry),
    ("canned goods", Category::Pantry),
    ("canned and jarred", Category::Pantry),
    ("condiments", Category::Pantry),
    ("pasta and rice", Category::Pantry),
    ("spices", Category::Spices),
    ("spice", Category::Spices),
    ("seasonings", Category::Spices),
    ("seasoning", Category::Spices),
    ("herbs", Category::Spices),
    ("herbs and spices", Category::Spices),
    ("spices and seasonings", Category::Spices),
    ("baking and spices", Category::Spices),
    ("beverages", Category::Beverages),
    ("beverage", Category::Beverages),
    ("drinks", Category::Beverages),
    ("other", Category::Other),
    ("misc", Category::Other),
    ("miscellaneous", Category::Other),
    ("household and misc", Category::Other),
];

lazy_static! {
    static ref CATEGORY_LOOKUP: HashMap<&'static str, Category> =
        CATEGORY_SYNONYMS.iter().copied().collect();
}

/// Map a free-form aisle label onto the taxonomy
///
/// The label is lowercased, `&` becomes `and`, anything that is not a letter
/// becomes a space and whitespace is collapsed before the synonym lookup.
///
/// # Examples
///
/// ```rust
/// use recipe_scaler::categories::{normalize_category, Category};
///
/// assert_eq!(normalize_category("Veggies"), Some(Category::Produce));
/// assert_eq!(normalize_category("Dairy & Eggs"), Some(Category::Dairy));
/// assert_eq!(normalize_category("Weird Category"), None);
/// ```
pub fn normalize_category(label: &str) -> Option<Category> {
    let lowered = label.to_lowercase().replace('&', "and");
    let letters_only = NON_LETTER_REGEX.replace_all(&lowered, " ");
    let cleaned = collapse_whitespace(&letters_only);
    if cleaned.is_empty() {
        return None;
    }
    CATEGORY_LOOKUP.get(cleaned.as_str()).copied()
}
