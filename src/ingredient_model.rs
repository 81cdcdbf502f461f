//! # Recipe and Ingredient Data Model
//!
//! This module defines the data structures recipes are loaded into and the
//! records the parsing, scaling and shopping-list stages exchange.
//!
//! ## Core Concepts
//!
//! - **IngredientEntry**: one line of a recipe's ingredient list, either raw text,
//!   a structured object, or a named subsection wrapping more entries
//! - **NormalizedIngredient**: a leaf entry resolved once into a single record,
//!   with the subsection titles it was nested under
//! - **ScaleBehavior**: how an ingredient's quantity responds to recipe scaling
//! - **ParsedQuantity**: amount, unit and name extracted from free text
//! - **CombinedIngredient**: one shopping-list line after merging like entries
//!
//! ## Usage
//!
//! ```rust
//! use recipe_scaler::ingredient_model::{flatten_ingredients, Recipe};
//!
//! let recipe: Recipe = serde_json::from_str(r#"{
//!     "name": "Pancakes",
//!     "ingredients": [
//!         "2 cups flour",
//!         { "subsection": "For the syrup", "items": [{ "item": "1/2 cup maple syrup" }] }
//!     ]
//! }"#).unwrap();
//!
//! let flat = flatten_ingredients(&recipe.ingredients);
//! assert_eq!(flat.len(), 2);
//! assert_eq!(flat[1].subsection_path, vec!["For the syrup".to_string()]);
//! ```

use crate::categories::Category;
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// How an ingredient's quantity responds to a scale factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleBehavior {
    /// Proportional to the scale factor
    #[default]
    Linear,
    /// Proportional to the square root of the scale factor (seasonings)
    Sublinear,
    /// Never scales (garnish, single-unit items)
    Fixed,
    /// Never scales and is always flagged "adjust to taste"
    Taste,
    /// Scales then rounds to a whole count, never below one (eggs)
    Stepped,
}

impl ScaleBehavior {
    /// Look up a behavior tag, case-insensitively
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "linear" => Some(ScaleBehavior::Linear),
            "sublinear" => Some(ScaleBehavior::Sublinear),
            "fixed" => Some(ScaleBehavior::Fixed),
            "taste" => Some(ScaleBehavior::Taste),
            "stepped" => Some(ScaleBehavior::Stepped),
            _ => None,
        }
    }

    /// Resolve an optional tag, falling back to `Linear` when absent or unknown
    pub fn resolve(tag: Option<&str>) -> Self {
        match tag {
            None => ScaleBehavior::default(),
            Some(raw) => ScaleBehavior::from_tag(raw).unwrap_or_else(|| {
                debug!("Unknown scale behavior '{}', treating as linear", raw);
                ScaleBehavior::default()
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleBehavior::Linear => "linear",
            ScaleBehavior::Sublinear => "sublinear",
            ScaleBehavior::Fixed => "fixed",
            ScaleBehavior::Taste => "taste",
            ScaleBehavior::Stepped => "stepped",
        }
    }
}

impl fmt::Display for ScaleBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Accept any JSON value and keep it only when it is a finite number
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_f64())
        .filter(|amount| amount.is_finite()))
}

/// Accept any JSON value and keep it only when it is a string
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => Some(text),
        Some(other) => {
            trace!("Ignoring non-string value {}", other);
            None
        }
        None => None,
    })
}

/// Like [`lenient_string`], but an absent or mistyped value becomes empty text
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// Structured quantity object, or a bare number taken as the amount
fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<StructuredQuantity>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(number)) => Some(StructuredQuantity {
            amount: number.as_f64().filter(|amount| amount.is_finite()),
            unit: None,
        }),
        Some(object @ serde_json::Value::Object(_)) => serde_json::from_value(object).ok(),
        Some(other) => {
            debug!("Ignoring malformed ingredient quantity {}", other);
            None
        }
        None => None,
    })
}

/// Servings object, or a bare number taken as the amount
fn lenient_servings<'de, D>(deserializer: D) -> Result<Option<Servings>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(number)) => Some(Servings {
            amount: number.as_f64().filter(|amount| amount.is_finite()),
            ..Servings::default()
        }),
        Some(object @ serde_json::Value::Object(_)) => serde_json::from_value(object).ok(),
        Some(other) => {
            debug!("Ignoring malformed servings {}", other);
            None
        }
        None => None,
    })
}

/// Tag list; a single string is one tag and non-string items are dropped
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(tag)) => vec![tag],
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(tag) => Some(tag),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Entry list; anything that is not an array yields no entries
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(items @ serde_json::Value::Array(_)) => {
            serde_json::from_value(items).unwrap_or_else(|e| {
                debug!("Ignoring malformed entry list: {}", e);
                Vec::new()
            })
        }
        _ => Vec::new(),
    })
}

/// Explicit quantity attached to a structured ingredient
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuredQuantity {
    /// Numeric amount; non-numeric values are dropped on load
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
    /// Unit as written by the recipe author
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: Option<String>,
}

/// Structured ingredient form, as written by recipe authoring tools
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredIngredient {
    /// Display text of the line (`item`, or `text` in older files)
    #[serde(default, alias = "text", deserialize_with = "lenient_text")]
    pub item: String,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: Option<StructuredQuantity>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: Option<String>,
    /// Grocery aisle the ingredient is bought in
    #[serde(default, deserialize_with = "lenient_string")]
    pub aisle: Option<String>,
    /// Older spelling of `aisle`
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub prep: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub prep_action: Option<String>,
    /// Preparation time in minutes
    #[serde(default, deserialize_with = "lenient_number")]
    pub prep_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub scale_behavior: Option<String>,
    /// Author supplied advisory, replaces the generated note when present
    #[serde(default, deserialize_with = "lenient_string")]
    pub scale_note: Option<String>,
}

/// A named group of ingredients ("For the glaze")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientSubsection {
    pub subsection: String,
    pub items: Vec<IngredientEntry>,
}

/// One entry of a recipe's ingredient list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientEntry {
    Subsection(IngredientSubsection),
    Text(String),
    Structured(StructuredIngredient),
    /// Anything else (numbers, nulls); skipped when flattening
    Unsupported(serde_json::Value),
}

impl IngredientEntry {
    /// Display text of a leaf entry, empty for subsections and unsupported values
    pub fn text(&self) -> &str {
        match self {
            IngredientEntry::Text(text) => text,
            IngredientEntry::Structured(structured) => &structured.item,
            IngredientEntry::Subsection(_) | IngredientEntry::Unsupported(_) => "",
        }
    }
}

impl From<&str> for IngredientEntry {
    fn from(text: &str) -> Self {
        IngredientEntry::Text(text.to_string())
    }
}

/// A leaf ingredient resolved once into a single record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedIngredient {
    /// Raw display text
    pub text: String,
    /// Explicit name (`name`, else `label`)
    pub name: Option<String>,
    /// Explicit structured amount; wins over any quantity embedded in `text`
    pub amount: Option<f64>,
    /// Unit of the explicit structured amount
    pub unit: Option<String>,
    /// Raw aisle/category label
    pub category: Option<String>,
    pub behavior: ScaleBehavior,
    pub scale_note: Option<String>,
    pub prep: Option<String>,
    pub prep_action: Option<String>,
    pub prep_time: Option<f64>,
    pub destination: Option<String>,
    /// Titles of the subsections this entry was nested under, outermost first
    pub subsection_path: Vec<String>,
}

impl NormalizedIngredient {
    fn from_text(text: &str, subsection_path: &[String]) -> Self {
        Self {
            text: text.to_string(),
            name: None,
            amount: None,
            unit: None,
            category: None,
            behavior: ScaleBehavior::default(),
            scale_note: None,
            prep: None,
            prep_action: None,
            prep_time: None,
            destination: None,
            subsection_path: subsection_path.to_vec(),
        }
    }

    fn from_structured(structured: &StructuredIngredient, subsection_path: &[String]) -> Self {
        let non_empty = |value: &Option<String>| {
            value
                .as_ref()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let (amount, unit) = match &structured.quantity {
            Some(StructuredQuantity {
                amount: Some(amount),
                unit,
            }) => (Some(*amount), non_empty(unit)),
            _ => (None, None),
        };

        Self {
            text: structured.item.clone(),
            name: non_empty(&structured.name).or_else(|| non_empty(&structured.label)),
            amount,
            unit,
            category: non_empty(&structured.aisle).or_else(|| non_empty(&structured.category)),
            behavior: ScaleBehavior::resolve(structured.scale_behavior.as_deref()),
            scale_note: non_empty(&structured.scale_note),
            prep: structured.prep.clone(),
            prep_action: structured.prep_action.clone(),
            prep_time: structured.prep_time,
            destination: structured.destination.clone(),
            subsection_path: subsection_path.to_vec(),
        }
    }

    /// Innermost subsection title, used for grouping headers
    pub fn subsection(&self) -> Option<&str> {
        self.subsection_path.last().map(String::as_str)
    }
}

/// Flatten a (possibly nested) ingredient list into leaf records
///
/// Subsection titles are carried along in `subsection_path`; entries with no
/// display text and unsupported values are skipped.
pub fn flatten_ingredients(entries: &[IngredientEntry]) -> Vec<NormalizedIngredient> {
    let mut flat = Vec::new();
    flatten_into(entries, &mut Vec::new(), &mut flat);
    flat
}

fn flatten_into(
    entries: &[IngredientEntry],
    path: &mut Vec<String>,
    flat: &mut Vec<NormalizedIngredient>,
) {
    for entry in entries {
        match entry {
            IngredientEntry::Subsection(subsection) => {
                path.push(subsection.subsection.clone());
                flatten_into(&subsection.items, path, flat);
                path.pop();
            }
            IngredientEntry::Text(text) if !text.trim().is_empty() => {
                flat.push(NormalizedIngredient::from_text(text, path));
            }
            IngredientEntry::Structured(structured) if !structured.item.trim().is_empty() => {
                flat.push(NormalizedIngredient::from_structured(structured, path));
            }
            other => trace!("Skipping ingredient entry without text: {:?}", other),
        }
    }
}

/// Serving information of a recipe
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Servings {
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub note: Option<String>,
}

/// Structured instruction step
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstructionStep {
    #[serde(default)]
    pub text: String,
}

/// A named group of instruction steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionSubsection {
    pub subsection: String,
    pub items: Vec<InstructionEntry>,
}

/// One entry of a recipe's instruction list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstructionEntry {
    Subsection(InstructionSubsection),
    Text(String),
    Step(InstructionStep),
    Unsupported(serde_json::Value),
}

/// Flatten instructions into their step texts, depth first
pub fn flatten_instructions(entries: &[InstructionEntry]) -> Vec<String> {
    let mut steps = Vec::new();
    for entry in entries {
        match entry {
            InstructionEntry::Subsection(subsection) => {
                steps.extend(flatten_instructions(&subsection.items));
            }
            InstructionEntry::Text(text) if !text.trim().is_empty() => steps.push(text.clone()),
            InstructionEntry::Step(step) if !step.text.trim().is_empty() => {
                steps.push(step.text.clone())
            }
            _ => {}
        }
    }
    steps
}

/// A recipe as loaded from its JSON file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_servings")]
    pub servings: Option<Servings>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub ingredients: Vec<IngredientEntry>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub instructions: Vec<InstructionEntry>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_added: Option<String>,
}

/// Quantity, unit and name extracted from free ingredient text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuantity {
    pub quantity: f64,
    /// Canonical base unit, `None` when the text carries no recognized unit
    pub unit: Option<String>,
    pub name: String,
}

/// One shopping-list line after merging like entries across recipes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedIngredient {
    /// Combination key: `name||unit` when a name was resolved, else `raw||text`
    pub key: String,
    /// Display text of the first entry merged into this line
    pub raw_text: String,
    pub parsed_name: Option<String>,
    pub unit: Option<String>,
    /// Summed scaled quantity; `None` when no merged entry had one
    pub quantity: Option<f64>,
    /// Number of entries merged into this line
    pub count: usize,
    /// First raw category label seen
    pub category: Option<String>,
    pub normalized_category: Option<Category>,
    /// First-seen position across all recipes
    pub order: usize,
    /// Recipes that contributed, in first-seen order
    pub sources: Vec<String>,
    pub is_taste: bool,
}
