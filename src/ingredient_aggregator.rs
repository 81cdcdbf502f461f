//! # Ingredient Aggregator
//!
//! Projects a recipe's ingredient list, scaled by a factor, into one display
//! record per leaf ingredient. The same records feed on-screen rendering and
//! the shopping-list combiner.
//!
//! ## Per-entry steps
//!
//! 1. Resolve the scale behavior (unknown tags fall back to linear)
//! 2. `taste` entries keep their raw text and are always flagged
//! 3. Find the quantity: an explicit structured amount wins over text parsing
//! 4. Scale it, then rebuild the line as `<amount> <unit> <name>`
//! 5. Attach a behavior-specific advisory when the factor is not 1
//!
//! Entries without a quantity are displayed unchanged.

use crate::categories::{normalize_category, Category};
use crate::config::RecipeConfig;
use crate::ingredient_model::{flatten_ingredients, IngredientEntry, NormalizedIngredient, ScaleBehavior};
use crate::ingredient_parser::{canonical_unit, parse_ingredient_text};
use crate::localization::{t, t_args};
use crate::quantity_format::format_amount_with_unit_using;
use crate::scaling::scale_quantity_value;
use crate::text_processing::{join_display_parts, strip_quantity_from_text};
use log::{debug, trace};
use serde::Serialize;

/// Difference below which a stepped amount counts as not rounded
const ROUNDING_NOTE_THRESHOLD: f64 = 0.01;

/// Display record of one leaf ingredient after scaling
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedIngredient {
    /// Line to show the cook
    pub display_text: String,
    /// Unscaled text as written in the recipe
    pub raw_text: String,
    /// Whether the line carries a warning label or an advisory note
    pub flagged: bool,
    pub warning_label: Option<String>,
    pub note: Option<String>,
    pub is_taste: bool,
    pub behavior: ScaleBehavior,
    /// Ingredient name without its quantity and unit
    pub parsed_name: Option<String>,
    pub unit: Option<String>,
    /// Scaled amount; `None` for taste entries and lines without a quantity
    pub quantity: Option<f64>,
    pub category: Option<String>,
    pub normalized_category: Option<Category>,
    pub subsection_path: Vec<String>,
}

/// Amount and unit before scaling
struct QuantityMeta {
    amount: f64,
    unit: Option<String>,
    parsed_name: Option<String>,
}

/// Scales and formats ingredient lists
#[derive(Debug, Clone, Default)]
pub struct IngredientAggregator {
    config: RecipeConfig,
}

impl IngredientAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RecipeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecipeConfig {
        &self.config
    }

    /// Aggregate a (possibly nested) ingredient list at `scale_factor`
    pub fn aggregate(&self, entries: &[IngredientEntry], scale_factor: f64) -> Vec<AggregatedIngredient> {
        let factor = self.config.clamp_scale_factor(scale_factor);
        let aggregated: Vec<AggregatedIngredient> = flatten_ingredients(entries)
            .iter()
            .map(|ingredient| self.aggregate_one(ingredient, factor))
            .collect();
        debug!(
            "Aggregated {} ingredients at factor {}",
            aggregated.len(),
            factor
        );
        aggregated
    }

    /// Aggregate one normalized ingredient; `factor` is used as given
    pub fn aggregate_one(&self, ingredient: &NormalizedIngredient, factor: f64) -> AggregatedIngredient {
        let language = self.config.language.as_str();
        let category = ingredient.category.clone();
        let normalized_category = category.as_deref().and_then(normalize_category);

        let mut record = AggregatedIngredient {
            display_text: ingredient.text.clone(),
            raw_text: ingredient.text.clone(),
            flagged: false,
            warning_label: None,
            note: None,
            is_taste: false,
            behavior: ingredient.behavior,
            parsed_name: None,
            unit: None,
            quantity: None,
            category,
            normalized_category,
            subsection_path: ingredient.subsection_path.clone(),
        };

        if ingredient.behavior == ScaleBehavior::Taste {
            record.flagged = true;
            record.is_taste = true;
            record.warning_label = Some(t(language, "advisory-adjust-to-taste"));
            record.note = ingredient.scale_note.clone();
            record.parsed_name = fallback_name(ingredient);
            return record;
        }

        let Some(meta) = quantity_meta(ingredient) else {
            trace!("No quantity in '{}', leaving it unscaled", ingredient.text);
            record.parsed_name = fallback_name(ingredient);
            return record;
        };

        let Some(scaled) = scale_quantity_value(meta.amount, ingredient.behavior, factor) else {
            record.parsed_name = fallback_name(ingredient);
            return record;
        };

        let name = ingredient
            .name
            .clone()
            .or(meta.parsed_name)
            .or_else(|| fallback_name(ingredient));
        let amount_text = self.format_amount(scaled.amount, meta.unit.as_deref());
        record.display_text = join_display_parts(&[&amount_text, name.as_deref().unwrap_or("")]);
        record.parsed_name = name;
        record.unit = meta.unit;
        record.quantity = Some(scaled.amount);

        if factor != 1.0 {
            record.note = self.advisory_note(ingredient, scaled.amount, scaled.rounded_from, record.unit.as_deref());
        }
        record.flagged = record.note.is_some();
        record
    }

    fn advisory_note(
        &self,
        ingredient: &NormalizedIngredient,
        amount: f64,
        rounded_from: Option<f64>,
        unit: Option<&str>,
    ) -> Option<String> {
        let language = self.config.language.as_str();
        let author_note = ingredient.scale_note.clone();
        match ingredient.behavior {
            ScaleBehavior::Fixed => {
                author_note.or_else(|| Some(t(language, "advisory-does-not-scale")))
            }
            ScaleBehavior::Stepped => match rounded_from {
                Some(raw) if (raw - amount).abs() >= ROUNDING_NOTE_THRESHOLD => {
                    author_note.or_else(|| {
                        let formatted = self.format_amount(raw, unit);
                        Some(t_args(language, "advisory-rounded-from", &[("amount", &formatted)]))
                    })
                }
                _ => None,
            },
            ScaleBehavior::Sublinear => {
                author_note.or_else(|| Some(t(language, "advisory-season-gently")))
            }
            ScaleBehavior::Linear | ScaleBehavior::Taste => author_note,
        }
    }

    fn format_amount(&self, amount: f64, unit: Option<&str>) -> String {
        format_amount_with_unit_using(
            amount,
            unit,
            self.config.fraction_tolerance,
            &self.config.fraction_denominators,
        )
    }
}

/// Aggregate with the default configuration
pub fn aggregate_ingredients(entries: &[IngredientEntry], scale_factor: f64) -> Vec<AggregatedIngredient> {
    IngredientAggregator::new().aggregate(entries, scale_factor)
}

/// Explicit structured quantity, else the quantity parsed from the text
fn quantity_meta(ingredient: &NormalizedIngredient) -> Option<QuantityMeta> {
    if let Some(amount) = ingredient.amount {
        let unit = ingredient.unit.as_deref().map(|unit| {
            canonical_unit(unit)
                .map(str::to_string)
                .unwrap_or_else(|| unit.to_string())
        });
        return Some(QuantityMeta {
            amount,
            unit,
            parsed_name: None,
        });
    }

    parse_ingredient_text(&ingredient.text).map(|parsed| QuantityMeta {
        amount: parsed.quantity,
        unit: parsed.unit,
        parsed_name: Some(parsed.name),
    })
}

/// Explicit name, else the text with any leading quantity removed
fn fallback_name(ingredient: &NormalizedIngredient) -> Option<String> {
    ingredient
        .name
        .clone()
        .or_else(|| Some(strip_quantity_from_text(&ingredient.text)))
        .filter(|name| !name.is_empty())
}
