//! # Shopping List Module
//!
//! Combines the aggregated ingredients of one or more recipes into a single
//! deduplicated shopping list, grouped by aisle when enough entries have a
//! known category, and renders it for export to note and task services.
//!
//! ## Pipeline
//!
//! 1. Aggregate every recipe at its own scale factor
//! 2. Merge entries that share a combination key (`name||unit`, else the raw line)
//! 3. Choose categorized or flat layout from the share of categorized entries
//! 4. Collect the names of taste-only ingredients into one warning line
//!
//! ## Usage
//!
//! ```rust
//! use recipe_scaler::ingredient_model::Recipe;
//! use recipe_scaler::shopping_list::{build_shopping_list, task_titles};
//! use std::collections::HashMap;
//!
//! let pancakes: Recipe = serde_json::from_str(r#"{"name": "Pancakes", "ingredients": ["1 cup sugar"]}"#).unwrap();
//! let cookies: Recipe = serde_json::from_str(r#"{"name": "Cookies", "ingredients": ["1 cup sugar"]}"#).unwrap();
//!
//! let list = build_shopping_list(&[pancakes, cookies], &HashMap::<String, f64>::new());
//! assert_eq!(task_titles(&list), vec!["2 cups sugar"]);
//! ```

use crate::categories::Category;
use crate::config::RecipeConfig;
use crate::ingredient_aggregator::{AggregatedIngredient, IngredientAggregator};
use crate::ingredient_model::{CombinedIngredient, Recipe};
use crate::localization::{t, t_args};
use crate::quantity_format::format_amount_with_unit_using;
use crate::scaling::ScaleFactorLookup;
use crate::text_processing::{join_display_parts, normalize_unicode_fractions};
use log::{debug, info};
use serde::Serialize;
use std::collections::HashMap;

/// One rendered shopping-list line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub display: String,
    pub key: String,
    pub count: usize,
    pub sources: Vec<String>,
}

/// Items of one aisle category, sorted by name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub category: Category,
    pub label: String,
    pub items: Vec<ShoppingItem>,
}

/// How the list is laid out
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "entries", rename_all = "lowercase")]
pub enum ShoppingLayout {
    /// Grouped by aisle in taxonomy order, empty categories skipped
    Categorized(Vec<CategoryGroup>),
    /// Single list in first-seen order
    Flat(Vec<ShoppingItem>),
}

/// Combined shopping list across recipes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    /// Merged entries in first-seen order
    pub combined: Vec<CombinedIngredient>,
    pub layout: ShoppingLayout,
    /// Deduplicated names of taste-only ingredients
    pub warnings: Vec<String>,
    #[serde(skip)]
    language: String,
}

impl ShoppingList {
    pub fn is_empty(&self) -> bool {
        self.combined.is_empty()
    }

    pub fn is_categorized(&self) -> bool {
        matches!(self.layout, ShoppingLayout::Categorized(_))
    }

    /// Every item in rendered order
    pub fn items(&self) -> Vec<&ShoppingItem> {
        match &self.layout {
            ShoppingLayout::Categorized(groups) => {
                groups.iter().flat_map(|group| group.items.iter()).collect()
            }
            ShoppingLayout::Flat(items) => items.iter().collect(),
        }
    }

    /// Trailing advisory line naming every taste-only ingredient
    pub fn taste_warning(&self) -> Option<String> {
        if self.warnings.is_empty() {
            return None;
        }
        Some(t_args(
            &self.language,
            "shopping-taste-warning",
            &[("items", &self.warnings.join(", "))],
        ))
    }
}

/// Builds shopping lists with a given configuration
#[derive(Debug, Clone, Default)]
pub struct ShoppingListBuilder {
    aggregator: IngredientAggregator,
}

impl ShoppingListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RecipeConfig) -> Self {
        Self {
            aggregator: IngredientAggregator::with_config(config),
        }
    }

    fn config(&self) -> &RecipeConfig {
        self.aggregator.config()
    }

    /// Combine the ingredients of `recipes`, each scaled by its looked-up factor
    pub fn build<L>(&self, recipes: &[Recipe], scale_factors: &L) -> ShoppingList
    where
        L: ScaleFactorLookup + ?Sized,
    {
        let mut entries: Vec<(&str, AggregatedIngredient)> = Vec::new();
        for recipe in recipes {
            let factor = scale_factors.scale_factor_for(&recipe.name);
            debug!("Collecting '{}' at factor {}", recipe.name, factor);
            entries.extend(
                self.aggregator
                    .aggregate(&recipe.ingredients, factor)
                    .into_iter()
                    .filter(|entry| !entry.display_text.trim().is_empty())
                    .map(|entry| (recipe.name.as_str(), entry)),
            );
        }

        let combined = combine_entries(&entries);
        let warnings = collect_taste_warnings(&entries);
        let layout = self.layout(&combined);

        info!(
            "Shopping list: {} entries from {} recipes combined into {} lines",
            entries.len(),
            recipes.len(),
            combined.len()
        );

        ShoppingList {
            combined,
            layout,
            warnings,
            language: self.config().language.clone(),
        }
    }

    fn layout(&self, combined: &[CombinedIngredient]) -> ShoppingLayout {
        let categorized = combined
            .iter()
            .filter(|entry| entry.normalized_category.is_some())
            .count();
        let share = if combined.is_empty() {
            0.0
        } else {
            categorized as f64 / combined.len() as f64
        };

        if combined.is_empty() || share < self.config().category_threshold {
            debug!("{categorized} of {} entries categorized, using a flat list", combined.len());
            return ShoppingLayout::Flat(combined.iter().map(|entry| self.item(entry)).collect());
        }

        let language = self.config().language.as_str();
        let groups = Category::ALL
            .iter()
            .filter_map(|category| {
                let mut members: Vec<&CombinedIngredient> = combined
                    .iter()
                    .filter(|entry| entry.normalized_category.unwrap_or(Category::Other) == *category)
                    .collect();
                if members.is_empty() {
                    return None;
                }
                members.sort_by_cached_key(|entry| sort_name(entry));
                Some(CategoryGroup {
                    category: *category,
                    label: category.label(language),
                    items: members.into_iter().map(|entry| self.item(entry)).collect(),
                })
            })
            .collect();
        ShoppingLayout::Categorized(groups)
    }

    fn item(&self, entry: &CombinedIngredient) -> ShoppingItem {
        ShoppingItem {
            display: self.display_line(entry),
            key: entry.key.clone(),
            count: entry.count,
            sources: entry.sources.clone(),
        }
    }

    /// `<qty> <unit> <name>` when both are known, else the raw line (with `(xN)` when merged)
    pub fn display_line(&self, entry: &CombinedIngredient) -> String {
        let config = self.config();
        match (&entry.parsed_name, entry.quantity) {
            (Some(name), Some(quantity)) => {
                let amount = format_amount_with_unit_using(
                    quantity,
                    entry.unit.as_deref(),
                    config.fraction_tolerance,
                    &config.fraction_denominators,
                );
                join_display_parts(&[&amount, name])
            }
            _ if entry.count > 1 => t_args(
                &config.language,
                "shopping-item-count",
                &[("text", &entry.raw_text), ("count", &entry.count.to_string())],
            ),
            _ => entry.raw_text.clone(),
        }
    }
}

/// Build a shopping list with the default configuration
pub fn build_shopping_list<L>(recipes: &[Recipe], scale_factors: &L) -> ShoppingList
where
    L: ScaleFactorLookup + ?Sized,
{
    ShoppingListBuilder::new().build(recipes, scale_factors)
}

/// Key deciding whether two entries are the same thing to buy
pub fn combination_key(entry: &AggregatedIngredient) -> String {
    match &entry.parsed_name {
        Some(name) => format!(
            "{}||{}",
            name.to_lowercase(),
            entry.unit.as_deref().unwrap_or("").to_lowercase()
        ),
        None => format!(
            "raw||{}",
            normalize_unicode_fractions(&entry.display_text).to_lowercase()
        ),
    }
}

fn combine_entries(entries: &[(&str, AggregatedIngredient)]) -> Vec<CombinedIngredient> {
    let mut combined: Vec<CombinedIngredient> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for (order, (recipe_name, entry)) in entries.iter().enumerate() {
        let key = combination_key(entry);
        match index_by_key.get(&key) {
            Some(&index) => {
                let existing = &mut combined[index];
                existing.quantity = match (existing.quantity, entry.quantity) {
                    (Some(total), Some(more)) => Some(total + more),
                    (None, more) => more,
                    (total, None) => total,
                };
                existing.count += 1;
                if !existing.sources.iter().any(|source| source.as_str() == *recipe_name) {
                    existing.sources.push(recipe_name.to_string());
                }
                if existing.category.is_none() {
                    existing.category = entry.category.clone();
                }
                if existing.normalized_category.is_none() {
                    existing.normalized_category = entry.normalized_category;
                }
                existing.is_taste |= entry.is_taste;
            }
            None => {
                index_by_key.insert(key.clone(), combined.len());
                combined.push(CombinedIngredient {
                    key,
                    raw_text: entry.display_text.clone(),
                    parsed_name: entry.parsed_name.clone(),
                    unit: entry.unit.clone(),
                    quantity: entry.quantity,
                    count: 1,
                    category: entry.category.clone(),
                    normalized_category: entry.normalized_category,
                    order,
                    sources: vec![recipe_name.to_string()],
                    is_taste: entry.is_taste,
                });
            }
        }
    }

    combined
}

fn collect_taste_warnings(entries: &[(&str, AggregatedIngredient)]) -> Vec<String> {
    let mut warnings: Vec<String> = Vec::new();
    for (_, entry) in entries.iter().filter(|(_, entry)| entry.is_taste) {
        let name = entry
            .parsed_name
            .clone()
            .unwrap_or_else(|| entry.raw_text.clone());
        if !warnings.iter().any(|seen| seen.eq_ignore_ascii_case(&name)) {
            warnings.push(name);
        }
    }
    warnings
}

fn sort_name(entry: &CombinedIngredient) -> String {
    entry
        .parsed_name
        .as_deref()
        .unwrap_or(&entry.raw_text)
        .to_lowercase()
}

/// Plain-text note: aisle headers, `- item` lines and a trailing taste warning
pub fn format_shopping_note(list: &ShoppingList) -> String {
    let mut lines: Vec<String> = Vec::new();
    match &list.layout {
        ShoppingLayout::Categorized(groups) => {
            for group in groups {
                lines.push(format!("{}:", group.label));
                lines.extend(group.items.iter().map(|item| format!("- {}", item.display)));
                lines.push(String::new());
            }
        }
        ShoppingLayout::Flat(items) => {
            lines.extend(items.iter().map(|item| format!("- {}", item.display)));
        }
    }
    if let Some(warning) = list.taste_warning() {
        lines.push(warning);
    }
    lines.join("\n").trim().to_string()
}

/// One task title per item, in rendered order
pub fn task_titles(list: &ShoppingList) -> Vec<String> {
    list.items().into_iter().map(|item| item.display.clone()).collect()
}

/// Payload handed to a task-list or note service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingExport {
    pub title: String,
    pub items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Title of the companion note, present with `notes`
    #[serde(rename = "notesTitle", skip_serializing_if = "Option::is_none")]
    pub notes_title: Option<String>,
}

/// Bundle task titles and the note text under a title
pub fn export_payload(list: &ShoppingList, title: Option<&str>) -> ShoppingExport {
    let title = title
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| t(&list.language, "shopping-default-title"));
    let notes = (!list.is_empty()).then(|| format_shopping_note(list));
    let notes_title = notes
        .as_ref()
        .map(|_| t_args(&list.language, "shopping-notes-title", &[("title", title.as_str())]));
    ShoppingExport {
        title,
        items: task_titles(list),
        notes,
        notes_title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recipe(value: serde_json::Value) -> Recipe {
        serde_json::from_value(value).unwrap()
    }

    fn no_scaling() -> HashMap<String, f64> {
        HashMap::new()
    }

    #[test]
    fn test_identical_lines_combine() {
        let recipes = vec![
            recipe(json!({ "name": "A", "ingredients": ["1 cup sugar"] })),
            recipe(json!({ "name": "B", "ingredients": ["1 cup sugar"] })),
        ];
        let list = build_shopping_list(&recipes, &no_scaling());

        assert_eq!(list.combined.len(), 1);
        assert_eq!(list.combined[0].count, 2);
        assert_eq!(list.combined[0].quantity, Some(2.0));
        assert_eq!(list.combined[0].sources, vec!["A", "B"]);
        assert_eq!(task_titles(&list), vec!["2 cups sugar"]);
    }

    #[test]
    fn test_key_ignores_case_and_unit_spelling() {
        let recipes = vec![recipe(json!({
            "name": "A",
            "ingredients": ["2 Tbsp Butter", "1 tablespoon butter"]
        }))];
        let list = build_shopping_list(&recipes, &no_scaling());
        assert_eq!(list.combined.len(), 1);
        assert_eq!(list.combined[0].key, "butter||tablespoon");
        assert_eq!(task_titles(&list), vec!["3 tablespoons Butter"]);
    }

    #[test]
    fn test_different_units_stay_apart() {
        let recipes = vec![recipe(json!({
            "name": "A",
            "ingredients": ["1 cup milk", "100 ml milk"]
        }))];
        let list = build_shopping_list(&recipes, &no_scaling());
        assert_eq!(list.combined.len(), 2);
    }

    #[test]
    fn test_present_quantity_wins_over_missing() {
        let recipes = vec![recipe(json!({
            "name": "A",
            "ingredients": [
                { "item": "parsley", "name": "parsley" },
                { "item": "2 parsley", "name": "parsley" }
            ]
        }))];
        let list = build_shopping_list(&recipes, &no_scaling());
        assert_eq!(list.combined.len(), 1);
        assert_eq!(list.combined[0].quantity, Some(2.0));
        assert_eq!(list.combined[0].raw_text, "parsley");
        assert_eq!(task_titles(&list), vec!["2 parsley"]);
    }

    #[test]
    fn test_unquantified_duplicates_show_count() {
        let recipes = vec![
            recipe(json!({ "name": "A", "ingredients": ["Fresh basil"] })),
            recipe(json!({ "name": "B", "ingredients": ["fresh basil"] })),
        ];
        let list = build_shopping_list(&recipes, &no_scaling());
        assert_eq!(task_titles(&list), vec!["Fresh basil (x2)"]);
    }

    #[test]
    fn test_scale_factors_apply_per_recipe() {
        let recipes = vec![
            recipe(json!({ "name": "A", "ingredients": ["1 cup flour"] })),
            recipe(json!({ "name": "B", "ingredients": ["1 cup flour"] })),
        ];
        let mut factors = HashMap::new();
        factors.insert("A".to_string(), 2.0);
        let list = build_shopping_list(&recipes, &factors);
        assert_eq!(task_titles(&list), vec!["3 cups flour"]);
    }

    #[test]
    fn test_categorized_layout_sorts_and_skips_empty_groups() {
        let recipes = vec![recipe(json!({
            "name": "A",
            "ingredients": [
                { "item": "2 zucchini", "aisle": "Produce" },
                { "item": "1 cup milk", "aisle": "Dairy" },
                { "item": "3 apples", "aisle": "Fruit" },
                "1 jar mystery sauce"
            ]
        }))];
        let list = build_shopping_list(&recipes, &no_scaling());
        assert!(list.is_categorized());

        let ShoppingLayout::Categorized(groups) = &list.layout else {
            panic!("Expected categorized layout");
        };
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Produce", "Dairy", "Other"]);
        assert_eq!(groups[0].items[0].display, "3 apples");
        assert_eq!(groups[0].items[1].display, "2 zucchini");
        assert_eq!(groups[2].items[0].display, "1 jar mystery sauce");
    }

    #[test]
    fn test_flat_layout_below_threshold() {
        let recipes = vec![recipe(json!({
            "name": "A",
            "ingredients": [
                { "item": "2 zucchini", "aisle": "Produce" },
                "1 cup milk",
                "1 onion"
            ]
        }))];
        let list = build_shopping_list(&recipes, &no_scaling());
        assert!(!list.is_categorized());
        assert_eq!(task_titles(&list), vec!["2 zucchini", "1 cup milk", "1 onion"]);
    }

    #[test]
    fn test_category_is_backfilled() {
        let recipes = vec![
            recipe(json!({ "name": "A", "ingredients": ["1 onion"] })),
            recipe(json!({ "name": "B", "ingredients": [{ "item": "1 onion", "aisle": "Vegetables" }] })),
        ];
        let list = build_shopping_list(&recipes, &no_scaling());
        assert_eq!(list.combined[0].category.as_deref(), Some("Vegetables"));
        assert_eq!(list.combined[0].normalized_category, Some(Category::Produce));
        assert!(list.is_categorized());
    }

    #[test]
    fn test_taste_warnings_are_deduplicated() {
        let taste = json!({ "item": "salt to taste", "scaleBehavior": "taste" });
        let recipes = vec![
            recipe(json!({ "name": "A", "ingredients": [taste.clone(), "1 onion"] })),
            recipe(json!({ "name": "B", "ingredients": [taste] })),
        ];
        let list = build_shopping_list(&recipes, &no_scaling());
        assert_eq!(list.warnings, vec!["salt to taste"]);
        assert_eq!(
            list.taste_warning().as_deref(),
            Some("⚠️ Adjust to taste: salt to taste")
        );
        assert!(list.combined[0].is_taste);
        assert_eq!(list.combined[0].quantity, None);
    }

    #[test]
    fn test_note_format_categorized() {
        let recipes = vec![recipe(json!({
            "name": "A",
            "ingredients": [
                { "item": "2 carrots", "aisle": "Produce" },
                { "item": "1 cup milk", "aisle": "Dairy" },
                { "item": "pepper to taste", "aisle": "Spices", "scaleBehavior": "taste" }
            ]
        }))];
        let list = build_shopping_list(&recipes, &no_scaling());
        assert_eq!(
            format_shopping_note(&list),
            "Produce:\n- 2 carrots\n\nDairy:\n- 1 cup milk\n\nSpices:\n- pepper to taste\n\n⚠️ Adjust to taste: pepper to taste"
        );
    }

    #[test]
    fn test_note_format_flat() {
        let recipes = vec![recipe(json!({ "name": "A", "ingredients": ["2 carrots", "1 cup milk"] }))];
        let list = build_shopping_list(&recipes, &no_scaling());
        assert_eq!(format_shopping_note(&list), "- 2 carrots\n- 1 cup milk");
    }

    #[test]
    fn test_export_payload() {
        let recipes = vec![recipe(json!({ "name": "A", "ingredients": ["2 carrots"] }))];
        let list = build_shopping_list(&recipes, &no_scaling());

        let export = export_payload(&list, Some("Weekend"));
        assert_eq!(export.title, "Weekend");
        assert_eq!(export.items, vec!["2 carrots"]);
        assert_eq!(export.notes.as_deref(), Some("- 2 carrots"));
        assert_eq!(export.notes_title.as_deref(), Some("Weekend Notes"));

        let empty = build_shopping_list(&[], &no_scaling());
        let export = export_payload(&empty, None);
        assert_eq!(export.title, "Shopping List");
        assert!(export.items.is_empty());
        let value = serde_json::to_value(&export).unwrap();
        assert!(value.get("notes").is_none());
        assert!(value.get("notesTitle").is_none());
    }

    #[test]
    fn test_non_text_entries_are_skipped() {
        let recipes = vec![recipe(json!({ "name": "A", "ingredients": [42, null, "1 egg", ""] }))];
        let list = build_shopping_list(&recipes, &no_scaling());
        assert_eq!(task_titles(&list), vec!["1 egg"]);
    }
}
