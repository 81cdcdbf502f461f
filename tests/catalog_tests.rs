//! # Catalog Tests
//!
//! Loading a recipe directory from disk and feeding it to the shopping list.

use recipe_scaler::catalog::{filter_recipes, find_recipe, load_catalog, INDEX_FILE};
use recipe_scaler::errors::RecipeError;
use recipe_scaler::scaling::ScalingStore;
use recipe_scaler::shopping_list::{build_shopping_list, task_titles};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[cfg(test)]
mod tests {
    use super::*;

    fn write_json(dir: &Path, file: &str, value: serde_json::Value) {
        fs::write(dir.join(file), value.to_string()).expect("Failed to write fixture");
    }

    fn setup_catalog() -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write_json(
            dir.path(),
            INDEX_FILE,
            json!({ "recipes": ["pancakes.json", "omelette.json", "broken.json"] }),
        );
        write_json(
            dir.path(),
            "pancakes.json",
            json!({
                "name": "Pancakes",
                "category": "Breakfast",
                "dateAdded": "2024-04-01",
                "servings": { "amount": 4 },
                "ingredients": [
                    { "item": "2 cups flour", "aisle": "Baking" },
                    { "item": "2 eggs", "aisle": "Dairy", "scaleBehavior": "stepped" },
                    { "item": "1 cup milk", "aisle": "Dairy" }
                ]
            }),
        );
        write_json(
            dir.path(),
            "omelette.json",
            json!({
                "name": "Omelette",
                "category": "Breakfast",
                "dateAdded": "2024-05-01",
                "servings": { "amount": 1 },
                "ingredients": [
                    { "item": "3 eggs", "aisle": "Dairy & Eggs", "scaleBehavior": "stepped" },
                    { "item": "salt to taste", "aisle": "Spices", "scaleBehavior": "taste" }
                ]
            }),
        );
        fs::write(dir.path().join("broken.json"), "[1, 2").expect("Failed to write fixture");
        dir
    }

    #[test]
    fn test_catalog_loads_and_sorts() {
        let dir = setup_catalog();
        let recipes = load_catalog(dir.path()).expect("Catalog should load");

        let names: Vec<&str> = recipes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Omelette", "Pancakes"]);
        assert_eq!(recipes[1].slug.as_deref(), Some("pancakes"));
        assert_eq!(recipes[1].tags, vec!["Breakfast"]);
    }

    #[test]
    fn test_catalog_search() {
        let dir = setup_catalog();
        let recipes = load_catalog(dir.path()).expect("Catalog should load");

        assert_eq!(filter_recipes(&recipes, "milk", None).len(), 1);
        assert_eq!(filter_recipes(&recipes, "", Some("Breakfast")).len(), 2);
        assert!(filter_recipes(&recipes, "", Some("Dinner")).is_empty());
        assert!(find_recipe(&recipes, "omelette").is_some());
    }

    #[test]
    fn test_catalog_to_shopping_list() {
        let dir = setup_catalog();
        let recipes = load_catalog(dir.path()).expect("Catalog should load");

        let mut store = ScalingStore::new();
        for recipe in &recipes {
            store.init_recipe(recipe);
        }
        store.set_servings("Pancakes", 8.0);

        let list = build_shopping_list(&recipes, &store);
        assert!(list.is_categorized());
        assert_eq!(
            task_titles(&list),
            vec!["7 eggs", "2 cups milk", "4 cups flour", "salt to taste"]
        );
        assert_eq!(list.warnings, vec!["salt to taste"]);
    }

    #[test]
    fn test_loosely_typed_recipe_still_loads() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write_json(
            dir.path(),
            "brownies.json",
            json!({
                "name": "Brownies",
                "servings": 4,
                "tags": "dessert",
                "description": ["fudgy"],
                "ingredients": [
                    { "item": "1 cup sugar", "quantity": "1 cup" },
                    "2 eggs"
                ]
            }),
        );

        let recipes = load_catalog(dir.path()).expect("Catalog should load");
        assert_eq!(recipes.len(), 1);
        let brownies = &recipes[0];
        assert_eq!(brownies.tags, vec!["dessert"]);
        assert_eq!(brownies.description, None);
        assert_eq!(brownies.servings.as_ref().and_then(|s| s.amount), Some(4.0));

        let mut store = ScalingStore::new();
        assert_eq!(store.init_recipe(brownies).base_servings, Some(4.0));
        store.set_servings("Brownies", 8.0);

        let list = build_shopping_list(&recipes, &store);
        assert_eq!(task_titles(&list), vec!["2 cups sugar", "4 eggs"]);
    }

    #[test]
    fn test_unreadable_directory() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let missing = dir.path().join("missing");
        assert!(matches!(load_catalog(&missing), Err(RecipeError::Io(_))));
    }

    #[test]
    fn test_invalid_index_is_an_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join(INDEX_FILE), "not json").expect("Failed to write fixture");
        assert!(matches!(load_catalog(dir.path()), Err(RecipeError::Json(_))));
    }
}
