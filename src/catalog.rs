//! # Recipe Catalog
//!
//! Loads recipe JSON files from a directory, fills in the fields older files
//! leave out, and offers the newest-first ordering, search and lookup the
//! recipe browser works with.

use crate::errors::RecipeError;
use crate::ingredient_model::{flatten_ingredients, flatten_instructions, Recipe};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use log::{debug, info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the file listing the recipe files of a directory
pub const INDEX_FILE: &str = "recipes-index.json";

const MAX_SLUG_LENGTH: usize = 80;

#[derive(Debug, Default, Deserialize)]
struct RecipeIndex {
    #[serde(default)]
    recipes: Vec<String>,
}

/// Load every recipe of `dir`, newest first
///
/// Files are taken from `recipes-index.json` when it lists any, else every
/// `*.json` file of the directory in name order. A file that cannot be read
/// or parsed is logged and skipped.
pub fn load_catalog(dir: &Path) -> Result<Vec<Recipe>, RecipeError> {
    if !dir.is_dir() {
        return Err(RecipeError::Io(format!(
            "recipe directory '{}' does not exist",
            dir.display()
        )));
    }

    let files = recipe_files(dir)?;
    debug!("Loading {} recipe files from {}", files.len(), dir.display());

    let mut recipes: Vec<Recipe> = files
        .iter()
        .filter_map(|path| match load_recipe_file(path) {
            Ok(recipe) => Some(recipe),
            Err(err) => {
                warn!("Skipping recipe file {}: {}", path.display(), err);
                None
            }
        })
        .collect();

    sort_recipes(&mut recipes);
    info!("Loaded {} recipes from {}", recipes.len(), dir.display());
    Ok(recipes)
}

fn recipe_files(dir: &Path) -> Result<Vec<PathBuf>, RecipeError> {
    let index_path = dir.join(INDEX_FILE);
    if index_path.is_file() {
        let index: RecipeIndex = serde_json::from_str(&fs::read_to_string(&index_path)?)?;
        if !index.recipes.is_empty() {
            return Ok(index.recipes.iter().map(|file| dir.join(file)).collect());
        }
        debug!("{} lists no recipes, scanning the directory", index_path.display());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let is_index = path.file_name().is_some_and(|name| name == INDEX_FILE);
        if path.is_file() && is_json && !is_index {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read and normalize a single recipe file
pub fn load_recipe_file(path: &Path) -> Result<Recipe, RecipeError> {
    let content = fs::read_to_string(path)?;
    let recipe: Recipe = serde_json::from_str(&content)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(normalize_recipe(recipe, &file_name))
}

/// Fill in name, slug and tags when a recipe file omits them
pub fn normalize_recipe(mut recipe: Recipe, file_name: &str) -> Recipe {
    if recipe.name.trim().is_empty() {
        recipe.name = strip_json_extension(file_name).to_string();
    }
    if recipe.slug.as_deref().map_or(true, |slug| slug.trim().is_empty()) {
        recipe.slug = Some(slugify(&recipe.name));
    }
    if recipe.tags.is_empty() {
        if let Some(category) = recipe.category.clone().filter(|c| !c.trim().is_empty()) {
            recipe.tags = vec![category];
        }
    }
    recipe
}

fn strip_json_extension(file_name: &str) -> &str {
    let len = file_name.len();
    if len >= 5 && file_name[len - 5..].eq_ignore_ascii_case(".json") {
        &file_name[..len - 5]
    } else {
        file_name
    }
}

/// URL-safe identifier for a recipe name
///
/// ```rust
/// use recipe_scaler::catalog::slugify;
///
/// assert_eq!(slugify("Grandma's Apple Pie!"), "grandma-s-apple-pie");
/// ```
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').chars().take(MAX_SLUG_LENGTH).collect()
}

/// Parse `dateAdded`: RFC 3339 timestamps or plain `YYYY-MM-DD`
pub fn parse_date_added(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

/// Newest first; undated recipes last; ties by name, case-insensitively
pub fn sort_recipes(recipes: &mut [Recipe]) {
    recipes.sort_by_cached_key(|recipe| {
        let date = recipe.date_added.as_deref().and_then(parse_date_added);
        (std::cmp::Reverse(date), recipe.name.to_lowercase())
    });
}

/// Recipes matching a free-text query and an optional category
///
/// The category must match `recipe.category` (ignoring case); `None` or
/// `"all"` matches everything. A non-empty query is searched in the name,
/// description, ingredient lines and instruction steps.
pub fn filter_recipes<'a>(recipes: &'a [Recipe], query: &str, category: Option<&str>) -> Vec<&'a Recipe> {
    let query = query.trim().to_lowercase();
    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"));

    recipes
        .iter()
        .filter(|recipe| match category {
            Some(wanted) => recipe
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(wanted)),
            None => true,
        })
        .filter(|recipe| query.is_empty() || matches_query(recipe, &query))
        .collect()
}

fn matches_query(recipe: &Recipe, query: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(query);

    contains(recipe.name.as_str())
        || recipe.description.as_deref().is_some_and(contains)
        || flatten_ingredients(&recipe.ingredients)
            .iter()
            .any(|ingredient| contains(ingredient.text.as_str()))
        || flatten_instructions(&recipe.instructions)
            .iter()
            .any(|step| contains(step.as_str()))
}

/// Find a recipe by name or slug, ignoring case
pub fn find_recipe<'a>(recipes: &'a [Recipe], name_or_slug: &str) -> Option<&'a Recipe> {
    let wanted = name_or_slug.trim();
    recipes.iter().find(|recipe| {
        recipe.name.eq_ignore_ascii_case(wanted)
            || recipe
                .slug
                .as_deref()
                .is_some_and(|slug| slug.eq_ignore_ascii_case(wanted))
    })
}
