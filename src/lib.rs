//! # Recipe Scaler
//!
//! Ingredient quantity parsing, recipe scaling and shopping-list building for
//! a JSON recipe collection.
//!
//! Free-text lines such as `"1 ½ cups flour"` are parsed into amount, unit and
//! name, scaled by a per-ingredient behavior (linear, sublinear, fixed,
//! stepped or taste-only) and rendered back with cooking fractions. The
//! ingredients of several recipes can then be merged into one categorized
//! shopping list, ready to export as a note or as task titles.

pub mod catalog;
pub mod categories;
pub mod config;
pub mod errors;
pub mod ingredient_aggregator;
pub mod ingredient_model;
pub mod ingredient_parser;
pub mod localization;
pub mod measurement_patterns;
pub mod quantity_format;
pub mod scaling;
pub mod shopping_list;
pub mod text_processing;
pub mod unit_format;
