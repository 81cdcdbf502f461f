//! # Configuration Module
//!
//! Tunable constants for quantity formatting, scaling bounds and shopping-list
//! grouping, with optional overrides from the environment.

use crate::errors::RecipeError;
use log::debug;
use std::env;

// Constants for recipe configuration
pub const DEFAULT_CATEGORY_THRESHOLD: f64 = 0.5;
pub const DEFAULT_FRACTION_TOLERANCE: f64 = 0.01;
pub const FRACTION_DENOMINATORS: [u32; 7] = [2, 3, 4, 6, 8, 12, 16];
pub const MIN_SCALE_FACTOR: f64 = 0.25;
pub const MAX_SCALE_FACTOR: f64 = 4.0;
pub const PLURAL_TOLERANCE: f64 = 1.0001;
pub const DEFAULT_LANGUAGE: &str = "en";

/// Configuration for scaling, formatting and shopping-list building
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeConfig {
    /// Share of combined entries that must resolve to a category before the
    /// shopping list is grouped by category
    pub category_threshold: f64,
    /// Largest absolute error accepted when snapping to a cooking fraction
    pub fraction_tolerance: f64,
    /// Denominators tried when snapping, smallest first
    pub fraction_denominators: Vec<u32>,
    /// Lower bound of the scale factor
    pub min_scale_factor: f64,
    /// Upper bound of the scale factor
    pub max_scale_factor: f64,
    /// Language of generated advisory text and category labels
    pub language: String,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            category_threshold: DEFAULT_CATEGORY_THRESHOLD,
            fraction_tolerance: DEFAULT_FRACTION_TOLERANCE,
            fraction_denominators: FRACTION_DENOMINATORS.to_vec(),
            min_scale_factor: MIN_SCALE_FACTOR,
            max_scale_factor: MAX_SCALE_FACTOR,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl RecipeConfig {
    /// Build a configuration from defaults overridden by environment variables
    ///
    /// Recognized variables: `RECIPE_CATEGORY_THRESHOLD`,
    /// `RECIPE_FRACTION_TOLERANCE`, `RECIPE_MIN_SCALE_FACTOR`,
    /// `RECIPE_MAX_SCALE_FACTOR` and `RECIPE_LANGUAGE`.
    pub fn from_env() -> Result<Self, RecipeError> {
        let mut config = Self::default();

        if let Some(threshold) = read_env_f64("RECIPE_CATEGORY_THRESHOLD")? {
            config.category_threshold = threshold;
        }
        if let Some(tolerance) = read_env_f64("RECIPE_FRACTION_TOLERANCE")? {
            config.fraction_tolerance = tolerance;
        }
        if let Some(min) = read_env_f64("RECIPE_MIN_SCALE_FACTOR")? {
            config.min_scale_factor = min;
        }
        if let Some(max) = read_env_f64("RECIPE_MAX_SCALE_FACTOR")? {
            config.max_scale_factor = max;
        }
        if let Ok(language) = env::var("RECIPE_LANGUAGE") {
            if !language.trim().is_empty() {
                config.language = language.trim().to_string();
            }
        }

        config.validate()?;
        debug!("Loaded recipe configuration: {:?}", config);
        Ok(config)
    }

    /// Check that every value lies in its meaningful range
    pub fn validate(&self) -> Result<(), RecipeError> {
        if !(0.0..=1.0).contains(&self.category_threshold) {
            return Err(RecipeError::Config(format!(
                "category threshold must be within [0, 1], got {}",
                self.category_threshold
            )));
        }
        if !(self.fraction_tolerance > 0.0 && self.fraction_tolerance < 0.5) {
            return Err(RecipeError::Config(format!(
                "fraction tolerance must be within (0, 0.5), got {}",
                self.fraction_tolerance
            )));
        }
        if !(self.min_scale_factor > 0.0 && self.min_scale_factor <= self.max_scale_factor) {
            return Err(RecipeError::Config(format!(
                "scale factor bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.min_scale_factor, self.max_scale_factor
            )));
        }
        if self.fraction_denominators.iter().any(|d| *d < 2) {
            return Err(RecipeError::Config(
                "fraction denominators must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    /// Clamp a scale factor into the configured bounds; non-finite factors become 1
    pub fn clamp_scale_factor(&self, factor: f64) -> f64 {
        if !factor.is_finite() {
            return 1.0;
        }
        factor.clamp(self.min_scale_factor, self.max_scale_factor)
    }
}

fn read_env_f64(key: &str) -> Result<Option<f64>, RecipeError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| RecipeError::Config(format!("{key} is not a number: '{raw}'"))),
        _ => Ok(None),
    }
}
