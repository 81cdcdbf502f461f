//! # Scaling Module
//!
//! The scale behavior engine and the per-recipe serving state that feeds it.
//!
//! [`scale_quantity_value`] is a pure function of `(amount, behavior, factor)`.
//! [`ScalingStore`] owns the mutable side: base servings, the servings the
//! cook asked for, and the factor derived from them, one entry per recipe.

use crate::config::RecipeConfig;
use crate::ingredient_model::{Recipe, ScaleBehavior};
use log::{debug, trace};
use std::collections::HashMap;

/// Result of scaling one amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledAmount {
    pub amount: f64,
    /// Unrounded value of a `stepped` amount, before snapping to a whole count
    pub rounded_from: Option<f64>,
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scale `amount` by `factor` according to `behavior`
///
/// Returns `None` when `amount` is not finite. A non-finite factor is treated
/// as 1. Every non-taste result is rounded to two decimals and floored at 0.
///
/// # Examples
///
/// ```rust
/// use recipe_scaler::ingredient_model::ScaleBehavior;
/// use recipe_scaler::scaling::scale_quantity_value;
///
/// let eggs = scale_quantity_value(3.0, ScaleBehavior::Stepped, 1.5).unwrap();
/// assert_eq!(eggs.amount, 5.0);
/// assert_eq!(eggs.rounded_from, Some(4.5));
///
/// let salt = scale_quantity_value(0.5, ScaleBehavior::Sublinear, 4.0).unwrap();
/// assert_eq!(salt.amount, 1.0);
/// ```
pub fn scale_quantity_value(amount: f64, behavior: ScaleBehavior, factor: f64) -> Option<ScaledAmount> {
    if !amount.is_finite() {
        trace!("Not scaling non-finite amount {}", amount);
        return None;
    }
    let factor = if factor.is_finite() { factor } else { 1.0 };

    let scaled = match behavior {
        ScaleBehavior::Taste => {
            return Some(ScaledAmount {
                amount,
                rounded_from: None,
            })
        }
        ScaleBehavior::Linear => ScaledAmount {
            amount: round2(amount * factor),
            rounded_from: None,
        },
        ScaleBehavior::Sublinear => ScaledAmount {
            amount: round2(amount * factor.max(0.0).sqrt()),
            rounded_from: None,
        },
        ScaleBehavior::Fixed => ScaledAmount {
            amount: round2(amount),
            rounded_from: None,
        },
        ScaleBehavior::Stepped => {
            let raw = amount * factor;
            ScaledAmount {
                // f64::round rounds half away from zero, so 4.5 -> 5
                amount: raw.round().max(1.0),
                rounded_from: Some(round2(raw)),
            }
        }
    };

    Some(ScaledAmount {
        amount: scaled.amount.max(0.0),
        ..scaled
    })
}

/// Serving state of one recipe
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleState {
    /// Servings the recipe is written for, when it says
    pub base_servings: Option<f64>,
    /// Serving unit ("servings", "cookies", ...)
    pub unit: String,
    pub note: Option<String>,
    pub current_servings: f64,
    pub scale_factor: f64,
}

impl ScaleState {
    fn for_recipe(recipe: &Recipe) -> Self {
        let servings = recipe.servings.clone().unwrap_or_default();
        let base_servings = servings.amount.filter(|amount| *amount > 0.0);
        Self {
            base_servings,
            unit: servings
                .unit
                .filter(|unit| !unit.trim().is_empty())
                .unwrap_or_else(|| "servings".to_string()),
            note: servings.note,
            current_servings: base_servings.unwrap_or(1.0),
            scale_factor: 1.0,
        }
    }
}

/// Anything that can tell the shopping-list builder how far to scale a recipe
pub trait ScaleFactorLookup {
    /// Scale factor for a recipe, 1 when unknown
    fn scale_factor_for(&self, recipe_name: &str) -> f64;
}

impl ScaleFactorLookup for HashMap<String, f64> {
    fn scale_factor_for(&self, recipe_name: &str) -> f64 {
        self.get(recipe_name).copied().unwrap_or(1.0)
    }
}

/// Per-recipe serving and scale factor state
#[derive(Debug, Clone, Default)]
pub struct ScalingStore {
    states: HashMap<String, ScaleState>,
    config: RecipeConfig,
}

impl ScalingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RecipeConfig) -> Self {
        Self {
            states: HashMap::new(),
            config,
        }
    }

    /// Start tracking a recipe; a recipe already tracked keeps its state
    pub fn init_recipe(&mut self, recipe: &Recipe) -> &ScaleState {
        self.states.entry(recipe.name.clone()).or_insert_with(|| {
            debug!("Tracking servings for '{}'", recipe.name);
            ScaleState::for_recipe(recipe)
        })
    }

    /// State of a tracked recipe
    pub fn state(&self, recipe_name: &str) -> Option<&ScaleState> {
        self.states.get(recipe_name)
    }

    /// Ask for a number of servings, clamped to what the scale bounds allow
    pub fn set_servings(&mut self, recipe_name: &str, servings: f64) -> Option<&ScaleState> {
        let (min_factor, max_factor) = (self.config.min_scale_factor, self.config.max_scale_factor);
        let state = self.states.get_mut(recipe_name)?;
        let base = state.base_servings.unwrap_or(1.0);

        let requested = if servings.is_finite() { servings } else { base };
        let lower = min_factor.max(base * min_factor);
        let upper = (base * max_factor).max(lower);
        state.current_servings = requested.clamp(lower, upper);

        state.scale_factor = match state.base_servings {
            Some(base) => (state.current_servings / base).clamp(min_factor, max_factor),
            None => 1.0,
        };
        debug!(
            "'{}' now serves {} (factor {})",
            recipe_name, state.current_servings, state.scale_factor
        );
        Some(&*state)
    }

    /// Move the servings up or down by `delta`
    pub fn adjust_servings(&mut self, recipe_name: &str, delta: f64) -> Option<&ScaleState> {
        let current = self.states.get(recipe_name)?.current_servings;
        self.set_servings(recipe_name, current + delta)
    }

    /// Set the factor directly; ignored for recipes without base servings
    pub fn set_factor(&mut self, recipe_name: &str, factor: f64) -> Option<&ScaleState> {
        let factor = self.config.clamp_scale_factor(factor);
        let state = self.states.get_mut(recipe_name)?;
        let Some(base) = state.base_servings else {
            debug!("'{}' has no base servings, factor stays {}", recipe_name, state.scale_factor);
            return Some(&*state);
        };

        state.scale_factor = factor;
        state.current_servings = round2(base * factor).max(0.25);
        Some(&*state)
    }

    /// Return a recipe to its written servings
    pub fn reset(&mut self, recipe_name: &str) -> Option<&ScaleState> {
        let state = self.states.get_mut(recipe_name)?;
        state.current_servings = state.base_servings.unwrap_or(1.0);
        state.scale_factor = 1.0;
        Some(&*state)
    }

    pub fn scale_factor(&self, recipe_name: &str) -> f64 {
        self.states
            .get(recipe_name)
            .map(|state| state.scale_factor)
            .unwrap_or(1.0)
    }

    pub fn servings(&self, recipe_name: &str) -> Option<f64> {
        self.states.get(recipe_name).map(|state| state.current_servings)
    }
}

impl ScaleFactorLookup for ScalingStore {
    fn scale_factor_for(&self, recipe_name: &str) -> f64 {
        self.scale_factor(recipe_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recipe(value: serde_json::Value) -> Recipe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_linear_scaling_is_exact_to_two_decimals() {
        for amount in [0.0, 0.33, 1.0, 2.5, 7.125, 100.0] {
            for factor in [0.25, 0.5, 1.0, 1.5, 2.0, 3.3, 4.0] {
                let scaled = scale_quantity_value(amount, ScaleBehavior::Linear, factor).unwrap();
                assert_eq!(scaled.amount, round2(amount * factor));
                assert_eq!(scaled.rounded_from, None);
            }
        }
    }

    #[test]
    fn test_sublinear_uses_square_root() {
        let scaled = scale_quantity_value(1.0, ScaleBehavior::Sublinear, 2.0).unwrap();
        assert_eq!(scaled.amount, 1.41);
        let scaled = scale_quantity_value(1.0, ScaleBehavior::Sublinear, -4.0).unwrap();
        assert_eq!(scaled.amount, 0.0);
    }

    #[test]
    fn test_fixed_ignores_factor() {
        let scaled = scale_quantity_value(2.0, ScaleBehavior::Fixed, 3.0).unwrap();
        assert_eq!(scaled.amount, 2.0);
    }

    #[test]
    fn test_stepped_never_below_one() {
        for amount in [0.1, 0.5, 1.0, 2.0, 3.0] {
            for factor in [0.25, 0.5, 1.0, 1.5, 4.0] {
                let scaled = scale_quantity_value(amount, ScaleBehavior::Stepped, factor).unwrap();
                assert!(scaled.amount >= 1.0, "{amount} x {factor} -> {}", scaled.amount);
                assert_eq!(scaled.amount.fract(), 0.0);
            }
        }
    }

    #[test]
    fn test_stepped_rounds_half_up() {
        let scaled = scale_quantity_value(3.0, ScaleBehavior::Stepped, 1.5).unwrap();
        assert_eq!(scaled.amount, 5.0);
        assert_eq!(scaled.rounded_from, Some(4.5));

        let scaled = scale_quantity_value(5.0, ScaleBehavior::Stepped, 0.5).unwrap();
        assert_eq!(scaled.amount, 3.0);
    }

    #[test]
    fn test_taste_is_untouched() {
        let scaled = scale_quantity_value(1.0 / 3.0, ScaleBehavior::Taste, 4.0).unwrap();
        assert_eq!(scaled.amount, 1.0 / 3.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(scale_quantity_value(f64::NAN, ScaleBehavior::Linear, 2.0), None);
        assert_eq!(scale_quantity_value(f64::INFINITY, ScaleBehavior::Fixed, 2.0), None);

        let scaled = scale_quantity_value(2.0, ScaleBehavior::Linear, f64::NAN).unwrap();
        assert_eq!(scaled.amount, 2.0);

        let scaled = scale_quantity_value(-2.0, ScaleBehavior::Linear, 2.0).unwrap();
        assert_eq!(scaled.amount, 0.0);
    }

    #[test]
    fn test_store_init_reads_servings() {
        let mut store = ScalingStore::new();
        let state = store.init_recipe(&recipe(json!({
            "name": "Cookies",
            "servings": { "amount": 24, "unit": "cookies", "note": "2-inch cookies" }
        })));
        assert_eq!(state.base_servings, Some(24.0));
        assert_eq!(state.unit, "cookies");
        assert_eq!(state.current_servings, 24.0);
        assert_eq!(state.scale_factor, 1.0);

        store.set_factor("Cookies", 2.0);
        store.init_recipe(&recipe(json!({ "name": "Cookies" })));
        assert_eq!(store.scale_factor("Cookies"), 2.0);
    }

    #[test]
    fn test_set_servings_clamps_and_derives_factor() {
        let mut store = ScalingStore::new();
        store.init_recipe(&recipe(json!({ "name": "Stew", "servings": { "amount": 4 } })));

        let state = store.set_servings("Stew", 6.0).unwrap();
        assert_eq!(state.current_servings, 6.0);
        assert_eq!(state.scale_factor, 1.5);

        let state = store.set_servings("Stew", 100.0).unwrap();
        assert_eq!(state.current_servings, 16.0);
        assert_eq!(state.scale_factor, 4.0);

        let state = store.set_servings("Stew", 0.0).unwrap();
        assert_eq!(state.current_servings, 1.0);
        assert_eq!(state.scale_factor, 0.25);

        let state = store.set_servings("Stew", f64::NAN).unwrap();
        assert_eq!(state.current_servings, 4.0);

        let state = store.adjust_servings("Stew", 2.0).unwrap();
        assert_eq!(state.current_servings, 6.0);
    }

    #[test]
    fn test_recipe_without_base_servings_keeps_factor_one() {
        let mut store = ScalingStore::new();
        store.init_recipe(&recipe(json!({ "name": "Dressing" })));

        let state = store.set_servings("Dressing", 3.0).unwrap();
        assert_eq!(state.current_servings, 3.0);
        assert_eq!(state.scale_factor, 1.0);

        let state = store.set_factor("Dressing", 2.0).unwrap();
        assert_eq!(state.scale_factor, 1.0);
    }

    #[test]
    fn test_set_factor_and_reset() {
        let mut store = ScalingStore::new();
        store.init_recipe(&recipe(json!({ "name": "Bread", "servings": { "amount": 2 } })));

        let state = store.set_factor("Bread", 10.0).unwrap();
        assert_eq!(state.scale_factor, 4.0);
        assert_eq!(state.current_servings, 8.0);

        let state = store.set_factor("Bread", f64::NAN).unwrap();
        assert_eq!(state.scale_factor, 1.0);

        store.set_factor("Bread", 0.5);
        let state = store.reset("Bread").unwrap();
        assert_eq!(state.current_servings, 2.0);
        assert_eq!(state.scale_factor, 1.0);
    }

    #[test]
    fn test_unknown_recipe() {
        let mut store = ScalingStore::new();
        assert!(store.set_servings("Nothing", 2.0).is_none());
        assert_eq!(store.scale_factor("Nothing"), 1.0);
        assert_eq!(store.servings("Nothing"), None);
    }

    #[test]
    fn test_lookup_implementations() {
        let mut factors = HashMap::new();
        factors.insert("Soup".to_string(), 2.0);
        assert_eq!(factors.scale_factor_for("Soup"), 2.0);
        assert_eq!(factors.scale_factor_for("Salad"), 1.0);

        let mut store = ScalingStore::new();
        store.init_recipe(&recipe(json!({ "name": "Soup", "servings": { "amount": 4 } })));
        store.set_servings("Soup", 2.0);
        assert_eq!(store.scale_factor_for("Soup"), 0.5);
    }
}
