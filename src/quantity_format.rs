//! # Quantity Formatting
//!
//! Renders numeric amounts the way a cook reads them: whole numbers, common
//! cooking fractions ("1 1/2", "2/3"). A remainder no fraction matches is
//! dropped. Formatting is lossy and display-only; it is always the last step
//! applied to an amount.

use crate::config::{DEFAULT_FRACTION_TOLERANCE, FRACTION_DENOMINATORS};
use crate::text_processing::join_display_parts;
use crate::unit_format::format_unit;

/// Amounts below this magnitude render as "< 1/16"
const SMALLEST_DISPLAYED_AMOUNT: f64 = 1.0 / 16.0;

/// Amounts at or above this magnitude render as grouped whole numbers
const LARGE_AMOUNT_THRESHOLD: f64 = 1000.0;

/// Format an amount for display using the default fraction tolerance
///
/// # Examples
///
/// ```rust
/// use recipe_scaler::quantity_format::format_quantity_for_display;
///
/// assert_eq!(format_quantity_for_display(0.0), "0");
/// assert_eq!(format_quantity_for_display(4.0), "4");
/// assert_eq!(format_quantity_for_display(1.5), "1 1/2");
/// assert_eq!(format_quantity_for_display(0.333), "1/3");
/// assert_eq!(format_quantity_for_display(0.01), "< 1/16");
/// assert_eq!(format_quantity_for_display(1250.4), "1,250");
/// ```
pub fn format_quantity_for_display(value: f64) -> String {
    format_quantity_with(value, DEFAULT_FRACTION_TOLERANCE, &FRACTION_DENOMINATORS)
}

/// Format an amount, snapping the fractional part to the nearest fraction over
/// `denominators` whose absolute error is at most `tolerance`
pub fn format_quantity_with(value: f64, tolerance: f64, denominators: &[u32]) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if magnitude < SMALLEST_DISPLAYED_AMOUNT {
        return if value < 0.0 {
            "> -1/16".to_string()
        } else {
            "< 1/16".to_string()
        };
    }
    if magnitude >= LARGE_AMOUNT_THRESHOLD {
        return format!("{sign}{}", group_thousands(magnitude.round() as u64));
    }

    let whole = magnitude.trunc() as u64;
    let remainder = magnitude - magnitude.trunc();
    if remainder <= tolerance {
        return format!("{sign}{whole}");
    }

    let fraction = nearest_fraction(remainder, tolerance, denominators).or_else(|| {
        // below one there is no whole part to fall back on
        if whole == 0 {
            nearest_fraction(remainder, f64::INFINITY, denominators)
        } else {
            None
        }
    });

    match fraction {
        Some((numerator, denominator)) if numerator == denominator => {
            format!("{sign}{}", whole + 1)
        }
        Some((numerator, denominator)) if whole > 0 => {
            format!("{sign}{whole} {numerator}/{denominator}")
        }
        Some((numerator, denominator)) => format!("{sign}{numerator}/{denominator}"),
        None => format!("{sign}{whole}"),
    }
}

/// Format an amount followed by its unit in singular or plural form
///
/// ```rust
/// use recipe_scaler::quantity_format::format_amount_with_unit;
///
/// assert_eq!(format_amount_with_unit(4.5, Some("cup")), "4 1/2 cups");
/// assert_eq!(format_amount_with_unit(3.0, None), "3");
/// ```
pub fn format_amount_with_unit(amount: f64, unit: Option<&str>) -> String {
    format_amount_with_unit_using(amount, unit, DEFAULT_FRACTION_TOLERANCE, &FRACTION_DENOMINATORS)
}

/// Same as [`format_amount_with_unit`] with an explicit fraction tolerance and denominators
pub fn format_amount_with_unit_using(
    amount: f64,
    unit: Option<&str>,
    tolerance: f64,
    denominators: &[u32],
) -> String {
    let value = format_quantity_with(amount, tolerance, denominators);
    let unit = unit.map(|u| format_unit(u, amount)).unwrap_or_default();
    join_display_parts(&[&value, &unit])
}

/// Nearest `numerator/denominator` to `remainder`, smallest denominator first on ties
fn nearest_fraction(remainder: f64, tolerance: f64, denominators: &[u32]) -> Option<(u32, u32)> {
    let mut best: Option<(u32, u32)> = None;
    let mut best_error = f64::INFINITY;

    for &denominator in denominators {
        let numerator = (remainder * denominator as f64).round() as u32;
        if numerator == 0 {
            continue;
        }
        let error = (numerator as f64 / denominator as f64 - remainder).abs();
        if error < best_error {
            best_error = error;
            best = Some((numerator, denominator));
        }
    }

    best.filter(|_| best_error <= tolerance)
}

/// "1250" -> "1,250"
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
