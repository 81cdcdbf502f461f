//! # Measurement Patterns Module
//!
//! This module contains regex patterns and constants used for quantity detection.

use lazy_static::lazy_static;
use regex::Regex;

/// Leading quantity token, alternatives in priority order:
/// mixed number, simple fraction, decimal, integer.
pub const LEADING_QUANTITY_PATTERN: &str =
    r"^(?:(?P<whole>\d+)\s+(?P<mixed_num>\d+)/(?P<mixed_den>\d+)|(?P<num>\d+)/(?P<den>\d+)|(?P<decimal>\d*\.\d+|\d+\.\d*)|(?P<integer>\d+))";

/// Loose leading quantity run (digits, fractions, ranges, parentheses) used
/// when stripping a quantity off display text.
pub const QUANTITY_PREFIX_PATTERN: &str = r"^[\d/().\s-]+";

/// Characters that are not letters or whitespace, used for category cleanup.
pub const NON_LETTER_PATTERN: &str = r"[^a-z\s]";

// Lazy static regexes to avoid recompilation
lazy_static! {
    pub static ref LEADING_QUANTITY_REGEX: Regex = Regex::new(LEADING_QUANTITY_PATTERN)
        .expect("Leading quantity pattern should be valid");
    pub static ref QUANTITY_PREFIX_REGEX: Regex = Regex::new(QUANTITY_PREFIX_PATTERN)
        .expect("Quantity prefix pattern should be valid");
    pub static ref NON_LETTER_REGEX: Regex =
        Regex::new(NON_LETTER_PATTERN).expect("Non-letter pattern should be valid");
}
