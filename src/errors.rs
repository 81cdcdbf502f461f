//! # Error Types Module
//!
//! Errors raised by the I/O-facing layer: loading recipe files and reading
//! configuration. The parsing, scaling and combining core never fails; it
//! degrades to raw display text instead.

/// Custom error types for recipe loading and configuration
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeError {
    /// File system errors
    Io(String),
    /// Malformed JSON in a recipe or index file
    Json(String),
    /// Structurally valid input that cannot be used
    Validation(String),
    /// Invalid configuration values
    Config(String),
}

impl std::fmt::Display for RecipeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipeError::Io(msg) => write!(f, "I/O error: {msg}"),
            RecipeError::Json(msg) => write!(f, "JSON error: {msg}"),
            RecipeError::Validation(msg) => write!(f, "Validation error: {msg}"),
            RecipeError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for RecipeError {}

impl From<std::io::Error> for RecipeError {
    fn from(err: std::io::Error) -> Self {
        RecipeError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RecipeError {
    fn from(err: serde_json::Error) -> Self {
        RecipeError::Json(err.to_string())
    }
}

impl From<anyhow::Error> for RecipeError {
    fn from(err: anyhow::Error) -> Self {
        RecipeError::Validation(err.to_string())
    }
}
