//! # Recipe Error Types Module
//!
//! This module defines the error type for the boundaries around the text engine:
//! loading documents, validating them and talking to the recipe store or the
//! extraction service. The engine itself never fails; it degrades to unchanged
//! values instead.

/// Custom error types for recipe handling
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeError {
    /// Document is structurally valid JSON but not a usable recipe
    Validation(String),
    /// Document could not be decoded
    Parse(String),
    /// Recipe store failures
    Storage(String),
    /// Extraction service failures
    Extraction(String),
    /// No recipe with the given id
    NotFound(String),
}

impl std::fmt::Display for RecipeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipeError::Validation(msg) => write!(f, "Validation error: {msg}"),
            RecipeError::Parse(msg) => write!(f, "Parse error: {msg}"),
            RecipeError::Storage(msg) => write!(f, "Storage error: {msg}"),
            RecipeError::Extraction(msg) => write!(f, "Extraction error: {msg}"),
            RecipeError::NotFound(id) => write!(f, "Recipe not found: {id}"),
        }
    }
}

impl std::error::Error for RecipeError {}

impl From<serde_json::Error> for RecipeError {
    fn from(err: serde_json::Error) -> Self {
        RecipeError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for RecipeError {
    fn from(err: std::io::Error) -> Self {
        RecipeError::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for RecipeError {
    fn from(err: anyhow::Error) -> Self {
        RecipeError::Storage(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            RecipeError::Validation("no title".to_string()).to_string(),
            "Validation error: no title"
        );
        assert_eq!(RecipeError::NotFound("abc".to_string()).to_string(), "Recipe not found: abc");
    }

    #[test]
    fn test_from_serde_error() {
        let err: RecipeError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, RecipeError::Parse(_)));
    }
}
