//! # Recipe Configuration Module
//!
//! This module defines the application configuration: where recipes are stored,
//! how logging is set up, and how the annotator behaves. Defaults come from the
//! constants below and can be overridden through environment variables (a `.env`
//! file is loaded by the binary first).

use crate::measurement_types::AnnotatorConfig;
use crate::recipe_errors::RecipeError;
use std::path::PathBuf;

// Constants for application configuration
pub const DEFAULT_STORE_DIR: &str = "recipes";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_SERVINGS: u32 = 4;

// Environment variable names
pub const ENV_STORE_DIR: &str = "RECIPE_STORE_DIR";
pub const ENV_LOG_FILTER: &str = "RECIPE_LOG_FILTER";
pub const ENV_LOG_JSON: &str = "RECIPE_LOG_JSON";
pub const ENV_DEFAULT_SERVINGS: &str = "RECIPE_DEFAULT_SERVINGS";
pub const ENV_GENERIC_WORD_FILTER: &str = "RECIPE_GENERIC_WORD_FILTER";

/// Logging configuration for the binary
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. "info" or "recipe_text=debug"
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            json: false,
        }
    }
}

/// Configuration structure for the application
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory of the JSON recipe store
    pub store_dir: PathBuf,
    /// Serving count assumed when a recipe does not state one
    pub default_servings: u32,
    /// Logging setup
    pub log: LogConfig,
    /// Text annotator options
    pub annotator: AnnotatorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            default_servings: DEFAULT_SERVINGS,
            log: LogConfig::default(),
            annotator: AnnotatorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, RecipeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup; unset keys keep their default
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_text::recipe_config::AppConfig;
    ///
    /// let config = AppConfig::from_lookup(|key| match key {
    ///     "RECIPE_DEFAULT_SERVINGS" => Some("6".to_string()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(config.default_servings, 6);
    /// # Ok::<(), recipe_text::recipe_errors::RecipeError>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RecipeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(dir) = value(ENV_STORE_DIR) {
            config.store_dir = PathBuf::from(dir);
        }
        if let Some(filter) = value(ENV_LOG_FILTER) {
            config.log.filter = filter;
        }
        if let Some(json) = value(ENV_LOG_JSON) {
            config.log.json = parse_flag(ENV_LOG_JSON, &json)?;
        }
        if let Some(servings) = value(ENV_DEFAULT_SERVINGS) {
            config.default_servings = match servings.parse::<u32>() {
                Ok(count) if count > 0 => count,
                _ => {
                    return Err(RecipeError::Validation(format!(
                        "{ENV_DEFAULT_SERVINGS} must be a positive integer, got '{servings}'"
                    )))
                }
            };
        }
        if let Some(filter) = value(ENV_GENERIC_WORD_FILTER) {
            config.annotator.exclude_generic_words = parse_flag(ENV_GENERIC_WORD_FILTER, &filter)?;
        }

        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, RecipeError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(RecipeError::Validation(format!(
            "{key} must be a boolean, got '{value}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, RecipeError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.store_dir, PathBuf::from("recipes"));
        assert_eq!(config.default_servings, 4);
        assert!(config.annotator.exclude_generic_words);
        assert!(!config.log.json);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (ENV_STORE_DIR, "/tmp/my-recipes"),
            (ENV_LOG_FILTER, "recipe_text=debug"),
            (ENV_LOG_JSON, "true"),
            (ENV_DEFAULT_SERVINGS, " 2 "),
            (ENV_GENERIC_WORD_FILTER, "off"),
        ])
        .unwrap();
        assert_eq!(config.store_dir, PathBuf::from("/tmp/my-recipes"));
        assert_eq!(config.log.filter, "recipe_text=debug");
        assert!(config.log.json);
        assert_eq!(config.default_servings, 2);
        assert!(!config.annotator.exclude_generic_words);
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = config_from(&[(ENV_STORE_DIR, "  "), (ENV_LOG_FILTER, "")]).unwrap();
        assert_eq!(config.store_dir, PathBuf::from(DEFAULT_STORE_DIR));
        assert_eq!(config.log.filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[(ENV_DEFAULT_SERVINGS, "0")]),
            Err(RecipeError::Validation(_))
        ));
        assert!(matches!(
            config_from(&[(ENV_DEFAULT_SERVINGS, "lots")]),
            Err(RecipeError::Validation(_))
        ));
        assert!(matches!(
            config_from(&[(ENV_LOG_JSON, "maybe")]),
            Err(RecipeError::Validation(_))
        ));
    }
}
