//! # Recipe Text
//!
//! Text engine for recipe documents: normalizes loosely-shaped recipes, rescales
//! ingredient amounts for a different serving count, and annotates instruction
//! text with highlighted quantities, durations and ingredient mentions.

pub mod amount_parser;
pub mod ingredient_matcher;
pub mod ingredient_model;
pub mod ingredient_parser;
pub mod measurement_patterns;
pub mod measurement_types;
pub mod quantity_scaler;
pub mod recipe_config;
pub mod recipe_errors;
pub mod recipe_integration;
pub mod recipe_store;
pub mod text_processing;

// Re-export commonly used types
pub use amount_parser::{format_amount, parse_amount};
pub use ingredient_matcher::find_ingredients_in_text;
pub use ingredient_model::{Ingredient, IngredientGroup, IngredientInfo, InstructionStep, Recipe, RecipeDocument};
pub use measurement_types::{AnnotatedText, AnnotatorConfig, MatchKind, Segment, TextMatch};
pub use quantity_scaler::scale_ingredients;
pub use recipe_errors::RecipeError;
pub use text_processing::{highlight_quantities_and_ingredients, TextAnnotator};
