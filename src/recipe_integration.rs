//! # Recipe Integration Module
//!
//! This module connects the text engine to its collaborators: an extraction
//! service that turns a URL, pasted text or an image into a recipe document, and
//! a [`RecipeStore`] that keeps the normalized result. It also renders scaled
//! ingredient lists and annotated steps as plain text.
//!
//! ## Usage
//!
//! ```rust
//! use recipe_text::recipe_integration::{import_recipe, JsonDocumentExtractor, RecipeSource};
//! use recipe_text::recipe_store::{InMemoryRecipeStore, RecipeStore};
//!
//! let json = r#"{
//!     "title": "Rice",
//!     "ingredients": [{"amount": "1", "units": "cup", "ingredient": "rice"}],
//!     "instructions": ["Rinse the rice", "Simmer for 15 minutes"]
//! }"#;
//!
//! let mut store = InMemoryRecipeStore::new();
//! let id = import_recipe(&JsonDocumentExtractor, &mut store, &RecipeSource::Text(json.to_string()))?;
//! let recipe = store.load(&id)?.unwrap();
//! assert_eq!(recipe.instructions[1].title, "Step 2");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::ingredient_model::{IngredientGroup, Recipe, RecipeDocument};
use crate::measurement_types::{AnnotatedText, MatchKind, Segment};
use crate::quantity_scaler::scale_ingredients;
use crate::recipe_errors::RecipeError;
use crate::recipe_store::RecipeStore;
use crate::text_processing::TextAnnotator;
use std::fmt::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Where a recipe comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeSource {
    /// A web page
    Url(String),
    /// Pasted text
    Text(String),
    /// A photo of a recipe
    Image(PathBuf),
}

impl RecipeSource {
    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            RecipeSource::Url(_) => "url",
            RecipeSource::Text(_) => "text",
            RecipeSource::Image(_) => "image",
        }
    }
}

/// Service that turns a source into a raw recipe document
pub trait RecipeExtractor {
    fn extract(&self, source: &RecipeSource) -> Result<RecipeDocument, RecipeError>;
}

/// Extractor for text sources that already hold a recipe document as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentExtractor;

impl RecipeExtractor for JsonDocumentExtractor {
    fn extract(&self, source: &RecipeSource) -> Result<RecipeDocument, RecipeError> {
        match source {
            RecipeSource::Text(json) => Ok(serde_json::from_str(json)?),
            other => Err(RecipeError::Extraction(format!(
                "JSON extractor cannot read {} sources",
                other.kind()
            ))),
        }
    }
}

/// Extract, normalize, validate and store a recipe; returns the new id
pub fn import_recipe<E, S>(extractor: &E, store: &mut S, source: &RecipeSource) -> Result<String, RecipeError>
where
    E: RecipeExtractor + ?Sized,
    S: RecipeStore + ?Sized,
{
    info!(source = source.kind(), "Importing recipe");
    let document = extractor.extract(source).map_err(|e| {
        warn!(source = source.kind(), error = %e, "Recipe extraction failed");
        e
    })?;
    import_document(store, document)
}

/// Normalize, validate and store an already extracted document; returns the new id
pub fn import_document<S>(store: &mut S, document: RecipeDocument) -> Result<String, RecipeError>
where
    S: RecipeStore + ?Sized,
{
    let recipe = Recipe::from_document(document)?;
    debug!(
        title = %recipe.title,
        groups = recipe.ingredients.len(),
        steps = recipe.instructions.len(),
        "Recipe normalized"
    );

    let id = store.save(&recipe)?;
    info!(recipe_id = %id, title = %recipe.title, "Recipe imported");
    Ok(id)
}

/// Render ingredient groups as plain text; the "Main" header is suppressed
///
/// # Examples
///
/// ```rust
/// use recipe_text::ingredient_model::{Ingredient, IngredientGroup};
/// use recipe_text::recipe_integration::format_scaled_ingredients;
///
/// let groups = vec![
///     IngredientGroup::new("Main").with_ingredient(Ingredient::new("2", "cups", "rice")),
///     IngredientGroup::new("Sauce").with_ingredient(Ingredient::new("1", "tbsp", "soy sauce")),
/// ];
/// assert_eq!(
///     format_scaled_ingredients(&groups),
///     "- 2 cups rice\n\nSauce:\n- 1 tbsp soy sauce\n"
/// );
/// ```
pub fn format_scaled_ingredients(groups: &[IngredientGroup]) -> String {
    let mut output = String::new();
    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        if let Some(name) = group.display_name() {
            let _ = writeln!(output, "{name}:");
        }
        for entry in &group.ingredients {
            let _ = writeln!(output, "- {entry}");
        }
    }
    output
}

/// Render annotated text with inline markers
///
/// # Examples
///
/// ```rust
/// use recipe_text::ingredient_model::IngredientInfo;
/// use recipe_text::recipe_integration::format_annotated_text;
/// use recipe_text::text_processing::highlight_quantities_and_ingredients;
///
/// let annotated = highlight_quantities_and_ingredients(
///     "Add 1/2 cup rice and cook 10 minutes",
///     &[IngredientInfo::named("rice")],
/// );
/// assert_eq!(
///     format_annotated_text(&annotated),
///     "Add [qty: ½ cup] {rice} and cook [time: 10 minutes]"
/// );
/// ```
pub fn format_annotated_text(annotated: &AnnotatedText) -> String {
    annotated
        .segments
        .iter()
        .map(|segment| match segment {
            Segment::Plain { text } => text.clone(),
            Segment::Highlight(span) => match span.kind {
                MatchKind::Time => format!("[time: {}]", span.text),
                MatchKind::Quantity => format!("[qty: {}]", span.text),
                MatchKind::Ingredient => format!("{{{}}}", span.text),
            },
        })
        .collect()
}

/// Render a whole recipe for `servings`, with annotated steps.
///
/// When the recipe does not state its serving count, `default_servings` is
/// assumed for it.
pub fn format_recipe(
    recipe: &Recipe,
    servings: Option<u32>,
    default_servings: u32,
    annotator: &TextAnnotator,
) -> String {
    let original = recipe.serving_count().unwrap_or(default_servings);
    let target = servings.unwrap_or(original);
    let groups = scale_ingredients(&recipe.ingredients, original, target);

    let mut output = String::new();
    let _ = writeln!(output, "{}", recipe.title);
    if let Some(author) = &recipe.author {
        let _ = writeln!(output, "by {author}");
    }
    let _ = writeln!(output, "Serves {target}");

    let _ = writeln!(output, "\nIngredients\n");
    output.push_str(&format_scaled_ingredients(&groups));

    let _ = writeln!(output, "\nInstructions\n");
    for annotated in annotator.annotate_steps(&recipe.instructions, &groups) {
        let _ = writeln!(output, "{}: {}", annotated.step.title, format_annotated_text(&annotated.annotated));
        if let Some(tips) = &annotated.step.tips {
            let _ = writeln!(output, "  Tip: {tips}");
        }
    }

    for (label, value) in [("Storage", &recipe.storage), ("Plating", &recipe.plating)] {
        if let Some(value) = value {
            let _ = writeln!(output, "\n{label}: {value}");
        }
    }
    output
}
