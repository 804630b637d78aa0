//! # Recipe Data Model
//!
//! This module defines the data structures for ingredients, ingredient groups and
//! instruction steps as they arrive from the recipe extraction service, plus the
//! normalization that turns a loosely-shaped document into a [`Recipe`].
//!
//! ## Core Concepts
//!
//! - **Ingredient**: one line item with a free-form amount and unit
//! - **IngredientEntry**: a structured ingredient or a legacy bare string
//! - **IngredientGroup**: a named cluster of ingredients ("For the sauce")
//! - **InstructionStep**: one cooking step with a title and detail text
//! - **IngredientInfo**: the flat projection used when matching instruction text
//!
//! ## Usage
//!
//! ```rust
//! use recipe_text::ingredient_model::{Ingredient, IngredientGroup};
//!
//! let group = IngredientGroup::new("For the sauce")
//!     .with_ingredient(Ingredient::new("2", "cups", "tomato passata"))
//!     .with_ingredient(Ingredient::new("1", "clove", "garlic").with_description("minced"));
//!
//! assert_eq!(group.display_name(), Some("For the sauce"));
//! ```

use crate::amount_parser::parse_amount;
use crate::recipe_errors::RecipeError;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

/// Group name meaning "ungrouped"; never shown as a header
pub const MAIN_GROUP: &str = "Main";

static STEP_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^step\s*\d+[.:]?$").unwrap());
static FIRST_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// One ingredient line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Free-form amount ("2", "1½", "2-3", "as needed"); may be absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,

    /// Free-form unit ("cups", "g"); may be empty
    #[serde(default)]
    pub units: String,

    /// Ingredient name
    pub ingredient: String,

    /// Preparation notes ("finely chopped")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Suggested replacements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitutions: Option<Vec<String>>,
}

/// An ingredient as it appears in a group: structured, or a legacy bare string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientEntry {
    Structured(Ingredient),
    Legacy(String),
}

/// A named cluster of ingredients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientGroup {
    /// Header text; [`MAIN_GROUP`] means ungrouped
    pub group_name: String,

    /// Ingredients in display order
    #[serde(default)]
    pub ingredients: Vec<IngredientEntry>,
}

/// One cooking step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionStep {
    /// Short label ("Step 3", "Make the roux")
    pub title: String,

    /// Full instruction text
    pub detail: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_minutes: Option<f64>,

    /// Names of the ingredients this step uses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

/// A step as received: legacy bare string or a possibly incomplete object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInstruction {
    Text(String),
    Step(RawStep),
}

/// Instruction object before normalization; every field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStep {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub time_minutes: Option<f64>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub tips: Option<String>,
}

/// An ingredient list section as received.
///
/// Documents may carry proper groups, bare entries, or scraper rows of the form
/// `[name, amount, unit, notes]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientSection {
    Group(IngredientGroup),
    Row(Vec<String>),
    Entry(IngredientEntry),
}

/// Simplified ingredient used when matching instruction text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IngredientInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default)]
    pub units: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Serving count as the extraction service reports it.
///
/// Deserialization never fails on a present value: whole numbers (including
/// `4.0`) become a count, anything else is kept as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Servings {
    Count(u32),
    Text(String),
}

impl<'de> Deserialize<'de> for Servings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(number) => match number.as_f64() {
                Some(count) if count >= 0.0 && count.fract() == 0.0 && count <= f64::from(u32::MAX) => {
                    Servings::Count(count as u32)
                }
                _ => Servings::Text(number.to_string()),
            },
            Value::String(text) => Servings::Text(text),
            other => Servings::Text(other.to_string()),
        })
    }
}

/// Step duration in minutes from a number or a string such as "10" or "10 minutes".
/// Anything unreadable becomes `None`.
fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => parse_amount(&text),
        _ => None,
    })
}

/// The JSON document returned by the recipe extraction service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientSection>,
    #[serde(default)]
    pub instructions: Vec<RawInstruction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<Servings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cuisine_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plating: Option<String>,
}

/// A normalized recipe: grouped ingredients and numbered steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub ingredients: Vec<IngredientGroup>,
    pub instructions: Vec<InstructionStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<Servings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cuisine_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plating: Option<String>,
}

impl Ingredient {
    /// Create an ingredient from amount, units and name
    pub fn new(amount: &str, units: &str, ingredient: &str) -> Self {
        Self {
            amount: Some(amount.to_string()),
            units: units.to_string(),
            ingredient: ingredient.to_string(),
            description: None,
            substitutions: None,
        }
    }

    /// Create an ingredient with only a name (amount missing)
    pub fn named(ingredient: &str) -> Self {
        Self {
            amount: None,
            units: String::new(),
            ingredient: ingredient.to_string(),
            description: None,
            substitutions: None,
        }
    }

    /// Add a preparation description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Add substitution suggestions
    pub fn with_substitutions(mut self, substitutions: &[&str]) -> Self {
        self.substitutions = Some(substitutions.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Amount text if present and non-blank
    pub fn amount_text(&self) -> Option<&str> {
        self.amount.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }

    /// Build an ingredient from a scraper row `[name, amount, unit, notes]`
    pub fn from_row(row: &[String]) -> Option<Self> {
        let cell = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or_default();
        let name = cell(0);
        if name.is_empty() {
            return None;
        }
        let amount = cell(1);
        let notes = cell(3);
        Some(Self {
            amount: (!amount.is_empty()).then(|| amount.to_string()),
            units: cell(2).to_string(),
            ingredient: name.to_string(),
            description: (!notes.is_empty()).then(|| notes.to_string()),
            substitutions: None,
        })
    }
}

impl IngredientEntry {
    /// Name used for matching and display
    pub fn name(&self) -> &str {
        match self {
            IngredientEntry::Structured(ingredient) => &ingredient.ingredient,
            IngredientEntry::Legacy(text) => text,
        }
    }
}

impl From<Ingredient> for IngredientEntry {
    fn from(ingredient: Ingredient) -> Self {
        IngredientEntry::Structured(ingredient)
    }
}

impl IngredientGroup {
    /// Create an empty group
    pub fn new(group_name: &str) -> Self {
        Self {
            group_name: group_name.to_string(),
            ingredients: Vec::new(),
        }
    }

    /// Append an ingredient
    pub fn with_ingredient(mut self, ingredient: impl Into<IngredientEntry>) -> Self {
        self.ingredients.push(ingredient.into());
        self
    }

    /// Header to display, `None` for the ungrouped sentinel
    pub fn display_name(&self) -> Option<&str> {
        let name = self.group_name.trim();
        if name.is_empty() || name == MAIN_GROUP {
            None
        } else {
            Some(name)
        }
    }
}

impl InstructionStep {
    /// Create a step with a title and detail
    pub fn new(title: &str, detail: &str) -> Self {
        Self {
            title: title.to_string(),
            detail: detail.to_string(),
            time_minutes: None,
            ingredients: None,
            tips: None,
        }
    }
}

impl IngredientInfo {
    /// Create an info carrying only a name
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            amount: None,
            units: String::new(),
            group: None,
        }
    }
}

impl Servings {
    /// Numeric serving count, taking the first integer of a textual value
    pub fn count(&self) -> Option<u32> {
        match self {
            Servings::Count(count) => Some(*count),
            Servings::Text(text) => FIRST_INTEGER.find(text).and_then(|m| m.as_str().parse().ok()),
        }
    }
}

/// Normalize raw instructions into numbered steps.
///
/// Bare strings become `Step N` steps, steps without detail are dropped, and
/// titles that are blank, repeat the detail, or are just a step label get the
/// `Step N` default. `N` counts the steps that survive.
pub fn normalize_instructions(raw: &[RawInstruction]) -> Vec<InstructionStep> {
    let mut steps = Vec::with_capacity(raw.len());

    for instruction in raw {
        let number = steps.len() + 1;
        let default_title = format!("Step {number}");
        match instruction {
            RawInstruction::Text(text) => {
                let detail = text.trim();
                if !detail.is_empty() {
                    steps.push(InstructionStep::new(&default_title, detail));
                }
            }
            RawInstruction::Step(step) => {
                let Some(detail) = step.detail.as_deref().map(str::trim).filter(|d| !d.is_empty()) else {
                    continue;
                };
                let title = match step.title.as_deref().map(str::trim) {
                    Some(title) if !is_redundant_title(title, detail) => title.to_string(),
                    _ => default_title,
                };
                steps.push(InstructionStep {
                    title,
                    detail: detail.to_string(),
                    time_minutes: step.time_minutes,
                    ingredients: step.ingredients.clone(),
                    tips: step.tips.clone(),
                });
            }
        }
    }

    steps
}

fn is_redundant_title(title: &str, detail: &str) -> bool {
    title.is_empty() || title.eq_ignore_ascii_case(detail) || STEP_LABEL.is_match(title)
}

/// Fold raw sections into groups; runs of ungrouped items go to a `Main` group
pub fn normalize_ingredient_sections(sections: &[IngredientSection]) -> Vec<IngredientGroup> {
    let mut groups: Vec<IngredientGroup> = Vec::new();
    let mut loose: Vec<IngredientEntry> = Vec::new();

    let flush = |loose: &mut Vec<IngredientEntry>, groups: &mut Vec<IngredientGroup>| {
        if !loose.is_empty() {
            groups.push(IngredientGroup {
                group_name: MAIN_GROUP.to_string(),
                ingredients: std::mem::take(loose),
            });
        }
    };

    for section in sections {
        match section {
            IngredientSection::Group(group) => {
                flush(&mut loose, &mut groups);
                let ingredients: Vec<IngredientEntry> = group
                    .ingredients
                    .iter()
                    .filter(|entry| !entry.name().trim().is_empty())
                    .cloned()
                    .collect();
                if !ingredients.is_empty() {
                    groups.push(IngredientGroup {
                        group_name: group.group_name.trim().to_string(),
                        ingredients,
                    });
                }
            }
            IngredientSection::Row(row) => {
                if let Some(ingredient) = Ingredient::from_row(row) {
                    loose.push(IngredientEntry::Structured(ingredient));
                }
            }
            IngredientSection::Entry(entry) => {
                if !entry.name().trim().is_empty() {
                    loose.push(entry.clone());
                }
            }
        }
    }
    flush(&mut loose, &mut groups);

    groups
}

/// Project every ingredient into the flat form used for text matching
pub fn flatten_ingredients(groups: &[IngredientGroup]) -> Vec<IngredientInfo> {
    groups
        .iter()
        .flat_map(|group| {
            group.ingredients.iter().map(move |entry| match entry {
                IngredientEntry::Structured(ingredient) => IngredientInfo {
                    name: ingredient.ingredient.clone(),
                    amount: ingredient.amount_text().map(str::to_string),
                    units: ingredient.units.clone(),
                    group: Some(group.group_name.clone()),
                },
                IngredientEntry::Legacy(text) => IngredientInfo {
                    group: Some(group.group_name.clone()),
                    ..IngredientInfo::named(text)
                },
            })
        })
        .collect()
}

impl Recipe {
    /// Normalize and validate an extracted document.
    ///
    /// Fails when the title, ingredients or instructions are empty after
    /// normalization.
    pub fn from_document(document: RecipeDocument) -> Result<Self, RecipeError> {
        let title = document.title.trim().to_string();
        let ingredients = normalize_ingredient_sections(&document.ingredients);
        let instructions = normalize_instructions(&document.instructions);

        if title.is_empty() {
            return Err(RecipeError::Validation("recipe has no title".to_string()));
        }
        if ingredients.is_empty() {
            return Err(RecipeError::Validation(format!("recipe '{title}' has no ingredients")));
        }
        if instructions.is_empty() {
            return Err(RecipeError::Validation(format!("recipe '{title}' has no instructions")));
        }

        Ok(Self {
            title,
            ingredients,
            instructions,
            author: document.author,
            servings: document.servings,
            prep_time: document.prep_time,
            cook_time: document.cook_time,
            total_time: document.total_time,
            cuisine_tags: document.cuisine_tags,
            storage: document.storage,
            plating: document.plating,
        })
    }

    /// Serving count, if the document stated one
    pub fn serving_count(&self) -> Option<u32> {
        self.servings.as_ref().and_then(Servings::count)
    }

    /// All ingredients flattened for text matching
    pub fn ingredient_infos(&self) -> Vec<IngredientInfo> {
        flatten_ingredients(&self.ingredients)
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(amount) = self.amount_text() {
            write!(f, "{amount} ")?;
        }
        if !self.units.trim().is_empty() {
            write!(f, "{} ", self.units.trim())?;
        }
        write!(f, "{}", self.ingredient)?;
        if let Some(description) = &self.description {
            write!(f, ", {description}")?;
        }
        Ok(())
    }
}

impl fmt::Display for IngredientEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngredientEntry::Structured(ingredient) => write!(f, "{ingredient}"),
            IngredientEntry::Legacy(text) => write!(f, "{text}"),
        }
    }
}
