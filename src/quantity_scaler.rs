//! # Quantity Scaler
//!
//! Rescales every ingredient amount of a recipe for a different serving count while
//! keeping the original notation: ranges keep their separator and fractions come
//! back as vulgar fractions.
//!
//! Scaling is all-or-nothing per ingredient. Anything that does not parse (vague
//! amounts, half-readable ranges, legacy strings) is returned exactly as it was.
//!
//! ## Usage
//!
//! ```rust
//! use recipe_text::ingredient_model::{Ingredient, IngredientGroup};
//! use recipe_text::quantity_scaler::scale_ingredients;
//!
//! let groups = vec![IngredientGroup::new("Main").with_ingredient(Ingredient::new("2-3", "cups", "flour"))];
//! let scaled = scale_ingredients(&groups, 4, 8);
//! assert_eq!(scaled[0].ingredients[0].to_string(), "4-6 cups flour");
//! ```

use crate::amount_parser::{format_amount, parse_amount_value, ParsedAmount};
use crate::ingredient_model::{Ingredient, IngredientEntry, IngredientGroup};
use crate::ingredient_parser::{extract_embedded_quantity, split_range, AmountShape};
use log::{debug, trace};
use std::borrow::Cow;

/// Rescale every ingredient of every group from `original_servings` to `new_servings`.
///
/// Both counts are clamped to at least 1. When the factor is exactly 1 the input
/// is handed back borrowed, untouched.
pub fn scale_ingredients(
    groups: &[IngredientGroup],
    original_servings: u32,
    new_servings: u32,
) -> Cow<'_, [IngredientGroup]> {
    let factor = scale_factor(original_servings, new_servings);
    if factor == 1.0 {
        trace!("Scale factor is 1, returning ingredients unchanged");
        return Cow::Borrowed(groups);
    }

    debug!(
        "Scaling {} ingredient groups from {} to {} servings (factor {})",
        groups.len(),
        original_servings,
        new_servings,
        factor
    );

    Cow::Owned(
        groups
            .iter()
            .map(|group| IngredientGroup {
                group_name: group.group_name.clone(),
                ingredients: group
                    .ingredients
                    .iter()
                    .map(|entry| scale_ingredient(entry, factor))
                    .collect(),
            })
            .collect(),
    )
}

/// Ratio between serving counts, each clamped to at least 1
pub fn scale_factor(original_servings: u32, new_servings: u32) -> f64 {
    f64::from(new_servings.max(1)) / f64::from(original_servings.max(1))
}

/// Rescale a single ingredient entry.
///
/// - Legacy strings are returned unmodified.
/// - A missing amount is looked for inside the name ("2 cups flour"); when found the
///   result comes back split into amount, units and name.
/// - Ranges scale both ends or neither.
pub fn scale_ingredient(entry: &IngredientEntry, factor: f64) -> IngredientEntry {
    let ingredient = match entry {
        IngredientEntry::Legacy(_) => return entry.clone(),
        IngredientEntry::Structured(ingredient) => ingredient,
    };

    let Some(amount) = ingredient.amount_text() else {
        return IngredientEntry::Structured(scale_embedded(ingredient, factor));
    };

    match scale_amount_text(amount, factor) {
        Some(scaled) => IngredientEntry::Structured(Ingredient {
            amount: Some(scaled),
            ..ingredient.clone()
        }),
        None => {
            trace!("Amount '{}' of '{}' is not scalable", amount, ingredient.ingredient);
            entry.clone()
        }
    }
}

/// Scale an amount string, keeping range notation. `None` when any part fails to parse.
///
/// # Examples
///
/// ```rust
/// use recipe_text::quantity_scaler::scale_amount_text;
///
/// assert_eq!(scale_amount_text("2 to 4", 0.5).as_deref(), Some("1 to 2"));
/// assert_eq!(scale_amount_text("¾", 2.0).as_deref(), Some("1½"));
/// assert_eq!(scale_amount_text("to taste", 2.0), None);
/// ```
pub fn scale_amount_text(amount: &str, factor: f64) -> Option<String> {
    match split_range(amount) {
        AmountShape::Single(single) => scale_single(single, factor),
        AmountShape::Range { low, high, separator } => {
            let low = scale_single(low, factor)?;
            let high = scale_single(high, factor)?;
            Some(format!("{}{}{}", low, separator.as_str(), high))
        }
    }
}

fn scale_single(amount: &str, factor: f64) -> Option<String> {
    match parse_amount_value(amount) {
        ParsedAmount::Parsed(value) => Some(format_amount(value * factor)),
        ParsedAmount::Unparseable => None,
    }
}

/// The amount is missing: try to recover it from the name itself
fn scale_embedded(ingredient: &Ingredient, factor: f64) -> Ingredient {
    let Some(embedded) = extract_embedded_quantity(&ingredient.ingredient) else {
        return ingredient.clone();
    };
    let Some(scaled) = scale_amount_text(&embedded.amount, factor) else {
        return ingredient.clone();
    };

    debug!(
        "Split embedded quantity '{}' -> amount='{}', units='{}', name='{}'",
        ingredient.ingredient, scaled, embedded.units, embedded.name
    );
    Ingredient {
        amount: Some(scaled),
        units: embedded.units,
        ingredient: embedded.name,
        ..ingredient.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structured(entry: &IngredientEntry) -> &Ingredient {
        match entry {
            IngredientEntry::Structured(ingredient) => ingredient,
            IngredientEntry::Legacy(text) => panic!("expected structured ingredient, got '{text}'"),
        }
    }

    #[test]
    fn test_scale_factor_clamps_servings() {
        assert_eq!(scale_factor(4, 8), 2.0);
        assert_eq!(scale_factor(0, 2), 2.0);
        assert_eq!(scale_factor(3, 0), 1.0 / 3.0);
    }

    #[test]
    fn test_scale_simple_amount() {
        let entry = IngredientEntry::from(Ingredient::new("1½", "cups", "milk"));
        let scaled = scale_ingredient(&entry, 2.0);
        assert_eq!(structured(&scaled).amount.as_deref(), Some("3"));
        assert_eq!(structured(&scaled).units, "cups");
    }

    #[test]
    fn test_scale_hyphen_range() {
        let entry = IngredientEntry::from(Ingredient::new("2-3", "cups", "flour"));
        let scaled = scale_ingredient(&entry, 2.0);
        assert_eq!(scaled, IngredientEntry::from(Ingredient::new("4-6", "cups", "flour")));
    }

    #[test]
    fn test_scale_to_range_keeps_separator() {
        let entry = IngredientEntry::from(Ingredient::new("2 to 4", "tbsp", "butter"));
        let scaled = scale_ingredient(&entry, 0.5);
        assert_eq!(structured(&scaled).amount.as_deref(), Some("1 to 2"));
    }

    #[test]
    fn test_half_parseable_range_is_untouched() {
        let entry = IngredientEntry::from(Ingredient::new("2-a few", "cups", "stock"));
        assert_eq!(scale_ingredient(&entry, 2.0), entry);
    }

    #[test]
    fn test_vague_amount_is_untouched() {
        let entry = IngredientEntry::from(Ingredient::new("as needed", "", "salt"));
        assert_eq!(scale_ingredient(&entry, 2.0), entry);
    }

    #[test]
    fn test_legacy_string_is_untouched() {
        let entry = IngredientEntry::Legacy("2 cups flour".to_string());
        assert_eq!(scale_ingredient(&entry, 3.0), entry);
    }

    #[test]
    fn test_embedded_quantity_is_split_and_scaled() {
        let entry = IngredientEntry::from(Ingredient::named("1 1/2 cups whole milk").with_description("warm"));
        let scaled = scale_ingredient(&entry, 2.0);
        let ingredient = structured(&scaled);
        assert_eq!(ingredient.amount.as_deref(), Some("3"));
        assert_eq!(ingredient.units, "cups");
        assert_eq!(ingredient.ingredient, "whole milk");
        assert_eq!(ingredient.description.as_deref(), Some("warm"));
    }

    #[test]
    fn test_embedded_spaced_unicode_fraction_is_scaled_whole() {
        let entry = IngredientEntry::from(Ingredient::named("1 ½ cups flour"));
        let scaled = scale_ingredient(&entry, 2.0);
        assert_eq!(scaled, IngredientEntry::from(Ingredient::new("3", "cups", "flour")));
    }

    #[test]
    fn test_embedded_unicode_fraction_range_is_scaled() {
        let entry = IngredientEntry::from(Ingredient::named("1½-2 cups stock"));
        let scaled = scale_ingredient(&entry, 2.0);
        assert_eq!(scaled, IngredientEntry::from(Ingredient::new("3-4", "cups", "stock")));
    }

    #[test]
    fn test_name_without_quantity_is_untouched() {
        let entry = IngredientEntry::from(Ingredient::named("fresh basil"));
        assert_eq!(scale_ingredient(&entry, 2.0), entry);
    }

    #[test]
    fn test_identity_scaling_borrows() {
        let groups = vec![IngredientGroup::new("Main").with_ingredient(Ingredient::new("2", "cups", "rice"))];
        let scaled = scale_ingredients(&groups, 4, 4);
        assert!(matches!(scaled, Cow::Borrowed(_)));
        assert!(std::ptr::eq(scaled.as_ptr(), groups.as_ptr()));
    }

    #[test]
    fn test_scale_preserves_groups_and_order() {
        let groups = vec![
            IngredientGroup::new("Main")
                .with_ingredient(Ingredient::new("2", "cups", "rice"))
                .with_ingredient(Ingredient::new("1-2", "", "bay leaves")),
            IngredientGroup::new("Sauce").with_ingredient(Ingredient::new("¼", "cup", "soy sauce")),
        ];
        let scaled = scale_ingredients(&groups, 4, 8);

        assert_eq!(scaled.len(), 2);
        assert_eq!(scaled[0].group_name, "Main");
        assert_eq!(structured(&scaled[0].ingredients[0]).amount.as_deref(), Some("4"));
        assert_eq!(structured(&scaled[0].ingredients[1]).amount.as_deref(), Some("2-4"));
        assert_eq!(scaled[1].group_name, "Sauce");
        assert_eq!(structured(&scaled[1].ingredients[0]).amount.as_deref(), Some("½"));
    }
}
