//! # Ingredient Matcher
//!
//! Finds which of a recipe's ingredients an instruction mentions. Each ingredient is
//! tried against four escalating stages and the first stage that finds anything wins:
//!
//! 1. the full name, anywhere in the text (case-insensitive)
//! 2. the singular form of a plural name, or the plural form of a singular one
//! 3. the significant words of a multi-word name, each on its own
//! 4. a generic term from the synonym table ("meat" for "pork belly")
//!
//! Matching never fails: odd names simply produce no match.

use crate::ingredient_model::IngredientInfo;
use crate::measurement_patterns::{GENERIC_WORDS, SYNONYM_TABLE};
use crate::measurement_types::{AnnotatorConfig, IngredientMatch};
use log::{debug, trace};
use regex::RegexBuilder;
use std::collections::HashMap;
use std::ops::Range;

/// Find the ingredients mentioned in `text` using the default configuration.
///
/// # Examples
///
/// ```rust
/// use recipe_text::ingredient_matcher::find_ingredients_in_text;
/// use recipe_text::ingredient_model::IngredientInfo;
///
/// let found = find_ingredients_in_text("Add the meat and sauté", &[IngredientInfo::named("pork belly")]);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].matched_terms, vec!["meat".to_string()]);
/// ```
pub fn find_ingredients_in_text(text: &str, ingredients: &[IngredientInfo]) -> Vec<IngredientMatch> {
    find_ingredients_with_config(text, ingredients, &AnnotatorConfig::default())
}

/// Find the ingredients mentioned in `text`.
///
/// Results follow the order of `ingredients`; entries sharing a name are merged
/// into one match with the union of their matched terms.
pub fn find_ingredients_with_config(
    text: &str,
    ingredients: &[IngredientInfo],
    config: &AnnotatorConfig,
) -> Vec<IngredientMatch> {
    if text.trim().is_empty() || ingredients.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<IngredientMatch> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for info in ingredients {
        let terms = match_ingredient(text, info, config);
        if terms.is_empty() {
            continue;
        }

        let key = info.name.trim().to_lowercase();
        match by_name.get(&key) {
            Some(&index) => merge_terms(&mut matches[index].matched_terms, terms),
            None => {
                by_name.insert(key, matches.len());
                let mut matched_terms = Vec::new();
                merge_terms(&mut matched_terms, terms);
                matches.push(IngredientMatch {
                    ingredient: info.clone(),
                    matched_terms,
                });
            }
        }
    }

    debug!("Matched {} of {} ingredients in text", matches.len(), ingredients.len());
    matches
}

/// Run the four stages for one ingredient; returns matched source-text terms
fn match_ingredient(text: &str, info: &IngredientInfo, config: &AnnotatorConfig) -> Vec<String> {
    let name = info.name.trim().to_lowercase();
    if name.is_empty() {
        return Vec::new();
    }

    // 1. full name
    let hits = find_occurrences(text, &name);
    if !hits.is_empty() {
        trace!("'{}' matched by full name", name);
        return slices(text, &hits);
    }

    // 2. singular / plural
    let alternates = if name.ends_with('s') {
        singular_forms(&name)
    } else {
        plural_forms(&name)
    };
    for alternate in alternates.iter().filter(|form| form.chars().count() > 3) {
        let hits = find_occurrences(text, alternate);
        if !hits.is_empty() {
            trace!("'{}' matched by alternate form '{}'", name, alternate);
            return slices(text, &hits);
        }
    }

    // 3. significant words
    let words: Vec<&str> = name
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .collect();
    if words.len() > 1 {
        let mut terms = Vec::new();
        for word in words {
            if !is_significant_word(word, config) {
                continue;
            }
            let mut hits = find_occurrences(text, word);
            if hits.is_empty() {
                for singular in singular_forms(word) {
                    if singular.chars().count() > config.min_word_length {
                        hits = find_occurrences(text, &singular);
                        if !hits.is_empty() {
                            break;
                        }
                    }
                }
            }
            terms.extend(slices(text, &hits));
        }
        if !terms.is_empty() {
            trace!("'{}' matched by words {:?}", name, terms);
            return terms;
        }
    }

    // 4. generic synonyms
    if config.match_synonyms {
        let mut terms = Vec::new();
        for (generic, specifics) in SYNONYM_TABLE {
            if !specifics.iter().any(|specific| contains_term(&name, specific)) {
                continue;
            }
            let hits: Vec<Range<usize>> = find_occurrences(text, generic)
                .into_iter()
                .filter(|hit| is_whole_word(text, hit))
                .collect();
            terms.extend(slices(text, &hits));
        }
        if !terms.is_empty() {
            trace!("'{}' matched by synonyms {:?}", name, terms);
        }
        return terms;
    }

    Vec::new()
}

fn is_significant_word(word: &str, config: &AnnotatorConfig) -> bool {
    if word.chars().count() <= config.min_word_length {
        return false;
    }
    if config.exclude_generic_words {
        let is_generic = |w: &str| GENERIC_WORDS.contains(&w);
        if is_generic(word) || singular_forms(word).iter().any(|s| is_generic(s.as_str())) {
            return false;
        }
    }
    true
}

/// Append terms not already present (case-insensitive), keeping first-seen order
fn merge_terms(existing: &mut Vec<String>, new_terms: Vec<String>) {
    for term in new_terms {
        if !existing.iter().any(|t| t.to_lowercase() == term.to_lowercase()) {
            existing.push(term);
        }
    }
}

fn slices(text: &str, hits: &[Range<usize>]) -> Vec<String> {
    hits.iter().map(|hit| text[hit.clone()].to_string()).collect()
}

/// Every case-insensitive occurrence of `term` in `text`, as byte ranges into `text`
pub(crate) fn find_occurrences(text: &str, term: &str) -> Vec<Range<usize>> {
    let term = term.trim();
    if term.is_empty() {
        return Vec::new();
    }
    match RegexBuilder::new(&regex::escape(term)).case_insensitive(true).build() {
        Ok(pattern) => pattern.find_iter(text).map(|m| m.range()).collect(),
        Err(err) => {
            debug!("Could not search for '{}': {}", term, err);
            Vec::new()
        }
    }
}

/// Whether the characters around `range` are not letters
pub(crate) fn is_whole_word(text: &str, range: &Range<usize>) -> bool {
    let before = text[..range.start].chars().next_back();
    let after = text[range.end..].chars().next();
    !before.is_some_and(char::is_alphabetic) && !after.is_some_and(char::is_alphabetic)
}

/// Whether `haystack` contains `term` (or a plural of it) as a whole word
fn contains_term(haystack: &str, term: &str) -> bool {
    std::iter::once(term.to_string())
        .chain(plural_forms(term))
        .any(|form| {
            find_occurrences(haystack, &form)
                .iter()
                .any(|hit| is_whole_word(haystack, hit))
        })
}

/// Likely singular spellings of an English plural ("berries" -> "berry")
pub(crate) fn singular_forms(word: &str) -> Vec<String> {
    let mut forms = Vec::new();
    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            forms.push(format!("{stem}y"));
        }
    } else if !word.ends_with("ss") {
        // "glass" and "swiss" are not plurals
        if let Some(stem) = word.strip_suffix("es") {
            forms.push(format!("{stem}e"));
            forms.push(stem.to_string());
        } else if let Some(stem) = word.strip_suffix('s') {
            forms.push(stem.to_string());
        }
    }
    forms.retain(|form| !form.is_empty());
    forms
}

/// Likely plural spellings of an English singular ("tomato" -> "tomatoes")
pub(crate) fn plural_forms(word: &str) -> Vec<String> {
    let mut forms = Vec::new();
    let last = word.chars().last();
    let before_last = word.chars().rev().nth(1);

    if last == Some('y') && !before_last.is_some_and(|c| "aeiou".contains(c)) {
        forms.push(format!("{}ies", &word[..word.len() - 1]));
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|end| word.ends_with(end)) {
        forms.push(format!("{word}es"));
    } else if last == Some('o') {
        forms.push(format!("{word}es"));
        forms.push(format!("{word}s"));
    } else if last.is_some() {
        forms.push(format!("{word}s"));
    }
    forms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<IngredientInfo> {
        names.iter().map(|name| IngredientInfo::named(name)).collect()
    }

    #[test]
    fn test_empty_inputs() {
        assert!(find_ingredients_in_text("", &names(&["salt"])).is_empty());
        assert!(find_ingredients_in_text("Add salt", &[]).is_empty());
        assert!(find_ingredients_in_text("Add salt", &names(&["  "])).is_empty());
    }

    #[test]
    fn test_exact_match_collects_every_occurrence() {
        let found = find_ingredients_in_text("Salt the water, then salt again", &names(&["salt"]));
        assert_eq!(found.len(), 1);
        // "Salt" and "salt" merge case-insensitively
        assert_eq!(found[0].matched_terms, vec!["Salt".to_string()]);
    }

    #[test]
    fn test_singular_of_plural_name() {
        let found = find_ingredients_in_text("Dice the tomato finely", &names(&["tomatoes"]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched_terms, vec!["tomato".to_string()]);

        let found = find_ingredients_in_text("Rinse the berry", &names(&["berries"]));
        assert_eq!(found[0].matched_terms, vec!["berry".to_string()]);
    }

    #[test]
    fn test_word_fallback_matches_all_significant_words() {
        let found = find_ingredients_in_text(
            "Slice the onions and the red peppers",
            &names(&["green onions", "red bell peppers"]),
        );
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].matched_terms, vec!["onions".to_string()]);
        assert_eq!(found[1].matched_terms, vec!["peppers".to_string()]);
    }

    #[test]
    fn test_word_fallback_uses_singular() {
        let found = find_ingredients_in_text("Add one onion", &names(&["green onions"]));
        assert_eq!(found[0].matched_terms, vec!["onion".to_string()]);
    }

    #[test]
    fn test_generic_words_are_excluded_by_default() {
        let text = "Stir in the sugar";
        assert!(find_ingredients_in_text(text, &names(&["brown sugar"])).is_empty());

        let config = AnnotatorConfig {
            exclude_generic_words: false,
            ..Default::default()
        };
        let found = find_ingredients_with_config(text, &names(&["brown sugar"]), &config);
        assert_eq!(found[0].matched_terms, vec!["sugar".to_string()]);
    }

    #[test]
    fn test_synonym_match_preserves_case() {
        let found = find_ingredients_in_text("Season the Fish well", &names(&["salmon fillets"]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched_terms, vec!["Fish".to_string()]);
    }

    #[test]
    fn test_synonym_requires_whole_word_in_text() {
        assert!(find_ingredients_in_text("Add the meatballs", &names(&["pork belly"])).is_empty());
    }

    #[test]
    fn test_synonyms_can_be_disabled() {
        let config = AnnotatorConfig {
            match_synonyms: false,
            ..Default::default()
        };
        let found = find_ingredients_with_config("Add the meat", &names(&["pork belly"]), &config);
        assert!(found.is_empty());
    }

    #[test]
    fn test_duplicate_names_are_merged() {
        let ingredients = vec![
            IngredientInfo {
                group: Some("Main".to_string()),
                ..IngredientInfo::named("butter")
            },
            IngredientInfo {
                group: Some("Frosting".to_string()),
                ..IngredientInfo::named("Butter")
            },
        ];
        let found = find_ingredients_in_text("Cream the butter", &ingredients);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].ingredient.group.as_deref(), Some("Main"));
    }

    #[test]
    fn test_word_forms() {
        assert_eq!(singular_forms("berries"), vec!["berry".to_string()]);
        assert_eq!(singular_forms("tomatoes"), vec!["tomatoe".to_string(), "tomato".to_string()]);
        assert_eq!(singular_forms("onions"), vec!["onion".to_string()]);
        assert!(singular_forms("glass").is_empty());
        assert_eq!(plural_forms("cherry"), vec!["cherries".to_string()]);
        assert_eq!(plural_forms("peach"), vec!["peaches".to_string()]);
        assert_eq!(plural_forms("onion"), vec!["onions".to_string()]);
    }

    #[test]
    fn test_whole_word_check() {
        let text = "salted salt";
        assert!(!is_whole_word(text, &(0..4)));
        assert!(is_whole_word(text, &(7..11)));
    }
}
