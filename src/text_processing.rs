//! # Text Processing Module
//!
//! This module annotates instruction text for display: it finds quantities, time
//! durations and ingredient mentions, resolves overlaps between them and slices the
//! text into plain and highlighted segments.
//!
//! ## Features
//!
//! - ASCII fractions are normalized to Unicode first ("1/2" -> "½"), so every pattern
//!   only deals with one notation
//! - Quantity detection for numbers, fractions and ranges followed by a cooking unit
//! - Time detection for the same grammar followed by a time unit
//! - A leading "about " is consumed but kept out of the highlighted span
//! - Ingredient mentions located on word boundaries, including plurals and synonyms
//! - Overlaps resolved by priority (time > quantity > ingredient), then by length
//!
//! Concatenating the returned segments always reproduces the normalized text.

use crate::amount_parser::normalize_fractions;
use crate::ingredient_matcher::{
    find_ingredients_with_config, find_occurrences, is_whole_word, plural_forms, singular_forms,
};
use crate::ingredient_model::{flatten_ingredients, IngredientGroup, IngredientInfo, InstructionStep};
use crate::measurement_patterns::{
    build_amount_pattern, cooking_unit_alternation, unit_alternation, QUANTITY_REGEX, TIME_REGEX,
};
use crate::measurement_types::{
    AnnotatedText, AnnotatorConfig, MatchKind, PriorityTable, Segment, TextMatch,
};
use log::{debug, info, trace};
use regex::Regex;
use serde::Serialize;

/// Annotator for instruction text
pub struct TextAnnotator {
    /// Number/range grammar followed by a cooking unit
    quantity_pattern: Regex,
    /// Number/range grammar followed by a time unit
    time_pattern: Regex,
    /// Configuration options
    config: AnnotatorConfig,
}

/// An instruction step together with its annotated detail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedStep {
    pub step: InstructionStep,
    pub annotated: AnnotatedText,
}

impl TextAnnotator {
    /// Create an annotator with the built-in unit tables and default configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_text::text_processing::TextAnnotator;
    ///
    /// let annotator = TextAnnotator::new();
    /// let annotated = annotator.annotate("Whisk 2 cups milk", &[]);
    /// assert_eq!(annotated.highlights().count(), 1);
    /// ```
    pub fn new() -> Self {
        Self {
            quantity_pattern: QUANTITY_REGEX.clone(),
            time_pattern: TIME_REGEX.clone(),
            config: AnnotatorConfig::default(),
        }
    }

    /// Create an annotator with custom configuration
    ///
    /// Extra unit spellings are appended to the built-in cooking units, which
    /// requires compiling a new quantity pattern.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_text::measurement_types::AnnotatorConfig;
    /// use recipe_text::text_processing::TextAnnotator;
    ///
    /// let config = AnnotatorConfig {
    ///     extra_units: vec!["knobs".to_string(), "knob".to_string()],
    ///     ..Default::default()
    /// };
    /// let annotator = TextAnnotator::with_config(config)?;
    /// assert_eq!(annotator.find_quantities("Add 2 knobs of butter")[0].text, "2 knobs");
    /// # Ok::<(), regex::Error>(())
    /// ```
    pub fn with_config(config: AnnotatorConfig) -> Result<Self, regex::Error> {
        let quantity_pattern = if config.extra_units.is_empty() {
            debug!("Using default quantity pattern");
            QUANTITY_REGEX.clone()
        } else {
            debug!("Extending quantity pattern with units: {:?}", config.extra_units);
            let extra = unit_alternation(config.extra_units.iter().map(String::as_str));
            let units = format!("{}|{}", extra, cooking_unit_alternation());
            Regex::new(&build_amount_pattern(&units))?
        };

        info!(
            "Creating TextAnnotator with custom config: min_word_length={}, generic_words_excluded={}, synonyms={}",
            config.min_word_length, config.exclude_generic_words, config.match_synonyms
        );

        Ok(Self {
            quantity_pattern,
            time_pattern: TIME_REGEX.clone(),
            config,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Find quantity spans ("2 cups", "1½-2 tbsp") in already-normalized text
    pub fn find_quantities(&self, text: &str) -> Vec<TextMatch> {
        find_amount_spans(&self.quantity_pattern, text, MatchKind::Quantity)
    }

    /// Find time spans ("5 to 7 minutes") in already-normalized text
    pub fn find_times(&self, text: &str) -> Vec<TextMatch> {
        find_amount_spans(&self.time_pattern, text, MatchKind::Time)
    }

    /// Locate every mention of the given ingredients on word boundaries.
    ///
    /// Candidates are the ingredient name, the terms the matcher credited to it,
    /// and their singular and plural forms.
    pub fn find_ingredient_spans(&self, text: &str, ingredients: &[IngredientInfo]) -> Vec<TextMatch> {
        let mut spans = Vec::new();

        for found in find_ingredients_with_config(text, ingredients, &self.config) {
            let mut candidates: Vec<String> = Vec::new();
            let bases = std::iter::once(found.ingredient.name.trim().to_lowercase())
                .chain(found.matched_terms.iter().map(|term| term.to_lowercase()));
            for base in bases {
                let forms = singular_forms(&base).into_iter().chain(plural_forms(&base));
                for form in std::iter::once(base.clone()).chain(forms) {
                    if form.chars().count() >= 3 && !candidates.contains(&form) {
                        candidates.push(form);
                    }
                }
            }

            for candidate in &candidates {
                for range in find_occurrences(text, candidate) {
                    if !is_whole_word(text, &range) {
                        continue;
                    }
                    trace!("Ingredient '{}' located at {:?}", found.ingredient.name, range);
                    spans.push(TextMatch {
                        start: range.start,
                        end: range.end,
                        text: text[range.clone()].to_string(),
                        kind: MatchKind::Ingredient,
                        ingredient: Some(found.ingredient.clone()),
                    });
                }
            }
        }

        spans
    }

    /// Annotate a block of text against an ingredient list
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_text::text_processing::TextAnnotator;
    ///
    /// let annotated = TextAnnotator::new().annotate("Simmer for about 5 to 7 minutes", &[]);
    /// let spans: Vec<_> = annotated.highlights().collect();
    /// assert_eq!(spans.len(), 1);
    /// assert_eq!(spans[0].text, "5 to 7 minutes");
    /// assert_eq!(annotated.joined_text(), "Simmer for about 5 to 7 minutes");
    /// ```
    pub fn annotate(&self, text: &str, ingredients: &[IngredientInfo]) -> AnnotatedText {
        let normalized = normalize_fractions(text);

        let mut candidates = self.find_times(&normalized);
        candidates.extend(self.find_quantities(&normalized));
        candidates.extend(self.find_ingredient_spans(&normalized, ingredients));
        let total = candidates.len();

        let resolved = resolve_overlaps(candidates, &self.config.priorities);
        debug!("Kept {} of {} candidate spans", resolved.len(), total);

        let segments = build_segments(&normalized, resolved);
        AnnotatedText { normalized, segments }
    }

    /// Annotate the detail of every step against a recipe's ingredient groups
    pub fn annotate_steps(&self, steps: &[InstructionStep], groups: &[IngredientGroup]) -> Vec<AnnotatedStep> {
        let ingredients = flatten_ingredients(groups);
        steps
            .iter()
            .map(|step| AnnotatedStep {
                step: step.clone(),
                annotated: self.annotate(&step.detail, &ingredients),
            })
            .collect()
    }
}

impl Default for TextAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

/// Annotate text with the default annotator.
///
/// See [`TextAnnotator::annotate`].
pub fn highlight_quantities_and_ingredients(text: &str, ingredients: &[IngredientInfo]) -> AnnotatedText {
    TextAnnotator::new().annotate(text, ingredients)
}

/// Run an amount pattern and turn its `body` captures into spans.
///
/// A match directly preceded by a letter or digit ("x2 cups") is ignored.
fn find_amount_spans(pattern: &Regex, text: &str, kind: MatchKind) -> Vec<TextMatch> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let body = caps.name("body")?;
            if text[..whole.start()].chars().next_back().is_some_and(char::is_alphanumeric) {
                trace!("Ignoring {} '{}' glued to a preceding word", kind.as_str(), body.as_str());
                return None;
            }
            Some(TextMatch {
                start: body.start(),
                end: body.end(),
                text: body.as_str().to_string(),
                kind,
                ingredient: None,
            })
        })
        .collect()
}

/// Pick a non-overlapping subset of spans.
///
/// Greedy selection in order of priority, then length, then position: each span is
/// kept unless it overlaps one already kept. Losers are dropped whole. The result
/// is sorted by start.
pub fn resolve_overlaps(mut matches: Vec<TextMatch>, priorities: &PriorityTable) -> Vec<TextMatch> {
    matches.sort_by(|a, b| {
        priorities
            .priority(b.kind)
            .cmp(&priorities.priority(a.kind))
            .then(b.len().cmp(&a.len()))
            .then(a.start.cmp(&b.start))
    });

    let mut kept: Vec<TextMatch> = Vec::with_capacity(matches.len());
    for candidate in matches {
        if candidate.is_empty() || kept.iter().any(|existing| existing.overlaps(&candidate)) {
            continue;
        }
        kept.push(candidate);
    }

    kept.sort_by_key(|span| span.start);
    kept
}

/// Slice `text` into plain and highlighted segments around sorted, non-overlapping spans
pub fn build_segments(text: &str, spans: Vec<TextMatch>) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;

    for span in spans {
        if span.start > cursor {
            segments.push(Segment::Plain {
                text: text[cursor..span.start].to_string(),
            });
        }
        cursor = span.end;
        segments.push(Segment::Highlight(span));
    }
    if cursor < text.len() {
        segments.push(Segment::Plain {
            text: text[cursor..].to_string(),
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_annotator() -> TextAnnotator {
        TextAnnotator::new()
    }

    fn highlighted(annotated: &AnnotatedText) -> Vec<(MatchKind, String)> {
        annotated
            .highlights()
            .map(|span| (span.kind, span.text.clone()))
            .collect()
    }

    fn span(start: usize, end: usize, kind: MatchKind) -> TextMatch {
        TextMatch {
            start,
            end,
            text: String::new(),
            kind,
            ingredient: None,
        }
    }

    #[test]
    fn test_with_config_keeps_settings_and_extra_units() {
        let config = AnnotatorConfig {
            min_word_length: 5,
            match_synonyms: false,
            extra_units: vec!["knobs".to_string(), "knob".to_string()],
            ..Default::default()
        };
        let annotator = TextAnnotator::with_config(config.clone()).unwrap();
        assert_eq!(annotator.config(), &config);
        assert_eq!(annotator.find_quantities("Add 1 knob butter and 2 cups milk").len(), 2);
        assert_eq!(TextAnnotator::new().config(), &AnnotatorConfig::default());
    }

    #[test]
    fn test_find_quantities_with_positions() {
        let annotator = create_annotator();
        let matches = annotator.find_quantities("Mix 2 cups flour with 1 tbsp sugar");

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].text, "2 cups");
        assert_eq!(matches[0].start, 4);
        assert_eq!(matches[0].end, 10);
        assert_eq!(matches[1].text, "1 tbsp");
    }

    #[test]
    fn test_find_quantity_forms() {
        let annotator = create_annotator();
        let cases = [
            ("Add 1½ cups stock", "1½ cups"),
            ("Add 1 ½ cups stock", "1 ½ cups"),
            ("Use 2-3 cloves garlic", "2-3 cloves"),
            ("Use 2–3 cloves garlic", "2–3 cloves"),
            ("Add 2 to 3 tbsp oil", "2 to 3 tbsp"),
            ("Weigh 500g flour", "500g"),
            ("Add ¼ tsp salt", "¼ tsp"),
            ("Pour 1.5 l water", "1.5 l"),
            ("Add 2 pinches of salt", "2 pinches"),
        ];
        for (text, expected) in cases {
            let matches = annotator.find_quantities(text);
            assert_eq!(matches.len(), 1, "expected one quantity in '{text}'");
            assert_eq!(matches[0].text, expected, "wrong span in '{text}'");
        }
    }

    #[test]
    fn test_quantity_requires_unit() {
        let annotator = create_annotator();
        assert!(annotator.find_quantities("Crack 3 eggs").is_empty());
        assert!(annotator.find_quantities("Fill the cupboard").is_empty());
        assert!(annotator.find_quantities("Use the x2 cups").is_empty());
    }

    #[test]
    fn test_about_is_excluded_from_span() {
        let annotator = create_annotator();
        let text = "Bake for about 20 minutes";
        let matches = annotator.find_times(text);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "20 minutes");
        assert_eq!(&text[matches[0].start..matches[0].end], "20 minutes");
    }

    #[test]
    fn test_time_units() {
        let annotator = create_annotator();
        for (text, expected) in [
            ("Rest 1 hour", "1 hour"),
            ("Rest 2 hrs", "2 hrs"),
            ("Blend 30 seconds", "30 seconds"),
            ("Cook 10-12 mins", "10-12 mins"),
            ("Chill 1½ h", "1½ h"),
        ] {
            let matches = annotator.find_times(text);
            assert_eq!(matches.len(), 1, "expected a time in '{text}'");
            assert_eq!(matches[0].text, expected);
        }
    }

    #[test]
    fn test_annotate_normalizes_fractions() {
        let annotated = create_annotator().annotate("Add 1/2 cup milk", &[]);
        assert_eq!(annotated.normalized, "Add ½ cup milk");
        assert_eq!(highlighted(&annotated), vec![(MatchKind::Quantity, "½ cup".to_string())]);
        assert_eq!(annotated.joined_text(), annotated.normalized);
    }

    #[test]
    fn test_annotate_without_matches_is_one_plain_segment() {
        let annotated = create_annotator().annotate("Stir well", &[]);
        assert_eq!(
            annotated.segments,
            vec![Segment::Plain {
                text: "Stir well".to_string()
            }]
        );
    }

    #[test]
    fn test_annotate_empty_text() {
        let annotated = create_annotator().annotate("", &[IngredientInfo::named("salt")]);
        assert!(annotated.segments.is_empty());
    }

    #[test]
    fn test_ingredient_spans_respect_word_boundaries() {
        let annotator = create_annotator();
        let spans = annotator.find_ingredient_spans(
            "Add the salted butter and a pinch of salt",
            &[IngredientInfo::named("salt")],
        );
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "salt");
        assert_eq!(spans[0].start, 37);
    }

    #[test]
    fn test_ingredient_spans_include_plurals() {
        let spans = create_annotator()
            .find_ingredient_spans("Chop the onions", &[IngredientInfo::named("onion")]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "onions");
    }

    #[test]
    fn test_ingredient_span_carries_info() {
        let info = IngredientInfo {
            name: "butter".to_string(),
            amount: Some("2".to_string()),
            units: "tbsp".to_string(),
            group: Some("Main".to_string()),
        };
        let annotated = create_annotator().annotate("Melt the butter", &[info.clone()]);
        let spans: Vec<_> = annotated.highlights().collect();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, MatchKind::Ingredient);
        assert_eq!(spans[0].ingredient.as_ref(), Some(&info));
    }

    #[test]
    fn test_quantity_beats_ingredient_on_overlap() {
        let annotated = create_annotator().annotate(
            "Add 3 cloves and stir",
            &[IngredientInfo::named("cloves")],
        );
        assert_eq!(highlighted(&annotated), vec![(MatchKind::Quantity, "3 cloves".to_string())]);
    }

    #[test]
    fn test_mixed_annotation() {
        let annotated = create_annotator().annotate(
            "Add 2 cups stock and the meat, then simmer about 5 to 7 minutes.",
            &[IngredientInfo::named("chicken stock"), IngredientInfo::named("pork belly")],
        );
        assert_eq!(
            highlighted(&annotated),
            vec![
                (MatchKind::Quantity, "2 cups".to_string()),
                (MatchKind::Ingredient, "stock".to_string()),
                (MatchKind::Ingredient, "meat".to_string()),
                (MatchKind::Time, "5 to 7 minutes".to_string()),
            ]
        );
        assert_eq!(annotated.joined_text(), annotated.normalized);
    }

    #[test]
    fn test_resolve_overlaps_priority_then_length() {
        let priorities = PriorityTable::default();
        let resolved = resolve_overlaps(
            vec![
                span(0, 10, MatchKind::Ingredient),
                span(5, 8, MatchKind::Time),
                span(8, 12, MatchKind::Ingredient),
                span(20, 24, MatchKind::Quantity),
                span(20, 30, MatchKind::Quantity),
            ],
            &priorities,
        );
        let kept: Vec<_> = resolved.iter().map(|s| (s.start, s.end, s.kind)).collect();
        assert_eq!(
            kept,
            vec![
                (5, 8, MatchKind::Time),
                (8, 12, MatchKind::Ingredient),
                (20, 30, MatchKind::Quantity),
            ]
        );
    }

    #[test]
    fn test_resolve_overlaps_custom_priorities() {
        let priorities = PriorityTable::new(&[(MatchKind::Ingredient, 9), (MatchKind::Quantity, 1)]);
        let resolved = resolve_overlaps(
            vec![span(0, 8, MatchKind::Quantity), span(2, 8, MatchKind::Ingredient)],
            &priorities,
        );
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].kind, MatchKind::Ingredient);
    }

    #[test]
    fn test_annotate_steps() {
        let groups = vec![IngredientGroup::new("Main")
            .with_ingredient(crate::ingredient_model::Ingredient::new("1", "cup", "rice"))];
        let steps = vec![InstructionStep::new("Step 1", "Rinse the rice for 2 minutes")];
        let annotated = create_annotator().annotate_steps(&steps, &groups);
        assert_eq!(annotated.len(), 1);
        assert_eq!(
            highlighted(&annotated[0].annotated),
            vec![
                (MatchKind::Ingredient, "rice".to_string()),
                (MatchKind::Time, "2 minutes".to_string()),
            ]
        );
    }
}
