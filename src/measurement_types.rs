//! # Measurement Types Module
//!
//! This module defines the core types produced by the text annotator: typed spans
//! over instruction text, the plain/highlighted segments built from them, and the
//! annotator's configuration.

use crate::ingredient_model::IngredientInfo;
use serde::{Deserialize, Serialize};

/// Kind of highlighted span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Quantity,
    Ingredient,
    Time,
}

impl MatchKind {
    /// Lowercase label ("quantity", "ingredient", "time")
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Quantity => "quantity",
            MatchKind::Ingredient => "ingredient",
            MatchKind::Time => "time",
        }
    }
}

/// Overlap priority per match kind; higher wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
    entries: Vec<(MatchKind, u8)>,
}

impl PriorityTable {
    /// Build a table from explicit entries. Kinds not listed get priority 0.
    pub fn new(entries: &[(MatchKind, u8)]) -> Self {
        Self {
            entries: entries.to_vec(),
        }
    }

    /// Priority of a kind
    pub fn priority(&self, kind: MatchKind) -> u8 {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map_or(0, |(_, priority)| *priority)
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self::new(&[
            (MatchKind::Time, 3),
            (MatchKind::Quantity, 2),
            (MatchKind::Ingredient, 1),
        ])
    }
}

/// A typed span over (fraction-normalized) instruction text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMatch {
    /// Byte offset where the span starts
    pub start: usize,
    /// Byte offset one past the end of the span
    pub end: usize,
    /// The spanned text
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MatchKind,
    /// Matched ingredient, for ingredient spans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient: Option<IngredientInfo>,
}

impl TextMatch {
    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is empty
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether two spans share at least one byte
    pub fn overlaps(&self, other: &TextMatch) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A piece of annotated text: plain or highlighted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "segment", rename_all = "lowercase")]
pub enum Segment {
    Plain { text: String },
    Highlight(TextMatch),
}

impl Segment {
    /// Text covered by this segment
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain { text } => text,
            Segment::Highlight(span) => &span.text,
        }
    }
}

/// Result of annotating a block of text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedText {
    /// The text after fraction normalization; segments cover it exactly
    pub normalized: String,
    /// Plain and highlighted segments in order
    pub segments: Vec<Segment>,
}

impl AnnotatedText {
    /// Concatenate every segment's text
    pub fn joined_text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    /// Highlighted spans in order
    pub fn highlights(&self) -> impl Iterator<Item = &TextMatch> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Highlight(span) => Some(span),
            Segment::Plain { .. } => None,
        })
    }
}

/// An ingredient found in text, with the terms that matched it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientMatch {
    pub ingredient: IngredientInfo,
    /// Matched text as written in the source, first occurrence order, no duplicates
    pub matched_terms: Vec<String>,
}

/// Configuration options for the text annotator
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatorConfig {
    /// Overlap priority per match kind
    pub priorities: PriorityTable,
    /// Words of a multi-word name must be longer than this to match alone
    pub min_word_length: usize,
    /// Skip very common words ("salt", "sugar") when matching single words
    pub exclude_generic_words: bool,
    /// Credit generic terms ("meat") to specific ingredients ("pork belly")
    pub match_synonyms: bool,
    /// Extra unit spellings accepted after a number, on top of the built-in table
    pub extra_units: Vec<String>,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            priorities: PriorityTable::default(),
            min_word_length: 3,
            exclude_generic_words: true,
            match_synonyms: true,
            extra_units: Vec::new(),
        }
    }
}
