//! Heading classification strategies.
//!
//! Given a paragraph and the structural model, decide whether it is a
//! top-level heading, a subheading, or body text. Three strategies exist,
//! selected per document family:
//!
//! - **fixed-set**: headings are membership in a closed, configured list;
//!   subheadings are accent-colored, enumerated paragraphs outside tables;
//! - **style-hierarchy**: up to three paragraph-style-name sets, with a
//!   hierarchy snapshot recorded per heading to disambiguate duplicate
//!   heading text under different parents;
//! - **two-level-style**: the same mechanism restricted to two levels,
//!   without snapshot disambiguation.
//!
//! Classifiers are configured once against a built [`StructuralModel`]
//! (precomputing heading spans or text tables) and are read-only afterward;
//! the running hierarchy state lives with the assembler and is passed in
//! per call.

use std::collections::HashSet;

use regex::Regex;

use crate::config::HeadingRules;
use crate::error::DocsegError;
use crate::layout::StyledParagraph;
use crate::models::CleanedParagraph;
use crate::parser::StructuralModel;

/// Outcome of classifying one paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Plain body content.
    Body,
    /// A heading at the given level (1-based).
    Heading(u8),
    /// A subheading below the top level (fixed-set strategy only).
    Subheading,
}

impl Classification {
    pub fn is_heading_like(&self) -> bool {
        !matches!(self, Classification::Body)
    }
}

/// Lowercase and strip every non-alphanumeric character. Heading text is
/// compared in this normalized form so punctuation and spacing differences
/// between the style source and the layout text never matter.
pub fn normalize_heading(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase()
}

/// The ordered list of currently-open ancestor heading texts.
///
/// Kept in two parallel forms: the display text that goes into chunk tags,
/// and the normalized text used for snapshot comparison.
#[derive(Debug, Clone, Default)]
pub struct HeadingHierarchy {
    display: Vec<String>,
    normalized: Vec<String>,
}

impl HeadingHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.display.len()
    }

    pub fn display(&self) -> &[String] {
        &self.display
    }

    pub fn normalized(&self) -> &[String] {
        &self.normalized
    }

    /// Open a heading at `level`, truncating everything at or below it.
    /// A level deeper than `depth() + 1` is ignored — ancestors must be
    /// opened first.
    pub fn open(&mut self, level: u8, display: &str, normalized: &str) {
        let parent_depth = (level - 1) as usize;
        if parent_depth > self.display.len() {
            return;
        }
        self.display.truncate(parent_depth);
        self.normalized.truncate(parent_depth);
        self.display.push(display.to_string());
        self.normalized.push(normalized.to_string());
    }
}

/// One heading registered by a style-name strategy.
#[derive(Debug, Clone)]
struct KnownHeading {
    level: u8,
    /// Hierarchy in effect when this heading was registered, normalized.
    snapshot: Vec<String>,
    /// Prefix matcher against normalized paragraph text.
    prefix: Regex,
}

/// Fixed heading list plus precomputed accent-colored subheading spans.
#[derive(Debug)]
pub struct FixedSetClassifier {
    section_headers: Vec<String>,
    subheading_starts: HashSet<usize>,
}

impl FixedSetClassifier {
    /// Precompute the subheading span set: paragraphs tinted within the
    /// color threshold, matching the enumerated-item pattern, with enough
    /// words, and outside every table span. All four predicates are ANDed.
    pub fn from_model(
        model: &StructuralModel,
        section_headers: &[String],
        subheader_color: &str,
        color_threshold: f64,
        min_subheading_words: usize,
        subheading_pattern: &str,
    ) -> Result<Self, DocsegError> {
        let pattern = Regex::new(subheading_pattern)?;
        let color_spans = model.color_spans(subheader_color, color_threshold);
        let table_spans = model.table_spans();
        let subheading_starts = model
            .matching_paragraphs(
                &[color_spans],
                min_subheading_words,
                Some(&pattern),
                &table_spans,
            )
            .iter()
            .map(|p| p.span.offset)
            .collect();
        Ok(Self {
            section_headers: section_headers.to_vec(),
            subheading_starts,
        })
    }

    fn classify(&self, paragraph: &CleanedParagraph) -> Classification {
        if self.section_headers.iter().any(|h| *h == paragraph.content) {
            Classification::Heading(1)
        } else if self.subheading_starts.contains(&paragraph.span.offset) {
            Classification::Subheading
        } else {
            Classification::Body
        }
    }
}

/// Style-name strategy with hierarchy-snapshot disambiguation.
#[derive(Debug)]
pub struct StyleHierarchyClassifier {
    headings: Vec<KnownHeading>,
}

impl StyleHierarchyClassifier {
    /// Register headings from the styled-paragraph stream. A paragraph
    /// whose style name belongs to a level set and whose text stays under
    /// the word ceiling is recorded with the hierarchy snapshot current at
    /// that point; the snapshot later disambiguates duplicate heading text
    /// occurring under different parents.
    pub fn from_styled_paragraphs(
        paragraphs: &[StyledParagraph],
        level_styles: &[&[String]],
        max_heading_words: Option<usize>,
        loose_prefix: bool,
    ) -> Result<Self, DocsegError> {
        let mut headings = Vec::new();
        let mut hierarchy: Vec<String> = Vec::new();

        for paragraph in paragraphs {
            let text = paragraph.text.trim().to_lowercase();
            let Some(level) = level_of(&paragraph.style_name, level_styles) else {
                continue;
            };
            if let Some(ceiling) = max_heading_words {
                if text.split_whitespace().count() >= ceiling {
                    continue;
                }
            }
            let normalized = normalize_heading(&text);
            if normalized.is_empty() {
                continue;
            }
            // A deeper level without its ancestors open is not a heading.
            if (level - 1) as usize > hierarchy.len() {
                continue;
            }
            headings.push(KnownHeading {
                level,
                snapshot: hierarchy.clone(),
                prefix: prefix_regex(&normalized, loose_prefix)?,
            });
            hierarchy.truncate((level - 1) as usize);
            hierarchy.push(normalized);
        }

        Ok(Self { headings })
    }

    /// Find the heading this paragraph opens, if any.
    ///
    /// Candidates are prefix matches of the normalized paragraph text;
    /// among them the one whose snapshot equals the current hierarchy
    /// context wins (any candidate qualifies while the context is still
    /// empty), ties resolved by registration order.
    fn classify(
        &self,
        paragraph: &CleanedParagraph,
        hierarchy: &HeadingHierarchy,
        disambiguate: bool,
    ) -> Classification {
        let normalized = normalize_heading(&paragraph.content);
        if normalized.is_empty() {
            return Classification::Body;
        }
        let candidate = self
            .headings
            .iter()
            .filter(|h| h.prefix.is_match(&normalized))
            .find(|h| {
                !disambiguate
                    || hierarchy.normalized().is_empty()
                    || h.snapshot == hierarchy.normalized()
            });
        match candidate {
            // A deeper heading without its ancestors open falls through
            // as body content.
            Some(h) if (h.level - 1) as usize <= hierarchy.depth() => {
                Classification::Heading(h.level)
            }
            _ => Classification::Body,
        }
    }
}

fn level_of(style_name: &str, level_styles: &[&[String]]) -> Option<u8> {
    level_styles
        .iter()
        .position(|set| set.iter().any(|s| s == style_name))
        .map(|i| (i + 1) as u8)
}

fn prefix_regex(normalized: &str, loose: bool) -> Result<Regex, DocsegError> {
    let escaped = regex::escape(normalized);
    let pattern = if loose {
        // Allow an optional leading enumerator ("3 introduction" still
        // matches the heading "introduction").
        format!(r"^(?:\d+|[a-zA-Z])?\s*{escaped}")
    } else {
        format!("^{escaped}")
    };
    Ok(Regex::new(&pattern)?)
}

/// The closed set of strategies, selected by family configuration.
#[derive(Debug)]
pub enum HeadingClassifier {
    /// Size-triggered families: everything is body text.
    Disabled,
    FixedSet(FixedSetClassifier),
    /// Three-level style names with snapshot disambiguation.
    StyleHierarchy(StyleHierarchyClassifier),
    /// Two-level style names, first candidate wins.
    TwoLevelStyle(StyleHierarchyClassifier),
}

impl HeadingClassifier {
    /// Configure the strategy a family's rules name, precomputing against
    /// the structural model (and the styled-paragraph stream for
    /// style-name strategies).
    pub fn build(
        rules: &HeadingRules,
        model: &StructuralModel,
        styled: &[StyledParagraph],
    ) -> Result<Self, DocsegError> {
        match rules {
            HeadingRules::None => Ok(Self::Disabled),
            HeadingRules::FixedSet {
                section_headers,
                subheader_color,
                color_threshold,
                min_subheading_words,
                subheading_pattern,
            } => Ok(Self::FixedSet(FixedSetClassifier::from_model(
                model,
                section_headers,
                subheader_color,
                *color_threshold,
                *min_subheading_words,
                subheading_pattern,
            )?)),
            HeadingRules::StyleHierarchy {
                level1_styles,
                level2_styles,
                level3_styles,
                max_heading_words,
            } => Ok(Self::StyleHierarchy(
                StyleHierarchyClassifier::from_styled_paragraphs(
                    styled,
                    &[level1_styles, level2_styles, level3_styles],
                    Some(*max_heading_words),
                    false,
                )?,
            )),
            HeadingRules::TwoLevelStyle {
                level1_styles,
                level2_styles,
            } => Ok(Self::TwoLevelStyle(
                StyleHierarchyClassifier::from_styled_paragraphs(
                    styled,
                    &[level1_styles, level2_styles],
                    None,
                    true,
                )?,
            )),
        }
    }

    /// Classify one paragraph against the current hierarchy context.
    pub fn classify(
        &self,
        paragraph: &CleanedParagraph,
        hierarchy: &HeadingHierarchy,
    ) -> Classification {
        match self {
            Self::Disabled => Classification::Body,
            Self::FixedSet(c) => c.classify(paragraph),
            Self::StyleHierarchy(c) => c.classify(paragraph, hierarchy, true),
            Self::TwoLevelStyle(c) => c.classify(paragraph, hierarchy, false),
        }
    }
}
