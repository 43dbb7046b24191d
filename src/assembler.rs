//! Streaming chunk assembly.
//!
//! The assembler walks the cleaned paragraph stream in document reading
//! order, folds tables in atomically via span containment, consults the
//! heading classifier, and emits finalized chunks into a
//! [`DocumentFlow`] according to the family's boundary policy.
//!
//! All running state — the open chunk, heading flags, the hierarchy stack,
//! the processed-table set — lives in one explicit [`AssemblerState`]
//! threaded through the per-paragraph step, scoped to a single run. Nothing
//! here is safe to share across documents.

use std::collections::HashSet;

use log::debug;

use crate::config::{BoundaryPolicy, FamilyConfig};
use crate::error::DocsegError;
use crate::flow::DocumentFlow;
use crate::heading::{normalize_heading, Classification, HeadingClassifier, HeadingHierarchy};
use crate::layout::{LayoutResult, StyledParagraph};
use crate::models::{CleanedParagraph, DocumentChunk};
use crate::parser::StructuralModel;

/// Mutable state of one assembly run.
#[derive(Debug, Default)]
pub struct AssemblerState {
    current: DocumentChunk,
    /// At least one heading/subheading has been classified in this run.
    saw_heading_ever: bool,
    /// The immediately preceding classified element was heading-like.
    last_was_heading: bool,
    /// A subheading has appeared; disables the size fallback.
    saw_subheading: bool,
    /// Running top-level heading label for chunk prefixes.
    current_heading: String,
    hierarchy: HeadingHierarchy,
    /// Indices of tables already folded into some chunk.
    processed_tables: HashSet<usize>,
}

/// Walks one document's paragraph stream and emits chunks.
pub struct Assembler<'a> {
    model: &'a StructuralModel,
    classifier: &'a HeadingClassifier,
    config: &'a FamilyConfig,
}

impl<'a> Assembler<'a> {
    pub fn new(
        model: &'a StructuralModel,
        classifier: &'a HeadingClassifier,
        config: &'a FamilyConfig,
    ) -> Self {
        Self {
            model,
            classifier,
            config,
        }
    }

    /// Process every paragraph in order, then flush whatever remains.
    pub fn run(&self, flow: &mut DocumentFlow) {
        let mut state = AssemblerState::default();
        for paragraph in self.model.paragraphs() {
            self.step(&mut state, paragraph, flow);
        }
        self.flush(&mut state, flow);
    }

    fn step(&self, state: &mut AssemblerState, paragraph: &CleanedParagraph, flow: &mut DocumentFlow) {
        if paragraph.role.is_some_and(|r| r.is_skipped()) {
            return;
        }
        if self
            .config
            .boilerplate_exclusions
            .iter()
            .any(|b| paragraph.content.contains(b))
        {
            return;
        }

        let in_preamble = self.config.skip_preamble && !state.saw_heading_ever;

        // Tables are folded in atomically: the first paragraph falling
        // inside an unconsumed table span pulls the whole flattened table
        // into the current chunk; later paragraphs inside the same span
        // contribute nothing.
        if let Some((table_idx, table)) = self.model.table_at(paragraph.span.offset) {
            if in_preamble {
                return;
            }
            if state.processed_tables.insert(table_idx) {
                state.current.push_table(table.clone());
            }
            return;
        }

        match self.config.policy {
            BoundaryPolicy::SizeTriggered => {
                let incoming = paragraph.content.split_whitespace().count();
                if !state.current.is_empty()
                    && state.current.word_count() + incoming > self.config.max_chunk_words
                {
                    self.flush(state, flow);
                }
                state.current.push_paragraph(paragraph.clone());
            }
            BoundaryPolicy::HeadingTriggered => {
                let class = self.classifier.classify(paragraph, &state.hierarchy);
                let is_header = matches!(class, Classification::Heading(_));
                let is_subheader = class == Classification::Subheading;

                // Consecutive heading-like paragraphs coalesce into one
                // boundary, and the very first heading opens the first
                // chunk rather than splitting.
                let mut start_new = false;
                if is_header || is_subheader {
                    state.saw_subheading |= is_subheader;
                    if !state.last_was_heading && state.saw_heading_ever {
                        start_new = true;
                    }
                    state.saw_heading_ever = true;
                } else if !state.saw_subheading
                    && state.current.content.chars().count() >= self.config.max_chunk_chars
                {
                    // Size fallback for documents (or prefixes of them)
                    // where no subheading has surfaced yet.
                    start_new = true;
                }

                if start_new {
                    self.flush(state, flow);
                }
                if is_header {
                    // Heading text never enters chunk content; it becomes
                    // the running label for subsequent chunk prefixes.
                    state.current_heading = paragraph.content.clone();
                } else {
                    state.current.push_paragraph(paragraph.clone());
                }
                state.last_was_heading = is_header || is_subheader;
            }
            BoundaryPolicy::HeadingPath => {
                match self.classifier.classify(paragraph, &state.hierarchy) {
                    Classification::Heading(level) => {
                        // Every accepted heading closes the prior chunk —
                        // no coalescing under this policy.
                        self.flush(state, flow);
                        state.hierarchy.open(
                            level,
                            &paragraph.content,
                            &normalize_heading(&paragraph.content),
                        );
                        state.saw_heading_ever = true;
                    }
                    _ => {
                        if in_preamble {
                            return;
                        }
                        state.current.push_paragraph(paragraph.clone());
                    }
                }
            }
        }
    }

    /// Finalize the open chunk through the minimum-size gate and start a
    /// fresh one. Decoration depends on the policy: heading-triggered
    /// chunks get a `Section <h>: ` prefix, heading-path chunks get the
    /// full context-tag line.
    fn flush(&self, state: &mut AssemblerState, flow: &mut DocumentFlow) {
        let mut chunk = std::mem::take(&mut state.current);
        if chunk.is_empty() {
            return;
        }

        match self.config.policy {
            BoundaryPolicy::HeadingTriggered => {
                if !state.current_heading.is_empty() {
                    chunk.content = format!("Section {}: {}", state.current_heading, chunk.content);
                }
            }
            BoundaryPolicy::HeadingPath => {
                chunk.content = format!(
                    "Context Heading Tags: {} | Content: {}",
                    state.hierarchy.display().join(","),
                    chunk.content
                );
                let mut prefix = String::new();
                if let Some(h1) = state.hierarchy.display().first() {
                    prefix.push_str(&format!("Section {h1}: "));
                }
                if let Some(h2) = state.hierarchy.display().get(1) {
                    prefix.push_str(&format!("Subsection {h2}: "));
                }
                chunk.content = format!("{prefix}{}", chunk.content);
            }
            BoundaryPolicy::SizeTriggered => {}
        }

        if chunk.paragraphs.is_empty() || chunk.word_count() < self.config.min_chunk_words {
            debug!(
                "dropping undersized chunk ({} words, {} paragraphs)",
                chunk.word_count(),
                chunk.paragraphs.len()
            );
            return;
        }
        flow.add_chunk(chunk);
    }
}

/// Run the whole pipeline for one document: parse identity from the
/// filename, build the structural model, configure the heading classifier,
/// and assemble chunks.
///
/// Filename and page-range validation happen before any paragraph is
/// processed; per-element anomalies later on (a malformed table) are
/// logged and skipped, never fatal.
pub fn segment_document(
    layout: &LayoutResult,
    filename: &str,
    config: &FamilyConfig,
    styled: &[StyledParagraph],
    start_page: Option<u32>,
    end_page: Option<u32>,
) -> Result<DocumentFlow, DocsegError> {
    let mut flow = DocumentFlow::from_filename(filename)?;
    let model = StructuralModel::build(layout, start_page, end_page)?;
    let classifier = HeadingClassifier::build(&config.headings, &model, styled)?;
    Assembler::new(&model, &classifier, config).run(&mut flow);
    Ok(flow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FamilyConfig, HeadingRules};
    use crate::layout::{BoundingRegion, LayoutPage, LayoutTable, StyleRun, TableCell};
    use crate::span::Span;

    const ACCENT: &str = "#990135";

    /// Builds a layout result paragraph by paragraph, maintaining a flat
    /// text offset the way the upstream analyzer does.
    struct DocBuilder {
        layout: LayoutResult,
        offset: usize,
    }

    impl DocBuilder {
        fn new(pages: u32) -> Self {
            Self {
                layout: LayoutResult {
                    pages: (1..=pages).map(|n| LayoutPage { page_number: n }).collect(),
                    ..Default::default()
                },
                offset: 0,
            }
        }

        fn span_for(&mut self, content: &str) -> Span {
            let span = Span::new(self.offset, content.len());
            self.offset += content.len() + 1;
            span
        }

        fn para_on(&mut self, content: &str, page: u32, role: Option<&str>) -> &mut Self {
            let span = self.span_for(content);
            self.layout.paragraphs.push(crate::layout::LayoutParagraph {
                content: content.to_string(),
                role: role.map(str::to_string),
                bounding_regions: vec![BoundingRegion { page_number: page }],
                spans: vec![span],
            });
            self
        }

        fn para(&mut self, content: &str) -> &mut Self {
            self.para_on(content, 1, None)
        }

        /// A paragraph covered by an accent-colored style run, so the
        /// fixed-set classifier sees it as a subheading candidate.
        fn accent_para(&mut self, content: &str) -> &mut Self {
            self.para(content);
            let span = self.layout.paragraphs.last().unwrap().spans[0];
            self.layout.styles.push(StyleRun {
                font_weight: None,
                color: Some(ACCENT.to_string()),
                spans: vec![span],
            });
            self
        }

        /// A one-row table claiming `extra_paragraphs` of the following
        /// paragraphs inside its span.
        fn table_with_inner_paragraphs(&mut self, label: &str, inner: &[&str]) -> &mut Self {
            let start = self.offset;
            for content in inner {
                self.para(content);
            }
            let length = self.offset - start;
            self.layout.tables.push(LayoutTable {
                column_count: 1,
                cells: vec![TableCell {
                    row_index: 0,
                    column_index: 0,
                    column_span: 1,
                    kind: Some("content".to_string()),
                    content: label.to_string(),
                }],
                bounding_regions: vec![BoundingRegion { page_number: 1 }],
                spans: vec![Span::new(start, length)],
            });
            self
        }

        fn build(&mut self) -> LayoutResult {
            std::mem::take(&mut self.layout)
        }
    }

    fn master_config() -> FamilyConfig {
        let mut cfg = FamilyConfig::master_questionnaire();
        // Small fixtures: no minimum gate unless a test sets one.
        cfg.min_chunk_words = 0;
        if let HeadingRules::FixedSet {
            ref mut section_headers,
            ..
        } = cfg.headings
        {
            *section_headers = vec!["8. Fund Terms".to_string(), "9. Governance".to_string()];
        }
        cfg
    }

    fn run(layout: &LayoutResult, cfg: &FamilyConfig) -> DocumentFlow {
        segment_document(layout, "Acme_DDQ_01-02-2023", cfg, &[], None, None).unwrap()
    }

    #[test]
    fn test_footer_and_page_number_skipped() {
        let mut cfg = FamilyConfig::generic();
        cfg.min_chunk_words = 0;
        let layout = DocBuilder::new(1)
            .para("real body content here")
            .para_on("Page 3 of 12", 1, Some("pageNumber"))
            .para_on("Confidential", 1, Some("pageFooter"))
            .build();
        let flow = run(&layout, &cfg);
        assert_eq!(flow.chunks().len(), 1);
        assert!(!flow.chunks()[0].content.contains("Page 3"));
        assert!(!flow.chunks()[0].content.contains("Confidential"));
    }

    #[test]
    fn test_boilerplate_exclusion_discards_content() {
        let mut cfg = FamilyConfig::generic();
        cfg.min_chunk_words = 0;
        cfg.boilerplate_exclusions = vec!["2nd Floor 181 Bay Street".to_string()];
        let layout = DocBuilder::new(1)
            .para("Forum House, 2nd Floor 181 Bay Street Toronto")
            .para("actual answer text")
            .build();
        let flow = run(&layout, &cfg);
        assert_eq!(flow.chunks().len(), 1);
        assert_eq!(flow.chunks()[0].content, "actual answer text");
    }

    #[test]
    fn test_size_triggered_word_ceiling() {
        let mut cfg = FamilyConfig::generic();
        cfg.min_chunk_words = 0;
        cfg.max_chunk_words = 6;
        let layout = DocBuilder::new(1)
            .para("one two three four")
            .para("five six seven")
            .para("eight nine")
            .build();
        let flow = run(&layout, &cfg);
        // 4 + 3 > 6 splits; 3 + 2 <= 6 stays together.
        assert_eq!(flow.chunks().len(), 2);
        assert_eq!(flow.chunks()[0].content, "one two three four");
        assert_eq!(flow.chunks()[1].content, "five six seveneight nine");
    }

    #[test]
    fn test_heading_coalescing_single_boundary() {
        let cfg = master_config();
        let layout = DocBuilder::new(1)
            .para_on("8. Fund Terms", 1, None)
            .accent_para("1. What is the management fee structure")
            .accent_para("2. What is the carried interest arrangement")
            .para("body answer for the second question")
            .para_on("9. Governance", 1, None)
            .build();
        let flow = run(&layout, &cfg);
        // H, S, S coalesce; the boundary lands before the next heading
        // group, so both subheadings share one chunk with the body.
        assert_eq!(flow.chunks().len(), 1);
        let content = &flow.chunks()[0].content;
        assert!(content.starts_with("Section 8. Fund Terms: "));
        assert!(content.contains("management fee structure"));
        assert!(content.contains("carried interest arrangement"));
        assert!(content.contains("body answer"));
        // Heading text itself never enters content.
        assert!(!content.contains("Section 8. Fund Terms: 8. Fund Terms"));
    }

    #[test]
    fn test_heading_boundary_between_sections() {
        let cfg = master_config();
        let layout = DocBuilder::new(1)
            .para_on("8. Fund Terms", 1, None)
            .accent_para("1. What is the management fee structure")
            .para("answer about the fee")
            .accent_para("2. What is the carried interest arrangement")
            .para("answer about the carry")
            .build();
        let flow = run(&layout, &cfg);
        assert_eq!(flow.chunks().len(), 2);
        assert!(flow.chunks()[0].content.contains("fee"));
        assert!(flow.chunks()[1].content.contains("carry"));
        // Both chunks carry the running section prefix.
        for chunk in flow.chunks() {
            assert!(chunk.content.starts_with("Section 8. Fund Terms: "));
        }
    }

    #[test]
    fn test_size_fallback_disabled_after_subheading() {
        let mut cfg = master_config();
        cfg.max_chunk_chars = 30;
        let long = "x".repeat(40);
        let layout = DocBuilder::new(1)
            .para("8. Fund Terms")
            .para(&long)
            .para("after the size split")
            .accent_para("1. Now a subheading appears here")
            .para(&long)
            .para("no further size splits now")
            .build();
        let flow = run(&layout, &cfg);
        // One size-triggered boundary before the subheading, one
        // heading-triggered boundary at it, and none after despite the
        // second long paragraph.
        assert_eq!(flow.chunks().len(), 3);
        assert_eq!(flow.chunks()[1].content, "Section 8. Fund Terms: after the size split");
        assert!(flow.chunks()[2].content.contains("no further size splits"));
    }

    #[test]
    fn test_table_folded_once_and_atomic() {
        let mut cfg = FamilyConfig::generic();
        cfg.min_chunk_words = 0;
        cfg.max_chunk_words = 1000;
        let layout = DocBuilder::new(1)
            .para("before the tables")
            .table_with_inner_paragraphs("fee schedule", &["cell a", "cell b", "cell c"])
            .table_with_inner_paragraphs("redemption terms", &["cell d"])
            .para("after the tables")
            .build();
        let flow = run(&layout, &cfg);
        assert_eq!(flow.chunks().len(), 1);
        let content = &flow.chunks()[0].content;
        assert_eq!(content.matches("fee schedule").count(), 1);
        assert_eq!(content.matches("redemption terms").count(), 1);
        // Raw cell paragraphs never leak in alongside the rendering.
        assert!(!content.contains("cell a"));
        let before = content.find("before").unwrap();
        let first = content.find("fee schedule").unwrap();
        let second = content.find("redemption terms").unwrap();
        let after = content.find("after").unwrap();
        assert!(before < first && first < second && second < after);
    }

    #[test]
    fn test_minimum_size_gate_drops_short_chunks() {
        let mut cfg = FamilyConfig::generic();
        cfg.max_chunk_words = 5;
        cfg.min_chunk_words = 4;
        let layout = DocBuilder::new(1)
            .para("tiny")
            .para("this chunk has plenty of words to pass the gate")
            .build();
        let flow = run(&layout, &cfg);
        for chunk in flow.chunks() {
            assert!(chunk.word_count() >= 4);
        }
        assert!(!flow.chunks().iter().any(|c| c.content == "tiny"));
    }

    #[test]
    fn test_heading_path_tags_and_prefixes() {
        let mut cfg = FamilyConfig::client_response_styled();
        cfg.min_chunk_words = 0;
        cfg.skip_preamble = false;
        let styled = vec![
            StyledParagraph {
                text: "Investment Strategy".to_string(),
                style_name: "Heading 1".to_string(),
            },
            StyledParagraph {
                text: "Risk Limits".to_string(),
                style_name: "Heading 2".to_string(),
            },
        ];
        let layout = DocBuilder::new(1)
            .para("Investment Strategy")
            .para("strategy body text")
            .para("Risk Limits")
            .para("limits body text")
            .build();
        let flow =
            segment_document(&layout, "Acme_DDQ_01-02-2023", &cfg, &styled, None, None).unwrap();
        assert_eq!(flow.chunks().len(), 2);
        assert_eq!(
            flow.chunks()[0].content,
            "Section Investment Strategy: Context Heading Tags: Investment Strategy | Content: strategy body text"
        );
        assert_eq!(
            flow.chunks()[1].content,
            "Section Investment Strategy: Subsection Risk Limits: Context Heading Tags: Investment Strategy,Risk Limits | Content: limits body text"
        );
    }

    #[test]
    fn test_skip_preamble_drops_leading_content() {
        let cfg = {
            let mut c = FamilyConfig::client_response_styled();
            c.min_chunk_words = 0;
            c
        };
        let styled = vec![StyledParagraph {
            text: "Responses".to_string(),
            style_name: "Heading 1".to_string(),
        }];
        let layout = DocBuilder::new(1)
            .para("Dear investor, letterhead preamble text")
            .para("Responses")
            .para("first real answer")
            .build();
        let flow =
            segment_document(&layout, "Acme_DDQ_01-02-2023", &cfg, &styled, None, None).unwrap();
        assert_eq!(flow.chunks().len(), 1);
        assert!(!flow.chunks()[0].content.contains("letterhead"));
        assert!(flow.chunks()[0].content.contains("first real answer"));
    }

    #[test]
    fn test_bad_filename_fatal_before_processing() {
        let layout = DocBuilder::new(1).para("anything").build();
        let cfg = FamilyConfig::generic();
        assert!(matches!(
            segment_document(&layout, "bad_name", &cfg, &[], None, None),
            Err(DocsegError::InvalidFilename(_))
        ));
    }
}
