//! Normalized structural records and chunk accumulators.
//!
//! These are the parser-agnostic types the rest of the engine works with:
//! cleaned paragraphs and tables carrying only content, page, and span;
//! font-attribute groupings for style membership tests; and the mutable
//! [`DocumentChunk`] accumulator that grows until a boundary fires.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::span::Span;

/// Semantic role the layout analyzer assigned to a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphRole {
    Title,
    SectionHeading,
    PageHeader,
    PageFooter,
    PageNumber,
    Footnote,
    /// Any role string this engine does not recognize.
    Other,
}

impl ParagraphRole {
    /// Map the upstream role string. Unknown strings become [`Self::Other`]
    /// rather than failing — new analyzer roles must not break segmentation.
    pub fn from_role_str(s: &str) -> Self {
        match s {
            "title" => Self::Title,
            "sectionHeading" => Self::SectionHeading,
            "pageHeader" => Self::PageHeader,
            "pageFooter" => Self::PageFooter,
            "pageNumber" => Self::PageNumber,
            "footnote" => Self::Footnote,
            _ => Self::Other,
        }
    }

    /// Roles that never contribute chunk content.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::PageFooter | Self::PageNumber)
    }
}

/// A paragraph normalized down to what segmentation needs.
///
/// `content` is mutable by design: when the assembler decorates a chunk with
/// heading context, the decorated text — not the original — is what flows
/// into the chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedParagraph {
    pub content: String,
    pub role: Option<ParagraphRole>,
    pub page: u32,
    pub span: Span,
}

/// A table flattened into a single textual rendering
/// (`For "<header>": For row 0, <col> is <cell>,...`).
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable {
    pub content: String,
    pub page: u32,
    pub span: Span,
}

/// One font-attribute value (a weight like `bold`, or a `#rrggbb` color)
/// mapped to every span of the document it covers. Used only for
/// membership testing, never for layout.
#[derive(Debug, Clone)]
pub struct FontAttributeGroup {
    pub value: String,
    pub spans: Vec<Span>,
}

/// Mutable chunk accumulator.
///
/// Created empty by the assembler, grown one structural element at a time,
/// then stamped with identity metadata when the owning
/// [`crate::flow::DocumentFlow`] accepts it.
#[derive(Debug, Clone, Default)]
pub struct DocumentChunk {
    /// Ordered concatenation of member paragraph/table text.
    pub content: String,
    pub paragraphs: Vec<CleanedParagraph>,
    pub tables: Vec<CleanedTable>,
    /// Page of the last element appended.
    pub page_number: u32,
    pub client_name: String,
    pub document_name: String,
    pub date: Option<NaiveDateTime>,
    /// Flow-scoped identifier, `"<filename>_chunk_<index>"`.
    pub id: String,
    /// SHA-256 of `content`, the staleness key for the embedding pipeline.
    pub content_hash: String,
}

impl DocumentChunk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_paragraph(&mut self, paragraph: CleanedParagraph) {
        self.page_number = paragraph.page;
        self.content.push_str(&paragraph.content);
        self.paragraphs.push(paragraph);
    }

    pub fn push_table(&mut self, table: CleanedTable) {
        self.page_number = table.page;
        self.content.push_str(&table.content);
        self.tables.push(table);
    }

    /// Whitespace-delimited word count of the accumulated content.
    /// Degenerate content that yields no words counts as zero.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// True when no structural element has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty() && self.tables.is_empty()
    }
}

/// Flat serializable projection of one chunk — the sole hand-off surface to
/// the downstream embedding/storage collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub id: String,
    pub client_name: String,
    pub document_name: String,
    /// `YYYY-MM-DD HH:MM:SS`.
    pub date: String,
    pub page_number: u32,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_mapping() {
        assert_eq!(
            ParagraphRole::from_role_str("pageFooter"),
            ParagraphRole::PageFooter
        );
        assert_eq!(
            ParagraphRole::from_role_str("sectionHeading"),
            ParagraphRole::SectionHeading
        );
        assert_eq!(
            ParagraphRole::from_role_str("somethingNew"),
            ParagraphRole::Other
        );
    }

    #[test]
    fn test_skipped_roles() {
        assert!(ParagraphRole::PageFooter.is_skipped());
        assert!(ParagraphRole::PageNumber.is_skipped());
        assert!(!ParagraphRole::PageHeader.is_skipped());
        assert!(!ParagraphRole::Other.is_skipped());
    }

    #[test]
    fn test_chunk_accumulates_in_order() {
        let mut chunk = DocumentChunk::new();
        chunk.push_paragraph(CleanedParagraph {
            content: "First. ".to_string(),
            role: None,
            page: 1,
            span: Span::new(0, 7),
        });
        chunk.push_table(CleanedTable {
            content: "For \"Fees\": For row 0, rate is 2%,".to_string(),
            page: 2,
            span: Span::new(7, 30),
        });
        assert!(chunk.content.starts_with("First. For \"Fees\""));
        assert_eq!(chunk.page_number, 2);
        assert_eq!(chunk.paragraphs.len(), 1);
        assert_eq!(chunk.tables.len(), 1);
        assert!(!chunk.is_empty());
    }

    #[test]
    fn test_word_count_degenerate_content() {
        let mut chunk = DocumentChunk::new();
        chunk.content = "   ".to_string();
        assert_eq!(chunk.word_count(), 0);
    }
}
