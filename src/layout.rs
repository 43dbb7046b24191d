//! Input contract: the upstream layout-analysis result.
//!
//! The segmentation engine never touches a raw PDF or DOCX. It consumes the
//! structural model an external layout analyzer produces: ordered paragraphs
//! and tables with byte-offset spans and page-numbered bounding regions,
//! plus font-style runs (weight, color) covering parts of the flat text.
//! These types mirror that wire shape one-to-one and deserialize from the
//! analyzer's JSON output.

use serde::Deserialize;

use crate::span::Span;

/// A full layout-analysis result for one source document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutResult {
    #[serde(default)]
    pub pages: Vec<LayoutPage>,
    #[serde(default)]
    pub paragraphs: Vec<LayoutParagraph>,
    #[serde(default)]
    pub tables: Vec<LayoutTable>,
    #[serde(default)]
    pub styles: Vec<StyleRun>,
}

/// One analyzed page. Only its existence matters here; page geometry stays
/// upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutPage {
    pub page_number: u32,
}

/// Where an element sits on the page. The engine only reads the page number.
#[derive(Debug, Clone, Deserialize)]
pub struct BoundingRegion {
    pub page_number: u32,
}

/// An ordered paragraph in document reading order.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutParagraph {
    pub content: String,
    /// Semantic role string as reported upstream (`"pageFooter"`,
    /// `"sectionHeading"`, ...). Absent for plain body text.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub bounding_regions: Vec<BoundingRegion>,
    #[serde(default)]
    pub spans: Vec<Span>,
}

/// A detected table with its raw cell grid.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutTable {
    pub column_count: usize,
    #[serde(default)]
    pub cells: Vec<TableCell>,
    #[serde(default)]
    pub bounding_regions: Vec<BoundingRegion>,
    #[serde(default)]
    pub spans: Vec<Span>,
}

/// One cell of a table grid. `kind` is a free-form string containing
/// `"header"` or `"content"`; anything else is ignored, and a missing kind
/// marks the whole table malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct TableCell {
    pub row_index: usize,
    pub column_index: usize,
    #[serde(default = "default_column_span")]
    pub column_span: usize,
    #[serde(default)]
    pub kind: Option<String>,
    pub content: String,
}

fn default_column_span() -> usize {
    1
}

/// A font-style run: one weight/color value covering one or more spans.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleRun {
    #[serde(default)]
    pub font_weight: Option<String>,
    /// Hex `#rrggbb`.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub spans: Vec<Span>,
}

/// A paragraph with its named paragraph style, for document families whose
/// headings are identified by style name rather than color. Produced by the
/// word-processor side of the upstream pipeline, ordered like the document.
#[derive(Debug, Clone, Deserialize)]
pub struct StyledParagraph {
    pub text: String,
    pub style_name: String,
}
