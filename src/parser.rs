//! Structural Model builder.
//!
//! Turns one raw layout-analysis result into the normalized model the rest
//! of the engine queries: page-filtered paragraphs and tables, plus
//! font-weight and font-color span groupings built in a single pass over
//! the style runs. Built once per source document; none of this state is
//! shared across documents.
//!
//! Table flattening is deferred until first request and memoized — most
//! query paths (heading precomputation) only need table *spans*, which are
//! available without rendering cell grids to text.

use std::cell::OnceCell;

use log::warn;
use regex::Regex;

use crate::color::is_similar_color;
use crate::error::DocsegError;
use crate::layout::{LayoutResult, LayoutTable, TableCell};
use crate::models::{CleanedParagraph, CleanedTable, FontAttributeGroup, ParagraphRole};
use crate::span::{self, Span};

/// Normalized, query-ready representation of one document.
#[derive(Debug)]
pub struct StructuralModel {
    paragraphs: Vec<CleanedParagraph>,
    raw_tables: Vec<LayoutTable>,
    tables: OnceCell<Vec<CleanedTable>>,
    font_weights: Vec<FontAttributeGroup>,
    font_colors: Vec<FontAttributeGroup>,
}

impl StructuralModel {
    /// Build the model from a layout result, clamped to an optional
    /// 1-indexed inclusive page range (defaults to the whole document).
    ///
    /// Fails fast on an empty document or an out-of-range/inverted clamp;
    /// nothing downstream ever sees an invalid model.
    pub fn build(
        result: &LayoutResult,
        start_page: Option<u32>,
        end_page: Option<u32>,
    ) -> Result<Self, DocsegError> {
        let total = result.pages.len() as u32;
        if total == 0 {
            return Err(DocsegError::EmptyDocument);
        }
        let start = start_page.unwrap_or(1);
        let end = end_page.unwrap_or(total);
        if !(1 <= start && start <= end && end <= total) {
            return Err(DocsegError::InvalidPageRange { start, end, total });
        }

        let in_range = |page: u32| start <= page && page <= end;

        let paragraphs = result
            .paragraphs
            .iter()
            .filter_map(|p| {
                let region = p.bounding_regions.first()?;
                if !in_range(region.page_number) {
                    return None;
                }
                let span = p.spans.first().copied()?;
                Some(CleanedParagraph {
                    content: p.content.clone(),
                    role: p.role.as_deref().map(ParagraphRole::from_role_str),
                    page: region.page_number,
                    span,
                })
            })
            .collect();

        let raw_tables = result
            .tables
            .iter()
            .filter(|t| {
                t.bounding_regions
                    .first()
                    .is_some_and(|r| in_range(r.page_number))
                    && !t.spans.is_empty()
            })
            .cloned()
            .collect();

        let mut font_weights: Vec<FontAttributeGroup> = Vec::new();
        let mut font_colors: Vec<FontAttributeGroup> = Vec::new();
        for style in &result.styles {
            if let Some(weight) = &style.font_weight {
                push_group(&mut font_weights, weight, &style.spans);
            }
            if let Some(color) = &style.color {
                push_group(&mut font_colors, color, &style.spans);
            }
        }

        Ok(Self {
            paragraphs,
            raw_tables,
            tables: OnceCell::new(),
            font_weights,
            font_colors,
        })
    }

    /// Paragraphs within the page clamp, in document reading order.
    pub fn paragraphs(&self) -> &[CleanedParagraph] {
        &self.paragraphs
    }

    /// Flattened tables within the page clamp. Rendered lazily on first
    /// call and memoized; a table whose cell grid cannot be classified is
    /// dropped with a warning, never fatal.
    pub fn tables(&self) -> &[CleanedTable] {
        self.tables.get_or_init(|| {
            self.raw_tables
                .iter()
                .enumerate()
                .filter_map(|(idx, table)| match flatten_table(idx, table) {
                    Ok(cleaned) => Some(cleaned),
                    Err(reason) => {
                        let page = table
                            .bounding_regions
                            .first()
                            .map(|r| r.page_number)
                            .unwrap_or(0);
                        warn!("dropping malformed table {idx} on page {page}: {reason}");
                        None
                    }
                })
                .collect()
        })
    }

    /// Font-weight groupings, insertion-ordered.
    pub fn font_weights(&self) -> &[FontAttributeGroup] {
        &self.font_weights
    }

    /// Font-color groupings, insertion-ordered.
    pub fn font_colors(&self) -> &[FontAttributeGroup] {
        &self.font_colors
    }

    /// Every span covered by the given font weight (exact match).
    pub fn weight_spans(&self, weight: &str) -> Vec<Span> {
        self.font_weights
            .iter()
            .filter(|g| g.value == weight)
            .flat_map(|g| g.spans.iter().copied())
            .collect()
    }

    /// Every span whose color lies within `threshold` RGB distance of
    /// `reference`.
    pub fn color_spans(&self, reference: &str, threshold: f64) -> Vec<Span> {
        self.font_colors
            .iter()
            .filter(|g| is_similar_color(reference, &g.value, threshold))
            .flat_map(|g| g.spans.iter().copied())
            .collect()
    }

    /// Spans of all successfully flattened tables.
    pub fn table_spans(&self) -> Vec<Span> {
        self.tables().iter().map(|t| t.span).collect()
    }

    /// The first table whose span contains `point`, with its index in
    /// [`Self::tables`] order. Table spans are assumed non-overlapping.
    pub fn table_at(&self, point: usize) -> Option<(usize, &CleanedTable)> {
        span::find_containing(point, self.tables(), |t| t.span)
    }

    /// Paragraphs whose span start falls inside at least one span of every
    /// group, outside all `avoid` spans, with at least `min_words` words,
    /// and (optionally) matching `pattern`.
    ///
    /// This is the combined AND filter behind color-based subheading
    /// detection: "tinted like the accent color AND enumerated AND long
    /// enough AND not inside a table".
    pub fn matching_paragraphs(
        &self,
        span_groups: &[Vec<Span>],
        min_words: usize,
        pattern: Option<&Regex>,
        avoid: &[Span],
    ) -> Vec<&CleanedParagraph> {
        self.paragraphs
            .iter()
            .filter(|p| {
                let start = p.span.offset;
                if span::in_any(start, avoid) {
                    return false;
                }
                if !span::in_all_groups(start, span_groups) {
                    return false;
                }
                if p.content.split_whitespace().count() < min_words {
                    return false;
                }
                pattern.map_or(true, |re| re.is_match(&p.content))
            })
            .collect()
    }
}

fn push_group(groups: &mut Vec<FontAttributeGroup>, value: &str, spans: &[Span]) {
    match groups.iter_mut().find(|g| g.value == value) {
        Some(group) => group.spans.extend_from_slice(spans),
        None => groups.push(FontAttributeGroup {
            value: value.to_string(),
            spans: spans.to_vec(),
        }),
    }
}

/// Group a table's cell sequence into rows on `row_index` transitions.
fn cells_to_rows(table: &LayoutTable) -> Vec<Vec<&TableCell>> {
    let mut rows: Vec<Vec<&TableCell>> = Vec::new();
    let mut current_row: Vec<&TableCell> = Vec::new();
    let mut current_row_number = 0;
    for cell in &table.cells {
        if cell.row_index > current_row_number {
            rows.push(std::mem::take(&mut current_row));
            current_row_number = cell.row_index;
        }
        current_row.push(cell);
    }
    rows.push(current_row);
    rows
}

/// Render one table's cell grid into its flat textual form.
///
/// Cell classification:
/// - a header-kind cell spanning all columns names the whole table;
/// - a header-kind cell with `column_span == 1` makes its row the column
///   labels;
/// - a content-kind cell renders its row against the nearest preceding
///   column labels;
/// - a cell with no `kind` at all marks the table malformed.
fn flatten_table(index: usize, table: &LayoutTable) -> Result<CleanedTable, String> {
    let mut table_header = format!("Table {index}");
    let mut column_headers: Vec<String> = (1..=table.column_count)
        .map(|i| format!("column{i}"))
        .collect();
    let mut all_rows: Vec<String> = Vec::new();

    for (row_index, row) in cells_to_rows(table).iter().enumerate() {
        for cell in row {
            let kind = cell
                .kind
                .as_deref()
                .ok_or_else(|| {
                    format!("cell ({},{}) has no kind", cell.row_index, cell.column_index)
                })?
                .to_lowercase();
            if kind.contains("header") {
                if cell.column_span == table.column_count {
                    table_header = cell.content.clone();
                    break;
                }
                if cell.column_span == 1 {
                    column_headers = row.iter().map(|c| c.content.clone()).collect();
                    break;
                }
            } else if kind.contains("content") {
                let rendered: String = row
                    .iter()
                    .enumerate()
                    .map(|(i, row_cell)| {
                        let label = column_headers
                            .get(i)
                            .filter(|l| !l.is_empty())
                            .cloned()
                            .unwrap_or_else(|| format!("column{}", i + 1));
                        format!("{} is {},", label, row_cell.content)
                    })
                    .collect();
                all_rows.push(format!("For row {row_index}, {rendered}"));
                break;
            }
            // Other kinds (footnotes, captions) are skipped, not fatal.
        }
    }

    let span = table.spans.first().copied().unwrap_or_default();
    let page = table
        .bounding_regions
        .first()
        .map(|r| r.page_number)
        .unwrap_or(0);
    Ok(CleanedTable {
        content: format!("For \"{}\": {}", table_header, all_rows.join(".")),
        page,
        span,
    })
}
