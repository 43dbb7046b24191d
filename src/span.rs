//! Half-open character-offset intervals over a document's flat text.
//!
//! Every structural element the upstream layout analyzer reports — a
//! paragraph, a table, a styled run — carries a [`Span`] locating it in the
//! document's full text content. Segmentation never looks at geometry; all
//! "does this paragraph sit inside that table" and "is this text tinted
//! burgundy" questions reduce to span containment queries answered here.

use serde::{Deserialize, Serialize};

/// The half-open interval `[offset, offset + length)` over the document's
/// flat text content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub offset: usize,
    pub length: usize,
}

impl Span {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// One past the last covered offset.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Point containment: `offset <= point < offset + length`.
    ///
    /// The interval is strictly half-open — `contains(end())` is false,
    /// and a zero-length span contains nothing.
    pub fn contains(&self, point: usize) -> bool {
        self.offset <= point && point < self.end()
    }
}

/// True if `point` falls inside at least one of `spans`.
pub fn in_any(point: usize, spans: &[Span]) -> bool {
    spans.iter().any(|s| s.contains(point))
}

/// True only if `point` falls inside at least one span of *every* group.
///
/// This is the AND-combinator behind filters like "burgundy-colored AND
/// matches the enumerated-item pattern". An empty group list is vacuously
/// true.
pub fn in_all_groups(point: usize, groups: &[Vec<Span>]) -> bool {
    groups.iter().all(|g| in_any(point, g))
}

/// First item whose span contains `point`, with its index.
///
/// When spans overlap the first match in iteration order wins. Callers rely
/// on table spans being non-overlapping, which the upstream layout model
/// guarantees in practice; overlapping spans are not resolved by size.
pub fn find_containing<'a, T, F>(point: usize, items: &'a [T], span_of: F) -> Option<(usize, &'a T)>
where
    F: Fn(&T) -> Span,
{
    items
        .iter()
        .enumerate()
        .find(|(_, item)| span_of(item).contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_half_open() {
        let s = Span::new(10, 5);
        assert!(!s.contains(9));
        assert!(s.contains(10));
        assert!(s.contains(14));
        assert!(!s.contains(15)); // end is exclusive
    }

    #[test]
    fn test_zero_length_contains_nothing() {
        let s = Span::new(10, 0);
        assert!(!s.contains(10));
    }

    #[test]
    fn test_in_any() {
        let spans = vec![Span::new(0, 3), Span::new(10, 5)];
        assert!(in_any(1, &spans));
        assert!(in_any(12, &spans));
        assert!(!in_any(5, &spans));
    }

    #[test]
    fn test_in_all_groups_is_logical_and() {
        let bold = vec![Span::new(0, 20)];
        let burgundy = vec![Span::new(10, 5)];
        let groups = vec![bold, burgundy];
        assert!(in_all_groups(12, &groups));
        assert!(!in_all_groups(3, &groups)); // bold but not burgundy
    }

    #[test]
    fn test_in_all_groups_empty_is_true() {
        assert!(in_all_groups(42, &[]));
    }

    #[test]
    fn test_find_containing_first_match_wins() {
        let spans = vec![Span::new(0, 100), Span::new(50, 100)];
        let (idx, _) = find_containing(60, &spans, |s| *s).unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn test_find_containing_none() {
        let spans = vec![Span::new(0, 10)];
        assert!(find_containing(10, &spans, |s| *s).is_none());
    }
}
