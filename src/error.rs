//! Error taxonomy for the segmentation engine.
//!
//! Everything here is fatal and surfaces before or at construction time:
//! an empty document, an out-of-range page clamp, a filename that does not
//! follow the identity contract, or a bad heading pattern. Per-element
//! failures (a single malformed table) are *not* errors — they are logged
//! and the offending element is dropped, see [`crate::parser`].

use thiserror::Error;

/// Fatal input-validation and configuration errors.
#[derive(Debug, Error)]
pub enum DocsegError {
    /// The layout result contains no pages at all.
    #[error("document contains no pages")]
    EmptyDocument,

    /// The requested page clamp is outside `[1, total]` or inverted.
    #[error("invalid page range {start}..={end} for a {total}-page document")]
    InvalidPageRange { start: u32, end: u32, total: u32 },

    /// The filename does not split into `<client>_<document>_<DD-MM-YYYY>`.
    #[error("filename `{0}` does not match `<client>_<document>_<DD-MM-YYYY>`")]
    InvalidFilename(String),

    /// The date segment of the filename failed to parse as `DD-MM-YYYY`.
    #[error("invalid date segment `{value}`: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A configured heading pattern is not a valid regular expression.
    #[error("invalid heading pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
