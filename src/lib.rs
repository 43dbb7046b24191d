//! # Docseg
//!
//! A deterministic segmentation engine for layout-analyzed documents.
//!
//! Docseg turns the JSON output of a document layout analyzer (paragraphs,
//! tables, and font-style runs addressed by character spans over one flat
//! text) into an ordered stream of retrieval-ready chunks. Chunk boundaries
//! follow the visual and stylistic structure of the source document —
//! headings, accent-colored subheadings, named paragraph styles, tables —
//! rather than blind character windows.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌───────────┐   ┌──────────┐
//! │ Layout JSON  │──▶│ Structural   │──▶│ Heading    │──▶│ Chunk     │
//! │ (paragraphs, │   │ Model        │   │ Classifier │   │ Assembler │
//! │ tables,      │   │ (spans,      │   │ (fixed-set │   └────┬─────┘
//! │ style runs)  │   │ pages,       │   │ / styles)  │        │
//! └──────────────┘   │ colors)      │   └───────────┘        ▼
//!                    └─────────────┘                   ┌──────────┐
//!                                                      │ Document  │
//!                                                      │ Flow      │
//!                                                      └──────────┘
//! ```
//!
//! Each document family (master questionnaire, offering memorandum, client
//! responses) is a [`config::FamilyConfig`]: a boundary policy plus heading
//! rules and size thresholds. The engine itself is family-agnostic.
//!
//! ## Quick Start
//!
//! ```bash
//! docseg segment layout.json \
//!     --filename "Acme_DDQ_29-08-2023" \
//!     --family master-questionnaire \
//!     --output chunks.json
//! docseg show layout.json --filename "Acme_DDQ_29-08-2023" --family generic
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`span`] | Half-open character spans and containment queries |
//! | [`color`] | Hex color decoding and RGB-distance similarity |
//! | [`layout`] | Deserialization of the layout-analysis JSON contract |
//! | [`models`] | Cleaned structural records, chunks, hand-off records |
//! | [`parser`] | Structural Model builder and span-indexed queries |
//! | [`heading`] | Heading classification strategies |
//! | [`config`] | Document-family configuration and presets |
//! | [`assembler`] | Boundary policies and the segmentation pipeline |
//! | [`flow`] | Ordered chunk output with identity stamping |
//! | [`error`] | Error taxonomy |

pub mod assembler;
pub mod color;
pub mod config;
pub mod error;
pub mod flow;
pub mod heading;
pub mod layout;
pub mod models;
pub mod parser;
pub mod span;

pub use assembler::segment_document;
pub use error::DocsegError;
