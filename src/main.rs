//! # Docseg CLI (`docseg`)
//!
//! Command-line front end for the segmentation engine: read a layout-analysis
//! JSON file, segment it under a document-family configuration, and emit the
//! resulting chunk records.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docseg segment <layout.json>` | Segment a document and emit chunk records as JSON |
//! | `docseg show <layout.json>` | Segment and print chunks in a human-readable form |
//!
//! ## Examples
//!
//! ```bash
//! # Built-in family preset, JSON records to a file
//! docseg segment layout.json \
//!     --filename "Acme_DDQ_29-08-2023" \
//!     --family master-questionnaire \
//!     --output chunks.json
//!
//! # Custom family configuration from TOML, records to stdout
//! docseg segment layout.json \
//!     --filename "Acme_OM_01-03-2024" \
//!     --family-config om.toml \
//!     --styles styles.json
//!
//! # Page-clamped human-readable dump
//! docseg show layout.json --filename "Acme_DDQ_29-08-2023" \
//!     --family generic --start-page 2 --end-page 10
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use docseg::config::{DocumentFamily, FamilyConfig};
use docseg::flow::DocumentFlow;
use docseg::layout::{LayoutResult, StyledParagraph};
use docseg::segment_document;

/// Docseg — deterministic segmentation of layout-analyzed documents into
/// retrieval-ready chunks.
#[derive(Parser)]
#[command(
    name = "docseg",
    about = "Segment layout-analyzed documents into retrieval-ready chunks",
    version,
    long_about = "Docseg reads document layout-analysis JSON (paragraphs, tables, and \
    font-style runs addressed by character spans) and segments it into ordered chunks \
    whose boundaries follow the document's visual structure. Segmentation behavior is \
    selected per document family, either a built-in preset or a TOML configuration file."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every segmentation command.
#[derive(Debug, clap::Args)]
struct SegmentArgs {
    /// Path to the layout-analysis JSON file.
    layout: PathBuf,

    /// Upload filename carrying identity metadata,
    /// `<client>_<document>_<DD-MM-YYYY>` with an optional extension.
    #[arg(long)]
    filename: String,

    /// Built-in document family preset
    /// (master-questionnaire, offering-memorandum, client-responses,
    /// client-response-styled, generic).
    #[arg(long, conflicts_with = "family_config")]
    family: Option<String>,

    /// Path to a TOML family configuration, overriding the presets.
    #[arg(long)]
    family_config: Option<PathBuf>,

    /// Path to a styled-paragraph JSON file (text and style name per
    /// paragraph). Required by the style-name heading strategies.
    #[arg(long)]
    styles: Option<PathBuf>,

    /// First page to segment (1-indexed, inclusive).
    #[arg(long)]
    start_page: Option<u32>,

    /// Last page to segment (1-indexed, inclusive).
    #[arg(long)]
    end_page: Option<u32>,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Segment a document and emit its chunk records as JSON.
    ///
    /// Records carry the chunk id, client name, document name, date, page
    /// number, and decorated content — the hand-off surface for embedding
    /// and storage pipelines.
    Segment {
        #[command(flatten)]
        args: SegmentArgs,

        /// Write records to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Segment a document and print chunks in a human-readable form.
    Show {
        #[command(flatten)]
        args: SegmentArgs,
    },
}

fn load_family_config(args: &SegmentArgs) -> Result<FamilyConfig> {
    if let Some(path) = &args.family_config {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading family config {}", path.display()))?;
        return toml::from_str(&text)
            .with_context(|| format!("parsing family config {}", path.display()));
    }
    let name = args.family.as_deref().unwrap_or("generic");
    match DocumentFamily::from_name(name) {
        Some(family) => Ok(FamilyConfig::for_family(family)),
        None => bail!(
            "unknown document family '{name}' (expected one of: {})",
            DocumentFamily::ALL_NAMES.join(", ")
        ),
    }
}

fn load_styles(path: Option<&Path>) -> Result<Vec<StyledParagraph>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading styles {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing styles {}", path.display()))
        }
        None => Ok(Vec::new()),
    }
}

fn run_segmentation(args: &SegmentArgs) -> Result<DocumentFlow> {
    let text = fs::read_to_string(&args.layout)
        .with_context(|| format!("reading layout {}", args.layout.display()))?;
    let layout: LayoutResult = serde_json::from_str(&text)
        .with_context(|| format!("parsing layout {}", args.layout.display()))?;
    let config = load_family_config(args)?;
    let styles = load_styles(args.styles.as_deref())?;

    let flow = segment_document(
        &layout,
        &args.filename,
        &config,
        &styles,
        args.start_page,
        args.end_page,
    )?;
    Ok(flow)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Segment { args, output } => {
            let flow = run_segmentation(&args)?;
            let records = flow.to_records();
            let json = serde_json::to_string_pretty(&records)?;
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&path, &json)?;
                    eprintln!("Wrote {} chunks to {}", records.len(), path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Show { args } => {
            let flow = run_segmentation(&args)?;
            print!("{flow}");
            eprintln!("{} chunks", flow.chunks().len());
        }
    }

    Ok(())
}
