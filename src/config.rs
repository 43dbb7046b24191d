//! Per-document-family segmentation configuration.
//!
//! Each document family (the master questionnaire, the offering memorandum,
//! ad-hoc client response documents) shares the same engine but carries its
//! own boundary policy, heading rules, and size thresholds. Families are
//! expressed as plain configuration — adding one is purely additive and
//! never touches engine code.
//!
//! Configs deserialize from TOML; every threshold has a serde default so a
//! file only needs to name what it overrides. Built-in presets mirror the
//! families observed in production.

use serde::Deserialize;

/// The enumerated-item anchor subheadings must match: `1.`, `3)`, `a.`, `B)`.
pub const ENUMERATED_ITEM_PATTERN: &str = r"^([0-9]+|[a-zA-Z])[.)]";

/// Reference accent color of master-questionnaire subheadings.
pub const MASTER_QUESTIONNAIRE_ACCENT: &str = "#990135";

/// Which boundary decision closes a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryPolicy {
    /// Split on heading/subheading transitions, coalescing consecutive
    /// heading-like paragraphs, with a character-size fallback until the
    /// first subheading appears.
    HeadingTriggered,
    /// Split purely on a word-count ceiling; no heading awareness.
    SizeTriggered,
    /// Split on every accepted heading and tag flushed chunks with the
    /// full heading path.
    HeadingPath,
}

/// How headings and subheadings are recognized for a family.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum HeadingRules {
    /// No heading detection at all (size-triggered families).
    #[default]
    None,
    /// Closed list of heading strings plus color/regex subheading rules.
    FixedSet {
        #[serde(default)]
        section_headers: Vec<String>,
        subheader_color: String,
        #[serde(default = "default_color_threshold")]
        color_threshold: f64,
        #[serde(default = "default_min_subheading_words")]
        min_subheading_words: usize,
        #[serde(default = "default_subheading_pattern")]
        subheading_pattern: String,
    },
    /// Up to three paragraph-style-name sets with hierarchy-snapshot
    /// disambiguation of duplicate heading text.
    StyleHierarchy {
        #[serde(default)]
        level1_styles: Vec<String>,
        #[serde(default)]
        level2_styles: Vec<String>,
        #[serde(default)]
        level3_styles: Vec<String>,
        #[serde(default = "default_max_heading_words")]
        max_heading_words: usize,
    },
    /// Two style-name sets, no snapshot disambiguation; for short
    /// documents where duplicate headings do not occur.
    TwoLevelStyle {
        #[serde(default)]
        level1_styles: Vec<String>,
        #[serde(default)]
        level2_styles: Vec<String>,
    },
}

/// Complete segmentation policy for one document family.
#[derive(Debug, Clone, Deserialize)]
pub struct FamilyConfig {
    pub policy: BoundaryPolicy,
    #[serde(default)]
    pub headings: HeadingRules,
    /// Character-length fallback ceiling for heading-triggered families.
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
    /// Word ceiling for size-triggered families.
    #[serde(default = "default_max_chunk_words")]
    pub max_chunk_words: usize,
    /// Minimum word count a finalized chunk needs to be kept.
    #[serde(default = "default_min_chunk_words")]
    pub min_chunk_words: usize,
    /// Letterhead/address strings discarded wherever they appear.
    #[serde(default)]
    pub boilerplate_exclusions: Vec<String>,
    /// Drop everything before the first detected heading.
    #[serde(default)]
    pub skip_preamble: bool,
}

fn default_color_threshold() -> f64 {
    crate::color::DEFAULT_COLOR_THRESHOLD
}
fn default_min_subheading_words() -> usize {
    4
}
fn default_subheading_pattern() -> String {
    ENUMERATED_ITEM_PATTERN.to_string()
}
fn default_max_heading_words() -> usize {
    15
}
fn default_max_chunk_chars() -> usize {
    750
}
fn default_max_chunk_words() -> usize {
    125
}
fn default_min_chunk_words() -> usize {
    12
}

/// The document families with built-in presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFamily {
    MasterQuestionnaire,
    OfferingMemorandum,
    ClientResponses,
    ClientResponseStyled,
    Generic,
}

impl DocumentFamily {
    /// Map a CLI/config name to a family.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "master-questionnaire" => Some(Self::MasterQuestionnaire),
            "offering-memorandum" => Some(Self::OfferingMemorandum),
            "client-responses" => Some(Self::ClientResponses),
            "client-response-styled" => Some(Self::ClientResponseStyled),
            "generic" => Some(Self::Generic),
            _ => None,
        }
    }

    pub const ALL_NAMES: &'static [&'static str] = &[
        "master-questionnaire",
        "offering-memorandum",
        "client-responses",
        "client-response-styled",
        "generic",
    ];
}

impl FamilyConfig {
    /// Built-in preset for a family.
    pub fn for_family(family: DocumentFamily) -> Self {
        match family {
            DocumentFamily::MasterQuestionnaire => Self::master_questionnaire(),
            DocumentFamily::OfferingMemorandum => Self::offering_memorandum(),
            DocumentFamily::ClientResponses => Self::client_responses(),
            DocumentFamily::ClientResponseStyled => Self::client_response_styled(),
            DocumentFamily::Generic => Self::generic(),
        }
    }

    /// The master due-diligence questionnaire: a fixed table of contents
    /// and accent-colored, enumerated subheadings.
    pub fn master_questionnaire() -> Self {
        Self {
            policy: BoundaryPolicy::HeadingTriggered,
            headings: HeadingRules::FixedSet {
                section_headers: master_questionnaire_sections(),
                subheader_color: MASTER_QUESTIONNAIRE_ACCENT.to_string(),
                color_threshold: default_color_threshold(),
                min_subheading_words: default_min_subheading_words(),
                subheading_pattern: default_subheading_pattern(),
            },
            max_chunk_chars: default_max_chunk_chars(),
            max_chunk_words: default_max_chunk_words(),
            min_chunk_words: 12,
            boilerplate_exclusions: Vec::new(),
            skip_preamble: false,
        }
    }

    /// Large structured offering memoranda: three levels of named
    /// paragraph styles, heading-path chunk tagging.
    pub fn offering_memorandum() -> Self {
        Self {
            policy: BoundaryPolicy::HeadingPath,
            headings: HeadingRules::StyleHierarchy {
                level1_styles: vec![
                    "Standard_L1".to_string(),
                    "Legal1_L1".to_string(),
                    "Appendix 1_L1".to_string(),
                ],
                level2_styles: vec![
                    "Legal1_L2".to_string(),
                    "%Heading=Left+Bold".to_string(),
                    "Standard_L2".to_string(),
                ],
                level3_styles: vec!["Legal1_L3".to_string()],
                max_heading_words: default_max_heading_words(),
            },
            max_chunk_chars: default_max_chunk_chars(),
            max_chunk_words: default_max_chunk_words(),
            min_chunk_words: 12,
            boilerplate_exclusions: Vec::new(),
            skip_preamble: false,
        }
    }

    /// Ad-hoc client response documents with color-detected subheadings
    /// only (no fixed section list).
    pub fn client_responses() -> Self {
        Self {
            policy: BoundaryPolicy::HeadingTriggered,
            headings: HeadingRules::FixedSet {
                section_headers: Vec::new(),
                subheader_color: "#010101".to_string(),
                color_threshold: default_color_threshold(),
                min_subheading_words: default_min_subheading_words(),
                subheading_pattern: default_subheading_pattern(),
            },
            max_chunk_chars: default_max_chunk_chars(),
            max_chunk_words: default_max_chunk_words(),
            min_chunk_words: 15,
            boilerplate_exclusions: Vec::new(),
            skip_preamble: false,
        }
    }

    /// Client responses authored with word-processor heading styles.
    /// Content before the first heading (letterheads, addressee blocks)
    /// is dropped.
    pub fn client_response_styled() -> Self {
        Self {
            policy: BoundaryPolicy::HeadingPath,
            headings: HeadingRules::TwoLevelStyle {
                level1_styles: vec!["Heading 1".to_string()],
                level2_styles: vec!["Heading 2".to_string()],
            },
            max_chunk_chars: default_max_chunk_chars(),
            max_chunk_words: default_max_chunk_words(),
            min_chunk_words: 12,
            boilerplate_exclusions: Vec::new(),
            skip_preamble: true,
        }
    }

    /// Structure-blind default: split on a word ceiling alone.
    pub fn generic() -> Self {
        Self {
            policy: BoundaryPolicy::SizeTriggered,
            headings: HeadingRules::None,
            max_chunk_chars: default_max_chunk_chars(),
            max_chunk_words: default_max_chunk_words(),
            min_chunk_words: 12,
            boilerplate_exclusions: Vec::new(),
            skip_preamble: false,
        }
    }
}

/// The closed, ordered list of master-questionnaire section headings.
/// Document-specific configuration, not inferred from content.
fn master_questionnaire_sections() -> Vec<String> {
    [
        "Definitions and Short Forms Used in DDQ",
        "1. Snapshot - The Firm and the Fund",
        "2. General Information - The Firm",
        "3. General Information - The Fund",
        "4. Investment Strategy",
        "5. Investment Process",
        "6. The Team",
        "7. Alignment of Interests",
        "8. Fund Terms",
        "9. Firm Governance, Risk and Compliance",
        "10. Environmental, Social and Governance (\"ESG\")",
        "11. Track Record",
        "12. Accounting, Valuation and Reporting",
        "13. Legal and Administration",
        "14. Information Technology (\"IT\"), Cyber and Physical Security",
        "15. Disaster Recovery and Business Continuity Plans",
        "16. Important Information for DDQ Recipients",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_names_round_trip() {
        for name in DocumentFamily::ALL_NAMES {
            assert!(DocumentFamily::from_name(name).is_some(), "{name}");
        }
        assert!(DocumentFamily::from_name("unknown").is_none());
    }

    #[test]
    fn test_presets_differ_where_documented() {
        let master = FamilyConfig::master_questionnaire();
        let responses = FamilyConfig::client_responses();
        assert_eq!(master.min_chunk_words, 12);
        assert_eq!(responses.min_chunk_words, 15);
    }

    #[test]
    fn test_toml_with_defaults() {
        let cfg: FamilyConfig = toml::from_str(
            r##"
            policy = "heading-triggered"
            boilerplate_exclusions = ["181 Bay Street, Toronto"]

            [headings]
            strategy = "fixed-set"
            subheader_color = "#336699"
            "##,
        )
        .unwrap();
        assert_eq!(cfg.policy, BoundaryPolicy::HeadingTriggered);
        assert_eq!(cfg.max_chunk_chars, 750);
        assert_eq!(cfg.min_chunk_words, 12);
        assert_eq!(cfg.boilerplate_exclusions.len(), 1);
        match cfg.headings {
            HeadingRules::FixedSet {
                subheader_color,
                color_threshold,
                min_subheading_words,
                subheading_pattern,
                section_headers,
            } => {
                assert_eq!(subheader_color, "#336699");
                assert_eq!(color_threshold, 30.0);
                assert_eq!(min_subheading_words, 4);
                assert_eq!(subheading_pattern, ENUMERATED_ITEM_PATTERN);
                assert!(section_headers.is_empty());
            }
            other => panic!("unexpected rules: {other:?}"),
        }
    }

    #[test]
    fn test_toml_size_triggered_minimal() {
        let cfg: FamilyConfig = toml::from_str("policy = \"size-triggered\"").unwrap();
        assert_eq!(cfg.policy, BoundaryPolicy::SizeTriggered);
        assert!(matches!(cfg.headings, HeadingRules::None));
        assert_eq!(cfg.max_chunk_words, 125);
    }
}
