//! Documentation units, the normalized records every extractor produces.
//!
//! A [`DocUnit`] represents one logical page, section, or document pulled
//! from any source kind. Units are immutable after construction; the
//! derived `snippet` and `searchable_text` fields are computed exactly once
//! in [`DocUnit::new`].

use crate::UnitType;
use serde::{Deserialize, Serialize};

/// Maximum snippet length, in characters, before the trailing ellipsis.
const SNIPPET_LEN: usize = 200;

/// An enriched code snippet with detected language and placement flags.
///
/// `is_script` and `is_template` may both be set; the package builder gives
/// templates precedence when placing files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Raw code text.
    pub code: String,
    /// Normalized language tag, when detected.
    pub language: Option<String>,
    /// Suggested filename, when one could be inferred.
    pub filename: Option<String>,
    /// Whether the block looks like a complete runnable script.
    pub is_script: bool,
    /// Whether the block contains template placeholders.
    pub is_template: bool,
    /// Title taken from a nearby heading, when available.
    pub title: Option<String>,
}

/// Structured API reference extracted from an api-typed unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiReference {
    /// Signature-like text, e.g. a function prototype.
    pub signature: Option<String>,
    /// Parameter descriptions, one entry per parameter element.
    pub parameters: Vec<String>,
    /// Extracted `returns:` phrase, when present.
    pub returns: Option<String>,
    /// First code example, used as a usage sample.
    pub example: Option<String>,
}

impl ApiReference {
    /// Returns `true` if no field carries any information.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signature.is_none()
            && self.parameters.is_empty()
            && self.returns.is_none()
            && self.example.is_none()
    }
}

/// One normalized documentation record.
///
/// # Examples
///
/// ```
/// use skillforge_core::{DocUnit, UnitType};
///
/// let unit = DocUnit::new(
///     1,
///     "react-docs",
///     "Hooks at a Glance",
///     "Hooks let you use state without classes.",
///     UnitType::Guide,
///     "https://react.dev/hooks",
/// );
/// assert_eq!(unit.unit_type, UnitType::Guide);
/// assert!(unit.searchable_text.contains("hooks let you use state"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocUnit {
    /// Sequential identifier, unique within one build.
    pub id: u64,
    /// Name of the parent skill build.
    pub source: String,
    /// Section or page title.
    pub title: String,
    /// Full normalized text content.
    pub content: String,
    /// Content prefix with trailing ellipsis, derived at construction.
    pub snippet: String,
    /// Lowercased title plus content, a denormalized search aid.
    pub searchable_text: String,
    /// Mutually exclusive classification, decided once at creation.
    pub unit_type: UnitType,
    /// Optional grouping bucket; absence means "general" at grouping time.
    pub category: Option<String>,
    /// Source locator; empty string is permitted for PDF-derived units.
    pub url: String,
    /// Raw code strings extracted from the content.
    pub code_examples: Vec<String>,
    /// Enriched code records, a superset matched to `code_examples` by content.
    pub code_blocks: Vec<CodeBlock>,
    /// Structured reference data, populated only for api-typed units.
    pub api_reference: Option<ApiReference>,
}

impl DocUnit {
    /// Creates a unit, deriving `snippet` and `searchable_text` from the
    /// given title and content.
    #[must_use]
    pub fn new(
        id: u64,
        source: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        unit_type: UnitType,
        url: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let content = content.into();
        let snippet = make_snippet(&content);
        let searchable_text = format!("{title} {content}").to_lowercase();
        Self {
            id,
            source: source.into(),
            title,
            content,
            snippet,
            searchable_text,
            unit_type,
            category: None,
            url: url.into(),
            code_examples: Vec::new(),
            code_blocks: Vec::new(),
            api_reference: None,
        }
    }

    /// Sets the grouping category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Attaches extracted code examples and their enriched records.
    #[must_use]
    pub fn with_code(mut self, examples: Vec<String>, blocks: Vec<CodeBlock>) -> Self {
        self.code_examples = examples;
        self.code_blocks = blocks;
        self
    }

    /// Attaches a structured API reference.
    #[must_use]
    pub fn with_api_reference(mut self, reference: ApiReference) -> Self {
        self.api_reference = Some(reference);
        self
    }

    /// Returns `true` if the unit carries any code example.
    #[must_use]
    pub fn has_code(&self) -> bool {
        !self.code_examples.is_empty() || !self.code_blocks.is_empty()
    }
}

fn make_snippet(content: &str) -> String {
    let mut snippet: String = content.chars().take(SNIPPET_LEN).collect();
    snippet.push_str("...");
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_truncates_long_content() {
        let content = "x".repeat(500);
        let unit = DocUnit::new(1, "s", "Title", content, UnitType::Guide, "");
        assert_eq!(unit.snippet.chars().count(), SNIPPET_LEN + 3);
        assert!(unit.snippet.ends_with("..."));
    }

    #[test]
    fn test_snippet_short_content_keeps_ellipsis() {
        let unit = DocUnit::new(1, "s", "Title", "short body", UnitType::Guide, "");
        assert_eq!(unit.snippet, "short body...");
    }

    #[test]
    fn test_searchable_text_lowercased() {
        let unit = DocUnit::new(1, "s", "Getting Started", "Install The CLI", UnitType::Guide, "");
        assert_eq!(unit.searchable_text, "getting started install the cli");
    }

    #[test]
    fn test_with_category() {
        let unit =
            DocUnit::new(1, "s", "T", "c", UnitType::Guide, "").with_category("authentication");
        assert_eq!(unit.category.as_deref(), Some("authentication"));
    }

    #[test]
    fn test_with_code_marks_has_code() {
        let block = CodeBlock {
            code: "print('hi')".to_string(),
            language: Some("python".to_string()),
            filename: None,
            is_script: false,
            is_template: false,
            title: None,
        };
        let unit = DocUnit::new(1, "s", "T", "c", UnitType::Example, "")
            .with_code(vec!["print('hi')".to_string()], vec![block]);
        assert!(unit.has_code());
        assert_eq!(unit.code_examples.len(), 1);
        assert_eq!(unit.code_blocks.len(), 1);
    }

    #[test]
    fn test_empty_unit_has_no_code() {
        let unit = DocUnit::new(1, "s", "T", "c", UnitType::Guide, "");
        assert!(!unit.has_code());
    }

    #[test]
    fn test_api_reference_is_empty() {
        assert!(ApiReference::default().is_empty());
        let reference = ApiReference {
            signature: Some("fn get(key: &str)".to_string()),
            ..ApiReference::default()
        };
        assert!(!reference.is_empty());
    }

    #[test]
    fn test_unit_serde_round_trip() {
        let unit = DocUnit::new(
            7,
            "docs",
            "Install",
            "Run the installer.",
            UnitType::Guide,
            "https://example.com/install",
        )
        .with_category("setup");
        let json = serde_json::to_string(&unit).unwrap();
        let back: DocUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(unit, back);
    }
}
