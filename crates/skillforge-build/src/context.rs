//! Serializable context structs fed to the package document templates.

use serde::Serialize;

/// One category row in the SKILL.md contents list.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    /// Category name.
    pub name: String,
    /// Number of units grouped under the category.
    pub count: usize,
}

/// The optional Getting Started block.
#[derive(Debug, Clone, Serialize)]
pub struct GettingStarted {
    /// Title of the selected unit.
    pub title: String,
    /// Snippet of the selected unit.
    pub snippet: String,
}

/// One Key Topics row.
#[derive(Debug, Clone, Serialize)]
pub struct TopicEntry {
    /// Guide title.
    pub title: String,
    /// Truncated snippet.
    pub snippet: String,
}

/// Context for the SKILL.md descriptor template.
#[derive(Debug, Serialize)]
pub struct SkillContext {
    /// Skill name.
    pub name: String,
    /// Skill description.
    pub description: String,
    /// Fixed provenance sentence keyed by source kind.
    pub generated_from: String,
    /// Total unit count.
    pub total_units: usize,
    /// Count of api-typed units.
    pub api_count: usize,
    /// Count of guide-typed units.
    pub guide_count: usize,
    /// Count of example-typed units.
    pub example_count: usize,
    /// Source locator, when one exists.
    pub source_url: Option<String>,
    /// Contents list, in first-seen category order.
    pub categories: Vec<CategorySummary>,
    /// Optional Getting Started block.
    pub getting_started: Option<GettingStarted>,
    /// Up to five guide topics.
    pub key_topics: Vec<TopicEntry>,
    /// RFC 3339 creation timestamp.
    pub generated_at: String,
}

/// One unit inside a reference category.
#[derive(Debug, Serialize)]
pub struct UnitRef {
    /// Unit title.
    pub title: String,
    /// Full unit content.
    pub content: String,
    /// Up to three code examples.
    pub examples: Vec<String>,
}

/// One category section of the reference document.
#[derive(Debug, Serialize)]
pub struct CategoryRef {
    /// Category name.
    pub name: String,
    /// Units in discovery order.
    pub units: Vec<UnitRef>,
}

/// One api-typed unit in the API reference section.
#[derive(Debug, Serialize)]
pub struct ApiUnitRef {
    /// Unit title.
    pub title: String,
    /// Signature text, when extracted.
    pub signature: Option<String>,
    /// Parameter descriptions.
    pub parameters: Vec<String>,
    /// Returns phrase, when extracted.
    pub returns: Option<String>,
    /// Usage sample, when extracted.
    pub example: Option<String>,
    /// Content excerpt, first 500 characters.
    pub excerpt: String,
}

/// Context for the reference.md template.
#[derive(Debug, Serialize)]
pub struct ReferenceContext {
    /// Skill name.
    pub name: String,
    /// Category sections in first-seen order.
    pub categories: Vec<CategoryRef>,
    /// Every api-typed unit, in unit order.
    pub api_units: Vec<ApiUnitRef>,
}

/// One unit with its full example list.
#[derive(Debug, Serialize)]
pub struct ExampleUnit {
    /// Unit title.
    pub title: String,
    /// Every code example, untruncated.
    pub examples: Vec<String>,
}

/// Context for the examples.md template.
#[derive(Debug, Serialize)]
pub struct ExamplesContext {
    /// Skill name.
    pub name: String,
    /// Units that carry at least one code example.
    pub units: Vec<ExampleUnit>,
}
