//! Package assembly from an ordered unit list.
//!
//! The builder is synchronous and CPU-bound. Given the complete unit list
//! for one scrape it renders the three package documents, emits script and
//! template files from enriched code blocks, and returns an immutable
//! [`SkillPackage`]. Persistence happens elsewhere.

use crate::context::{
    ApiUnitRef, CategoryRef, CategorySummary, ExampleUnit, ExamplesContext, GettingStarted,
    ReferenceContext, SkillContext, TopicEntry, UnitRef,
};
use crate::engine::TemplateEngine;
use crate::grouping::{NameAllocator, group_by_category, partition_blocks, slugify};
use chrono::Utc;
use skillforge_classify::extension_for;
use skillforge_core::{
    CodeBlock, DocUnit, PackageFile, PackageSource, PackageStats, Result, SkillName, SkillPackage,
    SourceKind, UnitType,
};
use tracing::debug;

/// Maximum code examples rendered per unit in the reference document.
const REFERENCE_EXAMPLE_LIMIT: usize = 3;

/// Maximum guide units listed under Key Topics.
const KEY_TOPIC_LIMIT: usize = 5;

/// Maximum excerpt length, in characters, for API reference entries.
const API_EXCERPT_LEN: usize = 500;

/// Title markers that select the Getting Started unit.
const GETTING_STARTED_MARKERS: [&str; 3] = ["getting started", "quick start", "introduction"];

/// Everything the builder needs to assemble one package.
#[derive(Debug)]
pub struct BuildRequest {
    /// Validated skill name.
    pub name: SkillName,
    /// Human-readable description.
    pub description: String,
    /// Documentation units in extraction order.
    pub units: Vec<DocUnit>,
    /// Which source kind produced the units.
    pub kind: SourceKind,
    /// Source locator, when one exists.
    pub source_url: Option<String>,
}

/// Assembles skill packages from extracted documentation units.
///
/// # Examples
///
/// ```
/// use skillforge_build::{BuildRequest, PackageBuilder};
/// use skillforge_core::{SkillName, SourceKind};
///
/// # fn example() -> Result<(), skillforge_core::Error> {
/// let builder = PackageBuilder::new()?;
/// let request = BuildRequest {
///     name: SkillName::new("react-docs")?,
///     description: "React documentation".to_string(),
///     units: Vec::new(),
///     kind: SourceKind::Web,
///     source_url: Some("https://react.dev".to_string()),
/// };
/// let package = builder.build(&request)?;
/// assert_eq!(package.files[0].path, "SKILL.md");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PackageBuilder {
    engine: TemplateEngine<'static>,
}

impl PackageBuilder {
    /// Creates a builder with the built-in document templates.
    ///
    /// # Errors
    ///
    /// Returns an error if template registration fails.
    pub fn new() -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
        })
    }

    /// Builds a complete package from the given request.
    ///
    /// File order is deterministic: `SKILL.md`, then `reference.md` when at
    /// least one unit exists, then `examples.md` when any unit carries a
    /// code example, then script files, then template files.
    ///
    /// # Errors
    ///
    /// Returns a render error if any document template fails to render.
    pub fn build(&self, request: &BuildRequest) -> Result<SkillPackage> {
        let created_at = Utc::now();
        let groups = group_by_category(&request.units);

        let mut files = vec![PackageFile::new(
            "SKILL.md",
            self.engine.render(
                "skill",
                &skill_context(request, &groups, &created_at.to_rfc3339()),
            )?,
        )];

        if !request.units.is_empty() {
            files.push(PackageFile::new(
                "reference.md",
                self.engine
                    .render("reference", &reference_context(request, &groups))?,
            ));
        }

        if request.units.iter().any(|u| !u.code_examples.is_empty()) {
            files.push(PackageFile::new(
                "examples.md",
                self.engine.render("examples", &examples_context(request))?,
            ));
        }

        let (scripts, templates) = partition_blocks(&request.units);
        emit_blocks(&mut files, &scripts, "scripts", "helper", script_extension);
        emit_blocks(&mut files, &templates, "templates", "template", |_| {
            "txt".to_string()
        });

        let stats = PackageStats {
            total_pages: request.units.len(),
            categories: groups.len(),
            code_examples: request.units.iter().map(|u| u.code_examples.len()).sum(),
        };

        debug!(
            name = %request.name,
            files = files.len(),
            pages = stats.total_pages,
            "assembled skill package"
        );

        Ok(SkillPackage {
            id: SkillPackage::generate_id(&request.name),
            name: request.name.clone(),
            description: request.description.clone(),
            files,
            created_at,
            source: PackageSource {
                kind: request.kind,
                url: request.source_url.clone(),
            },
            stats,
        })
    }
}

fn skill_context(
    request: &BuildRequest,
    groups: &[(String, Vec<&DocUnit>)],
    generated_at: &str,
) -> SkillContext {
    let count_of = |unit_type: UnitType| {
        request
            .units
            .iter()
            .filter(|u| u.unit_type == unit_type)
            .count()
    };

    let getting_started = request
        .units
        .iter()
        .find(|u| {
            let title = u.title.to_lowercase();
            GETTING_STARTED_MARKERS.iter().any(|m| title.contains(m))
        })
        .map(|u| GettingStarted {
            title: u.title.clone(),
            snippet: u.snippet.clone(),
        });

    let key_topics = request
        .units
        .iter()
        .filter(|u| u.unit_type == UnitType::Guide)
        .take(KEY_TOPIC_LIMIT)
        .map(|u| TopicEntry {
            title: u.title.clone(),
            snippet: u.snippet.clone(),
        })
        .collect();

    SkillContext {
        name: request.name.to_string(),
        description: request.description.clone(),
        generated_from: generated_from(request.kind).to_string(),
        total_units: request.units.len(),
        api_count: count_of(UnitType::Api),
        guide_count: count_of(UnitType::Guide),
        example_count: count_of(UnitType::Example),
        source_url: request.source_url.clone(),
        categories: groups
            .iter()
            .map(|(name, units)| CategorySummary {
                name: name.clone(),
                count: units.len(),
            })
            .collect(),
        getting_started,
        key_topics,
        generated_at: generated_at.to_string(),
    }
}

fn reference_context(
    request: &BuildRequest,
    groups: &[(String, Vec<&DocUnit>)],
) -> ReferenceContext {
    let categories = groups
        .iter()
        .map(|(name, units)| CategoryRef {
            name: name.clone(),
            units: units
                .iter()
                .map(|u| UnitRef {
                    title: u.title.clone(),
                    content: u.content.clone(),
                    examples: u
                        .code_examples
                        .iter()
                        .take(REFERENCE_EXAMPLE_LIMIT)
                        .cloned()
                        .collect(),
                })
                .collect(),
        })
        .collect();

    let api_units = request
        .units
        .iter()
        .filter(|u| u.unit_type == UnitType::Api)
        .map(|u| {
            let reference = u.api_reference.clone().unwrap_or_default();
            ApiUnitRef {
                title: u.title.clone(),
                signature: reference.signature,
                parameters: reference.parameters,
                returns: reference.returns,
                example: reference.example,
                excerpt: u.content.chars().take(API_EXCERPT_LEN).collect(),
            }
        })
        .collect();

    ReferenceContext {
        name: request.name.to_string(),
        categories,
        api_units,
    }
}

fn examples_context(request: &BuildRequest) -> ExamplesContext {
    ExamplesContext {
        name: request.name.to_string(),
        units: request
            .units
            .iter()
            .filter(|u| !u.code_examples.is_empty())
            .map(|u| ExampleUnit {
                title: u.title.clone(),
                examples: u.code_examples.clone(),
            })
            .collect(),
    }
}

/// Fixed provenance sentence keyed by source kind.
const fn generated_from(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Web => "This skill was generated from crawled web documentation.",
        SourceKind::Repository => "This skill was generated from a GitHub repository.",
        SourceKind::Pdf => "This skill was generated from a PDF document.",
    }
}

fn emit_blocks(
    files: &mut Vec<PackageFile>,
    blocks: &[&CodeBlock],
    directory: &str,
    default_stem: &str,
    extension: impl Fn(&CodeBlock) -> String,
) {
    let mut names = NameAllocator::new();
    for (index, block) in blocks.iter().enumerate() {
        let stem = block
            .title
            .as_deref()
            .and_then(slugify)
            .unwrap_or_else(|| positional_stem(default_stem, index));
        let filename = names.allocate(&stem, &extension(block));
        files.push(PackageFile::new(
            format!("{directory}/{filename}"),
            block.code.clone(),
        ));
    }
}

/// `helper`, `helper_2`, `helper_3`, and so on.
fn positional_stem(base: &str, index: usize) -> String {
    if index == 0 {
        base.to_string()
    } else {
        format!("{base}_{}", index + 1)
    }
}

/// Extension from the block's inferred filename, else its language, else
/// `txt`.
fn script_extension(block: &CodeBlock) -> String {
    if let Some(filename) = block.filename.as_deref() {
        if let Some((stem, ext)) = filename.rsplit_once('.') {
            if !stem.is_empty() && !ext.is_empty() {
                return ext.to_string();
            }
        }
    }
    block
        .language
        .as_deref()
        .and_then(extension_for)
        .unwrap_or("txt")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillforge_core::ApiReference;

    fn builder() -> PackageBuilder {
        PackageBuilder::new().unwrap()
    }

    fn request(units: Vec<DocUnit>) -> BuildRequest {
        BuildRequest {
            name: SkillName::new("react-docs").unwrap(),
            description: "React documentation skill".to_string(),
            units,
            kind: SourceKind::Web,
            source_url: Some("https://react.dev".to_string()),
        }
    }

    fn script_block(title: Option<&str>, language: Option<&str>) -> CodeBlock {
        CodeBlock {
            code: "print('hi')".to_string(),
            language: language.map(str::to_string),
            filename: None,
            is_script: true,
            is_template: false,
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_units_yield_descriptor_only() {
        let package = builder().build(&request(Vec::new())).unwrap();
        let paths: Vec<&str> = package.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["SKILL.md"]);
        assert_eq!(package.stats.total_pages, 0);
        assert_eq!(package.stats.categories, 0);
    }

    #[test]
    fn test_file_order_is_canonical() {
        let units = vec![
            DocUnit::new(1, "s", "Guide", "body", UnitType::Guide, "u")
                .with_category("basics")
                .with_code(
                    vec!["print('hi')".to_string()],
                    vec![
                        script_block(None, Some("python")),
                        CodeBlock {
                            code: "Hello {{name}}".to_string(),
                            language: None,
                            filename: None,
                            is_script: false,
                            is_template: true,
                            title: None,
                        },
                    ],
                ),
        ];
        let package = builder().build(&request(units)).unwrap();
        let paths: Vec<&str> = package.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "SKILL.md",
                "reference.md",
                "examples.md",
                "scripts/helper.py",
                "templates/template.txt",
            ]
        );
    }

    #[test]
    fn test_skill_document_content() {
        let units = vec![
            DocUnit::new(1, "s", "Getting Started", "Install the package.", UnitType::Guide, "u")
                .with_category("basics"),
            DocUnit::new(2, "s", "useState", "Returns stateful value.", UnitType::Api, "u"),
        ];
        let package = builder().build(&request(units)).unwrap();
        let skill = &package.files[0].content;
        assert!(skill.starts_with("# react-docs"));
        assert!(skill.contains("This skill was generated from crawled web documentation."));
        assert!(skill.contains("Total pages: 2"));
        assert!(skill.contains("API references: 1"));
        assert!(skill.contains("Guides: 1"));
        assert!(skill.contains("Generated from: https://react.dev"));
        assert!(skill.contains("**basics**: 1 pages"));
        assert!(skill.contains("**general**: 1 pages"));
        assert!(skill.contains("## Getting Started"));
        assert!(skill.contains("Install the package...."));
        assert!(skill.contains("## Key Topics"));
    }

    #[test]
    fn test_skill_document_omits_absent_blocks() {
        let units = vec![DocUnit::new(1, "s", "Deep Dive", "body", UnitType::Api, "u")];
        let mut req = request(units);
        req.source_url = None;
        let package = builder().build(&req).unwrap();
        let skill = &package.files[0].content;
        assert!(!skill.contains("## Source"));
        assert!(!skill.contains("## Getting Started"));
        assert!(!skill.contains("## Key Topics"));
    }

    #[test]
    fn test_getting_started_first_match_wins() {
        let units = vec![
            DocUnit::new(1, "s", "Quick Start", "first", UnitType::Guide, "u"),
            DocUnit::new(2, "s", "Introduction", "second", UnitType::Guide, "u"),
        ];
        let package = builder().build(&request(units)).unwrap();
        assert!(package.files[0].content.contains("### Quick Start"));
        assert!(!package.files[0].content.contains("### Introduction"));
    }

    #[test]
    fn test_key_topics_capped_at_five() {
        let units: Vec<DocUnit> = (0..8)
            .map(|i| DocUnit::new(i, "s", format!("Topic {i}"), "body", UnitType::Guide, "u"))
            .collect();
        let package = builder().build(&request(units)).unwrap();
        let skill = &package.files[0].content;
        assert!(skill.contains("**Topic 4**"));
        assert!(!skill.contains("**Topic 5**"));
    }

    #[test]
    fn test_reference_truncates_examples_to_three() {
        let examples: Vec<String> = (0..5).map(|i| format!("example_{i}")).collect();
        let units = vec![DocUnit::new(1, "s", "Guide", "body", UnitType::Guide, "u")
            .with_code(examples, vec![])];
        let package = builder().build(&request(units)).unwrap();
        let reference = &package.files[1].content;
        assert!(reference.contains("example_2"));
        assert!(!reference.contains("example_3"));
        let examples_doc = &package.files[2].content;
        assert!(examples_doc.contains("example_3"));
        assert!(examples_doc.contains("example_4"));
    }

    #[test]
    fn test_reference_api_section() {
        let reference = ApiReference {
            signature: Some("useState(initial)".to_string()),
            parameters: vec!["initial: the initial state".to_string()],
            returns: Some("a stateful value and a setter".to_string()),
            example: Some("const [n, setN] = useState(0)".to_string()),
        };
        let units = vec![
            DocUnit::new(1, "s", "useState", &"x".repeat(600), UnitType::Api, "u")
                .with_api_reference(reference),
        ];
        let package = builder().build(&request(units)).unwrap();
        let doc = &package.files[1].content;
        assert!(doc.contains("## API Reference"));
        assert!(doc.contains("**Signature:**"));
        assert!(doc.contains("useState(initial)"));
        assert!(doc.contains("- initial: the initial state"));
        assert!(doc.contains("**Returns:** a stateful value and a setter"));
        assert!(doc.contains(&"x".repeat(500)));
        assert!(!doc.contains(&"x".repeat(501)));
    }

    #[test]
    fn test_no_examples_document_without_code() {
        let units = vec![DocUnit::new(1, "s", "Guide", "body", UnitType::Guide, "u")];
        let package = builder().build(&request(units)).unwrap();
        assert!(package.files.iter().all(|f| f.path != "examples.md"));
    }

    #[test]
    fn test_script_named_from_slugified_title() {
        let units = vec![DocUnit::new(1, "s", "T", "c", UnitType::Example, "").with_code(
            vec![],
            vec![script_block(Some("Fetch User Data"), Some("python"))],
        )];
        let package = builder().build(&request(units)).unwrap();
        assert!(
            package
                .files
                .iter()
                .any(|f| f.path == "scripts/fetch_user_data.py")
        );
    }

    #[test]
    fn test_untitled_scripts_take_positional_names() {
        let units = vec![DocUnit::new(1, "s", "T", "c", UnitType::Example, "").with_code(
            vec![],
            vec![
                script_block(None, Some("python")),
                script_block(None, Some("bash")),
            ],
        )];
        let package = builder().build(&request(units)).unwrap();
        let paths: Vec<&str> = package.files.iter().map(|f| f.path.as_str()).collect();
        assert!(paths.contains(&"scripts/helper.py"));
        assert!(paths.contains(&"scripts/helper_2.sh"));
    }

    #[test]
    fn test_colliding_script_names_get_suffixes() {
        let units = vec![DocUnit::new(1, "s", "T", "c", UnitType::Example, "").with_code(
            vec![],
            vec![
                script_block(Some("Setup"), Some("python")),
                script_block(Some("Setup"), Some("python")),
            ],
        )];
        let package = builder().build(&request(units)).unwrap();
        let paths: Vec<&str> = package.files.iter().map(|f| f.path.as_str()).collect();
        assert!(paths.contains(&"scripts/setup.py"));
        assert!(paths.contains(&"scripts/setup_1.py"));
    }

    #[test]
    fn test_script_extension_prefers_inferred_filename() {
        let block = CodeBlock {
            filename: Some("run.sh".to_string()),
            ..script_block(None, Some("python"))
        };
        assert_eq!(script_extension(&block), "sh");
        assert_eq!(script_extension(&script_block(None, Some("python"))), "py");
        assert_eq!(script_extension(&script_block(None, None)), "txt");
    }

    #[test]
    fn test_stats_summed_across_units() {
        let units = vec![
            DocUnit::new(1, "s", "A", "a", UnitType::Guide, "u")
                .with_category("one")
                .with_code(vec!["x".to_string(), "y".to_string()], vec![]),
            DocUnit::new(2, "s", "B", "b", UnitType::Guide, "u")
                .with_category("two")
                .with_code(vec!["z".to_string()], vec![]),
        ];
        let package = builder().build(&request(units)).unwrap();
        assert_eq!(package.stats.total_pages, 2);
        assert_eq!(package.stats.categories, 2);
        assert_eq!(package.stats.code_examples, 3);
    }

    #[test]
    fn test_rebuild_is_deterministic_modulo_id_and_timestamp() {
        let units = vec![
            DocUnit::new(1, "s", "Getting Started", "Install it.", UnitType::Guide, "u")
                .with_category("basics")
                .with_code(
                    vec!["pip install".to_string()],
                    vec![script_block(None, Some("python"))],
                ),
            DocUnit::new(2, "s", "useState", "State hook.", UnitType::Api, "u"),
        ];
        let req = request(units);
        let first = builder().build(&req).unwrap();
        let second = builder().build(&req).unwrap();
        assert_ne!(first.id, second.id);
        let strip = |p: &SkillPackage| {
            p.files
                .iter()
                .map(|f| (f.path.clone(), strip_footer(&f.content)))
                .collect::<Vec<_>>()
        };
        assert_eq!(strip(&first), strip(&second));
        assert_eq!(first.stats, second.stats);
    }

    fn strip_footer(content: &str) -> String {
        content
            .lines()
            .filter(|line| !line.starts_with("Generated at "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
