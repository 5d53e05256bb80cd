//! Skill package assembly.
//!
//! Turns an ordered list of documentation units into a complete package:
//! a `SKILL.md` descriptor, a combined `reference.md`, an `examples.md`
//! when code examples exist, plus script and template files emitted from
//! enriched code blocks. Rendering goes through an embedded Handlebars
//! template set in strict mode.
//!
//! # Examples
//!
//! ```
//! use skillforge_build::{BuildRequest, PackageBuilder};
//! use skillforge_core::{DocUnit, SkillName, SourceKind, UnitType};
//!
//! # fn example() -> Result<(), skillforge_core::Error> {
//! let builder = PackageBuilder::new()?;
//! let units = vec![DocUnit::new(
//!     1,
//!     "react-docs",
//!     "Getting Started",
//!     "Install the package.",
//!     UnitType::Guide,
//!     "https://react.dev/learn",
//! )];
//! let package = builder.build(&BuildRequest {
//!     name: SkillName::new("react-docs")?,
//!     description: "React documentation".to_string(),
//!     units,
//!     kind: SourceKind::Web,
//!     source_url: Some("https://react.dev".to_string()),
//! })?;
//! assert_eq!(package.files[0].path, "SKILL.md");
//! assert_eq!(package.files[1].path, "reference.md");
//! # Ok(())
//! # }
//! ```

mod builder;
mod context;
mod engine;
mod grouping;

pub use builder::{BuildRequest, PackageBuilder};
pub use context::{
    ApiUnitRef, CategoryRef, CategorySummary, ExampleUnit, ExamplesContext, GettingStarted,
    ReferenceContext, SkillContext, TopicEntry, UnitRef,
};
pub use engine::TemplateEngine;
pub use grouping::{
    DEFAULT_CATEGORY, NameAllocator, group_by_category, partition_blocks, slugify,
};
