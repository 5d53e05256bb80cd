//! Text classifiers for documentation content.
//!
//! Pure, synchronous functions that label chunks of text or HTML-derived
//! content: page type, grouping category, code language, script-ness, and
//! template-ness. Shared by every source adapter.
//!
//! The classifiers are heuristic and their rule order is deliberate;
//! overlapping rules resolve by first match, and the precedence is part of
//! the tested behavior rather than an implementation detail.
//!
//! # Examples
//!
//! ```
//! use skillforge_classify::{classify_page_type, normalize_language};
//! use skillforge_core::UnitType;
//!
//! assert_eq!(classify_page_type("/api/users", ""), UnitType::Api);
//! assert_eq!(normalize_language(Some("py")), Some("python".to_string()));
//! ```

mod language;
mod page_type;
mod script;

pub use language::{extension_for, infer_filename, normalize_language, sniff_language};
pub use page_type::{classify_category, classify_page_type};
pub use script::{is_complete_script, is_template_code};
