//! Category grouping, filename slugs, and script/template partitioning.

use skillforge_core::{CodeBlock, DocUnit};
use std::collections::HashSet;

/// Bucket name used for units that carry no category.
pub const DEFAULT_CATEGORY: &str = "general";

/// Maximum slug length, in characters.
const SLUG_MAX_LEN: usize = 20;

/// Groups units by category, preserving first-seen category order.
///
/// Units without a category land in the [`DEFAULT_CATEGORY`] bucket. Unit
/// order within each bucket follows the input order.
///
/// # Examples
///
/// ```
/// use skillforge_build::group_by_category;
/// use skillforge_core::{DocUnit, UnitType};
///
/// let units = vec![
///     DocUnit::new(1, "s", "A", "a", UnitType::Guide, "").with_category("setup"),
///     DocUnit::new(2, "s", "B", "b", UnitType::Guide, ""),
///     DocUnit::new(3, "s", "C", "c", UnitType::Guide, "").with_category("setup"),
/// ];
/// let groups = group_by_category(&units);
/// assert_eq!(groups[0].0, "setup");
/// assert_eq!(groups[0].1.len(), 2);
/// assert_eq!(groups[1].0, "general");
/// ```
#[must_use]
pub fn group_by_category(units: &[DocUnit]) -> Vec<(String, Vec<&DocUnit>)> {
    let mut groups: Vec<(String, Vec<&DocUnit>)> = Vec::new();
    for unit in units {
        let category = unit.category.as_deref().unwrap_or(DEFAULT_CATEGORY);
        match groups.iter_mut().find(|(name, _)| name == category) {
            Some((_, bucket)) => bucket.push(unit),
            None => groups.push((category.to_string(), vec![unit])),
        }
    }
    groups
}

/// Turns a block title into a lowercase underscore slug of at most 20
/// characters.
///
/// Runs of non-alphanumeric characters collapse into one underscore.
/// Returns `None` when nothing usable remains.
#[must_use]
pub fn slugify(title: &str) -> Option<String> {
    let mut slug = String::new();
    let mut pending_separator = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            slug.push(c.to_ascii_lowercase());
            pending_separator = false;
        } else {
            pending_separator = true;
        }
        if slug.chars().count() >= SLUG_MAX_LEN {
            break;
        }
    }
    let slug: String = slug.chars().take(SLUG_MAX_LEN).collect();
    let slug = slug.trim_end_matches('_').to_string();
    if slug.is_empty() { None } else { Some(slug) }
}

/// Splits every enriched code block across the given units into scripts and
/// templates.
///
/// Template classification wins when both flags are set. Blocks that are
/// neither scripts nor templates are dropped. Output order follows unit
/// order, then block order within each unit.
#[must_use]
pub fn partition_blocks(units: &[DocUnit]) -> (Vec<&CodeBlock>, Vec<&CodeBlock>) {
    let mut scripts = Vec::new();
    let mut templates = Vec::new();
    for block in units.iter().flat_map(|unit| unit.code_blocks.iter()) {
        if block.is_template {
            templates.push(block);
        } else if block.is_script {
            scripts.push(block);
        }
    }
    (scripts, templates)
}

/// Allocates unique filenames within one output directory.
///
/// Collisions are resolved by appending `_1`, `_2`, and so on before the
/// extension.
#[derive(Debug, Default)]
pub struct NameAllocator {
    used: HashSet<String>,
}

impl NameAllocator {
    /// Creates an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a unique `stem.ext` filename, recording it as taken.
    pub fn allocate(&mut self, stem: &str, ext: &str) -> String {
        let mut candidate = format!("{stem}.{ext}");
        let mut counter = 0_usize;
        while self.used.contains(&candidate) {
            counter += 1;
            candidate = format!("{stem}_{counter}.{ext}");
        }
        self.used.insert(candidate.clone());
        candidate
    }
}
