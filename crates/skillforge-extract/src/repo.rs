//! Repository snapshot to documentation unit conversion.
//!
//! The repository adapter collects whatever API data it can reach into a
//! [`RepoSnapshot`]; [`build_units`] then renders one unit per logical
//! section in a fixed order. Section order determines unit ids, so it is
//! part of the tested behavior.

use crate::code_blocks::extract_fenced;
use skillforge_core::traits::{RepoIssue, RepoMetadata, RepoRelease, RepoTreeEntry};
use skillforge_core::{DocUnit, UnitType};
use std::collections::HashMap;
use std::fmt::Write as _;

/// Maximum number of closed issues rendered into the closed-issues unit.
pub const CLOSED_ISSUE_LIMIT: usize = 20;

/// Changelog file candidates, tried in priority order; the first hit wins.
pub const CHANGELOG_CANDIDATES: [&str; 4] =
    ["CHANGELOG.md", "CHANGELOG", "HISTORY.md", "CHANGES.md"];

/// Maximum rendered tree depth, counted from 1 at the repository root.
const MAX_TREE_DEPTH: usize = 3;

/// Maximum rendered entries per directory level.
const MAX_SIBLINGS: usize = 100;

/// Everything the repository adapter managed to fetch for one repository.
///
/// Every field is optional or emptiable; [`build_units`] renders only the
/// sections whose data is present, so partial API failures degrade to a
/// smaller unit list instead of an error.
#[derive(Debug, Clone, Default)]
pub struct RepoSnapshot {
    /// Top-level metadata, when the metadata call succeeded.
    pub metadata: Option<RepoMetadata>,
    /// Per-language byte counts.
    pub languages: HashMap<String, u64>,
    /// Decoded README text.
    pub readme: Option<String>,
    /// Recursive file tree.
    pub tree: Vec<RepoTreeEntry>,
    /// Open issues; `None` means issues were not fetched at all.
    pub open_issues: Option<Vec<RepoIssue>>,
    /// Recently closed issues; `None` means issues were not fetched at all.
    pub closed_issues: Option<Vec<RepoIssue>>,
    /// Published releases, most recent first.
    pub releases: Vec<RepoRelease>,
    /// Decoded changelog text, from the first changelog candidate found.
    pub changelog: Option<String>,
}

/// Renders a snapshot into documentation units.
///
/// Sections appear in a fixed order: README, repository overview, file
/// structure, open issues, recently closed issues, releases, changelog.
/// Sections with no data are skipped; unit ids stay sequential over the
/// sections that remain. Fenced code blocks inside any section body go
/// through the shared code-block pipeline, and a unit that carries code is
/// typed [`UnitType::Example`] instead of [`UnitType::Guide`].
#[must_use]
pub fn build_units(name: &str, snapshot: &RepoSnapshot) -> Vec<DocUnit> {
    let url = snapshot
        .metadata
        .as_ref()
        .map(|m| m.html_url.clone())
        .unwrap_or_default();

    let mut units = Vec::new();
    let mut next_id: u64 = 1;
    let mut push = |units: &mut Vec<DocUnit>, title: &str, content: String| {
        if content.trim().is_empty() {
            return;
        }
        let blocks = extract_fenced(&content);
        let unit_type = if blocks.is_empty() {
            UnitType::Guide
        } else {
            UnitType::Example
        };
        let examples: Vec<String> = blocks.iter().map(|b| b.code.clone()).collect();
        let unit = DocUnit::new(next_id, name, title, content, unit_type, url.clone())
            .with_code(examples, blocks);
        next_id += 1;
        units.push(unit);
    };

    if let Some(readme) = &snapshot.readme {
        push(&mut units, "README", readme.clone());
    }

    let overview = render_overview(snapshot);
    push(&mut units, "Repository Overview", overview);

    if !snapshot.tree.is_empty() {
        push(&mut units, "File Structure", render_tree(&snapshot.tree));
    }

    if let Some(open) = &snapshot.open_issues {
        push(&mut units, "Open Issues", render_issues(open));
    }
    if let Some(closed) = &snapshot.closed_issues {
        let recent: Vec<RepoIssue> = closed.iter().take(CLOSED_ISSUE_LIMIT).cloned().collect();
        push(&mut units, "Recently Closed Issues", render_issues(&recent));
    }

    if !snapshot.releases.is_empty() {
        push(&mut units, "Releases", render_releases(&snapshot.releases));
    }

    if let Some(changelog) = &snapshot.changelog {
        push(&mut units, "Changelog", changelog.clone());
    }

    units
}

fn render_overview(snapshot: &RepoSnapshot) -> String {
    let mut out = String::new();

    if let Some(meta) = &snapshot.metadata {
        if let Some(description) = &meta.description {
            out.push_str(description);
            out.push_str("\n\n");
        }
        let _ = writeln!(out, "Stars: {}", meta.stars);
        let _ = writeln!(out, "Forks: {}", meta.forks);
        if let Some(language) = &meta.language {
            let _ = writeln!(out, "Primary language: {language}");
        }
    }

    if !snapshot.languages.is_empty() {
        let total: u64 = snapshot.languages.values().sum();
        if total > 0 {
            let mut ranked: Vec<(&String, &u64)> = snapshot.languages.iter().collect();
            ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("Language breakdown:\n");
            for (language, bytes) in ranked {
                let tenths = (bytes * 1000 + total / 2) / total;
                let _ = writeln!(out, "- {language}: {}.{}%", tenths / 10, tenths % 10);
            }
        }
    }

    out
}

/// Renders the file tree depth-first with two-space indentation.
///
/// Directories carry a trailing slash. Levels deeper than
/// [`MAX_TREE_DEPTH`] and siblings past [`MAX_SIBLINGS`] are dropped.
fn render_tree(tree: &[RepoTreeEntry]) -> String {
    let mut children: HashMap<&str, Vec<&RepoTreeEntry>> = HashMap::new();
    for entry in tree {
        let parent = entry.path.rsplit_once('/').map_or("", |(parent, _)| parent);
        children.entry(parent).or_default().push(entry);
    }
    let mut out = String::new();
    render_level(&children, "", 1, &mut out);
    out
}

fn render_level(
    children: &HashMap<&str, Vec<&RepoTreeEntry>>,
    parent: &str,
    depth: usize,
    out: &mut String,
) {
    if depth > MAX_TREE_DEPTH {
        return;
    }
    let Some(entries) = children.get(parent) else {
        return;
    };
    for entry in entries.iter().take(MAX_SIBLINGS) {
        let name = entry
            .path
            .rsplit_once('/')
            .map_or(entry.path.as_str(), |(_, name)| name);
        out.push_str(&"  ".repeat(depth - 1));
        out.push_str(name);
        if entry.is_dir {
            out.push('/');
        }
        out.push('\n');
        if entry.is_dir {
            render_level(children, &entry.path, depth + 1, out);
        }
    }
}

fn render_issues(issues: &[RepoIssue]) -> String {
    let mut out = String::new();
    for issue in issues {
        let _ = writeln!(out, "#{} {}", issue.number, issue.title);
        if let Some(body) = &issue.body {
            if !body.trim().is_empty() {
                out.push_str(body.trim());
                out.push('\n');
            }
        }
        out.push('\n');
    }
    out
}

fn render_releases(releases: &[RepoRelease]) -> String {
    let mut out = String::new();
    for release in releases {
        out.push_str("## ");
        out.push_str(&release.tag);
        if let Some(name) = &release.name {
            if !name.is_empty() && *name != release.tag {
                let _ = write!(out, " - {name}");
            }
        }
        if let Some(published) = release.published_at {
            let _ = write!(out, " ({})", published.format("%Y-%m-%d"));
        }
        out.push('\n');
        if let Some(body) = &release.body {
            if !body.trim().is_empty() {
                out.push_str(body.trim());
                out.push('\n');
            }
        }
        out.push('\n');
    }
    out
}
