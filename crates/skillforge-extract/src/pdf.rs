//! PDF text segmentation into titled sections and documentation units.
//!
//! PDF text arrives as one flat string with no structural markup, so the
//! segmenter reconstructs sections from heading-shaped lines and assigns
//! each section a synthetic page number derived from its line position.

use crate::code_blocks::{MIN_CODE_LEN, enrich};
use regex::Regex;
use skillforge_core::{CodeBlock, DocUnit, UnitType};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Title used when neither metadata nor the leading lines yield one.
const UNTITLED: &str = "Untitled Document";

/// Section title for content preceding the first detected heading.
const IMPLICIT_TITLE: &str = "Introduction";

/// Section title used when the whole document has no detectable headings.
const FALLBACK_TITLE: &str = "Document Content";

/// Minimum trimmed length, in characters, for a section to become a unit.
const MIN_SECTION_LEN: usize = 50;

/// Maximum length of a heading-shaped title-case line.
const MAX_TITLE_CASE_LEN: usize = 50;

static NUMBERED_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)*\.?\s+[A-Z]").expect("valid regex"));
static MARKER_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:Chapter|Section|Part)\s+\d+").expect("valid regex"));
static CODE_OPENER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:Example|Code|Listing)\b:?").expect("valid regex"));

/// One segmented slice of the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfSection {
    /// Heading line that opened the section.
    pub title: String,
    /// Accumulated body text, trimmed.
    pub body: String,
    /// Synthetic page number of the heading line, starting at 1.
    pub page: usize,
    /// Raw code strings captured inside the section.
    pub code: Vec<String>,
}

/// Derives a document title.
///
/// The metadata `Title` entry wins when present and non-blank. Otherwise
/// the first 10 non-blank lines are scanned for a heading-shaped line of
/// 3 to 100 characters that does not end in `.` or `,`. Falls back to
/// `"Untitled Document"`.
#[must_use]
pub fn derive_title(text: &str, metadata: &HashMap<String, String>) -> String {
    if let Some(title) = metadata.get("Title") {
        let title = title.trim();
        if !title.is_empty() {
            return title.to_string();
        }
    }
    for line in text.lines().filter(|l| !l.trim().is_empty()).take(10) {
        let line = line.trim();
        let len = line.chars().count();
        if (3..=100).contains(&len) && !line.ends_with('.') && !line.ends_with(',') {
            return line.to_string();
        }
    }
    UNTITLED.to_string()
}

/// Segments flat document text into sections.
///
/// Lines are scanned once. A fence (``` or `~~~`) or an
/// `Example`/`Code`/`Listing` prefix opens code capture, which accumulates
/// lines until a closing fence; an unclosed capture flushes at end of
/// input. Outside capture, a line matching any heading shape closes the
/// current section and opens a new one. Content before the first heading
/// becomes an implicit `"Introduction"` section; a document with no
/// headings at all becomes a single `"Document Content"` section.
#[must_use]
pub fn segment_sections(text: &str, page_count: usize) -> Vec<PdfSection> {
    let lines: Vec<&str> = text.lines().collect();
    let lines_per_page = lines.len().div_ceil(page_count.max(1)).max(1);

    let mut sections: Vec<PdfSection> = Vec::new();
    let mut current: Option<PdfSection> = None;
    let mut intro_body: Vec<&str> = Vec::new();
    let mut intro_code: Vec<String> = Vec::new();
    let mut capture: Option<Vec<&str>> = None;

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if capture.is_some() {
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                if let Some(captured) = capture.take() {
                    push_code(&captured, &mut current, &mut intro_code);
                }
            } else if let Some(captured) = capture.as_mut() {
                captured.push(line);
            }
            continue;
        }

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") || CODE_OPENER_RE.is_match(trimmed)
        {
            capture = Some(Vec::new());
            continue;
        }

        if is_heading(trimmed) {
            if let Some(section) = current.take() {
                sections.push(finalize(section));
            }
            current = Some(PdfSection {
                title: trimmed.to_string(),
                body: String::new(),
                page: index / lines_per_page + 1,
                code: Vec::new(),
            });
            continue;
        }

        match current.as_mut() {
            Some(section) => {
                section.body.push_str(line);
                section.body.push('\n');
            }
            None => intro_body.push(line),
        }
    }

    if let Some(captured) = capture.take() {
        push_code(&captured, &mut current, &mut intro_code);
    }
    if let Some(section) = current.take() {
        sections.push(finalize(section));
    }

    let intro = intro_body.join("\n").trim().to_string();
    if sections.is_empty() {
        if intro.is_empty() && intro_code.is_empty() {
            return Vec::new();
        }
        return vec![PdfSection {
            title: FALLBACK_TITLE.to_string(),
            body: intro,
            page: 1,
            code: intro_code,
        }];
    }
    if !intro.is_empty() || !intro_code.is_empty() {
        sections.insert(
            0,
            PdfSection {
                title: IMPLICIT_TITLE.to_string(),
                body: intro,
                page: 1,
                code: intro_code,
            },
        );
    }
    sections
}

/// Extracts documentation units from decoded PDF text.
///
/// Returns the derived document title together with one unit per section
/// whose body reaches [`MIN_SECTION_LEN`] characters. Captured code runs
/// through the shared enrichment pipeline; a unit that keeps any code is
/// typed [`UnitType::Example`].
#[must_use]
pub fn extract_units(
    name: &str,
    text: &str,
    page_count: usize,
    metadata: &HashMap<String, String>,
) -> (String, Vec<DocUnit>) {
    let title = derive_title(text, metadata);
    let sections = segment_sections(text, page_count);

    let mut units = Vec::new();
    let mut next_id: u64 = 1;
    for section in sections {
        if section.body.chars().count() < MIN_SECTION_LEN {
            continue;
        }
        let blocks: Vec<CodeBlock> = section
            .code
            .iter()
            .filter(|code| code.chars().count() >= MIN_CODE_LEN)
            .enumerate()
            .map(|(index, code)| enrich(code, None, None, index))
            .collect();
        let unit_type = if blocks.is_empty() {
            UnitType::Guide
        } else {
            UnitType::Example
        };
        let examples: Vec<String> = blocks.iter().map(|b| b.code.clone()).collect();
        let unit = DocUnit::new(
            next_id,
            name,
            section.title,
            section.body,
            unit_type,
            format!("#page-{}", section.page),
        )
        .with_code(examples, blocks);
        next_id += 1;
        units.push(unit);
    }

    (title, units)
}

fn finalize(mut section: PdfSection) -> PdfSection {
    section.body = section.body.trim().to_string();
    section
}

fn push_code(lines: &[&str], current: &mut Option<PdfSection>, intro_code: &mut Vec<String>) {
    let code = lines.join("\n").trim().to_string();
    if code.is_empty() {
        return;
    }
    match current {
        Some(section) => section.code.push(code),
        None => intro_code.push(code),
    }
}

fn is_heading(line: &str) -> bool {
    if line.is_empty() {
        return false;
    }
    NUMBERED_HEADING_RE.is_match(line)
        || is_all_caps(line)
        || MARKER_HEADING_RE.is_match(line)
        || is_short_title_case(line)
}

fn is_all_caps(line: &str) -> bool {
    line.chars().count() > 5
        && line.chars().all(|c| c.is_ascii_uppercase() || c == ' ')
        && line.chars().any(|c| c.is_ascii_uppercase())
}

fn is_short_title_case(line: &str) -> bool {
    if line.chars().count() >= MAX_TITLE_CASE_LEN || line.ends_with('.') || line.ends_with(',') {
        return false;
    }
    let mut words = line.split_whitespace().peekable();
    if words.peek().is_none() {
        return false;
    }
    words.all(|word| word.chars().next().is_some_and(|c| c.is_ascii_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_numbered_headings() {
        let text = "1. Introduction\nHello world.\n2. Setup\nDo the thing.";
        let sections = segment_sections(text, 1);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "1. Introduction");
        assert_eq!(sections[0].body, "Hello world.");
        assert_eq!(sections[1].title, "2. Setup");
        assert_eq!(sections[1].body, "Do the thing.");
    }

    #[test]
    fn test_implicit_introduction_before_first_heading() {
        let text = "Some leading prose here.\n1. Setup\nInstall everything first.";
        let sections = segment_sections(text, 1);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Introduction");
        assert_eq!(sections[0].body, "Some leading prose here.");
        assert_eq!(sections[1].title, "1. Setup");
    }

    #[test]
    fn test_document_content_fallback() {
        let text = "just lowercase prose.\nmore lowercase prose, never a heading.";
        let sections = segment_sections(text, 1);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Document Content");
        assert!(sections[0].body.contains("just lowercase prose."));
    }

    #[test]
    fn test_all_caps_heading() {
        let text = "GETTING STARTED\nrun the installer now.";
        let sections = segment_sections(text, 1);
        assert_eq!(sections[0].title, "GETTING STARTED");
    }

    #[test]
    fn test_chapter_marker_heading() {
        let text = "Chapter 3 covers deployment\nship it somewhere.";
        let sections = segment_sections(text, 1);
        assert_eq!(sections[0].title, "Chapter 3 covers deployment");
    }

    #[test]
    fn test_short_title_case_heading() {
        let text = "Advanced Configuration\nall the knobs live here.";
        let sections = segment_sections(text, 1);
        assert_eq!(sections[0].title, "Advanced Configuration");
    }

    #[test]
    fn test_sentence_lines_are_not_headings() {
        let text = "1. Overview\nThis Line Ends With A Period.\nand this one is lowercase.";
        let sections = segment_sections(text, 1);
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn test_fenced_code_attaches_to_section() {
        let text = "1. Usage\nrun it like so.\n```\nprint('hello world')\n```\nthat is all.";
        let sections = segment_sections(text, 1);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].code, vec!["print('hello world')"]);
        assert!(sections[0].body.contains("that is all."));
    }

    #[test]
    fn test_example_prefix_opens_capture() {
        let text = "1. Usage\nExample:\nx = load_config()\nrun(x)\n```\nmore prose after.";
        let sections = segment_sections(text, 1);
        assert_eq!(sections[0].code, vec!["x = load_config()\nrun(x)"]);
    }

    #[test]
    fn test_unclosed_capture_flushes_at_end() {
        let text = "1. Usage\n```\nprint('never closed')";
        let sections = segment_sections(text, 1);
        assert_eq!(sections[0].code, vec!["print('never closed')"]);
    }

    #[test]
    fn test_synthetic_page_numbers() {
        // 4 lines over 2 pages puts line index 2 on page 2.
        let text = "1. First\nbody line.\n2. Second\nbody line.";
        let sections = segment_sections(text, 2);
        assert_eq!(sections[0].page, 1);
        assert_eq!(sections[1].page, 2);
    }

    #[test]
    fn test_empty_text_yields_no_sections() {
        assert!(segment_sections("", 1).is_empty());
    }

    #[test]
    fn test_derive_title_from_metadata() {
        let metadata = HashMap::from([("Title".to_string(), "User Manual".to_string())]);
        assert_eq!(derive_title("ignored text", &metadata), "User Manual");
    }

    #[test]
    fn test_derive_title_from_leading_lines() {
        let text = "\n\nGetting Started Guide\nsome body text follows.";
        assert_eq!(derive_title(text, &HashMap::new()), "Getting Started Guide");
    }

    #[test]
    fn test_derive_title_skips_sentence_lines() {
        let text = "This first line ends with a period.\nReference Handbook\nmore.";
        assert_eq!(derive_title(text, &HashMap::new()), "Reference Handbook");
    }

    #[test]
    fn test_derive_title_fallback() {
        assert_eq!(derive_title("a.\nb.\nc.", &HashMap::new()), "Untitled Document");
    }

    #[test]
    fn test_extract_units_applies_length_gate() {
        let text = "1. Kept\nThis body is comfortably longer than fifty characters in total.\n2. Dropped\ntiny.";
        let (_, units) = extract_units("manual", text, 1, &HashMap::new());
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].title, "1. Kept");
        assert_eq!(units[0].id, 1);
    }

    #[test]
    fn test_extract_units_page_url_and_type() {
        let text = "1. Usage\nThe section body is long enough to pass the length gate easily.\n```\nresult = client.fetch(url)\n```";
        let (title, units) = extract_units("manual", text, 1, &HashMap::new());
        assert_eq!(title, "1. Usage");
        assert_eq!(units[0].url, "#page-1");
        assert_eq!(units[0].unit_type, UnitType::Example);
        assert_eq!(units[0].code_examples, vec!["result = client.fetch(url)"]);
    }

    #[test]
    fn test_extract_units_returns_derived_title() {
        let metadata = HashMap::from([("Title".to_string(), "API Handbook".to_string())]);
        let text = "1. Intro\nA body long enough to clear the fifty character section gate.";
        let (title, units) = extract_units("manual", text, 1, &metadata);
        assert_eq!(title, "API Handbook");
        assert_eq!(units.len(), 1);
    }
}
