//! Web page extraction: one HTML document to at most one documentation unit.
//!
//! Parsing happens synchronously on an owned HTML string; the parsed
//! document never crosses an await point. Pages failing the quality gate
//! (missing title or fewer than 50 characters of content) are skipped
//! rather than treated as errors.

use crate::code_blocks::{self, MIN_CODE_LEN};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use skillforge_classify::{
    classify_category, classify_page_type, extension_for, normalize_language,
};
use skillforge_core::{ApiReference, CategoryPattern, CodeBlock, DocUnit, SelectorConfig, UnitType};
use std::sync::LazyLock;

/// Minimum normalized content length, in characters, for a page to count.
pub const MIN_CONTENT_LEN: usize = 50;

/// Elements always removed before content resolution.
const DEFAULT_EXCLUSIONS: [&str; 7] =
    ["nav", "header", "footer", ".sidebar", ".navigation", "script", "style"];

/// Content candidates, tried in order after any custom selector.
const CONTENT_CANDIDATES: [&str; 5] = ["article", "main", ".content", ".documentation", "body"];

/// Title fallbacks, tried in order after any custom selector.
const TITLE_FALLBACKS: [&str; 3] = ["h1", "title", "h2"];

/// Default code selector chain; the first selector with usable matches wins.
const DEFAULT_CODE_CHAIN: [&str; 3] = ["pre code", "pre", ".highlight code"];

/// Signature candidates for api-typed pages.
const SIGNATURE_SELECTORS: [&str; 6] =
    [".signature", ".function-signature", ".api-signature", "dt code", "h2 code", "h3 code"];

/// Parameter candidates for api-typed pages.
const PARAMETER_SELECTORS: [&str; 4] = [".parameter", ".param", ".parameters li", ".params li"];

/// Parameter texts longer than this are discarded as prose.
const MAX_PARAMETER_LEN: usize = 100;

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

const BLOCK_TAGS: [&str; 17] = [
    "p", "div", "section", "article", "main", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5",
    "h6", "pre", "br", "blockquote",
];

static LANG_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:language-|lang-|highlight-)(\w+)$").expect("valid regex")
});
static RETURNS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*returns?:\s*(.+)$").expect("valid regex"));
static FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+\.[A-Za-z0-9]{1,8}$").expect("valid regex"));

/// Extracts one documentation unit from a fetched page.
///
/// Returns `None` when the page fails the quality gate: an empty resolved
/// title, or no content candidate reaching [`MIN_CONTENT_LEN`] characters
/// after exclusion removal and whitespace normalization.
#[must_use]
pub fn extract_page(
    id: u64,
    source: &str,
    url: &str,
    html: &str,
    selectors: &SelectorConfig,
    categories: &[CategoryPattern],
) -> Option<DocUnit> {
    let document = Html::parse_document(html);
    let exclusions = exclusion_selectors(selectors);

    let title = resolve_title(&document, selectors);
    let content = resolve_content(&document, selectors, &exclusions)?;
    if title.is_empty() {
        return None;
    }

    let blocks = extract_code(&document, selectors, &exclusions);
    let unit_type = classify_page_type(url, &content);

    let mut unit = DocUnit::new(id, source, title, content, unit_type, url);
    if !blocks.is_empty() {
        let examples = blocks.iter().map(|b| b.code.clone()).collect();
        unit = unit.with_code(examples, blocks);
    }
    if let Some(category) = classify_category(url, categories) {
        unit = unit.with_category(category);
    }
    if unit_type == UnitType::Api {
        let reference = extract_api_reference(&document, &unit.content, &unit.code_examples);
        if !reference.is_empty() {
            unit = unit.with_api_reference(reference);
        }
    }
    Some(unit)
}

/// Collapses whitespace runs within lines and blank-line runs between them.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut blank_pending = false;
    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            blank_pending = !lines.is_empty();
        } else {
            if blank_pending {
                lines.push(String::new());
                blank_pending = false;
            }
            lines.push(collapsed);
        }
    }
    lines.join("\n")
}

fn exclusion_selectors(config: &SelectorConfig) -> Vec<Selector> {
    let mut selectors: Vec<Selector> = DEFAULT_EXCLUSIONS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect();
    if let Some(navigation) = config.navigation.as_deref() {
        if let Ok(selector) = Selector::parse(navigation) {
            selectors.push(selector);
        }
    }
    for custom in &config.exclude {
        if let Ok(selector) = Selector::parse(custom) {
            selectors.push(selector);
        }
    }
    selectors
}

fn resolve_title(document: &Html, config: &SelectorConfig) -> String {
    if let Some(custom) = config.title.as_deref().filter(|s| !s.trim().is_empty()) {
        if let Some(title) = select_first_text(document, custom) {
            return title;
        }
    }
    for fallback in TITLE_FALLBACKS {
        if let Some(title) = select_first_text(document, fallback) {
            return title;
        }
    }
    "Untitled".to_string()
}

fn resolve_content(
    document: &Html,
    config: &SelectorConfig,
    exclusions: &[Selector],
) -> Option<String> {
    let mut candidates: Vec<Selector> = Vec::new();
    if let Some(custom) = config.main_content.as_deref().filter(|s| !s.trim().is_empty()) {
        if let Ok(selector) = Selector::parse(custom) {
            candidates.push(selector);
        }
    }
    candidates.extend(CONTENT_CANDIDATES.iter().filter_map(|s| Selector::parse(s).ok()));

    for selector in &candidates {
        if let Some(element) = document.select(selector).next() {
            let mut raw = String::new();
            collect_text(element, exclusions, &mut raw);
            let normalized = normalize_whitespace(&raw);
            if normalized.chars().count() >= MIN_CONTENT_LEN {
                return Some(normalized);
            }
        }
    }
    None
}

fn collect_text(element: ElementRef<'_>, exclusions: &[Selector], out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if is_excluded(child_element, exclusions) {
                continue;
            }
            collect_text(child_element, exclusions, out);
            if BLOCK_TAGS.contains(&child_element.value().name()) {
                out.push('\n');
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

fn is_excluded(element: ElementRef<'_>, exclusions: &[Selector]) -> bool {
    exclusions.iter().any(|s| s.matches(&element))
}

fn has_excluded_ancestor(element: ElementRef<'_>, exclusions: &[Selector]) -> bool {
    if is_excluded(element, exclusions) {
        return true;
    }
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_excluded(ancestor, exclusions))
}

fn extract_code(
    document: &Html,
    config: &SelectorConfig,
    exclusions: &[Selector],
) -> Vec<CodeBlock> {
    let chain: Vec<String> = config
        .code_blocks
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map_or_else(
            || DEFAULT_CODE_CHAIN.iter().map(ToString::to_string).collect(),
            |custom| custom.split(',').map(|s| s.trim().to_string()).collect(),
        );

    for selector_text in &chain {
        let Ok(selector) = Selector::parse(selector_text) else {
            continue;
        };
        let mut blocks: Vec<CodeBlock> = Vec::new();
        for element in document.select(&selector) {
            if has_excluded_ancestor(element, exclusions) {
                continue;
            }
            let raw = element.text().collect::<String>();
            let code = raw.trim();
            if code.chars().count() < MIN_CODE_LEN {
                continue;
            }
            let language = class_language(element);
            let title = preceding_heading(element);
            let mut block = code_blocks::enrich(code, language.as_deref(), title, blocks.len());
            if let Some(filename) = sibling_filename(element) {
                block.filename = Some(filename);
            }
            blocks.push(block);
        }
        // The chain is a fallback order, not a union; stopping at the first
        // productive selector keeps `pre code` and `pre` from double-counting.
        if !blocks.is_empty() {
            return blocks;
        }
    }
    Vec::new()
}

fn class_language(element: ElementRef<'_>) -> Option<String> {
    element_language(element)
        .or_else(|| element.parent().and_then(ElementRef::wrap).and_then(element_language))
}

fn element_language(element: ElementRef<'_>) -> Option<String> {
    for class in element.value().classes() {
        if let Some(captures) = LANG_CLASS_RE.captures(class) {
            return Some(captures[1].to_string());
        }
    }
    // Unprefixed class tokens count only when they name a known language,
    // otherwise layout classes like "highlight" would be taken as a tag.
    for class in element.value().classes() {
        let normalized = normalize_language(Some(class));
        if normalized.as_deref().is_some_and(|lang| extension_for(lang).is_some()) {
            return normalized;
        }
    }
    element
        .value()
        .attr("data-language")
        .or_else(|| element.value().attr("data-lang"))
        .map(ToString::to_string)
}

/// Returns the element whose siblings are inspected for headings and
/// filenames: the wrapping `pre` when the match is its inner `code`.
fn sibling_anchor(element: ElementRef<'_>) -> ElementRef<'_> {
    element
        .parent()
        .and_then(ElementRef::wrap)
        .filter(|parent| parent.value().name() == "pre")
        .unwrap_or(element)
}

fn preceding_heading(element: ElementRef<'_>) -> Option<String> {
    let anchor = sibling_anchor(element);
    for node in anchor.prev_siblings() {
        if let Some(sibling) = ElementRef::wrap(node) {
            if HEADING_TAGS.contains(&sibling.value().name()) {
                let text = collapse_inline(&sibling.text().collect::<String>());
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

fn sibling_filename(element: ElementRef<'_>) -> Option<String> {
    let anchor = sibling_anchor(element);
    for node in anchor.prev_siblings() {
        let text = if let Some(sibling) = ElementRef::wrap(node) {
            sibling.text().collect::<String>()
        } else if let Some(text) = node.value().as_text() {
            text.to_string()
        } else {
            continue;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        // Only the nearest non-blank sibling is considered.
        return FILENAME_RE.is_match(trimmed).then(|| trimmed.to_string());
    }
    None
}

fn extract_api_reference(document: &Html, content: &str, examples: &[String]) -> ApiReference {
    let signature = SIGNATURE_SELECTORS
        .iter()
        .find_map(|s| select_first_text(document, s));

    let parameters = PARAMETER_SELECTORS
        .iter()
        .find_map(|s| {
            let selector = Selector::parse(s).ok()?;
            let texts: Vec<String> = document
                .select(&selector)
                .map(|el| collapse_inline(&el.text().collect::<String>()))
                .filter(|t| !t.is_empty() && t.chars().count() < MAX_PARAMETER_LEN)
                .collect();
            if texts.is_empty() { None } else { Some(texts) }
        })
        .unwrap_or_default();

    let returns = RETURNS_RE
        .captures(content)
        .map(|captures| captures[1].trim().to_string());

    ApiReference {
        signature,
        parameters,
        returns,
        example: examples.first().cloned(),
    }
}

fn select_first_text(document: &Html, selector_text: &str) -> Option<String> {
    let selector = Selector::parse(selector_text).ok()?;
    document
        .select(&selector)
        .map(|el| collapse_inline(&el.text().collect::<String>()))
        .find(|t| !t.is_empty())
}

fn collapse_inline(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
