//! Shared code-block extraction and enrichment.
//!
//! Every extractor funnels raw code through [`enrich`] so that language
//! detection, filename inference, and script/template flags behave the same
//! regardless of source kind. Markdown-style fenced blocks in plain text
//! are pulled out with [`extract_fenced`].

use skillforge_classify::{
    infer_filename, is_complete_script, is_template_code, normalize_language, sniff_language,
};
use skillforge_core::CodeBlock;

/// Minimum trimmed length, in characters, for a code block to be kept.
pub const MIN_CODE_LEN: usize = 10;

/// Enriches one raw code string into a [`CodeBlock`].
///
/// The language comes from the given fence tag when present, otherwise
/// from content sniffing. The filename derives from shebang or language;
/// `index` keeps sibling block filenames distinct.
///
/// # Examples
///
/// ```
/// use skillforge_extract::code_blocks::enrich;
///
/// let block = enrich("print('hi')", Some("py"), None, 0);
/// assert_eq!(block.language.as_deref(), Some("python"));
/// assert_eq!(block.filename.as_deref(), Some("helper.py"));
/// ```
#[must_use]
pub fn enrich(code: &str, lang_tag: Option<&str>, title: Option<String>, index: usize) -> CodeBlock {
    let language = normalize_language(lang_tag).or_else(|| sniff_language(code));
    let filename = infer_filename(code, language.as_deref(), index);
    CodeBlock {
        code: code.to_string(),
        is_script: is_complete_script(code, language.as_deref()),
        is_template: is_template_code(code),
        language,
        filename,
        title,
    }
}

/// Extracts fenced code blocks from plain text.
///
/// Recognizes ``` and `~~~` fences with an optional language tag on the
/// opening line. Blocks whose trimmed content is shorter than
/// [`MIN_CODE_LEN`] are discarded; an unclosed fence at end of input is
/// discarded as well.
#[must_use]
pub fn extract_fenced(text: &str) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    let mut capture: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some((tag, lines)) = capture.as_mut() {
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                let code = lines.join("\n");
                let code = code.trim();
                if code.chars().count() >= MIN_CODE_LEN {
                    let tag = if tag.is_empty() { None } else { Some(tag.as_str()) };
                    blocks.push(enrich(code, tag, None, blocks.len()));
                }
                capture = None;
            } else {
                lines.push(line);
            }
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("```").or_else(|| trimmed.strip_prefix("~~~")) {
            let tag = rest
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string();
            capture = Some((tag, Vec::new()));
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrich_language_from_tag() {
        let block = enrich("x = compute()", Some("py"), None, 0);
        assert_eq!(block.language.as_deref(), Some("python"));
        assert_eq!(block.filename.as_deref(), Some("helper.py"));
    }

    #[test]
    fn test_enrich_sniffs_untagged_code() {
        let block = enrich("def main():\n    run()", None, None, 0);
        assert_eq!(block.language.as_deref(), Some("python"));
        assert!(block.is_script);
    }

    #[test]
    fn test_enrich_template_flag() {
        let block = enrich("api_key = \"{{key}}\"", None, None, 0);
        assert!(block.is_template);
    }

    #[test]
    fn test_enrich_sibling_index_suffix() {
        let block = enrich("x = 1", Some("python"), None, 1);
        assert_eq!(block.filename.as_deref(), Some("helper_2.py"));
    }

    #[test]
    fn test_enrich_keeps_title() {
        let block = enrich("SELECT id FROM users;", Some("sql"), Some("Query".to_string()), 0);
        assert_eq!(block.title.as_deref(), Some("Query"));
    }

    #[test]
    fn test_extract_fenced_with_language_tag() {
        let text = "Intro prose.\n```python\nprint('hello world')\n```\nMore prose.";
        let blocks = extract_fenced(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].code, "print('hello world')");
        assert_eq!(blocks[0].language.as_deref(), Some("python"));
    }

    #[test]
    fn test_extract_fenced_tilde_fence() {
        let text = "~~~yaml\nname: demo\nversion: 1\n~~~";
        let blocks = extract_fenced(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language.as_deref(), Some("yaml"));
    }

    #[test]
    fn test_extract_fenced_discards_short_blocks() {
        let text = "```\nx = 1\n```";
        assert!(extract_fenced(text).is_empty());
    }

    #[test]
    fn test_extract_fenced_discards_unclosed_fence() {
        let text = "```python\nprint('this never closes')";
        assert!(extract_fenced(text).is_empty());
    }

    #[test]
    fn test_extract_fenced_multiple_blocks_indexed() {
        let text = "```python\nfirst = 'block one'\n```\n```python\nsecond = 'block two'\n```";
        let blocks = extract_fenced(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].filename.as_deref(), Some("helper.py"));
        assert_eq!(blocks[1].filename.as_deref(), Some("helper_2.py"));
    }
}
