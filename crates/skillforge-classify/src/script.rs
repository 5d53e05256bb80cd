//! Script and template detection heuristics.

use regex::Regex;
use std::sync::LazyLock;

/// Any code with at least this many lines qualifies as a script.
const SCRIPT_LINE_THRESHOLD: usize = 20;

static TOP_LEVEL_DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^def \w+\(").expect("valid regex"));

static TEMPLATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\{\{[^}]*\}\}",        // mustache placeholder
        r"\{%[^%]*%\}",          // jinja block
        r"<[A-Z][A-Z0-9_]+>",    // angle-bracket placeholder
        r"\[[A-Z][A-Z0-9_]+\]",  // bracket placeholder
        r"\bYOUR_[A-Z0-9_]+",    // YOUR_ token
        r"\$\{[^}]+\}",          // shell-style substitution
        r"\w+:\s*<[^>]+>",       // yaml-style value placeholder
        r#"=\s*"<[^>]+>""#,      // assignment placeholder
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Decides whether a code block is a complete runnable script.
///
/// A heuristic union; any single condition qualifies:
/// - the code starts with a shebang line
/// - python code with `if __name__`, `def main(`, or two or more
///   top-level `def` statements
/// - bash code with five or more non-comment, non-blank lines
/// - javascript/typescript code with an export statement, or an
///   `async function` in a block longer than 200 characters
/// - any code spanning twenty or more lines
///
/// # Examples
///
/// ```
/// use skillforge_classify::is_complete_script;
///
/// assert!(is_complete_script("#!/bin/sh\necho hi", None));
/// assert!(is_complete_script(
///     "def main():\n    run()",
///     Some("python"),
/// ));
/// assert!(!is_complete_script("x = 1", Some("python")));
/// ```
#[must_use]
pub fn is_complete_script(code: &str, language: Option<&str>) -> bool {
    if code.starts_with("#!") {
        return true;
    }

    match language {
        Some("python") => {
            if code.contains("if __name__")
                || code.contains("def main(")
                || TOP_LEVEL_DEF.find_iter(code).count() >= 2
            {
                return true;
            }
        }
        Some("bash" | "sh") => {
            let effective = code
                .lines()
                .filter(|l| {
                    let trimmed = l.trim();
                    !trimmed.is_empty() && !trimmed.starts_with('#')
                })
                .count();
            if effective >= 5 {
                return true;
            }
        }
        Some("javascript" | "typescript") => {
            if code.contains("export ")
                || (code.contains("async function") && code.len() > 200)
            {
                return true;
            }
        }
        _ => {}
    }

    code.lines().count() >= SCRIPT_LINE_THRESHOLD
}

/// Decides whether a code block is a fill-in template.
///
/// True when the code matches any of the eight placeholder shapes:
/// mustache `{{...}}`, jinja `{%...%}`, `<UPPER_CASE>` or `[UPPER_CASE]`
/// placeholders, `YOUR_` tokens, shell `${...}` substitutions, yaml-style
/// `key: <value>` entries, or `= "<value>"` assignments.
///
/// # Examples
///
/// ```
/// use skillforge_classify::is_template_code;
///
/// assert!(is_template_code("Hello {{name}}!"));
/// assert!(is_template_code("api_key = \"<KEY GOES HERE>\""));
/// assert!(!is_template_code("let x = 1;"));
/// ```
#[must_use]
pub fn is_template_code(code: &str) -> bool {
    TEMPLATE_PATTERNS.iter().any(|p| p.is_match(code))
}
