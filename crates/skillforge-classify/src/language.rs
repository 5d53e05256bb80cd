//! Code language normalization, sniffing, and filename inference.
//!
//! The sniffing probes overlap (`import` appears in both the python and
//! javascript probes), so probe order is load-bearing and covered by tests.

use regex::Regex;
use std::sync::LazyLock;

/// Known abbreviation to canonical language name mappings.
const LANGUAGE_ALIASES: [(&str, &str); 7] = [
    ("py", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("yml", "yaml"),
];

/// Canonical language to file extension mappings.
const LANGUAGE_EXTENSIONS: [(&str, &str); 14] = [
    ("python", "py"),
    ("javascript", "js"),
    ("typescript", "ts"),
    ("bash", "sh"),
    ("yaml", "yaml"),
    ("json", "json"),
    ("sql", "sql"),
    ("go", "go"),
    ("rust", "rs"),
    ("java", "java"),
    ("ruby", "rb"),
    ("html", "html"),
    ("css", "css"),
    ("markdown", "md"),
];

static PYTHON_PROBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(def \w+\(|from \w+ import |import \w+$|if __name__)").expect("valid regex")
});
static JS_PROBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(\bconst \w+\s*=|\blet \w+\s*=|\bfunction \w+\(|=>|console\.log)")
        .expect("valid regex")
});
static TS_REFINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\binterface \w+|:\s*(string|number|boolean|void)\b)").expect("valid regex")
});
static BASH_PROBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^#!/bin/(ba)?sh|^\s*(echo|cd|mkdir|export|chmod) |\$\(\w)")
        .expect("valid regex")
});
static YAML_PROBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[\w-]+:\s*(\S.*)?$").expect("valid regex")
});
static SQL_PROBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(select\s.+\sfrom|insert into|create table|update\s\w+\sset)\b")
        .expect("valid regex")
});
static GO_PROBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^package \w+|\bfunc \w+\(|fmt\.Print)").expect("valid regex")
});
static RUST_PROBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\bfn \w+\(|\blet mut \w+|println!|\bimpl \w+)").expect("valid regex")
});
static JAVA_PROBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(public (class|static void) |System\.out\.)").expect("valid regex")
});

/// Normalizes a raw code-fence language tag.
///
/// Known abbreviations map to canonical names, `dockerfile` maps to
/// `docker`, and unrecognized tags pass through lowercased. An absent tag
/// yields `None`.
///
/// # Examples
///
/// ```
/// use skillforge_classify::normalize_language;
///
/// assert_eq!(normalize_language(Some("py")), Some("python".to_string()));
/// assert_eq!(normalize_language(Some("Shell")), Some("bash".to_string()));
/// assert_eq!(normalize_language(Some("kotlin")), Some("kotlin".to_string()));
/// assert_eq!(normalize_language(None), None);
/// ```
#[must_use]
pub fn normalize_language(tag: Option<&str>) -> Option<String> {
    let tag = tag?.trim().to_lowercase();
    if tag.is_empty() {
        return None;
    }
    if tag == "dockerfile" {
        return Some("docker".to_string());
    }
    for (alias, canonical) in LANGUAGE_ALIASES {
        if tag == alias {
            return Some(canonical.to_string());
        }
    }
    Some(tag)
}

/// Guesses the language of an untagged code block.
///
/// Probes run in a fixed order: python, javascript/typescript, bash, yaml,
/// json (parse probe), sql, go, rust, java. The first matching probe wins;
/// no match yields `None`.
///
/// # Examples
///
/// ```
/// use skillforge_classify::sniff_language;
///
/// assert_eq!(
///     sniff_language("def main():\n    print('hi')"),
///     Some("python".to_string()),
/// );
/// assert_eq!(sniff_language("plain prose text"), None);
/// ```
#[must_use]
pub fn sniff_language(code: &str) -> Option<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return None;
    }

    if PYTHON_PROBE.is_match(code) {
        return Some("python".to_string());
    }
    if JS_PROBE.is_match(code) {
        if TS_REFINE.is_match(code) {
            return Some("typescript".to_string());
        }
        return Some("javascript".to_string());
    }
    if BASH_PROBE.is_match(code) {
        return Some("bash".to_string());
    }
    if looks_like_yaml(code) {
        return Some("yaml".to_string());
    }
    if looks_like_json(trimmed) {
        return Some("json".to_string());
    }
    if SQL_PROBE.is_match(code) {
        return Some("sql".to_string());
    }
    if GO_PROBE.is_match(code) {
        return Some("go".to_string());
    }
    if RUST_PROBE.is_match(code) {
        return Some("rust".to_string());
    }
    if JAVA_PROBE.is_match(code) {
        return Some("java".to_string());
    }
    None
}

fn looks_like_yaml(code: &str) -> bool {
    let lines: Vec<&str> = code.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return false;
    }
    let key_lines = lines.iter().filter(|l| YAML_PROBE.is_match(l)).count();
    // Most non-blank lines must look like key/value entries.
    key_lines * 2 > lines.len()
}

fn looks_like_json(code: &str) -> bool {
    (code.starts_with('{') || code.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(code).is_ok()
}

/// Returns the file extension for a normalized language, when known.
#[must_use]
pub fn extension_for(language: &str) -> Option<&'static str> {
    LANGUAGE_EXTENSIONS
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, ext)| *ext)
}

/// Infers a filename for one code block.
///
/// Shebang inspection takes priority (python, bash, node); otherwise the
/// extension derives from the normalized language. An unknown language
/// yields `None`. For `index > 0` a numeric suffix keeps sibling blocks
/// distinct.
///
/// # Examples
///
/// ```
/// use skillforge_classify::infer_filename;
///
/// assert_eq!(
///     infer_filename("print('hi')", Some("py"), 0),
///     Some("helper.py".to_string()),
/// );
/// assert_eq!(
///     infer_filename("print('hi')", Some("python"), 1),
///     Some("helper_2.py".to_string()),
/// );
/// assert_eq!(infer_filename("???", None, 0), None);
/// ```
#[must_use]
pub fn infer_filename(code: &str, language: Option<&str>, index: usize) -> Option<String> {
    let extension = shebang_extension(code)
        .or_else(|| normalize_language(language).as_deref().and_then(extension_for))?;

    let base = if index == 0 {
        "helper".to_string()
    } else {
        format!("helper_{}", index + 1)
    };
    Some(format!("{base}.{extension}"))
}

fn shebang_extension(code: &str) -> Option<&'static str> {
    let first_line = code.lines().next()?;
    if !first_line.starts_with("#!") {
        return None;
    }
    if first_line.contains("python") {
        Some("py")
    } else if first_line.contains("node") {
        Some("js")
    } else if first_line.contains("sh") {
        Some("sh")
    } else {
        None
    }
}
