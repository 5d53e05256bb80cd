//! Page type and category classification.
//!
//! Rule order is a contract: the api check runs before the example check,
//! and the first match wins. Callers depend on `/api/` locators classifying
//! as api even when the content also carries example markers.

use skillforge_core::{CategoryPattern, UnitType};

/// Locator fragments that mark API reference pages.
const API_PATH_MARKERS: [&str; 3] = ["/api/", "/reference/", "/ref/"];

/// Content markers for API reference pages.
const API_CONTENT_MARKERS: [&str; 2] = ["parameters:", "returns:"];

/// Locator fragments that mark example or tutorial pages.
const EXAMPLE_PATH_MARKERS: [&str; 3] = ["/example", "/tutorial", "/sample"];

/// Content markers for example pages.
const EXAMPLE_CONTENT_MARKERS: [&str; 2] = ["example:", "// example"];

/// Classifies one page as api, example, or guide.
///
/// The function is total and deterministic. Checks run in order: api
/// markers first (locator path, then content), then example markers, then
/// the guide fallback.
///
/// # Examples
///
/// ```
/// use skillforge_classify::classify_page_type;
/// use skillforge_core::UnitType;
///
/// assert_eq!(
///     classify_page_type("https://docs.rs/api/foo", "Example: run it"),
///     UnitType::Api,
/// );
/// assert_eq!(
///     classify_page_type("https://docs.rs/tutorial/intro", "step one"),
///     UnitType::Example,
/// );
/// assert_eq!(classify_page_type("https://docs.rs/about", "hello"), UnitType::Guide);
/// ```
#[must_use]
pub fn classify_page_type(locator: &str, content: &str) -> UnitType {
    let locator = locator.to_lowercase();
    let content = content.to_lowercase();

    if API_PATH_MARKERS.iter().any(|m| locator.contains(m))
        || API_CONTENT_MARKERS.iter().any(|m| content.contains(m))
    {
        return UnitType::Api;
    }

    if EXAMPLE_PATH_MARKERS.iter().any(|m| locator.contains(m))
        || EXAMPLE_CONTENT_MARKERS.iter().any(|m| content.contains(m))
    {
        return UnitType::Example;
    }

    UnitType::Guide
}

/// Assigns a category by matching locator substrings.
///
/// Buckets are tried in declaration order; within a bucket, any pattern
/// matching as a case-insensitive substring of the locator selects it.
/// Returns `None` when nothing matches; the default bucket is applied at
/// grouping time, not here.
///
/// # Examples
///
/// ```
/// use skillforge_classify::classify_category;
/// use skillforge_core::CategoryPattern;
///
/// let patterns = vec![
///     CategoryPattern {
///         name: "hooks".to_string(),
///         patterns: vec!["/hooks/".to_string()],
///     },
///     CategoryPattern {
///         name: "components".to_string(),
///         patterns: vec!["/components/".to_string()],
///     },
/// ];
///
/// let category = classify_category("https://react.dev/Hooks/use-state", &patterns);
/// assert_eq!(category, Some("hooks"));
/// assert_eq!(classify_category("https://react.dev/about", &patterns), None);
/// ```
#[must_use]
pub fn classify_category<'a>(locator: &str, patterns: &'a [CategoryPattern]) -> Option<&'a str> {
    let locator = locator.to_lowercase();
    for bucket in patterns {
        if bucket
            .patterns
            .iter()
            .any(|p| locator.contains(&p.to_lowercase()))
        {
            return Some(&bucket.name);
        }
    }
    None
}
