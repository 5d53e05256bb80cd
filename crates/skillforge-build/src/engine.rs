//! Template engine for package document rendering using Handlebars.
//!
//! Wraps Handlebars with pre-registered, embedded templates for the three
//! package documents. Strict mode is enabled so a missing context variable
//! fails the render instead of producing a silently incomplete document.

use handlebars::Handlebars;
use serde::Serialize;
use skillforge_core::{Error, Result};

/// Template engine for package document rendering.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`, allowing it to be shared across
/// concurrent job executions.
///
/// # Examples
///
/// ```
/// use skillforge_build::TemplateEngine;
///
/// let engine = TemplateEngine::new().unwrap();
/// assert!(engine.has_template("skill"));
/// assert!(engine.has_template("reference"));
/// assert!(engine.has_template("examples"));
/// ```
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateEngine<'a> {
    /// Creates a new template engine with all built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns error if template registration fails (should not happen
    /// with valid built-in templates).
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);

        Self::register(&mut handlebars, "skill", include_str!("../templates/skill.md.hbs"))?;
        Self::register(
            &mut handlebars,
            "reference",
            include_str!("../templates/reference.md.hbs"),
        )?;
        Self::register(
            &mut handlebars,
            "examples",
            include_str!("../templates/examples.md.hbs"),
        )?;

        Ok(Self { handlebars })
    }

    fn register(handlebars: &mut Handlebars<'a>, name: &str, template: &str) -> Result<()> {
        handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::RenderFailed {
                template: name.to_string(),
                message: format!("template registration failed: {e}"),
                source: Some(Box::new(e)),
            })
    }

    /// Renders a registered template with the given context.
    ///
    /// # Errors
    ///
    /// Returns a render error if the template is unknown, the context is
    /// missing a required variable, or rendering fails.
    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(name, context)
            .map_err(|e| Error::RenderFailed {
                template: name.to_string(),
                message: format!("rendering failed: {e}"),
                source: Some(Box::new(e)),
            })
    }

    /// Checks if a template is registered.
    #[inline]
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_engine_registers_all_templates() {
        let engine = TemplateEngine::new().unwrap();
        assert!(engine.has_template("skill"));
        assert!(engine.has_template("reference"));
        assert!(engine.has_template("examples"));
        assert!(!engine.has_template("nonexistent"));
    }

    #[test]
    fn test_render_unknown_template() {
        let engine = TemplateEngine::new().unwrap();
        let err = engine.render("nonexistent", &json!({})).unwrap_err();
        assert!(err.is_render_error());
    }

    #[test]
    fn test_strict_mode_rejects_missing_variable() {
        let engine = TemplateEngine::new().unwrap();
        // The skill template requires far more than an empty object.
        let err = engine.render("skill", &json!({})).unwrap_err();
        assert!(err.is_render_error());
    }
}
