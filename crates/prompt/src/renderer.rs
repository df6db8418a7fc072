//! Prompt renderer.
//!
//! Renders the primary and fallback templates with Handlebars. Templates are
//! registered once at construction, so a malformed template is a startup
//! configuration error, never a per-request one. Rendering itself is
//! deterministic and side-effect free.

use crate::templates::{FALLBACK_TEMPLATE, PRIMARY_TEMPLATE};
use docchat_core::{AppError, AppResult};
use docchat_retrieval::Excerpt;
use handlebars::Handlebars;
use serde::Serialize;

/// Which template produced a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Primary,
    Fallback,
}

impl TemplateKind {
    fn name(self) -> &'static str {
        match self {
            TemplateKind::Primary => "primary",
            TemplateKind::Fallback => "fallback",
        }
    }
}

/// A rendered instruction string ready for a generator; immutable once built.
#[derive(Debug, Clone)]
pub struct PromptMessage {
    /// Rendered prompt text
    pub text: String,

    /// Template the prompt was rendered from
    pub template: TemplateKind,
}

/// Render context for the primary template.
#[derive(Serialize)]
struct PrimaryContext<'a> {
    query: &'a str,
    history: Vec<HistoryEntry<'a>>,
    excerpts: Vec<ExcerptView<'a>>,
}

/// One numbered history entry; numbering is 1-based and precomputed.
#[derive(Serialize)]
struct HistoryEntry<'a> {
    number: usize,
    text: &'a str,
}

/// Excerpt projection visible to the template: content only. Titles feed
/// citation extraction, not prompt text.
#[derive(Serialize)]
struct ExcerptView<'a> {
    content: &'a str,
}

/// Render context for the fallback template.
#[derive(Serialize)]
struct FallbackContext<'a> {
    query: &'a str,
}

/// Renders primary and fallback prompts from registered templates.
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl PromptRenderer {
    /// Create a renderer with the built-in templates.
    pub fn new() -> AppResult<Self> {
        Self::with_templates(PRIMARY_TEMPLATE, FALLBACK_TEMPLATE)
    }

    /// Create a renderer with custom template text.
    ///
    /// # Errors
    /// Returns `AppError::Prompt` if either template fails to parse; this is
    /// treated as a startup-time configuration error.
    pub fn with_templates(primary: &str, fallback: &str) -> AppResult<Self> {
        let mut handlebars = Handlebars::new();

        // Plain text prompts, no HTML escaping
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);

        handlebars
            .register_template_string(TemplateKind::Primary.name(), primary)
            .map_err(|e| AppError::Prompt(format!("Failed to register primary template: {e}")))?;
        handlebars
            .register_template_string(TemplateKind::Fallback.name(), fallback)
            .map_err(|e| AppError::Prompt(format!("Failed to register fallback template: {e}")))?;

        tracing::debug!("Registered primary and fallback prompt templates");

        Ok(Self { handlebars })
    }

    /// Render the primary prompt from the query, the windowed history
    /// preceding it, and the retrieved excerpts.
    ///
    /// `history` and `excerpts` may be empty sequences; their sections
    /// render empty without error.
    pub fn render_primary(
        &self,
        query: &str,
        history: &[String],
        excerpts: &[Excerpt],
    ) -> AppResult<PromptMessage> {
        let context = PrimaryContext {
            query,
            history: history
                .iter()
                .enumerate()
                .map(|(i, text)| HistoryEntry {
                    number: i + 1,
                    text,
                })
                .collect(),
            excerpts: excerpts
                .iter()
                .map(|e| ExcerptView {
                    content: &e.content,
                })
                .collect(),
        };

        let text = self
            .handlebars
            .render(TemplateKind::Primary.name(), &context)
            .map_err(|e| AppError::Prompt(format!("Failed to render primary template: {e}")))?;

        Ok(PromptMessage {
            text,
            template: TemplateKind::Primary,
        })
    }

    /// Render the fallback prompt from the bare query: no history, no
    /// excerpts.
    pub fn render_fallback(&self, query: &str) -> AppResult<PromptMessage> {
        let text = self
            .handlebars
            .render(TemplateKind::Fallback.name(), &FallbackContext { query })
            .map_err(|e| AppError::Prompt(format!("Failed to render fallback template: {e}")))?;

        Ok(PromptMessage {
            text,
            template: TemplateKind::Fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn excerpt(content: &str, title: Option<&str>) -> Excerpt {
        Excerpt {
            content: content.to_string(),
            title: title.map(str::to_string),
            source_id: "doc-1".to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn test_primary_contains_query_history_and_excerpts() {
        let renderer = PromptRenderer::new().unwrap();
        let history = vec!["earlier question".to_string()];
        let excerpts = vec![excerpt("relevant passage", Some("Doc A"))];

        let prompt = renderer
            .render_primary("what is it?", &history, &excerpts)
            .unwrap();

        assert_eq!(prompt.template, TemplateKind::Primary);
        assert!(prompt.text.contains("Query: what is it?"));
        assert!(prompt.text.contains("message 1: earlier question"));
        assert!(prompt.text.contains("excerpt: relevant passage"));
    }

    #[test]
    fn test_primary_history_numbering_is_one_based_and_stable() {
        let renderer = PromptRenderer::new().unwrap();
        let history = vec!["first".to_string(), "second".to_string()];

        let prompt = renderer.render_primary("q", &history, &[]).unwrap();

        let first_pos = prompt.text.find("message 1: first").unwrap();
        let second_pos = prompt.text.find("message 2: second").unwrap();
        assert!(first_pos < second_pos);
    }

    #[test]
    fn test_primary_renders_with_empty_excerpts() {
        let renderer = PromptRenderer::new().unwrap();
        let prompt = renderer.render_primary("q", &[], &[]).unwrap();
        assert!(prompt.text.contains("EXCERPTS:"));
        assert!(!prompt.text.contains("excerpt:"));
    }

    #[test]
    fn test_primary_rendering_is_deterministic() {
        let renderer = PromptRenderer::new().unwrap();
        let history = vec!["a".to_string(), "b".to_string()];
        let excerpts = vec![excerpt("one", Some("T1")), excerpt("two", None)];

        let first = renderer.render_primary("q", &history, &excerpts).unwrap();
        let second = renderer.render_primary("q", &history, &excerpts).unwrap();
        assert_eq!(first.text, second.text);
    }

    #[test]
    fn test_primary_instructs_sentinel() {
        let renderer = PromptRenderer::new().unwrap();
        let prompt = renderer.render_primary("q", &[], &[]).unwrap();
        assert!(prompt.text.contains("no_answer"));
    }

    #[test]
    fn test_fallback_contains_query_only() {
        let renderer = PromptRenderer::new().unwrap();
        let prompt = renderer.render_fallback("unanswerable question").unwrap();

        assert_eq!(prompt.template, TemplateKind::Fallback);
        assert!(prompt.text.contains("unanswerable question"));
        assert!(!prompt.text.contains("EXCERPTS"));
        assert!(!prompt.text.contains("History"));
    }

    #[test]
    fn test_malformed_template_is_startup_error() {
        let result = PromptRenderer::with_templates("{{#each", "{{query}}");
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }
}
