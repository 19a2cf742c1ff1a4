//! Answer prompt template.
//!
//! Retrieved document texts and the question are rendered with Handlebars.
//! Rendering never HTML-escapes, since the output goes to a language model.

use handlebars::Handlebars;
use medrag_core::{AppError, AppResult};
use serde_json::json;

const TEMPLATE_NAME: &str = "answer";

/// Built-in prompt. Context documents appear as a list in retrieval order.
pub const DEFAULT_TEMPLATE: &str = "\
Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.

{{#if documents}}
Context:
{{#each documents}}
- {{this}}
{{/each}}
{{else}}
No relevant context was found in the knowledge base.
{{/if}}

Question: {{question}}
Helpful Answer:";

/// Compiled answer prompt template.
///
/// Templates see three variables: `question` (string), `documents` (list of
/// document texts, most relevant first) and `has_context` (bool).
pub struct PromptTemplate {
    registry: Handlebars<'static>,
}

impl std::fmt::Debug for PromptTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptTemplate").finish_non_exhaustive()
    }
}

impl PromptTemplate {
    /// Compile a custom template.
    pub fn new(template: &str) -> AppResult<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| AppError::Config(format!("Invalid prompt template: {}", e)))?;

        Ok(Self { registry })
    }

    /// Render the prompt for `question` over `documents`.
    pub fn render<S: AsRef<str>>(&self, question: &str, documents: &[S]) -> AppResult<String> {
        let documents: Vec<&str> = documents.iter().map(|d| d.as_ref()).collect();
        let data = json!({
            "question": question,
            "documents": documents,
            "has_context": !documents.is_empty(),
        });

        self.registry
            .render(TEMPLATE_NAME, &data)
            .map_err(|e| AppError::Config(format!("Failed to render prompt template: {}", e)))
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        if let Err(e) = registry.register_template_string(TEMPLATE_NAME, DEFAULT_TEMPLATE) {
            tracing::error!("Built-in prompt template failed to compile: {}", e);
        }
        Self { registry }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_compiles() {
        assert!(PromptTemplate::new(DEFAULT_TEMPLATE).is_ok());
    }

    #[test]
    fn test_render_with_context_keeps_order() {
        let template = PromptTemplate::default();
        let prompt = template
            .render(
                "What is pleural effusion?",
                &["Pleural effusion may require drainage.", "Pneumonia needs antibiotics."],
            )
            .unwrap();

        let first = prompt.find("- Pleural effusion").unwrap();
        let second = prompt.find("- Pneumonia").unwrap();
        let question = prompt.find("Question: What is pleural effusion?").unwrap();

        assert!(prompt.contains("Context:"));
        assert!(first < second && second < question);
        assert!(prompt.trim_end().ends_with("Helpful Answer:"));
        assert!(!prompt.contains("No relevant context"));
    }

    #[test]
    fn test_render_without_context() {
        let template = PromptTemplate::default();
        let prompt = template
            .render::<&str>("What is cardiomegaly?", &[])
            .unwrap();

        assert!(!prompt.contains("Context:"));
        assert!(prompt.contains("No relevant context was found"));
        assert!(prompt.contains("Question: What is cardiomegaly?"));
    }

    #[test]
    fn test_no_html_escaping() {
        let template = PromptTemplate::default();
        let prompt = template
            .render("Is <5 mm effusion \"small\"?", &["Size < 10 mm & stable"])
            .unwrap();

        assert!(prompt.contains("Is <5 mm effusion \"small\"?"));
        assert!(prompt.contains("Size < 10 mm & stable"));
    }

    #[test]
    fn test_custom_template() {
        let template =
            PromptTemplate::new("{{#if has_context}}{{documents.[0]}}{{/if}} | {{question}}")
                .unwrap();
        let prompt = template.render("why?", &["first", "second"]).unwrap();
        assert_eq!(prompt, "first | why?");
    }

    #[test]
    fn test_invalid_template_rejected() {
        let result = PromptTemplate::new("{{#if question}}unterminated");
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
