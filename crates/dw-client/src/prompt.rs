//! Prompt construction and wire types for the `/completion` endpoint.

use dw_core::Language;
use serde::{Deserialize, Serialize};

/// Builds the instruction prompt for one source file.
///
/// # Examples
///
/// ```
/// use dw_client::build_prompt;
/// use dw_core::Language;
///
/// let prompt = build_prompt("x = 1", Language::Python);
/// assert!(prompt.starts_with("[INST]"));
/// assert!(prompt.contains("following Python code"));
/// assert!(prompt.ends_with("x = 1[/INST]"));
/// ```
#[must_use]
pub fn build_prompt(content: &str, language: Language) -> String {
    format!(
        "[INST]Write documentation to describe the logic in the following {language} code using markdown: {content}[/INST]"
    )
}

/// Request body sent to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRequest {
    /// Full instruction prompt.
    pub prompt: String,
}

impl CompletionRequest {
    /// Creates the request for one source file.
    #[must_use]
    pub fn for_source(content: &str, language: Language) -> Self {
        Self {
            prompt: build_prompt(content, language),
        }
    }
}

/// Response body returned by the completion service.
///
/// `content` is kept loose so a non-string value can be reported as a
/// format problem instead of a JSON error.
#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    #[serde(default)]
    pub(crate) content: Option<serde_json::Value>,
}
