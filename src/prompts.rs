//! Prompts sent to the language models.
//!
//! Every prompt lives here so a wording change touches exactly one place and
//! unit tests can inspect the text without a provider.
//!
//! A composed [`Prompt`] has two parts: the fixed system framing shared by
//! all providers, and the user instruction (action template plus the
//! article). Providers with a native system slot receive them separately;
//! the `Display` form joins them into the single instruction block.

use crate::types::{Action, ExtractedContent};
use std::fmt;

/// System framing, identical for all three providers.
pub const SYSTEM_FRAMING: &str = "You are an expert content analyst and writer. Provide high-quality, well-structured responses using markdown formatting. Be thorough, accurate, and professional.";

/// Instruction for [`Action::Summarize`].
pub const SUMMARIZE_TEMPLATE: &str = "Please provide a comprehensive summary of the following article. Include the main points, key arguments, and conclusions. Structure your response with clear headings and bullet points where appropriate.";

/// Instruction for [`Action::Expand`].
pub const EXPAND_TEMPLATE: &str = "Please expand on the following article by adding more detailed explanations, examples, and context. Enhance the content while maintaining accuracy and providing valuable insights. Use proper markdown formatting with headings and sections.";

/// Instruction for [`Action::Validate`].
pub const VALIDATE_TEMPLATE: &str = r#"Please analyze the following article for factual accuracy and provide a detailed validation report. Include:
1. Fact-checking of key claims
2. Identification of potential biases or unsupported statements
3. Suggestions for additional research or verification
4. Overall credibility assessment

Format your response with clear sections and use markdown formatting."#;

/// A fully composed prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{}", self.system, self.user)
    }
}

/// Instruction template for an action.
pub fn action_template(action: Action) -> &'static str {
    match action {
        Action::Summarize => SUMMARIZE_TEMPLATE,
        Action::Expand => EXPAND_TEMPLATE,
        Action::Validate => VALIDATE_TEMPLATE,
    }
}

/// Build the prompt for `content` and `action`.
///
/// Pure: the same inputs always produce byte-identical output. The full
/// article is embedded; oversized input is the caller's concern.
pub fn compose_prompt(content: &ExtractedContent, action: Action) -> Prompt {
    let author = content
        .author
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or("Unknown");

    Prompt {
        system: SYSTEM_FRAMING.to_string(),
        user: format!(
            "{}\n\nTitle: {}\nAuthor: {}\nContent: {}",
            action_template(action),
            content.title,
            author,
            content.content
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> ExtractedContent {
        ExtractedContent {
            title: "Rust in Production".into(),
            author: None,
            published_date: None,
            content: "Ownership makes memory safety a compile-time property.".into(),
            url: None,
            metadata: None,
        }
    }

    #[test]
    fn compose_is_deterministic() {
        let c = article();
        for action in [Action::Summarize, Action::Expand, Action::Validate] {
            assert_eq!(
                compose_prompt(&c, action).to_string(),
                compose_prompt(&c, action).to_string()
            );
        }
    }

    #[test]
    fn each_action_carries_its_keyword() {
        let c = article();
        assert!(compose_prompt(&c, Action::Summarize).user.contains("summary"));
        assert!(compose_prompt(&c, Action::Expand).user.contains("expand"));
        let validate = compose_prompt(&c, Action::Validate).user;
        assert!(validate.contains("validation report"));
        for section in [
            "Fact-checking",
            "biases",
            "additional research",
            "credibility assessment",
        ] {
            assert!(validate.contains(section), "missing {section}");
        }
    }

    #[test]
    fn missing_author_renders_unknown() {
        let p = compose_prompt(&article(), Action::Summarize);
        assert!(p.user.contains("Author: Unknown"));
        assert!(p.user.contains("Title: Rust in Production"));
        assert!(p.user.ends_with("compile-time property."));
    }

    #[test]
    fn display_is_single_block_with_framing_first() {
        let text = compose_prompt(&article(), Action::Expand).to_string();
        assert!(text.starts_with("You are an expert content analyst"));
        assert!(text.contains(EXPAND_TEMPLATE));
    }
}
