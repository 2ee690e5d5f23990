//! Splits a model answer into the review text and the optimized code block.
//!
//! The split relies on the model echoing [`OPTIMIZED_CODE_MARKER`]; answers
//! that drift from that format fall back to placeholders instead of failing.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Heading that separates the review from the rewritten code.
pub const OPTIMIZED_CODE_MARKER: &str = "### Optimized Code:";

/// Review text used when nothing precedes the marker.
pub const NO_REVIEW_PLACEHOLDER: &str = "No AI review was generated";

/// Optimized code used when the marker is absent.
pub const NO_OPTIMIZED_CODE_PLACEHOLDER: &str = "No optimized code provided";

/// Opening fence with an optional language tag, e.g. "```rust\n".
static OPENING_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"```[\w+#.-]*[ \t]*\r?\n").ok());

/// A single token directly closed on the next line, e.g. "```pass\n```".
/// The token is the block's content, not a language tag.
static FENCED_SINGLE_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"```([^\s`]+)[ \t]*\r?\n```").ok());

/// Parsed model answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiReviewResult {
    pub review_text: String,
    pub optimized_code: String,
}

impl AiReviewResult {
    /// True if the review part is the placeholder, i.e. the model gave no review.
    pub fn has_empty_review(&self) -> bool {
        self.review_text == NO_REVIEW_PLACEHOLDER
    }
}

/// Splits `text` on the first [`OPTIMIZED_CODE_MARKER`].
pub fn split_ai_response(text: &str) -> AiReviewResult {
    let (review, optimized) = match text.split_once(OPTIMIZED_CODE_MARKER) {
        Some((before, after)) => (before, Some(after)),
        None => (text, None),
    };

    let review = review.trim();
    let review_text = if review.is_empty() {
        NO_REVIEW_PLACEHOLDER.to_string()
    } else {
        review.to_string()
    };

    let optimized_code = match optimized {
        Some(raw) => strip_code_fences(raw),
        None => NO_OPTIMIZED_CODE_PLACEHOLDER.to_string(),
    };

    AiReviewResult {
        review_text,
        optimized_code,
    }
}

/// Removes every code fence delimiter (opening fences with their language tag).
fn strip_code_fences(raw: &str) -> String {
    let unwrapped = match FENCED_SINGLE_TOKEN.as_ref() {
        Some(re) => re.replace_all(raw, "$1"),
        None => raw.into(),
    };
    let without_openers = match OPENING_FENCE.as_ref() {
        Some(re) => re.replace_all(&unwrapped, ""),
        None => unwrapped.as_ref().into(),
    };
    without_openers.replace("```", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_review_and_fenced_code() {
        let out = split_ai_response("Summary...\n### Optimized Code:\n```print(2)```");
        assert_eq!(out.review_text, "Summary...");
        assert_eq!(out.optimized_code, "print(2)");
    }

    #[test]
    fn language_tag_is_dropped_with_the_fence() {
        let text = "Looks fine.\n\n### Optimized Code:\n```rust\nfn main() {}\n```\n";
        let out = split_ai_response(text);
        assert_eq!(out.optimized_code, "fn main() {}");
    }

    #[test]
    fn single_token_block_keeps_its_content() {
        let out = split_ai_response("Nothing to do.\n### Optimized Code:\n```pass\n```\n");
        assert_eq!(out.optimized_code, "pass");

        let out = split_ai_response("r\n### Optimized Code:\n```python\npass\n```");
        assert_eq!(out.optimized_code, "pass");
    }

    #[test]
    fn missing_marker_yields_placeholder() {
        let out = split_ai_response("  Just a review.\n");
        assert_eq!(out.review_text, "Just a review.");
        assert_eq!(out.optimized_code, NO_OPTIMIZED_CODE_PLACEHOLDER);
    }

    #[test]
    fn empty_review_before_marker_yields_placeholder() {
        let out = split_ai_response("### Optimized Code:\n```x = 1```");
        assert!(out.has_empty_review());
        assert_eq!(out.optimized_code, "x = 1");
    }

    #[test]
    fn only_first_marker_splits() {
        let out = split_ai_response("r\n### Optimized Code:\na\n### Optimized Code:\nb");
        assert_eq!(out.review_text, "r");
        assert_eq!(out.optimized_code, "a\n### Optimized Code:\nb");
    }

    #[test]
    fn review_and_code_round_trip_modulo_trimming() {
        let review = "1. Summary\n2. Problems: none";
        let code = "def f():\n    return 2";
        let text = format!("{review}\n\n{OPTIMIZED_CODE_MARKER}\n```python\n{code}\n```\n");

        let out = split_ai_response(&text);
        assert_eq!(out.review_text, review);
        assert_eq!(out.optimized_code, code);
    }

    #[test]
    fn splitting_review_text_again_is_stable() {
        let first = split_ai_response("Review body\n### Optimized Code:\n```y```");
        let second = split_ai_response(&first.review_text);
        assert_eq!(second.review_text, first.review_text);
        assert_eq!(second.optimized_code, NO_OPTIMIZED_CODE_PLACEHOLDER);
    }
}
