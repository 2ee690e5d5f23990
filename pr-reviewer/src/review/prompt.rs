//! Prompt builders for the two review flows.
//!
//! Manual flow asks for a review plus a rewrite under the optimized-code
//! heading; the webhook flow asks for a review of the PR diff only.

use git_context_engine::DiffRecord;

use crate::review::splitter::OPTIMIZED_CODE_MARKER;

/// System message for the manual `/review` flow.
pub const MANUAL_SYSTEM_PROMPT: &str = "You are an advanced AI code reviewer and optimizer.";

/// A role-tagged prompt ready for a chat-completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPrompt {
    pub system: Option<String>,
    pub user: String,
}

/// Build the manual review prompt for a raw code snippet.
pub fn build_manual_prompt(code: &str) -> ReviewPrompt {
    let mut s = String::new();
    s.push_str("You are an expert AI software engineer.\n");
    s.push_str("Analyze and improve the given code by:\n");
    s.push_str("- Fixing performance issues\n");
    s.push_str("- Improving readability & structure\n");
    s.push_str("- Enhancing security\n");
    s.push_str("- Following best coding practices\n");
    s.push_str("\n---\n### Original Code:\n```\n");
    s.push_str(code);
    s.push_str("\n```\n");
    s.push_str("\n---\n### AI Code Review:\n");
    s.push_str("1. Summary of what the code does\n");
    s.push_str("2. Problems & Areas for Improvement\n");
    s.push_str("3. Code Quality Score (1-10)\n");
    s.push_str("4. Security & Performance Risks\n");
    s.push_str("\n---\n");
    s.push_str(OPTIMIZED_CODE_MARKER);
    s.push_str("\n```\n// the improved version of this code goes here\n```\n");
    s.push_str("\n---\nPut the rewritten code only under the `");
    s.push_str(OPTIMIZED_CODE_MARKER);
    s.push_str("` heading and make sure it is well-structured, secure, and error-free.\n");

    ReviewPrompt {
        system: Some(MANUAL_SYSTEM_PROMPT.to_string()),
        user: s,
    }
}

/// Build the review-only prompt for a pull request diff.
pub fn build_webhook_prompt(diff: &DiffRecord) -> ReviewPrompt {
    let mut s = String::new();
    s.push_str("You are a code review assistant. Review the following pull request changes.\n");
    s.push_str(
        "Focus on correctness, potential bugs, security, performance, and readability.\n",
    );

    match diff {
        DiffRecord::Unified(text) => {
            s.push_str("\n# Diff\n```diff\n");
            s.push_str(text.trim_end());
            s.push_str("\n```\n");
        }
        DiffRecord::Files(files) => {
            s.push_str("\n# Changed files (latest commit)\n");
            for f in files {
                s.push_str(&format!("\n## {}\n```diff\n", f.filename));
                s.push_str(f.patch_or_placeholder().trim_end());
                s.push_str("\n```\n");
            }
        }
    }

    s.push_str("\n# Instructions\n- Be specific, reference files and lines when possible.\n- Suggest concrete fixes.\n- Do not rewrite the whole change.\n");

    ReviewPrompt {
        system: None,
        user: s,
    }
}

#[cfg(test)]
mod tests {
    use git_context_engine::{FilePatch, git_providers::MISSING_PATCH_PLACEHOLDER};

    use super::*;

    #[test]
    fn manual_prompt_carries_persona_and_marker() {
        let p = build_manual_prompt("print(1)");
        assert_eq!(p.system.as_deref(), Some(MANUAL_SYSTEM_PROMPT));
        assert!(p.user.contains("```\nprint(1)\n```"));
        assert!(p.user.contains(OPTIMIZED_CODE_MARKER));
        assert!(p.user.contains("Code Quality Score (1-10)"));
    }

    #[test]
    fn webhook_prompt_embeds_unified_diff_without_system() {
        let p = build_webhook_prompt(&DiffRecord::Unified("+fn a() {}\n".into()));
        assert!(p.system.is_none());
        assert!(p.user.contains("```diff\n+fn a() {}\n```"));
        assert!(!p.user.contains(OPTIMIZED_CODE_MARKER));
    }

    #[test]
    fn webhook_prompt_lists_files_with_placeholders() {
        let p = build_webhook_prompt(&DiffRecord::Files(vec![
            FilePatch {
                filename: "src/lib.rs".into(),
                patch: Some("@@ -1 +1 @@\n-a\n+b".into()),
            },
            FilePatch {
                filename: "logo.png".into(),
                patch: None,
            },
        ]));
        assert!(p.user.contains("## src/lib.rs\n```diff\n@@ -1 +1 @@"));
        assert!(p.user.contains(&format!("## logo.png\n```diff\n{MISSING_PATCH_PLACEHOLDER}")));
    }
}
