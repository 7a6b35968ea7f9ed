//! Landing page vocabulary check.

use super::{Check, CheckContext, CheckKind, Evidence};
use crate::error::CheckError;
use crate::rules::{AI_TECHNOLOGY, WHITEPAPER};
use crate::target::{Target, TargetKind};
use async_trait::async_trait;

/// Fetches the target page and scores it against the AI and whitepaper
/// vocabularies.
pub struct ContentCheck;

/// Derive content evidence from a fetched document.
pub fn analyze(html: &str) -> Evidence {
    Evidence::Content {
        ai: AI_TECHNOLOGY.evaluate(html),
        whitepaper: WHITEPAPER.matches(html),
    }
}

#[async_trait]
impl Check for ContentCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Content
    }

    fn applies_to(&self, kind: TargetKind) -> bool {
        kind == TargetKind::Url
    }

    async fn run(&self, target: &Target, ctx: &CheckContext) -> Result<Evidence, CheckError> {
        let url = target.to_string();
        let page = ctx.http.get(&url, &[]).await?.require_success()?;
        Ok(analyze(&page.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_positive() {
        let html = "<p>Our machine learning pipeline. Read the whitepaper.</p>";
        match analyze(html) {
            Evidence::Content { ai, whitepaper } => {
                assert!(ai.is_match());
                assert!(ai.score > 0);
                assert!(whitepaper);
            }
            other => panic!("unexpected evidence {other:?}"),
        }
    }

    #[test]
    fn test_analyze_negative() {
        match analyze("<p>Buy shoes online</p>") {
            Evidence::Content { ai, whitepaper } => {
                assert!(!ai.is_match());
                assert_eq!(ai.score, 0);
                assert!(!whitepaper);
            }
            other => panic!("unexpected evidence {other:?}"),
        }
    }
}
