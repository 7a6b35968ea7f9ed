//! Social presence check: probes fixed profile URLs for the target domain.

use super::{Check, CheckContext, CheckKind, Evidence};
use crate::error::CheckError;
use crate::target::{Target, TargetKind};
use async_trait::async_trait;

pub struct SocialPresenceCheck;

/// Expand every `{domain}` template for `domain`.
pub fn profile_urls(templates: &[String], domain: &str) -> Vec<String> {
    templates
        .iter()
        .map(|t| t.replace("{domain}", domain))
        .collect()
}

#[async_trait]
impl Check for SocialPresenceCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::SocialPresence
    }

    fn applies_to(&self, kind: TargetKind) -> bool {
        kind == TargetKind::Url
    }

    /// A profile exists when its URL answers exactly 200. An unreachable
    /// platform counts as "no profile", not as a check failure.
    async fn run(&self, target: &Target, ctx: &CheckContext) -> Result<Evidence, CheckError> {
        let domain = target
            .domain()
            .ok_or_else(|| CheckError::Payload("target has no host".into()))?;
        let urls = profile_urls(&ctx.config.endpoints.social_profiles, &domain);

        let found = ctx
            .http
            .get_many(&urls, urls.len())
            .await
            .into_iter()
            .any(|r| matches!(r, Ok(ref resp) if resp.status == 200));

        Ok(Evidence::SocialPresence(found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;

    #[test]
    fn test_profile_urls() {
        let urls = profile_urls(&Endpoints::default().social_profiles, "example.com");
        assert_eq!(
            urls,
            vec![
                "https://twitter.com/example.com",
                "https://linkedin.com/company/example.com"
            ]
        );
    }
}
