//! Code-hosting activity check against the GitHub REST API.

use super::{Check, CheckContext, CheckKind, Evidence};
use crate::config::ScannerConfig;
use crate::error::CheckError;
use crate::target::{Target, TargetKind};
use async_trait::async_trait;
use serde_json::Value;

pub struct GithubActivityCheck;

/// `(owner, repo)` when the target is a `github.com/<owner>/<repo>` URL.
pub fn repository(target: &Target) -> Option<(String, String)> {
    let url = target.as_url()?;
    let host = url.host_str()?;
    if host != "github.com" && host != "www.github.com" {
        return None;
    }

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

#[async_trait]
impl Check for GithubActivityCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::GithubActivity
    }

    fn applies_to(&self, kind: TargetKind) -> bool {
        kind == TargetKind::Url
    }

    fn skip_reason(&self, target: &Target, _config: &ScannerConfig) -> Option<String> {
        match repository(target) {
            Some(_) => None,
            None => Some("target is not a GitHub repository".to_string()),
        }
    }

    async fn run(&self, target: &Target, ctx: &CheckContext) -> Result<Evidence, CheckError> {
        let (owner, repo) = repository(target)
            .ok_or_else(|| CheckError::Payload("target is not a GitHub repository".into()))?;
        let api = ctx.config.endpoints.github_api.trim_end_matches('/');
        let url = format!("{api}/repos/{owner}/{repo}/commits");

        let auth = ctx
            .config
            .credentials
            .github_token
            .as_ref()
            .map(|t| format!("Bearer {t}"));
        let mut headers = vec![("Accept", "application/vnd.github.v3+json")];
        if let Some(auth) = auth.as_deref() {
            headers.push(("Authorization", auth));
        }

        let commits: Value = ctx.http.get_json(&url, &headers).await?;
        let count = commits
            .as_array()
            .map(Vec::len)
            .ok_or_else(|| CheckError::Payload("commit list is not an array".into()))?;

        Ok(Evidence::GithubActivity(count > ctx.config.commit_threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_of(raw: &str) -> Option<(String, String)> {
        repository(&Target::parse(raw).unwrap())
    }

    #[test]
    fn test_repository_extraction() {
        assert_eq!(
            repo_of("https://github.com/rust-lang/rust"),
            Some(("rust-lang".into(), "rust".into()))
        );
        assert_eq!(
            repo_of("https://www.github.com/tokio-rs/tokio.git"),
            Some(("tokio-rs".into(), "tokio".into()))
        );
        assert_eq!(
            repo_of("https://github.com/serde-rs/serde/tree/master/serde"),
            Some(("serde-rs".into(), "serde".into()))
        );
    }

    #[test]
    fn test_non_repository_urls() {
        assert_eq!(repo_of("https://github.com/rust-lang"), None);
        assert_eq!(repo_of("https://gitlab.com/a/b"), None);
        assert_eq!(repo_of("https://example.com/github.com/a/b"), None);
    }

    #[test]
    fn test_skip_reason() {
        let cfg = ScannerConfig::default();
        let check = GithubActivityCheck;
        let plain = Target::parse("https://example.com").unwrap();
        assert!(check.skip_reason(&plain, &cfg).is_some());
        let repo = Target::parse("https://github.com/a/b").unwrap();
        assert!(check.skip_reason(&repo, &cfg).is_none());
    }
}
