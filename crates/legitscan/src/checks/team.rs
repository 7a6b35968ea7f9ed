//! Team transparency check: probes well-known "about" pages.

use super::{Check, CheckContext, CheckKind, Evidence};
use crate::error::CheckError;
use crate::rules::TEAM;
use crate::target::{Target, TargetKind};
use async_trait::async_trait;

pub struct TeamTransparencyCheck;

/// Resolve each configured sub-path against the target URL.
fn probe_urls(target: &Target, paths: &[String]) -> Vec<String> {
    let Some(base) = target.as_url() else {
        return Vec::new();
    };
    paths
        .iter()
        .filter_map(|p| base.join(p).ok())
        .map(|u| u.to_string())
        .collect()
}

#[async_trait]
impl Check for TeamTransparencyCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::TeamTransparency
    }

    fn applies_to(&self, kind: TargetKind) -> bool {
        kind == TargetKind::Url
    }

    /// Succeeds with `true` if any probed page answers 2xx and mentions the
    /// team. Fails only when no probe got a response at all.
    async fn run(&self, target: &Target, ctx: &CheckContext) -> Result<Evidence, CheckError> {
        let urls = probe_urls(target, &ctx.config.team_paths);
        let results = ctx.http.get_many(&urls, urls.len()).await;

        let mut last_error = None;
        let mut responded = false;
        for result in results {
            match result {
                Ok(page) => {
                    responded = true;
                    if page.is_success() && TEAM.matches(&page.body) {
                        return Ok(Evidence::TeamTransparency(true));
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "team page probe failed");
                    last_error = Some(e);
                }
            }
        }

        match (responded, last_error) {
            (false, Some(e)) => Err(e),
            _ => Ok(Evidence::TeamTransparency(false)),
        }
    }
}
