//! Concurrent fan-out of checks and folding into a [`ScanReport`].
//!
//! Every applicable check runs as its own tokio task under its own timeout,
//! owned by a `JoinSet` so that dropping a scan cancels its checks. The
//! aggregator waits for all of them, whatever their fate, then folds
//! results by [`CheckKind`]. Completion order never matters, and no check
//! can fail the scan: errors, timeouts and panics stay in that check's
//! [`CheckResult`].

use crate::checks::{
    default_checks, Check, CheckContext, CheckKind, CheckOutcome, CheckResult, CheckStatus,
};
use crate::config::ScannerConfig;
use crate::error::{CheckError, ScanError};
use crate::report::ScanReport;
use crate::target::{Target, TargetKind};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{debug, info, warn, Instrument};

/// A completed scan: the caller-facing report plus per-check diagnostics.
#[derive(Debug)]
pub struct Scan {
    pub target: Target,
    pub report: ScanReport,
    pub checks: Vec<CheckResult>,
    pub elapsed: Duration,
}

impl Scan {
    pub fn result(&self, kind: CheckKind) -> Option<&CheckResult> {
        self.checks.iter().find(|r| r.kind == kind)
    }

    pub fn count(&self, status: CheckStatus) -> usize {
        self.checks
            .iter()
            .filter(|r| r.outcome.status() == status)
            .count()
    }
}

/// Stateless evidence aggregator. Cheap to share behind an `Arc`; scans
/// running at the same time share nothing mutable.
pub struct Aggregator {
    ctx: Arc<CheckContext>,
    checks: Vec<Arc<dyn Check>>,
}

impl Aggregator {
    /// Aggregator running the standard check set.
    pub fn new(config: ScannerConfig) -> Self {
        Self::with_checks(config, default_checks())
    }

    /// Aggregator running a custom check set.
    pub fn with_checks(config: ScannerConfig, checks: Vec<Arc<dyn Check>>) -> Self {
        Self {
            ctx: Arc::new(CheckContext::new(Arc::new(config))),
            checks,
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.ctx.config
    }

    /// Validate `raw` and scan it.
    ///
    /// Only an invalid target is an error; nothing is fetched in that case.
    pub async fn scan(&self, raw: &str) -> Result<Scan, ScanError> {
        let target = Target::parse(raw)?;
        Ok(self.scan_target(target).await)
    }

    /// Scan an already validated target.
    pub async fn scan_target(&self, target: Target) -> Scan {
        let span = tracing::info_span!("scan", scan_target = %target, kind = ?target.kind());
        self.run_checks(target).instrument(span).await
    }

    async fn run_checks(&self, target: Target) -> Scan {
        let started = Instant::now();
        let kind = target.kind();
        let timeout = self.ctx.config.check_timeout;

        // One slot per check, filled in check order regardless of completion.
        let mut slots: Vec<Option<CheckOutcome>> = Vec::with_capacity(self.checks.len());
        // Dropping the set (e.g. when the scan future is dropped) aborts every task.
        let mut tasks = JoinSet::new();

        for (idx, check) in self.checks.iter().enumerate() {
            if !check.applies_to(kind) {
                slots.push(Some(CheckOutcome::Skipped(not_applicable(kind))));
                continue;
            }
            if let Some(reason) = check.skip_reason(&target, &self.ctx.config) {
                slots.push(Some(CheckOutcome::Skipped(reason)));
                continue;
            }
            slots.push(None);

            let check = Arc::clone(check);
            let ctx = Arc::clone(&self.ctx);
            let t = target.clone();
            tasks.spawn(
                async move {
                    let run = tokio::time::timeout(timeout, check.run(&t, &ctx));
                    let outcome = match AssertUnwindSafe(run).catch_unwind().await {
                        Ok(Ok(Ok(evidence))) => CheckOutcome::Succeeded(evidence),
                        Ok(Ok(Err(e))) => CheckOutcome::Failed(e),
                        Ok(Err(_elapsed)) => CheckOutcome::Failed(CheckError::Timeout(timeout)),
                        Err(panic) => CheckOutcome::Failed(CheckError::Aborted(format!(
                            "check panicked: {}",
                            panic_message(&*panic)
                        ))),
                    };
                    (idx, outcome)
                }
                .in_current_span(),
            );
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, outcome)) => slots[idx] = Some(outcome),
                Err(e) => warn!(error = %e, "check task did not complete"),
            }
        }

        let results: Vec<CheckResult> = self
            .checks
            .iter()
            .zip(slots)
            .map(|(check, slot)| CheckResult {
                kind: check.kind(),
                outcome: slot.unwrap_or_else(|| {
                    CheckOutcome::Failed(CheckError::Aborted("task cancelled".to_string()))
                }),
            })
            .collect();

        let mut report = ScanReport::default();
        for result in &results {
            match &result.outcome {
                CheckOutcome::Succeeded(evidence) => {
                    debug!(check = %result.kind, ?evidence, "check succeeded");
                    report.apply(evidence);
                }
                CheckOutcome::Failed(e) => {
                    warn!(check = %result.kind, error = %e, "check failed, using default");
                }
                CheckOutcome::Skipped(reason) => {
                    debug!(check = %result.kind, %reason, "check skipped");
                }
            }
        }
        report.trust_score = report.trust_score_for(kind);

        let scan = Scan {
            target,
            report,
            checks: results,
            elapsed: started.elapsed(),
        };
        info!(
            elapsed_ms = scan.elapsed.as_millis() as u64,
            succeeded = scan.count(CheckStatus::Succeeded),
            failed = scan.count(CheckStatus::Failed),
            skipped = scan.count(CheckStatus::Skipped),
            trust_score = scan.report.trust_score,
            "scan complete"
        );
        scan
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn not_applicable(kind: TargetKind) -> String {
    match kind {
        TargetKind::Url => "not applicable to URL targets".to_string(),
        TargetKind::Address => "not applicable to address targets".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Evidence;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Fixed(CheckKind, Evidence);

    #[async_trait]
    impl Check for Fixed {
        fn kind(&self) -> CheckKind {
            self.0
        }
        fn applies_to(&self, kind: TargetKind) -> bool {
            kind == TargetKind::Url
        }
        async fn run(&self, _: &Target, _: &CheckContext) -> Result<Evidence, CheckError> {
            Ok(self.1.clone())
        }
    }

    struct Slow;

    #[async_trait]
    impl Check for Slow {
        fn kind(&self) -> CheckKind {
            CheckKind::DomainAge
        }
        fn applies_to(&self, _: TargetKind) -> bool {
            true
        }
        async fn run(&self, _: &Target, _: &CheckContext) -> Result<Evidence, CheckError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Evidence::DomainAge(9_999))
        }
    }

    struct Panics;

    #[async_trait]
    impl Check for Panics {
        fn kind(&self) -> CheckKind {
            CheckKind::SocialPresence
        }
        fn applies_to(&self, _: TargetKind) -> bool {
            true
        }
        async fn run(&self, _: &Target, _: &CheckContext) -> Result<Evidence, CheckError> {
            panic!("adapter bug");
        }
    }

    /// Records whether its run ever got past a delay.
    struct Finishes(Arc<AtomicBool>);

    #[async_trait]
    impl Check for Finishes {
        fn kind(&self) -> CheckKind {
            CheckKind::GithubActivity
        }
        fn applies_to(&self, _: TargetKind) -> bool {
            true
        }
        async fn run(&self, _: &Target, _: &CheckContext) -> Result<Evidence, CheckError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            self.0.store(true, Ordering::SeqCst);
            Ok(Evidence::GithubActivity(true))
        }
    }

    fn aggregator(checks: Vec<Arc<dyn Check>>) -> Aggregator {
        let cfg = ScannerConfig::default().with_check_timeout(Duration::from_millis(50));
        Aggregator::with_checks(cfg, checks)
    }

    #[tokio::test]
    async fn test_invalid_target_is_rejected() {
        let agg = aggregator(vec![]);
        assert!(matches!(agg.scan("").await, Err(ScanError::MissingTarget)));
        assert!(matches!(
            agg.scan("not a url").await,
            Err(ScanError::InvalidTarget)
        ));
    }

    #[tokio::test]
    async fn test_timeout_and_panic_are_contained() {
        let agg = aggregator(vec![
            Arc::new(Fixed(CheckKind::TeamTransparency, Evidence::TeamTransparency(true))),
            Arc::new(Slow),
            Arc::new(Panics),
        ]);
        let scan = agg.scan("https://example.com").await.unwrap();

        assert!(scan.report.team_transparency);
        assert_eq!(scan.report.domain_age, 0);
        assert!(!scan.report.social_proof);

        let slow = scan.result(CheckKind::DomainAge).unwrap();
        assert!(matches!(slow.outcome.error(), Some(CheckError::Timeout(_))));
        let panicked = scan.result(CheckKind::SocialPresence).unwrap();
        assert!(matches!(panicked.outcome.error(), Some(CheckError::Aborted(_))));
        assert!(scan.elapsed < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_dropped_scan_cancels_checks() {
        let finished = Arc::new(AtomicBool::new(false));
        let cfg = ScannerConfig::default().with_check_timeout(Duration::from_secs(5));
        let agg = Aggregator::with_checks(cfg, vec![Arc::new(Finishes(Arc::clone(&finished)))]);

        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), agg.scan("https://example.com")).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_panic_message_is_kept() {
        let agg = aggregator(vec![Arc::new(Panics)]);
        let scan = agg.scan("https://example.com").await.unwrap();
        match scan.result(CheckKind::SocialPresence).unwrap().outcome.error() {
            Some(CheckError::Aborted(msg)) => assert!(msg.contains("adapter bug"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_inapplicable_checks_are_skipped() {
        let agg = aggregator(vec![Arc::new(Fixed(
            CheckKind::GithubActivity,
            Evidence::GithubActivity(true),
        ))]);
        let scan = agg
            .scan("0x52908400098527886E0F7030069857D2E4169EE7")
            .await
            .unwrap();
        assert!(!scan.report.github_activity);
        assert_eq!(scan.count(CheckStatus::Skipped), 1);
        assert_eq!(scan.report.trust_score, 0);
    }

    #[tokio::test]
    async fn test_missing_credentials_degrade() {
        // standard checks, no keys, address target: the only applicable check is skipped
        let agg = Aggregator::new(ScannerConfig::default());
        let scan = agg
            .scan("0x52908400098527886E0F7030069857D2E4169EE7")
            .await
            .unwrap();
        let contract = scan.result(CheckKind::ContractVerification).unwrap();
        match &contract.outcome {
            CheckOutcome::Skipped(reason) => assert!(reason.contains("ETHERSCAN_API_KEY")),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(scan.count(CheckStatus::Skipped), 7);
        assert_eq!(scan.report, ScanReport::default());
    }
}
