//! Evidentiary checks.
//!
//! Each check is an isolated "fetch + derive a value" adapter behind the
//! [`Check`] trait. A check returns either [`Evidence`] or a [`CheckError`];
//! it never decides what the report shows on failure. The aggregator turns
//! every run into a [`CheckResult`] and substitutes defaults.

pub mod contract;
pub mod content;
pub mod github;
pub mod social;
pub mod team;
pub mod threat;
pub mod whois;

use crate::config::ScannerConfig;
use crate::error::CheckError;
use crate::http_client::HttpClient;
use crate::rules::VocabularyMatch;
use crate::target::{Target, TargetKind};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

pub use contract::ContractVerificationCheck;
pub use content::ContentCheck;
pub use github::GithubActivityCheck;
pub use social::SocialPresenceCheck;
pub use team::TeamTransparencyCheck;
pub use threat::ThreatIntelCheck;
pub use whois::DomainAgeCheck;

/// Identifies a check in results and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Content,
    TeamTransparency,
    GithubActivity,
    SocialPresence,
    DomainAge,
    ThreatIntel,
    ContractVerification,
}

impl CheckKind {
    pub fn name(&self) -> &'static str {
        match self {
            CheckKind::Content => "content",
            CheckKind::TeamTransparency => "team_transparency",
            CheckKind::GithubActivity => "github_activity",
            CheckKind::SocialPresence => "social_presence",
            CheckKind::DomainAge => "domain_age",
            CheckKind::ThreatIntel => "threat_intel",
            CheckKind::ContractVerification => "contract_verification",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The semantic payload a successful check produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Evidence {
    /// Landing page vocabulary: AI terms (scored) and whitepaper mentions.
    Content {
        ai: VocabularyMatch,
        whitepaper: bool,
    },
    TeamTransparency(bool),
    GithubActivity(bool),
    SocialPresence(bool),
    /// Whole days since domain registration.
    DomainAge(u64),
    /// `true` when the threat list has no match for the target.
    ThreatListClear(bool),
    ContractVerified(bool),
}

/// Tagged outcome of one check.
#[derive(Debug)]
pub enum CheckOutcome {
    Succeeded(Evidence),
    Failed(CheckError),
    /// Not run: missing credential or not applicable to the target.
    Skipped(String),
}

/// Coarse status of a [`CheckOutcome`], for logs and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Succeeded,
    Failed,
    Skipped,
}

impl CheckOutcome {
    pub fn status(&self) -> CheckStatus {
        match self {
            CheckOutcome::Succeeded(_) => CheckStatus::Succeeded,
            CheckOutcome::Failed(_) => CheckStatus::Failed,
            CheckOutcome::Skipped(_) => CheckStatus::Skipped,
        }
    }

    pub fn evidence(&self) -> Option<&Evidence> {
        match self {
            CheckOutcome::Succeeded(e) => Some(e),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CheckError> {
        match self {
            CheckOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// One check's outcome, keyed by the check that produced it.
#[derive(Debug)]
pub struct CheckResult {
    pub kind: CheckKind,
    pub outcome: CheckOutcome,
}

/// Shared, read-only collaborators handed to every check run.
#[derive(Clone)]
pub struct CheckContext {
    pub config: Arc<ScannerConfig>,
    pub http: HttpClient,
}

impl CheckContext {
    pub fn new(config: Arc<ScannerConfig>) -> Self {
        let http = HttpClient::new(&config);
        Self { config, http }
    }
}

/// A single evidentiary probe.
#[async_trait]
pub trait Check: Send + Sync {
    fn kind(&self) -> CheckKind;

    /// Target kinds this check knows how to inspect.
    fn applies_to(&self, kind: TargetKind) -> bool;

    /// Reason to skip this run without issuing any request, if any.
    ///
    /// Used for missing credentials and for targets the check cannot use
    /// (e.g. GitHub activity on a URL that is not a repository).
    fn skip_reason(&self, _target: &Target, _config: &ScannerConfig) -> Option<String> {
        None
    }

    async fn run(&self, target: &Target, ctx: &CheckContext) -> Result<Evidence, CheckError>;
}

/// The standard check set, one instance of every adapter.
pub fn default_checks() -> Vec<Arc<dyn Check>> {
    vec![
        Arc::new(ContentCheck),
        Arc::new(TeamTransparencyCheck),
        Arc::new(GithubActivityCheck),
        Arc::new(SocialPresenceCheck),
        Arc::new(DomainAgeCheck),
        Arc::new(ThreatIntelCheck),
        Arc::new(ContractVerificationCheck),
    ]
}

/// Skip reason for a credential that is not configured.
pub(crate) fn missing_credential(env: &str) -> String {
    format!("missing credential {env}")
}
