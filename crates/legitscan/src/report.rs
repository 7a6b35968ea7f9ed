//! The fixed-shape scan report returned to callers.

use crate::checks::Evidence;
use crate::rules::{domain_age_credit, Signal, TRUST_WEIGHTS};
use crate::target::TargetKind;
use serde::{Deserialize, Serialize};

/// Weighted AI-terminology score with the terms that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiScore {
    pub score: u32,
    pub matched: Vec<String>,
}

/// Aggregate result of a scan.
///
/// Every field is always serialized. A check that failed or was skipped
/// leaves its field at the `Default` value (`false`, `0`, empty score).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub ai_mentions: bool,
    pub whitepaper: bool,
    pub team_transparency: bool,
    pub github_activity: bool,
    pub social_proof: bool,
    /// Days since domain registration.
    pub domain_age: u64,
    pub threat_list_clear: bool,
    pub contract_verified: bool,
    pub ai_score: AiScore,
    /// 0–100, over the signals applicable to the target kind.
    pub trust_score: u32,
}

impl ScanReport {
    /// Fold one piece of evidence into the report.
    pub fn apply(&mut self, evidence: &Evidence) {
        match evidence {
            Evidence::Content { ai, whitepaper } => {
                self.ai_mentions = ai.is_match();
                self.whitepaper = *whitepaper;
                self.ai_score = AiScore {
                    score: ai.score,
                    matched: ai.matched.clone(),
                };
            }
            Evidence::TeamTransparency(v) => self.team_transparency = *v,
            Evidence::GithubActivity(v) => self.github_activity = *v,
            Evidence::SocialPresence(v) => self.social_proof = *v,
            Evidence::DomainAge(days) => self.domain_age = *days,
            Evidence::ThreatListClear(v) => self.threat_list_clear = *v,
            Evidence::ContractVerified(v) => self.contract_verified = *v,
        }
    }

    /// Fraction of a signal's weight this report earns.
    fn credit(&self, signal: Signal) -> f64 {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match signal {
            Signal::AiMentions => flag(self.ai_mentions),
            Signal::Whitepaper => flag(self.whitepaper),
            Signal::TeamTransparency => flag(self.team_transparency),
            Signal::GithubActivity => flag(self.github_activity),
            Signal::SocialProof => flag(self.social_proof),
            Signal::DomainAge => domain_age_credit(self.domain_age),
            Signal::ThreatListClear => flag(self.threat_list_clear),
            Signal::ContractVerified => flag(self.contract_verified),
        }
    }

    /// Trust score for a target of `kind`, from [`TRUST_WEIGHTS`].
    pub fn trust_score_for(&self, kind: TargetKind) -> u32 {
        let (earned, possible) = TRUST_WEIGHTS
            .iter()
            .filter(|w| w.applies_to == kind)
            .fold((0.0, 0.0), |(earned, possible), w| {
                (
                    earned + w.weight as f64 * self.credit(w.signal),
                    possible + w.weight as f64,
                )
            });

        if possible == 0.0 {
            return 0;
        }
        ((earned / possible) * 100.0).round().clamp(0.0, 100.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::VocabularyMatch;
    use serde_json::json;

    #[test]
    fn test_default_report_serializes_every_field() {
        let v = serde_json::to_value(ScanReport::default()).unwrap();
        assert_eq!(
            v,
            json!({
                "aiMentions": false,
                "whitepaper": false,
                "teamTransparency": false,
                "githubActivity": false,
                "socialProof": false,
                "domainAge": 0,
                "threatListClear": false,
                "contractVerified": false,
                "aiScore": { "score": 0, "matched": [] },
                "trustScore": 0
            })
        );
    }

    #[test]
    fn test_apply_content() {
        let mut report = ScanReport::default();
        report.apply(&Evidence::Content {
            ai: VocabularyMatch {
                score: 20,
                matched: vec!["machine learning".into()],
            },
            whitepaper: true,
        });
        assert!(report.ai_mentions);
        assert!(report.whitepaper);
        assert_eq!(report.ai_score.score, 20);
    }

    #[test]
    fn test_trust_score_url() {
        let mut report = ScanReport::default();
        assert_eq!(report.trust_score_for(TargetKind::Url), 0);

        report.apply(&Evidence::TeamTransparency(true));
        report.apply(&Evidence::GithubActivity(true));
        assert_eq!(report.trust_score_for(TargetKind::Url), 40);

        report.apply(&Evidence::DomainAge(200));
        // half of the 15-point domain age weight
        assert_eq!(report.trust_score_for(TargetKind::Url), 48);
    }

    #[test]
    fn test_trust_score_address_ignores_url_signals() {
        let mut report = ScanReport::default();
        report.apply(&Evidence::SocialPresence(true));
        assert_eq!(report.trust_score_for(TargetKind::Address), 0);
        report.apply(&Evidence::ContractVerified(true));
        assert_eq!(report.trust_score_for(TargetKind::Address), 100);
    }
}
