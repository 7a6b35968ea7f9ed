//! Declarative scoring tables.
//!
//! Keyword vocabularies and trust weights are data. Each [`Vocabulary`] is a
//! list of `(label, pattern, weight)` rules with a score cap; patterns are
//! compiled once, case-insensitively, on first use. [`TRUST_WEIGHTS`] turns a
//! finished report into a 0–100 trust score.
//!
//! Nothing here performs I/O, so every table is testable on plain strings.

use crate::target::TargetKind;
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

// ── Vocabularies ─────────────────────────────────────────────────────────────

/// One weighted pattern in a vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct ScoringRule {
    /// Reported in [`VocabularyMatch::matched`] when the pattern hits.
    pub label: &'static str,
    /// Regular expression, matched case-insensitively.
    pub pattern: &'static str,
    pub weight: u32,
}

/// A named keyword table with a maximum attainable score.
#[derive(Debug)]
pub struct Vocabulary {
    pub name: &'static str,
    pub rules: &'static [ScoringRule],
    pub cap: u32,
    compiled: OnceLock<Vec<Regex>>,
}

/// Outcome of running a vocabulary over a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularyMatch {
    /// Sum of matched rule weights, clamped to the vocabulary cap.
    pub score: u32,
    /// Labels of every matched rule, in table order.
    pub matched: Vec<String>,
}

impl VocabularyMatch {
    pub fn is_match(&self) -> bool {
        !self.matched.is_empty()
    }
}

impl Vocabulary {
    pub const fn new(name: &'static str, rules: &'static [ScoringRule], cap: u32) -> Self {
        Self {
            name,
            rules,
            cap,
            compiled: OnceLock::new(),
        }
    }

    fn patterns(&self) -> &[Regex] {
        self.compiled.get_or_init(|| {
            self.rules
                .iter()
                .map(|rule| {
                    RegexBuilder::new(rule.pattern)
                        .case_insensitive(true)
                        .build()
                        .expect("vocabulary regex is valid")
                })
                .collect()
        })
    }

    /// Score `text` against every rule. Each rule counts at most once.
    pub fn evaluate(&self, text: &str) -> VocabularyMatch {
        let mut result = VocabularyMatch::default();
        let mut total = 0u32;

        for (rule, re) in self.rules.iter().zip(self.patterns()) {
            if re.is_match(text) {
                total = total.saturating_add(rule.weight);
                result.matched.push(rule.label.to_string());
            }
        }

        result.score = total.min(self.cap);
        result
    }

    /// Whether any rule matches, without scoring the rest.
    pub fn matches(&self, text: &str) -> bool {
        self.patterns().iter().any(|re| re.is_match(text))
    }
}

/// Terminology that marks a project as genuinely AI-related.
///
/// The five core terms are open-ended so inflections ("AI modeling",
/// "neural networking") count; the short `llm` needs both boundaries.
pub static AI_TECHNOLOGY: Vocabulary = Vocabulary::new(
    "ai_technology",
    &[
        ScoringRule { label: "artificial intelligence", pattern: r"\bartificial intelligence", weight: 20 },
        ScoringRule { label: "machine learning", pattern: r"\bmachine learning", weight: 20 },
        ScoringRule { label: "neural network", pattern: r"\bneural network", weight: 15 },
        ScoringRule { label: "deep learning", pattern: r"\bdeep learning", weight: 15 },
        ScoringRule { label: "ai model", pattern: r"\bai model", weight: 15 },
        ScoringRule { label: "large language model", pattern: r"\blarge language models?\b", weight: 15 },
        ScoringRule { label: "llm", pattern: r"\bllms?\b", weight: 10 },
        ScoringRule { label: "natural language processing", pattern: r"\bnatural language processing\b", weight: 10 },
        ScoringRule { label: "computer vision", pattern: r"\bcomputer vision\b", weight: 10 },
    ],
    100,
);

/// Signs of published technical documentation.
pub static WHITEPAPER: Vocabulary = Vocabulary::new(
    "whitepaper",
    &[
        ScoringRule { label: "whitepaper", pattern: r"\bwhite ?papers?\b", weight: 1 },
        ScoringRule { label: "litepaper", pattern: r"\blitepapers?\b", weight: 1 },
        ScoringRule { label: "technical paper", pattern: r"\btechnical papers?\b", weight: 1 },
        ScoringRule { label: "research paper", pattern: r"\bresearch papers?\b", weight: 1 },
        ScoringRule { label: "technical documentation", pattern: r"\btechnical documentation\b", weight: 1 },
    ],
    5,
);

/// Phrases found on pages that introduce the people behind a project.
pub static TEAM: Vocabulary = Vocabulary::new(
    "team",
    &[
        ScoringRule { label: "meet the team", pattern: r"\bmeet the team\b", weight: 1 },
        ScoringRule { label: "our team", pattern: r"\bour team\b", weight: 1 },
        ScoringRule { label: "about us", pattern: r"\babout us\b", weight: 1 },
        ScoringRule { label: "team members", pattern: r"\bteam members?\b", weight: 1 },
        ScoringRule { label: "founders", pattern: r"\b(co-?)?founders?\b", weight: 1 },
        ScoringRule { label: "leadership", pattern: r"\bleadership\b", weight: 1 },
    ],
    6,
);

// ── Trust weights ────────────────────────────────────────────────────────────

/// Report fields that contribute to the trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    AiMentions,
    Whitepaper,
    TeamTransparency,
    GithubActivity,
    SocialProof,
    DomainAge,
    ThreatListClear,
    ContractVerified,
}

/// Weight of one signal for one kind of target.
#[derive(Debug, Clone, Copy)]
pub struct TrustWeight {
    pub signal: Signal,
    pub weight: u32,
    pub applies_to: TargetKind,
}

/// Domains at least this old earn full domain-age credit.
pub const ESTABLISHED_DOMAIN_DAYS: u64 = 365;
/// Domains at least this old earn half credit.
pub const MATURING_DOMAIN_DAYS: u64 = 180;

pub const TRUST_WEIGHTS: &[TrustWeight] = &[
    TrustWeight { signal: Signal::AiMentions, weight: 10, applies_to: TargetKind::Url },
    TrustWeight { signal: Signal::Whitepaper, weight: 15, applies_to: TargetKind::Url },
    TrustWeight { signal: Signal::TeamTransparency, weight: 20, applies_to: TargetKind::Url },
    TrustWeight { signal: Signal::GithubActivity, weight: 20, applies_to: TargetKind::Url },
    TrustWeight { signal: Signal::SocialProof, weight: 10, applies_to: TargetKind::Url },
    TrustWeight { signal: Signal::DomainAge, weight: 15, applies_to: TargetKind::Url },
    TrustWeight { signal: Signal::ThreatListClear, weight: 10, applies_to: TargetKind::Url },
    TrustWeight { signal: Signal::ContractVerified, weight: 100, applies_to: TargetKind::Address },
];

/// Fraction of the domain-age weight earned by a domain of `days`.
pub fn domain_age_credit(days: u64) -> f64 {
    if days >= ESTABLISHED_DOMAIN_DAYS {
        1.0
    } else if days >= MATURING_DOMAIN_DAYS {
        0.5
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        for vocab in [&AI_TECHNOLOGY, &WHITEPAPER, &TEAM] {
            assert_eq!(vocab.patterns().len(), vocab.rules.len(), "{}", vocab.name);
        }
    }

    #[test]
    fn test_ai_match_is_case_insensitive() {
        let m = AI_TECHNOLOGY.evaluate("Powered by Machine Learning.");
        assert!(m.is_match());
        assert_eq!(m.matched, vec!["machine learning"]);
        assert_eq!(m.score, 20);
    }

    #[test]
    fn test_ai_score_is_capped() {
        let text = "artificial intelligence, machine learning, neural networks, deep learning, \
                    AI models, large language models, LLMs, natural language processing, \
                    computer vision";
        let m = AI_TECHNOLOGY.evaluate(text);
        assert_eq!(m.matched.len(), AI_TECHNOLOGY.rules.len());
        assert_eq!(m.score, 100);
    }

    #[test]
    fn test_rule_counts_once() {
        let m = AI_TECHNOLOGY.evaluate("deep learning deep learning deep learning");
        assert_eq!(m.score, 15);
    }

    #[test]
    fn test_core_terms_match_inflections() {
        let m = AI_TECHNOLOGY.evaluate("AI modeling and neural networking since 2019");
        assert_eq!(m.matched, vec!["neural network", "ai model"]);
        assert_eq!(m.score, 30);
    }

    #[test]
    fn test_word_boundaries() {
        // "llm" inside another word must not count
        assert!(!AI_TECHNOLOGY.matches("the hallmark of quality"));
        assert!(!AI_TECHNOLOGY.matches("plain marketing copy"));
    }

    #[test]
    fn test_whitepaper_variants() {
        assert!(WHITEPAPER.matches("Read our White Paper"));
        assert!(WHITEPAPER.matches("download the litepaper"));
        assert!(WHITEPAPER.matches("<a href=/docs>Technical Documentation</a>"));
        assert!(!WHITEPAPER.matches("paper towels"));
    }

    #[test]
    fn test_team_vocabulary() {
        assert!(TEAM.matches("<h1>Meet the Team</h1>"));
        assert!(TEAM.matches("Our co-founder started in 2019"));
        assert!(!TEAM.matches("Contact sales"));
    }

    #[test]
    fn test_url_weights_sum_to_hundred() {
        let url_total: u32 = TRUST_WEIGHTS
            .iter()
            .filter(|w| w.applies_to == TargetKind::Url)
            .map(|w| w.weight)
            .sum();
        assert_eq!(url_total, 100);
    }

    #[test]
    fn test_domain_age_credit_steps() {
        assert_eq!(domain_age_credit(0), 0.0);
        assert_eq!(domain_age_credit(179), 0.0);
        assert_eq!(domain_age_credit(180), 0.5);
        assert_eq!(domain_age_credit(365), 1.0);
        assert_eq!(domain_age_credit(10_000), 1.0);
    }
}
