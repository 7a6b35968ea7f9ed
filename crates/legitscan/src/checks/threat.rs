//! Threat-intelligence lookup (Safe Browsing v4 `threatMatches:find`).

use super::{missing_credential, Check, CheckContext, CheckKind, Evidence};
use crate::config::{ScannerConfig, ENV_SAFE_BROWSING_API_KEY};
use crate::error::CheckError;
use crate::target::{Target, TargetKind};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

pub struct ThreatIntelCheck;

const THREAT_TYPES: &[&str] = &[
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "UNWANTED_SOFTWARE",
    "POTENTIALLY_HARMFUL_APPLICATION",
];

#[derive(Debug, Deserialize)]
struct ThreatMatches {
    #[serde(default)]
    matches: Vec<ThreatMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatch {
    threat_type: Option<String>,
}

/// Request body submitting one URL for matching.
pub fn lookup_body(url: &str) -> Value {
    json!({
        "client": {
            "clientId": env!("CARGO_PKG_NAME"),
            "clientVersion": env!("CARGO_PKG_VERSION"),
        },
        "threatInfo": {
            "threatTypes": THREAT_TYPES,
            "platformTypes": ["ANY_PLATFORM"],
            "threatEntryTypes": ["URL"],
            "threatEntries": [{ "url": url }],
        }
    })
}

#[async_trait]
impl Check for ThreatIntelCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::ThreatIntel
    }

    fn applies_to(&self, kind: TargetKind) -> bool {
        kind == TargetKind::Url
    }

    fn skip_reason(&self, _target: &Target, config: &ScannerConfig) -> Option<String> {
        match config.credentials.safe_browsing_api_key {
            Some(_) => None,
            None => Some(missing_credential(ENV_SAFE_BROWSING_API_KEY)),
        }
    }

    async fn run(&self, target: &Target, ctx: &CheckContext) -> Result<Evidence, CheckError> {
        let key = ctx
            .config
            .credentials
            .safe_browsing_api_key
            .as_deref()
            .ok_or_else(|| CheckError::Payload(missing_credential(ENV_SAFE_BROWSING_API_KEY)))?;
        let endpoint =
            url::Url::parse_with_params(&ctx.config.endpoints.safe_browsing, &[("key", key)])
                .map_err(|e| CheckError::Payload(format!("bad threat endpoint: {e}")))?;

        let body = lookup_body(&target.to_string());
        let found: ThreatMatches = ctx.http.post_json(endpoint.as_str(), &body).await?;

        if !found.matches.is_empty() {
            let types: Vec<&str> = found
                .matches
                .iter()
                .filter_map(|m| m.threat_type.as_deref())
                .collect();
            tracing::warn!(target_url = %target, threats = ?types, "target is on a threat list");
        }

        Ok(Evidence::ThreatListClear(found.matches.is_empty()))
    }
}
