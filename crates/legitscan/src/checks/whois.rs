//! Domain registration age via a WHOIS JSON API.

use super::{missing_credential, Check, CheckContext, CheckKind, Evidence};
use crate::config::{ScannerConfig, ENV_WHOIS_API_KEY};
use crate::error::CheckError;
use crate::target::{Target, TargetKind};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

pub struct DomainAgeCheck;

#[derive(Debug, Deserialize)]
struct WhoisEnvelope {
    #[serde(rename = "WhoisRecord")]
    record: Option<WhoisRecord>,
    #[serde(rename = "ErrorMessage")]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct WhoisRecord {
    #[serde(rename = "createdDate")]
    created_date: Option<String>,
    #[serde(rename = "registryData")]
    registry_data: Option<RegistryData>,
}

#[derive(Debug, Deserialize)]
struct RegistryData {
    #[serde(rename = "createdDate")]
    created_date: Option<String>,
}

/// Parse a WHOIS creation date.
///
/// Registrars disagree on format; RFC 3339 is tried first, then the leading
/// `YYYY-MM-DD` of whatever was returned.
pub fn parse_created_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let day = raw.get(..10)?;
    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Whole days between `created` and `now`, never negative.
pub fn age_in_days(created: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - created).num_days().max(0) as u64
}

#[async_trait]
impl Check for DomainAgeCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::DomainAge
    }

    fn applies_to(&self, kind: TargetKind) -> bool {
        kind == TargetKind::Url
    }

    fn skip_reason(&self, _target: &Target, config: &ScannerConfig) -> Option<String> {
        match config.credentials.whois_api_key {
            Some(_) => None,
            None => Some(missing_credential(ENV_WHOIS_API_KEY)),
        }
    }

    async fn run(&self, target: &Target, ctx: &CheckContext) -> Result<Evidence, CheckError> {
        let key = ctx
            .config
            .credentials
            .whois_api_key
            .as_deref()
            .ok_or_else(|| CheckError::Payload(missing_credential(ENV_WHOIS_API_KEY)))?;
        let domain = target
            .domain()
            .ok_or_else(|| CheckError::Payload("target has no host".into()))?;

        let url = url::Url::parse_with_params(
            &ctx.config.endpoints.whois,
            &[
                ("apiKey", key),
                ("domainName", domain.as_str()),
                ("outputFormat", "JSON"),
            ],
        )
        .map_err(|e| CheckError::Payload(format!("bad WHOIS endpoint: {e}")))?;

        let envelope: WhoisEnvelope = ctx.http.get_json(url.as_str(), &[]).await?;
        if let Some(err) = envelope.error {
            return Err(CheckError::Payload(format!("WHOIS error: {err}")));
        }

        let record = envelope
            .record
            .ok_or_else(|| CheckError::Payload("missing WhoisRecord".into()))?;
        let raw = record
            .created_date
            .or_else(|| record.registry_data.and_then(|r| r.created_date))
            .ok_or_else(|| CheckError::Payload("missing createdDate".into()))?;
        let created = parse_created_date(&raw)
            .ok_or_else(|| CheckError::Payload(format!("unparseable createdDate {raw:?}")))?;

        Ok(Evidence::DomainAge(age_in_days(created, Utc::now())))
    }
}
