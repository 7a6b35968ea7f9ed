//! Contract source verification via an Etherscan-compatible API.

use super::{missing_credential, Check, CheckContext, CheckKind, Evidence};
use crate::config::{ScannerConfig, ENV_ETHERSCAN_API_KEY};
use crate::error::CheckError;
use crate::target::{Target, TargetKind};
use async_trait::async_trait;
use serde::Deserialize;

pub struct ContractVerificationCheck;

#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SourceRecord {
    #[serde(rename = "SourceCode", default)]
    source_code: String,
}

/// Interpret a `getsourcecode` response. `status` other than `"1"` is an
/// API-level failure (bad key, rate limit, invalid address).
fn is_verified(resp: EtherscanResponse) -> Result<bool, CheckError> {
    if resp.status != "1" {
        let detail = resp.result.as_str().unwrap_or(&resp.message).to_string();
        return Err(CheckError::Payload(format!("etherscan: {detail}")));
    }
    let records: Vec<SourceRecord> = serde_json::from_value(resp.result)?;
    Ok(records
        .first()
        .map(|r| !r.source_code.trim().is_empty())
        .unwrap_or(false))
}

#[async_trait]
impl Check for ContractVerificationCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::ContractVerification
    }

    fn applies_to(&self, kind: TargetKind) -> bool {
        kind == TargetKind::Address
    }

    fn skip_reason(&self, _target: &Target, config: &ScannerConfig) -> Option<String> {
        match config.credentials.etherscan_api_key {
            Some(_) => None,
            None => Some(missing_credential(ENV_ETHERSCAN_API_KEY)),
        }
    }

    async fn run(&self, target: &Target, ctx: &CheckContext) -> Result<Evidence, CheckError> {
        let key = ctx
            .config
            .credentials
            .etherscan_api_key
            .as_deref()
            .ok_or_else(|| CheckError::Payload(missing_credential(ENV_ETHERSCAN_API_KEY)))?;
        let address = target
            .as_address()
            .ok_or_else(|| CheckError::Payload("target is not an address".into()))?;

        let url = url::Url::parse_with_params(
            &ctx.config.endpoints.etherscan,
            &[
                ("module", "contract"),
                ("action", "getsourcecode"),
                ("address", address),
                ("apikey", key),
            ],
        )
        .map_err(|e| CheckError::Payload(format!("bad etherscan endpoint: {e}")))?;

        let resp: EtherscanResponse = ctx.http.get_json(url.as_str(), &[]).await?;
        Ok(Evidence::ContractVerified(is_verified(resp)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> EtherscanResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_verified_contract() {
        let resp = parse(
            r#"{"status":"1","message":"OK","result":[{"SourceCode":"pragma solidity ^0.8.0;","ContractName":"Token"}]}"#,
        );
        assert!(is_verified(resp).unwrap());
    }

    #[test]
    fn test_unverified_contract() {
        let resp = parse(r#"{"status":"1","message":"OK","result":[{"SourceCode":"","ABI":"Contract source code not verified"}]}"#);
        assert!(!is_verified(resp).unwrap());
    }

    #[test]
    fn test_api_error_is_payload_failure() {
        let resp = parse(r#"{"status":"0","message":"NOTOK","result":"Invalid API Key"}"#);
        match is_verified(resp) {
            Err(CheckError::Payload(msg)) => assert!(msg.contains("Invalid API Key")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
