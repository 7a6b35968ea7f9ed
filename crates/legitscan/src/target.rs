//! Target parsing and validation.
//!
//! A target is either an absolute `http(s)` URL with a host, or an EVM
//! contract address. Anything else is rejected before a single outbound
//! request is made.

use crate::error::ScanError;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use url::Url;

/// The validated subject of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A website to fetch and inspect.
    Url(Url),
    /// A `0x`-prefixed, 20-byte hex contract address (case preserved).
    Address(String),
}

/// Which validator accepted a target. Checks declare the kinds they apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Url,
    Address,
}

fn address_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("address regex is valid"))
}

impl Target {
    /// Validate a raw target string.
    ///
    /// Leading and trailing whitespace is ignored. An empty string is
    /// [`ScanError::MissingTarget`]; a string that is neither a URL nor an
    /// address is [`ScanError::InvalidTarget`].
    pub fn parse(raw: &str) -> Result<Self, ScanError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ScanError::MissingTarget);
        }

        if address_pattern().is_match(raw) {
            return Ok(Target::Address(raw.to_string()));
        }

        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {
                Ok(Target::Url(url))
            }
            _ => Err(ScanError::InvalidTarget),
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Url(_) => TargetKind::Url,
            Target::Address(_) => TargetKind::Address,
        }
    }

    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Target::Url(url) => Some(url),
            Target::Address(_) => None,
        }
    }

    pub fn as_address(&self) -> Option<&str> {
        match self {
            Target::Address(addr) => Some(addr),
            Target::Url(_) => None,
        }
    }

    /// Registrable-looking host of a URL target with a leading `www.` removed.
    pub fn domain(&self) -> Option<String> {
        let host = self.as_url()?.host_str()?;
        Some(host.strip_prefix("www.").unwrap_or(host).to_string())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Url(url) => write!(f, "{url}"),
            Target::Address(addr) => write!(f, "{addr}"),
        }
    }
}
