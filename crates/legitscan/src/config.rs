//! Scanner configuration.
//!
//! Everything a scan needs from its environment lives in [`ScannerConfig`]:
//! credentials, third-party endpoints, timeouts and the outbound user agent.
//! It is built once (usually via [`ScannerConfig::from_env`]) and handed to
//! [`crate::Aggregator::new`]; checks never read the environment themselves.
//!
//! Missing credentials are not an error. The affected check is skipped and
//! contributes its default value to the report.

use std::time::Duration;

/// Default per-check time budget.
pub const DEFAULT_CHECK_TIMEOUT_MS: u64 = 8_000;
/// Default per-request timeout on the shared HTTP client.
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5_000;
/// User agent sent with every outbound request.
pub const DEFAULT_USER_AGENT: &str = "AI-Legitimacy-Scanner/1.0";

pub const ENV_WHOIS_API_KEY: &str = "WHOIS_API_KEY";
pub const ENV_SAFE_BROWSING_API_KEY: &str = "SAFE_BROWSING_API_KEY";
pub const ENV_ETHERSCAN_API_KEY: &str = "ETHERSCAN_API_KEY";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";

/// API credentials for the paid third-party services.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub whois_api_key: Option<String>,
    pub safe_browsing_api_key: Option<String>,
    pub etherscan_api_key: Option<String>,
    /// Optional; GitHub is queried anonymously without it.
    pub github_token: Option<String>,
}

/// Base URLs of the external collaborators.
///
/// Overridable so tests can point every check at a mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub github_api: String,
    pub whois: String,
    pub safe_browsing: String,
    pub etherscan: String,
    /// Social profile URL templates; `{domain}` is replaced by the target host.
    pub social_profiles: Vec<String>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            github_api: "https://api.github.com".to_string(),
            whois: "https://www.whoisxmlapi.com/whoisserver/WhoisService".to_string(),
            safe_browsing: "https://safebrowsing.googleapis.com/v4/threatMatches:find".to_string(),
            etherscan: "https://api.etherscan.io/api".to_string(),
            social_profiles: vec![
                "https://twitter.com/{domain}".to_string(),
                "https://linkedin.com/company/{domain}".to_string(),
            ],
        }
    }
}

/// Complete configuration for an [`crate::Aggregator`].
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    /// Upper bound on a single check, including all of its requests.
    pub check_timeout: Duration,
    /// Upper bound on a single outbound HTTP request.
    pub http_timeout: Duration,
    pub user_agent: String,
    /// Sub-paths probed for team information, resolved against the target.
    pub team_paths: Vec<String>,
    /// A repository is "active" with strictly more commits than this.
    pub commit_threshold: usize,
    /// Expose internal error detail in 500 responses.
    pub development_mode: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            endpoints: Endpoints::default(),
            check_timeout: Duration::from_millis(DEFAULT_CHECK_TIMEOUT_MS),
            http_timeout: Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            team_paths: vec![
                "/about".to_string(),
                "/team".to_string(),
                "/about-us".to_string(),
            ],
            commit_threshold: 10,
            development_mode: false,
        }
    }
}

impl ScannerConfig {
    /// Build a configuration from process environment variables.
    ///
    /// Blank values are treated as unset. Unparseable timeouts fall back to
    /// their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let millis = |key: &str, default: u64| {
            get(key)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(default)
        };

        let development_mode = get("LEGITSCAN_DEV_MODE")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false)
            || get("NODE_ENV").as_deref() == Some("development");

        Self {
            credentials: Credentials {
                whois_api_key: get(ENV_WHOIS_API_KEY),
                safe_browsing_api_key: get(ENV_SAFE_BROWSING_API_KEY),
                etherscan_api_key: get(ENV_ETHERSCAN_API_KEY),
                github_token: get(ENV_GITHUB_TOKEN),
            },
            check_timeout: Duration::from_millis(millis(
                "LEGITSCAN_TIMEOUT_MS",
                DEFAULT_CHECK_TIMEOUT_MS,
            )),
            http_timeout: Duration::from_millis(millis(
                "LEGITSCAN_HTTP_TIMEOUT_MS",
                DEFAULT_HTTP_TIMEOUT_MS,
            )),
            user_agent: get("LEGITSCAN_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            development_mode,
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_check_timeout(mut self, timeout: Duration) -> Self {
        self.check_timeout = timeout;
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_development_mode(mut self, on: bool) -> Self {
        self.development_mode = on;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let cfg = ScannerConfig::from_lookup(lookup(&[]));
        assert!(cfg.credentials.whois_api_key.is_none());
        assert_eq!(cfg.check_timeout, Duration::from_millis(8_000));
        assert_eq!(cfg.http_timeout, Duration::from_millis(5_000));
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(cfg.team_paths.len(), 3);
        assert!(!cfg.development_mode);
    }

    #[test]
    fn test_blank_credentials_are_unset() {
        let cfg = ScannerConfig::from_lookup(lookup(&[
            ("WHOIS_API_KEY", "   "),
            ("ETHERSCAN_API_KEY", "abc"),
        ]));
        assert!(cfg.credentials.whois_api_key.is_none());
        assert_eq!(cfg.credentials.etherscan_api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_timeouts_and_dev_mode() {
        let cfg = ScannerConfig::from_lookup(lookup(&[
            ("LEGITSCAN_TIMEOUT_MS", "1500"),
            ("LEGITSCAN_HTTP_TIMEOUT_MS", "nope"),
            ("NODE_ENV", "development"),
        ]));
        assert_eq!(cfg.check_timeout, Duration::from_millis(1500));
        assert_eq!(cfg.http_timeout, Duration::from_millis(5_000));
        assert!(cfg.development_mode);
    }

    #[test]
    fn test_zero_timeout_falls_back() {
        let cfg = ScannerConfig::from_lookup(lookup(&[("LEGITSCAN_TIMEOUT_MS", "0")]));
        assert_eq!(cfg.check_timeout, Duration::from_millis(8_000));
    }
}
