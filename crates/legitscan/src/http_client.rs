//! Async HTTP client wrapping reqwest.
//!
//! One client is shared by every check of every scan. Requests are bounded
//! by the configured per-request timeout, follow up to five redirects, and
//! are never retried: a failed request is simply a failed check.

use crate::config::ScannerConfig;
use crate::error::CheckError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Response from an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Original requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Return `self` if the status is 2xx, otherwise [`CheckError::Status`].
    pub fn require_success(self) -> Result<Self, CheckError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(CheckError::Status(self.status))
        }
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, CheckError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// HTTP client for the check adapters.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client with the configured user agent and request timeout.
    pub fn new(config: &ScannerConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(config.user_agent.as_str())
            .build()
            .unwrap_or_default();

        Self {
            client,
            timeout: config.http_timeout,
        }
    }

    /// Perform a GET request. Non-2xx statuses are returned, not errors.
    pub async fn get(
        &self,
        url: &str,
        extra_headers: &[(&str, &str)],
    ) -> Result<HttpResponse, CheckError> {
        let mut builder = self.client.get(url).timeout(self.timeout);
        for (name, value) in extra_headers {
            builder = builder.header(*name, *value);
        }
        read_response(url, builder.send().await?).await
    }

    /// GET and deserialize a JSON body, failing on non-2xx statuses.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        extra_headers: &[(&str, &str)],
    ) -> Result<T, CheckError> {
        self.get(url, extra_headers).await?.require_success()?.json()
    }

    /// POST a JSON body and deserialize a JSON response, failing on non-2xx.
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, CheckError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;
        read_response(url, resp).await?.require_success()?.json()
    }

    /// Perform parallel GET requests with bounded concurrency.
    ///
    /// Results come back in completion order; each carries its own URL.
    pub async fn get_many(
        &self,
        urls: &[String],
        concurrency: usize,
    ) -> Vec<Result<HttpResponse, CheckError>> {
        use futures::stream::{self, StreamExt};

        stream::iter(urls.to_vec())
            .map(|u| {
                let client = self.clone();
                async move { client.get(&u, &[]).await }
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await
    }
}

async fn read_response(url: &str, r: reqwest::Response) -> Result<HttpResponse, CheckError> {
    let status = r.status().as_u16();
    let final_url = r.url().to_string();
    let body = r.text().await?;

    Ok(HttpResponse {
        url: url.to_string(),
        final_url,
        status,
        body,
    })
}
