//! HTTP client for the per-platform collector services.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use leadgen_core::Platform;

use crate::error::CollectorError;
use crate::raw::{CollectorOutput, RawLead};
use crate::retry::retry_with_backoff;

/// Browser-profile user agent used for the altered-identity refetch of a
/// flagged decoy page.
pub const BROWSER_FALLBACK_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// A source of raw leads for one platform.
///
/// Implementations must not panic across this boundary: any failure is
/// reported through [`CollectorOutput::error`] so one collector can never
/// abort its siblings.
#[async_trait]
pub trait Collector: Send + Sync {
    fn platform(&self) -> Platform;

    async fn collect(&self, urls: &[String]) -> CollectorOutput;

    /// Single-URL refetch with an altered identity, used by the decoy gate
    /// for the one retry a flagged record gets.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError`] when the refetch round-trip fails.
    async fn refetch(&self, url: &str) -> Result<Option<RawLead>, CollectorError>;
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    urls: &'a [String],
    headless: bool,
    anti_detection: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_agent: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    referer: Option<String>,
}

/// HTTP client for one platform's collector service.
///
/// POSTs URL batches to the service's `/scrape` endpoint and decodes the
/// uniform [`CollectorOutput`] shape. Anti-bot and DOM extraction internals
/// stay behind the service; this client only speaks the batch contract.
///
/// Transient errors (429, network failures) are retried up to `max_retries`
/// additional attempts; the wait between attempts honors the service's
/// `Retry-After` hint when it exceeds the exponential schedule.
pub struct HttpCollector {
    client: Client,
    platform: Platform,
    endpoint: String,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl HttpCollector {
    /// Creates an `HttpCollector` with configured timeout, `User-Agent`, and
    /// retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::InvalidEndpoint`] if `endpoint` is not an
    /// absolute URL, or [`CollectorError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        platform: Platform,
        endpoint: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, CollectorError> {
        reqwest::Url::parse(endpoint).map_err(|e| CollectorError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            platform,
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Refetches a single flagged URL through the service with a browser
    /// user-agent profile and a same-origin referer.
    ///
    /// Returns the refetched record, or `None` when the service produced
    /// nothing for the URL.
    ///
    /// # Errors
    ///
    /// Returns the same errors as a batch scrape; see [`Self::scrape`].
    pub async fn refetch_with_browser_profile(
        &self,
        url: &str,
    ) -> Result<Option<RawLead>, CollectorError> {
        let urls = vec![url.to_owned()];
        let referer = page_origin(url);
        let output = self
            .scrape(&urls, Some(BROWSER_FALLBACK_UA), referer)
            .await?;
        Ok(output.data.into_iter().next())
    }

    /// One service round-trip with retry on transient errors.
    ///
    /// # Errors
    ///
    /// - [`CollectorError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`CollectorError::NotFound`] — HTTP 404 (not retried).
    /// - [`CollectorError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`CollectorError::Http`] — network failure after all retries exhausted.
    /// - [`CollectorError::Deserialize`] — response body is not a valid
    ///   collector output document (not retried).
    async fn scrape(
        &self,
        urls: &[String],
        user_agent_override: Option<&str>,
        referer: Option<String>,
    ) -> Result<CollectorOutput, CollectorError> {
        let scrape_url = format!("{}/scrape", self.endpoint);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let scrape_url = scrape_url.clone();
            let referer = referer.clone();
            async move {
                let body = ScrapeRequest {
                    urls,
                    headless: true,
                    anti_detection: true,
                    user_agent: user_agent_override,
                    referer,
                };

                let response = self.client.post(&scrape_url).json(&body).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);

                    return Err(CollectorError::RateLimited {
                        domain: self.endpoint.clone(),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(CollectorError::NotFound { url: scrape_url });
                }

                if !status.is_success() {
                    return Err(CollectorError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: scrape_url,
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<CollectorOutput>(&body).map_err(|e| {
                    CollectorError::Deserialize {
                        context: format!("{} collector response", self.platform),
                        source: e,
                    }
                })
            }
        })
        .await
    }
}

#[async_trait]
impl Collector for HttpCollector {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn refetch(&self, url: &str) -> Result<Option<RawLead>, CollectorError> {
        self.refetch_with_browser_profile(url).await
    }

    async fn collect(&self, urls: &[String]) -> CollectorOutput {
        match self.scrape(urls, None, None).await {
            Ok(output) => {
                tracing::info!(
                    platform = %self.platform,
                    urls_requested = urls.len(),
                    records = output.data.len(),
                    "collector batch completed"
                );
                output
            }
            Err(err) => {
                tracing::error!(
                    platform = %self.platform,
                    urls_requested = urls.len(),
                    error = %err,
                    "collector batch failed"
                );
                CollectorOutput::failed(err.to_string(), urls.len())
            }
        }
    }
}

/// Scheme + host origin of a page URL, used as the refetch referer.
fn page_origin(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(format!("{}://{host}/", parsed.scheme()))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
