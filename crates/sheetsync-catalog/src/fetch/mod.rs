//! Retrieval of the raw spreadsheet text.
//!
//! The fetcher walks an ordered list of [`FetchStrategy`] values (direct
//! first, then each proxy) and stops at the first one that returns a
//! successful response. Each strategy gets its own retry budget from
//! [`FetchPolicy`]; moving between strategies never sleeps. Exhausting every
//! strategy is not an error: [`SourceFetcher::fetch_raw`] returns `None` and
//! the caller keeps whatever catalog it already has.

mod strategy;
mod url;

use std::time::Duration;

use reqwest::Client;
use sheetsync_core::AppConfig;

use crate::error::FetchError;
use crate::retry::retry_with_linear_backoff;

pub use strategy::{strategy_chain, FetchPolicy, FetchStrategy};
pub use url::{export_csv_url, proxy_request_url};

/// What happened during one [`SourceFetcher::fetch_with_report`] call.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Response body of the winning strategy, `None` when all failed.
    pub body: Option<String>,
    /// Label of the winning strategy.
    pub strategy: Option<String>,
    /// Attempts made across all strategies.
    pub attempts: u32,
    /// Back-off sleeps taken across all strategies, in order.
    pub backoffs: Vec<Duration>,
}

impl FetchReport {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.body.is_some()
    }
}

/// HTTP client for the spreadsheet document and its proxy fallbacks.
pub struct SourceFetcher {
    client: Client,
    document_url: String,
    strategies: Vec<FetchStrategy>,
    policy: FetchPolicy,
}

impl SourceFetcher {
    /// Creates a fetcher for `document_url`, which is first rewritten to its
    /// CSV export form (see [`export_csv_url`]).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        document_url: &str,
        proxy_templates: &[String],
        policy: FetchPolicy,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(policy.timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            document_url: export_csv_url(document_url),
            strategies: strategy_chain(proxy_templates),
            policy,
        })
    }

    /// Creates a fetcher from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let policy = FetchPolicy {
            proxy_attempts: config.retry_attempts,
            base_delay: config.retry_delay(),
            timeout: config.request_timeout(),
        };
        Self::new(
            &config.document_url,
            &config.proxy_urls,
            policy,
            &config.user_agent,
        )
    }

    /// The URL requested by the direct strategy.
    #[must_use]
    pub fn document_url(&self) -> &str {
        &self.document_url
    }

    #[must_use]
    pub fn strategies(&self) -> &[FetchStrategy] {
        &self.strategies
    }

    #[must_use]
    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Returns the raw document text, or `None` once every strategy failed.
    pub async fn fetch_raw(&self) -> Option<String> {
        self.fetch_with_report().await.body
    }

    /// Runs the strategy chain and reports attempts and back-offs along
    /// with the body.
    pub async fn fetch_with_report(&self) -> FetchReport {
        let mut report = FetchReport::default();

        for strategy in &self.strategies {
            let label = strategy.label();
            let url = match strategy.request_url(&self.document_url) {
                Ok(url) => url,
                Err(err) => {
                    tracing::warn!(strategy = %label, error = %err, "skipping strategy");
                    continue;
                }
            };

            let outcome = retry_with_linear_backoff(
                strategy.max_attempts(&self.policy),
                self.policy.base_delay,
                &label,
                |attempt| {
                    tracing::debug!(strategy = %label, attempt, "fetching document");
                    self.attempt(&url)
                },
            )
            .await;

            report.attempts += outcome.attempts;
            report.backoffs.extend(outcome.delays);

            match outcome.result {
                Ok(body) => {
                    tracing::info!(
                        strategy = %label,
                        attempts = report.attempts,
                        bytes = body.len(),
                        "document fetched"
                    );
                    report.body = Some(body);
                    report.strategy = Some(label);
                    return report;
                }
                Err(err) => {
                    tracing::warn!(strategy = %label, error = %err, "strategy failed, falling back");
                }
            }
        }

        tracing::warn!(
            attempts = report.attempts,
            strategies = self.strategies.len(),
            "all fetch strategies exhausted"
        );
        report
    }

    /// One bounded request. The timeout covers connect, headers, and body.
    async fn attempt(&self, url: &str) -> Result<String, FetchError> {
        let request = async {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "text/csv,text/plain;q=0.9,*/*;q=0.8")
                .header(reqwest::header::CACHE_CONTROL, "no-cache")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            Ok::<_, FetchError>(response.text().await?)
        };

        tokio::time::timeout(self.policy.timeout, request)
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.to_owned(),
                timeout_ms: self.policy.timeout.as_millis(),
            })?
    }
}
