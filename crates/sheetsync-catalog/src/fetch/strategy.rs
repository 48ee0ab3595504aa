//! Fetch strategies: the direct request and one per proxy endpoint.

use std::time::Duration;

use crate::error::FetchError;

use super::url::proxy_request_url;

/// Attempt and timing limits shared by all strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Attempts per proxy. The direct strategy always gets one.
    pub proxy_attempts: u32,
    /// Linear back-off unit between attempts on the same proxy.
    pub base_delay: Duration,
    /// Upper bound on one attempt, body download included.
    pub timeout: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            proxy_attempts: 3,
            base_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(10),
        }
    }
}

/// One path to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStrategy {
    Direct,
    Proxy { template: String },
}

impl FetchStrategy {
    /// Short name for logs: `direct` or `proxy:<host>`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            FetchStrategy::Direct => "direct".to_owned(),
            FetchStrategy::Proxy { template } => {
                let host = reqwest::Url::parse(&template.replace(super::url::URL_PLACEHOLDER, ""))
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_owned))
                    .unwrap_or_else(|| template.clone());
                format!("proxy:{host}")
            }
        }
    }

    #[must_use]
    pub fn max_attempts(&self, policy: &FetchPolicy) -> u32 {
        match self {
            FetchStrategy::Direct => 1,
            FetchStrategy::Proxy { .. } => policy.proxy_attempts.max(1),
        }
    }

    /// The URL this strategy requests for `document_url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when the resulting URL does not parse
    /// as an absolute http(s) URL.
    pub fn request_url(&self, document_url: &str) -> Result<String, FetchError> {
        let url = match self {
            FetchStrategy::Direct => document_url.to_owned(),
            FetchStrategy::Proxy { template } => proxy_request_url(template, document_url),
        };
        match reqwest::Url::parse(&url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url),
            Ok(parsed) => Err(FetchError::InvalidUrl {
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
                url,
            }),
            Err(e) => Err(FetchError::InvalidUrl {
                reason: e.to_string(),
                url,
            }),
        }
    }
}

/// Direct first, then every proxy in priority order.
#[must_use]
pub fn strategy_chain(proxy_templates: &[String]) -> Vec<FetchStrategy> {
    std::iter::once(FetchStrategy::Direct)
        .chain(proxy_templates.iter().map(|t| FetchStrategy::Proxy {
            template: t.clone(),
        }))
        .collect()
}
