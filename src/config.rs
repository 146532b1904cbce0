//! Client configuration.
//!
//! Everything that shapes the HTTP side of a call lives in [`ClientConfig`],
//! built via [`ClientConfigBuilder`]. The defaults talk to the real site with
//! the HTTP client's own timeout behaviour; tests point `base_url` at a local
//! mock server instead.

use crate::error::EzgifError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default upstream site.
pub const DEFAULT_BASE_URL: &str = "https://ezgif.com";

/// Configuration shared by every operation.
///
/// # Example
/// ```rust
/// use ezgif_convert::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .timeout_secs(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url, "https://ezgif.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Site root every operation path is joined onto. Default: `https://ezgif.com`.
    pub base_url: String,

    /// Whole-request timeout in seconds. Default: none (the HTTP client's own
    /// behaviour applies).
    pub timeout_secs: Option<u64>,

    /// Maximum number of redirects followed per request. Default: 10.
    pub max_redirects: usize,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            max_redirects: 10,
            user_agent: concat!("ezgif-convert/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults overridden by `EZGIF_BASE_URL` and `EZGIF_TIMEOUT` when set.
    /// Empty or whitespace-only values are ignored.
    pub fn from_env() -> Result<Self, EzgifError> {
        let var = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut builder = Self::builder();
        if let Some(url) = var("EZGIF_BASE_URL") {
            builder = builder.base_url(url);
        }
        if let Some(secs) = var("EZGIF_TIMEOUT") {
            let secs: u64 = secs.parse().map_err(|_| {
                EzgifError::InvalidConfig(format!("EZGIF_TIMEOUT must be whole seconds, got {secs:?}"))
            })?;
            builder = builder.timeout_secs(secs);
        }
        builder.build()
    }

    /// Parsed [`ClientConfig::base_url`].
    pub fn base(&self) -> Result<Url, EzgifError> {
        Url::parse(&self.base_url).map_err(|e| {
            EzgifError::InvalidConfig(format!("base URL {:?} is not valid: {e}", self.base_url))
        })
    }

    /// Absolute URL for an operation path such as `/webp-to-mp4`.
    pub fn endpoint(&self, path: &str) -> Result<Url, EzgifError> {
        self.base()?.join(path).map_err(|e| {
            EzgifError::InvalidConfig(format!("cannot join {path:?} onto {:?}: {e}", self.base_url))
        })
    }

    /// Build a fresh HTTP client for one call.
    pub fn http_client(&self) -> Result<reqwest::Client, EzgifError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(self.max_redirects));
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
            .build()
            .map_err(|e| EzgifError::Internal(format!("Failed to build HTTP client: {e}")))
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = Some(secs);
        self
    }

    pub fn max_redirects(mut self, n: usize) -> Self {
        self.config.max_redirects = n;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, EzgifError> {
        let c = &self.config;
        let base = c.base()?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(EzgifError::InvalidConfig(format!(
                "base URL must be http or https, got {:?}",
                c.base_url
            )));
        }
        if c.max_redirects == 0 {
            return Err(EzgifError::InvalidConfig(
                "max_redirects must be ≥ 1; every upload answers with a redirect".into(),
            ));
        }
        if c.timeout_secs == Some(0) {
            return Err(EzgifError::InvalidConfig("timeout must be ≥ 1 second".into()));
        }
        Ok(self.config)
    }
}
