//! Runtime configuration, read from the environment once at startup.

use std::time::Duration;

use refurb_cart::DEFAULT_CHECKOUT_DELAY;
use refurb_catalog::DEFAULT_CATALOG_URL;

pub const CATALOG_URL_ENV: &str = "REFURB_CATALOG_URL";
pub const HTTP_TIMEOUT_ENV: &str = "REFURB_HTTP_TIMEOUT_SECS";
pub const CHECKOUT_DELAY_ENV: &str = "REFURB_CHECKOUT_DELAY_MS";

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Where the product list is fetched from.
    pub catalog_url: String,
    pub http_timeout: Duration,
    /// How long simulated checkout processing takes.
    pub checkout_delay: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            checkout_delay: DEFAULT_CHECKOUT_DELAY,
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take the default;
    /// unusable values are logged and also take the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let catalog_url = match lookup(CATALOG_URL_ENV) {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            Some(_) => {
                tracing::warn!("{CATALOG_URL_ENV} is empty; using {}", defaults.catalog_url);
                defaults.catalog_url
            }
            None => defaults.catalog_url,
        };

        let http_timeout = parse_number(&lookup, HTTP_TIMEOUT_ENV)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);

        let checkout_delay = parse_number(&lookup, CHECKOUT_DELAY_ENV)
            .map(Duration::from_millis)
            .unwrap_or(defaults.checkout_delay);

        Self {
            catalog_url,
            http_timeout,
            checkout_delay,
        }
    }

    pub fn with_catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = url.into();
        self
    }
}

fn parse_number<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(value = %raw, "{key} is not a non-negative integer; using default");
            None
        }
    }
}
