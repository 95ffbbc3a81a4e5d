use std::time::Duration;

use eyre::WrapErr;

pub const DEFAULT_USER_AGENT: &str = concat!("stream-finder/", env!("CARGO_PKG_VERSION"));

/// Where the catalog gateway lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub search_url: String,
    pub resolver_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
}

impl ProviderConfig {
    pub fn from_env() -> eyre::Result<Self> {
        let search_url =
            std::env::var("CATALOG_SEARCH_URL").wrap_err("missing env var: CATALOG_SEARCH_URL")?;
        let resolver_url =
            std::env::var("CATALOG_RESOLVER_URL").unwrap_or_else(|_| search_url.clone());
        let user_agent =
            std::env::var("USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
        let timeout_secs = std::env::var("CATALOG_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .wrap_err("CATALOG_TIMEOUT_SECS must be a valid u64")?;

        Ok(Self {
            search_url: search_url.trim_end_matches('/').to_string(),
            resolver_url: resolver_url.trim_end_matches('/').to_string(),
            user_agent,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
