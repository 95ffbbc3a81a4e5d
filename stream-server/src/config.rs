use eyre::WrapErr;
use models::config::ProviderConfig;
use stream_matcher::MatchConfig;

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) port: u16,
    pub(crate) provider: ProviderConfig,
    pub(crate) matching: MatchConfig,
}

impl Config {
    pub(crate) fn from_env() -> eyre::Result<Self> {
        let port = std::env::var("STREAM_SERVER_PORT")
            .unwrap_or_else(|_| "3002".to_string())
            .parse::<u16>()
            .wrap_err("STREAM_SERVER_PORT must be a valid u16")?;
        let provider = ProviderConfig::from_env().wrap_err("load provider config")?;
        let matching = MatchConfig::from_env().wrap_err("load match config")?;

        Ok(Self {
            port,
            provider,
            matching,
        })
    }
}
