use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub environment: String,

    // Price cache
    pub price_refresh_interval_secs: u64,
    pub price_fetch_timeout_secs: u64,
    pub coingecko_api_url: String,

    // Wager adjustment
    pub auto_adjust_wager: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            price_refresh_interval_secs: env::var("PRICE_REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()?,
            price_fetch_timeout_secs: env::var("PRICE_FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            coingecko_api_url: env::var("COINGECKO_API_URL")
                .unwrap_or_else(|_| crate::constants::COINGECKO_API_URL.to_string()),

            auto_adjust_wager: env::var("AUTO_ADJUST_WAGER")
                .map(|v| {
                    let normalized = v.trim().to_ascii_lowercase();
                    normalized == "1" || normalized == "true" || normalized == "yes" || normalized == "on"
                })
                .unwrap_or(true),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.price_refresh_interval_secs == 0 {
            anyhow::bail!("PRICE_REFRESH_INTERVAL_SECS must be > 0");
        }
        if self.price_fetch_timeout_secs == 0 {
            anyhow::bail!("PRICE_FETCH_TIMEOUT_SECS must be > 0");
        }
        if self.coingecko_api_url.trim().is_empty() {
            anyhow::bail!("COINGECKO_API_URL is empty");
        }

        if self.price_refresh_interval_secs < 5 {
            tracing::warn!("Very short price refresh interval; public APIs may rate limit");
        }
        if self.price_fetch_timeout_secs >= self.price_refresh_interval_secs {
            tracing::warn!("Price fetch timeout exceeds refresh interval");
        }

        Ok(())
    }

    pub fn is_testnet(&self) -> bool {
        self.environment == "development" || self.environment == "testnet"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            price_refresh_interval_secs: crate::constants::PRICE_REFRESH_INTERVAL_SECS,
            price_fetch_timeout_secs: crate::constants::PRICE_FETCH_TIMEOUT_SECS,
            coingecko_api_url: crate::constants::COINGECKO_API_URL.to_string(),
            auto_adjust_wager: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.price_refresh_interval_secs, 60);
        assert!(config.auto_adjust_wager);
        assert!(config.is_testnet());
    }

    #[test]
    fn zero_refresh_interval_is_rejected() {
        let config = Config {
            price_refresh_interval_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
