use crate::{
    config::Config,
    error::{Result, WagerError},
    models::TokenMeta,
    services::token_price_service::PriceSource,
};
use async_trait::async_trait;
use std::collections::HashMap;

/// Live USD prices from the CoinGecko simple-price endpoint.
///
/// One request covers the whole catalog. Tokens without a CoinGecko id
/// (free-play tokens) are skipped and simply absent from the result.
#[derive(Debug, Clone)]
pub struct CoinGeckoPriceSource {
    client: reqwest::Client,
    api_url: String,
}

impl CoinGeckoPriceSource {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.price_fetch_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_url: config.coingecko_api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PriceSource for CoinGeckoPriceSource {
    async fn fetch_catalog_prices(&self, catalog: &[TokenMeta]) -> Result<HashMap<String, f64>> {
        let ids: Vec<&str> = catalog
            .iter()
            .filter_map(|t| t.coingecko_id.as_deref())
            .collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd",
            self.api_url,
            ids.join(",")
        );
        tracing::debug!(%url, "fetching catalog prices");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(WagerError::FetchFailure(format!(
                "coingecko returned {}",
                response.status()
            )));
        }

        // {"solana": {"usd": 150.0}, ...}
        let body: HashMap<String, HashMap<String, f64>> = response.json().await?;

        let mut prices = HashMap::new();
        for token in catalog {
            let Some(id) = token.coingecko_id.as_deref() else {
                continue;
            };
            match body.get(id).and_then(|q| q.get("usd")) {
                Some(&usd) if usd.is_finite() && usd > 0.0 => {
                    prices.insert(token.mint.clone(), usd);
                }
                _ => {
                    tracing::warn!(symbol = %token.symbol, id, "no usd quote in response");
                }
            }
        }
        Ok(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::default_token_catalog;

    #[test]
    fn builds_client_from_config() {
        let source = CoinGeckoPriceSource::new(&Config::default()).expect("client");
        assert!(source.api_url.starts_with("https://api.coingecko.com"));
    }

    #[tokio::test]
    async fn empty_id_list_skips_the_request() {
        let source = CoinGeckoPriceSource::new(&Config::default()).expect("client");
        let catalog: Vec<TokenMeta> = default_token_catalog()
            .into_iter()
            .map(|mut t| {
                t.coingecko_id = None;
                t
            })
            .collect();
        let prices = source
            .fetch_catalog_prices(&catalog)
            .await
            .expect("no request needed");
        assert!(prices.is_empty());
    }
}
