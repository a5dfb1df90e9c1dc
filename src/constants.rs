/// Application constants

use crate::models::TokenMeta;

// Token mints (Solana)
pub const TOKEN_SOL: &str = "So11111111111111111111111111111111111111112";
pub const TOKEN_USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
// Free-play token. Never minted on chain, never priced.
pub const FREE_TOKEN_MINT: &str = "DGHRTfreeP1ayXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX";

// Wager policy
pub const MIN_WAGER_USD: f64 = 1.0;

// Price refresh
pub const PRICE_REFRESH_INTERVAL_SECS: u64 = 60;
pub const PRICE_FETCH_TIMEOUT_SECS: u64 = 10;
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

// RTP targets (house edge = 1 - RTP)
pub const RTP_DICE: f64 = 0.95;
pub const RTP_FLIP: f64 = 0.96;
pub const RTP_MINES: f64 = 0.96;
pub const RTP_PLINKO: f64 = 0.95;
pub const RTP_HILO: f64 = 0.95;
pub const RTP_ROULETTE: f64 = 0.973;

/// Tokens tracked by the price cache, with static fallback prices.
pub fn default_token_catalog() -> Vec<TokenMeta> {
    vec![
        TokenMeta {
            mint: TOKEN_SOL.to_string(),
            name: "SOLANA".to_string(),
            symbol: "SOL".to_string(),
            decimals: 9,
            base_wager: 1e9,
            usd_price: Some(232.89),
            coingecko_id: Some("solana".to_string()),
            free: false,
        },
        TokenMeta {
            mint: TOKEN_USDC.to_string(),
            name: "USDC".to_string(),
            symbol: "USDC".to_string(),
            decimals: 6,
            base_wager: 1e6,
            usd_price: Some(0.999781),
            coingecko_id: Some("usd-coin".to_string()),
            free: false,
        },
        TokenMeta {
            mint: FREE_TOKEN_MINT.to_string(),
            name: "Degen Heart".to_string(),
            symbol: "DGHRT".to_string(),
            decimals: 9,
            base_wager: 1e9,
            usd_price: None,
            coingecko_id: None,
            free: true,
        },
    ]
}

/// Catalog lookup by mint.
pub fn token_meta_for<'a>(catalog: &'a [TokenMeta], mint: &str) -> Option<&'a TokenMeta> {
    catalog.iter().find(|t| t.mint == mint)
}
