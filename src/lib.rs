//! Wager normalization for a multi-token casino front end.
//!
//! Keeps a freshness-aware cache of token USD prices and combines it with
//! per-game payout-risk limits to derive the minimum and maximum wager, round
//! wagers to a human-friendly precision, and keep a UI-owned wager value
//! inside bounds as prices, pools and game settings move.

pub mod config;
pub mod constants;
pub mod error;
pub mod games;
pub mod integrations;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{Result, WagerError};
pub use games::{GameParams, MultiplierRegistry};
pub use integrations::CoinGeckoPriceSource;
pub use models::{PoolSnapshot, PriceOrigin, TokenMeta, TokenPrice, WagerBounds};
pub use services::{
    round_wager, PriceSource, TokenPriceService, WagerAdjustmentController,
};
