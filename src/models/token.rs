use serde::{Deserialize, Serialize};

/// Where a cached USD price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceOrigin {
    Api,
    Fallback,
    Unavailable,
}

/// Static metadata for a token in the platform catalog.
///
/// `base_wager` is the base-unit scale: the factor converting the smallest
/// representable amount into one display unit (e.g. 1e9 lamports per SOL).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenMeta {
    pub mint: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub base_wager: f64,
    /// Statically bundled USD price, used when a live fetch is unavailable.
    pub usd_price: Option<f64>,
    /// CoinGecko id for live price lookups. Free-play tokens have none.
    pub coingecko_id: Option<String>,
    /// Free/points token: no USD value, wager floor is `base_wager`.
    pub free: bool,
}

/// A cached USD price for one token.
///
/// `current_price == 0.0` means "no usable price".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPrice {
    pub mint: String,
    pub symbol: String,
    pub current_price: f64,
    /// True only if this value came from a successful fetch in the current
    /// refresh cycle.
    pub is_live: bool,
    pub origin: PriceOrigin,
    /// Unix millis of the last write.
    pub last_updated: i64,
}

/// Price movement relative to a caller-supplied previous price.
#[derive(Debug, Clone, Serialize)]
pub struct PriceChange {
    pub current_price: f64,
    pub change: f64,
    pub percentage_change: f64,
    pub is_live: bool,
}

/// Broadcast payload emitted once per token per completed refresh.
#[derive(Debug, Clone, Serialize)]
pub struct PriceUpdate {
    pub mint: String,
    pub symbol: String,
    pub price: f64,
    pub origin: PriceOrigin,
    pub timestamp: i64,
}

/// Payout capacity of the currently selected pool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Maximum amount the pool can pay out for a single settled bet, in base
    /// units. `f64::INFINITY` means the pool imposes no cap.
    pub max_payout: f64,
}

impl PoolSnapshot {
    pub fn new(max_payout: f64) -> Self {
        Self { max_payout }
    }

    pub fn unbounded() -> Self {
        Self {
            max_payout: f64::INFINITY,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        !self.max_payout.is_finite()
    }
}

/// Wager limits for one (token, pool, game) combination, in base units.
///
/// When the pool cannot cover the $1 floor the range collapses to the single
/// point `max_wager` and `collapsed` is set; wagering is then "temporarily
/// unavailable at the floor" rather than an error.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WagerBounds {
    pub min_wager: f64,
    pub max_wager: f64,
    pub multiplier: f64,
    pub collapsed: bool,
}

impl WagerBounds {
    pub fn new(min_wager: f64, max_wager: f64, multiplier: f64) -> Self {
        let collapsed = min_wager > max_wager;
        Self {
            min_wager: if collapsed { max_wager } else { min_wager },
            max_wager,
            multiplier,
            collapsed,
        }
    }

    pub fn contains(&self, wager: f64) -> bool {
        wager >= self.min_wager && wager <= self.max_wager
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }
}
