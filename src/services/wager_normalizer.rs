//! Wager bounds from price, pool capacity and game risk.
//!
//! The minimum wager is pegged to $1 of the token (free-play tokens use
//! their base-unit scale instead); the maximum is the largest wager whose
//! worst-case payout the pool can still cover.

use crate::{
    constants::MIN_WAGER_USD,
    models::{PoolSnapshot, TokenMeta, TokenPrice, WagerBounds},
    services::rounding::round_wager,
};

/// Validation verdict for a candidate wager.
#[derive(Debug, Clone)]
pub struct WagerVerdict {
    pub valid: bool,
    pub reason: Option<String>,
}

/// Minimum wager in base units: $1 worth of the token.
///
/// Free/points tokens wager at least one display unit. A token without a
/// usable price falls back to the same safe non-zero floor.
pub fn minimum_wager(token: &TokenMeta, price: Option<&TokenPrice>) -> f64 {
    if token.free {
        return token.base_wager;
    }

    let usd = price.map(|p| p.current_price).unwrap_or(0.0);
    if usd > 0.0 {
        round_wager((MIN_WAGER_USD / usd) * token.base_wager, Some(token.base_wager))
    } else {
        token.base_wager
    }
}

/// Maximum wager in base units the pool can cover at the given multiplier.
///
/// Unbounded pools give `+inf`. A multiplier below 1 is a programming error
/// in a game config; it is treated as 1 so the cap never inflates a payout
/// past pool capacity.
pub fn maximum_wager(pool: &PoolSnapshot, multiplier: f64, base_wager: f64) -> f64 {
    if pool.is_unbounded() {
        return f64::INFINITY;
    }

    let multiplier = if multiplier.is_finite() && multiplier >= 1.0 {
        multiplier
    } else {
        tracing::warn!(multiplier, "invalid multiplier for max wager, using 1.0");
        1.0
    };

    round_wager(pool.max_payout / multiplier, Some(base_wager))
}

/// Bounds for one (token, pool, multiplier) combination.
///
/// When the pool cannot cover the $1 floor, the max wins and the range
/// collapses to that single point.
pub fn wager_bounds(
    token: &TokenMeta,
    price: Option<&TokenPrice>,
    pool: &PoolSnapshot,
    multiplier: f64,
) -> WagerBounds {
    let min = minimum_wager(token, price);
    let max = maximum_wager(pool, multiplier, token.base_wager);
    WagerBounds::new(min, max, multiplier)
}

pub fn validate(wager: f64, bounds: &WagerBounds) -> WagerVerdict {
    if wager < bounds.min_wager {
        return WagerVerdict {
            valid: false,
            reason: Some(format!(
                "wager {} is below the minimum of {}",
                wager, bounds.min_wager
            )),
        };
    }
    if wager > bounds.max_wager {
        return WagerVerdict {
            valid: false,
            reason: Some(format!(
                "wager {} exceeds the pool maximum of {}",
                wager, bounds.max_wager
            )),
        };
    }
    WagerVerdict {
        valid: true,
        reason: None,
    }
}

pub fn clamp(wager: f64, bounds: &WagerBounds) -> f64 {
    wager.max(bounds.min_wager).min(bounds.max_wager)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{default_token_catalog, TOKEN_SOL};
    use crate::models::PriceOrigin;
    use chrono::Utc;

    fn sol() -> TokenMeta {
        default_token_catalog()
            .into_iter()
            .find(|t| t.mint == TOKEN_SOL)
            .unwrap()
    }

    fn free_token() -> TokenMeta {
        default_token_catalog().into_iter().find(|t| t.free).unwrap()
    }

    fn live_price(token: &TokenMeta, usd: f64) -> TokenPrice {
        TokenPrice {
            mint: token.mint.clone(),
            symbol: token.symbol.clone(),
            current_price: usd,
            is_live: true,
            origin: PriceOrigin::Api,
            last_updated: Utc::now().timestamp_millis(),
        }
    }

    #[test]
    fn dollar_floor_and_pool_cap_for_a_live_sol_price() {
        // 1e9 scale, $150/SOL, 5e11 payout capacity, 100x game.
        let token = sol();
        let price = live_price(&token, 150.0);
        let pool = PoolSnapshot::new(500_000_000_000.0);

        let min = minimum_wager(&token, Some(&price));
        assert!((min - 6_667_000.0).abs() < 1.0);

        let max = maximum_wager(&pool, 100.0, token.base_wager);
        assert!((max - 5_000_000_000.0).abs() < 1.0);

        let bounds = wager_bounds(&token, Some(&price), &pool, 100.0);
        assert!(!bounds.is_collapsed());
        assert!(bounds.min_wager <= bounds.max_wager);
    }

    #[test]
    fn unavailable_price_floors_at_base_wager() {
        let token = sol();
        let unavailable = TokenPrice {
            current_price: 0.0,
            is_live: false,
            origin: PriceOrigin::Unavailable,
            ..live_price(&token, 0.0)
        };
        assert_eq!(minimum_wager(&token, Some(&unavailable)), token.base_wager);
        assert_eq!(minimum_wager(&token, None), token.base_wager);
    }

    #[test]
    fn free_token_minimum_is_base_wager() {
        let token = free_token();
        assert_eq!(minimum_wager(&token, None), token.base_wager);
    }

    #[test]
    fn unbounded_pool_never_caps() {
        let token = sol();
        let max = maximum_wager(&PoolSnapshot::unbounded(), 1000.0, token.base_wager);
        assert!(max.is_infinite());

        let bounds = wager_bounds(&token, Some(&live_price(&token, 150.0)), &PoolSnapshot::unbounded(), 1000.0);
        assert!(validate(1e18, &bounds).valid);
    }

    #[test]
    fn zero_or_negative_multiplier_is_treated_as_one() {
        let pool = PoolSnapshot::new(1e9);
        assert_eq!(maximum_wager(&pool, 0.0, 1e9), 1e9);
        assert_eq!(maximum_wager(&pool, -5.0, 1e9), 1e9);
        assert_eq!(maximum_wager(&pool, f64::NAN, 1e9), 1e9);
    }

    #[test]
    fn tiny_pool_collapses_range_to_the_cap() {
        let token = sol();
        let price = live_price(&token, 150.0);
        // $1 floor is ~6.7e6 base units; this pool can only cover 1e6.
        let pool = PoolSnapshot::new(100_000_000.0);
        let bounds = wager_bounds(&token, Some(&price), &pool, 100.0);

        assert!(bounds.is_collapsed());
        assert_eq!(bounds.min_wager, bounds.max_wager);
        assert!(validate(bounds.max_wager, &bounds).valid);
    }

    #[test]
    fn validate_reports_which_bound_failed() {
        let bounds = WagerBounds::new(1_000_000.0, 5_000_000_000.0, 100.0);
        assert!(validate(1_000_000.0, &bounds).valid);
        assert!(validate(5_000_000_000.0, &bounds).valid);

        let low = validate(999_999.0, &bounds);
        assert!(!low.valid);
        assert!(low.reason.unwrap().contains("below the minimum"));

        let high = validate(5_000_000_001.0, &bounds);
        assert!(!high.valid);
        assert!(high.reason.unwrap().contains("exceeds the pool maximum"));
    }

    #[test]
    fn clamp_always_lands_inside_the_range() {
        let bounds = WagerBounds::new(1_000_000.0, 5_000_000_000.0, 100.0);
        for wager in [0.0, 999_999.0, 2_500_000.0, 5e9, 1e15] {
            let clamped = clamp(wager, &bounds);
            assert!(clamped >= bounds.min_wager && clamped <= bounds.max_wager);
        }
        assert_eq!(clamp(2_500_000.0, &bounds), 2_500_000.0);
    }
}
