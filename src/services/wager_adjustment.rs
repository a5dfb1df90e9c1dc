//! Keeps a caller-owned wager value inside its current bounds.
//!
//! The UI owns the wager cell and echoes values back in on every tick, so
//! the controller only writes when a clamp actually changed the value;
//! unconditional writes would loop with the input field.

use crate::{
    config::Config,
    games::{GameParams, MultiplierRegistry},
    models::{PoolSnapshot, TokenMeta, TokenPrice, WagerBounds},
    services::wager_normalizer::{clamp, validate, wager_bounds},
};
use std::sync::Arc;

/// Result of one controller evaluation.
#[derive(Debug, Clone)]
pub struct Adjustment {
    pub bounds: WagerBounds,
    /// True when the controller wrote a new value into the wager cell.
    pub changed: bool,
    pub valid: bool,
    pub reason: Option<String>,
    /// Worst-case payout for the current wager exceeds pool capacity.
    pub pool_exceeded: bool,
}

pub struct WagerAdjustmentController {
    registry: Arc<MultiplierRegistry>,
    game_id: String,
    params: Option<GameParams>,
    /// Overrides the registry multiplier when set.
    custom_multiplier: Option<f64>,
    auto_adjust: bool,
    last_deps: Option<(String, u64)>,
}

impl WagerAdjustmentController {
    pub fn new(registry: Arc<MultiplierRegistry>, game_id: &str, config: &Config) -> Self {
        Self {
            registry,
            game_id: game_id.to_string(),
            params: None,
            custom_multiplier: None,
            auto_adjust: config.auto_adjust_wager,
            last_deps: None,
        }
    }

    pub fn with_params(mut self, params: GameParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_custom_multiplier(mut self, multiplier: f64) -> Self {
        self.custom_multiplier = Some(multiplier);
        self
    }

    /// Update game parameters; the next evaluation re-derives the bounds.
    pub fn set_params(&mut self, params: Option<GameParams>) {
        self.params = params;
    }

    /// Re-evaluate bounds and normalize the caller-owned wager cell.
    ///
    /// The first evaluation for a (token, pool) pair forces the wager to the
    /// minimum, so every game starts at the $1-equivalent floor. Afterwards
    /// the value is clamped only when it left the range, and only when
    /// auto-adjust is on; with it off the verdict is reported and the cell
    /// left alone.
    pub fn evaluate(
        &mut self,
        token: &TokenMeta,
        price: Option<&TokenPrice>,
        pool: &PoolSnapshot,
        wager: &mut f64,
    ) -> Adjustment {
        let multiplier = self
            .custom_multiplier
            .unwrap_or_else(|| self.registry.max_multiplier(&self.game_id, self.params.as_ref()));
        let bounds = wager_bounds(token, price, pool, multiplier);

        let deps = (token.mint.clone(), pool.max_payout.to_bits());
        let mounted = self.last_deps.as_ref() != Some(&deps);
        if mounted {
            self.last_deps = Some(deps);
            let previous = *wager;
            *wager = bounds.min_wager;
            tracing::debug!(
                game_id = %self.game_id,
                wager = *wager,
                "wager reset to minimum for new token/pool"
            );
            return self.finish(bounds, *wager, previous != *wager, pool);
        }

        let verdict = validate(*wager, &bounds);
        if verdict.valid {
            return self.finish(bounds, *wager, false, pool);
        }

        // Zero is "untouched input": only auto-adjust may raise it.
        if !self.auto_adjust {
            let pool_exceeded = pool_exceeded(*wager, bounds.multiplier, pool);
            return Adjustment {
                bounds,
                changed: false,
                valid: false,
                reason: verdict.reason,
                pool_exceeded,
            };
        }

        let adjusted = if *wager == 0.0 {
            bounds.min_wager
        } else {
            clamp(*wager, &bounds)
        };
        let changed = adjusted != *wager;
        if changed {
            *wager = adjusted;
        }
        self.finish(bounds, *wager, changed, pool)
    }

    fn finish(
        &self,
        bounds: WagerBounds,
        wager: f64,
        changed: bool,
        pool: &PoolSnapshot,
    ) -> Adjustment {
        let verdict = validate(wager, &bounds);
        Adjustment {
            pool_exceeded: pool_exceeded(wager, bounds.multiplier, pool),
            bounds,
            changed,
            valid: verdict.valid,
            reason: verdict.reason,
        }
    }
}

fn pool_exceeded(wager: f64, multiplier: f64, pool: &PoolSnapshot) -> bool {
    pool.max_payout.is_finite() && wager * multiplier > pool.max_payout
}
