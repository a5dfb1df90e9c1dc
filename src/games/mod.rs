//! Per-game worst-case payout multipliers.
//!
//! Every game exposes the largest multiplier it can ever pay for a wager,
//! scaled by the game's RTP target. Wager bounds divide pool capacity by this
//! number, so a missing or partial parameter always resolves to the choice
//! that maximizes payout risk.

use crate::constants::{RTP_DICE, RTP_FLIP, RTP_HILO, RTP_MINES, RTP_PLINKO, RTP_ROULETTE};
use crate::error::{Result, WagerError};
use std::collections::HashMap;

pub const MINES_GRID_SIZE: u32 = 25;
pub const MINES_MAX_SELECTABLE: u32 = 20;
pub const FLIP_MAX_COINS: u32 = 8;
pub const PLINKO_BUCKETS_NORMAL: usize = 8;
pub const PLINKO_BUCKETS_DEGEN: usize = 10;
pub const CRASH_DEFAULT_TARGET: f64 = 1000.0;

/// Game-specific knobs that change the worst-case multiplier.
///
/// One variant per parameterized builtin game, so parameter shapes are
/// checked at compile time instead of passing an untyped bag of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameParams {
    Dice { roll_under: u32 },
    Flip { coins: u32, target: u32 },
    Mines { mines: u32 },
    Plinko { degen: bool },
    Crash { target_multiplier: f64 },
}

pub type MultiplierFn = Box<dyn Fn(Option<&GameParams>) -> f64 + Send + Sync>;

/// Maps a game id to its worst-case multiplier function.
pub struct MultiplierRegistry {
    games: HashMap<String, MultiplierFn>,
}

impl MultiplierRegistry {
    pub fn new() -> Self {
        Self {
            games: HashMap::new(),
        }
    }

    /// Registry pre-populated with every platform game.
    pub fn with_builtin_games() -> Self {
        let mut registry = Self::new();
        registry.register("dice", Box::new(|p| dice_max_multiplier(p)));
        registry.register("flip", Box::new(|p| flip_max_multiplier(p)));
        registry.register("mines", Box::new(|p| mines_max_multiplier(p)));
        registry.register("plinko", Box::new(|p| plinko_max_multiplier(p)));
        registry.register("crash", Box::new(|p| crash_max_multiplier(p)));
        registry.register("hilo", Box::new(|_| hilo_max_multiplier()));
        registry.register("slots", Box::new(|_| SLOTS_MAX_MULTIPLIER));
        registry.register("blackjack", Box::new(|_| BLACKJACK_MAX_MULTIPLIER));
        registry.register("multipoker", Box::new(|_| MULTIPOKER_MAX_MULTIPLIER));
        registry.register("roulette", Box::new(|_| roulette_straight_multiplier()));
        registry
    }

    pub fn register(&mut self, game_id: &str, compute: MultiplierFn) {
        self.games.insert(game_id.to_string(), compute);
    }

    pub fn is_registered(&self, game_id: &str) -> bool {
        self.games.contains_key(game_id)
    }

    /// Worst-case multiplier for a game, failing on unknown ids and broken
    /// multiplier functions.
    pub fn try_max_multiplier(&self, game_id: &str, params: Option<&GameParams>) -> Result<f64> {
        let compute = self
            .games
            .get(game_id)
            .ok_or_else(|| WagerError::UnknownGame(game_id.to_string()))?;
        let multiplier = compute(params);
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(WagerError::InvalidMultiplier(multiplier));
        }
        Ok(multiplier)
    }

    /// Worst-case multiplier for a game, never failing.
    ///
    /// Unknown games and broken multiplier functions degrade to `1.0` (a 1x
    /// game) so wager bounds stay computable for every game id.
    pub fn max_multiplier(&self, game_id: &str, params: Option<&GameParams>) -> f64 {
        match self.try_max_multiplier(game_id, params) {
            Ok(multiplier) => multiplier,
            Err(err) => {
                tracing::warn!(game_id, %err, "no usable multiplier for game, using 1.0");
                1.0
            }
        }
    }
}

impl Default for MultiplierRegistry {
    fn default() -> Self {
        Self::with_builtin_games()
    }
}

// Fixed payout tables. The maximum is all the registry needs.
pub const SLOTS_MAX_MULTIPLIER: f64 = 175.9;
pub const BLACKJACK_MAX_MULTIPLIER: f64 = 2.30;
pub const MULTIPOKER_MAX_MULTIPLIER: f64 = 100.0;

/// Roll-under 1 pays the highest multiplier.
pub fn dice_max_multiplier(params: Option<&GameParams>) -> f64 {
    let roll_under = match params {
        Some(GameParams::Dice { roll_under }) => (*roll_under).clamp(1, 99),
        _ => 1,
    };
    (100.0 / roll_under as f64) * RTP_DICE
}

/// All coins landing the chosen face pays the highest multiplier.
pub fn flip_max_multiplier(params: Option<&GameParams>) -> f64 {
    let (coins, target) = match params {
        Some(GameParams::Flip { coins, target }) => {
            let coins = (*coins).clamp(1, FLIP_MAX_COINS);
            (coins, (*target).clamp(1, coins))
        }
        _ => (FLIP_MAX_COINS, FLIP_MAX_COINS),
    };
    let p = probability_at_least(target, coins);
    if p <= 0.0 {
        return 1.0;
    }
    RTP_FLIP / p
}

/// Full clear of the board pays the highest multiplier.
pub fn mines_max_multiplier(params: Option<&GameParams>) -> f64 {
    let mines = match params {
        Some(GameParams::Mines { mines }) => (*mines).clamp(1, MINES_GRID_SIZE - 1),
        _ => MINES_MAX_SELECTABLE,
    };
    let prob = mines_full_clear_probability(mines);
    if prob <= 0.0 {
        return 1.0;
    }
    RTP_MINES / prob
}

/// The outermost bucket of the riskier mode pays the highest multiplier.
pub fn plinko_max_multiplier(params: Option<&GameParams>) -> f64 {
    let degen = match params {
        Some(GameParams::Plinko { degen }) => *degen,
        _ => true,
    };
    let buckets = if degen {
        PLINKO_BUCKETS_DEGEN
    } else {
        PLINKO_BUCKETS_NORMAL
    };
    plinko_multipliers(buckets, RTP_PLINKO, degen)
        .into_iter()
        .fold(1.0, f64::max)
}

/// Crash pays out at the player's cash-out target.
pub fn crash_max_multiplier(params: Option<&GameParams>) -> f64 {
    match params {
        Some(GameParams::Crash { target_multiplier }) if *target_multiplier >= 1.0 => {
            *target_multiplier
        }
        _ => CRASH_DEFAULT_TARGET,
    }
}

/// Betting Hi on the second-highest rank leaves one winning card out of 13.
pub fn hilo_max_multiplier() -> f64 {
    13.0 * RTP_HILO
}

/// Straight-up bet covers one of 37 numbers.
pub fn roulette_straight_multiplier() -> f64 {
    37.0 * RTP_ROULETTE
}

/// Probability of revealing every safe cell without hitting a mine.
pub fn mines_full_clear_probability(mines: u32) -> f64 {
    let safe = MINES_GRID_SIZE - mines;
    let mut prob = 1.0;
    for i in 0..safe {
        prob *= (safe - i) as f64 / (MINES_GRID_SIZE - i) as f64;
    }
    prob
}

/// Bucket multipliers scaled so the expected payout hits the RTP target.
pub fn plinko_multipliers(buckets: usize, rtp: f64, degen: bool) -> Vec<f64> {
    let n = buckets;
    let probs: Vec<f64> = (0..=n)
        .map(|k| binomial(n, k) * 0.5f64.powi(n as i32))
        .collect();
    let center = n as f64 / 2.0;
    let (pow, offset) = if degen { (2.2, 0.4) } else { (1.8, 0.2) };

    let mut raw: Vec<f64> = (0..=n)
        .map(|i| 1.0 + ((i as f64 - center).abs() + offset).powf(pow))
        .collect();
    if degen {
        let last = raw.len() - 1;
        raw[last] *= 2.5;
    }

    let expected: f64 = raw.iter().zip(&probs).map(|(w, p)| w * p).sum();
    let scale = rtp / expected;
    raw.iter()
        .map(|w| (w * scale * 100.0).round() / 100.0)
        .collect()
}

// P(at least `target` of `coins` fair flips land the chosen face).
fn probability_at_least(target: u32, coins: u32) -> f64 {
    let per_outcome = 0.5f64.powi(coins as i32);
    (target..=coins)
        .map(|m| binomial(coins as usize, m as usize) * per_outcome)
        .sum()
}

fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut c = 1.0;
    for i in 0..k {
        c = c * (n - i) as f64 / (i + 1) as f64;
    }
    c
}
