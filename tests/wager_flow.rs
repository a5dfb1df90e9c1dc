//! End-to-end flow: price cache -> bounds -> controller, with a mock source.

use async_trait::async_trait;
use degen_wager::constants::{default_token_catalog, FREE_TOKEN_MINT, TOKEN_SOL};
use degen_wager::models::TokenMeta;
use degen_wager::services::wager_normalizer::wager_bounds;
use degen_wager::{
    Config, GameParams, MultiplierRegistry, PoolSnapshot, PriceSource, Result,
    TokenPriceService, WagerAdjustmentController,
};
use std::collections::HashMap;
use std::sync::Arc;

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "degen_wager=debug".into()))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

struct FixedSource {
    sol_price: f64,
}

#[async_trait]
impl PriceSource for FixedSource {
    async fn fetch_catalog_prices(&self, _catalog: &[TokenMeta]) -> Result<HashMap<String, f64>> {
        Ok(HashMap::from([(TOKEN_SOL.to_string(), self.sol_price)]))
    }
}

#[tokio::test]
async fn wager_flow_from_live_price_to_adjusted_value() {
    init_tracing();

    let config = Config::default();
    let prices = Arc::new(TokenPriceService::new(
        default_token_catalog(),
        Arc::new(FixedSource { sol_price: 150.0 }),
        &config,
    ));
    let registry = Arc::new(MultiplierRegistry::with_builtin_games());

    let sol = prices.meta_for(TOKEN_SOL).expect("catalog token").clone();
    let price = prices.get_price(TOKEN_SOL).await.expect("live price");
    assert!(price.is_live);

    let pool = PoolSnapshot::new(500_000_000_000.0);
    let mut ctl = WagerAdjustmentController::new(registry.clone(), "dice", &config)
        .with_params(GameParams::Dice { roll_under: 1 });

    // Mount: the wager starts at the $1 floor.
    let mut wager = 0.0;
    let adj = ctl.evaluate(&sol, Some(&price), &pool, &mut wager);
    assert!((wager - 6_667_000.0).abs() < 1.0);
    assert!(adj.valid);

    // A typed-in value past the pool cap gets pulled back once.
    let mut wager = 1e18;
    let adj = ctl.evaluate(&sol, Some(&price), &pool, &mut wager);
    assert!(adj.changed);
    assert_eq!(wager, adj.bounds.max_wager);
    let echoed = wager;
    let adj = ctl.evaluate(&sol, Some(&price), &pool, &mut wager);
    assert!(!adj.changed && wager == echoed);
}

#[tokio::test]
async fn free_token_flow_uses_base_wager_floor() {
    init_tracing();

    let config = Config::default();
    let prices = Arc::new(TokenPriceService::new(
        default_token_catalog(),
        Arc::new(FixedSource { sol_price: 150.0 }),
        &config,
    ));

    let free = prices.meta_for(FREE_TOKEN_MINT).expect("catalog token").clone();
    let price = prices.get_price(FREE_TOKEN_MINT).await;
    let registry = MultiplierRegistry::with_builtin_games();
    let bounds = wager_bounds(
        &free,
        price.as_ref(),
        &PoolSnapshot::unbounded(),
        registry.max_multiplier("flip", Some(&GameParams::Flip { coins: 1, target: 1 })),
    );

    assert_eq!(bounds.min_wager, free.base_wager);
    assert!(bounds.max_wager.is_infinite());
    assert!(!bounds.is_collapsed());
}
