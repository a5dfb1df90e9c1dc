// All service modules
pub mod rounding;
pub mod token_price_service;
pub mod wager_adjustment;
pub mod wager_normalizer;

// Re-export for convenience
pub use rounding::round_wager;
pub use token_price_service::{PriceSource, TokenPriceService};
pub use wager_adjustment::{Adjustment, WagerAdjustmentController};
pub use wager_normalizer::{
    clamp, maximum_wager, minimum_wager, validate, wager_bounds, WagerVerdict,
};
