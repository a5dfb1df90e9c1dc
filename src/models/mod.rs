pub mod token;

pub use token::{
    PoolSnapshot,
    PriceChange,
    PriceOrigin,
    PriceUpdate,
    TokenMeta,
    TokenPrice,
    WagerBounds,
};
