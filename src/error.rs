use thiserror::Error;

#[derive(Error, Debug)]
pub enum WagerError {
    #[error("Price fetch failed: {0}")]
    FetchFailure(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No price available for token: {0}")]
    NoPriceAvailable(String),

    #[error("Invalid multiplier: {0}")]
    InvalidMultiplier(f64),

    #[error("Unknown game: {0}")]
    UnknownGame(String),
}

pub type Result<T> = std::result::Result<T, WagerError>;
