//! Freshness-aware USD price cache for the token catalog.
//!
//! One instance per process. Reads are cheap snapshots; the only mutation is
//! `refresh()`, which fetches the whole catalog from the injected
//! [`PriceSource`] and rewrites entries token by token. A boolean flag
//! serializes refresh cycles: a caller that finds one in flight skips instead
//! of waiting, so the cache never does duplicate fetch work.

use crate::{
    config::Config,
    error::{Result, WagerError},
    models::{PriceChange, PriceOrigin, PriceUpdate, TokenMeta, TokenPrice},
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// External provider of live USD prices for the catalog.
///
/// Missing keys in the result mean the source had no quote for that token.
/// The implementation should enforce its own request timeout; errors here are
/// recovered by degrading cache entries, never surfaced to cache readers.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_catalog_prices(&self, catalog: &[TokenMeta]) -> Result<HashMap<String, f64>>;
}

pub struct TokenPriceService {
    catalog: Vec<TokenMeta>,
    source: Arc<dyn PriceSource>,
    refresh_interval_ms: i64,
    cache: RwLock<HashMap<String, TokenPrice>>,
    last_fetch_ms: AtomicI64,
    refreshing: AtomicBool,
    updates: broadcast::Sender<PriceUpdate>,
}

impl TokenPriceService {
    pub fn new(catalog: Vec<TokenMeta>, source: Arc<dyn PriceSource>, config: &Config) -> Self {
        let (updates, _) = broadcast::channel(64);
        Self {
            catalog,
            source,
            refresh_interval_ms: (config.price_refresh_interval_secs * 1000) as i64,
            cache: RwLock::new(HashMap::new()),
            last_fetch_ms: AtomicI64::new(0),
            refreshing: AtomicBool::new(false),
            updates,
        }
    }

    pub fn catalog(&self) -> &[TokenMeta] {
        &self.catalog
    }

    pub fn meta_for(&self, mint: &str) -> Option<&TokenMeta> {
        self.catalog.iter().find(|t| t.mint == mint)
    }

    /// Cached price for a token, refreshing first when the cache is stale.
    pub async fn get_price(&self, mint: &str) -> Option<TokenPrice> {
        self.refresh_if_stale().await;
        self.cache.read().await.get(mint).cloned()
    }

    /// Like [`get_price`](Self::get_price), but a missing or zero price is an
    /// error rather than a degraded entry.
    pub async fn require_price(&self, mint: &str) -> Result<TokenPrice> {
        match self.get_price(mint).await {
            Some(entry) if entry.current_price > 0.0 => Ok(entry),
            _ => Err(WagerError::NoPriceAvailable(mint.to_string())),
        }
    }

    /// Snapshot of every tracked token, refreshing first when stale.
    pub async fn get_all_prices(&self) -> Vec<TokenPrice> {
        self.refresh_if_stale().await;
        self.cache.read().await.values().cloned().collect()
    }

    /// Run a refresh cycle unless one is already in flight.
    ///
    /// The in-flight check and the flag set are a single compare-exchange, so
    /// two concurrent callers produce exactly one fetch; the loser returns
    /// immediately without touching `last_fetch`.
    pub async fn refresh(&self) {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("price refresh already in flight, skipping");
            return;
        }

        let now = Utc::now().timestamp_millis();
        let fetched = self.source.fetch_catalog_prices(&self.catalog).await;

        match fetched {
            Ok(live) => self.apply_cycle(&live, now).await,
            Err(err) => {
                tracing::warn!(%err, "price fetch failed, keeping cached entries");
                self.backfill_missing(now).await;
            }
        }

        // Advanced only by the refresh that actually ran, on every outcome.
        self.last_fetch_ms.store(now, Ordering::SeqCst);
        self.refreshing.store(false, Ordering::SeqCst);
    }

    /// Reset the staleness timer and refresh immediately.
    ///
    /// Still a no-op while another refresh is in flight; the forced cycle
    /// does not interrupt or wait for the running one.
    pub async fn force_refresh(&self) {
        self.last_fetch_ms.store(0, Ordering::SeqCst);
        self.refresh().await;
    }

    /// Milliseconds since the entry was last written, infinite when unknown.
    pub async fn price_age_ms(&self, mint: &str) -> f64 {
        match self.cache.read().await.get(mint) {
            Some(entry) => (Utc::now().timestamp_millis() - entry.last_updated) as f64,
            None => f64::INFINITY,
        }
    }

    pub async fn has_live_data(&self, mint: &str) -> bool {
        self.cache
            .read()
            .await
            .get(mint)
            .map(|entry| entry.is_live)
            .unwrap_or(false)
    }

    pub async fn price_origin(&self, mint: &str) -> PriceOrigin {
        self.cache
            .read()
            .await
            .get(mint)
            .map(|entry| entry.origin)
            .unwrap_or(PriceOrigin::Unavailable)
    }

    /// Movement of the cached price against a caller-supplied previous value.
    pub async fn price_change(&self, mint: &str, previous_price: f64) -> Option<PriceChange> {
        let entry = self.cache.read().await.get(mint).cloned()?;
        if entry.current_price <= 0.0 {
            return None;
        }
        let change = entry.current_price - previous_price;
        let percentage_change = if previous_price > 0.0 {
            (change / previous_price) * 100.0
        } else {
            0.0
        };
        Some(PriceChange {
            current_price: entry.current_price,
            change,
            percentage_change,
            is_live: entry.is_live,
        })
    }

    /// Push channel fed once per token per completed refresh cycle.
    pub fn subscribe(&self) -> broadcast::Receiver<PriceUpdate> {
        self.updates.subscribe()
    }

    /// Background updater: one forced refresh per interval.
    pub fn start_price_updater(self: Arc<Self>) {
        let interval_ms = self.refresh_interval_ms.max(1000) as u64;
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(tokio::time::Duration::from_millis(interval_ms));
            loop {
                ticker.tick().await;
                self.force_refresh().await;
            }
        });
    }

    async fn refresh_if_stale(&self) {
        let now = Utc::now().timestamp_millis();
        let stale = now - self.last_fetch_ms.load(Ordering::SeqCst) > self.refresh_interval_ms;
        if stale && !self.refreshing.load(Ordering::SeqCst) {
            self.refresh().await;
        }
    }

    // Rewrite every catalog entry from a successful fetch. Entries are
    // replaced whole under one write guard, so a reader never observes a
    // half-updated token.
    async fn apply_cycle(&self, live: &HashMap<String, f64>, now: i64) {
        let mut cache = self.cache.write().await;
        for token in &self.catalog {
            let prior = cache.get(&token.mint).map(|entry| entry.current_price);
            let entry = match live.get(&token.mint) {
                Some(&price) if usable(price) && prior != Some(price) => TokenPrice {
                    mint: token.mint.clone(),
                    symbol: token.symbol.clone(),
                    current_price: price,
                    is_live: true,
                    origin: PriceOrigin::Api,
                    last_updated: now,
                },
                Some(&price) if usable(price) => {
                    // Same value as last cycle: keep it, but it no longer
                    // counts as fresh.
                    degraded_entry(token, Some(price), now)
                }
                _ => degraded_entry(token, prior, now),
            };
            self.publish(&entry);
            cache.insert(token.mint.clone(), entry);
        }
        tracing::debug!(tokens = cache.len(), "price cache updated");
    }

    // Total fetch failure: existing entries stay untouched, tokens that have
    // no entry at all get their static fallback price.
    async fn backfill_missing(&self, now: i64) {
        let mut cache = self.cache.write().await;
        for token in &self.catalog {
            if cache.contains_key(&token.mint) {
                continue;
            }
            if let Some(fallback) = token.usd_price.filter(|p| usable(*p)) {
                let entry = TokenPrice {
                    mint: token.mint.clone(),
                    symbol: token.symbol.clone(),
                    current_price: fallback,
                    is_live: false,
                    origin: PriceOrigin::Fallback,
                    last_updated: now,
                };
                self.publish(&entry);
                cache.insert(token.mint.clone(), entry);
            }
        }
    }

    fn publish(&self, entry: &TokenPrice) {
        // Nobody listening is fine.
        let _ = self.updates.send(PriceUpdate {
            mint: entry.mint.clone(),
            symbol: entry.symbol.clone(),
            price: entry.current_price,
            origin: entry.origin,
            timestamp: entry.last_updated,
        });
    }
}

fn usable(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

fn degraded_entry(token: &TokenMeta, prior_price: Option<f64>, now: i64) -> TokenPrice {
    let fallback = prior_price
        .filter(|p| usable(*p))
        .or(token.usd_price.filter(|p| usable(*p)));
    match fallback {
        Some(price) => TokenPrice {
            mint: token.mint.clone(),
            symbol: token.symbol.clone(),
            current_price: price,
            is_live: false,
            origin: PriceOrigin::Fallback,
            last_updated: now,
        },
        None => TokenPrice {
            mint: token.mint.clone(),
            symbol: token.symbol.clone(),
            current_price: 0.0,
            is_live: false,
            origin: PriceOrigin::Unavailable,
            last_updated: now,
        },
    }
}
