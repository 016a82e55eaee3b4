//! Price-source screening.

use std::collections::HashMap;

use crate::types::TradeCandidate;
use crate::{ensure_positive, Result};

/// Provider of the most recent closing price for a symbol.
///
/// Returns `Ok(None)` when the provider has no data for the symbol; errors are
/// reserved for provider failures.
pub trait PriceSource {
    fn last_close(&self, symbol: &str) -> Result<Option<f64>>;
}

impl<P: PriceSource + ?Sized> PriceSource for &P {
    fn last_close(&self, symbol: &str) -> Result<Option<f64>> {
        (**self).last_close(symbol)
    }
}

/// In-memory price source, keyed by exact symbol.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    prices: HashMap<String, f64>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source whose last close for each ticker is its reference price.
    pub fn from_candidates(candidates: &[TradeCandidate]) -> Self {
        let prices = candidates
            .iter()
            .map(|c| (c.ticker.clone(), c.reference_price))
            .collect();
        Self { prices }
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.insert(symbol, price);
        self
    }

    pub fn insert(&mut self, symbol: &str, price: f64) {
        self.prices.insert(symbol.to_string(), price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl PriceSource for StaticPriceSource {
    fn last_close(&self, symbol: &str) -> Result<Option<f64>> {
        Ok(self.prices.get(symbol).copied())
    }
}

/// Keep the symbols whose last close is at or below `max_price`.
///
/// Symbols without usable price data are skipped with a warning. Output order
/// follows `symbols`.
pub fn filter_by_close<S: AsRef<str>>(
    source: &impl PriceSource,
    symbols: &[S],
    max_price: f64,
) -> Result<Vec<TradeCandidate>> {
    ensure_positive("max price", max_price)?;

    let mut results = Vec::new();
    for symbol in symbols {
        let symbol = symbol.as_ref().trim();
        if symbol.is_empty() {
            continue;
        }

        let last_close = match source.last_close(symbol)? {
            Some(price) if price.is_finite() && price > 0.0 => price,
            Some(price) => {
                tracing::warn!(symbol, price, "unusable close price, skipping");
                continue;
            }
            None => {
                tracing::warn!(symbol, "no price data, skipping");
                continue;
            }
        };

        if last_close <= max_price {
            results.push(TradeCandidate::new(symbol, last_close)?);
        } else {
            tracing::debug!(symbol, last_close, max_price, "above max price");
        }
    }

    Ok(results)
}
