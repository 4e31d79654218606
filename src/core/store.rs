use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use tracing::debug;

use crate::core::Candle;

/// Candle collection backing one chart.
///
/// Candles are unique by trade date and sorted ascending. `max_price` is the
/// highest `high` seen in the most recent non-empty input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    candles: Vec<Candle>,
    max_price: f64,
}

impl ChartData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the candle set.
    ///
    /// Duplicate dates keep the first occurrence in input order. The max price
    /// is taken over the raw input, duplicates included. An empty input clears
    /// the candles but leaves the previous max price in place.
    pub fn set_candles(&mut self, candles: Vec<Candle>) {
        let input_count = candles.len();
        let input_max = max_high(&candles);

        let mut by_date: IndexMap<_, Candle> = IndexMap::with_capacity(candles.len());
        for candle in candles {
            by_date.entry(candle.trade_date()).or_insert(candle);
        }
        let mut canonical: Vec<Candle> = by_date.into_values().collect();
        canonical.sort_by_key(|candle| candle.trade_date());

        match input_max {
            Some(max) => self.max_price = max,
            None => debug!(
                retained_max_price = self.max_price,
                "empty candle set keeps previous max price"
            ),
        }
        debug!(
            input_count,
            canonical_count = canonical.len(),
            max_price = self.max_price,
            "set candles"
        );
        self.candles = canonical;
    }

    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    #[must_use]
    pub fn max_price(&self) -> f64 {
        self.max_price
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Highest `high` among the stored (deduplicated) candles.
    #[must_use]
    pub fn max_high_in_candles(&self) -> Option<f64> {
        max_high(&self.candles)
    }
}

fn max_high(candles: &[Candle]) -> Option<f64> {
    candles
        .iter()
        .map(|candle| OrderedFloat(candle.high()))
        .max()
        .map(OrderedFloat::into_inner)
}
