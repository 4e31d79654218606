use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::decimal_to_f64;
use crate::error::{ChartError, ChartResult};

/// Label format used for trade dates along the horizontal axis.
pub const TRADE_DATE_LABEL_FORMAT: &str = "%d.%m";

/// One trading period: open/close/high/low prices for a calendar date.
///
/// Prices are only required to be finite. No OHLC ordering is enforced, hosts
/// may hand in records whose open lies outside `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    trade_date: NaiveDate,
    open: f64,
    close: f64,
    high: f64,
    low: f64,
}

/// Body direction of a candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandleDirection {
    /// `close > open`.
    Up,
    /// `close <= open`; flat candles render as down.
    Down,
}

impl Candle {
    pub fn new(
        trade_date: NaiveDate,
        open: f64,
        close: f64,
        high: f64,
        low: f64,
    ) -> ChartResult<Self> {
        for (field, value) in [("open", open), ("close", close), ("high", high), ("low", low)] {
            if !value.is_finite() {
                return Err(ChartError::InvalidData(format!(
                    "candle {field} price must be finite"
                )));
            }
        }

        Ok(Self {
            trade_date,
            open,
            close,
            high,
            low,
        })
    }

    /// Converts decimal prices into a candle.
    pub fn from_decimal(
        trade_date: NaiveDate,
        open: Decimal,
        close: Decimal,
        high: Decimal,
        low: Decimal,
    ) -> ChartResult<Self> {
        Self::new(
            trade_date,
            decimal_to_f64(open, "open")?,
            decimal_to_f64(close, "close")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
        )
    }

    #[must_use]
    pub fn trade_date(self) -> NaiveDate {
        self.trade_date
    }

    #[must_use]
    pub fn open(self) -> f64 {
        self.open
    }

    #[must_use]
    pub fn close(self) -> f64 {
        self.close
    }

    #[must_use]
    pub fn high(self) -> f64 {
        self.high
    }

    #[must_use]
    pub fn low(self) -> f64 {
        self.low
    }

    #[must_use]
    pub fn direction(self) -> CandleDirection {
        if self.close > self.open {
            CandleDirection::Up
        } else {
            CandleDirection::Down
        }
    }

    /// Axis label for the trade date, e.g. `10.06`.
    #[must_use]
    pub fn date_label(self) -> String {
        self.trade_date.format(TRADE_DATE_LABEL_FORMAT).to_string()
    }
}
