//! candlestick-chart: a single candlestick chart view.
//!
//! Candles go in through [`CandlestickChart::set_candles`], pointer events
//! through [`CandlestickChart::handle_pointer_event`], and every
//! [`CandlestickChart::render`] hands a backend-agnostic frame (axes, ticks,
//! labels, candle wicks and bodies, crosshair) to a [`render::Renderer`].

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{CandlestickChart, ChartConfig, ChartStyle};
pub use error::{ChartError, ChartResult};
