pub mod candle;
pub mod mapper;
pub mod primitives;
pub mod store;
pub mod types;

pub use candle::{Candle, CandleDirection, TRADE_DATE_LABEL_FORMAT};
pub use mapper::{
    CandleGeometry, CandleMapper, ChartLayout, DEFAULT_EDGE_OFFSET_PX, fit_body_width,
    project_candles,
};
pub use store::ChartData;
pub use types::Viewport;
