mod chart;
mod config;
mod input;
mod json_contract;
mod render_frame_builder;

pub use chart::CandlestickChart;
pub use config::{ChartConfig, ChartStyle};
pub use json_contract::{CHART_CONFIG_JSON_SCHEMA_V1, ChartConfigJsonContractV1};
