use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::{CandlestickChart, ChartConfig};

pub const CHART_CONFIG_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: ChartConfig,
}

impl ChartConfig {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartConfigJsonContractV1 {
            schema_version: CHART_CONFIG_JSON_SCHEMA_V1,
            config: *self,
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart config contract v1: {e}"))
        })
    }

    /// Parses either a bare config object or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(config) = serde_json::from_str::<ChartConfig>(input) {
            return Ok(config);
        }
        let payload: ChartConfigJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse chart config json payload: {e}"))
        })?;
        if payload.schema_version != CHART_CONFIG_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported chart config schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.config)
    }
}

impl<R: Renderer> CandlestickChart<R> {
    /// Current viewport, style and gesture thresholds as a versioned JSON payload.
    pub fn config_json_contract_v1_pretty(&self) -> ChartResult<String> {
        ChartConfig::new(self.viewport())
            .with_style(self.style())
            .with_gesture_config(self.gestures.config())
            .to_json_contract_v1_pretty()
    }
}
