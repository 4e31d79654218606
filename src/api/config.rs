use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_EDGE_OFFSET_PX, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::GestureConfig;
use crate::render::Color;

/// Drawing parameters fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Body fill when `close > open`.
    pub up_color: Color,
    /// Body fill otherwise.
    pub down_color: Color,
    pub candle_body_width_px: f64,
    pub candle_body_shrink_factor: f64,
    /// Stroke of the high/low wick.
    pub price_line_width_px: f64,
    /// Stroke of axes, ticks and crosshair. Also the `L` term of the geometry.
    pub axis_line_width_px: f64,
    pub edge_offset_px: f64,
    pub tick_length_px: f64,
    pub label_font_size_px: f64,
    pub axis_color: Color,
    pub wick_color: Color,
    pub body_border_color: Color,
    pub label_color: Color,
}

impl Default for ChartStyle {
    fn default() -> Self {
        let translucent = 200.0 / 255.0;
        Self {
            up_color: Color::GREEN,
            down_color: Color::RED,
            candle_body_width_px: 50.0,
            candle_body_shrink_factor: 0.5,
            price_line_width_px: 4.0,
            axis_line_width_px: 5.0,
            edge_offset_px: DEFAULT_EDGE_OFFSET_PX,
            tick_length_px: 15.0,
            label_font_size_px: 30.0,
            axis_color: Color::GRAY.with_alpha(translucent),
            wick_color: Color::BLACK,
            body_border_color: Color::BLACK,
            label_color: Color::BLACK.with_alpha(translucent),
        }
    }
}

impl ChartStyle {
    /// Half the axis line width; used as the candle body border stroke.
    #[must_use]
    pub fn body_border_width_px(self) -> f64 {
        self.axis_line_width_px / 2.0
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("candle_body_width_px", self.candle_body_width_px),
            ("price_line_width_px", self.price_line_width_px),
            ("axis_line_width_px", self.axis_line_width_px),
            ("tick_length_px", self.tick_length_px),
            ("label_font_size_px", self.label_font_size_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidStyle(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !self.edge_offset_px.is_finite() || self.edge_offset_px < 0.0 {
            return Err(ChartError::InvalidStyle(
                "edge_offset_px must be finite and >= 0".to_owned(),
            ));
        }
        if !self.candle_body_shrink_factor.is_finite()
            || self.candle_body_shrink_factor <= 0.0
            || self.candle_body_shrink_factor >= 1.0
        {
            return Err(ChartError::InvalidStyle(
                "candle_body_shrink_factor must be in (0, 1)".to_owned(),
            ));
        }
        for color in [
            self.up_color,
            self.down_color,
            self.axis_color,
            self.wick_color,
            self.body_border_color,
            self.label_color,
        ] {
            color
                .validate()
                .map_err(|err| ChartError::InvalidStyle(err.to_string()))?;
        }
        Ok(self)
    }
}

/// Chart bootstrap configuration.
///
/// Serializable so hosts can keep chart setup next to their own settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub style: ChartStyle,
    #[serde(default)]
    pub gesture: GestureConfig,
}

impl ChartConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            style: ChartStyle::default(),
            gesture: GestureConfig::default(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_gesture_config(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }
}
