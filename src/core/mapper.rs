use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::{Candle, CandleDirection, Viewport};
use crate::error::{ChartError, ChartResult};

/// Margin reserved on the left and bottom edges for axes and labels.
pub const DEFAULT_EDGE_OFFSET_PX: f64 = 60.0;

/// Fixed chart frame: viewport, edge offset and axis line thickness.
///
/// Candle geometry is produced in plot space, whose origin sits `edge_offset`
/// to the right of and `edge_offset` above the view origin. Use
/// [`ChartLayout::plot_to_view`] to move plot coordinates onto the view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    viewport: Viewport,
    edge_offset_px: f64,
    axis_line_width_px: f64,
}

impl ChartLayout {
    pub fn new(
        viewport: Viewport,
        edge_offset_px: f64,
        axis_line_width_px: f64,
    ) -> ChartResult<Self> {
        viewport.validate()?;
        if !edge_offset_px.is_finite() || edge_offset_px < 0.0 {
            return Err(ChartError::InvalidStyle(
                "edge offset must be finite and >= 0".to_owned(),
            ));
        }
        if !axis_line_width_px.is_finite() || axis_line_width_px <= 0.0 {
            return Err(ChartError::InvalidStyle(
                "axis line width must be finite and > 0".to_owned(),
            ));
        }

        Ok(Self {
            viewport,
            edge_offset_px,
            axis_line_width_px,
        })
    }

    #[must_use]
    pub fn viewport(self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn edge_offset_px(self) -> f64 {
        self.edge_offset_px
    }

    #[must_use]
    pub fn axis_line_width_px(self) -> f64 {
        self.axis_line_width_px
    }

    #[must_use]
    pub fn half_line_width_px(self) -> f64 {
        self.axis_line_width_px / 2.0
    }

    /// Horizontal span shared by all candle slots.
    #[must_use]
    pub fn plot_width_px(self) -> f64 {
        self.viewport.width_px() - self.edge_offset_px
    }

    /// Vertical span that price `max_price` reaches above the zero line.
    #[must_use]
    pub fn price_span_px(self) -> f64 {
        self.viewport.height_px() - self.axis_line_width_px - self.edge_offset_px
    }

    /// Width of one candle slot when `candle_count` candles share the plot.
    pub fn slot_width_px(self, candle_count: usize) -> ChartResult<f64> {
        if candle_count == 0 {
            return Err(ChartError::InvalidData(
                "slot width requires at least one candle".to_owned(),
            ));
        }
        let plot_width = self.plot_width_px();
        if plot_width <= 0.0 {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        Ok(plot_width / candle_count as f64)
    }

    #[must_use]
    pub fn plot_to_view(self, x: f64, y: f64) -> (f64, f64) {
        (x + self.edge_offset_px, y - self.edge_offset_px)
    }

    /// Price readout for a crosshair at view-space `y`.
    ///
    /// Returns `None` when the view is not taller than the edge offset.
    #[must_use]
    pub fn crosshair_price(self, y: f64, max_price: f64) -> Option<f64> {
        let plot_height = self.viewport.height_px() - self.edge_offset_px;
        if plot_height <= 0.0 {
            return None;
        }
        let scaled = plot_height - y + self.axis_line_width_px;
        Some(max_price * scaled / plot_height)
    }
}

/// Halves (by `shrink_factor`) the base body width until it fits inside a slot.
///
/// The result is always strictly less than `slot_width_px`.
pub fn fit_body_width(
    slot_width_px: f64,
    base_width_px: f64,
    shrink_factor: f64,
) -> ChartResult<f64> {
    if !slot_width_px.is_finite() || slot_width_px <= 0.0 {
        return Err(ChartError::InvalidData(
            "slot width must be finite and > 0".to_owned(),
        ));
    }
    if !base_width_px.is_finite() || base_width_px <= 0.0 {
        return Err(ChartError::InvalidStyle(
            "candle body width must be finite and > 0".to_owned(),
        ));
    }
    if !shrink_factor.is_finite() || shrink_factor <= 0.0 || shrink_factor >= 1.0 {
        return Err(ChartError::InvalidStyle(
            "candle body shrink factor must be in (0, 1)".to_owned(),
        ));
    }

    let mut width = base_width_px;
    while slot_width_px <= width {
        width *= shrink_factor;
    }
    Ok(width)
}

/// Projected candle geometry in plot-space pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleGeometry {
    pub center_x: f64,
    pub body_left: f64,
    pub body_right: f64,
    pub body_top: f64,
    pub body_bottom: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub direction: CandleDirection,
}

/// Index/price to pixel mapping for one candle set.
///
/// Prices map linearly from zero: price `0` lands on the plot bottom and
/// `max_price` lands `price_span_px` above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleMapper {
    layout: ChartLayout,
    candle_count: usize,
    slot_width_px: f64,
    body_width_px: f64,
    max_price: f64,
}

impl CandleMapper {
    pub fn new(
        layout: ChartLayout,
        candle_count: usize,
        max_price: f64,
        base_body_width_px: f64,
        shrink_factor: f64,
    ) -> ChartResult<Self> {
        if !max_price.is_finite() || max_price <= 0.0 {
            return Err(ChartError::InvalidData(
                "max price must be finite and > 0".to_owned(),
            ));
        }
        let slot_width_px = layout.slot_width_px(candle_count)?;
        let body_width_px = fit_body_width(slot_width_px, base_body_width_px, shrink_factor)?;

        Ok(Self {
            layout,
            candle_count,
            slot_width_px,
            body_width_px,
            max_price,
        })
    }

    #[must_use]
    pub fn layout(self) -> ChartLayout {
        self.layout
    }

    #[must_use]
    pub fn candle_count(self) -> usize {
        self.candle_count
    }

    #[must_use]
    pub fn slot_width_px(self) -> f64 {
        self.slot_width_px
    }

    #[must_use]
    pub fn body_width_px(self) -> f64 {
        self.body_width_px
    }

    #[must_use]
    pub fn max_price(self) -> f64 {
        self.max_price
    }

    #[must_use]
    pub fn center_x(self, index: usize) -> f64 {
        self.slot_width_px * (index + 1) as f64
            - self.body_width_px / 2.0
            - self.layout.half_line_width_px()
    }

    pub fn price_to_y(self, price: f64) -> ChartResult<f64> {
        if !price.is_finite() {
            return Err(ChartError::InvalidData("price must be finite".to_owned()));
        }
        let y = self.layout.viewport().height_px()
            - (price / self.max_price) * self.layout.price_span_px();
        if !y.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "price {price} does not map to a finite y for max price {}",
                self.max_price
            )));
        }
        Ok(y)
    }

    pub fn project(self, index: usize, candle: Candle) -> ChartResult<CandleGeometry> {
        let center_x = self.center_x(index);
        let half = self.body_width_px / 2.0;
        let open_y = self.price_to_y(candle.open())?;
        let close_y = self.price_to_y(candle.close())?;
        let high_y = self.price_to_y(candle.high())?;
        let low_y = self.price_to_y(candle.low())?;

        Ok(CandleGeometry {
            center_x,
            body_left: center_x - half,
            body_right: center_x + half,
            body_top: open_y.min(close_y),
            body_bottom: open_y.max(close_y),
            wick_top: high_y,
            wick_bottom: low_y,
            direction: candle.direction(),
        })
    }
}

/// Projects candles (in slot order) into plot-space geometry.
pub fn project_candles(candles: &[Candle], mapper: CandleMapper) -> ChartResult<Vec<CandleGeometry>> {
    #[cfg(feature = "parallel-projection")]
    {
        let projected: Vec<ChartResult<CandleGeometry>> = candles
            .par_iter()
            .enumerate()
            .map(|(index, candle)| mapper.project(index, *candle))
            .collect();
        projected.into_iter().collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        candles
            .iter()
            .enumerate()
            .map(|(index, candle)| mapper.project(index, *candle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{CandleMapper, ChartLayout, DEFAULT_EDGE_OFFSET_PX, fit_body_width};
    use crate::core::Viewport;

    fn layout(width: u32, height: u32) -> ChartLayout {
        ChartLayout::new(Viewport::new(width, height), DEFAULT_EDGE_OFFSET_PX, 5.0)
            .expect("valid layout")
    }

    #[test]
    fn price_far_above_max_is_rejected() {
        let mapper = CandleMapper::new(layout(1000, 1000), 1, 1e-10, 50.0, 0.5).expect("mapper");
        assert!(mapper.price_to_y(1e300).is_err());
        assert!(mapper.price_to_y(1e-10).is_ok());
    }

    #[test]
    fn body_width_keeps_base_when_slot_is_wide() {
        let width = fit_body_width(470.0, 50.0, 0.5).expect("fit");
        assert_eq!(width, 50.0);
    }

    #[test]
    fn body_width_halves_until_below_slot() {
        assert_eq!(fit_body_width(20.0, 50.0, 0.5).expect("fit"), 12.5);
        // equal widths still shrink
        assert_eq!(fit_body_width(25.0, 50.0, 0.5).expect("fit"), 12.5);
    }

    #[test]
    fn zero_slot_is_rejected_instead_of_looping() {
        assert!(fit_body_width(0.0, 50.0, 0.5).is_err());
        assert!(fit_body_width(10.0, 50.0, 1.0).is_err());
    }

    #[test]
    fn view_narrower_than_offset_has_no_slots() {
        let narrow = layout(40, 400);
        assert!(narrow.slot_width_px(3).is_err());
        assert!(layout(1000, 400).slot_width_px(0).is_err());
    }

    #[test]
    fn price_zero_maps_to_plot_bottom_and_max_to_span_top() {
        let mapper = CandleMapper::new(layout(1000, 1000), 2, 200.0, 50.0, 0.5).expect("mapper");
        assert_relative_eq!(mapper.price_to_y(0.0).expect("zero"), 1000.0);
        assert_relative_eq!(mapper.price_to_y(200.0).expect("max"), 65.0);
        assert_relative_eq!(mapper.price_to_y(100.0).expect("mid"), 532.5);
    }

    #[test]
    fn mapper_rejects_non_positive_max_price() {
        assert!(CandleMapper::new(layout(1000, 1000), 2, 0.0, 50.0, 0.5).is_err());
        assert!(CandleMapper::new(layout(1000, 1000), 2, f64::NAN, 50.0, 0.5).is_err());
    }

    #[test]
    fn crosshair_price_reads_max_near_plot_top() {
        let price = layout(1000, 1000)
            .crosshair_price(5.0, 200.0)
            .expect("price");
        assert_relative_eq!(price, 200.0);
        assert!(layout(100, 50).crosshair_price(10.0, 200.0).is_none());
    }
}
