use tracing::{debug, trace};

use crate::core::{Candle, ChartData, ChartLayout, Viewport};
use crate::error::ChartResult;
use crate::interaction::{GestureClassifier, InteractionMode, InteractionState, PointerState};
use crate::render::Renderer;

use super::{ChartConfig, ChartStyle};

/// Candlestick chart view consumed by host applications.
///
/// Owns the candle store, style, input state and the renderer. All mutation
/// goes through `&mut self`; a redraw request flag tells the host when the
/// next `render` is due.
pub struct CandlestickChart<R: Renderer> {
    pub(super) renderer: R,
    pub(super) layout: ChartLayout,
    pub(super) style: ChartStyle,
    pub(super) data: ChartData,
    pub(super) interaction: InteractionState,
    pub(super) gestures: GestureClassifier,
    pub(super) redraw_requested: bool,
}

impl<R: Renderer> CandlestickChart<R> {
    pub fn new(renderer: R, config: ChartConfig) -> ChartResult<Self> {
        let style = config.style.validate()?;
        let gesture = config.gesture.validate()?;
        let layout = ChartLayout::new(
            config.viewport,
            style.edge_offset_px,
            style.axis_line_width_px,
        )?;
        debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            "candlestick chart created"
        );

        Ok(Self {
            renderer,
            layout,
            style,
            data: ChartData::new(),
            interaction: InteractionState::default(),
            gestures: GestureClassifier::new(gesture),
            redraw_requested: true,
        })
    }

    /// Replaces the candle set. See [`ChartData::set_candles`].
    pub fn set_candles(&mut self, candles: Vec<Candle>) {
        self.data.set_candles(candles);
        self.request_redraw();
    }

    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        self.data.candles()
    }

    #[must_use]
    pub fn max_price(&self) -> f64 {
        self.data.max_price()
    }

    #[must_use]
    pub fn data(&self) -> &ChartData {
        &self.data
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.layout.viewport()
    }

    #[must_use]
    pub fn layout(&self) -> ChartLayout {
        self.layout
    }

    pub fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        self.layout = ChartLayout::new(
            viewport,
            self.style.edge_offset_px,
            self.style.axis_line_width_px,
        )?;
        trace!(
            width = viewport.width,
            height = viewport.height,
            "chart resized"
        );
        self.request_redraw();
        Ok(())
    }

    #[must_use]
    pub fn style(&self) -> ChartStyle {
        self.style
    }

    pub fn set_style(&mut self, style: ChartStyle) -> ChartResult<()> {
        let style = style.validate()?;
        self.layout = ChartLayout::new(
            self.layout.viewport(),
            style.edge_offset_px,
            style.axis_line_width_px,
        )?;
        self.style = style;
        self.request_redraw();
        Ok(())
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    #[must_use]
    pub fn pointer(&self) -> Option<PointerState> {
        self.interaction.pointer()
    }

    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.interaction.is_zoomed()
    }

    /// Number of price-axis segments: one per candle, four per candle when
    /// zoomed. `None` without candles.
    ///
    /// Zoom only changes this density; candle geometry is unaffected.
    #[must_use]
    pub fn price_segment_count(&self) -> Option<usize> {
        let candle_count = self.data.len();
        if candle_count == 0 {
            return None;
        }
        Some(if self.is_zoomed() {
            candle_count * 4
        } else {
            candle_count
        })
    }

    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.redraw_requested
    }

    /// Returns and clears the pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    pub(super) fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_render_frame()?;
        self.renderer.render(&frame)?;
        self.redraw_requested = false;
        Ok(())
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
