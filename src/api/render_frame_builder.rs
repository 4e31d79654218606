use tracing::{trace, warn};

use crate::core::{CandleDirection, CandleGeometry, CandleMapper, ChartLayout, project_candles};
use crate::error::ChartResult;
use crate::interaction::PointerState;
use crate::render::{
    Color, LinePrimitive, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive,
};

use super::{CandlestickChart, ChartStyle};

/// Primitive sink that accepts plot-space coordinates.
struct PlotCanvas<'a> {
    frame: &'a mut RenderFrame,
    layout: ChartLayout,
}

impl PlotCanvas<'_> {
    fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke_width: f64, color: Color) {
        let (x1, y1) = self.layout.plot_to_view(from.0, from.1);
        let (x2, y2) = self.layout.plot_to_view(to.0, to.1);
        self.frame
            .push_line(LinePrimitive::new(x1, y1, x2, y2, stroke_width, color));
    }

    fn text(&mut self, text: String, at: (f64, f64), style: ChartStyle) {
        let (x, y) = self.layout.plot_to_view(at.0, at.1);
        self.frame.push_text(TextPrimitive::new(
            text,
            x,
            y,
            style.label_font_size_px,
            style.label_color,
            TextHAlign::Center,
        ));
    }

    fn body(&mut self, corners: (f64, f64, f64, f64), fill: Color, style: ChartStyle) {
        let (left, top) = self.layout.plot_to_view(corners.0, corners.1);
        let (right, bottom) = self.layout.plot_to_view(corners.2, corners.3);
        self.frame.push_rect(
            RectPrimitive::from_corners(left, top, right, bottom, fill)
                .with_border(style.body_border_width_px(), style.body_border_color),
        );
    }
}

impl<R: Renderer> CandlestickChart<R> {
    /// Materializes the current chart into a backend-agnostic frame.
    ///
    /// Draw order: crosshair, Y axis, X axis, date and price ticks with
    /// labels, then each candle as wick plus bordered body. Without candles,
    /// or when the candles cannot be projected onto the view, only the
    /// crosshair and axes are emitted.
    pub fn build_render_frame(&self) -> ChartResult<RenderFrame> {
        let layout = self.layout;
        let style = self.style;
        let mut frame = RenderFrame::new(layout.viewport());

        if let Some(pointer) = self.interaction.pointer() {
            self.append_crosshair(&mut frame, pointer);
        }

        let projection = self.resolve_projection();
        let body_width = projection
            .as_ref()
            .map_or(style.candle_body_width_px, |(mapper, _)| {
                mapper.body_width_px()
            });

        let mut canvas = PlotCanvas {
            frame: &mut frame,
            layout,
        };
        self.append_axes(&mut canvas, body_width);

        if let Some((mapper, geometry)) = projection {
            self.append_date_ticks(&mut canvas, mapper);
            self.append_price_ticks(&mut canvas);
            append_candles(&mut canvas, &geometry, style);
        }

        trace!(
            lines = frame.lines.len(),
            rects = frame.rects.len(),
            texts = frame.texts.len(),
            "built chart frame"
        );
        Ok(frame)
    }

    /// Mapper plus projected geometry for the stored candles, or `None` when
    /// there is nothing drawable.
    fn resolve_projection(&self) -> Option<(CandleMapper, Vec<CandleGeometry>)> {
        if self.data.is_empty() {
            return None;
        }
        let projected = CandleMapper::new(
            self.layout,
            self.data.len(),
            self.data.max_price(),
            self.style.candle_body_width_px,
            self.style.candle_body_shrink_factor,
        )
        .and_then(|mapper| Ok((mapper, project_candles(self.data.candles(), mapper)?)));
        match projected {
            Ok(projection) => Some(projection),
            Err(err) => {
                warn!(error = %err, "skipping candle drawing");
                None
            }
        }
    }

    fn append_crosshair(&self, frame: &mut RenderFrame, pointer: PointerState) {
        let layout = self.layout;
        let style = self.style;
        let height = layout.viewport().height_px();
        let offset = layout.edge_offset_px();
        let stroke = layout.axis_line_width_px();

        frame.push_line(LinePrimitive::new(
            pointer.x,
            height - offset - layout.half_line_width_px(),
            pointer.x,
            pointer.y,
            stroke,
            style.axis_color,
        ));
        frame.push_line(LinePrimitive::new(
            offset,
            pointer.y,
            pointer.x,
            pointer.y,
            stroke,
            style.axis_color,
        ));

        if let Some(price) = layout.crosshair_price(pointer.y, self.data.max_price()) {
            frame.push_text(TextPrimitive::new(
                format!("{price:.2}"),
                pointer.x,
                pointer.y - stroke - style.label_font_size_px,
                style.label_font_size_px,
                style.label_color,
                TextHAlign::Left,
            ));
        }
    }

    fn append_axes(&self, canvas: &mut PlotCanvas<'_>, body_width: f64) {
        let layout = self.layout;
        let style = self.style;
        let width = layout.viewport().width_px();
        let height = layout.viewport().height_px();
        let offset = layout.edge_offset_px();
        let half = layout.half_line_width_px();
        let stroke = layout.axis_line_width_px();

        canvas.line(
            (0.0, offset + half),
            (0.0, height + half),
            stroke,
            style.axis_color,
        );
        canvas.line(
            (0.0, height),
            (width - offset - body_width / 2.0, height),
            stroke,
            style.axis_color,
        );
    }

    fn append_date_ticks(&self, canvas: &mut PlotCanvas<'_>, mapper: CandleMapper) {
        let style = self.style;
        let height = self.layout.viewport().height_px();
        let stroke = self.layout.axis_line_width_px();

        for (index, candle) in self.data.candles().iter().enumerate() {
            let x = mapper.center_x(index);
            canvas.line(
                (x, height),
                (x, height + style.tick_length_px),
                stroke,
                style.axis_color,
            );
            canvas.text(
                candle.date_label(),
                (x, height + style.tick_length_px),
                style,
            );
        }
    }

    /// Price ticks run from the first segment boundary upwards, one past the
    /// last segment, labelled with truncated multiples of the highest stored
    /// candle high.
    fn append_price_ticks(&self, canvas: &mut PlotCanvas<'_>) {
        let (Some(segments), Some(max_high)) =
            (self.price_segment_count(), self.data.max_high_in_candles())
        else {
            return;
        };
        let style = self.style;
        let height = self.layout.viewport().height_px();
        let offset = self.layout.edge_offset_px();
        let stroke = self.layout.axis_line_width_px();
        let segment_height = (height - offset) / segments as f64;
        let price_step = max_high / segments as f64;

        for index in 0..=segments {
            let step = (index + 1) as f64;
            let y = height - segment_height * step + stroke;
            canvas.line((-style.tick_length_px, y), (0.0, y), stroke, style.axis_color);
            canvas.text(
                format!("{}", (step * price_step).trunc() as i64),
                (-offset / 2.0, y + stroke),
                style,
            );
        }
    }
}

fn append_candles(canvas: &mut PlotCanvas<'_>, geometry: &[CandleGeometry], style: ChartStyle) {
    for candle in geometry {
        canvas.line(
            (candle.center_x, candle.wick_bottom),
            (candle.center_x, candle.wick_top),
            style.price_line_width_px,
            style.wick_color,
        );
        let fill = match candle.direction {
            CandleDirection::Up => style.up_color,
            CandleDirection::Down => style.down_color,
        };
        canvas.body(
            (
                candle.body_left,
                candle.body_top,
                candle.body_right,
                candle.body_bottom,
            ),
            fill,
            style,
        );
    }
}
