use std::fs::File;
use std::path::Path;

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use tracing::{debug, trace};

use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, FramePrimitive, LinePrimitive, RectPrimitive, RenderFrame, Renderer, TextHAlign,
    TextPrimitive,
};

const LABEL_FONT_FAMILY: &str = "Sans";

/// Draws chart frames onto a cairo context supplied by the host, such as the
/// one handed to a toolkit draw callback.
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()>;
}

/// Cairo + Pango chart backend.
///
/// `Renderer::render` paints into an owned offscreen surface that can be saved
/// with [`CairoRenderer::write_png`].
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    background: Color,
    last_primitive_count: usize,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| cairo_error("cannot allocate chart surface", err))?;
        Ok(Self {
            surface,
            background: Color::rgb(1.0, 1.0, 1.0),
            last_primitive_count: 0,
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_background(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.background = color;
        Ok(())
    }

    /// Number of primitives painted by the last frame.
    #[must_use]
    pub fn last_primitive_count(&self) -> usize {
        self.last_primitive_count
    }

    pub fn write_png(&self, path: impl AsRef<Path>) -> ChartResult<()> {
        let path = path.as_ref();
        self.surface.flush();
        let mut file = File::create(path).map_err(|err| {
            ChartError::InvalidData(format!("failed to create {}: {err}", path.display()))
        })?;
        self.surface.write_to_png(&mut file).map_err(|err| {
            ChartError::InvalidData(format!("failed to write png {}: {err}", path.display()))
        })?;
        debug!(path = %path.display(), "wrote chart png");
        Ok(())
    }

    fn paint_frame(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;

        set_source(context, self.background);
        context
            .paint()
            .map_err(|err| cairo_error("cannot clear chart background", err))?;

        let mut painted = 0;
        for primitive in frame.iter_in_draw_order() {
            match primitive {
                FramePrimitive::Line(line) => stroke_line(context, line)?,
                FramePrimitive::Rect(rect) => paint_body(context, rect)?,
                FramePrimitive::Text(text) => show_label(context, text),
            }
            painted += 1;
        }

        self.last_primitive_count = painted;
        trace!(painted, "cairo frame painted");
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| cairo_error("cannot create cairo context", err))?;
        self.paint_frame(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()> {
        self.paint_frame(context, frame)
    }
}

fn set_source(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn stroke_line(context: &Context, line: &LinePrimitive) -> ChartResult<()> {
    set_source(context, line.color);
    context.set_line_width(line.stroke_width);
    context.move_to(line.x1, line.y1);
    context.line_to(line.x2, line.y2);
    context
        .stroke()
        .map_err(|err| cairo_error("cannot stroke line", err))
}

/// Fills a candle body, then strokes its border over the fill.
fn paint_body(context: &Context, rect: &RectPrimitive) -> ChartResult<()> {
    context.rectangle(rect.x, rect.y, rect.width, rect.height);
    set_source(context, rect.fill_color);
    if rect.border_width <= 0.0 {
        return context
            .fill()
            .map_err(|err| cairo_error("cannot fill candle body", err));
    }

    context
        .fill_preserve()
        .map_err(|err| cairo_error("cannot fill candle body", err))?;
    set_source(context, rect.border_color);
    context.set_line_width(rect.border_width);
    context
        .stroke()
        .map_err(|err| cairo_error("cannot stroke candle border", err))
}

/// Lays the label out with its top edge at `text.y`.
fn show_label(context: &Context, text: &TextPrimitive) {
    let layout = pangocairo::functions::create_layout(context);
    let mut font = FontDescription::new();
    font.set_family(LABEL_FONT_FAMILY);
    font.set_absolute_size(text.font_size_px * f64::from(pango::SCALE));
    layout.set_font_description(Some(&font));
    layout.set_text(&text.text);

    let width = f64::from(layout.pixel_size().0);
    let left = match text.h_align {
        TextHAlign::Left => text.x,
        TextHAlign::Center => text.x - width / 2.0,
        TextHAlign::Right => text.x - width,
    };

    set_source(context, text.color);
    context.move_to(left, text.y);
    pangocairo::functions::show_layout(context, &layout);
}

fn cairo_error(context: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{context}: {err}"))
}
