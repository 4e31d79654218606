mod frame;
mod null_renderer;
mod primitives;

pub use frame::{FramePrimitive, RenderFrame};
pub use null_renderer::NullRenderer;
pub use primitives::{Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive};

use crate::error::ChartResult;

/// Contract implemented by any drawing surface.
///
/// Backends receive a fully materialized `RenderFrame`, so drawing code stays
/// isolated from candle geometry and input handling.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderer};
