use tracing::trace;

use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless usage.
///
/// It still validates every frame and records primitive counts plus the last
/// frame, so tests can inspect what a real backend would have drawn.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_line_count: usize,
    pub last_rect_count: usize,
    pub last_text_count: usize,
    pub frames_rendered: usize,
    pub last_frame: Option<RenderFrame>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.last_line_count = frame.lines.len();
        self.last_rect_count = frame.rects.len();
        self.last_text_count = frame.texts.len();
        self.frames_rendered += 1;
        self.last_frame = Some(frame.clone());
        trace!(frames_rendered = self.frames_rendered, "null renderer frame");
        Ok(())
    }
}
