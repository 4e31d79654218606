use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{LinePrimitive, RectPrimitive, TextPrimitive};

/// Position of one primitive inside its typed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawSlot {
    Line(usize),
    Rect(usize),
    Text(usize),
}

/// Borrowed primitive yielded in paint order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FramePrimitive<'a> {
    Line(&'a LinePrimitive),
    Rect(&'a RectPrimitive),
    Text(&'a TextPrimitive),
}

/// Backend-agnostic scene for one chart draw pass.
///
/// Primitives are grouped by kind for inspection, and the frame also keeps
/// the order they were pushed in. Backends paint through
/// [`RenderFrame::iter_in_draw_order`], so later pushes land on top.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
    draw_order: Vec<DrawSlot>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
            draw_order: Vec::new(),
        }
    }

    pub fn push_line(&mut self, line: LinePrimitive) {
        self.draw_order.push(DrawSlot::Line(self.lines.len()));
        self.lines.push(line);
    }

    pub fn push_rect(&mut self, rect: RectPrimitive) {
        self.draw_order.push(DrawSlot::Rect(self.rects.len()));
        self.rects.push(rect);
    }

    pub fn push_text(&mut self, text: TextPrimitive) {
        self.draw_order.push(DrawSlot::Text(self.texts.len()));
        self.texts.push(text);
    }

    /// Primitives in the order they were pushed.
    ///
    /// Entries whose primitive was removed from a typed list are skipped.
    pub fn iter_in_draw_order(&self) -> impl Iterator<Item = FramePrimitive<'_>> + '_ {
        self.draw_order.iter().filter_map(|slot| match *slot {
            DrawSlot::Line(index) => self.lines.get(index).map(FramePrimitive::Line),
            DrawSlot::Rect(index) => self.rects.get(index).map(FramePrimitive::Rect),
            DrawSlot::Text(index) => self.texts.get(index).map(FramePrimitive::Text),
        })
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if self.draw_order.len() != self.primitive_count() {
            return Err(ChartError::InvalidData(
                "primitives must be added through the frame push methods".to_owned(),
            ));
        }

        for line in &self.lines {
            line.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.lines.len() + self.rects.len() + self.texts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}
