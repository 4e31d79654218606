use tracing::{debug, trace, warn};

use crate::interaction::{GestureEvent, InputOutcome, PointerAction, PointerEvent};
use crate::render::Renderer;

use super::CandlestickChart;

impl<R: Renderer> CandlestickChart<R> {
    /// Feeds one raw pointer event through the gesture classifier and reacts
    /// to the resulting gesture.
    ///
    /// - `Down` is consumed and starts a drag.
    /// - `Move` during a drag moves the crosshair and is left unconsumed so
    ///   outer layers still see it.
    /// - `Up`/`Cancel` end the drag.
    /// - A recognized double tap toggles zoom.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> InputOutcome {
        let mut outcome = InputOutcome::default();

        match self.gestures.classify(event) {
            Some(GestureEvent::DragTo { x, y }) => {
                outcome.redraw_requested = self.on_drag_to(x, y);
            }
            Some(GestureEvent::DoubleTap { .. }) => {
                self.on_double_tap();
                outcome.redraw_requested = true;
            }
            None => {}
        }

        match event.action {
            PointerAction::Down => {
                self.interaction.on_press();
                outcome.consumed = true;
            }
            PointerAction::Move => {}
            PointerAction::Up | PointerAction::Cancel => self.interaction.on_release(),
        }

        outcome
    }

    /// Moves the crosshair to view coordinates `(x, y)`.
    ///
    /// Returns `false` and leaves the pointer untouched for non-finite input.
    pub fn on_drag_to(&mut self, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            warn!(x, y, "ignoring non-finite drag position");
            return false;
        }
        self.interaction.on_drag_to(x, y);
        trace!(x, y, "crosshair moved");
        self.request_redraw();
        true
    }

    pub fn on_double_tap(&mut self) {
        let zoomed = self.interaction.toggle_zoom();
        debug!(zoomed, "zoom toggled");
        self.request_redraw();
    }
}
