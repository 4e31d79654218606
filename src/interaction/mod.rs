mod gesture;

use serde::{Deserialize, Serialize};

pub use gesture::{
    GestureClassifier, GestureConfig, GestureEvent, PointerAction, PointerEvent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Dragging,
}

/// Last drag position, driving the crosshair overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    pub x: f64,
    pub y: f64,
}

/// Result of feeding one pointer event to the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputOutcome {
    /// The event was fully handled; lower layers need not see it.
    pub consumed: bool,
    /// The chart changed and should be drawn again.
    pub redraw_requested: bool,
}

/// View-local input state: drag mode, crosshair pointer and zoom flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    mode: InteractionMode,
    pointer: Option<PointerState>,
    zoomed: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            pointer: None,
            zoomed: false,
        }
    }
}

impl InteractionState {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn pointer(self) -> Option<PointerState> {
        self.pointer
    }

    #[must_use]
    pub fn is_zoomed(self) -> bool {
        self.zoomed
    }

    pub fn on_press(&mut self) {
        self.mode = InteractionMode::Dragging;
    }

    pub fn on_release(&mut self) {
        self.mode = InteractionMode::Idle;
    }

    pub fn on_drag_to(&mut self, x: f64, y: f64) {
        self.pointer = Some(PointerState { x, y });
    }

    /// Flips the zoom flag and returns the new value.
    pub fn toggle_zoom(&mut self) -> bool {
        self.zoomed = !self.zoomed;
        self.zoomed
    }
}
