use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ChartError, ChartResult};

/// Phase of a raw pointer/touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerAction {
    Down,
    Move,
    Up,
    Cancel,
}

/// Raw single-pointer event in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub x: f64,
    pub y: f64,
    /// Monotonic event timestamp in milliseconds.
    pub time_ms: u64,
}

impl PointerEvent {
    #[must_use]
    pub fn new(action: PointerAction, x: f64, y: f64, time_ms: u64) -> Self {
        Self {
            action,
            x,
            y,
            time_ms,
        }
    }

    #[must_use]
    pub fn down(x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(PointerAction::Down, x, y, time_ms)
    }

    #[must_use]
    pub fn moved(x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(PointerAction::Move, x, y, time_ms)
    }

    #[must_use]
    pub fn up(x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(PointerAction::Up, x, y, time_ms)
    }
}

/// Discrete gesture recognized from raw pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    DragTo { x: f64, y: f64 },
    DoubleTap { x: f64, y: f64 },
}

/// Thresholds for tap and double-tap recognition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Max delay from the first press to the second press.
    pub double_tap_timeout_ms: u64,
    /// Min delay from the first release to the second press.
    pub double_tap_min_time_ms: u64,
    /// Max distance between the two presses of a double tap.
    pub double_tap_slop_px: f64,
    /// Movement beyond this distance turns a press into a drag.
    pub touch_slop_px: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            double_tap_timeout_ms: 300,
            double_tap_min_time_ms: 40,
            double_tap_slop_px: 100.0,
            touch_slop_px: 8.0,
        }
    }
}

impl GestureConfig {
    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("double_tap_slop_px", self.double_tap_slop_px),
            ("touch_slop_px", self.touch_slop_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidStyle(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if self.double_tap_min_time_ms > self.double_tap_timeout_ms {
            return Err(ChartError::InvalidStyle(
                "double_tap_min_time_ms must not exceed double_tap_timeout_ms".to_owned(),
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    x: f64,
    y: f64,
    pressed_at_ms: u64,
    moved_beyond_slop: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CompletedTap {
    x: f64,
    y: f64,
    pressed_at_ms: u64,
    released_at_ms: u64,
}

/// Turns raw pointer events into drag and double-tap gestures.
///
/// A press that is released without moving past the touch slop counts as a
/// tap. A second press is a double tap when it lands within the double-tap
/// slop of the tap, within the timeout of the tap's press, and no sooner than
/// the min time after the tap's release. The second press is reported as a double tap only; it never
/// opens a new tap candidate, so triple taps do not chain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GestureClassifier {
    config: GestureConfig,
    press: Option<Press>,
    last_tap: Option<CompletedTap>,
    in_double_tap: bool,
}

impl GestureClassifier {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> GestureConfig {
        self.config
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    pub fn classify(&mut self, event: PointerEvent) -> Option<GestureEvent> {
        match event.action {
            PointerAction::Down => self.on_down(event),
            PointerAction::Move => self.on_move(event),
            PointerAction::Up => {
                self.on_up(event);
                None
            }
            PointerAction::Cancel => {
                self.press = None;
                self.last_tap = None;
                self.in_double_tap = false;
                None
            }
        }
    }

    fn on_down(&mut self, event: PointerEvent) -> Option<GestureEvent> {
        self.press = Some(Press {
            x: event.x,
            y: event.y,
            pressed_at_ms: event.time_ms,
            moved_beyond_slop: false,
        });

        let config = self.config;
        let is_double_tap = self.last_tap.take().is_some_and(|tap| {
            let since_press = event.time_ms.saturating_sub(tap.pressed_at_ms);
            let since_release = event.time_ms.saturating_sub(tap.released_at_ms);
            since_press <= config.double_tap_timeout_ms
                && since_release >= config.double_tap_min_time_ms
                && distance(tap.x, tap.y, event.x, event.y) <= config.double_tap_slop_px
        });
        self.in_double_tap = is_double_tap;
        if is_double_tap {
            trace!(x = event.x, y = event.y, "double tap recognized");
            return Some(GestureEvent::DoubleTap {
                x: event.x,
                y: event.y,
            });
        }
        None
    }

    fn on_move(&mut self, event: PointerEvent) -> Option<GestureEvent> {
        let press = self.press.as_mut()?;
        if distance(press.x, press.y, event.x, event.y) > self.config.touch_slop_px {
            press.moved_beyond_slop = true;
        }
        Some(GestureEvent::DragTo {
            x: event.x,
            y: event.y,
        })
    }

    fn on_up(&mut self, event: PointerEvent) {
        let Some(press) = self.press.take() else {
            return;
        };
        let was_tap = !press.moved_beyond_slop && !self.in_double_tap;
        self.in_double_tap = false;
        self.last_tap = was_tap.then_some(CompletedTap {
            x: press.x,
            y: press.y,
            pressed_at_ms: press.pressed_at_ms,
            released_at_ms: event.time_ms,
        });
    }
}

fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x2 - x1).hypot(y2 - y1)
}

#[cfg(test)]
mod tests {
    use super::{GestureClassifier, GestureConfig, GestureEvent, PointerEvent};

    fn tap(classifier: &mut GestureClassifier, x: f64, y: f64, at_ms: u64) -> Option<GestureEvent> {
        let down = classifier.classify(PointerEvent::down(x, y, at_ms));
        classifier.classify(PointerEvent::up(x, y, at_ms + 40));
        down
    }

    #[test]
    fn two_quick_taps_make_a_double_tap() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        assert_eq!(tap(&mut classifier, 100.0, 100.0, 0), None);
        assert_eq!(
            tap(&mut classifier, 110.0, 105.0, 200),
            Some(GestureEvent::DoubleTap { x: 110.0, y: 105.0 })
        );
    }

    #[test]
    fn slow_second_tap_is_not_a_double_tap() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        tap(&mut classifier, 100.0, 100.0, 0);
        assert_eq!(tap(&mut classifier, 100.0, 100.0, 1_000), None);
    }

    #[test]
    fn timeout_counts_from_the_first_press() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        classifier.classify(PointerEvent::down(100.0, 100.0, 0));
        classifier.classify(PointerEvent::up(100.0, 100.0, 250));
        assert_eq!(
            classifier.classify(PointerEvent::down(100.0, 100.0, 320)),
            None
        );
    }

    #[test]
    fn second_press_too_soon_after_release_is_not_a_double_tap() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        classifier.classify(PointerEvent::down(100.0, 100.0, 0));
        classifier.classify(PointerEvent::up(100.0, 100.0, 50));
        assert_eq!(
            classifier.classify(PointerEvent::down(100.0, 100.0, 70)),
            None
        );
    }

    #[test]
    fn negative_or_nan_slop_is_rejected() {
        let negative = GestureConfig {
            double_tap_slop_px: -1.0,
            ..GestureConfig::default()
        };
        assert!(negative.validate().is_err());
        let nan = GestureConfig {
            touch_slop_px: f64::NAN,
            ..GestureConfig::default()
        };
        assert!(nan.validate().is_err());
        let inverted = GestureConfig {
            double_tap_timeout_ms: 30,
            ..GestureConfig::default()
        };
        assert!(inverted.validate().is_err());
        assert!(GestureConfig::default().validate().is_ok());
    }

    #[test]
    fn distant_second_tap_is_not_a_double_tap() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        tap(&mut classifier, 100.0, 100.0, 0);
        assert_eq!(tap(&mut classifier, 400.0, 100.0, 100), None);
    }

    #[test]
    fn dragged_press_does_not_count_as_first_tap() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        classifier.classify(PointerEvent::down(100.0, 100.0, 0));
        classifier.classify(PointerEvent::moved(160.0, 100.0, 20));
        classifier.classify(PointerEvent::up(160.0, 100.0, 40));
        assert_eq!(tap(&mut classifier, 100.0, 100.0, 100), None);
    }

    #[test]
    fn triple_tap_reports_one_double_tap() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        tap(&mut classifier, 50.0, 50.0, 0);
        assert!(tap(&mut classifier, 50.0, 50.0, 100).is_some());
        assert_eq!(tap(&mut classifier, 50.0, 50.0, 200), None);
    }

    #[test]
    fn moves_without_press_are_ignored() {
        let mut classifier = GestureClassifier::new(GestureConfig::default());
        assert_eq!(classifier.classify(PointerEvent::moved(1.0, 2.0, 0)), None);
        classifier.classify(PointerEvent::down(1.0, 2.0, 10));
        assert_eq!(
            classifier.classify(PointerEvent::moved(3.0, 4.0, 20)),
            Some(GestureEvent::DragTo { x: 3.0, y: 4.0 })
        );
    }
}
