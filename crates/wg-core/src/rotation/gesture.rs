//! Swipe gesture resolution

use super::Direction;

/// Touch start captured between a gesture's start and end events
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureState {
    start: Option<f64>,
}

impl GestureState {
    /// Record where the touch began, replacing any unfinished gesture
    pub fn begin(&mut self, x: f64) {
        self.start = Some(x);
    }

    /// Consume the gesture and resolve it against `threshold`
    pub fn finish(&mut self, x: f64, threshold: f64) -> Option<Direction> {
        let start = self.start.take()?;
        resolve_swipe(start, x, threshold)
    }

    pub fn clear(&mut self) {
        self.start = None;
    }

    pub fn in_progress(&self) -> bool {
        self.start.is_some()
    }
}

/// Decide whether a touch from `start` to `end` is a swipe.
///
/// Travel must strictly exceed `threshold`. A leftward swipe (`start > end`)
/// moves to the next item.
pub fn resolve_swipe(start: f64, end: f64, threshold: f64) -> Option<Direction> {
    let diff = start - end;
    if diff.abs() > threshold {
        Some(if diff > 0.0 { Direction::Next } else { Direction::Previous })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_swipe() {
        assert_eq!(resolve_swipe(100.0, 40.0, 50.0), Some(Direction::Next));
        assert_eq!(resolve_swipe(40.0, 100.0, 50.0), Some(Direction::Previous));
        assert_eq!(resolve_swipe(100.0, 70.0, 50.0), None);
        assert_eq!(resolve_swipe(100.0, 50.0, 50.0), None);
        assert_eq!(resolve_swipe(10.0, 10.5, 0.0), Some(Direction::Previous));
    }

    #[test]
    fn test_gesture_state_is_consumed() {
        let mut gesture = GestureState::default();
        assert_eq!(gesture.finish(0.0, 50.0), None);

        gesture.begin(200.0);
        assert!(gesture.in_progress());
        assert_eq!(gesture.finish(100.0, 50.0), Some(Direction::Next));
        assert!(!gesture.in_progress());
        assert_eq!(gesture.finish(0.0, 50.0), None);
    }
}
