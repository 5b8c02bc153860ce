use serde::{Serialize, Deserialize};

mod controller;
mod gesture;
mod renderer;
mod timer;

pub use controller::{ControllerId, RotationController, RotationControllerBuilder};
pub use gesture::{resolve_swipe, GestureState};
pub use renderer::Renderer;

/// Direction of a single step through the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards the end, wrapping to the first item
    Next,
    /// Towards the start, wrapping to the last item
    Previous,
}

impl Direction {
    /// Step `index` once in this direction within a sequence of `len` items
    pub fn apply(self, index: usize, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        match self {
            Direction::Next => (index + 1) % len,
            Direction::Previous => (index + len - 1) % len,
        }
    }
}

/// States of the auto-rotation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutoRotationState {
    /// No timer: auto-rotation is off or there is nothing to rotate
    Stopped,
    /// Timer live
    Running,
    /// Auto-rotation enabled but suspended, e.g. while hovered
    Paused,
    /// Terminal
    Disposed,
}

/// Position change handed to the renderer
#[derive(Debug)]
pub struct PositionChange<'a, T> {
    /// Position before the change, `None` for the initial notification
    pub previous: Option<usize>,
    /// Position after the change, `None` when the sequence is empty
    pub current: Option<usize>,
    /// The sequence `current` indexes into
    pub sequence: &'a [T],
}

impl<'a, T> PositionChange<'a, T> {
    /// The item now shown
    pub fn current_item(&self) -> Option<&'a T> {
        self.current.and_then(|idx| self.sequence.get(idx))
    }

    /// Whether the index actually moved
    pub fn moved(&self) -> bool {
        self.previous != self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_wraps() {
        assert_eq!(Direction::Next.apply(2, 3), 0);
        assert_eq!(Direction::Previous.apply(0, 3), 2);
        assert_eq!(Direction::Next.apply(0, 1), 0);
        assert_eq!(Direction::Previous.apply(0, 0), 0);
    }

    #[test]
    fn test_position_change_item() {
        let items = ["a", "b"];
        let change = PositionChange { previous: Some(0), current: Some(1), sequence: &items };
        assert_eq!(change.current_item(), Some(&"b"));
        assert!(change.moved());

        let empty: [&str; 0] = [];
        let cleared = PositionChange { previous: None, current: None, sequence: &empty };
        assert_eq!(cleared.current_item(), None);
        assert!(!cleared.moved());
    }
}
