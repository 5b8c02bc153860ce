//! Slide visibility renderer
//!
//! Shows the current slide, hides the rest, and flags the newly shown slide
//! as animating for a short while after each change.

use std::time::Duration;
use parking_lot::RwLock;
use tokio::time::Instant;
use tracing::debug;
use wg_core::{PositionChange, RenderError, Renderer};

/// How long a newly shown slide keeps its animation flag
pub const SLIDE_ANIMATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Default)]
struct SlideState {
    len: usize,
    visible: Option<usize>,
    animate_until: Option<Instant>,
    transitions: u64,
}

/// Renderer tracking which slide of a carousel is displayed
#[derive(Debug)]
pub struct SlideDeck {
    state: RwLock<SlideState>,
    animation: Duration,
}

impl Default for SlideDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl SlideDeck {
    pub fn new() -> Self {
        Self::with_animation(SLIDE_ANIMATION)
    }

    pub fn with_animation(animation: Duration) -> Self {
        Self {
            state: RwLock::new(SlideState::default()),
            animation,
        }
    }

    /// Index of the displayed slide, `None` when the display is cleared
    pub fn visible(&self) -> Option<usize> {
        self.state.read().visible
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.visible() == Some(index)
    }

    /// Display flag for every slide
    pub fn visibility(&self) -> Vec<bool> {
        let state = self.state.read();
        (0..state.len).map(|idx| state.visible == Some(idx)).collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the shown slide is still within its animation window
    pub fn is_animating(&self) -> bool {
        self.state
            .read()
            .animate_until
            .map(|until| Instant::now() < until)
            .unwrap_or(false)
    }

    /// Number of changes rendered so far
    pub fn transitions(&self) -> u64 {
        self.state.read().transitions
    }
}

impl<T> Renderer<T> for SlideDeck {
    fn on_position_changed(&self, change: &PositionChange<'_, T>) -> Result<(), RenderError> {
        let len = change.sequence.len();
        if let Some(idx) = change.current {
            if idx >= len {
                return Err(RenderError::new(format!("slide {idx} missing from {len} slides")));
            }
        }

        let mut state = self.state.write();
        state.len = len;
        state.visible = change.current;
        state.animate_until = change.current.map(|_| Instant::now() + self.animation);
        state.transitions += 1;

        debug!(previous = ?change.previous, current = ?change.current, len, "slide shown");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(deck: &SlideDeck, previous: Option<usize>, current: Option<usize>, items: &[u8]) -> Result<(), RenderError> {
        deck.on_position_changed(&PositionChange { previous, current, sequence: items })
    }

    #[test]
    fn test_shows_only_current_slide() {
        let deck = SlideDeck::new();
        render(&deck, None, Some(0), &[1, 2, 3]).unwrap();
        render(&deck, Some(0), Some(2), &[1, 2, 3]).unwrap();

        assert_eq!(deck.visibility(), vec![false, false, true]);
        assert!(deck.is_visible(2));
        assert_eq!(deck.transitions(), 2);
    }

    #[test]
    fn test_empty_sequence_clears_display() {
        let deck = SlideDeck::new();
        render(&deck, None, Some(1), &[1, 2]).unwrap();
        render(&deck, Some(1), None, &[]).unwrap();

        assert_eq!(deck.visible(), None);
        assert!(deck.is_empty());
        assert!(!deck.is_animating());
    }

    #[test]
    fn test_rejects_missing_slide() {
        let deck = SlideDeck::new();
        assert!(render(&deck, None, Some(3), &[1, 2]).is_err());
        assert_eq!(deck.transitions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_animation_flag_expires() {
        let deck = SlideDeck::new();
        render(&deck, None, Some(0), &[1, 2]).unwrap();
        assert!(deck.is_animating());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(deck.is_animating());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!deck.is_animating());
    }
}
