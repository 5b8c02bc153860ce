//! Renderer trait

use super::PositionChange;
use crate::error::RenderError;

/// Trait for components that present the current position
///
/// Called synchronously after every position mutation, including the initial
/// one at construction. Implementations own all visual effects and must not
/// call back into the controller; nested calls fail with
/// [`RotationError::Reentrant`](crate::RotationError::Reentrant).
pub trait Renderer<T>: Send + Sync {
    fn on_position_changed(&self, change: &PositionChange<'_, T>) -> Result<(), RenderError>;
}
