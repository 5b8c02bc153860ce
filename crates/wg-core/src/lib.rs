//! Core functionality for the widget gallery
//!
//! This crate provides the rotation engine shared by every rotating widget:
//! position tracking over an item sequence, swipe resolution, auto-rotation
//! with pause/resume, and the collaborator traits around it.

pub mod config;
pub mod error;
pub mod events;
pub mod rotation;

// Re-export commonly used types
pub use config::RotationConfig;
pub use error::{RenderError, Result, RotationError};
pub use events::EventBus;
pub use rotation::{
    AutoRotationState, ControllerId, Direction, PositionChange,
    Renderer, RotationController, RotationControllerBuilder,
};
