//! Error types for the rotation engine

use thiserror::Error;

/// Failure reported by a [`Renderer`](crate::rotation::Renderer) while applying a position change
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RenderError(pub String);

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that can occur while driving a rotation controller
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RotationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Controller has been disposed")]
    ControllerDisposed,

    #[error("Controller called re-entrantly from a change notification")]
    Reentrant,

    #[error("Renderer error: {0}")]
    Render(#[from] RenderError),
}

pub type Result<T> = std::result::Result<T, RotationError>;
