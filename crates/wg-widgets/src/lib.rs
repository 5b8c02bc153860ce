//! Widget compositions built around the rotation engine
//!
//! Carousels wrap a [`RotationController`](wg_core::RotationController) and a
//! [`SlideDeck`] renderer; the remaining modules cover the non-rotating widget
//! behaviour of the gallery (countdowns, count-up counters, read-more
//! excerpts, reveal-on-scroll).

pub mod carousel;
pub mod config;
pub mod countdown;
pub mod counter;
pub mod excerpt;
pub mod reveal;
pub mod slide;

use thiserror::Error;
use wg_core::RotationError;

// Re-exports
pub use carousel::Carousel;
pub use config::GalleryConfig;
pub use countdown::{Countdown, CountdownStatus, TimeRemaining};
pub use counter::{CounterAnimation, CounterFrame};
pub use excerpt::Excerpt;
pub use reveal::RevealTracker;
pub use slide::SlideDeck;

/// Errors that can occur in widget operations
#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rotation error: {0}")]
    Rotation(#[from] RotationError),

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, WidgetError>;
