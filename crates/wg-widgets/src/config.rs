//! Gallery configuration file

use std::path::Path;
use std::time::Duration;
use serde::{Serialize, Deserialize};
use wg_core::RotationConfig;

use crate::{Result, WidgetError};

/// Settings for every widget kind on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GalleryConfig {
    /// Carousel rotation options
    pub carousel: RotationConfig,

    /// Count-up animation timing
    pub counter: CounterConfig,

    /// Read-more truncation
    pub excerpt: ExcerptConfig,

    /// Reveal-on-scroll threshold
    pub reveal: RevealConfig,
}

/// Count-up animation timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Total animation length
    pub duration_ms: u64,

    /// Time between frames (16ms is roughly 60fps)
    pub frame_ms: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            frame_ms: 16,
        }
    }
}

impl CounterConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

/// Read-more truncation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcerptConfig {
    /// Characters kept when collapsed
    pub max_chars: usize,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            max_chars: crate::excerpt::DEFAULT_EXCERPT_CHARS,
        }
    }
}

/// Reveal-on-scroll threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Visible fraction that triggers the reveal
    pub threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: crate::reveal::DEFAULT_REVEAL_THRESHOLD,
        }
    }
}

impl GalleryConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.carousel.validate()?;

        if self.counter.frame_ms == 0 {
            return Err(WidgetError::InvalidConfiguration(
                "counter.frame_ms must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(WidgetError::InvalidConfiguration(format!(
                "reveal.threshold must be within 0..=1, got {}",
                self.reveal.threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = GalleryConfig::from_json("{}").unwrap();
        assert_eq!(config, GalleryConfig::default());
        assert_eq!(config.counter.frame(), Duration::from_millis(16));
        assert_eq!(config.excerpt.max_chars, 200);
        assert_eq!(config.reveal.threshold, 0.1);
    }

    #[test]
    fn test_partial_document() {
        let config = GalleryConfig::from_json(
            r#"{ "carousel": { "autoRotate": true, "rotationIntervalMs": 4000 }, "counter": { "duration_ms": 500 } }"#,
        ).unwrap();
        assert!(config.carousel.auto_rotate);
        assert_eq!(config.carousel.rotation_interval_ms, 4000);
        assert_eq!(config.counter.duration_ms, 500);
        assert_eq!(config.counter.frame_ms, 16);
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            GalleryConfig::from_json(r#"{ "carousel": { "rotation_interval_ms": 0 } }"#),
            Err(WidgetError::Rotation(_))
        ));
        assert!(matches!(
            GalleryConfig::from_json(r#"{ "counter": { "frame_ms": 0 } }"#),
            Err(WidgetError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            GalleryConfig::from_json(r#"{ "reveal": { "threshold": 1.5 } }"#),
            Err(WidgetError::InvalidConfiguration(_))
        ));
        assert!(matches!(GalleryConfig::from_json("[1, 2]"), Err(WidgetError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            GalleryConfig::load("/nonexistent/gallery.json"),
            Err(WidgetError::Io(_))
        ));
    }
}
