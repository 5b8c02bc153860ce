//! Rotation configuration
//!
//! Options can come from a JSON document (snake_case or the camelCase keys the
//! widget templates emit) or straight from a widget's `data-*` attributes.

use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::error::{Result, RotationError};

pub const DEFAULT_ROTATION_INTERVAL_MS: i64 = 5000;
pub const DEFAULT_SWIPE_THRESHOLD_PX: i64 = 50;
/// Longest interval a timer is scheduled with; larger values are clamped
pub const MAX_ROTATION_INTERVAL_MS: i64 = i32::MAX as i64;

/// Attribute toggling auto-rotation (`"true"` enables it)
pub const ATTR_AUTO_ROTATE: &str = "data-auto-rotate";
/// Attribute holding the rotation interval in milliseconds
pub const ATTR_ROTATION_INTERVAL: &str = "data-rotation-interval";
/// Attribute holding the swipe threshold in pixels
pub const ATTR_SWIPE_THRESHOLD: &str = "data-swipe-threshold";

/// Options recognised by a rotation controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Whether the controller advances on its own
    #[serde(alias = "autoRotate")]
    pub auto_rotate: bool,

    /// Delay between automatic advances
    #[serde(alias = "rotationIntervalMs")]
    pub rotation_interval_ms: i64,

    /// Horizontal distance a touch must travel to count as a swipe
    #[serde(alias = "swipeThresholdPx")]
    pub swipe_threshold_px: i64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            auto_rotate: false,
            rotation_interval_ms: DEFAULT_ROTATION_INTERVAL_MS,
            swipe_threshold_px: DEFAULT_SWIPE_THRESHOLD_PX,
        }
    }
}

impl RotationConfig {
    /// Auto-rotating configuration with the given interval
    pub fn auto_rotating(rotation_interval_ms: i64) -> Self {
        Self {
            auto_rotate: true,
            rotation_interval_ms,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RotationError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from a widget's `data-*` attributes.
    ///
    /// Unknown attributes are ignored. An interval that is missing, zero or
    /// does not start with a number falls back to the default.
    pub fn from_attributes<'a, I>(attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();

        for (name, value) in attributes {
            match name {
                ATTR_AUTO_ROTATE => config.auto_rotate = value == "true",
                ATTR_ROTATION_INTERVAL => {
                    config.rotation_interval_ms = parse_int_prefix(value)
                        .filter(|ms| *ms != 0)
                        .unwrap_or(DEFAULT_ROTATION_INTERVAL_MS);
                }
                ATTR_SWIPE_THRESHOLD => {
                    config.swipe_threshold_px = parse_int_prefix(value)
                        .unwrap_or(DEFAULT_SWIPE_THRESHOLD_PX);
                }
                _ => {}
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the option ranges
    pub fn validate(&self) -> Result<()> {
        if self.rotation_interval_ms <= 0 {
            return Err(RotationError::InvalidConfiguration(format!(
                "rotation_interval_ms must be positive, got {}",
                self.rotation_interval_ms
            )));
        }
        if self.swipe_threshold_px < 0 {
            return Err(RotationError::InvalidConfiguration(format!(
                "swipe_threshold_px must not be negative, got {}",
                self.swipe_threshold_px
            )));
        }
        Ok(())
    }

    pub fn rotation_interval(&self) -> Duration {
        Duration::from_millis(self.rotation_interval_ms.clamp(1, MAX_ROTATION_INTERVAL_MS) as u64)
    }

    pub fn swipe_threshold(&self) -> f64 {
        self.swipe_threshold_px as f64
    }
}

/// Parse the leading integer of a string, ignoring anything after it.
///
/// `" 1500ms"` gives `Some(1500)`, `"-3"` gives `Some(-3)`, `"abc"` gives `None`.
/// Digit runs too long for an `i64` saturate to `i64::MAX` (or `i64::MIN`).
pub fn parse_int_prefix(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let saturated = if sign < 0 { i64::MIN } else { i64::MAX };
    Some(
        format!("{}{}", if sign < 0 { "-" } else { "" }, &digits[..end])
            .parse::<i64>()
            .unwrap_or(saturated),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RotationConfig::default();
        assert!(!config.auto_rotate);
        assert_eq!(config.rotation_interval(), Duration::from_millis(5000));
        assert_eq!(config.swipe_threshold(), 50.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let zero_interval = RotationConfig { rotation_interval_ms: 0, ..Default::default() };
        assert!(matches!(zero_interval.validate(), Err(RotationError::InvalidConfiguration(_))));

        let negative_threshold = RotationConfig { swipe_threshold_px: -1, ..Default::default() };
        assert!(matches!(negative_threshold.validate(), Err(RotationError::InvalidConfiguration(_))));

        let zero_threshold = RotationConfig { swipe_threshold_px: 0, ..Default::default() };
        assert!(zero_threshold.validate().is_ok());
    }

    #[test]
    fn test_json_accepts_camel_case() {
        let config = RotationConfig::from_json(
            r#"{ "autoRotate": true, "rotationIntervalMs": 1000 }"#,
        ).unwrap();
        assert!(config.auto_rotate);
        assert_eq!(config.rotation_interval_ms, 1000);
        assert_eq!(config.swipe_threshold_px, DEFAULT_SWIPE_THRESHOLD_PX);

        let snake = RotationConfig::from_json(r#"{ "swipe_threshold_px": 20 }"#).unwrap();
        assert_eq!(snake.swipe_threshold_px, 20);
    }

    #[test]
    fn test_json_validation_errors() {
        assert!(matches!(
            RotationConfig::from_json(r#"{ "rotationIntervalMs": -5 }"#),
            Err(RotationError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            RotationConfig::from_json("not json"),
            Err(RotationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_from_attributes() {
        let config = RotationConfig::from_attributes([
            ("data-plugin-id", "7"),
            (ATTR_AUTO_ROTATE, "true"),
            (ATTR_ROTATION_INTERVAL, "3000"),
        ]).unwrap();
        assert!(config.auto_rotate);
        assert_eq!(config.rotation_interval_ms, 3000);

        let fallback = RotationConfig::from_attributes([
            (ATTR_AUTO_ROTATE, "yes"),
            (ATTR_ROTATION_INTERVAL, "soon"),
        ]).unwrap();
        assert!(!fallback.auto_rotate);
        assert_eq!(fallback.rotation_interval_ms, DEFAULT_ROTATION_INTERVAL_MS);

        let zero = RotationConfig::from_attributes([(ATTR_ROTATION_INTERVAL, "0")]).unwrap();
        assert_eq!(zero.rotation_interval_ms, DEFAULT_ROTATION_INTERVAL_MS);

        assert!(RotationConfig::from_attributes([(ATTR_ROTATION_INTERVAL, "-10")]).is_err());
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("1500"), Some(1500));
        assert_eq!(parse_int_prefix("  250px"), Some(250));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("+8"), Some(8));
        assert_eq!(parse_int_prefix("px"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_int_prefix("-99999999999999999999"), Some(i64::MIN));
        assert_eq!(parse_int_prefix("-9223372036854775808"), Some(i64::MIN));
    }

    #[test]
    fn test_overlong_interval_is_clamped_not_defaulted() {
        let config = RotationConfig::from_attributes([(ATTR_ROTATION_INTERVAL, "99999999999999999999")]).unwrap();
        assert_eq!(config.rotation_interval_ms, i64::MAX);
        assert_eq!(
            config.rotation_interval(),
            Duration::from_millis(MAX_ROTATION_INTERVAL_MS as u64)
        );
    }
}
