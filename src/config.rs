//! Tunable ranges for the falling-squares effect.
//!
//! Pages may pass a partial JSON object; missing keys keep their defaults.
//!
//! ```json
//! { "pxPerUnit": 16, "gravity": { "min": 0.05, "max": 0.1 } }
//! ```

use serde::Deserialize;

use crate::error::ConfigError;

/// Inclusive `min..=max` bound sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SquaresConfig {
    /// Viewport pixels per active unit; target size is `floor(width / px_per_unit)`.
    pub px_per_unit: f64,
    /// Extra travel past the viewport edges so units leave the screen fully.
    pub overscan: f64,
    pub scale: Range,
    /// Rotation magnitude in degrees.
    pub rotate: Range,
    /// Fall speed in px/ms, sampled per animation.
    pub gravity: Range,
    /// `max` is the starting opacity, `min` the final one.
    pub opacity: Range,
    pub color_classes: Vec<String>,
    /// Quiet period before a burst of resize events is acted upon.
    pub debounce_ms: u32,
}

impl Default for SquaresConfig {
    fn default() -> Self {
        Self {
            px_per_unit: 12.0,
            overscan: 30.0,
            scale: Range::new(0.5, 1.0),
            rotate: Range::new(500.0, 1000.0),
            gravity: Range::new(0.040, 0.125),
            opacity: Range::new(0.1, 0.5),
            color_classes: ["red", "blue", "green", "yellow"].map(String::from).to_vec(),
            debounce_ms: 250,
        }
    }
}

impl SquaresConfig {
    /// Parses a (possibly partial) JSON override and validates the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("pxPerUnit", self.px_per_unit)?;
        positive("gravity.min", self.gravity.min)?;
        if self.overscan < 0.0 {
            return Err(ConfigError::Negative {
                name: "overscan",
                value: self.overscan,
            });
        }
        self.scale.validate("scale")?;
        self.rotate.validate("rotate")?;
        self.gravity.validate("gravity")?;
        self.opacity.validate("opacity")?;
        for value in [self.opacity.min, self.opacity.max] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange {
                    name: "opacity",
                    value,
                });
            }
        }
        if self.color_classes.is_empty() {
            return Err(ConfigError::NoColorClasses);
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}
