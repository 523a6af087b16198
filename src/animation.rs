//! Per-run motion parameters for a falling square.

use std::fmt;

use crate::config::SquaresConfig;
use crate::random::RandomSource;
use crate::viewport::Viewport;

/// One keyframe of a square's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    /// Rotation axis; each component in `[0, 1)`.
    pub axis: [f64; 3],
    pub angle_deg: f64,
}

impl Transform {
    /// CSS `transform` value, e.g. `translate(4px, 0px) scale(0.5) rotate3d(0, 0, 0, 0deg)`.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.axis;
        write!(
            f,
            "translate({}px, {}px) scale({}) rotate3d({x}, {y}, {z}, {}deg)",
            self.translate_x, self.translate_y, self.scale, self.angle_deg
        )
    }
}

/// Immutable parameter set for one animation run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDescriptor {
    pub start: Transform,
    pub end: Transform,
    pub start_opacity: f64,
    pub end_opacity: f64,
    pub duration_ms: f64,
}

impl AnimationDescriptor {
    /// Samples a fresh fall across `viewport`.
    ///
    /// The square starts above the top edge at a random column, drops
    /// `height + overscan` pixels while spinning about a random axis, and fades
    /// from `opacity.max` to `opacity.min`. Scale is fixed for the whole run.
    /// Gravity is drawn per call, so fall speed differs between runs.
    pub fn build(viewport: Viewport, config: &SquaresConfig, rng: &mut impl RandomSource) -> Self {
        let axis = [rng.next_f64(), rng.next_f64(), rng.next_f64()];
        let angle_deg = rng.uniform(config.rotate.min, config.rotate.max);
        let scale = rng.uniform(config.scale.min, config.scale.max);
        let translate_x = (viewport.width - config.overscan).max(0.0) * rng.next_f64();
        let travel = viewport.height.max(0.0) + config.overscan;
        let gravity = rng.uniform(config.gravity.min, config.gravity.max);

        Self {
            start: Transform {
                translate_x,
                translate_y: 0.0,
                scale,
                axis: [0.0; 3],
                angle_deg: 0.0,
            },
            end: Transform {
                translate_x,
                translate_y: travel,
                scale,
                axis,
                angle_deg,
            },
            start_opacity: config.opacity.max,
            end_opacity: config.opacity.min,
            duration_ms: travel / gravity,
        }
    }
}
