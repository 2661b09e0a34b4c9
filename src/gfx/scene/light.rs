//! Light sources for the scene.
//!
//! Lights are immutable once added; the render backend folds all of them
//! into a single per-frame uniform, so lights of different kinds compose
//! additively.

use cgmath::Vector3;

/// Maximum number of directional lights the render backend folds into its
/// lighting uniform. Extra directional lights are ignored (and logged at
/// insertion time by the scene).
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// A light source placed in the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Parallel light shining from `position` toward the origin
    Directional {
        color: [f32; 3],
        intensity: f32,
        position: Vector3<f32>,
    },
    /// Uniform light applied to every surface regardless of orientation
    Ambient { color: [f32; 3], intensity: f32 },
    /// Gradient light blending from `ground_color` below to `sky_color` above
    Hemisphere {
        sky_color: [f32; 3],
        ground_color: [f32; 3],
        intensity: f32,
    },
}

impl Light {
    /// Returns true for the directional variant
    pub fn is_directional(&self) -> bool {
        matches!(self, Light::Directional { .. })
    }
}
