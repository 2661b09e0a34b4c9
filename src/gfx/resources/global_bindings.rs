//! Global uniform bindings for camera and lighting data
//!
//! Manages the GPU uniform buffer and bind group for per-frame global state
//! shared across all objects: the camera matrices and the scene's folded
//! lighting rig. Bound to slot 0 in the render pipeline.

use cgmath::{InnerSpace, Vector3};

use crate::{
    gfx::camera::CameraUniform,
    gfx::scene::{Light, MAX_DIRECTIONAL_LIGHTS},
    wgpu_utils::{binding_types, UniformBuffer},
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `shader.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    // Camera data (matches CameraUniform)
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],

    // Lighting data, premultiplied by intensity
    ambient: [f32; 4],
    hemisphere_sky: [f32; 4],
    hemisphere_ground: [f32; 4],
    dir_directions: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    dir_colors: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    dir_count: u32,
    _padding: [u32; 3],
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

#[derive(Debug, Default, PartialEq)]
struct FoldedLights {
    ambient: [f32; 3],
    sky: [f32; 3],
    ground: [f32; 3],
    directions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

fn scaled(color: [f32; 3], intensity: f32) -> [f32; 3] {
    [
        color[0] * intensity,
        color[1] * intensity,
        color[2] * intensity,
    ]
}

fn accumulate(into: &mut [f32; 3], from: [f32; 3]) {
    into[0] += from[0];
    into[1] += from[1];
    into[2] += from[2];
}

// Folds the scene's light list into the fixed uniform slots. Ambient and
// hemisphere contributions sum; directional lights fill slots up to the cap.
fn fold_lights(lights: &[Light]) -> FoldedLights {
    let mut folded = FoldedLights::default();

    for light in lights {
        match *light {
            Light::Ambient { color, intensity } => {
                accumulate(&mut folded.ambient, scaled(color, intensity));
            }
            Light::Hemisphere {
                sky_color,
                ground_color,
                intensity,
            } => {
                accumulate(&mut folded.sky, scaled(sky_color, intensity));
                accumulate(&mut folded.ground, scaled(ground_color, intensity));
            }
            Light::Directional {
                color,
                intensity,
                position,
            } => {
                if folded.directions.len() >= MAX_DIRECTIONAL_LIGHTS {
                    continue;
                }
                // Direction of travel: from the light position toward the origin
                let direction = if position.magnitude2() > 0.0 {
                    -position.normalize()
                } else {
                    Vector3::new(0.0, -1.0, 0.0)
                };
                folded
                    .directions
                    .push([direction.x, direction.y, direction.z]);
                folded.colors.push(scaled(color, intensity));
            }
        }
    }

    folded
}

/// Updates the global uniform buffer with camera and lighting data
///
/// Should be called each frame before rendering so all objects see the
/// current view-projection matrix and light rig.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lights: &[Light],
) {
    let folded = fold_lights(lights);

    let mut content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,
        ambient: [folded.ambient[0], folded.ambient[1], folded.ambient[2], 0.0],
        hemisphere_sky: [folded.sky[0], folded.sky[1], folded.sky[2], 0.0],
        hemisphere_ground: [folded.ground[0], folded.ground[1], folded.ground[2], 0.0],
        dir_directions: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
        dir_colors: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
        dir_count: folded.directions.len() as u32,
        _padding: [0; 3],
    };

    for (i, direction) in folded.directions.iter().enumerate() {
        content.dir_directions[i] = [direction[0], direction[1], direction[2], 0.0];
        content.dir_colors[i] = [
            folded.colors[i][0],
            folded.colors[i][1],
            folded.colors[i][2],
            0.0,
        ];
    }

    ubo.update_content(queue, content);
}

/// Manages the bind group layout and bind group for global uniforms
pub struct GlobalBindings {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    /// Creates the layout for global uniforms; the bind group itself is
    /// created once the uniform buffer exists.
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Globals Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: binding_types::uniform(),
                    count: None,
                }],
            });

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    /// Creates the bind group with the provided uniform buffer
    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        }));
    }

    /// Returns the bind group layout for pipeline creation
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Returns the bind group for rendering
    ///
    /// # Panics
    /// Panics if `create_bind_group()` hasn't been called yet
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        self.bind_group
            .as_ref()
            .expect("Bind group has not been created yet!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_sums_ambient_and_hemisphere() {
        let lights = [
            Light::Ambient {
                color: [1.0, 1.0, 1.0],
                intensity: 0.3,
            },
            Light::Ambient {
                color: [1.0, 0.0, 0.0],
                intensity: 0.5,
            },
            Light::Hemisphere {
                sky_color: [0.0, 0.0, 1.0],
                ground_color: [0.0, 1.0, 0.0],
                intensity: 0.4,
            },
        ];

        let folded = fold_lights(&lights);
        assert!((folded.ambient[0] - 0.8).abs() < 1e-6);
        assert!((folded.ambient[1] - 0.3).abs() < 1e-6);
        assert!((folded.sky[2] - 0.4).abs() < 1e-6);
        assert!((folded.ground[1] - 0.4).abs() < 1e-6);
        assert!(folded.directions.is_empty());
    }

    #[test]
    fn test_fold_normalizes_directional_travel_direction() {
        let lights = [Light::Directional {
            color: [1.0, 1.0, 1.0],
            intensity: 2.0,
            position: Vector3::new(0.0, 4.0, 0.0),
        }];

        let folded = fold_lights(&lights);
        assert_eq!(folded.directions.len(), 1);
        let d = folded.directions[0];
        assert!((d[0]).abs() < 1e-6);
        assert!((d[1] + 1.0).abs() < 1e-6); // points straight down
        assert!((d[2]).abs() < 1e-6);
        assert_eq!(folded.colors[0], [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_fold_caps_directional_lights() {
        let light = Light::Directional {
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            position: Vector3::new(1.0, 2.0, 3.0),
        };
        let lights = vec![light; MAX_DIRECTIONAL_LIGHTS + 2];

        let folded = fold_lights(&lights);
        assert_eq!(folded.directions.len(), MAX_DIRECTIONAL_LIGHTS);
    }

    #[test]
    fn test_degenerate_directional_position_defaults_downward() {
        let lights = [Light::Directional {
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            position: Vector3::new(0.0, 0.0, 0.0),
        }];

        let folded = fold_lights(&lights);
        assert_eq!(folded.directions[0], [0.0, -1.0, 0.0]);
    }
}
