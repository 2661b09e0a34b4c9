//! The orbit viewport: camera state plus clamped orbit control.

use cgmath::*;

/// Corrects OpenGL-style clip space (z in [-1, 1]) to wgpu's [0, 1]
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

// Keeps the pitch strictly inside (-PI/2, PI/2) so the camera never crosses
// the poles and flips its up vector.
const POLE_MARGIN: f32 = 1e-3;

/// Camera uniform data as the shader expects it
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment
    /// requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }
}

/// Clamp bands for the orbit parameters
#[derive(Debug, Clone, Copy)]
pub struct OrbitBounds {
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitBounds {
    fn default() -> Self {
        Self {
            min_distance: 0.1,
            max_distance: 100.0,
            min_pitch: -std::f32::consts::FRAC_PI_2 + POLE_MARGIN,
            max_pitch: std::f32::consts::FRAC_PI_2 - POLE_MARGIN,
        }
    }
}

/// Owns the camera parameters and responds to orbit input, independent of
/// the render backend.
///
/// The eye position orbits a target point at `distance`, parameterized by
/// yaw (azimuth) and pitch (polar). All inputs are clamped rather than
/// rejected; the projection invariants (`znear < zfar`, fov inside
/// (0°, 180°)) are asserted at configuration time instead, since violating
/// them is a caller error.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    distance: f32,
    yaw: f32,
    pitch: f32,
    target: Vector3<f32>,
    up: Vector3<f32>,
    pub bounds: OrbitBounds,
    fovy: Rad<f32>,
    aspect: f32,
    znear: f32,
    zfar: f32,
    pub uniform: CameraUniform,
}

impl Viewport {
    /// Creates a viewport orbiting `target` with a default projection
    /// (45° vertical fov, 0.1..1000 clip range)
    pub fn new(distance: f32, yaw: f32, pitch: f32, target: Vector3<f32>) -> Self {
        let bounds = OrbitBounds::default();
        Self {
            distance: distance.clamp(bounds.min_distance, bounds.max_distance),
            yaw,
            pitch: pitch.clamp(bounds.min_pitch, bounds.max_pitch),
            target,
            up: Vector3::unit_y(),
            bounds,
            fovy: Rad(std::f32::consts::PI / 4.0),
            aspect: 1.0,
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        }
    }

    /// Reconfigures the projection frustum
    ///
    /// # Panics
    /// Panics on a degenerate frustum: fov outside (0°, 180°), non-positive
    /// near plane, or `znear >= zfar`.
    pub fn set_projection(&mut self, fovy: Deg<f32>, znear: f32, zfar: f32) {
        assert!(
            fovy.0 > 0.0 && fovy.0 < 180.0,
            "field of view must be inside (0, 180) degrees"
        );
        assert!(znear > 0.0, "near plane must be positive");
        assert!(znear < zfar, "near plane must be closer than far plane");

        self.fovy = fovy.into();
        self.znear = znear;
        self.zfar = zfar;
    }

    /// Applies one orbit step: azimuth and polar deltas in radians, zoom
    /// delta in world units. Pitch and distance are clamped to the
    /// configured bounds.
    pub fn apply_orbit_delta(&mut self, d_yaw: f32, d_pitch: f32, d_zoom: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.distance =
            (self.distance + d_zoom).clamp(self.bounds.min_distance, self.bounds.max_distance);
    }

    /// Recomputes the aspect ratio from a surface size; a zero dimension is
    /// ignored (minimized window)
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Re-centers the orbit pivot
    pub fn set_target(&mut self, target: Vector3<f32>) {
        self.target = target;
    }

    /// Current eye position, derived from the orbit parameters
    pub fn eye(&self) -> Vector3<f32> {
        Vector3::new(
            self.distance * self.yaw.sin() * self.pitch.cos(),
            self.distance * self.pitch.sin(),
            self.distance * self.yaw.cos() * self.pitch.cos(),
        ) + self.target
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn target(&self) -> Vector3<f32> {
        self.target
    }

    /// Builds the combined view-projection matrix
    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye());
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    /// Refreshes the GPU-facing uniform from the current state
    pub fn update_view_proj(&mut self) {
        let eye = self.eye();
        self.uniform.view_position = [eye.x, eye.y, eye.z, 1.0];
        self.uniform.view_proj = self.build_view_projection_matrix().into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_eye_sits_on_z_axis() {
        let viewport = Viewport::new(2.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0));
        let eye = viewport.eye();
        assert!((eye.x).abs() < 1e-6);
        assert!((eye.y).abs() < 1e-6);
        assert!((eye.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_orbit_delta_moves_eye() {
        let mut viewport = Viewport::new(2.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0));
        viewport.apply_orbit_delta(std::f32::consts::FRAC_PI_2, 0.0, 0.0);
        let eye = viewport.eye();
        assert!((eye.x - 2.0).abs() < 1e-5);
        assert!((eye.z).abs() < 1e-5);
    }

    #[test]
    fn test_pitch_never_crosses_poles() {
        let mut viewport = Viewport::new(5.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0));

        // Adversarial sequence: huge positive and negative polar deltas
        let deltas = [100.0, -250.0, 7.3, -0.001, 42.0, -4200.0, 1e6, -1e6];
        for (i, d) in deltas.iter().cycle().take(1000).enumerate() {
            viewport.apply_orbit_delta(0.1 * i as f32, *d, 0.0);
            assert!(viewport.pitch() >= viewport.bounds.min_pitch);
            assert!(viewport.pitch() <= viewport.bounds.max_pitch);
            assert!(viewport.pitch().abs() < std::f32::consts::FRAC_PI_2);
        }
    }

    #[test]
    fn test_zoom_stays_in_band() {
        let mut viewport = Viewport::new(5.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0));

        viewport.apply_orbit_delta(0.0, 0.0, 1e9);
        assert_eq!(viewport.distance(), viewport.bounds.max_distance);

        viewport.apply_orbit_delta(0.0, 0.0, -1e9);
        assert_eq!(viewport.distance(), viewport.bounds.min_distance);
    }

    #[test]
    fn test_resize_updates_aspect_and_ignores_zero() {
        let mut viewport = Viewport::new(2.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0));
        viewport.resize(1200, 800);
        assert!((viewport.aspect() - 1.5).abs() < 1e-6);

        viewport.resize(1200, 0);
        assert!((viewport.aspect() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_set_target_translates_eye() {
        let mut viewport = Viewport::new(2.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0));
        viewport.set_target(Vector3::new(0.0, 12.0, 0.0));
        let eye = viewport.eye();
        assert!((eye.y - 12.0).abs() < 1e-6);
        assert!((eye.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_reflects_state() {
        let mut viewport = Viewport::new(2.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0));
        viewport.resize(800, 600);
        viewport.update_view_proj();
        assert_eq!(viewport.uniform.view_position, [0.0, 0.0, 2.0, 1.0]);
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        assert_ne!(viewport.uniform.view_proj, identity);
    }

    #[test]
    #[should_panic(expected = "near plane must be closer than far plane")]
    fn test_rejects_inverted_clip_planes() {
        let mut viewport = Viewport::new(2.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0));
        viewport.set_projection(Deg(60.0), 10.0, 0.1);
    }

    #[test]
    #[should_panic(expected = "field of view must be inside (0, 180) degrees")]
    fn test_rejects_degenerate_fov() {
        let mut viewport = Viewport::new(2.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0));
        viewport.set_projection(Deg(180.0), 0.1, 10.0);
    }
}
