pub mod camera_controller;
pub mod viewport;

// Re-export main types
pub use camera_controller::CameraController;
pub use viewport::{CameraUniform, OrbitBounds, Viewport, OPENGL_TO_WGPU_MATRIX};
