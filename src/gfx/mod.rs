//! # Graphics Module
//!
//! Graphics-related functionality for the Whirl engine: the orbit viewport,
//! procedural geometry, scene management, material/texture resources, and the
//! wgpu render backend.
//!
//! The scene, camera, and geometry types are plain CPU-side data; GPU
//! resources are created lazily by the render backend, so everything outside
//! [`rendering`] can be constructed and tested without a graphics device.

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::Viewport;
pub use rendering::render_engine::RenderEngine;
