// src/lib.rs
//! Whirl 3D Scene Demo Engine
//!
//! A small interactive 3D scene engine built on wgpu and winit: declarative
//! scene setup, asynchronous asset loading, and an orbit camera driving a
//! per-frame animation loop.

pub mod animation;
pub mod app;
pub mod assets;
pub mod gfx;
pub mod prelude;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::WhirlApp;

/// Creates a default Whirl application instance
pub fn default() -> WhirlApp {
    WhirlApp::new()
}
