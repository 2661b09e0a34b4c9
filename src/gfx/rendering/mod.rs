//! The wgpu render backend.
//!
//! Everything above this module treats rendering as a black box with a
//! `render_frame(scene)`-shaped surface; this module owns the device, the
//! forward pipeline, and the per-frame uniform uploads.

pub mod render_engine;

pub use render_engine::RenderEngine;
