//! # Whirl Prelude
//!
//! Brings the types a typical scene demo needs into scope:
//!
//! ```rust
//! use whirl::prelude::*;
//! ```

// Re-export core application types
pub use crate::app::WhirlApp;
pub use crate::default;

// Re-export scene and graphics types
pub use crate::gfx::camera::{CameraController, OrbitBounds, Viewport};
pub use crate::gfx::geometry::{generate_box, generate_cone, generate_torus, GeometryData};
pub use crate::gfx::resources::{rgb_from_hex, Material, MaterialManager, Shading, TextureHandle};
pub use crate::gfx::scene::{
    GeometryKind, Light, ObjectId, PrimitiveShape, Scene, SceneObject,
};

// Re-export the animation and asset layers
pub use crate::animation::{AnimationDriver, AnimationEntry};
pub use crate::assets::{AssetError, AssetEvent, AssetGateway, LoadedModel};

// Re-export common external dependencies
pub use cgmath::{Deg, InnerSpace, Rad, Vector3, Zero};
