//! GPU resource management: materials, texture slots, and global uniforms.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;
pub mod texture_store;

// Re-export main types
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO};
pub use material::{material_bind_group_layout, rgb_from_hex, Material, MaterialManager, Shading};
pub use texture_resource::TextureResource;
pub use texture_store::{TextureHandle, TexturePixels, TextureState, TextureStore};
