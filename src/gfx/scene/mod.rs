//! # Scene Management Module
//!
//! The declarative scene description: objects, lights, materials, and the
//! vertex format. The scene is plain data consumed by the render backend
//! once per frame; construction is append-only.

pub mod light;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use light::{Light, MAX_DIRECTIONAL_LIGHTS};
pub use object::{DrawObject, GeometryKind, Mesh, ObjectId, SceneObject};
pub use scene::{PrimitiveShape, Scene};
pub use vertex::Vertex3D;
