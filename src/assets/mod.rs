//! Asynchronous asset loading
//!
//! The [`AssetGateway`] dispatches texture and model loads to background
//! worker threads and delivers their results back to the main thread, where
//! [`AssetGateway::poll`] applies them between paint ticks. Failures degrade
//! gracefully: they surface as [`AssetEvent`]s for the log sink and the
//! scene simply proceeds without the asset.

pub mod gateway;

pub use gateway::AssetGateway;

use std::path::PathBuf;

use thiserror::Error;

use crate::gfx::resources::texture_store::TextureHandle;
use crate::gfx::scene::ObjectId;

/// Errors a background load can resolve to
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load material library {path}: {source}")]
    MaterialLibrary {
        path: PathBuf,
        source: tobj::LoadError,
    },

    #[error("failed to load geometry {path}: {source}")]
    Geometry {
        path: PathBuf,
        source: tobj::LoadError,
    },

    #[error("failed to decode texture {path}: {source}")]
    Texture {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("asset worker exited before completing")]
    WorkerLost,
}

/// Terminal outcome of a pending asset, drained once per paint tick
#[derive(Debug)]
pub enum AssetEvent {
    TextureLoaded {
        handle: TextureHandle,
        path: PathBuf,
    },
    TextureFailed {
        path: PathBuf,
        error: AssetError,
    },
    ModelAttached {
        object: ObjectId,
        path: PathBuf,
    },
    ModelFailed {
        path: PathBuf,
        error: AssetError,
    },
}

/// A fully parsed model, ready to be attached to a scene
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub name: String,
    pub meshes: Vec<MeshData>,
    pub materials: Vec<MaterialData>,
}

/// Flat mesh arrays as produced by the OBJ loader
#[derive(Debug, Clone)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub texcoords: Vec<f32>,
    pub indices: Vec<u32>,
    /// Index into [`LoadedModel::materials`]
    pub material_id: Option<usize>,
}

/// Material parameters extracted from an MTL library
#[derive(Debug, Clone)]
pub struct MaterialData {
    pub name: String,
    pub diffuse: [f32; 3],
    pub dissolve: f32,
    pub shininess: f32,
}
