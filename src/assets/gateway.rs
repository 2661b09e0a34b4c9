//! The asset gateway: dispatch, completion delivery, and attachment.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::thread;

use futures::channel::oneshot;

use crate::gfx::resources::texture_store::{TextureHandle, TexturePixels};
use crate::gfx::scene::{ObjectId, Scene};

use super::{AssetError, AssetEvent, LoadedModel, MaterialData, MeshData};

type AttachFn = Box<dyn FnOnce(&mut Scene, LoadedModel) -> ObjectId>;

struct PendingTexture {
    handle: TextureHandle,
    path: PathBuf,
    rx: oneshot::Receiver<Result<TexturePixels, AssetError>>,
}

struct PendingModel {
    obj_path: PathBuf,
    rx: oneshot::Receiver<Result<LoadedModel, AssetError>>,
    on_attached: Option<AttachFn>,
}

/// Dispatches asset loads and resolves their completions
///
/// Loads run on spawned worker threads that only read and parse files; every
/// scene mutation happens inside [`AssetGateway::poll`] on the thread that
/// owns the scene. Each pending asset makes at most one terminal transition.
/// There is no cancellation: a load once started runs to completion or
/// failure.
#[derive(Default)]
pub struct AssetGateway {
    pending_textures: Vec<PendingTexture>,
    pending_models: Vec<PendingModel>,
}

impl AssetGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a texture and returns its handle immediately
    ///
    /// The handle can be wired into a material right away; it renders as the
    /// material's base color until the pixels arrive.
    pub fn load_texture(&mut self, path: impl Into<PathBuf>, scene: &mut Scene) -> TextureHandle {
        let path = path.into();
        let handle = scene.textures.allocate(path.clone());

        let (tx, rx) = oneshot::channel();
        let worker_path = path.clone();
        thread::spawn(move || {
            let _ = tx.send(decode_texture(&worker_path));
        });

        log::debug!("requested texture {}", path.display());
        self.pending_textures.push(PendingTexture { handle, path, rx });
        handle
    }

    /// Requests a two-stage model load: the material library first, then the
    /// geometry parsed against it
    ///
    /// `on_attached` runs exactly once, on the polling thread, after both
    /// stages succeed; it inserts the model into the scene and returns the
    /// new object's handle. On failure it is never invoked.
    pub fn load_model<F>(
        &mut self,
        mtl_path: impl Into<PathBuf>,
        obj_path: impl Into<PathBuf>,
        on_attached: F,
    ) where
        F: FnOnce(&mut Scene, LoadedModel) -> ObjectId + 'static,
    {
        let mtl_path = mtl_path.into();
        let obj_path = obj_path.into();

        let (tx, rx) = oneshot::channel();
        let worker_mtl = mtl_path.clone();
        let worker_obj = obj_path.clone();
        thread::spawn(move || {
            let _ = tx.send(fetch_model(&worker_mtl, &worker_obj));
        });

        log::debug!(
            "requested model {} (materials from {})",
            obj_path.display(),
            mtl_path.display()
        );
        self.pending_models.push(PendingModel {
            obj_path,
            rx,
            on_attached: Some(Box::new(on_attached)),
        });
    }

    /// Number of loads still in flight
    pub fn pending_count(&self) -> usize {
        self.pending_textures.len() + self.pending_models.len()
    }

    /// Drains finished loads without blocking; called once per paint tick
    ///
    /// Completed textures land in the scene's texture store, completed
    /// models are attached through their callback, and failures become
    /// events for the caller's log sink.
    pub fn poll(&mut self, scene: &mut Scene) -> Vec<AssetEvent> {
        let mut events = Vec::new();

        self.pending_textures.retain_mut(|pending| {
            let outcome = match pending.rx.try_recv() {
                Ok(None) => return true, // still loading
                Ok(Some(outcome)) => outcome,
                Err(oneshot::Canceled) => Err(AssetError::WorkerLost),
            };

            match outcome {
                Ok(pixels) => {
                    scene.textures.complete(pending.handle, pixels);
                    events.push(AssetEvent::TextureLoaded {
                        handle: pending.handle,
                        path: pending.path.clone(),
                    });
                }
                Err(error) => {
                    scene.textures.fail(pending.handle);
                    events.push(AssetEvent::TextureFailed {
                        path: pending.path.clone(),
                        error,
                    });
                }
            }
            false
        });

        self.pending_models.retain_mut(|pending| {
            let outcome = match pending.rx.try_recv() {
                Ok(None) => return true,
                Ok(Some(outcome)) => outcome,
                Err(oneshot::Canceled) => Err(AssetError::WorkerLost),
            };

            match outcome {
                Ok(model) => {
                    let attach = pending
                        .on_attached
                        .take()
                        .expect("attach callback consumed twice");
                    let object = attach(scene, model);
                    events.push(AssetEvent::ModelAttached {
                        object,
                        path: pending.obj_path.clone(),
                    });
                }
                Err(error) => {
                    events.push(AssetEvent::ModelFailed {
                        path: pending.obj_path.clone(),
                        error,
                    });
                }
            }
            false
        });

        events
    }
}

fn decode_texture(path: &Path) -> Result<TexturePixels, AssetError> {
    let image = image::open(path).map_err(|source| AssetError::Texture {
        path: path.to_path_buf(),
        source,
    })?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(TexturePixels {
        width,
        height,
        data: rgba.into_raw(),
    })
}

// The two-stage load. Sequential composition makes the ordering structural:
// the geometry stage consumes the material stage's result by value, so
// geometry is never requested before the material library has resolved.
fn fetch_model(mtl_path: &Path, obj_path: &Path) -> Result<LoadedModel, AssetError> {
    let (materials, name_index) =
        tobj::load_mtl(mtl_path).map_err(|source| AssetError::MaterialLibrary {
            path: mtl_path.to_path_buf(),
            source,
        })?;

    let file = File::open(obj_path).map_err(|source| AssetError::Io {
        path: obj_path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    // The preloaded library resolves every material reference, whatever
    // mtllib the file itself names
    let (models, _) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Ok((materials.clone(), name_index.clone())),
    )
    .map_err(|source| AssetError::Geometry {
        path: obj_path.to_path_buf(),
        source,
    })?;

    let materials = materials
        .iter()
        .enumerate()
        .map(|(i, m)| MaterialData {
            name: if m.name.is_empty() {
                format!("material_{}", i)
            } else {
                m.name.clone()
            },
            diffuse: m.diffuse.unwrap_or([0.8, 0.8, 0.8]),
            dissolve: m.dissolve.unwrap_or(1.0),
            shininess: m.shininess.unwrap_or(32.0),
        })
        .collect();

    let meshes: Vec<MeshData> = models
        .into_iter()
        .map(|model| MeshData {
            name: model.name,
            positions: model.mesh.positions,
            normals: model.mesh.normals,
            texcoords: model.mesh.texcoords,
            indices: model.mesh.indices,
            material_id: model.mesh.material_id,
        })
        .collect();

    let name = meshes
        .iter()
        .map(|m| m.name.clone())
        .find(|n| !n.is_empty())
        .or_else(|| {
            obj_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "model".to_string());

    Ok(LoadedModel {
        name,
        meshes,
        materials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, Instant};

    fn temp_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("whirl_{}_{}", test, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn poll_until_settled(gateway: &mut AssetGateway, scene: &mut Scene) -> Vec<AssetEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        while gateway.pending_count() > 0 {
            events.extend(gateway.poll(scene));
            if Instant::now() > deadline {
                panic!("asset load did not settle in time");
            }
            thread::sleep(Duration::from_millis(5));
        }
        events
    }

    #[test]
    fn test_texture_handle_is_returned_immediately() {
        let mut gateway = AssetGateway::new();
        let mut scene = Scene::new();

        let handle = gateway.load_texture("no/such/wall.jpg", &mut scene);
        assert_eq!(scene.textures.len(), 1);
        assert_eq!(scene.textures.version(handle), 0);
        assert_eq!(gateway.pending_count(), 1);
    }

    #[test]
    fn test_texture_load_success() {
        let dir = temp_dir("texture_ok");
        let path = dir.join("wall.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 100, 50, 255]))
            .save(&path)
            .unwrap();

        let mut gateway = AssetGateway::new();
        let mut scene = Scene::new();
        let handle = gateway.load_texture(&path, &mut scene);

        let events = poll_until_settled(&mut gateway, &mut scene);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], AssetEvent::TextureLoaded { .. }));

        let pixels = scene.textures.pixels(handle).unwrap();
        assert_eq!((pixels.width, pixels.height), (2, 2));
        assert_eq!(scene.textures.version(handle), 1);

        // No further events once the asset has settled
        assert!(gateway.poll(&mut scene).is_empty());
    }

    #[test]
    fn test_failed_texture_leaves_material_usable() {
        let mut gateway = AssetGateway::new();
        let mut scene = Scene::new();
        let cube = scene.add_primitive(
            crate::gfx::scene::PrimitiveShape::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            [1.0, 1.0, 1.0],
            cgmath::Vector3::new(0.0, 0.0, 0.0),
        );

        let handle = gateway.load_texture("no/such/wall.jpg", &mut scene);
        scene.set_texture(cube, handle);

        let events = poll_until_settled(&mut gateway, &mut scene);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], AssetEvent::TextureFailed { .. }));

        // The slot is terminally failed but the material still resolves to
        // its base color (version stays 0, so the fallback keeps being used)
        assert_eq!(scene.textures.version(handle), 0);
        let obj = scene.get_object(cube).unwrap();
        assert_eq!(scene.get_material_for_object(obj).base_color, [1.0; 4]);
    }

    #[test]
    fn test_unreachable_material_emits_one_failure_and_no_mutation() {
        let dir = temp_dir("mtl_missing");
        // Geometry exists and is valid; only the material stage can fail
        let obj_path = dir.join("cat.obj");
        fs::write(&obj_path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mut gateway = AssetGateway::new();
        let mut scene = Scene::new();
        gateway.load_model(dir.join("nowhere.mtl"), &obj_path, |scene, model| {
            scene.attach_model(model)
        });

        let events = poll_until_settled(&mut gateway, &mut scene);
        assert_eq!(events.len(), 1);
        match &events[0] {
            AssetEvent::ModelFailed { error, .. } => {
                // Failing in the material stage proves geometry was never
                // attempted first
                assert!(matches!(error, AssetError::MaterialLibrary { .. }));
            }
            other => panic!("unexpected event {:?}", other),
        }

        assert_eq!(scene.object_count(), 0);
        assert!(scene.material_manager.list_materials().is_empty());
    }

    #[test]
    fn test_model_load_attaches_with_materials() {
        let dir = temp_dir("model_ok");
        let mtl_path = dir.join("cat.mtl");
        let obj_path = dir.join("cat.obj");
        fs::write(&mtl_path, "newmtl fur\nKd 0.9 0.6 0.2\nNs 16.0\n").unwrap();
        fs::write(
            &obj_path,
            concat!(
                "mtllib cat.mtl\n",
                "o cat\n",
                "usemtl fur\n",
                "v 0 0 0\nv 1 0 0\nv 0 1 0\n",
                "vn 0 0 1\n",
                "f 1//1 2//1 3//1\n",
            ),
        )
        .unwrap();

        let mut gateway = AssetGateway::new();
        let mut scene = Scene::new();
        gateway.load_model(&mtl_path, &obj_path, |scene, model| {
            scene.attach_model(model)
        });

        let events = poll_until_settled(&mut gateway, &mut scene);
        assert_eq!(events.len(), 1);
        let object = match &events[0] {
            AssetEvent::ModelAttached { object, .. } => *object,
            other => panic!("unexpected event {:?}", other),
        };

        let obj = scene.get_object(object).unwrap();
        assert_eq!(obj.get_material_id(), Some("fur"));
        let material = scene.get_material_for_object(obj);
        assert!((material.base_color[0] - 0.9).abs() < 1e-6);
        assert!((material.shininess - 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_geometry_failure_after_material_success() {
        let dir = temp_dir("obj_missing");
        let mtl_path = dir.join("cat.mtl");
        fs::write(&mtl_path, "newmtl fur\nKd 0.9 0.6 0.2\n").unwrap();

        let mut gateway = AssetGateway::new();
        let mut scene = Scene::new();
        gateway.load_model(&mtl_path, dir.join("nowhere.obj"), |scene, model| {
            scene.attach_model(model)
        });

        let events = poll_until_settled(&mut gateway, &mut scene);
        assert_eq!(events.len(), 1);
        match &events[0] {
            AssetEvent::ModelFailed { error, .. } => {
                assert!(matches!(error, AssetError::Io { .. }));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(scene.object_count(), 0);
    }
}
