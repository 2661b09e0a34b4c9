//! The scene container and its builder operations.

use cgmath::Vector3;
use wgpu::Device;

use crate::assets::LoadedModel;
use crate::gfx::geometry::{generate_box, generate_cone, generate_torus, GeometryData};
use crate::gfx::resources::material::{Material, MaterialManager, Shading};
use crate::gfx::resources::texture_store::{TextureHandle, TextureStore};

use super::light::{Light, MAX_DIRECTIONAL_LIGHTS};
use super::object::{GeometryKind, Mesh, ObjectId, SceneObject};

/// Circle subdivision used for generated primitives
const PRIMITIVE_SEGMENTS: u32 = 32;

/// A primitive shape request with its dimensions
///
/// Dimensions must be strictly positive; the geometry generators assert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveShape {
    Cone { radius: f32, height: f32 },
    Torus { radius: f32, tube_radius: f32 },
    Box { width: f32, height: f32, depth: f32 },
}

/// Main scene: objects, lights, materials, and texture slots
///
/// Construction is append-only. Every scene is an independent value, so
/// tests can run several side by side.
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub lights: Vec<Light>,
    pub material_manager: MaterialManager,
    pub textures: TextureStore,
}

impl Scene {
    /// Creates a new empty scene
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            material_manager: MaterialManager::new(),
            textures: TextureStore::new(),
        }
    }

    /// Creates a primitive, inserts it into the scene, and returns a handle
    /// for later mutation.
    ///
    /// Cones and tori get lit shading, boxes unlit, matching the demo this
    /// engine was built around. Each primitive gets its own material keyed
    /// by the object name.
    pub fn add_primitive(
        &mut self,
        shape: PrimitiveShape,
        color: [f32; 3],
        position: Vector3<f32>,
    ) -> ObjectId {
        let (geometry, kind, shading, base_name): (GeometryData, _, _, _) = match shape {
            PrimitiveShape::Cone { radius, height } => (
                generate_cone(radius, height, PRIMITIVE_SEGMENTS),
                GeometryKind::Cone { radius, height },
                Shading::Lit,
                "cone",
            ),
            PrimitiveShape::Torus {
                radius,
                tube_radius,
            } => (
                generate_torus(radius, tube_radius, PRIMITIVE_SEGMENTS, PRIMITIVE_SEGMENTS),
                GeometryKind::Torus {
                    radius,
                    tube_radius,
                },
                Shading::Lit,
                "torus",
            ),
            PrimitiveShape::Box {
                width,
                height,
                depth,
            } => (
                generate_box(width, height, depth),
                GeometryKind::Box {
                    width,
                    height,
                    depth,
                },
                Shading::Unlit,
                "box",
            ),
        };

        let name = self.ensure_unique_name(base_name);
        self.material_manager.add_material(Material::new(
            &name,
            [color[0], color[1], color[2], 1.0],
            shading,
        ));

        let mut object = SceneObject::new(&name, kind, vec![Mesh::from_geometry(&geometry)]);
        object.set_material(&name);
        object.position = position;

        log::debug!("added primitive '{}' at {:?}", name, position);

        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    /// Appends a light to the scene
    ///
    /// Lights are immutable once added. Directional lights beyond the
    /// backend's uniform capacity are kept in the list but will not
    /// contribute to shading.
    pub fn add_light(&mut self, light: Light) {
        if light.is_directional() {
            let directional = self.lights.iter().filter(|l| l.is_directional()).count();
            if directional >= MAX_DIRECTIONAL_LIGHTS {
                log::warn!(
                    "more than {} directional lights; further ones will not contribute",
                    MAX_DIRECTIONAL_LIGHTS
                );
            }
        }
        self.lights.push(light);
    }

    /// Inserts an asynchronously loaded model into the scene
    ///
    /// Registers the model's materials (existing ids win) and assigns the
    /// first mesh's material to the object, the loader convention for
    /// single-material models.
    pub fn attach_model(&mut self, model: LoadedModel) -> ObjectId {
        for material in &model.materials {
            if self.material_manager.get_material(&material.name).is_some() {
                continue;
            }

            let mut mat = Material::new(
                &material.name,
                [
                    material.diffuse[0],
                    material.diffuse[1],
                    material.diffuse[2],
                    material.dissolve,
                ],
                Shading::Lit,
            );
            mat.shininess = material.shininess;
            self.material_manager.add_material(mat);
        }

        let mut meshes = Vec::new();
        let mut first_material: Option<String> = None;

        for mesh_data in &model.meshes {
            // Use normals from the file if present, otherwise derive them
            let normals = if !mesh_data.normals.is_empty()
                && mesh_data.normals.len() == mesh_data.positions.len()
            {
                mesh_data.normals.clone()
            } else {
                Mesh::calculate_face_normals(&mesh_data.positions, &mesh_data.indices)
            };

            if first_material.is_none() {
                first_material = mesh_data
                    .material_id
                    .and_then(|id| model.materials.get(id))
                    .map(|m| m.name.clone());
            }

            meshes.push(Mesh::new(
                mesh_data.positions.clone(),
                normals,
                mesh_data.texcoords.clone(),
                mesh_data.indices.clone(),
            ));
        }

        let name = self.ensure_unique_name(&model.name);
        let mut object = SceneObject::new(&name, GeometryKind::ImportedMesh, meshes);
        if let Some(material_id) = first_material {
            object.set_material(&material_id);
        }

        log::info!("attached model '{}' ({} meshes)", name, object.meshes.len());

        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    /// Wires a texture slot into the object's material
    pub fn set_texture(&mut self, id: ObjectId, handle: TextureHandle) {
        let Some(material_id) = self
            .get_object(id)
            .and_then(|obj| obj.get_material_id())
            .map(String::from)
        else {
            log::warn!("object {:?} has no material to texture", id);
            return;
        };

        if let Some(material) = self.material_manager.get_material_mut(&material_id) {
            material.set_texture(handle);
        }
    }

    /// Gets immutable reference to an object by handle
    pub fn get_object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    /// Gets mutable reference to an object by handle
    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0)
    }

    /// Gets the total number of objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Resolves the material for an object, falling back to the default
    pub fn get_material_for_object(&self, object: &SceneObject) -> &Material {
        self.material_manager
            .get_material_for_object(object.get_material_id())
    }

    /// Creates missing GPU resources and syncs per-frame state
    ///
    /// Called by the render backend at the start of every frame, so objects
    /// and textures attached between frames get their resources before the
    /// next draw.
    pub fn prepare_gpu(&mut self, device: &Device, queue: &wgpu::Queue) {
        let Self {
            objects,
            material_manager,
            textures,
            ..
        } = self;

        for object in objects.iter_mut() {
            if object.gpu_resources.is_none() {
                object.init_gpu_resources(device);
            }
            object.update_transform(queue);
        }

        material_manager.ensure_gpu_resources(device, queue, textures);
    }

    /// Derives a name not yet used by any object
    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.objects.iter().any(|obj| obj.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{LoadedModel, MaterialData, MeshData};

    #[test]
    fn test_add_primitive_returns_stable_handles() {
        let mut scene = Scene::new();
        let cone = scene.add_primitive(
            PrimitiveShape::Cone {
                radius: 1.0,
                height: 1.0,
            },
            [0.5, 0.25, 0.66],
            Vector3::new(-2.0, 0.0, 0.0),
        );
        let torus = scene.add_primitive(
            PrimitiveShape::Torus {
                radius: 0.5,
                tube_radius: 0.25,
            },
            [0.66, 0.5, 0.25],
            Vector3::new(2.0, 0.0, 0.0),
        );

        assert_eq!(scene.object_count(), 2);
        assert_ne!(cone, torus);

        let cone_obj = scene.get_object(cone).unwrap();
        assert_eq!(cone_obj.position.x, -2.0);
        assert!(matches!(cone_obj.kind, GeometryKind::Cone { .. }));
        assert_eq!(scene.get_material_for_object(cone_obj).shading, Shading::Lit);
    }

    #[test]
    fn test_box_gets_unlit_shading() {
        let mut scene = Scene::new();
        let cube = scene.add_primitive(
            PrimitiveShape::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            [1.0, 1.0, 1.0],
            Vector3::new(0.0, 0.0, 0.0),
        );

        let obj = scene.get_object(cube).unwrap();
        assert_eq!(scene.get_material_for_object(obj).shading, Shading::Unlit);
    }

    #[test]
    fn test_duplicate_primitives_get_unique_names() {
        let mut scene = Scene::new();
        let shape = PrimitiveShape::Cone {
            radius: 1.0,
            height: 1.0,
        };
        let a = scene.add_primitive(shape, [1.0, 0.0, 0.0], Vector3::new(0.0, 0.0, 0.0));
        let b = scene.add_primitive(shape, [0.0, 1.0, 0.0], Vector3::new(1.0, 0.0, 0.0));

        let name_a = scene.get_object(a).unwrap().name.clone();
        let name_b = scene.get_object(b).unwrap().name.clone();
        assert_ne!(name_a, name_b);
    }

    #[test]
    fn test_lights_append_only() {
        let mut scene = Scene::new();
        scene.add_light(Light::Ambient {
            color: [1.0, 1.0, 1.0],
            intensity: 0.3,
        });
        scene.add_light(Light::Hemisphere {
            sky_color: [0.7, 0.9, 1.0],
            ground_color: [0.7, 0.5, 0.1],
            intensity: 0.4,
        });
        assert_eq!(scene.lights.len(), 2);
    }

    #[test]
    fn test_set_texture_reaches_material() {
        let mut scene = Scene::new();
        let cube = scene.add_primitive(
            PrimitiveShape::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            [1.0, 1.0, 1.0],
            Vector3::new(0.0, 0.0, 0.0),
        );

        let handle = scene.textures.allocate("wall.jpg");
        scene.set_texture(cube, handle);

        let obj = scene.get_object(cube).unwrap();
        assert_eq!(scene.get_material_for_object(obj).texture(), Some(handle));
    }

    #[test]
    fn test_attach_model_registers_materials_and_normals() {
        let mut scene = Scene::new();

        // Single triangle without normals; attachment must derive them
        let model = LoadedModel {
            name: "tripod".to_string(),
            meshes: vec![MeshData {
                name: "leg".to_string(),
                positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                normals: Vec::new(),
                texcoords: Vec::new(),
                indices: vec![0, 1, 2],
                material_id: Some(0),
            }],
            materials: vec![MaterialData {
                name: "fur".to_string(),
                diffuse: [0.9, 0.6, 0.2],
                dissolve: 1.0,
                shininess: 16.0,
            }],
        };

        let id = scene.attach_model(model);
        let obj = scene.get_object(id).unwrap();
        assert!(matches!(obj.kind, GeometryKind::ImportedMesh));
        assert_eq!(obj.get_material_id(), Some("fur"));
        assert_eq!(scene.get_material_for_object(obj).base_color[0], 0.9);
        assert_eq!(obj.meshes[0].vertex_count(), 3);
    }
}
