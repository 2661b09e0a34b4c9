//! Scene objects and their mesh data.
//!
//! Objects are plain CPU-side data until [`SceneObject::init_gpu_resources`]
//! runs; the render backend calls it lazily, so objects attached mid-run
//! (asynchronously loaded models) get their buffers on the next frame.

use std::ops::Range;

use cgmath::{Matrix4, Rad, Vector3, Zero};
use wgpu::Device;

use crate::gfx::geometry::GeometryData;

use super::vertex::Vertex3D;

/// Stable handle to an object inside a [`super::Scene`]
///
/// The scene's object list is append-only, so a handle stays valid for the
/// lifetime of the scene that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    /// Index of the object in the scene's object list
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Tagged geometry variant carried by every scene object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryKind {
    Cone { radius: f32, height: f32 },
    Torus { radius: f32, tube_radius: f32 },
    Box { width: f32, height: f32, depth: f32 },
    ImportedMesh,
}

/// Triangle mesh with lazily created GPU buffers
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    /// Builds a mesh from flat position/normal/texcoord arrays as produced
    /// by the OBJ loader (three and two components per vertex respectively).
    ///
    /// Missing texture coordinates fall back to the origin.
    pub fn new(
        positions: Vec<f32>,
        normals: Vec<f32>,
        texcoords: Vec<f32>,
        indices: Vec<u32>,
    ) -> Self {
        let index_count = indices.len() as u32;

        let mut vertices = Vec::with_capacity(positions.len() / 3);
        for i in 0..positions.len() / 3 {
            let uv = if texcoords.len() >= (i + 1) * 2 {
                [texcoords[i * 2], texcoords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };
            vertices.push(Vertex3D {
                position: [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]],
                normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
                uv,
            });
        }

        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        }
    }

    /// Builds a mesh from procedurally generated geometry
    pub fn from_geometry(data: &GeometryData) -> Self {
        let vertices = (0..data.vertices.len())
            .map(|i| Vertex3D {
                position: data.vertices[i],
                normal: data.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uv: data.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();

        Self {
            vertices,
            indices: data.indices.clone(),
            vertex_buffer: None,
            index_buffer: None,
            index_count: data.indices.len() as u32,
        }
    }

    /// Number of vertices in this mesh
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Number of indices in this mesh
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Computes averaged per-vertex normals from triangle faces, for OBJ
    /// files that ship without normals.
    pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
        let vertex_count = positions.len() / 3;
        let mut normals = vec![0.0; positions.len()];
        let mut counts = vec![0u32; vertex_count];

        for triangle in indices.chunks(3) {
            let i0 = triangle[0] as usize;
            let i1 = triangle[1] as usize;
            let i2 = triangle[2] as usize;

            let v = |i: usize| [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]];
            let (v0, v1, v2) = (v(i0), v(i1), v(i2));

            let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

            let face_normal = [
                edge1[1] * edge2[2] - edge1[2] * edge2[1],
                edge1[2] * edge2[0] - edge1[0] * edge2[2],
                edge1[0] * edge2[1] - edge1[1] * edge2[0],
            ];

            for &vertex_idx in &[i0, i1, i2] {
                normals[vertex_idx * 3] += face_normal[0];
                normals[vertex_idx * 3 + 1] += face_normal[1];
                normals[vertex_idx * 3 + 2] += face_normal[2];
                counts[vertex_idx] += 1;
            }
        }

        for i in 0..vertex_count {
            if counts[i] > 0 {
                let length = (normals[i * 3].powi(2)
                    + normals[i * 3 + 1].powi(2)
                    + normals[i * 3 + 2].powi(2))
                .sqrt();
                if length > 0.0 {
                    normals[i * 3] /= length;
                    normals[i * 3 + 1] /= length;
                    normals[i * 3 + 2] /= length;
                }
            }
        }

        normals
    }
}

/// GPU resources backing one object's transform uniform
pub struct ObjectGpuResources {
    pub transform_buffer: wgpu::Buffer,
    pub transform_bind_group: wgpu::BindGroup,
}

/// An object placed in the scene: geometry kind, meshes, material reference,
/// and a transform split into position, per-axis rotation, and uniform scale.
///
/// Rotation is the only field the animation driver mutates per frame;
/// the transform matrix is rebuilt from the parts on every GPU sync.
pub struct SceneObject {
    pub name: String,
    pub kind: GeometryKind,
    pub meshes: Vec<Mesh>,
    pub material_id: Option<String>,
    pub position: Vector3<f32>,
    /// Rotation about the X, Y, and Z axes, applied in that order
    pub rotation: [Rad<f32>; 3],
    pub scale: f32,
    pub visible: bool,
    pub gpu_resources: Option<ObjectGpuResources>,
}

impl SceneObject {
    /// Create a new object at the origin with identity rotation
    pub fn new(name: impl Into<String>, kind: GeometryKind, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.into(),
            kind,
            meshes,
            material_id: None,
            position: Vector3::zero(),
            rotation: [Rad(0.0); 3],
            scale: 1.0,
            visible: true,
            gpu_resources: None,
        }
    }

    /// Assign a material by id
    pub fn set_material(&mut self, material_id: &str) {
        self.material_id = Some(material_id.to_string());
    }

    /// Material id assigned to this object, if any
    pub fn get_material_id(&self) -> Option<&str> {
        self.material_id.as_deref()
    }

    /// Builds the model matrix from position, rotation, and scale
    pub fn transform_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(self.rotation[0])
            * Matrix4::from_angle_y(self.rotation[1])
            * Matrix4::from_angle_z(self.rotation[2])
            * Matrix4::from_scale(self.scale)
    }

    /// Syncs the current transform to the GPU if resources exist
    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        if let Some(gpu_resources) = &self.gpu_resources {
            // cgmath matrices are column-major, which is what the GPU expects
            let matrix = self.transform_matrix();
            let transform_data: &[f32; 16] = matrix.as_ref();

            queue.write_buffer(
                &gpu_resources.transform_buffer,
                0,
                bytemuck::cast_slice(transform_data),
            );
        }
    }

    /// Get the transform bind group for rendering
    pub fn get_transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|res| &res.transform_bind_group)
    }

    /// Creates vertex/index buffers and the transform uniform for this object
    pub fn init_gpu_resources(&mut self, device: &Device) {
        use wgpu::util::DeviceExt;

        for mesh in self.meshes.iter_mut() {
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

            mesh.vertex_buffer = Some(vertex_buffer);
            mesh.index_buffer = Some(index_buffer);
        }

        let matrix = self.transform_matrix();
        let transform_data: &[f32; 16] = matrix.as_ref();

        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Transform Uniform Buffer"),
            contents: bytemuck::cast_slice(transform_data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let transform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Transform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transform Bind Group"),
            layout: &transform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        self.gpu_resources = Some(ObjectGpuResources {
            transform_buffer,
            transform_bind_group,
        });

        log::debug!(
            "initialized GPU resources for '{}' ({} meshes)",
            self.name,
            self.meshes.len()
        );
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
    fn draw_object(&mut self, object: &'a SceneObject);
    fn draw_object_instanced(&mut self, object: &'a SceneObject, instances: Range<u32>);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let vertex_buffer = match &mesh.vertex_buffer {
            Some(buffer) => buffer,
            None => return, // Skip drawing if not uploaded
        };
        let index_buffer = match &mesh.index_buffer {
            Some(buffer) => buffer,
            None => return,
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }

    fn draw_object(&mut self, object: &'b SceneObject) {
        self.draw_object_instanced(object, 0..1);
    }

    fn draw_object_instanced(&mut self, object: &'b SceneObject, instances: Range<u32>) {
        for mesh in &object.meshes {
            self.draw_mesh_instanced(mesh, instances.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;
    use cgmath::SquareMatrix;

    #[test]
    fn test_new_object_has_identity_transform() {
        let obj = SceneObject::new("cube", GeometryKind::ImportedMesh, vec![]);
        assert_eq!(obj.transform_matrix(), Matrix4::identity());
        assert!(obj.visible);
        assert!(obj.gpu_resources.is_none());
    }

    #[test]
    fn test_transform_matrix_translates() {
        let mut obj = SceneObject::new("cube", GeometryKind::ImportedMesh, vec![]);
        obj.position = Vector3::new(-2.0, 0.0, 0.0);
        let m = obj.transform_matrix();
        assert_eq!(m.w.x, -2.0);
        assert_eq!(m.w.y, 0.0);
    }

    #[test]
    fn test_mesh_from_geometry_counts() {
        let mesh = Mesh::from_geometry(&generate_box(1.0, 1.0, 1.0));
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
    }

    #[test]
    fn test_mesh_pads_missing_texcoords() {
        let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
        let mesh = Mesh::new(positions, normals, Vec::new(), vec![0, 1, 2]);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
    }

    #[test]
    fn test_calculated_normals_are_unit_length() {
        // Single triangle in the XY plane; expected normal +Z
        let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals = Mesh::calculate_face_normals(&positions, &[0, 1, 2]);
        for v in normals.chunks(3) {
            assert!((v[0] - 0.0).abs() < 1e-6);
            assert!((v[1] - 0.0).abs() < 1e-6);
            assert!((v[2] - 1.0).abs() < 1e-6);
        }
    }
}
