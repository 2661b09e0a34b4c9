//! Material system
//!
//! Provides material definitions and centralized management with GPU
//! resource handling. Materials are stored in [`MaterialManager`] and objects
//! reference them by id. A material is either lit (shaded by the scene's
//! lights) or unlit (flat base color), optionally modulated by a texture
//! slot that may still be loading.

use std::collections::HashMap;

use wgpu::Device;

use crate::wgpu_utils::{binding_types, UniformBuffer};

use super::texture_resource::TextureResource;
use super::texture_store::{TextureHandle, TextureStore};

/// Material ID for referencing materials
pub type MaterialId = String;

/// Converts a `0xRRGGBB` color constant into linear-ish RGB floats
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

/// Shading model applied by the render backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Ambient + hemisphere + directional lighting with a specular term
    Lit,
    /// Flat base color times texture, no lighting
    Unlit,
}

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub shading_model: u32,
    pub shininess: f32,
    _padding: [f32; 2],
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Bind group layout shared by every material and the render pipeline:
/// uniform + texture + sampler, all fragment-visible.
pub fn material_bind_group_layout(device: &Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Material Bind Group Layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: binding_types::uniform(),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: binding_types::texture_2d(),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

// GPU resources for one material; rebuilt when the bound texture slot
// changes version (pixels arrived) or the texture assignment changes.
struct MaterialGpu {
    ubo: MaterialUBO,
    _texture: TextureResource,
    bind_group: wgpu::BindGroup,
    bound_texture_version: u32,
}

/// Material definition
///
/// Contains shading properties and lazily created GPU resources. Materials
/// are stored centrally in [`MaterialManager`] and shared between objects.
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub shading: Shading,
    pub shininess: f32,
    texture: Option<TextureHandle>,
    gpu: Option<MaterialGpu>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            shading: Shading::Lit,
            shininess: 32.0,
            texture: None,
            gpu: None,
        }
    }
}

impl Material {
    /// Creates a new material
    ///
    /// # Arguments
    /// * `name` - Unique name for this material
    /// * `base_color` - RGBA base color
    /// * `shading` - Lit or unlit shading model
    pub fn new(name: &str, base_color: [f32; 4], shading: Shading) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            shading,
            ..Default::default()
        }
    }

    /// Wires a texture slot into this material
    ///
    /// The material renders with its base color until the slot resolves.
    pub fn set_texture(&mut self, handle: TextureHandle) {
        self.texture = Some(handle);
        self.gpu = None;
    }

    /// Texture slot bound to this material, if any
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Get the bind group for rendering
    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }

    fn uniform_content(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            shading_model: match self.shading {
                Shading::Lit => 0,
                Shading::Unlit => 1,
            },
            shininess: self.shininess,
            _padding: [0.0; 2],
        }
    }

    /// Creates or refreshes GPU resources for this material
    ///
    /// Rebuilds the bind group when the bound texture slot has a new version
    /// (its pixels arrived since the last build); otherwise just syncs the
    /// uniform contents.
    pub fn ensure_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        textures: &TextureStore,
    ) {
        let desired_version = self
            .texture
            .map(|handle| textures.version(handle))
            .unwrap_or(0);
        let content = self.uniform_content();

        if let Some(gpu) = &mut self.gpu {
            if gpu.bound_texture_version == desired_version {
                gpu.ubo.update_content(queue, content);
                return;
            }
        }

        let texture = match self.texture.and_then(|handle| textures.pixels(handle)) {
            Some(pixels) => TextureResource::from_pixels(device, queue, pixels, &self.name),
            None => TextureResource::create_fallback(device, queue),
        };

        let ubo = MaterialUBO::new_with_data(device, &content);

        let layout = material_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        self.gpu = Some(MaterialGpu {
            ubo,
            _texture: texture,
            bind_group,
            bound_texture_version: desired_version,
        });
    }
}

/// Centralized material storage
///
/// Objects reference materials by id; unknown or missing ids resolve to the
/// default material.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material: Material,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
            default_material: Material::default(),
        }
    }

    /// Adds a material, keyed by its name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    /// Resolves an object's material reference, falling back to the default
    pub fn get_material_for_object(&self, material_id: Option<&str>) -> &Material {
        material_id
            .and_then(|id| self.materials.get(id))
            .unwrap_or(&self.default_material)
    }

    /// Lists all material ids
    pub fn list_materials(&self) -> Vec<&String> {
        self.materials.keys().collect()
    }

    /// Creates or refreshes GPU resources for every material
    pub fn ensure_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        textures: &TextureStore,
    ) {
        for material in self.materials.values_mut() {
            material.ensure_gpu_resources(device, queue, textures);
        }
        self.default_material
            .ensure_gpu_resources(device, queue, textures);
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(rgb_from_hex(0xFFFFFF), [1.0, 1.0, 1.0]);
        assert_eq!(rgb_from_hex(0x000000), [0.0, 0.0, 0.0]);
        let purple = rgb_from_hex(0x8844AA);
        assert!((purple[0] - 0x88 as f32 / 255.0).abs() < 1e-6);
        assert!((purple[1] - 0x44 as f32 / 255.0).abs() < 1e-6);
        assert!((purple[2] - 0xAA as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_encodes_shading_model() {
        let lit = Material::new("lit", [1.0, 0.0, 0.0, 1.0], Shading::Lit);
        let unlit = Material::new("unlit", [1.0, 1.0, 1.0, 1.0], Shading::Unlit);
        assert_eq!(lit.uniform_content().shading_model, 0);
        assert_eq!(unlit.uniform_content().shading_model, 1);
    }

    #[test]
    fn test_manager_falls_back_to_default() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::new("cone", [0.5, 0.2, 0.7, 1.0], Shading::Lit));

        assert_eq!(manager.get_material_for_object(Some("cone")).name, "cone");
        assert_eq!(
            manager.get_material_for_object(Some("missing")).name,
            "Default"
        );
        assert_eq!(manager.get_material_for_object(None).name, "Default");
    }

    #[test]
    fn test_set_texture_drops_stale_gpu_state() {
        let mut store = TextureStore::new();
        let handle = store.allocate("wall.jpg");

        let mut material = Material::new("cube", [1.0, 1.0, 1.0, 1.0], Shading::Unlit);
        material.set_texture(handle);
        assert_eq!(material.texture(), Some(handle));
        assert!(material.get_bind_group().is_none());
    }
}
