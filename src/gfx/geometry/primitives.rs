//! # Primitive Shape Generation
//!
//! This module contains functions to generate the primitive shapes used by
//! the scene builder. All shapes are generated with outward normals and
//! texture coordinates, centered at the origin in a Y-up coordinate system.
//!
//! Dimensions must be strictly positive; the generators assert on degenerate
//! input rather than producing broken meshes.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a box with the given edge lengths, centered at the origin
///
/// Each face has four dedicated vertices with outward normals and UV
/// coordinates from 0 to 1.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    assert!(
        width > 0.0 && height > 0.0 && depth > 0.0,
        "box dimensions must be positive"
    );

    let mut data = GeometryData::new();

    let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);

    let positions = [
        // Front face (positive Z)
        [-hw, -hh, hd], [hw, -hh, hd], [hw, hh, hd], [-hw, hh, hd],
        // Back face (negative Z)
        [-hw, -hh, -hd], [-hw, hh, -hd], [hw, hh, -hd], [hw, -hh, -hd],
        // Left face (negative X)
        [-hw, -hh, -hd], [-hw, -hh, hd], [-hw, hh, hd], [-hw, hh, -hd],
        // Right face (positive X)
        [hw, -hh, hd], [hw, -hh, -hd], [hw, hh, -hd], [hw, hh, hd],
        // Top face (positive Y)
        [-hw, hh, hd], [hw, hh, hd], [hw, hh, -hd], [-hw, hh, -hd],
        // Bottom face (negative Y)
        [-hw, -hh, -hd], [hw, -hh, -hd], [hw, -hh, hd], [-hw, -hh, hd],
    ];

    let tex_coords = [
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        [1.0, 0.0], [0.0, 0.0], [0.0, 1.0], [1.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];

    let normals = [
        [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.tex_coords = tex_coords.to_vec();
    data.normals = normals.to_vec();

    // Indices for each face (2 triangles per face, counter-clockwise)
    data.indices = vec![
        0, 1, 2, 2, 3, 0, // front
        4, 5, 6, 6, 7, 4, // back
        8, 9, 10, 10, 11, 8, // left
        12, 13, 14, 14, 15, 12, // right
        16, 17, 18, 18, 19, 16, // top
        20, 21, 22, 22, 23, 20, // bottom
    ];

    data
}

/// Generate a cone with the given base radius and height
///
/// The apex sits at +height/2 on the Y axis, the base cap at -height/2.
/// The apex vertex is duplicated per segment so each lateral triangle gets
/// a normal sampled at its angular midpoint.
///
/// # Arguments
/// * `radius` - Radius of the base circle
/// * `height` - Height of the cone (along the Y axis)
/// * `segments` - Number of circular segments
pub fn generate_cone(radius: f32, height: f32, segments: u32) -> GeometryData {
    assert!(
        radius > 0.0 && height > 0.0,
        "cone dimensions must be positive"
    );

    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;

    // Lateral surface normal at angle a: normalize(h*cos a, r, h*sin a)
    let side_normal = |angle: f32| -> [f32; 3] {
        let n = [height * angle.cos(), radius, height * angle.sin()];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        [n[0] / len, n[1] / len, n[2] / len]
    };

    // Side vertices: base ring + a per-segment apex copy
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let mid_angle = (i as f32 + 0.5) * 2.0 * PI / segs as f32;

        data.vertices
            .push([radius * angle.cos(), -half_height, radius * angle.sin()]);
        data.normals.push(side_normal(angle));
        data.tex_coords.push([i as f32 / segs as f32, 0.0]);

        data.vertices.push([0.0, half_height, 0.0]);
        data.normals.push(side_normal(mid_angle));
        data.tex_coords
            .push([(i as f32 + 0.5) / segs as f32, 1.0]);
    }

    // Lateral faces
    for i in 0..segs {
        let base = i * 2;
        let apex = base + 1;
        let next_base = (i + 1) * 2;

        data.indices.push(base);
        data.indices.push(apex);
        data.indices.push(next_base);
    }

    // Base cap: center vertex plus a downward-facing copy of the ring
    let center = data.vertices.len() as u32;
    data.vertices.push([0.0, -half_height, 0.0]);
    data.normals.push([0.0, -1.0, 0.0]);
    data.tex_coords.push([0.5, 0.5]);

    let ring_start = data.vertices.len() as u32;
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        data.vertices
            .push([radius * angle.cos(), -half_height, radius * angle.sin()]);
        data.normals.push([0.0, -1.0, 0.0]);
        data.tex_coords
            .push([0.5 + 0.5 * angle.cos(), 0.5 + 0.5 * angle.sin()]);
    }

    for i in 0..segs {
        data.indices.push(center);
        data.indices.push(ring_start + i);
        data.indices.push(ring_start + i + 1);
    }

    data
}

/// Generate a torus lying in the XY plane, centered at the origin
///
/// The main ring of radius `radius` wraps around the Z axis; the tube has
/// radius `tube_radius`. Normals point away from the tube center line.
///
/// # Arguments
/// * `radius` - Distance from the torus center to the tube center line
/// * `tube_radius` - Radius of the tube cross-section
/// * `radial_segments` - Subdivisions of the tube cross-section
/// * `tubular_segments` - Subdivisions along the main ring
pub fn generate_torus(
    radius: f32,
    tube_radius: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    assert!(
        radius > 0.0 && tube_radius > 0.0,
        "torus dimensions must be positive"
    );

    let mut data = GeometryData::new();

    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    for j in 0..=radial {
        let v = j as f32 * 2.0 * PI / radial as f32;
        let (sin_v, cos_v) = v.sin_cos();

        for i in 0..=tubular {
            let u = i as f32 * 2.0 * PI / tubular as f32;
            let (sin_u, cos_u) = u.sin_cos();

            let ring = radius + tube_radius * cos_v;
            data.vertices
                .push([ring * cos_u, ring * sin_u, tube_radius * sin_v]);
            data.normals.push([cos_v * cos_u, cos_v * sin_u, sin_v]);
            data.tex_coords
                .push([i as f32 / tubular as f32, j as f32 / radial as f32]);
        }
    }

    for j in 0..radial {
        for i in 0..tubular {
            let a = (tubular + 1) * j + i;
            let b = (tubular + 1) * (j + 1) + i;
            let c = b + 1;
            let d = a + 1;

            // First triangle
            data.indices.push(a);
            data.indices.push(d);
            data.indices.push(b);

            // Second triangle
            data.indices.push(d);
            data.indices.push(c);
            data.indices.push(b);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unit_normals(data: &GeometryData) {
        for n in &data.normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-4, "non-unit normal {:?}", n);
        }
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box(1.0, 1.0, 1.0);
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_unit_normals(&cube);
    }

    #[test]
    fn test_box_respects_dimensions() {
        let slab = generate_box(4.0, 2.0, 1.0);
        for v in &slab.vertices {
            assert!(v[0].abs() <= 2.0 + 1e-6);
            assert!(v[1].abs() <= 1.0 + 1e-6);
            assert!(v[2].abs() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn test_cone_generation() {
        let cone = generate_cone(1.0, 1.0, 32);
        // 32 segments: (segs+1)*2 side vertices + 1 center + (segs+1) cap ring
        assert_eq!(cone.vertices.len(), 33 * 2 + 1 + 33);
        // segs lateral triangles + segs cap triangles
        assert_eq!(cone.triangle_count(), 64);
        assert_eq!(cone.vertices.len(), cone.normals.len());
        assert_eq!(cone.vertices.len(), cone.tex_coords.len());
        assert_unit_normals(&cone);
    }

    #[test]
    fn test_cone_extents() {
        let cone = generate_cone(1.0, 2.0, 16);
        for v in &cone.vertices {
            assert!(v[1] >= -1.0 - 1e-6 && v[1] <= 1.0 + 1e-6);
            let r = (v[0] * v[0] + v[2] * v[2]).sqrt();
            assert!(r <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_torus_generation() {
        let torus = generate_torus(0.5, 0.25, 32, 32);
        assert_eq!(torus.vertices.len(), 33 * 33);
        assert_eq!(torus.triangle_count(), 32 * 32 * 2);
        assert_eq!(torus.vertices.len(), torus.normals.len());
        assert_eq!(torus.vertices.len(), torus.tex_coords.len());
        assert_unit_normals(&torus);
    }

    #[test]
    fn test_torus_vertices_on_tube() {
        let (radius, tube) = (0.5, 0.25);
        let torus = generate_torus(radius, tube, 16, 16);
        for v in &torus.vertices {
            // Distance from the tube center line must equal the tube radius
            let ring = (v[0] * v[0] + v[1] * v[1]).sqrt() - radius;
            let d = (ring * ring + v[2] * v[2]).sqrt();
            assert!((d - tube).abs() < 1e-4);
        }
    }

    #[test]
    #[should_panic(expected = "cone dimensions must be positive")]
    fn test_cone_rejects_zero_radius() {
        generate_cone(0.0, 1.0, 32);
    }

    #[test]
    #[should_panic(expected = "torus dimensions must be positive")]
    fn test_torus_rejects_negative_tube() {
        generate_torus(0.5, -0.25, 32, 32);
    }

    #[test]
    #[should_panic(expected = "box dimensions must be positive")]
    fn test_box_rejects_zero_height() {
        generate_box(1.0, 0.0, 1.0);
    }
}
