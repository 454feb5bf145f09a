use std::collections::HashSet;

use three_d::prelude::*;
use three_d::{CpuMesh, Indices, Positions, Instances};


/// CPU-side description of a box centered at the origin, each face split into a grid
#[derive(Clone, Debug)]
pub struct BoxGeometry {
    pub segments: u32,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl BoxGeometry {
    /// Builds a `size.x * size.y * size.z` box subdivided `segments` times along every axis
    pub fn new(size: Vec3, segments: u32) -> Self {
        let segments = segments.max(1);
        let mut geometry = Self {
            segments,
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
        };

        // (u, v, w) axes, u/v directions, face extents along u/v/w
        geometry.push_face([2, 1, 0], -1.0, -1.0, [size.z, size.y, size.x]); // +x
        geometry.push_face([2, 1, 0], 1.0, -1.0, [size.z, size.y, -size.x]); // -x
        geometry.push_face([0, 2, 1], 1.0, 1.0, [size.x, size.z, size.y]); // +y
        geometry.push_face([0, 2, 1], 1.0, -1.0, [size.x, size.z, -size.y]); // -y
        geometry.push_face([0, 1, 2], 1.0, -1.0, [size.x, size.y, size.z]); // +z
        geometry.push_face([0, 1, 2], -1.0, -1.0, [size.x, size.y, -size.z]); // -z
        geometry
    }

    fn push_face(&mut self, axes: [usize; 3], u_dir: f32, v_dir: f32, extent: [f32; 3]) {
        let [u, v, w] = axes;
        let [width, height, depth] = extent;
        let grid = self.segments;
        let row = grid + 1;
        let first = self.positions.len() as u32;

        let segment_width = width / grid as f32;
        let segment_height = height / grid as f32;
        let normal_sign = if depth > 0.0 { 1.0 } else { -1.0 };

        for iy in 0..row {
            let y = iy as f32 * segment_height - height * 0.5;
            for ix in 0..row {
                let x = ix as f32 * segment_width - width * 0.5;

                let mut position = [0_f32; 3];
                position[u] = x * u_dir;
                position[v] = y * v_dir;
                position[w] = depth * 0.5;
                self.positions.push(vec3(position[0], position[1], position[2]));

                let mut normal = [0_f32; 3];
                normal[w] = normal_sign;
                self.normals.push(vec3(normal[0], normal[1], normal[2]));

                self.uvs.push(vec2(ix as f32 / grid as f32, 1.0 - iy as f32 / grid as f32));
            }
        }

        for iy in 0..grid {
            for ix in 0..grid {
                let a = first + ix + row * iy;
                let b = first + ix + row * (iy + 1);
                let c = first + (ix + 1) + row * (iy + 1);
                let d = first + (ix + 1) + row * iy;
                self.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn to_cpu_mesh(&self) -> CpuMesh {
        CpuMesh {
            positions: Positions::F32(self.positions.clone()),
            indices: Indices::U32(self.indices.clone()),
            normals: Some(self.normals.clone()),
            uvs: Some(self.uvs.clone()),
            ..Default::default()
        }
    }

    /// Unique triangle edges. Edges shared by two faces of the box appear once.
    pub fn edges(&self) -> Vec<(Vec3, Vec3)> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for triangle in self.indices.chunks_exact(3) {
            for (i, j) in [(0, 1), (1, 2), (2, 0)] {
                let p1 = self.positions[triangle[i] as usize];
                let p2 = self.positions[triangle[j] as usize];
                let (k1, k2) = (quantize(p1), quantize(p2));
                let key = if k1 <= k2 { (k1, k2) } else { (k2, k1) };
                if seen.insert(key) {
                    edges.push((p1, p2));
                }
            }
        }
        edges
    }

    /// One transformation per edge, mapping a unit cylinder along +x onto the edge
    pub fn edge_instances(&self, radius: f32) -> Instances {
        Instances {
            transformations: self
                .edges()
                .into_iter()
                .map(|(p1, p2)| edge_transform(p1, p2, radius))
                .collect(),
            ..Default::default()
        }
    }
}


fn quantize(p: Vec3) -> [i64; 3] {
    const SCALE: f32 = 1.0e4;
    [
        (p.x * SCALE).round() as i64,
        (p.y * SCALE).round() as i64,
        (p.z * SCALE).round() as i64,
    ]
}


fn edge_transform(p1: Vec3, p2: Vec3, radius: f32) -> Mat4 {
    let direction = p2 - p1;
    Mat4::from_translation(p1)
        * Mat4::from(Quat::from_arc(vec3(1.0, 0.0, 0.0), direction.normalize(), None))
        * Mat4::from_nonuniform_scale(direction.magnitude(), radius, radius)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn distinct(values: impl Iterator<Item = f32>) -> usize {
        let mut v: Vec<i64> = values.map(|x| (x * 1.0e4).round() as i64).collect();
        v.sort_unstable();
        v.dedup();
        v.len()
    }

    #[test]
    fn vertex_and_triangle_counts() {
        for n in 1..=20_u32 {
            let g = BoxGeometry::new(vec3(1.0, 1.0, 1.0), n);
            let per_face = ((n + 1) * (n + 1)) as usize;
            assert_eq!(g.positions.len(), 6 * per_face);
            assert_eq!(g.normals.len(), g.positions.len());
            assert_eq!(g.uvs.len(), g.positions.len());
            assert_eq!(g.triangle_count(), 12 * (n * n) as usize);
        }
    }

    #[test]
    fn segments_per_axis() {
        for n in [1_u32, 2, 7, 20] {
            let g = BoxGeometry::new(vec3(1.0, 1.0, 1.0), n);
            let expected = (n + 1) as usize;
            assert_eq!(distinct(g.positions.iter().map(|p| p.x)), expected);
            assert_eq!(distinct(g.positions.iter().map(|p| p.y)), expected);
            assert_eq!(distinct(g.positions.iter().map(|p| p.z)), expected);
        }
    }

    #[test]
    fn zero_segments_is_treated_as_one() {
        let g = BoxGeometry::new(vec3(1.0, 1.0, 1.0), 0);
        assert_eq!(g.segments, 1);
        assert_eq!(g.triangle_count(), 12);
    }

    #[test]
    fn box_is_centered_with_requested_size() {
        let g = BoxGeometry::new(vec3(2.0, 1.0, 0.5), 3);
        let max_x = g.positions.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        let min_y = g.positions.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        let max_z = g.positions.iter().map(|p| p.z).fold(f32::MIN, f32::max);
        assert!((max_x - 1.0).abs() < 1e-6);
        assert!((min_y + 0.5).abs() < 1e-6);
        assert!((max_z - 0.25).abs() < 1e-6);
    }

    #[test]
    fn normals_point_outward() {
        let g = BoxGeometry::new(vec3(1.0, 1.0, 1.0), 2);
        for (p, n) in g.positions.iter().zip(g.normals.iter()) {
            // every vertex lies on the face its normal belongs to
            assert!((p.dot(*n) - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        let g = BoxGeometry::new(vec3(1.0, 1.0, 1.0), 2);
        for t in g.indices.chunks_exact(3) {
            let (a, b, c) = (
                g.positions[t[0] as usize],
                g.positions[t[1] as usize],
                g.positions[t[2] as usize],
            );
            let face_normal = (b - a).cross(c - a);
            assert!(face_normal.dot(g.normals[t[0] as usize]) > 0.0);
        }
    }

    #[test]
    fn shared_edges_are_deduplicated() {
        // 12 cube edges plus one diagonal per face
        assert_eq!(BoxGeometry::new(vec3(1.0, 1.0, 1.0), 1).edges().len(), 18);
        for n in [2_usize, 5] {
            let per_face = 2 * n * (n + 1) + n * n;
            let expected = 6 * per_face - 12 * n;
            assert_eq!(BoxGeometry::new(vec3(1.0, 1.0, 1.0), n as u32).edges().len(), expected);
        }
    }

    #[test]
    fn edge_transform_maps_unit_cylinder_onto_edge() {
        let p1 = vec3(0.5, -0.5, 0.5);
        let p2 = vec3(0.5, 0.5, 0.5);
        let m = edge_transform(p1, p2, 0.01);
        let start = m * vec4(0.0, 0.0, 0.0, 1.0);
        let end = m * vec4(1.0, 0.0, 0.0, 1.0);
        assert!((start.truncate() - p1).magnitude() < 1e-5);
        assert!((end.truncate() - p2).magnitude() < 1e-5);
    }

    #[test]
    fn cpu_mesh_carries_all_attributes() {
        let g = BoxGeometry::new(vec3(1.0, 1.0, 1.0), 2);
        let mesh = g.to_cpu_mesh();
        assert_eq!(mesh.positions.len(), g.positions.len());
        assert!(mesh.normals.is_some());
        assert_eq!(g.edge_instances(0.01).transformations.len(), g.edges().len());
    }
}
