//! Mesh builders for the scene pass.
//!
//! Two shapes exist: the ball's UV sphere (smooth normals) and the
//! attractor's regular dodecahedron (flat-shaded pentagons). The
//! dodecahedron is built as the dual of the icosahedron: the golden-ratio
//! icosahedron vertices give twenty triangular faces, and their centers are
//! the dodecahedron's twenty vertices.

use glam::Vec3;

/// CPU-side mesh: positions, normals, triangle indices.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Interleave positions and normals for the vertex buffer.
    /// Each vertex is 6 floats: [x, y, z, nx, ny, nz].
    pub fn vertex_data(&self) -> Vec<f32> {
        self.positions
            .iter()
            .zip(&self.normals)
            .flat_map(|(p, n)| [p.x, p.y, p.z, n.x, n.y, n.z])
            .collect()
    }
}

/// Latitude/longitude sphere with smooth normals.
pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> Mesh {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let theta = std::f32::consts::PI * ring as f32 / rings as f32;
        let (sin_t, cos_t) = theta.sin_cos();
        for seg in 0..=segments {
            let phi = std::f32::consts::TAU * seg as f32 / segments as f32;
            let (sin_p, cos_p) = phi.sin_cos();
            let normal = Vec3::new(sin_t * cos_p, cos_t, sin_t * sin_p);
            positions.push(normal * radius);
            normals.push(normal);
        }
    }

    let stride = segments + 1;
    for ring in 0..rings {
        for seg in 0..segments {
            let i0 = ring * stride + seg;
            let i1 = i0 + stride;
            indices.extend_from_slice(&[i0, i1, i0 + 1, i0 + 1, i1, i1 + 1]);
        }
    }

    Mesh {
        positions,
        normals,
        indices,
    }
}

/// The twelve golden-ratio icosahedron vertices.
fn icosahedron_vertices() -> [Vec3; 12] {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    [
        Vec3::new(-1.0, phi, 0.0),
        Vec3::new(1.0, phi, 0.0),
        Vec3::new(-1.0, -phi, 0.0),
        Vec3::new(1.0, -phi, 0.0),
        Vec3::new(0.0, -1.0, phi),
        Vec3::new(0.0, 1.0, phi),
        Vec3::new(0.0, -1.0, -phi),
        Vec3::new(0.0, 1.0, -phi),
        Vec3::new(phi, 0.0, -1.0),
        Vec3::new(phi, 0.0, 1.0),
        Vec3::new(-phi, 0.0, -1.0),
        Vec3::new(-phi, 0.0, 1.0),
    ]
}

/// Recover the twenty icosahedron faces as triples of mutually adjacent
/// vertices (adjacent = separated by the minimal edge length, 2.0).
fn icosahedron_faces(vertices: &[Vec3; 12]) -> Vec<[usize; 3]> {
    let edge = 2.0_f32;
    let adjacent = |a: usize, b: usize| (vertices[a].distance(vertices[b]) - edge).abs() < 1e-3;

    let mut faces = Vec::with_capacity(20);
    for i in 0..12 {
        for j in (i + 1)..12 {
            if !adjacent(i, j) {
                continue;
            }
            for k in (j + 1)..12 {
                if adjacent(i, k) && adjacent(j, k) {
                    faces.push([i, j, k]);
                }
            }
        }
    }
    faces
}

/// Regular dodecahedron with the given circumscribed radius, flat-shaded.
///
/// Each pentagonal face contributes five vertices sharing the face normal
/// and a three-triangle fan.
pub fn dodecahedron(circumradius: f32) -> Mesh {
    let icosa = icosahedron_vertices();
    let faces = icosahedron_faces(&icosa);

    // Dual vertices: icosahedron face centers, pushed out to the radius.
    let centers: Vec<Vec3> = faces
        .iter()
        .map(|f| ((icosa[f[0]] + icosa[f[1]] + icosa[f[2]]) / 3.0).normalize() * circumradius)
        .collect();

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    // One pentagon per icosahedron vertex: the centers of its five faces,
    // ordered counterclockwise around the vertex direction.
    for (v_index, vertex) in icosa.iter().enumerate() {
        let normal = vertex.normalize();
        let helper = if normal.z.abs() < 0.9 { Vec3::Z } else { Vec3::X };
        let t1 = normal.cross(helper).normalize();
        let t2 = normal.cross(t1);

        let mut ring: Vec<Vec3> = faces
            .iter()
            .zip(&centers)
            .filter(|(f, _)| f.contains(&v_index))
            .map(|(_, c)| *c)
            .collect();
        debug_assert_eq!(ring.len(), 5);
        ring.sort_by(|a, b| {
            let angle = |p: &Vec3| p.dot(t2).atan2(p.dot(t1));
            angle(a).total_cmp(&angle(b))
        });

        let base = positions.len() as u32;
        for corner in &ring {
            positions.push(*corner);
            normals.push(normal);
        }
        for k in 1..4u32 {
            indices.extend_from_slice(&[base, base + k, base + k + 1]);
        }
    }

    Mesh {
        positions,
        normals,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_counts() {
        let mesh = uv_sphere(0.5, 32, 32);
        assert_eq!(mesh.vertex_count(), 33 * 33);
        assert_eq!(mesh.index_count(), 32 * 32 * 6);
    }

    #[test]
    fn test_sphere_radius_and_normals() {
        let mesh = uv_sphere(0.5, 16, 12);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!((p.length() - 0.5).abs() < 1e-5);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_icosahedron_has_twenty_faces() {
        let faces = icosahedron_faces(&icosahedron_vertices());
        assert_eq!(faces.len(), 20);
    }

    #[test]
    fn test_dodecahedron_counts() {
        let mesh = dodecahedron(0.3);
        // 12 pentagons, 5 vertices each, 3 fan triangles each.
        assert_eq!(mesh.vertex_count(), 60);
        assert_eq!(mesh.index_count(), 12 * 3 * 3);
    }

    #[test]
    fn test_dodecahedron_circumradius() {
        let mesh = dodecahedron(0.3);
        for p in &mesh.positions {
            assert!((p.length() - 0.3).abs() < 1e-5);
        }
    }

    #[test]
    fn test_dodecahedron_faces_are_planar() {
        let mesh = dodecahedron(1.0);
        for face in 0..12 {
            let normal = mesh.normals[face * 5];
            let heights: Vec<f32> = (0..5)
                .map(|k| mesh.positions[face * 5 + k].dot(normal))
                .collect();
            for h in &heights {
                assert!((h - heights[0]).abs() < 1e-4);
            }
            // Faces point outward.
            assert!(heights[0] > 0.0);
        }
    }

    #[test]
    fn test_vertex_data_interleaves() {
        let mesh = uv_sphere(1.0, 4, 2);
        let data = mesh.vertex_data();
        assert_eq!(data.len(), mesh.vertex_count() * 6);
    }
}
