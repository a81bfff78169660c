//! Icosphere generation by recursive midpoint subdivision of an icosahedron.
//!
//! Every subdivision pass splits each triangle into four and pushes the new
//! edge midpoints back onto the unit sphere. Midpoints are shared between the
//! two triangles adjacent to an edge, so a closed mesh stays closed and
//! `V = F / 2 + 2` holds after every pass.

use std::collections::HashMap;

use glam::Vec3;

use super::mesh::TriangleMesh;

const ICOSAHEDRON_INDICES: [u32; 60] = [
    0, 1, 2, //
    1, 0, 5, //
    0, 2, 3, //
    0, 3, 4, //
    0, 4, 5, //
    1, 5, 10, //
    2, 1, 6, //
    3, 2, 7, //
    4, 3, 8, //
    5, 4, 9, //
    1, 10, 6, //
    2, 6, 7, //
    3, 7, 8, //
    4, 8, 9, //
    5, 9, 10, //
    6, 10, 11, //
    7, 6, 11, //
    8, 7, 11, //
    9, 8, 11, //
    10, 9, 11,
];

/// Undirected edge between two vertex indices, stored smaller index first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct EdgeKey(u32, u32);

impl EdgeKey {
    fn new(a: u32, b: u32) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

/// Regular icosahedron inscribed in the unit sphere.
///
/// Vertex 0 is the south pole and vertex 11 the north pole (on the Y axis).
/// Vertices 1..=5 form the lower ring at `y = -1/sqrt(5)`, 6..=10 the upper
/// ring, rotated by 36 degrees against the lower one. Faces are wound
/// counter-clockwise seen from outside.
pub fn icosahedron() -> TriangleMesh {
    let ring_y = 1.0 / 5.0_f32.sqrt();
    let ring_radius = 2.0 * ring_y;
    let ring = |y: f32, first_angle_deg: f32| {
        (0..5).map(move |i| {
            let angle = (first_angle_deg + 72.0 * i as f32).to_radians();
            Vec3::new(ring_radius * angle.cos(), y, ring_radius * angle.sin()).normalize()
        })
    };

    let mut vertices = Vec::with_capacity(12);
    vertices.push(Vec3::NEG_Y);
    vertices.extend(ring(-ring_y, 36.0));
    vertices.extend(ring(ring_y, 72.0));
    vertices.push(Vec3::Y);

    TriangleMesh::new(vertices, ICOSAHEDRON_INDICES.to_vec())
}

/// Base icosahedron subdivided `subdivisions` times.
pub fn icosphere(subdivisions: u32) -> TriangleMesh {
    (0..subdivisions).fold(icosahedron(), |mesh, _| subdivide(mesh))
}

/// Splits every triangle of `mesh` into four.
///
/// Existing vertices keep their indices; new midpoints are appended in the
/// order their edges are first visited. The returned index list is exactly
/// four times as long as the input one.
pub fn subdivide(mesh: TriangleMesh) -> TriangleMesh {
    let TriangleMesh {
        mut vertices,
        indices,
    } = mesh;

    // A closed triangle mesh has 3F/2 edges.
    let edge_estimate = indices.len() / 2;
    let mut midpoints: HashMap<EdgeKey, u32> = HashMap::with_capacity(edge_estimate);
    vertices.reserve(edge_estimate);

    let mut midpoint = |a: u32, b: u32, vertices: &mut Vec<Vec3>| -> u32 {
        *midpoints.entry(EdgeKey::new(a, b)).or_insert_with(|| {
            let position = (vertices[a as usize] + vertices[b as usize]).normalize();
            vertices.push(position);
            (vertices.len() - 1) as u32
        })
    };

    let mut subdivided = Vec::with_capacity(indices.len() * 4);
    for tri in indices.chunks_exact(3) {
        let mids = [
            midpoint(tri[0], tri[1], &mut vertices),
            midpoint(tri[1], tri[2], &mut vertices),
            midpoint(tri[2], tri[0], &mut vertices),
        ];

        for corner in 0..3 {
            subdivided.extend_from_slice(&[tri[corner], mids[corner], mids[(corner + 2) % 3]]);
        }
        subdivided.extend_from_slice(&mids);
    }

    TriangleMesh::new(vertices, subdivided)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn unique_edges(mesh: &TriangleMesh) -> usize {
        mesh.triangles()
            .flat_map(|[a, b, c]| [EdgeKey::new(a, b), EdgeKey::new(b, c), EdgeKey::new(c, a)])
            .collect::<HashSet<_>>()
            .len()
    }

    #[test]
    fn icosahedron_is_twelve_vertices_twenty_faces() {
        let mesh = icosahedron();
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 20);
        assert_eq!(unique_edges(&mesh), 30);
    }

    #[test]
    fn face_and_vertex_counts_per_level() {
        for (level, vertices, faces) in [(0, 12, 20), (1, 42, 80), (2, 162, 320), (4, 2562, 5120)] {
            let mesh = icosphere(level);
            assert_eq!(mesh.vertex_count(), vertices, "level {level}");
            assert_eq!(mesh.triangle_count(), faces, "level {level}");
            assert_eq!(mesh.vertex_count(), mesh.triangle_count() / 2 + 2);
        }
    }

    #[test]
    fn all_vertices_on_unit_sphere() {
        let mesh = icosphere(4);
        for v in &mesh.vertices {
            assert!((v.length() - 1.0).abs() < 1e-5, "{v} has length {}", v.length());
        }
    }

    #[test]
    fn one_midpoint_per_unique_edge() {
        let mut mesh = icosahedron();
        for _ in 0..3 {
            let expected = mesh.vertex_count() + unique_edges(&mesh);
            mesh = subdivide(mesh);
            assert_eq!(mesh.vertex_count(), expected);
        }
    }

    #[test]
    fn triangles_reference_distinct_valid_vertices() {
        let mesh = icosphere(3);
        for [a, b, c] in mesh.triangles() {
            assert!(a != b && b != c && c != a);
            assert!([a, b, c].iter().all(|&i| (i as usize) < mesh.vertex_count()));
        }
    }

    #[test]
    fn existing_vertices_keep_their_indices() {
        let before = icosphere(1);
        let after = subdivide(before.clone());
        assert_eq!(&after.vertices[..before.vertex_count()], &before.vertices[..]);
        assert_eq!(after.indices.len(), before.indices.len() * 4);
    }

    #[test]
    fn next_level_adds_the_projected_edge_midpoints() {
        let coarse = icosphere(1);
        let fine = icosphere(2);
        assert_eq!(&fine.vertices[..coarse.vertex_count()], &coarse.vertices[..]);

        let mut expected: Vec<Vec3> = coarse
            .triangles()
            .flat_map(|[a, b, c]| [EdgeKey::new(a, b), EdgeKey::new(b, c), EdgeKey::new(c, a)])
            .collect::<HashSet<_>>()
            .into_iter()
            .map(|EdgeKey(a, b)| {
                (coarse.vertices[a as usize] + coarse.vertices[b as usize]).normalize()
            })
            .collect();
        let mut added = fine.vertices[coarse.vertex_count()..].to_vec();

        let by_coords = |p: &Vec3, q: &Vec3| p.to_array().partial_cmp(&q.to_array()).unwrap();
        expected.sort_by(by_coords);
        added.sort_by(by_coords);
        assert_eq!(added.len(), expected.len());
        for (got, want) in added.iter().zip(&expected) {
            assert!(got.abs_diff_eq(*want, 1e-6), "{got} != {want}");
        }
    }

    #[test]
    fn edge_key_ignores_direction() {
        assert_eq!(EdgeKey::new(7, 3), EdgeKey::new(3, 7));
        assert_eq!(EdgeKey::new(3, 7), EdgeKey(3, 7));
    }

    #[test]
    fn faces_stay_outward_facing() {
        for mesh in [icosahedron(), icosphere(3)] {
            for [a, b, c] in mesh.triangles() {
                let (a, b, c) = (
                    mesh.vertices[a as usize],
                    mesh.vertices[b as usize],
                    mesh.vertices[c as usize],
                );
                let normal = (b - a).cross(c - a);
                assert!(normal.dot(a + b + c) > 0.0);
            }
        }
    }
}
