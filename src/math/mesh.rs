use glam::Vec3;

/// Indexed triangle list. `indices` holds three entries per triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
}

const CUBE_VERTICES: [[f32; 3]; 8] = [
    [1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
];

const CUBE_INDICES: [u32; 36] = [
    1, 3, 0, //
    7, 5, 4, //
    4, 1, 0, //
    5, 2, 1, //
    2, 7, 3, //
    0, 7, 4, //
    1, 2, 3, //
    7, 6, 5, //
    4, 5, 1, //
    5, 6, 2, //
    2, 6, 7, //
    0, 3, 7,
];

impl TriangleMesh {
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        debug_assert_eq!(indices.len() % 3, 0);
        Self { vertices, indices }
    }

    /// The `[-1, 1]^3` cube, used as skybox geometry.
    pub fn cube() -> Self {
        Self::new(
            CUBE_VERTICES.iter().copied().map(Vec3::from_array).collect(),
            CUBE_INDICES.to_vec(),
        )
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[cfg(test)]
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_twelve_triangles_over_eight_corners() {
        let cube = TriangleMesh::cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertex_count()));
        for v in &cube.vertices {
            assert_eq!(v.abs(), Vec3::ONE);
        }
    }
}
