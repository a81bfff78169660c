pub mod icosphere;
pub mod mesh;

pub use icosphere::icosphere;
pub use mesh::TriangleMesh;
