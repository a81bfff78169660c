pub mod camera;
pub mod gpu;
pub mod scene;
pub mod texture;

pub use camera::OrbitCamera;
pub use gpu::GpuState;
pub use scene::FrameTransforms;
