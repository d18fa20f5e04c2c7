//! 3D scene rendering.
//!
//! Meshes, camera, lighting, the per-draw constant block, and the renderer
//! that turns an ordered [`DrawList`] into one indexed draw call per item.

mod ctx;

pub mod camera;
pub mod draw;
pub mod lighting;
pub mod mesh;
pub mod uniforms;

mod scene_renderer;

pub use camera::Camera;
pub use ctx::{RenderCtx, RenderTarget};
pub use draw::{DrawItem, DrawList, RasterMode};
pub use lighting::Lighting;
pub use mesh::{GpuMesh, MeshData, Vertex};
pub use scene_renderer::SceneRenderer;
pub use uniforms::ObjectUniforms;
