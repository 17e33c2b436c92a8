//! Renderer resources.
//!
//! Meshes, materials and lights are shared between the scene and the render
//! queue through `Arc` handles; identity of the handle is what the mesh
//! dispatcher compares when minimizing state changes.

mod light;
mod material;
mod mesh;
mod target;

pub use light::*;
pub use material::*;
pub use mesh::*;
pub use target::*;
