//! Sample Renderer Core Types
//!
//! Backend-independent value types shared by the renderer:
//! - Color: 8-bit RGBA colors for ambient, fog and clear state
//! - Projection: projection matrices handed to the backend
//! - Material: material descriptions and their canonical cache ordering

pub mod color;
pub mod material;
pub mod projection;

pub use color::*;
pub use material::*;
pub use projection::*;
