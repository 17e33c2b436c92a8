//! Scene-side draw requests.
//!
//! Scene code describes each draw with a [`MeshContext`] and submits it to
//! the renderer once per frame.

mod mesh_context;

pub use mesh_context::*;
