//! Core traits for the renderer system.
//!
//! This module defines the shading passes and the capability contract a
//! graphics backend implements for the frame compositor.

mod backend;
mod render_pass;

pub use backend::*;
pub use render_pass::*;
