//! Sample Renderer
//!
//! Render-queue compositing and multi-pass lighting over a pluggable
//! graphics backend.
//!
//! # Architecture
//!
//! - [`traits::RenderBackend`] - Capabilities a graphics driver implements
//! - [`queue::RenderQueue`] - Per-frame buckets of draws and claimed lights
//! - [`Renderer`] - Resource creation and frame compositing
//! - [`dispatch::render_meshes`] - Draws a bucket with minimal rebinding
//! - [`material_cache::MaterialCache`] - Shares materials between equal descriptions
//!
//! # Example
//!
//! ```ignore
//! use sr_renderer::{create_renderer, DriverType, MeshContext, MeshDesc, RendererDesc};
//!
//! let mut renderer = create_renderer(RendererDesc::new(DriverType::Null))?;
//! let mesh = renderer.create_mesh(&MeshDesc::indexed(24, 36))?;
//! let material = renderer.create_material(desc)?;
//!
//! // Queue draws and lights every frame
//! renderer.submit(MeshContext::new(mesh, material))?;
//! renderer.submit_light(&sun)?;
//!
//! // Render
//! let stats = renderer.render(&eye, &projection, None, false);
//! ```

// Core abstractions
pub mod backend;
pub mod queue;
pub mod resources;
pub mod scene;
pub mod traits;

pub mod config;
pub mod dispatch;
pub mod error;
pub mod material_cache;
pub mod profiling;
pub mod renderer;
pub mod screenshot;
pub mod sort;

// Re-exports for convenience
pub use backend::{DriverType, NullBackend, RecordingBackend, RendererDesc, create_renderer};
pub use config::{ConfigError, LightingMode, RendererConfig, TessellationParams};
pub use dispatch::DispatchStats;
pub use error::RendererError;
pub use material_cache::MaterialCache;
pub use profiling::{ProfilingSink, TracingProfiler};
pub use queue::{Bucket, QueueError, RenderQueue, RenderQueueEntry};
pub use renderer::*;
pub use screenshot::{ChannelLayout, ScreenshotError, format_screenshot};
pub use resources::*;
pub use scene::*;
pub use traits::{Pass, RenderBackend};
