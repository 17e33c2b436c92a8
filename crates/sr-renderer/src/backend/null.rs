//! Backend that draws nothing.

use glam::Mat4;
use sr_core::{Color, Projection};

use super::DriverType;
use crate::error::RendererError;
use crate::queue::RenderQueueEntry;
use crate::resources::{Light, Material, MaterialInstance, Mesh, RenderTarget};
use crate::traits::{Pass, RenderBackend};

/// Accepts every call. Resource creation always succeeds.
#[derive(Debug, Default)]
pub struct NullBackend {
    frames: u64,
}

impl NullBackend {
    /// Creates a null backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of frames begun.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderBackend for NullBackend {
    fn driver(&self) -> DriverType {
        DriverType::Null
    }

    fn begin_render(&mut self) -> bool {
        self.frames += 1;
        true
    }

    fn end_render(&mut self) {}
    fn bind_target(&mut self, _target: &RenderTarget) {}
    fn unbind_target(&mut self, _target: &RenderTarget) {}
    fn bind_ambient_state(&mut self, _color: Color) {}
    fn bind_fog_state(&mut self, _color: Color, _distance: f32) {}
    fn bind_view_proj(&mut self, _eye: &Mat4, _projection: &Projection) {}
    fn bind_deferred_state(&mut self) {}
    fn begin_multi_pass(&mut self) {}
    fn end_multi_pass(&mut self) {}
    fn begin_transparent_multi_pass(&mut self) {}
    fn end_transparent_multi_pass(&mut self) {}
    fn bind_mesh_context(&mut self, _entry: &RenderQueueEntry) {}

    fn bind_material(
        &mut self,
        _material: &Material,
        _pass: Pass,
        _instance: Option<&MaterialInstance>,
        _instanced: bool,
    ) {
    }

    fn unbind_material(&mut self, _material: &Material) {}
    fn bind_mesh(&mut self, _mesh: &Mesh) {}
    fn render_mesh(&mut self, _mesh: &Mesh, _material: &Material) {}
    fn unbind_mesh(&mut self, _mesh: &Mesh) {}
    fn bind_light(&mut self, _light: &Light, _slot: Option<u32>) {}
    fn render_deferred_light(&mut self, _light: &Light) {}

    fn create_mesh(&mut self, _mesh: &Mesh) -> Result<(), RendererError> {
        Ok(())
    }

    fn create_material(&mut self, _material: &Material) -> Result<(), RendererError> {
        Ok(())
    }

    fn create_render_target(&mut self, _target: &RenderTarget) -> Result<(), RendererError> {
        Ok(())
    }
}
