//! RenderBackend trait definition.

use glam::Mat4;
use sr_core::{Color, Projection};

use super::Pass;
use crate::backend::DriverType;
use crate::config::TessellationParams;
use crate::error::RendererError;
use crate::queue::RenderQueueEntry;
use crate::resources::{Light, Material, MaterialInstance, Mesh, RenderTarget};

/// Capabilities the frame compositor requires from a graphics backend.
///
/// One implementation exists per driver. A [`crate::Renderer`] is generic
/// over its backend, so the implementation is chosen once per renderer
/// instead of per draw call.
///
/// # Call order
///
/// Within a frame the compositor calls `bind_target`, `begin_render`, then
/// state binds and mesh dispatch, then `end_render` and `unbind_target`.
/// During dispatch `bind_mesh_context` always precedes the material bind of
/// the same entry, since material binds may read device state the context
/// sets up (e.g. two-sided lighting from the cull mode).
pub trait RenderBackend: Send {
    /// Returns the driver this backend talks to.
    fn driver(&self) -> DriverType;

    /// Sets the color frames are cleared to.
    fn set_clear_color(&mut self, _color: Color) {}

    /// Sets the parameters used by materials with hull and domain shaders.
    fn set_tessellation_params(&mut self, _params: &TessellationParams) {}

    /// Starts drawing. Returning `false` skips all draw work for the frame.
    fn begin_render(&mut self) -> bool;

    /// Finishes drawing started by a successful `begin_render`.
    fn end_render(&mut self);

    /// Redirects output to an off-screen target.
    fn bind_target(&mut self, target: &RenderTarget);

    /// Restores the default output.
    fn unbind_target(&mut self, target: &RenderTarget);

    /// Sets the ambient light color.
    fn bind_ambient_state(&mut self, color: Color);

    /// Sets fog color and distance.
    fn bind_fog_state(&mut self, color: Color, distance: f32);

    /// Sets the camera transform and projection.
    fn bind_view_proj(&mut self, eye: &Mat4, projection: &Projection);

    /// Switches to deferred geometry output.
    fn bind_deferred_state(&mut self);

    /// Starts additive accumulation of extra lights on opaque geometry.
    fn begin_multi_pass(&mut self);

    /// Ends the opaque multi-pass block.
    fn end_multi_pass(&mut self);

    /// Starts accumulation of extra lights on already-blended geometry.
    fn begin_transparent_multi_pass(&mut self);

    /// Ends the transparent multi-pass block.
    fn end_transparent_multi_pass(&mut self);

    /// Binds per-draw state: world transform, cull and fill mode.
    fn bind_mesh_context(&mut self, entry: &RenderQueueEntry);

    /// Binds a material's shader variant for `pass`.
    fn bind_material(
        &mut self,
        material: &Material,
        pass: Pass,
        instance: Option<&MaterialInstance>,
        instanced: bool,
    );

    /// Unbinds a previously bound material.
    fn unbind_material(&mut self, material: &Material);

    /// Binds mesh vertex and index data.
    fn bind_mesh(&mut self, mesh: &Mesh);

    /// Issues the draw call for a bound mesh.
    fn render_mesh(&mut self, mesh: &Mesh, material: &Material);

    /// Unbinds a previously bound mesh.
    fn unbind_mesh(&mut self, mesh: &Mesh);

    /// Binds a light. `slot` is the light's index in single-pass lighting,
    /// `None` when lights are accumulated one pass at a time.
    fn bind_light(&mut self, light: &Light, slot: Option<u32>);

    /// Accumulates one light over the deferred geometry buffers.
    fn render_deferred_light(&mut self, light: &Light);

    /// Creates backend resources for a mesh.
    fn create_mesh(&mut self, mesh: &Mesh) -> Result<(), RendererError>;

    /// Releases backend resources of a mesh.
    fn release_mesh(&mut self, _mesh: &Mesh) {}

    /// Compiles and links a material.
    fn create_material(&mut self, material: &Material) -> Result<(), RendererError>;

    /// Releases backend resources of a material.
    fn release_material(&mut self, _material: &Material) {}

    /// Creates backend resources for a light (e.g. a shadow map).
    fn create_light(&mut self, _light: &Light) -> Result<(), RendererError> {
        Ok(())
    }

    /// Releases backend resources of a light.
    fn release_light(&mut self, _light: &Light) {}

    /// Creates an off-screen render target.
    fn create_render_target(&mut self, target: &RenderTarget) -> Result<(), RendererError>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn driver(&self) -> DriverType {
        (**self).driver()
    }

    fn set_clear_color(&mut self, color: Color) {
        (**self).set_clear_color(color)
    }

    fn set_tessellation_params(&mut self, params: &TessellationParams) {
        (**self).set_tessellation_params(params)
    }

    fn begin_render(&mut self) -> bool {
        (**self).begin_render()
    }

    fn end_render(&mut self) {
        (**self).end_render()
    }

    fn bind_target(&mut self, target: &RenderTarget) {
        (**self).bind_target(target)
    }

    fn unbind_target(&mut self, target: &RenderTarget) {
        (**self).unbind_target(target)
    }

    fn bind_ambient_state(&mut self, color: Color) {
        (**self).bind_ambient_state(color)
    }

    fn bind_fog_state(&mut self, color: Color, distance: f32) {
        (**self).bind_fog_state(color, distance)
    }

    fn bind_view_proj(&mut self, eye: &Mat4, projection: &Projection) {
        (**self).bind_view_proj(eye, projection)
    }

    fn bind_deferred_state(&mut self) {
        (**self).bind_deferred_state()
    }

    fn begin_multi_pass(&mut self) {
        (**self).begin_multi_pass()
    }

    fn end_multi_pass(&mut self) {
        (**self).end_multi_pass()
    }

    fn begin_transparent_multi_pass(&mut self) {
        (**self).begin_transparent_multi_pass()
    }

    fn end_transparent_multi_pass(&mut self) {
        (**self).end_transparent_multi_pass()
    }

    fn bind_mesh_context(&mut self, entry: &RenderQueueEntry) {
        (**self).bind_mesh_context(entry)
    }

    fn bind_material(
        &mut self,
        material: &Material,
        pass: Pass,
        instance: Option<&MaterialInstance>,
        instanced: bool,
    ) {
        (**self).bind_material(material, pass, instance, instanced)
    }

    fn unbind_material(&mut self, material: &Material) {
        (**self).unbind_material(material)
    }

    fn bind_mesh(&mut self, mesh: &Mesh) {
        (**self).bind_mesh(mesh)
    }

    fn render_mesh(&mut self, mesh: &Mesh, material: &Material) {
        (**self).render_mesh(mesh, material)
    }

    fn unbind_mesh(&mut self, mesh: &Mesh) {
        (**self).unbind_mesh(mesh)
    }

    fn bind_light(&mut self, light: &Light, slot: Option<u32>) {
        (**self).bind_light(light, slot)
    }

    fn render_deferred_light(&mut self, light: &Light) {
        (**self).render_deferred_light(light)
    }

    fn create_mesh(&mut self, mesh: &Mesh) -> Result<(), RendererError> {
        (**self).create_mesh(mesh)
    }

    fn release_mesh(&mut self, mesh: &Mesh) {
        (**self).release_mesh(mesh)
    }

    fn create_material(&mut self, material: &Material) -> Result<(), RendererError> {
        (**self).create_material(material)
    }

    fn release_material(&mut self, material: &Material) {
        (**self).release_material(material)
    }

    fn create_light(&mut self, light: &Light) -> Result<(), RendererError> {
        (**self).create_light(light)
    }

    fn release_light(&mut self, light: &Light) {
        (**self).release_light(light)
    }

    fn create_render_target(&mut self, target: &RenderTarget) -> Result<(), RendererError> {
        (**self).create_render_target(target)
    }
}
