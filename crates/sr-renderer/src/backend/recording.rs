//! Backend that records every call.

use glam::Mat4;
use sr_core::{Color, Projection};

use super::DriverType;
use crate::config::TessellationParams;
use crate::error::RendererError;
use crate::queue::RenderQueueEntry;
use crate::resources::{
    InstanceId, Light, LightId, LightUniform, Material, MaterialId, MaterialInstance, Mesh,
    MeshHandle, RenderTarget, TargetId,
};
use crate::scene::{CullMode, FillMode};
use crate::traits::{Pass, RenderBackend};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    SetClearColor(Color),
    SetTessellationParams(TessellationParams),
    BeginRender,
    EndRender,
    BindTarget(TargetId),
    UnbindTarget(TargetId),
    BindAmbient(Color),
    BindFog {
        color: Color,
        distance: f32,
    },
    BindViewProj {
        eye: Mat4,
        projection: Mat4,
    },
    BindDeferredState,
    BeginMultiPass,
    EndMultiPass,
    BeginTransparentMultiPass,
    EndTransparentMultiPass,
    BindMeshContext {
        mesh: MeshHandle,
        transform: Option<Mat4>,
        cull_mode: CullMode,
        fill_mode: FillMode,
    },
    BindMaterial {
        material: MaterialId,
        pass: Pass,
        instance: Option<InstanceId>,
        instanced: bool,
    },
    UnbindMaterial(MaterialId),
    BindMesh(MeshHandle),
    RenderMesh {
        mesh: MeshHandle,
        material: MaterialId,
    },
    UnbindMesh(MeshHandle),
    BindLight {
        light: LightId,
        slot: Option<u32>,
    },
    RenderDeferredLight(LightId),
    CreateMesh(MeshHandle),
    ReleaseMesh(MeshHandle),
    CreateMaterial(MaterialId),
    ReleaseMaterial(MaterialId),
    CreateLight(LightId),
    ReleaseLight(LightId),
    CreateRenderTarget(TargetId),
}

/// Records the calls the renderer makes, in order.
///
/// Frames can be made to fail `begin_render`, and resource creation can be
/// made to fail, to exercise the renderer's error paths.
#[derive(Debug)]
pub struct RecordingBackend {
    driver: DriverType,
    commands: Vec<BackendCommand>,
    light_uploads: Vec<LightUniform>,
    render_available: bool,
    fail_creation: bool,
}

impl RecordingBackend {
    /// Creates a recording backend reporting the null driver.
    pub fn new() -> Self {
        Self::with_driver(DriverType::Null)
    }

    /// Creates a recording backend reporting `driver`.
    pub fn with_driver(driver: DriverType) -> Self {
        Self {
            driver,
            commands: Vec::new(),
            light_uploads: Vec::new(),
            render_available: true,
            fail_creation: false,
        }
    }

    /// Makes `begin_render` return `available`.
    pub fn set_render_available(&mut self, available: bool) {
        self.render_available = available;
    }

    /// Makes every resource creation fail.
    pub fn set_fail_creation(&mut self, fail: bool) {
        self.fail_creation = fail;
    }

    /// Returns the recorded calls.
    pub fn commands(&self) -> &[BackendCommand] {
        &self.commands
    }

    /// Returns and clears the recorded calls.
    pub fn take_commands(&mut self) -> Vec<BackendCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Counts recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&BackendCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }

    /// Returns the light data uploaded by `bind_light`, in order.
    pub fn light_uploads(&self) -> &[LightUniform] {
        &self.light_uploads
    }

    fn create(&mut self, kind: &'static str, command: BackendCommand) -> Result<(), RendererError> {
        if self.fail_creation {
            return Err(RendererError::ResourceCreation {
                kind,
                reason: "creation disabled on recording backend".to_string(),
            });
        }
        self.commands.push(command);
        Ok(())
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for RecordingBackend {
    fn driver(&self) -> DriverType {
        self.driver
    }

    fn set_clear_color(&mut self, color: Color) {
        self.commands.push(BackendCommand::SetClearColor(color));
    }

    fn set_tessellation_params(&mut self, params: &TessellationParams) {
        self.commands
            .push(BackendCommand::SetTessellationParams(*params));
    }

    fn begin_render(&mut self) -> bool {
        if self.render_available {
            self.commands.push(BackendCommand::BeginRender);
        }
        self.render_available
    }

    fn end_render(&mut self) {
        self.commands.push(BackendCommand::EndRender);
    }

    fn bind_target(&mut self, target: &RenderTarget) {
        self.commands.push(BackendCommand::BindTarget(target.id()));
    }

    fn unbind_target(&mut self, target: &RenderTarget) {
        self.commands.push(BackendCommand::UnbindTarget(target.id()));
    }

    fn bind_ambient_state(&mut self, color: Color) {
        self.commands.push(BackendCommand::BindAmbient(color));
    }

    fn bind_fog_state(&mut self, color: Color, distance: f32) {
        self.commands.push(BackendCommand::BindFog { color, distance });
    }

    fn bind_view_proj(&mut self, eye: &Mat4, projection: &Projection) {
        self.commands.push(BackendCommand::BindViewProj {
            eye: *eye,
            projection: projection.matrix(),
        });
    }

    fn bind_deferred_state(&mut self) {
        self.commands.push(BackendCommand::BindDeferredState);
    }

    fn begin_multi_pass(&mut self) {
        self.commands.push(BackendCommand::BeginMultiPass);
    }

    fn end_multi_pass(&mut self) {
        self.commands.push(BackendCommand::EndMultiPass);
    }

    fn begin_transparent_multi_pass(&mut self) {
        self.commands.push(BackendCommand::BeginTransparentMultiPass);
    }

    fn end_transparent_multi_pass(&mut self) {
        self.commands.push(BackendCommand::EndTransparentMultiPass);
    }

    fn bind_mesh_context(&mut self, entry: &RenderQueueEntry) {
        self.commands.push(BackendCommand::BindMeshContext {
            mesh: entry.mesh.handle(),
            transform: entry.transform,
            cull_mode: entry.cull_mode,
            fill_mode: entry.fill_mode,
        });
    }

    fn bind_material(
        &mut self,
        material: &Material,
        pass: Pass,
        instance: Option<&MaterialInstance>,
        instanced: bool,
    ) {
        self.commands.push(BackendCommand::BindMaterial {
            material: material.id(),
            pass,
            instance: instance.map(MaterialInstance::id),
            instanced,
        });
    }

    fn unbind_material(&mut self, material: &Material) {
        self.commands
            .push(BackendCommand::UnbindMaterial(material.id()));
    }

    fn bind_mesh(&mut self, mesh: &Mesh) {
        self.commands.push(BackendCommand::BindMesh(mesh.handle()));
    }

    fn render_mesh(&mut self, mesh: &Mesh, material: &Material) {
        self.commands.push(BackendCommand::RenderMesh {
            mesh: mesh.handle(),
            material: material.id(),
        });
    }

    fn unbind_mesh(&mut self, mesh: &Mesh) {
        self.commands.push(BackendCommand::UnbindMesh(mesh.handle()));
    }

    fn bind_light(&mut self, light: &Light, slot: Option<u32>) {
        self.light_uploads.push(light.uniform(slot));
        self.commands.push(BackendCommand::BindLight {
            light: light.id(),
            slot,
        });
    }

    fn render_deferred_light(&mut self, light: &Light) {
        self.commands
            .push(BackendCommand::RenderDeferredLight(light.id()));
    }

    fn create_mesh(&mut self, mesh: &Mesh) -> Result<(), RendererError> {
        self.create("mesh", BackendCommand::CreateMesh(mesh.handle()))
    }

    fn release_mesh(&mut self, mesh: &Mesh) {
        self.commands.push(BackendCommand::ReleaseMesh(mesh.handle()));
    }

    fn create_material(&mut self, material: &Material) -> Result<(), RendererError> {
        self.create("material", BackendCommand::CreateMaterial(material.id()))
    }

    fn release_material(&mut self, material: &Material) {
        self.commands
            .push(BackendCommand::ReleaseMaterial(material.id()));
    }

    fn create_light(&mut self, light: &Light) -> Result<(), RendererError> {
        self.create("light", BackendCommand::CreateLight(light.id()))
    }

    fn release_light(&mut self, light: &Light) {
        self.commands.push(BackendCommand::ReleaseLight(light.id()));
    }

    fn create_render_target(&mut self, target: &RenderTarget) -> Result<(), RendererError> {
        self.create(
            "render target",
            BackendCommand::CreateRenderTarget(target.id()),
        )
    }
}
