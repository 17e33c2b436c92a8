//! The renderer: resource creation, scene submission and frame compositing.

mod frame;

pub use frame::{FramePath, FrameStats};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use sr_core::{Color, MaterialDesc};

use crate::config::{RendererConfig, TessellationParams};
use crate::error::RendererError;
use crate::material_cache::MaterialCache;
use crate::profiling::{ProfileZone, ProfilingSink};
use crate::queue::{Bucket, QueueError, RenderQueue};
use crate::resources::{Light, LightDesc, Material, Mesh, MeshDesc, RenderTarget};
use crate::scene::MeshContext;
use crate::traits::RenderBackend;

static NEXT_RENDERER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a renderer instance. Lights record it as their owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererId(u64);

impl RendererId {
    pub(crate) fn next() -> Self {
        Self(NEXT_RENDERER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id value. Never zero.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Returns the id for `value`, or `None` for zero.
    pub fn from_raw(value: u64) -> Option<Self> {
        (value != 0).then_some(Self(value))
    }
}

/// Composites queued meshes and lights into frames on one backend.
///
/// The backend is a type parameter so every call in the frame loop is
/// statically dispatched. [`crate::create_renderer`] returns a
/// `Renderer<Box<dyn RenderBackend>>` when the driver is chosen at runtime.
pub struct Renderer<B: RenderBackend> {
    id: RendererId,
    backend: B,
    config: RendererConfig,
    queue: RenderQueue,
    materials: MaterialCache,
    profiler: Option<Arc<dyn ProfilingSink>>,
}

impl<B: RenderBackend> Renderer<B> {
    /// Creates a renderer drawing through `backend`.
    ///
    /// Material caching is enabled only if the configuration asks for it and
    /// the backend's driver supports it.
    pub fn new(mut backend: B, mut config: RendererConfig) -> Self {
        let id = RendererId::next();
        let driver = backend.driver();

        config.ambient_color = config.ambient_color.opaque();
        let caching = config.enable_material_caching && driver.supports_material_caching();
        if config.enable_material_caching && !caching {
            tracing::info!("Material caching is not supported by {}", driver);
        }
        backend.set_clear_color(config.clear_color);
        backend.set_tessellation_params(&config.tessellation);

        tracing::info!(renderer = id.raw(), "Renderer created for {}", driver);
        Self {
            id,
            backend,
            config,
            queue: RenderQueue::new(id),
            materials: MaterialCache::new(caching),
            profiler: None,
        }
    }

    /// Reports frame phases to `profiler`.
    pub fn with_profiler(mut self, profiler: Arc<dyn ProfilingSink>) -> Self {
        self.profiler = Some(profiler);
        self
    }

    pub fn id(&self) -> RendererId {
        self.id
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Sets the ambient color of the first forward light pass.
    pub fn set_ambient_color(&mut self, color: Color) {
        self.config.ambient_color = color.opaque();
    }

    /// Sets the fog color and distance.
    pub fn set_fog(&mut self, color: Color, distance: f32) {
        self.config.fog_color = color;
        self.config.fog_distance = distance;
    }

    /// Sets the color frames are cleared to.
    pub fn set_clear_color(&mut self, color: Color) {
        self.config.clear_color = color;
        self.backend.set_clear_color(color);
    }

    /// Sets the tessellation parameters and hands them to the backend.
    pub fn set_tessellation_params(&mut self, params: TessellationParams) {
        tracing::debug!("{}", params);
        self.config.tessellation = params;
        self.backend.set_tessellation_params(&params);
    }

    /// Sets the light count above which frames are shaded deferred.
    pub fn set_deferred_threshold(&mut self, threshold: usize) {
        self.config.deferred_threshold = threshold;
    }

    pub fn queue(&self) -> &RenderQueue {
        &self.queue
    }

    /// Gives access to the queue, e.g. to group it by material before
    /// rendering.
    pub fn queue_mut(&mut self) -> &mut RenderQueue {
        &mut self.queue
    }

    pub fn material_cache(&self) -> &MaterialCache {
        &self.materials
    }

    /// Queues a mesh for the next frame.
    pub fn submit(&mut self, ctx: MeshContext) -> Result<Bucket, QueueError> {
        self.queue.submit(ctx)
    }

    /// Queues a light for the next frame, claiming it for this renderer.
    pub fn submit_light(&mut self, light: &Arc<Light>) -> Result<(), QueueError> {
        self.queue.submit_light(light)
    }

    /// Removes every queued draw of `mesh`.
    pub fn remove_mesh(&mut self, mesh: &Mesh) -> usize {
        self.queue.remove_mesh(mesh)
    }

    /// Removes a queued light and releases it.
    pub fn remove_light(&mut self, light: &Light) -> bool {
        self.queue.remove_light(light)
    }

    /// Creates a mesh on the backend.
    pub fn create_mesh(&mut self, desc: &MeshDesc) -> Result<Arc<Mesh>, RendererError> {
        desc.validate()?;
        let mesh = Mesh::new(desc);
        self.backend.create_mesh(&mesh).inspect_err(|e| {
            tracing::warn!("Failed to create mesh: {}", e);
        })?;
        tracing::debug!(mesh = mesh.handle().raw(), "Created mesh");
        Ok(Arc::new(mesh))
    }

    /// Retracts `mesh` from the queue and releases its backend resources.
    pub fn release_mesh(&mut self, mesh: Arc<Mesh>) {
        let retracted = self.queue.remove_mesh(&mesh);
        if retracted > 0 {
            tracing::debug!(mesh = mesh.handle().raw(), retracted, "Retracted released mesh");
        }
        self.backend.release_mesh(&mesh);
    }

    /// Returns a material for `desc`, sharing a cached one when possible.
    pub fn create_material(&mut self, desc: MaterialDesc) -> Result<Arc<Material>, RendererError> {
        if let Some(material) = self.materials.lookup(&desc) {
            return Ok(material);
        }

        desc.validate()?;
        let material = Arc::new(Material::new(desc));
        self.backend.create_material(&material).inspect_err(|e| {
            tracing::warn!("Failed to create material: {}", e);
        })?;
        self.materials.register(material.desc(), &material);

        tracing::debug!(material = material.id().raw(), "Created material");
        Ok(material)
    }

    /// Drops a material handle.
    ///
    /// Backend resources are destroyed when this was the last handle.
    /// Cached materials stay alive until [`Renderer::release_materials`].
    pub fn release_material(&mut self, material: Arc<Material>) {
        if let Some(material) = Arc::into_inner(material)
            && material.mark_released()
        {
            self.backend.release_material(&material);
            tracing::debug!(material = material.id().raw(), "Released material");
        }
    }

    /// Releases every cached material's backend resources.
    pub fn release_materials(&mut self) -> usize {
        self.materials.release_all(&mut self.backend)
    }

    /// Creates a light.
    pub fn create_light(&mut self, desc: LightDesc) -> Result<Arc<Light>, RendererError> {
        let light = Light::new(desc);
        self.backend.create_light(&light).inspect_err(|e| {
            tracing::warn!("Failed to create light: {}", e);
        })?;
        Ok(Arc::new(light))
    }

    /// Retracts `light` from the queue, releasing this renderer's claim.
    ///
    /// Backend resources are destroyed when this was the last handle.
    pub fn release_light(&mut self, light: Arc<Light>) {
        self.queue.remove_light(&light);
        if let Some(light) = Arc::into_inner(light) {
            self.backend.release_light(&light);
            tracing::debug!(light = light.id().raw(), "Released light");
        }
    }

    /// Creates an off-screen render target.
    pub fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
        has_depth: bool,
    ) -> Result<RenderTarget, RendererError> {
        if width == 0 || height == 0 {
            return Err(RendererError::InvalidTargetSize { width, height });
        }
        let target = RenderTarget::new(width, height, has_depth);
        self.backend.create_render_target(&target)?;
        Ok(target)
    }

    fn zone(&self, name: &'static str) -> ProfileZone {
        ProfileZone::enter(self.profiler.as_ref(), name)
    }
}

impl<B: RenderBackend> Drop for Renderer<B> {
    fn drop(&mut self) {
        self.queue.clear();
        self.materials.release_all(&mut self.backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCommand, DriverType, RecordingBackend};
    use glam::Vec3;
    use sr_core::MaterialType;

    fn renderer() -> Renderer<RecordingBackend> {
        Renderer::new(RecordingBackend::new(), RendererConfig::default())
    }

    fn lit(vs: &str) -> MaterialDesc {
        MaterialDesc::new(MaterialType::Lit, vs, "simple.fs")
    }

    #[test]
    fn test_renderer_ids() {
        let a = renderer();
        let b = renderer();
        assert_ne!(a.id(), b.id());
        assert_eq!(RendererId::from_raw(a.id().raw()), Some(a.id()));
        assert_eq!(RendererId::from_raw(0), None);
    }

    #[test]
    fn test_clear_color_forwarded() {
        let mut r = renderer();
        let defaults = RendererConfig::default();
        assert_eq!(
            r.backend().commands(),
            &[
                BackendCommand::SetClearColor(defaults.clear_color),
                BackendCommand::SetTessellationParams(defaults.tessellation),
            ]
        );
        r.set_clear_color(Color::WHITE);
        assert_eq!(
            r.backend().commands().last(),
            Some(&BackendCommand::SetClearColor(Color::WHITE))
        );
    }

    #[test]
    fn test_create_material_shares_equal_descriptions() {
        let mut r = renderer();
        let a = r.create_material(lit("simple.vs")).unwrap();
        let b = r.create_material(lit("SIMPLE.vs")).unwrap();
        let c = r.create_material(lit("other.vs")).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(r.material_cache().len(), 2);
        assert_eq!(
            r.backend()
                .count(|c| matches!(c, BackendCommand::CreateMaterial(_))),
            2
        );
    }

    #[test]
    fn test_caching_disabled_per_driver() {
        let mut r = Renderer::new(
            RecordingBackend::with_driver(DriverType::Gles2),
            RendererConfig::default(),
        );
        assert!(!r.material_cache().is_enabled());

        let a = r.create_material(lit("simple.vs")).unwrap();
        let b = r.create_material(lit("simple.vs")).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));

        let off = Renderer::new(
            RecordingBackend::new(),
            RendererConfig::default().with_material_caching(false),
        );
        assert!(!off.material_cache().is_enabled());
    }

    #[test]
    fn test_invalid_descriptions_rejected() {
        let mut r = renderer();
        assert!(matches!(
            r.create_material(MaterialDesc::new(MaterialType::Lit, "", "simple.fs")),
            Err(RendererError::InvalidMaterialDesc(_))
        ));
        assert!(matches!(
            r.create_mesh(&MeshDesc::new(0)),
            Err(RendererError::InvalidMeshDesc(_))
        ));
        assert_eq!(
            r.create_render_target(0, 128, true),
            Err(RendererError::InvalidTargetSize {
                width: 0,
                height: 128
            })
        );
        assert!(r.material_cache().is_empty());
    }

    #[test]
    fn test_backend_failures_propagate() {
        let mut r = renderer();
        r.backend_mut().set_fail_creation(true);

        assert!(matches!(
            r.create_mesh(&MeshDesc::new(3)),
            Err(RendererError::ResourceCreation { kind: "mesh", .. })
        ));
        assert!(matches!(
            r.create_material(lit("simple.vs")),
            Err(RendererError::ResourceCreation { .. })
        ));
        assert!(r.create_light(LightDesc::default()).is_err());
        assert!(r.create_render_target(64, 64, false).is_err());
        assert!(r.material_cache().is_empty());
    }

    #[test]
    fn test_release_mesh_retracts_from_queue() {
        let mut r = renderer();
        let mesh = r.create_mesh(&MeshDesc::new(3)).unwrap();
        let mat = r.create_material(lit("simple.vs")).unwrap();
        r.submit(MeshContext::new(mesh.clone(), mat.clone())).unwrap();
        r.submit(MeshContext::new(mesh.clone(), mat)).unwrap();

        let handle = mesh.handle();
        r.release_mesh(mesh);
        assert_eq!(r.queue().len(), 0);
        assert_eq!(
            r.backend().commands().last(),
            Some(&BackendCommand::ReleaseMesh(handle))
        );
    }

    #[test]
    fn test_release_material_last_handle() {
        let mut r = Renderer::new(
            RecordingBackend::new(),
            RendererConfig::default().with_material_caching(false),
        );
        let a = r.create_material(lit("simple.vs")).unwrap();
        let id = a.id();
        let extra = a.clone();

        r.release_material(a);
        assert_eq!(
            r.backend()
                .count(|c| matches!(c, BackendCommand::ReleaseMaterial(_))),
            0
        );

        r.release_material(extra);
        assert_eq!(
            r.backend().commands().last(),
            Some(&BackendCommand::ReleaseMaterial(id))
        );
    }

    #[test]
    fn test_cached_material_released_with_renderer() {
        let mut r = renderer();
        let a = r.create_material(lit("simple.vs")).unwrap();
        r.release_material(a);
        assert_eq!(
            r.backend()
                .count(|c| matches!(c, BackendCommand::ReleaseMaterial(_))),
            0
        );

        assert_eq!(r.release_materials(), 1);
        assert_eq!(r.material_cache().resident_count(), 0);
    }

    #[test]
    fn test_tessellation_params_forwarded() {
        let mut r = renderer();
        let params = TessellationParams {
            tess_factor: [2.0, 2.0, 1.0, 16.0],
            ..Default::default()
        };
        r.set_tessellation_params(params);
        assert_eq!(r.config().tessellation, params);
        assert_eq!(
            r.backend().commands().last(),
            Some(&BackendCommand::SetTessellationParams(params))
        );
    }

    #[test]
    fn test_material_released_once_after_cache_release() {
        let mut r = renderer();
        let a = r.create_material(lit("simple.vs")).unwrap();
        let id = a.id();

        assert_eq!(r.release_materials(), 1);
        assert!(a.is_released());
        r.release_material(a);
        assert_eq!(r.release_materials(), 0);

        assert_eq!(
            r.backend()
                .count(|c| *c == BackendCommand::ReleaseMaterial(id)),
            1
        );
    }

    #[test]
    fn test_release_light_frees_backend_resources() {
        let mut r = renderer();
        let light = r.create_light(LightDesc::point(Vec3::ZERO, 5.0)).unwrap();
        let id = light.id();
        r.submit_light(&light).unwrap();

        let extra = light.clone();
        r.release_light(light);
        assert!(!extra.is_locked());
        assert_eq!(
            r.backend()
                .count(|c| matches!(c, BackendCommand::ReleaseLight(_))),
            0
        );

        r.release_light(extra);
        assert_eq!(r.queue().light_count(), 0);
        assert_eq!(
            r.backend().commands().last(),
            Some(&BackendCommand::ReleaseLight(id))
        );
    }

    #[test]
    fn test_release_light_unlocks() {
        let mut r = renderer();
        let light = r.create_light(LightDesc::point(Vec3::ZERO, 5.0)).unwrap();
        r.submit_light(&light).unwrap();
        assert_eq!(light.owner(), Some(r.id()));

        r.release_light(light.clone());
        assert!(!light.is_locked());
        assert_eq!(r.queue().light_count(), 0);
    }

    #[test]
    fn test_dropping_renderer_releases_lights() {
        let light = Arc::new(Light::new(LightDesc::default()));
        {
            let mut r = renderer();
            r.submit_light(&light).unwrap();
            assert!(light.is_locked());
        }
        assert!(!light.is_locked());
    }

    #[test]
    fn test_light_claimed_by_one_renderer() {
        let mut a = renderer();
        let mut b = renderer();
        let light = a.create_light(LightDesc::default()).unwrap();

        a.submit_light(&light).unwrap();
        assert_eq!(b.submit_light(&light), Err(QueueError::LightLocked));
        assert!(a.remove_light(&light));
        assert!(b.submit_light(&light).is_ok());
    }
}
