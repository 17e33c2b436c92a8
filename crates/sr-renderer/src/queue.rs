//! Per-frame render queue.
//!
//! Scene code submits mesh contexts and lights; the queue sorts them into
//! buckets and claims the lights for its renderer. At the end of every frame
//! the buckets are emptied and the lights released, so nothing carries over
//! into the next frame.

use std::sync::Arc;

use glam::Mat4;
use sr_core::MaterialType;
use thiserror::Error;

use crate::renderer::RendererId;
use crate::resources::{Light, Material, MaterialInstance, Mesh};
use crate::scene::{CullMode, FillMode, MeshContext};

/// Rejected submissions. The queue is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("Mesh context is invalid: {0}")]
    InvalidMeshContext(&'static str),

    #[error("Light is already locked to a renderer")]
    LightLocked,
}

/// Per-frame grouping of draw entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Drawn first, with a screen-space projection.
    ScreenSpace,
    /// Lit material without blending.
    OpaqueLit,
    /// Unlit material (blended or not).
    OpaqueUnlit,
    /// Lit material with blending, sorted back-to-front.
    TransparentLit,
}

/// A validated draw request.
#[derive(Debug, Clone)]
pub struct RenderQueueEntry {
    pub mesh: Arc<Mesh>,
    pub material: Arc<Material>,
    pub material_instance: Option<Arc<MaterialInstance>>,
    pub transform: Option<Mat4>,
    pub screen_space: bool,
    pub cull_mode: CullMode,
    pub fill_mode: FillMode,
}

impl RenderQueueEntry {
    /// Returns the bucket this entry belongs to.
    pub fn bucket(&self) -> Bucket {
        if self.screen_space {
            return Bucket::ScreenSpace;
        }
        match self.material.material_type() {
            MaterialType::Lit if self.material.blending() => Bucket::TransparentLit,
            MaterialType::Lit => Bucket::OpaqueLit,
            MaterialType::Unlit => Bucket::OpaqueUnlit,
        }
    }
}

impl TryFrom<MeshContext> for RenderQueueEntry {
    type Error = QueueError;

    fn try_from(ctx: MeshContext) -> Result<Self, Self::Error> {
        let mesh = ctx
            .mesh
            .ok_or(QueueError::InvalidMeshContext("missing mesh"))?;
        let material = ctx
            .material
            .ok_or(QueueError::InvalidMeshContext("missing material"))?;
        if let Some(instance) = &ctx.material_instance
            && !Arc::ptr_eq(instance.material(), &material)
        {
            return Err(QueueError::InvalidMeshContext(
                "material instance belongs to another material",
            ));
        }

        Ok(Self {
            mesh,
            material,
            material_instance: ctx.material_instance,
            transform: ctx.transform,
            screen_space: ctx.screen_space,
            cull_mode: ctx.cull_mode,
            fill_mode: ctx.fill_mode,
        })
    }
}

/// Draw entries and lights accumulated for one frame.
pub struct RenderQueue {
    owner: RendererId,
    screen_space: Vec<RenderQueueEntry>,
    opaque_lit: Vec<RenderQueueEntry>,
    opaque_unlit: Vec<RenderQueueEntry>,
    transparent_lit: Vec<RenderQueueEntry>,
    lights: Vec<Arc<Light>>,
}

impl RenderQueue {
    /// Creates an empty queue whose lights are claimed for `owner`.
    pub fn new(owner: RendererId) -> Self {
        Self {
            owner,
            screen_space: Vec::new(),
            opaque_lit: Vec::new(),
            opaque_unlit: Vec::new(),
            transparent_lit: Vec::new(),
            lights: Vec::new(),
        }
    }

    /// Returns the renderer this queue claims lights for.
    pub fn owner(&self) -> RendererId {
        self.owner
    }

    /// Queues a mesh context and returns the bucket it landed in.
    pub fn submit(&mut self, ctx: MeshContext) -> Result<Bucket, QueueError> {
        let entry = RenderQueueEntry::try_from(ctx).inspect_err(|e| {
            tracing::warn!("Rejected mesh submission: {}", e);
        })?;

        let bucket = entry.bucket();
        self.bucket_mut(bucket).push(entry);
        Ok(bucket)
    }

    /// Claims a light and queues it.
    pub fn submit_light(&mut self, light: &Arc<Light>) -> Result<(), QueueError> {
        if !light.try_lock(self.owner) {
            tracing::warn!(light = light.id().raw(), "Light is already locked to a renderer");
            return Err(QueueError::LightLocked);
        }
        self.lights.push(light.clone());
        Ok(())
    }

    /// Removes every entry drawing `mesh`, from all buckets.
    ///
    /// Returns the number of entries removed.
    pub fn remove_mesh(&mut self, mesh: &Mesh) -> usize {
        let before = self.len();
        for bucket in [
            &mut self.screen_space,
            &mut self.opaque_lit,
            &mut self.opaque_unlit,
            &mut self.transparent_lit,
        ] {
            bucket.retain(|entry| !std::ptr::eq(Arc::as_ptr(&entry.mesh), mesh));
        }
        before - self.len()
    }

    /// Removes a light from the queue and releases it.
    ///
    /// Returns true if the light was queued.
    pub fn remove_light(&mut self, light: &Light) -> bool {
        let before = self.lights.len();
        self.lights
            .retain(|queued| !std::ptr::eq(Arc::as_ptr(queued), light));
        let removed = self.lights.len() != before;
        if removed {
            light.unlock(self.owner);
        }
        removed
    }

    /// Empties all buckets and releases every queued light.
    pub fn clear(&mut self) {
        drop(self.take_frame());
    }

    /// Moves the queued contents out, leaving the queue empty.
    ///
    /// Lights stay claimed until the returned frame is dropped.
    pub fn take_frame(&mut self) -> QueuedFrame {
        QueuedFrame {
            owner: self.owner,
            screen_space: std::mem::take(&mut self.screen_space),
            opaque_lit: std::mem::take(&mut self.opaque_lit),
            opaque_unlit: std::mem::take(&mut self.opaque_unlit),
            transparent_lit: std::mem::take(&mut self.transparent_lit),
            lights: std::mem::take(&mut self.lights),
        }
    }

    /// Stably groups the opaque buckets by material, instance and mesh.
    ///
    /// The mesh dispatcher only exploits adjacency; calling this before
    /// rendering lets it skip more binds. The transparent bucket is left
    /// alone since it is depth sorted at render time.
    pub fn sort_by_material(&mut self) {
        for bucket in [
            &mut self.screen_space,
            &mut self.opaque_lit,
            &mut self.opaque_unlit,
        ] {
            bucket.sort_by_key(|entry| {
                (
                    entry.material.id(),
                    entry.material_instance.as_ref().map(|i| i.id()),
                    entry.mesh.handle(),
                )
            });
        }
    }

    /// Returns the entries of a bucket.
    pub fn bucket(&self, bucket: Bucket) -> &[RenderQueueEntry] {
        match bucket {
            Bucket::ScreenSpace => &self.screen_space,
            Bucket::OpaqueLit => &self.opaque_lit,
            Bucket::OpaqueUnlit => &self.opaque_unlit,
            Bucket::TransparentLit => &self.transparent_lit,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<RenderQueueEntry> {
        match bucket {
            Bucket::ScreenSpace => &mut self.screen_space,
            Bucket::OpaqueLit => &mut self.opaque_lit,
            Bucket::OpaqueUnlit => &mut self.opaque_unlit,
            Bucket::TransparentLit => &mut self.transparent_lit,
        }
    }

    /// Returns the queued lights.
    pub fn lights(&self) -> &[Arc<Light>] {
        &self.lights
    }

    /// Returns the number of queued lights.
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Returns the number of queued draw entries across all buckets.
    pub fn len(&self) -> usize {
        self.screen_space.len()
            + self.opaque_lit.len()
            + self.opaque_unlit.len()
            + self.transparent_lit.len()
    }

    /// Returns true if no draw entries and no lights are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.lights.is_empty()
    }
}

impl Drop for RenderQueue {
    fn drop(&mut self) {
        self.clear();
    }
}

/// The contents of a render queue for the frame being composited.
///
/// Dropping the frame releases every light it holds, whichever way the
/// frame ends.
pub struct QueuedFrame {
    owner: RendererId,
    pub screen_space: Vec<RenderQueueEntry>,
    pub opaque_lit: Vec<RenderQueueEntry>,
    pub opaque_unlit: Vec<RenderQueueEntry>,
    pub transparent_lit: Vec<RenderQueueEntry>,
    pub lights: Vec<Arc<Light>>,
}

impl Drop for QueuedFrame {
    fn drop(&mut self) {
        for light in &self.lights {
            light.unlock(self.owner);
        }
    }
}
