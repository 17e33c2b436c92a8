//! Mesh context definition.

use std::sync::Arc;

use glam::Mat4;

use crate::resources::{Material, MaterialInstance, Mesh};

/// Face culling mode for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    #[default]
    Clockwise,
    CounterClockwise,
    None,
}

/// Polygon fill mode for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    #[default]
    Solid,
    Line,
    Point,
}

/// A draw request for one frame.
///
/// The context references a mesh and a material owned by the scene. A
/// context without a mesh or without a material is invalid and is rejected
/// when submitted.
#[derive(Debug, Clone, Default)]
pub struct MeshContext {
    /// Mesh to draw.
    pub mesh: Option<Arc<Mesh>>,

    /// Material to draw with.
    pub material: Option<Arc<Material>>,

    /// Per-mesh parameters; must belong to `material`.
    pub material_instance: Option<Arc<MaterialInstance>>,

    /// World transform. `None` draws without a position, which also
    /// places the draw first among transparent geometry.
    pub transform: Option<Mat4>,

    /// Whether the mesh is drawn in screen space before the scene.
    pub screen_space: bool,

    /// Face culling mode.
    pub cull_mode: CullMode,

    /// Polygon fill mode.
    pub fill_mode: FillMode,
}

impl MeshContext {
    /// Creates a context drawing `mesh` with `material`.
    pub fn new(mesh: Arc<Mesh>, material: Arc<Material>) -> Self {
        Self {
            mesh: Some(mesh),
            material: Some(material),
            ..Default::default()
        }
    }

    /// Creates a context drawing `mesh` with a material instance and its material.
    pub fn with_material_instance(mesh: Arc<Mesh>, instance: Arc<MaterialInstance>) -> Self {
        Self {
            mesh: Some(mesh),
            material: Some(instance.material().clone()),
            material_instance: Some(instance),
            ..Default::default()
        }
    }

    /// Sets the world transform.
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Marks the draw as screen space.
    pub fn with_screen_space(mut self, screen_space: bool) -> Self {
        self.screen_space = screen_space;
        self
    }

    /// Sets the cull mode.
    pub fn with_cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    /// Sets the fill mode.
    pub fn with_fill_mode(mut self, fill_mode: FillMode) -> Self {
        self.fill_mode = fill_mode;
        self
    }

    /// Returns true if the context can be queued.
    pub fn is_valid(&self) -> bool {
        match (&self.mesh, &self.material, &self.material_instance) {
            (Some(_), Some(material), Some(instance)) => Arc::ptr_eq(material, instance.material()),
            (Some(_), Some(_), None) => true,
            _ => false,
        }
    }
}
