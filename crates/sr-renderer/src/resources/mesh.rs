//! Mesh resources.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::error::RendererError;

static NEXT_MESH_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Handle identifying a mesh on the backend.
///
/// Handles are lightweight and can be copied freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MeshHandle(u64);

impl MeshHandle {
    /// Returns the raw handle value.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Creates a handle from a raw value.
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    fn next() -> Self {
        Self(NEXT_MESH_HANDLE.fetch_add(1, Ordering::Relaxed))
    }
}

/// Primitive topology of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Primitive {
    Points,
    Lines,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
}

/// Description of a mesh to create on the backend.
#[derive(Debug, Clone, Default)]
pub struct MeshDesc {
    /// Primitive topology.
    pub primitive: Primitive,
    /// Number of vertices.
    pub vertex_count: u32,
    /// Number of indices, or `None` for non-indexed drawing.
    pub index_count: Option<u32>,
    /// Initial instance count, or `None` for non-instanced drawing.
    pub instance_count: Option<u32>,
}

impl MeshDesc {
    /// Creates a non-indexed triangle mesh description.
    pub fn new(vertex_count: u32) -> Self {
        Self {
            vertex_count,
            ..Default::default()
        }
    }

    /// Creates an indexed triangle mesh description.
    pub fn indexed(vertex_count: u32, index_count: u32) -> Self {
        Self {
            vertex_count,
            index_count: Some(index_count),
            ..Default::default()
        }
    }

    /// Sets the primitive topology.
    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitive = primitive;
        self
    }

    /// Makes the mesh instanced with the given initial instance count.
    pub fn with_instances(mut self, count: u32) -> Self {
        self.instance_count = Some(count);
        self
    }

    /// Checks that the description can be handed to a backend.
    pub fn validate(&self) -> Result<(), RendererError> {
        if self.vertex_count == 0 {
            return Err(RendererError::InvalidMeshDesc(
                "mesh has no vertices".to_string(),
            ));
        }
        if self.index_count == Some(0) {
            return Err(RendererError::InvalidMeshDesc(
                "indexed mesh has no indices".to_string(),
            ));
        }
        Ok(())
    }
}

/// A mesh whose vertex and index data live on the backend.
#[derive(Debug)]
pub struct Mesh {
    handle: MeshHandle,
    primitive: Primitive,
    vertex_count: u32,
    index_count: Option<u32>,
    instance_count: Option<AtomicU32>,
}

impl Mesh {
    pub(crate) fn new(desc: &MeshDesc) -> Self {
        Self {
            handle: MeshHandle::next(),
            primitive: desc.primitive,
            vertex_count: desc.vertex_count,
            index_count: desc.index_count,
            instance_count: desc.instance_count.map(AtomicU32::new),
        }
    }

    /// Returns the backend handle.
    pub fn handle(&self) -> MeshHandle {
        self.handle
    }

    /// Returns the primitive topology.
    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Returns the number of indices, if indexed.
    pub fn index_count(&self) -> Option<u32> {
        self.index_count
    }

    /// Returns true if this mesh uses indexed drawing.
    pub fn is_indexed(&self) -> bool {
        self.index_count.is_some()
    }

    /// Returns true if this mesh is drawn from an instance buffer.
    pub fn is_instanced(&self) -> bool {
        self.instance_count.is_some()
    }

    /// Returns the current instance count, if instanced.
    pub fn instance_count(&self) -> Option<u32> {
        self.instance_count
            .as_ref()
            .map(|count| count.load(Ordering::Relaxed))
    }

    /// Updates the number of live instances. Ignored for non-instanced meshes.
    pub fn set_instance_count(&self, count: u32) {
        if let Some(current) = &self.instance_count {
            current.store(count, Ordering::Relaxed);
        }
    }

    /// Returns true if drawing this mesh would produce any primitives.
    pub fn will_render(&self) -> bool {
        self.vertex_count > 0
            && self.index_count != Some(0)
            && self.instance_count() != Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desc_validation() {
        assert!(MeshDesc::new(3).validate().is_ok());
        assert!(MeshDesc::indexed(4, 6).validate().is_ok());
        assert!(matches!(
            MeshDesc::new(0).validate(),
            Err(RendererError::InvalidMeshDesc(_))
        ));
        assert!(matches!(
            MeshDesc::indexed(4, 0).validate(),
            Err(RendererError::InvalidMeshDesc(_))
        ));
    }

    #[test]
    fn test_handles_are_unique() {
        let a = Mesh::new(&MeshDesc::new(3));
        let b = Mesh::new(&MeshDesc::new(3));
        assert_ne!(a.handle(), b.handle());
    }

    #[test]
    fn test_instanced_mesh_with_no_instances_is_skipped() {
        let mesh = Mesh::new(&MeshDesc::new(3).with_instances(4));
        assert!(mesh.is_instanced());
        assert!(mesh.will_render());

        mesh.set_instance_count(0);
        assert!(!mesh.will_render());
    }

    #[test]
    fn test_set_instance_count_ignored_when_not_instanced() {
        let mesh = Mesh::new(&MeshDesc::indexed(4, 6));
        mesh.set_instance_count(0);
        assert_eq!(mesh.instance_count(), None);
        assert!(mesh.will_render());
    }
}
