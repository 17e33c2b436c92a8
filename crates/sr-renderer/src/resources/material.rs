//! Materials and material instances.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use glam::{Mat4, Vec2, Vec3, Vec4};
use sr_core::{Color, MaterialDesc, MaterialType};

static NEXT_MATERIAL_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a material on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(u64);

impl MaterialId {
    /// Returns the raw id value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Identifier of a material instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Returns the raw id value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A compiled material: shader programs plus blend and alpha-test state.
///
/// Materials are shared through `Arc`. The material cache holds one
/// reference per cached description; every lookup hands out another.
/// Backend resources are released at most once, whichever of the cache
/// or the last handle gets there first.
#[derive(Debug)]
pub struct Material {
    id: MaterialId,
    desc: MaterialDesc,
    released: AtomicBool,
}

impl Material {
    pub(crate) fn new(desc: MaterialDesc) -> Self {
        Self {
            id: MaterialId(NEXT_MATERIAL_ID.fetch_add(1, Ordering::Relaxed)),
            desc,
            released: AtomicBool::new(false),
        }
    }

    /// Returns the backend id.
    pub fn id(&self) -> MaterialId {
        self.id
    }

    /// Returns the description this material was built from.
    pub fn desc(&self) -> &MaterialDesc {
        &self.desc
    }

    /// Returns the material type.
    pub fn material_type(&self) -> MaterialType {
        self.desc.material_type
    }

    /// Returns true if the material blends with the framebuffer.
    pub fn blending(&self) -> bool {
        self.desc.blending
    }

    /// Returns true once the backend resources have been released.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Marks the backend resources released. Returns false if they already were.
    pub(crate) fn mark_released(&self) -> bool {
        !self.released.swap(true, Ordering::AcqRel)
    }
}

/// Value of a material parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialParam {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    Color(Color),
}

/// Per-mesh parameterization of a shared material.
#[derive(Debug, Clone)]
pub struct MaterialInstance {
    id: InstanceId,
    material: Arc<Material>,
    params: Vec<(String, MaterialParam)>,
}

impl MaterialInstance {
    /// Creates an instance with no parameters set.
    pub fn new(material: Arc<Material>) -> Self {
        Self {
            id: InstanceId(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)),
            material,
            params: Vec::new(),
        }
    }

    /// Returns the instance id.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Returns the material this instance parameterizes.
    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// Sets a parameter, replacing any previous value with the same name.
    pub fn set(&mut self, name: impl Into<String>, value: MaterialParam) {
        let name = name.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.params.push((name, value)),
        }
    }

    /// Sets a parameter (builder form).
    pub fn with(mut self, name: impl Into<String>, value: MaterialParam) -> Self {
        self.set(name, value);
        self
    }

    /// Gets a parameter by name.
    pub fn get(&self, name: &str) -> Option<&MaterialParam> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Returns all parameters in the order they were first set.
    pub fn params(&self) -> &[(String, MaterialParam)] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material() -> Arc<Material> {
        Arc::new(Material::new(MaterialDesc::new(
            MaterialType::Lit,
            "simple.vs",
            "simple.fs",
        )))
    }

    #[test]
    fn test_instance_params() {
        let mut instance = MaterialInstance::new(material())
            .with("diffuseColor", MaterialParam::Color(Color::WHITE));
        instance.set("shininess", MaterialParam::Float(8.0));
        instance.set("diffuseColor", MaterialParam::Color(Color::BLACK));

        assert_eq!(instance.params().len(), 2);
        assert_eq!(
            instance.get("diffuseColor"),
            Some(&MaterialParam::Color(Color::BLACK))
        );
        assert_eq!(instance.get("missing"), None);
    }

    #[test]
    fn test_instances_share_material() {
        let mat = material();
        let a = MaterialInstance::new(mat.clone());
        let b = MaterialInstance::new(mat.clone());
        assert_ne!(a.id(), b.id());
        assert!(Arc::ptr_eq(a.material(), b.material()));
        assert_eq!(Arc::strong_count(&mat), 3);
    }
}
