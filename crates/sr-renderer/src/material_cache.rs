//! Cache of shared materials keyed by canonical description.

use std::collections::BTreeMap;
use std::sync::Arc;

use sr_core::{CanonicalMaterialDesc, MaterialDesc};

use crate::resources::Material;
use crate::traits::RenderBackend;

/// Shares one material per canonical description.
///
/// Shader paths compare case-insensitively, so descriptions differing only
/// in path case share a material. A key may be present without a resident
/// material (a placeholder, or an entry emptied by
/// [`MaterialCache::release_all`]); registering installs the material.
pub struct MaterialCache {
    enabled: bool,
    entries: BTreeMap<CanonicalMaterialDesc, Option<Arc<Material>>>,
}

impl MaterialCache {
    /// Creates an empty cache.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: BTreeMap::new(),
        }
    }

    /// Returns true if lookups and registrations take effect.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the cached material for `desc`, adding a reference to it.
    pub fn lookup(&self, desc: &MaterialDesc) -> Option<Arc<Material>> {
        if !self.enabled {
            return None;
        }
        let material = self
            .entries
            .get(&CanonicalMaterialDesc::from(desc))?
            .clone()?;
        tracing::trace!(material = material.id().raw(), "Material cache hit");
        Some(material)
    }

    /// Caches `material` under `desc`.
    ///
    /// Inserts when the key is absent and installs into an empty slot.
    /// A key that already holds a material is left unchanged. Returns true
    /// if the cache now references `material`.
    pub fn register(&mut self, desc: &MaterialDesc, material: &Arc<Material>) -> bool {
        if !self.enabled {
            return false;
        }
        let slot = self
            .entries
            .entry(CanonicalMaterialDesc::from(desc))
            .or_default();
        if let Some(resident) = slot.as_ref() {
            tracing::debug!(
                resident = resident.id().raw(),
                material = material.id().raw(),
                "Material already cached for description"
            );
            return Arc::ptr_eq(resident, material);
        }
        *slot = Some(material.clone());
        true
    }

    /// Reserves a key without a resident material.
    pub fn insert_placeholder(&mut self, desc: &MaterialDesc) {
        if self.enabled {
            self.entries
                .entry(CanonicalMaterialDesc::from(desc))
                .or_default();
        }
    }

    /// Returns true if `material` is the resident material of some key.
    pub fn contains(&self, material: &Arc<Material>) -> bool {
        self.entries
            .values()
            .flatten()
            .any(|resident| Arc::ptr_eq(resident, material))
    }

    /// Releases every resident material's backend resources.
    ///
    /// Keys stay in the cache as empty slots. Returns the number of
    /// materials released; ones already released elsewhere are skipped.
    pub fn release_all<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> usize {
        let mut released = 0;
        for slot in self.entries.values_mut() {
            let Some(material) = slot.take() else {
                continue;
            };
            let outstanding = Arc::strong_count(&material) - 1;
            if outstanding > 0 {
                tracing::warn!(
                    material = material.id().raw(),
                    outstanding,
                    "Releasing material that is still referenced"
                );
            }
            if material.mark_released() {
                backend.release_material(&material);
                released += 1;
            }
        }
        if released > 0 {
            tracing::info!(released, "Released cached materials");
        }
        released
    }

    /// Returns the number of keys, resident or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of keys holding a material.
    pub fn resident_count(&self) -> usize {
        self.entries.values().flatten().count()
    }
}

impl Default for MaterialCache {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCommand, RecordingBackend};
    use sr_core::MaterialType;

    fn desc(vs: &str, fs: &str) -> MaterialDesc {
        MaterialDesc::new(MaterialType::Lit, vs, fs)
    }

    fn material(d: &MaterialDesc) -> Arc<Material> {
        Arc::new(Material::new(d.clone()))
    }

    #[test]
    fn test_lookup_miss_then_hit() {
        let mut cache = MaterialCache::new(true);
        let d = desc("simple.vs", "simple.fs");
        assert!(cache.lookup(&d).is_none());

        let mat = material(&d);
        assert!(cache.register(&d, &mat));
        assert_eq!(Arc::strong_count(&mat), 2);

        let hit = cache.lookup(&desc("SIMPLE.VS", "Simple.fs")).unwrap();
        assert!(Arc::ptr_eq(&hit, &mat));
        assert_eq!(Arc::strong_count(&mat), 3);

        drop(hit);
        assert_eq!(Arc::strong_count(&mat), 2);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut cache = MaterialCache::new(true);
        let d = desc("simple.vs", "simple.fs");
        let first = material(&d);
        let second = material(&d);

        assert!(cache.register(&d, &first));
        assert!(cache.register(&d, &first));
        assert!(!cache.register(&desc("Simple.VS", "simple.fs"), &second));

        assert_eq!(cache.len(), 1);
        assert!(Arc::ptr_eq(&cache.lookup(&d).unwrap(), &first));
        assert_eq!(Arc::strong_count(&second), 1);
    }

    #[test]
    fn test_placeholder_gets_installed() {
        let mut cache = MaterialCache::new(true);
        let d = desc("simple.vs", "simple.fs");
        cache.insert_placeholder(&d);
        assert_eq!(cache.len(), 1);
        assert!(cache.lookup(&d).is_none());

        let mat = material(&d);
        assert!(cache.register(&d, &mat));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.resident_count(), 1);
        assert!(cache.contains(&mat));
    }

    #[test]
    fn test_disabled_cache_is_inert() {
        let mut cache = MaterialCache::new(false);
        let d = desc("simple.vs", "simple.fs");
        let mat = material(&d);

        assert!(!cache.register(&d, &mat));
        cache.insert_placeholder(&d);
        assert!(cache.lookup(&d).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_release_all() {
        let mut backend = RecordingBackend::new();
        let mut cache = MaterialCache::new(true);
        let a = desc("a.vs", "a.fs");
        let b = desc("b.vs", "b.fs");
        let mat_a = material(&a);
        let mat_b = material(&b);
        cache.register(&a, &mat_a);
        cache.register(&b, &mat_b);
        cache.insert_placeholder(&desc("c.vs", "c.fs"));

        assert_eq!(cache.release_all(&mut backend), 2);
        assert_eq!(cache.resident_count(), 0);
        assert_eq!(cache.len(), 3);
        assert_eq!(Arc::strong_count(&mat_a), 1);
        assert_eq!(
            backend
                .commands()
                .iter()
                .filter(|c| matches!(c, BackendCommand::ReleaseMaterial(_)))
                .count(),
            2
        );

        assert_eq!(cache.release_all(&mut backend), 0);
    }

    #[test]
    fn test_release_all_skips_released_material() {
        let mut backend = RecordingBackend::new();
        let mut cache = MaterialCache::new(true);
        let d = desc("a.vs", "a.fs");
        let mat = material(&d);
        cache.register(&d, &mat);

        assert!(mat.mark_released());
        assert_eq!(cache.release_all(&mut backend), 0);
        assert_eq!(cache.resident_count(), 0);
        assert!(backend.commands().is_empty());
    }
}
