//! State-minimizing mesh dispatch.

use std::ops::AddAssign;
use std::sync::Arc;

use crate::queue::RenderQueueEntry;
use crate::resources::{Material, MaterialInstance, Mesh};
use crate::traits::{Pass, RenderBackend};

/// Counts of backend calls issued by a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStats {
    pub material_binds: u32,
    pub material_unbinds: u32,
    pub mesh_binds: u32,
    pub mesh_unbinds: u32,
    pub draws: u32,
    /// Entries whose mesh would not render.
    pub skipped: u32,
}

impl AddAssign for DispatchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.material_binds += rhs.material_binds;
        self.material_unbinds += rhs.material_unbinds;
        self.mesh_binds += rhs.mesh_binds;
        self.mesh_unbinds += rhs.mesh_unbinds;
        self.draws += rhs.draws;
        self.skipped += rhs.skipped;
    }
}

/// Draws `entries` in order with the given pass.
///
/// Materials and meshes are only rebound when they differ from the previous
/// drawn entry: one material bind per run of equal (material, instance)
/// and one mesh bind per run of equal mesh. Entries are not reordered, so
/// grouping them by material upstream is what makes the runs long.
/// Whatever is still bound at the end is unbound.
pub fn render_meshes<B: RenderBackend + ?Sized>(
    backend: &mut B,
    entries: &[RenderQueueEntry],
    pass: Pass,
) -> DispatchStats {
    let mut stats = DispatchStats::default();

    let mut last_material: Option<&Arc<Material>> = None;
    let mut last_instance: Option<&Arc<MaterialInstance>> = None;
    let mut last_mesh: Option<&Arc<Mesh>> = None;

    for entry in entries {
        if !entry.mesh.will_render() {
            stats.skipped += 1;
            continue;
        }

        // Context before material: material binds read device state set here.
        backend.bind_mesh_context(entry);

        let instanced = entry.mesh.is_instanced();
        let material_changed = match (&entry.material_instance, last_instance) {
            (Some(instance), Some(last)) => !Arc::ptr_eq(instance, last),
            // Moving onto or off an instance rebinds, even under one material,
            // so instance parameters never leak into a plain draw.
            (Some(_), None) | (None, Some(_)) => true,
            (None, None) => last_material.is_none_or(|last| !Arc::ptr_eq(last, &entry.material)),
        };

        if material_changed {
            if let Some(previous) = last_material {
                backend.unbind_material(previous);
                stats.material_unbinds += 1;
            }
            backend.bind_material(
                &entry.material,
                pass,
                entry.material_instance.as_deref(),
                instanced,
            );
            stats.material_binds += 1;
            last_material = Some(&entry.material);
            last_instance = entry.material_instance.as_ref();
        }

        if last_mesh.is_none_or(|last| !Arc::ptr_eq(last, &entry.mesh)) {
            if let Some(previous) = last_mesh {
                backend.unbind_mesh(previous);
                stats.mesh_unbinds += 1;
            }
            backend.bind_mesh(&entry.mesh);
            stats.mesh_binds += 1;
            last_mesh = Some(&entry.mesh);
        }

        backend.render_mesh(&entry.mesh, &entry.material);
        stats.draws += 1;
    }

    if let Some(mesh) = last_mesh {
        backend.unbind_mesh(mesh);
        stats.mesh_unbinds += 1;
    }
    if let Some(material) = last_material {
        backend.unbind_material(material);
        stats.material_unbinds += 1;
    }

    stats
}
