//! Lights and their per-frame ownership lock.

use std::sync::atomic::{AtomicU64, Ordering};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use sr_core::Color;

use crate::renderer::RendererId;
use crate::traits::Pass;

static NEXT_LIGHT_ID: AtomicU64 = AtomicU64::new(1);

/// Owner value of a light no renderer has claimed.
const UNOWNED: u64 = 0;

/// Identifier of a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LightId(u64);

impl LightId {
    /// Returns the raw id value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Kind of light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LightKind {
    /// Distant light with parallel rays (the sun)
    #[default]
    Directional,
    /// Omnidirectional light at a position
    Point,
    /// Cone of light from a position along a direction
    Spot,
}

/// Light uniform buffer data sent to GPU (64 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    /// xyz = world position, w = range
    pub position_range: [f32; 4],
    /// xyz = direction (normalized, world space), w = cos(outer cone angle)
    pub direction_cone: [f32; 4],
    /// Light color (RGB) and intensity (A)
    pub color_intensity: [f32; 4],
    /// x = kind (0 directional, 1 point, 2 spot), y = shadows (1.0 or 0.0),
    /// z = slot index (-1.0 in multi-pass lighting), w = unused
    pub params: [f32; 4],
}

/// Description of a light.
#[derive(Debug, Clone)]
pub struct LightDesc {
    pub kind: LightKind,
    pub color: Color,
    /// Intensity multiplier (typically 0.0-2.0)
    pub intensity: f32,
    /// World position (point and spot lights)
    pub position: Vec3,
    /// Direction the light shines toward (directional and spot lights)
    pub direction: Vec3,
    /// Distance at which point and spot lights fade out
    pub range: f32,
    /// Outer cone half-angle of spot lights, in radians
    pub cone_angle: f32,
    /// Whether a shadow map is rendered for this light
    pub cast_shadows: bool,
}

impl Default for LightDesc {
    fn default() -> Self {
        Self {
            kind: LightKind::Directional,
            color: Color::WHITE,
            intensity: 1.0,
            position: Vec3::ZERO,
            direction: Vec3::new(0.0, -1.0, 0.0),
            range: 100.0,
            cone_angle: std::f32::consts::FRAC_PI_4,
            cast_shadows: false,
        }
    }
}

impl LightDesc {
    /// Directional light shining along `direction`.
    pub fn directional(direction: Vec3) -> Self {
        Self {
            kind: LightKind::Directional,
            direction,
            ..Default::default()
        }
    }

    /// Point light at `position`.
    pub fn point(position: Vec3, range: f32) -> Self {
        Self {
            kind: LightKind::Point,
            position,
            range,
            ..Default::default()
        }
    }

    /// Spot light at `position` shining along `direction`.
    pub fn spot(position: Vec3, direction: Vec3, cone_angle: f32) -> Self {
        Self {
            kind: LightKind::Spot,
            position,
            direction,
            cone_angle,
            ..Default::default()
        }
    }

    /// Sets color and intensity.
    pub fn with_color(mut self, color: Color, intensity: f32) -> Self {
        self.color = color;
        self.intensity = intensity;
        self
    }

    /// Enables or disables the shadow map.
    pub fn with_shadows(mut self, cast_shadows: bool) -> Self {
        self.cast_shadows = cast_shadows;
        self
    }
}

/// A light that can be queued by one renderer at a time.
///
/// The owner field is an advisory check-and-set flag, not a blocking lock:
/// a renderer claims the light when it is queued and releases it when the
/// frame ends.
#[derive(Debug)]
pub struct Light {
    id: LightId,
    desc: LightDesc,
    owner: AtomicU64,
}

impl Light {
    pub(crate) fn new(mut desc: LightDesc) -> Self {
        desc.direction = desc.direction.normalize_or(Vec3::NEG_Y);
        Self {
            id: LightId(NEXT_LIGHT_ID.fetch_add(1, Ordering::Relaxed)),
            desc,
            owner: AtomicU64::new(UNOWNED),
        }
    }

    /// Returns the light id.
    pub fn id(&self) -> LightId {
        self.id
    }

    /// Returns the light description.
    pub fn desc(&self) -> &LightDesc {
        &self.desc
    }

    /// Returns the kind of light.
    pub fn kind(&self) -> LightKind {
        self.desc.kind
    }

    /// Returns the shading pass materials use for this light.
    pub fn pass(&self) -> Pass {
        match self.desc.kind {
            LightKind::Directional => Pass::DirectionalLight,
            LightKind::Point => Pass::PointLight,
            LightKind::Spot if self.desc.cast_shadows => Pass::SpotLight,
            LightKind::Spot => Pass::SpotLightNoShadow,
        }
    }

    /// Returns true if a renderer currently owns this light.
    pub fn is_locked(&self) -> bool {
        self.owner.load(Ordering::Acquire) != UNOWNED
    }

    /// Returns the renderer that owns this light, if any.
    pub fn owner(&self) -> Option<RendererId> {
        RendererId::from_raw(self.owner.load(Ordering::Acquire))
    }

    /// Claims the light for `owner`. Fails if any renderer already owns it.
    pub(crate) fn try_lock(&self, owner: RendererId) -> bool {
        self.owner
            .compare_exchange(UNOWNED, owner.raw(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Releases the light if `owner` holds it.
    pub(crate) fn unlock(&self, owner: RendererId) -> bool {
        self.owner
            .compare_exchange(owner.raw(), UNOWNED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Get the uniform data for GPU. `slot` is the light's index in
    /// single-pass lighting.
    pub fn uniform(&self, slot: Option<u32>) -> LightUniform {
        let color = self.desc.color.to_f32_array();
        let kind = match self.desc.kind {
            LightKind::Directional => 0.0,
            LightKind::Point => 1.0,
            LightKind::Spot => 2.0,
        };

        LightUniform {
            position_range: [
                self.desc.position.x,
                self.desc.position.y,
                self.desc.position.z,
                self.desc.range,
            ],
            direction_cone: [
                self.desc.direction.x,
                self.desc.direction.y,
                self.desc.direction.z,
                self.desc.cone_angle.cos(),
            ],
            color_intensity: [color[0], color[1], color[2], self.desc.intensity],
            params: [
                kind,
                if self.desc.cast_shadows { 1.0 } else { 0.0 },
                slot.map_or(-1.0, |s| s as f32),
                0.0,
            ],
        }
    }
}
