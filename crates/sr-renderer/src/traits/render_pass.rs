//! Shading pass identifiers.

use std::fmt;

/// Shading mode selecting which shader variant a material binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    /// Ambient-only lighting
    AmbientLight,
    /// Lit by a point light
    PointLight,
    /// Lit by a directional light
    DirectionalLight,
    /// Lit by a spot light without a shadow map
    SpotLightNoShadow,
    /// Lit by a shadow-casting spot light
    SpotLight,
    /// Writes surface normals
    Normals,
    /// Depth-only (shadow maps, depth pre-pass)
    Depth,
    /// No lighting applied
    Unlit,
}

impl Pass {
    /// Returns true if this pass shades with a light.
    pub fn is_light_pass(&self) -> bool {
        matches!(
            self,
            Pass::AmbientLight
                | Pass::PointLight
                | Pass::DirectionalLight
                | Pass::SpotLightNoShadow
                | Pass::SpotLight
        )
    }

    /// Returns true if this pass writes to the color buffer.
    pub fn writes_color(&self) -> bool {
        !matches!(self, Pass::Depth)
    }

    /// Returns the shader-variant name of this pass.
    pub fn name(&self) -> &'static str {
        match self {
            Pass::AmbientLight => "PASS_AMBIENT_LIGHT",
            Pass::PointLight => "PASS_POINT_LIGHT",
            Pass::DirectionalLight => "PASS_DIRECTIONAL_LIGHT",
            Pass::SpotLightNoShadow => "PASS_SPOT_LIGHT_NO_SHADOW",
            Pass::SpotLight => "PASS_SPOT_LIGHT",
            Pass::Normals => "PASS_NORMALS",
            Pass::Depth => "PASS_DEPTH",
            Pass::Unlit => "PASS_UNLIT",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
