//! Material descriptions.
//!
//! A [`MaterialDesc`] names the shader programs and fixed-function state a
//! backend needs to build a material. [`CanonicalMaterialDesc`] wraps a
//! description with the ordering used to key the material cache.

mod canonical;

pub use canonical::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Material description validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaterialDescError {
    #[error("Vertex shader path is empty")]
    EmptyVertexShaderPath,

    #[error("Fragment shader path is empty")]
    EmptyFragmentShaderPath,

    #[error("Optional {0} shader path is present but empty")]
    EmptyOptionalShaderPath(&'static str),

    #[error("Alpha test reference is not finite: {0}")]
    InvalidAlphaTestRef(f32),
}

/// Whether a material takes part in lighting passes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum MaterialType {
    /// Shaded once, independently of lights.
    #[default]
    Unlit,
    /// Shaded once per light (or per light set in single-pass mode).
    Lit,
}

/// Alpha test comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum AlphaTestFunc {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    #[default]
    Always,
}

/// Blend factor for source or destination color.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum BlendFunc {
    Zero,
    #[default]
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    DstColor,
    OneMinusDstColor,
    SrcAlphaSaturate,
}

/// Description of a material: shader programs plus blend and alpha-test state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDesc {
    pub material_type: MaterialType,
    pub alpha_test_func: AlphaTestFunc,
    pub alpha_test_ref: f32,
    pub blending: bool,
    pub src_blend_func: BlendFunc,
    pub dst_blend_func: BlendFunc,
    pub vertex_shader_path: String,
    pub fragment_shader_path: String,
    pub geometry_shader_path: Option<String>,
    pub hull_shader_path: Option<String>,
    pub domain_shader_path: Option<String>,
}

impl MaterialDesc {
    /// Creates an opaque description with the given type and shader pair.
    pub fn new(
        material_type: MaterialType,
        vertex_shader_path: impl Into<String>,
        fragment_shader_path: impl Into<String>,
    ) -> Self {
        Self {
            material_type,
            alpha_test_func: AlphaTestFunc::Always,
            alpha_test_ref: 0.0,
            blending: false,
            src_blend_func: BlendFunc::One,
            dst_blend_func: BlendFunc::Zero,
            vertex_shader_path: vertex_shader_path.into(),
            fragment_shader_path: fragment_shader_path.into(),
            geometry_shader_path: None,
            hull_shader_path: None,
            domain_shader_path: None,
        }
    }

    /// Enables blending with the given factors.
    pub fn with_blending(mut self, src: BlendFunc, dst: BlendFunc) -> Self {
        self.blending = true;
        self.src_blend_func = src;
        self.dst_blend_func = dst;
        self
    }

    /// Sets the alpha test.
    pub fn with_alpha_test(mut self, func: AlphaTestFunc, reference: f32) -> Self {
        self.alpha_test_func = func;
        self.alpha_test_ref = reference;
        self
    }

    /// Sets the geometry shader.
    pub fn with_geometry_shader(mut self, path: impl Into<String>) -> Self {
        self.geometry_shader_path = Some(path.into());
        self
    }

    /// Sets the tessellation hull and domain shaders.
    pub fn with_tessellation(mut self, hull: impl Into<String>, domain: impl Into<String>) -> Self {
        self.hull_shader_path = Some(hull.into());
        self.domain_shader_path = Some(domain.into());
        self
    }

    /// Returns true if the material is shaded per light.
    pub fn is_lit(&self) -> bool {
        self.material_type == MaterialType::Lit
    }

    /// Checks that the description can be handed to a backend.
    pub fn validate(&self) -> Result<(), MaterialDescError> {
        if self.vertex_shader_path.is_empty() {
            return Err(MaterialDescError::EmptyVertexShaderPath);
        }
        if self.fragment_shader_path.is_empty() {
            return Err(MaterialDescError::EmptyFragmentShaderPath);
        }

        let optional = [
            ("geometry", &self.geometry_shader_path),
            ("hull", &self.hull_shader_path),
            ("domain", &self.domain_shader_path),
        ];
        for (stage, path) in optional {
            if path.as_deref().is_some_and(str::is_empty) {
                return Err(MaterialDescError::EmptyOptionalShaderPath(stage));
            }
        }

        if !self.alpha_test_ref.is_finite() {
            return Err(MaterialDescError::InvalidAlphaTestRef(self.alpha_test_ref));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ok() {
        let desc = MaterialDesc::new(MaterialType::Lit, "simple.vs", "simple.fs");
        assert!(desc.validate().is_ok());
        assert!(desc.is_lit());
    }

    #[test]
    fn test_validate_empty_paths() {
        let desc = MaterialDesc::new(MaterialType::Lit, "", "simple.fs");
        assert_eq!(
            desc.validate(),
            Err(MaterialDescError::EmptyVertexShaderPath)
        );

        let desc = MaterialDesc::new(MaterialType::Lit, "simple.vs", "");
        assert_eq!(
            desc.validate(),
            Err(MaterialDescError::EmptyFragmentShaderPath)
        );

        let desc = MaterialDesc::new(MaterialType::Lit, "simple.vs", "simple.fs")
            .with_tessellation("", "patch.ds");
        assert_eq!(
            desc.validate(),
            Err(MaterialDescError::EmptyOptionalShaderPath("hull"))
        );
    }

    #[test]
    fn test_validate_alpha_ref() {
        let desc = MaterialDesc::new(MaterialType::Unlit, "a.vs", "a.fs")
            .with_alpha_test(AlphaTestFunc::Greater, f32::NAN);
        assert!(matches!(
            desc.validate(),
            Err(MaterialDescError::InvalidAlphaTestRef(_))
        ));
    }

    #[test]
    fn test_with_blending() {
        let desc = MaterialDesc::new(MaterialType::Lit, "a.vs", "a.fs")
            .with_blending(BlendFunc::SrcAlpha, BlendFunc::OneMinusSrcAlpha);
        assert!(desc.blending);
        assert_eq!(desc.src_blend_func, BlendFunc::SrcAlpha);
        assert_eq!(desc.dst_blend_func, BlendFunc::OneMinusSrcAlpha);
    }
}
