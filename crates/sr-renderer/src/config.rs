//! Renderer configuration.
//!
//! Tuning values the frame compositor reads every frame. They are
//! serializable so applications can keep them in their RON settings file.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sr_core::Color;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] ron::error::SpannedError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),
}

/// How forward lighting applies several lights.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum LightingMode {
    /// One pass per light, accumulated additively after the first.
    #[default]
    MultiPass,
    /// All lights bound at once, one pass.
    SinglePass,
}

/// Tessellation settings handed to backends with hull and domain stages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TessellationParams {
    /// Edge and inside factors, then the maximum factor
    pub tess_factor: [f32; 4],
    /// Distances where tessellation is at its maximum and minimum
    pub min_max_distance: [f32; 2],
    /// Displacement height scale and bias
    pub height_scale_and_bias: [f32; 2],
    /// Displacement texture coordinate scale
    pub uv_scale: [f32; 2],
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            tess_factor: [6.0, 6.0, 3.0, 100.0],
            min_max_distance: [5.0, 50.0],
            height_scale_and_bias: [1.0, 0.5],
            uv_scale: [1.0, 1.0],
        }
    }
}

impl fmt::Display for TessellationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.tess_factor;
        let [near, far] = self.min_max_distance;
        let [scale, bias] = self.height_scale_and_bias;
        let [u, v] = self.uv_scale;
        writeln!(f, "TessParams =")?;
        writeln!(f, "\tTessFactor:      {a} {b} {c} {d}")?;
        writeln!(f, "\tTessMinMax:      {near} {far}")?;
        writeln!(f, "\tTessHeightScale: {scale} {bias}")?;
        writeln!(f, "\tTessUVScale:     {u} {v}")
    }
}

/// Renderer settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RendererConfig {
    /// Ambient color for the first forward light pass. Alpha is ignored.
    pub ambient_color: Color,
    /// Fog color
    pub fog_color: Color,
    /// Distance at which fog is opaque
    pub fog_distance: f32,
    /// Color the backend clears frames to
    pub clear_color: Color,
    /// Frames with more lights than this use deferred shading
    pub deferred_threshold: usize,
    /// Forward lighting mode
    pub lighting_mode: LightingMode,
    /// Share materials between equal descriptions
    pub enable_material_caching: bool,
    /// Tessellation settings
    pub tessellation: TessellationParams,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            ambient_color: Color::rgb(64, 64, 64),
            fog_color: Color::rgb(0, 0, 10),
            fog_distance: 20000.0,
            clear_color: Color::rgb(133, 153, 181),
            deferred_threshold: 16,
            lighting_mode: LightingMode::MultiPass,
            enable_material_caching: true,
            tessellation: TessellationParams::default(),
        }
    }
}

impl RendererConfig {
    /// Parses a configuration from RON. Missing fields take default values.
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Serializes the configuration to pretty-printed RON.
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Loads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&content)?;
        tracing::info!("Loaded renderer config from {:?}", path);
        Ok(config)
    }

    /// Writes the configuration to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Sets the deferred shading threshold.
    pub fn with_deferred_threshold(mut self, threshold: usize) -> Self {
        self.deferred_threshold = threshold;
        self
    }

    /// Sets the forward lighting mode.
    pub fn with_lighting_mode(mut self, mode: LightingMode) -> Self {
        self.lighting_mode = mode;
        self
    }

    /// Enables or disables material caching.
    pub fn with_material_caching(mut self, enabled: bool) -> Self {
        self.enable_material_caching = enabled;
        self
    }

    /// Sets the tessellation parameters.
    pub fn with_tessellation(mut self, params: TessellationParams) -> Self {
        self.tessellation = params;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = RendererConfig::from_ron("(deferred_threshold: 4, lighting_mode: SinglePass)")
            .unwrap();
        assert_eq!(config.deferred_threshold, 4);
        assert_eq!(config.lighting_mode, LightingMode::SinglePass);
        assert_eq!(config.fog_distance, 20000.0);
        assert!(config.enable_material_caching);
    }

    #[test]
    fn test_ron_roundtrip() {
        let config = RendererConfig::default()
            .with_deferred_threshold(2)
            .with_material_caching(false);
        let text = config.to_ron().unwrap();
        assert_eq!(RendererConfig::from_ron(&text).unwrap(), config);
    }

    #[test]
    fn test_tessellation_from_ron() {
        let config =
            RendererConfig::from_ron("(tessellation: (tess_factor: (8.0, 8.0, 4.0, 64.0)))").unwrap();
        assert_eq!(config.tessellation.tess_factor, [8.0, 8.0, 4.0, 64.0]);
        assert_eq!(config.tessellation.min_max_distance, [5.0, 50.0]);
        assert_eq!(RendererConfig::default().tessellation, TessellationParams::default());
    }

    #[test]
    fn test_tessellation_display() {
        let text = TessellationParams::default().to_string();
        assert_eq!(
            text,
            "TessParams =\n\
             \tTessFactor:      6 6 3 100\n\
             \tTessMinMax:      5 50\n\
             \tTessHeightScale: 1 0.5\n\
             \tTessUVScale:     1 1\n"
        );
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            RendererConfig::from_ron("(deferred_threshold: \"many\")"),
            Err(ConfigError::Deserialize(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "sr-renderer-config-{}.ron",
            std::process::id()
        ));
        let config = RendererConfig::default().with_lighting_mode(LightingMode::SinglePass);
        config.save(&path).unwrap();
        let loaded = RendererConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            RendererConfig::load("/nonexistent/renderer.ron"),
            Err(ConfigError::Io(_))
        ));
    }
}
