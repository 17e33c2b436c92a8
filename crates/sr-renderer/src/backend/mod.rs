//! Backend selection.
//!
//! Each driver has one [`RenderBackend`] implementation, chosen once when
//! the renderer is created:
//!
//! - [`NullBackend`]: accepts every call and draws nothing
//! - [`RecordingBackend`]: records every call, for inspecting frame schedules

mod null;
mod recording;

pub use null::NullBackend;
pub use recording::{BackendCommand, RecordingBackend};

use std::fmt;

use crate::config::RendererConfig;
use crate::error::RendererError;
use crate::renderer::Renderer;
use crate::traits::RenderBackend;

/// Graphics driver a backend targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverType {
    OpenGl,
    Gles2,
    Direct3D9,
    Direct3D11,
    LibGcm,
    LibGnm,
    LibGxm,
    Null,
}

impl DriverType {
    /// Returns the driver's display name.
    pub fn name(&self) -> &'static str {
        match self {
            DriverType::OpenGl => "OpenGL",
            DriverType::Gles2 => "OpenGL ES 2.0",
            DriverType::Direct3D9 => "Direct3D9",
            DriverType::Direct3D11 => "Direct3D11",
            DriverType::LibGcm => "LibGCM",
            DriverType::LibGnm => "LibGNM",
            DriverType::LibGxm => "LibGXM",
            DriverType::Null => "NULL",
        }
    }

    /// Returns false for drivers whose materials cannot be shared between
    /// descriptions.
    pub fn supports_material_caching(&self) -> bool {
        !matches!(
            self,
            DriverType::Gles2 | DriverType::LibGnm | DriverType::LibGxm
        )
    }
}

impl fmt::Display for DriverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters for [`create_renderer`].
#[derive(Debug, Clone)]
pub struct RendererDesc {
    pub driver: DriverType,
    pub config: RendererConfig,
}

impl RendererDesc {
    /// Describes a renderer for `driver` with default configuration.
    pub fn new(driver: DriverType) -> Self {
        Self {
            driver,
            config: RendererConfig::default(),
        }
    }
}

/// Creates a renderer with the backend for `desc.driver`.
pub fn create_renderer(
    desc: RendererDesc,
) -> Result<Renderer<Box<dyn RenderBackend>>, RendererError> {
    let backend: Box<dyn RenderBackend> = match desc.driver {
        DriverType::Null => Box::new(NullBackend::new()),
        other => {
            tracing::warn!("No backend available for driver {}", other);
            return Err(RendererError::DriverUnavailable(other));
        }
    };

    tracing::info!("Created {} renderer", desc.driver);
    Ok(Renderer::new(backend, desc.config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_null_renderer() {
        let renderer = create_renderer(RendererDesc::new(DriverType::Null)).unwrap();
        assert_eq!(renderer.backend().driver(), DriverType::Null);
        assert!(renderer.material_cache().is_enabled());
    }

    #[test]
    fn test_unavailable_driver() {
        let result = create_renderer(RendererDesc::new(DriverType::Direct3D11));
        assert!(matches!(
            result,
            Err(RendererError::DriverUnavailable(DriverType::Direct3D11))
        ));
    }

    #[test]
    fn test_caching_support() {
        assert!(DriverType::OpenGl.supports_material_caching());
        assert!(!DriverType::Gles2.supports_material_caching());
        assert!(!DriverType::LibGxm.supports_material_caching());
        assert_eq!(DriverType::Gles2.to_string(), "OpenGL ES 2.0");
    }
}
