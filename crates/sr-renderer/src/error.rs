//! Renderer errors.

use sr_core::MaterialDescError;
use thiserror::Error;

use crate::backend::DriverType;

/// Errors returned by renderer creation and resource creation APIs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RendererError {
    #[error("Renderer driver not available: {0}")]
    DriverUnavailable(DriverType),

    #[error("Invalid mesh description: {0}")]
    InvalidMeshDesc(String),

    #[error("Invalid material description: {0}")]
    InvalidMaterialDesc(#[from] MaterialDescError),

    #[error("Invalid render target size: {width}x{height}")]
    InvalidTargetSize { width: u32, height: u32 },

    #[error("Backend failed to create {kind}: {reason}")]
    ResourceCreation { kind: &'static str, reason: String },
}
