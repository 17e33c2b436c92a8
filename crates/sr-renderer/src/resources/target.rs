//! Off-screen render targets.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TARGET_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(u64);

/// An off-screen color (and optional depth) target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    id: TargetId,
    width: u32,
    height: u32,
    has_depth: bool,
}

impl RenderTarget {
    pub(crate) fn new(width: u32, height: u32, has_depth: bool) -> Self {
        Self {
            id: TargetId(NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed)),
            width,
            height,
            has_depth,
        }
    }

    /// Returns the target id.
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if the target carries a depth attachment.
    pub fn has_depth(&self) -> bool {
        self.has_depth
    }
}
