//! Frame compositing.
//!
//! A frame draws the queued buckets in a fixed order and picks one of four
//! lighting paths by light count and depth-only mode:
//!
//! | Condition                     | Path          | Passes                      |
//! |-------------------------------|---------------|-----------------------------|
//! | depth only                    | `DepthOnly`   | `Depth` on opaque buckets   |
//! | lights > deferred threshold   | `Deferred`    | `Unlit` geometry, per-light |
//! | at least one light            | `ForwardLit`  | per-light pass              |
//! | no lights                     | `Unlit`       | `Unlit` on every bucket     |
//!
//! The queue is emptied and every light released when the frame ends,
//! whichever path ran and even if the backend refused to begin.

use std::sync::Arc;

use glam::Mat4;
use sr_core::{Color, Projection};

use super::Renderer;
use crate::config::LightingMode;
use crate::dispatch::{DispatchStats, render_meshes};
use crate::queue::{QueuedFrame, RenderQueueEntry};
use crate::resources::{Light, RenderTarget};
use crate::sort::sort_back_to_front;
use crate::traits::{Pass, RenderBackend};

/// Lighting path a frame took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePath {
    /// The backend refused to begin rendering.
    #[default]
    Skipped,
    DepthOnly,
    Deferred,
    ForwardLit,
    Unlit,
}

/// Summary of one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub path: FramePath,
    /// Lights queued for the frame.
    pub lights: usize,
    /// Dispatch counts summed over every bucket and pass.
    pub dispatch: DispatchStats,
    /// Lights accumulated by the deferred path.
    pub deferred_lights: u32,
    /// Additive multi-pass blocks opened by the forward path.
    pub multi_passes: u32,
}

impl<B: RenderBackend> Renderer<B> {
    /// Draws everything queued since the last frame.
    ///
    /// `eye` is the camera's world transform; its translation is the
    /// position transparent entries are sorted against. With `target` the
    /// frame is drawn off-screen. `depth_only` fills the depth buffer of the
    /// opaque buckets and nothing else.
    pub fn render(
        &mut self,
        eye: &Mat4,
        projection: &Projection,
        target: Option<&RenderTarget>,
        depth_only: bool,
    ) -> FrameStats {
        let _zone = self.zone("Renderer::render");

        // Lights stay claimed until `frame` drops at the end of this call.
        let mut frame = self.queue.take_frame();
        let mut stats = FrameStats {
            lights: frame.lights.len(),
            ..Default::default()
        };

        if let Some(target) = target {
            self.backend.bind_target(target);
        }

        if self.backend.begin_render() {
            let path = self.composite(&mut frame, eye, projection, depth_only, &mut stats);
            stats.path = path;
            self.backend.end_render();
        } else {
            tracing::debug!("Backend did not begin rendering, frame skipped");
        }

        if let Some(target) = target {
            self.backend.unbind_target(target);
        }

        tracing::trace!(
            path = ?stats.path,
            lights = stats.lights,
            draws = stats.dispatch.draws,
            material_binds = stats.dispatch.material_binds,
            "Frame rendered"
        );
        stats
    }

    fn composite(
        &mut self,
        frame: &mut QueuedFrame,
        eye: &Mat4,
        projection: &Projection,
        depth_only: bool,
        stats: &mut FrameStats,
    ) -> FramePath {
        if !depth_only && !frame.screen_space.is_empty() {
            let _zone = self.zone("Renderer::screen_space");
            self.backend
                .bind_view_proj(&Mat4::IDENTITY, &Projection::screen_space());
            self.dispatch(&frame.screen_space, Pass::Unlit, stats);
        }

        {
            let _zone = self.zone("Renderer::sort_transparent");
            sort_back_to_front(&mut frame.transparent_lit, eye.w_axis.truncate());
        }

        let light_count = frame.lights.len();
        if depth_only {
            let _zone = self.zone("Renderer::depth");
            self.backend.bind_ambient_state(Color::BLACK);
            self.backend.bind_view_proj(eye, projection);
            self.dispatch(&frame.opaque_lit, Pass::Depth, stats);
            self.dispatch(&frame.opaque_unlit, Pass::Depth, stats);
            FramePath::DepthOnly
        } else if light_count > self.config.deferred_threshold {
            let _zone = self.zone("Renderer::deferred");
            self.backend.bind_deferred_state();
            self.backend.bind_view_proj(eye, projection);
            self.dispatch(&frame.opaque_lit, Pass::Unlit, stats);
            self.dispatch(&frame.opaque_unlit, Pass::Unlit, stats);
            self.dispatch(&frame.transparent_lit, Pass::Unlit, stats);
            for light in &frame.lights {
                self.backend.render_deferred_light(light);
                stats.deferred_lights += 1;
            }
            FramePath::Deferred
        } else if let Some((first, rest)) = frame.lights.split_first() {
            let _zone = self.zone("Renderer::forward");
            self.backend.bind_ambient_state(self.config.ambient_color);
            self.backend
                .bind_fog_state(self.config.fog_color, self.config.fog_distance);
            self.backend.bind_view_proj(eye, projection);
            match self.config.lighting_mode {
                LightingMode::MultiPass => self.forward_multi_pass(frame, first, rest, stats),
                LightingMode::SinglePass => self.forward_single_pass(frame, first, stats),
            }
            FramePath::ForwardLit
        } else {
            let _zone = self.zone("Renderer::unlit");
            self.backend.bind_ambient_state(Color::BLACK);
            self.backend.bind_view_proj(eye, projection);
            self.dispatch(&frame.opaque_lit, Pass::Unlit, stats);
            self.dispatch(&frame.opaque_unlit, Pass::Unlit, stats);
            self.dispatch(&frame.transparent_lit, Pass::Unlit, stats);
            FramePath::Unlit
        }
    }

    /// First light with ambient, then each extra light added on top.
    fn forward_multi_pass(
        &mut self,
        frame: &QueuedFrame,
        first: &Light,
        rest: &[Arc<Light>],
        stats: &mut FrameStats,
    ) {
        self.backend.bind_light(first, None);
        self.dispatch(&frame.opaque_lit, first.pass(), stats);
        if !rest.is_empty() {
            self.backend.bind_ambient_state(Color::BLACK);
            self.backend.begin_multi_pass();
            for light in rest {
                self.backend.bind_light(light, None);
                self.dispatch(&frame.opaque_lit, light.pass(), stats);
            }
            self.backend.end_multi_pass();
            stats.multi_passes += 1;
        }

        self.dispatch(&frame.opaque_unlit, Pass::Unlit, stats);

        if frame.transparent_lit.is_empty() {
            return;
        }
        self.backend.bind_light(first, None);
        self.dispatch(&frame.transparent_lit, first.pass(), stats);
        if !rest.is_empty() {
            self.backend.bind_ambient_state(Color::BLACK);
            self.backend.begin_transparent_multi_pass();
            for light in rest {
                self.backend.bind_light(light, None);
                self.dispatch(&frame.transparent_lit, light.pass(), stats);
            }
            self.backend.end_transparent_multi_pass();
            stats.multi_passes += 1;
        }
    }

    /// Every light bound to its slot, then one pass.
    fn forward_single_pass(&mut self, frame: &QueuedFrame, first: &Light, stats: &mut FrameStats) {
        for (slot, light) in (0u32..).zip(&frame.lights) {
            self.backend.bind_light(light, Some(slot));
        }
        self.dispatch(&frame.opaque_lit, first.pass(), stats);
        self.dispatch(&frame.opaque_unlit, Pass::Unlit, stats);
        self.dispatch(&frame.transparent_lit, first.pass(), stats);
    }

    fn dispatch(&mut self, entries: &[RenderQueueEntry], pass: Pass, stats: &mut FrameStats) {
        stats.dispatch += render_meshes(&mut self.backend, entries, pass);
    }
}
