//! Back-to-front ordering of transparent geometry.

use std::cmp::Ordering;

use glam::Vec3;

use crate::queue::RenderQueueEntry;

/// Sorts entries farthest-first from `camera_position` for alpha blending.
///
/// Entries without a transform come first and keep their relative order.
/// The sort is stable, so equally distant entries do not swap between
/// frames of a static scene.
pub fn sort_back_to_front(entries: &mut [RenderQueueEntry], camera_position: Vec3) {
    entries.sort_by(|a, b| compare_camera_distance(a, b, camera_position));
}

/// Ordering used by [`sort_back_to_front`].
pub fn compare_camera_distance(
    a: &RenderQueueEntry,
    b: &RenderQueueEntry,
    camera_position: Vec3,
) -> Ordering {
    match (&a.transform, &b.transform) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(ta), Some(tb)) => {
            let da = ta.w_axis.truncate().distance_squared(camera_position);
            let db = tb.w_axis.truncate().distance_squared(camera_position);
            // Larger distance first. total_cmp keeps the order total for NaN.
            db.total_cmp(&da)
        }
    }
}
