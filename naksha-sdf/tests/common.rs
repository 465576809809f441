//! Test utilities for NakshaSDF integration tests.

#![allow(dead_code)]

use naksha_sdf::core::{Pose2D, WorldPoint};
use naksha_sdf::{MapConfig, SdfMap};

/// Create a map with the default 10m x 10m, 0.5m-cell configuration.
pub fn default_map() -> SdfMap {
    SdfMap::new(MapConfig::default())
}

/// Scan points along a straight wall segment, in the sensor frame of
/// `pose`.
///
/// The wall runs from `start` to `end` in the global frame; points are
/// spaced evenly with `n` samples.
pub fn wall_scan(start: WorldPoint, end: WorldPoint, n: usize, pose: Pose2D) -> Vec<WorldPoint> {
    (0..n)
        .map(|i| {
            let t = i as f32 / n.saturating_sub(1).max(1) as f32;
            let global = WorldPoint::new(
                start.x + t * (end.x - start.x),
                start.y + t * (end.y - start.y),
            );
            pose.inverse_transform_point(global)
        })
        .collect()
}

/// A single scan point at a global position, in the sensor frame of `pose`.
pub fn point_scan(global: WorldPoint, pose: Pose2D) -> Vec<WorldPoint> {
    vec![pose.inverse_transform_point(global)]
}
