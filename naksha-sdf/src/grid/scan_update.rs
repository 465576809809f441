//! Laser-scan integration for the signed-distance field.
//!
//! One call fully integrates one scan:
//! 1. Transform scan points into the global frame with the pose
//! 2. Group points by the map cell they occupy
//! 3. Per group: fit a local surface line, select nearby vertices,
//!    evaluate a signed distance and priority per vertex
//! 4. Resolve each proposed write against the stored priority

use crate::core::{GridVertex, Pose2D, WorldPoint};
use crate::extraction::fit_group_line;
use crate::grid::config::MapConfig;
use crate::grid::storage::SdfStorage;
use crate::grid::vertices::{bounding_vertices, evaluate_updates, select_update_vertices};
use crate::UpdateResult;

/// Outcome of resolving one proposed vertex write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// New priority was strictly better: distance and priority overwritten.
    Written,
    /// Priorities were equal: stored distance averaged with the new one.
    Averaged,
    /// New priority was strictly worse: update dropped.
    Discarded,
}

/// Group scan points by the map cell they occupy.
///
/// Single pass with a claimed marker: each unclaimed point anchors a new
/// group and claims every later point whose cell coordinates fall inside
/// the anchor's cell box. Quadratic in the scan size, which is small for
/// a single scan. Group order and within-group order follow scan order,
/// with the anchor first.
pub fn group_points_by_cell(points: &[WorldPoint], resolution: f32) -> Vec<Vec<WorldPoint>> {
    let mut groups = Vec::new();
    let mut claimed = vec![false; points.len()];

    for anchor_idx in 0..points.len() {
        if claimed[anchor_idx] {
            continue;
        }

        let anchor = points[anchor_idx];
        let (x_min, x_max, y_min, y_max) = bounding_vertices(anchor, resolution);

        let mut group = vec![anchor];
        claimed[anchor_idx] = true;

        for next_idx in (anchor_idx + 1)..points.len() {
            if claimed[next_idx] {
                continue;
            }

            let p = points[next_idx];
            let cx = p.x / resolution;
            let cy = p.y / resolution;
            if cx >= x_min as f32
                && cx < x_max as f32
                && cy >= y_min as f32
                && cy < y_max as f32
            {
                group.push(p);
                claimed[next_idx] = true;
            }
        }

        groups.push(group);
    }

    groups
}

/// Resolve one proposed write against the stored priority at a vertex.
///
/// Strictly better evidence wins outright, equal evidence is averaged,
/// worse evidence is discarded. Touching the vertex grows the grid as a
/// side effect when it lies outside the current bounds.
pub fn apply_update(
    storage: &mut SdfStorage,
    vertex: GridVertex,
    distance: f32,
    priority: f32,
) -> UpdateOutcome {
    let stored_priority = storage.priority(vertex);

    if priority < stored_priority {
        storage.set_distance(vertex, distance);
        storage.set_priority(vertex, priority);
        UpdateOutcome::Written
    } else if priority == stored_priority {
        let stored_distance = storage.distance(vertex);
        storage.set_distance(vertex, (distance + stored_distance) / 2.0);
        UpdateOutcome::Averaged
    } else {
        UpdateOutcome::Discarded
    }
}

/// Integrate one laser scan into the field.
///
/// `scan` is an ordered sequence of points in the sensor's local frame;
/// `pose` is the rigid transform from that frame to the global map frame
/// at scan time.
pub fn update_from_scan(
    storage: &mut SdfStorage,
    scan: &[WorldPoint],
    pose: Pose2D,
    config: &MapConfig,
) -> UpdateResult {
    let resolution = config.grid.resolution;

    let global_scan: Vec<WorldPoint> = scan.iter().map(|p| pose.transform_point(*p)).collect();

    let groups = group_points_by_cell(&global_scan, resolution);

    let mut result = UpdateResult {
        groups: groups.len(),
        ..UpdateResult::default()
    };

    for group in &groups {
        let line = fit_group_line(group, &global_scan, pose, resolution);
        let vertices = select_update_vertices(line.slope, group[0], resolution, config.update_radius);
        let updates = evaluate_updates(&vertices, line, pose, group[0], resolution);

        for (vertex, update) in vertices.iter().zip(updates.iter()) {
            match apply_update(storage, *vertex, update.distance, update.priority) {
                UpdateOutcome::Written => result.vertices_written += 1,
                UpdateOutcome::Averaged => result.vertices_averaged += 1,
                UpdateOutcome::Discarded => result.vertices_discarded += 1,
            }
        }
    }

    log::debug!(
        "scan integrated: {} points, {} groups, {} written, {} averaged, {} discarded",
        scan.len(),
        result.groups,
        result.vertices_written,
        result.vertices_averaged,
        result.vertices_discarded
    );

    result
}
