//! Update-vertex selection and signed-distance evaluation.
//!
//! Both stages work in cell space: vertex indices are integers, the fitted
//! line carries a cell-unit intercept, and the pose is scaled by the cell
//! resolution before use. Only the final stored distance is converted back
//! to meters.

use crate::core::{GridVertex, Pose2D, WorldPoint};
use crate::extraction::{perpendicular_slope, LocalLine, SLOPE_SENTINEL};

/// A proposed write for one grid vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexUpdate {
    /// Signed distance to the inferred surface, meters.
    /// Negative when the vertex lies beyond the surface as seen from the robot.
    pub distance: f32,
    /// Update priority: layer count from the observed cell, lower = closer.
    pub priority: f32,
}

/// Integer bounding vertices of the cell containing `point`:
/// `(x_min, x_max, y_min, y_max)` with `max = min + 1` on each axis.
pub(crate) fn bounding_vertices(point: WorldPoint, resolution: f32) -> (i32, i32, i32, i32) {
    let x_min = (point.x / resolution).floor() as i32;
    let y_min = (point.y / resolution).floor() as i32;
    (x_min, x_min + 1, y_min, y_min + 1)
}

/// Select the grid vertices a cell group may update.
///
/// Candidates are all integer vertices within `update_radius` (converted
/// to whole cells) of the anchor's cell center. A candidate is kept iff
/// its Euclidean distance to the cell center is strictly below the radius
/// and it lies between the two lines perpendicular to the fitted slope
/// through the cell's near and far corners (inclusive). This bounds each
/// observation's influence to a band around the local surface.
pub fn select_update_vertices(
    slope: f32,
    anchor: WorldPoint,
    resolution: f32,
    update_radius: f32,
) -> Vec<GridVertex> {
    let (x_min, x_max, y_min, y_max) = bounding_vertices(anchor, resolution);
    let x_c = (x_min + x_max) as f32 / 2.0;
    let y_c = (y_min + y_max) as f32 / 2.0;

    // Both bounding lines share the perpendicular slope; which corner
    // feeds which intercept depends on its sign, so the pair brackets
    // the cell along the fitted-line normal.
    let a_perp = perpendicular_slope(slope);
    let (b_lower, b_upper) = if a_perp < 0.0 {
        (
            y_min as f32 - a_perp * x_min as f32,
            y_max as f32 - a_perp * x_max as f32,
        )
    } else {
        (
            y_min as f32 - a_perp * x_max as f32,
            y_max as f32 - a_perp * x_min as f32,
        )
    };

    let k_cells = (update_radius / resolution) as i32;
    let x_range_min = (x_c - k_cells as f32).floor() as i32;
    let x_range_max = (x_c + k_cells as f32).ceil() as i32;
    let y_range_min = (y_c - k_cells as f32).floor() as i32;
    let y_range_max = (y_c + k_cells as f32).ceil() as i32;

    let mut vertices = Vec::new();
    for x in x_range_min..x_range_max {
        for y in y_range_min..y_range_max {
            let dx = x as f32 - x_c;
            let dy = y as f32 - y_c;
            if (dx * dx + dy * dy).sqrt() >= k_cells as f32 {
                continue;
            }

            let ax = a_perp * x as f32;
            if ax + b_upper < y as f32 || ax + b_lower > y as f32 {
                continue;
            }

            vertices.push(GridVertex::new(x, y));
        }
    }

    vertices
}

/// Compute the signed distance and update priority for each selected vertex.
///
/// The distance is the perpendicular distance from the vertex to the
/// fitted line, negated when the line lies between the robot and the
/// vertex (the vertex is beyond the inferred surface), and scaled to
/// meters. The priority is the number of vertex layers between the
/// vertex and the anchor's cell box; lower means closer to the direct
/// observation.
pub fn evaluate_updates(
    vertices: &[GridVertex],
    line: LocalLine,
    pose: Pose2D,
    anchor: WorldPoint,
    resolution: f32,
) -> Vec<VertexUpdate> {
    let (x_min, x_max, y_min, y_max) = bounding_vertices(anchor, resolution);

    // Robot position in cell units
    let pose_x = pose.x / resolution;
    let pose_y = pose.y / resolution;

    let mut updates = Vec::with_capacity(vertices.len());
    for vertex in vertices {
        let vx = vertex.x as f32;
        let vy = vertex.y as f32;

        let mut dist = line.distance_to(vx, vy);

        // Ray from the robot through the vertex
        let ray_dx = vx - pose_x;
        let ray_dy = vy - pose_y;
        let vertex_dist = (ray_dx * ray_dx + ray_dy * ray_dy).sqrt();

        let a_ray = if ray_dx == 0.0 {
            SLOPE_SENTINEL
        } else {
            ray_dy / ray_dx
        };
        let b_ray = pose_y - a_ray * pose_x;

        // Intersection of the ray with the fitted line. A ray parallel to
        // the line puts the intersection at infinity, which reads as the
        // surface being beyond the vertex (positive sign).
        let x_i = (b_ray - line.intercept) / (line.slope - a_ray);
        let y_i = a_ray * x_i + b_ray;
        let line_dist = ((pose_x - x_i).powi(2) + (pose_y - y_i).powi(2)).sqrt();

        // Vertex beyond the inferred surface: inside the obstacle
        if line_dist < vertex_dist {
            dist = -dist;
        }

        // Layer count from the anchor's cell box, in integer arithmetic so
        // equal priorities compare exactly downstream.
        let layers_x = (x_min - vertex.x).abs().min((x_max - vertex.x).abs());
        let layers_y = (y_min - vertex.y).abs().min((y_max - vertex.y).abs());
        let priority = layers_x.max(layers_y);

        updates.push(VertexUpdate {
            distance: dist * resolution,
            priority: priority as f32,
        });
    }

    updates
}
