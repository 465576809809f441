//! Local surface line fitting using Total Least Squares (orthogonal regression).
//!
//! TLS minimizes perpendicular distances to the line, not vertical distances
//! like ordinary least squares. This is appropriate for lidar data where
//! errors are isotropic.
//!
//! Each cell group of scan points gets one local line; single-point groups
//! borrow a neighboring scan point or fall back to the perpendicular of the
//! robot-to-point direction.

use crate::core::{Pose2D, WorldPoint};

/// Large finite slope standing in for a vertical line.
///
/// Applied wherever a slope denominator is near zero, so vertical fits and
/// vertical sign-determination rays behave like steep ordinary lines.
pub const SLOPE_SENTINEL: f32 = 1000.0;

/// A surface line in slope/intercept form, `y = slope * x + intercept`.
///
/// The slope is dimensionless; the intercept is expressed in grid-cell
/// units so the line equation holds in cell-space, where vertex selection
/// and distance evaluation operate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalLine {
    /// Line slope (dimensionless, frame-independent of cell scaling).
    pub slope: f32,
    /// Y intercept in cell units.
    pub intercept: f32,
}

impl LocalLine {
    /// Create a line from slope and cell-unit intercept.
    #[inline]
    pub fn new(slope: f32, intercept: f32) -> Self {
        Self { slope, intercept }
    }

    /// Perpendicular distance from a cell-space point to this line.
    ///
    /// Closed-form point-to-line distance using the slope/intercept
    /// representation; input and output are in cell units.
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let a = self.slope;
        let b_point = y - a * x;
        let ratio = a * a / (a * a + 1.0);
        let y_diff = (self.intercept - b_point) * (1.0 - ratio);
        let x_diff = (b_point - self.intercept) * (a / (a * a + 1.0));
        (y_diff * y_diff + x_diff * x_diff).sqrt()
    }
}

/// Slope of the line perpendicular to a line with slope `a`.
///
/// Falls back to the sentinel when `a` is near zero (a horizontal line's
/// perpendicular is vertical).
#[inline]
pub fn perpendicular_slope(a: f32) -> f32 {
    if a.abs() < 1.0 / SLOPE_SENTINEL {
        -SLOPE_SENTINEL
    } else {
        -1.0 / a
    }
}

/// Fit a local surface line to a cell group of scan points.
///
/// * Groups of two or more points are fitted with total least squares via
///   the principal axis of the 2x2 scatter matrix.
/// * A singleton group borrows the first other scan point within two cell
///   widths on both axes as a second fit point; the borrowed point does not
///   join the group.
/// * If no neighbor exists, the line is the perpendicular through the point
///   of the robot-to-point direction.
///
/// Points and pose are in the global frame (meters); the returned intercept
/// is converted to cell units via `resolution`.
pub fn fit_group_line(
    group: &[WorldPoint],
    full_scan: &[WorldPoint],
    pose: Pose2D,
    resolution: f32,
) -> LocalLine {
    debug_assert!(!group.is_empty());

    let (slope, intercept_m) = if group.len() >= 2 {
        fit_total_least_squares(group)
    } else {
        let anchor = group[0];
        match find_borrow_point(anchor, full_scan, resolution) {
            Some(neighbor) => two_point_line(anchor, neighbor),
            None => perpendicular_through(anchor, pose),
        }
    };

    LocalLine::new(slope, intercept_m / resolution)
}

/// First scan point within two cell widths of `anchor` on both axes,
/// excluding the anchor itself.
fn find_borrow_point(
    anchor: WorldPoint,
    full_scan: &[WorldPoint],
    resolution: f32,
) -> Option<WorldPoint> {
    let window = resolution * 2.0;
    full_scan
        .iter()
        .find(|p| {
            (p.x - anchor.x).abs() < window && (p.y - anchor.y).abs() < window && **p != anchor
        })
        .copied()
}

/// Exact line through two points, sentinel slope for a vertical pair.
fn two_point_line(a: WorldPoint, b: WorldPoint) -> (f32, f32) {
    let run = b.x - a.x;
    let slope = if run.abs() < f32::EPSILON {
        SLOPE_SENTINEL
    } else {
        (b.y - a.y) / run
    };
    (slope, a.y - slope * a.x)
}

/// Line through `point` perpendicular to the robot-to-point segment.
fn perpendicular_through(point: WorldPoint, pose: Pose2D) -> (f32, f32) {
    let rise = point.y - pose.y;
    let slope = if rise.abs() < f32::EPSILON {
        SLOPE_SENTINEL
    } else {
        -(point.x - pose.x) / rise
    };
    (slope, point.y - slope * point.x)
}

/// Total least squares fit: slope and intercept of the principal axis of
/// the group's 2x2 scatter matrix, through the centroid.
fn fit_total_least_squares(points: &[WorldPoint]) -> (f32, f32) {
    let n = points.len() as f32;
    let mut sum_x: f32 = 0.0;
    let mut sum_y: f32 = 0.0;

    for p in points {
        sum_x += p.x;
        sum_y += p.y;
    }

    let cx = sum_x / n;
    let cy = sum_y / n;

    // Scatter matrix elements
    // S = | sxx  sxy |
    //     | sxy  syy |
    let mut sxx: f32 = 0.0;
    let mut syy: f32 = 0.0;
    let mut sxy: f32 = 0.0;

    for p in points {
        let dx = p.x - cx;
        let dy = p.y - cy;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    // Eigenvalues of the 2x2 symmetric matrix:
    // λ = (sxx + syy)/2 ± sqrt(((sxx - syy)/2)² + sxy²)
    let trace_half = (sxx + syy) / 2.0;
    let disc = ((sxx - syy) / 2.0).powi(2) + sxy * sxy;

    if disc < f32::EPSILON {
        // Isotropic scatter, no dominant direction; fall back to the
        // line through the first and last points.
        return two_point_line(points[0], points[points.len() - 1]);
    }

    let lambda1 = trace_half + disc.sqrt();

    // Eigenvector for the larger eigenvalue (line direction):
    // (lambda1 - syy, sxy), or an axis direction when sxy vanishes.
    let (dir_x, dir_y) = if sxy.abs() > f32::EPSILON {
        (lambda1 - syy, sxy)
    } else if sxx > syy {
        (1.0, 0.0)
    } else {
        (0.0, 1.0)
    };

    let slope = if dir_x.abs() < f32::EPSILON {
        SLOPE_SENTINEL
    } else {
        dir_y / dir_x
    };

    (slope, cy - slope * cx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const RES: f32 = 0.5;

    #[test]
    fn test_fit_horizontal_group() {
        let points = vec![
            WorldPoint::new(0.0, 1.0),
            WorldPoint::new(0.1, 1.0),
            WorldPoint::new(0.2, 1.0),
            WorldPoint::new(0.3, 1.0),
        ];

        let line = fit_group_line(&points, &points, Pose2D::identity(), RES);
        assert_relative_eq!(line.slope, 0.0, epsilon = 1e-5);
        // Intercept 1.0 m = 2.0 cells at 0.5 m resolution
        assert_relative_eq!(line.intercept, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_fit_two_points_exact() {
        let points = vec![WorldPoint::new(2.05, 2.0), WorldPoint::new(2.3, 2.2)];

        let line = fit_group_line(&points, &points, Pose2D::identity(), RES);
        assert_relative_eq!(line.slope, 0.8, epsilon = 1e-4);
        // b = 2.0 - 0.8 * 2.05 = 0.36 m = 0.72 cells
        assert_relative_eq!(line.intercept, 0.72, epsilon = 1e-4);
    }

    #[test]
    fn test_fit_vertical_group_uses_sentinel() {
        let points = vec![
            WorldPoint::new(1.0, 0.0),
            WorldPoint::new(1.0, 0.2),
            WorldPoint::new(1.0, 0.4),
        ];

        let line = fit_group_line(&points, &points, Pose2D::identity(), RES);
        assert_eq!(line.slope, SLOPE_SENTINEL);
    }

    #[test]
    fn test_singleton_borrows_neighbor() {
        let group = vec![WorldPoint::new(2.0, 2.0)];
        let scan = vec![WorldPoint::new(2.0, 2.0), WorldPoint::new(2.5, 2.5)];

        let line = fit_group_line(&group, &scan, Pose2D::identity(), RES);
        // Two-point line through (2,2) and (2.5,2.5): slope 1
        assert_relative_eq!(line.slope, 1.0, epsilon = 1e-5);
        // Group membership is untouched
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_singleton_ignores_distant_points() {
        let group = vec![WorldPoint::new(2.0, 2.0)];
        // Other point is more than two cell widths away on x
        let scan = vec![WorldPoint::new(2.0, 2.0), WorldPoint::new(4.0, 2.1)];

        let line = fit_group_line(&group, &scan, Pose2D::identity(), RES);
        // Perpendicular fallback from pose (0,0): a = -(2-0)/(2-0) = -1
        assert_relative_eq!(line.slope, -1.0, epsilon = 1e-5);
        // b = 2 - (-1)*2 = 4 m = 8 cells
        assert_relative_eq!(line.intercept, 8.0, epsilon = 1e-5);
    }

    #[test]
    fn test_perpendicular_fallback_zero_rise() {
        // Point straight ahead on the x-axis: rise is zero, sentinel applies
        let group = vec![WorldPoint::new(2.0, 0.0)];
        let line = fit_group_line(&group, &group, Pose2D::identity(), RES);
        assert_eq!(line.slope, SLOPE_SENTINEL);
    }

    #[test]
    fn test_distance_to_line() {
        // Horizontal line y = 2 (cell units)
        let line = LocalLine::new(0.0, 2.0);
        assert_relative_eq!(line.distance_to(5.0, 4.0), 2.0, epsilon = 1e-5);
        assert_relative_eq!(line.distance_to(-3.0, 2.0), 0.0, epsilon = 1e-5);

        // Diagonal line y = x: distance from (1, 0) is sqrt(2)/2
        let diag = LocalLine::new(1.0, 0.0);
        assert_relative_eq!(
            diag.distance_to(1.0, 0.0),
            std::f32::consts::SQRT_2 / 2.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_perpendicular_slope() {
        assert_relative_eq!(perpendicular_slope(2.0), -0.5, epsilon = 1e-6);
        assert_eq!(perpendicular_slope(0.0), -SLOPE_SENTINEL);
    }
}
