//! # NakshaSDF
//!
//! 2D signed-distance-field mapping frontend for laser-scan SLAM.
//!
//! ## Overview
//!
//! NakshaSDF maintains a growable grid where every vertex stores the signed
//! distance to the nearest inferred obstacle surface plus an update
//! priority. Scans are integrated incrementally against a pose estimate;
//! scan-matching and pose-optimization consumers query the field for an
//! interpolated value and gradient at arbitrary continuous coordinates.
//!
//! The update model follows the 2D-SDF-SLAM frontend of Fossel et al.
//! (IROS 2015): scan points are grouped by map cell, each group gets a
//! local surface line by orthogonal regression, and grid vertices in a
//! bounded band around the line receive signed-distance updates gated by
//! a layer-count priority.
//!
//! ## Quick Start
//!
//! ```rust
//! use naksha_sdf::{MapConfig, SdfMap};
//! use naksha_sdf::core::{Pose2D, WorldPoint};
//!
//! // 10m x 10m map, 0.5m cells, 3m update radius
//! let mut map = SdfMap::new(MapConfig::default());
//!
//! // Integrate a scan observed from the origin
//! let scan = vec![WorldPoint::new(2.0, 2.0), WorldPoint::new(2.1, 2.0)];
//! let result = map.update(&scan, Pose2D::identity());
//! assert!(result.vertices_written > 0);
//!
//! // Sample the field near the observed surface
//! let sample = map.query(WorldPoint::new(1.9, 2.0));
//! assert!(sample.value >= 0.0);
//! ```
//!
//! ## Coordinate System
//!
//! Uses ROS REP-103 convention:
//! - X: Forward (positive ahead of robot)
//! - Y: Left (positive to robot's left)
//! - Theta: Rotation in radians, CCW positive from +X axis
//!
//! ## Architecture
//!
//! - [`core`]: fundamental types ([`core::WorldPoint`], [`core::GridVertex`],
//!   [`core::Pose2D`])
//! - [`extraction`]: local surface line fitting (total least squares)
//! - [`grid`]: field storage, configuration, and scan integration
//! - [`query`]: interpolated value + gradient sampling
//!
//! ## Concurrency
//!
//! Single writer, synchronous readers: both [`SdfMap::update`] and
//! [`SdfMap::query`] take `&mut self` because any touch of an unallocated
//! cell grows the grid. The borrow checker enforces the single-threaded
//! mapping-loop deployment this frontend is designed for.

#![warn(missing_docs)]

pub mod core;
pub mod extraction;
pub mod grid;
pub mod query;

// Re-export commonly used types
pub use crate::core::{GridVertex, Pose2D, WorldPoint};
pub use extraction::{LocalLine, SLOPE_SENTINEL};
pub use grid::{ConfigError, GridConfig, MapConfig, SdfStorage, YamlConfigError};
pub use query::SdfSample;

/// Result of integrating one scan
#[derive(Clone, Debug, Default)]
pub struct UpdateResult {
    /// Cell groups the scan partitioned into
    pub groups: usize,
    /// Vertices overwritten by strictly better evidence
    pub vertices_written: usize,
    /// Vertices averaged with equal-priority evidence
    pub vertices_averaged: usize,
    /// Proposed updates discarded for worse priority
    pub vertices_discarded: usize,
}

impl UpdateResult {
    /// Merge another result into this one
    pub fn merge(&mut self, other: &UpdateResult) {
        self.groups += other.groups;
        self.vertices_written += other.vertices_written;
        self.vertices_averaged += other.vertices_averaged;
        self.vertices_discarded += other.vertices_discarded;
    }
}

/// The signed-distance-field map
///
/// This is the primary type for interacting with the field. It owns the
/// grid storage exclusively; the storage grows monotonically for the
/// map's lifetime and is mutated only through [`SdfMap::update`] (aside
/// from allocation-on-touch growth during queries).
pub struct SdfMap {
    /// Field storage
    storage: SdfStorage,
    /// Configuration
    config: MapConfig,
}

impl SdfMap {
    /// Create a new signed-distance-field map
    pub fn new(config: MapConfig) -> Self {
        let storage = SdfStorage::new(config.grid.initial_width, config.grid.initial_height);
        Self { storage, config }
    }

    /// Create a map covering an initial area (meters) with default
    /// resolution and update radius
    pub fn for_area(width_m: f32, height_m: f32) -> Self {
        let defaults = MapConfig::default();
        let config = MapConfig {
            grid: GridConfig::for_area(width_m, height_m, defaults.grid.resolution),
            update_radius: defaults.update_radius,
        };
        Self::new(config)
    }

    /// Get the field storage
    pub fn storage(&self) -> &SdfStorage {
        &self.storage
    }

    /// Get mutable field storage
    pub fn storage_mut(&mut self) -> &mut SdfStorage {
        &mut self.storage
    }

    /// Get the configuration
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Cell edge length in meters
    pub fn resolution(&self) -> f32 {
        self.config.grid.resolution
    }

    /// Update radius in meters
    pub fn update_radius(&self) -> f32 {
        self.config.update_radius
    }

    /// Grid dimensions (width, height) in vertices
    pub fn dimensions(&self) -> (usize, usize) {
        (self.storage.width(), self.storage.height())
    }

    /// Convert a world point to continuous cell coordinates
    pub fn point_to_cells(&self, point: WorldPoint) -> (f32, f32) {
        (
            point.x / self.config.grid.resolution,
            point.y / self.config.grid.resolution,
        )
    }

    /// Convert continuous cell coordinates back to a world point
    pub fn cells_to_point(&self, x: f32, y: f32) -> WorldPoint {
        WorldPoint::new(
            x * self.config.grid.resolution,
            y * self.config.grid.resolution,
        )
    }

    /// Integrate a laser scan into the field.
    ///
    /// # Arguments
    /// * `scan` - Ordered scan points in the sensor's local frame
    /// * `pose` - Rigid transform from the sensor frame to the global
    ///   map frame at scan time
    ///
    /// # Returns
    /// Statistics about the vertex writes the scan produced.
    pub fn update(&mut self, scan: &[WorldPoint], pose: Pose2D) -> UpdateResult {
        grid::scan_update::update_from_scan(&mut self.storage, scan, pose, &self.config)
    }

    /// Sample the field value and gradient at a global-frame point.
    ///
    /// The value is the non-negative magnitude of the interpolated signed
    /// distance; the gradient is a unit vector toward the inferred
    /// surface (zero when degenerate). Touching unallocated coordinates
    /// grows the grid, so queries take `&mut self`; stored distances are
    /// never modified.
    pub fn query(&mut self, point: WorldPoint) -> SdfSample {
        query::sample_field(&mut self.storage, point, self.config.grid.resolution)
    }

    /// Reset every vertex to the unobserved defaults.
    pub fn clear(&mut self) {
        self.storage.clear();
    }
}
