//! Integrate a synthetic scan and sample the resulting field.
//!
//! Usage: cargo run --example single_scan

use naksha_sdf::core::{Pose2D, WorldPoint};
use naksha_sdf::{MapConfig, SdfMap};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = MapConfig::default();
    log::info!(
        "Creating {}x{} vertex map at {}m cells, update radius {}m",
        config.grid.initial_width,
        config.grid.initial_height,
        config.grid.resolution,
        config.update_radius
    );
    let mut map = SdfMap::new(config);

    // A short wall segment at x = 3m, seen from a robot at the origin.
    // Points are in the sensor frame; here the pose is the identity so
    // sensor and global frames coincide.
    let pose = Pose2D::identity();
    let scan: Vec<WorldPoint> = (0..11)
        .map(|i| WorldPoint::new(3.0, 1.0 + i as f32 * 0.1))
        .collect();

    let result = map.update(&scan, pose);
    log::info!(
        "Scan integrated: {} groups, {} vertices written, {} averaged, {} discarded",
        result.groups,
        result.vertices_written,
        result.vertices_averaged,
        result.vertices_discarded
    );

    // Walk a ray from the robot through the wall and sample the field
    for i in 0..8 {
        let x = 1.5 + i as f32 * 0.4;
        let sample = map.query(WorldPoint::new(x, 1.5));
        log::info!(
            "field at ({:.1}, 1.5): value {:.3}m, gradient ({:+.2}, {:+.2})",
            x,
            sample.value,
            sample.gradient.x,
            sample.gradient.y
        );
    }

    let (width, height) = map.dimensions();
    log::info!("final grid: {}x{} vertices, offset {:?}", width, height, map.storage().offset());
}
