//! Benchmark field update and query performance.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::f32::consts::PI;

use naksha_sdf::core::{Pose2D, WorldPoint};
use naksha_sdf::{MapConfig, SdfMap};

/// Create a room scan for benchmarking: points on the walls of a
/// rectangular room, in the sensor frame of a robot at (robot_x, robot_y).
fn room_scan(
    room_width: f32,
    room_height: f32,
    robot_x: f32,
    robot_y: f32,
    num_points: usize,
) -> Vec<WorldPoint> {
    let angle_increment = 2.0 * PI / num_points as f32;
    let max_range = (room_width * room_width + room_height * room_height).sqrt();

    let mut points = Vec::with_capacity(num_points);

    for i in 0..num_points {
        let angle = i as f32 * angle_increment - PI;
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        let mut range = max_range;

        // Simple room ray casting
        if cos_a > 0.0 {
            let t = (room_width - robot_x) / cos_a;
            if t > 0.0 && t < range {
                let y = robot_y + t * sin_a;
                if y >= 0.0 && y <= room_height {
                    range = t;
                }
            }
        }
        if cos_a < 0.0 {
            let t = -robot_x / cos_a;
            if t > 0.0 && t < range {
                let y = robot_y + t * sin_a;
                if y >= 0.0 && y <= room_height {
                    range = t;
                }
            }
        }
        if sin_a > 0.0 {
            let t = (room_height - robot_y) / sin_a;
            if t > 0.0 && t < range {
                let x = robot_x + t * cos_a;
                if x >= 0.0 && x <= room_width {
                    range = t;
                }
            }
        }
        if sin_a < 0.0 {
            let t = -robot_y / sin_a;
            if t > 0.0 && t < range {
                let x = robot_x + t * cos_a;
                if x >= 0.0 && x <= room_width {
                    range = t;
                }
            }
        }

        // Sensor-frame point for a robot with zero heading
        points.push(WorldPoint::new(range * cos_a, range * sin_a));
    }

    points
}

fn bench_field_update(c: &mut Criterion) {
    let scan = room_scan(8.0, 8.0, 4.0, 4.0, 180);
    let pose = Pose2D::new(4.0, 4.0, 0.0);

    c.bench_function("update_room_scan_180", |b| {
        b.iter_batched(
            || SdfMap::new(MapConfig::default()),
            |mut map| {
                black_box(map.update(black_box(&scan), pose));
                map
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_field_query(c: &mut Criterion) {
    let mut map = SdfMap::new(MapConfig::default());
    let scan = room_scan(8.0, 8.0, 4.0, 4.0, 180);
    let pose = Pose2D::new(4.0, 4.0, 0.0);
    map.update(&scan, pose);

    // Pre-grow the grid so queries measure interpolation, not allocation
    for &(x, y) in &[(0.5f32, 0.5f32), (7.5, 7.5), (0.5, 7.5), (7.5, 0.5)] {
        map.query(WorldPoint::new(x, y));
    }

    c.bench_function("query_interpolated", |b| {
        let mut i = 0usize;
        b.iter(|| {
            // Walk query points across the room
            i = (i + 1) % 64;
            let x = 1.0 + (i % 8) as f32 * 0.8;
            let y = 1.0 + (i / 8) as f32 * 0.8;
            black_box(map.query(WorldPoint::new(x, y)))
        })
    });
}

criterion_group!(benches, bench_field_update, bench_field_query);
criterion_main!(benches);
