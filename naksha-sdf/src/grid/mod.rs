//! Signed-distance-field grid: storage, configuration, and scan integration.
//!
//! ## Architecture
//!
//! ```text
//!        ┌──────────────────────────────┐
//!        │   Laser scan + Pose2D        │
//!        └──────────────┬───────────────┘
//!                       ▼
//!        ┌──────────────────────────────┐
//!        │  scan_update                 │
//!        │  group → fit → select →      │
//!        │  evaluate → resolve          │
//!        └──────────────┬───────────────┘
//!                       ▼
//!        ┌──────────────────────────────┐
//!        │  SdfStorage                  │──► query::sample_field
//!        │  (distance + priority,       │    (value + gradient)
//!        │   offset-stable growth)      │
//!        └──────────────────────────────┘
//! ```
//!
//! ## Key Components
//!
//! - [`SdfStorage`]: parallel distance/priority arrays with an offset that
//!   keeps logical vertex coordinates stable across growth
//! - [`GridConfig`] / [`MapConfig`]: resolution, initial extent, update radius
//! - [`scan_update`]: per-scan integration pipeline with priority gating
//! - [`vertices`]: update-vertex selection and signed-distance evaluation
//!
//! ## Update Model
//!
//! Every vertex carries an update priority: the number of vertex layers
//! between it and the observed cell that last wrote it. Lower priority
//! means the evidence came from closer to a direct observation:
//!
//! ```text
//! new < stored  → overwrite distance and priority
//! new == stored → average the distances
//! new > stored  → discard the update
//! ```

mod config;
pub mod scan_update;
mod storage;
pub mod vertices;

pub use config::{ConfigError, GridConfig, MapConfig, YamlConfigError};
pub use storage::SdfStorage;
