//! Signed-distance-field storage.
//!
//! Two parallel dense arrays (distance and update priority) over integer
//! grid vertices, plus an offset record that maps logical vertex
//! coordinates to physical array indices. Logical coordinates are stable
//! for the lifetime of the map: growth only ever inserts rows or columns
//! at an edge and adjusts the offset, never renumbers.

use crate::core::GridVertex;

/// Resizable storage for the signed-distance field.
///
/// ## Memory Layout
///
/// Row-major `Vec<f32>` pairs of identical shape:
/// ```text
/// distance: [D D D D D D D D|...]   signed distance to surface, meters
/// priority: [P P P P P P P P|...]   update priority, lower = more trusted
/// ```
///
/// A logical vertex `v` maps to physical column `v.x + offset.x` and row
/// `v.y + offset.y`. Any accessor touching a vertex outside the current
/// physical bounds grows the arrays first, so reads and writes are total
/// over all of `i32 x i32` (memory permitting).
#[derive(Clone, Debug)]
pub struct SdfStorage {
    distance: Vec<f32>,
    priority: Vec<f32>,

    /// Grid width in vertices
    width: usize,
    /// Grid height in vertices
    height: usize,
    /// Added to logical coordinates to obtain physical indices
    offset: GridVertex,
}

impl SdfStorage {
    /// Distance value for vertices that have never been updated (meters).
    pub const UNOBSERVED_DISTANCE: f32 = 0.1;

    /// Priority value for vertices that have never been updated.
    ///
    /// Any real update priority is a small layer count, so the first
    /// observation of a vertex always wins against this sentinel.
    pub const UNOBSERVED_PRIORITY: f32 = 100.0;

    /// Create a new grid with the given dimensions and zero offset.
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            distance: vec![Self::UNOBSERVED_DISTANCE; size],
            priority: vec![Self::UNOBSERVED_PRIORITY; size],
            width,
            height,
            offset: GridVertex::new(0, 0),
        }
    }

    /// Grid width in vertices.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in vertices.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Current logical-to-physical offset.
    #[inline]
    pub fn offset(&self) -> GridVertex {
        self.offset
    }

    /// Total number of stored vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.width * self.height
    }

    /// Logical bounds as `(min, max)` with an exclusive max.
    pub fn bounds(&self) -> (GridVertex, GridVertex) {
        let min = GridVertex::new(-self.offset.x, -self.offset.y);
        let max = GridVertex::new(
            self.width as i32 - self.offset.x,
            self.height as i32 - self.offset.y,
        );
        (min, max)
    }

    /// Check if a logical vertex lies within the current physical bounds.
    #[inline]
    pub fn contains(&self, vertex: GridVertex) -> bool {
        self.index(vertex).is_some()
    }

    /// Physical array index for a logical vertex, if in bounds.
    #[inline]
    fn index(&self, vertex: GridVertex) -> Option<usize> {
        let px = vertex.x + self.offset.x;
        let py = vertex.y + self.offset.y;
        if px >= 0 && py >= 0 && (px as usize) < self.width && (py as usize) < self.height {
            Some(py as usize * self.width + px as usize)
        } else {
            None
        }
    }

    /// Physical index for a logical vertex, growing the grid so the vertex
    /// is always in bounds afterward.
    #[inline]
    fn ensure_index(&mut self, vertex: GridVertex) -> usize {
        self.expand_to_include(vertex);
        let px = (vertex.x + self.offset.x) as usize;
        let py = (vertex.y + self.offset.y) as usize;
        py * self.width + px
    }

    /// Signed distance at a vertex, growing the grid on an out-of-bounds touch.
    #[inline]
    pub fn distance(&mut self, vertex: GridVertex) -> f32 {
        let i = self.ensure_index(vertex);
        self.distance[i]
    }

    /// Set the signed distance at a vertex, growing the grid if needed.
    #[inline]
    pub fn set_distance(&mut self, vertex: GridVertex, value: f32) {
        let i = self.ensure_index(vertex);
        self.distance[i] = value;
    }

    /// Update priority at a vertex, growing the grid on an out-of-bounds touch.
    #[inline]
    pub fn priority(&mut self, vertex: GridVertex) -> f32 {
        let i = self.ensure_index(vertex);
        self.priority[i]
    }

    /// Set the update priority at a vertex, growing the grid if needed.
    #[inline]
    pub fn set_priority(&mut self, vertex: GridVertex, value: f32) {
        let i = self.ensure_index(vertex);
        self.priority[i] = value;
    }

    /// Signed distance at a vertex without growing; `None` if out of bounds.
    #[inline]
    pub fn peek_distance(&self, vertex: GridVertex) -> Option<f32> {
        self.index(vertex).map(|i| self.distance[i])
    }

    /// Update priority at a vertex without growing; `None` if out of bounds.
    #[inline]
    pub fn peek_priority(&self, vertex: GridVertex) -> Option<f32> {
        self.index(vertex).map(|i| self.priority[i])
    }

    /// Raw distance slice (physical order, row-major).
    #[inline]
    pub fn distances(&self) -> &[f32] {
        &self.distance
    }

    /// Raw priority slice (physical order, row-major).
    #[inline]
    pub fn priorities(&self) -> &[f32] {
        &self.priority
    }

    /// Reset every vertex to the unobserved defaults.
    ///
    /// Shape and offset are kept, so logical coordinates remain valid.
    pub fn clear(&mut self) {
        self.distance.fill(Self::UNOBSERVED_DISTANCE);
        self.priority.fill(Self::UNOBSERVED_PRIORITY);
    }

    /// Expand the grid so the given logical vertex is in bounds.
    ///
    /// Each axis is handled independently: a coordinate below the lower
    /// bound prepends rows/columns and increments that axis's offset, a
    /// coordinate above the upper bound appends. Existing logical
    /// coordinates keep their values.
    ///
    /// Returns true if the grid was expanded.
    pub fn expand_to_include(&mut self, vertex: GridVertex) -> bool {
        let px = vertex.x + self.offset.x;
        let py = vertex.y + self.offset.y;

        let expand_left = if px < 0 { (-px) as usize } else { 0 };
        let expand_right = if px >= self.width as i32 {
            px as usize - self.width + 1
        } else {
            0
        };
        let expand_down = if py < 0 { (-py) as usize } else { 0 };
        let expand_up = if py >= self.height as i32 {
            py as usize - self.height + 1
        } else {
            0
        };

        if expand_left == 0 && expand_right == 0 && expand_down == 0 && expand_up == 0 {
            return false;
        }

        let new_width = self.width + expand_left + expand_right;
        let new_height = self.height + expand_down + expand_up;
        let new_size = new_width * new_height;

        let mut new_distance = vec![Self::UNOBSERVED_DISTANCE; new_size];
        let mut new_priority = vec![Self::UNOBSERVED_PRIORITY; new_size];

        // Copy old data row by row
        for y in 0..self.height {
            let old_row_start = y * self.width;
            let new_row_start = (y + expand_down) * new_width + expand_left;

            new_distance[new_row_start..new_row_start + self.width]
                .copy_from_slice(&self.distance[old_row_start..old_row_start + self.width]);
            new_priority[new_row_start..new_row_start + self.width]
                .copy_from_slice(&self.priority[old_row_start..old_row_start + self.width]);
        }

        self.distance = new_distance;
        self.priority = new_priority;
        self.width = new_width;
        self.height = new_height;
        self.offset = GridVertex::new(
            self.offset.x + expand_left as i32,
            self.offset.y + expand_down as i32,
        );

        true
    }
}
