//! Uniform spatial grid for the bullet-vs-enemy broad phase
//!
//! Rebuilt from scratch every step. An entry is indexed in every cell its
//! bounding box touches, so one id may sit in several cells; `query`
//! de-duplicates by id with a reusable mark table, linear in candidates.

use std::collections::HashMap;

use glam::Vec2;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
    /// Per-id mark used during a query; all false between queries
    seen: Vec<bool>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "grid cell size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
            seen: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    fn cell_of(&self, v: f32) -> i32 {
        (v / self.cell_size).floor() as i32
    }

    /// Inclusive (col, row) range covered by a box centered at `center`
    fn cell_range(&self, center: Vec2, half: Vec2) -> (i32, i32, i32, i32) {
        (
            self.cell_of(center.x - half.x),
            self.cell_of(center.x + half.x),
            self.cell_of(center.y - half.y),
            self.cell_of(center.y + half.y),
        )
    }

    /// Discard all bucket contents (keeps allocations)
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    /// Index `id` in every cell its box (center ± half extent) touches
    pub fn insert(&mut self, id: usize, center: Vec2, half_extent: Vec2) {
        if id >= self.seen.len() {
            self.seen.resize(id + 1, false);
        }
        let (c0, c1, r0, r1) = self.cell_range(center, half_extent);
        for col in c0..=c1 {
            for row in r0..=r1 {
                self.cells.entry((col, row)).or_default().push(id);
            }
        }
    }

    /// Ids in cells overlapping the `w` x `h` rectangle centered at `center`,
    /// each id at most once, in first-seen order. Clears `out` first.
    pub fn query_into(&mut self, center: Vec2, w: f32, h: f32, out: &mut Vec<usize>) {
        out.clear();
        let (c0, c1, r0, r1) = self.cell_range(center, Vec2::new(w * 0.5, h * 0.5));
        for col in c0..=c1 {
            for row in r0..=r1 {
                let Some(bucket) = self.cells.get(&(col, row)) else {
                    continue;
                };
                for &id in bucket {
                    if !self.seen[id] {
                        self.seen[id] = true;
                        out.push(id);
                    }
                }
            }
        }
        for &id in out.iter() {
            self.seen[id] = false;
        }
    }

    pub fn query(&mut self, center: Vec2, w: f32, h: f32) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_into(center, w, h, &mut out);
        out
    }

    /// Whether no cell holds any entry
    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Vec::is_empty)
    }
}
