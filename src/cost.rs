//! Edge cost model: geometric distance times terrain, divided by a slope
//! penalty derived from Tobler's hiking function.
//!
//! The slope shift in `exp(-3.5 * |slope + 0.05|)` favors slight descents
//! and is kept exactly as the documented model; do not "correct" it.

use glam::{IVec2, Vec2};

use crate::elevation::ElevationSampler;
use crate::grid::CostGrid;
use crate::types::EPSILON;

/// Cost queries over an immutable grid and elevation sampler.
///
/// Cheap to construct per search; holds no state of its own, so concurrent
/// pathfinder calls can each build one over the shared grid.
pub struct CostModel<'a> {
    grid: &'a CostGrid,
    sampler: &'a ElevationSampler,
}

/// Center of a cell in continuous cell coordinates.
#[inline]
pub fn cell_center(p: IVec2) -> Vec2 {
    p.as_vec2() + Vec2::splat(0.5)
}

impl<'a> CostModel<'a> {
    pub fn new(grid: &'a CostGrid, sampler: &'a ElevationSampler) -> Self {
        Self { grid, sampler }
    }

    pub fn grid(&self) -> &CostGrid {
        self.grid
    }

    /// Cost of moving between two adjacent cells, or `None` when either end
    /// is impassable or out of bounds.
    pub fn edge_cost(&self, a: IVec2, b: IVec2) -> Option<f32> {
        let ca = self.grid.get(a)?;
        let cb = self.grid.get(b)?;
        if ca.is_impassable() || cb.is_impassable() {
            return None;
        }
        Some(self.span_cost(cell_center(a), cell_center(b), ca.multiplier, cb.multiplier))
    }

    /// Integrated cost of the straight segment between two cell centers.
    ///
    /// The segment is sampled at a stride of at most one cell; each
    /// sub-segment is charged like an adjacent-cell edge with terrain and
    /// elevation evaluated at its endpoints. `None` when any sampled cell is
    /// impassable.
    pub fn los_cost(&self, a: IVec2, b: IVec2) -> Option<f32> {
        let start = cell_center(a);
        let end = cell_center(b);
        let len_cells = (end - start).length();
        if len_cells <= EPSILON {
            return Some(0.0);
        }

        let steps = (len_cells.ceil() as usize).max(1);
        let mut total = 0.0f32;
        let mut prev_point = start;
        let mut prev_mult = self.multiplier_at(start)?;

        for k in 1..=steps {
            let t = k as f32 / steps as f32;
            let point = start.lerp(end, t);
            let mult = self.multiplier_at(point)?;
            total += self.span_cost(prev_point, point, prev_mult, mult);
            prev_point = point;
            prev_mult = mult;
        }
        Some(total)
    }

    /// Whether the straight segment between two cell centers is clear.
    pub fn line_of_sight(&self, a: IVec2, b: IVec2) -> bool {
        self.los_cost(a, b).is_some()
    }

    fn multiplier_at(&self, p: Vec2) -> Option<f32> {
        let cell = IVec2::new(p.x.floor() as i32, p.y.floor() as i32);
        let c = self.grid.get(cell)?;
        if c.is_impassable() {
            return None;
        }
        Some(c.multiplier)
    }

    /// Tobler-weighted cost of one straight span between two points in cell
    /// coordinates, with known endpoint multipliers.
    fn span_cost(&self, pa: Vec2, pb: Vec2, ma: f32, mb: f32) -> f32 {
        let dist_m = (pb - pa).length() * self.sampler.log_cell_m();
        let ea = self.sampler.elevation_at(pa);
        let eb = self.sampler.elevation_at(pb);
        let slope = if dist_m > EPSILON {
            (eb - ea) / dist_m
        } else {
            0.0
        };
        let slope_penalty = (-3.5 * (slope + 0.05).abs()).exp();
        let terrain = 0.5 * (ma + mb);
        dist_m * terrain / slope_penalty
    }
}

/// Total model cost of a path of cell indices.
///
/// Adjacent pairs are charged as 8-connected edges, non-adjacent pairs as
/// line-of-sight segments. `None` when any hop is blocked.
pub fn path_cost(grid: &CostGrid, sampler: &ElevationSampler, path: &[u32]) -> Option<f32> {
    let model = CostModel::new(grid, sampler);
    let mut total = 0.0f32;
    for pair in path.windows(2) {
        let a = grid.coords(pair[0]);
        let b = grid.coords(pair[1]);
        let d = (b - a).abs();
        total += if d.x <= 1 && d.y <= 1 {
            model.edge_cost(a, b)?
        } else {
            model.los_cost(a, b)?
        };
    }
    Some(total)
}
