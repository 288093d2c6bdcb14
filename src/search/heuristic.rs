use std::f32::consts::SQRT_2;

use glam::IVec2;
use serde::Deserialize;

use crate::types::MIN_COST_FACTOR;

/// Heuristic selector for the informed pathfinders. Ignored by BFS and
/// Dijkstra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Heuristic {
    Euclidean,
    /// Octile distance for 8-connected grids.
    Diagonal,
    Manhattan,
    /// Octile distance scaled by the lowest observed terrain/slope factor.
    #[default]
    MinCost,
}

impl Heuristic {
    /// Estimated remaining cost from `a` to `b` in meters.
    pub(crate) fn estimate(&self, a: IVec2, b: IVec2, log_cell_m: f32) -> f32 {
        let dx = (a.x - b.x).abs() as f32;
        let dy = (a.y - b.y).abs() as f32;
        match self {
            Self::Euclidean => (dx * dx + dy * dy).sqrt() * log_cell_m,
            Self::Manhattan => (dx + dy) * log_cell_m,
            Self::Diagonal => log_cell_m * octile(dx, dy),
            Self::MinCost => log_cell_m * octile(dx, dy) * MIN_COST_FACTOR,
        }
    }
}

#[inline]
fn octile(dx: f32, dy: f32) -> f32 {
    (dx + dy) + (SQRT_2 - 2.0) * dx.min(dy)
}
