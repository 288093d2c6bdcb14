//! Grid pathfinding over the rasterized cost grid.
//!
//! All algorithms share the cost model of [`crate::cost`] and the same
//! per-cell bookkeeping: a `g` score, a parent index and an
//! `{Unseen, Open, Closed}` state. The open list is a binary heap keyed by
//! `f`, breaking ties on lower `h` and then on insertion order.

mod astar;
mod bfs;
mod dijkstra;
mod heuristic;
mod lazy_theta;
mod theta;

pub use heuristic::Heuristic;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::IVec2;
use serde::Deserialize;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::elevation::ElevationSampler;
use crate::grid::CostGrid;
use crate::types::{DX, DY, NUM_DIRECTIONS, PlannerError};

/// The closed set of supported algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Hop-count baseline; ignores terrain and slope.
    Bfs,
    Dijkstra,
    #[default]
    AStar,
    ThetaStar,
    LazyThetaStar,
}

impl Algorithm {
    /// Whether the produced path may contain non-adjacent line-of-sight
    /// jumps.
    pub fn is_any_angle(&self) -> bool {
        matches!(self, Self::ThetaStar | Self::LazyThetaStar)
    }
}

/// Find a path between two cells, as row-major cell indices.
///
/// Returns `Ok(None)` when no path exists or either endpoint is out of
/// bounds or impassable; `start == end` yields the single-cell path.
pub fn find_path(
    grid: &CostGrid,
    sampler: &ElevationSampler,
    start: IVec2,
    end: IVec2,
    algorithm: Algorithm,
    heuristic: Heuristic,
    cancel: &CancelToken,
) -> Result<Option<Vec<u32>>, PlannerError> {
    if !endpoint_traversable(grid, start) || !endpoint_traversable(grid, end) {
        return Ok(None);
    }
    if start == end {
        return Ok(Some(vec![grid.index(start)]));
    }

    let result = match algorithm {
        Algorithm::Bfs => bfs::find(grid, start, end, cancel),
        Algorithm::Dijkstra => dijkstra::find(grid, sampler, start, end, cancel),
        Algorithm::AStar => astar::find(grid, sampler, start, end, heuristic, cancel),
        Algorithm::ThetaStar => theta::find(grid, sampler, start, end, heuristic, cancel),
        Algorithm::LazyThetaStar => lazy_theta::find(grid, sampler, start, end, heuristic, cancel),
    }?;

    debug!(
        ?algorithm,
        found = result.is_some(),
        nodes = result.as_ref().map(Vec::len).unwrap_or(0),
        "path query finished"
    );
    Ok(result)
}

fn endpoint_traversable(grid: &CostGrid, p: IVec2) -> bool {
    grid.get(p).is_some_and(|c| !c.is_impassable())
}

/// Sentinel parent index meaning "none".
pub(crate) const NIL: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeState {
    Unseen,
    Open,
    Closed,
}

/// Per-cell search bookkeeping, allocated once per query.
pub(crate) struct ScoreBoard {
    pub g: Vec<f32>,
    pub parent: Vec<u32>,
    pub state: Vec<NodeState>,
}

impl ScoreBoard {
    pub fn new(len: usize) -> Self {
        Self {
            g: vec![f32::INFINITY; len],
            parent: vec![NIL; len],
            state: vec![NodeState::Unseen; len],
        }
    }

    /// Walk parents back from the goal and reverse into a start-first path.
    pub fn reconstruct(&self, goal: u32) -> Vec<u32> {
        let mut path = Vec::new();
        let mut cursor = goal;
        while cursor != NIL {
            path.push(cursor);
            cursor = self.parent[cursor as usize];
        }
        path.reverse();
        path
    }
}

/// Open-list entry. Orders as a max-heap element so that the smallest `f`
/// pops first; ties prefer the lower heuristic, then earlier insertion.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpenEntry {
    pub f: f32,
    pub h: f32,
    pub seq: u64,
    pub idx: u32,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then(other.h.total_cmp(&self.h))
            .then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub(crate) type OpenList = BinaryHeap<OpenEntry>;

/// Visit the in-bounds 8-neighbors of a cell.
#[inline]
pub(crate) fn for_each_neighbor(grid: &CostGrid, p: IVec2, mut visit: impl FnMut(IVec2)) {
    for dir in 0..NUM_DIRECTIONS {
        let n = IVec2::new(p.x + DX[dir], p.y + DY[dir]);
        if grid.in_bounds(n) {
            visit(n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_entry_orders_by_f_then_h_then_seq() {
        let mut heap = OpenList::new();
        heap.push(OpenEntry { f: 5.0, h: 2.0, seq: 0, idx: 0 });
        heap.push(OpenEntry { f: 3.0, h: 3.0, seq: 1, idx: 1 });
        heap.push(OpenEntry { f: 3.0, h: 1.0, seq: 3, idx: 3 });
        heap.push(OpenEntry { f: 3.0, h: 1.0, seq: 2, idx: 2 });

        // Lowest f first; among f ties the lower h; among full ties the
        // earlier insertion.
        assert_eq!(heap.pop().unwrap().idx, 2);
        assert_eq!(heap.pop().unwrap().idx, 3);
        assert_eq!(heap.pop().unwrap().idx, 1);
        assert_eq!(heap.pop().unwrap().idx, 0);
    }
}
