//! Lazy Theta*: Theta* with deferred line-of-sight checks.
//!
//! Successors optimistically assume visibility from the expanding node's
//! parent; the check runs only when a node is popped. An occluded
//! assumption is repaired from the node's already-closed neighbors, which
//! cuts line-of-sight traversals by roughly an order of magnitude on open
//! maps. The optimistic g uses the same admissible factor as the min-cost
//! heuristic, so verified costs only ever grow.

use glam::IVec2;

use crate::cancel::CancelToken;
use crate::cost::{CostModel, cell_center};
use crate::elevation::ElevationSampler;
use crate::grid::CostGrid;
use crate::search::{Heuristic, NIL, NodeState, OpenEntry, OpenList, ScoreBoard};
use crate::types::{MIN_COST_FACTOR, PlannerError};

pub(crate) fn find(
    grid: &CostGrid,
    sampler: &ElevationSampler,
    start: IVec2,
    end: IVec2,
    heuristic: Heuristic,
    cancel: &CancelToken,
) -> Result<Option<Vec<u32>>, PlannerError> {
    let model = CostModel::new(grid, sampler);
    let log_cell_m = sampler.log_cell_m();
    let mut board = ScoreBoard::new(grid.len());
    let mut open = OpenList::new();
    let mut seq = 0u64;

    let start_idx = grid.index(start);
    let goal_idx = grid.index(end);
    board.g[start_idx as usize] = 0.0;
    board.state[start_idx as usize] = NodeState::Open;
    let h0 = heuristic.estimate(start, end, log_cell_m);
    open.push(OpenEntry {
        f: h0,
        h: h0,
        seq,
        idx: start_idx,
    });

    while let Some(entry) = open.pop() {
        let ci = entry.idx as usize;
        if board.state[ci] == NodeState::Closed {
            continue;
        }
        board.state[ci] = NodeState::Closed;

        if cancel.is_cancelled() {
            return Err(PlannerError::Cancelled);
        }

        // Deferred check: the assumed parent may turn out occluded.
        if entry.idx != start_idx {
            set_vertex(grid, &model, &mut board, entry.idx);
        }
        if entry.idx == goal_idx {
            return Ok(Some(board.reconstruct(goal_idx)));
        }

        let current = grid.coords(entry.idx);
        let anchor = if board.parent[ci] == NIL {
            entry.idx
        } else {
            board.parent[ci]
        };
        let anchor_pos = grid.coords(anchor);
        let anchor_g = board.g[anchor as usize];

        super::for_each_neighbor(grid, current, |n| {
            let ni = grid.index(n) as usize;
            if board.state[ni] == NodeState::Closed {
                return;
            }
            if grid.get(n).is_some_and(|c| c.is_impassable()) {
                return;
            }

            let tentative = anchor_g + optimistic_cost(anchor_pos, n, log_cell_m);
            if tentative < board.g[ni] {
                board.g[ni] = tentative;
                board.parent[ni] = anchor;
                board.state[ni] = NodeState::Open;
                let h = heuristic.estimate(n, end, log_cell_m);
                seq += 1;
                open.push(OpenEntry {
                    f: tentative + h,
                    h,
                    seq,
                    idx: ni as u32,
                });
            }
        });
    }

    Ok(None)
}

/// Lower bound on the traversal cost of a straight segment: geometric
/// length scaled by the minimum combined terrain/slope factor.
#[inline]
fn optimistic_cost(a: IVec2, b: IVec2, log_cell_m: f32) -> f32 {
    (cell_center(b) - cell_center(a)).length() * log_cell_m * MIN_COST_FACTOR
}

/// Verify the assumed parent of a freshly popped node. On a clear sight
/// line the optimistic g is replaced by the integrated cost; otherwise the
/// parent is rebuilt from the cheapest closed neighbor.
fn set_vertex(grid: &CostGrid, model: &CostModel, board: &mut ScoreBoard, idx: u32) {
    let ci = idx as usize;
    let parent_idx = board.parent[ci];
    if parent_idx == NIL {
        return;
    }

    let here = grid.coords(idx);
    let assumed = grid.coords(parent_idx);
    if let Some(cost) = model.los_cost(assumed, here) {
        board.g[ci] = board.g[parent_idx as usize] + cost;
        return;
    }

    let mut best_g = f32::INFINITY;
    let mut best_parent = NIL;
    super::for_each_neighbor(grid, here, |n| {
        let ni = grid.index(n) as usize;
        if board.state[ni] != NodeState::Closed {
            return;
        }
        let Some(cost) = model.edge_cost(n, here) else {
            return;
        };
        let candidate = board.g[ni] + cost;
        if candidate < best_g {
            best_g = candidate;
            best_parent = grid.index(n);
        }
    });

    // A popped node was generated from a closed neighbor, so a repair
    // candidate always exists.
    board.g[ci] = best_g;
    board.parent[ci] = best_parent;
}
