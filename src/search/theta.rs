//! Theta*: any-angle A* that reparents successors to the grandparent when
//! line of sight allows, producing paths of few long straight segments.

use glam::IVec2;

use crate::cancel::CancelToken;
use crate::cost::CostModel;
use crate::elevation::ElevationSampler;
use crate::grid::CostGrid;
use crate::search::{Heuristic, NIL, NodeState, OpenEntry, OpenList, ScoreBoard};
use crate::types::PlannerError;

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
        if entry.idx == goal_idx {
            return Ok(Some(board.reconstruct(goal_idx)));
        }

        let current = grid.coords(entry.idx);
        let parent_idx = board.parent[ci];
        super::for_each_neighbor(grid, current, |n| {
            let ni = grid.index(n) as usize;
            if board.state[ni] == NodeState::Closed {
                return;
            }

            // Path 2: skip the corner entirely when the grandparent sees the
            // successor. Otherwise the conventional relaxation applies.
            let relaxed = if parent_idx != NIL {
                let grandparent = grid.coords(parent_idx);
                model
                    .los_cost(grandparent, n)
                    .map(|cost| (parent_idx, board.g[parent_idx as usize] + cost))
            } else {
                None
            };
            let (via, tentative) = match relaxed {
                Some(pair) => pair,
                None => {
                    let Some(cost) = model.edge_cost(current, n) else {
                        return;
                    };
                    (entry.idx, board.g[ci] + cost)
                }
            };

            if tentative < board.g[ni] {
                board.g[ni] = tentative;
                board.parent[ni] = via;
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
