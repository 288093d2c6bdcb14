use std::collections::VecDeque;

use glam::IVec2;

use crate::cancel::CancelToken;
use crate::grid::CostGrid;
use crate::search::{NodeState, ScoreBoard};
use crate::types::PlannerError;

/// Breadth-first hop-count search. Debug baseline: terrain multipliers and
/// slope are ignored, impassable cells still block.
pub(crate) fn find(
    grid: &CostGrid,
    start: IVec2,
    end: IVec2,
    cancel: &CancelToken,
) -> Result<Option<Vec<u32>>, PlannerError> {
    let mut board = ScoreBoard::new(grid.len());
    let mut queue = VecDeque::new();

    let start_idx = grid.index(start);
    let goal_idx = grid.index(end);
    board.g[start_idx as usize] = 0.0;
    board.state[start_idx as usize] = NodeState::Open;
    queue.push_back(start_idx);

    while let Some(idx) = queue.pop_front() {
        board.state[idx as usize] = NodeState::Closed;

        if cancel.is_cancelled() {
            return Err(PlannerError::Cancelled);
        }
        if idx == goal_idx {
            return Ok(Some(board.reconstruct(goal_idx)));
        }

        let current = grid.coords(idx);
        let hops = board.g[idx as usize];
        super::for_each_neighbor(grid, current, |n| {
            let ni = grid.index(n) as usize;
            if board.state[ni] != NodeState::Unseen {
                return;
            }
            if grid.get(n).is_some_and(|c| c.is_impassable()) {
                return;
            }
            board.g[ni] = hops + 1.0;
            board.parent[ni] = idx;
            board.state[ni] = NodeState::Open;
            queue.push_back(ni as u32);
        });
    }

    Ok(None)
}
