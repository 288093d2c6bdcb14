//! Segment orchestration: route all waypoints in order through the
//! selected pathfinder and concatenate the per-segment paths.

use glam::IVec2;
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::elevation::ElevationSampler;
use crate::grid::CostGrid;
use crate::search::{Algorithm, Heuristic, find_path};
use crate::types::PlannerError;

/// Compute one path visiting every waypoint in order.
///
/// Waypoints must be in bounds and traversable. Segment joins drop the
/// duplicated shared cell; a segment that cannot be reached aborts the
/// whole route.
pub fn route_waypoints(
    grid: &CostGrid,
    sampler: &ElevationSampler,
    waypoints: &[IVec2],
    algorithm: Algorithm,
    heuristic: Heuristic,
    cancel: &CancelToken,
) -> Result<Vec<u32>, PlannerError> {
    for (index, &w) in waypoints.iter().enumerate() {
        let valid = grid.get(w).is_some_and(|c| !c.is_impassable());
        if !valid {
            return Err(PlannerError::InvalidWaypoint { index });
        }
    }

    let mut full_path: Vec<u32> = Vec::new();
    if waypoints.len() == 1 {
        full_path.push(grid.index(waypoints[0]));
        return Ok(full_path);
    }

    for (segment, pair) in waypoints.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);

        if from == to {
            let idx = grid.index(from);
            if full_path.last() != Some(&idx) {
                full_path.push(idx);
            }
            continue;
        }

        let segment_path = find_path(grid, sampler, from, to, algorithm, heuristic, cancel)?
            .ok_or(PlannerError::SegmentUnreachable { segment, from, to })?;

        debug!(segment, cells = segment_path.len(), "segment routed");

        if full_path.is_empty() {
            full_path = segment_path;
        } else if full_path.last() == segment_path.first() {
            full_path.extend_from_slice(&segment_path[1..]);
        } else {
            // Segments should chain; a mismatch points at a caller bug but
            // the route is still usable.
            warn!(segment, "segment start does not match previous end");
            full_path.extend_from_slice(&segment_path);
        }
    }

    Ok(full_path)
}
