use glam::IVec2;
use thiserror::Error;

/// Everything the planner can report to a caller.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("map load failed: {0}")]
    MapLoad(#[from] MapLoadError),
    #[error("feature bounds have zero extent")]
    DegenerateBounds,
    #[error("waypoint {index} is out of bounds or impassable")]
    InvalidWaypoint { index: usize },
    #[error("no route for segment {segment} from {from:?} to {to:?}")]
    SegmentUnreachable {
        segment: usize,
        from: IVec2,
        to: IVec2,
    },
    #[error("cancelled")]
    Cancelled,
    #[error("bad config at line {line}: {message}")]
    BadConfig { line: usize, message: String },
    #[error("invalid input data: {0}")]
    InvalidData(String),
}

/// Failure inside the map reader. Wrapped by [`PlannerError::MapLoad`].
#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("xml: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("{0}")]
    Structure(String),
}
