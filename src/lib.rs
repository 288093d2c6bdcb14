//! Terrain-aware route planning over rasterized orienteering maps.
//!
//! The pipeline reads an XML map document into geometric features,
//! rasterizes them into a cost grid, and runs grid or any-angle search over
//! a Tobler-derived slope and terrain cost model to connect an ordered
//! sequence of waypoints. See [`processor::process_route`] for the one-call
//! entry point, or compose the stages directly.

pub mod cancel;
pub mod config;
pub mod cost;
pub mod elevation;
pub mod grid;
pub mod map;
pub mod processor;
pub mod raster;
pub mod route;
pub mod search;
pub mod types;

pub use cancel::CancelToken;
pub use config::{GridCacheKey, ObstacleConfig, PlannerConfig};
pub use cost::{CostModel, path_cost};
pub use elevation::{ElevationField, ElevationSampler};
pub use grid::{Cell, CostGrid, Grid2d};
pub use map::{Feature, MapDocument, read_map};
pub use processor::{ElevationInput, ProcessOutcome, ProcessRequest, process_route};
pub use raster::{RasterResult, RasterWarning, rasterize};
pub use route::route_waypoints;
pub use search::{Algorithm, Heuristic, find_path};
pub use types::{NormalizationRecord, PlannerError};
