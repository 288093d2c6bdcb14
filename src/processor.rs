//! End-to-end processing pipeline: map reading, normalization,
//! rasterization, elevation preparation and the waypoint route, in one
//! call. Mirrors the synchronous core the desktop front-end drives from a
//! worker task.

use std::path::PathBuf;
use std::time::Instant;

use glam::{IVec2, Vec2};
use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::config::ObstacleConfig;
use crate::elevation::{ElevationField, ElevationSampler};
use crate::map::{logical_cell_resolution_m, normalize, read_map};
use crate::raster::{RasterResult, rasterize};
use crate::route::route_waypoints;
use crate::search::{Algorithm, Heuristic};
use crate::types::{NormalizationRecord, PlannerError};

/// Externally supplied elevation raster plus its placement.
#[derive(Debug, Clone)]
pub struct ElevationInput {
    pub field: ElevationField,
    /// Meters from the logical grid's (0, 0) corner to the field origin.
    pub origin_offset: Vec2,
}

/// Everything one processing run needs.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub map_path: PathBuf,
    /// Map layers to rasterize, in precedence order.
    pub layers: Vec<String>,
    pub grid_width: u32,
    pub grid_height: u32,
    pub obstacles: ObstacleConfig,
    pub algorithm: Algorithm,
    pub heuristic: Heuristic,
    /// Grid cells to visit, in order.
    pub waypoints: Vec<IVec2>,
    /// Elevation raster; a uniform field substitutes when absent.
    pub elevation: Option<ElevationInput>,
    pub cancel: CancelToken,
}

/// Wall-clock stage durations in milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageTimings {
    pub map_ms: f64,
    pub raster_ms: f64,
    pub route_ms: f64,
}

/// Result of a processing run. The raster result and normalization record
/// can be kept by the caller for a follow-up run over the same map.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Row-major cell indices of the full route.
    pub path: Vec<u32>,
    pub raster: RasterResult,
    pub normalization: NormalizationRecord,
    /// Side length of a logical cell in meters.
    pub log_cell_m: f32,
    /// Map scale denominator the resolution was derived from.
    pub map_scale: f64,
    /// Whether the uniform elevation fallback was used.
    pub used_uniform_elevation: bool,
    pub timings: StageTimings,
}

/// Run the full pipeline for one request.
pub fn process_route(request: &ProcessRequest) -> Result<ProcessOutcome, PlannerError> {
    let mut timings = StageTimings::default();

    let stage = Instant::now();
    let document = read_map(&request.map_path, &request.layers)?;
    let normalization = normalize(&document.bounds, request.grid_width, request.grid_height)?;
    let map_scale = document.scale();
    let log_cell_m = logical_cell_resolution_m(&normalization, map_scale);
    timings.map_ms = stage.elapsed().as_secs_f64() * 1e3;
    debug!(
        scale = map_scale,
        log_cell_m, "map read and normalized"
    );

    let stage = Instant::now();
    let raster = rasterize(
        &document.features,
        &request.layers,
        &normalization,
        request.grid_width,
        request.grid_height,
        &request.obstacles,
        &request.cancel,
    )?;
    timings.raster_ms = stage.elapsed().as_secs_f64() * 1e3;

    let (sampler, used_uniform_elevation) = match &request.elevation {
        Some(input) => (
            ElevationSampler::new(input.field.clone(), input.origin_offset, log_cell_m),
            false,
        ),
        None => (
            ElevationSampler::uniform(request.grid_width, request.grid_height, log_cell_m),
            true,
        ),
    };

    let stage = Instant::now();
    let path = route_waypoints(
        &raster.grid,
        &sampler,
        &request.waypoints,
        request.algorithm,
        request.heuristic,
        &request.cancel,
    )?;
    timings.route_ms = stage.elapsed().as_secs_f64() * 1e3;

    info!(
        cells = path.len(),
        warnings = raster.warnings.len(),
        map_ms = timings.map_ms,
        raster_ms = timings.raster_ms,
        route_ms = timings.route_ms,
        "route computed"
    );

    Ok(ProcessOutcome {
        path,
        raster,
        normalization,
        log_cell_m,
        map_scale,
        used_uniform_elevation,
        timings,
    })
}
