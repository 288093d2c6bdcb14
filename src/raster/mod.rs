//! Two-pass cost grid rasterization.
//!
//! Pass 1 samples feature boundaries with integer Bresenham walks; pass 2
//! scanline-fills closed areas, holes included. Features are processed in
//! parallel into per-feature cell lists, then merged sequentially in layer
//! order so the result is identical to a serial rasterization.

mod boundary;
mod scanline;

use std::collections::HashMap;
use std::fmt;

use bitvec::bitvec;
use bitvec::vec::BitVec;
use glam::{DVec2, IVec2};
use rayon::prelude::*;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::config::ObstacleConfig;
use crate::grid::{Cell, CostGrid, Grid2d, SYMBOL_NONE};
use crate::map::{Coord, Feature, FeatureKind};
use crate::types::{NormalizationRecord, OPEN_TERRAIN, PlannerError};

/// Non-fatal findings accumulated during rasterization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterWarning {
    /// Symbol code absent from the obstacle config; open-terrain cost used.
    UnknownSymbol { code: String },
    /// Feature had too few usable coordinates and was skipped.
    DegenerateGeometry { symbol: String },
    /// Dashed boundary rasterized as solid.
    DashedAsSolid { symbol: String },
}

impl fmt::Display for RasterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSymbol { code } => {
                write!(f, "symbol {code} not in obstacle config, using open terrain")
            }
            Self::DegenerateGeometry { symbol } => {
                write!(f, "degenerate geometry for symbol {symbol}, feature skipped")
            }
            Self::DashedAsSolid { symbol } => {
                write!(f, "dashed boundary of symbol {symbol} rasterized as solid")
            }
        }
    }
}

/// The rasterized grid plus its symbol table and accumulated warnings.
#[derive(Debug, Clone)]
pub struct RasterResult {
    pub grid: CostGrid,
    /// Symbol code per cell symbol id; slot 0 is untouched terrain.
    pub symbols: Vec<String>,
    pub warnings: Vec<RasterWarning>,
}

impl RasterResult {
    /// Symbol code that set a cell, if any feature touched it.
    pub fn symbol_at(&self, p: IVec2) -> Option<&str> {
        let cell = self.grid.get(p)?;
        if cell.symbol == SYMBOL_NONE {
            return None;
        }
        self.symbols.get(cell.symbol as usize).map(String::as_str)
    }
}

/// Cells contributed by one feature, ready for the deterministic merge.
struct FeatureRaster {
    layer_rank: u8,
    doc_order: usize,
    multiplier: f32,
    symbol: u16,
    cells: Vec<u32>,
    warnings: Vec<RasterWarning>,
}

/// Rasterize features into a `width x height` cost grid.
///
/// Layers are merged in the order given by `layer_order`; within a layer,
/// document order wins. Impassable cells are never downgraded by a finite
/// multiplier from a later feature.
pub fn rasterize(
    features: &[Feature],
    layer_order: &[String],
    norm: &NormalizationRecord,
    width: u32,
    height: u32,
    obstacles: &ObstacleConfig,
    cancel: &CancelToken,
) -> Result<RasterResult, PlannerError> {
    let mut symbols = vec![String::new()];
    let mut symbol_ids: HashMap<&str, u16> = HashMap::new();
    let mut warnings = Vec::new();

    for feature in features {
        if !symbol_ids.contains_key(feature.symbol_code.as_str()) {
            let id = symbols.len() as u16;
            symbol_ids.insert(feature.symbol_code.as_str(), id);
            symbols.push(feature.symbol_code.clone());
            if obstacles.multiplier(&feature.symbol_code).is_none() {
                warnings.push(RasterWarning::UnknownSymbol {
                    code: feature.symbol_code.clone(),
                });
            }
        }
    }

    let mut rasters = features
        .par_iter()
        .enumerate()
        .map(|(doc_order, feature)| {
            if cancel.is_cancelled() {
                return Err(PlannerError::Cancelled);
            }
            let layer_rank = layer_order
                .iter()
                .position(|l| *l == feature.layer)
                .map(|i| i as u8);
            Ok(layer_rank.map(|rank| {
                rasterize_feature(
                    feature,
                    rank,
                    doc_order,
                    symbol_ids[feature.symbol_code.as_str()],
                    obstacles
                        .multiplier(&feature.symbol_code)
                        .unwrap_or(OPEN_TERRAIN),
                    norm,
                    width,
                    height,
                )
            }))
        })
        .collect::<Result<Vec<_>, PlannerError>>()?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

    let grid = merge_rasters(&mut rasters, width, height, &mut warnings)?;

    debug!(
        width,
        height,
        features = features.len(),
        warnings = warnings.len(),
        "rasterization complete"
    );

    Ok(RasterResult {
        grid,
        symbols,
        warnings,
    })
}

/// Merge per-feature cell lists into the final grid, in layer then document
/// order. Shared by the parallel path and the serial reference used in
/// tests.
fn merge_rasters(
    rasters: &mut [FeatureRaster],
    width: u32,
    height: u32,
    warnings: &mut Vec<RasterWarning>,
) -> Result<CostGrid, PlannerError> {
    rasters.sort_by_key(|r| (r.layer_rank, r.doc_order));

    let mut grid = Grid2d::filled(width, height, Cell::OPEN)?;
    for raster in rasters.iter_mut() {
        warnings.append(&mut raster.warnings);
        let impassable_write = raster.multiplier < 0.0;
        for &idx in &raster.cells {
            let cell = &mut grid.cells_mut()[idx as usize];
            if cell.is_impassable() && !impassable_write {
                continue;
            }
            *cell = Cell::new(raster.multiplier, raster.symbol, raster.layer_rank);
        }
    }
    Ok(grid)
}

#[allow(clippy::too_many_arguments)]
fn rasterize_feature(
    feature: &Feature,
    layer_rank: u8,
    doc_order: usize,
    symbol: u16,
    multiplier: f32,
    norm: &NormalizationRecord,
    width: u32,
    height: u32,
) -> FeatureRaster {
    let mut raster = FeatureRaster {
        layer_rank,
        doc_order,
        multiplier,
        symbol,
        cells: Vec::new(),
        warnings: Vec::new(),
    };
    let mut mask = bitvec![0; (width as usize) * (height as usize)];

    match feature.kind {
        FeatureKind::Point => {
            let cell = norm.to_cell(feature.coords[0].pos);
            push_cell(cell, width, height, &mut mask, &mut raster.cells);
        }
        FeatureKind::Line => {
            if feature.coords.len() < 2 {
                raster.warnings.push(RasterWarning::DegenerateGeometry {
                    symbol: feature.symbol_code.clone(),
                });
                return raster;
            }
            boundary_pass(
                &feature.coords,
                false,
                norm,
                width,
                height,
                &mut mask,
                &mut raster.cells,
            );
        }
        FeatureKind::Area => {
            let rings = feature.rings();
            if rings[0].len() < 3 {
                raster.warnings.push(RasterWarning::DegenerateGeometry {
                    symbol: feature.symbol_code.clone(),
                });
                return raster;
            }
            for &ring in &rings {
                boundary_pass(
                    ring,
                    true,
                    norm,
                    width,
                    height,
                    &mut mask,
                    &mut raster.cells,
                );
            }
            let ring_points: Vec<Vec<DVec2>> = rings
                .iter()
                .map(|ring| {
                    ring.iter()
                        .map(|c| norm.to_cell_continuous(c.pos))
                        .collect()
                })
                .collect();
            scanline::fill_rings(&ring_points, width, height, &mut |p| {
                push_cell(p, width, height, &mut mask, &mut raster.cells);
            });
        }
    }

    if feature.has_dash() {
        raster.warnings.push(RasterWarning::DashedAsSolid {
            symbol: feature.symbol_code.clone(),
        });
    }

    raster
}

/// Bresenham-walk the segments of a coordinate run. A segment whose start
/// vertex carries the gap flag emits nothing; dash segments are solid.
fn boundary_pass(
    coords: &[Coord],
    closed: bool,
    norm: &NormalizationRecord,
    width: u32,
    height: u32,
    mask: &mut BitVec,
    cells: &mut Vec<u32>,
) {
    let n = coords.len();
    if n < 2 {
        return;
    }
    let last = if closed { n } else { n - 1 };
    for i in 0..last {
        let from = &coords[i];
        if from.flags.gap {
            continue;
        }
        let to = &coords[(i + 1) % n];
        let a = norm.to_cell(from.pos);
        let b = norm.to_cell(to.pos);
        boundary::line_cells(a, b, width, height, &mut |p| {
            push_cell(p, width, height, mask, cells);
        });
    }
}

#[inline]
fn push_cell(p: IVec2, width: u32, height: u32, mask: &mut BitVec, cells: &mut Vec<u32>) {
    if p.x < 0 || p.y < 0 || p.x as u32 >= width || p.y as u32 >= height {
        return;
    }
    let idx = (p.y as u32) * width + (p.x as u32);
    if !mask[idx as usize] {
        mask.set(idx as usize, true);
        cells.push(idx);
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::map::{CoordFlags, feature::FLAG_GAP};
    use crate::types::{IMPASSABLE, MapBounds};

    fn norm_1to1(width: u32, height: u32) -> NormalizationRecord {
        let mut bounds = MapBounds::empty();
        bounds.expand_to_include(DVec2::ZERO);
        bounds.expand_to_include(DVec2::new(width as f64, height as f64));
        NormalizationRecord::from_bounds(&bounds, width, height).unwrap()
    }

    fn coord(x: f64, y: f64) -> Coord {
        Coord {
            pos: DVec2::new(x, y),
            flags: CoordFlags::default(),
        }
    }

    fn area(symbol: &str, layer: &str, points: &[(f64, f64)]) -> Feature {
        Feature {
            symbol_code: symbol.to_string(),
            layer: layer.to_string(),
            kind: FeatureKind::Area,
            coords: points.iter().map(|&(x, y)| coord(x, y)).collect(),
        }
    }

    fn barrier_layers() -> Vec<String> {
        vec!["barrier".to_string()]
    }

    fn raster(
        features: &[Feature],
        obstacles: &ObstacleConfig,
        width: u32,
        height: u32,
    ) -> RasterResult {
        rasterize(
            features,
            &barrier_layers(),
            &norm_1to1(width, height),
            width,
            height,
            obstacles,
            &CancelToken::new(),
        )
        .unwrap()
    }

    #[test]
    fn area_fill_sets_interior_and_boundary() {
        let obstacles = ObstacleConfig::parse("301: 5.0").unwrap();
        let feature = area("301", "barrier", &[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)]);
        let result = raster(&[feature], &obstacles, 10, 10);

        let inside = result.grid.get(IVec2::new(4, 4)).unwrap();
        assert_eq!(inside.multiplier, 5.0);
        assert_eq!(result.symbol_at(IVec2::new(4, 4)), Some("301"));
        // Boundary cell, stamped by pass 1.
        assert_eq!(result.grid.get(IVec2::new(2, 2)).unwrap().multiplier, 5.0);
        // Untouched terrain stays open.
        assert_eq!(result.grid.get(IVec2::new(9, 9)).unwrap().multiplier, 1.0);
    }

    #[test]
    fn hole_keeps_open_terrain() {
        let obstacles = ObstacleConfig::parse("301: 5.0").unwrap();
        let mut feature = area(
            "301",
            "barrier",
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        );
        let mut hole = vec![coord(3.0, 3.0), coord(7.0, 3.0), coord(7.0, 7.0), coord(3.0, 7.0)];
        hole[0].flags.hole_start = true;
        feature.coords.extend(hole);

        let result = raster(&[feature], &obstacles, 10, 10);
        // Deep inside the hole: open. Hole boundary itself is rasterized.
        assert_eq!(result.grid.get(IVec2::new(5, 5)).unwrap().multiplier, 1.0);
        assert_eq!(result.grid.get(IVec2::new(1, 1)).unwrap().multiplier, 5.0);
    }

    #[test]
    fn impassable_dominates_finite() {
        let obstacles = ObstacleConfig::parse("201: -1.0\n403: 1.25").unwrap();
        let wall = area("201", "barrier", &[(2.0, 0.0), (4.0, 0.0), (4.0, 8.0), (2.0, 8.0)]);
        let rough = area("403", "barrier", &[(0.0, 0.0), (8.0, 0.0), (8.0, 8.0), (0.0, 8.0)]);
        // Document order: wall first, rough after; rough must not erase it.
        let result = raster(&[wall, rough], &obstacles, 8, 8);

        assert!(result.grid.get(IVec2::new(3, 4)).unwrap().is_impassable());
        assert_eq!(result.grid.get(IVec2::new(6, 4)).unwrap().multiplier, 1.25);
    }

    #[test]
    fn later_layer_overrides_finite() {
        let obstacles = ObstacleConfig::parse("403: 1.25\n504: 0.6").unwrap();
        let rough = area("403", "terrain", &[(0.0, 0.0), (8.0, 0.0), (8.0, 8.0), (0.0, 8.0)]);
        let road = area("504", "roads", &[(0.0, 3.0), (8.0, 3.0), (8.0, 5.0), (0.0, 5.0)]);
        let layers = vec!["terrain".to_string(), "roads".to_string()];
        let result = rasterize(
            &[road.clone(), rough.clone()],
            &layers,
            &norm_1to1(8, 8),
            8,
            8,
            &obstacles,
            &CancelToken::new(),
        )
        .unwrap();

        // Road is in the later layer, so it wins despite document order.
        assert_eq!(result.grid.get(IVec2::new(4, 4)).unwrap().multiplier, 0.6);
        assert_eq!(result.grid.get(IVec2::new(4, 1)).unwrap().multiplier, 1.25);
    }

    #[test]
    fn gap_segment_emits_no_boundary() {
        let obstacles = ObstacleConfig::parse("509: -1.0").unwrap();
        let mut fence = Feature {
            symbol_code: "509".to_string(),
            layer: "barrier".to_string(),
            kind: FeatureKind::Line,
            coords: vec![coord(0.0, 4.0), coord(4.0, 4.0), coord(8.0, 4.0)],
        };
        fence.coords[1].flags = CoordFlags::from_bits(FLAG_GAP);

        let result = raster(&[fence], &obstacles, 9, 9);
        assert!(result.grid.get(IVec2::new(2, 4)).unwrap().is_impassable());
        // Second segment is a gap: stays open past the flagged vertex.
        assert!(!result.grid.get(IVec2::new(6, 4)).unwrap().is_impassable());
    }

    #[test]
    fn dashed_line_is_solid_with_warning() {
        let obstacles = ObstacleConfig::parse("516: -1.0").unwrap();
        let mut fence = Feature {
            symbol_code: "516".to_string(),
            layer: "barrier".to_string(),
            kind: FeatureKind::Line,
            coords: vec![coord(0.0, 2.0), coord(6.0, 2.0)],
        };
        fence.coords[0].flags.dash = true;

        let result = raster(&[fence], &obstacles, 8, 8);
        assert!(result.grid.get(IVec2::new(3, 2)).unwrap().is_impassable());
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, RasterWarning::DashedAsSolid { symbol } if symbol == "516")));
    }

    #[test]
    fn unknown_symbol_warns_and_uses_open_terrain() {
        let obstacles = ObstacleConfig::new();
        let blob = area("999", "barrier", &[(1.0, 1.0), (4.0, 1.0), (4.0, 4.0), (1.0, 4.0)]);
        let result = raster(&[blob], &obstacles, 6, 6);

        assert_eq!(result.grid.get(IVec2::new(2, 2)).unwrap().multiplier, 1.0);
        assert_eq!(result.grid.get(IVec2::new(2, 2)).unwrap().symbol, 1);
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, RasterWarning::UnknownSymbol { code } if code == "999")));
    }

    #[test]
    fn point_feature_stamps_one_cell() {
        let obstacles = ObstacleConfig::parse("417: -1.0").unwrap();
        let point = Feature {
            symbol_code: "417".to_string(),
            layer: "barrier".to_string(),
            kind: FeatureKind::Point,
            coords: vec![coord(3.5, 3.5)],
        };
        let result = raster(&[point], &obstacles, 8, 8);
        let blocked: Vec<u32> = (0u32..64)
            .filter(|&i| result.grid.cells()[i as usize].is_impassable())
            .collect();
        assert_eq!(blocked, vec![result.grid.index(IVec2::new(3, 3))]);
    }

    #[test]
    fn cancellation_aborts() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let obstacles = ObstacleConfig::new();
        let blob = area("301", "barrier", &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
        let err = rasterize(
            &[blob],
            &barrier_layers(),
            &norm_1to1(8, 8),
            8,
            8,
            &obstacles,
            &cancel,
        )
        .unwrap_err();
        assert!(matches!(err, PlannerError::Cancelled));
    }

    #[test]
    fn parallel_matches_serial_reference() {
        let obstacles = ObstacleConfig::parse("201: -1.0\n302: 5.0\n504: 0.6").unwrap();
        let features: Vec<Feature> = (0..24)
            .map(|i| {
                let x = (i % 5) as f64 * 3.0;
                let y = (i / 5) as f64 * 3.0;
                let symbol = ["201", "302", "504"][i % 3];
                area(symbol, "barrier", &[
                    (x, y),
                    (x + 5.0, y),
                    (x + 5.0, y + 5.0),
                    (x, y + 5.0),
                ])
            })
            .collect();
        let norm = norm_1to1(20, 20);
        let layers = barrier_layers();

        let parallel = rasterize(&features, &layers, &norm, 20, 20, &obstacles, &CancelToken::new())
            .unwrap();

        // Serial reference: same per-feature rasterization, plain iteration.
        let mut rasters: Vec<FeatureRaster> = features
            .iter()
            .enumerate()
            .map(|(i, f)| {
                rasterize_feature(
                    f,
                    0,
                    i,
                    0,
                    obstacles.multiplier(&f.symbol_code).unwrap(),
                    &norm,
                    20,
                    20,
                )
            })
            .collect();
        let mut warnings = Vec::new();
        let serial = merge_rasters(&mut rasters, 20, 20, &mut warnings).unwrap();

        for idx in 0..serial.len() {
            assert_eq!(
                serial.cells()[idx].multiplier,
                parallel.grid.cells()[idx].multiplier,
                "cell {idx} differs"
            );
        }
    }
}
