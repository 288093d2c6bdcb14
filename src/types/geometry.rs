//! Geometric types shared between the map reader, normalizer and rasterizer.

use glam::{DVec2, IVec2};

use crate::types::PlannerError;

/// Axis-aligned rectangle in map-internal units.
/// Convention: [min.x, max.x] x [min.y, max.y].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl MapBounds {
    /// Bounds that contain nothing. Feature coordinates only ever expand them.
    pub fn empty() -> Self {
        Self {
            min: DVec2::new(f64::INFINITY, f64::INFINITY),
            max: DVec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand_to_include(&mut self, p: DVec2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn extent(&self) -> DVec2 {
        self.max - self.min
    }
}

/// Affine mapping from map-internal units to grid cells.
///
/// A point `(u, v)` lands in cell `(floor((u - min.x) / res.x),
/// floor((v - min.y) / res.y))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationRecord {
    pub min: DVec2,
    pub res: DVec2,
}

impl NormalizationRecord {
    /// Compute the record for a bounding rectangle and requested grid size.
    pub fn from_bounds(bounds: &MapBounds, width: u32, height: u32) -> Result<Self, PlannerError> {
        let extent = bounds.extent();
        if bounds.is_empty() || extent.x <= 0.0 || extent.y <= 0.0 {
            return Err(PlannerError::DegenerateBounds);
        }
        Ok(Self {
            min: bounds.min,
            res: DVec2::new(extent.x / width as f64, extent.y / height as f64),
        })
    }

    /// Map an internal-unit point to its grid cell. May be out of bounds.
    pub fn to_cell(&self, p: DVec2) -> IVec2 {
        let c = (p - self.min) / self.res;
        IVec2::new(c.x.floor() as i32, c.y.floor() as i32)
    }

    /// Internal-unit coordinates of the center of a cell.
    pub fn cell_center(&self, cell: IVec2) -> DVec2 {
        self.min + (cell.as_dvec2() + DVec2::splat(0.5)) * self.res
    }

    /// Map an internal-unit point to continuous cell coordinates.
    pub fn to_cell_continuous(&self, p: DVec2) -> DVec2 {
        (p - self.min) / self.res
    }
}
