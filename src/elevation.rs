//! Elevation field wrapper with sub-cell bilinear sampling.
//!
//! The elevation raster usually has a coarser resolution than the logical
//! grid and its own projected-CRS origin; the sampler translates logical
//! cell coordinates into field coordinates and interpolates. Reads are
//! lock-free and safe to share across pathfinder calls.

use glam::Vec2;

use crate::types::{PlannerError, UNIFORM_ELEVATION_M};

/// A regular grid of elevation values in meters.
#[derive(Debug, Clone)]
pub struct ElevationField {
    width: u32,
    height: u32,
    values: Vec<f32>,
    /// Projected-CRS coordinate of the field's (0, 0) cell corner.
    pub origin: Vec2,
    /// Side length of one field cell in meters.
    pub cell_m: f32,
}

impl ElevationField {
    pub fn new(
        width: u32,
        height: u32,
        values: Vec<f32>,
        origin: Vec2,
        cell_m: f32,
    ) -> Result<Self, PlannerError> {
        if width == 0 || height == 0 || cell_m <= 0.0 {
            return Err(PlannerError::InvalidData(
                "elevation field needs positive dimensions and cell size".to_string(),
            ));
        }
        let expected = (width as usize) * (height as usize);
        if values.len() != expected {
            return Err(PlannerError::InvalidData(format!(
                "elevation data length {} does not match field size {}",
                values.len(),
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            values,
            origin,
            cell_m,
        })
    }

    /// Field with the same value everywhere.
    pub fn uniform(width: u32, height: u32, value: f32, cell_m: f32) -> Self {
        Self {
            width,
            height,
            values: vec![value; (width as usize) * (height as usize)],
            origin: Vec2::ZERO,
            cell_m,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn at(&self, x: u32, y: u32) -> f32 {
        self.values[(y as usize) * (self.width as usize) + (x as usize)]
    }
}

/// Bilinear elevation sampling in logical-grid cell coordinates.
#[derive(Debug, Clone)]
pub struct ElevationSampler {
    field: ElevationField,
    /// Meters from the logical grid's (0, 0) corner to the field origin.
    origin_offset: Vec2,
    /// Side length of one logical cell in meters.
    log_cell_m: f32,
}

impl ElevationSampler {
    pub fn new(field: ElevationField, origin_offset: Vec2, log_cell_m: f32) -> Self {
        Self {
            field,
            origin_offset,
            log_cell_m,
        }
    }

    /// Sampler over the uniform fallback field: 100 m everywhere, field cells
    /// matching the logical cells one to one.
    pub fn uniform(width: u32, height: u32, log_cell_m: f32) -> Self {
        Self::new(
            ElevationField::uniform(width, height, UNIFORM_ELEVATION_M, log_cell_m),
            Vec2::ZERO,
            log_cell_m,
        )
    }

    pub fn log_cell_m(&self) -> f32 {
        self.log_cell_m
    }

    pub fn field(&self) -> &ElevationField {
        &self.field
    }

    /// Elevation in meters at real-valued logical cell coordinates.
    ///
    /// Field values are treated as samples at field cell centers; queries
    /// outside the field clamp to the nearest edge.
    pub fn elevation_at(&self, p: Vec2) -> f32 {
        let meters = p * self.log_cell_m + self.origin_offset;
        let gx = meters.x / self.field.cell_m - 0.5;
        let gy = meters.y / self.field.cell_m - 0.5;

        let max_x = (self.field.width - 1) as f32;
        let max_y = (self.field.height - 1) as f32;
        let gx = gx.clamp(0.0, max_x);
        let gy = gy.clamp(0.0, max_y);

        let x0 = gx.floor() as u32;
        let y0 = gy.floor() as u32;
        let x1 = (x0 + 1).min(self.field.width - 1);
        let y1 = (y0 + 1).min(self.field.height - 1);
        let tx = gx - x0 as f32;
        let ty = gy - y0 as f32;

        let top = self.field.at(x0, y0) * (1.0 - tx) + self.field.at(x1, y0) * tx;
        let bottom = self.field.at(x0, y1) * (1.0 - tx) + self.field.at(x1, y1) * tx;
        top * (1.0 - ty) + bottom * ty
    }
}
