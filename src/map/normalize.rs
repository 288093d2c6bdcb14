use tracing::warn;

use crate::types::{
    EPSILON, FALLBACK_CELL_RESOLUTION_M, INTERNAL_UNITS_PER_METER, MapBounds, NormalizationRecord,
    PlannerError,
};

/// Compute the internal-units-to-cells mapping for a requested grid size.
pub fn normalize(
    bounds: &MapBounds,
    width: u32,
    height: u32,
) -> Result<NormalizationRecord, PlannerError> {
    NormalizationRecord::from_bounds(bounds, width, height)
}

/// Real-world length in meters of one grid cell side.
///
/// One internal unit is `scale / 1e6` meters; the cell side in internal
/// units comes from the normalization record. A collapsed value falls back
/// to 1.0 m so downstream slope math stays finite.
pub fn logical_cell_resolution_m(norm: &NormalizationRecord, scale: f64) -> f32 {
    let meters_per_unit = scale / INTERNAL_UNITS_PER_METER;
    let res = (norm.res.x * meters_per_unit) as f32;
    if res <= EPSILON {
        warn!(res, "logical resolution near zero, using fallback");
        return FALLBACK_CELL_RESOLUTION_M;
    }
    res
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::DVec2;

    use super::*;

    fn bounds(max_x: f64, max_y: f64) -> MapBounds {
        let mut b = MapBounds::empty();
        b.expand_to_include(DVec2::ZERO);
        b.expand_to_include(DVec2::new(max_x, max_y));
        b
    }

    #[test]
    fn resolution_splits_extent() {
        let norm = normalize(&bounds(100.0, 50.0), 20, 10).unwrap();
        assert_relative_eq!(norm.res.x, 5.0);
        assert_relative_eq!(norm.res.y, 5.0);
        assert_eq!(norm.min, DVec2::ZERO);
    }

    #[test]
    fn extents_reconstruct_bounds() {
        let b = bounds(173.0, 91.0);
        let (w, h) = (37u32, 19u32);
        let norm = normalize(&b, w, h).unwrap();
        assert_relative_eq!(norm.min.x + w as f64 * norm.res.x, b.max.x, epsilon = 1e-9);
        assert_relative_eq!(norm.min.y + h as f64 * norm.res.y, b.max.y, epsilon = 1e-9);
    }

    #[test]
    fn cell_resolution_from_scale() {
        // 10_000 internal units across 100 cells at 1:10000 -> 1 unit = 1 cm
        // on the ground, 100 units per cell -> 1.0 m cells.
        let norm = normalize(&bounds(10_000.0, 10_000.0), 100, 100).unwrap();
        assert_relative_eq!(logical_cell_resolution_m(&norm, 10_000.0), 1.0);
    }

    #[test]
    fn collapsed_resolution_falls_back() {
        let norm = normalize(&bounds(1e-3, 1e-3), 1000, 1000).unwrap();
        assert_eq!(logical_cell_resolution_m(&norm, 10_000.0), 1.0);
    }
}
