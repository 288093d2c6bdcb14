//! Scanline area fill with even-odd rule and hole support.

use glam::{DVec2, IVec2};

/// Fill the interior of a polygon given as rings in continuous cell
/// coordinates: the outer ring first, hole rings after. Each row is scanned
/// at its cell-center height `y + 0.5`; hole edges participate in the same
/// sorted intersection list, so the even-odd rule excludes them naturally.
///
/// A cell is filled when its center lies between an intersection pair.
pub(crate) fn fill_rings(
    rings: &[Vec<DVec2>],
    width: u32,
    height: u32,
    emit: &mut impl FnMut(IVec2),
) {
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for ring in rings {
        for p in ring {
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
    }
    if !min_y.is_finite() || min_y >= max_y {
        return;
    }

    let y_first = (min_y - 0.5).ceil().max(0.0) as i64;
    let y_last = (max_y - 0.5).floor().min(height as f64 - 1.0) as i64;
    let mut xs: Vec<f64> = Vec::new();

    for y in y_first..=y_last {
        let y_scan = y as f64 + 0.5;
        xs.clear();

        for ring in rings {
            if ring.len() < 3 {
                continue;
            }
            for i in 0..ring.len() {
                let p0 = ring[i];
                let p1 = ring[(i + 1) % ring.len()];
                if p0.y == p1.y {
                    continue;
                }
                // Half-open span so a vertex shared by two edges counts once.
                let (lo, hi) = if p0.y < p1.y { (p0, p1) } else { (p1, p0) };
                if y_scan < lo.y || y_scan >= hi.y {
                    continue;
                }
                let t = (y_scan - p0.y) / (p1.y - p0.y);
                xs.push(p0.x + t * (p1.x - p0.x));
            }
        }

        if xs.len() < 2 {
            continue;
        }
        xs.sort_by(|a, b| a.total_cmp(b));

        for pair in xs.chunks_exact(2) {
            let x_start = (pair[0] - 0.5).ceil().max(0.0) as i64;
            let x_end = (pair[1] - 0.5).floor().min(width as f64 - 1.0) as i64;
            for x in x_start..=x_end {
                emit(IVec2::new(x as i32, y as i32));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn fill(rings: &[Vec<DVec2>]) -> HashSet<(i32, i32)> {
        let mut cells = HashSet::new();
        fill_rings(rings, 64, 64, &mut |p| {
            cells.insert((p.x, p.y));
        });
        cells
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<DVec2> {
        vec![
            DVec2::new(x0, y0),
            DVec2::new(x1, y0),
            DVec2::new(x1, y1),
            DVec2::new(x0, y1),
        ]
    }

    #[test]
    fn rectangle_fills_interior_cells() {
        let cells = fill(&[rect(1.0, 1.0, 5.0, 4.0)]);
        assert_eq!(cells.len(), 4 * 3);
        assert!(cells.contains(&(1, 1)));
        assert!(cells.contains(&(4, 3)));
        assert!(!cells.contains(&(5, 1)));
        assert!(!cells.contains(&(0, 1)));
    }

    #[test]
    fn hole_is_left_empty() {
        let cells = fill(&[rect(0.0, 0.0, 10.0, 10.0), rect(3.0, 3.0, 7.0, 7.0)]);
        assert!(cells.contains(&(1, 1)));
        assert!(cells.contains(&(8, 8)));
        assert!(!cells.contains(&(5, 5)));
        assert!(!cells.contains(&(3, 4)));
        assert_eq!(cells.len(), 100 - 16);
    }

    #[test]
    fn triangle_rows_narrow_towards_apex() {
        let triangle = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(8.0, 0.0),
            DVec2::new(0.0, 8.0),
        ];
        let cells = fill(&[triangle]);
        assert!(cells.contains(&(0, 0)));
        assert!(!cells.contains(&(7, 7)));
        // Row y=6 spans the hypotenuse at x = 8 - 6.5 = 1.5.
        assert!(cells.contains(&(0, 6)));
        assert!(!cells.contains(&(2, 6)));
    }

    #[test]
    fn degenerate_ring_fills_nothing() {
        assert!(fill(&[vec![DVec2::new(1.0, 1.0), DVec2::new(2.0, 1.0)]]).is_empty());
    }

    #[test]
    fn clipped_to_grid() {
        let mut cells = HashSet::new();
        fill_rings(&[rect(-5.0, -5.0, 3.0, 3.0)], 8, 8, &mut |p| {
            cells.insert((p.x, p.y));
        });
        assert!(cells.contains(&(0, 0)));
        assert!(cells.iter().all(|&(x, y)| x >= 0 && y >= 0));
        assert_eq!(cells.len(), 9);
    }
}
