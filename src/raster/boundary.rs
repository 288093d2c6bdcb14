//! Integer boundary sampling for feature outlines.

use glam::IVec2;

/// Walk the Bresenham line between two cells, invoking `emit` for each
/// visited cell including both endpoints. Cells outside the grid are
/// skipped; the walk itself continues so a segment can re-enter.
pub(crate) fn line_cells(
    a: IVec2,
    b: IVec2,
    width: u32,
    height: u32,
    emit: &mut impl FnMut(IVec2),
) {
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut p = a;

    loop {
        if p.x >= 0 && p.y >= 0 && (p.x as u32) < width && (p.y as u32) < height {
            emit(p);
        }
        if p == b {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            p.x += sx;
        }
        if e2 <= dx {
            err += dx;
            p.y += sy;
        }
    }
}
