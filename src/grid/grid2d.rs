use glam::IVec2;

use crate::types::PlannerError;

/// Row-major 2D grid. Immutable once handed out by the rasterizer; mutation
/// is only exposed to the builders in this crate.
#[derive(Debug, Clone)]
pub struct Grid2d<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T> Grid2d<T> {
    pub fn new(width: u32, height: u32, data: Vec<T>) -> Result<Self, PlannerError> {
        let expected_len = (width as usize) * (height as usize);
        if width == 0 || height == 0 {
            return Err(PlannerError::InvalidData(
                "grid dimensions must be at least 1x1".to_string(),
            ));
        }
        if data.len() != expected_len {
            return Err(PlannerError::InvalidData(format!(
                "data length {} does not match grid size {}",
                data.len(),
                expected_len
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn filled(width: u32, height: u32, value: T) -> Result<Self, PlannerError>
    where
        T: Clone,
    {
        let len = (width as usize) * (height as usize);
        Self::new(width, height, vec![value; len])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn in_bounds(&self, p: IVec2) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as u32) < self.width && (p.y as u32) < self.height
    }

    /// Flat row-major index of an in-bounds cell.
    #[inline]
    pub fn index(&self, p: IVec2) -> u32 {
        debug_assert!(self.in_bounds(p));
        (p.y as u32) * self.width + (p.x as u32)
    }

    /// Inverse of [`Grid2d::index`].
    #[inline]
    pub fn coords(&self, index: u32) -> IVec2 {
        IVec2::new((index % self.width) as i32, (index / self.width) as i32)
    }

    pub fn get(&self, p: IVec2) -> Option<&T> {
        if !self.in_bounds(p) {
            return None;
        }
        Some(&self.data[self.index(p) as usize])
    }

    pub(crate) fn get_mut(&mut self, p: IVec2) -> Option<&mut T> {
        if !self.in_bounds(p) {
            return None;
        }
        let idx = self.index(p) as usize;
        Some(&mut self.data[idx])
    }

    pub fn cells(&self) -> &[T] {
        &self.data
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        let grid = Grid2d::filled(7, 5, 0u8).unwrap();
        for y in 0..5 {
            for x in 0..7 {
                let p = IVec2::new(x, y);
                assert_eq!(grid.coords(grid.index(p)), p);
            }
        }
    }

    #[test]
    fn bounds_checks() {
        let grid = Grid2d::filled(3, 3, 0u8).unwrap();
        assert!(grid.in_bounds(IVec2::new(0, 0)));
        assert!(grid.in_bounds(IVec2::new(2, 2)));
        assert!(!grid.in_bounds(IVec2::new(3, 0)));
        assert!(!grid.in_bounds(IVec2::new(0, -1)));
        assert!(grid.get(IVec2::new(5, 5)).is_none());
    }

    #[test]
    fn length_mismatch_rejected() {
        assert!(matches!(
            Grid2d::new(4, 4, vec![0u8; 10]),
            Err(PlannerError::InvalidData(_))
        ));
    }
}
