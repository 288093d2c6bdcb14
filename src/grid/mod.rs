pub mod cell;
pub mod grid2d;

pub use cell::{Cell, SYMBOL_NONE};
pub use grid2d::Grid2d;

/// The rasterized terrain cost grid.
pub type CostGrid = Grid2d<Cell>;
