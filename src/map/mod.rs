pub mod feature;
pub mod normalize;
pub mod reader;

pub use feature::{Coord, CoordFlags, Feature, FeatureKind};
pub use normalize::{logical_cell_resolution_m, normalize};
pub use reader::{GeoReference, MapDocument, parse_map, read_map};
