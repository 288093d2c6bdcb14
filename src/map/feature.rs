use glam::DVec2;

/// Per-coordinate flag bits as stored in the map document.
pub const FLAG_CURVE_START: u32 = 1;
pub const FLAG_HOLE_START: u32 = 2;
pub const FLAG_GAP: u32 = 4;
pub const FLAG_DASH: u32 = 8;

/// One vertex of a feature, in map-internal units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub pos: DVec2,
    pub flags: CoordFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordFlags {
    /// Start of a Bezier control sequence. Rasterized as straight segments.
    pub curve_start: bool,
    /// First vertex of a polygon hole ring.
    pub hole_start: bool,
    /// The segment leaving this vertex is a gap and emits no boundary.
    pub gap: bool,
    /// The segment leaving this vertex is dashed.
    pub dash: bool,
}

impl CoordFlags {
    pub fn from_bits(bits: u32) -> Self {
        Self {
            curve_start: bits & FLAG_CURVE_START != 0,
            hole_start: bits & FLAG_HOLE_START != 0,
            gap: bits & FLAG_GAP != 0,
            dash: bits & FLAG_DASH != 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Point,
    Line,
    Area,
}

/// A parsed map primitive, tagged with its symbol code and source layer.
#[derive(Debug, Clone)]
pub struct Feature {
    pub symbol_code: String,
    pub layer: String,
    pub kind: FeatureKind,
    pub coords: Vec<Coord>,
}

impl Feature {
    /// Split an area feature's coordinates into its outer ring followed by
    /// hole rings. Non-area features yield a single slice.
    pub fn rings(&self) -> Vec<&[Coord]> {
        if self.kind != FeatureKind::Area {
            return vec![&self.coords];
        }
        let mut rings = Vec::new();
        let mut start = 0;
        for (i, c) in self.coords.iter().enumerate() {
            if c.flags.hole_start && i > start {
                rings.push(&self.coords[start..i]);
                start = i;
            }
        }
        if start < self.coords.len() {
            rings.push(&self.coords[start..]);
        }
        rings
    }

    /// Whether any segment of the feature carries the dash flag.
    pub fn has_dash(&self) -> bool {
        self.coords.iter().any(|c| c.flags.dash)
    }
}
