/// Sentinel multiplier for cells that can never be entered.
pub const IMPASSABLE: f32 = -1.0;

/// Base cost multiplier for open terrain.
pub const OPEN_TERRAIN: f32 = 1.0;

/// Comparison epsilon for cost arithmetic.
pub const EPSILON: f32 = 1e-6;

/// Elevation used everywhere when no field is supplied (meters).
pub const UNIFORM_ELEVATION_M: f32 = 100.0;

pub const NUM_DIRECTIONS: usize = 8;

/// 8-connected neighbourhood, axial moves first.
pub const DX: [i32; NUM_DIRECTIONS] = [1, 0, -1, 0, 1, -1, -1, 1];
pub const DY: [i32; NUM_DIRECTIONS] = [0, 1, 0, -1, 1, 1, -1, -1];

/// Empirical lower bound on the combined terrain and slope factor, used to
/// scale the octile heuristic so it stays admissible on downhill shortcuts.
pub const MIN_COST_FACTOR: f32 = 0.8;

/// One map-internal unit is `scale / INTERNAL_UNITS_PER_METER` meters.
pub const INTERNAL_UNITS_PER_METER: f64 = 1_000_000.0;

/// Fallback logical cell resolution when the derived value collapses (meters).
pub const FALLBACK_CELL_RESOLUTION_M: f32 = 1.0;
