//! Constants for board geometry and file formats.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size used when none is given (NxN).
pub const DEFAULT_BOARD_SIZE: usize = 13;

/// Largest accepted board size.
pub const MAX_BOARD_SIZE: usize = 1024;

/// Offsets `(di, dj)` to the six neighbors of a cell on the rhombic grid.
///
/// Order: East, South-East, South, West, North-West, North.
pub const NEIGHBORS: [(isize, isize); 6] = [(1, 0), (1, 1), (0, 1), (-1, 0), (-1, -1), (0, -1)];

// =============================================================================
// SGF
// =============================================================================

/// Largest board that can be written as SGF: coordinates use the letters `a..=z`.
pub const MAX_SGF_BOARD_SIZE: usize = 26;

/// Move value that ends a game record early.
pub const SGF_RESIGN: &str = "resign";

/// Move values of the swap (pie) rule. Not supported.
pub const SGF_SWAP: [&str; 2] = ["swap", "swap-pieces"];
