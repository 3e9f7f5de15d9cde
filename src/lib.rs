//! Hex-Connection: rules engine for the connection game Hex.
//!
//! Two players take turns placing stones on a rhombic board of hexagonal cells.
//! Player 1 wins by joining the top and bottom rows, player 2 by joining the
//! left and right columns.
//!
//! ## Modules
//!
//! - [`constants`] - Default board size, neighbor offsets, SGF limits
//! - [`board`] - Cells, owners and edge flags
//! - [`connectivity`] - Incremental and full edge-connectivity updates
//! - [`game`] - Move validation and end-of-game detection
//! - [`history`] - Undo, redo and seeking through played moves
//! - [`sgf`] - Loading and saving games in two SGF dialects
//! - [`htp`] - Text command protocol
//! - [`playout`] - Random games
//!
//! ## Example
//!
//! ```
//! use hex_connection::history::History;
//! use hex_connection::sgf::{to_sgf_string, Dialect};
//!
//! let mut history = History::new(3).unwrap();
//! history.record(0, 0).unwrap();
//! history.record(2, 0).unwrap();
//! history.undo().unwrap();
//! history.record(1, 0).unwrap();
//! assert_eq!(history.len(), 2);
//!
//! let text = to_sgf_string(&history, Dialect::Standard).unwrap();
//! assert_eq!(text, "(;FF[4]SZ[3];B[a2];W[b2])\n");
//! ```

pub mod board;
pub mod connectivity;
pub mod constants;
pub mod game;
pub mod history;
pub mod htp;
pub mod playout;
pub mod sgf;
