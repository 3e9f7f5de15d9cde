//! Random playouts.
//!
//! A playout fills free cells uniformly at random until one player connects.
//! Hex cannot end in a draw, so a playout always has a winner.

use fastrand::Rng;

use crate::board::{Player, Point};
use crate::history::History;

/// Play random moves from the current position until the game ends.
///
/// Returns the winner, or `None` if no legal move is left to try. A game that
/// is already over returns at once.
pub fn random_playout(history: &mut History, rng: &mut Rng) -> Option<Player> {
    loop {
        if let Some(winner) = history.game().winner() {
            return Some(winner);
        }
        let candidates = free_cells(history);
        let &(i, j) = rng.choice(&candidates)?;
        history.record(i, j).ok()?;
    }
}

fn free_cells(history: &History) -> Vec<Point> {
    history
        .game()
        .board()
        .cells()
        .filter(|(_, cell)| cell.owner.is_none())
        .map(|(point, _)| point)
        .collect()
}
