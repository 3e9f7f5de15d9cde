//! Edge connectivity tracking.
//!
//! Every occupied cell carries two flags: `touches_a` and `touches_z`, meaning
//! "this cell's group of same-owner stones reaches the owner's A (resp. Z)
//! edge". They are maintained two ways:
//!
//! - [`place_stone`] updates them incrementally after a stone is added. Flags
//!   only ever go from false to true here, so it is cheap but only valid for
//!   additions.
//! - [`recompute`] rebuilds them from scratch. It must be used after any stone
//!   is removed: a flag can never be lowered by looking at neighbors alone.
//!
//! Propagation uses an explicit worklist, so stack usage does not depend on
//! group size.

use crate::board::{Board, OutOfBounds, Player};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Edge {
    A,
    Z,
}

impl Edge {
    fn get(self, board: &Board, idx: usize) -> bool {
        let cell = board.cell_at(idx);
        match self {
            Edge::A => cell.touches_a,
            Edge::Z => cell.touches_z,
        }
    }

    fn set(self, board: &mut Board, idx: usize) {
        let cell = board.cell_at_mut(idx);
        match self {
            Edge::A => cell.touches_a = true,
            Edge::Z => cell.touches_z = true,
        }
    }
}

/// Update the flags after `player`'s stone has been put on `(i, j)`.
///
/// The new stone starts from its own edge contact, inherits whatever its
/// same-owner neighbors already have, then spreads both flags through its group.
/// Returns whether the stone now touches both edges.
pub fn place_stone(
    board: &mut Board,
    i: usize,
    j: usize,
    player: Player,
) -> Result<bool, OutOfBounds> {
    let idx = board.index(i, j)?;
    debug_assert_eq!(board.cell_at(idx).owner, Some(player));

    let mut touches_a = player.on_edge_a(i, j);
    let mut touches_z = player.on_edge_z(i, j, board.size());
    for n in board.neighbors(idx) {
        let neighbor = board.cell_at(n);
        if neighbor.owner == Some(player) {
            touches_a |= neighbor.touches_a;
            touches_z |= neighbor.touches_z;
        }
    }
    board.set_flags(i, j, touches_a, touches_z)?;

    propagate(board, vec![idx], Edge::A);
    propagate(board, vec![idx], Edge::Z);

    Ok(touches_a && touches_z)
}

/// Clear every flag and rebuild them from the stones lying on each edge.
pub fn recompute(board: &mut Board) {
    let size = board.size();
    let mut seeds_a = Vec::new();
    let mut seeds_z = Vec::new();

    for idx in 0..size * size {
        let cell = board.cell_at_mut(idx);
        cell.touches_a = false;
        cell.touches_z = false;
    }

    for idx in 0..size * size {
        let Some(player) = board.cell_at(idx).owner else {
            continue;
        };
        let (i, j) = board.point(idx);
        if player.on_edge_a(i, j) {
            Edge::A.set(board, idx);
            seeds_a.push(idx);
        }
        if player.on_edge_z(i, j, size) {
            Edge::Z.set(board, idx);
            seeds_z.push(idx);
        }
    }

    propagate(board, seeds_a, Edge::A);
    propagate(board, seeds_z, Edge::Z);
}

/// Spread `edge` from every seed whose flag is set to all same-owner cells
/// reachable from it. Each (cell, edge) pair is marked at most once.
fn propagate(board: &mut Board, mut stack: Vec<usize>, edge: Edge) {
    while let Some(idx) = stack.pop() {
        if !edge.get(board, idx) {
            continue;
        }
        let owner = board.cell_at(idx).owner;
        if owner.is_none() {
            continue;
        }
        let view: &Board = board;
        let next: Vec<usize> = view
            .neighbors(idx)
            .filter(|&n| view.cell_at(n).owner == owner && !edge.get(view, n))
            .collect();
        for n in next {
            edge.set(board, n);
            stack.push(n);
        }
    }
}
