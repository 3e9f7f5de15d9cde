//! Hex board representation.
//!
//! The board is an NxN rhombus of hexagonal cells stored row by row. A cell
//! `(i, j)` has column `i` and row `j`, both in `[0, N)`. Each cell records its
//! owner plus two connectivity flags maintained by [`crate::connectivity`].

use std::fmt;

use thiserror::Error;

use crate::constants::{MAX_BOARD_SIZE, MAX_SGF_BOARD_SIZE, NEIGHBORS};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    /// Moves first; connects row `0` (edge A) to row `N-1` (edge Z).
    Player1,
    /// Connects column `0` (edge A) to column `N-1` (edge Z).
    Player2,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::Player1 => Player::Player2,
            Player::Player2 => Player::Player1,
        }
    }

    /// Whether `(i, j)` lies on this player's A edge.
    pub fn on_edge_a(self, i: usize, j: usize) -> bool {
        match self {
            Player::Player1 => j == 0,
            Player::Player2 => i == 0,
        }
    }

    /// Whether `(i, j)` lies on this player's Z edge of a board of `size`.
    pub fn on_edge_z(self, i: usize, j: usize, size: usize) -> bool {
        match self {
            Player::Player1 => j + 1 == size,
            Player::Player2 => i + 1 == size,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Player1 => write!(f, "player 1"),
            Player::Player2 => write!(f, "player 2"),
        }
    }
}

/// A cell coordinate `(i, j)`: column, row.
pub type Point = (usize, usize);

/// State of one cell.
///
/// `touches_a` / `touches_z` only carry meaning while `owner` is set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub owner: Option<Player>,
    pub touches_a: bool,
    pub touches_z: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("cell ({i}, {j}) is outside a board of size {size}")]
pub struct OutOfBounds {
    pub i: usize,
    pub j: usize,
    pub size: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid board size {0}, must be between 1 and {max}", max = MAX_BOARD_SIZE)]
pub struct InvalidBoardSize(pub usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(size: usize) -> Result<Self, InvalidBoardSize> {
        if !(1..=MAX_BOARD_SIZE).contains(&size) {
            return Err(InvalidBoardSize(size));
        }
        Ok(Self {
            size,
            cells: vec![Cell::default(); size * size],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        i < self.size && j < self.size
    }

    /// Validate `(i, j)` and turn it into an index into the cell array.
    pub(crate) fn index(&self, i: usize, j: usize) -> Result<usize, OutOfBounds> {
        if !self.contains(i, j) {
            return Err(OutOfBounds {
                i,
                j,
                size: self.size,
            });
        }
        Ok(j * self.size + i)
    }

    pub(crate) fn point(&self, idx: usize) -> Point {
        (idx % self.size, idx / self.size)
    }

    pub fn cell(&self, i: usize, j: usize) -> Result<Cell, OutOfBounds> {
        Ok(self.cells[self.index(i, j)?])
    }

    pub fn cell_owner(&self, i: usize, j: usize) -> Result<Option<Player>, OutOfBounds> {
        Ok(self.cell(i, j)?.owner)
    }

    pub fn is_free(&self, i: usize, j: usize) -> Result<bool, OutOfBounds> {
        Ok(self.cell_owner(i, j)?.is_none())
    }

    /// The `(touches_a, touches_z)` flags of a cell.
    pub fn flags(&self, i: usize, j: usize) -> Result<(bool, bool), OutOfBounds> {
        let cell = self.cell(i, j)?;
        Ok((cell.touches_a, cell.touches_z))
    }

    pub(crate) fn set_owner(
        &mut self,
        i: usize,
        j: usize,
        owner: Option<Player>,
    ) -> Result<(), OutOfBounds> {
        let idx = self.index(i, j)?;
        self.cells[idx].owner = owner;
        Ok(())
    }

    pub(crate) fn set_flags(
        &mut self,
        i: usize,
        j: usize,
        touches_a: bool,
        touches_z: bool,
    ) -> Result<(), OutOfBounds> {
        let idx = self.index(i, j)?;
        let cell = &mut self.cells[idx];
        cell.touches_a = touches_a;
        cell.touches_z = touches_z;
        Ok(())
    }

    pub(crate) fn cell_at(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    pub(crate) fn cell_at_mut(&mut self, idx: usize) -> &mut Cell {
        &mut self.cells[idx]
    }

    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// All cells in row-major order, with their coordinates.
    pub fn cells(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (self.point(idx), *cell))
    }

    /// Indices of the on-board neighbors of the cell at `idx`.
    pub(crate) fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let (i, j) = self.point(idx);
        NEIGHBORS.iter().filter_map(move |&(di, dj)| {
            let ni = i.checked_add_signed(di)?;
            let nj = j.checked_add_signed(dj)?;
            self.index(ni, nj).ok()
        })
    }
}

/// Rhombic rendering: each row is shifted right by one more space than the
/// previous, so the six neighbors of a cell sit around it on screen.
///
/// Column letters are only printed while they fit in `a..=z`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let margin = self.size.to_string().len();
        if self.size <= MAX_SGF_BOARD_SIZE {
            write!(f, "{:margin$} ", "")?;
            for letter in ('a'..='z').take(self.size) {
                write!(f, " {letter}")?;
            }
            writeln!(f)?;
        }
        for j in 0..self.size {
            write!(f, "{j:>margin$} {:j$}", "")?;
            for i in 0..self.size {
                let ch = match self.cells[j * self.size + i].owner {
                    Some(Player::Player1) => 'X',
                    Some(Player::Player2) => 'O',
                    None => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
