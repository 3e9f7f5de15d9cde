//! Game state and move execution.
//!
//! A [`Game`] owns the board, whose turn it is, and whether the game is over.
//! It has two states: in progress and ended. The only way to end a game is a
//! successful [`Game::try_move`] that connects the mover's two edges. Once
//! ended, no move is accepted; only [`crate::history::History`] can bring back
//! an unfinished position by rebuilding an earlier one.

use log::debug;
use thiserror::Error;

use crate::board::{Board, InvalidBoardSize, OutOfBounds, Player, Point};
use crate::connectivity;

/// Why a move was rejected. The game is left untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),
    #[error("game is over")]
    GameOver,
    #[error("cell ({i}, {j}) is occupied")]
    CellOccupied { i: usize, j: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    board: Board,
    current_player: Player,
    ended: bool,
}

impl Game {
    pub fn new(size: usize) -> Result<Self, InvalidBoardSize> {
        Ok(Self {
            board: Board::new(size)?,
            current_player: Player::Player1,
            ended: false,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Clear the board and start over with player 1 to move.
    pub fn reset(&mut self) {
        self.board.clear();
        self.current_player = Player::Player1;
        self.ended = false;
    }

    /// Place a stone for the player to move at `(i, j)`.
    pub fn try_move(&mut self, i: usize, j: usize) -> Result<(), MoveError> {
        let free = self.board.is_free(i, j)?;
        if self.ended {
            return Err(MoveError::GameOver);
        }
        if !free {
            return Err(MoveError::CellOccupied { i, j });
        }

        let player = self.current_player;
        self.board.set_owner(i, j, Some(player))?;
        if connectivity::place_stone(&mut self.board, i, j, player)? {
            debug!("{player} connects both edges with ({i}, {j})");
            self.ended = true;
        }
        self.current_player = player.opponent();
        Ok(())
    }

    /// The player whose stones connect their two edges, if any.
    pub fn winner(&self) -> Option<Player> {
        self.board
            .cells()
            .find(|(_, cell)| cell.touches_a && cell.touches_z)
            .and_then(|(_, cell)| cell.owner)
    }

    /// Every cell that belongs to a group joining both of its owner's edges.
    pub fn winning_chain(&self) -> Vec<Point> {
        self.board
            .cells()
            .filter(|(_, cell)| cell.owner.is_some() && cell.touches_a && cell.touches_z)
            .map(|(point, _)| point)
            .collect()
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn set_current_player(&mut self, player: Player) {
        self.current_player = player;
    }

    pub(crate) fn set_ended(&mut self, ended: bool) {
        self.ended = ended;
    }
}
