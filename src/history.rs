//! Replayable move history.
//!
//! A [`History`] owns the [`Game`] together with the ordered list of moves that
//! produced it and a replay cursor. The game always shows the position reached
//! by playing the first `cursor` records on an empty board. Playing a new move
//! while the cursor is behind the end drops the stale future first, so the
//! history is a line, never a tree.
//!
//! Seeking steps one record at a time without maintaining connectivity flags,
//! then rebuilds all flags once at the target position.

use log::{debug, trace};
use thiserror::Error;

use crate::board::{InvalidBoardSize, OutOfBounds, Point};
use crate::connectivity;
use crate::game::{Game, MoveError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("history index {index} is out of range 0..={size}")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    #[error("recorded move is off the board: {0}")]
    OffBoard(#[from] OutOfBounds),
}

/// One played move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub i: usize,
    pub j: usize,
    /// Whether the game was over right after this move.
    pub ended_after_move: bool,
}

#[derive(Clone, Debug)]
pub struct History {
    game: Game,
    records: Vec<MoveRecord>,
    cursor: usize,
}

impl History {
    pub fn new(size: usize) -> Result<Self, InvalidBoardSize> {
        Ok(Self {
            game: Game::new(size)?,
            records: Vec::new(),
            cursor: 0,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Number of recorded moves.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replay position, in `0..=len()`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Play `(i, j)` at the cursor.
    ///
    /// On success any records past the cursor are discarded and the move is
    /// appended. On failure nothing changes.
    pub fn record(&mut self, i: usize, j: usize) -> Result<(), MoveError> {
        self.game.try_move(i, j)?;
        if self.cursor < self.records.len() {
            debug!(
                "dropping {} moves after position {}",
                self.records.len() - self.cursor,
                self.cursor
            );
            self.records.truncate(self.cursor);
        }
        self.records.push(MoveRecord {
            i,
            j,
            ended_after_move: self.game.is_ended(),
        });
        self.cursor = self.records.len();
        Ok(())
    }

    /// Move the cursor to `target` and rebuild the position there.
    pub fn seek(&mut self, target: usize) -> Result<(), HistoryError> {
        let size = self.records.len();
        if target > size {
            return Err(HistoryError::IndexOutOfRange {
                index: target,
                size,
            });
        }
        self.jump(target)?;
        Ok(())
    }

    /// Step to `target`, which must be in `0..=len()`.
    fn jump(&mut self, target: usize) -> Result<(), OutOfBounds> {
        while self.cursor > target {
            let rec = self.records[self.cursor - 1];
            trace!("step back over ({}, {})", rec.i, rec.j);
            self.game.board_mut().set_owner(rec.i, rec.j, None)?;
            self.cursor -= 1;
            let player = self.game.current_player().opponent();
            self.game.set_current_player(player);
            self.game.set_ended(false);
        }
        while self.cursor < target {
            let rec = self.records[self.cursor];
            trace!("step forward onto ({}, {})", rec.i, rec.j);
            let player = self.game.current_player();
            self.game
                .board_mut()
                .set_owner(rec.i, rec.j, Some(player))?;
            self.game.set_ended(rec.ended_after_move);
            self.game.set_current_player(player.opponent());
            self.cursor += 1;
        }

        connectivity::recompute(self.game.board_mut());
        Ok(())
    }

    pub fn undo(&mut self) -> Result<(), HistoryError> {
        let target = self
            .cursor
            .checked_sub(1)
            .ok_or(HistoryError::NothingToUndo)?;
        self.seek(target)
    }

    pub fn redo(&mut self) -> Result<(), HistoryError> {
        if self.cursor == self.records.len() {
            return Err(HistoryError::NothingToRedo);
        }
        self.seek(self.cursor + 1)
    }

    /// Go back to the empty board, keeping the records.
    pub fn first(&mut self) -> Result<(), HistoryError> {
        self.seek(0)
    }

    /// Go to the latest recorded position.
    pub fn last(&mut self) -> Result<(), HistoryError> {
        self.seek(self.records.len())
    }

    /// Forget every record after the cursor.
    pub fn truncate(&mut self) {
        self.records.truncate(self.cursor);
    }

    /// Start a new game on a board of the same size.
    pub fn reset(&mut self) {
        self.game.reset();
        self.records.clear();
        self.cursor = 0;
    }

    /// Coordinates of the move that led to the current position.
    pub fn last_move(&self) -> Option<Point> {
        let rec = self.records.get(self.cursor.checked_sub(1)?)?;
        Some((rec.i, rec.j))
    }
}
