//! Randomized checks of the connectivity flags and history invariants.
//!
//! Every position reached by playing or seeking is compared against an
//! independent breadth-first search over same-owner groups.

use std::collections::VecDeque;

use fastrand::Rng;

use hex_connection::board::{Board, Player};
use hex_connection::constants::NEIGHBORS;
use hex_connection::history::History;
use hex_connection::sgf::{Dialect, from_sgf_str, to_sgf_string};

const GAMES: u64 = 60;

/// Expected `(touches_a, touches_z)` of every cell, `None` for empty cells.
fn ground_truth(board: &Board) -> Vec<Option<(bool, bool)>> {
    let n = board.size();
    let owner = |i: usize, j: usize| board.cell_owner(i, j).unwrap();
    let mut truth = vec![None; n * n];

    for start in 0..n * n {
        let (si, sj) = (start % n, start / n);
        let Some(player) = owner(si, sj) else {
            continue;
        };
        if truth[start].is_some() {
            continue;
        }

        let mut group = Vec::new();
        let mut seen = vec![false; n * n];
        let mut queue = VecDeque::from([(si, sj)]);
        seen[start] = true;
        while let Some((i, j)) = queue.pop_front() {
            group.push((i, j));
            for (di, dj) in NEIGHBORS {
                let (Some(ni), Some(nj)) = (i.checked_add_signed(di), j.checked_add_signed(dj))
                else {
                    continue;
                };
                if ni < n && nj < n && !seen[nj * n + ni] && owner(ni, nj) == Some(player) {
                    seen[nj * n + ni] = true;
                    queue.push_back((ni, nj));
                }
            }
        }

        let touches_a = group.iter().any(|&(i, j)| match player {
            Player::Player1 => j == 0,
            Player::Player2 => i == 0,
        });
        let touches_z = group.iter().any(|&(i, j)| match player {
            Player::Player1 => j == n - 1,
            Player::Player2 => i == n - 1,
        });
        for (i, j) in group {
            truth[j * n + i] = Some((touches_a, touches_z));
        }
    }
    truth
}

fn check_position(history: &History, context: &str) {
    let board = history.game().board();
    let truth = ground_truth(board);
    let mut any_connected = false;
    for ((i, j), cell) in board.cells() {
        if let Some(expected) = truth[j * board.size() + i] {
            assert_eq!(
                (cell.touches_a, cell.touches_z),
                expected,
                "flags of ({i}, {j}) {context}\n{board}"
            );
            any_connected |= expected.0 && expected.1;
        }
    }
    assert_eq!(history.game().is_ended(), any_connected, "ended {context}");
}

/// Play random free cells until the game ends, checking every position.
fn play_random_game(size: usize, rng: &mut Rng) -> History {
    let mut history = History::new(size).unwrap();
    while !history.game().is_ended() {
        let (i, j) = loop {
            let (i, j) = (rng.usize(..size), rng.usize(..size));
            if history.game().board().is_free(i, j).unwrap() {
                break (i, j);
            }
        };
        history.record(i, j).unwrap();
        check_position(&history, &format!("after move {}", history.len()));
    }
    history
}

#[test]
fn test_incremental_flags_match_ground_truth() {
    let mut rng = Rng::with_seed(1);
    for game in 0..GAMES {
        let size = 1 + (game as usize % 9);
        play_random_game(size, &mut rng);
    }
}

#[test]
fn test_seek_flags_match_ground_truth() {
    let mut rng = Rng::with_seed(2);
    for game in 0..GAMES {
        let size = 2 + (game as usize % 8);
        let mut history = play_random_game(size, &mut rng);
        for _ in 0..20 {
            let target = rng.usize(..=history.len());
            history.seek(target).unwrap();
            check_position(&history, &format!("after seek to {target}"));

            let before = history.game().clone();
            history.seek(target).unwrap();
            assert_eq!(history.game(), &before, "second seek to {target}");
        }
    }
}

#[test]
fn test_branching_keeps_invariants() {
    let mut rng = Rng::with_seed(3);
    for game in 0..GAMES {
        let size = 3 + (game as usize % 6);
        let mut history = play_random_game(size, &mut rng);

        let target = rng.usize(..history.len());
        history.seek(target).unwrap();
        let free: Vec<(usize, usize)> = history
            .game()
            .board()
            .cells()
            .filter(|(_, cell)| cell.owner.is_none())
            .map(|(point, _)| point)
            .collect();
        let &(i, j) = rng.choice(&free).unwrap();
        history.record(i, j).unwrap();

        assert_eq!(history.len(), target + 1);
        assert_eq!(history.cursor(), target + 1);
        check_position(&history, "after branching");

        history.first().unwrap();
        check_position(&history, "after rewinding to the start");
        history.last().unwrap();
        check_position(&history, "after returning to the end");
    }
}

#[test]
fn test_sgf_round_trip_random_games() {
    let mut rng = Rng::with_seed(4);
    for game in 0..GAMES {
        let size = 1 + (game as usize % 14);
        let mut history = play_random_game(size, &mut rng);
        if rng.bool() {
            // Unfinished games survive the trip too.
            let target = rng.usize(..=history.len());
            history.seek(target).unwrap();
            history.truncate();
        }
        for dialect in [Dialect::Standard, Dialect::LittleGolem] {
            let text = to_sgf_string(&history, dialect).unwrap();
            let loaded = from_sgf_str(&text, Some(dialect)).unwrap();
            assert_eq!(loaded.records(), history.records(), "{text}");
            assert_eq!(loaded.game().is_ended(), history.game().is_ended());
        }
    }
}
