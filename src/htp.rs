//! Hex Text Protocol (HTP) implementation.
//!
//! HTP is the GTP command framing used by Hex programs: one command per line,
//! optionally prefixed by a numeric id, answered with `=[id] result` or
//! `?[id] error` followed by a blank line. This module drives a [`History`]
//! with it, so the engine can be scripted or attached to a front end.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`, `known_command <cmd>`, `quit`
//! - `boardsize <size>` - Start a new game on a `size`x`size` board
//! - `clear_board` - Start a new game on the same board
//! - `play <color> <vertex>` - Play a move for the side to move
//! - `undo`, `redo`, `seek <n>` - Move through the history
//! - `history` - Print `cursor size`
//! - `last_move`, `showboard`, `winner`
//! - `loadsgf <path> [dialect]`, `savesgf <path> [dialect]`
//!
//! Vertices use the Standard SGF notation, e.g. `a12`. Colors are `black`
//! (player 1, moves first) and `white`.
//!
//! ## Example
//!
//! ```ignore
//! use hex_connection::htp::HtpEngine;
//! let mut engine = HtpEngine::new(13)?;
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use log::{debug, warn};

use crate::board::{InvalidBoardSize, Player};
use crate::constants::MAX_SGF_BOARD_SIZE;
use crate::history::History;
use crate::sgf::{self, Dialect};

/// The list of known HTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "history",
    "known_command",
    "last_move",
    "list_commands",
    "loadsgf",
    "name",
    "play",
    "protocol_version",
    "quit",
    "redo",
    "savesgf",
    "seek",
    "showboard",
    "undo",
    "version",
    "winner",
];

/// HTP engine state.
pub struct HtpEngine {
    history: History,
}

impl HtpEngine {
    pub fn new(size: usize) -> Result<Self, InvalidBoardSize> {
        Ok(Self {
            history: History::new(size)?,
        })
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Run the command loop on stdin and stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!("htp command: {command} {}", args.join(" "));

            let (success, message) = self.execute(&command, args);
            if !success {
                warn!("htp command `{command_line}` failed: {message}");
            }
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute an HTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(name) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&name.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(size) = arg.parse::<usize>() else {
                    return (false, "invalid size".to_string());
                };
                if size > MAX_SGF_BOARD_SIZE {
                    return (false, format!("unacceptable size, at most {MAX_SGF_BOARD_SIZE}"));
                }
                match History::new(size) {
                    Ok(history) => {
                        self.history = history;
                        (true, String::new())
                    }
                    Err(err) => (false, err.to_string()),
                }
            }

            "clear_board" => {
                self.history.reset();
                (true, String::new())
            }

            "play" => {
                let [color, vertex, ..] = args else {
                    return (false, "missing arguments".to_string());
                };
                let Some(player) = parse_color(color) else {
                    return (false, format!("invalid color: {color}"));
                };
                if player != self.history.game().current_player() {
                    return (false, format!("it is not {player}'s turn"));
                }
                let size = self.history.game().size();
                let Some((i, j)) = Dialect::Standard.decode(vertex, size) else {
                    return (false, format!("invalid vertex: {vertex}"));
                };
                match self.history.record(i, j) {
                    Ok(()) => (true, String::new()),
                    Err(err) => (false, format!("illegal move: {err}")),
                }
            }

            "undo" => match self.history.undo() {
                Ok(()) => (true, String::new()),
                Err(err) => (false, err.to_string()),
            },

            "redo" => match self.history.redo() {
                Ok(()) => (true, String::new()),
                Err(err) => (false, err.to_string()),
            },

            "seek" => {
                let Some(Ok(index)) = args.first().map(|a| a.parse::<usize>()) else {
                    return (false, "expected a move number".to_string());
                };
                match self.history.seek(index) {
                    Ok(()) => (true, String::new()),
                    Err(err) => (false, err.to_string()),
                }
            }

            "history" => (
                true,
                format!("{} {}", self.history.cursor(), self.history.len()),
            ),

            "last_move" => {
                let size = self.history.game().size();
                let text = self
                    .history
                    .last_move()
                    .and_then(|point| Dialect::Standard.encode(point, size))
                    .unwrap_or_else(|| "none".to_string());
                (true, text)
            }

            "showboard" => (true, format!("\n{}", self.history.game().board())),

            "winner" => {
                let text = match self.history.game().winner() {
                    Some(player) => color_name(player).to_string(),
                    None => "none".to_string(),
                };
                (true, text)
            }

            "loadsgf" => {
                let Some(path) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let dialect = match args.get(1) {
                    Some(name) => match parse_dialect(name) {
                        Some(dialect) => Some(dialect),
                        None => return (false, format!("unknown dialect: {name}")),
                    },
                    None => None,
                };
                match sgf::load(dialect, path) {
                    Ok(history) => {
                        self.history = history;
                        (true, String::new())
                    }
                    Err(err) => (false, err.to_string()),
                }
            }

            "savesgf" => {
                let Some(path) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let dialect = match args.get(1) {
                    Some(name) => match parse_dialect(name) {
                        Some(dialect) => dialect,
                        None => return (false, format!("unknown dialect: {name}")),
                    },
                    None => Dialect::Standard,
                };
                match sgf::save(&self.history, dialect, path) {
                    Ok(()) => (true, String::new()),
                    Err(err) => (false, err.to_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

fn parse_color(text: &str) -> Option<Player> {
    match text.to_lowercase().as_str() {
        "b" | "black" => Some(Player::Player1),
        "w" | "white" => Some(Player::Player2),
        _ => None,
    }
}

fn color_name(player: Player) -> &'static str {
    match player {
        Player::Player1 => "black",
        Player::Player2 => "white",
    }
}

fn parse_dialect(text: &str) -> Option<Dialect> {
    match text.to_lowercase().as_str() {
        "standard" => Some(Dialect::Standard),
        "littlegolem" | "little-golem" => Some(Dialect::LittleGolem),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn engine() -> HtpEngine {
        HtpEngine::new(3).unwrap()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hex-connection-htp-{}-{name}.sgf", std::process::id()))
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = HtpEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = HtpEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_known_command() {
        let mut engine = engine();

        let (success, response) = engine.execute("known_command", &["showboard"]);
        assert!(success);
        assert_eq!(response, "true");

        let (success, response) = engine.execute("known_command", &["genmove"]);
        assert!(success);
        assert_eq!(response, "false");
    }

    #[test]
    fn test_boardsize() {
        let mut engine = engine();
        assert!(engine.execute("boardsize", &["5"]).0);
        assert_eq!(engine.history().game().size(), 5);
        assert!(!engine.execute("boardsize", &["0"]).0);
        assert!(!engine.execute("boardsize", &["x"]).0);
        assert!(!engine.execute("boardsize", &["27"]).0);
        assert_eq!(engine.history().game().size(), 5);
    }

    #[test]
    fn test_play_checks_turn_and_vertex() {
        let mut engine = engine();
        assert!(!engine.execute("play", &["white", "a2"]).0);
        assert!(!engine.execute("play", &["black", "d2"]).0);
        assert!(engine.execute("play", &["black", "a2"]).0);
        assert_eq!(engine.history().last_move(), Some((0, 0)));
        assert!(!engine.execute("play", &["white", "a2"]).0);
        assert_eq!(engine.execute("last_move", &[]), (true, "a2".to_string()));
    }

    #[test]
    fn test_play_to_the_end() {
        let mut engine = engine();
        for (color, vertex) in [("b", "a2"), ("w", "c2"), ("b", "a1"), ("w", "c1"), ("b", "a0")] {
            assert!(engine.execute("play", &[color, vertex]).0, "{vertex}");
        }
        assert_eq!(engine.execute("winner", &[]), (true, "black".to_string()));
        assert!(!engine.execute("play", &["w", "b1"]).0);

        assert!(engine.execute("undo", &[]).0);
        assert_eq!(engine.execute("winner", &[]), (true, "none".to_string()));
        assert_eq!(engine.execute("history", &[]), (true, "4 5".to_string()));
        assert!(engine.execute("seek", &["0"]).0);
        assert!(!engine.execute("seek", &["6"]).0);
        assert!(engine.execute("clear_board", &[]).0);
        assert_eq!(engine.execute("history", &[]), (true, "0 0".to_string()));
    }

    #[test]
    fn test_run_with_framing() {
        let mut engine = engine();
        let input = b"1 name\n# comment\n\nplay black z9\n2 quit\nname\n";
        let mut output = Vec::new();
        engine.run_with(&input[..], &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output,
            "=1 hex-connection\n\n? invalid vertex: z9\n\n=2 \n\n"
        );
    }

    #[test]
    fn test_redo_and_showboard() {
        let mut engine = engine();
        assert!(engine.execute("play", &["b", "a2"]).0);
        assert_eq!(
            engine.execute("showboard", &[]),
            (true, "\n   a b c\n0  X . .\n1   . . .\n2    . . .\n".to_string())
        );

        assert_eq!(
            engine.execute("redo", &[]),
            (false, "nothing to redo".to_string())
        );
        assert!(engine.execute("undo", &[]).0);
        assert_eq!(engine.execute("history", &[]), (true, "0 1".to_string()));
        assert_eq!(engine.execute("last_move", &[]), (true, "none".to_string()));
        assert!(engine.execute("redo", &[]).0);
        assert_eq!(engine.execute("history", &[]), (true, "1 1".to_string()));
        assert_eq!(engine.execute("last_move", &[]), (true, "a2".to_string()));
    }

    #[test]
    fn test_savesgf_and_loadsgf() {
        let mut engine = engine();
        for (color, vertex) in [("b", "a2"), ("w", "c2"), ("b", "a1")] {
            assert!(engine.execute("play", &[color, vertex]).0);
        }
        assert!(engine.execute("undo", &[]).0);

        // Saving writes every record, whatever the cursor.
        let standard_path = temp_path("standard");
        let standard = standard_path.to_str().unwrap();
        assert_eq!(engine.execute("savesgf", &[standard]), (true, String::new()));
        assert_eq!(
            fs::read_to_string(standard).unwrap(),
            "(;FF[4]SZ[3];B[a2];W[c2];B[a1])\n"
        );

        let golem_path = temp_path("little-golem");
        let golem = golem_path.to_str().unwrap();
        assert!(engine.execute("savesgf", &[golem, "littlegolem"]).0);
        assert_eq!(
            fs::read_to_string(golem).unwrap(),
            "(;FF[4]SZ[3];W[ac];B[cc];W[ab])\n"
        );

        assert!(engine.execute("boardsize", &["5"]).0);
        assert_eq!(engine.execute("loadsgf", &[standard]), (true, String::new()));
        assert_eq!(engine.history().game().size(), 3);
        assert_eq!(engine.execute("history", &[]), (true, "3 3".to_string()));
        assert_eq!(engine.execute("last_move", &[]), (true, "a1".to_string()));

        assert!(engine.execute("clear_board", &[]).0);
        assert!(engine.execute("loadsgf", &[golem, "little-golem"]).0);
        assert_eq!(engine.execute("history", &[]), (true, "3 3".to_string()));

        // A record read in the wrong dialect leaves the game alone.
        assert!(engine.execute("clear_board", &[]).0);
        assert!(!engine.execute("loadsgf", &[golem, "standard"]).0);
        assert_eq!(engine.execute("history", &[]), (true, "0 0".to_string()));

        fs::remove_file(&standard_path).unwrap();
        fs::remove_file(&golem_path).unwrap();
    }

    #[test]
    fn test_sgf_command_errors() {
        let mut engine = engine();
        let path_buf = temp_path("unused");
        let path = path_buf.to_str().unwrap();

        assert_eq!(
            engine.execute("savesgf", &[path, "klingon"]),
            (false, "unknown dialect: klingon".to_string())
        );
        assert!(!path_buf.exists());
        assert_eq!(
            engine.execute("loadsgf", &[path, "klingon"]),
            (false, "unknown dialect: klingon".to_string())
        );
        assert_eq!(
            engine.execute("savesgf", &[]),
            (false, "missing argument".to_string())
        );

        let (success, message) = engine.execute("loadsgf", &[temp_path("missing").to_str().unwrap()]);
        assert!(!success);
        assert!(message.starts_with("i/o error:"), "{message}");
    }
}
