//! Reading and writing games as SGF.
//!
//! Only a small subset is used: a root node with `FF[4]` and `SZ[n]`, then one
//! node per move, `;B[..]` or `;W[..]`. Two dialects exist and disagree on two
//! points:
//!
//! | dialect        | first mover | coordinate of `(i, j)` on size `n` |
//! |----------------|-------------|------------------------------------|
//! | `Standard`     | `B`         | letter `i`, decimal `n-1-j`        |
//! | `LittleGolem`  | `W`         | letter `i`, letter `n-1-j`         |
//!
//! Rows are mirrored in both. Loading stops successfully at a `resign` move and
//! fails on the swap rule, which is not supported.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::board::Point;
use crate::constants::{MAX_SGF_BOARD_SIZE, SGF_RESIGN, SGF_SWAP};
use crate::history::History;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dialect {
    Standard,
    LittleGolem,
}

#[derive(Debug, Error)]
pub enum SgfError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },
    #[error("missing board size property SZ")]
    MissingBoardSize,
    #[error("invalid board size `{0}`")]
    InvalidBoardSize(String),
    #[error("board size {0} does not fit SGF coordinates a..z")]
    BoardTooLarge(usize),
    #[error("unsupported rule `{0}`")]
    UnsupportedRule(String),
    #[error("invalid move #{index} `{value}`: {reason}")]
    InvalidMove {
        index: usize,
        value: String,
        reason: String,
    },
}

/// Error type of [`load`].
pub type LoadError = SgfError;

impl Dialect {
    /// Color tag of the player making move number `index` (0-based).
    pub fn color_tag(self, index: usize) -> char {
        let first_is_black = self == Dialect::Standard;
        if (index % 2 == 0) == first_is_black {
            'B'
        } else {
            'W'
        }
    }

    /// The dialect whose first move carries `tag`.
    pub fn from_first_tag(tag: char) -> Option<Dialect> {
        match tag {
            'B' => Some(Dialect::Standard),
            'W' => Some(Dialect::LittleGolem),
            _ => None,
        }
    }

    /// Text of cell `(i, j)` on a board of `size`. `None` if the cell is off
    /// the board or the board is larger than [`MAX_SGF_BOARD_SIZE`].
    pub fn encode(self, (i, j): Point, size: usize) -> Option<String> {
        if size > MAX_SGF_BOARD_SIZE || i >= size || j >= size {
            return None;
        }
        let column = letter(i);
        let row = size - 1 - j;
        Some(match self {
            Dialect::Standard => format!("{column}{row}"),
            Dialect::LittleGolem => format!("{column}{}", letter(row)),
        })
    }

    /// Inverse of [`Dialect::encode`]. `None` if the text is malformed or off
    /// the board.
    pub fn decode(self, text: &str, size: usize) -> Option<Point> {
        let mut chars = text.chars();
        let i = letter_value(chars.next()?)?;
        let rest = chars.as_str();
        let row = match self {
            Dialect::Standard => {
                if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                if rest.len() > 1 && rest.starts_with('0') {
                    return None;
                }
                rest.parse::<usize>().ok()?
            }
            Dialect::LittleGolem => {
                let mut rest = rest.chars();
                let row = letter_value(rest.next()?)?;
                if rest.next().is_some() {
                    return None;
                }
                row
            }
        };
        if i >= size || row >= size {
            return None;
        }
        Some((i, size - 1 - row))
    }
}

fn letter(n: usize) -> char {
    debug_assert!(n < MAX_SGF_BOARD_SIZE);
    (b'a' + n as u8) as char
}

fn letter_value(ch: char) -> Option<usize> {
    let ch = ch.to_ascii_lowercase();
    ch.is_ascii_lowercase().then(|| (ch as u8 - b'a') as usize)
}

// =============================================================================
// Writing
// =============================================================================

/// Write every recorded move of `history`, regardless of its cursor.
pub fn write_sgf<W: Write>(
    history: &History,
    dialect: Dialect,
    f: &mut W,
) -> Result<(), SgfError> {
    let size = history.game().size();
    if size > MAX_SGF_BOARD_SIZE {
        return Err(SgfError::BoardTooLarge(size));
    }
    write!(f, "(;FF[4]SZ[{size}]")?;
    for (index, rec) in history.records().iter().enumerate() {
        let coordinate = dialect
            .encode((rec.i, rec.j), size)
            .ok_or(SgfError::BoardTooLarge(size))?;
        write!(f, ";{}[{coordinate}]", dialect.color_tag(index))?;
    }
    writeln!(f, ")")?;
    Ok(())
}

pub fn to_sgf_string(history: &History, dialect: Dialect) -> Result<String, SgfError> {
    let mut buffer = Vec::new();
    write_sgf(history, dialect, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn save<P: AsRef<Path>>(
    history: &History,
    dialect: Dialect,
    path: P,
) -> Result<(), SgfError> {
    let path = path.as_ref();
    let text = to_sgf_string(history, dialect)?;
    fs::write(path, text)?;
    debug!(
        "saved {} moves to {} ({dialect:?})",
        history.len(),
        path.display()
    );
    Ok(())
}

// =============================================================================
// Reading
// =============================================================================

/// Rebuild a game from SGF text. With `dialect` set to `None`, the dialect is
/// picked from the color of the first move.
///
/// Every move goes through [`History::record`]. Nothing is returned unless the
/// whole record loads.
pub fn from_sgf_str(text: &str, dialect: Option<Dialect>) -> Result<History, SgfError> {
    let nodes = parse_nodes(text)?;
    let (root, moves) = nodes.split_first().ok_or_else(|| SgfError::Syntax {
        offset: 0,
        message: "game tree has no nodes".to_string(),
    })?;

    let size_text = property(root, "SZ").ok_or(SgfError::MissingBoardSize)?;
    let size: usize = size_text
        .trim()
        .parse()
        .map_err(|_| SgfError::InvalidBoardSize(size_text.to_string()))?;
    if size > MAX_SGF_BOARD_SIZE {
        return Err(SgfError::BoardTooLarge(size));
    }
    let mut history =
        History::new(size).map_err(|_| SgfError::InvalidBoardSize(size_text.to_string()))?;

    let mut dialect = dialect;
    let mut index = 0;
    for node in moves {
        let Some((tag, value)) = move_property(node) else {
            continue;
        };
        let value = value.trim();
        let dialect = *dialect.get_or_insert_with(|| {
            let detected = Dialect::from_first_tag(tag).unwrap_or(Dialect::Standard);
            debug!("detected {detected:?} dialect from first move tag {tag}");
            detected
        });
        let invalid = |reason: &str| SgfError::InvalidMove {
            index,
            value: value.to_string(),
            reason: reason.to_string(),
        };

        if value.eq_ignore_ascii_case(SGF_RESIGN) {
            debug!("game record resigned after {index} moves");
            break;
        }
        if SGF_SWAP.iter().any(|swap| value.eq_ignore_ascii_case(swap)) {
            return Err(SgfError::UnsupportedRule(value.to_string()));
        }
        if tag != dialect.color_tag(index) {
            return Err(invalid("played out of turn"));
        }
        let (i, j) = dialect
            .decode(value, size)
            .ok_or_else(|| invalid("not a cell of the board"))?;
        history
            .record(i, j)
            .map_err(|err| invalid(&err.to_string()))?;
        index += 1;
    }

    debug!("loaded {index} moves on a {size}x{size} board");
    Ok(history)
}

pub fn load<P: AsRef<Path>>(dialect: Option<Dialect>, path: P) -> Result<History, LoadError> {
    let text = fs::read_to_string(path)?;
    from_sgf_str(&text, dialect)
}

/// A node: its properties with their values, in order.
type Node = Vec<(String, Vec<String>)>;

fn property<'a>(node: &'a Node, name: &str) -> Option<&'a str> {
    node.iter()
        .find(|(ident, _)| ident == name)
        .and_then(|(_, values)| values.first())
        .map(String::as_str)
}

fn move_property(node: &Node) -> Option<(char, &str)> {
    node.iter().find_map(|(ident, values)| {
        let tag = match ident.as_str() {
            "B" => 'B',
            "W" => 'W',
            _ => return None,
        };
        Some((tag, values.first().map(String::as_str).unwrap_or("")))
    })
}

/// Split a single-variation game tree `( ;node ;node ... )` into nodes.
fn parse_nodes(text: &str) -> Result<Vec<Node>, SgfError> {
    let mut input = ParserData { text, rest: text };
    input.skip_whitespaces();
    if input.take() != Some('(') {
        return Err(input.error("expected `(`"));
    }

    let mut nodes = Vec::new();
    loop {
        input.skip_whitespaces();
        match input.take() {
            Some(';') => nodes.push(parse_node(&mut input)?),
            Some(')') => return Ok(nodes),
            Some('(') => return Err(input.error("variations are not supported")),
            Some(ch) => return Err(input.error(&format!("unexpected `{ch}`"))),
            None => return Err(input.error("unterminated game tree")),
        }
    }
}

fn parse_node(input: &mut ParserData) -> Result<Node, SgfError> {
    let mut node = Node::new();
    loop {
        input.skip_whitespaces();
        match input.peek() {
            Some(ch) if ch.is_ascii_uppercase() => {
                let ident = input.take_while(|ch| ch.is_ascii_uppercase()).to_string();
                let mut values = Vec::new();
                input.skip_whitespaces();
                while input.peek() == Some('[') {
                    input.take();
                    values.push(parse_value(input)?);
                    input.skip_whitespaces();
                }
                if values.is_empty() {
                    return Err(input.error(&format!("property {ident} has no value")));
                }
                node.push((ident, values));
            }
            _ => return Ok(node),
        }
    }
}

fn parse_value(input: &mut ParserData) -> Result<String, SgfError> {
    let mut value = String::new();
    loop {
        match input.take() {
            Some(']') => return Ok(value),
            Some('\\') => match input.take() {
                Some(ch) => value.push(ch),
                None => return Err(input.error("unterminated property value")),
            },
            Some(ch) => value.push(ch),
            None => return Err(input.error("unterminated property value")),
        }
    }
}

struct ParserData<'a> {
    text: &'a str,
    rest: &'a str,
}

impl<'a> ParserData<'a> {
    fn offset(&self) -> usize {
        self.text.len() - self.rest.len()
    }

    fn error(&self, message: &str) -> SgfError {
        SgfError::Syntax {
            offset: self.offset(),
            message: message.to_string(),
        }
    }

    fn skip_whitespaces(&mut self) {
        self.rest = self.rest.trim_start_matches(char::is_whitespace);
    }

    fn take_while<F: Fn(char) -> bool>(&mut self, f: F) -> &'a str {
        let end = self
            .rest
            .char_indices()
            .find(|&(_, ch)| !f(ch))
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (output, rest) = self.rest.split_at(end);
        self.rest = rest;
        output
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn take(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.rest = &self.rest[ch.len_utf8()..];
        Some(ch)
    }
}
