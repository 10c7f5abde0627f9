//! Source positions attached to tree nodes and diagnostics.
use serde::{Deserialize, Serialize};

/// A line/column pair in the source script. Lines and columns are 1-based;
/// `Pos::UNKNOWN` is all zeros and means "no position information".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    pub line: u32,
    pub col: u32,
}

impl Pos {
    pub const UNKNOWN: Pos = Pos { line: 0, col: 0 };

    pub fn new(line: u32, col: u32) -> Self {
        Pos { line, col }
    }

    /// True unless this is `Pos::UNKNOWN`.
    pub fn is_known(&self) -> bool {
        *self != Pos::UNKNOWN
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
