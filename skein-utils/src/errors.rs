//! Errors generated by the compiler.
use crate::{Id, Pos};

/// Convenience wrapper to represent success or meaningful compiler error.
pub type SkeinResult<T> = std::result::Result<T, Error>;

/// Errors generated by the compiler
#[derive(Clone)]
pub struct Error {
    kind: Box<ErrorKind>,
    pos: Pos,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.pos == Pos::UNKNOWN {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} [{}]", self.kind, self.pos)
        }
    }
}

impl Error {
    pub fn with_pos(mut self, pos: Pos) -> Self {
        self.pos = pos;
        self
    }

    pub fn parse_error<S: ToString>(msg: S) -> Self {
        Self {
            kind: Box::new(ErrorKind::Parse(msg.to_string())),
            pos: Pos::UNKNOWN,
        }
    }
    pub fn duplicate_component(name: Id) -> Self {
        Self {
            kind: Box::new(ErrorKind::DuplicateComponent(name)),
            pos: Pos::UNKNOWN,
        }
    }
    pub fn recursive_component(name: Id) -> Self {
        Self {
            kind: Box::new(ErrorKind::RecursiveComponent(name)),
            pos: Pos::UNKNOWN,
        }
    }
    pub fn unresolved_symbol(name: Id) -> Self {
        Self {
            kind: Box::new(ErrorKind::UnresolvedSymbol(name)),
            pos: Pos::UNKNOWN,
        }
    }
    pub fn unknown_actor_type(name: Id) -> Self {
        Self {
            kind: Box::new(ErrorKind::UnknownActorType(name)),
            pos: Pos::UNKNOWN,
        }
    }
    pub fn malformed_tree<S: ToString>(msg: S) -> Self {
        Self {
            kind: Box::new(ErrorKind::MalformedTree(msg.to_string())),
            pos: Pos::UNKNOWN,
        }
    }
    pub fn invalid_file<S: ToString>(msg: S) -> Self {
        Self {
            kind: Box::new(ErrorKind::InvalidFile(msg.to_string())),
            pos: Pos::UNKNOWN,
        }
    }
    pub fn write_error<S: ToString>(msg: S) -> Self {
        Self {
            kind: Box::new(ErrorKind::WriteError(msg.to_string())),
            pos: Pos::UNKNOWN,
        }
    }
    pub fn misc<S: ToString>(msg: S) -> Self {
        Self {
            kind: Box::new(ErrorKind::Misc(msg.to_string())),
            pos: Pos::UNKNOWN,
        }
    }

    pub fn location(&self) -> Pos {
        self.pos
    }
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Standard error type for skein errors.
#[derive(Clone)]
enum ErrorKind {
    /// The source script could not be parsed.
    Parse(String),
    /// Two top-level components share a name.
    DuplicateComponent(Id),
    /// Component expansion exceeded the recursion limit.
    RecursiveComponent(Id),
    /// An identifier could not be resolved in any enclosing scope.
    UnresolvedSymbol(Id),
    /// The actor store has no entry for the named type.
    UnknownActorType(Id),
    /// A structural invariant of the tree was violated.
    MalformedTree(String),

    // =========== Driver Errors ===============
    /// The input file is invalid (does not exist).
    InvalidFile(String),
    /// Failed to write the output
    WriteError(String),
    /// Miscellaneous error message
    Misc(String),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ErrorKind::*;
        match self {
            Parse(msg) => write!(f, "Parse error: {msg}"),
            DuplicateComponent(name) => {
                write!(f, "Component `{name}' defined more than once")
            }
            RecursiveComponent(name) => {
                write!(f, "Recursive expansion of component `{name}'")
            }
            UnresolvedSymbol(name) => {
                write!(f, "Missing symbol `{name}'")
            }
            UnknownActorType(name) => {
                write!(f, "Unknown actor type: {name}")
            }
            MalformedTree(msg) => write!(f, "Malformed tree: {msg}"),
            InvalidFile(msg) | WriteError(msg) | Misc(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

// Conversions from other error types to our error type so that
// we can use `?` in all the places.
impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::invalid_file(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::write_error(format!("IO Error: {}", e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::parse_error(format!("serde_json Error: {}", e))
    }
}
