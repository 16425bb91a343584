//! Tactician Engine error type.

use std::error;
use std::fmt::{self, Display};
use std::result;

/// Tactician Engine generic result type.
pub type Result<T> = result::Result<T, Error>;

/// A list specifying general errors for the Tactician engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An argument was expected following a string key, but none was provided.
    UciNoArgument,
    /// Uci failed to parse an integer type.
    UciCannotParseInt,
    /// Uci received an unsupported option.
    UciInvalidOption,
    /// Uci received an unknown command.
    UciUnknownCommand,
    /// Uci received no command string.
    UciNoCommand,
    /// Uci debug missing mode.
    UciDebugNoMode,
    /// Uci debug illegal mode.
    UciDebugIllegalMode,
    /// No name provided for Uci setoption command.
    UciSetOptionNoName,
    /// Uci position command malformed.
    UciPositionMalformed,
    /// Uci Option fails to update.
    UciOptionCannotUpdate,

    /// A FEN string could not be turned into a board.
    Fen,
    /// A move string is not in coordinate notation.
    ParseMoveMalformed,

    /// Time Management Mode cannot be created, missing fields.
    ModeNotSatisfied,

    /// A decision was requested for a position where the player to move has no moves.
    NoLegalMoves,
    /// An illegal move was provided, and could not be applied to some position.
    GameIllegalMove,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UciNoArgument => "uci no argument",
            ErrorKind::UciCannotParseInt => "uci cannot parse integer",
            ErrorKind::UciInvalidOption => "uci invalid option",
            ErrorKind::UciUnknownCommand => "uci unknown command",
            ErrorKind::UciNoCommand => "uci no command",
            ErrorKind::UciDebugNoMode => "uci debug no mode",
            ErrorKind::UciDebugIllegalMode => "uci debug illegal mode",
            ErrorKind::UciSetOptionNoName => "uci setoption no name",
            ErrorKind::UciPositionMalformed => "uci position malformed",
            ErrorKind::UciOptionCannotUpdate => "uci option cannot update",

            ErrorKind::Fen => "fen",
            ErrorKind::ParseMoveMalformed => "parse move malformed",

            ErrorKind::ModeNotSatisfied => "mode not satisfied",

            ErrorKind::NoLegalMoves => "no legal moves",
            ErrorKind::GameIllegalMove => "game illegal move",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The primary and general error type for the Tactician Engine.
#[derive(Debug)]
pub enum Error {
    Simple(ErrorKind),
    Message(ErrorKind, String),
}

impl Error {
    /// Returns the kind of this error, regardless of any attached context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Simple(kind) | Error::Message(kind, _) => *kind,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Simple(error_kind) => {
                write!(f, "{error_kind}")
            }
            Error::Message(error_kind, string) => {
                write!(f, "{error_kind}: {string}")
            }
        }
    }
}

impl error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(error_kind: ErrorKind) -> Self {
        Self::Simple(error_kind)
    }
}

// chess::Error does not implement std::error::Error, so only its message is kept.
impl From<chess::Error> for Error {
    fn from(error: chess::Error) -> Self {
        Self::Message(ErrorKind::Fen, error.to_string())
    }
}

impl<S: ToString> From<(ErrorKind, S)> for Error {
    fn from((error_kind, stringable): (ErrorKind, S)) -> Self {
        Self::Message(error_kind, stringable.to_string())
    }
}
