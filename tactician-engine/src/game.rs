//! Game state collaborator.
//!
//! The decision core never looks at a board directly. Everything it needs from the
//! rules of chess goes through the [`GameState`] trait: legal moves, paired
//! apply/revert, check detection, piece lookups and turn skipping.
//!
//! [`Game`] implements the trait over the `chess` crate. It keeps a stack of
//! boards so that `revert` restores the exact board that preceded the matching
//! `apply`.

use std::fmt::{self, Display};
use std::str::FromStr;

use chess::{BoardStatus, MoveGen, EMPTY};

use crate::coretypes::{Board, Color, Move, Piece, Square, ALL_COLORS, ALL_PIECES};
use crate::error::{self, ErrorKind};
use crate::movelist::{Line, MoveList};

/// Everything the engine requires of a chess position.
///
/// Implementors own a single mutable position. `apply` and `revert` must be called
/// in strictly nested pairs, where `revert` undoes the most recent unreverted
/// `apply`. The same holds for `skip_turn` and `undo_skip_turn`.
pub trait GameState {
    /// All legal moves for the player to move, regenerated on every call.
    fn legal_moves(&self) -> MoveList;

    /// Number of legal moves for the player to move.
    fn legal_move_count(&self) -> usize {
        self.legal_moves().len()
    }

    /// Play a legal move for the player to move.
    fn apply(&mut self, move_: Move);

    /// Take back `move_`, which must be the last applied and unreverted move.
    fn revert(&mut self, move_: Move);

    /// Pass the turn to the opponent without moving.
    /// Returns false and leaves the position untouched if passing is not possible.
    fn skip_turn(&mut self) -> bool;

    /// Take back the last successful `skip_turn`.
    fn undo_skip_turn(&mut self);

    fn is_checkmate(&self) -> bool;

    fn is_in_check(&self) -> bool;

    fn side_to_move(&self) -> Color;

    /// Piece kind and owner occupying a square, if any.
    fn piece_at(&self, square: Square) -> Option<(Piece, Color)>;

    /// Number of pieces of one kind owned by one player.
    fn piece_count(&self, color: Color, piece: Piece) -> u32;

    /// Number of pieces on the board, kings included.
    fn total_pieces(&self) -> u32 {
        ALL_COLORS
            .iter()
            .flat_map(|&color| ALL_PIECES.iter().map(move |&piece| (color, piece)))
            .map(|(color, piece)| self.piece_count(color, piece))
            .sum()
    }
}

/// One undo record: the board before a move (or a skipped turn) was made.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Frame {
    board: Board,
    move_: Option<Move>,
}

/// Game contains information for an in progress game:
/// the board it started from, the moves played since, and the current board.
///
/// Moves played through `play` are permanent history. Moves applied through the
/// `GameState` trait are speculative and sit on the undo stack until reverted.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Game {
    base_board: Board,
    moves: Line,
    board: Board,
    undo: Vec<Frame>,
}

impl Game {
    /// Create a new Game from a base board and a sequence of moves.
    /// If a move in the sequence is illegal, Err is returned.
    pub fn new(base_board: Board, moves: &[Move]) -> error::Result<Self> {
        let mut game = Self::from(base_board);
        for &move_ in moves {
            game.play(move_)?;
        }
        Ok(game)
    }

    /// Create a new game in the standard chess start position.
    pub fn start_position() -> Self {
        Self::from(Board::default())
    }

    /// Create a new game from a FEN string.
    pub fn parse_fen(fen: &str) -> error::Result<Self> {
        let board = Board::from_str(fen)?;
        Ok(Self::from(board))
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The board the game started from.
    pub fn base_board(&self) -> &Board {
        &self.base_board
    }

    /// Moves permanently played from the base board.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// FEN string of the current board.
    pub fn to_fen(&self) -> String {
        self.board.to_string()
    }

    /// Permanently play a move, checking legality first.
    /// Speculative moves must all be reverted before a move is played.
    pub fn play(&mut self, move_: Move) -> error::Result<()> {
        debug_assert!(self.undo.is_empty(), "play called during a search");

        if !self.board.legal(move_) {
            return Err((ErrorKind::GameIllegalMove, move_).into());
        }
        self.board = self.board.make_move_new(move_);
        self.moves.push(move_);
        Ok(())
    }

    /// Returns true if the player to move has no legal move and is not in check.
    pub fn is_stalemate(&self) -> bool {
        self.board.status() == BoardStatus::Stalemate
    }

    /// Parse a move in coordinate notation (e.g. "e2e4", "e7e8q") that is legal
    /// in the current position.
    pub fn parse_move(&self, move_str: &str) -> error::Result<Move> {
        let move_str = move_str.trim();
        let malformed = || error::Error::from((ErrorKind::ParseMoveMalformed, move_str));

        let from = move_str.get(0..2).ok_or_else(malformed)?;
        let to = move_str.get(2..4).ok_or_else(malformed)?;
        let from = Square::from_str(from).map_err(|_| malformed())?;
        let to = Square::from_str(to).map_err(|_| malformed())?;

        let promotion = match move_str.get(4..) {
            None | Some("") => None,
            Some("q") | Some("Q") => Some(Piece::Queen),
            Some("r") | Some("R") => Some(Piece::Rook),
            Some("b") | Some("B") => Some(Piece::Bishop),
            Some("n") | Some("N") => Some(Piece::Knight),
            Some(_) => return Err(malformed()),
        };

        let move_ = Move::new(from, to, promotion);
        self.board
            .legal(move_)
            .then_some(move_)
            .ok_or_else(|| (ErrorKind::GameIllegalMove, move_str).into())
    }
}

/// Convert a board to a Game with no past moves.
impl From<Board> for Game {
    fn from(board: Board) -> Self {
        Self {
            base_board: board,
            moves: Line::new(),
            board,
            undo: Vec::new(),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::start_position()
    }
}

impl Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

impl GameState for Game {
    fn legal_moves(&self) -> MoveList {
        MoveGen::new_legal(&self.board).collect()
    }

    fn legal_move_count(&self) -> usize {
        MoveGen::new_legal(&self.board).len()
    }

    fn apply(&mut self, move_: Move) {
        let next = self.board.make_move_new(move_);
        self.undo.push(Frame {
            board: self.board,
            move_: Some(move_),
        });
        self.board = next;
    }

    fn revert(&mut self, move_: Move) {
        let frame = self.undo.pop();
        debug_assert!(
            matches!(frame, Some(Frame { move_: Some(last), .. }) if last == move_),
            "revert {move_} does not match the last apply"
        );
        if let Some(frame) = frame {
            self.board = frame.board;
        }
    }

    fn skip_turn(&mut self) -> bool {
        match self.board.null_move() {
            Some(next) => {
                self.undo.push(Frame {
                    board: self.board,
                    move_: None,
                });
                self.board = next;
                true
            }
            None => false,
        }
    }

    fn undo_skip_turn(&mut self) {
        let frame = self.undo.pop();
        debug_assert!(
            matches!(frame, Some(Frame { move_: None, .. })),
            "undo_skip_turn does not match the last skip_turn"
        );
        if let Some(frame) = frame {
            self.board = frame.board;
        }
    }

    fn is_checkmate(&self) -> bool {
        self.board.status() == BoardStatus::Checkmate
    }

    fn is_in_check(&self) -> bool {
        *self.board.checkers() != EMPTY
    }

    fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        self.board.piece_on(square).zip(self.board.color_on(square))
    }

    fn piece_count(&self, color: Color, piece: Piece) -> u32 {
        (self.board.pieces(piece) & self.board.color_combined(color)).popcnt()
    }

    fn total_pieces(&self) -> u32 {
        self.board.combined().popcnt()
    }
}
