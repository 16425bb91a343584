//! The fundamental and simple types of `tactician_engine`.
//!
//! Board level types (squares, pieces, colors, moves) come from the `chess` crate,
//! which acts as the engine's rules collaborator. This module adds the engine's own
//! scoring unit and the per-piece values used by evaluation and move ordering.

use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

pub use chess::{Board, ChessMove as Move, Color, Piece, Square, ALL_COLORS, ALL_PIECES};

///////////////
// Constants //
///////////////

// The max possible measured number of moves for any chess position.
pub const MAX_MOVES: usize = 218;

// The greatest depth the engine will search to, regardless of configuration.
pub const MAX_DEPTH: PlyKind = 16;

/////////////////////////
// Data and Structures //
/////////////////////////

/// Type alias for max ply/depth.
pub type PlyKind = u32;

// Type alias to make changing Cp inner type easy if needed.
pub type CpKind = i32;

/// Centipawn, a common unit of measurement in chess, where 100 Centipawn == 1 Pawn.
///
/// Search and evaluation scores are always relative to the player to move at the
/// node being scored, so a positive value is good for that player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Cp(pub CpKind);

impl Cp {
    pub const MIN: Cp = Self(CpKind::MIN + 1); // + 1 to avoid overflow error on negate.
    pub const MAX: Cp = Self(CpKind::MAX);
    pub const ZERO: Cp = Self(0);
}

impl Add for Cp {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}
impl AddAssign for Cp {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}
impl Sub for Cp {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
impl Mul for Cp {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}
impl Mul<CpKind> for Cp {
    type Output = Cp;
    fn mul(self, rhs: CpKind) -> Self::Output {
        Self(self.0 * rhs)
    }
}
impl Neg for Cp {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}
impl Display for Cp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

/// Square constants, for brevity in tests and fixed positions.
pub mod squares {
    use super::Square;

    pub const A1: Square = Square::A1;
    pub const B1: Square = Square::B1;
    pub const C1: Square = Square::C1;
    pub const D1: Square = Square::D1;
    pub const E1: Square = Square::E1;
    pub const F1: Square = Square::F1;
    pub const G1: Square = Square::G1;
    pub const H1: Square = Square::H1;
    pub const A2: Square = Square::A2;
    pub const B2: Square = Square::B2;
    pub const C2: Square = Square::C2;
    pub const D2: Square = Square::D2;
    pub const E2: Square = Square::E2;
    pub const F2: Square = Square::F2;
    pub const G2: Square = Square::G2;
    pub const H2: Square = Square::H2;
    pub const A3: Square = Square::A3;
    pub const B3: Square = Square::B3;
    pub const C3: Square = Square::C3;
    pub const D3: Square = Square::D3;
    pub const E3: Square = Square::E3;
    pub const F3: Square = Square::F3;
    pub const G3: Square = Square::G3;
    pub const H3: Square = Square::H3;
    pub const A4: Square = Square::A4;
    pub const B4: Square = Square::B4;
    pub const C4: Square = Square::C4;
    pub const D4: Square = Square::D4;
    pub const E4: Square = Square::E4;
    pub const F4: Square = Square::F4;
    pub const G4: Square = Square::G4;
    pub const H4: Square = Square::H4;
    pub const A5: Square = Square::A5;
    pub const B5: Square = Square::B5;
    pub const C5: Square = Square::C5;
    pub const D5: Square = Square::D5;
    pub const E5: Square = Square::E5;
    pub const F5: Square = Square::F5;
    pub const G5: Square = Square::G5;
    pub const H5: Square = Square::H5;
    pub const A6: Square = Square::A6;
    pub const B6: Square = Square::B6;
    pub const C6: Square = Square::C6;
    pub const D6: Square = Square::D6;
    pub const E6: Square = Square::E6;
    pub const F6: Square = Square::F6;
    pub const G6: Square = Square::G6;
    pub const H6: Square = Square::H6;
    pub const A7: Square = Square::A7;
    pub const B7: Square = Square::B7;
    pub const C7: Square = Square::C7;
    pub const D7: Square = Square::D7;
    pub const E7: Square = Square::E7;
    pub const F7: Square = Square::F7;
    pub const G7: Square = Square::G7;
    pub const H7: Square = Square::H7;
    pub const A8: Square = Square::A8;
    pub const B8: Square = Square::B8;
    pub const C8: Square = Square::C8;
    pub const D8: Square = Square::D8;
    pub const E8: Square = Square::E8;
    pub const F8: Square = Square::F8;
    pub const G8: Square = Square::G8;
    pub const H8: Square = Square::H8;
}

/// Default, color independent value per piece.
pub trait Centipawns {
    fn centipawns(&self) -> Cp;
}

impl Centipawns for Piece {
    fn centipawns(&self) -> Cp {
        Cp(match self {
            Piece::Pawn => 100,
            Piece::Knight => 300,
            Piece::Bishop => 300,
            Piece::Rook => 500,
            Piece::Queen => 900,
            // Never traded on, only guards degenerate positions.
            Piece::King => 10_000,
        })
    }
}

/// An empty square is worth nothing.
impl Centipawns for Option<Piece> {
    fn centipawns(&self) -> Cp {
        self.map_or(Cp::ZERO, |piece| piece.centipawns())
    }
}

/// Absolute sign of a player.
pub trait Sign {
    /// A positive value is good for White and a negative value is good for Black.
    fn sign(&self) -> Cp;
}

impl Sign for Color {
    fn sign(&self) -> Cp {
        match self {
            Color::White => Cp(1),
            Color::Black => Cp(-1),
        }
    }
}
