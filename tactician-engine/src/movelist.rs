//! MoveList types used in the Tactician engine.
//!
//! The underlying type of MoveList may change at any time during
//! pre-1.0 development, so a MoveList type alias makes changes easy.

use std::fmt::Display;

use arrayvec::ArrayVec;

use crate::coretypes::{Cp, Move, MAX_MOVES};

/// MoveList is a container that can hold at most `MAX_MOVES`, the most number of moves per any chess position.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;
/// ScoredMoveList pairs each move with the heuristic score it was ordered by.
pub type ScoredMoveList = ArrayVec<(Move, Cp), MAX_MOVES>;
/// Line is a sequence of moves played from some base position.
pub type Line = Vec<Move>;

/// Space separated display of a sequence of items, such as a list of moves.
pub fn display<T: Display>(items: &[T]) -> String {
    let mut displayed = String::new();
    for item in items {
        displayed.push_str(&item.to_string());
        displayed.push(' ');
    }
    displayed.pop();

    displayed
}
