//! Tactical shortcuts.
//!
//! Before any search is run, root moves are inspected for a few decisions that are
//! cheap to recognize and too good to pass up. Rules are tried in priority order and
//! the first that applies decides the move:
//!
//! 1. A move that checkmates immediately.
//! 2. A promotion, to the most valuable piece available.
//! 3. A check that cannot be answered by capturing the checking piece, but only
//!    while there is enough material on the board. With little material left the
//!    engine prefers to calculate.

use std::fmt::{self, Display};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::coretypes::{Centipawns, Move};
use crate::game::GameState;
use crate::movelist::MoveList;
use crate::moveorder::creates_target;

/// The rule that produced a shortcut.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Tactic {
    Checkmate,
    Promotion,
    SafeCheck,
}

impl Display for Tactic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Tactic::Checkmate => "checkmate",
            Tactic::Promotion => "promotion",
            Tactic::SafeCheck => "safe check",
        })
    }
}

/// A root move chosen without search.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Shortcut {
    pub move_: Move,
    pub tactic: Tactic,
}

/// Returns true if playing `move_` checkmates the opponent.
pub fn gives_checkmate<G: GameState>(game: &mut G, move_: Move) -> bool {
    game.apply(move_);
    let is_mate = game.is_checkmate();
    game.revert(move_);
    is_mate
}

/// Returns true if playing `move_` puts the opponent in check.
pub fn gives_check<G: GameState>(game: &mut G, move_: Move) -> bool {
    game.apply(move_);
    let is_check = game.is_in_check();
    game.revert(move_);
    is_check
}

/// First move, in the given order, that checkmates.
pub fn find_checkmate<G: GameState>(game: &mut G, moves: &[Move]) -> Option<Move> {
    moves
        .iter()
        .copied()
        .find(|&move_| gives_checkmate(game, move_))
}

/// The promotion to the most valuable piece.
/// Equally valued promotions resolve to the first one listed.
pub fn best_promotion(moves: &[Move]) -> Option<Move> {
    moves
        .iter()
        .filter_map(|&move_| move_.get_promotion().map(|piece| (move_, piece.centipawns())))
        .fold(None, |best, (move_, cp)| match best {
            Some((_, best_cp)) if best_cp >= cp => best,
            _ => Some((move_, cp)),
        })
        .map(|(move_, _)| move_)
}

/// All checking moves whose destination the opponent cannot immediately move to.
pub fn safe_checks<G: GameState>(game: &mut G, moves: &[Move]) -> MoveList {
    moves
        .iter()
        .copied()
        .filter(|&move_| gives_check(game, move_) && !creates_target(game, move_))
        .collect()
}

/// Try each tactical rule in priority order.
///
/// `safe_check_min_pieces`: safe checks are only considered when the board holds
/// more pieces than this.
pub fn try_shortcut<G, R>(
    game: &mut G,
    moves: &[Move],
    safe_check_min_pieces: u32,
    rng: &mut R,
) -> Option<Shortcut>
where
    G: GameState,
    R: Rng + ?Sized,
{
    if let Some(move_) = find_checkmate(game, moves) {
        return Some(Shortcut {
            move_,
            tactic: Tactic::Checkmate,
        });
    }

    if let Some(move_) = best_promotion(moves) {
        return Some(Shortcut {
            move_,
            tactic: Tactic::Promotion,
        });
    }

    if game.total_pieces() > safe_check_min_pieces {
        let checks = safe_checks(game, moves);
        if let Some(&move_) = checks.choose(rng) {
            return Some(Shortcut {
                move_,
                tactic: Tactic::SafeCheck,
            });
        }
    }

    None
}
