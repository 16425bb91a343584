//! Move Ordering
//!
//! Functions used for ordering a list of moves from best to worst.
//!
//! Move ordering is important for alpha-beta pruning performance.
//! If the best or good moves are searched early on in an alpha-beta search,
//! pruning occurs more frequently.
//!
//! Moves are ranked by a cheap approximation of a static exchange: the value of
//! the piece captured, minus the value of the moving piece if the opponent can
//! immediately land on the same square. Only one reply ply is examined, so this is
//! not an exact exchange evaluation.

use crate::coretypes::{Centipawns, Cp, Move};
use crate::game::GameState;
use crate::movelist::{MoveList, ScoredMoveList};

/// Returns true if after playing `move_`, the opponent has a legal move
/// that lands on the square `move_` moved to.
/// The game is returned to its original state before returning.
pub fn creates_target<G: GameState>(game: &mut G, move_: Move) -> bool {
    let target = move_.get_dest();

    game.apply(move_);
    let is_target = game
        .legal_moves()
        .iter()
        .any(|reply| reply.get_dest() == target);
    game.revert(move_);

    is_target
}

/// Heuristic value of a move: value of the captured piece minus the value of the
/// moving piece when it can be recaptured.
pub fn exchange_score<G: GameState>(game: &mut G, move_: Move) -> Cp {
    let captured = game.piece_at(move_.get_dest()).map(|(piece, _)| piece);
    let mover = game.piece_at(move_.get_source()).map(|(piece, _)| piece);

    let cost = match creates_target(game, move_) {
        true => mover.centipawns(),
        false => Cp::ZERO,
    };

    captured.centipawns() - cost
}

/// Score every move and order them from best to worst.
/// The sort is stable, so equally scored moves keep their generation order.
pub fn score_all_moves<G: GameState>(game: &mut G, moves: &[Move]) -> ScoredMoveList {
    let mut scored: ScoredMoveList = moves
        .iter()
        .map(|&move_| (move_, exchange_score(game, move_)))
        .collect();

    scored.sort_by(|left, right| right.1.cmp(&left.1));
    scored
}

/// Order all moves in a container completely, from best to worst.
pub fn order_all_moves<G: GameState>(game: &mut G, moves: &[Move]) -> MoveList {
    score_all_moves(game, moves)
        .into_iter()
        .map(|(move_, _)| move_)
        .collect()
}
