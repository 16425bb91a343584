//! Minimax implementation.

use std::cmp;

use crate::coretypes::{Cp, PlyKind};
use crate::evaluation::{evaluate, Weights};
use crate::game::GameState;
use crate::moveorder::order_all_moves;
use crate::search::SearchStats;

/// Unpruned search in negamax form, visiting every node to the given depth.
///
/// Minimax cannot prune any of its children, so the score it returns is the reference
/// that alpha-beta search must reproduce. Moves are visited in the same order as
/// `negamax`, with the same terminal rules.
pub fn minimax<G: GameState>(
    game: &mut G,
    ply: PlyKind,
    weights: &Weights,
    stats: &mut SearchStats,
) -> Cp {
    stats.nodes += 1;

    if ply == 0 || game.is_checkmate() {
        return evaluate(game, weights);
    }

    let legal_moves = game.legal_moves();
    if legal_moves.is_empty() {
        return evaluate(game, weights);
    }

    let mut best_score = Cp::MIN;
    for legal_move in order_all_moves(game, &legal_moves) {
        game.apply(legal_move);
        let move_score = -minimax(game, ply - 1, weights, stats);
        game.revert(legal_move);

        best_score = cmp::max(best_score, move_score);
    }

    best_score
}
