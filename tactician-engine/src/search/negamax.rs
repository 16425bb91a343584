//! Negamax implementation of Minimax with Alpha-Beta pruning.

use std::cmp;

use crate::coretypes::{Cp, PlyKind};
use crate::evaluation::{evaluate, Weights};
use crate::game::GameState;
use crate::moveorder::order_all_moves;
use crate::search::SearchStats;

/// The player whose turn it is to move for a position is always treated as the maxing player.
/// negamax returns the max possible score of the current maxing player.
/// Therefore, when interpreting the score of a child node, the score needs to be negated.
///
/// Parameters:
///
/// game: current position to search. It is identical to its entry state on return.
/// ply: remaining depth to search to.
/// alpha: Best (greatest) guaranteed value for current player.
/// beta: Best (lowest) guaranteed value for opposite player.
/// weights: evaluation weights used at leaf nodes.
/// stats: counters for nodes visited and cutoffs performed.
pub fn negamax<G: GameState>(
    game: &mut G,
    ply: PlyKind,
    mut alpha: Cp,
    beta: Cp,
    weights: &Weights,
    stats: &mut SearchStats,
) -> Cp {
    stats.nodes += 1;

    // Checkmated nodes score through the evaluator, no mate distance is kept.
    if ply == 0 || game.is_checkmate() {
        return evaluate(game, weights);
    }

    let legal_moves = game.legal_moves();

    // Stalemate. Scored like any quiet node instead of returning the sentinel.
    if legal_moves.is_empty() {
        return evaluate(game, weights);
    }

    // Move Ordering
    // Sort legal moves with estimated best move first.
    let ordered_legal_moves = order_all_moves(game, &legal_moves);
    debug_assert_eq!(legal_moves.len(), ordered_legal_moves.len());

    let mut best_score = Cp::MIN;

    for legal_move in ordered_legal_moves {
        game.apply(legal_move);
        let move_score = -negamax(game, ply - 1, -beta, -alpha, weights, stats);
        game.revert(legal_move);

        best_score = cmp::max(best_score, move_score);
        alpha = cmp::max(alpha, best_score);

        // Opponent already has a better alternative elsewhere in the tree.
        if alpha >= beta {
            stats.cutoffs += 1;
            break;
        }
    }

    best_score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    #[test]
    fn depth_zero_is_evaluation() {
        let mut game = Game::start_position();
        let weights = Weights::default();
        let mut stats = SearchStats::default();
        let score = negamax(&mut game, 0, Cp::MIN, Cp::MAX, &weights, &mut stats);

        assert_eq!(score, evaluate(&mut game, &weights));
        assert_eq!(stats.nodes, 1);
        assert_eq!(stats.cutoffs, 0);
    }

    #[test]
    fn stalemate_is_not_sentinel() {
        // Black to move has no legal moves and is not in check.
        let mut game = Game::parse_fen("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(game.legal_moves().is_empty());
        assert!(!game.is_checkmate());

        let weights = Weights::default();
        let mut stats = SearchStats::default();
        let score = negamax(&mut game, 3, Cp::MIN, Cp::MAX, &weights, &mut stats);
        assert_eq!(score, evaluate(&mut game, &weights));
        assert_ne!(score, Cp::MIN);
    }

    #[test]
    fn hanging_queen_taken() {
        // White can capture an undefended queen.
        let mut game = Game::parse_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
        let before = game.clone();
        let weights = Weights {
            use_mobility: false,
            ..Weights::default()
        };
        let mut stats = SearchStats::default();
        let score = negamax(&mut game, 2, Cp::MIN, Cp::MAX, &weights, &mut stats);

        // After Rxd5 white is a rook up, counted twice.
        assert_eq!(score, Cp(500 * 2));
        assert_eq!(game, before);
    }
}
