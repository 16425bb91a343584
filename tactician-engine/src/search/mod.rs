//! Search functions.

mod depth;
mod minimax;
mod negamax;

pub use depth::*;
pub use minimax::*;
pub use negamax::*;

use tracing::trace;

use crate::coretypes::{Cp, Move, PlyKind};
use crate::evaluation::Weights;
use crate::game::GameState;
use crate::moveorder::order_all_moves;

/// Counters gathered while searching.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct SearchStats {
    /// Total number of nodes visited, the root's children included.
    pub nodes: u64,
    /// Number of nodes where a beta-cutoff was performed.
    pub cutoffs: u64,
}

/// The results found from running a search on some root position.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SearchResult {
    /// The best move to make for a position discovered from search.
    pub best_move: Move,
    /// The centipawn score of making the best move, relative to the root player.
    pub score: Cp,
    /// Depth in plies that was searched, counting the root move.
    pub depth: PlyKind,
    pub stats: SearchStats,
    /// Flag that indicates every root move received the same score,
    /// so `best_move` is only the first move searched.
    pub uniform: bool,
}

/// Search every root move to `ply` plies and keep the highest scoring one.
///
/// Root moves are ordered first and each is searched with a full window.
/// The first move to reach the best score is kept, later moves must score strictly higher.
/// Returns None if `moves` is empty.
pub fn search_root<G: GameState>(
    game: &mut G,
    moves: &[Move],
    ply: PlyKind,
    weights: &Weights,
) -> Option<SearchResult> {
    debug_assert_ne!(ply, 0);
    let mut stats = SearchStats::default();

    let mut best: Option<(Move, Cp)> = None;
    let mut uniform = true;

    for root_move in order_all_moves(game, moves) {
        game.apply(root_move);
        let score = -negamax(
            game,
            ply.saturating_sub(1),
            Cp::MIN,
            Cp::MAX,
            weights,
            &mut stats,
        );
        game.revert(root_move);
        trace!(%root_move, %score, "root move searched");

        match best {
            None => best = Some((root_move, score)),
            Some((_, best_score)) => {
                if score != best_score {
                    uniform = false;
                }
                if score > best_score {
                    best = Some((root_move, score));
                }
            }
        }
    }

    best.map(|(best_move, score)| SearchResult {
        best_move,
        score,
        depth: ply,
        stats,
        uniform,
    })
}
