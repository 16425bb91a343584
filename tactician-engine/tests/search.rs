//! Search
//!
//! Tests to ensure alpha-beta pruning never changes a score compared to unpruned
//! search, and that every search leaves the game exactly as it found it.

use tactician_engine::coretypes::{Color, Cp, Move, Piece, PlyKind, Square};
use tactician_engine::error::ErrorKind;
use tactician_engine::evaluation::{evaluate, Weights};
use tactician_engine::movelist::MoveList;
use tactician_engine::moveorder::order_all_moves;
use tactician_engine::search::{minimax, negamax, search_root, SearchStats};
use tactician_engine::tactics::try_shortcut;
use tactician_engine::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

const POSITIONS: [&str; 6] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r1bqk2r/2p2pp1/p1pp3p/2b5/2B1P1n1/2N2Q2/PPP2PPP/R1B1R1K1 w kq - 2 11",
    "7k/6p1/3p3p/p3p3/q3Pp1P/3P1P2/2R5/1rRK2Q1 b - - 8 44",
    "5K2/2q1P3/5kp1/7p/8/6PP/8/8 w - - 0 58",
    "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1",
    "k7/2Q5/1K6/8/8/8/8/8 b - - 0 1",
];

/// A game that checks every apply is undone by a revert of the same move,
/// and every skipped turn by an undo, in strict reverse order.
#[derive(Debug)]
struct Audited {
    game: Game,
    applied: Vec<Option<Move>>,
    applies: u64,
}

impl Audited {
    fn new(game: Game) -> Self {
        Self {
            game,
            applied: Vec::new(),
            applies: 0,
        }
    }
}

impl GameState for Audited {
    fn legal_moves(&self) -> MoveList {
        self.game.legal_moves()
    }
    fn apply(&mut self, move_: Move) {
        self.applies += 1;
        self.applied.push(Some(move_));
        self.game.apply(move_);
    }
    fn revert(&mut self, move_: Move) {
        assert_eq!(self.applied.pop(), Some(Some(move_)));
        self.game.revert(move_);
    }
    fn skip_turn(&mut self) -> bool {
        let skipped = self.game.skip_turn();
        if skipped {
            self.applied.push(None);
        }
        skipped
    }
    fn undo_skip_turn(&mut self) {
        assert_eq!(self.applied.pop(), Some(None));
        self.game.undo_skip_turn();
    }
    fn is_checkmate(&self) -> bool {
        self.game.is_checkmate()
    }
    fn is_in_check(&self) -> bool {
        self.game.is_in_check()
    }
    fn side_to_move(&self) -> Color {
        self.game.side_to_move()
    }
    fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        self.game.piece_at(square)
    }
    fn piece_count(&self, color: Color, piece: Piece) -> u32 {
        self.game.piece_count(color, piece)
    }
}

fn depth_for(fen: &str) -> PlyKind {
    // Keep the unpruned search of the crowded middlegame affordable.
    match fen {
        f if f.starts_with("r1bqk2r") => 2,
        _ => 3,
    }
}

#[test]
fn pruning_matches_minimax() {
    let weights = Weights::default();

    for fen in POSITIONS {
        let mut game = Game::parse_fen(fen).unwrap();
        for ply in 0..=depth_for(fen) {
            let mut pruned = SearchStats::default();
            let mut unpruned = SearchStats::default();
            let ab_score = negamax(&mut game, ply, Cp::MIN, Cp::MAX, &weights, &mut pruned);
            let mm_score = minimax(&mut game, ply, &weights, &mut unpruned);

            assert_eq!(ab_score, mm_score, "{fen} at ply {ply}");
            assert!(pruned.nodes <= unpruned.nodes);
            assert_eq!(unpruned.cutoffs, 0);
        }
    }
}

#[test]
fn pruning_matches_minimax_without_mobility() {
    let weights = Weights {
        use_mobility: false,
        ..Weights::default()
    };

    for fen in POSITIONS {
        let mut game = Game::parse_fen(fen).unwrap();
        let ply = depth_for(fen);
        let mut pruned = SearchStats::default();
        let mut unpruned = SearchStats::default();

        assert_eq!(
            negamax(&mut game, ply, Cp::MIN, Cp::MAX, &weights, &mut pruned),
            minimax(&mut game, ply, &weights, &mut unpruned),
            "{fen}"
        );
    }
}

#[test]
fn pruning_cuts_nodes() {
    let weights = Weights::default();
    let mut game = Game::start_position();
    let mut pruned = SearchStats::default();
    let mut unpruned = SearchStats::default();

    negamax(&mut game, 3, Cp::MIN, Cp::MAX, &weights, &mut pruned);
    minimax(&mut game, 3, &weights, &mut unpruned);

    assert!(pruned.cutoffs > 0);
    assert!(pruned.nodes < unpruned.nodes);
}

#[test]
fn search_restores_position() {
    let weights = Weights::default();

    for fen in POSITIONS {
        let game = Game::parse_fen(fen).unwrap();
        let mut audited = Audited::new(game.clone());
        let ply = depth_for(fen);

        let mut stats = SearchStats::default();
        negamax(&mut audited, ply, Cp::MIN, Cp::MAX, &weights, &mut stats);
        minimax(&mut audited, ply.min(2), &weights, &mut stats);
        evaluate(&mut audited, &weights);
        let legal_moves = audited.legal_moves();
        order_all_moves(&mut audited, &legal_moves);
        let mut rng = StdRng::seed_from_u64(0);
        try_shortcut(&mut audited, &legal_moves, 0, &mut rng);
        search_root(&mut audited, &legal_moves, ply.min(2), &weights);

        assert!(audited.applied.is_empty());
        assert!(audited.applies > 0 || legal_moves.is_empty());
        assert_eq!(audited.game, game, "{fen}");
        assert_eq!(audited.legal_moves(), game.legal_moves());
    }
}

#[test]
fn engine_restores_position() {
    let mut engine = EngineBuilder::new().seed(17).build();

    for fen in POSITIONS {
        let game = Game::parse_fen(fen).unwrap();
        let mut audited = Audited::new(game.clone());
        let mode = Mode::depth(depth_for(fen), None);

        let decision = engine.choose_move(&mut audited, mode);
        if game.legal_moves().is_empty() {
            assert_eq!(decision.unwrap_err().kind(), ErrorKind::NoLegalMoves);
        } else {
            let decision = decision.unwrap();
            assert!(game.legal_moves().contains(&decision.move_), "{fen}");
        }
        assert!(audited.applied.is_empty());
        assert_eq!(audited.game, game, "{fen}");
    }
}
