//! Shortcuts
//!
//! Tests to ensure the engine plays immediate mates and promotions without searching,
//! whatever the seed and material situation.

use tactician_engine::coretypes::{squares::*, Move, Piece::*};
use tactician_engine::tactics::gives_checkmate;
use tactician_engine::*;

#[inline(always)]
fn decide(fen_str: &str, seed: u64) -> (Game, Decision) {
    let mut game = Game::parse_fen(fen_str).unwrap();
    let before = game.clone();
    let mut engine = EngineBuilder::new().seed(seed).build();
    let decision = engine.choose_move(&mut game, Mode::Infinite).unwrap();
    assert_eq!(game, before);
    (game, decision)
}

#[test]
fn mate_in_1_queen_take_pawn() {
    let pos = "r1bqk2r/2p2pp1/p1pp3p/2b5/2B1P1n1/2N2Q2/PPP2PPP/R1B1R1K1 w kq - 2 11";
    for seed in 0..4 {
        let (_, decision) = decide(pos, seed);
        assert_eq!(decision.move_, Move::new(F3, F7, None));
        assert_eq!(decision.reason, Reason::Checkmate);
    }
}

#[test]
fn mate_in_1_back_rank() {
    let pos = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1";
    let (_, decision) = decide(pos, 1);
    assert_eq!(decision.move_, Move::new(A1, A8, None));
    assert_eq!(decision.reason, Reason::Checkmate);
}

#[test]
fn mate_preferred_over_winning_queen() {
    // Black can take a whole queen with the bishop, or mate with the rook.
    let pos = "1b2r1k1/Q7/8/8/8/8/5PPP/6K1 b - - 0 1";
    let (mut game, decision) = decide(pos, 9);
    assert_eq!(decision.move_, Move::new(E8, E1, None));
    assert_eq!(decision.reason, Reason::Checkmate);
    assert!(gives_checkmate(&mut game, decision.move_));
}

#[test]
fn mate_outranks_promotion() {
    // The rook move mates, and so do queen and rook promotions.
    let pos = "6k1/1P3ppp/8/8/8/8/8/R5K1 w - - 0 1";
    let (mut game, decision) = decide(pos, 0);
    assert_eq!(decision.reason, Reason::Checkmate);
    assert!(gives_checkmate(&mut game, decision.move_));
}

#[test]
fn promote_to_queen() {
    let pos = "8/1P6/8/8/8/k7/8/4K3 w - - 0 1";
    let (_, decision) = decide(pos, 0);
    assert_eq!(decision.move_, Move::new(B7, B8, Some(Queen)));
    assert_eq!(decision.reason, Reason::Promotion);
}

#[test]
fn black_promotes_to_queen() {
    let pos = "4k3/8/8/8/8/8/p7/7K b - - 0 1";
    let (_, decision) = decide(pos, 3);
    assert_eq!(decision.move_, Move::new(A2, A1, Some(Queen)));
    assert_eq!(decision.reason, Reason::Promotion);
}

#[test]
fn capture_promotion_still_queen() {
    // Promotions straight ahead and by capture, queen either way.
    let pos = "1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1";
    let (_, decision) = decide(pos, 0);
    assert_eq!(decision.reason, Reason::Promotion);
    assert_eq!(decision.move_.get_promotion(), Some(Queen));
    assert_eq!(decision.move_.get_source(), A7);
}

#[test]
fn safe_check_in_crowded_position() {
    // Bb5+ cannot be answered by a capture, and the board is full.
    let pos = "rnbqkbnr/ppp2ppp/8/3pp3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 3";
    let (mut game, decision) = decide(pos, 0);
    assert_eq!(decision.reason, Reason::SafeCheck);
    game.apply(decision.move_);
    assert!(game.is_in_check());
    game.revert(decision.move_);
}
