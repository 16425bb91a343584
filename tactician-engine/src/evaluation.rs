//! Static Evaluation Functions.
//!
//! An evaluation function may have two types of calls: relative or absolute.
//!
//! An absolute score treats White as a maxing player and Black as a minning player,
//! so a centipawn score of +10 is winning for White, while -10 is winning for Black.
//! A relative score treats the player to move as the maxing player, so if it is
//! Black to move, +10 is winning for Black.
//!
//! Search only ever uses relative scores.

use crate::coretypes::{Centipawns, Color, Cp, CpKind, Sign, ALL_PIECES};
use crate::game::GameState;

/// Weights of the evaluation terms.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Weights {
    pub material: CpKind,
    pub mobility: CpKind,
    /// When false, the mobility term is never computed.
    pub use_mobility: bool,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            material: 2,
            mobility: 1,
            use_mobility: true,
        }
    }
}

/// Primary evaluate function for engine, with return relative to player to move.
///
/// The game is borrowed mutably only to count the opponent's replies through a
/// skipped turn, which is undone before returning.
pub fn evaluate<G: GameState>(game: &mut G, weights: &Weights) -> Cp {
    let cp_material = material(game) * game.side_to_move().sign();
    let mut cp_total = cp_material * weights.material;

    if weights.use_mobility {
        if let Some(cp_mobility) = mobility(game) {
            cp_total += cp_mobility * weights.mobility;
        }
    }

    cp_total
}

/// Returns relative strength difference of pieces in position.
/// Is equivalent of piece_centipawn(White) - pieces_centipawn(Black).
/// A positive value is an advantage for white, 0 is even, negative is advantage for black.
pub fn material<G: GameState>(game: &G) -> Cp {
    ALL_PIECES
        .iter()
        .map(|&piece| {
            let white = game.piece_count(Color::White, piece) as CpKind;
            let black = game.piece_count(Color::Black, piece) as CpKind;
            piece.centipawns() * (white - black)
        })
        .fold(Cp::default(), |acc, value| acc + value)
}

/// Difference between the number of moves the player to move has and the number
/// the opponent would have if it were their turn. Relative to the player to move.
///
/// Returns None when the turn cannot be skipped, such as when in check.
pub fn mobility<G: GameState>(game: &mut G) -> Option<Cp> {
    let ours = game.legal_move_count() as CpKind;

    if !game.skip_turn() {
        return None;
    }
    let theirs = game.legal_move_count() as CpKind;
    game.undo_skip_turn();

    Some(Cp(ours - theirs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    #[test]
    fn start_position_is_even() {
        let mut game = Game::start_position();
        assert_eq!(material(&game), Cp(0));
        assert_eq!(mobility(&mut game), Some(Cp(0)));
        assert_eq!(evaluate(&mut game, &Weights::default()), Cp(0));
    }

    #[test]
    fn relative_to_player_to_move() {
        // White is up a rook, with no mobility term the score flips with the mover.
        let weights = Weights {
            use_mobility: false,
            ..Weights::default()
        };
        let mut white = Game::parse_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let mut black = Game::parse_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();

        assert_eq!(material(&white), Cp(500));
        assert_eq!(material(&black), Cp(500));
        assert_eq!(evaluate(&mut white, &weights), Cp(1000));
        assert_eq!(evaluate(&mut black, &weights), Cp(-1000));
    }

    #[test]
    fn mobility_counts_both_sides() {
        // Black's lone king in the corner has 3 moves.
        let mut game = Game::parse_fen("k7/8/8/8/8/8/8/4K2R w - - 0 1").unwrap();
        let before = game.clone();
        let ours = game.legal_move_count() as CpKind;

        assert_eq!(mobility(&mut game), Some(Cp(ours - 3)));
        assert_eq!(game, before);

        let weights = Weights::default();
        let expected = Cp(500) * weights.material + Cp(ours - 3) * weights.mobility;
        assert_eq!(evaluate(&mut game, &weights), expected);
        assert_eq!(game, before);
    }

    #[test]
    fn mobility_skipped_when_in_check() {
        let mut game = Game::parse_fen("4k3/8/8/8/8/8/8/R3K2r w - - 0 1").unwrap();
        assert_eq!(mobility(&mut game), None);
        // Material only: rooks cancel out.
        assert_eq!(evaluate(&mut game, &Weights::default()), Cp(0));
    }
}
