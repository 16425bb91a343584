//! Depth selection from the material left on the board.

use std::cmp;

use crate::coretypes::{PlyKind, MAX_DEPTH};
use crate::game::GameState;

/// Search depths for the middlegame and the endgame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DepthSchedule {
    /// Depth searched while the board is full.
    pub base: PlyKind,
    /// Depth searched once the piece count falls below `endgame_pieces`.
    pub endgame: PlyKind,
    pub endgame_pieces: u32,
}

impl Default for DepthSchedule {
    fn default() -> Self {
        Self {
            base: 3,
            endgame: 5,
            endgame_pieces: 12,
        }
    }
}

impl DepthSchedule {
    /// Depth for a board holding `total_pieces` pieces of both colors, kings included.
    ///
    /// Never shallower with fewer pieces, and always within `1..=MAX_DEPTH`.
    pub fn for_pieces(&self, total_pieces: u32) -> PlyKind {
        let base = self.base.clamp(1, MAX_DEPTH);
        if total_pieces < self.endgame_pieces {
            cmp::max(base, self.endgame.clamp(1, MAX_DEPTH))
        } else {
            base
        }
    }

    /// Depth for the current position.
    pub fn choose_depth<G: GameState>(&self, game: &G) -> PlyKind {
        self.for_pieces(game.total_pieces())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    #[test]
    fn endgame_deepens() {
        let schedule = DepthSchedule::default();
        assert_eq!(schedule.for_pieces(32), 3);
        assert_eq!(schedule.for_pieces(12), 3);
        assert_eq!(schedule.for_pieces(11), 5);
        assert_eq!(schedule.for_pieces(2), 5);

        assert_eq!(schedule.choose_depth(&Game::start_position()), 3);
        let endgame = Game::parse_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        assert_eq!(schedule.choose_depth(&endgame), 5);
    }

    #[test]
    fn monotone_for_any_schedule() {
        let schedules = [
            DepthSchedule::default(),
            DepthSchedule {
                base: 4,
                endgame: 2,
                endgame_pieces: 20,
            },
            DepthSchedule {
                base: 0,
                endgame: 40,
                endgame_pieces: 32,
            },
        ];

        for schedule in schedules {
            for pieces in 2..32 {
                let depth = schedule.for_pieces(pieces);
                assert!(depth >= schedule.for_pieces(pieces + 1));
                assert!((1..=MAX_DEPTH).contains(&depth));
            }
        }
    }
}
