//! Time Management
//!
//! Search is never interrupted. A time budget only decides how deep a decision is
//! allowed to look before it starts.

use std::time::Duration;

use crate::coretypes::{Color, PlyKind, MAX_DEPTH};
use crate::error::{self, ErrorKind};
use crate::game::GameState;
use crate::search::DepthSchedule;
use crate::uci::SearchControls;

const TIME_RATIO: u32 = 15; // Use 1/15th of remaining time per timed move.
const OVERHEAD: Duration = Duration::from_millis(10); // Expected amount of time loss in ms.

/// There are 4 supported search modes currently, Infinite, Standard, Depth, and MoveTime.
/// Infinite mode: no limit given, depth follows the material on the board.
/// Standard mode: standard chess time controls with time per side.
/// Depth mode: search to a given depth.
/// MoveTime mode: search for a specified time per move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Mode {
    Infinite,           // No limits. Requires `infinite`, or nothing at all from the UCI layer.
    Standard(Standard), // Each player has a time limit. Requires `wtime`, `btime`.
    Depth(Depth),       // Search to a given depth. Requires `depth`.
    MoveTime(MoveTime), // Search for a specified amount of time. Requires `movetime`.
}

impl Mode {
    /// Returns a new Depth Mode.
    pub fn depth(ply: PlyKind, movetime: Option<Duration>) -> Self {
        Self::Depth(Depth {
            depth: ply,
            movetime,
        })
    }

    /// Returns a new MoveTime mode.
    pub fn movetime(movetime: Duration, ply: Option<PlyKind>) -> Self {
        Self::MoveTime(MoveTime {
            movetime,
            depth: ply,
        })
    }

    pub fn standard(
        wtime: Duration,
        btime: Duration,
        winc: Option<Duration>,
        binc: Option<Duration>,
        moves_to_go: Option<u32>,
        ply: Option<PlyKind>,
    ) -> Self {
        Self::Standard(Standard {
            wtime,
            btime,
            winc,
            binc,
            moves_to_go,
            depth: ply,
        })
    }

    /// Depth explicitly requested by the mode, if any.
    pub fn fixed_depth(&self) -> Option<PlyKind> {
        match self {
            Mode::Infinite => None,
            Mode::Depth(depth_mode) => Some(depth_mode.depth),
            Mode::MoveTime(movetime_mode) => movetime_mode.depth,
            Mode::Standard(standard_mode) => standard_mode.depth,
        }
    }

    /// Time the player to move may spend on this decision, if the mode is timed.
    pub fn allotted_time(&self, player: Color) -> Option<Duration> {
        match self {
            Mode::Infinite => None,
            Mode::Depth(depth_mode) => depth_mode.movetime,
            Mode::MoveTime(movetime_mode) => Some(movetime_mode.movetime),
            Mode::Standard(standard_mode) => Some(standard_mode.player_movetime(player)),
        }
        .map(|movetime| movetime.saturating_sub(OVERHEAD))
    }

    /// Depth to search the current position to under this mode.
    ///
    /// A fixed depth always wins. Otherwise the schedule decides, except that the
    /// endgame deepening is skipped once the allotted time drops below `low_time`.
    pub fn choose_depth<G: GameState>(
        &self,
        game: &G,
        schedule: &DepthSchedule,
        low_time: Duration,
    ) -> PlyKind {
        if let Some(depth) = self.fixed_depth() {
            return depth.clamp(1, MAX_DEPTH);
        }

        match self.allotted_time(game.side_to_move()) {
            Some(allotted) if allotted < low_time => schedule.base.clamp(1, MAX_DEPTH),
            _ => schedule.choose_depth(game),
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::Infinite
    }
}

impl TryFrom<SearchControls> for Mode {
    type Error = error::Error;
    fn try_from(controls: SearchControls) -> error::Result<Self> {
        match controls {
            SearchControls { infinite: true, .. } => Ok(Mode::Infinite),
            SearchControls {
                wtime: Some(wtime),
                btime: Some(btime),
                ..
            } => Ok(Mode::standard(
                wtime,
                btime,
                controls.winc,
                controls.binc,
                controls.moves_to_go,
                controls.depth,
            )),
            SearchControls {
                move_time: Some(move_time),
                ..
            } => Ok(Mode::movetime(move_time, controls.depth)),
            SearchControls {
                depth: Some(depth), ..
            } => Ok(Mode::depth(depth, controls.move_time)),
            _ => Err(ErrorKind::ModeNotSatisfied.into()),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Depth {
    pub depth: PlyKind,
    movetime: Option<Duration>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MoveTime {
    movetime: Duration,
    depth: Option<PlyKind>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Standard {
    wtime: Duration,
    btime: Duration,
    winc: Option<Duration>,
    binc: Option<Duration>,
    moves_to_go: Option<u32>,
    depth: Option<PlyKind>,
}

impl Standard {
    /// Return the target movetime for a player.
    /// A share of the remaining clock, plus most of the increment.
    fn player_movetime(&self, player: Color) -> Duration {
        let (player_time, player_inc) = match player {
            Color::White => (self.wtime, self.winc),
            Color::Black => (self.btime, self.binc),
        };
        let ratio = match self.moves_to_go {
            Some(moves_to_go) if moves_to_go > 0 => moves_to_go.min(TIME_RATIO),
            _ => TIME_RATIO,
        };
        let increment = player_inc.map_or(Duration::ZERO, |inc| inc * 3 / 4);

        player_time / ratio + increment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    #[test]
    fn standard() {
        let controls = SearchControls {
            wtime: Some(Duration::from_millis(5000)),
            btime: Some(Duration::from_millis(5000)),
            ..Default::default()
        };
        let mode = Mode::try_from(controls);

        assert!(mode.is_ok());
        let mode = mode.unwrap();
        assert!(matches!(mode, Mode::Standard(_)));
        assert_eq!(
            mode.allotted_time(Color::White),
            Some(Duration::from_millis(5000) / 15 - Duration::from_millis(10))
        );
    }

    #[test]
    fn increment_and_moves_to_go() {
        let mode = Mode::standard(
            Duration::from_millis(1000),
            Duration::from_millis(3000),
            Some(Duration::from_millis(100)),
            Some(Duration::from_millis(400)),
            Some(10),
            None,
        );
        assert_eq!(
            mode.allotted_time(Color::Black),
            Some(Duration::from_millis(300 + 300 - 10))
        );
    }

    #[test]
    fn unsatisfied_controls() {
        let error = Mode::try_from(SearchControls::default()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ModeNotSatisfied);

        let controls = SearchControls {
            depth: Some(4),
            ..Default::default()
        };
        assert_eq!(Mode::try_from(controls).unwrap(), Mode::depth(4, None));
    }

    #[test]
    fn depth_selection() {
        let schedule = DepthSchedule::default();
        let low_time = Duration::from_millis(50);
        let endgame = Game::parse_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let start = Game::start_position();

        assert_eq!(Mode::Infinite.choose_depth(&start, &schedule, low_time), 3);
        assert_eq!(Mode::Infinite.choose_depth(&endgame, &schedule, low_time), 5);
        assert_eq!(Mode::depth(2, None).choose_depth(&endgame, &schedule, low_time), 2);
        assert_eq!(Mode::depth(0, None).choose_depth(&endgame, &schedule, low_time), 1);

        let hurried = Mode::movetime(Duration::from_millis(40), None);
        assert_eq!(hurried.choose_depth(&endgame, &schedule, low_time), 3);
        let relaxed = Mode::movetime(Duration::from_secs(2), None);
        assert_eq!(relaxed.choose_depth(&endgame, &schedule, low_time), 5);
    }
}
