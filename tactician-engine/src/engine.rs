//! Engine struct acts as a simplified API for the various parts of the Tactician engine.
//!
//! A decision is made in stages. Legal root moves are first offered to the tactical
//! shortcuts. If none applies, every root move is searched to a depth picked from the
//! material on the board and the time budget, and the best scoring move wins. When
//! search cannot tell the root moves apart, the engine falls back to the best
//! capture, then to a pawn move that cannot be taken back, then to any move at random.

use std::fmt::{self, Display};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::coretypes::{Cp, Move, Piece, PlyKind};
use crate::error::{self, ErrorKind};
use crate::evaluation::{evaluate, Weights};
use crate::game::{Game, GameState};
use crate::moveorder::{creates_target, score_all_moves};
use crate::movelist::MoveList;
use crate::search::{search_root, DepthSchedule};
use crate::tactics::{try_shortcut, Tactic};
use crate::timeman::Mode;
use crate::uci::UciInfo;

/// Tunable parameters of the engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Config {
    /// Seed of the random number generator, from entropy when None.
    pub seed: Option<u64>,
    pub depth: DepthSchedule,
    /// Safe checks are only played while more pieces than this are on the board.
    pub safe_check_min_pieces: u32,
    pub weights: Weights,
    /// Below this much allotted time, the endgame depth is not used.
    pub low_time: Duration,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            depth: DepthSchedule::default(),
            safe_check_min_pieces: 12,
            weights: Weights::default(),
            low_time: Duration::from_millis(50),
            debug: false,
        }
    }
}

/// EngineBuilder allows for parameters of an Engine to be set and built once.
///
/// Default values:
///
/// * `game`: Starting chess position
/// * `seed`: None
/// * `base_depth`: 3, `endgame_depth`: 5, `endgame_pieces`: 12
/// * `safe_check_min_pieces`: 12
/// * `material_weight`: 2, `mobility_weight`: 1, `mobility`: true
/// * `low_time`: 50 milliseconds
/// * `debug`: false
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EngineBuilder {
    game: Game,
    config: Config,
}

impl EngineBuilder {
    /// Create a new default EngineBuilder.
    pub fn new() -> Self {
        Self {
            game: Game::start_position(),
            config: Config::default(),
        }
    }

    /// Create and return a new Engine.
    pub fn build(&self) -> Engine {
        Engine {
            game: self.game.clone(),
            config: self.config,
            rng: new_rng(self.config.seed),
        }
    }

    /// Set the Engine's initial game state.
    pub fn game(mut self, game: Game) -> Self {
        self.game = game;
        self
    }

    /// Replace every parameter at once.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Seed the engine's random choices, making decisions repeatable.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn base_depth(mut self, depth: PlyKind) -> Self {
        self.config.depth.base = depth;
        self
    }

    pub fn endgame_depth(mut self, depth: PlyKind) -> Self {
        self.config.depth.endgame = depth;
        self
    }

    pub fn endgame_pieces(mut self, pieces: u32) -> Self {
        self.config.depth.endgame_pieces = pieces;
        self
    }

    pub fn safe_check_min_pieces(mut self, pieces: u32) -> Self {
        self.config.safe_check_min_pieces = pieces;
        self
    }

    pub fn material_weight(mut self, weight: i32) -> Self {
        self.config.weights.material = weight;
        self
    }

    pub fn mobility_weight(mut self, weight: i32) -> Self {
        self.config.weights.mobility = weight;
        self
    }

    /// Set whether evaluation counts mobility.
    pub fn mobility(mut self, use_mobility: bool) -> Self {
        self.config.weights.use_mobility = use_mobility;
        self
    }

    pub fn low_time(mut self, low_time: Duration) -> Self {
        self.config.low_time = low_time;
        self
    }

    /// Set whether the engine begins in debug mode.
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// How a decision was reached.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Reason {
    /// The move checkmates.
    Checkmate,
    /// The move promotes to the most valuable piece available.
    Promotion,
    /// The move checks and cannot be captured back.
    SafeCheck,
    /// The move scored highest in search.
    Search,
    /// Search was undecided, the move wins material outright.
    Capture,
    /// Search was undecided, a random pawn move that cannot be captured back.
    PawnPush,
    /// Search was undecided, a random legal move.
    Random,
}

impl From<Tactic> for Reason {
    fn from(tactic: Tactic) -> Self {
        match tactic {
            Tactic::Checkmate => Reason::Checkmate,
            Tactic::Promotion => Reason::Promotion,
            Tactic::SafeCheck => Reason::SafeCheck,
        }
    }
}

impl Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Reason::Checkmate => "checkmate",
            Reason::Promotion => "promotion",
            Reason::SafeCheck => "safe check",
            Reason::Search => "search",
            Reason::Capture => "capture",
            Reason::PawnPush => "pawn push",
            Reason::Random => "random",
        })
    }
}

/// The move chosen for a position, with how it was chosen.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Decision {
    pub move_: Move,
    /// Score relative to the player making the move.
    pub score: Cp,
    pub reason: Reason,
    /// Depth searched, 0 when no search was run.
    pub depth: PlyKind,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl From<&Decision> for UciInfo {
    fn from(decision: &Decision) -> Self {
        UciInfo {
            depth: decision.depth,
            score: decision.score,
            nodes: decision.nodes,
            time: decision.elapsed,
        }
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} score {} by {} depth {} nodes {} in {}ms",
            self.move_,
            self.score,
            self.reason,
            self.depth,
            self.nodes,
            self.elapsed.as_millis()
        )
    }
}

fn new_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Engine holds the game being played and the parameters used for every decision.
///
/// If a new game is going to be started, the engine needs to be told so.
#[derive(Debug, Clone)]
pub struct Engine {
    game: Game,
    config: Config,
    rng: StdRng,
}

impl Engine {
    pub fn new() -> Self {
        EngineBuilder::new().build()
    }

    /// Returns reference to current game of engine.
    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns current debug flag of engine.
    pub fn debug(&self) -> bool {
        self.config.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    /// Replace the parameters. The random number generator is reseeded if the seed changed.
    pub fn set_config(&mut self, config: Config) {
        if config.seed != self.config.seed {
            self.rng = new_rng(config.seed);
        }
        self.config = config;
    }

    /// Set the game or position for evaluation.
    pub fn set_game<T: Into<Game>>(&mut self, game: T) {
        self.game = game.into();
    }

    /// Reset the game to the start position.
    /// A seeded engine replays the same random choices as it did from the start.
    pub fn new_game(&mut self) {
        self.game = Game::start_position();
        self.rng = new_rng(self.config.seed);
    }

    /// Choose a move for the engine's current game.
    pub fn decide(&mut self, mode: Mode) -> error::Result<Decision> {
        choose_move(&self.config, &mut self.rng, &mut self.game, mode)
    }

    /// Choose a move for the player to move in `game`.
    /// The game is returned to its original state.
    ///
    /// Fails with `NoLegalMoves` when the game is already over.
    pub fn choose_move<G: GameState>(&mut self, game: &mut G, mode: Mode) -> error::Result<Decision> {
        choose_move(&self.config, &mut self.rng, game, mode)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn choose_move<G: GameState>(
    config: &Config,
    rng: &mut StdRng,
    game: &mut G,
    mode: Mode,
) -> error::Result<Decision> {
    let instant = Instant::now();
    let legal_moves = game.legal_moves();
    if legal_moves.is_empty() {
        return Err(ErrorKind::NoLegalMoves.into());
    }

    if let Some(shortcut) = try_shortcut(game, &legal_moves, config.safe_check_min_pieces, rng) {
        debug!(move_ = %shortcut.move_, tactic = %shortcut.tactic, "shortcut");
        game.apply(shortcut.move_);
        let score = -evaluate(game, &config.weights);
        game.revert(shortcut.move_);

        return Ok(log_decision(Decision {
            move_: shortcut.move_,
            score,
            reason: shortcut.tactic.into(),
            depth: 0,
            nodes: 0,
            elapsed: instant.elapsed(),
        }));
    }

    let depth = mode.choose_depth(game, &config.depth, config.low_time);
    debug!(depth, pieces = game.total_pieces(), "search depth");

    let result = search_root(game, &legal_moves, depth, &config.weights)
        .ok_or(ErrorKind::NoLegalMoves)?;

    let (move_, reason) = match result.uniform && legal_moves.len() > 1 {
        true => fallback(game, &legal_moves, rng),
        false => (result.best_move, Reason::Search),
    };

    Ok(log_decision(Decision {
        move_,
        score: result.score,
        reason,
        depth,
        nodes: result.stats.nodes,
        elapsed: instant.elapsed(),
    }))
}

/// Pick a move when search scored every root move the same.
fn fallback<G: GameState>(game: &mut G, legal_moves: &[Move], rng: &mut StdRng) -> (Move, Reason) {
    let scored = score_all_moves(game, legal_moves);
    if let Some(&(move_, score)) = scored.first() {
        if score > Cp::ZERO {
            return (move_, Reason::Capture);
        }
    }

    let pawn_moves: MoveList = legal_moves
        .iter()
        .copied()
        .filter(|&move_| {
            matches!(game.piece_at(move_.get_source()), Some((Piece::Pawn, _)))
                && !creates_target(game, move_)
        })
        .collect();
    if let Some(&move_) = pawn_moves.choose(rng) {
        return (move_, Reason::PawnPush);
    }

    // legal_moves is never empty here.
    let move_ = *legal_moves.choose(rng).unwrap_or(&legal_moves[0]);
    (move_, Reason::Random)
}

fn log_decision(decision: Decision) -> Decision {
    info!(
        move_ = %decision.move_,
        score = %decision.score,
        reason = %decision.reason,
        depth = decision.depth,
        nodes = decision.nodes,
        elapsed_ms = decision.elapsed.as_millis() as u64,
        "decision"
    );
    decision
}
