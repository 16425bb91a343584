//! Tactician Engine, a small-budget chess decision engine.
//!
//! Given a position and a time budget, the engine chooses one legal move using
//! tactical shortcuts, negamax search with alpha-beta pruning, and a material plus
//! mobility evaluation. Chess rules come from the `chess` crate through [`GameState`].
//!
//! ```
//! use tactician_engine::{EngineBuilder, Game, Mode};
//!
//! let mut engine = EngineBuilder::new().seed(7).build();
//! let mut game = Game::start_position();
//! let decision = engine.choose_move(&mut game, Mode::depth(2, None)).unwrap();
//! assert_eq!(game, Game::start_position());
//! println!("{decision}");
//! ```

pub mod coretypes;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod movelist;
pub mod moveorder;
pub mod search;
pub mod tactics;
pub mod timeman;
pub mod uci;

pub use engine::{Config, Decision, Engine, EngineBuilder, Reason};
pub use game::{Game, GameState};
pub use timeman::Mode;
