//! Main UCI interface to the Tactician engine.

use std::io;
use std::str::FromStr;

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use tactician_engine::error::ErrorKind;
use tactician_engine::movelist::display;
use tactician_engine::uci::{
    self, RawOption, UciCommand, UciInfo, UciOption, UciOptions, UciResponse,
};
use tactician_engine::{Config, Engine, EngineBuilder, Game, Mode};

const NAME: &str = "Tactician 0.1.0";
const AUTHOR: &str = "Tactician developers";

#[derive(Parser)]
#[command(name = "tactician")]
#[command(version, about = "UCI chess bot built around a small alpha-beta search", long_about = None)]
struct Cli {
    /// Seed for random choices, making play repeatable.
    #[arg(long)]
    seed: Option<u64>,

    /// Base search depth in plies.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=16))]
    depth: Option<u32>,

    /// Decide one move for this position, print it and exit.
    #[arg(long, value_name = "FEN")]
    fen: Option<String>,
}

/// Register the engine's options with the defaults of `config`.
fn engine_options(config: &Config) -> UciOptions {
    let mut uci_options = UciOptions::new();
    uci_options.insert(UciOption::new_spin(
        "Seed",
        config.seed.unwrap_or(0).min(i64::MAX as u64) as i64,
        0,
        i64::MAX,
    ));
    uci_options.insert(UciOption::new_button("Clear Seed", false));
    uci_options.insert(UciOption::new_spin(
        "BaseDepth",
        config.depth.base.into(),
        1,
        16,
    ));
    uci_options.insert(UciOption::new_spin(
        "EndgameDepth",
        config.depth.endgame.into(),
        1,
        16,
    ));
    uci_options.insert(UciOption::new_spin(
        "EndgamePieces",
        config.depth.endgame_pieces.into(),
        2,
        32,
    ));
    uci_options.insert(UciOption::new_check("Mobility", config.weights.use_mobility));
    uci_options.insert(UciOption::new_check("Debug", config.debug));
    uci_options
}

/// Read the current option values back into a config.
fn apply_options(uci_options: &mut UciOptions, mut config: Config) -> Config {
    let spin = |name: &str, fallback: u32| uci_options[name].spin().unwrap_or(fallback);

    config.depth.base = spin("BaseDepth", config.depth.base);
    config.depth.endgame = spin("EndgameDepth", config.depth.endgame);
    config.depth.endgame_pieces = spin("EndgamePieces", config.depth.endgame_pieces);
    config.weights.use_mobility = uci_options["Mobility"]
        .check()
        .unwrap_or(config.weights.use_mobility);
    config.debug = uci_options["Debug"].check().unwrap_or(config.debug);

    if uci_options["Clear Seed"].button() == Some(true) {
        config.seed = None;
        uci_options["Clear Seed"] = UciOption::new_button("Clear Seed", false);
    }
    config
}

/// Update one option from `setoption` and return the config it leads to.
fn set_option(
    uci_options: &mut UciOptions,
    raw_opt: &RawOption,
    mut config: Config,
) -> tactician_engine::error::Result<Config> {
    let option = uci_options.update(raw_opt)?;
    if option.name == "Seed" {
        config.seed = option.spin();
    }
    Ok(apply_options(uci_options, config))
}

/// Decide on a move for the engine's game and report it.
fn go(engine: &mut Engine, mode: Mode) -> io::Result<()> {
    match engine.decide(mode) {
        Ok(decision) => {
            uci::debug(engine.debug(), &decision.to_string())?;
            UciResponse::new_info(UciInfo::from(&decision)).send()?;
            UciResponse::new_best_move(Some(decision.move_)).send()
        }
        Err(err) if err.kind() == ErrorKind::NoLegalMoves => {
            warn!(fen = %engine.game().to_fen(), "go on a finished game");
            UciResponse::new_best_move(None).send()
        }
        Err(err) => {
            error!(%err, "decision failed");
            uci::error(&err.to_string())?;
            UciResponse::new_best_move(None).send()
        }
    }
}

fn main() -> io::Result<()> {
    // Stdout carries the protocol, logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut builder = EngineBuilder::new();
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    if let Some(depth) = cli.depth {
        builder = builder.base_depth(depth);
    }

    // One-shot mode.
    if let Some(fen) = cli.fen {
        let game = match Game::parse_fen(&fen) {
            Ok(game) => game,
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(2);
            }
        };
        let mut engine = builder.game(game).build();
        return go(&mut engine, Mode::Infinite);
    }

    println!("{NAME} by {AUTHOR}");

    let mut engine = builder.build();
    // Engine Internal parameters
    let mut uci_options = engine_options(engine.config());

    loop {
        // Wait to receive a line of input.
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        if input.trim().is_empty() {
            continue;
        }

        // Attempt to parse an input string into a UciCommand for processing.
        let command = match UciCommand::from_str(&input) {
            Ok(command) => command,
            Err(err) => {
                warn!(input = %input.trim_end(), %err, "unparsed input");
                uci::error(&format!("{} could not be parsed: {err}", input.escape_debug()))?;
                continue;
            }
        };

        match command {
            // GUI is telling engine to use UCI protocol.
            // It requires a response of Id, available options, and an acknowledgement.
            UciCommand::Uci => {
                UciResponse::new_id(NAME, AUTHOR).send()?;
                for uci_opt in uci_options.values() {
                    UciResponse::new_option(uci_opt.clone()).send()?;
                }
                UciResponse::UciOk.send()?;
            }

            // Command used to sync GUI with engine. Requires acknowledgement response.
            UciCommand::IsReady => {
                UciResponse::ReadyOk.send()?;
            }

            // The next decision will be from a different game.
            UciCommand::UciNewGame => {
                engine.new_game();
                uci::debug(engine.debug(), "new game")?;
            }

            // Decisions run to completion, there is never a search to stop.
            UciCommand::Stop | UciCommand::PonderHit => {}

            // Shutdown engine.
            UciCommand::Quit => break,

            // Tells engine to send extra `info string` to the GUI.
            UciCommand::Debug(new_debug_value) => {
                uci::debug(
                    engine.debug() | new_debug_value,
                    &format!("set debug {new_debug_value}"),
                )?;
                uci_options["Debug"] = UciOption::new_check("Debug", new_debug_value);
                engine.set_debug(new_debug_value);
            }

            // Command to change engine internal parameters.
            UciCommand::SetOption(raw_opt) => {
                match set_option(&mut uci_options, &raw_opt, *engine.config()) {
                    Ok(config) => {
                        engine.set_config(config);
                        uci::debug(engine.debug(), &format!("{config:?}"))?;
                    }
                    Err(err) => uci::error(&err.to_string())?,
                }
            }

            // Set the current position.
            UciCommand::Pos(game) => {
                uci::debug(
                    engine.debug(),
                    &format!(
                        "set position {} after moves [{}]",
                        game.to_fen(),
                        display(game.moves())
                    ),
                )?;
                engine.set_game(game);
            }

            // Decide on a move with the given limits.
            UciCommand::Go(controls) => {
                let mode = Mode::try_from(controls).unwrap_or_default();
                go(&mut engine, mode)?;
            }
        }
    }

    Ok(())
}
