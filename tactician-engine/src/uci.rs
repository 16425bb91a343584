//! Universal Chess Interface

use std::collections::HashMap;
use std::fmt::{self, Display, Write};
use std::hash::{Hash, Hasher};
use std::io;
use std::ops::Deref;
use std::ops::{Index, IndexMut};
use std::str::{FromStr, SplitWhitespace};
use std::time::Duration;

use crate::coretypes::{Board, Cp, Move, PlyKind};
use crate::error::{self, ErrorKind};
use crate::game::Game;

/// UciCommands commands from an external program sent to this chess engine.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum UciCommand {
    Uci,
    Debug(bool),
    IsReady,
    SetOption(RawOption),
    UciNewGame,
    Pos(Game),
    Go(SearchControls),
    Stop,
    PonderHit,
    Quit,
}

impl UciCommand {
    /// Parse a single input line into a UciCommand if possible.
    pub fn parse_command(input_str: &str) -> error::Result<Self> {
        let mut input = input_str.split_whitespace();
        let head = input.next().ok_or(ErrorKind::UciNoCommand)?;

        match head {
            "uci" => Ok(UciCommand::Uci),
            "debug" => Self::parse_debug(input),
            "isready" => Ok(UciCommand::IsReady),
            "setoption" => Self::parse_setoption(input),
            "ucinewgame" => Ok(UciCommand::UciNewGame),
            "position" => Self::parse_pos(input),
            "go" => Self::parse_go(input),
            "stop" => Ok(UciCommand::Stop),
            "ponderhit" => Ok(UciCommand::PonderHit),
            "quit" => Ok(UciCommand::Quit),
            _ => Err((ErrorKind::UciUnknownCommand, head).into()),
        }
    }

    /// Extract a `debug` command if possible.
    /// command: `debug [on | off]`
    fn parse_debug(mut input: SplitWhitespace) -> error::Result<Self> {
        let debug_mode_str = input.next().ok_or(ErrorKind::UciDebugNoMode)?;

        match debug_mode_str {
            "on" => Ok(Self::Debug(true)),
            "off" => Ok(Self::Debug(false)),
            _ => Err(ErrorKind::UciDebugIllegalMode.into()),
        }
    }

    /// Extract a `setoption` command if possible.
    /// command: `setoption name [id] (value x)`
    fn parse_setoption(mut input: SplitWhitespace) -> error::Result<Self> {
        let name = input.next().ok_or(ErrorKind::UciSetOptionNoName)?;
        (name == "name")
            .then_some(())
            .ok_or(ErrorKind::UciSetOptionNoName)?;

        // The id following `name` runs until the token `value` or the end of input.
        let name: Vec<&str> = input.by_ref().take_while(|&token| token != "value").collect();
        let name = name.join(" ");
        (!name.is_empty())
            .then_some(())
            .ok_or(ErrorKind::UciSetOptionNoName)?;

        // Whatever is left is the contents of the value string, if `value` was given.
        let value: Vec<&str> = input.collect();
        let value = value.join(" ");

        Ok(UciCommand::SetOption(RawOption {
            name: name.as_str().into(),
            value,
        }))
    }

    /// Extract a `position` command if possible.
    /// command: `position [fen fen_str | startpos] (moves move_list ...)`
    fn parse_pos(mut input: SplitWhitespace) -> error::Result<Self> {
        let position_input = input.next().ok_or((
            ErrorKind::UciNoArgument,
            "position missing description [fen | startpos]",
        ))?;

        // Parse a valid board from startpos or FEN, or return an Err(_).
        // The FEN move counters are optional, the board does not track them.
        let mut game = match position_input {
            "startpos" => Game::start_position(),
            "fen" => {
                let mut fen_fields = Vec::with_capacity(6);
                while let Some(field) = input.clone().next() {
                    if field == "moves" || fen_fields.len() == 6 {
                        break;
                    }
                    fen_fields.push(field);
                    input.next();
                }
                if fen_fields.len() < 4 {
                    return Err(ErrorKind::UciPositionMalformed.into());
                }
                let counters = ["0", "1"];
                let missing = 6 - fen_fields.len();
                fen_fields.extend_from_slice(&counters[2 - missing..]);
                Game::from(Board::from_str(&fen_fields.join(" "))?)
            }
            _ => return Err(ErrorKind::UciPositionMalformed.into()),
        };

        // Check if there is a sequence of moves to apply to the position.
        match input.next() {
            Some("moves") => {
                for move_str in input {
                    let move_ = game.parse_move(move_str)?;
                    game.play(move_)?;
                }
            }
            Some(token) => return Err((ErrorKind::UciPositionMalformed, token).into()),
            None => (),
        }

        Ok(UciCommand::Pos(game))
    }

    /// Extract a `go` command if possible.
    /// command: `go [wtime | btime | winc | binc | depth | nodes | mate | movetime | infinite]*`
    fn parse_go(mut input: SplitWhitespace) -> error::Result<Self> {
        let mut controls = SearchControls::new();

        while let Some(input_str) = input.next() {
            match input_str {
                "wtime" => controls.wtime = Some(parse_millis(&mut input)?),
                "btime" => controls.btime = Some(parse_millis(&mut input)?),
                "winc" => controls.winc = Some(parse_millis(&mut input)?),
                "binc" => controls.binc = Some(parse_millis(&mut input)?),
                "movetime" => controls.move_time = Some(parse_millis(&mut input)?),
                "depth" => controls.depth = Some(parse_int(&mut input)?),
                "movestogo" => controls.moves_to_go = Some(parse_int(&mut input)?),
                "mate" => controls.mate = Some(parse_int(&mut input)?),
                "nodes" => controls.nodes = Some(parse_int(&mut input)?),
                "infinite" => controls.infinite = true,
                "ponder" => (),
                _ => return Err((ErrorKind::UciInvalidOption, input_str).into()),
            }
        }

        Ok(UciCommand::Go(controls))
    }
}

/// Parse the integer argument that follows a `go` key.
fn parse_int<T: FromStr>(input: &mut SplitWhitespace) -> error::Result<T>
where
    T::Err: Display,
{
    input
        .next()
        .ok_or(ErrorKind::UciNoArgument)?
        .parse()
        .map_err(|err: T::Err| (ErrorKind::UciCannotParseInt, err).into())
}

/// Parse a time argument in milliseconds. Clocks may run negative, those become zero.
fn parse_millis(input: &mut SplitWhitespace) -> error::Result<Duration> {
    let millis: i64 = parse_int(input)?;
    Ok(Duration::from_millis(millis.max(0) as u64))
}

impl FromStr for UciCommand {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        Self::parse_command(s)
    }
}

/// Engine to external program communication.
#[derive(Debug, Clone)]
pub enum UciResponse {
    Id(String, String),
    UciOk,
    ReadyOk,
    Opt(UciOption),
    /// None when there is no move to play.
    BestMove(Option<Move>),
    Info(UciInfo),
}

impl UciResponse {
    pub fn new_id(name: &str, author: &str) -> Self {
        Self::Id(name.into(), author.into())
    }

    pub fn new_option(uci_opt: UciOption) -> Self {
        Self::Opt(uci_opt)
    }

    pub fn new_best_move(move_: Option<Move>) -> Self {
        Self::BestMove(move_)
    }

    pub fn new_info(uci_info: UciInfo) -> Self {
        Self::Info(uci_info)
    }

    /// Send this UciResponse over stdout.
    pub fn send(&self) -> io::Result<()> {
        send_str(&self.to_string())
    }
}

impl Display for UciResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Id(name, author) => {
                f.write_str("id name ")?;
                f.write_str(name)?;
                f.write_char('\n')?;
                f.write_str("id author ")?;
                f.write_str(author)?;
                f.write_char('\n')
            }
            Self::UciOk => f.write_str("uciok\n"),
            Self::ReadyOk => f.write_str("readyok\n"),
            Self::BestMove(Some(move_)) => writeln!(f, "bestmove {move_}"),
            Self::BestMove(None) => f.write_str("bestmove 0000\n"),
            Self::Opt(uci_opt) => {
                writeln!(f, "{uci_opt}")
            }
            Self::Info(info) => writeln!(f, "{info}"),
        }
    }
}

fn send_str(s: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    <io::StdoutLock as io::Write>::write_all(&mut handle, s.as_ref())?;
    <io::StdoutLock as io::Write>::flush(&mut handle)
}

/// Send a debug info string over UCI.
pub fn debug(can_debug: bool, s: &str) -> io::Result<()> {
    if can_debug {
        send_str(&format!("info string debug {s}\n"))
    } else {
        Ok(())
    }
}

/// Send an error info string over UCI.
pub fn error(s: &str) -> io::Result<()> {
    send_str(&format!("info string error {s}\n"))
}

/// Search statistics reported with a decision.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UciInfo {
    pub depth: PlyKind,
    /// Relative to the engine.
    pub score: Cp,
    pub nodes: u64,
    pub time: Duration,
}

impl Display for UciInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "info depth {} score cp {} nodes {} time {}",
            self.depth,
            self.score.0,
            self.nodes,
            self.time.as_millis()
        )
    }
}

/// Type parsed from a Uci `setoption` command.
/// The value is stringly typed, because it can be a bool, integer, or nothing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RawOption {
    pub name: CaselessString,
    pub value: String,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Check {
    pub value: bool,
    pub default: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Spin {
    pub value: i64,
    pub default: i64,
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Button {
    pub pressed: bool,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum UciOptionType {
    Check(Check),
    Spin(Spin),
    Button(Button),
}

impl Display for UciOptionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UciOptionType::Check(Check { default, .. }) => {
                write!(f, "type check default {default}")
            }
            UciOptionType::Spin(Spin {
                default, min, max, ..
            }) => {
                write!(f, "type spin default {default} min {min} max {max}")
            }
            UciOptionType::Button(_) => f.write_str("type button"),
        }
    }
}

/// Options exposed by the engine:
/// option name Seed type spin default 0 min 0 max 9223372036854775807
/// option name BaseDepth type spin default 3 min 1 max 16
/// option name Mobility type check default true
/// option name Clear Seed type button
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UciOption {
    pub name: CaselessString,
    pub option_type: UciOptionType,
}

impl UciOption {
    /// Create a new UciOption of type check, with a default value.
    pub fn new_check(name: &str, default: bool) -> Self {
        Self {
            name: name.into(),
            option_type: UciOptionType::Check(Check {
                value: default,
                default,
            }),
        }
    }

    /// Create a new UciOption of type spin with a default value, and a min and max.
    pub fn new_spin(name: &str, default: i64, min: i64, max: i64) -> Self {
        assert!(min < max, "Illegal spin, min >= max");
        assert!(default >= min, "Illegal spin, default < min");
        assert!(default <= max, "Illegal spin, default > max");

        Self {
            name: name.into(),
            option_type: UciOptionType::Spin(Spin {
                value: default,
                default,
                min,
                max,
            }),
        }
    }

    /// Create a new UciOption of type button with a default state of pressed or not pressed.
    pub fn new_button(name: &str, pressed: bool) -> Self {
        Self {
            name: name.into(),
            option_type: UciOptionType::Button(Button { pressed }),
        }
    }

    /// Value of a check option, None for other option types.
    pub fn check(&self) -> Option<bool> {
        match self.option_type {
            UciOptionType::Check(Check { value, .. }) => Some(value),
            _ => None,
        }
    }

    /// Value of a spin option converted to `T`, None for other option types
    /// or if the value does not fit.
    pub fn spin<T: TryFrom<i64>>(&self) -> Option<T> {
        match self.option_type {
            UciOptionType::Spin(Spin { value, .. }) => T::try_from(value).ok(),
            _ => None,
        }
    }

    /// Whether a button option was pressed, None for other option types.
    pub fn button(&self) -> Option<bool> {
        match self.option_type {
            UciOptionType::Button(Button { pressed }) => Some(pressed),
            _ => None,
        }
    }

    /// Given a RawOption, try to extract a typed value from it's stringly-typed value.
    /// The type of the parsed value must match the value of this UciOptionType value.
    /// This returns a mutable reference to self on successful update.
    pub fn try_update(&mut self, raw_opt: &RawOption) -> error::Result<&mut Self> {
        (self.name == raw_opt.name)
            .then_some(())
            .ok_or((ErrorKind::UciOptionCannotUpdate, "names do not match"))?;

        match self.option_type {
            UciOptionType::Check(Check { ref mut value, .. }) => {
                *value = bool::from_str(&raw_opt.value)
                    .map_err(|err| (ErrorKind::UciOptionCannotUpdate, err))?;
            }
            UciOptionType::Spin(Spin {
                ref mut value,
                min,
                max,
                ..
            }) => {
                let new_value: i64 = raw_opt
                    .value
                    .parse()
                    .map_err(|err| (ErrorKind::UciOptionCannotUpdate, err))?;
                (min..=max)
                    .contains(&new_value)
                    .then_some(())
                    .ok_or((ErrorKind::UciOptionCannotUpdate, "value out of range"))?;
                *value = new_value;
            }
            UciOptionType::Button(Button { ref mut pressed }) => *pressed = true,
        };

        Ok(self)
    }
}

impl Display for UciOption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "option name {} {}", self.name.0, self.option_type)
    }
}

/// CaselessString is a String wrapper that compares and hashes a string with
/// ignored casing and leading/trailing whitespace.
/// It retains casing for printing, and removes leading/trailing whitespace.
#[derive(Debug, Clone)]
pub struct CaselessString(String);

impl PartialEq for CaselessString {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}
impl Eq for CaselessString {}

impl PartialEq<&str> for CaselessString {
    fn eq(&self, other: &&str) -> bool {
        self.0.to_lowercase() == other.to_lowercase()
    }
}

impl Hash for CaselessString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_lowercase().hash(state);
    }
}

impl Deref for CaselessString {
    type Target = String;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for CaselessString {
    fn from(s: &str) -> Self {
        Self(s.trim().to_string())
    }
}

/// Underlying type for UciOptions.
type OptionsMap = HashMap<CaselessString, UciOption>;

/// A HashMap wrapper for UciOption that has extra functionality for UciOption.
/// An option can only be updated with an option of equivalent type.
#[derive(Debug, Default)]
pub struct UciOptions(OptionsMap);

impl UciOptions {
    /// Create a new UciOptions using underlying HashMap::new().
    pub fn new() -> Self {
        Self(OptionsMap::new())
    }

    /// Insert stores a UciOption using it's name as the key and the full item as the value.
    /// It always replaces what is located in the container completely.
    /// If an item existed in the container, the item is removed and returned.
    pub fn insert(&mut self, uci_opt: UciOption) -> Option<UciOption> {
        let key = uci_opt.name.clone();
        // Remove key before inserting ensures Key capitalization is updated.
        let old_value = self.0.remove(&key);
        self.0.insert(key, uci_opt);
        old_value
    }

    /// UciOptions are uniquely defined by their name. Returns true if a key exists.
    pub fn contains<K: Into<CaselessString>>(&self, key: K) -> bool {
        let key: CaselessString = key.into();
        self.0.contains_key(&key)
    }

    /// Attempts to update a stored UciOption with the value in a RawOption.
    /// This will not create a new UciOption entry.
    /// This returns a mutable reference to the updated value in the table on successful update.
    pub fn update(&mut self, raw_opt: &RawOption) -> error::Result<&mut UciOption> {
        self.0
            .get_mut(&raw_opt.name)
            .ok_or((
                ErrorKind::UciOptionCannotUpdate,
                "RawOption name not a valid UciOption",
            ))?
            .try_update(raw_opt)
    }
}

/// Panics if the key is not present, like `HashMap`.
impl<K: Into<CaselessString>> Index<K> for UciOptions {
    type Output = UciOption;
    fn index(&self, key: K) -> &Self::Output {
        let key: CaselessString = key.into();
        &self.0[&key]
    }
}

impl<K: Into<CaselessString>> IndexMut<K> for UciOptions {
    fn index_mut(&mut self, key: K) -> &mut Self::Output {
        let key: CaselessString = key.into();
        self.0.get_mut(&key).expect("key not present")
    }
}

impl Deref for UciOptions {
    type Target = OptionsMap;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Raw limits received with a `go` command.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Hash)]
pub struct SearchControls {
    pub wtime: Option<Duration>,
    pub btime: Option<Duration>,
    pub winc: Option<Duration>,
    pub binc: Option<Duration>,
    pub moves_to_go: Option<u32>,
    pub depth: Option<PlyKind>,
    /// Accepted but not acted on.
    pub nodes: Option<u64>,
    /// Accepted but not acted on.
    pub mate: Option<u32>,
    pub move_time: Option<Duration>,
    pub infinite: bool,
}

impl SearchControls {
    pub fn new() -> Self {
        Self::default()
    }
}
