//! Two-player games that networks are trained to play.
//!
//! An [Environment] owns the full state of one match. It can encode that state from either side
//! into a fixed-width observation, decode a network's output back into a legal action, and run a
//! whole match between two [Agent]s.

pub mod battle;
pub mod connect4;

pub use battle::Battle;
pub use connect4::Connect4;

use crate::{agent::Agent, config::ConfigError, network::Topology};
use core::fmt::{self, Debug, Display};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    First,
    Second,
    Draw,
}

impl Outcome {
    /// The same result seen with the players' seats swapped
    pub fn flip(self) -> Self {
        match self {
            Outcome::First => Outcome::Second,
            Outcome::Second => Outcome::First,
            Outcome::Draw => Outcome::Draw,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::First => write!(f, "first player won"),
            Outcome::Second => write!(f, "second player won"),
            Outcome::Draw => write!(f, "nobody won"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub outcome: Outcome,
    pub moves: usize,
}

impl MatchResult {
    pub fn new(outcome: Outcome, moves: usize) -> Self {
        Self { outcome, moves }
    }
}

pub trait Environment: Default + Display + Send {
    /// Who an observation or decision is made for
    type Side: Copy + Eq + Debug;
    type Action: Copy + Eq + Debug;

    const NAME: &'static str;
    /// Seats in move order
    const SIDES: [Self::Side; 2];
    /// Width of an encoded observation, and of any network's input
    const OBSERVATION: usize;
    /// Count of choosable actions, and of any network's output
    const ACTIONS: usize;

    /// The action at `idx`, for `idx < ACTIONS`
    fn action(idx: usize) -> Self::Action;

    /// Human readable name of an action
    fn label(action: Self::Action) -> String;

    /// Write the state as seen from `side` into `out`, which is [Environment::OBSERVATION] wide
    fn encode(&self, side: Self::Side, out: &mut [f64]);

    fn legal(&self, action: Self::Action, side: Self::Side) -> bool;

    /// The state as shown to a person playing `side`
    fn render(&self, _side: Self::Side) -> String {
        self.to_string()
    }

    /// The highest scoring legal action, ties going to the lowest index. [None] if nothing is
    /// legal.
    fn decode(&self, output: &[f64], side: Self::Side) -> Option<Self::Action> {
        let mut best: Option<(Self::Action, f64)> = None;
        for (idx, &score) in output.iter().enumerate().take(Self::ACTIONS) {
            let action = Self::action(idx);
            if !self.legal(action, side) {
                continue;
            }
            match best {
                Some((_, top)) if top >= score => {}
                _ => best = Some((action, score)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// Reset the state and play a full match. `first` always moves first.
    fn play_match(
        &mut self,
        first: &mut dyn Agent<Self>,
        second: &mut dyn Agent<Self>,
    ) -> MatchResult;

    /// Whether networks of `topology` can play this game
    fn check(topology: Topology) -> Result<(), ConfigError> {
        if topology.input() != Self::OBSERVATION {
            return Err(ConfigError::Width {
                what: "network input",
                expected: Self::OBSERVATION,
                actual: topology.input(),
            });
        }
        if topology.output() != Self::ACTIONS {
            return Err(ConfigError::Width {
                what: "network output",
                expected: Self::ACTIONS,
                actual: topology.output(),
            });
        }
        Ok(())
    }
}
