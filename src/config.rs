//! Trainer configuration and the errors raised when a configuration can't be run.

use crate::{
    constants::*,
    network::{activate, Activation},
    random::{MutationRate, Span},
};
use core::fmt;
use std::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Topology {
        depth: usize,
        input: usize,
        size: usize,
        output: usize,
    },
    EmptySpan {
        min: f64,
        max: f64,
    },
    Probability(f64),
    Threshold(f64),
    EmptyPopulation,
    NoTrials,
    Width {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    ThreadPool(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Topology {
                depth,
                input,
                size,
                output,
            } => write!(
                f,
                "topology needs every dimension positive (depth {depth}, input {input}, size {size}, output {output})"
            ),
            ConfigError::EmptySpan { min, max } => {
                write!(f, "span [{min}, {max}) is empty or not finite")
            }
            ConfigError::Probability(p) => write!(f, "probability {p} is outside [0, 1]"),
            ConfigError::Threshold(t) => {
                write!(f, "replacement threshold {t} must lie strictly between 0.5 and 1")
            }
            ConfigError::EmptyPopulation => write!(f, "population must hold at least one contender"),
            ConfigError::NoTrials => write!(f, "fitness needs at least one trial"),
            ConfigError::Width {
                what,
                expected,
                actual,
            } => write!(f, "{what} width is {actual}, expected {expected}"),
            ConfigError::ThreadPool(e) => write!(f, "could not build evaluation pool: {e}"),
        }
    }
}

impl Error for ConfigError {}

/// Parameters of a single elite hill climbing run
#[derive(Debug, Clone)]
pub struct HillClimbConfig {
    pub generations: usize,
    /// Trials summed into each candidate's fitness
    pub trials: usize,
    pub rate: MutationRate,
    pub span: Span,
    pub σ: Activation,
    /// Worker threads for trial evaluation, or every available core
    pub threads: Option<usize>,
}

impl HillClimbConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::NoTrials);
        }
        Ok(())
    }
}

impl Default for HillClimbConfig {
    fn default() -> Self {
        Self {
            generations: LADDER_CLIMB_GENERATIONS,
            trials: LADDER_CLIMB_TRIALS,
            rate: MutationRate::new(LADDER_MUTATION_RATE).expect("default rate is a probability"),
            span: Span::unit(),
            σ: activate::sigmoid,
            threads: None,
        }
    }
}

/// Parameters of a self-play coevolution run
#[derive(Debug, Clone)]
pub struct CoevolutionConfig {
    pub generations: usize,
    pub population: usize,
    pub rate: MutationRate,
    pub span: Span,
    pub σ: Activation,
    /// Fraction of the maximum score a challenger has to beat to enter the population
    pub threshold: f64,
    /// Play every contender from both sides instead of only moving first
    pub both_sides: bool,
    pub threads: Option<usize>,
}

impl CoevolutionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if !(self.threshold > 0.5 && self.threshold < 1.) {
            return Err(ConfigError::Threshold(self.threshold));
        }
        Ok(())
    }

    /// Matches the challenger plays against each contender
    #[inline]
    pub fn rounds(&self) -> usize {
        if self.both_sides {
            2
        } else {
            1
        }
    }

    #[inline]
    pub fn max_score(&self) -> usize {
        self.population * self.rounds()
    }

    /// The score a challenger must strictly exceed
    #[inline]
    pub fn score_to_beat(&self) -> usize {
        (self.max_score() as f64 * self.threshold) as usize
    }

    /// Defaults for Connect4 self-play
    pub fn connect4() -> Self {
        Self {
            threshold: LADDER_CONNECT4_THRESHOLD,
            both_sides: LADDER_CONNECT4_BOTH_SIDES,
            ..Default::default()
        }
    }

    /// Defaults for battle self-play
    pub fn battle() -> Self {
        Self {
            threshold: LADDER_BATTLE_THRESHOLD,
            both_sides: LADDER_BATTLE_BOTH_SIDES,
            ..Default::default()
        }
    }
}

impl Default for CoevolutionConfig {
    fn default() -> Self {
        Self {
            generations: LADDER_GENERATIONS,
            population: LADDER_POPULATION,
            rate: MutationRate::new(LADDER_MUTATION_RATE).expect("default rate is a probability"),
            span: Span::unit(),
            σ: activate::sigmoid,
            threshold: LADDER_CONNECT4_THRESHOLD,
            both_sides: LADDER_CONNECT4_BOTH_SIDES,
            threads: None,
        }
    }
}
