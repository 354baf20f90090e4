//! Centralized defaults for training runs.
//!
//! All configurable parameters are defined here with the `LADDER_` prefix. The config structs in
//! [crate::config] take their [Default]s from these, and the command line overrides them.

// ============================================================================
// Mutation Parameters
// ============================================================================

/// Probability that any one weight or bias is redrawn, before depth scaling
pub const LADDER_MUTATION_RATE: f64 = 0.05;

/// Lower bound of the range weights and biases are drawn from
pub const LADDER_SPAN_MIN: f64 = -1.;

/// Upper bound (exclusive) of the range weights and biases are drawn from
pub const LADDER_SPAN_MAX: f64 = 1.;

// ============================================================================
// Run Parameters
// ============================================================================

/// Generations a trainer runs for when not told otherwise
pub const LADDER_GENERATIONS: usize = 10_000;

/// Hill climbing generations for the classifier
pub const LADDER_CLIMB_GENERATIONS: usize = 1_000;

/// Trials summed into one hill climbing fitness
pub const LADDER_CLIMB_TRIALS: usize = 10_000;

/// Contenders in a coevolving population
pub const LADDER_POPULATION: usize = 2048;

// ============================================================================
// Replacement Thresholds
// ============================================================================

/// Fraction of the maximum score a Connect4 challenger must exceed
pub const LADDER_CONNECT4_THRESHOLD: f64 = 0.75;

/// Fraction of the maximum score a battle challenger must exceed
pub const LADDER_BATTLE_THRESHOLD: f64 = 0.618;

/// A Connect4 challenger meets every contender from both seats
pub const LADDER_CONNECT4_BOTH_SIDES: bool = true;

/// A battle challenger only meets each contender as the first mover
pub const LADDER_BATTLE_BOTH_SIDES: bool = false;

// ============================================================================
// Environment Parameters
// ============================================================================

/// Turns after which a battle is called with no winner
pub const LADDER_BATTLE_MOVE_CAP: usize = 96;

/// Hidden layers of a Connect4 network
pub const LADDER_CONNECT4_DEPTH: usize = 2;

/// Hidden layers of a battle network
pub const LADDER_BATTLE_DEPTH: usize = 1;

/// Hidden layers of the classifier network
pub const LADDER_CLASSIFY_DEPTH: usize = 1;
