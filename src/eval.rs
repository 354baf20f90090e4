//! Parallel fitness evaluation.
//!
//! Sweeps run inside a dedicated rayon pool. Each worker keeps its own scratch environment and
//! every per-trial random source is seeded before the sweep starts, so a sweep's result doesn't
//! depend on how many threads run it.

use crate::{
    agent::NetworkAgent,
    config::ConfigError,
    environment::{Environment, MatchResult, Outcome},
    fitness::Fitness,
    network::{Activation, Network},
    random::WyRng,
};
use core::{iter::Sum, ops::Add};
use rand::RngCore;
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use tracing::trace;

/// Summed statistics of a batch of matches
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Matches won by the candidate
    pub score: usize,
    pub moves: usize,
    pub matches: usize,
}

impl Tally {
    /// The tally of one match, won by the candidate if the outcome is `won`
    pub fn of(result: MatchResult, won: Outcome) -> Self {
        Self {
            score: usize::from(result.outcome == won),
            moves: result.moves,
            matches: 1,
        }
    }

    pub fn mean_moves(&self) -> f64 {
        if self.matches == 0 {
            0.
        } else {
            self.moves as f64 / self.matches as f64
        }
    }
}

impl Add for Tally {
    type Output = Tally;

    fn add(self, rhs: Tally) -> Tally {
        Tally {
            score: self.score + rhs.score,
            moves: self.moves + rhs.moves,
            matches: self.matches + rhs.matches,
        }
    }
}

impl Sum for Tally {
    fn sum<I: Iterator<Item = Tally>>(iter: I) -> Self {
        iter.fold(Tally::default(), Add::add)
    }
}

pub struct Evaluator {
    pool: ThreadPool,
}

impl Evaluator {
    /// A pool of `threads` workers, or one per available core
    pub fn new(threads: Option<usize>) -> Result<Self, ConfigError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.unwrap_or(0))
            .thread_name(|idx| format!("ladder-eval-{idx}"))
            .build()
            .map_err(|e| ConfigError::ThreadPool(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Play `candidate` against every opponent: first as the first mover, then, if `both_sides`,
    /// as the second mover too.
    pub fn sweep<E: Environment>(
        &self,
        candidate: &Network,
        opponents: &[Network],
        σ: Activation,
        both_sides: bool,
    ) -> Tally {
        self.pool.install(|| {
            opponents
                .par_iter()
                .map_init(E::default, |env, opponent| {
                    let mut us = NetworkAgent::trusted(candidate, σ);
                    let mut them = NetworkAgent::trusted(opponent, σ);
                    let first = env.play_match(&mut us, &mut them);
                    trace!(outcome = ?first.outcome, moves = first.moves, "candidate moved first");
                    let mut tally = Tally::of(first, Outcome::First);
                    if both_sides {
                        let second = env.play_match(&mut them, &mut us);
                        trace!(outcome = ?second.outcome, moves = second.moves, "candidate moved second");
                        tally = tally + Tally::of(second, Outcome::Second);
                    }
                    tally
                })
                .sum()
        })
    }

    /// Sum `trials` independent trials of `network`, each seeded from `rng` before any runs
    pub fn trials<F: Fitness>(
        &self,
        fitness: &F,
        network: &Network,
        σ: Activation,
        trials: usize,
        rng: &mut WyRng,
    ) -> f64 {
        let seeds: Vec<u64> = (0..trials).map(|_| rng.next_u64()).collect();
        let scores: Vec<f64> = self.pool.install(|| {
            seeds
                .par_iter()
                .map(|&seed| fitness.trial(network, σ, &mut WyRng::seeded(seed)))
                .collect()
        });
        // summed in seed order so the float result is the same for any thread count
        scores.into_iter().sum()
    }
}
