//! Self-play coevolution.
//!
//! A population of contenders is kept as a ring. Each generation the next contender in turn is
//! copied and mutated, and the challenger plays the whole population in one parallel sweep. A
//! challenger winning more than the threshold overwrites the slot under the replacement cursor,
//! so the oldest entrant is always the next to go.

use crate::{
    config::{CoevolutionConfig, ConfigError},
    environment::Environment,
    eval::Evaluator,
    network::{Network, Topology},
    random::WyRng,
    scenario::{Report, Trainer},
};
use core::marker::PhantomData;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepReport {
    pub generation: usize,
    /// Slot the challenger was copied from
    pub parent: usize,
    /// Matches the challenger won
    pub score: usize,
    pub max_score: usize,
    /// The score a challenger had to exceed
    pub score_to_beat: usize,
    pub mean_moves: f64,
    /// Slot the challenger was written to
    pub replaced: Option<usize>,
}

impl Report for SweepReport {
    fn accepted(&self) -> bool {
        self.replaced.is_some()
    }
}

pub struct Coevolution<E: Environment> {
    config: CoevolutionConfig,
    evaluator: Evaluator,
    population: Vec<Network>,
    parent_cursor: usize,
    replacement_cursor: usize,
    generation: usize,
    rng: WyRng,
    _env: PhantomData<fn() -> E>,
}

impl<E: Environment> Coevolution<E> {
    /// Start from `config.population` random contenders
    pub fn new(
        config: CoevolutionConfig,
        topology: Topology,
        mut rng: WyRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        E::check(topology)?;
        let population = (0..config.population)
            .map(|_| Network::random(topology, &config.span, &mut rng))
            .collect();
        Self::from_population(config, population, rng)
    }

    /// Start from the given contenders, which set the population size
    pub fn from_population(
        mut config: CoevolutionConfig,
        population: Vec<Network>,
        rng: WyRng,
    ) -> Result<Self, ConfigError> {
        config.population = population.len();
        config.validate()?;
        let topology = population[0].topology();
        E::check(topology)?;
        if let Some(odd) = population.iter().find(|n| n.topology() != topology) {
            return Err(ConfigError::Width {
                what: "contender parameter",
                expected: topology.params(),
                actual: odd.topology().params(),
            });
        }
        let evaluator = Evaluator::new(config.threads)?;
        info!(
            game = E::NAME,
            ?topology,
            population = config.population,
            rate = config.rate.p(),
            max_score = config.max_score(),
            score_to_beat = config.score_to_beat(),
            threads = evaluator.threads(),
            "coevolution ready"
        );
        Ok(Self {
            config,
            evaluator,
            population,
            parent_cursor: 0,
            replacement_cursor: 0,
            generation: 0,
            rng,
            _env: PhantomData,
        })
    }

    pub fn population(&self) -> &[Network] {
        &self.population
    }

    pub fn parent_cursor(&self) -> usize {
        self.parent_cursor
    }

    pub fn replacement_cursor(&self) -> usize {
        self.replacement_cursor
    }

    pub fn config(&self) -> &CoevolutionConfig {
        &self.config
    }

    /// The most recently written slot
    pub fn champion_index(&self) -> usize {
        let n = self.population.len();
        (self.replacement_cursor + n - 1) % n
    }
}

impl<E: Environment> Trainer for Coevolution<E> {
    type Report = SweepReport;

    fn generations(&self) -> usize {
        self.config.generations
    }

    fn step(&mut self) -> SweepReport {
        let n = self.population.len();
        let parent = self.parent_cursor;
        self.parent_cursor = (parent + 1) % n;

        let mut candidate = self.population[parent].clone();
        candidate.mutate(&self.config.rate, &self.config.span, &mut self.rng);
        let tally = self.evaluator.sweep::<E>(
            &candidate,
            &self.population,
            self.config.σ,
            self.config.both_sides,
        );

        let score_to_beat = self.config.score_to_beat();
        let replaced = if tally.score > score_to_beat {
            let slot = self.replacement_cursor;
            self.population[slot] = candidate;
            self.replacement_cursor = (slot + 1) % n;
            info!(
                generation = self.generation,
                score = tally.score,
                slot,
                "challenger entered the population"
            );
            Some(slot)
        } else {
            None
        };
        debug!(
            generation = self.generation,
            parent,
            score = tally.score,
            score_to_beat,
            mean_moves = tally.mean_moves()
        );

        let report = SweepReport {
            generation: self.generation,
            parent,
            score: tally.score,
            max_score: self.config.max_score(),
            score_to_beat,
            mean_moves: tally.mean_moves(),
            replaced,
        };
        self.generation += 1;
        report
    }

    fn champion(&self) -> &Network {
        &self.population[self.champion_index()]
    }
}
