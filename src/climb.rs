//! (1+1) hill climbing: one elite, one mutated challenger per generation.

use crate::{
    config::{ConfigError, HillClimbConfig},
    eval::Evaluator,
    fitness::Fitness,
    network::{Network, Topology},
    random::WyRng,
    scenario::{Report, Trainer},
};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// The challenger became the elite
    Committed,
    Reverted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClimbReport {
    pub generation: usize,
    /// The challenger's summed reward
    pub fitness: f64,
    /// The elite's after this generation
    pub best_fitness: f64,
    pub verdict: Verdict,
}

impl Report for ClimbReport {
    fn accepted(&self) -> bool {
        self.verdict == Verdict::Committed
    }
}

pub struct HillClimb<F: Fitness> {
    config: HillClimbConfig,
    fitness: F,
    evaluator: Evaluator,
    elite: Network,
    best_fitness: f64,
    generation: usize,
    rng: WyRng,
}

impl<F: Fitness> HillClimb<F> {
    /// Start from a random elite, scored once so the first challenger has something to beat
    pub fn new(
        config: HillClimbConfig,
        fitness: F,
        topology: Topology,
        mut rng: WyRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        fitness.check(topology)?;
        let evaluator = Evaluator::new(config.threads)?;
        let elite = Network::random(topology, &config.span, &mut rng);
        let best_fitness = evaluator.trials(&fitness, &elite, config.σ, config.trials, &mut rng);
        info!(
            ?topology,
            trials = config.trials,
            rate = config.rate.p(),
            threads = evaluator.threads(),
            best_fitness,
            "hill climb ready"
        );
        Ok(Self {
            config,
            fitness,
            evaluator,
            elite,
            best_fitness,
            generation: 0,
            rng,
        })
    }

    pub fn elite(&self) -> &Network {
        &self.elite
    }

    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    pub fn config(&self) -> &HillClimbConfig {
        &self.config
    }
}

impl<F: Fitness> Trainer for HillClimb<F> {
    type Report = ClimbReport;

    fn generations(&self) -> usize {
        self.config.generations
    }

    fn step(&mut self) -> ClimbReport {
        let mut candidate = self.elite.clone();
        candidate.mutate(&self.config.rate, &self.config.span, &mut self.rng);
        let fitness = self.evaluator.trials(
            &self.fitness,
            &candidate,
            self.config.σ,
            self.config.trials,
            &mut self.rng,
        );

        let verdict = if fitness > self.best_fitness {
            self.elite = candidate;
            self.best_fitness = fitness;
            info!(generation = self.generation, fitness, "elite committed");
            Verdict::Committed
        } else {
            Verdict::Reverted
        };
        debug!(
            generation = self.generation,
            fitness,
            best_fitness = self.best_fitness,
            ?verdict
        );

        let report = ClimbReport {
            generation: self.generation,
            fitness,
            best_fitness: self.best_fitness,
            verdict,
        };
        self.generation += 1;
        report
    }

    fn champion(&self) -> &Network {
        &self.elite
    }
}
