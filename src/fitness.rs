//! Scalar rewards for the hill climber.

use crate::{
    agent::{NetworkAgent, RandomAgent},
    config::ConfigError,
    environment::{Environment, Outcome},
    network::{Activation, Network, Topology},
    random::WyRng,
};
use core::marker::PhantomData;
use rand::{Rng, RngCore};

/// One randomized trial of a network. Trials are summed into a fitness.
pub trait Fitness: Sync {
    fn trial(&self, network: &Network, σ: Activation, rng: &mut WyRng) -> f64;

    /// Whether networks of `topology` can be scored
    fn check(&self, topology: Topology) -> Result<(), ConfigError>;
}

/// A supervised task: draw an example, encode it, score the network's answer
pub trait FitnessSource: Sync {
    type Example;

    const INPUT: usize;
    const OUTPUT: usize;

    fn draw_example(&self, rng: &mut WyRng) -> Self::Example;

    /// Encode `example` into `out`, which is [FitnessSource::INPUT] wide
    fn input(&self, example: &Self::Example, out: &mut [f64]);

    fn score(&self, example: &Self::Example, output: &[f64]) -> f64;
}

impl<S: FitnessSource> Fitness for S {
    fn trial(&self, network: &Network, σ: Activation, rng: &mut WyRng) -> f64 {
        let example = self.draw_example(rng);
        let mut input = vec![0.; S::INPUT];
        self.input(&example, &mut input);
        self.score(&example, &network.forward(&input, σ))
    }

    fn check(&self, topology: Topology) -> Result<(), ConfigError> {
        if topology.input() != S::INPUT {
            return Err(ConfigError::Width {
                what: "network input",
                expected: S::INPUT,
                actual: topology.input(),
            });
        }
        if topology.output() != S::OUTPUT {
            return Err(ConfigError::Width {
                what: "network output",
                expected: S::OUTPUT,
                actual: topology.output(),
            });
        }
        Ok(())
    }
}

/// Is a random 32 bit integer divisible by four? The answer is yes when output 0 exceeds 0.5.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModuloClassifier;

impl FitnessSource for ModuloClassifier {
    type Example = u32;

    const INPUT: usize = 32;
    const OUTPUT: usize = 1;

    fn draw_example(&self, rng: &mut WyRng) -> u32 {
        rng.next_u32()
    }

    /// Bits, least significant first
    fn input(&self, example: &u32, out: &mut [f64]) {
        for (i, bit) in out.iter_mut().enumerate().take(Self::INPUT) {
            *bit = ((example >> i) & 1) as f64;
        }
    }

    fn score(&self, example: &u32, output: &[f64]) -> f64 {
        let prediction = output[0] > 0.5;
        let answer = example % 4 == 0;
        if prediction == answer {
            1.
        } else {
            0.
        }
    }
}

/// One match against a uniformly random player, from a random seat. Scores 1 for a win.
pub struct VersusRandom<E> {
    _env: PhantomData<fn() -> E>,
}

impl<E> Default for VersusRandom<E> {
    fn default() -> Self {
        Self { _env: PhantomData }
    }
}

impl<E: Environment> Fitness for VersusRandom<E> {
    fn trial(&self, network: &Network, σ: Activation, rng: &mut WyRng) -> f64 {
        let mut env = E::default();
        let mut player = NetworkAgent::trusted(network, σ);
        let mut opponent = RandomAgent::new(rng.fork());
        let outcome = if rng.random::<bool>() {
            env.play_match(&mut player, &mut opponent).outcome
        } else {
            env.play_match(&mut opponent, &mut player).outcome.flip()
        };
        if outcome == Outcome::First {
            1.
        } else {
            0.
        }
    }

    fn check(&self, topology: Topology) -> Result<(), ConfigError> {
        E::check(topology)
    }
}
