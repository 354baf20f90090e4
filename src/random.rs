//! Randomness for initialization, mutation and match sampling.
//!
//! Every consumer receives its source explicitly. Nothing in the crate reaches for a global
//! generator, so a run seeded with [WyRng::seeded] is reproducible, and parallel workers are
//! handed their own [WyRng::fork]ed sources rather than sharing one.

use crate::{
    config::ConfigError,
    constants::{LADDER_SPAN_MAX, LADDER_SPAN_MIN},
};
use core::cmp::min;
use rand::{Rng, RngCore};
use rand_distr::{Bernoulli, Distribution, Uniform};
use std::{
    fs::File,
    io::{self, Read},
    time::{SystemTime, UNIX_EPOCH},
};

/// Uniform draws over `f64`, available on every [Rng].
pub trait Draw: Rng {
    /// A draw in `[0, 1)`
    fn uniform(&mut self) -> f64 {
        self.random::<f64>()
    }

    /// A draw in `[0, max)`. Panics if `max` is not positive.
    fn uniform_to(&mut self, max: f64) -> f64 {
        self.random_range(0. ..max)
    }

    /// A draw in `[min, max)`. Panics if the range is empty.
    fn uniform_in(&mut self, min: f64, max: f64) -> f64 {
        self.random_range(min..max)
    }
}

impl<R: Rng + ?Sized> Draw for R {}

/// A non-empty half open range `[min, max)` that parameters are drawn from.
#[derive(Debug, Clone)]
pub struct Span {
    min: f64,
    max: f64,
    dist: Uniform<f64>,
}

impl Span {
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        Uniform::new(min, max)
            .map(|dist| Self { min, max, dist })
            .map_err(|_| ConfigError::EmptySpan { min, max })
    }

    /// `[-1, 1)`, the range every network is initialized and mutated within
    pub fn unit() -> Self {
        Self::new(LADDER_SPAN_MIN, LADDER_SPAN_MAX).expect("the default span is never empty")
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        (self.min..self.max).contains(&v)
    }

    #[inline]
    pub fn sample(&self, rng: &mut impl RngCore) -> f64 {
        self.dist.sample(rng)
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        self.min == other.min && self.max == other.max
    }
}

/// Per-parameter probability of being redrawn during mutation
#[derive(Debug, Clone, Copy)]
pub struct MutationRate {
    p: f64,
    dist: Bernoulli,
}

impl MutationRate {
    pub fn new(p: f64) -> Result<Self, ConfigError> {
        Bernoulli::new(p)
            .map(|dist| Self { p, dist })
            .map_err(|_| ConfigError::Probability(p))
    }

    #[inline]
    pub fn p(&self) -> f64 {
        self.p
    }

    #[inline]
    pub fn happens(&self, rng: &mut impl RngCore) -> bool {
        self.dist.sample(rng)
    }
}

impl PartialEq for MutationRate {
    fn eq(&self, other: &Self) -> bool {
        self.p == other.p
    }
}

pub struct WyRng {
    state: u64,
}

impl WyRng {
    pub fn seeded(state: u64) -> Self {
        Self { state }
    }

    /// A new, independent source seeded from this one's next draw. Used to hand each parallel
    /// task a private generator before the task is dispatched.
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.next_u64())
    }
}

impl RngCore for WyRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        const WY_CONST_0: u64 = 0x2d35_8dcc_aa6c_78a5;
        const WY_CONST_1: u64 = 0x8bb8_4b93_962e_acc9;
        self.state = self.state.wrapping_add(WY_CONST_0);
        let t = u128::from(self.state) * u128::from(self.state ^ WY_CONST_1);
        (t as u64) ^ (t >> 64) as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        let mut idx = 0;
        while idx < dst.len() {
            let lim = min(8, dst.len() - idx);
            dst[idx..idx + lim].copy_from_slice(&self.next_u64().to_ne_bytes()[..lim]);
            idx += lim;
        }
    }
}

pub fn seed_urandom() -> io::Result<u64> {
    let mut file = File::open("/dev/urandom")?;
    let mut buffer = [0u8; 8];
    file.read_exact(&mut buffer)?;
    Ok(u64::from_le_bytes(buffer))
}

fn seed_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x9e37_79b9_7f4a_7c15)
}

/// A source seeded from the OS, or from the clock where /dev/urandom is unavailable
pub fn default_rng() -> WyRng {
    WyRng::seeded(seed_urandom().unwrap_or_else(|_| seed_clock()))
}
