#![allow(mixed_script_confusables)]
#![allow(confusable_idents)]

mod macros;

pub mod agent;
pub mod climb;
pub mod coevolve;
pub mod config;
pub mod constants;
pub mod environment;
pub mod eval;
pub mod fitness;
pub mod network;
pub mod random;
pub mod scenario;

pub use agent::{Agent, Human, NetworkAgent, RandomAgent, Scripted};
pub use climb::HillClimb;
pub use coevolve::Coevolution;
pub use config::{CoevolutionConfig, ConfigError, HillClimbConfig};
pub use environment::{Battle, Connect4, Environment, MatchResult, Outcome};
pub use network::{activate, Network, Topology};
pub use random::{MutationRate, Span, WyRng};
pub use scenario::{EvolutionHooks, Hook, Trainer};
