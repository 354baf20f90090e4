#![allow(mixed_script_confusables)]
#![allow(confusable_idents)]

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use core::ops::ControlFlow;
use ladder::{
    activate,
    constants::*,
    environment::{Battle, Connect4, Environment, Outcome},
    fitness::{ModuloClassifier, VersusRandom},
    network::{Activation, Network, Topology},
    random::{default_rng, Span, WyRng},
    scenario::{EvolutionHooks, Hook, Report, Summary, Trainer},
    Coevolution, CoevolutionConfig, HillClimb, HillClimbConfig, Human, NetworkAgent,
};
use serde::Serialize;
use std::io;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,

    /// Seed for a reproducible run
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Evaluation threads, every core when left out
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Generations to train for
    #[arg(long, global = true)]
    generations: Option<usize>,

    /// Print every generation's report as a JSON line on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Log more, repeat for per-match tracing
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// sigmoid, steep_sigmoid or relu
    #[arg(long, global = true, default_value = "sigmoid")]
    activation: String,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Hill climb a classifier for multiples of four
    Classify(ClassifyArg),
    /// Train Connect4 players, then optionally play the champion
    Connect4(GameArg),
    /// Train battle players, then optionally play the champion
    Battle(GameArg),
}

#[derive(Debug, Clone, Args)]
struct ClassifyArg {
    /// Numbers classified per fitness evaluation
    #[arg(long, default_value_t = LADDER_CLIMB_TRIALS)]
    trials: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TrainerKind {
    /// Self-play against a rotating population
    Coevolve,
    /// Hill climb against a random player
    Climb,
}

#[derive(Debug, Clone, Args)]
struct GameArg {
    #[arg(long, value_enum, default_value_t = TrainerKind::Coevolve)]
    trainer: TrainerKind,

    /// Contenders in the coevolving population
    #[arg(long, default_value_t = LADDER_POPULATION)]
    population: usize,

    /// Fraction of the maximum score a challenger must beat, per game default when left out
    #[arg(long)]
    threshold: Option<f64>,

    /// Matches per fitness evaluation when hill climbing
    #[arg(long, default_value_t = 1000)]
    trials: usize,

    /// Rounds to play against the champion once training ends
    #[arg(long, default_value_t = 0)]
    play: usize,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn rng(seed: Option<u64>) -> WyRng {
    match seed {
        Some(seed) => WyRng::seeded(seed),
        None => default_rng(),
    }
}

fn print_json(value: &impl Serialize) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{line}"),
        Err(e) => warn!("could not serialize report: {e}"),
    }
}

fn json_lines<R: Report + 'static>() -> Hook<R> {
    Box::new(|report: &R| {
        print_json(report);
        ControlFlow::Continue(())
    })
}

/// Run `trainer` to completion, streaming reports when asked
fn train<T: Trainer>(trainer: &mut T, json: bool) -> Summary
where
    T::Report: 'static,
{
    let mut hooks = EvolutionHooks::default();
    if json {
        hooks.push(json_lines());
    }
    let summary = trainer.run(&mut hooks);
    info!(
        generations = summary.generations,
        accepted = summary.accepted,
        stopped_early = summary.stopped_early,
        "training finished"
    );
    if json {
        print_json(&summary);
    }
    summary
}

fn classify(args: &CommandArgs, arg: &ClassifyArg, σ: Activation) -> anyhow::Result<()> {
    let topology = Topology::new(LADDER_CLASSIFY_DEPTH, 32, 32, 1)?;
    let config = HillClimbConfig {
        generations: args.generations.unwrap_or(LADDER_CLIMB_GENERATIONS),
        trials: arg.trials,
        rate: topology.scaled_rate(LADDER_MUTATION_RATE)?,
        span: Span::unit(),
        σ,
        threads: args.threads,
    };
    let trials = config.trials;
    let mut climb = HillClimb::new(config, ModuloClassifier, topology, rng(args.seed))
        .context("setting up the classifier")?;
    train(&mut climb, args.json);
    info!(
        best_fitness = climb.best_fitness(),
        accuracy = climb.best_fitness() / trials as f64,
        "classifier trained"
    );
    Ok(())
}

fn game<E: Environment>(
    args: &CommandArgs,
    arg: &GameArg,
    depth: usize,
    preset: CoevolutionConfig,
    σ: Activation,
) -> anyhow::Result<()> {
    let topology = Topology::new(depth, E::OBSERVATION, E::OBSERVATION, E::ACTIONS)?;
    let rate = topology.scaled_rate(LADDER_MUTATION_RATE)?;
    let champion = match arg.trainer {
        TrainerKind::Coevolve => {
            let config = CoevolutionConfig {
                generations: args.generations.unwrap_or(LADDER_GENERATIONS),
                population: arg.population,
                rate,
                span: Span::unit(),
                σ,
                threshold: arg.threshold.unwrap_or(preset.threshold),
                threads: args.threads,
                ..preset
            };
            let mut coevolution = Coevolution::<E>::new(config, topology, rng(args.seed))
                .with_context(|| format!("setting up {} coevolution", E::NAME))?;
            train(&mut coevolution, args.json);
            coevolution.champion().clone()
        }
        TrainerKind::Climb => {
            let config = HillClimbConfig {
                generations: args.generations.unwrap_or(LADDER_CLIMB_GENERATIONS),
                trials: arg.trials,
                rate,
                span: Span::unit(),
                σ,
                threads: args.threads,
            };
            let mut climb =
                HillClimb::new(config, VersusRandom::<E>::default(), topology, rng(args.seed))
                    .with_context(|| format!("setting up {} hill climb", E::NAME))?;
            train(&mut climb, args.json);
            climb.champion().clone()
        }
    };
    play::<E>(&champion, σ, arg.play)
}

/// Alternate seats with the champion for `rounds` matches on the console
fn play<E: Environment>(champion: &Network, σ: Activation, rounds: usize) -> anyhow::Result<()> {
    if rounds == 0 {
        return Ok(());
    }
    let mut agent = NetworkAgent::new::<E>(champion, σ)?;
    let stdin = io::stdin();
    let mut human = Human::new(stdin.lock(), io::stdout());
    let mut env = E::default();
    for round in 0..rounds {
        let human_first = round % 2 == 0;
        println!(
            "Round {}: you move {}",
            round + 1,
            if human_first { "first" } else { "second" }
        );
        let result = if human_first {
            env.play_match(&mut human, &mut agent)
        } else {
            env.play_match(&mut agent, &mut human)
        };
        let outcome = if human_first {
            result.outcome
        } else {
            result.outcome.flip()
        };
        println!("{env}");
        match outcome {
            Outcome::First => println!("you won! ({} moves)", result.moves),
            Outcome::Second => println!("the network won! ({} moves)", result.moves),
            Outcome::Draw => println!("nobody won :( ({} moves)", result.moves),
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    let σ = activate::named(&args.activation)
        .with_context(|| format!("unknown activation `{}`", args.activation))?;
    info!(seed = ?args.seed, activation = %args.activation, "starting");

    match &args.mode {
        Mode::Classify(arg) => classify(&args, arg, σ),
        Mode::Connect4(arg) => game::<Connect4>(
            &args,
            arg,
            LADDER_CONNECT4_DEPTH,
            CoevolutionConfig::connect4(),
            σ,
        ),
        Mode::Battle(arg) => game::<Battle>(
            &args,
            arg,
            LADDER_BATTLE_DEPTH,
            CoevolutionConfig::battle(),
            σ,
        ),
    }
}
