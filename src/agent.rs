//! Things that pick moves.

use crate::{
    config::ConfigError,
    environment::Environment,
    network::{Activation, Network},
};
use rand::{seq::IndexedRandom, RngCore};
use std::io::{BufRead, Write};
use tracing::warn;

pub trait Agent<E: Environment> {
    /// The action to take from `side` in `env`, or [None] to forfeit the turn
    fn decide(&mut self, env: &E, side: E::Side) -> Option<E::Action>;
}

/// Plays by running a network over the encoded state and decoding its output
pub struct NetworkAgent<'a> {
    network: &'a Network,
    σ: Activation,
    observation: Vec<f64>,
}

impl<'a> NetworkAgent<'a> {
    /// An agent for game `E`. Fails if the network's widths don't match the game's.
    pub fn new<E: Environment>(network: &'a Network, σ: Activation) -> Result<Self, ConfigError> {
        E::check(network.topology())?;
        Ok(Self::trusted(network, σ))
    }

    /// Skip the width check, for networks whose topology was already checked against the game
    pub(crate) fn trusted(network: &'a Network, σ: Activation) -> Self {
        Self {
            network,
            σ,
            observation: vec![0.; network.topology().input()],
        }
    }
}

impl<E: Environment> Agent<E> for NetworkAgent<'_> {
    fn decide(&mut self, env: &E, side: E::Side) -> Option<E::Action> {
        env.encode(side, &mut self.observation);
        let output = self.network.forward(&self.observation, self.σ);
        env.decode(&output, side)
    }
}

/// Plays a uniformly random legal action
pub struct RandomAgent<R: RngCore> {
    rng: R,
}

impl<R: RngCore> RandomAgent<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<E: Environment, R: RngCore> Agent<E> for RandomAgent<R> {
    fn decide(&mut self, env: &E, side: E::Side) -> Option<E::Action> {
        let legal: Vec<E::Action> = (0..E::ACTIONS)
            .map(E::action)
            .filter(|&action| env.legal(action, side))
            .collect();
        legal.choose(&mut self.rng).copied()
    }
}

/// Plays whatever the closure says
pub struct Scripted<F>(pub F);

impl<E, F> Agent<E> for Scripted<F>
where
    E: Environment,
    F: FnMut(&E, E::Side) -> Option<E::Action>,
{
    fn decide(&mut self, env: &E, side: E::Side) -> Option<E::Action> {
        (self.0)(env, side)
    }
}

/// A person at a console. Shows the state and a numbered menu, then asks until the choice is
/// legal. End of input forfeits.
pub struct Human<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Human<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask<E: Environment>(&mut self, env: &E, side: E::Side) -> std::io::Result<Option<E::Action>> {
        writeln!(self.output, "{}", env.render(side))?;
        for idx in 0..E::ACTIONS {
            writeln!(self.output, "  {}. {}", idx + 1, E::label(E::action(idx)))?;
        }
        let mut line = String::new();
        loop {
            write!(self.output, "Choice: ")?;
            self.output.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let choice = line
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=E::ACTIONS).contains(n))
                .map(|n| E::action(n - 1))
                .filter(|&action| env.legal(action, side));
            match choice {
                Some(action) => return Ok(Some(action)),
                None => writeln!(self.output, "Invalid, try again.")?,
            }
        }
    }
}

impl<E: Environment, R: BufRead, W: Write> Agent<E> for Human<R, W> {
    fn decide(&mut self, env: &E, side: E::Side) -> Option<E::Action> {
        match self.ask(env, side) {
            Ok(action) => action,
            Err(e) => {
                warn!("console unavailable, forfeiting turn: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        environment::{
            battle::{self, Seat},
            connect4::{Disc, HEIGHT},
            Battle, Connect4, Outcome,
        },
        network::{activate, Topology},
        random::{Span, WyRng},
    };
    use std::io::Cursor;

    #[test]
    fn test_network_agent_widths() {
        let fits = Network::new(Topology::new(1, 64, 64, 8).unwrap());
        assert!(NetworkAgent::new::<Connect4>(&fits, activate::sigmoid).is_ok());
        assert!(NetworkAgent::new::<Battle>(&fits, activate::sigmoid).is_err());
        let battle = Network::new(Topology::new(1, 6, 6, 9).unwrap());
        assert!(NetworkAgent::new::<Battle>(&battle, activate::sigmoid).is_ok());
    }

    #[test]
    fn test_network_agent_legal() {
        let mut rng = WyRng::seeded(31);
        let network = Network::random(Topology::new(2, 64, 64, 8).unwrap(), &Span::unit(), &mut rng);
        let mut agent = NetworkAgent::new::<Connect4>(&network, activate::sigmoid).unwrap();
        let mut board = Connect4::default();
        for _ in 0..HEIGHT {
            board.add(Disc::Red, 0);
        }
        for _ in 0..100 {
            let column = agent.decide(&board, Disc::Black).unwrap();
            assert_ne!(column, 0);
        }
    }

    #[test]
    fn test_random_agent_legal() {
        let mut agent = RandomAgent::new(WyRng::seeded(2));
        let mut board = Connect4::default();
        for x in 1..8 {
            for _ in 0..HEIGHT {
                board.add(Disc::Red, x);
            }
        }
        for _ in 0..100 {
            assert_eq!(agent.decide(&board, Disc::Black), Some(0));
        }
        for _ in 0..HEIGHT {
            board.add(Disc::Black, 0);
        }
        assert_eq!(agent.decide(&board, Disc::Black), None);
    }

    #[test]
    fn test_human_retries() {
        let input = Cursor::new("nine\n0\n3\n");
        let mut human = Human::new(input, Vec::new());
        let board = Connect4::default();
        assert_eq!(human.decide(&board, Disc::Red), Some(2));
        let shown = String::from_utf8(human.output).unwrap();
        assert_eq!(shown.matches("Invalid, try again.").count(), 2);
        assert!(shown.contains("  8. column 8"));
    }

    #[test]
    fn test_human_rejects_illegal() {
        // heal is illegal at full health
        let input = Cursor::new("3\n4\n");
        let mut human = Human::new(input, Vec::new());
        let battle = Battle::default();
        assert_eq!(
            human.decide(&battle, Seat::One),
            Some(battle::Action::MinorDamage)
        );
    }

    #[test]
    fn test_human_eof_forfeits() {
        let mut human = Human::new(Cursor::new(""), Vec::new());
        let mut board = Connect4::default();
        let mut idle = Scripted(|_: &Connect4, _: Disc| None);
        let result = board.play_match(&mut human, &mut idle);
        assert_eq!(result.outcome, Outcome::Draw);
        assert_eq!(result.moves, 2);
    }
}
