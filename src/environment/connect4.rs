//! Connect four on an 8x8 board. Discs drop to the lowest free cell of a column, four in a row
//! in any direction wins.

use super::{Environment, MatchResult, Outcome};
use crate::agent::Agent;
use core::fmt;
use serde::Serialize;

pub const WIDTH: usize = 8;
pub const HEIGHT: usize = 8;
const LINE: usize = 4;

/// (dx, dy) of every line direction, scanning away from the line's first cell
const DIRECTIONS: [(isize, isize); 4] = [(1, 1), (1, -1), (1, 0), (0, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Disc {
    /// Moves first
    Red,
    Black,
}

impl fmt::Display for Disc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disc::Red => write!(f, "Red"),
            Disc::Black => write!(f, "Black"),
        }
    }
}

enum Turn {
    Stalled,
    Placed,
    Won,
}

/// Rows run top (`y = 0`) to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connect4 {
    cells: [[Option<Disc>; WIDTH]; HEIGHT],
    size: usize,
}

impl Default for Connect4 {
    fn default() -> Self {
        Self {
            cells: [[None; WIDTH]; HEIGHT],
            size: 0,
        }
    }
}

impl Connect4 {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> Option<Disc> {
        self.cells[y][x]
    }

    /// Discs on the board
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Drop `disc` into column `x`. False if the column doesn't exist or is full.
    pub fn add(&mut self, disc: Disc, x: usize) -> bool {
        if x >= WIDTH {
            return false;
        }
        let top = (0..HEIGHT)
            .find(|&y| self.cells[y][x].is_some())
            .unwrap_or(HEIGHT);
        if top == 0 {
            return false;
        }
        self.cells[top - 1][x] = Some(disc);
        self.size += 1;
        true
    }

    fn turn(&mut self, disc: Disc, agent: &mut dyn Agent<Self>) -> Turn {
        let placed = agent
            .decide(self, disc)
            .is_some_and(|x| self.add(disc, x));
        if !placed {
            Turn::Stalled
        } else if self.won() == Some(disc) {
            Turn::Won
        } else {
            Turn::Placed
        }
    }

    /// The colour holding a line of four, Red checked first. A full board has no winner.
    pub fn won(&self) -> Option<Disc> {
        if self.size == WIDTH * HEIGHT {
            return None;
        }
        [Disc::Red, Disc::Black]
            .into_iter()
            .find(|&disc| self.has_line(disc))
    }

    fn has_line(&self, disc: Disc) -> bool {
        (0..HEIGHT).any(|y| {
            (0..WIDTH).any(|x| {
                DIRECTIONS
                    .iter()
                    .any(|&(dx, dy)| self.line_from(disc, x, y, dx, dy))
            })
        })
    }

    fn line_from(&self, disc: Disc, x: usize, y: usize, dx: isize, dy: isize) -> bool {
        (0..LINE as isize).all(|step| {
            let cx = x as isize + dx * step;
            let cy = y as isize + dy * step;
            (0..WIDTH as isize).contains(&cx)
                && (0..HEIGHT as isize).contains(&cy)
                && self.cells[cy as usize][cx as usize] == Some(disc)
        })
    }
}

impl fmt::Display for Connect4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in 1..=WIDTH {
            write!(f, "{x}")?;
        }
        writeln!(f)?;
        for row in &self.cells {
            for cell in row {
                let c = match cell {
                    Some(Disc::Red) => 'X',
                    Some(Disc::Black) => 'O',
                    None => '-',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Environment for Connect4 {
    type Side = Disc;
    type Action = usize;

    const NAME: &'static str = "connect4";
    const SIDES: [Disc; 2] = [Disc::Red, Disc::Black];
    const OBSERVATION: usize = WIDTH * HEIGHT;
    const ACTIONS: usize = WIDTH;

    fn action(idx: usize) -> usize {
        idx
    }

    fn label(action: usize) -> String {
        format!("column {}", action + 1)
    }

    /// Row-major cells: 0 empty, 1 own disc, 2 the opponent's
    fn encode(&self, side: Disc, out: &mut [f64]) {
        let cells = self.cells.iter().flatten();
        for (slot, cell) in out.iter_mut().zip(cells) {
            *slot = match cell {
                None => 0.,
                Some(disc) if *disc == side => 1.,
                Some(_) => 2.,
            };
        }
    }

    fn legal(&self, action: usize, _: Disc) -> bool {
        action < WIDTH && self.cells[0][action].is_none()
    }

    fn render(&self, side: Disc) -> String {
        let mark = match side {
            Disc::Red => 'X',
            Disc::Black => 'O',
        };
        format!("{self}you are {side} ({mark})")
    }

    /// Red and Black alternate, every placement attempt counting as a move. A round in which
    /// neither side manages to place a disc is a draw.
    fn play_match(
        &mut self,
        first: &mut dyn Agent<Self>,
        second: &mut dyn Agent<Self>,
    ) -> MatchResult {
        self.reset();
        let mut moves = 0;
        loop {
            let mut stalled = 0;
            moves += 1;
            match self.turn(Disc::Red, first) {
                Turn::Stalled => stalled += 1,
                Turn::Won => return MatchResult::new(Outcome::First, moves),
                Turn::Placed => {}
            }
            moves += 1;
            match self.turn(Disc::Black, second) {
                Turn::Stalled => stalled += 1,
                Turn::Won => return MatchResult::new(Outcome::Second, moves),
                Turn::Placed => {}
            }
            if stalled == 2 {
                return MatchResult::new(Outcome::Draw, moves);
            }
        }
    }
}
