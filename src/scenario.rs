use crate::network::Network;
use core::ops::ControlFlow;
use serde::Serialize;

/// Called with every generation's report. Breaking stops the run after that generation.
pub type Hook<R> = Box<dyn FnMut(&R) -> ControlFlow<()>>;

pub struct EvolutionHooks<R> {
    hooks: Vec<Hook<R>>,
}

impl<R> EvolutionHooks<R> {
    pub fn new(hooks: Vec<Hook<R>>) -> Self {
        Self { hooks }
    }

    pub fn push(&mut self, hook: Hook<R>) {
        self.hooks.push(hook);
    }

    /// Run every hook on `report`, even if an earlier one breaks
    pub fn fire(&mut self, report: &R) -> ControlFlow<()> {
        let mut flow = ControlFlow::Continue(());
        for hook in self.hooks.iter_mut() {
            if hook(report).is_break() {
                flow = ControlFlow::Break(());
            }
        }
        flow
    }
}

impl<R> Default for EvolutionHooks<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

pub trait Report: Serialize {
    /// Whether this generation's challenger was kept
    fn accepted(&self) -> bool;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub generations: usize,
    pub accepted: usize,
    pub stopped_early: bool,
}

pub trait Trainer {
    type Report: Report;

    /// Generations a full run lasts
    fn generations(&self) -> usize;

    /// Run one generation
    fn step(&mut self) -> Self::Report;

    /// The network to play against once training ends
    fn champion(&self) -> &Network;

    fn run(&mut self, hooks: &mut EvolutionHooks<Self::Report>) -> Summary {
        let mut summary = Summary::default();
        for _ in 0..self.generations() {
            let report = self.step();
            summary.generations += 1;
            if report.accepted() {
                summary.accepted += 1;
            }
            if hooks.fire(&report).is_break() {
                summary.stopped_early = true;
                break;
            }
        }
        summary
    }
}
