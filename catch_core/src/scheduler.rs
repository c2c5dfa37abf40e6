//! Fixed-rate cooperative scheduler.
//!
//! One base tick drives five periodic tasks. A task is due when the tick
//! counter is a multiple of its period; due tasks always run in `Task::ORDER`.

use crate::config::TaskRates;
use crate::util::{period_ticks, period_us};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Input,
    Link,
    Motion,
    Render,
    Tone,
}

impl Task {
    pub const ORDER: [Task; 5] = [
        Task::Input,
        Task::Link,
        Task::Motion,
        Task::Render,
        Task::Tone,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Task::Input => "input",
            Task::Link => "link",
            Task::Motion => "motion",
            Task::Render => "render",
            Task::Tone => "tone",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    periods: [u64; 5],
    tick_us: u64,
    tick: u64,
}

impl Scheduler {
    pub fn new(rates: &TaskRates) -> Self {
        let base = rates.base_hz;
        Self {
            periods: [
                period_ticks(base, rates.input_hz),
                period_ticks(base, rates.link_hz),
                period_ticks(base, rates.motion_hz),
                period_ticks(base, rates.render_hz),
                period_ticks(base, rates.tone_hz),
            ],
            tick_us: period_us(base),
            tick: 0,
        }
    }

    /// Base ticks between runs of `task`.
    pub fn period(&self, task: Task) -> u64 {
        self.periods[task.slot()]
    }

    /// Length of one base tick in microseconds.
    pub fn tick_us(&self) -> u64 {
        self.tick_us
    }

    /// Index of the tick about to run.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_due(&self, task: Task) -> bool {
        self.tick % self.period(task) == 0
    }

    /// Tasks due on the current tick, in run order.
    pub fn due(&self) -> impl Iterator<Item = Task> + '_ {
        Task::ORDER.into_iter().filter(|&t| self.is_due(t))
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }
}
