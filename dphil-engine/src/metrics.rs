// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Collects how each actor spends its time.
//!
//! All of the accumulators live behind a single lock which is only held for
//! the duration of an update, never while an actor sleeps.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use dphil_resources::ActorId;

use crate::report::{ActorReport, Report};
use crate::sim_error;
use crate::types::{SimError, SimResult};

/// Time spent by one actor in each state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActorStats {
    pub eat_time: Duration,
    pub think_time: Duration,
    pub block_time: Duration,
    pub meals: u64,

    /// Longest time spent hungry before a single meal.
    pub longest_wait: Duration,
}

struct MetricsState {
    actors: Vec<ActorStats>,

    // Number of actors eating right now
    eating_now: usize,

    // Highest value `eating_now` has reached
    peak_eating: usize,
}

impl MetricsState {
    fn actor(&mut self, actor: ActorId) -> Result<&mut ActorStats, SimError> {
        let num_actors = self.actors.len();
        self.actors
            .get_mut(actor.0)
            .ok_or_else(|| SimError(format!("Actor {actor} not in 0..{num_actors}")))
    }
}

pub struct Metrics {
    state: Mutex<MetricsState>,
}

impl Metrics {
    #[must_use]
    pub fn new(num_actors: usize) -> Self {
        Self {
            state: Mutex::new(MetricsState {
                actors: vec![ActorStats::default(); num_actors],
                eating_now: 0,
                peak_eating: 0,
            }),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, MetricsState>, SimError> {
        self.state
            .lock()
            .map_err(|_| SimError("Metrics lock poisoned by a panicking actor".to_string()))
    }

    pub fn record_think(&self, actor: ActorId, duration: Duration) -> SimResult {
        self.state()?.actor(actor)?.think_time += duration;
        Ok(())
    }

    /// Record the time an actor spent hungry before it could start eating.
    pub fn record_blocked(&self, actor: ActorId, duration: Duration) -> SimResult {
        let mut state = self.state()?;
        let stats = state.actor(actor)?;
        stats.block_time += duration;
        stats.longest_wait = stats.longest_wait.max(duration);
        Ok(())
    }

    /// Record a completed meal.
    pub fn record_eat(&self, actor: ActorId, duration: Duration) -> SimResult {
        let mut state = self.state()?;
        let stats = state.actor(actor)?;
        stats.eat_time += duration;
        stats.meals += 1;
        Ok(())
    }

    /// Called once an actor holds both of its utensils.
    pub fn start_eating(&self) -> SimResult {
        let mut state = self.state()?;
        state.eating_now += 1;
        state.peak_eating = state.peak_eating.max(state.eating_now);
        Ok(())
    }

    /// Called before an actor puts down its utensils.
    pub fn stop_eating(&self) -> SimResult {
        let mut state = self.state()?;
        if state.eating_now == 0 {
            return sim_error!("Actor stopped eating but no actor was eating");
        }
        state.eating_now -= 1;
        Ok(())
    }

    pub fn eating_now(&self) -> Result<usize, SimError> {
        Ok(self.state()?.eating_now)
    }

    pub fn peak_eating(&self) -> Result<usize, SimError> {
        Ok(self.state()?.peak_eating)
    }

    pub fn stats(&self, actor: ActorId) -> Result<ActorStats, SimError> {
        Ok(*self.state()?.actor(actor)?)
    }

    /// Build the final report once every actor has been joined.
    ///
    /// Percentages are of the total `elapsed` run time.
    pub fn report(
        &self,
        strategy: &str,
        elapsed: Duration,
        peak_admitted: Option<usize>,
    ) -> Result<Report, SimError> {
        let state = self.state()?;
        let actors = state
            .actors
            .iter()
            .enumerate()
            .map(|(i, stats)| ActorReport::new(ActorId(i), *stats, elapsed))
            .collect();
        Ok(Report {
            strategy: strategy.to_string(),
            elapsed,
            actors,
            peak_eaters: state.peak_eating,
            peak_admitted,
        })
    }
}
