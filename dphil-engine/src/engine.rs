// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! The simulation driver.
//!
//! The [Engine] owns the utensil table. A run seats one actor thread per
//! seat, lets them dine for the configured duration, raises the stop flag,
//! joins every actor and then builds the [Report] from the metrics.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use dphil_resources::ActorId;
use dphil_resources::utensil::UtensilTable;
use dphil_track::Tracker;
use dphil_track::entity::{Entity, toplevel};
use dphil_track::tracker::stdout_tracker;
use dphil_track::{error, info};

use crate::actor::{Actor, Table};
use crate::metrics::Metrics;
use crate::report::Report;
use crate::stop::StopFlag;
use crate::time::{Clock, HoldTimes};
use crate::types::{SharedStrategy, SimError, SimResult};

/// How often the driver wakes up to report progress while actors dine.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Number of actors, and so of utensils.
    pub actor_count: usize,

    /// Length of the run in ticks.
    pub run_duration: u64,

    /// Wall-clock length of one tick.
    pub time_unit: Duration,

    /// Think and eat holds are drawn from `[min_hold, max_hold]` ticks.
    pub min_hold: u64,
    pub max_hold: u64,

    /// Seed for the hold times. Drawn from entropy when `None`.
    pub seed: Option<u64>,

    /// Optional cap on the number of meals each actor eats.
    pub meal_limit: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            actor_count: 5,
            run_duration: 100,
            time_unit: Duration::from_secs(1),
            min_hold: 1,
            max_hold: 3,
            seed: None,
            meal_limit: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> SimResult {
        if self.actor_count < 2 {
            return Err(SimError(format!(
                "At least 2 actors are needed, {} requested",
                self.actor_count
            )));
        }
        if self.min_hold > self.max_hold {
            return Err(SimError(format!(
                "Minimum hold {} is above maximum hold {}",
                self.min_hold, self.max_hold
            )));
        }
        Ok(())
    }
}

pub struct Engine {
    config: SimulationConfig,
    toplevel: Arc<Entity>,
    tracker: Tracker,
    utensils: Arc<UtensilTable>,
}

impl Engine {
    /// Create an engine and lay the table.
    pub fn new(tracker: &Tracker, config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        let toplevel = toplevel(tracker, "dphil");
        let utensils = Arc::new(UtensilTable::new(config.actor_count));
        Ok(Self {
            config,
            toplevel,
            tracker: tracker.clone(),
            utensils,
        })
    }

    #[must_use]
    pub fn top(&self) -> &Arc<Entity> {
        &self.toplevel
    }

    #[must_use]
    pub fn tracker(&self) -> Tracker {
        self.tracker.clone()
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        Clock::new(self.config.time_unit)
    }

    /// The utensils that strategies arbitrate over.
    #[must_use]
    pub fn utensils(&self) -> &Arc<UtensilTable> {
        &self.utensils
    }

    /// Wall-clock length of the run.
    #[must_use]
    pub fn run_for(&self) -> Duration {
        self.clock().ticks(self.config.run_duration)
    }

    pub fn run(&self, strategy: SharedStrategy) -> Result<Report, SimError> {
        self.run_with_progress(strategy, |_| {})
    }

    /// Run the simulation, calling `progress` with the elapsed time every
    /// so often while the actors dine.
    ///
    /// Any error from an actor stops the whole run. Every actor is still
    /// joined and the first error recorded is returned.
    pub fn run_with_progress<F>(
        &self,
        strategy: SharedStrategy,
        mut progress: F,
    ) -> Result<Report, SimError>
    where
        F: FnMut(Duration),
    {
        let num_actors = self.config.actor_count;
        let run_for = self.run_for();
        let table = Table {
            utensils: self.utensils.clone(),
            metrics: Arc::new(Metrics::new(num_actors)),
            stop: StopFlag::new(),
            clock: self.clock(),
        };

        info!(self.toplevel ; "Seating {} actors using {} for {:?}", num_actors, strategy.name(), run_for);

        let start = Instant::now();
        let (done_tx, done_rx) = mpsc::channel();
        let mut handles = Vec::with_capacity(num_actors);
        for i in 0..num_actors {
            let id = ActorId(i);
            let holds = HoldTimes::new(
                self.config.min_hold,
                self.config.max_hold,
                self.config.seed,
                id,
            );
            let mut actor = Actor::new(
                &self.toplevel,
                id,
                strategy.clone(),
                table.clone(),
                holds,
                self.config.meal_limit,
            );
            let stop = table.stop.clone();
            let done_tx = done_tx.clone();
            let spawned = thread::Builder::new()
                .name(format!("actor{i}"))
                .spawn(move || {
                    let result = panic::catch_unwind(AssertUnwindSafe(|| actor.run()))
                        .unwrap_or_else(|_| Err(SimError(format!("Actor {id} panicked"))));
                    if let Err(e) = &result {
                        error!(actor.entity ; "{}", e);
                        stop.fail(e);
                    }
                    // The driver may already have stopped listening
                    let _ = done_tx.send(id);
                    result
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    table.stop.raise();
                    join_all(handles)?;
                    return Err(SimError(format!("Failed to start actor {i}: {e}")));
                }
            }
        }
        drop(done_tx);

        let mut num_done = 0;
        loop {
            let elapsed = start.elapsed();
            progress(elapsed);
            if elapsed >= run_for || num_done == num_actors || table.stop.is_raised() {
                break;
            }
            match done_rx.recv_timeout((run_for - elapsed).min(PROGRESS_INTERVAL)) {
                Ok(_) => num_done += 1,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        info!(self.toplevel ; "Raising the stop flag after {:?}", start.elapsed());
        table.stop.raise();
        let joined = join_all(handles);
        if let Some(e) = table.stop.failure() {
            return Err(e.clone());
        }
        joined?;
        let elapsed = start.elapsed();
        info!(self.toplevel ; "Joined {} actors after {:?}", num_actors, elapsed);

        let held = self.utensils.held()?;
        if let Some((utensil, actor)) = held.first() {
            return Err(SimError(format!(
                "Utensil {utensil} still held by actor {actor} after all actors left"
            )));
        }

        table
            .metrics
            .report(strategy.name(), elapsed, strategy.peak_admitted())
    }
}

/// Join every actor, returning the first error in actor order.
///
/// Only used when no failure was recorded on the stop flag.
fn join_all(handles: Vec<JoinHandle<SimResult>>) -> SimResult {
    let mut first_error = None;
    for (i, handle) in handles.into_iter().enumerate() {
        let result = match handle.join() {
            Ok(result) => result,
            Err(_) => Err(SimError(format!("Actor {i} panicked"))),
        };
        if let Err(e) = result {
            first_error.get_or_insert(e);
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Create a default engine that sends [`Track`](dphil_track::Track) events to
/// stdout.
impl Default for Engine {
    fn default() -> Self {
        let tracker = stdout_tracker(log::Level::Info);
        let toplevel = toplevel(&tracker, "dphil");
        let config = SimulationConfig::default();
        let utensils = Arc::new(UtensilTable::new(config.actor_count));
        Self {
            config,
            toplevel,
            tracker,
            utensils,
        }
    }
}
