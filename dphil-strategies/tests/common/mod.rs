// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use dphil_engine::engine::{Engine, SimulationConfig};
use dphil_engine::report::Report;
use dphil_engine::run_simulation;
use dphil_resources::ActorId;
use dphil_strategies::{StrategyKind, build_strategy};
use dphil_track::Tracker;

/// Run `f` on its own thread and fail the test if it has not finished within
/// `timeout`, which is how a deadlocked table shows up.
pub fn with_watchdog<T, F>(timeout: Duration, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    match rx.recv_timeout(timeout) {
        Ok(value) => value,
        Err(RecvTimeoutError::Timeout) => panic!("Not finished after {timeout:?}, deadlock?"),
        Err(RecvTimeoutError::Disconnected) => panic!("Trial panicked"),
    }
}

/// Run one complete simulation and check that every utensil was put back.
pub fn run_trial(tracker: &Tracker, kind: StrategyKind, config: SimulationConfig) -> Report {
    let engine = Engine::new(tracker, config).unwrap();
    let strategy = build_strategy(kind, &engine, ActorId(0)).unwrap();
    let report = run_simulation!(engine, strategy);
    assert!(engine.utensils().is_clear().unwrap());
    report
}

/// A configuration where actors barely pause between grabbing utensils, so
/// every run is a burst of contention. Each actor stops after a few meals.
pub fn contended_config(actor_count: usize, seed: u64) -> SimulationConfig {
    SimulationConfig {
        actor_count,
        run_duration: u64::MAX,
        time_unit: Duration::from_nanos(1),
        min_hold: 0,
        max_hold: 1,
        seed: Some(seed),
        meal_limit: Some(5),
    }
}
