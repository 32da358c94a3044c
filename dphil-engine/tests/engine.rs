// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use approx::assert_relative_eq;
use common::{DoublePickup, Tantrum};
use dphil_engine::engine::{Engine, SimulationConfig};
use dphil_engine::report::percent;
use dphil_engine::run_simulation;
use dphil_engine::test_helpers::{start_test, test_config};
use dphil_resources::ActorId;
use dphil_strategies::{StrategyKind, build_strategy};
use dphil_track::Tracker;
use dphil_track::tracker::{EntityLevels, InMemoryTracker};
use regex::Regex;

#[test]
fn footman_report() {
    let engine = start_test(file!(), test_config(5, 200));
    let footman = build_strategy(StrategyKind::Footman, &engine, ActorId(0)).unwrap();
    let report = run_simulation!(engine, footman);

    assert_eq!(report.strategy, "footman");
    assert_eq!(report.actors.len(), 5);
    assert!(report.elapsed >= engine.run_for());
    assert!(report.peak_eaters >= 1);
    assert!(report.peak_eaters <= 2);
    assert!(report.peak_admitted.unwrap() <= 4);

    // Time outside every state is the thread start up plus the tail after an
    // actor leaves while the others finish their last think, wait and meal.
    let slack = engine.clock().ticks(6 * engine.config().max_hold) + Duration::from_millis(20);

    for actor in &report.actors {
        assert!(actor.stats.meals > 0, "{actor}");
        assert!(actor.eat_pct > 0.0, "{actor}");

        // Every moment an actor is seated is spent in exactly one state
        assert!(actor.accounted() <= report.elapsed, "{actor}");
        assert!(
            actor.accounted() + slack >= report.elapsed,
            "{actor}: {:?} of {:?} accounted",
            actor.accounted(),
            report.elapsed
        );
        assert_relative_eq!(
            actor.eat_pct + actor.think_pct + actor.block_pct,
            percent(actor.accounted(), report.elapsed),
            epsilon = 1e-6
        );
    }

    assert!(engine.utensils().is_clear().unwrap());
}

#[test]
fn meal_limit_ends_run_early() {
    let config = SimulationConfig {
        meal_limit: Some(3),
        ..test_config(4, 10_000)
    };
    let engine = start_test(file!(), config);
    let leftie = build_strategy(StrategyKind::Leftie, &engine, ActorId(0)).unwrap();
    let report = run_simulation!(engine, leftie);

    assert!(report.elapsed < engine.run_for());
    for actor in &report.actors {
        assert_eq!(actor.stats.meals, 3);
    }
    assert_eq!(report.total_meals(), 12);
}

#[test]
fn double_pickup_is_fatal() {
    let engine = start_test(file!(), test_config(2, 1_000));
    let strategy = Arc::new(DoublePickup::new(engine.utensils(), ActorId(0)));
    run_simulation!(
        engine,
        strategy,
        "Error: Actor 0 picked up utensil 0 which it already holds"
    );
}

#[test]
fn violation_reported_ahead_of_its_consequences() {
    // Neighbours of the culprit go on to trip over the utensil it never put
    // down, but the culprit's own violation is the one reported.
    for seed in 0..20 {
        let config = SimulationConfig {
            seed: Some(seed),
            ..test_config(3, 1_000)
        };
        let engine = start_test(file!(), config);
        let strategy = Arc::new(DoublePickup::new(engine.utensils(), ActorId(2)));
        let err = engine.run(strategy).err().unwrap();
        assert_eq!(
            err.to_string(),
            "Error: Actor 2 picked up utensil 2 which it already holds",
            "seed {seed}"
        );
    }
}

#[test]
fn panicking_actor_is_reported() {
    let engine = start_test(file!(), test_config(3, 50));
    let strategy = Arc::new(Tantrum {
        culprit: ActorId(1),
        utensils: engine.utensils().clone(),
        lock: Mutex::new(()),
    });
    run_simulation!(engine, strategy, "Error: Actor 1 panicked");
}

#[test]
fn actors_log_each_transition() {
    let in_memory = Arc::new(InMemoryTracker::new(EntityLevels::new(log::Level::Debug)));
    let tracker: Tracker = in_memory.clone();
    let config = SimulationConfig {
        meal_limit: Some(2),
        ..test_config(2, 10_000)
    };
    let engine = Engine::new(&tracker, config).unwrap();
    let table_lock = build_strategy(StrategyKind::TableLock, &engine, ActorId(0)).unwrap();
    run_simulation!(engine, table_lock);

    let count = |re: &str| in_memory.count_matching(&Regex::new(re).unwrap());
    assert_eq!(count(r"^Actor \d is thinking for \d+ms$"), 4);
    assert_eq!(count(r"^Actor \d is hungry after thinking for \d+ms$"), 4);
    assert_eq!(count(r"^Actor \d is eating for \d+ms after waiting "), 4);
    assert_eq!(count(r"^Actor \d stopped eating$"), 4);
    assert_eq!(count(r"^Actor \d leaving the table after 2 meals$"), 2);
    assert_eq!(count(r"^Seating 2 actors using table-lock for 10s$"), 1);

    let actor1 = in_memory.id_for_name("dphil::actor1").unwrap();
    let messages = in_memory.messages_for(actor1);
    assert!(messages[0].starts_with("Actor 1 is thinking for"));
    assert_eq!(messages.last().unwrap(), "Actor 1 leaving the table after 2 meals");
}

#[test]
fn invalid_config() {
    let tracker = dphil_track::tracker::dev_null_tracker();
    let err = Engine::new(&tracker, test_config(1, 10)).err().unwrap();
    assert_eq!(err.to_string(), "Error: At least 2 actors are needed, 1 requested");

    let config = SimulationConfig {
        min_hold: 4,
        max_hold: 2,
        ..test_config(5, 10)
    };
    let err = Engine::new(&tracker, config).err().unwrap();
    assert_eq!(
        err.to_string(),
        "Error: Minimum hold 4 is above maximum hold 2"
    );
}

#[test]
fn default_engine() {
    let engine = Engine::default();
    assert_eq!(engine.config().actor_count, 5);
    assert_eq!(engine.utensils().len(), 5);
    assert_eq!(engine.run_for(), Duration::from_secs(100));
}
