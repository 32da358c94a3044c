// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{contended_config, run_trial, with_watchdog};
use dphil_engine::engine::Engine;
use dphil_engine::test_helpers::{start_test, test_config};
use dphil_engine::traits::Strategy;
use dphil_resources::{ActorId, UtensilId};
use dphil_strategies::StrategyKind;
use dphil_strategies::footman::Footman;
use dphil_track::test_helpers::create_tracker;
use dphil_track::tracker::dev_null_tracker;

#[test]
fn at_most_four_of_five_admitted() {
    let tracker = create_tracker(file!());
    let report = with_watchdog(Duration::from_secs(30), move || {
        run_trial(&tracker, StrategyKind::Footman, test_config(5, 200))
    });

    assert_eq!(report.strategy, "footman");
    let peak_admitted = report.peak_admitted.unwrap();
    assert!(peak_admitted >= 1);
    assert!(peak_admitted <= 4);
    assert!(report.peak_eaters <= 4);
    assert!(report.peak_eaters <= 2);
    for actor in &report.actors {
        assert!(actor.stats.meals > 0, "{actor}");
        assert!(actor.eat_pct > 0.0, "{actor}");
    }
}

#[test]
fn same_order_for_every_actor() {
    let engine = start_test(file!(), test_config(5, 1));
    let footman = Footman::new(engine.top(), "footman", engine.utensils()).unwrap();

    assert_eq!(footman.gate().capacity(), 4);
    for i in 0..5 {
        assert_eq!(
            footman.acquisition_order(ActorId(i)),
            [UtensilId(i), UtensilId((i + 1) % 5)]
        );
    }
}

#[test]
fn two_actors_take_turns() {
    let engine = Engine::new(&dev_null_tracker(), test_config(2, 100)).unwrap();
    let footman = Arc::new(Footman::new(engine.top(), "footman", engine.utensils()).unwrap());
    let report = engine.run(footman.clone()).unwrap();

    assert_eq!(footman.gate().capacity(), 1);
    assert_eq!(report.peak_admitted, Some(1));
    assert_eq!(report.peak_eaters, 1);
    assert_eq!(footman.gate().count(), 0);
}

#[test]
fn no_deadlock_under_contention() {
    with_watchdog(Duration::from_secs(120), || {
        let tracker = dev_null_tracker();
        for seed in 0..2_000 {
            let report = run_trial(&tracker, StrategyKind::Footman, contended_config(5, seed));
            assert_eq!(report.total_meals(), 25);
            assert!(report.peak_admitted.unwrap() <= 4);
        }
    });
}
