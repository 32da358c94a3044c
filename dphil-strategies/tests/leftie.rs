// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{contended_config, run_trial, with_watchdog};
use dphil_engine::engine::{Engine, SimulationConfig};
use dphil_engine::test_helpers::{start_test, test_config};
use dphil_engine::traits::Strategy;
use dphil_resources::{ActorId, UtensilId};
use dphil_strategies::{StrategyKind, build_strategy};
use dphil_strategies::leftie::Leftie;
use dphil_track::test_helpers::create_tracker;
use dphil_track::Tracker;
use dphil_track::log::Level;
use dphil_track::tracker::{EntityLevels, InMemoryTracker, dev_null_tracker};
use itertools::Itertools;

#[test]
fn leftie_reverses_order() {
    let engine = start_test(file!(), test_config(5, 1));
    let leftie = Leftie::new(engine.top(), "leftie", engine.utensils(), ActorId(0));

    let orders = (0..5)
        .map(|i| leftie.acquisition_order(ActorId(i)))
        .collect_vec();
    assert_eq!(orders[0], [UtensilId(1), UtensilId(0)]);
    for (i, order) in orders.iter().enumerate().skip(1) {
        assert_eq!(*order, [UtensilId(i), UtensilId((i + 1) % 5)]);
        assert_ne!(*order, orders[0]);
    }

    // Only the leftie and the last actor, whose right utensil wraps around,
    // start with the higher numbered utensil
    assert_eq!(
        orders
            .iter()
            .filter(|[first, second]| first > second)
            .count(),
        2
    );
}

#[test]
fn any_actor_can_be_the_leftie() {
    let engine = start_test(file!(), test_config(5, 1));
    let leftie = Leftie::new(engine.top(), "leftie", engine.utensils(), ActorId(3));
    assert_eq!(leftie.leftie(), ActorId(3));
    assert_eq!(
        leftie.acquisition_order(ActorId(3)),
        [UtensilId(4), UtensilId(3)]
    );
    assert_eq!(
        leftie.acquisition_order(ActorId(0)),
        [UtensilId(0), UtensilId(1)]
    );
}

#[test]
fn actors_take_utensils_in_their_order() {
    let in_memory = Arc::new(InMemoryTracker::new(EntityLevels::new(Level::Trace)));
    let tracker: Tracker = in_memory.clone();
    let config = SimulationConfig {
        meal_limit: Some(3),
        ..test_config(5, 10_000)
    };
    let engine = Engine::new(&tracker, config).unwrap();
    let leftie = build_strategy(StrategyKind::Leftie, &engine, ActorId(0)).unwrap();
    let report = engine.run(leftie).unwrap();
    assert_eq!(report.total_meals(), 15);

    for i in 0..5 {
        let id = in_memory.id_for_name(&format!("dphil::actor{i}")).unwrap();
        let taken = in_memory
            .messages_for(id)
            .into_iter()
            .filter(|m| m.contains(" took utensil "))
            .collect_vec();
        assert_eq!(taken.len(), 6, "actor {i}: {taken:?}");

        let (first, second) = if i == 0 { (1, 0) } else { (i, (i + 1) % 5) };
        for meal in taken.chunks(2) {
            assert_eq!(
                meal,
                [
                    format!("Actor {i} took utensil {first}"),
                    format!("Actor {i} took utensil {second}"),
                ]
            );
        }
    }
}

#[test]
fn everyone_eats() {
    let tracker = create_tracker(file!());
    let report = with_watchdog(Duration::from_secs(30), move || {
        run_trial(&tracker, StrategyKind::Leftie, test_config(5, 200))
    });

    assert_eq!(report.strategy, "leftie");
    assert!(report.peak_eaters <= 2);
    for actor in &report.actors {
        assert!(actor.stats.meals > 0, "{actor}");
    }
}

#[test]
fn no_deadlock_in_ten_thousand_trials() {
    with_watchdog(Duration::from_secs(300), || {
        let tracker = dev_null_tracker();
        for seed in 0..10_000 {
            let report = run_trial(&tracker, StrategyKind::Leftie, contended_config(5, seed));
            assert_eq!(report.total_meals(), 25);
        }
    });
}
