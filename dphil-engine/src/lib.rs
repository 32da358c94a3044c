// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! `DPHIL` - the dining philosophers arbitration simulator
//!
//! This library provides the core of the [DPHIL Engine](crate::engine) which
//! seats a number of actors around a table of shared utensils and lets them
//! think and eat on their own threads. How a hungry actor gains its two
//! utensils is decided by a pluggable [strategy](crate::traits::Strategy),
//! see the `dphil-strategies` crate for the available ones.
//!
//! While the actors dine the [metrics](crate::metrics) collect how long each
//! of them spends thinking, eating and blocked. Once the run is over these
//! are turned into a [report](crate::report::Report).
//!
//! # Simple Application
//!
//! A very simple application would look like:
//!
//! ```rust
//! use std::time::Duration;
//!
//! use dphil_engine::engine::{Engine, SimulationConfig};
//! use dphil_engine::run_simulation;
//! use dphil_resources::ActorId;
//! use dphil_strategies::{StrategyKind, build_strategy};
//! use dphil_track::tracker::dev_null_tracker;
//!
//! let config = SimulationConfig {
//!     run_duration: 50,
//!     time_unit: Duration::from_millis(1),
//!     ..SimulationConfig::default()
//! };
//! let engine = Engine::new(&dev_null_tracker(), config).unwrap();
//! let footman = build_strategy(StrategyKind::Footman, &engine, ActorId(0)).unwrap();
//! let report = run_simulation!(engine, footman);
//! assert!(report.peak_eaters <= 2);
//! ```

pub mod actor;
pub mod engine;
pub mod metrics;
pub mod report;
pub mod stop;
pub mod test_helpers;
pub mod time;
pub mod traits;
pub mod types;

#[macro_export]
/// Run the simulation with a strategy and return the report.
macro_rules! run_simulation {
    ($engine:ident, $strategy:expr) => {
        $engine.run($strategy).unwrap()
    };
    ($engine:ident, $strategy:expr, $expect:expr) => {
        match $engine.run($strategy) {
            Ok(_) => panic!("Expected an error!"),
            Err(e) => assert_eq!(format!("{e}").as_str(), $expect),
        }
    };
}
