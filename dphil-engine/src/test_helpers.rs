// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

use std::time::Duration;

use dphil_track::test_helpers::create_tracker;

use crate::engine::{Engine, SimulationConfig};

/// A configuration with millisecond ticks and a fixed seed so that tests run
/// quickly and repeatably.
#[must_use]
pub fn test_config(actor_count: usize, run_duration: u64) -> SimulationConfig {
    SimulationConfig {
        actor_count,
        run_duration,
        time_unit: Duration::from_millis(1),
        seed: Some(1),
        ..SimulationConfig::default()
    }
}

#[must_use]
pub fn start_test(full_filepath: &str, config: SimulationConfig) -> Engine {
    Engine::new(&create_tracker(full_filepath), config).unwrap()
}
