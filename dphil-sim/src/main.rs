// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! A front-end for running the dining philosophers simulator
//!
//! For example, run using:
//!   cargo run --bin dphil-sim -- --strategy leftie --actor-count 7
//! --time-unit-ms 10 --stdout-level debug

use std::fmt::Display;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use dphil_engine::engine::Engine;
use dphil_engine::report::Report;
use dphil_sim::config::{Config, RunConfig};
use dphil_strategies::build_strategy;
use dphil_track::Tracker;
use dphil_track::builder::setup_trackers;
use indicatif::ProgressBar;

/// Exit status used when the configuration is rejected.
const CONFIG_ERROR_EXIT: u8 = 2;

fn config_error(e: impl Display) -> ExitCode {
    eprintln!("{e}");
    ExitCode::from(CONFIG_ERROR_EXIT)
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn run(run_config: RunConfig, tracker: &Tracker) -> Result<Report> {
    let engine = Engine::new(tracker, run_config.simulation)?;
    let strategy = build_strategy(run_config.strategy, &engine, run_config.leftie)?;

    let report = if run_config.progress {
        let run_for_ms = millis(engine.run_for());
        let progress_bar = ProgressBar::new(run_for_ms);
        let report = engine.run_with_progress(strategy, |elapsed| {
            progress_bar.set_position(millis(elapsed).min(run_for_ms));
        });
        progress_bar.finish_and_clear();
        report?
    } else {
        engine.run(strategy)?
    };
    Ok(report)
}

fn main() -> ExitCode {
    let config = match Config::parse_all_sources() {
        Ok(config) => config,
        Err(e) => return config_error(e),
    };
    let run_config = match config.run_config() {
        Ok(run_config) => run_config,
        Err(e) => return config_error(e),
    };
    let tracker = match setup_trackers(&config.trackers_config()) {
        Ok(tracker) => tracker,
        Err(e) => return config_error(e),
    };

    let result = run(run_config, &tracker);
    tracker.shutdown();

    match result {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
