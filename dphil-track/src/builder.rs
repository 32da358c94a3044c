// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Build the trackers of a run from the user's configuration.
//!
//! A run logs to the console, to a file, or to both. Each output has its own
//! level and entity filter.

use std::fmt;
use std::fs;
use std::io::{self, BufWriter, LineWriter};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::tracker::{EntityLevels, TextTracker, Track, TrackConfigError};
use crate::{Id, Tracker, Writer};

/// Settings for one output.
pub struct TrackerConfig<'a> {
    /// Whether this output is used at all.
    pub enable: bool,

    /// Highest level written for the entities selected by `filter_regex`.
    pub level: log::Level,

    /// Entity paths to apply `level` to. When empty `level` applies to every
    /// entity. Otherwise the other entities only report errors.
    pub filter_regex: &'a str,

    /// File to write to, for the log file output.
    pub file: Option<&'a str>,
}

impl Default for TrackerConfig<'_> {
    fn default() -> Self {
        Self {
            enable: true,
            level: log::Level::Warn,
            filter_regex: "",
            file: None,
        }
    }
}

/// Settings for every output of a run.
pub struct TrackersConfig<'a> {
    /// The console.
    pub stdout: TrackerConfig<'a>,

    /// The text log file.
    pub log_file: TrackerConfig<'a>,
}

fn entity_levels(config: &TrackerConfig) -> Result<EntityLevels, TrackConfigError> {
    if config.filter_regex.is_empty() {
        Ok(EntityLevels::new(config.level))
    } else {
        EntityLevels::new(log::Level::Error).with_filter(config.filter_regex, config.level)
    }
}

fn stdout_output(config: &TrackerConfig) -> Result<Tracker, TrackConfigError> {
    let writer: Writer = Box::new(LineWriter::new(io::stdout()));
    Ok(Arc::new(TextTracker::new(entity_levels(config)?, writer)))
}

fn file_output(config: &TrackerConfig) -> Result<Tracker, TrackConfigError> {
    let levels = entity_levels(config)?;
    let path = config
        .file
        .ok_or_else(|| TrackConfigError("A log file tracker requires a file name".to_string()))?;
    let file = fs::File::create(path)
        .map_err(|e| TrackConfigError(format!("Unable to create log file {path}: {e}")))?;
    let writer: Writer = Box::new(BufWriter::new(file));
    Ok(Arc::new(TextTracker::new(levels, writer)))
}

/// Sends every event to both the console and the log file.
///
/// Ids are handed out here so that an entity has the same id in both
/// outputs.
struct Tee {
    next_id: AtomicU64,
    outputs: [Tracker; 2],
}

impl Tee {
    fn new(console: Tracker, file: Tracker) -> Self {
        Self {
            next_id: AtomicU64::new(Id::FIRST.0),
            outputs: [console, file],
        }
    }

    fn enabled(&self, id: Id, level: log::Level) -> impl Iterator<Item = &Tracker> {
        self.outputs
            .iter()
            .filter(move |output| output.is_enabled(id, level))
    }
}

impl Track for Tee {
    fn unique_id(&self) -> Id {
        Id(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn is_enabled(&self, id: Id, level: log::Level) -> bool {
        self.enabled(id, level).next().is_some()
    }

    fn register(&self, id: Id, path: &str) {
        for output in &self.outputs {
            output.register(id, path);
        }
    }

    fn created(&self, parent: Id, id: Id, path: &str) {
        for output in self.enabled(id, log::Level::Trace) {
            output.created(parent, id, path);
        }
    }

    fn destroyed(&self, parent: Id, id: Id) {
        for output in self.enabled(id, log::Level::Trace) {
            output.destroyed(parent, id);
        }
    }

    fn log(&self, id: Id, level: log::Level, msg: fmt::Arguments) {
        for output in self.enabled(id, level) {
            output.log(id, level, msg);
        }
    }

    fn shutdown(&self) {
        for output in &self.outputs {
            output.shutdown();
        }
    }
}

/// Build the tracker for a run.
///
/// With both outputs disabled errors are still printed on the console.
pub fn setup_trackers(config: &TrackersConfig) -> Result<Tracker, TrackConfigError> {
    match (config.stdout.enable, config.log_file.enable) {
        (true, true) => Ok(Arc::new(Tee::new(
            stdout_output(&config.stdout)?,
            file_output(&config.log_file)?,
        ))),
        (true, false) => stdout_output(&config.stdout),
        (false, true) => file_output(&config.log_file),
        (false, false) => stdout_output(&TrackerConfig {
            level: log::Level::Error,
            ..TrackerConfig::default()
        }),
    }
}
