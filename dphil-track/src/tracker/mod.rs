// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! The [`Track`] trait and the trackers that implement it.

pub mod dev_null;
pub mod in_memory;
pub mod text;

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

pub use dev_null::DevNullTracker;
pub use in_memory::InMemoryTracker;
use regex::Regex;
pub use text::TextTracker;

use crate::Id;

/// A tracker could not be built from its configuration.
#[derive(Debug)]
pub struct TrackConfigError(pub String);

impl fmt::Display for TrackConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TrackConfigError {}

/// Receives the events of every [`Entity`](crate::entity::Entity).
pub trait Track {
    /// Hand out an id no other entity of this run has.
    fn unique_id(&self) -> Id;

    /// Whether events of `level` from entity `id` are wanted.
    fn is_enabled(&self, id: Id, level: log::Level) -> bool;

    /// Learn the path of a new entity so its level can be looked up.
    fn register(&self, id: Id, path: &str);

    /// Entity `id` was created below `parent`.
    fn created(&self, parent: Id, id: Id, path: &str);

    /// Entity `id` below `parent` was dropped.
    fn destroyed(&self, parent: Id, id: Id);

    /// A message from entity `id`.
    fn log(&self, id: Id, level: log::Level, msg: fmt::Arguments);

    /// Flush anything still buffered.
    fn shutdown(&self);
}

/// A [`Track`] shared by all entities on all threads.
pub type Tracker = Arc<dyn Track + Send + Sync>;

/// A [`Tracker`] which prints events up to `level` on stdout.
#[must_use]
pub fn stdout_tracker(level: log::Level) -> Tracker {
    Arc::new(TextTracker::new(
        EntityLevels::new(level),
        Box::new(io::LineWriter::new(io::stdout())),
    ))
}

/// A [`Tracker`] which drops every event.
#[must_use]
pub fn dev_null_tracker() -> Tracker {
    Arc::new(DevNullTracker)
}

/// Decides which entities are enabled at which level, and hands out ids.
///
/// Entities are matched against the filters once, when they register. Only
/// entities whose level differs from the default are remembered.
pub struct EntityLevels {
    default_level: log::Level,
    filters: Vec<(Regex, log::Level)>,
    next_id: AtomicU64,
    overrides: RwLock<HashMap<Id, log::Level>>,
}

impl EntityLevels {
    /// Enable every entity up to `default_level` until filters are added.
    #[must_use]
    pub fn new(default_level: log::Level) -> Self {
        Self {
            default_level,
            filters: Vec::new(),
            next_id: AtomicU64::new(Id::FIRST.0),
            overrides: RwLock::new(HashMap::new()),
        }
    }

    /// Give entities whose path matches `pattern` the level `level`.
    ///
    /// Filters are tried in the order they were added and the first match
    /// wins.
    ///
    /// ```rust
    /// use dphil_track::tracker::EntityLevels;
    ///
    /// let levels = EntityLevels::new(log::Level::Warn)
    ///     .with_filter(r"actor[0-2]$", log::Level::Trace)
    ///     .unwrap();
    /// ```
    pub fn with_filter(
        mut self,
        pattern: &str,
        level: log::Level,
    ) -> Result<Self, TrackConfigError> {
        let regex = Regex::new(pattern)
            .map_err(|e| TrackConfigError(format!("Invalid entity filter {pattern:?}: {e}")))?;
        self.filters.push((regex, level));
        Ok(self)
    }

    pub(crate) fn unique_id(&self) -> Id {
        Id(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn is_enabled(&self, id: Id, level: log::Level) -> bool {
        let overrides = self.overrides.read().unwrap_or_else(PoisonError::into_inner);
        level <= overrides.get(&id).copied().unwrap_or(self.default_level)
    }

    pub(crate) fn register(&self, id: Id, path: &str) {
        let level = self.level_for(path);
        if level != self.default_level {
            self.overrides
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(id, level);
        }
    }

    fn level_for(&self, path: &str) -> log::Level {
        self.filters
            .iter()
            .find(|(regex, _)| regex.is_match(path))
            .map_or(self.default_level, |(_, level)| *level)
    }
}
