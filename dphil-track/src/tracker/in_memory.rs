// Copyright (c) 2020 Graphcore Ltd. All rights reserved.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use regex::Regex;

use crate::Id;
use crate::tracker::{EntityLevels, Track};

/// What happened to an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The entity was created with this path.
    Created(String),

    /// The entity was dropped.
    Destroyed,

    /// The entity emitted a message.
    Message(log::Level, String),
}

/// An [`Event`] together with the entity it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The entity the event came from.
    pub id: Id,

    /// The event itself.
    pub event: Event,
}

#[derive(Default)]
struct History {
    records: Vec<Record>,
    paths: HashMap<String, Id>,
}

/// Keeps every enabled event so that tests can query the log of a run
/// after it has finished.
pub struct InMemoryTracker {
    levels: EntityLevels,
    history: Mutex<History>,
}

impl InMemoryTracker {
    /// Create a tracker which keeps the events enabled by `levels`.
    #[must_use]
    pub fn new(levels: EntityLevels) -> Self {
        Self {
            levels,
            history: Mutex::new(History::default()),
        }
    }

    fn history(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, id: Id, event: Event) {
        self.history().records.push(Record { id, event });
    }

    /// The id of the entity with the given full path, such as
    /// `dphil::actor0`.
    pub fn id_for_name(&self, path: &str) -> Option<Id> {
        self.history().paths.get(path).copied()
    }

    /// The messages of one entity, oldest first.
    pub fn messages_for(&self, id: Id) -> Vec<String> {
        self.history()
            .records
            .iter()
            .filter(|r| r.id == id)
            .filter_map(|r| match &r.event {
                Event::Message(_, text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// How many messages from any entity match `regex`.
    pub fn count_matching(&self, regex: &Regex) -> usize {
        self.history()
            .records
            .iter()
            .filter(|r| matches!(&r.event, Event::Message(_, text) if regex.is_match(text)))
            .count()
    }

    /// Every event kept so far.
    pub fn records(&self) -> Vec<Record> {
        self.history().records.clone()
    }
}

impl Track for InMemoryTracker {
    fn unique_id(&self) -> Id {
        self.levels.unique_id()
    }

    fn is_enabled(&self, id: Id, level: log::Level) -> bool {
        self.levels.is_enabled(id, level)
    }

    fn register(&self, id: Id, path: &str) {
        self.levels.register(id, path);
        self.history().paths.insert(path.to_string(), id);
    }

    fn created(&self, _parent: Id, id: Id, path: &str) {
        self.push(id, Event::Created(path.to_string()));
    }

    fn destroyed(&self, _parent: Id, id: Id) {
        self.push(id, Event::Destroyed);
    }

    fn log(&self, id: Id, level: log::Level, msg: fmt::Arguments) {
        self.push(id, Event::Message(level, msg.to_string()));
    }

    fn shutdown(&self) {}
}
