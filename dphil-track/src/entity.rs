// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Named sources of events.
//!
//! Entities form a tree rooted at the engine's top-level entity. Each one
//! carries its full path so that level filters and log readers see names such
//! as `dphil::actor3` or `dphil::footman`.

use std::fmt;
use std::sync::Arc;

use crate::{Id, Tracker};

const SEPARATOR: &str = "::";

/// A named part of the simulation which emits events.
pub struct Entity {
    /// Id stamped on every event from this entity.
    pub id: Id,

    /// Tracker the events are sent to.
    pub tracker: Tracker,

    parent_id: Id,
    path: String,
}

impl Entity {
    fn register(tracker: &Tracker, parent_id: Id, path: String) -> Self {
        let id = tracker.unique_id();
        tracker.register(id, &path);
        if tracker.is_enabled(id, log::Level::Trace) {
            tracker.created(parent_id, id, &path);
        }
        Self {
            id,
            tracker: tracker.clone(),
            parent_id,
            path,
        }
    }

    /// Create a child of `parent` called `name`.
    #[must_use]
    pub fn new(parent: &Entity, name: &str) -> Self {
        let path = format!("{}{SEPARATOR}{name}", parent.path);
        Self::register(&parent.tracker, parent.id, path)
    }

    /// Create a child of `parent` for one of several numbered seats, such as
    /// `actor3`.
    #[must_use]
    pub fn numbered(parent: &Entity, kind: &str, index: usize) -> Self {
        Self::new(parent, &format!("{kind}{index}"))
    }

    /// The last part of the path.
    #[must_use]
    pub fn name(&self) -> &str {
        match self.path.rfind(SEPARATOR) {
            Some(i) => &self.path[i + SEPARATOR.len()..],
            None => &self.path,
        }
    }

    /// The full path, from the top-level entity down.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.path
    }

    /// Id of the parent, [`Id::NONE`] for the top-level entity.
    #[must_use]
    pub fn parent_id(&self) -> Id {
        self.parent_id
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        if self.tracker.is_enabled(self.id, log::Level::Trace) {
            self.tracker.destroyed(self.parent_id, self.id);
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.path, self.id)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Create the root of an entity tree.
pub fn toplevel(tracker: &Tracker, name: &str) -> Arc<Entity> {
    Arc::new(Entity::register(tracker, Id::NONE, name.to_string()))
}
