// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

use std::fmt;

/// Identifies the entity behind every tracked event.
///
/// Ids are handed out by a tracker and are never reused within a run.
#[derive(Copy, Clone, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Id(pub u64);

impl Id {
    /// The parent of the top-level entity.
    pub const NONE: Id = Id(0);

    /// The first id a tracker hands out.
    pub const FIRST: Id = Id(1);
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
