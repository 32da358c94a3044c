// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Typed identifiers for actors and utensils.

use std::fmt;

/// Identifies one of the N actors seated around the table (`0..N`).
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ActorId(pub usize);

/// Identifies one of the N utensils laid around the table (`0..N`).
///
/// Utensil `i` lies between actor `i - 1` and actor `i`.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct UtensilId(pub usize);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UtensilId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
