// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Errors raised by the shared resources.
//!
//! Ownership violations can only be caused by a broken arbitration strategy,
//! they are never expected in a correct simulation and are never retried.

use std::error::Error;
use std::fmt;

use crate::{ActorId, UtensilId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceError {
    /// An actor picked up a utensil that already had an owner.
    AlreadyHeld {
        actor: ActorId,
        utensil: UtensilId,
        holder: ActorId,
    },

    /// An actor put down a utensil that it did not own.
    NotHeld {
        actor: ActorId,
        utensil: UtensilId,
        holder: Option<ActorId>,
    },

    /// A utensil outside of the table was requested.
    UnknownUtensil { utensil: UtensilId, count: usize },

    /// The admission gate was released more times than it was entered.
    InvalidRelease,

    /// An admission gate must admit at least one actor.
    ZeroCapacity,

    /// A lock was poisoned by an actor thread that panicked while holding it.
    Poisoned { what: String },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResourceError::AlreadyHeld {
                actor,
                utensil,
                holder,
            } => {
                if actor == holder {
                    write!(
                        f,
                        "Actor {actor} picked up utensil {utensil} which it already holds"
                    )
                } else {
                    write!(
                        f,
                        "Actor {actor} picked up utensil {utensil} already held by actor {holder}"
                    )
                }
            }
            ResourceError::NotHeld {
                actor,
                utensil,
                holder,
            } => match holder {
                Some(holder) => write!(
                    f,
                    "Actor {actor} put down utensil {utensil} which is held by actor {holder}"
                ),
                None => write!(
                    f,
                    "Actor {actor} put down utensil {utensil} which has not been picked up"
                ),
            },
            ResourceError::UnknownUtensil { utensil, count } => {
                write!(f, "Utensil {utensil} is not on a table of {count} utensils")
            }
            ResourceError::InvalidRelease => {
                write!(f, "Invalid release of an admission gate with no actors admitted")
            }
            ResourceError::ZeroCapacity => {
                write!(f, "An admission gate must admit at least one actor")
            }
            ResourceError::Poisoned { what } => {
                write!(f, "Lock on {what} poisoned by a panicking actor")
            }
        }
    }
}

impl Error for ResourceError {}
