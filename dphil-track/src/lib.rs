// Copyright (c) 2020 Graphcore Ltd. All rights reserved.

//! The event log of the DPHIL simulator.
//!
//! Every part of a run that reports what it is doing owns an
//! [`Entity`](crate::entity::Entity): the top-level `dphil` entity of the
//! engine, one `actorN` entity per seat and one entity per strategy. An
//! entity knows its place in the hierarchy (`dphil::actor3`) and the
//! [`Tracker`] its events go to.
//!
//! Messages are emitted with the level macros, which take the entity first:
//!
//! ```
//! use dphil_track::entity::{Entity, toplevel};
//! use dphil_track::tracker::dev_null_tracker;
//! use dphil_track::info;
//!
//! let top = toplevel(&dev_null_tracker(), "dphil");
//! let actor = Entity::numbered(&top, "actor", 3);
//! info!(actor ; "Actor {} is thinking for {}", 3, "2s");
//! ```
//!
//! The arguments are only formatted when the tracker has the entity enabled
//! at that level. Actors log from their own threads so every [`Tracker`] is
//! `Send + Sync`.

#![warn(missing_docs)]

pub use log;

pub mod builder;
pub mod entity;
pub mod test_helpers;
pub mod tracker;

mod id;

pub use id::Id;
pub use tracker::{Track, Tracker};

/// Where a text tracker sends its lines.
pub type Writer = Box<dyn std::io::Write + Send>;

/// Emit a message from an entity at the given level.
#[macro_export]
macro_rules! track {
    ($entity:expr ; $lvl:expr, $($arg:tt)+) => {{
        let entity = &$entity;
        if entity.tracker.is_enabled(entity.id, $lvl) {
            entity.tracker.log(entity.id, $lvl, format_args!($($arg)+));
        }
    }};
}

/// Emit a message at `Trace` level.
#[macro_export]
macro_rules! trace {
    ($entity:expr ; $($arg:tt)+) => {
        $crate::track!($entity ; $crate::log::Level::Trace, $($arg)+)
    };
}

/// Emit a message at `Debug` level.
#[macro_export]
macro_rules! debug {
    ($entity:expr ; $($arg:tt)+) => {
        $crate::track!($entity ; $crate::log::Level::Debug, $($arg)+)
    };
}

/// Emit a message at `Info` level.
#[macro_export]
macro_rules! info {
    ($entity:expr ; $($arg:tt)+) => {
        $crate::track!($entity ; $crate::log::Level::Info, $($arg)+)
    };
}

/// Emit a message at `Warn` level.
#[macro_export]
macro_rules! warn {
    ($entity:expr ; $($arg:tt)+) => {
        $crate::track!($entity ; $crate::log::Level::Warn, $($arg)+)
    };
}

/// Emit a message at `Error` level.
#[macro_export]
macro_rules! error {
    ($entity:expr ; $($arg:tt)+) => {
        $crate::track!($entity ; $crate::log::Level::Error, $($arg)+)
    };
}
