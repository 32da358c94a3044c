// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Shared resource primitives.
//!
//! The dining actors contend for two kinds of resource:
//!  - the [utensils](crate::utensil) laid out around the table, each of which
//!    can only be held by one actor at a time.
//!  - an [admission gate](crate::gate) which bounds how many actors may be
//!    trying to eat at the same time.

pub mod error;
pub mod gate;
pub mod ids;
pub mod utensil;

pub use error::ResourceError;
pub use ids::{ActorId, UtensilId};
