// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! The arbitration strategies.
//!
//! Every strategy implements [Strategy](dphil_engine::traits::Strategy) and
//! so can be handed to the [Engine](dphil_engine::engine::Engine) to run:
//!  - [TableLock](crate::table_lock::TableLock): one lock around the whole
//!    table, at most one actor eats at a time.
//!  - [Leftie](crate::leftie::Leftie): every actor takes its left utensil
//!    first apart from one which takes its right utensil first.
//!  - [Footman](crate::footman::Footman): at most `N - 1` actors are let into
//!    the dining room, each then takes its left utensil first.
//!
//! Use [build_strategy] to create one from a [StrategyKind].

pub mod footman;
pub mod kind;
pub mod leftie;
pub mod table_lock;

pub use kind::{StrategyKind, build_strategy};
