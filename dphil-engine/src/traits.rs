// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! The arbitration strategy interface.

use dphil_resources::{ActorId, UtensilId};

use crate::types::SimResult;

/// An arbitration strategy decides how a hungry actor gains exclusive use of
/// its pair of utensils.
///
/// The actor loop owns the meal itself: picking up the utensils in
/// [acquisition order](Strategy::acquisition_order), eating and putting them
/// down again. The strategy wraps the meal in whatever locking it needs so
/// that no utensil is ever picked up by two actors at once and the actors
/// can never end up waiting on each other in a cycle.
pub trait Strategy {
    /// Short name used in logs and the report.
    fn name(&self) -> &'static str;

    /// The order in which `actor` takes its two utensils.
    fn acquisition_order(&self, actor: ActorId) -> [UtensilId; 2];

    /// Gain exclusive access to the utensils of `actor`, run the `meal` and
    /// then release everything that was taken, in every case.
    fn dine(&self, actor: ActorId, meal: &mut dyn FnMut() -> SimResult) -> SimResult;

    /// Highest number of actors admitted to the table at once, for
    /// strategies that bound it.
    fn peak_admitted(&self) -> Option<usize> {
        None
    }
}
