// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Resource ordering.
//!
//! All actors lock their left utensil and then their right one, except for a
//! single designated actor which locks its right utensil first. That one
//! reversal is enough to break any cycle of actors each holding one utensil
//! and waiting for the next.
//!
//! This is deadlock free, but an unlucky actor can still be starved.

use std::sync::Arc;

use dphil_engine::traits::Strategy;
use dphil_engine::types::SimResult;
use dphil_resources::utensil::UtensilTable;
use dphil_resources::{ActorId, UtensilId};
use dphil_track::entity::Entity;
use dphil_track::trace;

pub struct Leftie {
    pub entity: Arc<Entity>,
    utensils: Arc<UtensilTable>,
    leftie: ActorId,
}

impl Leftie {
    #[must_use]
    pub fn new(
        parent: &Arc<Entity>,
        name: &str,
        utensils: &Arc<UtensilTable>,
        leftie: ActorId,
    ) -> Self {
        Self {
            entity: Arc::new(Entity::new(parent, name)),
            utensils: utensils.clone(),
            leftie,
        }
    }

    #[must_use]
    pub fn leftie(&self) -> ActorId {
        self.leftie
    }
}

impl Strategy for Leftie {
    fn name(&self) -> &'static str {
        "leftie"
    }

    fn acquisition_order(&self, actor: ActorId) -> [UtensilId; 2] {
        let left = self.utensils.left_of(actor);
        let right = self.utensils.right_of(actor);
        if actor == self.leftie {
            [right, left]
        } else {
            [left, right]
        }
    }

    fn dine(&self, actor: ActorId, meal: &mut dyn FnMut() -> SimResult) -> SimResult {
        let [first, second] = self.acquisition_order(actor);
        let _first = self.utensils.lock(first)?;
        trace!(self.entity ; "Actor {} locked utensil {}", actor, first);
        let _second = self.utensils.lock(second)?;
        trace!(self.entity ; "Actor {} locked utensil {}", actor, second);
        meal()
    }
}
