// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Admission gating.
//!
//! A footman lets at most `N - 1` actors into the dining room at once. Once
//! inside, every actor locks its left utensil and then its right one. With
//! one seat always empty at least one actor inside can get both of its
//! utensils, so there is no deadlock even though every actor uses the same
//! order.

use std::sync::Arc;

use dphil_engine::traits::Strategy;
use dphil_engine::types::SimResult;
use dphil_resources::gate::AdmissionGate;
use dphil_resources::utensil::UtensilTable;
use dphil_resources::{ActorId, UtensilId};
use dphil_track::entity::Entity;
use dphil_track::{debug, trace};

pub struct Footman {
    pub entity: Arc<Entity>,
    utensils: Arc<UtensilTable>,
    gate: AdmissionGate,
}

impl Footman {
    /// Create a footman that admits one fewer actor than there are utensils.
    pub fn new(
        parent: &Arc<Entity>,
        name: &str,
        utensils: &Arc<UtensilTable>,
    ) -> Result<Self, dphil_resources::ResourceError> {
        let gate = AdmissionGate::new(utensils.len().saturating_sub(1))?;
        Ok(Self {
            entity: Arc::new(Entity::new(parent, name)),
            utensils: utensils.clone(),
            gate,
        })
    }

    #[must_use]
    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }
}

impl Strategy for Footman {
    fn name(&self) -> &'static str {
        "footman"
    }

    fn acquisition_order(&self, actor: ActorId) -> [UtensilId; 2] {
        [self.utensils.left_of(actor), self.utensils.right_of(actor)]
    }

    fn dine(&self, actor: ActorId, meal: &mut dyn FnMut() -> SimResult) -> SimResult {
        let _pass = self.gate.enter()?;
        debug!(self.entity ; "Actor {} entered the dining room ({}/{} admitted)", actor, self.gate.count(), self.gate.capacity());

        let [first, second] = self.acquisition_order(actor);
        let _first = self.utensils.lock(first)?;
        trace!(self.entity ; "Actor {} locked utensil {}", actor, first);
        let _second = self.utensils.lock(second)?;
        trace!(self.entity ; "Actor {} locked utensil {}", actor, second);
        meal()
    }

    fn peak_admitted(&self) -> Option<usize> {
        Some(self.gate.peak())
    }
}
