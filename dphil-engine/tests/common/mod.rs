// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

use std::sync::{Arc, Mutex};

use dphil_engine::traits::Strategy;
use dphil_engine::types::{SimError, SimResult};
use dphil_resources::utensil::UtensilTable;
use dphil_resources::{ActorId, UtensilId};

/// Serialises every meal like a table lock, but makes one actor take its
/// left utensil twice.
pub struct DoublePickup {
    lock: Mutex<()>,
    utensils: Arc<UtensilTable>,
    culprit: ActorId,
}

impl DoublePickup {
    pub fn new(utensils: &Arc<UtensilTable>, culprit: ActorId) -> Self {
        Self {
            lock: Mutex::new(()),
            utensils: utensils.clone(),
            culprit,
        }
    }
}

impl Strategy for DoublePickup {
    fn name(&self) -> &'static str {
        "double-pickup"
    }

    fn acquisition_order(&self, actor: ActorId) -> [UtensilId; 2] {
        let left = self.utensils.left_of(actor);
        if actor == self.culprit {
            [left, left]
        } else {
            [left, self.utensils.right_of(actor)]
        }
    }

    fn dine(&self, _actor: ActorId, meal: &mut dyn FnMut() -> SimResult) -> SimResult {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| SimError("double-pickup lock poisoned".to_string()))?;
        meal()
    }
}

/// Panics whenever one actor becomes hungry.
pub struct Tantrum {
    pub culprit: ActorId,
    pub utensils: Arc<UtensilTable>,
    pub lock: Mutex<()>,
}

impl Strategy for Tantrum {
    fn name(&self) -> &'static str {
        "tantrum"
    }

    fn acquisition_order(&self, actor: ActorId) -> [UtensilId; 2] {
        [self.utensils.left_of(actor), self.utensils.right_of(actor)]
    }

    fn dine(&self, actor: ActorId, meal: &mut dyn FnMut() -> SimResult) -> SimResult {
        if actor == self.culprit {
            panic!("actor {actor} refuses to eat");
        }
        let _guard = self
            .lock
            .lock()
            .map_err(|_| SimError("tantrum lock poisoned".to_string()))?;
        meal()
    }
}
