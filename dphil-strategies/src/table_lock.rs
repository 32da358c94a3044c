// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! The baseline strategy: one lock serialises every meal at the table.

use std::sync::{Arc, Mutex};

use dphil_engine::traits::Strategy;
use dphil_engine::types::{SimError, SimResult};
use dphil_resources::utensil::UtensilTable;
use dphil_resources::{ActorId, UtensilId};
use dphil_track::entity::Entity;
use dphil_track::trace;

pub struct TableLock {
    pub entity: Arc<Entity>,
    utensils: Arc<UtensilTable>,
    table: Mutex<()>,
}

impl TableLock {
    #[must_use]
    pub fn new(parent: &Arc<Entity>, name: &str, utensils: &Arc<UtensilTable>) -> Self {
        Self {
            entity: Arc::new(Entity::new(parent, name)),
            utensils: utensils.clone(),
            table: Mutex::new(()),
        }
    }
}

impl Strategy for TableLock {
    fn name(&self) -> &'static str {
        "table-lock"
    }

    fn acquisition_order(&self, actor: ActorId) -> [UtensilId; 2] {
        [self.utensils.left_of(actor), self.utensils.right_of(actor)]
    }

    fn dine(&self, actor: ActorId, meal: &mut dyn FnMut() -> SimResult) -> SimResult {
        let _table = self
            .table
            .lock()
            .map_err(|_| SimError("Table lock poisoned by a panicking actor".to_string()))?;
        trace!(self.entity ; "Actor {} has the table", actor);
        meal()
    }
}
