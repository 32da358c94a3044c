// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! The actor (philosopher) loop.
//!
//! Each actor runs on its own thread and cycles through
//! `Thinking -> Hungry -> Eating -> Thinking` until it sees the stop flag at
//! the top of a cycle, or has eaten as many meals as it was allowed.

use std::sync::Arc;
use std::time::Instant;

use dphil_resources::ActorId;
use dphil_resources::utensil::UtensilTable;
use dphil_track::entity::Entity;
use dphil_track::{debug, info, trace};

use crate::metrics::Metrics;
use crate::stop::StopFlag;
use crate::time::{Clock, HoldTimes};
use crate::types::{SharedStrategy, SimError, SimResult};

/// Everything an actor shares with the rest of the simulation.
#[derive(Clone)]
pub struct Table {
    pub utensils: Arc<UtensilTable>,
    pub metrics: Arc<Metrics>,
    pub stop: StopFlag,
    pub clock: Clock,
}

pub struct Actor {
    pub entity: Arc<Entity>,
    id: ActorId,
    strategy: SharedStrategy,
    table: Table,
    holds: HoldTimes,
    meal_limit: Option<u64>,
    meals: u64,
}

impl Actor {
    #[must_use]
    pub fn new(
        parent: &Arc<Entity>,
        id: ActorId,
        strategy: SharedStrategy,
        table: Table,
        holds: HoldTimes,
        meal_limit: Option<u64>,
    ) -> Self {
        Self {
            entity: Arc::new(Entity::numbered(parent, "actor", id.0)),
            id,
            strategy,
            table,
            holds,
            meal_limit,
            meals: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> ActorId {
        self.id
    }

    #[must_use]
    pub fn meals(&self) -> u64 {
        self.meals
    }

    fn done(&self) -> bool {
        if self.table.stop.is_raised() {
            return true;
        }
        match self.meal_limit {
            Some(limit) => self.meals >= limit,
            None => false,
        }
    }

    /// Run cycles until stopped. Returns the first error hit, at which point
    /// the actor abandons the table.
    ///
    /// An error during a meal is recorded on the stop flag before the
    /// strategy releases its arbitration, so it is always recorded ahead of
    /// any error it then causes in a neighbour.
    pub fn run(&mut self) -> SimResult {
        let stop = self.table.stop.clone();
        while !self.done() {
            let hungry_since = self.think()?;
            let strategy = self.strategy.clone();
            strategy.dine(self.id, &mut || {
                self.eat(hungry_since).inspect_err(|e| stop.fail(e))
            })?;
        }
        info!(self.entity ; "Actor {} leaving the table after {} meals", self.id, self.meals);
        Ok(())
    }

    fn think(&mut self) -> Result<Instant, SimError> {
        let ticks = self.next_hold();
        let clock = self.table.clock;
        info!(self.entity ; "Actor {} is thinking for {}", self.id, clock.display(ticks));

        let start = Instant::now();
        clock.wait_ticks(ticks);
        let now = Instant::now();
        self.table.metrics.record_think(self.id, now - start)?;

        debug!(self.entity ; "Actor {} is hungry after thinking for {}", self.id, clock.display(ticks));
        Ok(now)
    }

    /// The meal run by the strategy once it has arbitrated access to this
    /// actor's utensils.
    fn eat(&mut self, hungry_since: Instant) -> SimResult {
        let waited = hungry_since.elapsed();
        self.table.metrics.record_blocked(self.id, waited)?;

        let utensils = self.table.utensils.clone();
        let order = self.strategy.acquisition_order(self.id);
        for utensil in order {
            utensils.pick_up(self.id, utensil)?;
            trace!(self.entity ; "Actor {} took utensil {}", self.id, utensil);
        }

        let ticks = self.next_hold();
        let clock = self.table.clock;
        self.table.metrics.start_eating()?;
        info!(self.entity ; "Actor {} is eating for {} after waiting {:?}", self.id, clock.display(ticks), waited);

        let start = Instant::now();
        clock.wait_ticks(ticks);
        let eaten = start.elapsed();

        self.table.metrics.stop_eating()?;
        for utensil in order.into_iter().rev() {
            utensils.put_down(self.id, utensil)?;
            trace!(self.entity ; "Actor {} put down utensil {}", self.id, utensil);
        }
        self.table.metrics.record_eat(self.id, eaten)?;
        self.meals += 1;

        debug!(self.entity ; "Actor {} stopped eating", self.id);
        Ok(())
    }

    fn next_hold(&mut self) -> u64 {
        // The generator is endless
        self.holds.next().unwrap_or_default()
    }
}
