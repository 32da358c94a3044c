// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! The utensils laid out around the table.
//!
//! Each utensil has two separate pieces of state:
//!  - an arbitration lock which strategies use to gain exclusive access.
//!  - an ownership record which the actor sets when it picks the utensil up
//!    and clears when it puts it down.
//!
//! A strategy which fails to arbitrate correctly shows up as an ownership
//! error from [UtensilTable::pick_up] or [UtensilTable::put_down].
//!
//! # Layout
//!
//! With `N` actors and `N` utensils, utensil `i` lies between actor `i - 1`
//! and actor `i`. So actor `i` has utensil `i` on its left and utensil
//! `(i + 1) % N` on its right.

use std::sync::{Mutex, MutexGuard};

use crate::{ActorId, ResourceError, UtensilId};

struct Utensil {
    lock: Mutex<()>,
    owner: Mutex<Option<ActorId>>,
}

/// Exclusive arbitration access to one utensil, released when dropped.
pub struct UtensilLock<'a> {
    utensil: UtensilId,
    _guard: MutexGuard<'a, ()>,
}

impl UtensilLock<'_> {
    #[must_use]
    pub fn utensil(&self) -> UtensilId {
        self.utensil
    }
}

pub struct UtensilTable {
    utensils: Vec<Utensil>,
}

impl UtensilTable {
    #[must_use]
    pub fn new(count: usize) -> Self {
        let utensils = (0..count)
            .map(|_| Utensil {
                lock: Mutex::new(()),
                owner: Mutex::new(None),
            })
            .collect();
        Self { utensils }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.utensils.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.utensils.is_empty()
    }

    /// The utensil on the left of the given actor.
    #[must_use]
    pub fn left_of(&self, actor: ActorId) -> UtensilId {
        UtensilId(actor.0 % self.len().max(1))
    }

    /// The utensil on the right of the given actor.
    #[must_use]
    pub fn right_of(&self, actor: ActorId) -> UtensilId {
        UtensilId((actor.0 + 1) % self.len().max(1))
    }

    fn utensil(&self, utensil: UtensilId) -> Result<&Utensil, ResourceError> {
        self.utensils
            .get(utensil.0)
            .ok_or(ResourceError::UnknownUtensil {
                utensil,
                count: self.len(),
            })
    }

    fn owner_cell(
        &self,
        utensil: UtensilId,
    ) -> Result<MutexGuard<'_, Option<ActorId>>, ResourceError> {
        self.utensil(utensil)?
            .owner
            .lock()
            .map_err(|_| ResourceError::Poisoned {
                what: format!("owner of utensil {utensil}"),
            })
    }

    /// Block until exclusive arbitration access to the utensil is granted.
    pub fn lock(&self, utensil: UtensilId) -> Result<UtensilLock<'_>, ResourceError> {
        let guard = self
            .utensil(utensil)?
            .lock
            .lock()
            .map_err(|_| ResourceError::Poisoned {
                what: format!("utensil {utensil}"),
            })?;
        Ok(UtensilLock {
            utensil,
            _guard: guard,
        })
    }

    /// Record that `actor` now holds `utensil`.
    ///
    /// Fails if the utensil already has an owner, including `actor` itself.
    pub fn pick_up(&self, actor: ActorId, utensil: UtensilId) -> Result<(), ResourceError> {
        let mut owner = self.owner_cell(utensil)?;
        if let Some(holder) = *owner {
            return Err(ResourceError::AlreadyHeld {
                actor,
                utensil,
                holder,
            });
        }
        *owner = Some(actor);
        Ok(())
    }

    /// Record that `actor` no longer holds `utensil`.
    ///
    /// Fails unless `actor` is the current owner.
    pub fn put_down(&self, actor: ActorId, utensil: UtensilId) -> Result<(), ResourceError> {
        let mut owner = self.owner_cell(utensil)?;
        if *owner != Some(actor) {
            return Err(ResourceError::NotHeld {
                actor,
                utensil,
                holder: *owner,
            });
        }
        *owner = None;
        Ok(())
    }

    /// The actor currently holding `utensil`, if any.
    pub fn owner(&self, utensil: UtensilId) -> Result<Option<ActorId>, ResourceError> {
        Ok(*self.owner_cell(utensil)?)
    }

    /// All utensils which are currently held, with their owners.
    pub fn held(&self) -> Result<Vec<(UtensilId, ActorId)>, ResourceError> {
        let mut held = Vec::new();
        for i in 0..self.len() {
            let utensil = UtensilId(i);
            if let Some(actor) = self.owner(utensil)? {
                held.push((utensil, actor));
            }
        }
        Ok(held)
    }

    /// True when no utensil has an owner.
    pub fn is_clear(&self) -> Result<bool, ResourceError> {
        Ok(self.held()?.is_empty())
    }
}
