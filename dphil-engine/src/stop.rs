// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! The cooperative stop signal.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::{Acquire, Release};
use std::sync::{Arc, OnceLock};

use crate::types::SimError;

/// A flag shared by the driver and every actor.
///
/// It starts lowered and, once raised, is never lowered again. Actors look at
/// it once per cycle, so raising it never interrupts a meal in progress.
///
/// The flag also keeps the error that stopped the run, if any. Only the
/// first failure is kept.
#[derive(Clone, Debug, Default)]
pub struct StopFlag {
    raised: Arc<AtomicBool>,
    failure: Arc<OnceLock<SimError>>,
}

impl StopFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Release);
    }

    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Acquire)
    }

    /// Record `error` as the cause of the stop, unless a failure was already
    /// recorded, and raise the flag.
    pub fn fail(&self, error: &SimError) {
        let _ = self.failure.set(error.clone());
        self.raise();
    }

    /// The first failure recorded.
    #[must_use]
    pub fn failure(&self) -> Option<&SimError> {
        self.failure.get()
    }
}
