// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! A counting admission gate.
//!
//! The gate admits at most `capacity` holders at any one time. Further
//! requests block until an admitted holder releases its slot. Waiters are
//! woken one at a time on each release.
//!
//! Holders normally enter through [AdmissionGate::enter] which returns a
//! [GatePass] that releases the slot when it is dropped.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use crate::ResourceError;

struct GateState {
    // Number of holders that can be admitted concurrently
    capacity: usize,

    // Current number of admitted holders
    count: usize,

    // Highest number of concurrently admitted holders seen
    peak: usize,
}

impl GateState {
    fn release(&mut self) -> Result<(), ResourceError> {
        if self.count == 0 {
            return Err(ResourceError::InvalidRelease);
        }
        self.count -= 1;
        Ok(())
    }
}

struct GateShared {
    state: Mutex<GateState>,
    slot_freed: Condvar,
}

#[derive(Clone)]
pub struct AdmissionGate {
    shared: Arc<GateShared>,
}

impl AdmissionGate {
    /// Create a gate that admits up to `capacity` holders.
    ///
    /// A gate that could never admit anyone is rejected.
    pub fn new(capacity: usize) -> Result<Self, ResourceError> {
        if capacity == 0 {
            return Err(ResourceError::ZeroCapacity);
        }
        Ok(Self {
            shared: Arc::new(GateShared {
                state: Mutex::new(GateState {
                    capacity,
                    count: 0,
                    peak: 0,
                }),
                slot_freed: Condvar::new(),
            }),
        })
    }

    fn state(&self) -> Result<MutexGuard<'_, GateState>, ResourceError> {
        self.shared.state.lock().map_err(|_| ResourceError::Poisoned {
            what: "admission gate".to_string(),
        })
    }

    /// Block until a slot is free and take it.
    ///
    /// The caller is responsible for calling [release](Self::release) once
    /// it no longer needs the slot.
    pub fn request(&self) -> Result<(), ResourceError> {
        let mut state = self.state()?;
        while state.count == state.capacity {
            state = self
                .shared
                .slot_freed
                .wait(state)
                .map_err(|_| ResourceError::Poisoned {
                    what: "admission gate".to_string(),
                })?;
        }
        state.count += 1;
        state.peak = state.peak.max(state.count);
        Ok(())
    }

    /// Give back a slot taken with [request](Self::request) and wake one
    /// waiter.
    pub fn release(&self) -> Result<(), ResourceError> {
        self.state()?.release()?;
        self.shared.slot_freed.notify_one();
        Ok(())
    }

    /// Block until a slot is free and return a pass that holds it.
    pub fn enter(&self) -> Result<GatePass, ResourceError> {
        self.request()?;
        Ok(GatePass { gate: self.clone() })
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.state().map(|s| s.capacity).unwrap_or_default()
    }

    /// Number of holders currently admitted.
    #[must_use]
    pub fn count(&self) -> usize {
        self.state().map(|s| s.count).unwrap_or_default()
    }

    /// Highest number of holders that have been admitted at the same time.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.state().map(|s| s.peak).unwrap_or_default()
    }
}

/// Holds one slot of an [AdmissionGate] until dropped.
pub struct GatePass {
    gate: AdmissionGate,
}

impl GatePass {
    #[must_use]
    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }
}

impl Drop for GatePass {
    fn drop(&mut self) {
        // A pass always owns a slot so only poisoning can fail here
        let _ = self.gate.release();
    }
}
