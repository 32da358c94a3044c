// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use dphil_resources::ResourceError;

use crate::traits::Strategy;

/// A strategy shared between all of the actor threads.
pub type SharedStrategy = Arc<dyn Strategy + Send + Sync>;

// Simulation errors

#[macro_export]
/// Build a [SimError] from a message that supports `to_string`
macro_rules! sim_error {
    ($msg:expr) => {
        Err($crate::types::SimError($msg.to_string()))
    };
}

/// The `SimError` is what should be returned in the case of an error
#[derive(Clone, Debug, PartialEq)]
pub struct SimError(pub String);

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {}", self.0)
    }
}

impl Error for SimError {}

impl From<ResourceError> for SimError {
    fn from(e: ResourceError) -> Self {
        SimError(e.to_string())
    }
}

/// The SimResult is the return type for most simulation functions
pub type SimResult = Result<(), SimError>;
