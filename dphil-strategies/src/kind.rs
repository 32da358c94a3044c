// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

use std::fmt;
use std::sync::Arc;

use dphil_engine::engine::Engine;
use dphil_engine::types::{SharedStrategy, SimError};
use dphil_resources::ActorId;
use serde::{Deserialize, Serialize};

use crate::footman::Footman;
use crate::leftie::Leftie;
use crate::table_lock::TableLock;

#[derive(clap::ValueEnum, Clone, Copy, Default, Debug, Serialize, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// One lock around the whole table
    TableLock,

    /// One actor takes its utensils in the reverse order
    Leftie,

    #[default]
    /// At most N-1 actors may try to eat at once
    Footman,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StrategyKind::TableLock => write!(f, "table-lock"),
            StrategyKind::Leftie => write!(f, "leftie"),
            StrategyKind::Footman => write!(f, "footman"),
        }
    }
}

/// Build a strategy over the utensils of `engine`.
///
/// `leftie` is the actor that reverses its order under
/// [StrategyKind::Leftie] and is ignored by the other strategies.
pub fn build_strategy(
    kind: StrategyKind,
    engine: &Engine,
    leftie: ActorId,
) -> Result<SharedStrategy, SimError> {
    let top = engine.top();
    let utensils = engine.utensils();
    let name = kind.to_string();
    let strategy: SharedStrategy = match kind {
        StrategyKind::TableLock => Arc::new(TableLock::new(top, &name, utensils)),
        StrategyKind::Leftie => {
            if leftie.0 >= utensils.len() {
                return Err(SimError(format!(
                    "Leftie actor {leftie} is not seated at a table of {}",
                    utensils.len()
                )));
            }
            Arc::new(Leftie::new(top, &name, utensils, leftie))
        }
        StrategyKind::Footman => Arc::new(Footman::new(top, &name, utensils)?),
    };
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use clap::ValueEnum;
    use dphil_engine::test_helpers::test_config;
    use dphil_track::tracker::dev_null_tracker;

    use super::*;

    #[test]
    fn names_match_command_line() {
        for kind in StrategyKind::value_variants() {
            let parsed = StrategyKind::from_str(&kind.to_string(), false).unwrap();
            assert_eq!(parsed, *kind);
        }
        assert_eq!(StrategyKind::default(), StrategyKind::Footman);
    }

    #[test]
    fn build_each_kind() {
        let engine = Engine::new(&dev_null_tracker(), test_config(3, 1)).unwrap();
        for kind in StrategyKind::value_variants() {
            let strategy = build_strategy(*kind, &engine, ActorId(2)).unwrap();
            assert_eq!(strategy.name(), kind.to_string());
        }
    }

    #[test]
    fn leftie_must_be_seated() {
        let engine = Engine::new(&dev_null_tracker(), test_config(3, 1)).unwrap();
        let err = build_strategy(StrategyKind::Leftie, &engine, ActorId(3))
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "Error: Leftie actor 3 is not seated at a table of 3"
        );
    }
}
