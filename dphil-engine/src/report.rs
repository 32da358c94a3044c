// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! The final per-actor report.

use std::fmt;
use std::time::Duration;

use dphil_resources::ActorId;

use crate::metrics::ActorStats;

/// Percentage of `total` that `part` represents.
#[must_use]
pub fn percent(part: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        0.0
    } else {
        part.as_secs_f64() * 100.0 / total.as_secs_f64()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActorReport {
    pub actor: ActorId,
    pub stats: ActorStats,
    pub eat_pct: f64,
    pub think_pct: f64,
    pub block_pct: f64,
}

impl ActorReport {
    #[must_use]
    pub fn new(actor: ActorId, stats: ActorStats, elapsed: Duration) -> Self {
        Self {
            actor,
            stats,
            eat_pct: percent(stats.eat_time, elapsed),
            think_pct: percent(stats.think_time, elapsed),
            block_pct: percent(stats.block_time, elapsed),
        }
    }

    /// Total time accounted for in any state.
    #[must_use]
    pub fn accounted(&self) -> Duration {
        self.stats.eat_time + self.stats.think_time + self.stats.block_time
    }
}

impl fmt::Display for ActorReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Actor {}: eat_time={:.0}%, think_time={:.0}%, block_time={:.0}% ({} meals, longest wait {:?})",
            self.actor,
            self.eat_pct,
            self.think_pct,
            self.block_pct,
            self.stats.meals,
            self.stats.longest_wait
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub strategy: String,
    pub elapsed: Duration,
    pub actors: Vec<ActorReport>,

    /// Most actors seen eating at the same time.
    pub peak_eaters: usize,

    /// Most actors admitted at the same time, for gated strategies.
    pub peak_admitted: Option<usize>,
}

impl Report {
    #[must_use]
    pub fn total_meals(&self) -> u64 {
        self.actors.iter().map(|a| a.stats.meals).sum()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for actor in &self.actors {
            writeln!(f, "{actor}")?;
        }
        writeln!(f, "Peak concurrent eaters: {}", self.peak_eaters)?;
        if let Some(peak_admitted) = self.peak_admitted {
            writeln!(f, "Peak admitted: {peak_admitted}")?;
        }
        write!(
            f,
            "Strategy {} ran for {:?} ({} meals)",
            self.strategy,
            self.elapsed,
            self.total_meals()
        )
    }
}
