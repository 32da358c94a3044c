// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! This module represents the time during a simulation.
//!
//! Time is counted in ticks of a fixed [time unit](Clock::time_unit). Actors
//! really sleep for the duration of their holds so that the arbitration
//! strategies are exercised by genuinely concurrent threads.

use std::fmt;
use std::thread;
use std::time::Duration;

use dphil_resources::ActorId;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Converts between simulation ticks and wall-clock time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clock {
    time_unit: Duration,
}

impl Clock {
    #[must_use]
    pub fn new(time_unit: Duration) -> Self {
        Self { time_unit }
    }

    #[must_use]
    pub fn time_unit(&self) -> Duration {
        self.time_unit
    }

    /// Wall-clock duration of a number of ticks, saturating at
    /// [`Duration::MAX`].
    #[must_use]
    pub fn ticks(&self, ticks: u64) -> Duration {
        self.time_unit
            .as_nanos()
            .checked_mul(u128::from(ticks))
            .and_then(|nanos| {
                let secs = u64::try_from(nanos / NANOS_PER_SEC).ok()?;
                let sub_nanos = u32::try_from(nanos % NANOS_PER_SEC).ok()?;
                Some(Duration::new(secs, sub_nanos))
            })
            .unwrap_or(Duration::MAX)
    }

    /// Block the calling thread for a number of ticks.
    pub fn wait_ticks(&self, ticks: u64) {
        let duration = self.ticks(ticks);
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }

    /// A wrapper which displays a number of ticks as a duration.
    #[must_use]
    pub fn display(&self, ticks: u64) -> TickDisplay {
        TickDisplay {
            duration: self.ticks(ticks),
        }
    }
}

pub struct TickDisplay {
    duration: Duration,
}

impl fmt::Display for TickDisplay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.duration)
    }
}

/// An endless source of random hold times, in ticks, drawn uniformly from
/// `[min, max]`.
///
/// Each actor gets its own generator. When a seed is given the generator
/// for actor `i` is seeded with `seed + i` so that a run can be repeated.
pub struct HoldTimes {
    min: u64,
    range: u64,
    rng: StdRng,
}

impl HoldTimes {
    /// A `max` below `min` gives a fixed hold of `min`.
    #[must_use]
    pub fn new(min: u64, max: u64, seed: Option<u64>, actor: ActorId) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(actor.0 as u64)),
            None => StdRng::from_entropy(),
        };
        Self {
            min,
            range: max.saturating_sub(min) + 1,
            rng,
        }
    }
}

impl Iterator for HoldTimes {
    type Item = u64;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.min + self.rng.next_u64() % self.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_scale_by_time_unit() {
        let clock = Clock::new(Duration::from_millis(250));
        assert_eq!(clock.ticks(0), Duration::ZERO);
        assert_eq!(clock.ticks(3), Duration::from_millis(750));
        assert_eq!(clock.display(4).to_string(), "1s");
    }

    #[test]
    fn long_runs_of_short_ticks() {
        let clock = Clock::new(Duration::from_nanos(1));
        assert_eq!(clock.ticks(5_000_000_000), Duration::from_secs(5));
        assert_eq!(clock.ticks(u64::MAX), Duration::from_nanos(u64::MAX));

        let clock = Clock::new(Duration::from_millis(1500));
        assert_eq!(clock.ticks(3_000_000_000), Duration::from_secs(4_500_000_000));
    }

    #[test]
    fn saturates_on_overflow() {
        let clock = Clock::new(Duration::from_secs(u64::MAX / 2));
        assert_eq!(clock.ticks(2), Duration::from_secs(u64::MAX - 1));
        assert_eq!(clock.ticks(3), Duration::MAX);
        assert_eq!(Clock::new(Duration::MAX).ticks(2), Duration::MAX);
    }

    #[test]
    fn zero_time_unit() {
        let clock = Clock::new(Duration::ZERO);
        assert_eq!(clock.ticks(1_000), Duration::ZERO);
        clock.wait_ticks(1_000);
    }

    #[test]
    fn holds_within_range() {
        let holds = HoldTimes::new(1, 3, Some(7), ActorId(2));
        for hold in holds.take(1000) {
            assert!((1..=3).contains(&hold));
        }
    }

    #[test]
    fn seeded_holds_repeat() {
        let a: Vec<u64> = HoldTimes::new(1, 10, Some(42), ActorId(1)).take(20).collect();
        let b: Vec<u64> = HoldTimes::new(1, 10, Some(42), ActorId(1)).take(20).collect();
        let c: Vec<u64> = HoldTimes::new(1, 10, Some(42), ActorId(2)).take(20).collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn fixed_hold() {
        let mut holds = HoldTimes::new(2, 2, None, ActorId(0));
        assert_eq!(holds.next(), Some(2));
        assert_eq!(holds.next(), Some(2));
    }
}
