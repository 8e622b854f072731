/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Hyperperiod calculation.
//!
//! The hyperperiod of a set of periodic tasks is the Least Common Multiple
//! (LCM) of all their periods.  It is the smallest window after which the
//! schedule repeats, and therefore the simulation horizon.
//!
//! | Failure | Result |
//! |---------|--------|
//! | no tasks / a zero period | `Err(NoValidPeriods)` |
//! | `a / gcd * b` does not fit in `u64` | `Err(Overflow { a, b })` |
//! | horizon longer than the configured limit | `Err(TooLarge { .. })` |

pub mod math;

use tracing::{debug, info, warn};

use crate::task::{Task, Tick};
use math::lcm_fold;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Default upper limit on the simulated horizon, in ticks.
///
/// The simulator emits one trace record per tick, so the limit bounds the
/// trace size.  Override with [`HyperperiodCalculator::with_limit`].
pub const DEFAULT_HYPERPERIOD_LIMIT: Tick = 10_000_000;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors that can occur during hyperperiod calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HyperperiodError {
    /// The task slice was empty or contained a zero period.
    NoValidPeriods,

    /// LCM calculation overflowed `u64`.
    Overflow { a: Tick, b: Tick },

    /// The calculated hyperperiod exceeded the configured limit.
    TooLarge { value: Tick, limit: Tick },
}

impl std::fmt::Display for HyperperiodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HyperperiodError::NoValidPeriods => {
                write!(f, "no tasks, or a task with a zero period")
            }
            HyperperiodError::Overflow { a, b } => {
                write!(f, "LCM overflow computing lcm({a}, {b})")
            }
            HyperperiodError::TooLarge { value, limit } => {
                write!(f, "hyperperiod {value} ticks exceeds limit {limit} ticks")
            }
        }
    }
}

impl std::error::Error for HyperperiodError {}

// ── HyperperiodInfo ───────────────────────────────────────────────────────────

/// Calculated simulation horizon for one task set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperperiodInfo {
    /// LCM of all task periods, in ticks.
    pub hyperperiod: Tick,

    /// Upper bound on job releases in one hyperperiod: `Σ hyperperiod / period`.
    ///
    /// The ready queue refuses admissions beyond this count.
    pub release_bound: usize,
}

// ── HyperperiodCalculator ─────────────────────────────────────────────────────

/// Computes the hyperperiod of a task list, subject to a horizon limit.
///
/// # Example
/// ```rust
/// use edf_sim::hyperperiod::HyperperiodCalculator;
/// use edf_sim::task::{TaskSet, TaskSpec};
///
/// let tasks = TaskSet::from_specs(&[
///     TaskSpec::implicit(12, 1),
///     TaskSpec::implicit(9, 1),
///     TaskSpec::implicit(6, 1),
/// ])
/// .unwrap();
///
/// let info = HyperperiodCalculator::new().calculate(tasks.tasks()).unwrap();
/// assert_eq!(info.hyperperiod, 36);
/// assert_eq!(info.release_bound, 3 + 4 + 6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HyperperiodCalculator {
    limit: Tick,
}

impl HyperperiodCalculator {
    /// Calculator with [`DEFAULT_HYPERPERIOD_LIMIT`].
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_HYPERPERIOD_LIMIT,
        }
    }

    /// Calculator with a custom limit, in ticks.
    pub fn with_limit(limit: Tick) -> Self {
        Self { limit }
    }

    /// Fold the task periods, in task order, into their LCM.
    ///
    /// # Errors
    /// * [`HyperperiodError::NoValidPeriods`] – empty slice or a zero period.
    /// * [`HyperperiodError::Overflow`] – LCM exceeded `u64`.
    /// * [`HyperperiodError::TooLarge`] – result exceeds the limit.
    pub fn calculate(&self, tasks: &[Task]) -> Result<HyperperiodInfo, HyperperiodError> {
        if tasks.is_empty() || tasks.iter().any(|t| t.period == 0) {
            warn!("cannot calculate hyperperiod: no tasks or a zero period");
            return Err(HyperperiodError::NoValidPeriods);
        }

        let hyperperiod = lcm_fold(tasks.iter().map(|t| t.period))?;

        if hyperperiod > self.limit {
            warn!(
                hyperperiod,
                limit = self.limit,
                "hyperperiod exceeds configured limit"
            );
            return Err(HyperperiodError::TooLarge {
                value: hyperperiod,
                limit: self.limit,
            });
        }

        // Each task releases at most hyperperiod / period times.
        let mut release_bound: u64 = 0;
        for t in tasks {
            let releases = hyperperiod / t.period;
            debug!(task = t.id, period = t.period, releases, "  release bound");
            release_bound = release_bound.saturating_add(releases);
        }
        let release_bound = usize::try_from(release_bound).unwrap_or(usize::MAX);

        info!(
            task_count = tasks.len(),
            hyperperiod,
            release_bound,
            "calculated hyperperiod"
        );

        Ok(HyperperiodInfo {
            hyperperiod,
            release_bound,
        })
    }
}

impl Default for HyperperiodCalculator {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
