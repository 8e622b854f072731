/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the EDF simulator.
//!
//! Two error enums model the two failure layers:
//!
//! * [`TaskSetError`] — a configuration error found while validating the raw
//!   task records (caller-side, always carries the offending task id and
//!   value).
//! * [`SimulationError`] — top-level failure returned from
//!   [`EdfScheduler::simulate()`](super::EdfScheduler::simulate).
//!
//! None of these are retryable: the simulator is pure computation.  Every
//! variant stops the run before a trace is produced.

use thiserror::Error;

use crate::hyperperiod::HyperperiodError;
use crate::task::{Tick, TaskId};

// ── Configuration errors ──────────────────────────────────────────────────────

/// Why a task set was rejected during validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskSetError {
    /// No task records at all.
    #[error("task set is empty — at least one task is required")]
    Empty,

    /// More records than fit in a [`TaskId`].
    #[error("task set has {count} tasks, more than can be numbered")]
    TooManyTasks { count: usize },

    #[error("task {task}: period must be positive (got {period})")]
    NonPositivePeriod { task: TaskId, period: i64 },

    #[error("task {task}: execution time must be positive (got {execution_time})")]
    NonPositiveExecutionTime { task: TaskId, execution_time: i64 },

    /// Deadline is zero or negative (other than the `-1` sentinel).
    #[error("task {task}: deadline must be positive or -1 (got {deadline})")]
    NonPositiveDeadline { task: TaskId, deadline: i64 },

    /// Arrival is negative and not the `-1` sentinel.
    #[error("task {task}: arrival must be non-negative or -1 (got {arrival})")]
    NegativeArrival { task: TaskId, arrival: i64 },

    /// The job can never finish inside its own deadline.
    #[error(
        "task {task}: execution time {execution_time} exceeds relative deadline {deadline}"
    )]
    ExecutionExceedsDeadline {
        task: TaskId,
        execution_time: i64,
        deadline: i64,
    },
}

// ── Top-level simulation errors ───────────────────────────────────────────────

/// Top-level error type returned by the simulator.
///
/// | Variant | Layer |
/// |---|---|
/// | `InvalidTaskSet` | configuration (caller input) |
/// | `Hyperperiod` | configuration (horizon cannot be computed or is too long) |
/// | `CapacityExceeded` | internal consistency failure |
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid task set: {0}")]
    InvalidTaskSet(#[from] TaskSetError),

    #[error("cannot determine simulation horizon: {0}")]
    Hyperperiod(#[from] HyperperiodError),

    /// A release did not fit in the ready queue arena.
    ///
    /// The arena is sized to the provable upper bound on releases within one
    /// hyperperiod, so this only happens if that bound is broken.
    #[error(
        "internal consistency error: release of task {task} at tick {tick} exceeds ready queue capacity {capacity}"
    )]
    CapacityExceeded {
        task: TaskId,
        tick: Tick,
        capacity: usize,
    },
}
