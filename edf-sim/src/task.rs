/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Periodic task model for the EDF simulator.
//!
//! Two types model the two sides of task set loading:
//!
//! ```text
//! file / stdin  ──(TaskSpec)──►  TaskSet::from_specs()  ──►  TaskSet { Vec<Task> }
//!                  ↑ raw record, -1 sentinels                  ↑ validated, immutable
//! ```
//!
//! # Ownership model
//! A [`TaskSet`] is immutable once built.  The simulator borrows it for the
//! whole run; every job in the ready queue refers back to its task by
//! [`TaskId`] rather than by reference, so no job can outlive the set.

use tracing::{debug, warn};

use crate::scheduler::error::TaskSetError;

/// Simulation time, in ticks.
pub type Tick = u64;

/// Task identifier.  Assigned `1..=N` in load order.
pub type TaskId = u32;

/// Sentinel accepted for `arrival` and `deadline` meaning "use the default".
pub const UNSET: i64 = -1;

// ── TaskSpec (raw input record) ──────────────────────────────────────────────

/// One task record exactly as read from the input.
///
/// Values are signed so that the `-1` sentinel and invalid (negative or zero)
/// inputs can be represented and rejected with a precise error instead of
/// failing inside the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    /// First release tick, or [`UNSET`] for `0`.
    pub arrival: i64,
    pub period: i64,
    pub execution_time: i64,
    /// Relative deadline, or [`UNSET`] for "equal to the period".
    pub deadline: i64,
}

impl TaskSpec {
    pub fn new(arrival: i64, period: i64, execution_time: i64, deadline: i64) -> Self {
        Self {
            arrival,
            period,
            execution_time,
            deadline,
        }
    }

    /// Implicit-deadline task released at tick 0.
    pub fn implicit(period: i64, execution_time: i64) -> Self {
        Self::new(UNSET, period, execution_time, UNSET)
    }
}

// ── Task (validated) ──────────────────────────────────────────────────────────

/// A validated periodic task.
///
/// Invariants established by [`TaskSet::from_specs`]:
/// `period > 0`, `0 < execution_time <= deadline`.  `deadline <= period` is
/// expected but only warned about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub arrival: Tick,
    pub period: Tick,
    pub execution_time: Tick,
    pub deadline: Tick,
}

impl Task {
    /// Returns `true` if a job of this task is released at tick `t`.
    ///
    /// Ticks before the first arrival never release, whatever the period.
    pub fn releases_at(&self, t: Tick) -> bool {
        t >= self.arrival && (t - self.arrival) % self.period == 0
    }

    /// Processor utilisation `execution_time / period`.
    pub fn utilization(&self) -> f64 {
        self.execution_time as f64 / self.period as f64
    }

    /// Density `execution_time / min(deadline, period)`.
    pub fn density(&self) -> f64 {
        self.execution_time as f64 / self.deadline.min(self.period) as f64
    }
}

// ── TaskSet ───────────────────────────────────────────────────────────────────

/// Ordered, validated collection of tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    /// Validate raw records and assign ids `1..=N` in input order.
    ///
    /// Sentinels are resolved first (`arrival = -1 → 0`,
    /// `deadline = -1 → period`), then every constraint is checked.  The first
    /// violation aborts the whole load.
    ///
    /// # Errors
    /// Any [`TaskSetError`] variant; each names the offending task.
    pub fn from_specs(specs: &[TaskSpec]) -> Result<Self, TaskSetError> {
        if specs.is_empty() {
            return Err(TaskSetError::Empty);
        }

        let mut tasks = Vec::with_capacity(specs.len());
        for (idx, spec) in specs.iter().enumerate() {
            let id = TaskId::try_from(idx + 1).map_err(|_| TaskSetError::TooManyTasks {
                count: specs.len(),
            })?;
            let task = Self::validate(id, spec)?;
            debug!(
                task = task.id,
                arrival = task.arrival,
                period = task.period,
                execution_time = task.execution_time,
                deadline = task.deadline,
                "task loaded"
            );
            tasks.push(task);
        }

        Ok(Self { tasks })
    }

    fn validate(id: TaskId, spec: &TaskSpec) -> Result<Task, TaskSetError> {
        if spec.period <= 0 {
            return Err(TaskSetError::NonPositivePeriod {
                task: id,
                period: spec.period,
            });
        }
        if spec.execution_time <= 0 {
            return Err(TaskSetError::NonPositiveExecutionTime {
                task: id,
                execution_time: spec.execution_time,
            });
        }

        let arrival = match spec.arrival {
            UNSET => 0,
            a if a < 0 => {
                return Err(TaskSetError::NegativeArrival {
                    task: id,
                    arrival: a,
                })
            }
            a => a,
        };

        let deadline = match spec.deadline {
            UNSET => spec.period,
            d if d <= 0 => {
                return Err(TaskSetError::NonPositiveDeadline {
                    task: id,
                    deadline: d,
                })
            }
            d => d,
        };

        if spec.execution_time > deadline {
            return Err(TaskSetError::ExecutionExceedsDeadline {
                task: id,
                execution_time: spec.execution_time,
                deadline,
            });
        }

        if deadline > spec.period {
            warn!(
                task = id,
                deadline,
                period = spec.period,
                "deadline exceeds period; consecutive jobs of this task may overlap"
            );
        }

        // Every value is non-negative here, so the casts are lossless.
        Ok(Task {
            id,
            arrival: arrival as Tick,
            period: spec.period as Tick,
            execution_time: spec.execution_time as Tick,
            deadline: deadline as Tick,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Always `false` for a validated set; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
