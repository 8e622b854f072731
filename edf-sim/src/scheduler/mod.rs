/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Tick-level EDF simulation.
//!
//! [`EdfScheduler`] holds the run parameters (demand model, horizon limit) and
//! is stateless between runs.  Each call to [`EdfScheduler::start`] creates a
//! [`Simulation`] that owns its ready queue and counters; nothing is shared
//! between simulations, so runs cannot influence each other.
//!
//! # Per-tick algorithm
//! ```text
//! 1. admit every task whose release falls on t      (task order)
//! 2. select the active job with the earliest absolute deadline
//!    (ties: first released wins)
//! 3. none active          → idle tick
//! 4. selected job         → remaining_time -= 1
//! 5. demand = Σ active jobs (high_cost if started, else low_cost)
//! 6. remaining_time == 0  → deactivate
//! 7. record (t, selected task or idle)
//! ```
//!
//! # Example
//! ```rust
//! use edf_sim::scheduler::EdfScheduler;
//! use edf_sim::task::{TaskSet, TaskSpec};
//!
//! let tasks = TaskSet::from_specs(&[
//!     TaskSpec::new(0, 3, 1, 3),
//!     TaskSpec::new(0, 6, 4, 6),
//! ])
//! .unwrap();
//!
//! let report = EdfScheduler::new().simulate(&tasks).unwrap();
//! assert_eq!(report.hyperperiod.hyperperiod, 6);
//! assert_eq!(report.schedule()[0], Some(1));
//! ```

pub mod error;
pub mod feasibility;
pub mod queue;

pub use error::{SimulationError, TaskSetError};
pub use queue::{Job, JobHandle, ReadyQueue};

use tracing::{debug, info, warn};

use crate::hyperperiod::{HyperperiodCalculator, HyperperiodInfo};
use crate::task::{TaskId, TaskSet, TaskSpec, Tick};

use feasibility::{check_edf, Feasibility, FeasibilityReport};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Demand of an active job that has already received service.
pub const HIGH_COST: u32 = 10;

/// Demand of an active job that has not started yet.
pub const LOW_COST: u32 = 3;

// ── DemandModel ───────────────────────────────────────────────────────────────

/// Per-job cost used for the stack demand proxy.
///
/// A started job needs a full stack frame; a queued one only its minimal
/// context.  The figures are analytical weights, not measured memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemandModel {
    pub high_cost: u32,
    pub low_cost: u32,
}

impl DemandModel {
    /// Cost of one active job.
    pub fn cost_of(&self, job: &Job) -> u32 {
        if job.is_started() {
            self.high_cost
        } else {
            self.low_cost
        }
    }
}

impl Default for DemandModel {
    fn default() -> Self {
        Self {
            high_cost: HIGH_COST,
            low_cost: LOW_COST,
        }
    }
}

// ── Per-tick output ───────────────────────────────────────────────────────────

/// The job chosen for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub task_id: TaskId,
    pub job: JobHandle,
    pub absolute_deadline: Tick,
    /// The job finished during this tick and was deactivated.
    pub completed: bool,
}

/// Scheduling decision for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRecord {
    pub tick: Tick,
    /// `None` for an idle tick.
    pub selected: Option<Selection>,
    /// Active jobs at selection time, after admission.
    pub active_jobs: usize,
    /// Demand after service, before the completed job is retired.
    pub demand: u64,
}

impl TickRecord {
    pub fn task_id(&self) -> Option<TaskId> {
        self.selected.map(|s| s.task_id)
    }

    pub fn is_idle(&self) -> bool {
        self.selected.is_none()
    }
}

/// A job still unfinished when its absolute deadline was reached.
///
/// Recorded for diagnostics only; scheduling continues unchanged and the job
/// keeps competing with its original deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineMiss {
    pub task_id: TaskId,
    pub job: JobHandle,
    pub release_tick: Tick,
    pub absolute_deadline: Tick,
    /// Work left when the deadline passed.
    pub remaining_time: Tick,
}

/// Full result of one simulation run.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub hyperperiod: HyperperiodInfo,
    pub trace: Vec<TickRecord>,
    pub worst_case_demand: u64,
    pub deadline_misses: Vec<DeadlineMiss>,
    /// Releases per task, indexed by `task_id - 1`.
    pub releases_per_task: Vec<u64>,
    pub feasibility: FeasibilityReport,
}

impl SimulationReport {
    /// Selected task per tick, `None` when idle.
    pub fn schedule(&self) -> Vec<Option<TaskId>> {
        self.trace.iter().map(TickRecord::task_id).collect()
    }

    pub fn idle_ticks(&self) -> usize {
        self.trace.iter().filter(|r| r.is_idle()).count()
    }

    /// Ticks of service given to `task_id`.
    pub fn service_of(&self, task_id: TaskId) -> usize {
        self.trace
            .iter()
            .filter(|r| r.task_id() == Some(task_id))
            .count()
    }
}

// ── EdfScheduler ──────────────────────────────────────────────────────────────

/// Single-processor EDF simulator.
#[derive(Debug, Clone, Default)]
pub struct EdfScheduler {
    demand: DemandModel,
    hyperperiod: HyperperiodCalculator,
}

impl EdfScheduler {
    /// Scheduler with the default demand model and horizon limit.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_demand(mut self, demand: DemandModel) -> Self {
        self.demand = demand;
        self
    }

    /// Reject task sets whose hyperperiod exceeds `limit` ticks.
    pub fn with_hyperperiod_limit(mut self, limit: Tick) -> Self {
        self.hyperperiod = HyperperiodCalculator::with_limit(limit);
        self
    }

    /// Validate raw records, then [`simulate`](Self::simulate).
    ///
    /// # Errors
    /// [`SimulationError::InvalidTaskSet`] before any simulation work, or any
    /// error from [`simulate`](Self::simulate).
    pub fn simulate_specs(&self, specs: &[TaskSpec]) -> Result<SimulationReport, SimulationError> {
        let tasks = TaskSet::from_specs(specs)?;
        info!(task_count = tasks.len(), "task set validated");
        self.simulate(&tasks)
    }

    /// Simulate one full hyperperiod of `tasks`.
    ///
    /// # Errors
    /// * [`SimulationError::Hyperperiod`] – the horizon cannot be computed or
    ///   exceeds the limit.
    /// * [`SimulationError::CapacityExceeded`] – internal consistency failure.
    pub fn simulate(&self, tasks: &TaskSet) -> Result<SimulationReport, SimulationError> {
        let mut sim = self.start(tasks)?;
        while sim.step()?.is_some() {}
        let report = sim.finish();

        info!(
            hyperperiod = report.hyperperiod.hyperperiod,
            worst_case_demand = report.worst_case_demand,
            idle_ticks = report.idle_ticks(),
            deadline_misses = report.deadline_misses.len(),
            "=== EDF simulation complete ==="
        );
        Ok(report)
    }

    /// Prepare a step-wise simulation of `tasks`.
    ///
    /// Computes the hyperperiod, bounds the ready queue and logs the
    /// feasibility verdict.  No tick has run yet.
    pub fn start<'a>(&self, tasks: &'a TaskSet) -> Result<Simulation<'a>, SimulationError> {
        let hyperperiod = self.hyperperiod.calculate(tasks.tasks())?;
        let feasibility = check_edf(tasks.tasks());

        match feasibility.verdict {
            Feasibility::Feasible => debug!(
                utilization = feasibility.utilization,
                density = feasibility.density,
                "task set is EDF-feasible"
            ),
            Feasibility::Inconclusive => warn!(
                utilization = feasibility.utilization,
                density = feasibility.density,
                "density exceeds 1 — EDF feasibility not proven by utilisation bounds"
            ),
            Feasibility::Infeasible => warn!(
                utilization = feasibility.utilization,
                "utilisation exceeds 1 — deadlines will be missed"
            ),
        }

        info!(
            task_count = tasks.len(),
            hyperperiod = hyperperiod.hyperperiod,
            high_cost = self.demand.high_cost,
            low_cost = self.demand.low_cost,
            "=== Starting EDF simulation ==="
        );

        Ok(Simulation {
            tasks,
            demand: self.demand,
            queue: ReadyQueue::new(hyperperiod.release_bound),
            releases_per_task: vec![0; tasks.len()],
            hyperperiod,
            feasibility,
            now: 0,
            worst_case_demand: 0,
            trace: Vec::new(),
            deadline_misses: Vec::new(),
        })
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// One in-progress simulation run.
///
/// Owns every piece of mutable state for the run.  Drive it with
/// [`step`](Self::step) until it returns `Ok(None)`, then call
/// [`finish`](Self::finish).
#[derive(Debug)]
pub struct Simulation<'a> {
    tasks: &'a TaskSet,
    demand: DemandModel,
    hyperperiod: HyperperiodInfo,
    feasibility: FeasibilityReport,
    queue: ReadyQueue,
    releases_per_task: Vec<u64>,
    now: Tick,
    worst_case_demand: u64,
    trace: Vec<TickRecord>,
    deadline_misses: Vec<DeadlineMiss>,
}

impl<'a> Simulation<'a> {
    pub fn queue(&self) -> &ReadyQueue {
        &self.queue
    }

    pub fn is_finished(&self) -> bool {
        self.now >= self.hyperperiod.hyperperiod
    }

    /// Simulate one tick.  Returns `Ok(None)` once the hyperperiod is done.
    pub fn step(&mut self) -> Result<Option<TickRecord>, SimulationError> {
        if self.is_finished() {
            return Ok(None);
        }
        let t = self.now;

        self.admit_releases(t)?;
        let active_jobs = self.queue.active_count();
        debug!(
            tick = t,
            active = active_jobs,
            released = self.queue.len(),
            "ready queue updated"
        );
        self.queue.dump();

        let chosen = self.queue.earliest_deadline();
        if let Some(handle) = chosen {
            self.queue.serve(handle);
        }

        let demand = self.queue.demand(&self.demand);
        self.worst_case_demand = self.worst_case_demand.max(demand);

        let selected = chosen.map(|handle| {
            let completed = self.queue.retire(handle);
            let job = &self.queue[handle];
            Selection {
                task_id: job.task_id,
                job: handle,
                absolute_deadline: job.absolute_deadline,
                completed,
            }
        });

        match selected {
            Some(s) => debug!(
                tick = t,
                task = s.task_id,
                deadline = s.absolute_deadline,
                completed = s.completed,
                demand,
                "selected"
            ),
            None => debug!(tick = t, demand, "idle"),
        }

        self.observe_deadlines(t);

        let record = TickRecord {
            tick: t,
            selected,
            active_jobs,
            demand,
        };
        self.trace.push(record);
        self.now += 1;
        Ok(Some(record))
    }

    /// Consume the run and produce its report.
    ///
    /// Calling this before the hyperperiod is done reports only the ticks
    /// simulated so far.
    pub fn finish(self) -> SimulationReport {
        SimulationReport {
            hyperperiod: self.hyperperiod,
            trace: self.trace,
            worst_case_demand: self.worst_case_demand,
            deadline_misses: self.deadline_misses,
            releases_per_task: self.releases_per_task,
            feasibility: self.feasibility,
        }
    }

    fn admit_releases(&mut self, t: Tick) -> Result<(), SimulationError> {
        for task in self.tasks {
            if !task.releases_at(t) {
                continue;
            }
            let handle = self.queue.admit(task, t)?;
            self.releases_per_task[task.id as usize - 1] += 1;
            debug!(
                tick = t,
                task = task.id,
                slot = handle.index(),
                deadline = t + task.deadline,
                "release admitted"
            );
        }
        Ok(())
    }

    /// Record jobs whose deadline falls at the end of tick `t` with work left.
    ///
    /// Each job's deadline is reached exactly once, so each miss is recorded
    /// once.
    fn observe_deadlines(&mut self, t: Tick) {
        let misses: Vec<DeadlineMiss> = self
            .queue
            .active_jobs()
            .filter(|(_, job)| job.absolute_deadline == t + 1 && job.remaining_time > 0)
            .map(|(handle, job)| DeadlineMiss {
                task_id: job.task_id,
                job: handle,
                release_tick: job.release_tick,
                absolute_deadline: job.absolute_deadline,
                remaining_time: job.remaining_time,
            })
            .collect();

        for miss in misses {
            warn!(
                task = miss.task_id,
                release = miss.release_tick,
                deadline = miss.absolute_deadline,
                remaining = miss.remaining_time,
                "deadline missed"
            );
            self.deadline_misses.push(miss);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
