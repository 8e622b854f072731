/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Ready queue: a grow-only arena of job instances.
//!
//! Jobs are appended in release order and addressed by [`JobHandle`].
//! Completed jobs stay in the arena, marked inactive, so a handle is valid for
//! the whole run and slots are never reused.  Insertion order doubles as the
//! EDF tie-break order.

use tracing::debug;

use super::error::SimulationError;
use super::DemandModel;
use crate::task::{Task, TaskId, Tick};

/// Index of a job in the [`ReadyQueue`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobHandle(usize);

impl JobHandle {
    /// Position in release order, starting at 0.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One periodic release of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub task_id: TaskId,
    pub release_tick: Tick,
    /// `release_tick + task.deadline`.
    pub absolute_deadline: Tick,
    /// Work left, in ticks.  Starts at `execution_time`.
    pub remaining_time: Tick,
    /// Copied from the task so the demand model needs no task lookup.
    pub execution_time: Tick,
    active: bool,
}

impl Job {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Has received at least one tick of service.
    pub fn is_started(&self) -> bool {
        self.remaining_time < self.execution_time
    }
}

/// Arena of jobs with a fixed release capacity.
///
/// `active` lists the handles of unfinished jobs in release order, so a tick
/// only touches the jobs still in play.  The arena grows as jobs are admitted;
/// `capacity` bounds the number of admissions, not the reserved memory.
#[derive(Debug, Clone)]
pub struct ReadyQueue {
    jobs: Vec<Job>,
    active: Vec<JobHandle>,
    capacity: usize,
}

impl ReadyQueue {
    /// Empty queue that accepts at most `capacity` releases over its lifetime.
    pub fn new(capacity: usize) -> Self {
        Self {
            jobs: Vec::new(),
            active: Vec::new(),
            capacity,
        }
    }

    /// Append a new active job for `task` released at `tick`.
    ///
    /// # Errors
    /// [`SimulationError::CapacityExceeded`] if the arena is already full.
    pub fn admit(&mut self, task: &Task, tick: Tick) -> Result<JobHandle, SimulationError> {
        if self.jobs.len() >= self.capacity {
            return Err(SimulationError::CapacityExceeded {
                task: task.id,
                tick,
                capacity: self.capacity,
            });
        }

        let handle = JobHandle(self.jobs.len());
        self.jobs.push(Job {
            task_id: task.id,
            release_tick: tick,
            absolute_deadline: tick + task.deadline,
            remaining_time: task.execution_time,
            execution_time: task.execution_time,
            active: true,
        });
        self.active.push(handle);
        Ok(handle)
    }

    /// Active job with the smallest absolute deadline.
    ///
    /// On equal deadlines the job released first wins: the comparison is
    /// strict, so a later job must be strictly earlier to displace it.
    pub fn earliest_deadline(&self) -> Option<JobHandle> {
        let mut best: Option<(JobHandle, Tick)> = None;
        for &handle in &self.active {
            let deadline = self.jobs[handle.0].absolute_deadline;
            match best {
                Some((_, best_deadline)) if deadline >= best_deadline => {}
                _ => best = Some((handle, deadline)),
            }
        }
        best.map(|(handle, _)| handle)
    }

    /// Give one tick of service to `handle`.  Returns the remaining time.
    ///
    /// The job stays active, even at zero, until [`retire`](Self::retire).
    pub fn serve(&mut self, handle: JobHandle) -> Tick {
        let job = &mut self.jobs[handle.0];
        debug_assert!(job.active, "serving inactive job {handle:?}");
        debug_assert!(job.remaining_time > 0, "serving finished job {handle:?}");
        job.remaining_time = job.remaining_time.saturating_sub(1);
        job.remaining_time
    }

    /// Deactivate `handle` if it has no work left.  Returns `true` if retired.
    pub fn retire(&mut self, handle: JobHandle) -> bool {
        let job = &mut self.jobs[handle.0];
        if !job.active || job.remaining_time != 0 {
            return false;
        }
        job.active = false;
        // `remove`, not `swap_remove`: release order is the tie-break order.
        if let Some(pos) = self.active.iter().position(|&h| h == handle) {
            self.active.remove(pos);
        }
        true
    }

    /// Demand of all active jobs under `model`.
    ///
    /// Summed in `u64` and saturating, so large per-job costs cannot wrap.
    pub fn demand(&self, model: &DemandModel) -> u64 {
        self.active_jobs()
            .map(|(_, job)| u64::from(model.cost_of(job)))
            .fold(0, u64::saturating_add)
    }

    /// Active jobs in release order.
    pub fn active_jobs(&self) -> impl Iterator<Item = (JobHandle, &Job)> + '_ {
        self.active
            .iter()
            .map(move |&handle| (handle, &self.jobs[handle.0]))
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Every job ever admitted, active or not.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Number of releases admitted so far.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Log every active job at `debug` level.
    pub fn dump(&self) {
        for (handle, job) in self.active_jobs() {
            debug!(
                slot = handle.index(),
                task = job.task_id,
                deadline = job.absolute_deadline,
                remaining = job.remaining_time,
                release = job.release_tick,
                "  ready"
            );
        }
    }
}

impl std::ops::Index<JobHandle> for ReadyQueue {
    type Output = Job;

    fn index(&self, handle: JobHandle) -> &Job {
        &self.jobs[handle.0]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
