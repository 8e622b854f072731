/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! EDF schedulability analysis on one processor.
//!
//! The verdict is **computed and logged** before every simulation and carried
//! in the report.  It never blocks the run: an overloaded task set is still
//! simulated to the end of its hyperperiod.
//!
//! # Theory
//! With `U = Σ Cᵢ/Tᵢ` and density `Δ = Σ Cᵢ/min(Dᵢ, Tᵢ)`:
//!
//! | Condition | Verdict |
//! |---|---|
//! | `U > 1` | infeasible under any policy |
//! | `Δ ≤ 1` | feasible under EDF (exact when every `Dᵢ = Tᵢ`) |
//! | otherwise | inconclusive; needs processor-demand analysis |

use crate::task::Task;

/// Slack absorbed when comparing sums of floating point ratios against `1.0`.
const EPSILON: f64 = 1e-9;

/// Outcome of [`check_edf`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    Feasible,
    Inconclusive,
    Infeasible,
}

/// Utilisation figures and verdict for one task set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeasibilityReport {
    pub utilization: f64,
    pub density: f64,
    pub verdict: Feasibility,
}

/// `Σ execution_time / period`.
pub fn edf_utilization(tasks: &[Task]) -> f64 {
    tasks.iter().map(Task::utilization).sum()
}

/// `Σ execution_time / min(deadline, period)`.
pub fn edf_density(tasks: &[Task]) -> f64 {
    tasks.iter().map(Task::density).sum()
}

/// Classify `tasks` with the utilisation and density bounds.
pub fn check_edf(tasks: &[Task]) -> FeasibilityReport {
    let utilization = edf_utilization(tasks);
    let density = edf_density(tasks);

    let verdict = if utilization > 1.0 + EPSILON {
        Feasibility::Infeasible
    } else if density <= 1.0 + EPSILON {
        Feasibility::Feasible
    } else {
        Feasibility::Inconclusive
    };

    FeasibilityReport {
        utilization,
        density,
        verdict,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn task(period: u64, execution_time: u64, deadline: u64) -> Task {
        Task {
            id: 1,
            arrival: 0,
            period,
            execution_time,
            deadline,
        }
    }

    #[test]
    fn empty_set_is_feasible() {
        let r = check_edf(&[]);
        assert_eq!(r.verdict, Feasibility::Feasible);
        assert_eq!(r.utilization, 0.0);
    }

    #[test]
    fn full_utilization_with_implicit_deadlines_is_feasible() {
        // 1/3 + 4/6 = 1.0 exactly
        let r = check_edf(&[task(3, 1, 3), task(6, 4, 6)]);
        assert!((r.utilization - 1.0).abs() < 1e-9);
        assert_eq!(r.verdict, Feasibility::Feasible);
    }

    #[test]
    fn classic_sample_set_is_feasible() {
        // 1/4 + 2/5 + 7/20 = 1.0
        let r = check_edf(&[task(4, 1, 4), task(5, 2, 5), task(20, 7, 20)]);
        assert_eq!(r.verdict, Feasibility::Feasible);
    }

    #[test]
    fn over_one_is_infeasible() {
        let r = check_edf(&[task(2, 1, 2), task(3, 2, 3)]);
        assert!(r.utilization > 1.0);
        assert_eq!(r.verdict, Feasibility::Infeasible);
    }

    #[test]
    fn tight_constrained_deadlines_are_inconclusive() {
        // U = 0.2 + 0.2 = 0.4, density = 2/3 + 2/3 > 1
        let r = check_edf(&[task(10, 2, 3), task(10, 2, 3)]);
        assert!(r.utilization < 1.0);
        assert!(r.density > 1.0);
        assert_eq!(r.verdict, Feasibility::Inconclusive);
    }
}
