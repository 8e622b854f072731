/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Offline Earliest-Deadline-First simulator for periodic task sets.
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── task          – TaskSpec (raw input) → TaskSet (validated)
//! ├── config/       – text / YAML task set loading
//! ├── hyperperiod/  – LCM / GCD helpers, simulation horizon
//! ├── scheduler/    – ready queue, tick loop, feasibility, errors
//! └── report        – textual trace output
//! ```
//!
//! Data flows one way:
//! `TaskSet → HyperperiodInfo → ReadyQueue → Simulation → TraceReporter`.

pub mod config;
pub mod hyperperiod;
pub mod report;
pub mod scheduler;
pub mod task;
