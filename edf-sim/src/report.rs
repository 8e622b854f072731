/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Textual trace output.
//!
//! The line format is a compatibility contract:
//!
//! ```text
//! Time:   0 ----> Task: 1
//! Time:   1 ----> Task: IDLE
//! ...
//! Hyperperiod: 6 | Worst Case Stack Space needed: 13 frames
//! ```
//!
//! Tick numbers are right-aligned to at least three columns.  With
//! `show_demand` each tick line also carries ` | Stack Space: <d>`.

use std::io::{self, Write};

use crate::scheduler::{SimulationReport, TickRecord};

/// Minimum width of the tick column.
const TICK_WIDTH: usize = 3;

/// Formats a [`SimulationReport`] as text.  Holds formatting options only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceReporter {
    show_demand: bool,
}

impl TraceReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the per-tick demand to each tick line.
    pub fn with_demand(mut self, show_demand: bool) -> Self {
        self.show_demand = show_demand;
        self
    }

    pub fn tick_line(&self, record: &TickRecord) -> String {
        let task = match record.task_id() {
            Some(id) => id.to_string(),
            None => String::from("IDLE"),
        };
        let mut line = format!(
            "Time: {:>width$} ----> Task: {}",
            record.tick,
            task,
            width = TICK_WIDTH
        );
        if self.show_demand {
            line.push_str(&format!(" | Stack Space: {}", record.demand));
        }
        line
    }

    pub fn summary_line(&self, report: &SimulationReport) -> String {
        format!(
            "Hyperperiod: {} | Worst Case Stack Space needed: {} frames",
            report.hyperperiod.hyperperiod, report.worst_case_demand
        )
    }

    /// Write every tick line, then the summary line.
    pub fn write<W: Write>(&self, report: &SimulationReport, mut out: W) -> io::Result<()> {
        for record in &report.trace {
            writeln!(out, "{}", self.tick_line(record))?;
        }
        writeln!(out, "{}", self.summary_line(report))?;
        out.flush()
    }

    /// The full output as one string.
    pub fn render(&self, report: &SimulationReport) -> String {
        let mut text = String::new();
        for record in &report.trace {
            text.push_str(&self.tick_line(record));
            text.push('\n');
        }
        text.push_str(&self.summary_line(report));
        text.push('\n');
        text
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::EdfScheduler;
    use crate::task::{TaskSet, TaskSpec};

    fn report(specs: &[TaskSpec]) -> SimulationReport {
        let tasks = TaskSet::from_specs(specs).unwrap();
        EdfScheduler::new().simulate(&tasks).unwrap()
    }

    #[test]
    fn renders_two_task_example() {
        let r = report(&[TaskSpec::new(0, 3, 1, 3), TaskSpec::new(0, 6, 4, 6)]);
        let expected = "\
Time:   0 ----> Task: 1
Time:   1 ----> Task: 2
Time:   2 ----> Task: 2
Time:   3 ----> Task: 2
Time:   4 ----> Task: 2
Time:   5 ----> Task: 1
Hyperperiod: 6 | Worst Case Stack Space needed: 13 frames
";
        assert_eq!(TraceReporter::new().render(&r), expected);
    }

    #[test]
    fn idle_ticks_render_as_idle() {
        let r = report(&[TaskSpec::new(1, 2, 1, 2)]);
        let text = TraceReporter::new().render(&r);
        assert!(text.starts_with("Time:   0 ----> Task: IDLE\nTime:   1 ----> Task: 1\n"));
    }

    #[test]
    fn wide_ticks_are_not_truncated() {
        let r = report(&[TaskSpec::implicit(1000, 1)]);
        let line = TraceReporter::new().tick_line(&r.trace[999]);
        assert_eq!(line, "Time: 999 ----> Task: IDLE");

        let r = report(&[TaskSpec::new(1000, 1001, 1, 1001)]);
        let line = TraceReporter::new().tick_line(&r.trace[1000]);
        assert_eq!(line, "Time: 1000 ----> Task: 1");
    }

    #[test]
    fn demand_column_is_optional() {
        let r = report(&[TaskSpec::new(0, 3, 1, 3), TaskSpec::new(0, 6, 4, 6)]);
        let line = TraceReporter::new().with_demand(true).tick_line(&r.trace[0]);
        assert_eq!(line, "Time:   0 ----> Task: 1 | Stack Space: 13");
    }

    #[test]
    fn write_matches_render_byte_for_byte() {
        let specs = [
            TaskSpec::implicit(4, 1),
            TaskSpec::implicit(5, 2),
            TaskSpec::implicit(20, 7),
        ];
        let reporter = TraceReporter::new();
        let mut first = Vec::new();
        reporter.write(&report(&specs), &mut first).unwrap();
        let mut second = Vec::new();
        reporter.write(&report(&specs), &mut second).unwrap();

        assert_eq!(first, second);
        assert_eq!(String::from_utf8(first).unwrap(), reporter.render(&report(&specs)));
    }

    #[test]
    fn service_counts_match_rendered_lines() {
        let r = report(&[
            TaskSpec::implicit(4, 1),
            TaskSpec::implicit(5, 2),
            TaskSpec::implicit(20, 7),
        ]);
        let text = TraceReporter::new().render(&r);
        for id in 1..=3 {
            let needle = format!("Task: {id}\n");
            assert_eq!(text.matches(&needle).count(), r.service_of(id));
        }
        assert_eq!(r.service_of(3), 7);
    }
}
