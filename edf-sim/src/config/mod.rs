/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Task set loading.
//!
//! Two input formats are accepted.
//!
//! **Text** – a task count followed by four integers per task
//! (`arrival period execution_time deadline`), whitespace separated.  `-1`
//! selects the default for `arrival` and `deadline`:
//! ```text
//! 3
//! 0 4 1 -1
//! 0 5 2 -1
//! 0 20 7 -1
//! ```
//!
//! **YAML**:
//! ```yaml
//! tasks:
//!   - { arrival: 0, period: 4, execution_time: 1 }
//!   - { period: 5, execution_time: 2, deadline: -1 }
//! demand:
//!   high_cost: 10
//!   low_cost: 3
//! ```
//!
//! Loading only parses; constraints are checked later by
//! [`TaskSet::from_specs`](crate::task::TaskSet::from_specs).

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::scheduler::DemandModel;
use crate::task::{TaskSpec, UNSET};

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TaskSetDocument {
    tasks: Vec<TaskEntry>,
    demand: Option<DemandEntry>,
}

/// Per-task fields as they appear in the YAML file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TaskEntry {
    #[serde(default = "unset")]
    arrival: i64,
    period: i64,
    execution_time: i64,
    #[serde(default = "unset")]
    deadline: i64,
}

/// Either cost may be omitted and keeps its default.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DemandEntry {
    high_cost: Option<u32>,
    low_cost: Option<u32>,
}

fn unset() -> i64 {
    UNSET
}

// ── Public data structures ────────────────────────────────────────────────────

/// Input format of a task set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSetFormat {
    Text,
    Yaml,
}

impl TaskSetFormat {
    /// `.yaml` / `.yml` → YAML, anything else → text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                TaskSetFormat::Yaml
            }
            _ => TaskSetFormat::Text,
        }
    }
}

/// A parsed, not yet validated, task set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSetFile {
    /// Task records in input order.
    pub specs: Vec<TaskSpec>,

    /// Demand model from the YAML `demand` section.  Always `None` for text.
    pub demand: Option<DemandModel>,
}

impl TaskSetFile {
    /// Read and parse `path`.
    ///
    /// `format` overrides detection by extension.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load_from_file(path: &Path, format: Option<TaskSetFormat>) -> Result<Self> {
        let format = format.unwrap_or_else(|| TaskSetFormat::from_path(path));
        info!(path = %path.display(), ?format, "Loading task set");

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open task set file: {}", path.display()))?;

        Self::parse(&content, format)
            .with_context(|| format!("Failed to parse task set file: {}", path.display()))
    }

    /// Parse task set text in the given format.
    pub fn parse(content: &str, format: TaskSetFormat) -> Result<Self> {
        let file = match format {
            TaskSetFormat::Text => Self {
                specs: parse_text(content)?,
                demand: None,
            },
            TaskSetFormat::Yaml => parse_yaml(content)?,
        };

        info!(task_count = file.specs.len(), "Task set parsed");
        for (idx, spec) in file.specs.iter().enumerate() {
            debug!(
                "  Task {}: arrival={} period={} execution_time={} deadline={}",
                idx + 1,
                spec.arrival,
                spec.period,
                spec.execution_time,
                spec.deadline,
            );
        }
        Ok(file)
    }
}

// ── Parsers ───────────────────────────────────────────────────────────────────

fn parse_text(content: &str) -> Result<Vec<TaskSpec>> {
    let mut tokens = content.split_whitespace().enumerate().map(|(pos, tok)| {
        tok.parse::<i64>()
            .with_context(|| format!("token {} ('{}') is not an integer", pos + 1, tok))
    });

    let count = match tokens.next() {
        Some(tok) => tok?,
        None => bail!("empty input — expected a task count"),
    };
    let count = usize::try_from(count)
        .with_context(|| format!("task count must be non-negative (got {count})"))?;

    // The count is untrusted; let the vector grow with the records actually read.
    let mut specs = Vec::new();
    for idx in 0..count {
        let mut field = |name: &str| -> Result<i64> {
            match tokens.next() {
                Some(value) => value,
                None => bail!(
                    "task {} of {}: missing {} (expected 4 values per task)",
                    idx + 1,
                    count,
                    name
                ),
            }
        };
        let arrival = field("arrival")?;
        let period = field("period")?;
        let execution_time = field("execution_time")?;
        let deadline = field("deadline")?;
        specs.push(TaskSpec::new(arrival, period, execution_time, deadline));
    }

    let trailing = tokens.count();
    if trailing > 0 {
        warn!(trailing, "ignoring values after the last task record");
    }

    Ok(specs)
}

fn parse_yaml(content: &str) -> Result<TaskSetFile> {
    let doc: TaskSetDocument = serde_yaml::from_str(content).context("invalid task set YAML")?;

    let specs = doc
        .tasks
        .into_iter()
        .map(|t| TaskSpec::new(t.arrival, t.period, t.execution_time, t.deadline))
        .collect();

    let demand = doc.demand.map(|d| {
        let defaults = DemandModel::default();
        DemandModel {
            high_cost: d.high_cost.unwrap_or(defaults.high_cost),
            low_cost: d.low_cost.unwrap_or(defaults.low_cost),
        }
    });

    Ok(TaskSetFile { specs, demand })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write content to a temp file with the given suffix.
    fn tempfile_with(content: &str, suffix: &str) -> NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    // ── format detection ──────────────────────────────────────────────────────

    #[test]
    fn format_follows_extension() {
        assert_eq!(TaskSetFormat::from_path(Path::new("a.yaml")), TaskSetFormat::Yaml);
        assert_eq!(TaskSetFormat::from_path(Path::new("a.YML")), TaskSetFormat::Yaml);
        assert_eq!(TaskSetFormat::from_path(Path::new("a.txt")), TaskSetFormat::Text);
        assert_eq!(TaskSetFormat::from_path(Path::new("taskset1")), TaskSetFormat::Text);
    }

    // ── text format ───────────────────────────────────────────────────────────

    #[test]
    fn parses_sample_text_task_set() {
        let text = "3\n0 4 1 -1\n0 5 2 -1\n0 20 7 -1\n";
        let file = TaskSetFile::parse(text, TaskSetFormat::Text).unwrap();
        assert_eq!(
            file.specs,
            vec![
                TaskSpec::new(0, 4, 1, -1),
                TaskSpec::new(0, 5, 2, -1),
                TaskSpec::new(0, 20, 7, -1),
            ]
        );
        assert_eq!(file.demand, None);
    }

    #[test]
    fn text_layout_is_whitespace_insensitive() {
        let file = TaskSetFile::parse("2 0 3 1 3\t0 6 4 6", TaskSetFormat::Text).unwrap();
        assert_eq!(file.specs.len(), 2);
        assert_eq!(file.specs[1], TaskSpec::new(0, 6, 4, 6));
    }

    #[test]
    fn text_with_missing_values_is_an_error() {
        let err = TaskSetFile::parse("2\n0 4 1 -1\n0 5\n", TaskSetFormat::Text).unwrap_err();
        assert!(format!("{err:#}").contains("task 2 of 2"), "{err:#}");
    }

    #[test]
    fn oversized_count_reports_missing_values() {
        let err = TaskSetFile::parse("99999999999\n0 4 1 -1\n", TaskSetFormat::Text).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("task 2 of 99999999999"), "{msg}");
        assert!(msg.contains("missing arrival"), "{msg}");
    }

    #[test]
    fn text_with_non_integer_is_an_error() {
        assert!(TaskSetFile::parse("1\n0 four 1 -1\n", TaskSetFormat::Text).is_err());
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(TaskSetFile::parse("  \n", TaskSetFormat::Text).is_err());
    }

    #[test]
    fn negative_count_is_an_error() {
        assert!(TaskSetFile::parse("-1\n", TaskSetFormat::Text).is_err());
    }

    #[test]
    fn zero_count_parses_to_empty_set() {
        // Rejected later by validation, not by the parser.
        let file = TaskSetFile::parse("0", TaskSetFormat::Text).unwrap();
        assert!(file.specs.is_empty());
    }

    // ── YAML format ───────────────────────────────────────────────────────────

    #[test]
    fn yaml_defaults_missing_arrival_and_deadline_to_sentinel() {
        let yaml = r#"
tasks:
  - { arrival: 0, period: 4, execution_time: 1 }
  - period: 5
    execution_time: 2
    deadline: 4
"#;
        let file = TaskSetFile::parse(yaml, TaskSetFormat::Yaml).unwrap();
        assert_eq!(
            file.specs,
            vec![TaskSpec::new(0, 4, 1, UNSET), TaskSpec::new(UNSET, 5, 2, 4)]
        );
        assert_eq!(file.demand, None);
    }

    #[test]
    fn yaml_demand_section_overrides_defaults() {
        let yaml = r#"
tasks:
  - { period: 4, execution_time: 1 }
demand:
  high_cost: 8
"#;
        let file = TaskSetFile::parse(yaml, TaskSetFormat::Yaml).unwrap();
        assert_eq!(
            file.demand,
            Some(DemandModel {
                high_cost: 8,
                low_cost: DemandModel::default().low_cost
            })
        );
    }

    #[test]
    fn yaml_missing_period_is_an_error() {
        let yaml = "tasks:\n  - { execution_time: 1 }\n";
        assert!(TaskSetFile::parse(yaml, TaskSetFormat::Yaml).is_err());
    }

    #[test]
    fn yaml_unknown_field_is_an_error() {
        let yaml = "tasks:\n  - { period: 4, execution_time: 1, wcet: 2 }\n";
        assert!(TaskSetFile::parse(yaml, TaskSetFormat::Yaml).is_err());
    }

    // ── load_from_file ────────────────────────────────────────────────────────

    #[test]
    fn load_yaml_file_by_extension() {
        let f = tempfile_with("tasks:\n  - { period: 3, execution_time: 1 }\n", ".yaml");
        let file = TaskSetFile::load_from_file(f.path(), None).unwrap();
        assert_eq!(file.specs, vec![TaskSpec::implicit(3, 1)]);
    }

    #[test]
    fn load_text_file_by_extension() {
        let f = tempfile_with("1\n-1 3 1 -1\n", ".txt");
        let file = TaskSetFile::load_from_file(f.path(), None).unwrap();
        assert_eq!(file.specs, vec![TaskSpec::implicit(3, 1)]);
    }

    #[test]
    fn explicit_format_beats_extension() {
        let f = tempfile_with("1\n0 3 1 3\n", ".yaml");
        let file = TaskSetFile::load_from_file(f.path(), Some(TaskSetFormat::Text)).unwrap();
        assert_eq!(file.specs, vec![TaskSpec::new(0, 3, 1, 3)]);
    }

    #[test]
    fn missing_file_returns_error() {
        let result = TaskSetFile::load_from_file(Path::new("/nonexistent/taskset.yaml"), None);
        assert!(result.is_err());
    }
}
