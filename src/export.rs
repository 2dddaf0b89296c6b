//! JSON export of a completed [`Task`], per the documented `--json` shape.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::task::{LineType, Task, TaskStatus};

#[derive(Debug, Serialize)]
pub struct OutputLineExport {
    pub content: String,
    pub line_type: &'static str,
    pub importance: u8,
}

#[derive(Debug, Serialize)]
pub struct TaskExport {
    pub label: String,
    pub command: String,
    pub args: Vec<String>,
    pub status: &'static str,
    pub exit_code: Option<i32>,
    pub duration_ms: Option<u128>,
    pub completed_at: Option<DateTime<Utc>>,
    pub lines: Vec<OutputLineExport>,
}

fn line_type_name(line_type: LineType) -> &'static str {
    match line_type {
        LineType::Detail => "detail",
        LineType::Error => "error",
        LineType::Warning => "warning",
        LineType::Success => "success",
        LineType::Info => "info",
        LineType::Progress => "progress",
    }
}

fn status_name(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Success => "success",
        TaskStatus::Warning => "warning",
        TaskStatus::Error => "error",
    }
}

/// Build the exportable snapshot of a task. Timestamps are anchored to
/// `now` (the caller's observation instant) since [`std::time::Instant`]
/// carries no wall-clock meaning on its own.
pub fn export_task(task: &Task, now_instant: std::time::Instant, now_wall: DateTime<Utc>) -> TaskExport {
    let completed_at = task.completed_at.map(|completed| {
        let delta = now_instant.saturating_duration_since(completed);
        now_wall - chrono::Duration::from_std(delta).unwrap_or_default()
    });

    TaskExport {
        label: task.label.clone(),
        command: task.command.clone(),
        args: task.args.clone(),
        status: task.status.map(status_name).unwrap_or("pending"),
        exit_code: task.exit_code,
        duration_ms: task.duration.map(|d| d.as_millis()),
        completed_at,
        lines: task
            .snapshot_lines()
            .into_iter()
            .filter(|line| !line.context.is_internal)
            .map(|line| OutputLineExport {
                content: line.content,
                line_type: line_type_name(line.line_type),
                importance: line.context.importance,
            })
            .collect(),
    }
}

/// Serialize a task snapshot to a pretty-printed JSON string.
pub fn to_json_string(export: &TaskExport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{CognitiveLoad, LineContext};
    use crate::theme;

    #[test]
    fn export_omits_internal_lines() {
        let theme = theme::resolve("ascii_minimal", false, true, true, true);
        let mut task = Task::new("build", "make", vec![], "building", theme);
        task.add_output_line("[fo] internal", LineType::Error, LineContext::internal(5));
        task.add_output_line("real", LineType::Detail, LineContext::classified(CognitiveLoad::Low, 1));
        task.complete(0);

        let export = export_task(&task, std::time::Instant::now(), Utc::now());
        assert_eq!(export.lines.len(), 1);
        assert_eq!(export.lines[0].content, "real");
        assert_eq!(export.status, "success");
    }

    #[test]
    fn serialization_produces_valid_json() {
        let theme = theme::resolve("ascii_minimal", false, true, true, true);
        let mut task = Task::new("build", "make", vec![], "building", theme);
        task.complete(0);
        let export = export_task(&task, std::time::Instant::now(), Utc::now());
        let json = to_json_string(&export).unwrap();
        assert!(json.contains("\"status\": \"success\""));
    }
}
