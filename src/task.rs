//! Task state machine: one invocation of an external command together with
//! its captured, classified output.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::adapter::Pattern;
use crate::theme::ThemeConfig;

/// Semantic role of one classified output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineType {
    Detail,
    Error,
    Warning,
    Success,
    Info,
    Progress,
}

/// How much attention a reader should pay to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CognitiveLoad {
    Low,
    Medium,
    High,
}

/// Classification metadata attached to an [`OutputLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineContext {
    pub cognitive_load: CognitiveLoad,
    /// 1 (background) .. 5 (blocking).
    pub importance: u8,
    /// True only for lines the supervisor generated itself (spawn/pipe
    /// failures), never for classifier output.
    pub is_internal: bool,
}

impl LineContext {
    /// Construct context for classifier output (`is_internal` is always
    /// false here; only the supervisor sets it true).
    pub fn classified(cognitive_load: CognitiveLoad, importance: u8) -> Self {
        Self {
            cognitive_load,
            importance: importance.clamp(1, 5),
            is_internal: false,
        }
    }

    /// Construct context for a supervisor-originated diagnostic line.
    pub fn internal(importance: u8) -> Self {
        Self {
            cognitive_load: CognitiveLoad::High,
            importance: importance.clamp(1, 5),
            is_internal: true,
        }
    }
}

/// One captured, classified line of process output.
#[derive(Debug, Clone)]
pub struct OutputLine {
    pub content: String,
    pub line_type: LineType,
    pub context: LineContext,
    pub timestamp: Instant,
}

/// Overall result classification of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Constructed,
    Running,
    Completed,
}

/// One invocation of an external command together with its captured state.
///
/// Exclusively owned by the supervisor call that created it; concurrent
/// appenders synchronize through the internal mutex around `output_lines`.
#[derive(Debug)]
pub struct Task {
    pub label: String,
    pub command: String,
    pub args: Vec<String>,
    pub intent: String,
    pub theme: ThemeConfig,
    output_lines: Mutex<Vec<OutputLine>>,
    state: TaskState,
    pub status: Option<TaskStatus>,
    pub started_at: Instant,
    pub completed_at: Option<Instant>,
    pub duration: Option<Duration>,
    pub exit_code: Option<i32>,
    resolved_pattern: Mutex<Option<(&'static str, Pattern)>>,
}

/// What a task's output collapses to once adapter dispatch has run: either
/// its raw classified line list, or exactly one recognized structured
/// pattern (spec.md §4.C / §8 property 8 — a matched adapter replaces
/// per-line classification, it doesn't sit alongside it).
pub enum ResolvedOutput {
    Lines(Vec<OutputLine>),
    Pattern { adapter: &'static str, pattern: Pattern },
}

impl Task {
    /// Construct a new task in the `Constructed` state, already timestamped
    /// as started (spec.md has no separate "not yet running" clock).
    pub fn new(
        label: impl Into<String>,
        command: impl Into<String>,
        args: Vec<String>,
        intent: impl Into<String>,
        theme: ThemeConfig,
    ) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
            args,
            intent: intent.into(),
            theme,
            output_lines: Mutex::new(Vec::new()),
            state: TaskState::Constructed,
            status: None,
            started_at: Instant::now(),
            completed_at: None,
            duration: None,
            exit_code: None,
            resolved_pattern: Mutex::new(None),
        }
    }

    /// Transition from `Constructed` to `Running`. Idempotent.
    pub fn mark_running(&mut self) {
        if self.state == TaskState::Constructed {
            self.state = TaskState::Running;
        }
    }

    /// Append one classified line. Legal in `Running` and `Completed`;
    /// late writers after `Complete` are tolerated but should not occur
    /// past a well-behaved join.
    pub fn add_output_line(&self, content: impl Into<String>, line_type: LineType, context: LineContext) {
        let line = OutputLine {
            content: content.into(),
            line_type,
            context,
            timestamp: Instant::now(),
        };
        self.output_lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line);
    }

    /// Snapshot the output lines collected so far, in insertion order.
    ///
    /// This is the only supported way to read `output_lines`: iterating the
    /// underlying vector without going through the lock is undefined by
    /// contract, so no accessor exposes it directly.
    pub fn snapshot_lines(&self) -> Vec<OutputLine> {
        self.output_lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Count non-internal lines, used by show-output policy decisions.
    pub fn renderable_line_count(&self) -> usize {
        self.output_lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|line| !line.context.is_internal)
            .count()
    }

    /// Complete the task: compute duration and derive status.
    ///
    /// `Error` if `exit_code != 0`; otherwise `Warning` if any classified
    /// line has type Warning and importance >= 4; otherwise `Success`. A
    /// second call is a no-op, matching the monotonic state machine.
    pub fn complete(&mut self, exit_code: i32) {
        if self.state == TaskState::Completed {
            return;
        }
        let now = Instant::now();
        self.completed_at = Some(now);
        self.duration = Some(now.saturating_duration_since(self.started_at));
        self.exit_code = Some(exit_code);

        let status = if exit_code != 0 {
            TaskStatus::Error
        } else if self.has_escalating_warning() {
            TaskStatus::Warning
        } else {
            TaskStatus::Success
        };
        self.status = Some(status);
        self.state = TaskState::Completed;
    }

    /// Force Error status regardless of exit code, used for startup
    /// failures where no child ever ran.
    pub fn complete_as_startup_failure(&mut self, exit_code: i32) {
        if self.state == TaskState::Completed {
            return;
        }
        let now = Instant::now();
        self.completed_at = Some(now);
        self.duration = Some(now.saturating_duration_since(self.started_at));
        self.exit_code = Some(exit_code);
        self.status = Some(TaskStatus::Error);
        self.state = TaskState::Completed;
    }

    fn has_escalating_warning(&self) -> bool {
        self.output_lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .any(|line| line.line_type == LineType::Warning && line.context.importance >= 4)
    }

    pub fn is_completed(&self) -> bool {
        self.state == TaskState::Completed
    }

    /// Record that `adapter` claimed this task's output and parsed it into
    /// `pattern`. Once set, [`Task::resolved_output`] returns the pattern
    /// instead of the raw line list, regardless of what was classified
    /// beforehand — exactly one rendered-pattern entry replaces the task's
    /// per-line classifications.
    pub fn adopt_pattern(&self, adapter: &'static str, pattern: Pattern) {
        *self
            .resolved_pattern
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some((adapter, pattern));
    }

    /// The task's output as it should be rendered: the adopted pattern if
    /// an adapter claimed this stream, otherwise the raw classified lines.
    pub fn resolved_output(&self) -> ResolvedOutput {
        let resolved = self
            .resolved_pattern
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        match resolved {
            Some((adapter, pattern)) => ResolvedOutput::Pattern { adapter, pattern },
            None => ResolvedOutput::Lines(self.snapshot_lines()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn test_theme() -> ThemeConfig {
        theme::resolve("ascii_minimal", false, true, true, true)
    }

    #[test]
    fn duration_unobservable_before_complete() {
        let task = Task::new("build", "make", vec![], "building", test_theme());
        assert!(task.duration.is_none());
        assert!(task.status.is_none());
    }

    #[test]
    fn complete_success_path() {
        let mut task = Task::new("build", "make", vec![], "building", test_theme());
        task.mark_running();
        task.add_output_line(
            "ok",
            LineType::Success,
            LineContext::classified(CognitiveLoad::Low, 1),
        );
        task.complete(0);
        assert_eq!(task.status, Some(TaskStatus::Success));
        assert!(task.duration.is_some());
        assert_eq!(task.exit_code, Some(0));
    }

    #[test]
    fn complete_error_on_nonzero_exit() {
        let mut task = Task::new("test", "go", vec!["test".into()], "testing", test_theme());
        task.complete(1);
        assert_eq!(task.status, Some(TaskStatus::Error));
    }

    #[test]
    fn complete_warning_requires_high_importance() {
        let mut task = Task::new("lint", "golangci-lint", vec![], "linting", test_theme());
        task.add_output_line(
            "minor style nit",
            LineType::Warning,
            LineContext::classified(CognitiveLoad::Low, 2),
        );
        task.complete(0);
        assert_eq!(task.status, Some(TaskStatus::Success));

        let mut escalated = Task::new("lint", "golangci-lint", vec![], "linting", test_theme());
        escalated.add_output_line(
            "deprecated API about to break the build",
            LineType::Warning,
            LineContext::classified(CognitiveLoad::High, 4),
        );
        escalated.complete(0);
        assert_eq!(escalated.status, Some(TaskStatus::Warning));
    }

    #[test]
    fn second_complete_is_a_no_op() {
        let mut task = Task::new("build", "make", vec![], "building", test_theme());
        task.complete(0);
        let first_duration = task.duration;
        std::thread::sleep(Duration::from_millis(5));
        task.complete(1);
        assert_eq!(task.duration, first_duration);
        assert_eq!(task.status, Some(TaskStatus::Success));
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let task = Task::new("build", "make", vec![], "building", test_theme());
        for i in 0..5 {
            task.add_output_line(
                format!("L{i}"),
                LineType::Detail,
                LineContext::classified(CognitiveLoad::Low, 1),
            );
        }
        let lines: Vec<_> = task.snapshot_lines().into_iter().map(|l| l.content).collect();
        assert_eq!(lines, vec!["L0", "L1", "L2", "L3", "L4"]);
    }

    #[test]
    fn adopted_pattern_replaces_raw_lines_in_resolved_output() {
        use crate::adapter::Pattern;

        let task = Task::new("test", "go", vec!["test".into()], "testing", test_theme());
        task.add_output_line("raw line", LineType::Detail, LineContext::classified(CognitiveLoad::Low, 1));
        task.adopt_pattern("go_test_json", Pattern::TestTable { rows: vec![] });

        match task.resolved_output() {
            ResolvedOutput::Pattern { adapter, .. } => assert_eq!(adapter, "go_test_json"),
            ResolvedOutput::Lines(_) => panic!("expected adopted pattern, not raw lines"),
        }
    }

    #[test]
    fn internal_lines_excluded_from_renderable_count() {
        let task = Task::new("run", "nope", vec![], "running", test_theme());
        task.add_output_line("[fo] Error starting command", LineType::Error, LineContext::internal(5));
        task.add_output_line("real output", LineType::Detail, LineContext::classified(CognitiveLoad::Low, 1));
        assert_eq!(task.renderable_line_count(), 1);
    }
}
