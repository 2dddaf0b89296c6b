//! Stream Adapter Registry.
//!
//! A [`StreamAdapter`] recognizes a structured output format (test tables,
//! coverage summaries, leaderboards, ...) from the first few lines of a
//! task's output and parses the full stream into a renderable [`Pattern`].
//! Dispatch is first-match-wins over an ordered registry; a task whose
//! output matches no adapter simply renders as a plain line list.

mod go_test_json;
mod patterns;

use crate::error::AdapterError;
use crate::task::Task;
use crate::theme::ThemeConfig;

pub use patterns::Pattern;

/// A recognizer/parser for one structured output format.
pub trait StreamAdapter: Send + Sync {
    /// Stable identifier used in error messages and logs.
    fn name(&self) -> &'static str;

    /// Inspect the first few lines of output and decide whether this
    /// adapter should claim the stream. Must not have side effects beyond
    /// reading `first_lines`.
    fn detect(&self, first_lines: &[String]) -> bool;

    /// Parse the full captured output into a [`Pattern`]. Only called after
    /// `detect` returned true for the same task's leading lines.
    fn parse(&self, lines: &[String]) -> Result<Pattern, AdapterError>;
}

/// Ordered, first-match-wins adapter registry.
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn StreamAdapter>>,
}

impl AdapterRegistry {
    /// Build the registry with the built-in adapters in priority order.
    pub fn with_builtins() -> Self {
        Self {
            adapters: vec![Box::new(go_test_json::GoTestJsonAdapter::new())],
        }
    }

    /// Empty registry, useful for tests that register nothing or exercise
    /// custom adapters only.
    pub fn empty() -> Self {
        Self { adapters: Vec::new() }
    }

    /// Register an additional adapter at the end of the priority order.
    pub fn register(&mut self, adapter: Box<dyn StreamAdapter>) {
        self.adapters.push(adapter);
    }

    /// Find the first adapter (in registration order) that claims this
    /// stream, and parse it.
    pub fn dispatch(
        &self,
        first_lines: &[String],
        full_lines: &[String],
    ) -> Option<Result<(&'static str, Pattern), AdapterError>> {
        for adapter in &self.adapters {
            if adapter.detect(first_lines) {
                let name = adapter.name();
                return Some(adapter.parse(full_lines).map(|pattern| (name, pattern)));
            }
        }
        None
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Number of leading lines handed to `detect` before a full parse commits
/// (spec.md §4.C / §8 property 8).
pub const DETECT_WINDOW: usize = 15;

/// Render a recognized pattern with a theme, falling back to no output if
/// the adapter produced nothing renderable (should not normally happen).
pub fn render_pattern(pattern: &Pattern, theme: &ThemeConfig) -> String {
    pattern.render(theme)
}

/// Run adapter dispatch against `task`'s captured output and, on a match,
/// adopt the parsed pattern onto the task so `Task::resolved_output`
/// collapses to exactly one rendered-pattern entry instead of the raw
/// per-line classifications (spec.md §8 property 8). A task whose output
/// matches no adapter, or whose matched adapter fails to parse, is left
/// untouched and still renders as its raw line list.
pub fn apply_to_task(registry: &AdapterRegistry, task: &Task) {
    let lines = task.snapshot_lines();
    let raw_lines: Vec<String> = lines.iter().map(|l| l.content.clone()).collect();
    let first_lines: Vec<String> = raw_lines.iter().take(DETECT_WINDOW).cloned().collect();

    if let Some(Ok((name, pattern))) = registry.dispatch(&first_lines, &raw_lines) {
        task.adopt_pattern(name, pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_dispatches_to_first_matching_adapter() {
        let registry = AdapterRegistry::with_builtins();
        let lines: Vec<String> = vec![
            r#"{"Action":"run","Test":"TestFoo","Package":"pkg"}"#.to_string(),
            r#"{"Action":"pass","Test":"TestFoo","Package":"pkg","Elapsed":0.01}"#.to_string(),
        ];
        let result = registry.dispatch(&lines, &lines);
        assert!(result.is_some());
        let (name, _pattern) = result.unwrap().unwrap();
        assert_eq!(name, "go_test_json");
    }

    #[test]
    fn registry_returns_none_for_unrecognized_stream() {
        let registry = AdapterRegistry::with_builtins();
        let lines = vec!["just some plain text output".to_string()];
        assert!(registry.dispatch(&lines, &lines).is_none());
    }

    #[test]
    fn apply_to_task_collapses_matched_output_to_a_single_pattern() {
        use crate::task::{CognitiveLoad, LineContext, LineType, ResolvedOutput};
        use crate::theme;

        let task = Task::new("go-tests", "go", vec!["test".into(), "-json".into()], "testing", theme::resolve("ascii_minimal", false, true, true, true));
        task.add_output_line(
            r#"{"Action":"run","Test":"TestFoo","Package":"pkg"}"#,
            LineType::Detail,
            LineContext::classified(CognitiveLoad::Low, 1),
        );
        task.add_output_line(
            r#"{"Action":"pass","Test":"TestFoo","Package":"pkg","Elapsed":0.01}"#,
            LineType::Detail,
            LineContext::classified(CognitiveLoad::Low, 1),
        );

        let registry = AdapterRegistry::with_builtins();
        apply_to_task(&registry, &task);

        match task.resolved_output() {
            ResolvedOutput::Pattern { adapter, .. } => assert_eq!(adapter, "go_test_json"),
            ResolvedOutput::Lines(_) => panic!("adapter match should collapse to one pattern"),
        }
    }
}
