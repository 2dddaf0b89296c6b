//! The open sum of structured output shapes an adapter can produce.
//!
//! Modeled as a tagged enum rather than a trait-object hierarchy: every
//! variant is a plain data struct, and `Pattern::render` dispatches once by
//! match rather than through dynamic dispatch per call.

use crate::render;
use crate::theme::ThemeConfig;

/// One row of a test result table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRow {
    pub package: String,
    pub name: String,
    pub passed: bool,
    pub duration_ms: u64,
}

/// One entry of a ranked leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub label: String,
    pub score: String,
}

/// A single quality-report metric with a 0-100 scale for sparkbar display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityMetric {
    pub name: String,
    pub value: u8,
}

/// The parsed, renderable shape produced by a [`super::StreamAdapter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    TestTable {
        rows: Vec<TestRow>,
    },
    Summary {
        passed: usize,
        failed: usize,
        skipped: usize,
        elapsed_ms: u64,
    },
    Leaderboard {
        entries: Vec<LeaderboardEntry>,
    },
    QualityReport {
        metrics: Vec<QualityMetric>,
    },
    ComplexityDashboard {
        files_analyzed: usize,
        average_complexity: f64,
    },
    Housekeeping {
        actions: Vec<String>,
    },
}

impl Pattern {
    /// Render this pattern as plain themed text lines, joined by newlines.
    /// The box renderer (Component F) wraps the result in a border; this
    /// function only produces the interior content.
    pub fn render(&self, theme: &ThemeConfig) -> String {
        match self {
            Pattern::TestTable { rows } => render_test_table(rows, theme),
            Pattern::Summary {
                passed,
                failed,
                skipped,
                elapsed_ms,
            } => render_summary(*passed, *failed, *skipped, *elapsed_ms, theme),
            Pattern::Leaderboard { entries } => render_leaderboard(entries, theme),
            Pattern::QualityReport { metrics } => render_quality_report(metrics, theme),
            Pattern::ComplexityDashboard {
                files_analyzed,
                average_complexity,
            } => render_complexity_dashboard(*files_analyzed, *average_complexity, theme),
            Pattern::Housekeeping { actions } => render_housekeeping(actions, theme),
        }
    }
}

fn render_test_table(rows: &[TestRow], theme: &ThemeConfig) -> String {
    let mut out = String::new();
    for row in rows {
        let (icon, color) = if row.passed {
            (&theme.icons.success, &theme.colors.success)
        } else {
            (&theme.icons.error, &theme.colors.error)
        };
        let text = format!("{}/{} ({}ms)", row.package, row.name, row.duration_ms);
        out.push_str(&render::structured_row(icon, color, &theme.colors.reset, &text, theme));
        out.push('\n');
    }
    out
}

fn render_summary(passed: usize, failed: usize, skipped: usize, elapsed_ms: u64, theme: &ThemeConfig) -> String {
    let color = if failed > 0 {
        &theme.colors.error
    } else {
        &theme.colors.success
    };
    format!(
        "{color}{passed} passed{reset}, {failed} failed, {skipped} skipped in {secs:.2}s\n",
        color = color,
        reset = theme.colors.reset,
        passed = passed,
        failed = failed,
        skipped = skipped,
        secs = elapsed_ms as f64 / 1000.0
    )
}

fn render_leaderboard(entries: &[LeaderboardEntry], theme: &ThemeConfig) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "{bullet} #{rank} {label} — {score}\n",
            bullet = theme.icons.bullet,
            rank = entry.rank,
            label = entry.label,
            score = entry.score
        ));
    }
    out
}

fn render_quality_report(metrics: &[QualityMetric], theme: &ThemeConfig) -> String {
    let mut out = String::new();
    for metric in metrics {
        let filled = (metric.value as usize * theme.numeric.sparkbar_length) / 100;
        let bar: String = "#".repeat(filled) + &"-".repeat(theme.numeric.sparkbar_length - filled);
        let color = if metric.value >= theme.numeric.coverage_good_min {
            &theme.colors.success
        } else if metric.value >= theme.numeric.coverage_warning_min {
            &theme.colors.warning
        } else {
            &theme.colors.error
        };
        out.push_str(&format!(
            "{name:<20} {color}[{bar}]{reset} {value}%\n",
            name = metric.name,
            color = color,
            bar = bar,
            reset = theme.colors.reset,
            value = metric.value
        ));
    }
    out
}

fn render_complexity_dashboard(files_analyzed: usize, average_complexity: f64, theme: &ThemeConfig) -> String {
    format!(
        "{info}{files} files analyzed{reset}, average complexity {avg:.1}\n",
        info = theme.colors.info,
        files = files_analyzed,
        reset = theme.colors.reset,
        avg = average_complexity
    )
}

fn render_housekeeping(actions: &[String], theme: &ThemeConfig) -> String {
    let mut out = String::new();
    for action in actions {
        out.push_str(&format!("{bullet} {action}\n", bullet = theme.icons.bullet, action = action));
    }
    out
}
