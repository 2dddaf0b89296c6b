//! Section Orchestrator: groups related tasks under a titled section that
//! always prints a header, runs to completion, renders a themed status
//! line, and always prints a footer — even when the section's work fails.
//!
//! Grounded directly on spec.md §4.G; the teacher has no equivalent
//! construct, so this follows the plain free-function + result-aggregation
//! style used throughout the teacher's own orchestration layer.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::error::SectionError;
use crate::render;
use crate::theme::ThemeConfig;

/// Process-wide nesting depth of active sections. A non-zero depth tells
/// the supervisor to suppress its own per-task start/end banners; depth
/// rather than a boolean so sections can nest safely.
static SECTION_DEPTH: AtomicUsize = AtomicUsize::new(0);

/// True while at least one section is running on this process.
pub fn in_section() -> bool {
    SECTION_DEPTH.load(Ordering::Acquire) > 0
}

/// RAII nesting guard: increments on entry, decrements on drop (including
/// on an unwinding panic), so the flag is always restored regardless of
/// how the section's work function exits.
struct SectionGuard;

impl SectionGuard {
    fn enter() -> Self {
        SECTION_DEPTH.fetch_add(1, Ordering::AcqRel);
        Self
    }
}

impl Drop for SectionGuard {
    fn drop(&mut self) {
        SECTION_DEPTH.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Overall status of one section after `run_section` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStatus {
    Success,
    Warning,
    Error,
}

/// Outcome of a single section's work function.
#[derive(Debug, Clone)]
pub struct SectionResult {
    pub name: String,
    pub status: SectionStatus,
    pub duration: Duration,
    pub error: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl SectionResult {
    /// Status-line text, per spec.md §4.G precedence: the error message,
    /// else the summary (work-function-returned or statically configured,
    /// the former winning), else the description, else the section name.
    pub fn status_text(&self) -> &str {
        self.error
            .as_deref()
            .or(self.summary.as_deref())
            .or(self.description.as_deref())
            .unwrap_or(&self.name)
    }
}

/// Render a duration rounded to the nearest whole second, e.g. `"3s"`.
fn rounded_seconds(duration: Duration) -> String {
    format!("{}s", duration.as_secs_f64().round() as u64)
}

/// Run one section's `work` closure to completion: prints a header, sets
/// the nesting flag, invokes `work`, renders a themed status line
/// (icon/color + [`SectionResult::status_text`] + a muted rounded-seconds
/// duration), and prints a footer. Never propagates the closure's error
/// past this call; failures are captured in the returned [`SectionResult`]
/// so sibling sections still run.
///
/// `work` returns `Ok(Some(summary))` to report a success-path summary
/// that overrides `summary`, `Ok(None)` for a plain success, or an
/// `Err(SectionError)` for a warning or failure.
pub fn run_section<F>(
    name: impl Into<String>,
    description: Option<&str>,
    summary: Option<&str>,
    theme: &ThemeConfig,
    work: F,
) -> SectionResult
where
    F: FnOnce() -> Result<Option<String>, SectionError>,
{
    let name = name.into();
    println!("{}{}{}", theme.colors.bold, name, theme.colors.reset);

    let started_at = Instant::now();
    let _guard = SectionGuard::enter();
    let outcome = work();
    drop(_guard);
    let duration = started_at.elapsed();

    let result = match outcome {
        Ok(returned_summary) => SectionResult {
            name,
            status: SectionStatus::Success,
            duration,
            error: None,
            summary: returned_summary.or_else(|| summary.map(str::to_string)),
            description: description.map(str::to_string),
        },
        Err(e) if e.is_warning() => SectionResult {
            name,
            status: SectionStatus::Warning,
            duration,
            error: Some(e.message().to_string()),
            summary: summary.map(str::to_string),
            description: description.map(str::to_string),
        },
        Err(e) => SectionResult {
            name,
            status: SectionStatus::Error,
            duration,
            error: Some(e.message().to_string()),
            summary: summary.map(str::to_string),
            description: description.map(str::to_string),
        },
    };

    print_status_line(&result, theme);
    println!();
    result
}

fn print_status_line(result: &SectionResult, theme: &ThemeConfig) {
    let (icon, color) = match result.status {
        SectionStatus::Success => (&theme.icons.success, &theme.colors.success),
        SectionStatus::Warning => (&theme.icons.warning, &theme.colors.warning),
        SectionStatus::Error => (&theme.icons.error, &theme.colors.error),
    };
    let row = render::structured_row(icon, color, &theme.colors.reset, result.status_text(), theme);
    println!(
        "{row} {muted}({duration}){reset}",
        row = row,
        muted = theme.colors.muted,
        duration = rounded_seconds(result.duration),
        reset = theme.colors.reset
    );
}

/// One section's configuration plus its work closure, for use with
/// [`run_sections`].
pub struct SectionSpec {
    pub name: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub work: Box<dyn FnOnce() -> Result<Option<String>, SectionError>>,
}

/// The join of every `Error`-status section's error from a `run_sections`
/// call. Warnings are never joined, matching spec.md §7's propagation
/// policy.
#[derive(Debug)]
pub struct AggregateError {
    pub errors: Vec<SectionError>,
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.errors.iter().map(|e| e.message()).collect();
        write!(f, "{}", joined.join("; "))
    }
}

impl std::error::Error for AggregateError {}

/// Run every section regardless of earlier failures — a single section
/// failing never skips the rest. Returns the aggregated error over every
/// `Error`-status section (`None` if none failed) plus one result per
/// section, in order.
pub fn run_sections(sections: Vec<SectionSpec>, theme: &ThemeConfig) -> (Option<AggregateError>, Vec<SectionResult>) {
    let results: Vec<SectionResult> = sections
        .into_iter()
        .map(|spec| {
            run_section(
                spec.name,
                spec.description.as_deref(),
                spec.summary.as_deref(),
                theme,
                spec.work,
            )
        })
        .collect();

    let errors: Vec<SectionError> = results
        .iter()
        .filter(|r| r.status == SectionStatus::Error)
        .map(|r| SectionError::Failed(r.error.clone().unwrap_or_default()))
        .collect();

    let aggregate = if errors.is_empty() {
        None
    } else {
        Some(AggregateError { errors })
    };

    (aggregate, results)
}
