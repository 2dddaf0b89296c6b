//! Unified error types for the orchestrator.

use std::fmt;

// ---------------------------------------------------------------------------
// ThemeError
// ---------------------------------------------------------------------------

/// Errors arising from theme resolution.
#[derive(Debug)]
pub enum ThemeError {
    /// Theme color override value couldn't be parsed.
    InvalidColor(String),
    /// Theme state lock was poisoned by a panicking holder.
    LockPoisoned,
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColor(msg) => write!(f, "invalid theme color: {msg}"),
            Self::LockPoisoned => write!(f, "theme state lock poisoned"),
        }
    }
}

impl std::error::Error for ThemeError {}

// ---------------------------------------------------------------------------
// ProcessError
// ---------------------------------------------------------------------------

/// Errors arising from spawning or supervising a child process.
#[derive(Debug)]
pub enum ProcessError {
    /// The child process could not be spawned (executable not found, pipe
    /// creation failure, permission error, ...).
    StartupFailure(String),
    /// The child exited with a non-zero status.
    NonZeroExit { label: String, exit_code: i32 },
    /// A pipe read failed with a non-ignorable I/O error.
    ReadError { stream: &'static str, source: String },
    /// The supervisor's context was cancelled while the child was running.
    Cancelled { exit_code: i32 },
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartupFailure(msg) => write!(f, "error starting command: {msg}"),
            Self::NonZeroExit { label, exit_code } => {
                write!(f, "{label} exited with status {exit_code}")
            }
            Self::ReadError { stream, source } => {
                write!(f, "error reading {stream}: {source}")
            }
            Self::Cancelled { exit_code } => {
                write!(f, "command cancelled (exit code {exit_code})")
            }
        }
    }
}

impl std::error::Error for ProcessError {}

// ---------------------------------------------------------------------------
// AdapterError
// ---------------------------------------------------------------------------

/// Errors surfaced by a `StreamAdapter::parse` implementation.
#[derive(Debug)]
pub struct AdapterError {
    pub adapter: &'static str,
    pub message: String,
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "adapter `{}` failed to parse: {}", self.adapter, self.message)
    }
}

impl std::error::Error for AdapterError {}

// ---------------------------------------------------------------------------
// SectionError
// ---------------------------------------------------------------------------

/// Errors returned by a section's work function.
#[derive(Debug, Clone)]
pub enum SectionError {
    /// Work function returned a plain error; rendered as Error status.
    Failed(String),
    /// Work function returned a warning-wrapped error; rendered as Warning.
    Warning(String),
}

impl fmt::Display for SectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(msg) => write!(f, "{msg}"),
            Self::Warning(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SectionError {}

impl SectionError {
    /// Wrap a message as a non-fatal warning rather than a failure.
    pub fn warning(msg: impl Into<String>) -> Self {
        Self::Warning(msg.into())
    }

    /// True if this error should be excluded from `RunSections` aggregation.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }

    /// The unwrapped message, regardless of variant.
    pub fn message(&self) -> &str {
        match self {
            Self::Failed(msg) | Self::Warning(msg) => msg,
        }
    }
}

// ---------------------------------------------------------------------------
// FoError — top-level
// ---------------------------------------------------------------------------

/// Top-level error type for the orchestrator.
#[derive(Debug)]
pub enum FoError {
    Theme(ThemeError),
    Process(ProcessError),
    Adapter(AdapterError),
    Section(SectionError),
}

impl fmt::Display for FoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Theme(e) => write!(f, "theme: {e}"),
            Self::Process(e) => write!(f, "process: {e}"),
            Self::Adapter(e) => write!(f, "adapter: {e}"),
            Self::Section(e) => write!(f, "section: {e}"),
        }
    }
}

impl std::error::Error for FoError {}

impl From<ThemeError> for FoError {
    fn from(e: ThemeError) -> Self {
        Self::Theme(e)
    }
}

impl From<ProcessError> for FoError {
    fn from(e: ProcessError) -> Self {
        Self::Process(e)
    }
}

impl From<AdapterError> for FoError {
    fn from(e: AdapterError) -> Self {
        Self::Adapter(e)
    }
}

impl From<SectionError> for FoError {
    fn from(e: SectionError) -> Self {
        Self::Section(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_error_display() {
        assert_eq!(
            ProcessError::StartupFailure("not found".into()).to_string(),
            "error starting command: not found"
        );
        assert_eq!(
            ProcessError::NonZeroExit {
                label: "build".into(),
                exit_code: 42
            }
            .to_string(),
            "build exited with status 42"
        );
    }

    #[test]
    fn section_error_warning_is_excluded_from_failures() {
        let warn = SectionError::warning("needs attention");
        assert!(warn.is_warning());
        assert_eq!(warn.message(), "needs attention");

        let fail = SectionError::Failed("broke".into());
        assert!(!fail.is_warning());
    }

    #[test]
    fn fo_error_from_process_error() {
        let e = FoError::from(ProcessError::StartupFailure("x".into()));
        assert!(e.to_string().starts_with("process:"));
    }
}
