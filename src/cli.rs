//! Command-line interface surface.

use clap::Parser;

/// Execution mode: stream output live as it's classified, or buffer it and
/// render the whole task once the command exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    Stream,
    Capture,
}

/// When to show the captured output block inside the rendered box
/// (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ShowOutput {
    /// Show the captured block only when the command exits non-zero.
    OnFail,
    Always,
    Never,
}

/// Orchestrate a command's output with theme-driven classification,
/// structured-format detection, and box-drawn rendering.
#[derive(Debug, Parser)]
#[command(name = "fo", version, about)]
pub struct Args {
    /// Theme name: ascii_minimal, unicode_vibrant, orca.
    #[arg(long, default_value = crate::theme::DEFAULT_THEME_NAME)]
    pub theme: String,

    /// Disable all color and box-drawing output.
    #[arg(long)]
    pub monochrome: bool,

    /// Shorthand for monochrome + no elapsed-time display, for CI logs.
    #[arg(long)]
    pub ci: bool,

    /// When to show the captured output block: on-fail (default), always,
    /// or never.
    #[arg(long = "show-output", value_enum, default_value_t = ShowOutput::OnFail)]
    pub show_output: ShowOutput,

    /// Rendering mode.
    #[arg(long, value_enum, default_value_t = Mode::Stream)]
    pub mode: Mode,

    /// Emit a machine-readable JSON report instead of (or alongside) the
    /// rendered box output.
    #[arg(long)]
    pub json: bool,

    /// The command to run, and its arguments.
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

impl Args {
    /// Split `command` into the program name and its argument list.
    pub fn command_and_args(&self) -> (&str, &[String]) {
        self.command
            .split_first()
            .map(|(program, rest)| (program.as_str(), rest))
            .unwrap_or(("", &[]))
    }
}
