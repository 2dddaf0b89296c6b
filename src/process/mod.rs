//! Process Supervisor: spawns the target command, captures and classifies
//! its output concurrently, and forwards termination signals to the whole
//! process group.
//!
//! Grounded in the teacher's `tools::execution::process::run_process`
//! (`kill_on_drop`, piped stdout/stderr, `tokio::process::Command`),
//! extended with POSIX process-group signal forwarding (`nix`) and the
//! bounded-memory backpressure cap the teacher's fire-and-forget capture
//! did not need.

mod backpressure;

pub use backpressure::BufferBudget;

use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;
#[cfg(unix)]
use std::os::unix::process::{CommandExt, ExitStatusExt};
#[cfg(unix)]
use tokio::signal::unix::{signal as unix_signal, SignalKind};

use crate::classify;
use crate::error::ProcessError;
use crate::task::{LineContext, LineType, Task};

/// Grace period between forwarding a signal and escalating to SIGKILL.
const ESCALATION_TIMEOUT: Duration = Duration::from_secs(2);

/// Default per-stream buffer budget (bytes) absent an explicit override.
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 1024 * 1024;

/// Pipe topology for the child's standard streams (spec.md §4.D).
///
/// `Stream` passes the child's stdout straight through to the parent's own
/// stdout so interactive/live output is visible immediately, and pipes only
/// stderr for classification. `Capture` pipes both streams so the whole
/// run can be replayed inside the rendered box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeMode {
    Stream,
    Capture,
}

/// Spawn `task.command` with `task.args` under `mode`'s pipe topology,
/// stream whichever of stdout/stderr is piped through the classifier into
/// `task`'s output buffer, forward SIGINT/SIGTERM to the child's process
/// group, and return the final exit code.
///
/// On success `task.complete(exit_code)` has already been called; on a
/// startup failure `task.complete_as_startup_failure` has been called, an
/// internal `[fo] Error starting command ...` line has been appended, and
/// `Err(ProcessError::StartupFailure)` is returned instead.
pub async fn run(task: &mut Task, budget: BufferBudget, mode: PipeMode) -> Result<i32, ProcessError> {
    task.mark_running();

    let mut cmd = Command::new(&task.command);
    cmd.args(&task.args).kill_on_drop(true);

    match mode {
        PipeMode::Capture => {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        }
        PipeMode::Stream => {
            let stdin_connected = io::stdin().is_tty_like();
            cmd.stdin(if stdin_connected { Stdio::inherit() } else { Stdio::null() })
                .stdout(Stdio::inherit())
                .stderr(Stdio::piped());
        }
    }

    #[cfg(unix)]
    {
        // New process group rooted at the child (pgid == child pid) so a
        // single negative-pid signal reaches every descendant it spawns.
        cmd.process_group(0);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            let exit_code = if e.kind() == io::ErrorKind::NotFound { 127 } else { 1 };
            let message = format!("[fo] Error starting command: {}: {e}", task.command);
            task.add_output_line(message, LineType::Error, LineContext::internal(5));
            task.complete_as_startup_failure(exit_code);
            return Err(ProcessError::StartupFailure(format!("{}: {e}", task.command)));
        }
    };

    let pid = child.id();

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let command = task.command.clone();
    let args = task.args.clone();
    let task_ref = &*task;
    let budget_out = budget.clone();
    let budget_err = budget.clone();

    let drain = async {
        tokio::join!(
            drain_optional(stdout, "stdout", task_ref, &budget_out, &command, &args),
            drain_optional(stderr, "stderr", task_ref, &budget_err, &command, &args),
        )
    };

    #[cfg(unix)]
    let status = {
        let supervise = supervise_with_signals(&mut child, pid);
        let (status_result, _) = tokio::join!(supervise, drain);
        status_result?
    };

    #[cfg(not(unix))]
    let status = {
        let (status_result, _) = tokio::join!(child.wait(), drain);
        status_result.map_err(|e| ProcessError::ReadError {
            stream: "wait",
            source: e.to_string(),
        })?
    };

    let exit_code = exit_code_of(&status);
    task.complete(exit_code);
    Ok(exit_code)
}

/// Drain `stream` if it was actually piped; a `None` stream (inherited in
/// `PipeMode::Stream`) is a no-op so `Stream` mode only classifies stderr.
async fn drain_optional<R>(
    stream: Option<R>,
    stream_name: &'static str,
    task: &Task,
    budget: &BufferBudget,
    command: &str,
    args: &[String],
) where
    R: tokio::io::AsyncRead + Unpin,
{
    if let Some(stream) = stream {
        drain_stream(stream, stream_name, task, budget, command, args).await;
    }
}

/// Read `stream` line by line, classify each line, and append it to
/// `task`'s output buffer. Lines that would overflow the shared buffer
/// budget are dropped so the child's pipe never backs up; the read loop
/// itself never blocks on backpressure. Reservations are never released:
/// the budget is a permanent cap on retained output, not a working-set
/// limit (spec.md §5, §8 property 3 / scenario S4).
async fn drain_stream<R>(
    stream: R,
    stream_name: &'static str,
    task: &Task,
    budget: &BufferBudget,
    command: &str,
    args: &[String],
) where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let len = line.len();
                if !budget.try_reserve(len) {
                    continue;
                }
                let (line_type, context) = classify::classify(&line, command, args);
                task.add_output_line(line, line_type, context);
            }
            Ok(None) => break,
            Err(e) => {
                // A genuine I/O error on one stream must not abort the
                // other; record it as an internal line and stop draining
                // this stream, letting the exit code carry the rest.
                let message = format!("[fo] Error reading {stream_name}: {e}");
                task.add_output_line(message, LineType::Error, LineContext::internal(5));
                break;
            }
        }
    }
}

/// Narrow TTY check so the spawn-time stdin decision doesn't read awkwardly
/// inline; kept free-standing for readability.
trait IsTtyLike {
    fn is_tty_like(&self) -> bool;
}

impl IsTtyLike for io::Stdin {
    fn is_tty_like(&self) -> bool {
        crossterm::tty::IsTty::is_tty(self)
    }
}

#[cfg(unix)]
async fn supervise_with_signals(child: &mut Child, pid: Option<u32>) -> Result<std::process::ExitStatus, ProcessError> {
    let Some(pid) = pid else {
        return child.wait().await.map_err(|e| ProcessError::ReadError {
            stream: "wait",
            source: e.to_string(),
        });
    };
    let group = Pid::from_raw(-(pid as i32));

    let mut sigint = unix_signal(SignalKind::interrupt()).map_err(|e| ProcessError::ReadError {
        stream: "signal",
        source: e.to_string(),
    })?;
    let mut sigterm = unix_signal(SignalKind::terminate()).map_err(|e| ProcessError::ReadError {
        stream: "signal",
        source: e.to_string(),
    })?;

    loop {
        tokio::select! {
            status = child.wait() => {
                return status.map_err(|e| ProcessError::ReadError {
                    stream: "wait",
                    source: e.to_string(),
                });
            }
            _ = sigint.recv() => {
                forward_and_escalate(child, group, Signal::SIGINT).await?;
            }
            _ = sigterm.recv() => {
                forward_and_escalate(child, group, Signal::SIGTERM).await?;
            }
        }
    }
}

#[cfg(unix)]
async fn forward_and_escalate(child: &mut Child, group: Pid, sig: Signal) -> Result<(), ProcessError> {
    let _ = signal::kill(group, sig);
    match tokio::time::timeout(ESCALATION_TIMEOUT, child.wait()).await {
        Ok(_) => Ok(()),
        Err(_elapsed) => {
            let _ = signal::kill(group, Signal::SIGKILL);
            Ok(())
        }
    }
}

/// Derive the spec's exit code: the child's real exit code when it exited
/// normally, 128+signal when killed by a signal, matching common shell
/// convention.
#[cfg(unix)]
fn exit_code_of(status: &std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    if let Some(sig) = status.signal() {
        return 128 + sig;
    }
    1
}

#[cfg(not(unix))]
fn exit_code_of(status: &std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn test_theme() -> theme::ThemeConfig {
        theme::resolve("ascii_minimal", false, true, true, true)
    }

    #[tokio::test]
    async fn startup_failure_completes_task_as_error() {
        let mut task = Task::new(
            "missing",
            "definitely-not-a-real-binary-xyz",
            vec![],
            "testing",
            test_theme(),
        );
        let budget = BufferBudget::new(DEFAULT_MAX_BUFFER_SIZE);
        let result = run(&mut task, budget, PipeMode::Capture).await;
        assert!(result.is_err());
        assert!(task.is_completed());
        assert_eq!(task.status, Some(crate::task::TaskStatus::Error));
        assert_eq!(task.exit_code, Some(127));
    }

    #[tokio::test]
    async fn startup_failure_appends_one_internal_error_line() {
        let mut task = Task::new(
            "missing",
            "definitely-not-a-real-binary-xyz",
            vec![],
            "testing",
            test_theme(),
        );
        let budget = BufferBudget::new(DEFAULT_MAX_BUFFER_SIZE);
        let _ = run(&mut task, budget, PipeMode::Capture).await;
        let lines = task.snapshot_lines();
        let internal: Vec<_> = lines.iter().filter(|l| l.context.is_internal).collect();
        assert_eq!(internal.len(), 1);
        assert!(internal[0].content.starts_with("[fo] "));
        assert!(internal[0].content.contains("Error starting command"));
    }

    #[tokio::test]
    async fn successful_command_captures_output_and_completes() {
        let mut task = Task::new(
            "echo",
            "echo",
            vec!["hello".to_string()],
            "testing",
            test_theme(),
        );
        let budget = BufferBudget::new(DEFAULT_MAX_BUFFER_SIZE);
        let exit_code = run(&mut task, budget, PipeMode::Capture).await.unwrap();
        assert_eq!(exit_code, 0);
        assert!(task.is_completed());
        let lines = task.snapshot_lines();
        assert!(lines.iter().any(|l| l.content.contains("hello")));
    }

    #[tokio::test]
    async fn nonzero_exit_marks_task_error() {
        let mut task = Task::new("false", "false", vec![], "testing", test_theme());
        let budget = BufferBudget::new(DEFAULT_MAX_BUFFER_SIZE);
        let exit_code = run(&mut task, budget, PipeMode::Capture).await.unwrap();
        assert_eq!(exit_code, 1);
        assert_eq!(task.status, Some(crate::task::TaskStatus::Error));
    }

    #[tokio::test]
    async fn stream_mode_only_captures_stderr() {
        let mut task = Task::new(
            "sh",
            "sh",
            vec!["-c".into(), "echo out; echo err >&2".into()],
            "testing",
            test_theme(),
        );
        let budget = BufferBudget::new(DEFAULT_MAX_BUFFER_SIZE);
        let exit_code = run(&mut task, budget, PipeMode::Stream).await.unwrap();
        assert_eq!(exit_code, 0);
        let lines = task.snapshot_lines();
        assert!(lines.iter().any(|l| l.content.contains("err")));
        assert!(!lines.iter().any(|l| l.content.contains("out")));
    }
}
