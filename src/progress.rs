//! Inline Progress: a TTY-gated spinner with RAII cursor hygiene.
//!
//! Grounded in the teacher's `tui::progress` spinner handle: a background
//! tick task owns the frame advance, and dropping the handle always leaves
//! the cursor visible, even if the caller never awaits a clean shutdown.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio::time::interval;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const DEFAULT_TICK: Duration = Duration::from_millis(80);

/// Shared, atomically-updatable spinner message.
struct SpinnerState {
    message: AsyncMutex<String>,
    stopped: AtomicBool,
}

/// A running inline spinner. Dropping this handle stops the tick task and
/// restores the cursor; callers that want to wait for the final frame to
/// clear should call [`SpinnerHandle::stop`] explicitly.
pub struct SpinnerHandle {
    state: Arc<SpinnerState>,
    task: Option<JoinHandle<()>>,
}

impl SpinnerHandle {
    /// Start a spinner with `initial_message`, ticking every 80ms. Returns
    /// `None` (no spinner, no cursor manipulation) when stdout is not a
    /// TTY or the theme disables spinners.
    pub fn start(initial_message: impl Into<String>, spinner_enabled: bool) -> Option<Self> {
        if !spinner_enabled || !io::stdout().is_terminal_like() {
            return None;
        }

        let state = Arc::new(SpinnerState {
            message: AsyncMutex::new(initial_message.into()),
            stopped: AtomicBool::new(false),
        });

        let _ = execute!(io::stdout(), Hide);

        let task_state = Arc::clone(&state);
        let task = tokio::spawn(async move {
            let mut ticker = interval(DEFAULT_TICK);
            let mut frame = 0usize;
            loop {
                ticker.tick().await;
                if task_state.stopped.load(Ordering::Acquire) {
                    break;
                }
                let message = task_state.message.lock().await.clone();
                let glyph = FRAMES[frame % FRAMES.len()];
                frame = frame.wrapping_add(1);
                let mut stdout = io::stdout();
                let _ = write!(stdout, "\r{glyph} {message}\x1b[K");
                let _ = stdout.flush();
            }
        });

        Some(Self {
            state,
            task: Some(task),
        })
    }

    /// Replace the spinner's message without interrupting its tick cadence.
    pub async fn set_message(&self, message: impl Into<String>) {
        *self.state.message.lock().await = message.into();
    }

    /// Stop ticking, clear the spinner line, and restore the cursor.
    pub async fn stop(mut self) {
        self.stop_inner().await;
    }

    async fn stop_inner(&mut self) {
        self.state.stopped.store(true, Ordering::Release);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        let mut stdout = io::stdout();
        let _ = write!(stdout, "\r\x1b[K");
        let _ = stdout.flush();
        let _ = execute!(stdout, Show);
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        // Best-effort synchronous cleanup; `stop()` is preferred when the
        // caller is in async context since it also joins the tick task.
        self.state.stopped.store(true, Ordering::Release);
        let mut stdout = io::stdout();
        let _ = write!(stdout, "\r\x1b[K");
        let _ = stdout.flush();
        let _ = execute!(stdout, Show);
    }
}

/// Narrow trait so tests can fake TTY detection without touching the real
/// terminal. `std::io::Stdout` gets a blanket impl via `terminal::is_raw_mode_available`
/// style checks in real use; tests use [`AlwaysTty`]/[`NeverTty`] instead.
trait TerminalLike {
    fn is_terminal_like(&self) -> bool;
}

impl TerminalLike for io::Stdout {
    fn is_terminal_like(&self) -> bool {
        terminal::size().is_ok() && crossterm::tty::IsTty::is_tty(self)
    }
}
