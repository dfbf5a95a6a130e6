//! Async ffmpeg job supervision.
//!
//! [`JobRunner`] launches a built command as a child process, reads its
//! stderr line by line on a tokio task, and reports typed events over a
//! channel: `Progress(ratio)` while running, optional `Error(message)`
//! on internal failures, and exactly one `Finished(outcome)` per
//! started job. Stdout is discarded; only the diagnostic stream is
//! read.
//!
//! Cancellation is cooperative plus forceful: the handle sets a flag
//! and the live process is sent a kill signal, after which the stream
//! is drained until it naturally closes.

use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Notify;

use crate::jobs::progress::ProgressScanner;

/// Exit code reported when the job fails before producing one
/// (spawn failure, missing stderr, read error, or a signal death).
pub const FAILURE_EXIT_CODE: i32 = -1;

/// Terminal state of one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Process exited with code 0.
    Completed,
    /// Process exited with a nonzero code, or an internal error
    /// occurred (then the sentinel code).
    Failed(i32),
    /// The job was stopped before the process finished.
    Cancelled,
}

/// Event emitted by a running job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    /// Progress ratio in `[0.0, 1.0]`. Only emitted once the total
    /// duration is known.
    Progress(f64),
    /// Internal supervisor error. Always followed by a `Finished`
    /// event with the sentinel failure code.
    Error(String),
    /// Terminal event; exactly one per started job.
    Finished(JobOutcome),
}

/// Handle for cancelling a running job.
///
/// Clonable; `stop()` is idempotent and a no-op once the process has
/// exited.
#[derive(Debug, Clone)]
pub struct JobHandle {
    cancel: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl JobHandle {
    /// Request cancellation of the running job.
    ///
    /// The live process is sent a kill signal; the diagnostic stream is
    /// drained until it closes. Repeat calls are no-ops.
    pub fn stop(&self) {
        if !self.cancel.swap(true, Ordering::SeqCst) {
            self.notify.notify_one();
        }
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

/// Supervisor for one encoder subprocess.
pub struct JobRunner {
    command: Vec<String>,
    duration: Option<f64>,
}

impl JobRunner {
    /// Create a runner for the given command tokens.
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            duration: None,
        }
    }

    /// Seed the total duration in seconds when the caller already knows
    /// it; otherwise it is learned from the stream's `Duration:` line.
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Launch the subprocess and return a cancel handle plus the event
    /// stream.
    ///
    /// Never blocks the caller: execution and stream reading happen on
    /// a spawned task. The receiver yields zero or more
    /// `Progress`/`Error` events followed by exactly one `Finished`.
    pub fn spawn(self) -> (JobHandle, UnboundedReceiver<JobEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = JobHandle {
            cancel: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        };

        let task_handle = handle.clone();
        tokio::spawn(async move {
            let outcome = supervise(self.command, self.duration, &task_handle, &tx).await;
            let _ = tx.send(JobEvent::Finished(outcome));
        });

        (handle, rx)
    }
}

/// Run the subprocess to completion, reporting events on `tx`.
///
/// Every exit path maps to a `JobOutcome`; the caller turns it into the
/// single terminal event.
async fn supervise(
    command: Vec<String>,
    duration: Option<f64>,
    handle: &JobHandle,
    tx: &UnboundedSender<JobEvent>,
) -> JobOutcome {
    if command.is_empty() {
        let _ = tx.send(JobEvent::Error("empty command".to_string()));
        return JobOutcome::Failed(FAILURE_EXIT_CODE);
    }

    tracing::info!(command = ?command, "starting encoder job");

    let mut child = match Command::new(&command[0])
        .args(&command[1..])
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            let _ = tx.send(JobEvent::Error(format!(
                "failed to spawn '{}': {}",
                command[0], e
            )));
            return JobOutcome::Failed(FAILURE_EXIT_CODE);
        }
    };

    let Some(stderr) = child.stderr.take() else {
        let _ = tx.send(JobEvent::Error("stderr pipe unavailable".to_string()));
        let _ = child.start_kill();
        let _ = child.wait().await;
        return JobOutcome::Failed(FAILURE_EXIT_CODE);
    };

    let mut lines = BufReader::new(stderr).lines();
    let mut scanner = ProgressScanner::new(duration);
    let mut kill_sent = false;

    loop {
        tokio::select! {
            next = lines.next_line() => match next {
                Ok(Some(line)) => {
                    tracing::trace!(target: "subburn::ffmpeg", "{}", line);
                    if let Some(ratio) = scanner.observe(&line) {
                        let _ = tx.send(JobEvent::Progress(ratio));
                    }
                }
                // Stream closed: the process is finishing
                Ok(None) => break,
                Err(e) => {
                    let _ = tx.send(JobEvent::Error(format!("stderr read failed: {}", e)));
                    let _ = child.start_kill();
                    let _ = child.wait().await;
                    return JobOutcome::Failed(FAILURE_EXIT_CODE);
                }
            },
            _ = handle.notify.notified(), if !kill_sent => {
                tracing::info!("cancellation requested, killing encoder");
                let _ = child.start_kill();
                kill_sent = true;
                // keep draining until the stream closes
            }
        }
    }

    match child.wait().await {
        Ok(status) => {
            if kill_sent {
                JobOutcome::Cancelled
            } else {
                match status.code() {
                    Some(0) => JobOutcome::Completed,
                    Some(code) => JobOutcome::Failed(code),
                    // Killed by an external signal
                    None => JobOutcome::Failed(FAILURE_EXIT_CODE),
                }
            }
        }
        Err(e) => {
            let _ = tx.send(JobEvent::Error(format!("wait failed: {}", e)));
            JobOutcome::Failed(FAILURE_EXIT_CODE)
        }
    }
}
