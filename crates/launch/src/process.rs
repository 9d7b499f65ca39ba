// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launched process handle with output capture and exit notification.

use std::process::Stdio;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::command::CommandDetails;
use crate::error::LaunchError;

/// Which stream a captured output line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// One observation from a launched process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Output { stream: OutputStream, line: String },
    Exited { code: Option<i32> },
}

/// A terminable handle to one launched external process.
///
/// The handle does not supervise: once the process exits, the exit code is
/// published and nothing is restarted. Dropping the handle leaves the
/// process running — managed servers outlive the daemon unless explicitly
/// stopped.
pub struct LaunchedProcess {
    pid: i32,
    details: CommandDetails,
    events: std::sync::Mutex<Option<mpsc::UnboundedReceiver<ProcessEvent>>>,
    exit: watch::Receiver<Option<Option<i32>>>,
}

impl LaunchedProcess {
    /// Spawn the given command with piped output.
    pub fn spawn(details: CommandDetails) -> Result<Self, LaunchError> {
        let mut command = Command::new(&details.program);
        command
            .args(&details.args)
            .current_dir(&details.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in &details.env {
            command.env(key, value);
        }

        let mut child = command
            .spawn()
            .map_err(|source| LaunchError::Spawn { program: details.program.clone(), source })?;
        let pid = child.id().ok_or(LaunchError::NoPid)? as i32;
        debug!(program = %details.program, pid, "process launched");

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (exit_tx, exit_rx) = watch::channel(None);

        if let Some(stdout) = child.stdout.take() {
            forward_lines(stdout, OutputStream::Stdout, event_tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            forward_lines(stderr, OutputStream::Stderr, event_tx.clone());
        }

        // Reaper task: owns the child, publishes the exit code exactly once.
        tokio::spawn(async move {
            let code = match child.wait().await {
                Ok(status) => status.code(),
                Err(_) => None,
            };
            debug!(pid, code, "process exited");
            let _ = event_tx.send(ProcessEvent::Exited { code });
            let _ = exit_tx.send(Some(code));
        });

        Ok(LaunchedProcess {
            pid,
            details,
            events: std::sync::Mutex::new(Some(event_rx)),
            exit: exit_rx,
        })
    }

    /// Stable id for client-facing process events.
    pub fn process_id(&self) -> String {
        self.pid.to_string()
    }

    /// Take the output/exit event stream. Yields `None` after first call.
    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<ProcessEvent>> {
        self.events.lock().ok().and_then(|mut events| events.take())
    }

    /// True until the exit code has been published.
    pub fn is_running(&self) -> bool {
        self.exit.borrow().is_none()
    }

    /// Wait for the process to exit and return its exit code.
    pub async fn wait_exited(&self) -> Option<i32> {
        let mut rx = self.exit.clone();
        loop {
            if let Some(code) = *rx.borrow() {
                return code;
            }
            if rx.changed().await.is_err() {
                return None;
            }
        }
    }

    /// Ask the process to shut down (SIGTERM). Cooperative; the process may
    /// ignore it.
    pub fn terminate(&self) -> Result<(), LaunchError> {
        self.signal(Signal::SIGTERM)
    }

    /// Forcibly kill the process (SIGKILL).
    pub fn kill(&self) -> Result<(), LaunchError> {
        self.signal(Signal::SIGKILL)
    }

    fn signal(&self, signal: Signal) -> Result<(), LaunchError> {
        if !self.is_running() {
            return Ok(());
        }
        kill(Pid::from_raw(self.pid), signal)
            .map_err(|source| LaunchError::Signal { pid: self.pid, source })
    }
}

impl std::fmt::Debug for LaunchedProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchedProcess")
            .field("pid", &self.pid)
            .field("program", &self.details.program)
            .field("running", &self.is_running())
            .finish()
    }
}

fn forward_lines<R>(reader: R, stream: OutputStream, tx: mpsc::UnboundedSender<ProcessEvent>)
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(ProcessEvent::Output { stream, line }).is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
