// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn captures_output_and_exit() {
    let details = CommandDetails::new("/bin/sh").arg("-c").arg("echo hello; echo oops >&2");
    let process = LaunchedProcess::spawn(details).unwrap();
    let mut events = process.take_events().unwrap();

    let code = process.wait_exited().await;
    assert_eq!(code, Some(0));
    assert!(!process.is_running());

    let mut stdout_lines = Vec::new();
    let mut stderr_lines = Vec::new();
    let mut exited = false;
    while let Some(event) = events.recv().await {
        match event {
            ProcessEvent::Output { stream: OutputStream::Stdout, line } => stdout_lines.push(line),
            ProcessEvent::Output { stream: OutputStream::Stderr, line } => stderr_lines.push(line),
            ProcessEvent::Exited { code } => {
                assert_eq!(code, Some(0));
                exited = true;
            }
        }
    }
    assert!(exited);
    assert_eq!(stdout_lines, vec!["hello"]);
    assert_eq!(stderr_lines, vec!["oops"]);
}

#[tokio::test]
async fn terminate_stops_a_long_running_process() {
    let details = CommandDetails::new("/bin/sh").arg("-c").arg("sleep 30");
    let process = LaunchedProcess::spawn(details).unwrap();
    assert!(process.is_running());

    process.terminate().unwrap();
    let code = process.wait_exited().await;
    // Killed by signal: no exit code.
    assert_eq!(code, None);
    assert!(!process.is_running());
}

#[tokio::test]
async fn events_can_only_be_taken_once() {
    let details = CommandDetails::new("/bin/sh").arg("-c").arg("true");
    let process = LaunchedProcess::spawn(details).unwrap();
    assert!(process.take_events().is_some());
    assert!(process.take_events().is_none());
    process.wait_exited().await;
}

#[tokio::test]
async fn signalling_a_finished_process_is_a_no_op() {
    let details = CommandDetails::new("/bin/sh").arg("-c").arg("true");
    let process = LaunchedProcess::spawn(details).unwrap();
    process.wait_exited().await;
    // Already exited; must not error or signal a recycled pid.
    process.terminate().unwrap();
    process.kill().unwrap();
}

#[test]
fn spawn_failure_is_an_error() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let _guard = runtime.enter();
    let details = CommandDetails::new("/nonexistent/binary/path");
    let err = LaunchedProcess::spawn(details).unwrap_err();
    assert!(matches!(err, LaunchError::Spawn { .. }));
}
