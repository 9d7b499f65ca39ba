// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use parking_lot::Mutex;
use steward_core::{ServerId, ServerState};

#[tokio::test]
async fn events_reach_subscribers() {
    let notifier = EventNotifier::new();
    let mut rx = notifier.subscribe();

    let handle = ServerHandle::new(ServerId::new("wfly"), "generic.web");
    notifier.server_state_changed(
        &handle,
        &ServerStateSnapshot { state: ServerState::Starting, mode: Some("run".into()), deployables: vec![] },
    );

    match rx.recv().await.unwrap() {
        Event::ServerStateChanged { handle: got, state } => {
            assert_eq!(got, handle);
            assert_eq!(state.state, ServerState::Starting);
            assert_eq!(state.mode.as_deref(), Some("run"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn sending_without_subscribers_does_not_error() {
    let notifier = EventNotifier::new();
    let handle = ServerHandle::new(ServerId::new("wfly"), "generic.web");
    notifier.process_output(&handle, "1234", steward_wire::STREAM_TYPE_SYSOUT, "started in 2s");
}

struct ScriptedPrompt {
    answers: Mutex<Vec<Option<String>>>,
    calls: Mutex<u32>,
}

#[async_trait]
impl RemotePrompt for ScriptedPrompt {
    async fn ask(&self, _question: &str, _secret: bool) -> Option<String> {
        *self.calls.lock() += 1;
        let mut answers = self.answers.lock();
        if answers.is_empty() {
            None
        } else {
            answers.remove(0)
        }
    }
}

#[tokio::test]
async fn ask_with_retries_returns_first_real_answer() {
    let prompt = ScriptedPrompt {
        answers: Mutex::new(vec![None, Some(String::new()), Some("hunter2".to_string())]),
        calls: Mutex::new(0),
    };
    let answer = ask_with_retries(&prompt, "Enter a pull secret", true, 5).await.unwrap();
    assert_eq!(answer, "hunter2");
    assert_eq!(*prompt.calls.lock(), 3);
}

#[tokio::test]
async fn ask_with_retries_is_bounded() {
    let prompt = ScriptedPrompt { answers: Mutex::new(vec![]), calls: Mutex::new(0) };
    let err = ask_with_retries(&prompt, "Enter a pull secret", true, 3).await.unwrap_err();
    assert!(matches!(err, ModelError::PromptUnanswered(3)));
    assert_eq!(*prompt.calls.lock(), 3);
}
