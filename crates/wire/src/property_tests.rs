// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property tests for frame encode/decode.

use proptest::prelude::*;
use steward_core::{Severity, Status};

use crate::{decode, encode, Response};

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Ok),
        Just(Severity::Info),
        Just(Severity::Warning),
        Just(Severity::Error),
        Just(Severity::Cancel),
    ]
}

proptest! {
    #[test]
    fn status_frames_round_trip(severity in arb_severity(), message in ".{0,256}") {
        let resp = Response::Status { status: Status { severity, message } };
        let frame = encode(&resp).unwrap();
        let len = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]);
        prop_assert_eq!(len as usize, frame.len() - 4);

        let decoded: Response = decode(&frame[4..]).unwrap();
        prop_assert_eq!(decoded, resp);
    }

    #[test]
    fn error_messages_survive_arbitrary_text(message in "\\PC{1,128}") {
        let resp = Response::Error { message: message.clone() };
        let frame = encode(&resp).unwrap();
        let decoded: Response = decode(&frame[4..]).unwrap();
        prop_assert_eq!(decoded, Response::Error { message });
    }
}
