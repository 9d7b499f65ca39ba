// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{Request, Response};
use steward_core::Status;

#[test]
fn encode_prefixes_payload_length() {
    let frame = encode(&Request::Ping).unwrap();
    let len = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]);
    assert_eq!(len as usize, frame.len() - 4);

    let decoded: Request = decode(&frame[4..]).unwrap();
    assert_eq!(decoded, Request::Ping);
}

#[tokio::test]
async fn framed_round_trip_over_stream() {
    let (mut client, mut server) = tokio::io::duplex(1024);

    write_message(&mut client, &Request::Hello { version: "0.2.0".into() }).await.unwrap();
    let got: Request = read_message(&mut server).await.unwrap().unwrap();
    assert_eq!(got, Request::Hello { version: "0.2.0".into() });

    write_message(&mut server, &Response::Status { status: Status::ok() }).await.unwrap();
    let got: Response = read_message(&mut client).await.unwrap().unwrap();
    assert_eq!(got, Response::Status { status: Status::ok() });
}

#[tokio::test]
async fn clean_eof_reads_as_none() {
    let (client, mut server) = tokio::io::duplex(64);
    drop(client);
    let got: Option<Request> = read_message(&mut server).await.unwrap();
    assert!(got.is_none());
}

#[tokio::test]
async fn oversized_prefix_is_rejected() {
    let (mut client, mut server) = tokio::io::duplex(64);
    let bogus = (MAX_FRAME_SIZE + 1).to_be_bytes();
    tokio::io::AsyncWriteExt::write_all(&mut client, &bogus).await.unwrap();

    let err = read_message::<_, Request>(&mut server).await.unwrap_err();
    assert!(matches!(err, ProtocolError::FrameTooLarge(_)));
}

#[tokio::test]
async fn multiple_messages_in_sequence() {
    let (mut client, mut server) = tokio::io::duplex(4096);
    write_message(&mut client, &Request::Ping).await.unwrap();
    write_message(&mut client, &Request::GetJobs).await.unwrap();
    write_message(&mut client, &Request::GetServerHandles).await.unwrap();

    let a: Request = read_message(&mut server).await.unwrap().unwrap();
    let b: Request = read_message(&mut server).await.unwrap().unwrap();
    let c: Request = read_message(&mut server).await.unwrap().unwrap();
    assert_eq!((a, b, c), (Request::Ping, Request::GetJobs, Request::GetServerHandles));
}
