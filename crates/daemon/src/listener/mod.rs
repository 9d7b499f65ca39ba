// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! The listener accepts Unix-socket connections and serves each on its own
//! task. A connection speaks framed request/response until it either
//! closes, asks for shutdown, or subscribes — a subscribed connection
//! switches to the out-of-band event stream and receives pushed events
//! until the client hangs up.

mod commands;

use tokio::io::AsyncReadExt;
use tokio::net::{unix::OwnedReadHalf, unix::OwnedWriteHalf, UnixListener, UnixStream};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::engine::Engine;
use steward_wire::{read_message, write_message, ProtocolError, Request, Response};

/// Accepts connections until shutdown.
pub struct Listener {
    unix: UnixListener,
    engine: Engine,
    shutdown: CancellationToken,
}

impl Listener {
    pub fn new(unix: UnixListener, engine: Engine, shutdown: CancellationToken) -> Self {
        Listener { unix, engine, shutdown }
    }

    pub async fn run(self) {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                result = self.unix.accept() => match result {
                    Ok((stream, _)) => {
                        let engine = self.engine.clone();
                        let shutdown = self.shutdown.clone();
                        tokio::spawn(async move {
                            if let Err(err) = handle_connection(stream, engine, shutdown).await {
                                debug!(%err, "connection ended with error");
                            }
                        });
                    }
                    Err(err) => error!(%err, "accept error"),
                },
            }
        }
    }
}

async fn handle_connection(
    stream: UnixStream,
    engine: Engine,
    shutdown: CancellationToken,
) -> Result<(), ProtocolError> {
    let (mut reader, mut writer) = stream.into_split();
    loop {
        let Some(request) = read_message::<_, Request>(&mut reader).await? else {
            return Ok(());
        };
        match request {
            Request::Subscribe => {
                // Subscribe before acknowledging so the client misses no
                // event it causes after seeing the acknowledgement.
                let events = engine.events.subscribe();
                write_message(&mut writer, &Response::Subscribed).await?;
                return stream_events(reader, writer, events).await;
            }
            Request::Shutdown => {
                write_message(&mut writer, &Response::ShuttingDown).await?;
                shutdown.cancel();
                return Ok(());
            }
            request => {
                let response = commands::dispatch(&engine, request).await;
                write_message(&mut writer, &response).await?;
            }
        }
    }
}

/// Forward broadcast events to a subscribed client until it hangs up.
async fn stream_events(
    mut reader: OwnedReadHalf,
    mut writer: OwnedWriteHalf,
    mut events: broadcast::Receiver<steward_wire::Event>,
) -> Result<(), ProtocolError> {
    let mut probe = [0u8; 1];
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => write_message(&mut writer, &event).await?,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return Ok(()),
            },
            read = reader.read(&mut probe) => match read {
                Ok(0) | Err(_) => return Ok(()),
                Ok(_) => {} // subscribed connections should not send; ignore
            },
        }
    }
}

#[cfg(test)]
#[path = "../listener_tests.rs"]
mod tests;
