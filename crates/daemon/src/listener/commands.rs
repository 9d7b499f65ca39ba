// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request dispatch: one protocol request in, one status-bearing response
//! out. No error escapes as a fault — everything maps to a `Status`.

use steward_core::Status;
use steward_wire::{Request, Response};
use tracing::debug;

use crate::engine::Engine;
use crate::env::PROTOCOL_VERSION;

pub(crate) async fn dispatch(engine: &Engine, request: Request) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version } => {
            debug!(client_version = %version, "client connected");
            Response::Hello { version: PROTOCOL_VERSION.to_string() }
        }

        Request::GetServerTypes => Response::ServerTypes {
            types: engine
                .servers
                .server_types()
                .into_iter()
                .map(|t| steward_wire::ServerTypeDescription {
                    id: t.id,
                    name: t.name,
                    description: t.description,
                })
                .collect(),
        },

        Request::CreateServer { attrs } => match engine.servers.create_server(attrs) {
            Ok(_) => Response::Status { status: Status::ok() },
            Err(err) => Response::Status { status: err.into_status() },
        },

        Request::DeleteServer { id } => match engine.servers.delete_server(&id) {
            Ok(()) => Response::Status { status: Status::ok() },
            Err(err) => Response::Status { status: err.into_status() },
        },

        Request::GetServerHandles => Response::ServerHandles { handles: engine.servers.handles() },

        Request::GetServerState { id } => match engine.servers.server_state(&id) {
            Ok(state) => Response::ServerState { state },
            Err(err) => Response::Status { status: err.into_status() },
        },

        Request::StartServerAsync { params } => {
            Response::StartServer { response: engine.servers.start_server(&params) }
        }

        Request::StopServerAsync { params } => {
            Response::StopServer { response: engine.servers.stop_server(&params) }
        }

        Request::PublishServer { params } => {
            Response::PublishServer { response: engine.servers.publish_server(&params) }
        }

        Request::ListServerActions { id } => {
            Response::ServerActions { response: engine.servers.list_server_actions(&id) }
        }

        Request::ExecuteServerAction { request } => {
            Response::Workflow { response: engine.servers.execute_server_action(&request) }
        }

        Request::GetJobs => Response::Jobs { jobs: engine.jobs.jobs() },

        Request::CancelJob { id } => {
            if engine.jobs.cancel(&id) {
                Response::Status { status: Status::ok() }
            } else {
                Response::Status { status: Status::error(format!("Job {id} not found")) }
            }
        }

        Request::ListDownloadableRuntimes => {
            Response::Runtimes { runtimes: engine.runtimes.list() }
        }

        Request::DownloadRuntime { request } => {
            Response::Workflow { response: engine.runtimes.download_runtime(&request) }
        }

        // Handled at the connection layer before dispatch.
        Request::Subscribe | Request::Shutdown => {
            Response::Error { message: "request handled at connection layer".to_string() }
        }
    }
}
