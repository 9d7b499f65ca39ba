// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! stewardd: the server-orchestration daemon.

use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;

use steward_daemon::bootstrap::{self, Config};
use steward_daemon::env::PROTOCOL_VERSION;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("stewardd: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = std::fs::create_dir_all(config.state_dir.join("logs")) {
        eprintln!("stewardd: cannot create log directory: {err}");
        return ExitCode::FAILURE;
    }

    let appender = tracing_appender::rolling::daily(config.state_dir.join("logs"), "stewardd.log");
    let (writer, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    info!(version = PROTOCOL_VERSION, "stewardd starting");
    let daemon = match bootstrap::startup(&config).await {
        Ok(daemon) => daemon,
        Err(err) => {
            eprintln!("stewardd: {err}");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = daemon.shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            shutdown.cancel();
        }
    });

    daemon.listener.run().await;
    let _ = std::fs::remove_file(&config.socket_path);
    info!("stewardd stopped");
    ExitCode::SUCCESS
}
