// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::config::BridgeConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
#[error("could not bind {host}:{port}: {source}")]
pub struct BindError {
    pub host: String,
    pub port: u16,
    #[source]
    pub source: std::io::Error,
}

/// Asks whoever owns the port to close its listener. Returns whether the message was delivered.
pub async fn request_vacate(host: &str, port: u16, message: &str) -> bool {
    let connect = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect((host, port)));
    let mut stream = match connect.await {
        Ok(Ok(stream)) => stream,
        Ok(Err(err)) => {
            debug!(host, port, error = %err, "no previous listener");
            return false;
        }
        Err(_) => {
            debug!(host, port, "previous listener did not answer");
            return false;
        }
    };
    if let Err(err) = stream.write_all(message.as_bytes()).await {
        warn!(host, port, error = %err, "failed to send vacate message");
        return false;
    }
    let _ = stream.shutdown().await;
    info!(host, port, "asked previous listener to vacate");
    true
}

async fn handoff(config: &BridgeConfig) {
    if config.port == 0 {
        return;
    }
    request_vacate(&config.host, config.port, &config.vacate_message).await;
    tokio::time::sleep(config.handoff_delay()).await;
}

/// Binds the configured address, first asking a previous instance to hand it over.
///
/// A failed bind is retried once after another vacate request; the second failure is returned.
pub async fn bind(config: &BridgeConfig) -> Result<TcpListener, BindError> {
    handoff(config).await;
    let first = match TcpListener::bind((config.host.as_str(), config.port)).await {
        Ok(listener) => return Ok(listener),
        Err(err) => err,
    };
    warn!(host = %config.host, port = config.port, error = %first, "bind failed, retrying once");
    handoff(config).await;
    TcpListener::bind((config.host.as_str(), config.port)).await.map_err(|source| BindError {
        host: config.host.clone(),
        port: config.port,
        source,
    })
}
