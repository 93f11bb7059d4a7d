// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! TCP listener, per-connection readers, and the single command worker.
//!
//! Readers only frame bytes into lines and push them onto one shared FIFO. The worker is the
//! only code that touches the [`SceneHost`]; it runs each line inside an undo chunk and sends
//! the reply, if any, back to the connection that sent it.

mod bind;
mod connection;
mod framing;
mod worker;

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::config::BridgeConfig;
use crate::host::SceneHost;
use crate::protocol::{Dispatcher, RegistryError};

pub use bind::{bind, request_vacate, BindError};
pub use framing::{FrameTooLong, LineFramer};
pub use worker::execute_line;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to read listener address: {0}")]
    Address(#[source] std::io::Error),

    #[error("command worker stopped abnormally: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Closes the listener from anywhere; the same effect as a vacate message.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Resolves once shutdown has been triggered.
pub(crate) async fn stopped(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

pub struct Server {
    listener: TcpListener,
    config: BridgeConfig,
    dispatcher: Dispatcher,
    shutdown: ShutdownHandle,
}

impl Server {
    pub fn new(listener: TcpListener, config: BridgeConfig) -> Result<Self, ServerError> {
        let dispatcher = Dispatcher::new(config.allow_script_passthrough)?;
        Ok(Self {
            listener,
            config,
            dispatcher,
            shutdown: ShutdownHandle::new(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::Address)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Serves until vacated or shut down, then waits for queued commands and returns the host.
    pub async fn run<H>(self, host: H) -> Result<H, ServerError>
    where
        H: SceneHost + 'static,
    {
        let Self {
            listener,
            config,
            dispatcher,
            shutdown,
        } = self;
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let worker = tokio::task::spawn_blocking(move || worker::run(host, dispatcher, queue_rx));

        let reader_ctx = connection::ReaderContext {
            queue: queue_tx,
            shutdown: shutdown.clone(),
            vacate_message: (!config.ignore_vacate).then(|| config.vacate_message.clone()),
            read_chunk_bytes: config.read_chunk_bytes,
            max_line_bytes: config.max_line_bytes,
        };
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, passthrough = config.allow_script_passthrough, "listening");
        }

        let mut stop = shutdown.subscribe();
        let mut next_id = 0u64;
        loop {
            tokio::select! {
                _ = stopped(&mut stop) => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        next_id += 1;
                        let id = ConnectionId(next_id);
                        info!(connection = %id, %peer, "connection accepted");
                        connection::spawn(stream, id, reader_ctx.clone());
                    }
                    Err(err) => warn!(error = %err, "accept failed"),
                },
            }
        }

        drop(listener);
        drop(reader_ctx);
        info!("listener closed, draining queued commands");
        let host = worker.await?;
        info!("command worker stopped");
        Ok(host)
    }
}

/// Binds with hand-off and serves until vacated.
pub async fn serve<H>(host: H, config: BridgeConfig) -> Result<H, crate::Error>
where
    H: SceneHost + 'static,
{
    let listener = bind(&config).await?;
    Ok(Server::new(listener, config)?.run(host).await?)
}
