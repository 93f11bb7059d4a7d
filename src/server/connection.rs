// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::framing::LineFramer;
use super::worker::PendingCommand;
use super::{stopped, ConnectionId, ShutdownHandle};

/// What a reader needs besides its socket.
#[derive(Clone)]
pub(crate) struct ReaderContext {
    pub queue: mpsc::UnboundedSender<PendingCommand>,
    pub shutdown: ShutdownHandle,
    /// `None` when vacate messages are treated as commands.
    pub vacate_message: Option<String>,
    pub read_chunk_bytes: usize,
    pub max_line_bytes: usize,
}

enum Flow {
    Continue,
    Stop,
}

impl ReaderContext {
    fn submit(
        &self,
        connection: ConnectionId,
        line: String,
        reply: &mpsc::UnboundedSender<String>,
    ) -> Flow {
        if self.vacate_message.as_deref().is_some_and(|vacate| line.trim() == vacate) {
            info!(%connection, "vacate requested, closing listener");
            self.shutdown.trigger();
            return Flow::Stop;
        }
        let command = PendingCommand {
            connection,
            line,
            reply: reply.clone(),
        };
        if self.queue.send(command).is_err() {
            warn!(%connection, "worker is gone, dropping connection");
            return Flow::Stop;
        }
        Flow::Continue
    }
}

/// Splits the socket into a reader that feeds the queue and a writer that sends replies back.
pub(crate) fn spawn(stream: TcpStream, connection: ConnectionId, ctx: ReaderContext) {
    let (read_half, write_half) = stream.into_split();
    let (reply_tx, reply_rx) = mpsc::unbounded_channel();
    tokio::spawn(write_replies(write_half, connection, reply_rx));
    tokio::spawn(read_commands(read_half, connection, ctx, reply_tx));
}

async fn read_commands(
    mut reader: OwnedReadHalf,
    connection: ConnectionId,
    ctx: ReaderContext,
    reply: mpsc::UnboundedSender<String>,
) {
    let mut shutdown: watch::Receiver<bool> = ctx.shutdown.subscribe();
    let mut framer = LineFramer::new(ctx.max_line_bytes);
    let mut buf = vec![0u8; ctx.read_chunk_bytes];

    'read: loop {
        let read = tokio::select! {
            _ = stopped(&mut shutdown) => break 'read,
            read = reader.read(&mut buf) => read,
        };
        match read {
            Ok(0) => {
                if let Some(line) = framer.finish() {
                    ctx.submit(connection, line, &reply);
                }
                break 'read;
            }
            Ok(n) => {
                let lines = match framer.push(&buf[..n]) {
                    Ok(lines) => lines,
                    Err(err) => {
                        warn!(%connection, error = %err, "dropping connection");
                        break 'read;
                    }
                };
                for line in lines {
                    if let Flow::Stop = ctx.submit(connection, line, &reply) {
                        break 'read;
                    }
                }
            }
            Err(err) => {
                warn!(%connection, error = %err, "read failed");
                break 'read;
            }
        }
    }
    debug!(%connection, buffered = framer.buffered(), "reader finished");
}

async fn write_replies(
    mut writer: OwnedWriteHalf,
    connection: ConnectionId,
    mut replies: mpsc::UnboundedReceiver<String>,
) {
    while let Some(reply) = replies.recv().await {
        if let Err(err) = writer.write_all(reply.as_bytes()).await {
            warn!(%connection, error = %err, "write failed");
            return;
        }
    }
    let _ = writer.shutdown().await;
    info!(%connection, "connection closed");
}
