// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use super::ConnectionId;
use crate::host::{SceneHost, UndoScope};
use crate::identity::RedirectTable;
use crate::protocol::{Dispatcher, NONE_REPLY};

/// A framed line waiting for the worker, with the way back to its connection.
#[derive(Debug)]
pub(crate) struct PendingCommand {
    pub connection: ConnectionId,
    pub line: String,
    pub reply: mpsc::UnboundedSender<String>,
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Runs one line inside its own undo chunk.
///
/// Failures and panics are logged and answered with [`NONE_REPLY`], so every line that was
/// meant to produce a reply produces exactly one.
pub fn execute_line<H: SceneHost>(
    host: &mut H,
    redirects: &mut RedirectTable,
    dispatcher: &Dispatcher,
    line: &str,
) -> Option<String> {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let mut scope = UndoScope::open(host);
        dispatcher.dispatch(&mut *scope, redirects, line)
    }));
    match outcome {
        Ok(Ok(reply)) => reply,
        Ok(Err(err)) => {
            warn!(error = %err, line, "command failed");
            Some(NONE_REPLY.to_owned())
        }
        Err(payload) => {
            error!(
                panic = panic_message(payload.as_ref()),
                line,
                "command panicked"
            );
            Some(NONE_REPLY.to_owned())
        }
    }
}

/// Drains the queue in arrival order until every producer is gone, then hands the host back.
pub(crate) fn run<H: SceneHost>(
    mut host: H,
    dispatcher: Dispatcher,
    mut queue: mpsc::UnboundedReceiver<PendingCommand>,
) -> H {
    let mut redirects = RedirectTable::new();
    while let Some(command) = queue.blocking_recv() {
        debug!(connection = %command.connection, line = %command.line, "dequeued");
        let Some(reply) = execute_line(&mut host, &mut redirects, &dispatcher, &command.line) else {
            continue;
        };
        if command.reply.send(reply).is_err() {
            debug!(connection = %command.connection, "connection closed before its reply");
        }
    }
    debug!(redirects = redirects.len(), "worker drained");
    host
}

#[cfg(test)]
mod tests {
    use super::execute_line;
    use crate::host::{Asset, MemoryScene, MeshPart, SceneHost};
    use crate::identity::RedirectTable;
    use crate::model::Vec3;
    use crate::protocol::{Dispatcher, NONE_REPLY};

    #[test]
    fn failed_commands_reply_none_and_undo_as_one_step() {
        let mut scene = MemoryScene::demo();
        scene.register_asset(
            "assets/broken.ma",
            Asset::single(MeshPart::resting_box("broken", Vec3::repeat(10.0))).broken(),
        );
        let before = scene.node_count();
        let dispatcher = Dispatcher::new(true).expect("registry");
        let mut redirects = RedirectTable::new();

        let line = concat!(
            r#"add_objects {"a": {"asset_path": "assets/chair.ma", "location": [0, 0, 0]}, "#,
            r#""b": {"asset_path": "assets/broken.ma", "location": [50, 0, 0]}}"#,
        );
        let reply = execute_line(&mut scene, &mut redirects, &dispatcher, line);
        assert_eq!(reply.as_deref(), Some(NONE_REPLY));
        assert!(scene.node_count() > before);
        assert_eq!(scene.undo_depth(), 0);

        let reply = execute_line(&mut scene, &mut redirects, &dispatcher, "report_done");
        assert_eq!(reply.as_deref(), Some("\"Done\""));
        assert_eq!(scene.undo_steps(), 1);

        assert!(scene.undo());
        assert_eq!(scene.node_count(), before);
        assert!(scene.find_by_label("chair").is_empty());
    }

    #[test]
    fn unknown_commands_without_passthrough_reply_none() {
        let mut scene = MemoryScene::demo();
        let dispatcher = Dispatcher::new(false).expect("registry");
        let mut redirects = RedirectTable::new();
        let reply = execute_line(&mut scene, &mut redirects, &dispatcher, "sphere -r 2");
        assert_eq!(reply.as_deref(), Some(NONE_REPLY));
    }

    #[test]
    fn silent_commands_reply_nothing() {
        let mut scene = MemoryScene::demo();
        let dispatcher = Dispatcher::new(true).expect("registry");
        let mut redirects = RedirectTable::new();
        assert_eq!(
            execute_line(&mut scene, &mut redirects, &dispatcher, "select table"),
            None
        );
        assert_eq!(scene.selection().len(), 1);
    }
}
