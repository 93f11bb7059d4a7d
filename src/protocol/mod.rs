// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command dispatch: one line in, at most one reply out.
//!
//! A line is `<command> <arguments>`. Registered commands are parsed into an [`Op`] by their
//! [`Handler`] and applied; anything else is either handed to the host's script escape hatch
//! or rejected with [`CommandError::UnknownCommand`].

mod args;
mod registry;
mod reply;

use thiserror::Error;
use tracing::{debug, warn};

use crate::host::{HostError, SceneHost};
use crate::identity::RedirectTable;
use crate::ops::{self, Op, OpError, SceneContext};

pub use args::Args;
pub use registry::{Handler, Registry, RegistryError, COMMAND_NAMES};
pub use reply::{encode, NONE_REPLY};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    #[error("{command}: missing argument `{name}`")]
    MissingArgument {
        command: &'static str,
        name: &'static str,
    },

    #[error("{command}: argument `{name}` is not a number: {value:?}")]
    InvalidNumber {
        command: &'static str,
        name: &'static str,
        value: String,
    },

    #[error("{command}: argument `{name}` needs {expected} components, got {found}")]
    WrongArity {
        command: &'static str,
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{command}: malformed JSON payload: {source}")]
    Json {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Op(#[from] OpError),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Splits a line into its command name and argument text.
pub fn split_line(line: &str) -> (&str, &str) {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.split_once(' ') {
        Some((name, rest)) => (name, rest),
        None => (line, ""),
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Registry,
    allow_passthrough: bool,
}

impl Dispatcher {
    /// Dispatcher over the built-in vocabulary.
    pub fn new(allow_passthrough: bool) -> Result<Self, RegistryError> {
        Self::with_registry(Registry::builtin(), allow_passthrough)
    }

    pub fn with_registry(
        registry: Registry,
        allow_passthrough: bool,
    ) -> Result<Self, RegistryError> {
        registry.validate()?;
        Ok(Self {
            registry,
            allow_passthrough,
        })
    }

    /// Parses a line into an operation without touching the host.
    pub fn parse(&self, line: &str) -> Result<Op, CommandError> {
        let (name, rest) = split_line(line);
        let (command, handler) = self
            .registry
            .get(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_owned()))?;
        handler(&Args::new(command, rest))
    }

    /// Runs one line against the host. `Ok(None)` means no reply is written.
    pub fn dispatch(
        &self,
        host: &mut dyn SceneHost,
        redirects: &mut RedirectTable,
        line: &str,
    ) -> Result<Option<String>, CommandError> {
        let (name, rest) = split_line(line);
        let Some((command, handler)) = self.registry.get(name) else {
            return self.passthrough(host, line.trim_end_matches(['\r', '\n']), name);
        };
        let op = handler(&Args::new(command, rest))?;
        debug!(command, "applying");
        let mut ctx = SceneContext::new(host, redirects);
        let output = ops::apply(&mut ctx, op)?;
        Ok(encode(output))
    }

    fn passthrough(
        &self,
        host: &mut dyn SceneHost,
        source: &str,
        name: &str,
    ) -> Result<Option<String>, CommandError> {
        if !self.allow_passthrough {
            warn!(
                command = name,
                "unknown command rejected, script passthrough is disabled"
            );
            return Err(CommandError::UnknownCommand(name.to_owned()));
        }
        let Some(script) = host.script_host() else {
            warn!(
                command = name,
                "unknown command rejected, host has no script support"
            );
            return Err(CommandError::UnknownCommand(name.to_owned()));
        };
        debug!(
            command = name,
            "passing line through to the host script engine"
        );
        let output = script.execute(source)?;
        Ok(output.map(|text| {
            if text.is_empty() {
                NONE_REPLY.to_owned()
            } else {
                text
            }
        }))
    }
}
