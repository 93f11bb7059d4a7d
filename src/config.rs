// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 1234;
/// Understood by every instance of the bridge, including earlier plugin releases.
pub const DEFAULT_VACATE_MESSAGE: &str = "promethean_vacate_socket";
pub const DEFAULT_READ_CHUNK_BYTES: usize = 128 * 1024;

/// Listener and dispatch settings.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    pub host: String,
    pub port: u16,
    /// Control payload that closes the listener.
    pub vacate_message: String,
    /// Treat the vacate message as an ordinary command line.
    pub ignore_vacate: bool,
    /// Hand unregistered command lines to the host's script engine.
    pub allow_script_passthrough: bool,
    /// Pause between asking a previous owner to vacate and binding.
    pub handoff_delay_ms: u64,
    pub read_chunk_bytes: usize,
    /// Longest command line accepted; a connection that exceeds it is dropped.
    pub max_line_bytes: usize,
    /// Closed undo chunks the in-memory host keeps.
    pub undo_limit: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            vacate_message: DEFAULT_VACATE_MESSAGE.to_owned(),
            ignore_vacate: false,
            allow_script_passthrough: true,
            handoff_delay_ms: 200,
            read_chunk_bytes: DEFAULT_READ_CHUNK_BYTES,
            max_line_bytes: 32 * DEFAULT_READ_CHUNK_BYTES,
            undo_limit: crate::host::DEFAULT_UNDO_LIMIT,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

impl BridgeConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vacate_message.trim().is_empty() {
            return Err(ConfigError::Invalid("vacate_message must not be empty"));
        }
        if self.vacate_message.contains('\n') {
            return Err(ConfigError::Invalid("vacate_message must be a single line"));
        }
        if self.read_chunk_bytes == 0 {
            return Err(ConfigError::Invalid("read_chunk_bytes must be positive"));
        }
        if self.max_line_bytes == 0 {
            return Err(ConfigError::Invalid("max_line_bytes must be positive"));
        }
        Ok(())
    }

    pub fn handoff_delay(&self) -> Duration {
        Duration::from_millis(self.handoff_delay_ms)
    }
}
